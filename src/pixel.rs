/// An RGB color with 8 bits per channel.
///
/// No gamma correction is applied; the values are sent to the strip as they are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
}

impl Color {
    /// All channels off.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Creates a color from its red, green and blue channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// The red channel.
    pub const fn red(self) -> u8 {
        self.r
    }

    /// The green channel.
    pub const fn green(self) -> u8 {
        self.g
    }

    /// The blue channel.
    pub const fn blue(self) -> u8 {
        self.b
    }

    /// The 24-bit word that goes over the wire, most significant bit first.
    ///
    /// IMPORTANT: WS2812 strips are GRB encoded, so green ends up in the top byte.
    pub const fn grb(self) -> u32 {
        ((self.g as u32) << 16) | ((self.r as u32) << 8) | self.b as u32
    }
}

/// A pixel that can be rendered with this library.
pub trait Pixel {
    /// Converts the pixel into the color stored in the LED buffer.
    fn into_color(self) -> Color;
}

impl Pixel for Color {
    fn into_color(self) -> Color {
        self
    }
}

/// Raw RGB data.
impl Pixel for [u8; 3] {
    fn into_color(self) -> Color {
        Color::new(self[0], self[1], self[2])
    }
}

/// Raw RGB data.
impl Pixel for (u8, u8, u8) {
    fn into_color(self) -> Color {
        Color::new(self.0, self.1, self.2)
    }
}

/// 8-bit Linear sRGB, which is the color space
/// most NeoPixel strips are in.
///
/// Be aware that this differs from normal,
/// gamma-corrected sRGB. A conversion has to take place.
///
/// More info can be found in the documentation of the
/// [palette] crate.
impl Pixel for palette::LinSrgb<u8> {
    fn into_color(self) -> Color {
        Color::new(self.red, self.green, self.blue)
    }
}

impl<'a, P> Pixel for &'a P
where
    P: Pixel + Clone,
{
    fn into_color(self) -> Color {
        self.clone().into_color()
    }
}
