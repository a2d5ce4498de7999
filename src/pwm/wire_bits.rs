use crate::Color;

/// Wire bits per color bit.
pub const WIRE_BITS_PER_BIT: usize = 3;
/// Wire bits per LED: 24 color bits, three wire bits each.
pub const BITS_PER_LED: usize = 24 * WIRE_BITS_PER_BIT;

// High, high, low
const ONE_TRIPLET: u8 = 0b110;
// High, low, low
const ZERO_TRIPLET: u8 = 0b100;

/// The wire pattern of a single color bit, first bit in the most significant position.
pub const fn wire_triplet(bit: bool) -> u8 {
    if bit {
        ONE_TRIPLET
    } else {
        ZERO_TRIPLET
    }
}

/// Turns a stream of colors into the WS2812 wire bitstream.
///
/// Every color is sent as its GRB word, most significant bit first,
/// with each bit expanded to a [wire triplet](wire_triplet).
pub struct WireBits<I> {
    colors: I,
    grb: u32,
    remaining: usize,
}

impl<I> WireBits<I>
where
    I: Iterator<Item = Color>,
{
    /// Creates the bitstream of `colors`.
    pub fn new(colors: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            colors: colors.into_iter(),
            grb: 0,
            remaining: 0,
        }
    }
}

impl<I> Iterator for WireBits<I>
where
    I: Iterator<Item = Color>,
{
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.remaining == 0 {
            self.grb = self.colors.next()?.grb();
            self.remaining = BITS_PER_LED;
        }

        let position = BITS_PER_LED - self.remaining;
        self.remaining -= 1;

        let color_bit = 23 - position / WIRE_BITS_PER_BIT;
        let phase = position % WIRE_BITS_PER_BIT;

        let triplet = wire_triplet((self.grb >> color_bit) & 1 != 0);
        Some((triplet >> (WIRE_BITS_PER_BIT - 1 - phase)) & 1 != 0)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lower, upper) = self.colors.size_hint();
        (
            lower.saturating_mul(BITS_PER_LED).saturating_add(self.remaining),
            upper
                .and_then(|upper| upper.checked_mul(BITS_PER_LED))
                .and_then(|upper| upper.checked_add(self.remaining)),
        )
    }
}
