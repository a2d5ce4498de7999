use crate::{bits, Color};

use super::wire_bits::{WireBits, BITS_PER_LED};

/// Words in the waveform buffer; the depth of the PWM FIFO.
pub const WAVEFORM_WORDS: usize = 16;

const BITS_PER_WORD: usize = u32::BITS as usize;

/// The serial bitstream handed to the PWM FIFO.
///
/// Bits are packed starting at the least significant bit of the first word.
/// The serializer shifts words out most significant bit first, so words are
/// bit-reversed on their way into the FIFO, see [`fifo_words`](Self::fifo_words).
///
/// # Generics:
///
/// * `WORDS` - the number of 32-bit words in the buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waveform<const WORDS: usize = WAVEFORM_WORDS> {
    words: [u32; WORDS],
}

impl<const WORDS: usize> Waveform<WORDS> {
    /// Number of bits the buffer holds.
    pub const CAPACITY_BITS: usize = WORDS * BITS_PER_WORD;
    /// Number of LEDs whose wire bits fit into the buffer.
    pub const MAX_LEDS: usize = Self::CAPACITY_BITS / BITS_PER_LED;

    /// Creates an all-zero waveform.
    pub const fn new() -> Self {
        Self { words: [0; WORDS] }
    }

    /// Zeroes the whole buffer.
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// The raw words, in the order they were packed.
    pub fn words(&self) -> &[u32; WORDS] {
        &self.words
    }

    /// Sets or clears the bit at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is not below [`CAPACITY_BITS`](Self::CAPACITY_BITS).
    pub fn set_bit(&mut self, position: usize, value: bool) {
        let (word, bit) = Self::locate(position);
        bits::write_bit(&mut self.words[word], bit, value);
    }

    /// Reads the bit at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is not below [`CAPACITY_BITS`](Self::CAPACITY_BITS).
    pub fn get_bit(&self, position: usize) -> bool {
        let (word, bit) = Self::locate(position);
        bits::get_bit(self.words[word], bit)
    }

    fn locate(position: usize) -> (usize, u32) {
        assert!(
            position < Self::CAPACITY_BITS,
            "Bit {} is outside of the waveform ({} bits)",
            position,
            Self::CAPACITY_BITS
        );
        (position / BITS_PER_WORD, (position % BITS_PER_WORD) as u32)
    }

    /// Replaces the buffer content with the wire bits of `colors`.
    ///
    /// Everything after the last LED stays zero, which the strip reads as
    /// the reset/latch signal.
    ///
    /// # Panics
    ///
    /// Panics if more than [`MAX_LEDS`](Self::MAX_LEDS) colors are given.
    pub fn encode(&mut self, colors: &[Color]) {
        assert!(
            colors.len() <= Self::MAX_LEDS,
            "{} LEDs don't fit into a waveform of {} LEDs",
            colors.len(),
            Self::MAX_LEDS
        );

        self.clear();
        for (position, bit) in WireBits::new(colors.iter().copied()).enumerate() {
            self.set_bit(position, bit);
        }
    }

    /// The words in the order and bit order the FIFO expects.
    pub fn fifo_words(&self) -> impl ExactSizeIterator<Item = u32> + '_ {
        self.words.iter().map(|word| word.reverse_bits())
    }
}

impl<const WORDS: usize> Default for Waveform<WORDS> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity() {
        assert_eq!(Waveform::<16>::CAPACITY_BITS, 512);
        assert_eq!(Waveform::<16>::MAX_LEDS, 7);
        assert_eq!(Waveform::<1>::MAX_LEDS, 0);
        assert_eq!(Waveform::<9>::MAX_LEDS, 4);
    }

    #[test]
    fn bit_round_trip() {
        let mut waveform = Waveform::<16>::new();
        for position in 0..Waveform::<16>::CAPACITY_BITS {
            waveform.set_bit(position, true);
            assert!(waveform.get_bit(position));
            waveform.set_bit(position, false);
            assert!(!waveform.get_bit(position));
        }
        assert_eq!(waveform, Waveform::new());
    }

    #[test]
    fn packing_order() {
        let mut waveform = Waveform::<2>::new();
        waveform.set_bit(0, true);
        waveform.set_bit(33, true);
        assert_eq!(waveform.words(), &[0x0000_0001, 0x0000_0002]);
        assert_eq!(
            waveform.fifo_words().collect::<Vec<_>>(),
            [0x8000_0000, 0x4000_0000]
        );
    }

    #[test]
    #[should_panic]
    fn bit_out_of_range() {
        Waveform::<2>::new().set_bit(64, true);
    }

    #[test]
    fn single_red_led() {
        let mut waveform = Waveform::<16>::new();
        waveform.encode(&[Color::new(255, 0, 0)]);

        let mut expected = [0u32; 16];
        expected[..3].copy_from_slice(&[0xdb24_9249, 0x9249_6db6, 0x0000_0024]);
        assert_eq!(waveform.words(), &expected);

        let fifo: Vec<u32> = waveform.fifo_words().collect();
        assert_eq!(fifo[..3], [0x9249_24db, 0x6db6_9249, 0x2400_0000]);
        assert!(fifo[3..].iter().all(|&word| word == 0));
    }

    #[test]
    fn encode_clears_previous_content() {
        let mut waveform = Waveform::<16>::new();
        waveform.encode(&[Color::new(255, 255, 255); 7]);
        waveform.encode(&[]);
        assert_eq!(waveform, Waveform::new());
    }

    #[test]
    fn leds_do_not_influence_each_other() {
        let color = Color::new(0x12, 0x34, 0x56);
        let expected: Vec<bool> = WireBits::new([color]).collect();

        for index in 0..Waveform::<16>::MAX_LEDS {
            let mut colors = [Color::new(255, 255, 255); 7];
            colors[index] = color;

            let mut waveform = Waveform::<16>::new();
            waveform.encode(&colors);

            let bits: Vec<bool> = (index * BITS_PER_LED..(index + 1) * BITS_PER_LED)
                .map(|position| waveform.get_bit(position))
                .collect();
            assert_eq!(bits, expected, "LED {}", index);
            assert!((7 * BITS_PER_LED..512).all(|position| !waveform.get_bit(position)));
        }
    }

    #[test]
    #[should_panic]
    fn too_many_leds() {
        Waveform::<16>::new().encode(&[Color::BLACK; 8]);
    }
}
