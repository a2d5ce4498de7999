/// Sets bit `bit` in `word`.
///
/// # Panics
///
/// Panics in debug builds if `bit` is not below 32.
#[inline]
pub fn set_bit(word: &mut u32, bit: u32) {
    debug_assert!(bit < u32::BITS, "Bit {} is outside of a word", bit);
    *word |= 1 << bit;
}

/// Clears bit `bit` in `word`.
///
/// # Panics
///
/// Panics in debug builds if `bit` is not below 32.
#[inline]
pub fn clear_bit(word: &mut u32, bit: u32) {
    debug_assert!(bit < u32::BITS, "Bit {} is outside of a word", bit);
    *word &= !(1 << bit);
}

/// Sets or clears bit `bit` in `word`, depending on `value`.
///
/// # Panics
///
/// Panics in debug builds if `bit` is not below 32.
#[inline]
pub fn write_bit(word: &mut u32, bit: u32, value: bool) {
    if value {
        set_bit(word, bit);
    } else {
        clear_bit(word, bit);
    }
}

/// Reads bit `bit` of `word`.
///
/// # Panics
///
/// Panics in debug builds if `bit` is not below 32.
#[inline]
pub fn get_bit(word: u32, bit: u32) -> bool {
    debug_assert!(bit < u32::BITS, "Bit {} is outside of a word", bit);
    (word & (1 << bit)) != 0
}
