/// Implements sign extension as described at [Sign extension](https://en.wikipedia.org/wiki/Sign_extension).
///
/// The lowest `valid_bits` bits of `bits` are read as a two's complement number and the sign bit
/// is copied into all higher bits. Bits above `valid_bits` in the input are ignored.
///
/// # Panics
/// - in debug builds if `valid_bits` is not within `1..=16`
#[must_use]
pub const fn sign_extend(bits: u16, valid_bits: u8) -> u16 {
    debug_assert!(valid_bits >= 1 && valid_bits <= 16, "invalid bit width");
    if valid_bits >= 16 {
        return bits;
    }
    let bits = bits & ((1 << valid_bits) - 1);
    let most_significant_bit = bits >> (valid_bits - 1);
    if most_significant_bit == 1 {
        // negative: 1-extend
        bits | (0xFFFF << valid_bits)
    } else {
        // positive, already 0-extended
        bits
    }
}

/// Reads a 16-bit word as a two's complement number.
#[must_use]
pub const fn twos_complement_to_decimal(bin_rep: u16) -> i16 {
    bin_rep.cast_signed()
}
