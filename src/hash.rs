//! FNV-1a string hashing
//!
//! Maps an arbitrary string to a stable 32-bit seed. Every theme starts here:
//! the SMILES text and formatted property values are concatenated into a seed
//! string and hashed, so identical molecular input always reproduces the same
//! theme on every platform.
//!
//! **Critical constraint: determinism.** The accumulator uses unsigned 32-bit
//! wraparound (`wrapping_mul`), never float math, so results are bit-for-bit
//! identical regardless of platform or optimization level. Collisions between
//! unequal inputs are permitted; no uniqueness is claimed.

/// FNV-1a 32-bit offset basis
pub const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;

/// FNV-1a 32-bit prime
pub const FNV_PRIME: u32 = 0x0100_0193;

/// Hash a string to a 32-bit unsigned integer using FNV-1a.
///
/// Iterates over Unicode scalar values: XOR the code point into the
/// accumulator, then wrapping-multiply by the FNV prime.
///
/// # Examples
///
/// ```
/// use molsong::fnv1a_32;
///
/// assert_eq!(fnv1a_32(""), 0x811c9dc5); // offset basis
/// assert_eq!(fnv1a_32("CCO"), fnv1a_32("CCO")); // deterministic
/// ```
#[inline]
pub fn fnv1a_32(input: &str) -> u32 {
    let mut hash = FNV_OFFSET_BASIS;
    for c in input.chars() {
        hash ^= c as u32;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string_is_offset_basis() {
        assert_eq!(fnv1a_32(""), FNV_OFFSET_BASIS);
    }

    #[test]
    fn test_known_reference_values() {
        // Standard FNV-1a test vectors for ASCII input
        assert_eq!(fnv1a_32("a"), 0xe40c292c);
        assert_eq!(fnv1a_32("hello"), 0x4f9f2cab);
        assert_eq!(fnv1a_32("CCO"), 0x724a3684);
    }

    #[test]
    fn test_determinism() {
        let smiles = "CC(=O)OC1=CC=CC=C1C(=O)O";
        assert_eq!(fnv1a_32(smiles), fnv1a_32(smiles));
    }

    #[test]
    fn test_typical_inputs_differ() {
        // No uniqueness guarantee, but these must not collide in practice
        assert_ne!(fnv1a_32("CCO"), fnv1a_32("CCN"));
        assert_ne!(fnv1a_32("CCO|46.07"), fnv1a_32("CCO|46.08"));
    }

    #[test]
    fn test_non_ascii_input() {
        // Code points above 0xFF must hash without panicking and stay stable
        assert_eq!(fnv1a_32("苯环"), fnv1a_32("苯环"));
        assert_ne!(fnv1a_32("苯环"), fnv1a_32("苯"));
    }
}
