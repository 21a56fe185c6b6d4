//! Nucleotide alphabet helpers: 4-bit base codes and complementing.

/// Bit for adenine in a degeneracy mask.
pub const BASE_A: u8 = 1;
/// Bit for cytosine in a degeneracy mask.
pub const BASE_C: u8 = 2;
/// Bit for guanine in a degeneracy mask.
pub const BASE_G: u8 = 4;
/// Bit for thymine in a degeneracy mask.
pub const BASE_T: u8 = 8;

/// The four unambiguous bases in mask-bit order.
pub const BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// Mask bit for a base, case-insensitive. Ambiguity codes have no bit.
#[must_use]
pub fn base_bit(base: u8) -> Option<u8> {
    match base {
        b'A' | b'a' => Some(BASE_A),
        b'C' | b'c' => Some(BASE_C),
        b'G' | b'g' => Some(BASE_G),
        b'T' | b't' | b'U' | b'u' => Some(BASE_T),
        _ => None,
    }
}

/// Watson-Crick complement of a base. Anything that is not A/C/G/T becomes `N`.
#[must_use]
pub fn complement(base: u8) -> u8 {
    match base {
        b'A' | b'a' => b'T',
        b'C' | b'c' => b'G',
        b'G' | b'g' => b'C',
        b'T' | b't' | b'U' | b'u' => b'A',
        _ => b'N',
    }
}

/// Reverse complement of a sequence.
#[must_use]
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| complement(b)).collect()
}

/// Swaps the A/T and C/G bits of a mask so a mask computed on the minus
/// strand is expressed in reference-strand base identity.
#[must_use]
pub fn complement_mask(mask: u8) -> u8 {
    let mut out = 0;
    if mask & BASE_A != 0 {
        out |= BASE_T;
    }
    if mask & BASE_C != 0 {
        out |= BASE_G;
    }
    if mask & BASE_G != 0 {
        out |= BASE_C;
    }
    if mask & BASE_T != 0 {
        out |= BASE_A;
    }
    out
}

/// Renders a mask as its bases, e.g. `A.G.` for A|G.
#[must_use]
pub fn mask_to_string(mask: u8) -> String {
    BASES
        .iter()
        .map(|&b| match base_bit(b) {
            Some(bit) if mask & bit != 0 => b as char,
            _ => '.',
        })
        .collect()
}
