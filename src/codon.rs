//! The standard genetic code and codon translation.

use std::fmt;
use std::sync::LazyLock;

/// Amino acids of the genetic code plus the translation stop signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AminoAcid {
    Ala,
    Arg,
    Asn,
    Asp,
    Cys,
    Gln,
    Glu,
    Gly,
    His,
    Ile,
    Leu,
    Lys,
    Met,
    Phe,
    Pro,
    Ser,
    Thr,
    Trp,
    Tyr,
    Val,
    Stop,
}

impl AminoAcid {
    /// IUPAC one-letter code; stop is `*`.
    #[must_use]
    pub fn one_letter(self) -> u8 {
        match self {
            Self::Ala => b'A',
            Self::Arg => b'R',
            Self::Asn => b'N',
            Self::Asp => b'D',
            Self::Cys => b'C',
            Self::Gln => b'Q',
            Self::Glu => b'E',
            Self::Gly => b'G',
            Self::His => b'H',
            Self::Ile => b'I',
            Self::Leu => b'L',
            Self::Lys => b'K',
            Self::Met => b'M',
            Self::Phe => b'F',
            Self::Pro => b'P',
            Self::Ser => b'S',
            Self::Thr => b'T',
            Self::Trp => b'W',
            Self::Tyr => b'Y',
            Self::Val => b'V',
            Self::Stop => b'*',
        }
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.one_letter() as char)
    }
}

/// Lookup table for translating codons to amino acids.
///
/// Indexed by 6-bit codon encoding: A=0, C=1, G=2, T/U=3.
/// Index = first*16 + second*4 + third.
pub struct CodonTable {
    table: [AminoAcid; 64],
}

/// The standard genetic code, built on first use and shared read-only.
pub static STANDARD: LazyLock<CodonTable> = LazyLock::new(CodonTable::standard);


fn base_to_index(b: u8) -> Option<usize> {
    match b {
        b'A' | b'a' => Some(0),
        b'C' | b'c' => Some(1),
        b'G' | b'g' => Some(2),
        b'T' | b't' | b'U' | b'u' => Some(3),
        _ => None,
    }
}

impl CodonTable {
    /// Standard genetic code (NCBI translation table 1).
    #[must_use]
    pub fn standard() -> Self {
        use AminoAcid::*;
        // Order: AAA, AAC, AAG, AAT, ACA, ACC, ACG, ACT, AGA, ...
        #[rustfmt::skip]
        let table: [AminoAcid; 64] = [
            Lys, Asn, Lys, Asn,     // AA*
            Thr, Thr, Thr, Thr,     // AC*
            Arg, Ser, Arg, Ser,     // AG*
            Ile, Ile, Met, Ile,     // AT*
            Gln, His, Gln, His,     // CA*
            Pro, Pro, Pro, Pro,     // CC*
            Arg, Arg, Arg, Arg,     // CG*
            Leu, Leu, Leu, Leu,     // CT*
            Glu, Asp, Glu, Asp,     // GA*
            Ala, Ala, Ala, Ala,     // GC*
            Gly, Gly, Gly, Gly,     // GG*
            Val, Val, Val, Val,     // GT*
            Stop, Tyr, Stop, Tyr,   // TA*
            Ser, Ser, Ser, Ser,     // TC*
            Stop, Cys, Trp, Cys,    // TG*
            Leu, Phe, Leu, Phe,     // TT*
        ];
        Self { table }
    }

    /// Translate a single codon. Returns `None` for short input or ambiguous bases.
    #[must_use]
    pub fn translate_codon(&self, codon: &[u8]) -> Option<AminoAcid> {
        if codon.len() < 3 {
            return None;
        }
        let a = base_to_index(codon[0])?;
        let b = base_to_index(codon[1])?;
        let c = base_to_index(codon[2])?;
        Some(self.table[a * 16 + b * 4 + c])
    }
}

/// Translate a coding sequence to one-letter protein; unresolvable codons are `X`.
pub fn translate(cds: &[u8], table: &CodonTable) -> Vec<u8> {
    cds.chunks(3)
        .map(|codon| {
            table
                .translate_codon(codon)
                .map_or(b'X', AminoAcid::one_letter)
        })
        .collect()
}
