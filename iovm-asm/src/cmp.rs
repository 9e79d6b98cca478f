/// Comparison operator used by the wait opcodes and exposed to hosts for
/// predicate evaluation.
///
/// The 3-bit operator codes 6 and 7 are reserved and never hold; see
/// [`Comparison::compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(clippy::upper_case_acronyms)]
#[repr(u8)]
pub enum Comparison {
    /// `a == b`
    EQ = 0x00,
    /// `a != b`
    NEQ = 0x01,
    /// `a < b`
    LT = 0x02,
    /// `a >= b`
    NLT = 0x03,
    /// `a > b`
    GT = 0x04,
    /// `a <= b`
    NGT = 0x05,
}

impl Comparison {
    /// Convert an operator code, returning `None` for the reserved codes.
    pub const fn from_code(q: u8) -> Option<Self> {
        match q {
            0x00 => Some(Self::EQ),
            0x01 => Some(Self::NEQ),
            0x02 => Some(Self::LT),
            0x03 => Some(Self::NLT),
            0x04 => Some(Self::GT),
            0x05 => Some(Self::NGT),
            _ => None,
        }
    }

    /// Apply the operator to a pair of bytes.
    pub const fn evaluate(&self, a: u8, b: u8) -> bool {
        match self {
            Self::EQ => a == b,
            Self::NEQ => a != b,
            Self::LT => a < b,
            Self::NLT => a >= b,
            Self::GT => a > b,
            Self::NGT => a <= b,
        }
    }

    /// Apply the operator selected by `q` to a pair of bytes.
    ///
    /// The reserved codes 6 and 7 compare as `false`.
    pub const fn compare(q: u8, a: u8, b: u8) -> bool {
        match Self::from_code(q) {
            Some(cmp) => cmp.evaluate(a, b),
            None => false,
        }
    }
}

impl From<Comparison> for u8 {
    fn from(cmp: Comparison) -> u8 {
        cmp as u8
    }
}
