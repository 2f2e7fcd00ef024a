use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseError {
    InvalidChar(char),
    InvalidCode(String),
}

impl fmt::Display for BaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseError::InvalidChar(c) => {
                write!(f, "Unsupported nucleobase: '{}'", c)
            }
            BaseError::InvalidCode(s) => {
                write!(f, "Base-pair code must be two nucleobases, got '{}'", s)
            }
        }
    }
}

impl std::error::Error for BaseError {}


#[derive(Clone, Hash, Copy, Debug, Eq, PartialEq)]
pub enum Base { A, C, G, U }

/// Ring and exocyclic heavy atoms used to compare base geometry.
const ADENINE_ATOMS: &[&str] = &["N1", "C2", "N3", "C4", "C5", "C6", "N6", "N7", "C8", "N9"];
const GUANINE_ATOMS: &[&str] = &["N1", "C2", "N2", "N3", "C4", "C5", "C6", "O6", "N7", "C8", "N9"];
const CYTOSINE_ATOMS: &[&str] = &["N1", "C2", "O2", "N3", "C4", "N4", "C5", "C6"];
const URACIL_ATOMS: &[&str] = &["N1", "C2", "O2", "N3", "C4", "O4", "C5", "C6"];

impl Base {
    pub fn canonical_atoms(&self) -> &'static [&'static str] {
        match self {
            Base::A => ADENINE_ATOMS,
            Base::C => CYTOSINE_ATOMS,
            Base::G => GUANINE_ATOMS,
            Base::U => URACIL_ATOMS,
        }
    }
}

impl TryFrom<char> for Base {
    type Error = BaseError;
    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            'A' => Ok(Base::A),
            'C' => Ok(Base::C),
            'G' => Ok(Base::G),
            'U' => Ok(Base::U),
            _ => Err(BaseError::InvalidChar(c)),
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Base::A => 'A',
            Base::C => 'C',
            Base::G => 'G',
            Base::U => 'U',
        };
        write!(f, "{}", c)
    }
}

/// The ordered pair of nucleobases of a base pair, e.g. `GC`.
#[derive(Clone, Hash, Copy, Debug, Eq, PartialEq)]
pub struct BasePairCode(pub Base, pub Base);

impl BasePairCode {
    /// All sixteen ordered base combinations.
    pub fn all() -> impl Iterator<Item = BasePairCode> {
        use Base::*;
        [A, C, G, U].into_iter()
            .flat_map(|b1| [A, C, G, U].into_iter().map(move |b2| BasePairCode(b1, b2)))
    }
}

impl TryFrom<&str> for BasePairCode {
    type Error = BaseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(b1), Some(b2), None) => Ok(BasePairCode(Base::try_from(b1)?, Base::try_from(b2)?)),
            _ => Err(BaseError::InvalidCode(s.to_owned())),
        }
    }
}

impl fmt::Display for BasePairCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0, self.1)
    }
}
