//! SAP rating grade shared between the Environmental Impact (EI) and Energy
//! Cost (EC) ratings.

use serde::{Deserialize, Serialize};

/// A SAP rating band, A (best) through G (worst).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RatingGrade {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl std::fmt::Display for RatingGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
            Self::G => "G",
        };
        write!(f, "{s}")
    }
}
