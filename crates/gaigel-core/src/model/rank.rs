use core::fmt;
use serde::{Deserialize, Serialize};

/// Card ranks of the 48-card Gaigel deck. The discriminant is the point value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rank {
    Sieben = 0,
    Bube = 2,
    Dame = 3,
    Koenig = 4,
    Zehn = 10,
    Ass = 11,
}

impl Rank {
    pub const ORDERED: [Rank; 6] = [
        Rank::Sieben,
        Rank::Bube,
        Rank::Dame,
        Rank::Koenig,
        Rank::Zehn,
        Rank::Ass,
    ];

    pub const fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Rank::Sieben),
            2 => Some(Rank::Bube),
            3 => Some(Rank::Dame),
            4 => Some(Rank::Koenig),
            10 => Some(Rank::Zehn),
            11 => Some(Rank::Ass),
            _ => None,
        }
    }

    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Position within [`Rank::ORDERED`].
    pub const fn index(self) -> usize {
        match self {
            Rank::Sieben => 0,
            Rank::Bube => 1,
            Rank::Dame => 2,
            Rank::Koenig => 3,
            Rank::Zehn => 4,
            Rank::Ass => 5,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Rank::Sieben => "sieben",
            Rank::Bube => "bube",
            Rank::Dame => "dame",
            Rank::Koenig => "koenig",
            Rank::Zehn => "zehn",
            Rank::Ass => "ass",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}
