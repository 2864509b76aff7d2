use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Suit {
    Karo = 0,
    Herz = 1,
    Pik = 2,
    Kreuz = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Karo, Suit::Herz, Suit::Pik, Suit::Kreuz];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Suit::Karo),
            1 => Some(Suit::Herz),
            2 => Some(Suit::Pik),
            3 => Some(Suit::Kreuz),
            _ => None,
        }
    }

    /// Stable id used by the state encoder for the trump suit.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Suit::Karo => "karo",
            Suit::Herz => "herz",
            Suit::Pik => "pik",
            Suit::Kreuz => "kreuz",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Suit::Karo => "k",
            Suit::Herz => "h",
            Suit::Pik => "p",
            Suit::Kreuz => "z",
        };
        f.write_str(symbol)
    }
}
