//! Club member (roster entry) and player class.

use serde::{Deserialize, Serialize};

/// Competition class of a club member. Only A, B, and C count toward rankings.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum PlayerClass {
    A,
    B,
    C,
}

impl PlayerClass {
    /// Parse a class cell from the roster. Anything other than A/B/C is
    /// treated as unknown (the member is kept but excluded from rankings).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "A" | "a" => Some(PlayerClass::A),
            "B" | "b" => Some(PlayerClass::B),
            "C" | "c" => Some(PlayerClass::C),
            _ => None,
        }
    }
}

impl std::fmt::Display for PlayerClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerClass::A => write!(f, "A"),
            PlayerClass::B => write!(f, "B"),
            PlayerClass::C => write!(f, "C"),
        }
    }
}

/// One roster entry. Owned by the member-management side; the engine only
/// reads a snapshot at enrichment time. Names are unique within the club and
/// are the join key for game rows (there is no separate member id).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    #[serde(default)]
    pub club: String,
    /// None when the roster carries an unrecognized class.
    pub class: Option<PlayerClass>,
}

impl Member {
    pub fn new(name: impl Into<String>, class: Option<PlayerClass>) -> Self {
        Self {
            name: name.into(),
            club: String::new(),
            class,
        }
    }
}
