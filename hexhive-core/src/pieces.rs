//! Piece kinds, piece identifiers and starting hands

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParsePieceError;

/// Player color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn letter(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    fn from_letter(c: char) -> Option<Self> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }
}

/// Piece kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Bug {
    Queen,
    Beetle,
    Grasshopper,
    Spider,
    Ant,
    Ladybug,
    Mosquito,
    Pillbug,
}

/// Static description of a piece kind
#[derive(Clone, Debug)]
pub struct BugInfo {
    pub bug: Bug,
    pub letter: char,
    pub name: &'static str,
    pub count: u8,
    pub expansion: bool,
}

impl BugInfo {
    const fn new(bug: Bug, letter: char, name: &'static str, count: u8, expansion: bool) -> Self {
        Self { bug, letter, name, count, expansion }
    }
}

/// All piece kinds, in hand order
pub static BUGS: [BugInfo; 8] = [
    BugInfo::new(Bug::Queen, 'Q', "Queen", 1, false),
    BugInfo::new(Bug::Beetle, 'B', "Beetle", 2, false),
    BugInfo::new(Bug::Grasshopper, 'G', "Grasshopper", 3, false),
    BugInfo::new(Bug::Spider, 'S', "Spider", 2, false),
    BugInfo::new(Bug::Ant, 'A', "Ant", 3, false),
    BugInfo::new(Bug::Ladybug, 'L', "Ladybug", 1, true),
    BugInfo::new(Bug::Mosquito, 'M', "Mosquito", 1, true),
    BugInfo::new(Bug::Pillbug, 'P', "Pillbug", 1, true),
];

impl Bug {
    pub fn info(self) -> &'static BugInfo {
        &BUGS[self as usize]
    }

    pub fn letter(self) -> char {
        self.info().letter
    }

    pub fn count(self) -> u8 {
        self.info().count
    }

    fn from_letter(c: char) -> Option<Self> {
        BUGS.iter().find(|b| b.letter == c).map(|b| b.bug)
    }
}

/// Optional expansion kinds
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Expansions {
    pub ladybug: bool,
    pub mosquito: bool,
    pub pillbug: bool,
}

impl Expansions {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self { ladybug: true, mosquito: true, pillbug: true }
    }

    pub fn includes(&self, bug: Bug) -> bool {
        match bug {
            Bug::Ladybug => self.ladybug,
            Bug::Mosquito => self.mosquito,
            Bug::Pillbug => self.pillbug,
            _ => true,
        }
    }
}

/// A single physical piece. The identifier string (`wQ`, `bA3`) is its
/// serialized form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Piece {
    pub color: Color,
    pub bug: Bug,
    /// 1-based copy number within (color, bug)
    pub index: u8,
}

impl Piece {
    pub const fn new(color: Color, bug: Bug, index: u8) -> Self {
        Self { color, bug, index }
    }

    pub fn queen(color: Color) -> Self {
        Self::new(color, Bug::Queen, 1)
    }

    pub fn is_queen(&self) -> bool {
        self.bug == Bug::Queen
    }

    /// Identifier string, e.g. `wQ`, `bA3`
    pub fn id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bug.count() > 1 {
            write!(f, "{}{}{}", self.color.letter(), self.bug.letter(), self.index)
        } else {
            write!(f, "{}{}", self.color.letter(), self.bug.letter())
        }
    }
}

impl FromStr for Piece {
    type Err = ParsePieceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePieceError(s.to_string());
        let mut chars = s.chars();
        let color = chars.next().and_then(Color::from_letter).ok_or_else(err)?;
        let bug = chars.next().and_then(Bug::from_letter).ok_or_else(err)?;
        let rest = chars.as_str();
        let index = if rest.is_empty() {
            1
        } else {
            rest.parse::<u8>().map_err(|_| err())?
        };
        if index == 0 || index > bug.count() {
            return Err(err());
        }
        Ok(Piece::new(color, bug, index))
    }
}

impl TryFrom<String> for Piece {
    type Error = ParsePieceError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Piece> for String {
    fn from(piece: Piece) -> String {
        piece.to_string()
    }
}

/// Build a color's starting hand: fixed counts per kind, expansion kinds
/// only when enabled. Order is table order, then copy number.
pub fn create_initial_hand(color: Color, expansions: Expansions) -> Vec<Piece> {
    BUGS.iter()
        .filter(|info| expansions.includes(info.bug))
        .flat_map(|info| (1..=info.count).map(move |i| Piece::new(color, info.bug, i)))
        .collect()
}
