//! The fixed shape of the hexahedron: eight corners, six faces, and the order in
//! which a quarter turn of each face carries its four corners around.

use std::{fmt::Display, str::FromStr};

use thiserror::Error;

/// One of the eight vertices of the hexahedron, named after the three faces it
/// touches.
///
/// The same names are used for physical slots: slot `X` is the position that
/// corner `X` occupies in the identity arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(clippy::upper_case_acronyms)]
pub enum Corner {
    UBL,
    UBR,
    UFR,
    UFL,
    DFL,
    DFR,
    DBR,
    DBL,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Face {
    U,
    D,
    F,
    B,
    L,
    R,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{0}` does not name a face of the hexahedron")]
pub struct ParseFaceError(pub String);

impl Corner {
    pub const ALL: [Self; 8] = {
        use Corner::*;
        let v = [UBL, UBR, UFR, UFL, DFL, DFR, DBR, DBL];

        let mut i = 0;
        while i < v.len() {
            assert!(i == v[i] as usize);
            i += 1;
        }

        v
    };

    pub fn index(self) -> usize {
        self as usize
    }

    /// The three faces whose quarter turns move this corner.
    pub fn faces(self) -> [Face; 3] {
        use Face::*;
        match self {
            Corner::UBL => [U, B, L],
            Corner::UBR => [U, B, R],
            Corner::UFR => [U, F, R],
            Corner::UFL => [U, F, L],
            Corner::DFL => [D, F, L],
            Corner::DFR => [D, F, R],
            Corner::DBR => [D, B, R],
            Corner::DBL => [D, B, L],
        }
    }
}

impl Display for Corner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

impl Face {
    pub const ALL: [Self; 6] = {
        use Face::*;
        let v = [U, D, F, B, L, R];

        let mut i = 0;
        while i < v.len() {
            assert!(i == v[i] as usize);
            i += 1;
        }

        v
    };

    /// The face the top word is read from.
    pub const TOP: Self = Face::U;

    /// The four slots of this face in the direction a clockwise quarter turn
    /// carries them: whatever sits in `cycle[i]` moves to `cycle[(i + 1) % 4]`.
    pub fn rotation_cycle(self) -> [Corner; 4] {
        use Corner::*;
        match self {
            Face::U => [UFL, UBL, UBR, UFR],
            Face::D => [DFL, DFR, DBR, DBL],
            Face::F => [UFL, UFR, DFR, DFL],
            Face::B => [UBL, DBL, DBR, UBR],
            Face::L => [UBL, UFL, DFL, DBL],
            Face::R => [UFR, UBR, DBR, DFR],
        }
    }

    /// The slots of this face in the order their letters are read.
    pub fn reading_order(self) -> [Corner; 4] {
        self.rotation_cycle()
    }

    pub fn contains(self, corner: Corner) -> bool {
        self.rotation_cycle().contains(&corner)
    }
}

impl Display for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

impl FromStr for Face {
    type Err = ParseFaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "U" | "u" => Ok(Face::U),
            "D" | "d" => Ok(Face::D),
            "F" | "f" => Ok(Face::F),
            "B" | "b" => Ok(Face::B),
            "L" | "l" => Ok(Face::L),
            "R" | "r" => Ok(Face::R),
            _ => Err(ParseFaceError(s.to_owned())),
        }
    }
}

/// Parses a whitespace separated sequence of face names, e.g. `"U B R"`.
///
/// # Errors
///
/// Fails on the first token that is not a face name.
pub fn parse_move_seq(sequence: &str) -> Result<Vec<Face>, ParseFaceError> {
    sequence.split_whitespace().map(str::parse).collect()
}
