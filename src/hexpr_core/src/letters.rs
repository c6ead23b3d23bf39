use std::{fmt::Display, str::FromStr};

use thiserror::Error;

use crate::topology::Corner;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LettersError {
    #[error("Expected exactly 8 letters, one per corner, but got {0}")]
    WrongCount(usize),
}

/// The letter printed on each corner, indexed by logical corner.
///
/// How letters are chosen is up to whoever builds the puzzle; this only
/// carries the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Letters([char; 8]);

impl Letters {
    pub fn new(letters: [char; 8]) -> Letters {
        Letters(letters)
    }

    pub fn of(&self, corner: Corner) -> char {
        self.0[corner.index()]
    }
}

impl Default for Letters {
    fn default() -> Self {
        Letters(['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'])
    }
}

impl FromStr for Letters {
    type Err = LettersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars = s.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>();
        let letters = <[char; 8]>::try_from(chars.as_slice())
            .map_err(|_| LettersError::WrongCount(chars.len()))?;
        Ok(Letters(letters))
    }
}

impl Display for Letters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

/// Per-instance seed supplied by whoever creates the puzzle. Its text doubles
/// as the coordinate label shown while the top word is hidden.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InstanceSeed {
    label: String,
}

impl InstanceSeed {
    pub fn new(label: impl Into<String>) -> InstanceSeed {
        InstanceSeed {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_letters() {
        let letters: Letters = "WORD SALT".parse().unwrap();
        assert_eq!(letters.of(Corner::UBL), 'W');
        assert_eq!(letters.of(Corner::DBL), 'T');
        assert_eq!(letters.to_string(), "WORDSALT");

        assert_eq!("ABC".parse::<Letters>(), Err(LettersError::WrongCount(3)));
    }
}
