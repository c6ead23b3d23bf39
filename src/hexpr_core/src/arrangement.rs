use std::fmt::Display;

use itertools::Itertools;
use thiserror::Error;

use crate::topology::{Corner, Face};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArrangementError {
    #[error("The occupancy table is not a bijection: {duplicated:?} appear more than once and {missing:?} are missing")]
    NotBijective {
        duplicated: Vec<Corner>,
        missing: Vec<Corner>,
    },
}

/// Which logical corner sits in which physical slot.
///
/// Both directions of the bijection are kept so that either projection is a
/// table lookup. They are only ever replaced together.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Arrangement {
    slot_of: [Corner; 8],
    corner_at: [Corner; 8],
}

impl Arrangement {
    pub fn identity() -> Arrangement {
        Arrangement {
            slot_of: Corner::ALL,
            corner_at: Corner::ALL,
        }
    }

    /// Builds an arrangement from the corner occupying each slot, in
    /// `Corner::ALL` slot order.
    ///
    /// # Errors
    ///
    /// Fails if some corner occupies two slots (and hence another occupies none).
    pub fn from_occupants(corner_at: [Corner; 8]) -> Result<Arrangement, ArrangementError> {
        let mut counts = [0_u8; 8];
        for corner in corner_at {
            counts[corner.index()] += 1;
        }

        if counts.iter().any(|&count| count != 1) {
            return Err(ArrangementError::NotBijective {
                duplicated: Corner::ALL
                    .into_iter()
                    .filter(|c| counts[c.index()] > 1)
                    .collect(),
                missing: Corner::ALL
                    .into_iter()
                    .filter(|c| counts[c.index()] == 0)
                    .collect(),
            });
        }

        let mut slot_of = Corner::ALL;
        for slot in Corner::ALL {
            slot_of[corner_at[slot.index()].index()] = slot;
        }

        Ok(Arrangement { slot_of, corner_at })
    }

    /// The identity arrangement with the given quarter turns applied in order.
    pub fn from_moves(moves: &[Face]) -> Arrangement {
        let mut arrangement = Arrangement::identity();
        for &face in moves {
            arrangement.quarter_turn(face);
        }
        arrangement
    }

    pub fn corner_at(&self, slot: Corner) -> Corner {
        self.corner_at[slot.index()]
    }

    pub fn slot_of(&self, corner: Corner) -> Corner {
        self.slot_of[corner.index()]
    }

    /// The occupant of every slot, in `Corner::ALL` slot order.
    pub fn occupants(&self) -> [Corner; 8] {
        self.corner_at
    }

    pub fn is_identity(&self) -> bool {
        self.corner_at == Corner::ALL
    }

    /// Moves each `(corner, destination)` pair; corners not mentioned stay put.
    ///
    /// The new table is built and checked on a copy first, so on error `self`
    /// is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Fails if the moves would leave two corners in one slot.
    pub fn apply_moves(&mut self, moves: &[(Corner, Corner)]) -> Result<(), ArrangementError> {
        let mut corner_at = self.corner_at;

        // Vacate every origin before filling destinations, so a move onto a
        // slot that is itself being vacated is not mistaken for a collision.
        let mut vacated = [false; 8];
        for &(corner, _) in moves {
            vacated[self.slot_of(corner).index()] = true;
        }

        for &(corner, destination) in moves {
            let current = corner_at[destination.index()];
            if !vacated[destination.index()] && current != corner {
                return Err(Self::collision_error(&corner_at, corner, destination));
            }
            corner_at[destination.index()] = corner;
            vacated[destination.index()] = false;
        }

        *self = Arrangement::from_occupants(corner_at)?;
        Ok(())
    }

    fn collision_error(corner_at: &[Corner; 8], corner: Corner, destination: Corner) -> ArrangementError {
        let mut corner_at = *corner_at;
        corner_at[destination.index()] = corner;
        match Arrangement::from_occupants(corner_at) {
            Err(e) => e,
            Ok(_) => ArrangementError::NotBijective {
                duplicated: vec![corner],
                missing: vec![],
            },
        }
    }

    /// Applies one quarter turn of `face` directly.
    pub fn quarter_turn(&mut self, face: Face) {
        let cycle = face.rotation_cycle();
        let moved = cycle.map(|slot| self.corner_at(slot));

        for (i, corner) in moved.into_iter().enumerate() {
            let destination = cycle[(i + 1) % cycle.len()];
            self.corner_at[destination.index()] = corner;
            self.slot_of[corner.index()] = destination;
        }
    }

    /// The non-trivial cycles of the permutation sending each corner to the
    /// slot it currently occupies.
    pub fn cycles(&self) -> Vec<Vec<Corner>> {
        let mut covered = [false; 8];
        let mut cycles = vec![];

        for start in Corner::ALL {
            if covered[start.index()] {
                continue;
            }

            covered[start.index()] = true;
            let mut cycle = vec![start];
            let mut next = self.slot_of(start);

            while next != start {
                covered[next.index()] = true;
                cycle.push(next);
                next = self.slot_of(next);
            }

            if cycle.len() > 1 {
                cycles.push(cycle);
            }
        }

        cycles
    }
}

impl Default for Arrangement {
    fn default() -> Self {
        Self::identity()
    }
}

impl Display for Arrangement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_identity() {
            return write!(f, "()");
        }

        for cycle in self.cycles() {
            write!(f, "({})", cycle.iter().join(" "))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::topology::Corner::*;

    use super::*;

    #[test]
    fn identity_round_trips_through_occupants() {
        let identity = Arrangement::identity();
        assert_eq!(Arrangement::from_occupants(identity.occupants()), Ok(identity.clone()));
        assert!(identity.cycles().is_empty());
        assert_eq!(identity.to_string(), "()");
    }

    #[test]
    fn rejects_duplicated_occupants() {
        let err = Arrangement::from_occupants([UBL, UBL, UFR, UFL, DFL, DFR, DBR, DBL]).unwrap_err();
        assert_eq!(
            err,
            ArrangementError::NotBijective {
                duplicated: vec![UBL],
                missing: vec![UBR],
            }
        );
    }

    #[test]
    fn inverse_tables_agree() {
        let arrangement = Arrangement::from_moves(&[Face::U, Face::R, Face::F, Face::B]);
        for corner in Corner::ALL {
            assert_eq!(arrangement.corner_at(arrangement.slot_of(corner)), corner);
        }
    }

    #[test]
    fn quarter_turn_is_a_four_cycle() {
        let arrangement = Arrangement::from_moves(&[Face::U]);
        assert_eq!(arrangement.cycles(), vec![vec![UBL, UBR, UFR, UFL]]);
        assert_eq!(arrangement.to_string(), "(UBL UBR UFR UFL)");
    }

    #[test]
    fn apply_moves_swaps_without_collision() {
        let mut arrangement = Arrangement::identity();
        arrangement.apply_moves(&[(UBL, UBR), (UBR, UBL)]).unwrap();
        assert_eq!(arrangement.corner_at(UBL), UBR);
        assert_eq!(arrangement.corner_at(UBR), UBL);
    }

    #[test]
    fn apply_moves_is_all_or_nothing() {
        let mut arrangement = Arrangement::from_moves(&[Face::F]);
        let before = arrangement.clone();

        // UBL is dropped onto DBL, which nobody vacates.
        let err = arrangement.apply_moves(&[(UBL, DBL)]).unwrap_err();
        assert!(matches!(err, ArrangementError::NotBijective { .. }));
        assert_eq!(arrangement, before);
    }
}
