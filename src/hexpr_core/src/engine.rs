//! The two-phase turn protocol.
//!
//! A turn is first *begun*, which reserves the engine and records where each
//! of the four moving corners starts and ends, and later *committed*, which
//! folds that record into the arrangement. Between the two the arrangement
//! still reports the state from before the turn, however far the visible
//! rotation has progressed.

use log::{debug, error, info};
use thiserror::Error;

use crate::{
    arrangement::{Arrangement, ArrangementError},
    letters::Letters,
    topology::{Corner, Face},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitError {
    #[error("Tried to commit a turn while none is in flight")]
    NoTurnInFlight,
    #[error("Turn of {face} expected {corner} in slot {expected} but it is in {found}")]
    StaleSnapshot {
        face: Face,
        corner: Corner,
        expected: Corner,
        found: Corner,
    },
    #[error("Turn of {face} would corrupt the arrangement: {source}")]
    NotBijective {
        face: Face,
        #[source]
        source: ArrangementError,
    },
}

/// One corner's part in a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnStep {
    pub corner: Corner,
    pub origin: Corner,
    pub destination: Corner,
}

/// A quarter turn that has been admitted but not yet applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    face: Face,
    steps: [TurnStep; 4],
}

impl Turn {
    fn capture(face: Face, arrangement: &Arrangement) -> Turn {
        let cycle = face.rotation_cycle();
        let steps = std::array::from_fn(|i| TurnStep {
            corner: arrangement.corner_at(cycle[i]),
            origin: cycle[i],
            destination: cycle[(i + 1) % cycle.len()],
        });

        Turn { face, steps }
    }

    pub fn face(&self) -> Face {
        self.face
    }

    pub fn steps(&self) -> &[TurnStep; 4] {
        &self.steps
    }
}

/// Holds the arrangement and admits at most one turn at a time.
#[derive(Debug, Clone)]
pub struct PermutationEngine {
    arrangement: Arrangement,
    letters: Letters,
    active: Option<Turn>,
}

impl PermutationEngine {
    pub fn new(letters: Letters) -> PermutationEngine {
        PermutationEngine::with_arrangement(Arrangement::identity(), letters)
    }

    pub fn with_arrangement(arrangement: Arrangement, letters: Letters) -> PermutationEngine {
        PermutationEngine {
            arrangement,
            letters,
            active: None,
        }
    }

    /// Reserves the engine for a quarter turn of `face`.
    ///
    /// Returns `false` and changes nothing if another turn is still in flight.
    pub fn begin_turn(&mut self, face: Face) -> bool {
        if let Some(active) = &self.active {
            debug!(
                target: "engine",
                "Refused turn: requested={face} in_flight={}", active.face
            );
            return false;
        }

        let turn = Turn::capture(face, &self.arrangement);
        debug!(target: "engine", "Began turn: face={face} steps={:?}", turn.steps);
        self.active = Some(turn);
        true
    }

    /// Applies the turn in flight and releases the engine.
    ///
    /// The turn is discarded even when it cannot be applied, in which case the
    /// arrangement is left untouched.
    ///
    /// # Errors
    ///
    /// Fails if there is no turn in flight, or if the recorded turn no longer
    /// describes a permutation of the current arrangement. Both indicate a bug
    /// in the caller and are logged at error level.
    pub fn commit_turn(&mut self) -> Result<Face, CommitError> {
        let Some(turn) = self.active.take() else {
            error!(target: "engine", "Commit without a turn in flight");
            return Err(CommitError::NoTurnInFlight);
        };

        for step in &turn.steps {
            let found = self.arrangement.slot_of(step.corner);
            if found != step.origin {
                let err = CommitError::StaleSnapshot {
                    face: turn.face,
                    corner: step.corner,
                    expected: step.origin,
                    found,
                };
                error!(target: "engine", "{err}");
                return Err(err);
            }
        }

        let moves = turn.steps.map(|step| (step.corner, step.destination));
        if let Err(source) = self.arrangement.apply_moves(&moves) {
            let err = CommitError::NotBijective {
                face: turn.face,
                source,
            };
            error!(target: "engine", "{err}");
            return Err(err);
        }

        info!(
            target: "engine",
            "Committed turn: face={} arrangement={}", turn.face, self.arrangement
        );
        Ok(turn.face)
    }

    pub fn is_turn_in_flight(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_turn(&self) -> Option<&Turn> {
        self.active.as_ref()
    }

    pub fn corner_at_slot(&self, slot: Corner) -> Corner {
        self.arrangement.corner_at(slot)
    }

    pub fn slot_of_corner(&self, corner: Corner) -> Corner {
        self.arrangement.slot_of(corner)
    }

    pub fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    pub fn letters(&self) -> &Letters {
        &self.letters
    }

    /// Reads the letters of the corners in `face`'s slots, in reading order.
    ///
    /// This reflects the last committed state; callers should not show it
    /// while a turn is in flight.
    pub fn top_word(&self, face: Face) -> String {
        face.reading_order()
            .into_iter()
            .map(|slot| self.letters.of(self.arrangement.corner_at(slot)))
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn active_turn_mut(&mut self) -> Option<&mut Turn> {
        self.active.as_mut()
    }
}
