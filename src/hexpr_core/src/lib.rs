//! Core state of a Regular Hexpressions puzzle: the fixed corner/face topology,
//! the arrangement of corners, and the engine that admits and commits turns.

pub mod arrangement;
pub mod engine;
pub mod judge;
pub mod letters;
pub mod topology;

pub use arrangement::{Arrangement, ArrangementError};
pub use engine::{CommitError, PermutationEngine, Turn, TurnStep};
pub use judge::{Judge, TargetWordJudge, Verdict};
pub use letters::{InstanceSeed, Letters, LettersError};
pub use topology::{Corner, Face, ParseFaceError, parse_move_seq};

/// Identifier of one puzzle instance, assigned by whatever creates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleId(pub u32);

impl ModuleId {
    /// Prefix for log lines about this instance.
    pub fn log_prefix(self) -> String {
        format!("[Regular Hexpressions #{}]", self.0)
    }
}
