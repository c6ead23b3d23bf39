use crate::{arrangement::Arrangement, letters::InstanceSeed};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

/// Decides whether a submitted state is correct.
///
/// Only ever consulted while no turn is in flight.
pub trait Judge {
    fn judge(&self, word: &str, arrangement: &Arrangement, seed: &InstanceSeed) -> Verdict;
}

impl<F: Fn(&str, &Arrangement, &InstanceSeed) -> Verdict> Judge for F {
    fn judge(&self, word: &str, arrangement: &Arrangement, seed: &InstanceSeed) -> Verdict {
        self(word, arrangement, seed)
    }
}

/// Passes exactly when the top word equals a fixed target, ignoring case.
#[derive(Debug, Clone)]
pub struct TargetWordJudge {
    target: String,
}

impl TargetWordJudge {
    pub fn new(target: impl Into<String>) -> TargetWordJudge {
        TargetWordJudge {
            target: target.into(),
        }
    }
}

impl Judge for TargetWordJudge {
    fn judge(&self, word: &str, _: &Arrangement, _: &InstanceSeed) -> Verdict {
        if word.eq_ignore_ascii_case(&self.target) {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}
