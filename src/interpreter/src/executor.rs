use std::{
    sync::{
        Arc,
        atomic::{AtomicU8, Ordering},
    },
    time::Duration,
};

use animator::{PuzzleHandle, RenderTarget, Ticker};
use hexpr_core::Judge;
use log::{debug, info};

use crate::{command::Control, plan::Step};

/// Something that can have its buttons pressed.
pub trait Controls {
    fn press(&mut self, control: Control);
}

impl<R: RenderTarget, J: Judge> Controls for PuzzleHandle<R, J> {
    fn press(&mut self, control: Control) {
        let mut module = self.lock();
        match control {
            Control::Face(face) => {
                module.press_face(face);
            }
            Control::Submit => {
                module.press_submit();
            }
        }
    }
}

/// Source of suspension between steps.
pub trait Clock {
    fn sleep(&mut self, duration: Duration);
}

/// Sleeps in real time, measuring each wait from the end of the previous one
/// so pacing does not drift.
#[derive(Default)]
pub struct SystemClock {
    ticker: Ticker,
}

impl SystemClock {
    pub fn new() -> SystemClock {
        SystemClock {
            ticker: Ticker::new(),
        }
    }

    /// Forgets earlier waits, so the next one is measured from now.
    pub fn restart(&mut self) {
        self.ticker.restart();
    }
}

impl Clock for SystemClock {
    fn sleep(&mut self, duration: Duration) {
        self.ticker.wait(duration);
    }
}

const IDLE: u8 = 0;
const CANCELLED: u8 = 1;
const CLOSED: u8 = 2;

/// Cooperative cancellation request shared between the command source and a
/// running command.
///
/// A plain request cancels the current command and is cleared by
/// [`CancelFlag::reset`]. [`CancelFlag::close`] is permanent and cancels
/// every command from then on.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicU8>);

impl CancelFlag {
    pub fn new() -> CancelFlag {
        CancelFlag::default()
    }

    pub fn request(&self) {
        let _ = self
            .0
            .compare_exchange(IDLE, CANCELLED, Ordering::SeqCst, Ordering::SeqCst);
    }

    /// Clears a plain request. Has no effect once closed.
    pub fn reset(&self) {
        let _ = self
            .0
            .compare_exchange(CANCELLED, IDLE, Ordering::SeqCst, Ordering::SeqCst);
    }

    pub fn close(&self) {
        self.0.store(CLOSED, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst) != IDLE
    }

    pub fn is_closed(&self) -> bool {
        self.0.load(Ordering::SeqCst) == CLOSED
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed { presses: usize },
    Cancelled { presses: usize },
}

/// Runs `plan` step by step.
///
/// Cancellation is polled at every `CheckCancel` step and again after every
/// wait, so a request takes effect no later than the end of the current wait.
/// A press that was already made is never undone.
pub fn execute(
    plan: &[Step],
    controls: &mut impl Controls,
    clock: &mut impl Clock,
    cancel: &CancelFlag,
) -> Outcome {
    let mut presses = 0;

    if cancel.is_requested() {
        info!(target: "interpreter", "Cancelled before the first step");
        return Outcome::Cancelled { presses };
    }

    for step in plan {
        match *step {
            Step::CheckCancel => {
                if cancel.is_requested() {
                    info!(target: "interpreter", "Cancelled after {presses} presses");
                    return Outcome::Cancelled { presses };
                }
            }
            Step::Press(control) => {
                debug!(target: "interpreter", "Pressing {control}");
                controls.press(control);
                presses += 1;
            }
            Step::Wait(duration) => {
                clock.sleep(duration);
                if cancel.is_requested() {
                    info!(target: "interpreter", "Cancelled after {presses} presses");
                    return Outcome::Cancelled { presses };
                }
            }
        }
    }

    Outcome::Completed { presses }
}

#[cfg(test)]
mod tests {
    use hexpr_core::Face;

    use super::*;
    use crate::{command::Command, plan::Pacing};

    #[derive(Default)]
    struct PressLog(Vec<Control>);

    impl Controls for PressLog {
        fn press(&mut self, control: Control) {
            self.0.push(control);
        }
    }

    /// Records every wait and optionally requests cancellation during the
    /// `cancel_on`th one (1-based).
    struct ScriptedClock {
        waits: Vec<Duration>,
        cancel_on: Option<usize>,
        cancel: CancelFlag,
    }

    impl ScriptedClock {
        fn new(cancel: &CancelFlag, cancel_on: Option<usize>) -> ScriptedClock {
            ScriptedClock {
                waits: vec![],
                cancel_on,
                cancel: cancel.clone(),
            }
        }
    }

    impl Clock for ScriptedClock {
        fn sleep(&mut self, duration: Duration) {
            self.waits.push(duration);
            if self.cancel_on == Some(self.waits.len()) {
                self.cancel.request();
            }
        }
    }

    fn plan(input: &str) -> Vec<Step> {
        Command::parse(input).unwrap().plan(&Pacing::default())
    }

    #[test_log::test]
    fn press_scenario() {
        let cancel = CancelFlag::new();
        let mut controls = PressLog::default();
        let mut clock = ScriptedClock::new(&cancel, None);

        let outcome = execute(&plan("press tm tl"), &mut controls, &mut clock, &cancel);

        assert_eq!(outcome, Outcome::Completed { presses: 2 });
        assert_eq!(
            controls.0,
            vec![Control::Face(Face::U), Control::Face(Face::B)]
        );
        assert_eq!(clock.waits, vec![Duration::from_millis(800); 2]);
    }

    #[test_log::test]
    fn cancel_during_second_cycle_wait() {
        let cancel = CancelFlag::new();
        let mut controls = PressLog::default();
        let mut clock = ScriptedClock::new(&cancel, Some(2));

        let outcome = execute(&plan("cycle u r"), &mut controls, &mut clock, &cancel);

        assert_eq!(outcome, Outcome::Cancelled { presses: 1 });
        assert_eq!(controls.0, vec![Control::Face(Face::U)]);
        assert_eq!(clock.waits.len(), 2);
    }

    #[test_log::test]
    fn cancel_after_second_cycle_press() {
        struct CancellingControls {
            log: PressLog,
            cancel: CancelFlag,
        }

        impl Controls for CancellingControls {
            fn press(&mut self, control: Control) {
                self.log.press(control);
                if self.log.0.len() == 2 {
                    self.cancel.request();
                }
            }
        }

        let cancel = CancelFlag::new();
        let mut controls = CancellingControls {
            log: PressLog::default(),
            cancel: cancel.clone(),
        };
        let mut clock = ScriptedClock::new(&cancel, None);

        let outcome = execute(&plan("cycle tm tr"), &mut controls, &mut clock, &cancel);

        assert_eq!(outcome, Outcome::Cancelled { presses: 2 });
        assert_eq!(controls.log.0, vec![Control::Face(Face::U); 2]);
        assert!(!controls.log.0.contains(&Control::Face(Face::R)));
    }

    #[test_log::test]
    fn full_cycle_waits() {
        let cancel = CancelFlag::new();
        let mut controls = PressLog::default();
        let mut clock = ScriptedClock::new(&cancel, None);

        let outcome = execute(&plan("cycle b"), &mut controls, &mut clock, &cancel);

        assert_eq!(outcome, Outcome::Completed { presses: 4 });
        assert_eq!(
            clock.waits,
            [vec![Duration::from_secs(3); 4], vec![Duration::from_secs(1)]].concat()
        );
    }

    #[test_log::test]
    fn cancel_before_start_presses_nothing() {
        let cancel = CancelFlag::new();
        cancel.request();
        let mut controls = PressLog::default();
        let mut clock = ScriptedClock::new(&cancel, None);

        let outcome = execute(&plan("press u d"), &mut controls, &mut clock, &cancel);
        assert_eq!(outcome, Outcome::Cancelled { presses: 0 });
        assert!(controls.0.is_empty());

        cancel.reset();
        assert!(!cancel.is_requested());
    }

    #[test_log::test]
    fn closing_outlives_reset() {
        let cancel = CancelFlag::new();
        cancel.close();
        cancel.reset();
        cancel.request();
        assert!(cancel.is_closed());
        assert!(cancel.is_requested());

        let mut controls = PressLog::default();
        let mut clock = ScriptedClock::new(&cancel, None);
        let outcome = execute(&plan("cycle u"), &mut controls, &mut clock, &cancel);

        assert_eq!(outcome, Outcome::Cancelled { presses: 0 });
        assert!(controls.0.is_empty());
        assert!(clock.waits.is_empty());
    }
}
