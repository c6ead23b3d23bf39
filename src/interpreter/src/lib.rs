//! Turns text commands into paced, cancellable sequences of button presses.

pub mod command;
pub mod executor;
pub mod plan;

pub use command::{CHAT_ERROR_PREFIX, CYCLABLE_FACES, Command, CommandError, Control};
pub use executor::{CancelFlag, Clock, Controls, Outcome, SystemClock, execute};
pub use plan::{Pacing, Step};

use log::info;

pub const HELP: &str = "Use `press U D F B L R TM BM BL BR TL TR` to press the button(s) for \
    that face of the hexahedron, or the button's position. Use `cycle U B R TM TL TR` to turn \
    the corresponding face(s) all the way around; only U, B and R can be cycled. Submit your \
    answer with `submit`.";

/// Parses, plans and runs commands against one set of controls.
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    pacing: Pacing,
    cancel: CancelFlag,
}

impl Interpreter {
    pub fn new(pacing: Pacing) -> Interpreter {
        Interpreter {
            pacing,
            cancel: CancelFlag::new(),
        }
    }

    pub fn pacing(&self) -> &Pacing {
        &self.pacing
    }

    /// The flag that cancels the command currently running. Clones share it.
    pub fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }

    /// Runs one command line to completion or cancellation.
    ///
    /// A cancellation requested before this call does not carry over, unless
    /// the flag has been closed.
    ///
    /// # Errors
    ///
    /// Returns the parse error without pressing anything if the line is not a
    /// valid command.
    pub fn run(
        &self,
        input: &str,
        controls: &mut impl Controls,
        clock: &mut impl Clock,
    ) -> Result<Outcome, CommandError> {
        let command = Command::parse(input)?;
        let plan = command.plan(&self.pacing);
        info!(target: "interpreter", "Running `{command}` in {} steps", plan.len());

        self.cancel.reset();
        Ok(execute(&plan, controls, clock, &self.cancel))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use animator::{
        Display, Position, PuzzleHandle, PuzzleModule, RenderTarget, SlotPositions,
        TurnCoordinator,
    };
    use hexpr_core::{
        Arrangement, Corner, Face, InstanceSeed, Letters, ModuleId, PermutationEngine,
        TargetWordJudge,
    };

    use super::*;

    struct NullTarget;

    impl RenderTarget for NullTarget {
        fn place_corner(&mut self, _: Corner, _: Position) {}

        fn show(&mut self, _: &Display) {}
    }

    type Handle = PuzzleHandle<NullTarget, TargetWordJudge>;

    fn handle() -> Handle {
        PuzzleModule::new(
            ModuleId(3),
            PermutationEngine::new(Letters::default()),
            TurnCoordinator::new(SlotPositions::default(), Duration::from_millis(600)),
            InstanceSeed::new("B2"),
            TargetWordJudge::new("CDAB"),
            NullTarget,
        )
        .into_handle()
    }

    /// Lets the animation run for as long as each wait lasts.
    struct AnimatingClock(Handle);

    impl Clock for AnimatingClock {
        fn sleep(&mut self, duration: Duration) {
            self.0.lock().tick(duration);
        }
    }

    /// Never advances the animation.
    struct FrozenClock;

    impl Clock for FrozenClock {
        fn sleep(&mut self, _: Duration) {}
    }

    #[test_log::test]
    fn paced_presses_all_land() {
        let mut puzzle = handle();
        let mut clock = AnimatingClock(puzzle.clone());

        let outcome = Interpreter::default().run("press tm tr u", &mut puzzle, &mut clock);

        assert_eq!(outcome, Ok(Outcome::Completed { presses: 3 }));
        assert_eq!(
            puzzle.lock().engine().arrangement(),
            &Arrangement::from_moves(&[Face::U, Face::R, Face::U])
        );
    }

    #[test_log::test]
    fn presses_during_a_turn_are_ignored() {
        let mut puzzle = handle();

        let outcome = Interpreter::default().run("press u u", &mut puzzle, &mut FrozenClock);
        assert_eq!(outcome, Ok(Outcome::Completed { presses: 2 }));

        let mut module = puzzle.lock();
        assert!(module.engine().is_turn_in_flight());
        module.tick(Duration::from_secs(1));
        assert_eq!(module.engine().arrangement(), &Arrangement::from_moves(&[Face::U]));
    }

    #[test_log::test]
    fn cycle_returns_face_to_start_then_submits() {
        let mut puzzle = handle();
        let mut clock = AnimatingClock(puzzle.clone());
        let interpreter = Interpreter::default();

        assert_eq!(
            interpreter.run("cycle tl", &mut puzzle, &mut clock),
            Ok(Outcome::Completed { presses: 4 })
        );
        assert!(puzzle.lock().engine().arrangement().is_identity());

        interpreter.run("press u", &mut puzzle, &mut clock).unwrap();
        interpreter.run("submit", &mut puzzle, &mut clock).unwrap();
        assert!(puzzle.lock().is_solved());
    }

    #[test_log::test]
    fn syntax_errors_leave_the_puzzle_alone() {
        let mut puzzle = handle();

        let err = Interpreter::default()
            .run("cycle d", &mut puzzle, &mut FrozenClock)
            .unwrap_err();

        assert_eq!(err, CommandError::CannotCycle("d".to_owned()));
        assert!(!puzzle.lock().engine().is_turn_in_flight());
        assert!(puzzle.lock().engine().arrangement().is_identity());
    }

    #[test_log::test]
    fn stale_cancellation_does_not_carry_over() {
        let mut puzzle = handle();
        let interpreter = Interpreter::default();
        interpreter.cancel_flag().request();

        let outcome = interpreter.run("press f", &mut puzzle, &mut FrozenClock);
        assert_eq!(outcome, Ok(Outcome::Completed { presses: 1 }));
    }

    #[test_log::test]
    fn closed_interpreter_runs_nothing() {
        let mut puzzle = handle();
        let interpreter = Interpreter::default();
        interpreter.clone().cancel_flag().close();

        let outcome = interpreter.run("cycle tm", &mut puzzle, &mut FrozenClock);
        assert_eq!(outcome, Ok(Outcome::Cancelled { presses: 0 }));
        assert!(!puzzle.lock().engine().is_turn_in_flight());
    }
}
