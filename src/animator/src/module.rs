use std::{sync::Arc, time::Duration};

use crossbeam_channel::{Receiver, TryRecvError};
use hexpr_core::{Face, InstanceSeed, Judge, ModuleId, PermutationEngine, Verdict};
use log::{debug, info, warn};
use parking_lot::Mutex;

use crate::{
    Ticker,
    config::{ConfigError, HexpressionsConfig},
    coordinator::{Display, RenderTarget, SlotPositions, TickOutcome, TurnCoordinator},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A turn was in flight, so nothing was judged.
    Refused,
    Judged(Verdict),
}

/// One puzzle instance: the engine, the animation that commits into it, and
/// the external collaborators it reports to.
pub struct PuzzleModule<R: RenderTarget, J: Judge> {
    id: ModuleId,
    engine: PermutationEngine,
    coordinator: TurnCoordinator,
    seed: InstanceSeed,
    judge: J,
    target: R,
    strikes: u32,
    solved: bool,
}

/// Shared access to a module for the animation thread and any press sources.
pub type PuzzleHandle<R, J> = Arc<Mutex<PuzzleModule<R, J>>>;

impl<R: RenderTarget, J: Judge> PuzzleModule<R, J> {
    pub fn new(
        id: ModuleId,
        engine: PermutationEngine,
        coordinator: TurnCoordinator,
        seed: InstanceSeed,
        judge: J,
        target: R,
    ) -> PuzzleModule<R, J> {
        let mut module = PuzzleModule {
            id,
            engine,
            coordinator,
            seed,
            judge,
            target,
            strikes: 0,
            solved: false,
        };

        info!(
            target: "module",
            "{} Initial arrangement: {} word={}",
            id.log_prefix(),
            module.engine.arrangement(),
            module.engine.top_word(Face::TOP),
        );
        module.coordinator.place_all(&module.engine, &mut module.target);
        module.render();
        module
    }

    /// # Errors
    ///
    /// Fails if the letters or initial moves in `config` are invalid.
    pub fn from_config(
        id: ModuleId,
        config: &HexpressionsConfig,
        judge: J,
        target: R,
    ) -> Result<PuzzleModule<R, J>, ConfigError> {
        let engine =
            PermutationEngine::with_arrangement(config.initial_arrangement()?, config.letters()?);
        let coordinator =
            TurnCoordinator::new(SlotPositions::cube(config.half_edge), config.turn_duration());
        Ok(PuzzleModule::new(
            id,
            engine,
            coordinator,
            config.seed(),
            judge,
            target,
        ))
    }

    pub fn into_handle(self) -> PuzzleHandle<R, J> {
        Arc::new(Mutex::new(self))
    }

    pub fn id(&self) -> ModuleId {
        self.id
    }

    pub fn engine(&self) -> &PermutationEngine {
        &self.engine
    }

    pub fn target(&self) -> &R {
        &self.target
    }

    pub fn strikes(&self) -> u32 {
        self.strikes
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Starts a quarter turn of `face`. Ignored while another turn is in flight.
    pub fn press_face(&mut self, face: Face) -> bool {
        if !self.coordinator.start(&mut self.engine, face) {
            debug!(target: "module", "{} Ignored press of {face}", self.id.log_prefix());
            return false;
        }

        info!(target: "module", "{} Turning {face}", self.id.log_prefix());
        self.render();
        true
    }

    /// Hands the current top word to the judge, unless a turn is in flight.
    pub fn press_submit(&mut self) -> SubmitOutcome {
        if self.engine.is_turn_in_flight() {
            debug!(target: "module", "{} Ignored submit during a turn", self.id.log_prefix());
            return SubmitOutcome::Refused;
        }

        let word = self.engine.top_word(Face::TOP);
        let verdict = self
            .judge
            .judge(&word, self.engine.arrangement(), &self.seed);

        match verdict {
            Verdict::Pass => {
                info!(target: "module", "{} Submitted {word}: pass", self.id.log_prefix());
                self.solved = true;
            }
            Verdict::Fail => {
                self.strikes += 1;
                warn!(
                    target: "module",
                    "{} Submitted {word}: strike (strikes={})",
                    self.id.log_prefix(),
                    self.strikes,
                );
            }
        }

        self.render();
        SubmitOutcome::Judged(verdict)
    }

    /// Advances the turn in flight, if any, by `dt`.
    pub fn tick(&mut self, dt: Duration) -> TickOutcome {
        let outcome = self
            .coordinator
            .tick(&mut self.engine, dt, &mut self.target);

        if let TickOutcome::Committed(_) | TickOutcome::Faulted(_) = outcome {
            self.render();
        }

        outcome
    }

    /// The word display, hiding the top word while a turn is in flight.
    pub fn display(&self) -> Display {
        if self.engine.is_turn_in_flight() {
            Display::SeedLabel(self.seed.label().to_owned())
        } else {
            Display::TopWord(self.engine.top_word(Face::TOP))
        }
    }

    pub fn render(&mut self) {
        let display = self.display();
        self.target.show(&display);
    }
}

/// Ticks `handle` every `frame` until `shutdown` fires or disconnects.
pub fn run_animation_loop<R: RenderTarget, J: Judge>(
    handle: &PuzzleHandle<R, J>,
    frame: Duration,
    shutdown: &Receiver<()>,
) {
    let mut ticker = Ticker::new();

    loop {
        match shutdown.try_recv() {
            Err(TryRecvError::Empty) => {}
            Ok(()) | Err(TryRecvError::Disconnected) => break,
        }

        ticker.wait(frame);
        handle.lock().tick(frame);
    }

    debug!(target: "module", "Animation loop stopped");
}
