//! Turns an admitted [`Turn`] into a visible, bounded-duration transition and
//! commits it exactly once when the transition ends.

use std::time::Duration;

use cgmath::{Vector3, VectorSpace};
use hexpr_core::{CommitError, Corner, Face, PermutationEngine, Turn};
use log::{debug, error};

/// A point in model space.
pub type Position = Vector3<f32>;

/// Where each physical slot sits in model space.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotPositions([Position; 8]);

impl SlotPositions {
    /// The vertices of an axis-aligned cube centred on the origin. `+x` is R,
    /// `+y` is U and `+z` is F.
    pub fn cube(half_edge: f32) -> SlotPositions {
        SlotPositions(Corner::ALL.map(|slot| {
            let faces = slot.faces();
            let axis = |positive: Face| {
                if faces.contains(&positive) {
                    half_edge
                } else {
                    -half_edge
                }
            };
            Vector3::new(axis(Face::R), axis(Face::U), axis(Face::F))
        }))
    }

    pub fn of(&self, slot: Corner) -> Position {
        self.0[slot.index()]
    }
}

impl Default for SlotPositions {
    fn default() -> Self {
        SlotPositions::cube(1.0)
    }
}

/// What the word display should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Display {
    /// The top word, shown only while no turn is in flight.
    TopWord(String),
    /// The instance's coordinate label, standing in for the hidden word while
    /// a turn is in flight.
    SeedLabel(String),
}

/// Receives everything the presentation layer needs to draw the puzzle.
pub trait RenderTarget {
    fn place_corner(&mut self, corner: Corner, position: Position);

    fn show(&mut self, display: &Display);
}

#[derive(Debug, Clone, Copy)]
struct Mover {
    corner: Corner,
    start: Position,
    end: Position,
}

/// Linear interpolation of the four moving corners of one turn.
#[derive(Debug, Clone)]
pub struct TurnAnimation {
    face: Face,
    movers: [Mover; 4],
    elapsed: Duration,
    duration: Duration,
}

impl TurnAnimation {
    pub fn new(turn: &Turn, positions: &SlotPositions, duration: Duration) -> TurnAnimation {
        TurnAnimation {
            face: turn.face(),
            movers: turn.steps().map(|step| Mover {
                corner: step.corner,
                start: positions.of(step.origin),
                end: positions.of(step.destination),
            }),
            elapsed: Duration::ZERO,
            duration,
        }
    }

    pub fn face(&self) -> Face {
        self.face
    }

    /// Fraction of the turn completed, clamped to `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Moves time forward and returns the interpolated corner positions.
    pub fn advance(&mut self, dt: Duration) -> [(Corner, Position); 4] {
        self.elapsed = self.elapsed.saturating_add(dt);
        let t = self.progress();
        self.movers
            .map(|mover| (mover.corner, mover.start.lerp(mover.end, t)))
    }

    /// The exact destination of every moving corner.
    pub fn final_positions(&self) -> [(Corner, Position); 4] {
        self.movers.map(|mover| (mover.corner, mover.end))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// No turn is in flight.
    Idle,
    Animating { face: Face, progress: f32 },
    /// The turn finished and is now part of the arrangement.
    Committed(Face),
    /// The turn finished but the engine refused to apply it.
    Faulted(CommitError),
}

/// Drives at most one [`TurnAnimation`] and owns the moment of commit.
#[derive(Debug, Clone)]
pub struct TurnCoordinator {
    positions: SlotPositions,
    duration: Duration,
    animation: Option<TurnAnimation>,
}

impl TurnCoordinator {
    pub fn new(positions: SlotPositions, duration: Duration) -> TurnCoordinator {
        TurnCoordinator {
            positions,
            duration,
            animation: None,
        }
    }

    pub fn positions(&self) -> &SlotPositions {
        &self.positions
    }

    pub fn animation(&self) -> Option<&TurnAnimation> {
        self.animation.as_ref()
    }

    /// Asks the engine for a turn of `face` and starts animating it if the
    /// engine agrees.
    pub fn start(&mut self, engine: &mut PermutationEngine, face: Face) -> bool {
        if !engine.begin_turn(face) {
            return false;
        }

        let Some(turn) = engine.active_turn() else {
            return false;
        };

        debug!(target: "turn", "Animating turn: face={face} duration={:?}", self.duration);
        self.animation = Some(TurnAnimation::new(turn, &self.positions, self.duration));
        true
    }

    /// Advances the animation in flight by `dt`.
    ///
    /// While the turn is running this only publishes positions. On the tick
    /// that reaches the full duration every moving corner is snapped to its
    /// destination and the engine is asked to commit, exactly once.
    pub fn tick(
        &mut self,
        engine: &mut PermutationEngine,
        dt: Duration,
        target: &mut impl RenderTarget,
    ) -> TickOutcome {
        let Some(animation) = &mut self.animation else {
            return TickOutcome::Idle;
        };

        let positions = animation.advance(dt);
        if !animation.is_finished() {
            for (corner, position) in positions {
                target.place_corner(corner, position);
            }
            return TickOutcome::Animating {
                face: animation.face(),
                progress: animation.progress(),
            };
        }

        for (corner, position) in animation.final_positions() {
            target.place_corner(corner, position);
        }
        self.animation = None;

        match engine.commit_turn() {
            Ok(face) => TickOutcome::Committed(face),
            Err(err) => {
                error!(target: "turn", "Turn animation ended without a commit: {err}");
                TickOutcome::Faulted(err)
            }
        }
    }

    /// Places every corner at rest in the slot the engine says it occupies.
    pub fn place_all(&self, engine: &PermutationEngine, target: &mut impl RenderTarget) {
        for corner in Corner::ALL {
            target.place_corner(corner, self.positions.of(engine.slot_of_corner(corner)));
        }
    }
}
