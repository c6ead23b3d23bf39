use std::{fmt::Display, time::Duration};

use animator::HexpressionsConfig;

use crate::command::{Command, Control};

/// How long the interpreter pauses between presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// After each press of a `press` command.
    pub press_interval: Duration,
    /// Before each press of a `cycle` command.
    pub cycle_interval: Duration,
    /// After a face has been cycled all the way around.
    pub cycle_settle: Duration,
    /// Quarter turns per cycled face.
    pub cycle_repeats: usize,
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing {
            press_interval: Duration::from_millis(800),
            cycle_interval: Duration::from_secs(3),
            cycle_settle: Duration::from_secs(1),
            cycle_repeats: 4,
        }
    }
}

impl From<&HexpressionsConfig> for Pacing {
    fn from(config: &HexpressionsConfig) -> Self {
        Pacing {
            press_interval: config.press_interval(),
            cycle_interval: config.cycle_interval(),
            cycle_settle: config.cycle_settle(),
            ..Pacing::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Stop here if cancellation has been requested.
    CheckCancel,
    Press(Control),
    /// Suspend without blocking anything else.
    Wait(Duration),
}

impl Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::CheckCancel => write!(f, "check cancel"),
            Step::Press(control) => write!(f, "press {control}"),
            Step::Wait(duration) => write!(f, "wait {:.1}s", duration.as_secs_f64()),
        }
    }
}

impl Command {
    /// Expands the command into the exact sequence of presses, waits and
    /// cancellation points it runs as.
    pub fn plan(&self, pacing: &Pacing) -> Vec<Step> {
        match self {
            Command::Submit => vec![Step::Press(Control::Submit)],
            Command::Press(faces) => faces
                .iter()
                .flat_map(|&face| {
                    [
                        Step::CheckCancel,
                        Step::Press(Control::Face(face)),
                        Step::Wait(pacing.press_interval),
                    ]
                })
                .collect(),
            Command::Cycle(faces) => {
                let mut steps = vec![];
                for &face in faces {
                    for _ in 0..pacing.cycle_repeats {
                        steps.extend([
                            Step::Wait(pacing.cycle_interval),
                            Step::Press(Control::Face(face)),
                            Step::CheckCancel,
                        ]);
                    }
                    steps.extend([Step::Wait(pacing.cycle_settle), Step::CheckCancel]);
                }
                steps
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use hexpr_core::Face;

    use super::*;

    fn presses(plan: &[Step]) -> Vec<Control> {
        plan.iter()
            .filter_map(|step| match step {
                Step::Press(control) => Some(*control),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn press_plan_paces_every_press() {
        let plan = Command::parse("press tm tl").unwrap().plan(&Pacing::default());
        let wait = Step::Wait(Duration::from_millis(800));

        assert_eq!(
            plan,
            vec![
                Step::CheckCancel,
                Step::Press(Control::Face(Face::U)),
                wait,
                Step::CheckCancel,
                Step::Press(Control::Face(Face::B)),
                wait,
            ]
        );
    }

    #[test]
    fn cycle_plan_turns_each_face_four_times() {
        let pacing = Pacing::default();
        let plan = Command::parse("cycle u r").unwrap().plan(&pacing);

        assert_eq!(
            presses(&plan),
            [[Control::Face(Face::U); 4], [Control::Face(Face::R); 4]].concat()
        );

        let per_face = 3 * 4 + 2;
        assert_eq!(plan.len(), 2 * per_face);
        assert_eq!(
            &plan[..3],
            &[
                Step::Wait(Duration::from_secs(3)),
                Step::Press(Control::Face(Face::U)),
                Step::CheckCancel,
            ]
        );
        assert_eq!(
            &plan[per_face - 2..per_face],
            &[Step::Wait(Duration::from_secs(1)), Step::CheckCancel]
        );
    }

    #[test]
    fn submit_plan_has_no_delay() {
        assert_eq!(
            Command::Submit.plan(&Pacing::default()),
            vec![Step::Press(Control::Submit)]
        );
    }

    #[test]
    fn pacing_follows_config() {
        let config = HexpressionsConfig {
            press_interval: 0.5,
            cycle_interval: 2.0,
            ..HexpressionsConfig::default()
        };
        let pacing = Pacing::from(&config);
        assert_eq!(pacing.press_interval, Duration::from_millis(500));
        assert_eq!(pacing.cycle_interval, Duration::from_secs(2));
        assert_eq!(pacing.cycle_settle, Duration::from_secs(1));
        assert_eq!(pacing.cycle_repeats, 4);
    }
}
