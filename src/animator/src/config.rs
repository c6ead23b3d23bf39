use std::{fs, io, path::Path, time::Duration};

use hexpr_core::{
    Arrangement, InstanceSeed, Letters, LettersError, ParseFaceError, parse_move_seq,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Could not parse the configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid `letters`: {0}")]
    Letters(#[from] LettersError),
    #[error("Invalid `initial_moves`: {0}")]
    Moves(#[from] ParseFaceError),
    #[error("`{field}` must be a positive, finite number of seconds but is {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("`{field}` is too large to be used as a duration: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Global puzzle configuration. Times are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HexpressionsConfig {
    pub turn_duration: f64,
    pub frame_rate: f64,
    pub press_interval: f64,
    pub cycle_interval: f64,
    pub cycle_settle: f64,
    /// Half the edge length of the cube the corners sit on.
    pub half_edge: f32,
    pub letters: String,
    pub seed: String,
    /// Stand-in for the external judge: submitting passes when the top word
    /// matches this. Without it every submission fails.
    pub target_word: Option<String>,
    /// Quarter turns applied to the identity arrangement at startup, e.g.
    /// `"U B R"`.
    pub initial_moves: String,
}

impl Default for HexpressionsConfig {
    fn default() -> Self {
        HexpressionsConfig {
            turn_duration: 0.6,
            frame_rate: 60.0,
            press_interval: 0.8,
            cycle_interval: 3.0,
            cycle_settle: 1.0,
            half_edge: 1.0,
            letters: Letters::default().to_string(),
            seed: String::new(),
            target_word: None,
            initial_moves: String::new(),
        }
    }
}

impl HexpressionsConfig {
    /// Reads and validates the configuration at `path`.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, is not valid TOML for this structure,
    /// or holds out of range values.
    pub fn load(path: &Path) -> Result<HexpressionsConfig, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// # Errors
    ///
    /// See [`HexpressionsConfig::load`].
    pub fn from_toml(text: &str) -> Result<HexpressionsConfig, ConfigError> {
        let config = toml::from_str::<HexpressionsConfig>(text)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Fails on the first field that is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("turn_duration", self.turn_duration),
            ("frame_rate", self.frame_rate),
            ("press_interval", self.press_interval),
            ("cycle_interval", self.cycle_interval),
            ("cycle_settle", self.cycle_settle),
            ("half_edge", f64::from(self.half_edge)),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        for (field, value, secs) in [
            ("turn_duration", self.turn_duration, self.turn_duration),
            ("frame_rate", self.frame_rate, self.frame_rate.recip()),
            ("press_interval", self.press_interval, self.press_interval),
            ("cycle_interval", self.cycle_interval, self.cycle_interval),
            ("cycle_settle", self.cycle_settle, self.cycle_settle),
        ] {
            if Duration::try_from_secs_f64(secs).is_err() {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }

        self.letters()?;
        self.initial_arrangement()?;
        Ok(())
    }

    pub fn turn_duration(&self) -> Duration {
        seconds(self.turn_duration)
    }

    pub fn frame_interval(&self) -> Duration {
        seconds(self.frame_rate.recip())
    }

    pub fn press_interval(&self) -> Duration {
        seconds(self.press_interval)
    }

    pub fn cycle_interval(&self) -> Duration {
        seconds(self.cycle_interval)
    }

    pub fn cycle_settle(&self) -> Duration {
        seconds(self.cycle_settle)
    }

    /// # Errors
    ///
    /// Fails unless `letters` holds exactly eight letters.
    pub fn letters(&self) -> Result<Letters, ConfigError> {
        Ok(self.letters.parse()?)
    }

    pub fn seed(&self) -> InstanceSeed {
        InstanceSeed::new(self.seed.clone())
    }

    /// # Errors
    ///
    /// Fails if `initial_moves` names something other than a face.
    pub fn initial_arrangement(&self) -> Result<Arrangement, ConfigError> {
        Ok(Arrangement::from_moves(&parse_move_seq(&self.initial_moves)?))
    }
}

/// Exact for every value [`HexpressionsConfig::validate`] accepts. Anything
/// else saturates instead of panicking.
fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(if value > 0.0 {
        Duration::MAX
    } else {
        Duration::ZERO
    })
}

#[cfg(test)]
mod tests {
    use hexpr_core::{Corner, Face};

    use super::*;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(
            HexpressionsConfig::from_toml("").unwrap(),
            HexpressionsConfig::default()
        );
        let turn_duration = HexpressionsConfig::default().turn_duration();
        assert!((turn_duration.as_secs_f64() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn partial_file_overrides_fields() {
        let config = HexpressionsConfig::from_toml(
            r#"
                letters = "QWERTYUI"
                initial_moves = "U R"
                press_interval = 0.25
            "#,
        )
        .unwrap();

        assert_eq!(config.press_interval(), Duration::from_millis(250));
        assert_eq!(config.letters().unwrap().of(Corner::UBL), 'Q');
        assert_eq!(
            config.initial_arrangement().unwrap(),
            Arrangement::from_moves(&[Face::U, Face::R])
        );
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            HexpressionsConfig::from_toml("turn_duration = 0.0"),
            Err(ConfigError::NotPositive {
                field: "turn_duration",
                ..
            })
        ));
        assert!(matches!(
            HexpressionsConfig::from_toml("letters = \"AB\""),
            Err(ConfigError::Letters(_))
        ));
        assert!(matches!(
            HexpressionsConfig::from_toml("initial_moves = \"U X\""),
            Err(ConfigError::Moves(_))
        ));
        assert!(matches!(
            HexpressionsConfig::from_toml("speed = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn rejects_durations_that_do_not_fit() {
        assert!(matches!(
            HexpressionsConfig::from_toml("press_interval = 1e20"),
            Err(ConfigError::OutOfRange {
                field: "press_interval",
                ..
            })
        ));
        assert!(matches!(
            HexpressionsConfig::from_toml("frame_rate = 1e-300"),
            Err(ConfigError::OutOfRange {
                field: "frame_rate",
                ..
            })
        ));
    }

    #[test]
    fn unvalidated_values_saturate() {
        let config = HexpressionsConfig {
            press_interval: 1e20,
            frame_rate: 1e-300,
            cycle_settle: f64::NAN,
            ..HexpressionsConfig::default()
        };

        assert_eq!(config.press_interval(), Duration::MAX);
        assert_eq!(config.frame_interval(), Duration::MAX);
        assert_eq!(config.cycle_settle(), Duration::ZERO);
    }
}
