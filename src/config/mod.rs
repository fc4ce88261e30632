//! Controller configuration.
//!
//! Configuration is read from an optional JSON file and validated with
//! Stillwater's `Validation`, so every problem is reported in one pass
//! instead of one at a time.
//!
//! # Example
//!
//! ```rust
//! use signalbox::config::ControllerConfig;
//! use std::time::Duration;
//!
//! let settings = ControllerConfig::from_json(r#"{ "timings": { "green_secs": 8.0 } }"#)
//!     .unwrap()
//!     .validated()
//!     .unwrap();
//!
//! assert_eq!(settings.timings.green, Duration::from_secs(8));
//! assert_eq!(settings.timings.yellow, Duration::from_secs(3));
//! ```

mod error;

pub use error::{ConfigError, ConfigIssue};

use crate::core::{Axis, Color, Direction, Phase, PhaseTimings, DEFAULT_HISTORY_CAPACITY};
use crate::driver::PinMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Checked = Validation<(), NonEmptyVec<ConfigIssue>>;

/// Hold durations in seconds. Fractions are allowed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub green_secs: f64,
    pub yellow_secs: f64,
    pub red_secs: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            green_secs: 5.0,
            yellow_secs: 3.0,
            red_secs: 1.75,
        }
    }
}

/// Raw controller configuration as read from disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub timings: TimingConfig,
    /// Window within which repeated detector triggers on one axis collapse to one event
    pub debounce_secs: f64,
    /// How long an axis indicator stays lit after an arrival
    pub indicator_pulse_secs: f64,
    pub history_capacity: usize,
    /// Capacity of the arrival event channel
    pub event_queue_depth: usize,
    /// Phase to start in. Defaults to east/west green.
    pub initial_phase: Option<Phase>,
    pub pins: PinMap,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            timings: TimingConfig::default(),
            debounce_secs: 1.0,
            indicator_pulse_secs: 1.0,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            event_queue_depth: 16,
            initial_phase: None,
            pins: PinMap::default(),
        }
    }
}

/// Validated configuration with durations resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct ControllerSettings {
    pub timings: PhaseTimings,
    pub debounce: Duration,
    pub indicator_pulse: Duration,
    pub history_capacity: usize,
    pub event_queue_depth: usize,
    pub initial_phase: Phase,
    pub pins: PinMap,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        let config = ControllerConfig::default();
        Self {
            timings: PhaseTimings::REFERENCE,
            debounce: Duration::from_secs(1),
            indicator_pulse: Duration::from_secs(1),
            history_capacity: config.history_capacity,
            event_queue_depth: config.event_queue_depth,
            initial_phase: Phase::default(),
            pins: config.pins,
        }
    }
}

impl ControllerConfig {
    /// Read and parse a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Check every rule, accumulating ALL issues.
    pub fn validate(&self) -> Checked {
        let mut checks: Vec<Checked> = vec![
            positive_secs("timings.green_secs", self.timings.green_secs),
            positive_secs("timings.yellow_secs", self.timings.yellow_secs),
            positive_secs("timings.red_secs", self.timings.red_secs),
            positive_secs("debounce_secs", self.debounce_secs),
            positive_secs("indicator_pulse_secs", self.indicator_pulse_secs),
            at_least_one("history_capacity", self.history_capacity),
            at_least_one("event_queue_depth", self.event_queue_depth),
        ];
        checks.extend(check_pins(&self.pins));

        Validation::all_vec(checks).map(|_| ())
    }

    /// Validate and resolve into [`ControllerSettings`].
    pub fn validated(self) -> Result<ControllerSettings, ConfigError> {
        if let Validation::Failure(issues) = self.validate() {
            return Err(ConfigError::Invalid {
                issues: issues.iter().cloned().collect(),
            });
        }

        Ok(ControllerSettings {
            timings: PhaseTimings {
                green: Duration::from_secs_f64(self.timings.green_secs),
                yellow: Duration::from_secs_f64(self.timings.yellow_secs),
                red: Duration::from_secs_f64(self.timings.red_secs),
            },
            debounce: Duration::from_secs_f64(self.debounce_secs),
            indicator_pulse: Duration::from_secs_f64(self.indicator_pulse_secs),
            history_capacity: self.history_capacity,
            event_queue_depth: self.event_queue_depth,
            initial_phase: self.initial_phase.unwrap_or_default(),
            pins: self.pins,
        })
    }
}

fn positive_secs(field: &'static str, value: f64) -> Checked {
    // Also bounds the value so Duration::from_secs_f64 cannot overflow.
    if value.is_finite() && value > 0.0 && value < u32::MAX as f64 {
        Validation::success(())
    } else {
        Validation::fail(ConfigIssue::InvalidDuration { field, value })
    }
}

fn at_least_one(field: &'static str, value: usize) -> Checked {
    if value >= 1 {
        Validation::success(())
    } else {
        Validation::fail(ConfigIssue::ZeroCapacity { field })
    }
}

fn check_pins(pins: &PinMap) -> Vec<Checked> {
    let mut checks = Vec::new();

    for direction in Direction::ALL {
        for color in Color::ALL {
            if pins.light_pin(direction, color).is_none() {
                checks.push(Validation::fail(ConfigIssue::UnmappedOutput {
                    target: format!("{direction}_{color}"),
                }));
            }
        }
    }

    for axis in Axis::ALL {
        if pins.indicator_pin(axis).is_none() {
            checks.push(Validation::fail(ConfigIssue::UnmappedOutput {
                target: format!("{axis}_indicator"),
            }));
        }
    }

    let mut uses: BTreeMap<u8, usize> = BTreeMap::new();
    for pin in pins.output_pins() {
        *uses.entry(pin).or_default() += 1;
    }
    for (pin, count) in uses {
        if count > 1 {
            checks.push(Validation::fail(ConfigIssue::DuplicateOutput { pin, uses: count }));
        }
    }

    checks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = ControllerConfig::default().validated().unwrap();

        assert_eq!(settings, ControllerSettings::default());
        assert_eq!(settings.timings, PhaseTimings::REFERENCE);
        assert_eq!(settings.initial_phase, Phase::EwGreen);
    }

    #[test]
    fn empty_json_uses_defaults() {
        let config = ControllerConfig::from_json("{}").unwrap();
        assert_eq!(config, ControllerConfig::default());
    }

    #[test]
    fn fractional_seconds_are_accepted() {
        let settings = ControllerConfig::from_json(
            r#"{ "timings": { "red_secs": 0.25 }, "initial_phase": "NS_RED" }"#,
        )
        .unwrap()
        .validated()
        .unwrap();

        assert_eq!(settings.timings.red, Duration::from_millis(250));
        assert_eq!(settings.initial_phase, Phase::NsRed);
    }

    #[test]
    fn validation_accumulates_all_issues() {
        let mut config = ControllerConfig::default();
        config.timings.green_secs = 0.0;
        config.timings.yellow_secs = f64::NAN;
        config.event_queue_depth = 0;
        config
            .pins
            .lights
            .get_mut(&Direction::North)
            .unwrap()
            .remove(&Color::Red);
        config.pins.indicators.insert(Axis::EastWest, 3);

        let err = config.validated().unwrap_err();

        let ConfigError::Invalid { issues } = err else {
            panic!("expected invalid configuration");
        };
        assert_eq!(issues.len(), 5);
        assert!(issues.iter().any(|i| matches!(
            i,
            ConfigIssue::InvalidDuration {
                field: "timings.green_secs",
                ..
            }
        )));
        assert!(issues.iter().any(|i| matches!(
            i,
            ConfigIssue::InvalidDuration {
                field: "timings.yellow_secs",
                ..
            }
        )));
        assert!(issues.contains(&ConfigIssue::ZeroCapacity {
            field: "event_queue_depth"
        }));
        assert!(issues.contains(&ConfigIssue::UnmappedOutput {
            target: "north_red".to_string()
        }));
        assert!(issues.contains(&ConfigIssue::DuplicateOutput { pin: 3, uses: 2 }));
    }

    #[test]
    fn negative_duration_is_rejected() {
        let config = ControllerConfig {
            debounce_secs: -1.0,
            ..ControllerConfig::default()
        };

        assert!(config.validate().is_failure());
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = ControllerConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let path = std::env::temp_dir().join("signalbox-missing-config.json");
        let err = ControllerConfig::load(&path).unwrap_err();

        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("signalbox-missing-config.json"));
    }

    #[test]
    fn load_reads_json_file() {
        let path = std::env::temp_dir().join(format!(
            "signalbox-config-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{ "debounce_secs": 0.5 }"#).unwrap();

        let config = ControllerConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.debounce_secs, 0.5);
    }

    #[test]
    fn invalid_error_lists_every_issue() {
        let err = ConfigError::Invalid {
            issues: vec![
                ConfigIssue::ZeroCapacity {
                    field: "history_capacity",
                },
                ConfigIssue::DuplicateOutput { pin: 7, uses: 2 },
            ],
        };

        assert_eq!(
            err.to_string(),
            "Invalid configuration: history_capacity must be at least 1; \
             Output line 7 is assigned 2 times"
        );
    }
}
