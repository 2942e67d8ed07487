use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    #[default]
    RrtStar,
    DynamicRrtStar,
    ModRrtStar,
}

impl Variant {
    pub fn rewires(&self) -> bool {
        !matches!(self, Variant::ModRrtStar)
    }

    pub fn spawns_obstacles(&self) -> bool {
        !matches!(self, Variant::RrtStar)
    }
}

mod defaults {
    pub fn step_size() -> f64 {
        20.0
    }
    pub fn clearance() -> f64 {
        20.0
    }
    pub fn rewire_radius() -> f64 {
        50.0
    }
    pub fn max_sample_attempts() -> usize {
        10_000
    }
    pub fn max_count() -> usize {
        5
    }
    pub fn spawn_probability() -> f64 {
        0.05
    }
    pub fn interior_margin() -> f64 {
        100.0
    }
    pub fn circle_radius() -> super::SizeRange {
        super::SizeRange { min: 20.0, max: 40.0 }
    }
    pub fn rect_side() -> super::SizeRange {
        super::SizeRange { min: 20.0, max: 80.0 }
    }
    pub fn angle_threshold() -> f64 {
        std::f64::consts::PI / 30.0
    }
    pub fn interpolation_samples() -> usize {
        10
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub variant: Variant,

    #[serde(default = "defaults::step_size")]
    pub step_size: f64,

    #[serde(default = "defaults::clearance")]
    pub clearance: f64,

    #[serde(default = "defaults::rewire_radius")]
    pub rewire_radius: f64,

    /// Samples drawn per step before giving up with no progress
    #[serde(default = "defaults::max_sample_attempts")]
    pub max_sample_attempts: usize,

    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub dynamic: DynamicObstacleConfig,

    #[serde(default)]
    pub smoothing: SmoothingConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            step_size: defaults::step_size(),
            clearance: defaults::clearance(),
            rewire_radius: defaults::rewire_radius(),
            max_sample_attempts: defaults::max_sample_attempts(),
            seed: None,
            dynamic: DynamicObstacleConfig::default(),
            smoothing: SmoothingConfig::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: f64,
    pub max: f64,
}

impl SizeRange {
    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && 0.0 < self.min && self.min <= self.max
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DynamicObstacleConfig {
    #[serde(default = "defaults::max_count")]
    pub max_count: usize,

    /// Chance per step of proposing a new obstacle
    #[serde(default = "defaults::spawn_probability")]
    pub spawn_probability: f64,

    /// Hold back tree growth until `max_count` obstacles have been admitted
    #[serde(default)]
    pub spawn_before_growth: bool,

    /// Distance from the workspace edges that spawned obstacles keep to
    #[serde(default = "defaults::interior_margin")]
    pub interior_margin: f64,

    #[serde(default = "defaults::circle_radius")]
    pub circle_radius: SizeRange,

    #[serde(default = "defaults::rect_side")]
    pub rect_side: SizeRange,
}

impl Default for DynamicObstacleConfig {
    fn default() -> Self {
        Self {
            max_count: defaults::max_count(),
            spawn_probability: defaults::spawn_probability(),
            spawn_before_growth: false,
            interior_margin: defaults::interior_margin(),
            circle_radius: defaults::circle_radius(),
            rect_side: defaults::rect_side(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SmoothingConfig {
    /// Minimum deviation from the start-goal chord for a point to survive smoothing (radians)
    #[serde(default = "defaults::angle_threshold")]
    pub angle_threshold: f64,

    #[serde(default = "defaults::interpolation_samples")]
    pub interpolation_samples: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            angle_threshold: defaults::angle_threshold(),
            interpolation_samples: defaults::interpolation_samples(),
        }
    }
}

impl PlannerConfig {
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        toml::from_str(contents).context("Could not parse planner configuration")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read planner configuration from {path:?}"))?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(PlannerError::Config(msg));
        if !(self.step_size.is_finite() && self.step_size > 0.0) {
            return fail(format!("step_size must be positive, got {}", self.step_size));
        }
        if !(self.clearance.is_finite() && self.clearance >= 0.0) {
            return fail(format!("clearance must be non-negative, got {}", self.clearance));
        }
        if !(self.rewire_radius.is_finite() && self.rewire_radius > 0.0) {
            return fail(format!(
                "rewire_radius must be positive, got {}",
                self.rewire_radius
            ));
        }
        if self.max_sample_attempts == 0 {
            return fail("max_sample_attempts must be at least 1".into());
        }
        let dynamic = &self.dynamic;
        if !(0.0..=1.0).contains(&dynamic.spawn_probability) {
            return fail(format!(
                "spawn_probability must lie in [0, 1], got {}",
                dynamic.spawn_probability
            ));
        }
        if !(dynamic.interior_margin.is_finite() && dynamic.interior_margin >= 0.0) {
            return fail(format!(
                "interior_margin must be non-negative, got {}",
                dynamic.interior_margin
            ));
        }
        if !dynamic.circle_radius.is_valid() {
            return fail(format!("invalid circle_radius range {:?}", dynamic.circle_radius));
        }
        if !dynamic.rect_side.is_valid() {
            return fail(format!("invalid rect_side range {:?}", dynamic.rect_side));
        }
        if !(self.smoothing.angle_threshold.is_finite() && self.smoothing.angle_threshold >= 0.0) {
            return fail(format!(
                "angle_threshold must be non-negative, got {}",
                self.smoothing.angle_threshold
            ));
        }
        if self.smoothing.interpolation_samples == 0 {
            return fail("interpolation_samples must be at least 1".into());
        }
        Ok(())
    }
}
