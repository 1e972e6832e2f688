//! Core configuration for vizij-rig-core.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Tuning shared by the iterative IK solvers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IkConfig {
    /// Upper bound on solver passes per solve.
    pub max_iterations: u32,
    /// End-effector distance at which solving stops early.
    pub tolerance: f32,
}

impl Default for IkConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            tolerance: 0.001,
        }
    }
}

/// Thresholds for 2-D inverse-distance blending.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Blend2dConfig {
    /// A sample this close to the parameter point takes the full weight.
    pub snap_distance: f32,
    /// Normalized weights below this are dropped before renormalizing.
    pub prune_threshold: f32,
}

impl Default for Blend2dConfig {
    fn default() -> Self {
        Self {
            snap_distance: 0.001,
            prune_threshold: 0.01,
        }
    }
}

/// Configuration bundle; expand as needed without breaking API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ik: IkConfig,
    pub blend_2d: Blend2dConfig,
}

impl Config {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
