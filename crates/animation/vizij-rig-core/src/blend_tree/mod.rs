//! Parametric blend trees.
//!
//! Every tree owns a list of named [`BlendSample`]s and derives their weights
//! from its own parameters each time a parameter (or the sample set) changes.
//! Weights are never carried over from a previous parameter value.

pub mod additive;
pub mod direct;
pub mod one_d;
pub mod two_d;

use std::sync::Arc;

pub use additive::AdditiveBlendTree;
pub use direct::DirectBlendTree;
pub use one_d::BlendTree1d;
pub use two_d::BlendTree2d;

use crate::accumulate::{apply_additive, Accumulator};
use crate::data::Clip;
use crate::player::fmod;
use crate::pose::Pose;

/// A clip taking part in a blend tree, with its current weight.
#[derive(Clone, Debug)]
pub struct BlendSample {
    pub name: String,
    pub clip: Arc<Clip>,
    pub(crate) weight: f32,
}

impl BlendSample {
    pub(crate) fn new(name: impl Into<String>, clip: Arc<Clip>, weight: f32) -> Self {
        Self {
            name: name.into(),
            clip,
            weight,
        }
    }

    #[inline]
    pub fn weight(&self) -> f32 {
        self.weight
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.weight > 0.0
    }

    /// Evaluate the clip at `time`, wrapped to its duration.
    pub fn evaluate(&self, time: f32) -> Pose {
        let duration = self.clip.duration();
        let t = if duration > 0.0 { fmod(time, duration) } else { 0.0 };
        self.clip.evaluate(t)
    }
}

pub(crate) fn clamp_unit(w: f32) -> f32 {
    if w.is_nan() {
        0.0
    } else {
        w.clamp(0.0, 1.0)
    }
}

/// One of the four blend tree kinds.
#[derive(Clone, Debug)]
pub enum BlendTree {
    OneD(BlendTree1d),
    TwoD(BlendTree2d),
    Direct(DirectBlendTree),
    Additive(AdditiveBlendTree),
}

impl BlendTree {
    /// Samples with a weight above zero.
    pub fn active_samples(&self) -> Vec<&BlendSample> {
        match self {
            BlendTree::OneD(tree) => tree.active_samples().collect(),
            BlendTree::TwoD(tree) => tree.active_samples().collect(),
            BlendTree::Direct(tree) => tree.active_samples().collect(),
            BlendTree::Additive(tree) => tree.active_samples().collect(),
        }
    }

    /// Weight currently assigned to the sample called `name`.
    pub fn weight(&self, name: &str) -> Option<f32> {
        match self {
            BlendTree::OneD(tree) => tree.weight(name),
            BlendTree::TwoD(tree) => tree.weight(name),
            BlendTree::Direct(tree) => tree.weight(name),
            BlendTree::Additive(tree) => tree.weight(name),
        }
    }

    /// Evaluate every active sample at `time` and merge them.
    ///
    /// 1-D, 2-D and direct trees go through the weighted accumulator. The
    /// additive tree evaluates its base and layers each active additive clip on
    /// top with `apply_additive`.
    pub fn evaluate(&self, time: f32) -> Pose {
        match self {
            BlendTree::Additive(tree) => {
                let mut pose = tree.base().evaluate(time);
                for layer in tree.additive_samples().filter(|s| s.is_active()) {
                    apply_additive(&mut pose, &layer.evaluate(time), layer.weight);
                }
                pose
            }
            _ => {
                let mut acc = Accumulator::new();
                for sample in self.active_samples() {
                    acc.add_pose(&sample.evaluate(time), sample.weight);
                }
                acc.finalize()
            }
        }
    }
}

impl From<BlendTree1d> for BlendTree {
    fn from(tree: BlendTree1d) -> Self {
        BlendTree::OneD(tree)
    }
}

impl From<BlendTree2d> for BlendTree {
    fn from(tree: BlendTree2d) -> Self {
        BlendTree::TwoD(tree)
    }
}

impl From<DirectBlendTree> for BlendTree {
    fn from(tree: DirectBlendTree) -> Self {
        BlendTree::Direct(tree)
    }
}

impl From<AdditiveBlendTree> for BlendTree {
    fn from(tree: AdditiveBlendTree) -> Self {
        BlendTree::Additive(tree)
    }
}
