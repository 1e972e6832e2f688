//! Direct blending: the caller owns every weight.

use std::sync::Arc;

use crate::blend_tree::{clamp_unit, BlendSample};
use crate::data::Clip;

#[derive(Clone, Debug, Default)]
pub struct DirectBlendTree {
    samples: Vec<BlendSample>,
}

impl DirectBlendTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace, by name) a sample with an initial weight in [0,1].
    pub fn add_sample(&mut self, name: impl Into<String>, clip: Arc<Clip>, weight: f32) {
        let name = name.into();
        self.samples.retain(|s| s.name != name);
        self.samples
            .push(BlendSample::new(name, clip, clamp_unit(weight)));
    }

    pub fn remove_sample(&mut self, name: &str) -> bool {
        let before = self.samples.len();
        self.samples.retain(|s| s.name != name);
        self.samples.len() != before
    }

    /// Set one sample's weight, clamped to [0,1]. Unknown names are ignored.
    pub fn set_weight(&mut self, name: &str, weight: f32) {
        match self.samples.iter_mut().find(|s| s.name == name) {
            Some(sample) => sample.weight = clamp_unit(weight),
            None => log::trace!("direct blend: no sample named '{name}'"),
        }
    }

    /// Scale all weights so they sum to 1. Does nothing while the sum is 0.
    pub fn normalize_weights(&mut self) {
        let total: f32 = self.samples.iter().map(|s| s.weight).sum();
        if total <= 0.0 {
            return;
        }
        for sample in &mut self.samples {
            sample.weight /= total;
        }
    }

    pub fn samples(&self) -> &[BlendSample] {
        &self.samples
    }

    pub fn active_samples(&self) -> impl Iterator<Item = &BlendSample> {
        self.samples.iter().filter(|s| s.is_active())
    }

    pub fn weight(&self, name: &str) -> Option<f32> {
        self.samples.iter().find(|s| s.name == name).map(|s| s.weight)
    }
}
