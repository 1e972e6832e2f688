//! Additive layering: a full-body base plus weighted offset clips.
//!
//! This tree only tracks membership and weights. Composing the values is done
//! by the consumer (see `BlendTree::evaluate` and `accumulate::apply_additive`).

use std::sync::Arc;

use crate::blend_tree::{clamp_unit, BlendSample};
use crate::data::Clip;

#[derive(Clone, Debug)]
pub struct AdditiveBlendTree {
    /// Always weight 1.
    base: BlendSample,
    additive: Vec<BlendSample>,
}

impl AdditiveBlendTree {
    pub fn new(base: Arc<Clip>) -> Self {
        let name = base.name.clone();
        Self {
            base: BlendSample::new(name, base, 1.0),
            additive: Vec::new(),
        }
    }

    pub fn base(&self) -> &BlendSample {
        &self.base
    }

    pub fn set_base(&mut self, base: Arc<Clip>) {
        let name = base.name.clone();
        self.base = BlendSample::new(name, base, 1.0);
    }

    /// Add (or replace, by name) an additive clip with weight in [0,1].
    pub fn add_additive(&mut self, name: impl Into<String>, clip: Arc<Clip>, weight: f32) {
        let name = name.into();
        self.additive.retain(|s| s.name != name);
        self.additive
            .push(BlendSample::new(name, clip, clamp_unit(weight)));
    }

    pub fn remove_additive(&mut self, name: &str) -> bool {
        let before = self.additive.len();
        self.additive.retain(|s| s.name != name);
        self.additive.len() != before
    }

    /// Set an additive clip's weight, clamped to [0,1]. Unknown names are ignored.
    pub fn set_weight(&mut self, name: &str, weight: f32) {
        match self.additive.iter_mut().find(|s| s.name == name) {
            Some(sample) => sample.weight = clamp_unit(weight),
            None => log::trace!("additive blend: no layer named '{name}'"),
        }
    }

    pub fn additive_samples(&self) -> impl Iterator<Item = &BlendSample> {
        self.additive.iter()
    }

    /// The base followed by every additive clip with weight > 0.
    pub fn active_samples(&self) -> impl Iterator<Item = &BlendSample> {
        std::iter::once(&self.base).chain(self.additive.iter().filter(|s| s.is_active()))
    }

    /// Weight of an additive clip; the base reports 1.
    pub fn weight(&self, name: &str) -> Option<f32> {
        self.additive
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.weight)
            .or_else(|| (self.base.name == name).then_some(1.0))
    }
}
