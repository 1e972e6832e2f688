//! 2-D inverse-distance blending.

use std::sync::Arc;

use glam::Vec2;

use crate::blend_tree::BlendSample;
use crate::config::Blend2dConfig;
use crate::data::Clip;

#[derive(Clone, Debug)]
struct Entry {
    sample: BlendSample,
    position: Vec2,
}

/// Samples scattered on a plane, weighted by `1 / d^2` to the parameter point.
#[derive(Clone, Debug, Default)]
pub struct BlendTree2d {
    samples: Vec<Entry>,
    parameter: Vec2,
    config: Blend2dConfig,
}

impl BlendTree2d {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Blend2dConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Add (or replace, by name) a sample at `position`.
    pub fn add_sample(&mut self, name: impl Into<String>, clip: Arc<Clip>, position: Vec2) {
        let name = name.into();
        self.samples.retain(|e| e.sample.name != name);
        self.samples.push(Entry {
            sample: BlendSample::new(name, clip, 0.0),
            position,
        });
        self.recompute_weights();
    }

    pub fn remove_sample(&mut self, name: &str) -> bool {
        let before = self.samples.len();
        self.samples.retain(|e| e.sample.name != name);
        let removed = self.samples.len() != before;
        if removed {
            self.recompute_weights();
        }
        removed
    }

    pub fn set_parameter(&mut self, point: Vec2) {
        self.parameter = point;
        self.recompute_weights();
    }

    pub fn set_parameters(&mut self, x: f32, y: f32) {
        self.set_parameter(Vec2::new(x, y));
    }

    #[inline]
    pub fn parameter(&self) -> Vec2 {
        self.parameter
    }

    pub fn samples(&self) -> impl Iterator<Item = (&BlendSample, Vec2)> {
        self.samples.iter().map(|e| (&e.sample, e.position))
    }

    pub fn active_samples(&self) -> impl Iterator<Item = &BlendSample> {
        self.samples
            .iter()
            .map(|e| &e.sample)
            .filter(|s| s.is_active())
    }

    pub fn weight(&self, name: &str) -> Option<f32> {
        self.samples
            .iter()
            .find(|e| e.sample.name == name)
            .map(|e| e.sample.weight)
    }

    fn recompute_weights(&mut self) {
        for e in &mut self.samples {
            e.sample.weight = 0.0;
        }
        let p = self.parameter;
        if self.samples.is_empty() || !p.is_finite() {
            return;
        }

        let snap = self.config.snap_distance;
        if let Some(hit) = self.samples.iter_mut().find(|e| e.position.distance(p) < snap) {
            hit.sample.weight = 1.0;
            return;
        }

        let mut total = 0.0;
        for e in &mut self.samples {
            let w = 1.0 / e.position.distance_squared(p);
            e.sample.weight = w;
            total += w;
        }
        if !total.is_finite() || total <= 0.0 {
            log::trace!("2-D blend: degenerate weight total {total}");
            for e in &mut self.samples {
                e.sample.weight = 0.0;
            }
            return;
        }

        let mut survivors = 0.0;
        for e in &mut self.samples {
            e.sample.weight /= total;
            if e.sample.weight >= self.config.prune_threshold {
                survivors += e.sample.weight;
            }
        }
        // With enough samples every weight can fall under the threshold; keep
        // the unpruned distribution then.
        if survivors <= 0.0 {
            return;
        }
        for e in &mut self.samples {
            e.sample.weight = if e.sample.weight < self.config.prune_threshold {
                0.0
            } else {
                e.sample.weight / survivors
            };
        }
    }
}
