//! 1-D threshold blending.

use std::sync::Arc;

use crate::blend_tree::BlendSample;
use crate::data::Clip;

#[derive(Clone, Debug)]
struct Entry {
    sample: BlendSample,
    threshold: f32,
}

/// Samples placed on a line; the parameter picks the two neighbours around it.
#[derive(Clone, Debug, Default)]
pub struct BlendTree1d {
    /// Sorted ascending by threshold; equal thresholds keep insertion order.
    samples: Vec<Entry>,
    parameter: f32,
}

impl BlendTree1d {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace, by name) a sample at `threshold`.
    pub fn add_sample(&mut self, name: impl Into<String>, clip: Arc<Clip>, threshold: f32) {
        let name = name.into();
        self.samples.retain(|e| e.sample.name != name);
        let at = self.samples.partition_point(|e| e.threshold <= threshold);
        self.samples.insert(
            at,
            Entry {
                sample: BlendSample::new(name, clip, 0.0),
                threshold,
            },
        );
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

    pub fn set_parameter(&mut self, value: f32) {
        self.parameter = value;
        self.recompute_weights();
    }

    #[inline]
    pub fn parameter(&self) -> f32 {
        self.parameter
    }

    /// `(sample, threshold)` in threshold order.
    pub fn samples(&self) -> impl Iterator<Item = (&BlendSample, f32)> {
        self.samples.iter().map(|e| (&e.sample, e.threshold))
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
        if self.samples.is_empty() || p.is_nan() {
            return;
        }
        let n = self.samples.len();
        // Number of samples with threshold <= p, and index of the first >= p.
        let at_or_below = self.samples.partition_point(|e| e.threshold <= p);
        let upper = self.samples.partition_point(|e| e.threshold < p);

        if at_or_below == 0 {
            self.samples[0].sample.weight = 1.0;
            return;
        }
        if upper == n {
            self.samples[n - 1].sample.weight = 1.0;
            return;
        }
        let lower = at_or_below - 1;
        let (t0, t1) = (self.samples[lower].threshold, self.samples[upper].threshold);
        if t0 == p {
            self.samples[lower].sample.weight = 1.0;
            return;
        }
        let u = (p - t0) / (t1 - t0);
        self.samples[lower].sample.weight = 1.0 - u;
        self.samples[upper].sample.weight = u;
    }
}
