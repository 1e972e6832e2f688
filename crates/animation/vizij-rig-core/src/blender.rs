//! Multi-layer weighted blending.
//!
//! Each [`BlendLayer`] wraps a clip with its own looping time cursor, speed and
//! weight. `Blender::update(dt)` advances every layer, steps any active fades,
//! then merges the layers through the [`Accumulator`] and pushes the result
//! into the bound sinks. Fades are plain layer state stepped by the same tick;
//! there is no second clock.

use std::sync::Arc;

use crate::accumulate::Accumulator;
use crate::binding::{Bindings, TargetSink};
use crate::data::Clip;
use crate::player::fmod;
use crate::pose::Pose;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Fade {
    start: f32,
    target: f32,
    elapsed: f32,
    duration: f32,
    /// Drop the layer once the fade lands (cross-fade outgoing layers).
    remove_when_done: bool,
}

#[derive(Clone, Debug)]
pub struct BlendLayer {
    clip: Arc<Clip>,
    weight: f32,
    time: f32,
    speed: f32,
    fade: Option<Fade>,
}

impl BlendLayer {
    pub fn new(clip: Arc<Clip>, weight: f32) -> Self {
        Self {
            clip,
            weight: clamp_weight(weight),
            time: 0.0,
            speed: 1.0,
            fade: None,
        }
    }

    pub fn clip(&self) -> &Arc<Clip> {
        &self.clip
    }

    #[inline]
    pub fn weight(&self) -> f32 {
        self.weight
    }

    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Returns true when a removing fade has completed.
    fn advance(&mut self, dt: f32) -> bool {
        let duration = self.clip.duration();
        self.time = if duration > 0.0 {
            fmod(self.time + dt * self.speed, duration)
        } else {
            0.0
        };

        let Some(fade) = self.fade.as_mut() else {
            return false;
        };
        fade.elapsed += dt;
        let f = if fade.duration > 0.0 {
            (fade.elapsed / fade.duration).min(1.0)
        } else {
            1.0
        };
        self.weight = clamp_weight(fade.start + (fade.target - fade.start) * f);
        if f < 1.0 {
            return false;
        }
        let done = fade.remove_when_done;
        self.weight = fade.target;
        self.fade = None;
        done
    }
}

fn clamp_weight(w: f32) -> f32 {
    if w.is_nan() {
        0.0
    } else {
        w.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Default)]
pub struct Blender {
    layers: Vec<BlendLayer>,
    bindings: Bindings,
    pose: Pose,
}

impl Blender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer; returns its index.
    pub fn add_layer(&mut self, clip: Arc<Clip>, weight: f32) -> usize {
        self.layers.push(BlendLayer::new(clip, weight));
        self.layers.len() - 1
    }

    /// Remove the layer at `index`; later layers shift down.
    pub fn remove_layer(&mut self, index: usize) -> Option<BlendLayer> {
        if index >= self.layers.len() {
            log::trace!("remove_layer: no layer at index {index}");
            return None;
        }
        Some(self.layers.remove(index))
    }

    /// Drop every layer.
    pub fn clear(&mut self) {
        self.layers.clear();
        self.pose.clear();
    }

    pub fn layers(&self) -> &[BlendLayer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&BlendLayer> {
        self.layers.get(index)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Set a layer weight (clamped to [0,1]), cancelling any fade on it.
    pub fn set_weight(&mut self, index: usize, weight: f32) {
        match self.layers.get_mut(index) {
            Some(layer) => {
                layer.weight = clamp_weight(weight);
                layer.fade = None;
            }
            None => log::trace!("set_weight: no layer at index {index}"),
        }
    }

    pub fn set_speed(&mut self, index: usize, speed: f32) {
        match self.layers.get_mut(index) {
            Some(layer) => layer.speed = speed,
            None => log::trace!("set_speed: no layer at index {index}"),
        }
    }

    /// Ramp a layer's weight to `target` over `duration` seconds of `update`
    /// time. The layer stays in place when the ramp ends.
    pub fn fade_layer(&mut self, index: usize, target: f32, duration: f32) {
        let Some(layer) = self.layers.get_mut(index) else {
            log::trace!("fade_layer: no layer at index {index}");
            return;
        };
        let target = clamp_weight(target);
        if duration <= 0.0 {
            layer.weight = target;
            layer.fade = None;
            return;
        }
        layer.fade = Some(Fade {
            start: layer.weight,
            target,
            elapsed: 0.0,
            duration,
            remove_when_done: false,
        });
    }

    /// Fade every current layer out (removing each at 0) while a new layer for
    /// `clip` fades in from 0 to 1. Returns the new layer's index.
    pub fn cross_fade(&mut self, clip: Arc<Clip>, duration: f32) -> usize {
        log::debug!("cross-fade to '{}' over {duration}s", clip.name);
        if duration <= 0.0 {
            self.layers.clear();
            return self.add_layer(clip, 1.0);
        }
        for layer in &mut self.layers {
            layer.fade = Some(Fade {
                start: layer.weight,
                target: 0.0,
                elapsed: 0.0,
                duration,
                remove_when_done: true,
            });
        }
        let mut incoming = BlendLayer::new(clip, 0.0);
        incoming.fade = Some(Fade {
            start: 0.0,
            target: 1.0,
            elapsed: 0.0,
            duration,
            remove_when_done: false,
        });
        self.layers.push(incoming);
        self.layers.len() - 1
    }

    /// Route blended values for `target` into `sink`.
    pub fn bind(&mut self, target: impl Into<String>, sink: impl TargetSink + 'static) {
        self.bindings.bind(target, sink);
    }

    pub fn bindings_mut(&mut self) -> &mut Bindings {
        &mut self.bindings
    }

    /// Advance layer clocks and fades by `dt` (negative treated as 0), blend,
    /// write the sinks and return the merged pose.
    pub fn update(&mut self, dt: f32) -> &Pose {
        let dt = dt.max(0.0);
        self.layers.retain_mut(|layer| !layer.advance(dt));
        self.pose = self.evaluate();
        self.bindings.apply(&self.pose);
        &self.pose
    }

    /// Blend the layers at their current times without advancing anything.
    pub fn evaluate(&self) -> Pose {
        let mut acc = Accumulator::new();
        for layer in self.layers.iter().filter(|l| l.weight > 0.0) {
            acc.add_pose(&layer.clip.evaluate(layer.time), layer.weight);
        }
        acc.finalize()
    }

    /// Pose produced by the last `update`.
    pub fn pose(&self) -> &Pose {
        &self.pose
    }
}
