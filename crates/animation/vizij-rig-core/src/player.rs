//! Single-clip playback: a time cursor with loop mode and per-tick evaluation.
//!
//! State flow: `Stopped -> Playing <-> Paused`, back to `Stopped` on `stop()` or
//! when a `Once` clip reaches its end.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::binding::{Bindings, TargetSink};
use crate::data::Clip;
use crate::outputs::{CoreEvent, Outputs};
use crate::pose::Pose;

#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum LoopMode {
    #[default]
    Once,
    Loop,
    PingPong,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Floating modulo with a non-negative result for positive `b`.
pub(crate) fn fmod(a: f32, b: f32) -> f32 {
    if b == 0.0 {
        return 0.0;
    }
    let m = a % b;
    if (m < 0.0 && b > 0.0) || (m > 0.0 && b < 0.0) {
        m + b
    } else {
        m
    }
}

#[derive(Debug)]
pub struct AnimationPlayer {
    clip: Option<Arc<Clip>>,
    time: f32,
    speed: f32,
    /// +1 forward, -1 while a ping-pong cycle runs backward.
    direction: f32,
    mode: LoopMode,
    state: PlaybackState,
    bindings: Bindings,
    outputs: Outputs,
}

impl Default for AnimationPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationPlayer {
    pub fn new() -> Self {
        Self {
            clip: None,
            time: 0.0,
            speed: 1.0,
            direction: 1.0,
            mode: LoopMode::Once,
            state: PlaybackState::Stopped,
            bindings: Bindings::new(),
            outputs: Outputs::default(),
        }
    }

    pub fn with_clip(clip: Arc<Clip>) -> Self {
        let mut player = Self::new();
        player.clip = Some(clip);
        player
    }

    /// Swap the clip, rewinding to the start. Playback state is kept.
    pub fn set_clip(&mut self, clip: Arc<Clip>) {
        self.clip = Some(clip);
        self.time = 0.0;
        self.direction = 1.0;
    }

    pub fn clip(&self) -> Option<&Arc<Clip>> {
        self.clip.as_ref()
    }

    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    #[inline]
    pub fn direction(&self) -> f32 {
        self.direction
    }

    #[inline]
    pub fn mode(&self) -> LoopMode {
        self.mode
    }

    #[inline]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Outputs of the most recent update or seek.
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    /// Clip duration, 0 without a clip.
    pub fn duration(&self) -> f32 {
        self.clip.as_ref().map(|c| c.duration()).unwrap_or(0.0)
    }

    /// Route evaluated values for `target` into `sink`.
    pub fn bind(&mut self, target: impl Into<String>, sink: impl TargetSink + 'static) {
        self.bindings.bind(target, sink);
    }

    pub fn bindings_mut(&mut self) -> &mut Bindings {
        &mut self.bindings
    }

    /// Start (from `Stopped`, rewinding to 0) or resume (from `Paused`) in `mode`.
    /// No-op without a clip.
    pub fn play(&mut self, mode: LoopMode) {
        if self.clip.is_none() {
            log::trace!("play() ignored: player has no clip");
            return;
        }
        if self.state == PlaybackState::Stopped {
            self.time = 0.0;
            self.direction = 1.0;
        }
        self.set_mode(mode);
        self.state = PlaybackState::Playing;
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == PlaybackState::Paused {
            self.state = PlaybackState::Playing;
        }
    }

    /// Stop and rewind.
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.time = 0.0;
        self.direction = 1.0;
    }

    /// Leaving ping-pong always resumes forward playback.
    pub fn set_mode(&mut self, mode: LoopMode) {
        self.mode = mode;
        if mode != LoopMode::PingPong {
            self.direction = 1.0;
        }
    }

    /// Negative speeds clamp to 0.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    /// Jump to `time` (clamped to the clip) and, unless stopped, evaluate now.
    pub fn seek(&mut self, time: f32) {
        if self.clip.is_none() || time.is_nan() {
            return;
        }
        self.time = time.clamp(0.0, self.duration());
        if self.state != PlaybackState::Stopped {
            self.outputs.clear();
            self.evaluate();
        }
    }

    /// Advance by `dt` seconds (negative treated as 0), apply the loop mode and
    /// evaluate the clip into the bound sinks.
    pub fn update(&mut self, dt: f32) -> &Outputs {
        self.outputs.clear();
        if self.state != PlaybackState::Playing {
            return &self.outputs;
        }
        let Some(clip) = self.clip.as_ref() else {
            return &self.outputs;
        };
        let duration = clip.duration();

        self.time += dt.max(0.0) * self.speed * self.direction;

        if self.direction > 0.0 && self.time >= duration {
            match self.mode {
                LoopMode::Once => {
                    self.time = duration;
                    self.state = PlaybackState::Stopped;
                    let clip = clip.name.clone();
                    self.outputs.push_event(CoreEvent::Finished { clip });
                    return &self.outputs;
                }
                LoopMode::Loop => {
                    if duration > 0.0 {
                        let count = (self.time / duration).floor() as u32;
                        self.time = fmod(self.time, duration);
                        if count > 0 {
                            let clip = clip.name.clone();
                            self.outputs.push_event(CoreEvent::Looped { clip, count });
                        }
                    } else {
                        self.time = 0.0;
                    }
                }
                LoopMode::PingPong => {
                    self.time = duration;
                    self.direction = -1.0;
                }
            }
        } else if self.direction < 0.0 && self.time <= 0.0 && self.mode == LoopMode::PingPong {
            self.time = 0.0;
            self.direction = 1.0;
        }

        self.evaluate();
        &self.outputs
    }

    /// Evaluate the clip at the current time without touching outputs or sinks.
    pub fn sample(&self) -> Pose {
        self.clip
            .as_ref()
            .map(|clip| clip.evaluate(self.time))
            .unwrap_or_default()
    }

    fn evaluate(&mut self) {
        if let Some(clip) = self.clip.as_ref() {
            let pose = clip.evaluate(self.time);
            self.bindings.apply(&pose);
            self.outputs.pose = pose;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmod_wraps_negative() {
        assert_eq!(fmod(2.5, 1.0), 0.5);
        assert_eq!(fmod(-0.25, 1.0), 0.75);
        assert_eq!(fmod(1.0, 0.0), 0.0);
    }

    #[test]
    fn play_without_clip_is_noop() {
        let mut player = AnimationPlayer::new();
        player.play(LoopMode::Loop);
        assert_eq!(player.state(), PlaybackState::Stopped);
    }
}
