//! Clip/track data model.
//!
//! A [`Clip`] is a named bundle of [`Track`]s; each track animates one channel of
//! one named target through time-ordered [`Keyframe`]s. Clips are authored once
//! and shared read-only (usually behind an `Arc`) by players, blenders and state
//! machines.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RigError};
use crate::pose::Pose;
use crate::sampling::sample_track;
use crate::value::Value;

/// Animated slot on a target.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Position,
    Rotation,
    Scale,
    /// Arbitrary named property (e.g. "material.opacity").
    Property(String),
}

/// Segment interpolation mode for a track.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpolation {
    /// Hold the earlier key until the next one.
    Step,
    #[default]
    Linear,
    /// Hermite basis on scalars; vectors and quaternions fall back to linear
    /// because keyframes carry no tangents.
    Cubic,
}

/// A single time-stamped value, time in seconds.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: Value,
}

impl Keyframe {
    pub fn new(time: f32, value: impl Into<Value>) -> Self {
        Self {
            time,
            value: value.into(),
        }
    }
}

/// Serialized form of a track; normalized into a [`Track`] on load.
#[derive(Deserialize)]
struct StoredTrack {
    target: String,
    channel: Channel,
    #[serde(default)]
    interpolation: Interpolation,
    #[serde(default)]
    keyframes: Vec<Keyframe>,
}

impl From<StoredTrack> for Track {
    fn from(stored: StoredTrack) -> Self {
        let mut keyframes = stored.keyframes;
        let sorted = keyframes.windows(2).all(|w| w[0].time <= w[1].time);
        if !sorted {
            log::warn!(
                "track '{}' {:?}: keyframes out of order, sorting by time",
                stored.target,
                stored.channel
            );
            // Stable: equal-time keys keep their authored order.
            keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        }
        Track {
            target: stored.target,
            channel: stored.channel,
            interpolation: stored.interpolation,
            keyframes,
        }
    }
}

/// One animated channel of one target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredTrack")]
pub struct Track {
    pub target: String,
    pub channel: Channel,
    pub interpolation: Interpolation,
    /// Sorted ascending by time; equal times keep insertion order.
    keyframes: Vec<Keyframe>,
}

impl Track {
    pub fn new(target: impl Into<String>, channel: Channel) -> Self {
        Self {
            target: target.into(),
            channel,
            interpolation: Interpolation::Linear,
            keyframes: Vec::new(),
        }
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn with_keyframe(mut self, time: f32, value: impl Into<Value>) -> Self {
        self.add_keyframe(time, value);
        self
    }

    /// Insert a keyframe keeping the track sorted. A key at an already-used time
    /// lands after the existing ones, so it wins exact-time lookups.
    /// Non-finite times are ignored; negative times clamp to 0.
    pub fn add_keyframe(&mut self, time: f32, value: impl Into<Value>) {
        if !time.is_finite() {
            log::warn!("track '{}': ignoring keyframe at non-finite time", self.target);
            return;
        }
        let time = time.max(0.0);
        let idx = self.keyframes.partition_point(|k| k.time <= time);
        self.keyframes.insert(idx, Keyframe::new(time, value));
    }

    #[inline]
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Time of the last keyframe, 0 for an empty track.
    pub fn duration(&self) -> f32 {
        self.keyframes.last().map(|k| k.time).unwrap_or(0.0)
    }

    /// Sample the track at `time` seconds. `None` for an empty track.
    pub fn evaluate(&self, time: f32) -> Option<Value> {
        sample_track(self, time)
    }
}

/// Serialized form of a clip; duration is always recomputed from the tracks.
#[derive(Deserialize)]
struct StoredClip {
    name: String,
    #[serde(default)]
    tracks: Vec<Track>,
}

impl From<StoredClip> for Clip {
    fn from(stored: StoredClip) -> Self {
        let mut clip = Clip::new(stored.name);
        for track in stored.tracks {
            clip.add_track(track);
        }
        clip
    }
}

/// Named bundle of tracks with a derived duration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredClip")]
pub struct Clip {
    pub name: String,
    tracks: Vec<Track>,
    duration: f32,
}

impl Clip {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tracks: Vec::new(),
            duration: 0.0,
        }
    }

    pub fn with_track(mut self, track: Track) -> Self {
        self.add_track(track);
        self
    }

    /// Append a track. Duration only ever grows.
    pub fn add_track(&mut self, track: Track) {
        self.duration = self.duration.max(track.duration());
        self.tracks.push(track);
    }

    #[inline]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Find the first track animating `channel` on `target`.
    pub fn track(&self, target: &str, channel: &Channel) -> Option<&Track> {
        self.tracks
            .iter()
            .find(|t| t.target == target && &t.channel == channel)
    }

    /// Evaluate every track at `time`; empty tracks contribute nothing.
    pub fn evaluate(&self, time: f32) -> Pose {
        let mut pose = Pose::with_capacity(self.tracks.len());
        for track in &self.tracks {
            if let Some(value) = track.evaluate(time) {
                pose.insert(&track.target, track.channel.clone(), value);
            }
        }
        pose
    }

    /// Check basic invariants: finite, non-negative key times and finite values.
    pub fn validate(&self) -> Result<()> {
        for track in &self.tracks {
            for key in &track.keyframes {
                if !key.time.is_finite() || key.time < 0.0 || !key.value.is_finite() {
                    return Err(RigError::InvalidKeyframe {
                        target: track.target.clone(),
                        time: key.time,
                    });
                }
            }
        }
        Ok(())
    }

    /// Parse a clip from JSON, normalizing key order and validating times.
    pub fn from_json(json: &str) -> Result<Self> {
        let clip: Clip = serde_json::from_str(json)?;
        clip.validate()?;
        log::debug!(
            "loaded clip '{}' ({} tracks, {:.3}s)",
            clip.name,
            clip.tracks.len(),
            clip.duration
        );
        Ok(clip)
    }
}
