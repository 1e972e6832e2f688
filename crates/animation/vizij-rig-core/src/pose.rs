//! Evaluated channel values keyed by target name then channel.

use hashbrown::HashMap;

use crate::data::Channel;
use crate::value::Value;

/// `target -> channel -> value` mapping produced by clip evaluation and blending.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pose {
    targets: HashMap<String, HashMap<Channel, Value>>,
}

impl Pose {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(targets: usize) -> Self {
        Self {
            targets: HashMap::with_capacity(targets),
        }
    }

    /// Set (or overwrite) one channel value.
    pub fn insert(&mut self, target: &str, channel: Channel, value: Value) {
        self.targets
            .entry_ref(target)
            .or_default()
            .insert(channel, value);
    }

    pub fn get(&self, target: &str, channel: &Channel) -> Option<&Value> {
        self.targets.get(target).and_then(|c| c.get(channel))
    }

    /// All channels written for one target.
    pub fn target(&self, target: &str) -> Option<&HashMap<Channel, Value>> {
        self.targets.get(target)
    }

    pub fn target_names(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    /// Flattened `(target, channel, value)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Channel, &Value)> {
        self.targets.iter().flat_map(|(target, channels)| {
            channels
                .iter()
                .map(move |(channel, value)| (target.as_str(), channel, value))
        })
    }

    /// Number of channel values.
    pub fn len(&self) -> usize {
        self.targets.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.values().all(HashMap::is_empty)
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }
}
