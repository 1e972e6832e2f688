//! JSON fixtures shared by the rig crates' tests and benches.
//!
//! `fixtures/manifest.json` maps fixture names to paths relative to the
//! repository `fixtures/` directory, grouped by kind.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    clips: HashMap<String, String>,
    #[serde(default)]
    configs: HashMap<String, String>,
}

#[derive(Clone, Copy, Debug)]
enum Kind {
    Clip,
    Config,
}

impl Kind {
    fn entries(self) -> &'static HashMap<String, String> {
        match self {
            Kind::Clip => &MANIFEST.clips,
            Kind::Config => &MANIFEST.configs,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Kind::Clip => "clip",
            Kind::Config => "config",
        }
    }

    fn names(self) -> Vec<String> {
        self.entries().keys().cloned().collect()
    }

    fn path(self, name: &str) -> Result<PathBuf> {
        let rel = self
            .entries()
            .get(name)
            .ok_or_else(|| anyhow!("unknown {} fixture '{name}'", self.label()))?;
        Ok(PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(rel))
    }

    fn read(self, name: &str) -> Result<String> {
        let path = self.path(name)?;
        fs::read_to_string(&path)
            .with_context(|| format!("failed to read {} fixture at {}", self.label(), path.display()))
    }

    fn parse<T: DeserializeOwned>(self, name: &str) -> Result<T> {
        let text = self.read(name)?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse {} fixture '{name}'", self.label()))
    }
}

/// Keyframe clips (`Clip` JSON).
pub mod clips {
    use super::*;

    pub fn keys() -> Vec<String> {
        Kind::Clip.names()
    }

    pub fn json(name: &str) -> Result<String> {
        Kind::Clip.read(name)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        Kind::Clip.parse(name)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Kind::Clip.path(name)
    }
}

/// Rig configuration documents (`Config` JSON).
pub mod configs {
    use super::*;

    pub fn keys() -> Vec<String> {
        Kind::Config.names()
    }

    pub fn json(name: &str) -> Result<String> {
        Kind::Config.read(name)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        Kind::Config.parse(name)
    }
}
