//! Session configuration merged from a TOML file and command line flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glam::UVec2;
use serde::Deserialize;

use crate::Args;

const DEFAULT_SEED: u64 = 0x1d_1a;
const DEFAULT_VIEWPORT: UVec2 = UVec2::new(40, 15);

/// Optional values read from a session file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SessionFile {
    seed: Option<u64>,
    level: Option<PathBuf>,
    viewport_width: Option<u32>,
    viewport_height: Option<u32>,
    script: Option<String>,
}

impl SessionFile {
    /// Reads and parses a session file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read session file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parse session file {}", path.display()))
    }

    fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// Fully resolved settings for one session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) seed: u64,
    pub(crate) level: Option<PathBuf>,
    pub(crate) viewport: UVec2,
    pub(crate) script: Option<String>,
    pub(crate) ansi: bool,
}

impl Settings {
    /// Command line flags win over the file, the file wins over defaults.
    pub(crate) fn resolve(args: &Args, file: SessionFile) -> Self {
        Self {
            seed: args.seed.or(file.seed).unwrap_or(DEFAULT_SEED),
            level: args.level.clone().or(file.level),
            viewport: UVec2::new(
                args.viewport_width
                    .or(file.viewport_width)
                    .unwrap_or(DEFAULT_VIEWPORT.x)
                    .max(1),
                args.viewport_height
                    .or(file.viewport_height)
                    .unwrap_or(DEFAULT_VIEWPORT.y)
                    .max(1),
            ),
            script: args.script.clone().or(file.script),
            ansi: args.color,
        }
    }
}
