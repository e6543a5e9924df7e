use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::autotype::DEFAULT_BOT_INTERVAL_MS;
use crate::modes::ModePolicy;

/// Everything the trainer remembers between runs: the mode toggles, the bot
/// pace, and where in which deck the user last was. Last-write-wins, no
/// versioning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Prefs {
    pub ghost: bool,
    pub recall: bool,
    pub blind: bool,
    pub hardcore: bool,
    pub precision: bool,
    pub autotype: bool,
    pub bot_speed_ms: u64,
    pub language: Option<String>,
    pub category: Option<String>,
    pub deck_index: usize,
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            ghost: false,
            recall: false,
            blind: false,
            hardcore: false,
            precision: false,
            autotype: false,
            bot_speed_ms: DEFAULT_BOT_INTERVAL_MS,
            language: None,
            category: None,
            deck_index: 0,
        }
    }
}

impl Prefs {
    pub fn modes(&self) -> ModePolicy {
        ModePolicy {
            ghost: self.ghost,
            recall: self.recall,
            blind: self.blind,
            hardcore: self.hardcore,
            precision: self.precision,
            autotype: self.autotype,
        }
    }

    pub fn set_modes(&mut self, modes: &ModePolicy) {
        self.ghost = modes.ghost;
        self.recall = modes.recall;
        self.blind = modes.blind;
        self.hardcore = modes.hardcore;
        self.precision = modes.precision;
        self.autotype = modes.autotype;
    }
}

pub trait PrefStore {
    fn load(&self) -> Prefs;
    fn save(&self, prefs: &Prefs) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FilePrefStore {
    path: PathBuf,
}

impl FilePrefStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "typedrill") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("typedrill_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FilePrefStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefStore for FilePrefStore {
    fn load(&self) -> Prefs {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(prefs) = serde_json::from_slice::<Prefs>(&bytes) {
                return prefs;
            }
        }
        Prefs::default()
    }

    fn save(&self, prefs: &Prefs) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(prefs).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
