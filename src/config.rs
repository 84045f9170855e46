/// Runtime configuration loaded from a TOML file.
///
/// The file is looked up at `$WINGS_CONFIG`, then `./wings.toml`.  With
/// neither present the defaults apply.  Every key is optional, so a file
/// can override just the values it cares about:
///
/// ```toml
/// tick_ms = 33
/// max_lasers = 0          # 0 = no cap
///
/// [sprites]
/// "img/ship.png" = [80, 60]
/// ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{GameError, Result};

pub const CONFIG_ENV: &str = "WINGS_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "wings.toml";
pub const DEFAULT_LOG_FILE: &str = "wings.log";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    /// Nominal duration of one tick, in milliseconds.
    pub tick_ms: u64,
    /// Logical pixel size of the play field.
    pub field_width: i32,
    pub field_height: i32,
    /// Most lasers alive at once.  `0` lifts the cap.
    pub max_lasers: usize,
    pub lives: i32,
    /// Fixed RNG seed; the wall clock is used when absent.
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
    /// Per-asset `[w, h]` size overrides.
    pub sprites: HashMap<String, (i32, i32)>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_ms: 40,
            field_width: 1024,
            field_height: 768,
            max_lasers: 64,
            lives: 3,
            seed: None,
            log_file: None,
            sprites: HashMap::new(),
        }
    }
}

impl GameConfig {
    pub fn laser_cap(&self) -> Option<usize> {
        match self.max_lasers {
            0 => None,
            n => Some(n),
        }
    }

    pub fn from_toml(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| GameError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&text).map_err(|e| GameError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Which file, if any, configuration should come from.
    pub fn locate() -> Option<PathBuf> {
        if let Ok(p) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(p));
        }
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        local.exists().then_some(local)
    }

    /// The located configuration together with the file it came from.
    pub fn load() -> Result<(Self, Option<PathBuf>)> {
        match Self::locate() {
            Some(path) => Ok((Self::load_from(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    /// `log_file` if set, otherwise `wings.log` beside the config file
    /// (or in the working directory when there is none).
    pub fn log_path(&self, source: Option<&Path>) -> PathBuf {
        if let Some(path) = &self.log_file {
            return path.clone();
        }
        match source.and_then(Path::parent) {
            Some(dir) => dir.join(DEFAULT_LOG_FILE),
            None => PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::from_toml("").unwrap();
        assert_eq!(cfg, GameConfig::default());
        assert_eq!(cfg.laser_cap(), Some(64));
    }

    #[test]
    fn partial_override() {
        let cfg = GameConfig::from_toml(
            "tick_ms = 20\nmax_lasers = 0\nseed = 5\n[sprites]\n\"img/ship.png\" = [80, 60]\n",
        )
        .unwrap();
        assert_eq!(cfg.tick_ms, 20);
        assert_eq!(cfg.laser_cap(), None);
        assert_eq!(cfg.seed, Some(5));
        assert_eq!(cfg.field_width, 1024);
        assert_eq!(cfg.sprites.get("img/ship.png"), Some(&(80, 60)));
    }

    #[test]
    fn malformed_file_is_config_error() {
        assert!(GameConfig::from_toml("tick_ms = \"fast\"").is_err());
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = GameConfig::load_from(Path::new("/nonexistent/wings.toml")).unwrap_err();
        assert!(matches!(err, GameError::Config { .. }));
    }
    #[test]
    fn log_file_sits_beside_config() {
        let cfg = GameConfig::default();
        assert_eq!(
            cfg.log_path(Some(Path::new("/etc/wings/wings.toml"))),
            PathBuf::from("/etc/wings/wings.log")
        );
        // a bare file name has an empty parent
        assert_eq!(cfg.log_path(Some(Path::new("wings.toml"))), PathBuf::from("wings.log"));
        assert_eq!(cfg.log_path(None), PathBuf::from("wings.log"));

        let cfg = GameConfig {
            log_file: Some(PathBuf::from("/tmp/w.log")),
            ..GameConfig::default()
        };
        assert_eq!(
            cfg.log_path(Some(Path::new("/etc/wings/wings.toml"))),
            PathBuf::from("/tmp/w.log")
        );
    }
}
