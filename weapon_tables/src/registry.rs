use crate::config::StatFileConfig;
use crate::ConfigError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use weapon_core::WeaponStats;

/// Registry of weapon stat blocks, merged by id
///
/// Entries keep the position of their first registration; a later entry with
/// the same id replaces the earlier one (last writer wins). This holds for
/// bulk file loading and for incremental registration alike.
#[derive(Debug, Default, Clone)]
pub struct WeaponRegistry {
    weapons: Vec<WeaponStats>,
    index: HashMap<String, usize>,
}

/// What a single registration did to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Added,
    Overwritten,
}

/// Per-source result of loading a directory of stat files
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Source names that merged successfully, in load order
    pub loaded: Vec<String>,
    /// Sources that failed; nothing from them was merged
    pub failed: Vec<(String, ConfigError)>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// One line per source, for debug output
    pub fn lines(&self) -> Vec<String> {
        self.loaded
            .iter()
            .map(|name| format!("- \"{name}\" loaded"))
            .chain(
                self.failed
                    .iter()
                    .map(|(name, error)| format!("- Failed to load \"{name}\": {error}")),
            )
            .collect()
    }
}

impl WeaponRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every stat file under a directory (recursively, in path order)
    ///
    /// A missing directory yields an empty registry. Files that fail to read,
    /// parse or validate are reported and skipped.
    pub fn load(dir: &Path) -> Result<(Self, LoadReport), ConfigError> {
        let mut registry = Self::new();
        let report = registry.load_dir(dir)?;
        Ok((registry, report))
    }

    /// Merge all stat files under a directory into this registry
    pub fn load_dir(&mut self, dir: &Path) -> Result<LoadReport, ConfigError> {
        let mut report = LoadReport::default();
        if !dir.exists() {
            return Ok(report);
        }

        let mut files = Vec::new();
        collect_stat_files(dir, &mut files, &mut report)?;
        files.sort();

        for path in files {
            let name = source_name_from_path(&path);
            match self.load_file(&path) {
                Ok(source) => report.loaded.push(source),
                Err(error) => {
                    tracing::warn!("weapon stats source {name} skipped: {error}");
                    report.failed.push((name, error));
                }
            }
        }

        Ok(report)
    }

    /// Load a single stat file, returning its source name
    pub fn load_file(&mut self, path: &Path) -> Result<String, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            error: e,
            path: Some(path.to_path_buf()),
        })?;
        self.load_str(&content, path)
    }

    /// Parse, validate and merge stat file content
    ///
    /// Either every entry of the source is merged or none is.
    pub fn load_str(&mut self, content: &str, path: &Path) -> Result<String, ConfigError> {
        let config: StatFileConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
            error: e,
            path: path.to_path_buf(),
        })?;

        config.validate().map_err(|message| ConfigError::Validation {
            message,
            path: path.to_path_buf(),
        })?;

        let name = config
            .source
            .as_ref()
            .map(|s| s.name.clone())
            .unwrap_or_else(|| source_name_from_path(path));
        self.merge(config.weapons);
        Ok(name)
    }

    /// Register a single stat block, replacing any entry with the same id
    pub fn register(&mut self, stats: WeaponStats) -> MergeOutcome {
        match self.index.get(&stats.id) {
            Some(&slot) => {
                self.weapons[slot] = stats;
                MergeOutcome::Overwritten
            }
            None => {
                self.index.insert(stats.id.clone(), self.weapons.len());
                self.weapons.push(stats);
                MergeOutcome::Added
            }
        }
    }

    /// Register many stat blocks in order
    pub fn merge(
        &mut self,
        weapons: impl IntoIterator<Item = WeaponStats>,
    ) -> Vec<(String, MergeOutcome)> {
        weapons
            .into_iter()
            .map(|stats| {
                let id = stats.id.clone();
                (id, self.register(stats))
            })
            .collect()
    }

    /// Get a stat block by item id
    pub fn get(&self, id: &str) -> Option<&WeaponStats> {
        self.index.get(id).map(|&slot| &self.weapons[slot])
    }

    /// Check if a stat block exists
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All stat blocks in registration order
    pub fn iter(&self) -> impl Iterator<Item = &WeaponStats> {
        self.weapons.iter()
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }
}

fn collect_stat_files(
    dir: &Path,
    files: &mut Vec<PathBuf>,
    report: &mut LoadReport,
) -> Result<(), ConfigError> {
    let entries = std::fs::read_dir(dir).map_err(|e| ConfigError::Io {
        error: e,
        path: Some(dir.to_path_buf()),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::Io {
            error: e,
            path: Some(dir.to_path_buf()),
        })?;
        let path = entry.path();

        if path.is_dir() {
            if let Err(error) = collect_stat_files(&path, files, report) {
                report.failed.push((source_name_from_path(&path), error));
            }
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            files.push(path);
        }
    }

    Ok(())
}

fn source_name_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
