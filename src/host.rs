//! The host side of the editor: owns the profile collection and accepts
//! whole-collection replacements as the only way to change it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{DaySet, NodeKind, ProfileCollection, ProfileData};

const STORE_VERSION: u32 = 1;

pub trait ProfileHost {
    fn profiles(&self) -> &ProfileCollection;

    /// Commit a complete replacement of the collection
    fn on_change_profiles(&mut self, profiles: ProfileCollection) -> Result<()>;

    /// Which profile the detail editor shows. Never changes the collection.
    fn on_select_profile(&mut self, id: Option<&str>);

    fn selected(&self) -> Option<&str>;
}

/// Keeps everything in memory
#[derive(Debug, Default)]
pub struct MemoryHost {
    profiles: ProfileCollection,
    selected: Option<String>,
    commits: usize,
}

impl MemoryHost {
    pub fn new(profiles: ProfileCollection) -> Self {
        Self {
            profiles,
            selected: None,
            commits: 0,
        }
    }

    #[cfg(test)]
    fn commits(&self) -> usize {
        self.commits
    }

    /// A small heating tree to try the editor without touching the profile store
    pub fn demo(defaults: &ProfileData) -> Result<Self> {
        let profiles = ProfileCollection::default();
        let (profiles, heating) = profiles.add_child("", NodeKind::Folder, "Heating")?;
        let (profiles, upstairs) = profiles.add_child(&heating, NodeKind::Folder, "Upstairs")?;
        let (profiles, _) = profiles.add_child_with(&heating, NodeKind::Profile, "Living room", defaults.clone())?;

        let weekend = ProfileData {
            days_of_week: DaySet::from_days([0, 6]),
            ..defaults.clone()
        };
        let (profiles, _) = profiles.add_child_with(&upstairs, NodeKind::Profile, "Bedroom weekend", weekend)?;
        let (profiles, _) = profiles.add_child_with("", NodeKind::Profile, "Garage", defaults.clone())?;
        Ok(Self::new(profiles))
    }
}

impl ProfileHost for MemoryHost {
    fn profiles(&self) -> &ProfileCollection {
        &self.profiles
    }

    fn on_change_profiles(&mut self, profiles: ProfileCollection) -> Result<()> {
        self.profiles = profiles;
        self.commits += 1;
        tracing::debug!(commits = self.commits, "in-memory profiles replaced");
        Ok(())
    }

    fn on_select_profile(&mut self, id: Option<&str>) {
        self.selected = id.map(str::to_string);
    }

    fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    #[serde(default)]
    profiles: ProfileCollection,
}

/// Persists the collection as pretty JSON after every commit
#[derive(Debug)]
pub struct FileHost {
    path: PathBuf,
    profiles: ProfileCollection,
    selected: Option<String>,
}

impl FileHost {
    /// Open the store at `path`; a missing file starts an empty collection
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let profiles = if path.exists() {
            load_profiles(&path)?
        } else {
            tracing::info!(path = %path.display(), "no profile store yet, starting empty");
            ProfileCollection::default()
        };

        for problem in profiles.validate() {
            tracing::warn!(path = %path.display(), %problem, "stored profiles violate an invariant");
        }

        Ok(Self {
            path,
            profiles,
            selected: None,
        })
    }
}

impl ProfileHost for FileHost {
    fn profiles(&self) -> &ProfileCollection {
        &self.profiles
    }

    fn on_change_profiles(&mut self, profiles: ProfileCollection) -> Result<()> {
        save_profiles(&self.path, &profiles)?;
        tracing::debug!(path = %self.path.display(), nodes = profiles.len(), "profiles committed");
        self.profiles = profiles;
        Ok(())
    }

    fn on_select_profile(&mut self, id: Option<&str>) {
        self.selected = id.map(str::to_string);
    }

    fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }
}

pub fn load_profiles(path: &Path) -> Result<ProfileCollection> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("unable to read profile store {}", path.display()))?;
    parse_profiles_text(&content)
}

pub fn parse_profiles_text(content: &str) -> Result<ProfileCollection> {
    let raw = serde_json::from_str::<StoreFile>(content).map_err(|err| {
        let line = err.line();
        let column = err.column();
        anyhow::anyhow!("invalid JSON at line {line}, column {column}: {err}")
    })?;

    if raw.version != STORE_VERSION {
        bail!(
            "unsupported profile store version {}; expected version {}",
            raw.version,
            STORE_VERSION
        );
    }
    Ok(raw.profiles)
}

pub fn save_profiles(path: &Path, profiles: &ProfileCollection) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("unable to create {}", parent.display()))?;
    }
    let store = StoreFile {
        version: STORE_VERSION,
        profiles: profiles.clone(),
    };
    let text = serde_json::to_string_pretty(&store)?;
    fs::write(path, format!("{text}\n"))
        .with_context(|| format!("unable to write profile store {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_store_starts_empty() {
        let dir = tempdir().expect("tempdir");
        let host = FileHost::open(dir.path().join("profiles.json")).expect("open");
        assert!(host.profiles().is_empty());
        assert_eq!(host.selected(), None);
    }

    #[test]
    fn commits_are_written_and_reloaded() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("profiles.json");
        let mut host = FileHost::open(&path).expect("open");

        let (profiles, folder) = host
            .profiles()
            .add_child("", NodeKind::Folder, "Heating")
            .expect("root folder");
        let (profiles, _) = profiles
            .add_child(&folder, NodeKind::Profile, "Weekdays")
            .expect("child profile");
        host.on_change_profiles(profiles.clone()).expect("commit");

        let reopened = FileHost::open(&path).expect("reopen");
        assert_eq!(reopened.profiles(), &profiles);
    }

    #[test]
    fn rejects_unknown_version() {
        let err = parse_profiles_text(r#"{ "version": 2, "profiles": [] }"#)
            .expect_err("version 2 is unsupported");
        assert!(err.to_string().contains("unsupported profile store version"));
    }

    #[test]
    fn malformed_json_reports_position() {
        let err = parse_profiles_text("{ nope").expect_err("invalid json");
        assert!(err.to_string().contains("invalid JSON at line 1"));
    }

    #[test]
    fn demo_tree_is_consistent() {
        let host = MemoryHost::demo(&ProfileData::default()).expect("demo tree");
        assert_eq!(host.profiles().len(), 5);
        assert!(host.profiles().validate().is_empty());
        assert_eq!(host.commits(), 0);
    }

    #[test]
    fn memory_host_tracks_selection_and_commits() {
        let mut host = MemoryHost::default();
        host.on_select_profile(Some("p1"));
        assert_eq!(host.selected(), Some("p1"));
        host.on_change_profiles(ProfileCollection::default()).expect("commit");
        assert_eq!(host.commits(), 1);
        host.on_select_profile(None);
        assert_eq!(host.selected(), None);
    }
}
