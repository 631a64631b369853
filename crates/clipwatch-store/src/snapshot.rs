//! Snapshot file layout and lookup.
//!
//! Snapshots are named `viral_videos_{slug}_{%Y-%m-%d_%H-%M-%S}.json` under a
//! single archive directory. "Previous data" for a run is the newest file for
//! the same query slug by modification time, gated by a freshness threshold:
//! anything older is reported as absent so the whole batch scores cold.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use clipwatch_core::{Observation, ScoredObservation};

use crate::StoreError;

/// Default freshness threshold for [`SnapshotStore::load_latest`]: 7 days.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

const SNAPSHOT_PREFIX: &str = "viral_videos_";
const FILENAME_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
/// `"{%Y-%m-%d_%H-%M-%S}.json"` — fixed length, used to pin slug matches.
const TIMESTAMP_TAIL_LEN: usize = 24;

/// Append-only archive of ranked collection snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
    max_age: Duration,
}

impl SnapshotStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_max_age(root, DEFAULT_MAX_AGE)
    }

    #[must_use]
    pub fn with_max_age(root: impl Into<PathBuf>, max_age: Duration) -> Self {
        Self {
            root: root.into(),
            max_age,
        }
    }

    /// Persist one ranked batch as a new snapshot and return its path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the archive directory or file cannot be
    /// written, [`StoreError::Json`] if the batch fails to serialize.
    pub fn save(&self, query: &str, batch: &[ScoredObservation]) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.root)?;
        let timestamp = chrono::Utc::now().format(FILENAME_TIMESTAMP_FORMAT);
        let filename = format!("{SNAPSHOT_PREFIX}{}_{timestamp}.json", slugify(query));
        let path = self.root.join(filename);
        let body = serde_json::to_vec_pretty(batch).map_err(|e| StoreError::Json {
            path: path.clone(),
            source: e,
        })?;
        fs::write(&path, body)?;
        Ok(path)
    }

    /// The most recent snapshot for `query`, as plain observations ready for
    /// identity matching.
    ///
    /// Returns `Ok(None)` when no snapshot exists for the query (first run)
    /// or when the newest one is older than the freshness threshold — stale
    /// history is logged and treated as no prior data.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] on directory/file read failures and
    /// [`StoreError::Json`] when the newest snapshot does not parse.
    pub fn load_latest(&self, query: &str) -> Result<Option<Vec<Observation>>, StoreError> {
        let slug = slugify(query);
        let mut snapshots = self.snapshot_files(Some(&slug))?;
        let Some((modified, path)) = snapshots.pop() else {
            return Ok(None);
        };

        if let Ok(age) = SystemTime::now().duration_since(modified) {
            if age > self.max_age {
                tracing::warn!(
                    path = %path.display(),
                    age_days = age.as_secs() / 86_400,
                    "latest snapshot is stale — treating as no prior data"
                );
                return Ok(None);
            }
        }

        let batch = read_snapshot(&path)?;
        Ok(Some(batch))
    }

    /// All recorded observations of one video across the whole archive,
    /// oldest snapshot first. `platform` narrows the match; `None` returns
    /// every platform's records for the id.
    ///
    /// Unreadable snapshot files are skipped with a warning so one corrupt
    /// run does not hide the rest of the history.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the archive directory cannot be listed.
    pub fn history_for(
        &self,
        video_id: &str,
        platform: Option<&str>,
    ) -> Result<Vec<ScoredObservation>, StoreError> {
        let snapshots = self.snapshot_files(None)?;
        let mut history = Vec::new();
        for (_, path) in snapshots {
            let batch: Vec<ScoredObservation> = match read_snapshot(&path) {
                Ok(batch) => batch,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable snapshot");
                    continue;
                }
            };
            history.extend(batch.into_iter().filter(|rec| {
                rec.observation.video_id == video_id
                    && platform.is_none_or(|p| rec.observation.platform == p)
            }));
        }
        Ok(history)
    }

    /// Snapshot files sorted oldest-first by `(mtime, path)`.
    ///
    /// With `slug` set, only that query's snapshots match; the fixed-length
    /// timestamp tail keeps one slug from matching another it prefixes
    /// (`cat` vs `cat_videos`).
    fn snapshot_files(&self, slug: Option<&str>) -> Result<Vec<(SystemTime, PathBuf)>, StoreError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut snapshots = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(rest) = name.strip_prefix(SNAPSHOT_PREFIX) else {
                continue;
            };
            if !rest.ends_with(".json") {
                continue;
            }
            if let Some(slug) = slug {
                let tail = rest.strip_prefix(slug).and_then(|r| r.strip_prefix('_'));
                if tail.is_none_or(|t| t.len() != TIMESTAMP_TAIL_LEN) {
                    continue;
                }
            }
            let modified = entry.metadata()?.modified()?;
            snapshots.push((modified, entry.path()));
        }

        snapshots.sort();
        Ok(snapshots)
    }
}

fn read_snapshot<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let bytes = fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(|e| StoreError::Json {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Filesystem-safe slug for a query: lowercased, with every
/// non-alphanumeric character collapsed to `_`.
fn slugify(query: &str) -> String {
    query
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}
