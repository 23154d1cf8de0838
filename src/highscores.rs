//! High score leaderboard
//!
//! Persisted as a JSON object mapping player name to best score. A missing or
//! unreadable file is treated as an empty table.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::consts::MAX_NAME_LEN;

/// Name used when a submission has an empty name
pub const DEFAULT_NAME: &str = "PLAYER";

/// Errors raised while persisting the leaderboard
#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
    #[error("failed to write leaderboard {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode leaderboard: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Name → best score table backed by a file
#[derive(Debug, Clone)]
pub struct Leaderboard {
    path: PathBuf,
    max_name_len: usize,
    scores: BTreeMap<String, u64>,
}

impl Leaderboard {
    /// Create an empty leaderboard that will save to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_name_len: MAX_NAME_LEN,
            scores: BTreeMap::new(),
        }
    }

    /// Limit stored names to `max_name_len` characters
    pub fn with_max_name_len(mut self, max_name_len: usize) -> Self {
        self.max_name_len = max_name_len.max(1);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load from `path`. Missing or malformed files yield an empty table.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let mut board = Self::new(path);

        let json = match fs::read_to_string(&board.path) {
            Ok(json) => json,
            Err(_) => {
                log::info!(
                    "No high scores at {}, starting fresh",
                    board.path.display()
                );
                return board;
            }
        };

        match serde_json::from_str::<BTreeMap<String, u64>>(&json) {
            Ok(scores) => {
                log::info!("Loaded {} high scores", scores.len());
                board.scores = scores;
            }
            Err(err) => {
                log::warn!(
                    "Ignoring malformed high scores at {}: {}",
                    board.path.display(),
                    err
                );
            }
        }

        board
    }

    /// Rewrite the whole file (temp file + rename)
    pub fn save(&self) -> Result<(), LeaderboardError> {
        let json = serde_json::to_string_pretty(&self.scores)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|source| LeaderboardError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| LeaderboardError::Io {
            path: self.path.clone(),
            source,
        })?;

        log::info!("High scores saved ({} entries)", self.scores.len());
        Ok(())
    }

    /// Record a score and persist the table.
    ///
    /// With `overwrite` the stored score is replaced; otherwise the best of
    /// the old and new score is kept. Returns the name actually stored.
    pub fn submit(
        &mut self,
        name: &str,
        score: u64,
        overwrite: bool,
    ) -> Result<String, LeaderboardError> {
        let name = self.sanitize_name(name);
        self.record(&name, score, overwrite);
        self.save()?;
        Ok(name)
    }

    fn record(&mut self, name: &str, score: u64, overwrite: bool) {
        match self.scores.get_mut(name) {
            Some(best) if !overwrite => *best = (*best).max(score),
            Some(best) => *best = score,
            None => {
                self.scores.insert(name.to_string(), score);
            }
        }
    }

    fn sanitize_name(&self, name: &str) -> String {
        let trimmed = name.trim();
        let name = if trimmed.is_empty() { DEFAULT_NAME } else { trimmed };
        name.chars().take(self.max_name_len).collect()
    }

    /// Best score stored for `name`
    pub fn best(&self, name: &str) -> Option<u64> {
        self.scores.get(name).copied()
    }

    /// Top `n` entries, highest score first (ties by name)
    pub fn top(&self, n: usize) -> Vec<(String, u64)> {
        let mut entries: Vec<(String, u64)> = self
            .scores
            .iter()
            .map(|(name, score)| (name.clone(), *score))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries.truncate(n);
        entries
    }

    /// Rank a score would take if submitted now (1-indexed)
    pub fn rank_of(&self, score: u64) -> usize {
        self.scores.values().filter(|&&s| s > score).count() + 1
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.scores.values().copied().max()
    }
}
