//! Ranking of players by cumulative score
use crate::consts;
use crate::persistence::{load_json, save_json, LoadError, SaveError};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub(crate) struct Entry {
    pub(crate) name: String,
    pub(crate) score: u64,
}

pub(crate) trait Leaderboard: fmt::Debug {
    /// Return the current standings, best first
    fn fetch(&mut self) -> Result<Vec<Entry>, LeaderboardError>;

    /// Record `total` as the cumulative score for `name` and return the
    /// updated standings
    fn submit(&mut self, name: &str, total: u64) -> Result<Vec<Entry>, LeaderboardError>;
}

/// A leaderboard kept in a JSON file on the local machine
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct LocalLeaderboard {
    path: PathBuf,
}

impl LocalLeaderboard {
    pub(crate) fn new(path: PathBuf) -> LocalLeaderboard {
        LocalLeaderboard { path }
    }
}

impl Leaderboard for LocalLeaderboard {
    fn fetch(&mut self) -> Result<Vec<Entry>, LeaderboardError> {
        Ok(load_json(&self.path, "leaderboard")?.unwrap_or_default())
    }

    fn submit(&mut self, name: &str, total: u64) -> Result<Vec<Entry>, LeaderboardError> {
        let entries = rank(self.fetch()?, name, total);
        save_json(&self.path, &entries, "leaderboard")?;
        Ok(entries)
    }
}

/// Insert or update `name`'s entry, then order the entries by descending
/// score (ties broken by name) and keep only the best
/// [`LEADERBOARD_SIZE`][consts::LEADERBOARD_SIZE].
///
/// A player's recorded score never goes down.
fn rank(mut entries: Vec<Entry>, name: &str, total: u64) -> Vec<Entry> {
    if let Some(entry) = entries.iter_mut().find(|e| e.name == name) {
        entry.score = entry.score.max(total);
    } else {
        entries.push(Entry {
            name: name.to_owned(),
            score: total,
        });
    }
    entries.sort_by(|a, b| {
        (Reverse(a.score), &a.name).cmp(&(Reverse(b.score), &b.name))
    });
    entries.truncate(consts::LEADERBOARD_SIZE);
    entries
}

#[derive(Debug, Error)]
pub(crate) enum LeaderboardError {
    #[error("failed to fetch leaderboard")]
    Fetch(#[from] LoadError),
    #[error("failed to submit score to leaderboard")]
    Submit(#[from] SaveError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entry(name: &str, score: u64) -> Entry {
        Entry {
            name: name.to_owned(),
            score,
        }
    }

    #[test]
    fn rank_inserts_and_orders() {
        let entries = vec![entry("alice", 300), entry("bob", 100)];
        assert_eq!(
            rank(entries, "carol", 200),
            [entry("alice", 300), entry("carol", 200), entry("bob", 100)]
        );
    }

    #[test]
    fn rank_updates_existing_player() {
        let entries = vec![entry("alice", 300), entry("bob", 100)];
        assert_eq!(
            rank(entries, "bob", 450),
            [entry("bob", 450), entry("alice", 300)]
        );
    }

    #[test]
    fn rank_never_lowers_score() {
        let entries = vec![entry("alice", 300)];
        assert_eq!(rank(entries, "alice", 10), [entry("alice", 300)]);
    }

    #[test]
    fn rank_ties_by_name() {
        let entries = vec![entry("zed", 50), entry("amy", 50)];
        assert_eq!(
            rank(entries, "max", 50),
            [entry("amy", 50), entry("max", 50), entry("zed", 50)]
        );
    }

    #[test]
    fn rank_keeps_best() {
        let entries = (1..=10)
            .map(|i| entry(&format!("p{i:02}"), i * 10))
            .collect::<Vec<_>>();
        let ranked = rank(entries, "newcomer", 55);
        assert_eq!(ranked.len(), consts::LEADERBOARD_SIZE);
        assert_eq!(ranked[0], entry("p10", 100));
        assert_eq!(ranked[5], entry("newcomer", 55));
        assert_eq!(ranked[9], entry("p02", 20));
        let ranked = rank(ranked, "straggler", 1);
        assert!(
            !ranked.iter().any(|e| e.name == "straggler"),
            "low score should not make the board"
        );
    }

    #[test]
    fn local_file() {
        let tmpdir = tempdir().unwrap();
        let path = tmpdir.path().join("leaderboard.json");
        let mut board = LocalLeaderboard::new(path.clone());
        assert_eq!(board.fetch().unwrap(), []);
        assert_eq!(board.submit("alice", 40).unwrap(), [entry("alice", 40)]);
        assert_eq!(
            board.submit("bob", 90).unwrap(),
            [entry("bob", 90), entry("alice", 40)]
        );
        let mut reopened = LocalLeaderboard::new(path);
        assert_eq!(
            reopened.fetch().unwrap(),
            [entry("bob", 90), entry("alice", 40)]
        );
    }

    #[test]
    fn corrupt_file() {
        let tmpdir = tempdir().unwrap();
        let path = tmpdir.path().join("leaderboard.json");
        fs_err::write(&path, "{\"not\": \"a list\"}").unwrap();
        let mut board = LocalLeaderboard::new(path);
        assert!(
            matches!(board.submit("alice", 1), Err(LeaderboardError::Fetch(_))),
            "corrupt file should fail to load"
        );
    }
}
