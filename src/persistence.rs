//! Storage of the cumulative score across sessions
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Somewhere to keep the total score between sessions
pub(crate) trait ScoreStore: fmt::Debug {
    /// Read the stored total.  A store with nothing in it yet reports 0.
    fn load_total(&mut self) -> Result<u64, LoadError>;

    fn save_total(&mut self, total: u64) -> Result<(), SaveError>;
}

/// A total score kept only for the lifetime of the process
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct MemoryStore(u64);

impl ScoreStore for MemoryStore {
    fn load_total(&mut self) -> Result<u64, LoadError> {
        Ok(self.0)
    }

    fn save_total(&mut self, total: u64) -> Result<(), SaveError> {
        self.0 = total;
        Ok(())
    }
}

/// A total score stored as JSON in a file
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct TotalScoreFile {
    path: PathBuf,
}

impl TotalScoreFile {
    pub(crate) fn new(path: PathBuf) -> TotalScoreFile {
        TotalScoreFile { path }
    }
}

impl ScoreStore for TotalScoreFile {
    fn load_total(&mut self) -> Result<u64, LoadError> {
        Ok(load_json::<TotalScoreRecord>(&self.path, "total score")?
            .map_or(0, |r| r.total_score))
    }

    fn save_total(&mut self, total: u64) -> Result<(), SaveError> {
        save_json(
            &self.path,
            &TotalScoreRecord { total_score: total },
            "total score",
        )
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct TotalScoreRecord {
    total_score: u64,
}

/// Deserialize a value of type `T` from the JSON file at `path`.  Returns
/// `None` if the file does not exist.
pub(crate) fn load_json<T: DeserializeOwned>(
    path: &Path,
    what: &'static str,
) -> Result<Option<T>, LoadError> {
    let src = match fs_err::read(path) {
        Ok(src) => src,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(LoadError::read(what, e)),
    };
    serde_json::from_slice(&src)
        .map(Some)
        .map_err(|e| LoadError::deserialize(what, e))
}

/// Serialize `value` as JSON to the file at `path`, creating parent
/// directories as needed
pub(crate) fn save_json<T: Serialize>(
    path: &Path,
    value: &T,
    what: &'static str,
) -> Result<(), SaveError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent).map_err(|e| SaveError::mkdir(what, e))?;
    }
    let mut src = serde_json::to_string(value).map_err(|e| SaveError::serialize(what, e))?;
    src.push('\n');
    fs_err::write(path, &src).map_err(|e| SaveError::write(what, e))?;
    Ok(())
}

#[derive(Debug, Error)]
#[error("failed to save {what} to disk")]
pub(crate) struct SaveError {
    what: &'static str,
    #[source]
    source: SaveErrorSource,
}

impl SaveError {
    fn mkdir(what: &'static str, e: std::io::Error) -> Self {
        SaveError {
            what,
            source: SaveErrorSource::Mkdir(e),
        }
    }

    fn serialize(what: &'static str, e: serde_json::Error) -> Self {
        SaveError {
            what,
            source: SaveErrorSource::Serialize(e),
        }
    }

    fn write(what: &'static str, e: std::io::Error) -> Self {
        SaveError {
            what,
            source: SaveErrorSource::Write(e),
        }
    }
}

#[derive(Debug, Error)]
enum SaveErrorSource {
    #[error("failed to create parent directories")]
    Mkdir(#[source] std::io::Error),
    #[error("failed to serialize data")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write file")]
    Write(#[source] std::io::Error),
}

#[derive(Debug, Error)]
#[error("failed to read {what} from disk")]
pub(crate) struct LoadError {
    what: &'static str,
    #[source]
    source: LoadErrorSource,
}

impl LoadError {
    fn read(what: &'static str, e: std::io::Error) -> Self {
        LoadError {
            what,
            source: LoadErrorSource::Read(e),
        }
    }

    fn deserialize(what: &'static str, e: serde_json::Error) -> Self {
        LoadError {
            what,
            source: LoadErrorSource::Deserialize(e),
        }
    }
}

#[derive(Debug, Error)]
enum LoadErrorSource {
    #[error("failed to read file")]
    Read(#[source] std::io::Error),
    #[error("failed to deserialize data")]
    Deserialize(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_zero() {
        let tmpdir = tempdir().unwrap();
        let mut store = TotalScoreFile::new(tmpdir.path().join("total.json"));
        assert_eq!(store.load_total().unwrap(), 0);
    }

    #[test]
    fn save_then_load() {
        let tmpdir = tempdir().unwrap();
        let path = tmpdir.path().join("nested").join("total.json");
        let mut store = TotalScoreFile::new(path.clone());
        store.save_total(12_345).unwrap();
        assert_eq!(
            fs_err::read_to_string(&path).unwrap(),
            "{\"totalScore\":12345}\n"
        );
        let mut reopened = TotalScoreFile::new(path);
        assert_eq!(reopened.load_total().unwrap(), 12_345);
    }

    #[test]
    fn corrupt_file() {
        let tmpdir = tempdir().unwrap();
        let path = tmpdir.path().join("total.json");
        fs_err::write(&path, "not json").unwrap();
        let e = TotalScoreFile::new(path).load_total().unwrap_err();
        assert_eq!(e.to_string(), "failed to read total score from disk");
        assert!(
            matches!(e.source, LoadErrorSource::Deserialize(_)),
            "unexpected source: {:?}",
            e.source
        );
    }

    #[test]
    fn memory_store() {
        let mut store = MemoryStore::default();
        assert_eq!(store.load_total().unwrap(), 0);
        store.save_total(77).unwrap();
        assert_eq!(store.load_total().unwrap(), 77);
    }
}
