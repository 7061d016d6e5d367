//! Lifecycle notifications for an embedding host
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;

/// A lifecycle event reported to the host
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub(crate) enum HostEvent {
    /// The program has started up and is ready to play
    Ready,
    /// The program would like as much screen space as the host can give it
    Expand,
    /// A run has ended
    GameOver {
        score: u32,
        #[serde(rename = "totalScore")]
        total_score: u64,
    },
}

pub(crate) trait HostShell: fmt::Debug {
    fn send(&mut self, event: HostEvent) -> Result<(), HostError>;
}

/// A host that receives events as JSON lines appended to a file
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct EventFile {
    path: PathBuf,
}

impl EventFile {
    pub(crate) fn new(path: PathBuf) -> EventFile {
        EventFile { path }
    }
}

impl HostShell for EventFile {
    fn send(&mut self, event: HostEvent) -> Result<(), HostError> {
        let mut line = serde_json::to_string(&event)?;
        line.push('\n');
        let mut fp = fs_err::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        fp.write_all(line.as_bytes())?;
        Ok(())
    }
}

#[derive(Debug, Error)]
pub(crate) enum HostError {
    #[error("failed to serialize host event")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write host event")]
    Write(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::tempdir;

    #[rstest]
    #[case(HostEvent::Ready, r#"{"action":"ready"}"#)]
    #[case(HostEvent::Expand, r#"{"action":"expand"}"#)]
    #[case(
        HostEvent::GameOver { score: 120, total_score: 3456 },
        r#"{"action":"gameOver","score":120,"totalScore":3456}"#
    )]
    fn event_json(#[case] event: HostEvent, #[case] json: &str) {
        assert_eq!(serde_json::to_string(&event).unwrap(), json);
    }

    #[test]
    fn appends_lines() {
        let tmpdir = tempdir().unwrap();
        let path = tmpdir.path().join("events.jsonl");
        let mut host = EventFile::new(path.clone());
        host.send(HostEvent::Ready).unwrap();
        host.send(HostEvent::GameOver {
            score: 5,
            total_score: 5,
        })
        .unwrap();
        assert_eq!(
            fs_err::read_to_string(&path).unwrap(),
            concat!(
                "{\"action\":\"ready\"}\n",
                "{\"action\":\"gameOver\",\"score\":5,\"totalScore\":5}\n",
            )
        );
    }

    #[test]
    fn unwritable_path() {
        let tmpdir = tempdir().unwrap();
        let mut host = EventFile::new(tmpdir.path().join("missing").join("events.jsonl"));
        assert!(
            matches!(host.send(HostEvent::Expand), Err(HostError::Write(_))),
            "writing into a missing directory should fail"
        );
    }
}
