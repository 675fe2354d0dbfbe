//! Session recording. A recording is one RON value per line: a
//! [`RecordHeader`] followed by every [`Event`] in the order it was handled.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{Event, Reactor};
use crate::common::config::Config;
use crate::model::preferences::LayoutPreferences;
use crate::model::store::MemoryStore;
use crate::sys::geometry::Size;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("could not open recording {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not read recording")]
    Read(#[from] io::Error),
    #[error("recording has no header")]
    Empty,
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("could not encode recording entry")]
    Encode(#[from] ron::Error),
}

/// Everything needed to rebuild the session the events were recorded in.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RecordHeader {
    pub config: Config,
    pub viewport: Size,
    pub preferences: LayoutPreferences,
}

pub struct Record {
    file: Option<BufWriter<File>>,
}

impl Record {
    pub fn disabled() -> Self { Record { file: None } }

    pub fn new(path: &Path) -> Result<Self, ReplayError> {
        let file = File::create(path)
            .map_err(|source| ReplayError::Open { path: path.to_path_buf(), source })?;
        info!(path = %path.display(), "recording session");
        Ok(Record { file: Some(BufWriter::new(file)) })
    }

    pub fn is_enabled(&self) -> bool { self.file.is_some() }

    pub(super) fn start(&mut self, config: &Config, viewport: Size, preferences: &LayoutPreferences) {
        let header = RecordHeader {
            config: config.clone(),
            viewport,
            preferences: preferences.clone(),
        };
        self.write_line(&header);
    }

    pub(super) fn on_event(&mut self, event: &Event) { self.write_line(event); }

    fn write_line<T: Serialize>(&mut self, value: &T) {
        let Some(file) = self.file.as_mut() else { return };
        if let Err(e) = write_entry(file, value) {
            warn!(error = %e, "recording failed; no further events will be recorded");
            self.file = None;
        }
    }
}

fn write_entry<T: Serialize>(file: &mut BufWriter<File>, value: &T) -> Result<(), ReplayError> {
    let line = ron::to_string(value)?;
    writeln!(file, "{line}")?;
    file.flush()?;
    Ok(())
}

/// Replays the recording at `path` into a fresh reactor backed by an
/// in-memory store.
pub fn replay(path: &Path) -> Result<Reactor, ReplayError> {
    let file =
        File::open(path).map_err(|source| ReplayError::Open { path: path.to_path_buf(), source })?;
    replay_from(BufReader::new(file))
}

pub fn replay_from(reader: impl BufRead) -> Result<Reactor, ReplayError> {
    let mut lines = reader.lines().enumerate().filter_map(|(i, line)| match line {
        Ok(line) if line.trim().is_empty() => None,
        other => Some((i + 1, other)),
    });

    let (line_no, header) = lines.next().ok_or(ReplayError::Empty)?;
    let header: RecordHeader = ron::from_str(&header?)
        .map_err(|source| ReplayError::Parse { line: line_no, source })?;

    let mut store = MemoryStore::new();
    if let Err(e) = header.preferences.save(&mut store) {
        warn!(error = %e, "could not seed preferences for replay");
    }
    let mut reactor =
        Reactor::new(header.config, header.viewport, Box::new(store), Record::disabled());

    let mut count = 0;
    for (line_no, line) in lines {
        let event: Event =
            ron::from_str(&line?).map_err(|source| ReplayError::Parse { line: line_no, source })?;
        let _ = reactor.handle_event(event);
        count += 1;
    }
    debug!(events = count, "replay finished");
    Ok(reactor)
}
