use std::{io, path::PathBuf, time::Duration};

use common::ShowFile;
use log::debug;
use thiserror::Error;

pub mod library;
pub mod sequencer;

pub mod prelude {
    pub use super::library::ShowLibrary;
    pub use super::sequencer::{cutoff_after_hours, Sequencer, SequencerState, Tick};
    pub use super::{Frame, Show, ShowError};
}

#[derive(Debug, Error)]
pub enum ShowError {
    #[error("no show file by the name '{name}' in {}", dir.display())]
    NotFound { name: String, dir: PathBuf },
    #[error("show '{name}' is not a valid show file: {reason}")]
    Format { name: String, reason: String },
    #[error("could not read '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
}

impl ShowError {
    fn format(name: &str, reason: impl Into<String>) -> Self {
        ShowError::Format {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// One row of the show: the engaged state of each channel, by index
#[derive(Clone, Debug, PartialEq)]
pub struct Frame(Vec<bool>);

impl Frame {
    pub fn new(channels: Vec<bool>) -> Self {
        Self(channels)
    }

    pub fn channels(&self) -> &[bool] {
        &self.0
    }
}

/// A validated show. Always has at least one frame and a non-zero interval,
/// and never changes once loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct Show {
    name: String,
    frames: Vec<Frame>,
    interval: Duration,
    looping: bool,
}

impl Show {
    /// Parse and validate the text of a show file. `name` is only used to
    /// say which show is broken.
    pub fn parse(name: &str, text: &str) -> Result<Show, ShowError> {
        let file = ShowFile::from_json(text).map_err(|e| ShowError::format(name, e.to_string()))?;

        Self::from_file(name, file)
    }

    pub fn from_file(name: &str, file: ShowFile) -> Result<Show, ShowError> {
        if file.show.is_empty() {
            return Err(ShowError::format(name, "the show has no frames"));
        }

        if file.interval <= 0 {
            return Err(ShowError::format(
                name,
                format!("interval must be a positive number of milliseconds, got {}", file.interval),
            ));
        }

        let frames = file
            .show
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .map(|(channel, cell)| {
                        cell.engaged().ok_or_else(|| {
                            ShowError::format(
                                name,
                                format!("frame {row}, channel {channel}: expected 0, 1, true or false, got {cell:?}"),
                            )
                        })
                    })
                    .collect::<Result<Vec<bool>, ShowError>>()
                    .map(Frame::new)
            })
            .collect::<Result<Vec<Frame>, ShowError>>()?;

        debug!(
            "Parsed show {}: {} frames every {}ms, loop: {}",
            name,
            frames.len(),
            file.interval,
            file.looping
        );

        Ok(Show {
            name: name.to_string(),
            frames,
            interval: Duration::from_millis(file.interval as u64),
            looping: file.looping,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn looping(&self) -> bool {
        self.looping
    }
}
