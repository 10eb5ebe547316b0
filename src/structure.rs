use std::{io, path::Path};

use common::{ShowFile, CHANNEL_COUNT, DEFAULT_INTERVAL_MS};
use log::info;

/// The shows written into a fresh shows folder
pub fn stock_shows() -> Vec<(&'static str, ShowFile)> {
    vec![
        ("chase.json", ShowFile::chase(CHANNEL_COUNT, DEFAULT_INTERVAL_MS)),
        ("flash.json", ShowFile::flash(CHANNEL_COUNT, 1000)),
        ("alternate.json", ShowFile::alternate(CHANNEL_COUNT, DEFAULT_INTERVAL_MS)),
    ]
}

pub struct FileStructure {}

impl FileStructure {
    /// Make sure the shows folder exists, and write any stock show that isn't
    /// there yet. Returns the names of the shows that were written.
    pub fn verify(shows_dir: &Path) -> io::Result<Vec<String>> {
        if !shows_dir.exists() {
            info!("Creating {}", shows_dir.display());
            std::fs::create_dir_all(shows_dir)?;
        }

        let mut written = Vec::new();

        // Existing files are never overwritten, they may have been edited
        for (name, show) in stock_shows() {
            let path = shows_dir.join(name);
            if path.exists() {
                continue;
            }

            let json = show.to_json().map_err(io::Error::from)?;
            std::fs::write(&path, json)?;
            info!("Wrote {}", path.display());
            written.push(name.to_string());
        }

        Ok(written)
    }
}
