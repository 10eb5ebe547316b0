use std::path::{Path, PathBuf};

use log::{debug, info};

use super::{Show, ShowError};

/// The directory shows are read from. A show's identifier is its file name
/// inside this directory.
#[derive(Clone, Debug)]
pub struct ShowLibrary {
    dir: PathBuf,
}

impl ShowLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Every show file in the directory, sorted by name
    pub fn list(&self) -> Result<Vec<String>, ShowError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|source| ShowError::Io {
            name: self.dir.display().to_string(),
            source,
        })?;

        let mut names = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().to_str().map(String::from))
            .filter(|name| !name.starts_with('.'))
            .collect::<Vec<String>>();
        names.sort();

        info!("Found shows: {:?}", names);

        Ok(names)
    }

    /// Find the file behind `name`. `xmas` finds `xmas.json` when there is no
    /// file called just `xmas`.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, ShowError> {
        let path = self.dir.join(name);
        if path.is_file() {
            return Ok(path);
        }

        if Path::new(name).extension().is_none() {
            let path = self.dir.join(format!("{name}.json"));
            if path.is_file() {
                return Ok(path);
            }
        }

        Err(ShowError::NotFound {
            name: name.to_string(),
            dir: self.dir.clone(),
        })
    }

    pub fn load(&self, name: &str) -> Result<Show, ShowError> {
        let path = self.resolve(name)?;
        debug!("Loading show {} from {}", name, path.display());

        let text = std::fs::read_to_string(&path).map_err(|source| ShowError::Io {
            name: name.to_string(),
            source,
        })?;

        Show::parse(name, &text)
    }
}
