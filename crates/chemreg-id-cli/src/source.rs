use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chemreg_id::{IdentifierFormat, IdentifierSource};

/// Persisted identifiers exported to a text file, one per line.
///
/// The file is re-read on every scan. Blank lines and surrounding whitespace
/// are ignored; anything else is handed to the allocator, which drops what
/// does not verify.
#[derive(Debug, Clone)]
pub struct FileIdentifierSource {
    path: PathBuf,
}

impl FileIdentifierSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IdentifierSource for FileIdentifierSource {
    type Err = io::Error;

    fn identifiers(
        &self,
        _format: &IdentifierFormat,
    ) -> Result<impl IntoIterator<Item = String>, Self::Err> {
        let contents = fs::read_to_string(&self.path)
            .map_err(|err| io::Error::new(err.kind(), format!("{}: {err}", self.path.display())))?;
        Ok(contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect::<Vec<_>>())
    }
}
