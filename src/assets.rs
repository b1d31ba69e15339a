//! Logo and stadium images. A missing image only costs the overlay that uses it.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assets {
    pub logo: PathBuf,
    pub stadium: PathBuf,
}

impl Assets {
    pub fn new(logo: impl Into<PathBuf>, stadium: impl Into<PathBuf>) -> Self {
        Self {
            logo: logo.into(),
            stadium: stadium.into(),
        }
    }

    pub fn logo(&self) -> Result<&Path> {
        locate("logo", &self.logo)
    }

    pub fn stadium(&self) -> Result<&Path> {
        locate("stadium", &self.stadium)
    }
}

/// Callers decide how loudly to report a miss.
fn locate<'p>(kind: &'static str, path: &'p Path) -> Result<&'p Path> {
    if path.is_file() {
        return Ok(path);
    }
    Err(Error::AssetMissing {
        kind,
        path: path.display().to_string(),
    })
}
