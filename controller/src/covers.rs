// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::error::ErrorKind;
use anyhow::Error;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Somewhere to put cover images, returns the public URL of every upload
pub trait CoverStore {
    fn upload(&self, path: &Path) -> Result<String, Error>;
}

/// Stores covers under `<root>/covers`, served from `public_url`
#[derive(Debug, Clone)]
pub struct LocalCoverStore {
    root: PathBuf,
    public_url: String,
}

impl LocalCoverStore {
    pub fn new(root: impl Into<PathBuf>, public_url: &str) -> Self {
        Self {
            root: root.into(),
            public_url: public_url.trim_end_matches('/').to_owned(),
        }
    }
}

/// `<uuid>.<ext>`, keeping the extension of the original file if it has one
pub fn cover_file_name(original: &Path) -> String {
    let id = Uuid::new_v4();

    match original.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!("{}.{}", id, ext),
        None => id.to_string(),
    }
}

impl CoverStore for LocalCoverStore {
    fn upload(&self, path: &Path) -> Result<String, Error> {
        if !path.is_file() {
            return Err(ErrorKind::CoverUpload(path.display().to_string()).into());
        }

        let dir = self.root.join("covers");
        fs::create_dir_all(&dir)?;

        let file_name = cover_file_name(path);
        fs::copy(path, dir.join(&file_name))?;
        log::debug!("Uploaded cover {} as {}", path.display(), file_name);

        Ok(format!("{}/covers/{}", self.public_url, file_name))
    }
}
