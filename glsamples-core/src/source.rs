//! Shader source files.
//!
//! Sources are read whole into an owned [`String`]. A file that cannot be
//! opened, is empty, or is not text is an error; nothing is handed to the
//! compiler in that case.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("cannot open shader file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("shader file {} is empty", .0.display())]
    Empty(PathBuf),
    #[error("shader file {} is not valid UTF-8", .0.display())]
    NotUtf8(PathBuf),
}

/// The text of one shader file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    path: PathBuf,
    text: String,
}

impl ShaderSource {
    /// Reads a shader file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        let bytes = std::fs::read(&path).map_err(|source| SourceError::Open {
            path: path.clone(),
            source,
        })?;
        let text = String::from_utf8(bytes).map_err(|_| SourceError::NotUtf8(path.clone()))?;
        if text.trim().is_empty() {
            return Err(SourceError::Empty(path));
        }
        log::debug!("read {} bytes of shader text from {}", text.len(), path.display());
        Ok(Self { path, text })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// File names of a vertex/fragment pair, relative to a sample's asset directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageFiles {
    pub vertex: &'static str,
    pub fragment: &'static str,
}

/// Both sources of a vertex/fragment pair.
#[derive(Debug, Clone)]
pub struct ShaderPair {
    pub vertex: ShaderSource,
    pub fragment: ShaderSource,
}

impl ShaderPair {
    /// Loads the vertex file, then the fragment file, from `dir`.
    pub fn load(dir: &Path, files: StageFiles) -> Result<Self, SourceError> {
        Ok(Self {
            vertex: ShaderSource::load(dir.join(files.vertex))?,
            fragment: ShaderSource::load(dir.join(files.fragment))?,
        })
    }
}
