//! Strategy templates: saved settings and shareable tokens.
//!
//! The store is a JSON array of [`StrategyConfig`], newest first, capped at
//! [`MAX_TEMPLATES`]. A share token is the config's JSON in URL-safe base64
//! without padding, so it can travel in a query string.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use std::path::{Path, PathBuf};
use stratlab_core::domain::StrategyConfig;
use thiserror::Error;
use tracing::debug;

pub const MAX_TEMPLATES: usize = 20;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template store I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("template JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("share token is not valid base64: {0}")]
    Token(#[from] base64::DecodeError),
}

/// File-backed list of saved strategy configurations.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    path: PathBuf,
}

impl TemplateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All saved templates, newest first. A missing file is an empty store.
    pub fn list(&self) -> Result<Vec<StrategyConfig>, TemplateError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(Vec::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    /// The most recently saved template, if any.
    pub fn latest(&self) -> Result<Option<StrategyConfig>, TemplateError> {
        Ok(self.list()?.into_iter().next())
    }

    /// Put `config` first and drop anything past [`MAX_TEMPLATES`].
    ///
    /// Returns the number of templates now stored.
    pub fn save(&self, config: &StrategyConfig) -> Result<usize, TemplateError> {
        let mut templates = self.list()?;
        templates.insert(0, config.clone());
        templates.truncate(MAX_TEMPLATES);

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| self.io_error(source))?;
        }
        let json = serde_json::to_string_pretty(&templates)?;
        std::fs::write(&self.path, json).map_err(|source| self.io_error(source))?;

        debug!(path = %self.path.display(), count = templates.len(), "saved template");
        Ok(templates.len())
    }

    fn io_error(&self, source: std::io::Error) -> TemplateError {
        TemplateError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Encode a config as a URL-safe share token.
pub fn encode_share_token(config: &StrategyConfig) -> Result<String, TemplateError> {
    let json = serde_json::to_vec(config)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Decode a share token produced by [`encode_share_token`].
pub fn decode_share_token(token: &str) -> Result<StrategyConfig, TemplateError> {
    let bytes = URL_SAFE_NO_PAD.decode(token.trim())?;
    Ok(serde_json::from_slice(&bytes)?)
}
