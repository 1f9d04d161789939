use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::config::Config;

/// Resolves the bearer credential: explicit token first, then the token file.
///
/// A missing file means "not signed in" and yields `Ok(None)`.
pub fn load_token(config: &Config) -> Result<Option<String>> {
    if let Some(token) = &config.token {
        debug!("Using bearer token from environment");
        return Ok(Some(token.clone()));
    }
    match &config.token_file {
        Some(path) => read_token_file(path),
        None => {
            warn!("No credential configured, connecting anonymously");
            Ok(None)
        }
    }
}

fn read_token_file(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let token = contents.trim();
            if token.is_empty() {
                warn!("Credential file {} is empty", path.display());
                Ok(None)
            } else {
                Ok(Some(token.to_string()))
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("Credential file {} not found", path.display());
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("reading credential file {}", path.display())),
    }
}
