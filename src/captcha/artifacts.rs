//! Local CAPTCHA dumps for operator inspection.
//!
//! Writes are best-effort: failures are logged and otherwise ignored, so a
//! read-only filesystem never breaks a fetch.

use std::path::PathBuf;

use crate::config::DebugArtifactsConfig;

/// Writes the latest CAPTCHA as an HTML wrapper and a raw image.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    html_path: PathBuf,
    image_path: PathBuf,
}

impl ArtifactWriter {
    /// Build a writer, or `None` when artifacts are disabled.
    pub fn from_config(config: &DebugArtifactsConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        Some(Self {
            html_path: config.directory.join(&config.html_file),
            image_path: config.directory.join(&config.image_file),
        })
    }

    /// Overwrite both files. Never fails.
    pub async fn write(&self, data_uri: &str, image: &[u8]) {
        let html = format!(r#"<img src="{data_uri}" alt="captcha">"#);

        if let Err(e) = tokio::fs::write(&self.html_path, html).await {
            tracing::warn!(path = %self.html_path.display(), error = %e, "Could not write CAPTCHA html");
        }
        if let Err(e) = tokio::fs::write(&self.image_path, image).await {
            tracing::warn!(path = %self.image_path.display(), error = %e, "Could not write CAPTCHA image");
        }
    }
}
