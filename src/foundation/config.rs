use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::MaskResult;

/// Tunables for upload limits, brush defaults and submission downscaling.
///
/// Missing JSON fields fall back to [`Default`]; environment overrides are applied by
/// [`MaskwrightConfig::apply_env`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MaskwrightConfig {
    /// Source files larger than this are downscaled and re-encoded before submission.
    pub downscale_threshold_bytes: u64,
    /// Longest side of a downscaled source, in pixels.
    pub downscale_max_dimension: u32,
    /// JPEG quality (1-100) used when re-encoding a downscaled source.
    pub downscale_jpeg_quality: u8,
    /// Largest accepted upload, in bytes.
    pub max_upload_bytes: u64,
    /// Brush radius a new session starts with.
    pub default_brush_radius: u32,
    /// Submit masks with no edit region instead of rejecting them.
    pub allow_degenerate_mask: bool,
    /// Undo history depth, base state included. Each entry holds a display snapshot.
    pub max_history_entries: usize,
}

impl Default for MaskwrightConfig {
    fn default() -> Self {
        Self {
            downscale_threshold_bytes: 5 * 1024 * 1024,
            downscale_max_dimension: 1536,
            downscale_jpeg_quality: 85,
            max_upload_bytes: 25 * 1024 * 1024,
            default_brush_radius: 20,
            allow_degenerate_mask: false,
            max_history_entries: crate::history::stack::DEFAULT_MAX_HISTORY_ENTRIES,
        }
    }
}

impl MaskwrightConfig {
    pub fn from_path(path: &Path) -> MaskResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> MaskResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| crate::MaskError::validation(format!("invalid config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Overlay `MASKWRIGHT_*` environment variables. Values that fail to parse are ignored.
    pub fn apply_env(mut self) -> Self {
        if let Some(v) = env_parse::<u64>("MASKWRIGHT_DOWNSCALE_THRESHOLD_BYTES") {
            self.downscale_threshold_bytes = v;
        }
        if let Some(v) = env_parse::<u32>("MASKWRIGHT_DOWNSCALE_MAX_DIMENSION").filter(|&n| n > 0)
        {
            self.downscale_max_dimension = v;
        }
        if let Some(v) = env_parse::<u8>("MASKWRIGHT_JPEG_QUALITY").filter(|&q| (1..=100).contains(&q))
        {
            self.downscale_jpeg_quality = v;
        }
        if let Some(v) = env_parse::<u64>("MASKWRIGHT_MAX_UPLOAD_BYTES").filter(|&n| n > 0) {
            self.max_upload_bytes = v;
        }
        if let Some(v) = env_parse::<bool>("MASKWRIGHT_ALLOW_DEGENERATE_MASK") {
            self.allow_degenerate_mask = v;
        }
        if let Some(v) = env_parse::<usize>("MASKWRIGHT_MAX_HISTORY_ENTRIES").filter(|&n| n >= 2) {
            self.max_history_entries = v;
        }
        self
    }

    pub fn validate(&self) -> MaskResult<()> {
        if self.downscale_max_dimension == 0 {
            return Err(crate::MaskError::validation(
                "downscale_max_dimension must be > 0",
            ));
        }
        if !(1..=100).contains(&self.downscale_jpeg_quality) {
            return Err(crate::MaskError::validation(
                "downscale_jpeg_quality must be in 1..=100",
            ));
        }
        if self.max_upload_bytes == 0 {
            return Err(crate::MaskError::validation("max_upload_bytes must be > 0"));
        }
        if self.max_history_entries < 2 {
            return Err(crate::MaskError::validation(
                "max_history_entries must be >= 2",
            ));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
