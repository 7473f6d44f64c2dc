//! Tunable parameters for dominant color sampling.
//!
//! Defaults reproduce the stock sampler: a 100x100 resample, every 16th
//! pixel, and background rejection for transparent, near-white and
//! near-black pixels. Configuration can be loaded from JSON; missing
//! fields fall back to their defaults.
//!
//! ```no_run
//! use huepair_core::AnalysisConfig;
//! use std::path::Path;
//!
//! let config = AnalysisConfig::from_json_file(Path::new("analysis.json"))?;
//! # Ok::<(), huepair_core::AnalysisError>(())
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

pub const DEFAULT_SAMPLE_SIZE: u32 = 100;
pub const DEFAULT_SAMPLE_STRIDE: usize = 16;
pub const DEFAULT_MIN_ALPHA: u8 = 50;
pub const DEFAULT_WHITE_THRESHOLD: u8 = 240;
pub const DEFAULT_BLACK_THRESHOLD: u8 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Edge length of the square the image is resampled to
    pub sample_size: u32,

    /// Visit every n-th pixel of the flattened sample
    pub sample_stride: usize,

    /// Pixels with alpha below this are skipped
    pub min_alpha: u8,

    /// Pixels with every channel above this are skipped as background white
    pub white_threshold: u8,

    /// Pixels with every channel below this are skipped as shadow
    pub black_threshold: u8,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            sample_stride: DEFAULT_SAMPLE_STRIDE,
            min_alpha: DEFAULT_MIN_ALPHA,
            white_threshold: DEFAULT_WHITE_THRESHOLD,
            black_threshold: DEFAULT_BLACK_THRESHOLD,
        }
    }
}

impl AnalysisConfig {
    /// Copy with zero sizes raised to 1.
    pub fn normalized(&self) -> Self {
        Self {
            sample_size: self.sample_size.max(1),
            sample_stride: self.sample_stride.max(1),
            ..self.clone()
        }
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::config(format!("cannot read {}", path.display()), e)
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            AnalysisError::config(format!("cannot parse {}", path.display()), e)
        })?;
        Ok(config.normalized())
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AnalysisError::config("cannot serialize configuration", e))?;
        std::fs::write(path, json).map_err(|e| {
            AnalysisError::config(format!("cannot write {}", path.display()), e)
        })?;
        Ok(())
    }
}
