use std::path::{Path, PathBuf};

use huepair_core::{
    load_image, sample_dominant, AnalysisConfig, AnalysisError, DominantSample, Palette,
};
use huepair_library::{LibraryError, PaletteLibrary, Scope, StoredPalette};
use image::DynamicImage;
use log::{debug, warn};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Please upload an image first.")]
    NoImage,

    #[error("No palette analyzed yet.")]
    NothingToSave,

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Failed to save palette: {0}")]
    Library(#[from] LibraryError),
}

impl SessionError {
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Analysis(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

/// Result of analysing the loaded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub palette: Palette,
    pub sample: DominantSample,
}

impl Analysis {
    /// True when no pixel survived filtering and the neutral gray stood in.
    pub fn used_fallback(&self) -> bool {
        self.sample.color.is_none()
    }
}

struct LoadedImage {
    path: PathBuf,
    image: DynamicImage,
}

/// The image being worked on and what was last computed from it.
pub struct Session {
    config: AnalysisConfig,
    image: Option<LoadedImage>,
    current: Option<Analysis>,
}

impl Session {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            image: None,
            current: None,
        }
    }

    /// Decode `path` and make it the current image.
    pub fn load(&mut self, path: &Path) -> Result<(), SessionError> {
        let image = load_image(path)?;
        self.set_image(path.to_path_buf(), image);
        Ok(())
    }

    /// Use an image decoded elsewhere. Any previous analysis is discarded.
    pub fn set_image(&mut self, path: PathBuf, image: DynamicImage) {
        debug!("session image set to {}", path.display());
        self.image = Some(LoadedImage { path, image });
        self.current = None;
    }

    pub fn image_path(&self) -> Option<&Path> {
        self.image.as_ref().map(|loaded| loaded.path.as_path())
    }

    pub fn analyze(&mut self) -> Result<&Analysis, SessionError> {
        let loaded = self.image.as_ref().ok_or(SessionError::NoImage)?;
        let sample = sample_dominant(&loaded.image, &self.config);
        if sample.color.is_none() {
            warn!(
                "no usable pixels in {}, using neutral gray",
                loaded.path.display()
            );
        }
        let palette = Palette::analyze(sample.color_or_fallback());
        Ok(self.current.insert(Analysis { palette, sample }))
    }

    pub fn save(
        &self,
        library: &PaletteLibrary,
        scope: &Scope,
    ) -> Result<StoredPalette, SessionError> {
        let analysis = self.current.as_ref().ok_or(SessionError::NothingToSave)?;
        Ok(library.put(scope, &analysis.palette)?)
    }
}
