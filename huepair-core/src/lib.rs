//! # huepair-core
//!
//! Dominant color extraction and color-theory pairings.
//!
//! An image is reduced to one representative color, and that color is
//! turned into complementary, analogous and triadic swatch groups, each
//! made of named tone variants.
//!
//! ```rust,no_run
//! use huepair_core::{load_image, extract_dominant_color, Palette};
//! use std::path::Path;
//!
//! let img = load_image(Path::new("outfit.jpg"))?;
//! let palette = Palette::analyze(extract_dominant_color(&img));
//! println!("dominant {}", palette.dominant_hex());
//! # Ok::<(), huepair_core::AnalysisError>(())
//! ```

pub mod color;
pub mod config;
pub mod error;
pub mod extract;
pub mod image_loader;
pub mod suggest;

pub use color::{hsv_to_rgb, rgb_to_hex, rgb_to_hsv, Hsv, RgbColor};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, Result};
pub use extract::{
    dominant_color, extract_dominant_color, sample_dominant, DominantSample, FALLBACK_GRAY,
};
pub use image_loader::{load_image, load_image_from_memory};
pub use suggest::{
    generate_variants, suggest_pairings, PairingGroup, Palette, Theory, Tone, ToneSet,
    ToneVariant,
};
