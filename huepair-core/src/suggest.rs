//! Palette suggestions from color theory
//!
//! The dominant color's hue is rotated to the complementary, analogous and
//! triadic positions. Each rotated hue yields three tone variants built from
//! the dominant color's own saturation and value, and each theory keeps a
//! curated subset of them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::{Hsv, RgbColor};

/// Kind of tone derived from a base hue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tone {
    #[serde(rename = "Primary Tone")]
    Primary,
    #[serde(rename = "Lighter Tone (Tint)")]
    Lighter,
    #[serde(rename = "Muted Tone (Tone)")]
    Muted,
}

impl Tone {
    pub const ALL: [Tone; 3] = [Tone::Primary, Tone::Lighter, Tone::Muted];

    pub fn label(self) -> &'static str {
        match self {
            Tone::Primary => "Primary Tone",
            Tone::Lighter => "Lighter Tone (Tint)",
            Tone::Muted => "Muted Tone (Tone)",
        }
    }

    /// First word of the label, as shown on a swatch card.
    pub fn short_label(self) -> &'static str {
        match self {
            Tone::Primary => "Primary",
            Tone::Lighter => "Lighter",
            Tone::Muted => "Muted",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A labeled swatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToneVariant {
    #[serde(rename = "type")]
    pub tone: Tone,
    pub rgb: RgbColor,
}

/// The three tones of one hue, addressed by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneSet {
    pub primary: RgbColor,
    pub lighter: RgbColor,
    pub muted: RgbColor,
}

impl ToneSet {
    pub fn get(&self, tone: Tone) -> RgbColor {
        match tone {
            Tone::Primary => self.primary,
            Tone::Lighter => self.lighter,
            Tone::Muted => self.muted,
        }
    }

    pub fn variant(&self, tone: Tone) -> ToneVariant {
        ToneVariant {
            tone,
            rgb: self.get(tone),
        }
    }

    /// Selected tones, in the order asked for.
    pub fn select<'a>(&'a self, tones: &'a [Tone]) -> impl Iterator<Item = ToneVariant> + 'a {
        tones.iter().map(move |&tone| self.variant(tone))
    }

    pub fn all(&self) -> [ToneVariant; 3] {
        Tone::ALL.map(|tone| self.variant(tone))
    }
}

/// Derive the primary, tint and tone of `hsv`.
///
/// Primary boosts saturation by 10% and value by 5%. The tint keeps 80% of
/// the saturation and lifts value by 40% (straight to full brightness when
/// value is already at least 0.8). The muted tone keeps 40% of the
/// saturation at 110% value. Every factor is capped at 1.
pub fn generate_variants(hsv: Hsv) -> ToneSet {
    let Hsv {
        hue,
        saturation: s,
        value: v,
    } = hsv;

    let lighter_value = if v < 0.8 { v * 1.4 } else { 1.0 };

    ToneSet {
        primary: Hsv::new(hue, (s * 1.1).min(1.0), (v * 1.05).min(1.0)).to_rgb(),
        lighter: Hsv::new(hue, (s * 0.8).min(1.0), lighter_value).to_rgb(),
        muted: Hsv::new(hue, (s * 0.4).min(1.0), (v * 1.1).min(1.0)).to_rgb(),
    }
}

/// A color-theory relationship to the dominant hue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Theory {
    Complementary,
    Analogous,
    Triadic,
}

impl Theory {
    pub const ALL: [Theory; 3] = [Theory::Complementary, Theory::Analogous, Theory::Triadic];

    pub fn name(self) -> &'static str {
        match self {
            Theory::Complementary => "Complementary",
            Theory::Analogous => "Analogous",
            Theory::Triadic => "Triadic",
        }
    }

    pub fn explanation(self) -> &'static str {
        match self {
            Theory::Complementary => "Provides the highest contrast and most vibrant pairing. Use the tones for varying boldness in secondary pieces.",
            Theory::Analogous => "Creates a harmonious, low-contrast, and pleasing look. Mix these tones for a rich, subtle effect.",
            Theory::Triadic => "Uses three evenly spaced hues for a balanced and colorful outfit. Focus on the Primary or Muted tones for balance.",
        }
    }

    /// Hue offsets and the tones kept at each, in display order.
    ///
    /// The asymmetric picks for analogous and triadic are a curated choice
    /// and are not derivable from the offsets.
    pub fn rotations(self) -> &'static [(f64, &'static [Tone])] {
        match self {
            Theory::Complementary => &[(180.0, &[Tone::Primary, Tone::Lighter, Tone::Muted])],
            Theory::Analogous => &[
                (30.0, &[Tone::Primary, Tone::Lighter]),
                (-30.0, &[Tone::Primary, Tone::Muted]),
            ],
            Theory::Triadic => &[
                (120.0, &[Tone::Primary, Tone::Muted]),
                (-120.0, &[Tone::Primary, Tone::Lighter]),
            ],
        }
    }
}

impl fmt::Display for Theory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Swatches for one theory with the reasoning behind them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingGroup {
    pub theory: Theory,
    pub explanation: String,
    pub colors: Vec<ToneVariant>,
}

impl PairingGroup {
    pub fn for_theory(theory: Theory, base: Hsv) -> Self {
        let mut colors = Vec::new();
        for &(offset, tones) in theory.rotations() {
            let set = generate_variants(base.rotate(offset));
            colors.extend(set.select(tones));
        }

        Self {
            theory,
            explanation: theory.explanation().to_string(),
            colors,
        }
    }
}

/// All pairing groups for a dominant color, keyed and ordered by theory.
pub fn suggest_pairings(dominant: RgbColor) -> BTreeMap<Theory, PairingGroup> {
    let base = dominant.to_hsv();
    Theory::ALL
        .into_iter()
        .map(|theory| (theory, PairingGroup::for_theory(theory, base)))
        .collect()
}

/// Result of one analysis: the dominant color and its suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub dominant: RgbColor,
    pub suggestions: BTreeMap<Theory, PairingGroup>,
}

impl Palette {
    pub fn analyze(dominant: RgbColor) -> Self {
        Self {
            dominant,
            suggestions: suggest_pairings(dominant),
        }
    }

    pub fn dominant_hex(&self) -> String {
        self.dominant.to_hex()
    }

    pub fn group(&self, theory: Theory) -> Option<&PairingGroup> {
        self.suggestions.get(&theory)
    }

    /// Dominant color followed by the first swatch of every group.
    pub fn preview_swatches(&self) -> Vec<RgbColor> {
        std::iter::once(self.dominant)
            .chain(
                self.suggestions
                    .values()
                    .filter_map(|group| group.colors.first().map(|variant| variant.rgb)),
            )
            .collect()
    }
}
