use huepair_core::{Palette, RgbColor, ToneVariant};
use huepair_library::StoredPalette;

const RESET: &str = "\x1b[0m";

fn block(color: RgbColor, width: usize, ansi: bool) -> String {
    if !ansi {
        return String::new();
    }
    format!(
        "\x1b[48;2;{};{};{}m{}{} ",
        color.r,
        color.g,
        color.b,
        " ".repeat(width),
        RESET
    )
}

/// One swatch card: block, short tone name, hex and channel values.
pub fn swatch(variant: &ToneVariant, ansi: bool) -> String {
    format!(
        "{}{:<8} {} {}",
        block(variant.rgb, 4, ansi),
        variant.tone.short_label(),
        variant.rgb.to_hex(),
        variant.rgb
    )
}

pub fn dominant_line(color: RgbColor) -> String {
    format!("HEX: {} | RGB: {}", color.to_hex(), color)
}

pub fn palette(palette: &Palette, ansi: bool) -> String {
    let mut out = format!(
        "{}{}\n",
        block(palette.dominant, 8, ansi),
        dominant_line(palette.dominant)
    );

    for group in palette.suggestions.values() {
        out.push_str(&format!("\n{} Pairing\n{}\n", group.theory, group.explanation));
        for variant in &group.colors {
            out.push_str(&format!("  {}\n", swatch(variant, ansi)));
        }
    }
    out
}

pub fn saved(palettes: &[StoredPalette], ansi: bool) -> String {
    if palettes.is_empty() {
        return "No palettes saved yet. Analyze an image with `huepair analyze --save`.\n".to_string();
    }

    let mut out = String::new();
    for stored in palettes {
        let strip: String = stored
            .palette()
            .preview_swatches()
            .into_iter()
            .map(|color| {
                if ansi {
                    block(color, 4, true)
                } else {
                    format!("{} ", color.to_hex())
                }
            })
            .collect();

        out.push_str(&format!(
            "Palette #{} from {}\n  {}\n  Dominant: {}\n",
            stored.id,
            stored.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            strip.trim_end(),
            stored.document.dominant_hex
        ));
    }
    out
}
