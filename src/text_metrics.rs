//! Font-backed label measurement for hosts without their own text
//! pipeline. Resolves the style's font-family list against system fonts
//! and sums glyph advances; a flat per-character estimate covers missing
//! fonts so measurement never fails outright.

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

use crate::feature::LabelStyle;

const LINE_HEIGHT: f32 = 1.25;
// Advance applied per character when no glyph or face is available.
const FALLBACK_ADVANCE_FACTOR: f32 = 0.56;

static MEASURER: Lazy<Mutex<TextMeasurer>> = Lazy::new(|| Mutex::new(TextMeasurer::new()));

/// Pixel box of a (possibly multi-line) label rendered with `style`.
/// Suitable as a `MapHost::measure_label` implementation.
pub fn measure_label_box(text: &str, style: &LabelStyle) -> (f32, f32) {
    if text.is_empty() || style.font_size <= 0.0 {
        return (0.0, 0.0);
    }
    let mut width = 0.0f32;
    let mut lines = 0usize;
    for line in text.split('\n') {
        lines += 1;
        let line_width = measure_text_width(line, style.font_size, &style.font_family)
            .unwrap_or_else(|| line.chars().count() as f32 * style.font_size * FALLBACK_ADVANCE_FACTOR);
        width = width.max(line_width);
    }
    (width, lines.max(1) as f32 * style.font_size * LINE_HEIGHT)
}

/// Width of a single line of text, `None` when no matching face exists.
pub fn measure_text_width(text: &str, font_size: f32, font_family: &str) -> Option<f32> {
    if text.is_empty() || font_size <= 0.0 {
        return Some(0.0);
    }
    let mut guard = MEASURER.lock().ok()?;
    guard.measure(text, font_size, font_family)
}

struct TextMeasurer {
    db: Database,
    loaded_system_fonts: bool,
    faces: HashMap<String, Option<FontFace>>,
}

impl TextMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            faces: HashMap::new(),
        }
    }

    fn measure(&mut self, text: &str, font_size: f32, font_family: &str) -> Option<f32> {
        let key = normalize_family_key(font_family);
        if !self.faces.contains_key(&key) {
            let face = self.load_face(font_family);
            self.faces.insert(key.clone(), face);
        }
        let face = self.faces.get_mut(&key).and_then(|face| face.as_mut())?;
        face.measure_width(text, font_size)
    }

    fn load_face(&mut self, font_family: &str) -> Option<FontFace> {
        let mut names: Vec<String> = Vec::new();
        let mut generics: Vec<Family<'static>> = Vec::new();
        for part in font_family.split(',') {
            let raw = part.trim().trim_matches('"').trim_matches('\'');
            if raw.is_empty() {
                continue;
            }
            match raw.to_ascii_lowercase().as_str() {
                "serif" => generics.push(Family::Serif),
                "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                    generics.push(Family::SansSerif)
                }
                "monospace" | "ui-monospace" => generics.push(Family::Monospace),
                "cursive" => generics.push(Family::Cursive),
                "fantasy" => generics.push(Family::Fantasy),
                _ => names.push(raw.to_string()),
            }
        }

        let mut families: Vec<Family<'_>> = names.iter().map(|n| Family::Name(n.as_str())).collect();
        families.extend(generics);
        if families.is_empty() {
            families.push(Family::SansSerif);
        }

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        let mut loaded: Option<FontFace> = None;
        self.db.with_face_data(id, |data, index| {
            loaded = FontFace::parse(data.to_vec(), index);
        });
        loaded
    }
}

/// A resolved face with its horizontal advances in font units: ASCII
/// advances live in a flat table, everything else fills a cache on
/// demand by re-parsing the owned font data.
struct FontFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
    ascii_advances: [u16; 128],
    advance_cache: HashMap<char, u16>,
}

impl FontFace {
    fn parse(data: Vec<u8>, index: u32) -> Option<Self> {
        let face = Face::parse(&data, index).ok()?;
        let units_per_em = face.units_per_em().max(1);
        let mut ascii_advances = [0u16; 128];
        for byte in 0u8..=127 {
            if let Some(glyph) = face.glyph_index(byte as char) {
                ascii_advances[byte as usize] = face.glyph_hor_advance(glyph).unwrap_or(0);
            }
        }
        Some(Self {
            data,
            index,
            units_per_em,
            ascii_advances,
            advance_cache: HashMap::new(),
        })
    }

    fn measure_width(&mut self, text: &str, font_size: f32) -> Option<f32> {
        let scale = font_size / self.units_per_em as f32;
        let fallback = font_size * FALLBACK_ADVANCE_FACTOR;
        let mut width = 0.0f32;
        let mut reparsed: Option<Face<'_>> = None;
        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            let advance = if ch.is_ascii() {
                self.ascii_advances[ch as usize]
            } else if let Some(cached) = self.advance_cache.get(&ch) {
                *cached
            } else {
                if reparsed.is_none() {
                    reparsed = Face::parse(&self.data, self.index).ok();
                }
                let face = reparsed.as_ref()?;
                let advance = face
                    .glyph_index(ch)
                    .and_then(|glyph| face.glyph_hor_advance(glyph))
                    .unwrap_or(0);
                self.advance_cache.insert(ch, advance);
                advance
            };
            if advance == 0 {
                width += fallback;
            } else {
                width += advance as f32 * scale;
            }
        }
        Some(width.max(0.0))
    }
}

fn normalize_family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_zero_sized() {
        assert_eq!(measure_label_box("", &LabelStyle::default()), (0.0, 0.0));
    }

    #[test]
    fn height_scales_with_line_count() {
        let style = LabelStyle::default();
        let (_, one) = measure_label_box("Main Street", &style);
        let (_, two) = measure_label_box("Main Street\nBridge", &style);
        assert!((two - one * 2.0).abs() < 1e-3);
    }

    #[test]
    fn wider_text_measures_wider() {
        let style = LabelStyle::default();
        let (short, _) = measure_label_box("Elm", &style);
        let (long, _) = measure_label_box("Elm Street and Fourteenth Avenue", &style);
        assert!(long > short);
    }

    #[test]
    fn width_is_the_widest_line() {
        let style = LabelStyle::default();
        let (wide, _) = measure_label_box("Elm Street and Fourteenth Avenue", &style);
        let (stacked, _) = measure_label_box("Elm Street and Fourteenth Avenue\nElm", &style);
        assert!((wide - stacked).abs() < 1e-3);
    }
}
