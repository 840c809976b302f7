//! Design-token extraction from raw CSS and HTML.
//!
//! The extractor is a pure function of its input text: it scans for color
//! literals and `font-family` declarations, normalizes what it finds, and
//! ranks by occurrence count. Ties keep first-seen order, so the same input
//! always yields the same ranking.

use regex::Regex;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Number of colors kept in the ranked summary.
pub const MAX_COLORS: usize = 10;
/// Number of font families kept in the ranked summary.
pub const MAX_FONTS: usize = 5;
/// External stylesheets fetched per page.
pub const MAX_STYLESHEETS: usize = 3;

/// Colors used for the CSS-variable and Tailwind snippets.
const SNIPPET_COLORS: usize = 5;
const PROMPT_COLORS: usize = 3;
const PROMPT_FONTS: usize = 2;

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorToken {
    /// `#RRGGBB`, uppercase.
    pub hex: String,
    pub name: String,
    pub count: usize,
    pub usage: String,
}

impl ColorToken {
    fn new(hex: String, count: usize) -> Self {
        let name = color_name(&hex).to_string();
        Self {
            hex,
            name,
            count,
            usage: usage_label(count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontToken {
    pub font_family: String,
    pub count: usize,
    pub usage: String,
}

impl FontToken {
    fn new(font_family: String, count: usize) -> Self {
        Self {
            font_family,
            count,
            usage: usage_label(count),
        }
    }
}

/// Ranked palette plus the boilerplate generated from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeTokens {
    pub colors: Vec<ColorToken>,
    pub fonts: Vec<FontToken>,
    pub tailwind_config: String,
    pub css_variables: String,
    pub ai_prompt: String,
}

fn usage_label(count: usize) -> String {
    if count == 1 {
        "used 1 time".to_string()
    } else {
        format!("used {count} times")
    }
}

// ---------------------------------------------------------------------------
// Tally: occurrence counter that remembers first-seen order
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Tally {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl Tally {
    fn bump(&mut self, key: String) {
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, 1));
            }
        }
    }

    /// Highest counts first. `sort_by` is stable, which keeps ties in
    /// first-seen order.
    fn top(mut self, n: usize) -> Vec<(String, usize)> {
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        self.entries.truncate(n);
        self.entries
    }
}

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

fn color_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"#(?:[0-9a-fA-F]{6}|[0-9a-fA-F]{3})\b|(?i:rgba?)\([^)]+\)")
            .expect("valid regex")
    })
}

fn rgb_channels_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?i:rgba?)\(\s*(\d{1,3})(?:\s*,\s*|\s+)(\d{1,3})(?:\s*,\s*|\s+)(\d{1,3})\s*(?:[,/)]|$)",
        )
        .expect("valid regex")
    })
}

fn font_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)font-family\s*:\s*([^;}]+)").expect("valid regex"))
}

fn style_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<style\b[^>]*>(.*?)</style\s*>").expect("valid regex"))
}

fn link_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<link\b[^>]*>").expect("valid regex"))
}

fn attr_re(name: &str) -> Regex {
    Regex::new(&format!(
        r#"(?i)\b{name}\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#
    ))
    .expect("valid regex")
}

fn rel_attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| attr_re("rel"))
}

fn href_attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| attr_re("href"))
}

fn attr_value<'a>(re: &Regex, tag: &'a str) -> Option<&'a str> {
    let caps = re.captures(tag)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str())
}

// ---------------------------------------------------------------------------
// Normalization and naming
// ---------------------------------------------------------------------------

/// Normalize a color literal to `#RRGGBB` uppercase.
///
/// `#abc` expands each channel (`#AABBCC`); `rgb()`/`rgba()` channels are
/// read as decimal and re-encoded as two hex digits. Anything else (channels
/// above 255, `var()` arguments, percentages) returns `None`.
pub fn normalize_color(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if let Some(hex) = raw.strip_prefix('#') {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        return match hex.len() {
            3 => {
                let expanded: String = hex.chars().flat_map(|c| [c, c]).collect();
                Some(format!("#{}", expanded.to_ascii_uppercase()))
            }
            6 => Some(format!("#{}", hex.to_ascii_uppercase())),
            _ => None,
        };
    }

    let caps = rgb_channels_re().captures(raw)?;
    let mut out = String::from("#");
    for i in 1..=3 {
        let channel: u8 = caps.get(i)?.as_str().parse().ok()?;
        out.push_str(&format!("{channel:02X}"));
    }
    Some(out)
}

fn hex_channels(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
    let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
    let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
    Some((r, g, b))
}

/// Coarse human label for a normalized `#RRGGBB` color.
pub fn color_name(hex: &str) -> &'static str {
    let Some((r, g, b)) = hex_channels(hex) else {
        return "unknown";
    };
    let (r, g, b) = (f64::from(r), f64::from(g), f64::from(b));
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lightness = (max + min) / 2.0 / 255.0;

    if max == min {
        if lightness < 0.2 {
            return "black";
        }
        if lightness > 0.8 {
            return "white";
        }
        return "gray";
    }

    let d = max - min;
    let hue = if max == r {
        ((g - b) / d + if g < b { 6.0 } else { 0.0 }) / 6.0
    } else if max == g {
        ((b - r) / d + 2.0) / 6.0
    } else {
        ((r - g) / d + 4.0) / 6.0
    };

    if !(0.05..=0.95).contains(&hue) {
        "red"
    } else if hue < 0.12 {
        "orange"
    } else if hue < 0.2 {
        "yellow"
    } else if hue < 0.45 {
        "green"
    } else if hue < 0.55 {
        "cyan"
    } else if hue < 0.7 {
        "blue"
    } else if hue < 0.8 {
        "purple"
    } else {
        "pink"
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// The `MAX_COLORS` most frequent colors in `css`.
pub fn extract_colors(css: &str) -> Vec<ColorToken> {
    let mut tally = Tally::default();
    for m in color_re().find_iter(css) {
        if let Some(hex) = normalize_color(m.as_str()) {
            tally.bump(hex);
        }
    }
    tally
        .top(MAX_COLORS)
        .into_iter()
        .map(|(hex, count)| ColorToken::new(hex, count))
        .collect()
}

/// The `MAX_FONTS` most frequent primary font families in `css`.
pub fn extract_fonts(css: &str) -> Vec<FontToken> {
    let mut tally = Tally::default();
    for caps in font_re().captures_iter(css) {
        let value = caps[1].replace(['\'', '"'], "");
        let family = value.split(',').next().unwrap_or("").trim();
        if !family.is_empty() {
            tally.bump(family.to_string());
        }
    }
    tally
        .top(MAX_FONTS)
        .into_iter()
        .map(|(family, count)| FontToken::new(family, count))
        .collect()
}

/// Run the full extractor over `css` and build the boilerplate snippets.
pub fn analyze_css(css: &str) -> ThemeTokens {
    let colors = extract_colors(css);
    let fonts = extract_fonts(css);
    ThemeTokens {
        tailwind_config: tailwind_config(&colors),
        css_variables: css_variables(&colors),
        ai_prompt: design_prompt(&colors, &fonts),
        colors,
        fonts,
    }
}

// ---------------------------------------------------------------------------
// Boilerplate
// ---------------------------------------------------------------------------

pub fn tailwind_config(colors: &[ColorToken]) -> String {
    let entries = colors
        .iter()
        .take(SNIPPET_COLORS)
        .enumerate()
        .map(|(i, c)| format!("        'custom-{}': '{}',", i + 1, c.hex))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "// tailwind.config.js\n\
         module.exports = {{\n  \
           theme: {{\n    \
             extend: {{\n      \
               colors: {{\n\
         {entries}\n      \
               }},\n    \
             }},\n  \
           }},\n\
         }}"
    )
}

pub fn css_variables(colors: &[ColorToken]) -> String {
    let vars = colors
        .iter()
        .take(SNIPPET_COLORS)
        .enumerate()
        .map(|(i, c)| format!("  --color-{}: {};", i + 1, c.hex))
        .collect::<Vec<_>>()
        .join("\n");
    format!(":root {{\n{vars}\n}}")
}

pub fn design_prompt(colors: &[ColorToken], fonts: &[FontToken]) -> String {
    let color_desc = colors
        .iter()
        .take(PROMPT_COLORS)
        .map(|c| format!("{} ({})", c.name, c.hex))
        .collect::<Vec<_>>()
        .join(", ");
    let font_desc = fonts
        .iter()
        .take(PROMPT_FONTS)
        .map(|f| f.font_family.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut prompt = if color_desc.is_empty() {
        "No dominant colors were detected in this design.".to_string()
    } else {
        format!("This design mainly uses the colors {color_desc}.")
    };
    if !font_desc.is_empty() {
        prompt.push_str(&format!(" It uses the fonts {font_desc}."));
    }
    prompt.push_str(
        " It follows a modern, clean design style. Keep this color palette and style \
         when implementing the UI.",
    );
    prompt
}

// ---------------------------------------------------------------------------
// HTML helpers
// ---------------------------------------------------------------------------

/// Bodies of every inline `<style>` block, in document order.
pub fn style_blocks(html: &str) -> Vec<String> {
    style_block_re()
        .captures_iter(html)
        .map(|c| c[1].to_string())
        .collect()
}

/// Absolute URLs of `<link rel="stylesheet">` targets, resolved against
/// `base`. Links that cannot be resolved are skipped.
pub fn stylesheet_links(html: &str, base: &Url) -> Vec<String> {
    link_tag_re()
        .find_iter(html)
        .filter_map(|tag| {
            let tag = tag.as_str();
            let rel = attr_value(rel_attr_re(), tag)?;
            if !rel
                .split_whitespace()
                .any(|r| r.eq_ignore_ascii_case("stylesheet"))
            {
                return None;
            }
            let href = attr_value(href_attr_re(), tag)?.trim();
            if href.is_empty() {
                return None;
            }
            base.join(href).ok().map(|u| u.to_string())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
