//! Font metrics: the oracle the fitting engine sizes its grid against.
//!
//! The engine only needs two numbers per font size: the advance of a wide
//! reference glyph (`W`, approximating a monospace cell even for proportional
//! faces) and the line height. `StaticMetrics` answers from per-family tables
//! in em units, scaled by point size and pixel density. This is an
//! approximation of what a rasterizer would report, which is all the grid
//! sizing needs.
//!
//! `MetricsCache` memoizes oracle answers per font size, since the search
//! revisits sizes across probes and across calls.

use std::collections::HashMap;
use std::fmt;

// ────────────────────────────────────────────────────────────────────────────
// Font size
// ────────────────────────────────────────────────────────────────────────────

/// A font size in deca-points (tenths of a point).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FontSize(u32);

impl FontSize {
    pub const fn from_deca_points(deca_points: u32) -> Self {
        Self(deca_points)
    }

    pub const fn from_points(points: u32) -> Self {
        Self(points * 10)
    }

    pub const fn deca_points(self) -> u32 {
        self.0
    }

    pub fn points(self) -> f32 {
        self.0 as f32 / 10.0
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}pt", self.0 / 10, self.0 % 10)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Oracle
// ────────────────────────────────────────────────────────────────────────────

/// Pixel metrics at one font size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphMetrics {
    /// Advance of the reference glyph, in pixels.
    pub glyph_width: u32,
    /// Line height, in pixels.
    pub line_height: u32,
}

/// Source of font metrics. Must be deterministic for fixed inputs.
pub trait FontMetricsOracle {
    fn measure(&self, typeface: &str, size: FontSize) -> GlyphMetrics;
}

// ────────────────────────────────────────────────────────────────────────────
// Font family tables
// ────────────────────────────────────────────────────────────────────────────

/// Typefaces with built-in metric tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFamily {
    /// Monospace default.
    Inconsolata,
    DejaVuSansMono,
    /// Humanist sans-serif.
    Inter,
    /// Old-style serif.
    EbGaramond,
    Lato,
    /// Condensed display sans-serif.
    Oswald,
    ComputerModern,
}

impl FontFamily {
    pub const ALL: [FontFamily; 7] = [
        FontFamily::Inconsolata,
        FontFamily::DejaVuSansMono,
        FontFamily::Inter,
        FontFamily::EbGaramond,
        FontFamily::Lato,
        FontFamily::Oswald,
        FontFamily::ComputerModern,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FontFamily::Inconsolata => "Inconsolata",
            FontFamily::DejaVuSansMono => "DejaVu Sans Mono",
            FontFamily::Inter => "Inter",
            FontFamily::EbGaramond => "EB Garamond",
            FontFamily::Lato => "Lato",
            FontFamily::Oswald => "Oswald",
            FontFamily::ComputerModern => "Computer Modern",
        }
    }

    /// Looks up a family by name, ignoring case, spaces, hyphens and underscores.
    pub fn from_name(name: &str) -> Option<Self> {
        let key = normalize_name(name);
        Self::ALL
            .into_iter()
            .find(|family| normalize_name(family.name()) == key)
    }
}

fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Static metrics for a font family, in em units.
pub struct FontMetricTable {
    pub font: FontFamily,
    /// Advance of `W`.
    pub reference_width_em: f32,
    /// Ascent + descent + leading.
    pub line_height_em: f32,
}

static INCONSOLATA_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::Inconsolata,
    reference_width_em: 0.50,
    line_height_em: 1.05,
};

static DEJAVU_SANS_MONO_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::DejaVuSansMono,
    reference_width_em: 0.60,
    line_height_em: 1.16,
};

static INTER_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::Inter,
    reference_width_em: 0.89,
    line_height_em: 1.21,
};

static EB_GARAMOND_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::EbGaramond,
    reference_width_em: 0.76,
    line_height_em: 1.30,
};

static LATO_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::Lato,
    reference_width_em: 0.94,
    line_height_em: 1.20,
};

static OSWALD_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::Oswald,
    reference_width_em: 0.61,
    line_height_em: 1.48,
};

static COMPUTER_MODERN_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::ComputerModern,
    reference_width_em: 0.80,
    line_height_em: 1.20,
};

/// Returns the static metric table for a given font family.
pub fn get_metrics(font: FontFamily) -> &'static FontMetricTable {
    match font {
        FontFamily::Inconsolata => &INCONSOLATA_TABLE,
        FontFamily::DejaVuSansMono => &DEJAVU_SANS_MONO_TABLE,
        FontFamily::Inter => &INTER_TABLE,
        FontFamily::EbGaramond => &EB_GARAMOND_TABLE,
        FontFamily::Lato => &LATO_TABLE,
        FontFamily::Oswald => &OSWALD_TABLE,
        FontFamily::ComputerModern => &COMPUTER_MODERN_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Table-backed oracle
// ────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_FAMILY: FontFamily = FontFamily::Inconsolata;

/// Oracle backed by the static tables. Unknown typefaces use `DEFAULT_FAMILY`.
#[derive(Debug, Clone, Copy)]
pub struct StaticMetrics {
    pub dpi: u32,
}

impl StaticMetrics {
    pub fn new(dpi: u32) -> Self {
        Self { dpi }
    }

    fn to_pixels(&self, em: f32, size: FontSize) -> u32 {
        let px_per_em = size.points() * self.dpi as f32 / 72.0;
        (em * px_per_em).round() as u32
    }
}

impl FontMetricsOracle for StaticMetrics {
    fn measure(&self, typeface: &str, size: FontSize) -> GlyphMetrics {
        let family = FontFamily::from_name(typeface).unwrap_or(DEFAULT_FAMILY);
        let table = get_metrics(family);
        GlyphMetrics {
            glyph_width: self.to_pixels(table.reference_width_em, size),
            line_height: self.to_pixels(table.line_height_em, size),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Cache
// ────────────────────────────────────────────────────────────────────────────

/// Memoizes oracle answers for one typeface.
pub struct MetricsCache<O> {
    oracle: O,
    typeface: String,
    entries: HashMap<FontSize, GlyphMetrics>,
}

impl<O: FontMetricsOracle> MetricsCache<O> {
    pub fn new(oracle: O, typeface: impl Into<String>) -> Self {
        Self {
            oracle,
            typeface: typeface.into(),
            entries: HashMap::new(),
        }
    }

    pub fn get(&mut self, size: FontSize) -> GlyphMetrics {
        let oracle = &self.oracle;
        let typeface = &self.typeface;
        *self
            .entries
            .entry(size)
            .or_insert_with(|| oracle.measure(typeface, size))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
