//! Configuration: built-in defaults, then the config file, then leading
//! `--key=value` command-line arguments.
//!
//! The config file holds `key=value` lines and is created with the defaults
//! when missing. Values run to the end of the line and may contain spaces.
//! Blank lines and `#` comments are skipped; unknown keys are reported and
//! ignored.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::layout::{DisplayArea, FitParams, SizeRange, WrapPolicy};
use crate::render::{Palette, TermColor};

/// Largest font size, in points, that still fits the deca-point size type.
pub const MAX_FONT_PT: u32 = u32::MAX / 10;

/// Recognized options and their default values, in config-file form.
fn default_entries() -> [(&'static str, String); 17] {
    [
        ("align", "left".to_string()),
        ("bgColor", "black".to_string()),
        ("dpi", "96".to_string()),
        ("fgColor", "white".to_string()),
        ("forceHeight", String::new()),
        ("forceWidth", String::new()),
        ("fullScreen", "true".to_string()),
        ("lineSeparator", "false".to_string()),
        ("maxFontPt", "600".to_string()),
        ("minFontPt", "4".to_string()),
        ("port", "7717".to_string()),
        ("rotate", "false".to_string()),
        ("screenHeight", "480".to_string()),
        ("screenWidth", "854".to_string()),
        ("textFile", home_dir().join("MyDocs/bigtext.txt").display().to_string()),
        ("typeface", "Inconsolata".to_string()),
        ("wordWrap", "true".to_string()),
    ]
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Config file location: `$BIGTEXT_CONF`, else `$HOME/.config/bigtext.conf`.
pub fn config_path() -> PathBuf {
    std::env::var_os("BIGTEXT_CONF")
        .map(PathBuf::from)
        .unwrap_or_else(|| home_dir().join(".config/bigtext.conf"))
}

// ────────────────────────────────────────────────────────────────────────────
// Raw options
// ────────────────────────────────────────────────────────────────────────────

/// Untyped option values, keyed by option name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    values: BTreeMap<&'static str, String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            values: default_entries().into_iter().collect(),
        }
    }
}

impl Options {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Sets a known option. Returns `false` for unknown keys.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        match self.values.get_mut(key.trim()) {
            Some(slot) => {
                *slot = value.trim().to_string();
                true
            }
            None => false,
        }
    }

    /// Applies one `key=value` entry, warning when it is malformed or unknown.
    pub fn update(&mut self, entry: &str) {
        let applied = entry
            .split_once('=')
            .is_some_and(|(key, value)| self.set(key, value));
        if !applied {
            warn!("Malformed or unknown option: {entry}");
        }
    }

    /// Reads `path`, writing the current values there first if it is missing.
    pub fn read_file(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return self.write_file(path);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            self.update(line);
        }
        Ok(())
    }

    pub fn write_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(path, self.to_file_contents())
            .with_context(|| format!("Failed to write config file {}", path.display()))
    }

    fn to_file_contents(&self) -> String {
        self.values
            .iter()
            .map(|(key, value)| format!("{key}={value}\n"))
            .collect()
    }

    /// Consumes leading `--key=value` arguments and returns the rest.
    pub fn apply_args<'a>(&mut self, args: &'a [String]) -> &'a [String] {
        let flags = args.iter().take_while(|arg| arg.starts_with("--")).count();
        for arg in &args[..flags] {
            self.update(&arg[2..]);
        }
        &args[flags..]
    }
}

/// Help text listing every option with its default.
pub fn usage(program: &str) -> String {
    let defaults: String = Options::default()
        .values
        .iter()
        .map(|(key, value)| format!("    --{key}={value}\n"))
        .collect();
    format!(
        "Usage:\n  {program} [OPTS] TEXT [TEXT .. TEXT]  show 'TEXT TEXT ..'\n  \
         {program} -h  show this message\n\n  \
         OPTS are --KEY=VAL (VAL can be empty), and override the config file:\n    \
         {}\n  default values are as follows:\n{defaults}",
        config_path().display()
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Typed config
// ────────────────────────────────────────────────────────────────────────────

/// Horizontal alignment of rendered lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "left" => Some(Align::Left),
            "center" => Some(Align::Center),
            "right" => Some(Align::Right),
            _ => None,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub word_wrap: bool,
    pub line_separator: bool,
    pub min_font_pt: u32,
    pub max_font_pt: u32,
    pub typeface: String,
    pub force_width: Option<u32>,
    pub force_height: Option<u32>,
    pub align: Align,
    pub text_file: PathBuf,
    pub rotate: bool,
    pub full_screen: bool,
    pub bg_color: Option<TermColor>,
    pub fg_color: Option<TermColor>,
    pub screen_width: u32,
    pub screen_height: u32,
    pub dpi: u32,
    pub port: u16,
}

impl Config {
    /// Loads defaults, the config file and command-line overrides.
    /// Returns the config and the arguments left after the options.
    pub fn load(args: &[String]) -> Result<(Self, Vec<String>)> {
        let mut options = Options::default();
        options.read_file(&config_path())?;
        let rest = options.apply_args(args).to_vec();
        Ok((Self::from_options(&options)?, rest))
    }

    pub fn from_options(options: &Options) -> Result<Self> {
        let rotate = parse_bool(options, "rotate");
        let mut force_width = parse_optional(options, "forceWidth")?;
        let mut force_height = parse_optional(options, "forceHeight")?;
        if rotate {
            std::mem::swap(&mut force_width, &mut force_height);
        }

        let align_raw = raw(options, "align");
        let align = Align::parse(align_raw).unwrap_or_else(|| {
            warn!("Unknown alignment '{align_raw}', using left");
            Align::Left
        });

        Ok(Config {
            word_wrap: parse_bool(options, "wordWrap"),
            line_separator: parse_bool(options, "lineSeparator"),
            min_font_pt: parse_font_pt(options, "minFontPt")?,
            max_font_pt: parse_font_pt(options, "maxFontPt")?,
            typeface: raw(options, "typeface").to_string(),
            force_width,
            force_height,
            align,
            text_file: PathBuf::from(raw(options, "textFile")),
            rotate,
            full_screen: parse_bool(options, "fullScreen"),
            bg_color: parse_color(options, "bgColor"),
            fg_color: parse_color(options, "fgColor"),
            screen_width: parse_number(options, "screenWidth")?,
            screen_height: parse_number(options, "screenHeight")?,
            dpi: parse_number(options, "dpi")?,
            port: parse_number(options, "port")?,
        })
    }

    /// Host display size with any forced dimensions applied.
    pub fn display_area(&self) -> DisplayArea {
        DisplayArea::new(self.screen_width, self.screen_height)
            .with_forced(self.force_width, self.force_height)
    }

    pub fn wrap_policy(&self) -> WrapPolicy {
        WrapPolicy {
            word_wrap: self.word_wrap,
            line_separator: self.line_separator,
        }
    }

    pub fn palette(&self) -> Palette {
        Palette {
            fg: self.fg_color,
            bg: self.bg_color,
        }
    }

    pub fn fit_params(&self) -> FitParams {
        FitParams {
            range: SizeRange::new(self.min_font_pt, self.max_font_pt),
            area: self.display_area(),
            policy: self.wrap_policy(),
        }
    }
}

fn raw<'a>(options: &'a Options, key: &str) -> &'a str {
    options.get(key).unwrap_or_default()
}

fn parse_bool(options: &Options, key: &str) -> bool {
    raw(options, key).eq_ignore_ascii_case("true")
}

fn parse_number<T: std::str::FromStr>(options: &Options, key: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = raw(options, key);
    value
        .parse::<T>()
        .with_context(|| format!("Option '{key}' must be a non-negative integer, got '{value}'"))
}

fn parse_font_pt(options: &Options, key: &str) -> Result<u32> {
    let points: u32 = parse_number(options, key)?;
    if points > MAX_FONT_PT {
        bail!("Option '{key}' must be at most {MAX_FONT_PT}, got {points}");
    }
    Ok(points)
}

/// Empty means the terminal's own color. Unrecognized values warn and do the same.
fn parse_color(options: &Options, key: &str) -> Option<TermColor> {
    let value = raw(options, key);
    if value.is_empty() {
        return None;
    }
    let color = TermColor::parse(value);
    if color.is_none() {
        warn!("Unknown color '{value}' for {key}, using the terminal default");
    }
    color
}

fn parse_optional(options: &Options, key: &str) -> Result<Option<u32>> {
    if raw(options, key).is_empty() {
        Ok(None)
    } else {
        parse_number(options, key).map(Some)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
