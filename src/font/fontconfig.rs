//! fontconfig lookups
//!
//! Turns a configured family name into font bytes, and picks a label font
//! when nothing is configured.

use anyhow::{anyhow, Context, Result};
use fontconfig::Fontconfig;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Families tried for key labels, best first
const LABEL_FAMILIES: &[&str] = &[
    "DejaVu Sans",
    "Noto Sans",
    "Liberation Sans",
    "Cantarell",
    "Roboto",
    "sans-serif",
];

/// A family fontconfig resolved to a file
#[derive(Debug, Clone)]
pub struct FontMatch {
    pub path: PathBuf,
    pub family: String,
}

pub struct FontFinder {
    fc: Fontconfig,
}

impl FontFinder {
    pub fn new() -> Result<Self> {
        let fc = Fontconfig::new().ok_or_else(|| anyhow!("fontconfig initialization failed"))?;
        Ok(Self { fc })
    }

    /// Look up a family. fontconfig answers every query with its closest
    /// match, so a result whose name shares nothing with the request is
    /// treated as a miss.
    pub fn lookup(&self, family: &str) -> Option<FontMatch> {
        let font = self.fc.find(family, None)?;
        let wanted = family.to_ascii_lowercase();
        let got = font.name.to_ascii_lowercase();
        if got.contains(&wanted) || wanted.contains(&got) {
            debug!("fontconfig: \"{}\" -> {}", family, font.path.display());
            return Some(FontMatch {
                path: font.path,
                family: font.name,
            });
        }
        debug!("fontconfig: \"{}\" only matched \"{}\"", family, font.name);
        None
    }

    /// First installed label family
    pub fn label_font(&self) -> Option<FontMatch> {
        LABEL_FAMILIES.iter().find_map(|family| self.lookup(family))
    }
}

fn read_font(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read font file: {}", path.display()))
}

/// Bytes of a configured font: an absolute path, a family name, or a
/// relative path, tried in that order
pub fn load_configured(spec: &str) -> Result<Vec<u8>> {
    let path = Path::new(spec);
    if path.is_absolute() && path.exists() {
        info!("Font loaded: {}", spec);
        return read_font(path);
    }

    if let Some(found) = FontFinder::new()?.lookup(spec) {
        info!("Font \"{}\" resolved to {}", spec, found.path.display());
        return read_font(&found.path);
    }

    if path.exists() {
        info!("Font loaded: {}", spec);
        return read_font(path);
    }

    Err(anyhow!("Font \"{}\" is neither a file nor an installed family", spec))
}

/// Bytes of the first label family fontconfig knows
pub fn load_label_font() -> Result<Vec<u8>> {
    let Some(found) = FontFinder::new()?.label_font() else {
        warn!("fontconfig found no label font");
        return Err(anyhow!("No sans-serif font installed"));
    };
    info!("Label font (fontconfig): {} ({})", found.family, found.path.display());
    read_font(&found.path)
}
