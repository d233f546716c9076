//! Font service
//!
//! Supplies the raw bytes of the "standard" font. A service that has no
//! font returns None; the keyboard treats that as a normal no-render case.

use log::{debug, info, warn};

use super::fontconfig::{load_configured, load_label_font};

/// Source of the standard font asset
pub trait FontService {
    fn standard_font(&self) -> Option<Vec<u8>>;
}

/// In-memory font bytes (embedded assets, tests)
pub struct StaticFont(pub Vec<u8>);

impl FontService for StaticFont {
    fn standard_font(&self) -> Option<Vec<u8>> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.clone())
        }
    }
}

/// Well-known font locations tried before fontconfig
const FONT_CANDIDATES: &[&str] = &[
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    // macOS (development/testing)
    "/System/Library/Fonts/Helvetica.ttc",
    "/Library/Fonts/Arial.ttf",
];

/// Searches the host system for a font
///
/// Search order:
/// 1. VKBD_FONT environment variable
/// 2. Configured font (path or family name)
/// 3. Known paths (hardcoded)
/// 4. fontconfig (fallback)
pub struct SystemFontService {
    configured: String,
}

impl SystemFontService {
    pub fn new(configured: &str) -> Self {
        Self {
            configured: configured.trim().to_string(),
        }
    }
}

impl FontService for SystemFontService {
    fn standard_font(&self) -> Option<Vec<u8>> {
        if let Ok(path) = std::env::var("VKBD_FONT") {
            match std::fs::read(&path) {
                Ok(data) => {
                    info!("Font loaded: {} (VKBD_FONT)", path);
                    return Some(data);
                }
                Err(e) => warn!("Failed to load VKBD_FONT: {} ({})", path, e),
            }
        }

        if !self.configured.is_empty() {
            match load_configured(&self.configured) {
                Ok(data) => return Some(data),
                Err(e) => warn!("Configured font unusable: {}", e),
            }
        }

        for path in FONT_CANDIDATES {
            if let Ok(data) = std::fs::read(path) {
                info!("Font loaded: {}", path);
                return Some(data);
            }
        }

        debug!("Not found in hardcoded paths, trying fontconfig");
        match load_label_font() {
            Ok(data) => Some(data),
            Err(e) => {
                warn!("No usable font: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_font_empty_is_none() {
        assert!(StaticFont(Vec::new()).standard_font().is_none());
        assert_eq!(StaticFont(vec![1, 2]).standard_font(), Some(vec![1, 2]));
    }
}
