//! Configuration file management
//!
//! Loads TOML configuration files and provides application settings.
//! Default config path: ~/.config/vkbd/config.toml

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_FALLBACK_TEXT, DEFAULT_MAX_LENGTH, FONT_SIZE, REPEAT_TICKS, TICK_MS};
use crate::utils::Rgba;

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Keyboard behaviour
    pub keyboard: KeyboardConfig,
    /// Font settings
    pub font: FontConfig,
    /// Appearance settings
    pub appearance: AppearanceConfig,
    /// Display settings
    pub display: DisplayConfig,
}

/// Keyboard behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Committed when the buffer is empty
    pub fallback_text: String,
    /// Text capacity including the terminator slot
    pub max_length: usize,
    /// Poll interval in milliseconds
    pub tick_ms: u64,
    /// Ticks between repeats of a held button
    pub repeat_ticks: u32,
}

/// Font settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Family name or file path (searches system fonts if empty)
    pub path: String,
    /// Pixel size
    pub size: f32,
}

/// Appearance settings (RRGGBB hex)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    pub background: String,
    /// Labels and typed text
    pub foreground: String,
    /// Grid lines
    pub border: String,
    /// Selection and text field frame
    pub accent: String,
}

/// Display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Screenshot save directory
    pub screenshot_dir: String,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            fallback_text: DEFAULT_FALLBACK_TEXT.to_string(),
            max_length: DEFAULT_MAX_LENGTH,
            tick_ms: TICK_MS,
            repeat_ticks: REPEAT_TICKS,
        }
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            size: FONT_SIZE,
        }
    }
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            background: "eeeeee".to_string(),
            foreground: "000000".to_string(),
            border: "cccccc".to_string(),
            accent: "3478e4".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            screenshot_dir: "~".to_string(),
        }
    }
}

impl AppearanceConfig {
    /// Parse a hex color, logging and using `fallback` on invalid input
    fn color(name: &str, hex: &str, fallback: Rgba) -> Rgba {
        Rgba::from_hex(hex).unwrap_or_else(|| {
            warn!("Invalid {} color \"{}\", using default", name, hex);
            fallback
        })
    }

    pub fn background_rgba(&self) -> Rgba {
        Self::color("background", &self.background, Rgba::opaque(238, 238, 238))
    }

    pub fn foreground_rgba(&self) -> Rgba {
        Self::color("foreground", &self.foreground, Rgba::BLACK)
    }

    pub fn border_rgba(&self) -> Rgba {
        Self::color("border", &self.border, Rgba::opaque(204, 204, 204))
    }

    pub fn accent_rgba(&self) -> Rgba {
        Self::color("accent", &self.accent, Rgba::from_packed(0x3478_e4ff))
    }
}

impl Config {
    /// System-wide config path
    const SYSTEM_CONFIG_PATH: &'static str = "/etc/vkbd/config.toml";

    /// Get the path that would be used for loading config
    /// Returns None if using built-in defaults
    pub fn config_path() -> Option<PathBuf> {
        // 1. VKBD_CONFIG environment variable
        if let Ok(path) = std::env::var("VKBD_CONFIG") {
            let p = Path::new(&path);
            if p.exists() {
                return Some(p.to_path_buf());
            }
        }

        // 2. User config: ~/.config/vkbd/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("vkbd").join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }
        }

        // 3. System config: /etc/vkbd/config.toml
        let system_config = Path::new(Self::SYSTEM_CONFIG_PATH);
        if system_config.exists() {
            return Some(system_config.to_path_buf());
        }

        None
    }

    /// Load configuration with priority:
    /// 1. VKBD_CONFIG environment variable
    /// 2. ~/.config/vkbd/config.toml (user config)
    /// 3. /etc/vkbd/config.toml (system config)
    /// 4. Built-in defaults
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            match Self::load_from_file(&path) {
                Ok(config) => {
                    info!("Loaded config: {}", path.display());
                    return config;
                }
                Err(e) => {
                    warn!("Failed to load config {}: {:#}", path.display(), e);
                }
            }
        }
        info!("Using built-in default config");
        Self::default()
    }

    /// Load settings from specified path
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Commented config file body
    fn template(font_line: &str) -> String {
        format!(
            r#"# vkbd configuration
# Location: ~/.config/vkbd/config.toml

# =============================================================================
# Keyboard
# =============================================================================
[keyboard]
fallback_text = "{fallback}"   # Committed when the text is empty
max_length = {max_length}              # Capacity including the terminator slot
tick_ms = {tick_ms}                  # Input poll interval
repeat_ticks = {repeat}             # Ticks between repeats of a held button

# =============================================================================
# Font
# =============================================================================
[font]
{font_line}
size = {size:.1}

# =============================================================================
# Appearance (RRGGBB)
# =============================================================================
[appearance]
background = "eeeeee"
foreground = "000000"
border = "cccccc"
accent = "3478e4"

# =============================================================================
# Display
# =============================================================================
[display]
screenshot_dir = "~"          # Where --screenshot writes PNGs
"#,
            fallback = DEFAULT_FALLBACK_TEXT,
            max_length = DEFAULT_MAX_LENGTH,
            tick_ms = TICK_MS,
            repeat = REPEAT_TICKS,
            font_line = font_line,
            size = FONT_SIZE,
        )
    }

    /// Write a commented template to ~/.config/vkbd/config.toml
    pub fn write_template() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Config directory not found"))?;
        let vkbd_dir = config_dir.join("vkbd");
        std::fs::create_dir_all(&vkbd_dir)?;
        let config_path = vkbd_dir.join("config.toml");

        // Suggest the font fontconfig would pick
        let font_line = match crate::font::fontconfig::FontFinder::new()
            .ok()
            .and_then(|f| f.label_font())
        {
            Some(m) => format!("path = \"{}\"", m.family),
            None => "# path = \"\"                   # Font name or path (e.g. \"DejaVu Sans\")"
                .to_string(),
        };
        let template = Self::template(&font_line);

        std::fs::write(&config_path, template)?;
        Ok(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.keyboard.fallback_text, "pool.ntp.org");
        assert_eq!(config.keyboard.max_length, 128);
        assert_eq!(config.keyboard.tick_ms, 20);
        assert_eq!(config.keyboard.repeat_ticks, 25);
        assert_eq!(config.font.size, 24.0);
        assert_eq!(config.appearance.accent_rgba(), Rgba::opaque(0x34, 0x78, 0xe4));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::parse(
            r#"
[keyboard]
max_length = 16

[appearance]
accent = "ff0000"
"#,
        )
        .unwrap();
        assert_eq!(config.keyboard.max_length, 16);
        assert_eq!(config.keyboard.fallback_text, "pool.ntp.org");
        assert_eq!(config.appearance.accent_rgba(), Rgba::opaque(255, 0, 0));
        assert_eq!(config.display.screenshot_dir, "~");
    }

    #[test]
    fn test_invalid_color_falls_back() {
        let config = Config::parse("[appearance]\nborder = \"zzz\"\n").unwrap();
        assert_eq!(config.appearance.border_rgba(), Rgba::opaque(204, 204, 204));
    }

    #[test]
    fn test_malformed_file_is_error() {
        assert!(Config::parse("[keyboard\nmax_length = ").is_err());
    }

    #[test]
    fn test_template_parses() {
        let config = Config::parse(&Config::template("path = \"DejaVu Sans\"")).unwrap();
        assert_eq!(config.font.path, "DejaVu Sans");
        assert_eq!(config.font.size, 24.0);
        assert_eq!(config.keyboard.repeat_ticks, 25);

        let config = Config::parse(&Config::template("# path = \"\"")).unwrap();
        assert!(config.font.path.is_empty());
    }
}
