//! Action key icons
//!
//! The standard font carries the pad icons in its private-use area. Fonts
//! without them get a plain fallback so the key still has a label.

use super::glyph::GlyphSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    CursorLeft,
    CursorRight,
    Commit,
}

impl Icon {
    /// Candidate code points, preferred first
    pub fn candidates(self) -> &'static [char] {
        match self {
            Icon::CursorLeft => &['\u{E091}', '<'],
            Icon::CursorRight => &['\u{E090}', '>'],
            Icon::Commit => &['\u{E056}', '\u{21B5}', '\u{2713}'],
        }
    }

    /// First candidate the glyph source can draw; the primary code point otherwise
    pub fn resolve<G: GlyphSource + ?Sized>(self, glyphs: &G) -> char {
        let candidates = self.candidates();
        candidates
            .iter()
            .copied()
            .find(|&ch| glyphs.has_glyph(ch))
            .unwrap_or(candidates[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::GlyphBitmap;

    /// Maps ASCII only
    struct AsciiOnly;

    impl GlyphSource for AsciiOnly {
        fn advance(&self, ch: char) -> Option<f32> {
            ch.is_ascii().then_some(10.0)
        }

        fn rasterize(&self, ch: char) -> Option<GlyphBitmap> {
            ch.is_ascii()
                .then(|| GlyphBitmap::new(2, 2, 0, -2, 10.0, &[255; 4]))
        }
    }

    /// Maps everything
    struct Full;

    impl GlyphSource for Full {
        fn advance(&self, _ch: char) -> Option<f32> {
            Some(10.0)
        }

        fn rasterize(&self, _ch: char) -> Option<GlyphBitmap> {
            None
        }
    }

    #[test]
    fn test_icons_prefer_private_use_code_points() {
        assert_eq!(Icon::CursorLeft.resolve(&Full), '\u{E091}');
        assert_eq!(Icon::CursorRight.resolve(&Full), '\u{E090}');
        assert_eq!(Icon::Commit.resolve(&Full), '\u{E056}');
    }

    #[test]
    fn test_icons_fall_back() {
        assert_eq!(Icon::CursorLeft.resolve(&AsciiOnly), '<');
        assert_eq!(Icon::CursorRight.resolve(&AsciiOnly), '>');
        // No candidate mapped: keep the primary code point (draws as nothing)
        assert_eq!(Icon::Commit.resolve(&AsciiOnly), '\u{E056}');
    }
}
