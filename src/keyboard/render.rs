//! Keyboard frame drawing

use crate::config::AppearanceConfig;
use crate::display::Canvas;
use crate::font::{GlyphSource, Icon};
use crate::utils::Rgba;

use super::layout::{
    cell_rect, horizontal_lines, key_cells, label_baseline, label_x, vertical_lines,
    FieldGeometry, GridCursor, KeyKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgba,
    pub foreground: Rgba,
    pub border: Rgba,
    pub accent: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgba::opaque(238, 238, 238),
            foreground: Rgba::BLACK,
            border: Rgba::opaque(204, 204, 204),
            accent: Rgba::from_packed(0x3478_e4ff),
        }
    }
}

impl From<&AppearanceConfig> for Palette {
    fn from(config: &AppearanceConfig) -> Self {
        Self {
            background: config.background_rgba(),
            foreground: config.foreground_rgba(),
            border: config.border_rgba(),
            accent: config.accent_rgba(),
        }
    }
}

/// Action key labels, resolved against the session font once
#[derive(Debug, Clone, Copy)]
pub struct IconLabels {
    pub cursor_left: char,
    pub cursor_right: char,
    pub commit: char,
}

impl IconLabels {
    pub fn resolve<G: GlyphSource + ?Sized>(glyphs: &G) -> Self {
        Self {
            cursor_left: Icon::CursorLeft.resolve(glyphs),
            cursor_right: Icon::CursorRight.resolve(glyphs),
            commit: Icon::Commit.resolve(glyphs),
        }
    }

    fn label(&self, kind: KeyKind) -> char {
        match kind {
            KeyKind::Char(ch) => ch,
            KeyKind::CursorLeft => self.cursor_left,
            KeyKind::CursorRight => self.cursor_right,
            KeyKind::Commit => self.commit,
        }
    }
}

/// Everything one frame shows
pub struct Frame<'a> {
    pub selection: GridCursor,
    pub text: &'a [char],
    pub cursor: usize,
    pub field: &'a FieldGeometry,
    pub icons: &'a IconLabels,
    pub palette: &'a Palette,
}

/// Draw the keyboard onto a cleared canvas
pub fn draw_frame<G: GlyphSource + ?Sized>(canvas: &mut Canvas<'_>, glyphs: &G, frame: &Frame<'_>) {
    let palette = frame.palette;
    let field = frame.field;

    canvas.fill_rect(cell_rect(frame.selection), palette.accent);

    for piece in field.frame() {
        canvas.fill_rect(piece, palette.accent);
    }
    canvas.draw_text(
        glyphs,
        field.text_x(),
        field.text_baseline(),
        frame.text,
        palette.foreground,
    );
    canvas.fill_rect(
        field.caret_rect(glyphs, frame.text, frame.cursor),
        palette.accent,
    );

    for line in horizontal_lines().chain(vertical_lines()) {
        canvas.fill_rect(line, palette.border);
    }

    for (cell, kind) in key_cells() {
        let label = [frame.icons.label(kind)];
        let width = glyphs.text_width(&label);
        canvas.draw_text(
            glyphs,
            label_x(cell.col, width),
            label_baseline(cell.row, field.font_size),
            &label,
            palette.foreground,
        );
    }
}
