//! Keyboard geometry
//!
//! Fixed 10x4 grid anchored to the bottom of the 854x480 logical screen.
//! The first three rows hold ten character keys each, the last row seven
//! character keys followed by cursor-left, cursor-right and commit.
//! The text field sits centred above the grid.

use crate::constants::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::drawing::{Point, Rect};
use crate::font::GlyphSource;

pub const COLUMNS: i32 = 10;
pub const ROWS: i32 = 4;

/// Outer margin around the grid
pub const MARGIN: i32 = 8;
/// Grid line thickness
pub const BORDER: i32 = 3;
/// Inner cell width
pub const STEP: i32 = (SCREEN_WIDTH as i32 - MARGIN * 2 - BORDER * 10) / 10;
/// Horizontal distance between cell origins
pub const COLUMN_PITCH: i32 = STEP + BORDER;
/// Vertical distance between cell origins
pub const ROW_PITCH: i32 = 44;
/// Top grid line
pub const GRID_TOP: i32 = SCREEN_HEIGHT as i32 - MARGIN - 5 - ROW_PITCH * ROWS;

/// Character keys in grid order (labels as drawn)
pub const KEYMAP: [char; 37] = [
    '1', '2', '3', '4', '5', '6', '7', '8', '9', '0', //
    'Q', 'W', 'E', 'R', 'T', 'Y', 'U', 'I', 'O', 'P', //
    'A', 'S', 'D', 'F', 'G', 'H', 'J', 'K', 'L', '.', //
    'Z', 'X', 'C', 'V', 'B', 'N', 'M',
];

pub const CURSOR_LEFT_INDEX: usize = 37;
pub const CURSOR_RIGHT_INDEX: usize = 38;
pub const COMMIT_INDEX: usize = 39;

/// What a grid cell does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Char(char),
    CursorLeft,
    CursorRight,
    Commit,
}

impl KeyKind {
    pub fn from_index(z: usize) -> Option<Self> {
        match z {
            z if z < KEYMAP.len() => Some(KeyKind::Char(KEYMAP[z])),
            CURSOR_LEFT_INDEX => Some(KeyKind::CursorLeft),
            CURSOR_RIGHT_INDEX => Some(KeyKind::CursorRight),
            COMMIT_INDEX => Some(KeyKind::Commit),
            _ => None,
        }
    }
}

/// Grid position; also the keyboard's selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridCursor {
    pub col: i32,
    pub row: i32,
}

impl GridCursor {
    pub fn new(col: i32, row: i32) -> Self {
        Self {
            col: col.rem_euclid(COLUMNS),
            row: row.rem_euclid(ROWS),
        }
    }

    /// Move with wrap-around on both axes
    pub fn step(self, dx: i32, dy: i32) -> Self {
        Self::new(self.col + dx, self.row + dy)
    }

    /// Grid index `row * 10 + col`
    pub fn index(self) -> usize {
        (self.row * COLUMNS + self.col) as usize
    }

    pub fn kind(self) -> Option<KeyKind> {
        KeyKind::from_index(self.index())
    }
}

/// Every cell with its action, in grid order
pub fn key_cells() -> impl Iterator<Item = (GridCursor, KeyKind)> {
    (0..ROWS).flat_map(|row| {
        (0..COLUMNS).filter_map(move |col| {
            let cell = GridCursor { col, row };
            cell.kind().map(|kind| (cell, kind))
        })
    })
}

/// Grid cell under a logical point
pub fn hit_test(p: Point) -> Option<GridCursor> {
    if !grid_rect().contains(p) {
        return None;
    }
    Some(GridCursor {
        col: (p.x - MARGIN) / COLUMN_PITCH,
        row: (p.y - GRID_TOP) / ROW_PITCH,
    })
}

/// Area covered by the cells, each owning its left and top grid line
fn grid_rect() -> Rect {
    Rect::new(
        MARGIN,
        GRID_TOP,
        (COLUMN_PITCH * COLUMNS) as u32,
        (ROW_PITCH * ROWS) as u32,
    )
}

/// Fill rectangle of a cell (inside the grid lines)
pub fn cell_rect(cell: GridCursor) -> Rect {
    Rect::new(
        MARGIN + BORDER + cell.col * COLUMN_PITCH,
        GRID_TOP + BORDER + cell.row * ROW_PITCH,
        STEP as u32,
        (ROW_PITCH - BORDER) as u32,
    )
}

/// Horizontal grid lines, bottom to top
pub fn horizontal_lines() -> impl Iterator<Item = Rect> {
    (0..=ROWS).map(|k| {
        Rect::new(
            MARGIN,
            GRID_TOP + (ROWS - k) * ROW_PITCH,
            (STEP * COLUMNS + BORDER * COLUMNS) as u32,
            BORDER as u32,
        )
    })
}

/// Vertical grid lines, left to right
pub fn vertical_lines() -> impl Iterator<Item = Rect> {
    (0..=COLUMNS).map(|k| {
        Rect::new(
            MARGIN + k * COLUMN_PITCH,
            GRID_TOP,
            BORDER as u32,
            (ROW_PITCH * ROWS + BORDER) as u32,
        )
    })
}

/// Baseline of key labels in a row
pub fn label_baseline(row: i32, font_size: i32) -> i32 {
    SCREEN_HEIGHT as i32 - MARGIN - 5 - ROW_PITCH * 3 - font_size / 2 + ROW_PITCH * row
}

/// Pen x that centres a label of `width` pixels in a column
pub fn label_x(col: i32, width: u32) -> i32 {
    MARGIN + BORDER + col * COLUMN_PITCH + STEP / 2 - (width / 2) as i32
}

/// Text field placement, fixed for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldGeometry {
    /// Width reserved for text: `capacity - 1` 'm' glyphs
    pub inner_width: u32,
    pub font_size: i32,
}

impl FieldGeometry {
    const CENTER_X: i32 = SCREEN_WIDTH as i32 / 2;
    const CENTER_Y: i32 = SCREEN_HEIGHT as i32 / 2 - (ROW_PITCH * 5) / 2;

    pub fn new<G: GlyphSource + ?Sized>(glyphs: &G, capacity: usize, font_size: i32) -> Self {
        let widest = vec!['m'; capacity.saturating_sub(1)];
        Self {
            inner_width: glyphs.text_width(&widest),
            font_size,
        }
    }

    fn half(&self) -> i32 {
        (self.inner_width / 2) as i32
    }

    /// Left edge of the frame
    pub fn frame_x(&self) -> i32 {
        Self::CENTER_X - MARGIN - BORDER - self.half()
    }

    pub fn frame_top(&self) -> i32 {
        Self::CENTER_Y - ROW_PITCH / 2
    }

    pub fn frame_bottom(&self) -> i32 {
        Self::CENTER_Y + ROW_PITCH / 2
    }

    /// Frame pieces: top, bottom, left, right
    pub fn frame(&self) -> [Rect; 4] {
        let x = self.frame_x();
        let width = self.inner_width + 16;
        let side = (ROW_PITCH + BORDER) as u32;
        [
            Rect::new(x, self.frame_top(), width, BORDER as u32),
            Rect::new(x, self.frame_bottom(), width, BORDER as u32),
            Rect::new(x, self.frame_top(), BORDER as u32, side),
            Rect::new(x + width as i32, self.frame_top(), BORDER as u32, side),
        ]
    }

    /// Pen x of the first character
    pub fn text_x(&self) -> i32 {
        Self::CENTER_X - BORDER - self.half()
    }

    pub fn text_baseline(&self) -> i32 {
        Self::CENTER_Y + self.font_size / 2
    }

    /// Caret position: text start plus the width left of the cursor
    pub fn caret_x<G: GlyphSource + ?Sized>(&self, glyphs: &G, text: &[char], cursor: usize) -> i32 {
        let left = &text[..cursor.min(text.len())];
        self.text_x() + glyphs.text_width(left) as i32
    }

    /// Caret bar spanning the text line
    pub fn caret_rect<G: GlyphSource + ?Sized>(&self, glyphs: &G, text: &[char], cursor: usize) -> Rect {
        let height = self.font_size + 4;
        Rect::new(
            self.caret_x(glyphs, text, cursor),
            self.text_baseline() - self.font_size + 2,
            2,
            height as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::GlyphBitmap;

    struct Fixed(f32);

    impl GlyphSource for Fixed {
        fn advance(&self, _ch: char) -> Option<f32> {
            Some(self.0)
        }

        fn rasterize(&self, _ch: char) -> Option<GlyphBitmap> {
            None
        }
    }

    #[test]
    fn test_constants() {
        assert_eq!(STEP, 80);
        assert_eq!(COLUMN_PITCH, 83);
        assert_eq!(GRID_TOP, 291);
    }

    #[test]
    fn test_index_table() {
        let labels = "1234567890QWERTYUIOPASDFGHJKL.ZXCVBNM";
        for (z, label) in labels.chars().enumerate() {
            assert_eq!(KeyKind::from_index(z), Some(KeyKind::Char(label)), "index {}", z);
        }
        assert_eq!(KeyKind::from_index(37), Some(KeyKind::CursorLeft));
        assert_eq!(KeyKind::from_index(38), Some(KeyKind::CursorRight));
        assert_eq!(KeyKind::from_index(39), Some(KeyKind::Commit));
        assert_eq!(KeyKind::from_index(40), None);
        assert!(key_cells().map(|(cell, _)| cell.index()).eq(0..40));
        assert_eq!(key_cells().count(), 40);
        assert_eq!(GridCursor::new(9, 3).index(), COMMIT_INDEX);
    }

    #[test]
    fn test_cursor_wraps() {
        let origin = GridCursor::default();
        assert_eq!(origin.step(-1, 0), GridCursor { col: 9, row: 0 });
        assert_eq!(origin.step(0, -1), GridCursor { col: 0, row: 3 });
        assert_eq!(GridCursor::new(9, 3).step(1, 1), origin);
    }

    #[test]
    fn test_cell_rect() {
        assert_eq!(cell_rect(GridCursor::new(0, 0)), Rect::new(11, 294, 80, 41));
        assert_eq!(cell_rect(GridCursor::new(9, 3)), Rect::new(758, 426, 80, 41));
    }

    #[test]
    fn test_grid_lines() {
        let ys: Vec<i32> = horizontal_lines().map(|r| r.y).collect();
        assert_eq!(ys, vec![467, 423, 379, 335, 291]);
        assert!(horizontal_lines().all(|r| r.width == 830 && r.height == 3));
        let xs: Vec<i32> = vertical_lines().map(|r| r.x).collect();
        assert_eq!(xs.len(), 11);
        assert_eq!(xs[0], 8);
        assert_eq!(xs[10], 838);
        assert!(vertical_lines().all(|r| r.y == 291 && r.height == 179));
    }

    #[test]
    fn test_hit_test() {
        assert_eq!(hit_test(Point::new(8, 291)), Some(GridCursor::new(0, 0)));
        assert_eq!(hit_test(Point::new(800, 450)), Some(GridCursor::new(9, 3)));
        assert_eq!(hit_test(Point::new(7, 300)), None);
        assert_eq!(hit_test(Point::new(100, 290)), None);
        assert_eq!(hit_test(Point::new(838, 300)), None);
        assert_eq!(hit_test(Point::new(100, 467)), None);
    }

    #[test]
    fn test_label_positions() {
        assert_eq!(label_baseline(0, 24), 323);
        assert_eq!(label_baseline(3, 24), 455);
        assert_eq!(label_x(0, 10), 11 + 40 - 5);
    }

    #[test]
    fn test_field_geometry() {
        // capacity 5 -> four 'm' of 10px
        let field = FieldGeometry::new(&Fixed(10.0), 5, 24);
        assert_eq!(field.inner_width, 40);
        assert_eq!(field.frame_x(), 427 - 11 - 20);
        assert_eq!(field.frame_top(), 108);
        assert_eq!(field.frame_bottom(), 152);
        assert_eq!(field.text_x(), 427 - 3 - 20);
        assert_eq!(field.text_baseline(), 142);
        let [top, bottom, left, right] = field.frame();
        assert_eq!(top, Rect::new(396, 108, 56, 3));
        assert_eq!(bottom.y, 152);
        assert_eq!(left, Rect::new(396, 108, 3, 47));
        assert_eq!(right.x, 396 + 56);
    }

    #[test]
    fn test_caret_x() {
        let field = FieldGeometry::new(&Fixed(10.0), 5, 24);
        let text = ['a', 'b', 'c'];
        assert_eq!(field.caret_x(&Fixed(10.0), &text, 0), field.text_x());
        assert_eq!(field.caret_x(&Fixed(10.0), &text, 2), field.text_x() + 20);
        assert_eq!(field.caret_x(&Fixed(10.0), &text, 9), field.text_x() + 30);
    }
}
