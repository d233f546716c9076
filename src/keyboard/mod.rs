//! On-screen keyboard
//!
//! - `layout`: key grid, text field geometry, hit testing
//! - `edit`: text buffer and commit/cancel state machine
//! - `render`: one frame of the keyboard onto the compositor canvas
//! - `session`: the poll/update/draw loop

pub mod edit;
pub mod layout;
pub mod render;
pub mod session;

pub use edit::{mapped_char, EditState, Editor, TextBuffer};
pub use layout::{hit_test, FieldGeometry, GridCursor, KeyKind};
pub use render::{draw_frame, Frame, IconLabels, Palette};
pub use session::{
    run_keyboard, run_with_glyphs, Clock, KeyboardContext, KeyboardSession, KeyboardSettings,
    SystemClock,
};
