//! Keyboard session
//!
//! One invocation of the on-screen keyboard: poll input, update the edit
//! state, draw, present, sleep. Ends on commit or cancel and hands back
//! the resulting text.

use log::{debug, info, warn};
use std::time::Duration;

use crate::config::Config;
use crate::constants::{
    DEFAULT_FALLBACK_TEXT, FONT_SIZE, MAX_REPEAT_TICKS, REPEAT_TICKS, TICK_MS,
};
use crate::display::{Compositor, DisplayBackend};
use crate::font::{FontGlyphs, FontService, GlyphSource};
use crate::input::{InputAggregator, PadButtons, PrimaryController, SecondaryControllers};

use super::edit::{EditState, Editor};
use super::layout::{hit_test, FieldGeometry, GridCursor};
use super::render::{draw_frame, Frame, IconLabels, Palette};

/// Tick pacing
pub trait Clock {
    fn sleep(&mut self, duration: Duration);
}

/// Wall-clock sleeping
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Per-session tunables
#[derive(Debug, Clone)]
pub struct KeyboardSettings {
    pub fallback_text: String,
    pub tick: Duration,
    pub repeat_ticks: u32,
    pub font_size: f32,
    pub palette: Palette,
}

impl Default for KeyboardSettings {
    fn default() -> Self {
        Self {
            fallback_text: DEFAULT_FALLBACK_TEXT.to_string(),
            tick: Duration::from_millis(TICK_MS),
            repeat_ticks: REPEAT_TICKS,
            font_size: FONT_SIZE,
            palette: Palette::default(),
        }
    }
}

impl From<&Config> for KeyboardSettings {
    fn from(config: &Config) -> Self {
        let font_size = if config.font.size > 0.0 {
            config.font.size
        } else {
            warn!("Invalid font size {}, using {}", config.font.size, FONT_SIZE);
            FONT_SIZE
        };
        let repeat_ticks = config.keyboard.repeat_ticks.clamp(1, MAX_REPEAT_TICKS);
        if repeat_ticks != config.keyboard.repeat_ticks {
            warn!(
                "repeat_ticks {} out of range, using {}",
                config.keyboard.repeat_ticks, repeat_ticks
            );
        }
        Self {
            fallback_text: config.keyboard.fallback_text.clone(),
            tick: Duration::from_millis(config.keyboard.tick_ms),
            repeat_ticks,
            font_size,
            palette: Palette::from(&config.appearance),
        }
    }
}

/// Host collaborators borrowed for the duration of a session
pub struct KeyboardContext<'a> {
    pub display: &'a mut dyn DisplayBackend,
    pub fonts: &'a dyn FontService,
    pub primary: &'a mut dyn PrimaryController,
    pub secondary: &'a mut dyn SecondaryControllers,
    pub clock: &'a mut dyn Clock,
    pub settings: KeyboardSettings,
}

/// Run the keyboard until the user commits or cancels.
///
/// Returns the committed text, the original text on cancel, or the
/// original text unchanged when no usable font is available.
pub fn run_keyboard(initial: &str, max_length: usize, ctx: &mut KeyboardContext<'_>) -> String {
    let glyphs = match FontGlyphs::load(ctx.fonts, ctx.settings.font_size) {
        Ok(glyphs) => glyphs,
        Err(e) => {
            warn!("Keyboard not shown: {}", e);
            return initial.to_string();
        }
    };
    run_with_glyphs(initial, max_length, ctx, &glyphs)
}

/// Run a session with an already loaded glyph source
pub fn run_with_glyphs<G: GlyphSource + ?Sized>(
    initial: &str,
    max_length: usize,
    ctx: &mut KeyboardContext<'_>,
    glyphs: &G,
) -> String {
    let mut session = KeyboardSession::new(initial, max_length, ctx, glyphs);
    loop {
        if let Some(result) = session.tick() {
            return result;
        }
        session.wait();
    }
}

pub struct KeyboardSession<'s, 'a, G: GlyphSource + ?Sized> {
    ctx: &'s mut KeyboardContext<'a>,
    glyphs: &'s G,
    compositor: Compositor,
    aggregator: InputAggregator,
    editor: Editor,
    selection: GridCursor,
    field: FieldGeometry,
    icons: IconLabels,
    frames: u64,
}

impl<'s, 'a, G: GlyphSource + ?Sized> KeyboardSession<'s, 'a, G> {
    pub fn new(
        initial: &str,
        max_length: usize,
        ctx: &'s mut KeyboardContext<'a>,
        glyphs: &'s G,
    ) -> Self {
        let capacity = max_length.max(1);
        let compositor = Compositor::attach(&mut *ctx.display);
        let field = FieldGeometry::new(glyphs, capacity, ctx.settings.font_size as i32);
        let icons = IconLabels::resolve(glyphs);
        let editor = Editor::new(initial, capacity, &ctx.settings.fallback_text);

        info!(
            "Keyboard session started (capacity {}, {} chars seeded)",
            capacity,
            editor.buffer().len()
        );

        Self {
            aggregator: InputAggregator::new(ctx.settings.repeat_ticks),
            ctx,
            glyphs,
            compositor,
            editor,
            selection: GridCursor::default(),
            field,
            icons,
            frames: 0,
        }
    }

    pub fn selection(&self) -> GridCursor {
        self.selection
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// Frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// One poll/update/draw cycle; Some(text) once the session is over
    pub fn tick(&mut self) -> Option<String> {
        let tick = self.aggregator.tick(
            &mut *self.ctx.primary,
            &mut *self.ctx.secondary,
            |p| hit_test(p).is_some(),
        );

        let mut confirm = false;
        if let Some(cell) = tick.pointer.and_then(hit_test) {
            self.selection = cell;
            confirm = true;
        } else if tick.fire {
            let buttons = tick.frame.buttons;
            if buttons.contains(PadButtons::RIGHT) {
                self.selection = self.selection.step(1, 0);
            }
            if buttons.contains(PadButtons::LEFT) {
                self.selection = self.selection.step(-1, 0);
            }
            if buttons.contains(PadButtons::DOWN) {
                self.selection = self.selection.step(0, 1);
            }
            if buttons.contains(PadButtons::UP) {
                self.selection = self.selection.step(0, -1);
            }
            if buttons.contains(PadButtons::CANCEL) {
                self.editor.cancel();
            }
            confirm = buttons.contains(PadButtons::CONFIRM);
        }

        if confirm {
            debug!("Key {} pressed", self.selection.index());
            self.editor.press(self.selection.index());
        }

        match self.editor.state() {
            EditState::Editing => {}
            EditState::Committed(text) => {
                info!("Keyboard session committed ({} chars)", text.chars().count());
                return Some(text.clone());
            }
            EditState::Cancelled(text) => {
                info!("Keyboard session cancelled");
                return Some(text.clone());
            }
        }

        if tick.redraw {
            self.draw();
        }
        None
    }

    /// Sleep until the next tick
    pub fn wait(&mut self) {
        self.ctx.clock.sleep(self.ctx.settings.tick);
    }

    fn draw(&mut self) {
        let display = &mut *self.ctx.display;
        let palette = &self.ctx.settings.palette;

        self.compositor.clear(&mut *display, palette.background);
        {
            let mut canvas = self.compositor.canvas(&mut *display);
            let buffer = self.editor.buffer();
            let frame = Frame {
                selection: self.selection,
                text: buffer.chars(),
                cursor: buffer.cursor(),
                field: &self.field,
                icons: &self.icons,
                palette,
            };
            draw_frame(&mut canvas, self.glyphs, &frame);
        }
        self.compositor.present(display);
        self.frames += 1;
    }
}

impl<G: GlyphSource + ?Sized> Drop for KeyboardSession<'_, '_, G> {
    fn drop(&mut self) {
        debug!("Keyboard session closed after {} frames", self.frames);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_clamp_repeat_ticks() {
        let mut config = Config::default();
        config.keyboard.repeat_ticks = u32::MAX;
        let settings = KeyboardSettings::from(&config);
        assert_eq!(settings.repeat_ticks, MAX_REPEAT_TICKS);
        let aggregator = InputAggregator::new(settings.repeat_ticks);
        assert_eq!(aggregator.gate().cooldown(), MAX_REPEAT_TICKS + 1);

        config.keyboard.repeat_ticks = 0;
        assert_eq!(KeyboardSettings::from(&config).repeat_ticks, 1);
    }

    #[test]
    fn test_settings_reject_bad_font_size() {
        let mut config = Config::default();
        config.font.size = -3.0;
        assert_eq!(KeyboardSettings::from(&config).font_size, FONT_SIZE);
        config.font.size = 18.0;
        assert_eq!(KeyboardSettings::from(&config).font_size, 18.0);
    }
}
