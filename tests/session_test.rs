//! End-to-end keyboard sessions
//!
//! Drives whole sessions through a scripted pad, an in-memory display and
//! a box-glyph font, so no font files or devices are needed.

use anyhow::Result;
use std::collections::VecDeque;
use std::time::Duration;

use vkbd::display::{ExternalMode, MemoryDisplay, Screen};
use vkbd::font::{GlyphBitmap, GlyphSource, StaticFont};
use vkbd::input::{
    ExtensionType, NoSecondaryPads, PadButtons, PrimaryController, PrimaryReading,
    SecondaryControllers, SecondaryReading, TouchSample,
};
use vkbd::keyboard::{
    run_keyboard, run_with_glyphs, Clock, GridCursor, KeyboardContext, KeyboardSession,
    KeyboardSettings,
};

/// Solid 6x12 box for every code point
struct Boxes;

impl GlyphSource for Boxes {
    fn advance(&self, _ch: char) -> Option<f32> {
        Some(10.0)
    }

    fn rasterize(&self, _ch: char) -> Option<GlyphBitmap> {
        Some(GlyphBitmap::new(6, 12, 2, -12, 10.0, &[255; 72]))
    }
}

/// One tick of scripted input
#[derive(Clone, Copy)]
enum Step {
    Idle,
    Press(PadButtons),
    Touch(u32, u32),
}

use Step::{Idle, Press, Touch};

/// Plays back a script, then reports nothing
struct ScriptedPad {
    steps: VecDeque<Step>,
}

impl ScriptedPad {
    fn new(steps: &[Step]) -> Self {
        Self {
            steps: steps.iter().copied().collect(),
        }
    }
}

impl PrimaryController for ScriptedPad {
    fn poll(&mut self) -> Result<PrimaryReading> {
        let reading = match self.steps.pop_front() {
            Some(Press(buttons)) => PrimaryReading {
                hold: buttons,
                trigger: buttons,
                ..Default::default()
            },
            Some(Touch(x, y)) => PrimaryReading {
                touch: TouchSample { touched: true, x, y },
                ..Default::default()
            },
            Some(Idle) | None => PrimaryReading::default(),
        };
        Ok(reading)
    }
}

/// Channel 0 holds a classic controller pressing the given raw words
struct ClassicScript {
    words: VecDeque<u32>,
}

impl SecondaryControllers for ClassicScript {
    fn poll(&mut self, channel: usize) -> Result<Option<SecondaryReading>> {
        if channel != 0 {
            return Ok(None);
        }
        let word = self.words.pop_front().unwrap_or(0);
        Ok(Some(SecondaryReading {
            extension: ExtensionType::Classic,
            hold: word,
            trigger: word,
        }))
    }
}

/// Counts sleeps and stops runaway sessions
#[derive(Default)]
struct FakeClock {
    sleeps: u32,
}

impl Clock for FakeClock {
    fn sleep(&mut self, duration: Duration) {
        assert_eq!(duration, Duration::from_millis(20));
        self.sleeps += 1;
        assert!(self.sleeps < 1000, "session never ended");
    }
}

fn run(initial: &str, max_length: usize, steps: &[Step]) -> (String, MemoryDisplay) {
    let mut display = MemoryDisplay::new(ExternalMode::Hd720);
    let fonts = StaticFont(Vec::new());
    let mut primary = ScriptedPad::new(steps);
    let mut secondary = NoSecondaryPads;
    let mut clock = FakeClock::default();
    let result = {
        let mut ctx = KeyboardContext {
            display: &mut display,
            fonts: &fonts,
            primary: &mut primary,
            secondary: &mut secondary,
            clock: &mut clock,
            settings: KeyboardSettings::default(),
        };
        run_with_glyphs(initial, max_length, &mut ctx, &Boxes)
    };
    (result, display)
}

/// Press with a release tick before it, after the two start-up ticks
fn presses(buttons: &[PadButtons]) -> Vec<Step> {
    let mut steps = vec![Idle];
    for &b in buttons {
        steps.push(Idle);
        steps.push(Press(b));
    }
    steps
}

/// Selection moves from (0,0) to the commit key (9,3) and presses it
const TO_COMMIT: [PadButtons; 3] = [PadButtons::UP, PadButtons::LEFT, PadButtons::A];

#[test]
fn test_commit_unchanged_text() {
    let (result, _) = run("pool.ntp.org", 32, &presses(&TO_COMMIT));
    assert_eq!(result, "pool.ntp.org");
}

#[test]
fn test_type_and_commit() {
    let mut buttons = vec![PadButtons::DOWN, PadButtons::DOWN, PadButtons::A];
    buttons.extend([PadButtons::DOWN, PadButtons::LEFT, PadButtons::A]);
    let (result, _) = run("", 16, &presses(&buttons));
    assert_eq!(result, "a");
}

#[test]
fn test_cleared_text_commits_fallback() {
    let mut buttons = vec![PadButtons::B; 3];
    buttons.extend(TO_COMMIT);
    let (result, _) = run("abc", 16, &presses(&buttons));
    assert_eq!(result, "pool.ntp.org");
}

#[test]
fn test_cancel_at_start_returns_original() {
    let (result, _) = run("abc", 16, &presses(&[PadButtons::B; 4]));
    assert_eq!(result, "abc");
}

#[test]
fn test_stick_moves_selection() {
    let buttons = [
        PadButtons::STICK_L_DOWN,
        PadButtons::STICK_L_DOWN,
        PadButtons::A,
        PadButtons::STICK_L_UP,
        PadButtons::STICK_L_UP,
        PadButtons::STICK_L_UP,
        PadButtons::STICK_L_LEFT,
        PadButtons::A,
    ];
    let (result, _) = run("", 16, &presses(&buttons));
    assert_eq!(result, "a");
}

#[test]
fn test_touch_commit_key() {
    // Inside the commit cell (column 9, row 3)
    let (result, _) = run("hello", 16, &[Idle, Touch(798, 446)]);
    assert_eq!(result, "hello");
}

#[test]
fn test_touch_outside_grid_ignored() {
    let mut steps = vec![Idle, Touch(400, 50), Idle];
    steps.extend(presses(&TO_COMMIT).into_iter().skip(1));
    let (result, _) = run("x", 16, &steps);
    assert_eq!(result, "x");
}

#[test]
fn test_classic_controller_commits() {
    let mut display = MemoryDisplay::new(ExternalMode::FullHd1080);
    let fonts = StaticFont(Vec::new());
    let mut primary = ScriptedPad::new(&[]);
    // Classic layout: up 0x0001, left 0x0002, A 0x0010
    let mut secondary = ClassicScript {
        words: [0, 0, 0x0001, 0, 0x0002, 0, 0x0010].into_iter().collect(),
    };
    let mut clock = FakeClock::default();
    let mut ctx = KeyboardContext {
        display: &mut display,
        fonts: &fonts,
        primary: &mut primary,
        secondary: &mut secondary,
        clock: &mut clock,
        settings: KeyboardSettings::default(),
    };
    assert_eq!(run_with_glyphs("ntp", 16, &mut ctx, &Boxes), "ntp");
}

#[test]
fn test_no_font_returns_original() {
    let mut display = MemoryDisplay::new(ExternalMode::Hd720);
    let fonts = StaticFont(Vec::new());
    let mut primary = ScriptedPad::new(&presses(&TO_COMMIT));
    let mut secondary = NoSecondaryPads;
    let mut clock = FakeClock::default();
    let mut ctx = KeyboardContext {
        display: &mut display,
        fonts: &fonts,
        primary: &mut primary,
        secondary: &mut secondary,
        clock: &mut clock,
        settings: KeyboardSettings::default(),
    };
    assert_eq!(run_keyboard("unchanged", 16, &mut ctx), "unchanged");
    drop(ctx);
    assert_eq!(clock.sleeps, 0);
}

#[test]
fn test_frames_reach_both_displays() {
    let (_, display) = run("a", 16, &presses(&TO_COMMIT));
    // Vertical grid line at x 8..11 on the handheld, 12..17 on the external
    assert_eq!(display.front_pixel(Screen::Handheld, 9, 300), Some((204, 204, 204)));
    assert_eq!(display.front_pixel(Screen::External, 14, 450), Some((204, 204, 204)));
    // Background outside every element
    assert_eq!(display.front_pixel(Screen::Handheld, 2, 2), Some((238, 238, 238)));
}

#[test]
fn test_held_button_repeats() {
    let mut display = MemoryDisplay::new(ExternalMode::Hd720);
    let fonts = StaticFont(Vec::new());
    let right = Press(PadButtons::RIGHT);
    let mut primary = ScriptedPad::new(&[Idle, Idle, right, right, right, right, right]);
    let mut secondary = NoSecondaryPads;
    let mut clock = FakeClock::default();
    let mut ctx = KeyboardContext {
        display: &mut display,
        fonts: &fonts,
        primary: &mut primary,
        secondary: &mut secondary,
        clock: &mut clock,
        settings: KeyboardSettings {
            repeat_ticks: 3,
            ..KeyboardSettings::default()
        },
    };
    let mut session = KeyboardSession::new("", 16, &mut ctx, &Boxes);

    // Start-up tick draws, release tick does not
    assert_eq!(session.tick(), None);
    assert_eq!(session.frames(), 1);
    assert_eq!(session.tick(), None);
    assert_eq!(session.frames(), 1);

    // First press acts at once, then every third tick while held
    session.tick();
    assert_eq!(session.selection(), GridCursor::new(1, 0));
    assert_eq!(session.frames(), 2);
    for _ in 0..3 {
        session.tick();
        assert_eq!(session.selection(), GridCursor::new(1, 0));
    }
    session.tick();
    assert_eq!(session.selection(), GridCursor::new(2, 0));
    assert_eq!(session.frames(), 3);
    assert!(session.editor().buffer().is_empty());
}
