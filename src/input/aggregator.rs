//! Input aggregation
//!
//! Reads every controller once per tick and folds the results into one
//! canonical button mask plus an optional touch point, then runs the
//! mask through the repeat gate.

use log::{debug, trace};

use crate::drawing::Point;

use super::buttons::PadButtons;
use super::controller::{PrimaryController, SecondaryControllers, SECONDARY_CHANNELS};
use super::repeat::RepeatGate;

/// Everything read from the controllers in one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputFrame {
    /// Canonical mask of all sources
    pub buttons: PadButtons,
    /// Touch point, only on the tick contact begins
    pub pointer: Option<Point>,
}

/// Gated result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputTick {
    pub frame: InputFrame,
    /// Act on `frame.buttons` (or on `pointer` when set)
    pub fire: bool,
    pub redraw: bool,
    /// Accepted touch point; when set it replaces the button mask
    pub pointer: Option<Point>,
}

pub struct InputAggregator {
    gate: RepeatGate,
    touching: bool,
}

impl InputAggregator {
    pub fn new(repeat_ticks: u32) -> Self {
        Self {
            gate: RepeatGate::new(repeat_ticks),
            touching: false,
        }
    }

    pub fn gate(&self) -> &RepeatGate {
        &self.gate
    }

    /// Read all sources once
    pub fn poll(
        &mut self,
        primary: &mut dyn PrimaryController,
        secondary: &mut dyn SecondaryControllers,
    ) -> InputFrame {
        let mut buttons = PadButtons::empty();
        let mut pointer = None;

        match primary.poll() {
            Ok(reading) => {
                buttons |= (reading.hold | reading.trigger).normalize();
                let touch = reading.touch;
                if touch.touched && !self.touching {
                    pointer = Some(Point::new(touch.x as i32, touch.y as i32));
                }
                self.touching = touch.touched;
            }
            Err(e) => debug!("Primary controller read failed: {}", e),
        }

        for channel in 0..SECONDARY_CHANNELS {
            match secondary.poll(channel) {
                Ok(Some(reading)) => buttons |= reading.pressed(),
                Ok(None) => {}
                Err(e) => debug!("Channel {} read failed: {}", channel, e),
            }
        }

        if !buttons.is_empty() {
            trace!("Input: {:?}", buttons);
        }

        InputFrame { buttons, pointer }
    }

    /// Poll and gate one tick. A touch point that `accept_pointer` takes
    /// fires at once regardless of the cooldown and re-arms it.
    pub fn tick<F>(
        &mut self,
        primary: &mut dyn PrimaryController,
        secondary: &mut dyn SecondaryControllers,
        accept_pointer: F,
    ) -> InputTick
    where
        F: FnOnce(Point) -> bool,
    {
        let frame = self.poll(primary, secondary);

        if let Some(point) = frame.pointer.filter(|&p| accept_pointer(p)) {
            self.gate.rearm();
            return InputTick {
                frame,
                fire: true,
                redraw: true,
                pointer: Some(point),
            };
        }

        let step = self.gate.step(
            !frame.buttons.is_empty(),
            frame.buttons.intersects(PadButtons::ACTIONABLE),
        );
        InputTick {
            frame,
            fire: step.fire,
            redraw: step.redraw,
            pointer: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::controller::{
        ExtensionType, NoSecondaryPads, PrimaryReading, SecondaryReading, TouchSample,
    };
    use anyhow::{anyhow, Result};
    use std::collections::VecDeque;

    struct Script(VecDeque<Result<PrimaryReading>>);

    impl PrimaryController for Script {
        fn poll(&mut self) -> Result<PrimaryReading> {
            self.0.pop_front().unwrap_or_else(|| Ok(PrimaryReading::default()))
        }
    }

    struct Channels(Vec<Result<Option<SecondaryReading>>>);

    impl SecondaryControllers for Channels {
        fn poll(&mut self, channel: usize) -> Result<Option<SecondaryReading>> {
            match self.0.get(channel) {
                Some(Ok(r)) => Ok(*r),
                Some(Err(e)) => Err(anyhow!("{}", e)),
                None => Ok(None),
            }
        }
    }

    fn hold(buttons: PadButtons) -> Result<PrimaryReading> {
        Ok(PrimaryReading {
            hold: buttons,
            ..PrimaryReading::default()
        })
    }

    fn touch(x: u32, y: u32) -> Result<PrimaryReading> {
        Ok(PrimaryReading {
            touch: TouchSample {
                touched: true,
                x,
                y,
            },
            ..PrimaryReading::default()
        })
    }

    #[test]
    fn test_sources_are_ored() {
        let mut primary = Script(VecDeque::from([hold(PadButtons::STICK_L_UP)]));
        let mut channels = Channels(vec![
            Err(anyhow!("disconnected")),
            Ok(Some(SecondaryReading {
                extension: ExtensionType::Classic,
                hold: 0x10,
                trigger: 0x10,
            })),
            Ok(Some(SecondaryReading {
                extension: ExtensionType::Absent,
                hold: 0x8000,
                trigger: 0x8000,
            })),
        ]);
        let mut agg = InputAggregator::new(25);
        let frame = agg.poll(&mut primary, &mut channels);
        assert!(frame.buttons.contains(PadButtons::UP | PadButtons::A));
        assert!(!frame.buttons.contains(PadButtons::RIGHT));
    }

    #[test]
    fn test_primary_error_contributes_nothing() {
        let mut primary = Script(VecDeque::from([Err(anyhow!("busy"))]));
        let mut agg = InputAggregator::new(25);
        let frame = agg.poll(&mut primary, &mut NoSecondaryPads);
        assert_eq!(frame, InputFrame::default());
    }

    #[test]
    fn test_pointer_only_on_contact_edge() {
        let mut primary = Script(VecDeque::from([touch(20, 300), touch(20, 300)]));
        let mut agg = InputAggregator::new(25);
        let first = agg.poll(&mut primary, &mut NoSecondaryPads);
        assert_eq!(first.pointer, Some(Point::new(20, 300)));
        let second = agg.poll(&mut primary, &mut NoSecondaryPads);
        assert_eq!(second.pointer, None);
    }

    #[test]
    fn test_accepted_pointer_bypasses_cooldown() {
        let mut primary = Script(VecDeque::from([touch(20, 300)]));
        let mut agg = InputAggregator::new(25);
        // Still primed: buttons would not fire yet
        let tick = agg.tick(&mut primary, &mut NoSecondaryPads, |_| true);
        assert!(tick.fire && tick.redraw);
        assert_eq!(tick.pointer, Some(Point::new(20, 300)));
        assert_eq!(agg.gate().cooldown(), 25);
    }

    #[test]
    fn test_rejected_pointer_goes_through_gate() {
        let mut primary = Script(VecDeque::from([touch(5, 5)]));
        let mut agg = InputAggregator::new(25);
        let tick = agg.tick(&mut primary, &mut NoSecondaryPads, |_| false);
        assert!(!tick.fire);
        assert!(tick.redraw);
        assert_eq!(tick.pointer, None);
    }
}
