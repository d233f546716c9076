//! Cooldown / auto-repeat gate
//!
//! One counter shared by every button. Actions fire only when the counter
//! is zero; firing re-arms it. While anything stays held the counter runs
//! down to the next repeat, releasing everything snaps it back to zero so
//! the next press acts immediately.

/// Result of one gate step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GateStep {
    /// Buttons in this tick's mask should act
    pub fire: bool,
    /// The frame should be (re)drawn this tick
    pub redraw: bool,
}

#[derive(Debug, Clone)]
pub struct RepeatGate {
    cooldown: u32,
    repeat: u32,
}

impl RepeatGate {
    /// Primed one step above the repeat interval so the first tick draws
    pub fn new(repeat: u32) -> Self {
        let repeat = repeat.max(1);
        Self {
            cooldown: repeat.saturating_add(1),
            repeat,
        }
    }

    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    fn primed(&self) -> bool {
        self.cooldown == self.repeat.saturating_add(1)
    }

    /// Advance one tick. `held` is any input at all, `actionable` whether
    /// the mask contains a button the keyboard acts on.
    pub fn step(&mut self, held: bool, actionable: bool) -> GateStep {
        let mut fire = false;
        if self.cooldown == 0 {
            if actionable {
                fire = true;
                self.cooldown = self.repeat;
            }
        } else if held || self.primed() {
            self.cooldown -= 1;
        } else {
            self.cooldown = 0;
        }

        GateStep {
            fire,
            redraw: self.cooldown == self.repeat,
        }
    }

    /// Restart the repeat interval after an out-of-band action
    pub fn rearm(&mut self) {
        self.cooldown = self.repeat;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_draws_without_firing() {
        let mut gate = RepeatGate::new(25);
        assert_eq!(gate.cooldown(), 26);
        let step = gate.step(false, false);
        assert_eq!(step, GateStep { fire: false, redraw: true });
        assert_eq!(gate.cooldown(), 25);
    }

    #[test]
    fn test_release_snaps_to_zero() {
        let mut gate = RepeatGate::new(25);
        gate.step(false, false);
        let step = gate.step(false, false);
        assert_eq!(gate.cooldown(), 0);
        assert!(!step.redraw);
        // Next press acts at once
        let step = gate.step(true, true);
        assert!(step.fire && step.redraw);
    }

    #[test]
    fn test_held_button_repeats_every_interval() {
        let mut gate = RepeatGate::new(25);
        gate.step(false, false);
        gate.step(false, false);
        assert!(gate.step(true, true).fire);

        let mut fired_after = None;
        for tick in 1..=40 {
            if gate.step(true, true).fire {
                fired_after = Some(tick);
                break;
            }
        }
        // 25 ticks to run down, fires on the 26th
        assert_eq!(fired_after, Some(26));
    }

    #[test]
    fn test_non_actionable_input_does_not_fire() {
        let mut gate = RepeatGate::new(25);
        gate.step(false, false);
        gate.step(false, false);
        let step = gate.step(true, false);
        assert!(!step.fire);
        assert_eq!(gate.cooldown(), 0);
    }

    #[test]
    fn test_huge_interval_does_not_overflow() {
        let mut gate = RepeatGate::new(u32::MAX);
        assert_eq!(gate.cooldown(), u32::MAX);
        let step = gate.step(false, true);
        assert!(!step.fire);
        assert_eq!(gate.cooldown(), u32::MAX - 1);
        gate.rearm();
        assert!(gate.step(true, true).redraw);
    }

    #[test]
    fn test_rearm() {
        let mut gate = RepeatGate::new(25);
        gate.step(false, false);
        gate.step(false, false);
        gate.rearm();
        assert_eq!(gate.cooldown(), 25);
    }
}
