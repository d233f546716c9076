//! Controller button layouts
//!
//! Three bit layouts reach the keyboard: the primary pad (which is also the
//! canonical layout everything is folded into), the core remote, and the
//! classic controller family. Only the d-pad, confirm, and cancel survive
//! normalization.

use bitflags::bitflags;

bitflags! {
    /// Primary pad buttons (canonical layout)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PadButtons: u32 {
        const HOME          = 0x0000_0002;
        const MINUS         = 0x0000_0004;
        const PLUS          = 0x0000_0008;
        const R             = 0x0000_0010;
        const L             = 0x0000_0020;
        const ZR            = 0x0000_0040;
        const ZL            = 0x0000_0080;
        const DOWN          = 0x0000_0100;
        const UP            = 0x0000_0200;
        const RIGHT         = 0x0000_0400;
        const LEFT          = 0x0000_0800;
        const Y             = 0x0000_1000;
        const X             = 0x0000_2000;
        const B             = 0x0000_4000;
        const A             = 0x0000_8000;
        const STICK_L_DOWN  = 0x0800_0000;
        const STICK_L_UP    = 0x1000_0000;
        const STICK_L_RIGHT = 0x2000_0000;
        const STICK_L_LEFT  = 0x4000_0000;
    }
}

bitflags! {
    /// Core remote buttons (nunchuk buttons share the word)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CoreButtons: u32 {
        const LEFT  = 0x0001;
        const RIGHT = 0x0002;
        const DOWN  = 0x0004;
        const UP    = 0x0008;
        const PLUS  = 0x0010;
        const TWO   = 0x0100;
        const ONE   = 0x0200;
        const B     = 0x0400;
        const A     = 0x0800;
        const MINUS = 0x1000;
        const Z     = 0x2000;
        const C     = 0x4000;
        const HOME  = 0x8000;
    }
}

bitflags! {
    /// Classic / pro controller buttons
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ClassicButtons: u32 {
        const UP            = 0x0000_0001;
        const LEFT          = 0x0000_0002;
        const ZR            = 0x0000_0004;
        const X             = 0x0000_0008;
        const A             = 0x0000_0010;
        const Y             = 0x0000_0020;
        const B             = 0x0000_0040;
        const ZL            = 0x0000_0080;
        const R             = 0x0000_0200;
        const PLUS          = 0x0000_0400;
        const HOME          = 0x0000_0800;
        const MINUS         = 0x0000_1000;
        const L             = 0x0000_2000;
        const DOWN          = 0x0000_4000;
        const RIGHT         = 0x0000_8000;
        const STICK_L_LEFT  = 0x0001_0000;
        const STICK_L_RIGHT = 0x0002_0000;
        const STICK_L_UP    = 0x0004_0000;
        const STICK_L_DOWN  = 0x0008_0000;
    }
}

impl PadButtons {
    /// Accept a selected key
    pub const CONFIRM: PadButtons = PadButtons::A;
    /// Backspace, or leave with the original text at cursor 0
    pub const CANCEL: PadButtons = PadButtons::B;
    /// Everything the repeat gate acts on
    pub const ACTIONABLE: PadButtons = PadButtons::UP
        .union(PadButtons::DOWN)
        .union(PadButtons::LEFT)
        .union(PadButtons::RIGHT)
        .union(PadButtons::A)
        .union(PadButtons::B);

    /// Fold left-stick emulation into the d-pad
    pub fn normalize(self) -> Self {
        const FOLD: [(PadButtons, PadButtons); 4] = [
            (PadButtons::STICK_L_RIGHT, PadButtons::RIGHT),
            (PadButtons::STICK_L_LEFT, PadButtons::LEFT),
            (PadButtons::STICK_L_DOWN, PadButtons::DOWN),
            (PadButtons::STICK_L_UP, PadButtons::UP),
        ];
        let mut out = self;
        for (stick, dpad) in FOLD {
            if self.contains(stick) {
                out |= dpad;
            }
        }
        out
    }
}

impl CoreButtons {
    pub fn to_pad(self) -> PadButtons {
        const MAP: [(CoreButtons, PadButtons); 6] = [
            (CoreButtons::RIGHT, PadButtons::RIGHT),
            (CoreButtons::LEFT, PadButtons::LEFT),
            (CoreButtons::DOWN, PadButtons::DOWN),
            (CoreButtons::UP, PadButtons::UP),
            (CoreButtons::A, PadButtons::A),
            (CoreButtons::B, PadButtons::B),
        ];
        translate(self, &MAP)
    }
}

impl ClassicButtons {
    pub fn to_pad(self) -> PadButtons {
        const MAP: [(ClassicButtons, PadButtons); 10] = [
            (ClassicButtons::RIGHT, PadButtons::RIGHT),
            (ClassicButtons::LEFT, PadButtons::LEFT),
            (ClassicButtons::DOWN, PadButtons::DOWN),
            (ClassicButtons::UP, PadButtons::UP),
            (ClassicButtons::A, PadButtons::A),
            (ClassicButtons::B, PadButtons::B),
            (ClassicButtons::STICK_L_RIGHT, PadButtons::RIGHT),
            (ClassicButtons::STICK_L_LEFT, PadButtons::LEFT),
            (ClassicButtons::STICK_L_DOWN, PadButtons::DOWN),
            (ClassicButtons::STICK_L_UP, PadButtons::UP),
        ];
        translate(self, &MAP)
    }
}

fn translate<F: bitflags::Flags + Copy>(from: F, map: &[(F, PadButtons)]) -> PadButtons {
    map.iter()
        .filter(|(src, _)| from.contains(*src))
        .fold(PadButtons::empty(), |acc, (_, dst)| acc | *dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stick_folds_into_dpad() {
        let b = (PadButtons::STICK_L_LEFT | PadButtons::STICK_L_DOWN).normalize();
        assert!(b.contains(PadButtons::LEFT | PadButtons::DOWN));
        assert!(!b.contains(PadButtons::RIGHT));
    }

    #[test]
    fn test_core_mapping() {
        let raw = CoreButtons::from_bits_truncate(0x0800 | 0x0001 | 0x0100);
        assert_eq!(raw.to_pad(), PadButtons::A | PadButtons::LEFT);
        assert_eq!(CoreButtons::B.to_pad(), PadButtons::CANCEL);
    }

    #[test]
    fn test_classic_mapping() {
        let raw = ClassicButtons::A | ClassicButtons::STICK_L_UP | ClassicButtons::ZL;
        assert_eq!(raw.to_pad(), PadButtons::A | PadButtons::UP);
        assert_eq!(
            ClassicButtons::from_bits_truncate(0x8000 | 0x0040).to_pad(),
            PadButtons::RIGHT | PadButtons::B
        );
    }

    #[test]
    fn test_actionable_excludes_shoulders() {
        assert!(!PadButtons::ACTIONABLE.intersects(PadButtons::L | PadButtons::ZR | PadButtons::HOME));
        assert!(PadButtons::ACTIONABLE.contains(PadButtons::CONFIRM | PadButtons::CANCEL));
    }
}
