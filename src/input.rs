//! Edge-triggered input polling
//!
//! Hosts report which controls are held right now. [`EdgeDetector`] keeps the
//! previous tick's state so the simulation only ever sees presses, never holds.

use crate::sim::TickInput;

/// Controls the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Space,
    Enter,
    /// Left mouse button / primary pointer
    PointerPrimary,
}

impl Control {
    pub const ALL: [Control; 3] = [Control::Space, Control::Enter, Control::PointerPrimary];

    fn index(self) -> usize {
        match self {
            Control::Space => 0,
            Control::Enter => 1,
            Control::PointerPrimary => 2,
        }
    }
}

/// Raw control state from the host
pub trait InputSource {
    /// Control is held down at this moment
    fn is_pressed(&self, control: Control) -> bool;
}

/// Turns held state into per-tick presses
#[derive(Debug, Clone, Default)]
pub struct EdgeDetector {
    previous: [bool; Control::ALL.len()],
    current: [bool; Control::ALL.len()],
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample the host once per tick
    pub fn poll(&mut self, source: &dyn InputSource) {
        self.previous = self.current;
        for control in Control::ALL {
            self.current[control.index()] = source.is_pressed(control);
        }
    }

    /// Went from released to pressed on the last poll
    pub fn just_pressed(&self, control: Control) -> bool {
        let i = control.index();
        self.current[i] && !self.previous[i]
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.current[control.index()]
    }

    /// Presses of the last poll, ready for a tick
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            space: self.just_pressed(Control::Space),
            enter: self.just_pressed(Control::Enter),
            pointer: self.just_pressed(Control::PointerPrimary),
            idle_mode: false,
        }
    }
}
