//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (pool slot order)
//! - No rendering or platform dependencies beyond the [`crate::audio::SoundBoard`] seam

pub mod geometry;
pub mod pipes;
pub mod state;
pub mod tick;

pub use geometry::{Bounded, Placement, Rect};
pub use pipes::{generate_heights, heights_from_draw, populate_pipes};
pub use state::{
    Background, CrashCause, GameEvent, GameState, Mode, Pipe, PipePair, Player, Sprite,
    SpriteSource,
};
pub use tick::{TickInput, tick};
