//! Flappy Gopher - A side-scrolling arcade game
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (physics, pipe pool, collisions, modes)
//! - `renderer`: Render pass over an injected drawing surface
//! - `audio`: Sound effect playback through an injected audio backend
//! - `input`: Edge-triggered input polling
//! - `assets`: Startup asset decoding
//! - `platform`: Headless implementations of the host capabilities
//! - `game`: Frame-loop driver

pub mod assets;
pub mod audio;
pub mod game;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::{FrameClock, Game};
pub use settings::Settings;

/// Game configuration constants
///
/// The simulation is tied to these: every speed is per frame at
/// [`consts::TICKS_PER_SECOND`], every distance is in screen pixels.
pub mod consts {
    /// Fixed frame rate of the simulation
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;
    /// Maximum substeps per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Screen dimensions
    pub const SCREEN_WIDTH: f64 = 800.0;
    pub const SCREEN_HEIGHT: f64 = 600.0;

    /// Pipe geometry
    pub const PIPE_WIDTH: u32 = 70;
    /// Horizontal pipe speed (pixels per frame)
    pub const PIPE_DX: f64 = 3.2;
    /// Distance added to the previous pair's x when a pair is recycled
    pub const PIPE_GAP: f64 = 270.0;
    /// Size of the pipe pool
    pub const PIPE_PAIRS: usize = 5;
    pub const MIN_PIPE_HEIGHT: u32 = 80;
    /// Combined height of a top and bottom pipe
    pub const TOTAL_PIPE_HEIGHT: u32 = 425;
    /// Exclusive upper bound of the random height offset
    pub const PIPE_HEIGHT_VARIATION: u32 = 75;
    pub const PIPE_COLOR: [u8; 4] = [30, 200, 15, 0xff];

    /// Background scroll speed (pixels per frame)
    pub const BACKGROUND_DX: f64 = 4.0;

    /// Player physics
    pub const PLAYER_GRAVITY: f64 = 0.15;
    pub const PLAYER_JUMP: f64 = 55.0;
    /// Downward drift given to the player on every (re)start
    pub const PLAYER_START_DY: f64 = 1.5;
    /// How far above the screen top the player may rise before crashing
    pub const CEILING_MARGIN: f64 = -100.0;

    /// Pause between the restart input and the new round (1 second)
    pub const RESTART_DELAY_TICKS: u64 = TICKS_PER_SECOND as u64;

    /// Audio output sample rate
    pub const AUDIO_SAMPLE_RATE: u32 = 48_000;
}
