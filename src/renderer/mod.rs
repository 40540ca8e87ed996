//! Render pass
//!
//! Drawing goes through an injected [`Canvas`]: the game never blits pixels
//! itself. [`draw`] only reads the state, so it may run any number of times
//! per Update step.

pub mod recording;

pub use recording::{DrawCommand, RecordingCanvas};

use crate::assets::FontAsset;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::{GameState, Mode, Placement, Sprite};

/// Colors for on-screen text
pub mod colors {
    pub const TEXT: [u8; 4] = [0xff, 0xff, 0xff, 0xff];
}

const START_PROMPT: &str = "Press Space/Enter to start the game";
const JUMP_PROMPT: &str = "Press Space/LeftClick to jump";
const RESTART_PROMPT: &str = "Press Enter to restart the game";

/// Horizontal anchoring of a text run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: FontAsset,
    /// Font size in pixels
    pub size: f64,
    pub align: Align,
    pub color: [u8; 4],
}

impl TextStyle {
    /// White, centred Press Start 2P at `size`
    pub fn centered(size: f64) -> Self {
        Self {
            font: FontAsset::PressStart2P,
            size,
            align: Align::Center,
            color: colors::TEXT,
        }
    }
}

/// Host drawing surface
pub trait Canvas {
    /// Blit `sprite` with the given transform
    fn draw_sprite(&mut self, sprite: &Sprite, placement: &Placement);
    /// Draw `text` anchored at (x, y)
    fn draw_text(&mut self, text: &str, style: &TextStyle, x: f64, y: f64);
}

/// Draw one frame
pub fn draw(state: &GameState, canvas: &mut dyn Canvas) {
    let center_x = SCREEN_WIDTH / 2.0;

    match state.mode {
        Mode::Title => {
            let bg = &state.backgrounds[0];
            canvas.draw_sprite(&bg.sprite, &bg.placement);

            let style = TextStyle::centered(20.0);
            let y = SCREEN_HEIGHT / 2.0;
            canvas.draw_text(START_PROMPT, &style, center_x, y);
            canvas.draw_text(JUMP_PROMPT, &style, center_x, y + 50.0);
        }
        Mode::Game => {
            draw_world(state, canvas);
            canvas.draw_text(
                &state.score.to_string(),
                &TextStyle::centered(50.0),
                center_x,
                100.0,
            );
        }
        Mode::Over | Mode::Restarting { .. } => {
            draw_world(state, canvas);
            canvas.draw_text(
                &format!("Final Score : {}", state.score),
                &TextStyle::centered(30.0),
                center_x,
                100.0,
            );
            canvas.draw_text(RESTART_PROMPT, &TextStyle::centered(20.0), center_x, 300.0);
        }
    }
}

/// Backgrounds, then pipes in pool order (top before bottom), then the player
fn draw_world(state: &GameState, canvas: &mut dyn Canvas) {
    for bg in &state.backgrounds {
        canvas.draw_sprite(&bg.sprite, &bg.placement);
    }
    for pair in &state.pipes {
        for pipe in pair.pipes() {
            canvas.draw_sprite(&pipe.sprite, &pipe.placement);
        }
    }
    canvas.draw_sprite(&state.player.sprite, &state.player.placement);
}
