//! Canvas that records draw calls instead of rasterizing them

use super::{Canvas, TextStyle};
use crate::sim::{Placement, Sprite, SpriteSource};

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Sprite {
        source: SpriteSource,
        width: u32,
        height: u32,
        x: f64,
        y: f64,
        scale_x: f64,
    },
    Text {
        text: String,
        style: TextStyle,
        x: f64,
        y: f64,
    },
}

/// Records every draw call of a frame in submission order
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
    frames: u64,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame, dropping the previous one's commands
    pub fn begin_frame(&mut self) {
        self.commands.clear();
        self.frames += 1;
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Frames begun so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn sprite_sources(&self) -> Vec<SpriteSource> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Sprite { source, .. } => Some(*source),
                DrawCommand::Text { .. } => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                DrawCommand::Sprite { .. } => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn draw_sprite(&mut self, sprite: &Sprite, placement: &Placement) {
        self.commands.push(DrawCommand::Sprite {
            source: sprite.source,
            width: sprite.width,
            height: sprite.height,
            x: placement.x(),
            y: placement.y(),
            scale_x: placement.scale_x(),
        });
    }

    fn draw_text(&mut self, text: &str, style: &TextStyle, x: f64, y: f64) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            style: *style,
            x,
            y,
        });
    }
}
