//! Frame-loop driver
//!
//! [`Game`] owns the state and every capability the Update step needs. The
//! host calls [`Game::advance`] once per host frame and [`Game::draw`] after it.

use anyhow::Result;

use crate::assets::Assets;
use crate::audio::{AudioBackend, AudioManager};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::input::{EdgeDetector, InputSource};
use crate::renderer::{self, Canvas};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, tick};

/// Longest host frame the clock will catch up on
const MAX_FRAME_TIME: f32 = 0.1;

/// Fixed timestep accumulator
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `dt` seconds of host time; returns how many ticks to run
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_TIME);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop the backlog instead of spiralling
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Time carried over to the next host frame
    pub fn leftover(&self) -> f32 {
        self.accumulator
    }
}

/// Game instance holding all state
pub struct Game {
    state: GameState,
    audio: AudioManager,
    edges: EdgeDetector,
    clock: FrameClock,
    idle_mode: bool,
}

impl Game {
    pub fn new(
        settings: &Settings,
        assets: &Assets,
        backend: Box<dyn AudioBackend>,
        seed: u64,
    ) -> Self {
        let mut audio = AudioManager::new(backend);
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);

        log::info!("New game (seed {}, idle mode {})", seed, settings.idle_mode);
        Self {
            state: GameState::new(seed, assets),
            audio,
            edges: EdgeDetector::new(),
            clock: FrameClock::new(),
            idle_mode: settings.idle_mode,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }

    pub fn set_idle_mode(&mut self, idle: bool) {
        self.idle_mode = idle;
    }

    /// Run one Update step
    pub fn update(&mut self, source: &dyn InputSource) -> Result<Vec<GameEvent>> {
        self.edges.poll(source);
        let mut input = self.edges.tick_input();
        input.idle_mode = self.idle_mode;

        let events = tick(&mut self.state, &input, &mut self.audio)?;
        for event in &events {
            self.log_event(event);
        }
        Ok(events)
    }

    /// Run as many Update steps as `dt` seconds of host time call for
    pub fn advance(&mut self, dt: f32, source: &dyn InputSource) -> Result<Vec<GameEvent>> {
        let mut events = Vec::new();
        for _ in 0..self.clock.advance(dt) {
            events.extend(self.update(source)?);
        }
        Ok(events)
    }

    /// Render the current frame
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        renderer::draw(&self.state, canvas);
    }

    fn log_event(&self, event: &GameEvent) {
        match event {
            GameEvent::Started => log::info!("Round started at frame {}", self.state.frame),
            GameEvent::Crashed(cause) => log::info!(
                "Game over ({:?}) after {} frames, score {}",
                cause,
                self.state.count,
                self.state.score
            ),
            GameEvent::RestartScheduled { resume_at } => {
                log::info!("Restart scheduled for frame {}", resume_at)
            }
            GameEvent::Jumped => log::trace!("Jump at frame {}", self.state.frame),
            GameEvent::Scored { .. } | GameEvent::PairRecycled { .. } => {}
        }
    }
}
