//! Sound effect playback
//!
//! The game never decodes or mixes audio itself. A host supplies an
//! [`AudioBackend`] that opens an output context and turns encoded clips into
//! rewindable players; [`AudioManager`] owns those players for the round.

use anyhow::{Context, Result};

use crate::consts::AUDIO_SAMPLE_RATE;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player jumped
    Jump,
    /// Player crashed into a pipe or a screen bound
    Hit,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 2] = [SoundEffect::Jump, SoundEffect::Hit];

    /// Encoding of the embedded clip
    pub fn format(&self) -> ClipFormat {
        match self {
            SoundEffect::Jump => ClipFormat::Vorbis,
            SoundEffect::Hit => ClipFormat::Wav,
        }
    }

    /// Jump restarts from the beginning on every press; Hit plays through once
    pub fn rewinds(&self) -> bool {
        matches!(self, SoundEffect::Jump)
    }
}

/// Container format of an encoded clip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipFormat {
    Vorbis,
    Wav,
}

/// A decodable sound clip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundClip {
    pub effect: SoundEffect,
    pub format: ClipFormat,
}

impl From<SoundEffect> for SoundClip {
    fn from(effect: SoundEffect) -> Self {
        Self {
            effect,
            format: effect.format(),
        }
    }
}

/// Host audio system
pub trait AudioBackend {
    /// Open the shared output context
    fn open_context(&mut self, sample_rate: u32) -> Result<Box<dyn AudioContext>>;
}

/// Shared output context
pub trait AudioContext {
    /// Decode `clip` and return a player bound to this context
    fn new_player(&mut self, clip: SoundClip) -> Result<Box<dyn SoundPlayer>>;
}

/// Playback handle for one decoded clip
pub trait SoundPlayer {
    /// Seek back to the start
    fn rewind(&mut self) -> Result<()>;
    /// Start (or continue) playing
    fn play(&mut self);
    /// Linear volume, 0.0 - 1.0
    fn set_volume(&mut self, volume: f32);
}

/// What the Update step needs from audio
pub trait SoundBoard {
    /// Re-acquire the sound effect players (part of the reset routine)
    fn reload(&mut self) -> Result<()>;
    /// Trigger a sound effect
    fn play(&mut self, effect: SoundEffect) -> Result<()>;
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Box<dyn AudioBackend>,
    /// Created on the first reload, then kept for the whole session
    ctx: Option<Box<dyn AudioContext>>,
    jump: Option<Box<dyn SoundPlayer>>,
    hit: Option<Box<dyn SoundPlayer>>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl AudioManager {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend,
            ctx: None,
            jump: None,
            hit: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
        self.apply_volume();
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
        self.apply_volume();
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.apply_volume();
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    pub fn has_context(&self) -> bool {
        self.ctx.is_some()
    }

    fn apply_volume(&mut self) {
        let vol = self.effective_volume();
        for player in [&mut self.jump, &mut self.hit].into_iter().flatten() {
            player.set_volume(vol);
        }
    }

    fn player_mut(&mut self, effect: SoundEffect) -> Option<&mut Box<dyn SoundPlayer>> {
        match effect {
            SoundEffect::Jump => self.jump.as_mut(),
            SoundEffect::Hit => self.hit.as_mut(),
        }
    }
}

impl SoundBoard for AudioManager {
    fn reload(&mut self) -> Result<()> {
        if self.ctx.is_none() {
            let ctx = self
                .backend
                .open_context(AUDIO_SAMPLE_RATE)
                .context("failed to open audio context")?;
            log::info!("Audio context opened at {} Hz", AUDIO_SAMPLE_RATE);
            self.ctx = Some(ctx);
        }
        let Some(ctx) = self.ctx.as_mut() else {
            return Ok(());
        };

        let jump = ctx
            .new_player(SoundEffect::Jump.into())
            .context("failed to decode jump sound")?;
        let hit = ctx
            .new_player(SoundEffect::Hit.into())
            .context("failed to decode hit sound")?;
        self.jump = Some(jump);
        self.hit = Some(hit);
        self.apply_volume();
        Ok(())
    }

    fn play(&mut self, effect: SoundEffect) -> Result<()> {
        let Some(player) = self.player_mut(effect) else {
            log::warn!("{effect:?} played before sounds were loaded");
            return Ok(());
        };
        if effect.rewinds() {
            player
                .rewind()
                .with_context(|| format!("failed to rewind {effect:?} sound"))?;
        }
        player.play();
        Ok(())
    }
}
