//! Headless host: no window, no sound device
//!
//! Used by the native binary's demo run and by tests. Audio records what it
//! was asked to do instead of making noise.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use anyhow::{Result, anyhow, bail};

use crate::assets::{AssetLoader, FontAsset, ImageAsset, ImageInfo};
use crate::audio::{AudioBackend, AudioContext, SoundClip, SoundEffect, SoundPlayer};
use crate::input::{Control, InputSource};

/// Image decoder reporting fixed dimensions
#[derive(Debug, Clone)]
pub struct HeadlessAssets {
    sizes: HashMap<ImageAsset, ImageInfo>,
    corrupt: HashSet<ImageAsset>,
}

impl Default for HeadlessAssets {
    fn default() -> Self {
        let sizes = HashMap::from([
            (
                ImageAsset::Background,
                ImageInfo {
                    width: 800,
                    height: 600,
                },
            ),
            (
                ImageAsset::Gopher,
                ImageInfo {
                    width: 70,
                    height: 40,
                },
            ),
        ]);
        Self {
            sizes,
            corrupt: HashSet::new(),
        }
    }
}

impl HeadlessAssets {
    pub fn with_size(mut self, asset: ImageAsset, info: ImageInfo) -> Self {
        self.sizes.insert(asset, info);
        self
    }

    /// Make decoding `asset` fail
    pub fn corrupt(mut self, asset: ImageAsset) -> Self {
        self.corrupt.insert(asset);
        self
    }
}

impl AssetLoader for HeadlessAssets {
    fn decode_image(&mut self, asset: ImageAsset) -> Result<ImageInfo> {
        if self.corrupt.contains(&asset) {
            bail!("invalid PNG signature");
        }
        self.sizes
            .get(&asset)
            .copied()
            .ok_or_else(|| anyhow!("no image data for {asset:?}"))
    }

    fn load_font(&mut self, _font: FontAsset) -> Result<()> {
        Ok(())
    }
}

/// One call made on a player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackAction {
    Rewind(SoundEffect),
    Play(SoundEffect),
}

/// Everything the silent backend was asked to do
#[derive(Debug, Default)]
pub struct PlaybackLog {
    pub contexts_opened: u32,
    pub players_created: u32,
    pub actions: Vec<PlaybackAction>,
    /// Last volume set on any player
    pub volume: Option<f32>,
}

impl PlaybackLog {
    pub fn plays(&self, effect: SoundEffect) -> usize {
        self.actions
            .iter()
            .filter(|a| **a == PlaybackAction::Play(effect))
            .count()
    }
}

/// Audio backend that records instead of playing
#[derive(Debug, Default)]
pub struct SilentAudio {
    log: Rc<RefCell<PlaybackLog>>,
    fail_rewind: bool,
}

impl SilentAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every rewind returns an error
    pub fn failing_rewind(mut self) -> Self {
        self.fail_rewind = true;
        self
    }

    /// Shared handle to the playback log
    pub fn log(&self) -> Rc<RefCell<PlaybackLog>> {
        Rc::clone(&self.log)
    }
}

impl AudioBackend for SilentAudio {
    fn open_context(&mut self, sample_rate: u32) -> Result<Box<dyn AudioContext>> {
        if sample_rate == 0 {
            bail!("invalid sample rate");
        }
        self.log.borrow_mut().contexts_opened += 1;
        Ok(Box::new(SilentContext {
            log: Rc::clone(&self.log),
            fail_rewind: self.fail_rewind,
        }))
    }
}

struct SilentContext {
    log: Rc<RefCell<PlaybackLog>>,
    fail_rewind: bool,
}

impl AudioContext for SilentContext {
    fn new_player(&mut self, clip: SoundClip) -> Result<Box<dyn SoundPlayer>> {
        self.log.borrow_mut().players_created += 1;
        Ok(Box::new(SilentPlayer {
            effect: clip.effect,
            log: Rc::clone(&self.log),
            fail_rewind: self.fail_rewind,
        }))
    }
}

struct SilentPlayer {
    effect: SoundEffect,
    log: Rc<RefCell<PlaybackLog>>,
    fail_rewind: bool,
}

impl SoundPlayer for SilentPlayer {
    fn rewind(&mut self) -> Result<()> {
        if self.fail_rewind {
            bail!("seek failed");
        }
        self.log
            .borrow_mut()
            .actions
            .push(PlaybackAction::Rewind(self.effect));
        Ok(())
    }

    fn play(&mut self) {
        self.log
            .borrow_mut()
            .actions
            .push(PlaybackAction::Play(self.effect));
    }

    fn set_volume(&mut self, volume: f32) {
        self.log.borrow_mut().volume = Some(volume);
    }
}

/// Input source driven by code
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    held: HashSet<Control>,
}

impl ScriptedInput {
    pub fn press(&mut self, control: Control) {
        self.held.insert(control);
    }

    pub fn release(&mut self, control: Control) {
        self.held.remove(&control);
    }

    pub fn release_all(&mut self) {
        self.held.clear();
    }
}

impl InputSource for ScriptedInput {
    fn is_pressed(&self, control: Control) -> bool {
        self.held.contains(&control)
    }
}
