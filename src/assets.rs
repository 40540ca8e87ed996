//! Startup asset decoding
//!
//! Images and the font are decoded once, before the first frame. They are
//! baked into the build, so a failure here means a broken build: it aborts
//! startup with no retry.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Embedded images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageAsset {
    Background,
    Gopher,
}

impl ImageAsset {
    pub fn file_name(&self) -> &'static str {
        match self {
            ImageAsset::Background => "background.png",
            ImageAsset::Gopher => "gopher.png",
        }
    }
}

/// Embedded font faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontAsset {
    PressStart2P,
}

/// Decoded image dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

/// Host decoder for embedded assets
pub trait AssetLoader {
    fn decode_image(&mut self, asset: ImageAsset) -> Result<ImageInfo>;
    fn load_font(&mut self, font: FontAsset) -> Result<()>;
}

/// Everything the simulation needs to know about the decoded assets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assets {
    pub background: ImageInfo,
    pub gopher: ImageInfo,
}

impl Assets {
    /// Decode all embedded assets, failing on the first bad one
    pub fn load(loader: &mut dyn AssetLoader) -> Result<Self> {
        let background = decode_image(loader, ImageAsset::Background)?;
        let gopher = decode_image(loader, ImageAsset::Gopher)?;
        loader
            .load_font(FontAsset::PressStart2P)
            .context("failed to load font face")?;

        log::info!(
            "Assets decoded: background {}x{}, gopher {}x{}",
            background.width,
            background.height,
            gopher.width,
            gopher.height
        );
        Ok(Self { background, gopher })
    }
}

fn decode_image(loader: &mut dyn AssetLoader, asset: ImageAsset) -> Result<ImageInfo> {
    let info = loader
        .decode_image(asset)
        .with_context(|| format!("failed to decode {}", asset.file_name()))?;
    if info.width == 0 || info.height == 0 {
        bail!(
            "{} decoded to an empty {}x{} image",
            asset.file_name(),
            info.width,
            info.height
        );
    }
    Ok(info)
}
