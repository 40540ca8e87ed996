//! Platform abstraction layer
//!
//! The game consumes its host through small traits:
//! - [`crate::assets::AssetLoader`] for image and font decoding
//! - [`crate::audio::AudioBackend`] for sound playback
//! - [`crate::input::InputSource`] for raw control state
//! - [`crate::renderer::Canvas`] for drawing
//!
//! `headless` implements all of them without a window or sound device.

pub mod headless;
