//! Flappy Gopher entry point
//!
//! The native build runs a headless demo: the autopilot plays for the
//! configured number of frames and every frame is drawn into a recording
//! canvas.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use flappy_gopher::assets::Assets;
    use flappy_gopher::consts::SIM_DT;
    use flappy_gopher::platform::headless::{HeadlessAssets, ScriptedInput, SilentAudio};
    use flappy_gopher::renderer::RecordingCanvas;
    use flappy_gopher::sim::GameEvent;
    use flappy_gopher::{Game, Settings};

    env_logger::init();

    let settings = Settings::load();
    log::info!(
        "{} ({}x{}) starting headless",
        settings.window_title,
        settings.window_width,
        settings.window_height
    );
    if !settings.idle_mode {
        log::warn!("Idle mode is off and the headless host sends no input");
    }

    let assets = Assets::load(&mut HeadlessAssets::default())
        .context("failed to load embedded assets")?;
    let seed = settings.seed.unwrap_or_else(clock_seed);
    let mut game = Game::new(&settings, &assets, Box::new(SilentAudio::new()), seed);

    let input = ScriptedInput::default();
    let mut canvas = RecordingCanvas::new();
    let mut rounds = 0u32;
    let mut best = 0u32;

    for _ in 0..settings.demo_frames {
        for event in game.advance(SIM_DT, &input)? {
            if let GameEvent::Crashed(_) = event {
                rounds += 1;
            }
        }
        best = best.max(game.state().score);

        canvas.begin_frame();
        game.draw(&mut canvas);
    }

    log::info!(
        "Demo finished: {} frames drawn, {} rounds lost, best score {}",
        canvas.frames(),
        rounds,
        best
    );
    Ok(())
}

/// Seed from the wall clock when none is configured
#[cfg(not(target_arch = "wasm32"))]
fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Headless demo is native only
}
