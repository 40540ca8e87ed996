//! Fixed timestep simulation tick
//!
//! One call to [`tick`] is one frame of the Update step. The frame counter
//! advances in every mode; physics only runs in [`Mode::Game`].

use anyhow::Result;

use super::geometry::Bounded;
use super::state::{Background, CrashCause, GameEvent, GameState, Mode, Player};
use crate::audio::{SoundBoard, SoundEffect};
use crate::consts::*;

/// How far above the gap bottom the autopilot keeps the player's feet
const AUTOPILOT_CLEARANCE: f64 = 8.0;

/// Input commands for a single tick (deterministic)
///
/// Every flag is edge-triggered: true only on the tick the control went down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub space: bool,
    pub enter: bool,
    /// Primary pointer button
    pub pointer: bool,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

impl TickInput {
    /// Leaves the title screen
    pub fn start(&self) -> bool {
        self.space || self.enter
    }

    pub fn jump(&self) -> bool {
        self.space || self.pointer
    }

    /// Leaves the game over screen
    pub fn restart(&self) -> bool {
        self.enter
    }
}

/// Advance the game state by one frame
///
/// Returns what happened during the frame. Audio failures abort the frame
/// and are returned as errors.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    sfx: &mut dyn SoundBoard,
) -> Result<Vec<GameEvent>> {
    let mut events = Vec::new();

    let input = if input.idle_mode {
        autopilot(state, input)
    } else {
        *input
    };

    match state.mode {
        Mode::Title => {
            if input.start() {
                start_round(state, sfx, &mut events)?;
            }
        }
        Mode::Game => step_game(state, &input, sfx, &mut events)?,
        Mode::Over => {
            if input.restart() {
                let resume_at = state.frame + RESTART_DELAY_TICKS;
                state.mode = Mode::Restarting { resume_at };
                events.push(GameEvent::RestartScheduled { resume_at });
            }
        }
        Mode::Restarting { resume_at } => {
            if state.frame >= resume_at {
                start_round(state, sfx, &mut events)?;
            }
        }
    }

    state.frame += 1;
    Ok(events)
}

/// Reset routine plus the switch into Game
fn start_round(
    state: &mut GameState,
    sfx: &mut dyn SoundBoard,
    events: &mut Vec<GameEvent>,
) -> Result<()> {
    state.reset();
    sfx.reload()?;
    state.mode = Mode::Game;
    events.push(GameEvent::Started);
    Ok(())
}

fn step_game(
    state: &mut GameState,
    input: &TickInput,
    sfx: &mut dyn SoundBoard,
    events: &mut Vec<GameEvent>,
) -> Result<()> {
    state.count += 1;
    scroll_backgrounds(&mut state.backgrounds);

    state.player.fall();
    if input.jump() {
        sfx.play(SoundEffect::Jump)?;
        state.player.jump();
        events.push(GameEvent::Jumped);
    }
    state.player.update_rect();

    if let Some(cause) = world_bounds_crash(&state.player) {
        return crash(state, cause, sfx, events);
    }

    scroll_pipes(state, events);
    check_pipes(state, sfx, events)
}

/// Two-layer ring scroll: a layer that leaves on the left re-enters
/// directly right of the other one
fn scroll_backgrounds(backgrounds: &mut [Background; 2]) {
    for bg in backgrounds.iter_mut() {
        bg.scroll();
    }
    for i in 0..backgrounds.len() {
        if backgrounds[i].is_off_screen() {
            let other_x = backgrounds[1 - i].placement.x();
            backgrounds[i].placement.set_x(other_x + SCREEN_WIDTH);
        }
    }
}

fn world_bounds_crash(player: &Player) -> Option<CrashCause> {
    if player.bottom_edge() >= SCREEN_HEIGHT {
        Some(CrashCause::Ground)
    } else if player.placement.y() < CEILING_MARGIN {
        Some(CrashCause::Ceiling)
    } else {
        None
    }
}

/// Scroll every pipe, recycle the ones that left the screen, then give
/// recycled pairs fresh heights
fn scroll_pipes(state: &mut GameState, events: &mut Vec<GameEvent>) {
    for pair in state.pipes.iter_mut() {
        pair.scroll(PIPE_DX);
    }

    let mut dirty = [false; PIPE_PAIRS];
    for (i, is_dirty) in dirty.iter_mut().enumerate() {
        let new_x = state.pipes[GameState::previous_slot(i)].x() + PIPE_GAP;
        let pair = &mut state.pipes[i];
        for pipe in pair.pipes_mut() {
            if pipe.right_edge() <= 0.0 {
                pipe.set_x(new_x);
                *is_dirty = true;
            }
        }
        if *is_dirty {
            pair.crossed = false;
        }
    }

    for (i, _) in dirty.iter().enumerate().filter(|(_, d)| **d) {
        state.regenerate_heights(i);
        log::debug!("Pipe pair {} recycled to x={:.1}", i, state.pipes[i].x());
        events.push(GameEvent::PairRecycled { pair: i });
    }
}

/// Collision against every pipe and scoring against top pipes
///
/// Stops at the first hit: nothing scores after the round has ended.
fn check_pipes(
    state: &mut GameState,
    sfx: &mut dyn SoundBoard,
    events: &mut Vec<GameEvent>,
) -> Result<()> {
    let player_rect = *state.player.rect();
    let scoring_line = state.player.scoring_line();

    for i in 0..PIPE_PAIRS {
        let hit = state.pipes[i]
            .pipes()
            .iter()
            .any(|pipe| pipe.rect().overlaps(&player_rect));
        if hit {
            return crash(state, CrashCause::Pipe { pair: i }, sfx, events);
        }

        let pair = &mut state.pipes[i];
        if !pair.crossed && pair.top.right_edge() <= scoring_line {
            pair.crossed = true;
            state.score += 1;
            log::debug!("Scored on pair {} (score {})", i, state.score);
            events.push(GameEvent::Scored { score: state.score });
        }
    }
    Ok(())
}

fn crash(
    state: &mut GameState,
    cause: CrashCause,
    sfx: &mut dyn SoundBoard,
    events: &mut Vec<GameEvent>,
) -> Result<()> {
    state.mode = Mode::Over;
    events.push(GameEvent::Crashed(cause));
    sfx.play(SoundEffect::Hit)
}

/// Replace the player's input with the demo player's
fn autopilot(state: &GameState, input: &TickInput) -> TickInput {
    let mut input = *input;
    match state.mode {
        Mode::Title | Mode::Over => input.enter = true,
        Mode::Restarting { .. } => {}
        Mode::Game => {
            let player = &state.player;
            let player_x = player.placement.x();

            // Nearest pair whose top pipe is not yet behind the player
            let gap_bottom = state
                .pipes
                .iter()
                .filter(|pair| pair.top.right_edge() > player_x)
                .min_by(|a, b| a.x().total_cmp(&b.x()))
                .map(|pair| pair.gap().1)
                .unwrap_or(SCREEN_HEIGHT);

            let next_bottom = player.bottom_edge() + player.dy + player.gravity;
            input.space = next_bottom >= gap_bottom - AUTOPILOT_CLEARANCE;
            input.pointer = false;
        }
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Assets;
    use crate::audio::AudioManager;
    use crate::platform::headless::{HeadlessAssets, SilentAudio};

    fn new_state(seed: u64) -> GameState {
        let assets = Assets::load(&mut HeadlessAssets::default()).unwrap();
        GameState::new(seed, &assets)
    }

    fn sfx() -> AudioManager {
        AudioManager::new(Box::new(SilentAudio::new()))
    }

    /// State already in Game
    fn playing(seed: u64) -> (GameState, AudioManager) {
        let mut state = new_state(seed);
        let mut sfx = sfx();
        let start = TickInput {
            enter: true,
            ..Default::default()
        };
        tick(&mut state, &start, &mut sfx).unwrap();
        assert_eq!(state.mode, Mode::Game);
        (state, sfx)
    }

    /// Hold the player at `y` for the next frame (gravity cancels out)
    fn hover_at(state: &mut GameState, y: f64) {
        let x = state.player.placement.x();
        state.player.set_position(x, y);
        state.player.dy = -state.player.gravity;
    }

    #[test]
    fn test_title_waits_for_start() {
        let mut state = new_state(1);
        let mut sfx = sfx();

        let events = tick(&mut state, &TickInput::default(), &mut sfx).unwrap();
        assert!(events.is_empty());
        assert_eq!(state.mode, Mode::Title);

        // Pointer only jumps, it does not start
        let click = TickInput {
            pointer: true,
            ..Default::default()
        };
        tick(&mut state, &click, &mut sfx).unwrap();
        assert_eq!(state.mode, Mode::Title);
        assert!(!sfx.has_context());

        let space = TickInput {
            space: true,
            ..Default::default()
        };
        let events = tick(&mut state, &space, &mut sfx).unwrap();
        assert_eq!(events, vec![GameEvent::Started]);
        assert_eq!(state.mode, Mode::Game);
        assert!(sfx.has_context());
    }

    #[test]
    fn test_start_resets_round() {
        let (state, _) = playing(2);
        assert_eq!(state.score, 0);
        assert_eq!(state.count, 0);
        assert_eq!(state.player.placement.y(), 280.0);
        assert_eq!(state.player.dy, PLAYER_START_DY);
        assert_eq!(state.backgrounds[0].placement.x(), 0.0);
        assert_eq!(state.backgrounds[1].placement.x(), SCREEN_WIDTH);
        for pair in &state.pipes {
            assert_eq!(pair.top.height() + pair.bottom.height(), TOTAL_PIPE_HEIGHT);
            assert!(!pair.crossed);
        }
    }

    #[test]
    fn test_fall_then_jump() {
        let (mut state, mut sfx) = playing(3);

        tick(&mut state, &TickInput::default(), &mut sfx).unwrap();
        assert!((state.player.dy - 1.65).abs() < 1e-12);
        assert!((state.player.placement.y() - 281.65).abs() < 1e-9);
        assert_eq!(state.player.rect().min_y, 281);

        let jump = TickInput {
            pointer: true,
            ..Default::default()
        };
        let events = tick(&mut state, &jump, &mut sfx).unwrap();
        assert_eq!(events, vec![GameEvent::Jumped]);
        assert_eq!(state.player.dy, 0.0);
        assert!((state.player.placement.y() - 228.45).abs() < 1e-9);
        assert_eq!(state.player.rect().min_y, 228);
        assert_eq!(state.count, 2);
    }

    #[test]
    fn test_ground_collision_boundary() {
        let (mut state, mut sfx) = playing(4);
        hover_at(&mut state, 550.0);
        tick(&mut state, &TickInput::default(), &mut sfx).unwrap();
        assert_eq!(state.mode, Mode::Game);

        hover_at(&mut state, 561.0);
        let events = tick(&mut state, &TickInput::default(), &mut sfx).unwrap();
        assert_eq!(events, vec![GameEvent::Crashed(CrashCause::Ground)]);
        assert_eq!(state.mode, Mode::Over);
    }

    #[test]
    fn test_ground_crash_stops_frame() {
        let (mut state, mut sfx) = playing(4);
        let before = state.pipes[0].x();
        hover_at(&mut state, 570.0);
        tick(&mut state, &TickInput::default(), &mut sfx).unwrap();
        assert_eq!(state.mode, Mode::Over);
        assert_eq!(state.pipes[0].x(), before);
    }

    #[test]
    fn test_ceiling_collision() {
        let (mut state, mut sfx) = playing(5);
        hover_at(&mut state, -100.0);
        tick(&mut state, &TickInput::default(), &mut sfx).unwrap();
        assert_eq!(state.mode, Mode::Game);

        hover_at(&mut state, -101.0);
        let events = tick(&mut state, &TickInput::default(), &mut sfx).unwrap();
        assert_eq!(events, vec![GameEvent::Crashed(CrashCause::Ceiling)]);
    }

    #[test]
    fn test_scores_exactly_once() {
        let (mut state, mut sfx) = playing(6);
        // Right edge lands at 266.8 after scrolling, left of the 295 line
        state.pipes[0].set_x(200.0);

        let events = tick(&mut state, &TickInput::default(), &mut sfx).unwrap();
        assert_eq!(events, vec![GameEvent::Scored { score: 1 }]);
        assert!(state.pipes[0].crossed);

        for _ in 0..10 {
            let events = tick(&mut state, &TickInput::default(), &mut sfx).unwrap();
            assert!(events.is_empty());
        }
        assert_eq!(state.score, 1);
        assert!(state.pipes[0].crossed);
    }

    #[test]
    fn test_pipe_collision_ends_round_without_scoring() {
        let (mut state, mut sfx) = playing(7);
        state.pipes[0].set_heights((345, 80));
        state.pipes[0].set_x(380.0);
        // Would score this frame if the round went on
        state.pipes[1].set_x(150.0);

        let events = tick(&mut state, &TickInput::default(), &mut sfx).unwrap();
        assert_eq!(events, vec![GameEvent::Crashed(CrashCause::Pipe { pair: 0 })]);
        assert_eq!(state.mode, Mode::Over);
        assert_eq!(state.score, 0);
        assert!(!state.pipes[1].crossed);
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let (mut state, mut sfx) = playing(7);
        state.pipes[0].set_heights((345, 80));
        // Right edge lands on the player's left edge (365)
        state.pipes[0].set_x(295.0 + PIPE_DX);
        tick(&mut state, &TickInput::default(), &mut sfx).unwrap();
        assert_eq!(state.mode, Mode::Game);
    }

    #[test]
    fn test_recycle_lands_behind_previous_slot() {
        let (mut state, mut sfx) = playing(8);
        state.pipes[0].set_x(-68.0);
        state.pipes[0].crossed = true;

        let events = tick(&mut state, &TickInput::default(), &mut sfx).unwrap();
        assert!(events.contains(&GameEvent::PairRecycled { pair: 0 }));

        let pair = &state.pipes[0];
        assert_eq!(pair.x(), state.pipes[4].x() + PIPE_GAP);
        assert_eq!(pair.bottom.placement.x(), pair.x());
        assert!(!pair.crossed);
        assert_eq!(pair.top.height() + pair.bottom.height(), TOTAL_PIPE_HEIGHT);
        assert_eq!(
            pair.bottom.placement.y(),
            SCREEN_HEIGHT - f64::from(pair.bottom.height())
        );
        assert_eq!(pair.bottom.rect().max_y, 600);
        assert_eq!(pair.top.rect().min_x, pair.x() as i32);
    }

    #[test]
    fn test_steady_state_spacing() {
        let mut state = new_state(9);
        let mut events = Vec::new();
        let mut recycled = [false; PIPE_PAIRS];

        for _ in 0..2000 {
            events.clear();
            scroll_pipes(&mut state, &mut events);
            for event in &events {
                if let GameEvent::PairRecycled { pair } = event {
                    recycled[*pair] = true;
                }
            }
            if recycled.iter().all(|r| *r) {
                break;
            }
        }
        assert!(recycled.iter().all(|r| *r));

        // Every ring neighbour is one gap apart except across the wrap point
        let spaced = (0..PIPE_PAIRS)
            .filter(|&i| {
                let next = state.pipes[(i + 1) % PIPE_PAIRS].x();
                (next - state.pipes[i].x() - PIPE_GAP).abs() < 1e-6
            })
            .count();
        assert_eq!(spaced, PIPE_PAIRS - 1);

        for pair in &state.pipes {
            assert_eq!(pair.top.height() + pair.bottom.height(), TOTAL_PIPE_HEIGHT);
        }
    }

    #[test]
    fn test_background_ring_scroll() {
        let (mut state, mut sfx) = playing(10);
        for _ in 0..200 {
            hover_at(&mut state, 280.0);
            for pair in state.pipes.iter_mut() {
                pair.set_x(5000.0);
            }
            tick(&mut state, &TickInput::default(), &mut sfx).unwrap();
        }
        assert_eq!(state.backgrounds[1].placement.x(), 0.0);
        assert_eq!(state.backgrounds[0].placement.x(), SCREEN_WIDTH);
    }

    #[test]
    fn test_restart_waits_one_second() {
        let (mut state, mut sfx) = playing(11);
        state.score = 3;
        hover_at(&mut state, 561.0);
        tick(&mut state, &TickInput::default(), &mut sfx).unwrap();
        assert_eq!(state.mode, Mode::Over);

        // Space does not restart
        let space = TickInput {
            space: true,
            ..Default::default()
        };
        tick(&mut state, &space, &mut sfx).unwrap();
        assert_eq!(state.mode, Mode::Over);

        let enter = TickInput {
            enter: true,
            ..Default::default()
        };
        let scheduled_at = state.frame;
        let events = tick(&mut state, &enter, &mut sfx).unwrap();
        let resume_at = scheduled_at + RESTART_DELAY_TICKS;
        assert_eq!(events, vec![GameEvent::RestartScheduled { resume_at }]);
        assert_eq!(state.mode, Mode::Restarting { resume_at });
        assert!(state.mode.is_over());

        for _ in 1..RESTART_DELAY_TICKS {
            let events = tick(&mut state, &enter, &mut sfx).unwrap();
            assert!(events.is_empty());
            assert_eq!(state.score, 3);
        }

        let events = tick(&mut state, &TickInput::default(), &mut sfx).unwrap();
        assert_eq!(events, vec![GameEvent::Started]);
        assert_eq!(state.mode, Mode::Game);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_hit_and_jump_sounds() {
        let audio = SilentAudio::new();
        let log = audio.log();
        let mut sfx = AudioManager::new(Box::new(audio));
        let mut state = new_state(12);
        let space = TickInput {
            space: true,
            ..Default::default()
        };
        tick(&mut state, &space, &mut sfx).unwrap();
        tick(&mut state, &space, &mut sfx).unwrap();
        hover_at(&mut state, 590.0);
        tick(&mut state, &TickInput::default(), &mut sfx).unwrap();

        let log = log.borrow();
        assert_eq!(log.contexts_opened, 1);
        assert_eq!(log.plays(SoundEffect::Jump), 1);
        assert_eq!(log.plays(SoundEffect::Hit), 1);
    }

    #[test]
    fn test_rewind_failure_aborts_frame() {
        let mut state = new_state(13);
        let mut sfx = AudioManager::new(Box::new(SilentAudio::new().failing_rewind()));
        let start = TickInput {
            enter: true,
            ..Default::default()
        };
        tick(&mut state, &start, &mut sfx).unwrap();

        let jump = TickInput {
            space: true,
            ..Default::default()
        };
        let frame = state.frame;
        assert!(tick(&mut state, &jump, &mut sfx).is_err());
        assert_eq!(state.frame, frame);
    }

    #[test]
    fn test_determinism() {
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let mut state1 = new_state(99999);
        let mut state2 = new_state(99999);
        let mut sfx1 = sfx();
        let mut sfx2 = sfx();

        for _ in 0..1500 {
            let e1 = tick(&mut state1, &idle, &mut sfx1).unwrap();
            let e2 = tick(&mut state2, &idle, &mut sfx2).unwrap();
            assert_eq!(e1, e2);
        }

        let json1 = serde_json::to_string(&state1).unwrap();
        let json2 = serde_json::to_string(&state2).unwrap();
        assert_eq!(json1, json2);
    }

    #[test]
    fn test_idle_mode_clears_first_pair() {
        let mut state = new_state(2024);
        let mut sfx = sfx();
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };

        let mut scored = false;
        for _ in 0..400 {
            let events = tick(&mut state, &idle, &mut sfx).unwrap();
            scored |= events
                .iter()
                .any(|e| matches!(e, GameEvent::Scored { .. }));
        }
        assert!(scored);
        assert_eq!(state.frame, 400);
    }
}
