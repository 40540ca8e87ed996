//! Game state and entity models
//!
//! Everything the Update step mutates lives in [`GameState`]. Draw only reads it.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::{Bounded, Placement, Rect};
use super::pipes::{generate_heights, populate_pipes};
use crate::assets::{Assets, ImageAsset, ImageInfo};
use crate::consts::*;

/// Current mode of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Title screen, waiting for the start input
    #[default]
    Title,
    /// Active play
    Game,
    /// Round ended, waiting for the restart input
    Over,
    /// Restart accepted, new round begins once `frame` reaches `resume_at`
    Restarting { resume_at: u64 },
}

impl Mode {
    /// Over screen is showing (including the pause before a restart)
    pub fn is_over(&self) -> bool {
        matches!(self, Mode::Over | Mode::Restarting { .. })
    }
}

/// What ended a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrashCause {
    /// Player's bottom edge reached the screen bottom
    Ground,
    /// Player rose past the ceiling margin
    Ceiling,
    /// Player overlapped a pipe of the given pool slot
    Pipe { pair: usize },
}

/// Things that happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new round began (from Title or after a restart)
    Started,
    Jumped,
    /// A pair was cleared; carries the new score
    Scored { score: u32 },
    /// A pair left the screen and was moved behind the rightmost one
    PairRecycled { pair: usize },
    Crashed(CrashCause),
    /// Restart accepted; play resumes at this frame
    RestartScheduled { resume_at: u64 },
}

/// Where a sprite's pixels come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteSource {
    /// A decoded image asset
    Image(ImageAsset),
    /// A solid RGBA rectangle
    Fill([u8; 4]),
}

/// A drawable bitmap of fixed size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprite {
    pub source: SpriteSource,
    pub width: u32,
    pub height: u32,
}

impl Sprite {
    pub fn image(asset: ImageAsset, info: ImageInfo) -> Self {
        Self {
            source: SpriteSource::Image(asset),
            width: info.width,
            height: info.height,
        }
    }

    /// Pipe-coloured rectangle of the standard pipe width
    pub fn pipe(height: u32) -> Self {
        Self {
            source: SpriteSource::Fill(PIPE_COLOR),
            width: PIPE_WIDTH,
            height,
        }
    }
}

/// One of the two tiling background layers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Background {
    pub sprite: Sprite,
    /// Scaled so the image covers exactly one screen
    pub placement: Placement,
    /// Scroll speed (pixels per frame, leftward)
    pub dx: f64,
}

impl Background {
    pub fn new(sprite: Sprite, x: f64) -> Self {
        let mut placement = Placement::scaled(
            SCREEN_WIDTH / f64::from(sprite.width.max(1)),
            SCREEN_HEIGHT / f64::from(sprite.height.max(1)),
        );
        placement.set_x(x);
        Self {
            sprite,
            placement,
            dx: BACKGROUND_DX,
        }
    }

    pub fn scroll(&mut self) {
        self.placement.translate(-self.dx, 0.0);
    }

    /// Right edge has reached or passed the left screen edge
    pub fn is_off_screen(&self) -> bool {
        self.placement.x() + SCREEN_WIDTH <= 0.0
    }
}

/// The player-controlled gopher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub sprite: Sprite,
    pub placement: Placement,
    rect: Rect,
    /// Added to `dy` every frame
    pub gravity: f64,
    /// Current vertical velocity (positive is down)
    pub dy: f64,
    /// Upward displacement applied instantly on a jump
    pub jump: f64,
}

impl Player {
    /// Player centred on screen, at rest
    pub fn new(sprite: Sprite) -> Self {
        let mut player = Self {
            sprite,
            placement: Placement::at(
                (SCREEN_WIDTH - f64::from(sprite.width)) / 2.0,
                Self::start_y(&sprite),
            ),
            rect: Rect::default(),
            gravity: PLAYER_GRAVITY,
            dy: 0.0,
            jump: PLAYER_JUMP,
        };
        player.update_rect();
        player
    }

    fn start_y(sprite: &Sprite) -> f64 {
        (SCREEN_HEIGHT - f64::from(sprite.height)) / 2.0
    }

    /// Back to vertical centre with the initial drift
    pub fn reset(&mut self) {
        self.placement.set_y(Self::start_y(&self.sprite));
        self.dy = PLAYER_START_DY;
        self.update_rect();
    }

    /// Integrate one frame of gravity
    pub fn fall(&mut self) {
        self.dy += self.gravity;
        self.placement.translate(0.0, self.dy);
    }

    /// Cancel velocity and move up by the jump impulse
    pub fn jump(&mut self) {
        self.dy = 0.0;
        self.placement.translate(0.0, -self.jump);
    }

    /// A top pipe whose right edge is at or before this x has been cleared
    pub fn scoring_line(&self) -> f64 {
        self.placement.x() - f64::from(self.sprite.width)
    }

    /// Move to (x, y) and refresh the bounding rectangle
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.placement.set_x(x);
        self.placement.set_y(y);
        self.update_rect();
    }
}

impl Bounded for Player {
    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn size(&self) -> (u32, u32) {
        (self.sprite.width, self.sprite.height)
    }

    fn rect(&self) -> &Rect {
        &self.rect
    }

    fn rect_mut(&mut self) -> &mut Rect {
        &mut self.rect
    }
}

/// A single pipe, anchored to the top or the bottom of the screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipe {
    pub sprite: Sprite,
    pub placement: Placement,
    rect: Rect,
}

impl Pipe {
    fn new(x: f64, y: f64, height: u32) -> Self {
        let mut pipe = Self {
            sprite: Sprite::pipe(height),
            placement: Placement::at(x, y),
            rect: Rect::default(),
        };
        pipe.update_rect();
        pipe
    }

    /// Pipe hanging from the top edge
    pub fn top(x: f64, height: u32) -> Self {
        Self::new(x, 0.0, height)
    }

    /// Pipe standing on the bottom edge
    pub fn bottom(x: f64, height: u32) -> Self {
        Self::new(x, SCREEN_HEIGHT - f64::from(height), height)
    }

    pub fn height(&self) -> u32 {
        self.sprite.height
    }

    pub fn set_x(&mut self, x: f64) {
        self.placement.set_x(x);
        self.update_rect();
    }

    pub fn scroll(&mut self, dx: f64) {
        self.placement.translate(-dx, 0.0);
        self.update_rect();
    }
}

impl Bounded for Pipe {
    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn size(&self) -> (u32, u32) {
        (self.sprite.width, self.sprite.height)
    }

    fn rect(&self) -> &Rect {
        &self.rect
    }

    fn rect_mut(&mut self) -> &mut Rect {
        &mut self.rect
    }
}

/// A top and bottom pipe sharing one x coordinate
///
/// `top.height() + bottom.height() == TOTAL_PIPE_HEIGHT` at all times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipePair {
    pub top: Pipe,
    pub bottom: Pipe,
    /// Player has been scored against this pair since it was last recycled
    pub crossed: bool,
}

impl PipePair {
    pub fn new(x: f64, (top_height, bottom_height): (u32, u32)) -> Self {
        Self {
            top: Pipe::top(x, top_height),
            bottom: Pipe::bottom(x, bottom_height),
            crossed: false,
        }
    }

    pub fn x(&self) -> f64 {
        self.top.placement.x()
    }

    pub fn pipes(&self) -> [&Pipe; 2] {
        [&self.top, &self.bottom]
    }

    pub fn pipes_mut(&mut self) -> [&mut Pipe; 2] {
        [&mut self.top, &mut self.bottom]
    }

    /// Move both pipes left by `dx`
    pub fn scroll(&mut self, dx: f64) {
        for pipe in self.pipes_mut() {
            pipe.scroll(dx);
        }
    }

    /// Move both pipes to `x`
    pub fn set_x(&mut self, x: f64) {
        for pipe in self.pipes_mut() {
            pipe.set_x(x);
        }
    }

    /// Resize both pipes together, keeping the bottom pipe on the screen bottom
    pub fn set_heights(&mut self, (top_height, bottom_height): (u32, u32)) {
        self.top.sprite = Sprite::pipe(top_height);
        self.bottom.sprite = Sprite::pipe(bottom_height);
        self.top.placement.set_y(0.0);
        self.bottom
            .placement
            .set_y(SCREEN_HEIGHT - f64::from(bottom_height));
        self.top.update_rect();
        self.bottom.update_rect();
    }

    /// Screen-space y range of the opening between the pipes
    pub fn gap(&self) -> (f64, f64) {
        (
            f64::from(self.top.height()),
            SCREEN_HEIGHT - f64::from(self.bottom.height()),
        )
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    /// Source of pipe height variation
    rng: Pcg32,
    pub mode: Mode,
    pub score: u32,
    /// Frames simulated in the current round
    pub count: u64,
    /// Frames simulated since creation, in every mode
    pub frame: u64,
    pub backgrounds: [Background; 2],
    pub player: Player,
    /// Ring of pipe pairs; slot `i` is always directly right of slot `i - 1`
    pub pipes: [PipePair; PIPE_PAIRS],
}

impl GameState {
    /// Fresh state on the title screen
    pub fn new(seed: u64, assets: &Assets) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let pipes = populate_pipes(&mut rng);
        let background = Sprite::image(ImageAsset::Background, assets.background);

        Self {
            seed,
            rng,
            mode: Mode::Title,
            score: 0,
            count: 0,
            frame: 0,
            backgrounds: [
                Background::new(background, 0.0),
                Background::new(background, SCREEN_WIDTH),
            ],
            player: Player::new(Sprite::image(ImageAsset::Gopher, assets.gopher)),
            pipes,
        }
    }

    /// Reset routine shared by every transition into Game
    ///
    /// Audio handles are re-acquired separately by the caller.
    pub fn reset(&mut self) {
        self.count = 0;
        self.score = 0;
        self.backgrounds[0].placement.set_x(0.0);
        self.backgrounds[1].placement.set_x(SCREEN_WIDTH);
        self.player.reset();
        self.pipes = populate_pipes(&mut self.rng);
    }

    /// Draw new complementary heights for one pool slot
    pub fn regenerate_heights(&mut self, pair: usize) {
        let heights = generate_heights(&mut self.rng);
        self.pipes[pair].set_heights(heights);
    }

    /// Slot directly left of `pair` in ring order
    pub fn previous_slot(pair: usize) -> usize {
        (pair + PIPE_PAIRS - 1) % PIPE_PAIRS
    }
}
