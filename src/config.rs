//! Fixed game parameters. The playfield never resizes; the terminal renderer
//! downscales to fit instead.

pub const FIELD_W: i32 = 288;
pub const FIELD_H: i32 = 512;
pub const FPS: u64 = 30;

pub const GROUND_H: i32 = 112;
/// Bottom of the visible play area (top of the ground strip).
pub const PLAY_BOTTOM: i32 = FIELD_H - GROUND_H;

pub const BIRD_X: i32 = 40;
pub const BIRD_START_Y: f64 = 40.0;
pub const BIRD_W: i32 = 34;
pub const BIRD_H: i32 = 24;

pub const GRAVITY: f64 = 0.25;
pub const ASCEND_VELOCITY: f64 = -3.0;

pub const PIPE_W: i32 = 52;
pub const PIPE_H: i32 = 320;
pub const PIPE_GAP: i32 = 140;
pub const PIPE1_START_X: i32 = 300;
pub const PIPE2_START_X: i32 = 470;
/// Horizontal scroll speed of pipes and ground, pixels per tick.
pub const SCROLL_SPEED: i32 = 2;

pub const GROUND_SPRITE_W: i32 = 336;
pub const GROUND_WRAP_X: i32 = -20;

pub const PAUSE_ICON_W: i32 = 64;
pub const PAUSE_ICON_H: i32 = 64;

pub const STAR_ORIGIN: (i32, i32) = (10, 10);
pub const STAR_ADVANCE: i32 = 24;

pub const SCORE_ORIGIN: (i32, i32) = (10, 40);
/// Digit `1` is drawn narrower than the rest.
pub const DIGIT_ADVANCE_ONE: i32 = 25;
pub const DIGIT_ADVANCE: i32 = 28;
