//! Round state and the per-tick update. Everything here is headless: the
//! driver feeds a batch of commands in, and gets audio cues and a draw list
//! back out.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::config::*;
use crate::mask::{Mask, collides};

/// Discrete input commands, one batch per tick. Quit never reaches the core;
/// the driver terminates directly.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Ascend,
    PauseOrResume,
    Restart,
}

/// Audio cues the tick may emit.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cue {
    Collide,
    Fly,
    Point,
    Pause,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Playing,
    Paused,
    Over,
}

/// Wing animation frame, advanced every playing tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Wing {
    Down,
    Mid,
    Up,
}

impl Wing {
    pub fn next(self) -> Wing {
        match self {
            Wing::Down => Wing::Mid,
            Wing::Mid => Wing::Up,
            Wing::Up => Wing::Down,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Insane,
}

pub struct DifficultyParams {
    /// How much the pipe gap shrinks on every recycle.
    pub gap_step: i32,
    /// Stars shown in the corner; more stars, harder round.
    pub stars: i32,
}

impl Difficulty {
    pub fn params(self) -> DifficultyParams {
        match self {
            Difficulty::Easy => DifficultyParams { gap_step: 0, stars: 1 },
            Difficulty::Medium => DifficultyParams { gap_step: 4, stars: 2 },
            Difficulty::Hard => DifficultyParams { gap_step: 8, stars: 3 },
            Difficulty::Insane => DifficultyParams { gap_step: 16, stars: 4 },
        }
    }

    fn sample(rng: &mut impl Rng) -> Difficulty {
        match rng.gen_range(0..4) {
            0 => Difficulty::Easy,
            1 => Difficulty::Medium,
            2 => Difficulty::Hard,
            _ => Difficulty::Insane,
        }
    }
}

pub struct Bird {
    pub y: f64,
    pub velocity: f64,
    pub wing: Wing,
}

/// One of the two live pipe pairs. Only the upper pipe's y is stored; the
/// lower pipe hangs off it via `lower_y`.
pub struct Pipe {
    pub x: i32,
    pub gap_top: i32,
    pub gap: i32,
    /// Ticks spent fully left of the bird; the pass is scored when this hits
    /// exactly 1, so it can never re-fire.
    pub passed: u32,
}

impl Pipe {
    fn new(x: i32, rng: &mut impl Rng) -> Self {
        Pipe {
            x,
            gap_top: random_gap_top(PIPE_GAP, rng),
            gap: PIPE_GAP,
            passed: 0,
        }
    }

    pub fn lower_y(&self) -> i32 {
        self.gap_top + PIPE_H + self.gap
    }

    /// Scroll one tick. Recycles to the right edge with fresh geometry when
    /// the next step would put the right edge past the left field edge.
    /// Returns the points to award when the bird's pass is first scored.
    pub fn advance(&mut self, gap_step: i32, rng: &mut impl Rng) -> Option<i32> {
        if self.x - SCROLL_SPEED <= -PIPE_W {
            self.x = FIELD_W;
            self.gap_top = random_gap_top(self.gap, rng);
            self.gap -= gap_step;
            self.passed = 0;
            None
        } else {
            self.x -= SCROLL_SPEED;
            if self.x + PIPE_W < BIRD_X {
                self.passed += 1;
            }
            if self.passed == 1 {
                // narrower gap, bigger reward
                Some(15 - self.gap.div_euclid(10))
            } else {
                None
            }
        }
    }
}

/// Upper-pipe y range is biased above the visible top so only the pipe's
/// lower stretch and the gap show on screen.
fn random_gap_top(gap: i32, rng: &mut impl Rng) -> i32 {
    rng.gen_range(-(gap / 2 + 180)..=-100)
}

/// All state of one play session, built whole at round start and replaced
/// whole on restart.
pub struct Round {
    pub bird: Bird,
    pub pipes: [Pipe; 2],
    pub difficulty: Difficulty,
    pub score: i32,
    pub phase: Phase,
    pub background: u8,
    pub ground_x: i32,
}

impl Round {
    pub fn new(rng: &mut impl Rng) -> Self {
        Round {
            bird: Bird {
                y: BIRD_START_Y,
                velocity: 0.0,
                wing: Wing::Down,
            },
            pipes: [
                Pipe::new(PIPE1_START_X, rng),
                Pipe::new(PIPE2_START_X, rng),
            ],
            difficulty: Difficulty::sample(rng),
            score: 0,
            phase: Phase::Playing,
            background: rng.gen_range(0..2),
            ground_x: 0,
        }
    }
}

/// Opacity masks the collision pass needs: one per bird wing frame, built
/// once at load time, plus the two pipe surfaces.
pub struct Masks {
    pub bird: [Mask; 3],
    pub pipe_top: Mask,
    pub pipe_bottom: Mask,
}

pub struct Game {
    pub round: Round,
    masks: Masks,
    rng: StdRng,
}

impl Game {
    pub fn new(masks: Masks) -> Self {
        Self::with_rng(masks, StdRng::from_entropy())
    }

    pub fn with_rng(masks: Masks, mut rng: StdRng) -> Self {
        Game {
            round: Round::new(&mut rng),
            masks,
            rng,
        }
    }

    pub fn phase(&self) -> Phase {
        self.round.phase
    }

    /// Advance the simulation one tick against a batch of input commands.
    pub fn tick(&mut self, inputs: &[Command]) -> Vec<Cue> {
        let mut cues = Vec::new();
        match self.round.phase {
            Phase::Playing => {
                let bird = &mut self.round.bird;
                bird.wing = bird.wing.next();
                bird.velocity += GRAVITY;
                bird.y += bird.velocity;

                for cmd in inputs {
                    match cmd {
                        Command::Ascend => {
                            self.round.bird.velocity = ASCEND_VELOCITY;
                            cues.push(Cue::Fly);
                        }
                        Command::PauseOrResume => {
                            self.round.phase = Phase::Paused;
                            cues.push(Cue::Pause);
                        }
                        Command::Restart => {}
                    }
                }

                let gap_step = self.round.difficulty.params().gap_step;
                for pipe in &mut self.round.pipes {
                    if let Some(points) = pipe.advance(gap_step, &mut self.rng) {
                        self.round.score += points;
                        cues.push(Cue::Point);
                    }
                }

                self.round.ground_x -= SCROLL_SPEED;
                if self.round.ground_x < GROUND_WRAP_X {
                    self.round.ground_x = 0;
                }

                if self.collided() {
                    self.round.phase = Phase::Over;
                    cues.push(Cue::Collide);
                }
            }
            Phase::Paused => {
                // either key resumes
                if inputs
                    .iter()
                    .any(|c| matches!(c, Command::Ascend | Command::PauseOrResume))
                {
                    self.round.phase = Phase::Playing;
                }
            }
            Phase::Over => {
                if inputs.contains(&Command::Restart) {
                    self.round = Round::new(&mut self.rng);
                }
            }
        }
        cues
    }

    /// Four mask checks (both surfaces of both pipes) plus the ceiling and
    /// ground bounds, folded into one verdict.
    fn collided(&self) -> bool {
        let r = &self.round;
        let bird = &self.masks.bird[r.bird.wing as usize];
        let bird_pos = (BIRD_X, r.bird.y as i32);
        let hit_pipe = r.pipes.iter().any(|p| {
            collides(bird, bird_pos, &self.masks.pipe_top, (p.x, p.gap_top))
                || collides(bird, bird_pos, &self.masks.pipe_bottom, (p.x, p.lower_y()))
        });
        hit_pipe || r.bird.y <= 0.0 || r.bird.y >= (PLAY_BOTTOM - BIRD_H) as f64
    }

    /// Draw requests for this tick, back to front. Score digits always paint
    /// last.
    pub fn draw_list(&self) -> Vec<DrawCmd> {
        let r = &self.round;
        let mut cmds = vec![
            DrawCmd::at(SpriteId::Background(r.background), 0, 0),
            DrawCmd::at(SpriteId::Bird(r.bird.wing), BIRD_X, r.bird.y as i32),
        ];
        for pipe in &r.pipes {
            cmds.push(DrawCmd::at(SpriteId::PipeTop, pipe.x, pipe.gap_top));
            cmds.push(DrawCmd::at(SpriteId::PipeBottom, pipe.x, pipe.lower_y()));
        }
        cmds.push(DrawCmd::at(SpriteId::Ground, r.ground_x, PLAY_BOTTOM));

        let (mut sx, sy) = STAR_ORIGIN;
        for _ in 0..r.difficulty.params().stars {
            cmds.push(DrawCmd::at(SpriteId::Star, sx, sy));
            sx += STAR_ADVANCE;
        }

        match r.phase {
            Phase::Playing => {
                cmds.push(DrawCmd::at(SpriteId::MsgFly, 0, 440));
                cmds.push(DrawCmd::at(SpriteId::MsgPause, 0, 465));
            }
            Phase::Paused => {
                cmds.push(DrawCmd::at(
                    SpriteId::PauseIcon,
                    (FIELD_W - PAUSE_ICON_W) / 2,
                    (FIELD_H - PAUSE_ICON_H) / 2,
                ));
                cmds.push(DrawCmd::at(SpriteId::MsgContinue, 0, 440));
            }
            Phase::Over => {
                cmds.push(DrawCmd::at(SpriteId::MsgRestart, 0, 440));
                cmds.push(DrawCmd::at(SpriteId::MsgOver, 18, 200));
            }
        }

        let (mut dx, dy) = SCORE_ORIGIN;
        for ch in r.score.to_string().chars() {
            if let Some(d) = ch.to_digit(10) {
                cmds.push(DrawCmd::at(SpriteId::Digit(d as u8), dx, dy));
                dx += if d == 1 { DIGIT_ADVANCE_ONE } else { DIGIT_ADVANCE };
            }
        }
        cmds
    }
}

/// Identity of a sprite the presentation layer knows how to blit.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SpriteId {
    Background(u8),
    Bird(Wing),
    PipeTop,
    PipeBottom,
    Ground,
    Star,
    Digit(u8),
    PauseIcon,
    MsgFly,
    MsgPause,
    MsgContinue,
    MsgRestart,
    MsgOver,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DrawCmd {
    pub sprite: SpriteId,
    pub x: i32,
    pub y: i32,
}

impl DrawCmd {
    fn at(sprite: SpriteId, x: i32, y: i32) -> Self {
        DrawCmd { sprite, x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprites::Atlas;
    use rand_chacha::ChaCha8Rng;

    fn test_game(seed: u64) -> Game {
        Game::with_rng(Atlas::build().masks(), StdRng::seed_from_u64(seed))
    }

    fn test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(12345)
    }

    #[test]
    fn gravity_applies_velocity_before_position() {
        let mut game = test_game(1);
        assert_eq!(game.round.bird.y, 40.0);
        assert_eq!(game.round.bird.velocity, 0.0);
        for _ in 0..8 {
            game.tick(&[]);
        }
        assert_eq!(game.round.bird.velocity, 2.0);
        assert_eq!(game.round.bird.y, 49.0);
        assert_eq!(game.round.phase, Phase::Playing);
        // wing cycles every tick: 8 % 3 == 2
        assert_eq!(game.round.bird.wing, Wing::Up);
    }

    #[test]
    fn ascend_overrides_accumulated_velocity() {
        let mut game = test_game(2);
        game.tick(&[]);
        game.tick(&[]);
        let cues = game.tick(&[Command::Ascend]);
        assert_eq!(game.round.bird.velocity, ASCEND_VELOCITY);
        assert!(cues.contains(&Cue::Fly));
    }

    #[test]
    fn pause_freezes_and_resume_continues() {
        let mut game = test_game(3);
        let cues = game.tick(&[Command::PauseOrResume]);
        assert_eq!(game.round.phase, Phase::Paused);
        assert!(cues.contains(&Cue::Pause));

        let y = game.round.bird.y;
        let pipe_x = game.round.pipes[0].x;
        let cues = game.tick(&[]);
        assert!(cues.is_empty());
        assert_eq!(game.round.bird.y, y);
        assert_eq!(game.round.pipes[0].x, pipe_x);

        // resuming itself emits nothing and advances nothing
        let cues = game.tick(&[Command::Ascend]);
        assert!(cues.is_empty());
        assert_eq!(game.round.phase, Phase::Playing);
        assert_eq!(game.round.bird.y, y);

        game.tick(&[]);
        assert!(game.round.bird.y > y);
    }

    #[test]
    fn pass_scores_exactly_once() {
        let mut rng = test_rng();
        let mut pipe = Pipe {
            x: -10,
            gap_top: -150,
            gap: 140,
            passed: 0,
        };
        // right edge still touching the bird column: no pass yet
        assert_eq!(pipe.advance(0, &mut rng), None);
        assert_eq!(pipe.x, -12);
        assert_eq!(pipe.passed, 0);
        // first tick fully past the bird: 15 - 140/10 = 1 point
        assert_eq!(pipe.advance(0, &mut rng), Some(1));
        assert_eq!(pipe.passed, 1);
        // stays past the bird but never re-awards
        for _ in 0..5 {
            assert_eq!(pipe.advance(0, &mut rng), None);
        }
        assert_eq!(pipe.passed, 6);
    }

    #[test]
    fn recycle_randomizes_within_range_and_shrinks_gap() {
        let mut rng = test_rng();
        let mut pipe = Pipe {
            x: -50,
            gap_top: -120,
            gap: 140,
            passed: 3,
        };
        assert_eq!(pipe.advance(16, &mut rng), None);
        assert_eq!(pipe.x, FIELD_W);
        assert_eq!(pipe.gap, 124);
        assert_eq!(pipe.passed, 0);
        // range is computed from the pre-decrement gap of 140
        assert!(pipe.gap_top >= -250 && pipe.gap_top <= -100);
    }

    #[test]
    fn pipe_recycles_on_the_176th_tick() {
        let mut rng = test_rng();
        let mut pipe = Pipe {
            x: 300,
            gap_top: -150,
            gap: 140,
            passed: 0,
        };
        for tick in 1..=175 {
            pipe.advance(0, &mut rng);
            assert_eq!(pipe.x, 300 - 2 * tick, "no recycle before tick 176");
        }
        assert_eq!(pipe.x, -50);
        pipe.advance(0, &mut rng);
        assert_eq!(pipe.x, FIELD_W);
    }

    #[test]
    fn point_cue_fires_with_the_score() {
        let mut game = test_game(4);
        game.round.pipes[0].x = -12;
        let cues = game.tick(&[]);
        assert!(cues.contains(&Cue::Point));
        assert_eq!(game.round.score, 1);
        let cues = game.tick(&[]);
        assert!(!cues.contains(&Cue::Point));
        assert_eq!(game.round.score, 1);
    }

    #[test]
    fn boundary_positions_collide_inclusively() {
        let mut game = test_game(5);
        // default pipes start far right of the bird
        game.round.bird.y = 0.0;
        assert!(game.collided());
        game.round.bird.y = 1.0;
        assert!(!game.collided());
        game.round.bird.y = (PLAY_BOTTOM - BIRD_H) as f64; // 376
        assert!(game.collided());
        game.round.bird.y = (PLAY_BOTTOM - BIRD_H) as f64 - 1.0;
        assert!(!game.collided());
    }

    #[test]
    fn pipe_overlap_ends_the_round_with_one_collide_cue() {
        let mut game = test_game(6);
        game.round.pipes[0].x = BIRD_X;
        game.round.pipes[0].gap_top = 0; // upper pipe covers the bird's rows
        let cues = game.tick(&[]);
        assert_eq!(game.round.phase, Phase::Over);
        assert_eq!(cues.iter().filter(|c| **c == Cue::Collide).count(), 1);
        // the over phase is inert apart from restart
        let cues = game.tick(&[Command::Ascend]);
        assert!(cues.is_empty());
        assert_eq!(game.round.phase, Phase::Over);
    }

    #[test]
    fn restart_builds_a_fresh_round() {
        let mut game = test_game(7);
        for _ in 0..20 {
            game.tick(&[Command::Ascend]);
        }
        game.round.phase = Phase::Over;
        game.round.score = 99;
        game.tick(&[Command::Restart]);

        let r = &game.round;
        assert_eq!(r.phase, Phase::Playing);
        assert_eq!(r.score, 0);
        assert_eq!(r.bird.y, BIRD_START_Y);
        assert_eq!(r.bird.velocity, 0.0);
        assert_eq!(r.bird.wing, Wing::Down);
        assert_eq!(r.ground_x, 0);
        assert_eq!(r.pipes[0].x, PIPE1_START_X);
        assert_eq!(r.pipes[1].x, PIPE2_START_X);
        for pipe in &r.pipes {
            assert_eq!(pipe.gap, PIPE_GAP);
            assert_eq!(pipe.passed, 0);
            assert!(pipe.gap_top >= -250 && pipe.gap_top <= -100);
        }
    }

    #[test]
    fn draw_list_orders_background_first_and_score_last() {
        let game = test_game(8);
        let cmds = game.draw_list();
        assert_eq!(cmds[0].sprite, SpriteId::Background(game.round.background));
        assert_eq!(cmds[1].sprite, SpriteId::Bird(Wing::Down));
        assert_eq!(cmds[2].sprite, SpriteId::PipeTop);
        assert_eq!(cmds[3].sprite, SpriteId::PipeBottom);
        assert_eq!(cmds[6].sprite, SpriteId::Ground);
        assert_eq!(cmds[6].y, PLAY_BOTTOM);

        let stars = cmds
            .iter()
            .filter(|c| c.sprite == SpriteId::Star)
            .count() as i32;
        assert_eq!(stars, game.round.difficulty.params().stars);

        assert!(cmds.iter().any(|c| c.sprite == SpriteId::MsgFly));
        let last = cmds.last().unwrap();
        assert_eq!(last.sprite, SpriteId::Digit(0));
        assert_eq!((last.x, last.y), SCORE_ORIGIN);
    }

    #[test]
    fn paused_and_over_overlays() {
        let mut game = test_game(9);
        game.round.phase = Phase::Paused;
        let cmds = game.draw_list();
        assert!(cmds.iter().any(|c| c.sprite == SpriteId::PauseIcon
            && c.x == (FIELD_W - PAUSE_ICON_W) / 2
            && c.y == (FIELD_H - PAUSE_ICON_H) / 2));
        assert!(cmds.iter().any(|c| c.sprite == SpriteId::MsgContinue));

        game.round.phase = Phase::Over;
        let cmds = game.draw_list();
        assert!(cmds.iter().any(|c| c.sprite == SpriteId::MsgOver && c.x == 18 && c.y == 200));
        assert!(cmds.iter().any(|c| c.sprite == SpriteId::MsgRestart));
    }
}
