//! Procedurally generated RGBA sprite art. This module plays the role of an
//! asset loader: the rest of the game only ever sees decoded `RgbaImage`s and
//! the masks derived from them. Transparency is real here, it is what the
//! collision masks are built from.

use image::{Rgba, RgbaImage};

use crate::config::*;
use crate::game::{Masks, SpriteId, Wing};
use crate::mask::Mask;
use crate::render::Rgb;

const SKY_TOP: Rgb = Rgb(70, 180, 200);
const SKY_BOT: Rgb = Rgb(190, 232, 245);
const GRASS: Rgb = Rgb(84, 168, 55);
const GRASS_LIGHT: Rgb = Rgb(110, 200, 70);
const DIRT: Rgb = Rgb(210, 185, 110);
const DIRT_DARK: Rgb = Rgb(185, 160, 90);
const PIPE_L: Rgb = Rgb(74, 122, 26);
const PIPE_M: Rgb = Rgb(100, 170, 40);
const PIPE_R: Rgb = Rgb(115, 191, 46);
const PIPE_HI: Rgb = Rgb(145, 215, 62);
const CAP_DARK: Rgb = Rgb(60, 100, 20);
const BIRD_Y: Rgb = Rgb(245, 200, 66);
const BIRD_HI: Rgb = Rgb(255, 225, 100);
const BIRD_WING: Rgb = Rgb(215, 165, 35);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const BIRD_BEAK_HI: Rgb = Rgb(240, 110, 50);
const HILL_FAR: Rgb = Rgb(120, 195, 75);
const HILL_NEAR: Rgb = Rgb(95, 175, 55);
const BUILDING: Rgb = Rgb(130, 150, 170);
const BUILDING_DARK: Rgb = Rgb(100, 120, 145);
const STAR_GOLD: Rgb = Rgb(250, 210, 60);
const WHITE: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(30, 30, 30);

fn canvas(w: i32, h: i32) -> RgbaImage {
    // RgbaImage::new zero-fills, so everything starts fully transparent
    RgbaImage::new(w as u32, h as u32)
}

fn put(img: &mut RgbaImage, x: i32, y: i32, c: Rgb) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, Rgba([c.0, c.1, c.2, 255]));
    }
}

fn fill_rect(img: &mut RgbaImage, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
    for dy in 0..h {
        for dx in 0..w {
            put(img, x + dx, y + dy, c);
        }
    }
}

// ── Bitmap font ─────────────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

#[rustfmt::skip]
const FONT: &[(char, [u8; 15])] = &[
    ('A', [0,1,0, 1,0,1, 1,1,1, 1,0,1, 1,0,1]),
    ('C', [1,1,1, 1,0,0, 1,0,0, 1,0,0, 1,1,1]),
    ('E', [1,1,1, 1,0,0, 1,1,1, 1,0,0, 1,1,1]),
    ('F', [1,1,1, 1,0,0, 1,1,1, 1,0,0, 1,0,0]),
    ('G', [1,1,1, 1,0,0, 1,0,1, 1,0,1, 1,1,1]),
    ('I', [1,1,1, 0,1,0, 0,1,0, 0,1,0, 1,1,1]),
    ('L', [1,0,0, 1,0,0, 1,0,0, 1,0,0, 1,1,1]),
    ('M', [1,0,1, 1,1,1, 1,0,1, 1,0,1, 1,0,1]),
    ('N', [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,0,1]),
    ('O', [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1]),
    ('P', [1,1,1, 1,0,1, 1,1,1, 1,0,0, 1,0,0]),
    ('R', [1,1,1, 1,0,1, 1,1,0, 1,0,1, 1,0,1]),
    ('S', [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1]),
    ('T', [1,1,1, 0,1,0, 0,1,0, 0,1,0, 0,1,0]),
    ('U', [1,0,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1]),
    ('V', [1,0,1, 1,0,1, 1,0,1, 1,0,1, 0,1,0]),
    ('Y', [1,0,1, 1,0,1, 0,1,0, 0,1,0, 0,1,0]),
];

fn glyph(ch: char) -> Option<&'static [u8; 15]> {
    FONT.iter().find(|(c, _)| *c == ch).map(|(_, g)| g)
}

fn draw_glyph(img: &mut RgbaImage, x: i32, y: i32, bits: &[u8; 15], scale: i32, fg: Rgb) {
    let shadow = (scale / 2).max(1);
    for row in 0..5 {
        for col in 0..3 {
            if bits[(row * 3 + col) as usize] == 1 {
                let px = x + col * scale;
                let py = y + row * scale;
                fill_rect(img, px + shadow, py + shadow, scale, scale, SHADOW);
                fill_rect(img, px, py, scale, scale, fg);
            }
        }
    }
}

/// Glyph cell is 3 x scale wide with one scale column of spacing.
fn text_width(text: &str, scale: i32) -> i32 {
    text.len() as i32 * 4 * scale - scale
}

fn draw_text(img: &mut RgbaImage, x: i32, y: i32, text: &str, scale: i32, fg: Rgb) {
    let mut pen = x;
    for ch in text.chars() {
        if let Some(bits) = glyph(ch) {
            draw_glyph(img, pen, y, bits, scale, fg);
        }
        pen += 4 * scale;
    }
}

fn banner(text: &str, w: i32, h: i32, scale: i32, fg: Rgb) -> RgbaImage {
    let mut img = canvas(w, h);
    let x = (w - text_width(text, scale)) / 2;
    let y = (h - 5 * scale) / 2;
    draw_text(&mut img, x, y, text, scale, fg);
    img
}

// ── Sprites ─────────────────────────────────────────────────────────────────

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = (x as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(PIPE_L, PIPE_M, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(PIPE_M, PIPE_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(PIPE_HI, PIPE_R, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(PIPE_R, PIPE_L, ((t - 160) * 3).min(256))
    }
}

/// The body is inset two columns from each edge; the cap runs full width.
/// The inset columns stay transparent, which the collision masks pick up.
fn pipe(cap_at_bottom: bool) -> RgbaImage {
    let mut img = canvas(PIPE_W, PIPE_H);
    const CAP_H: i32 = 24;
    let (body_y, cap_y) = if cap_at_bottom {
        (0, PIPE_H - CAP_H)
    } else {
        (CAP_H, 0)
    };

    for x in 2..PIPE_W - 2 {
        let c = pipe_shade(x - 2, PIPE_W - 4);
        for y in body_y..body_y + PIPE_H - CAP_H {
            put(&mut img, x, y, c);
        }
    }
    for x in 0..PIPE_W {
        let c = pipe_shade(x, PIPE_W);
        for y in cap_y..cap_y + CAP_H {
            put(&mut img, x, y, c);
        }
        put(&mut img, x, cap_y, CAP_DARK);
        put(&mut img, x, cap_y + CAP_H - 1, CAP_DARK);
    }
    img
}

fn bird(wing: Wing) -> RgbaImage {
    let mut img = canvas(BIRD_W, BIRD_H);
    let wing_dy = match wing {
        Wing::Down => 3,
        Wing::Mid => 0,
        Wing::Up => -3,
    };

    // body ellipse, leaves the corners transparent
    for y in 0..BIRD_H {
        for x in 0..BIRD_W {
            let nx = (x - 15) as f64 / 13.0;
            let ny = (y - 12) as f64 / 10.0;
            if nx * nx + ny * ny <= 1.0 {
                let c = if y < 7 { BIRD_HI } else { BIRD_Y };
                put(&mut img, x, y, c);
            }
        }
    }
    // tail
    fill_rect(&mut img, 0, 9, 4, 5, BIRD_WING);
    // wing
    fill_rect(&mut img, 4, 9 + wing_dy, 10, 6, BIRD_WING);
    // eye
    fill_rect(&mut img, 19, 4, 6, 6, BIRD_EYE);
    fill_rect(&mut img, 22, 6, 2, 2, BIRD_PUPIL);
    // beak
    fill_rect(&mut img, 27, 11, 7, 3, BIRD_BEAK_HI);
    fill_rect(&mut img, 27, 14, 7, 2, BIRD_BEAK);
    img
}

fn ground() -> RgbaImage {
    let mut img = canvas(GROUND_SPRITE_W, GROUND_H);
    for x in 0..GROUND_SPRITE_W {
        let alt = (x / 3) % 2 == 0;
        put(&mut img, x, 0, if alt { GRASS } else { GRASS_LIGHT });
        put(&mut img, x, 1, if alt { GRASS_LIGHT } else { GRASS });
    }
    fill_rect(&mut img, 0, 2, GROUND_SPRITE_W, 18, GRASS);
    for y in 20..GROUND_H {
        for x in 0..GROUND_SPRITE_W {
            let stripe = (x + (y - 20) * 2) % 12 < 6;
            put(&mut img, x, y, if stripe { DIRT } else { DIRT_DARK });
        }
    }
    img
}

fn background(variant: u8) -> RgbaImage {
    let mut img = canvas(FIELD_W, FIELD_H);
    for y in 0..FIELD_H {
        let t = (y * 256 / FIELD_H) as u16;
        let c = Rgb::lerp(SKY_TOP, SKY_BOT, t);
        for x in 0..FIELD_W {
            put(&mut img, x, y, c);
        }
    }
    if variant == 0 {
        // city skyline
        for k in 0..8 {
            let x = k * 36;
            let h = 60 + (k * 37) % 50;
            let c = if k % 2 == 0 { BUILDING } else { BUILDING_DARK };
            fill_rect(&mut img, x + 2, PLAY_BOTTOM - h, 30, h, c);
        }
    } else {
        // rolling hills
        for x in 0..FIELD_W {
            let fx = x as f64 * 0.04;
            let far = (fx.sin() * 18.0 + (fx * 1.7).sin() * 9.0) as i32 + 40;
            for y in PLAY_BOTTOM - far..PLAY_BOTTOM {
                put(&mut img, x, y, HILL_FAR);
            }
            let fx = x as f64 * 0.06 + 2.0;
            let near = (fx.sin() * 12.0 + (fx * 2.3).sin() * 6.0) as i32 + 22;
            for y in PLAY_BOTTOM - near..PLAY_BOTTOM {
                put(&mut img, x, y, HILL_NEAR);
            }
        }
    }
    img
}

fn star() -> RgbaImage {
    let mut img = canvas(20, 20);
    for y in 0..20i32 {
        for x in 0..20i32 {
            let d = (x - 9).abs() + (y - 9).abs();
            if d <= 8 {
                put(&mut img, x, y, if d <= 3 { BIRD_HI } else { STAR_GOLD });
            }
        }
    }
    img
}

fn digit(d: u8) -> RgbaImage {
    let mut img = canvas(24, 36);
    draw_glyph(&mut img, 3, 3, &DIGITS[d as usize], 6, WHITE);
    img
}

fn pause_icon() -> RgbaImage {
    let mut img = canvas(PAUSE_ICON_W, PAUSE_ICON_H);
    fill_rect(&mut img, 16, 14, 12, 40, SHADOW);
    fill_rect(&mut img, 14, 12, 12, 40, WHITE);
    fill_rect(&mut img, 40, 14, 12, 40, SHADOW);
    fill_rect(&mut img, 38, 12, 12, 40, WHITE);
    img
}

/// The full sprite set, generated once at startup.
pub struct Atlas {
    backgrounds: [RgbaImage; 2],
    bird: [RgbaImage; 3],
    pipe_top: RgbaImage,
    pipe_bottom: RgbaImage,
    ground: RgbaImage,
    star: RgbaImage,
    digits: [RgbaImage; 10],
    pause: RgbaImage,
    msg_fly: RgbaImage,
    msg_pause: RgbaImage,
    msg_continue: RgbaImage,
    msg_restart: RgbaImage,
    msg_over: RgbaImage,
}

impl Atlas {
    pub fn build() -> Atlas {
        Atlas {
            backgrounds: [background(0), background(1)],
            bird: [bird(Wing::Down), bird(Wing::Mid), bird(Wing::Up)],
            pipe_top: pipe(true),
            pipe_bottom: pipe(false),
            ground: ground(),
            star: star(),
            digits: std::array::from_fn(|d| digit(d as u8)),
            pause: pause_icon(),
            msg_fly: banner("UP TO FLY", FIELD_W, 20, 2, WHITE),
            msg_pause: banner("ESC TO PAUSE", FIELD_W, 20, 2, WHITE),
            msg_continue: banner("UP TO CONTINUE", FIELD_W, 20, 2, WHITE),
            msg_restart: banner("UP TO RESTART", FIELD_W, 20, 2, WHITE),
            msg_over: banner("GAME OVER", 252, 40, 5, WHITE),
        }
    }

    pub fn get(&self, id: SpriteId) -> &RgbaImage {
        match id {
            SpriteId::Background(b) => &self.backgrounds[(b as usize).min(1)],
            SpriteId::Bird(wing) => &self.bird[wing as usize],
            SpriteId::PipeTop => &self.pipe_top,
            SpriteId::PipeBottom => &self.pipe_bottom,
            SpriteId::Ground => &self.ground,
            SpriteId::Star => &self.star,
            SpriteId::Digit(d) => &self.digits[(d as usize).min(9)],
            SpriteId::PauseIcon => &self.pause,
            SpriteId::MsgFly => &self.msg_fly,
            SpriteId::MsgPause => &self.msg_pause,
            SpriteId::MsgContinue => &self.msg_continue,
            SpriteId::MsgRestart => &self.msg_restart,
            SpriteId::MsgOver => &self.msg_over,
        }
    }

    /// Collision masks for the one moving and two fixed sprite kinds.
    pub fn masks(&self) -> Masks {
        Masks {
            bird: std::array::from_fn(|i| Mask::from_image(&self.bird[i])),
            pipe_top: Mask::from_image(&self.pipe_top),
            pipe_bottom: Mask::from_image(&self.pipe_bottom),
        }
    }
}
