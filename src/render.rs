//! Fixed-size pixel buffer rendered to the terminal with half blocks: every
//! character cell carries two vertically stacked pixels via `▀` with separate
//! foreground and background colors. The playfield never resizes, so the
//! buffer is downscaled by an integer factor to fit the terminal.

use crossterm::{cursor, queue, style::{self, Color as CColor}};
use image::RgbaImage;
use std::io::{self, Write};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }
}

pub struct PixelBuf {
    w: usize,
    h: usize,
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![Rgb(0, 0, 0); w * h],
        }
    }

    fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    /// Paint a sprite at a position, skipping fully transparent pixels.
    /// Off-buffer pixels are clipped.
    pub fn blit(&mut self, img: &RgbaImage, x: i32, y: i32) {
        for (dx, dy, px) in img.enumerate_pixels() {
            if px[3] != 0 {
                self.set(x + dx as i32, y + dy as i32, Rgb(px[0], px[1], px[2]));
            }
        }
    }

    /// Write the buffer to the terminal, nearest-sampled down by `scale`.
    /// Color changes are deduplicated to keep the escape stream short.
    pub fn render(&self, out: &mut impl Write, scale: usize) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let cols = self.w / scale;
        let rows = self.h / scale / 2;
        let mut prev_fg = Rgb(0, 0, 0);
        let mut prev_bg = Rgb(0, 0, 0);
        let mut need_fg = true;
        let mut need_bg = true;

        for row in 0..rows {
            for col in 0..cols {
                let top = self.get(col * scale, row * 2 * scale);
                let bot = self.get(col * scale, (row * 2 + 1) * scale);

                if top == bot {
                    if need_bg || prev_bg != top {
                        queue!(
                            out,
                            style::SetBackgroundColor(CColor::Rgb {
                                r: top.0,
                                g: top.1,
                                b: top.2
                            })
                        )?;
                        prev_bg = top;
                        need_bg = false;
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if need_fg || prev_fg != top {
                        queue!(
                            out,
                            style::SetForegroundColor(CColor::Rgb {
                                r: top.0,
                                g: top.1,
                                b: top.2
                            })
                        )?;
                        prev_fg = top;
                        need_fg = false;
                    }
                    if need_bg || prev_bg != bot {
                        queue!(
                            out,
                            style::SetBackgroundColor(CColor::Rgb {
                                r: bot.0,
                                g: bot.1,
                                b: bot.2
                            })
                        )?;
                        prev_bg = bot;
                        need_bg = false;
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row < rows - 1 {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                need_fg = true;
                need_bg = true;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}
