use crossterm::{
    cursor,
    event::{self, Event, KeyCode},
    execute, terminal,
};
use std::io::{self, stdout};
use std::time::{Duration, Instant};

mod audio;
mod config;
mod game;
mod mask;
mod render;
mod sprites;

use audio::Audio;
use config::{FIELD_H, FIELD_W, FPS};
use game::{Command, Game, Phase};
use render::PixelBuf;
use sprites::Atlas;

/// Smallest integer downscale that makes the fixed field fit the terminal.
fn downscale(cols: u16, rows: u16) -> usize {
    let w = (FIELD_W as usize).div_ceil(cols.max(1) as usize);
    let h = (FIELD_H as usize).div_ceil(rows.max(1) as usize * 2);
    w.max(h).max(1)
}

fn main() -> io::Result<()> {
    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
    )?;

    let cleanup = |out: &mut io::Stdout| -> io::Result<()> {
        execute!(
            out,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        terminal::disable_raw_mode()
    };

    let (cols, rows) = terminal::size()?;
    let mut scale = downscale(cols, rows);

    let atlas = Atlas::build();
    let audio = Audio::new();
    let mut buf = PixelBuf::new(FIELD_W as usize, FIELD_H as usize);
    let mut game = Game::new(atlas.masks());

    let frame_dur = Duration::from_millis(1000 / FPS); // 30 fps

    loop {
        let frame_start = Instant::now();

        // Input: drain this tick's events into one command batch
        let mut commands = Vec::new();
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => match key.code {
                    KeyCode::Char('q') => {
                        cleanup(&mut out)?;
                        return Ok(());
                    }
                    KeyCode::Up | KeyCode::Char(' ') | KeyCode::Enter => {
                        commands.push(if game.phase() == Phase::Over {
                            Command::Restart
                        } else {
                            Command::Ascend
                        });
                    }
                    KeyCode::Esc | KeyCode::Char('p') => {
                        commands.push(Command::PauseOrResume);
                    }
                    _ => {}
                },
                Event::Resize(c, r) => {
                    scale = downscale(c, r);
                }
                _ => {}
            }
        }

        // Update
        for cue in game.tick(&commands) {
            audio.play(cue);
        }

        // Render
        for cmd in game.draw_list() {
            buf.blit(atlas.get(cmd.sprite), cmd.x, cmd.y);
        }
        buf.render(&mut out, scale)?;

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
}
