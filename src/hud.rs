//! Terminal host: raw-mode keyboard input and a text HUD with a minimap

use crate::checkpoints::Checkpoint;
use crate::game::Game;
use crate::input::KeyState;
use crate::procgen::Heightfield;
use crate::scene::SceneSink;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{
        self, Event, KeyCode, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::Print,
    terminal::{
        self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use glam::Vec3;
use std::f32::consts::{FRAC_PI_4, PI};
use std::io::{self, Stdout, Write};
use std::time::Duration;

/// Terrain shading, low to high
const SHADES: &[u8] = b" .:-=+*#%@";

/// Minimap character grid, row 0 at the far (+z) edge
pub fn render_minimap(
    heightfield: &Heightfield,
    car: Vec3,
    car_yaw_rad: f32,
    checkpoints: &[Checkpoint],
    width: usize,
    height: usize,
) -> Vec<String> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let grid = heightfield.grid();
    let (lo, hi) = heightfield.height_range();
    let span = (hi - lo).max(f32::EPSILON);

    let mut cells: Vec<Vec<u8>> = (0..height)
        .map(|cy| {
            (0..width)
                .map(|cx| {
                    let x = -grid.half_size() + (cx as f32 + 0.5) / width as f32 * grid.size;
                    let z = grid.half_size() - (cy as f32 + 0.5) / height as f32 * grid.size;
                    let t = (heightfield.sample(x, z) - lo) / span;
                    let shade = (t * (SHADES.len() - 1) as f32).round() as usize;
                    SHADES[shade.min(SHADES.len() - 1)]
                })
                .collect()
        })
        .collect();

    let to_cell = |x: f32, z: f32| -> Option<(usize, usize)> {
        let fx = (x + grid.half_size()) / grid.size * width as f32;
        let fy = (grid.half_size() - z) / grid.size * height as f32;
        if fx < 0.0 || fy < 0.0 || fx >= width as f32 || fy >= height as f32 {
            return None;
        }
        Some((fx as usize, fy as usize))
    };

    for (i, checkpoint) in checkpoints.iter().enumerate() {
        if let Some((cx, cy)) = to_cell(checkpoint.position.x, checkpoint.position.z) {
            cells[cy][cx] = if checkpoint.reached {
                b'x'
            } else {
                // Markers past 9 share the last digit
                b'1' + i.min(8) as u8
            };
        }
    }

    if let Some((cx, cy)) = to_cell(car.x, car.z) {
        cells[cy][cx] = heading_glyph(car_yaw_rad);
    }

    cells
        .into_iter()
        .map(|row| String::from_utf8_lossy(&row).into_owned())
        .collect()
}

/// Arrow for a heading; yaw 0 faces +z, which is up on the map
fn heading_glyph(yaw_rad: f32) -> u8 {
    let yaw = yaw_rad.rem_euclid(2.0 * PI);
    match ((yaw + FRAC_PI_4) / (PI / 2.0)) as u32 % 4 {
        0 => b'^',
        1 => b'>',
        2 => b'v',
        _ => b'<',
    }
}

/// Raw-mode terminal that feeds keys in and draws the HUD
///
/// Restores the terminal on drop.
pub struct TerminalHost {
    stdout: Stdout,
    reports_release: bool,
    hold_frames: u32,
}

impl TerminalHost {
    pub fn enter(hold_frames: u32) -> io::Result<Self> {
        let mut stdout = io::stdout();
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;

        let reports_release = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if reports_release {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }

        Ok(Self {
            stdout,
            reports_release,
            hold_frames,
        })
    }

    pub fn reports_release(&self) -> bool {
        self.reports_release
    }

    /// Drain pending key events without waiting. Returns true on quit.
    pub fn pump_input(&mut self, keys: &mut KeyState) -> io::Result<bool> {
        while event::poll(Duration::ZERO)? {
            let Event::Key(key) = event::read()? else {
                continue;
            };

            let quit = key.kind != KeyEventKind::Release
                && (matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
                    || (key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)));
            if quit {
                return Ok(true);
            }

            keys.apply_event(&key, self.reports_release, self.hold_frames);
        }
        Ok(false)
    }

    pub fn draw<S: SceneSink>(
        &mut self,
        game: &Game<S>,
        minimap_width: usize,
        minimap_height: usize,
    ) -> io::Result<()> {
        let car = game.car();
        let position = game.car_position();
        let checkpoints = game.checkpoints();

        let mut lines = vec![
            format!(
                "speed {:>6.3} / {:.3}   pos ({:>8.1}, {:>6.1}, {:>8.1})   heading {:>6.1}°",
                car.velocity,
                game.tuning().max_speed,
                position.x,
                position.y,
                position.z,
                car.yaw_rad.to_degrees()
            ),
            if checkpoints.is_complete() {
                format!("checkpoints {}/{}  course complete!", checkpoints.len(), checkpoints.len())
            } else {
                format!(
                    "checkpoints {}/{}",
                    checkpoints.current_index(),
                    checkpoints.len()
                )
            },
            game.status().unwrap_or("").to_string(),
        ];
        lines.extend(render_minimap(
            game.heightfield(),
            position,
            car.yaw_rad,
            checkpoints.checkpoints(),
            minimap_width,
            minimap_height,
        ));
        lines.push("w/s throttle  a/d steer  space brake  r reset  q quit".to_string());

        for (row, line) in lines.iter().enumerate() {
            queue!(
                self.stdout,
                MoveTo(0, row as u16),
                Clear(ClearType::CurrentLine),
                Print(line)
            )?;
        }
        self.stdout.flush()
    }
}

impl Drop for TerminalHost {
    fn drop(&mut self) {
        if self.reports_release {
            let _ = execute!(self.stdout, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(self.stdout, Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}
