//! Line-oriented terminal backend fed by a script of player actions.

use std::{
    io::{BufRead, Write},
    thread,
    time::Duration,
};

use anyhow::{bail, Context, Result};
use grid_explorer_core::{CellCoord, Direction, ResourceKind, TerrainKind};
use grid_explorer_rendering::{FrameInput, Presentation, RenderingBackend, Scene, TilePresentation};

/// Lightening applied to the fill of path tiles when drawing in color.
const PATH_HIGHLIGHT: f32 = 0.35;

/// A single parsed script line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    Click(CellCoord),
    Pan(Direction),
    Wait(Duration),
    Quit,
}

fn parse_action(line: &str) -> Result<Option<Action>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let arguments: Vec<&str> = words.collect();

    let action = match (verb, arguments.as_slice()) {
        ("click", [column, row]) => {
            let column = column
                .parse()
                .with_context(|| format!("invalid click column `{column}`"))?;
            let row = row
                .parse()
                .with_context(|| format!("invalid click row `{row}`"))?;
            Action::Click(CellCoord::new(column, row))
        }
        ("pan", [direction]) => Action::Pan(parse_direction(direction)?),
        ("w", []) => Action::Pan(Direction::North),
        ("a", []) => Action::Pan(Direction::West),
        ("s", []) => Action::Pan(Direction::South),
        ("d", []) => Action::Pan(Direction::East),
        ("wait", [millis]) => {
            let millis = millis
                .parse()
                .with_context(|| format!("invalid wait duration `{millis}`"))?;
            Action::Wait(Duration::from_millis(millis))
        }
        ("quit", []) => Action::Quit,
        _ => bail!("unrecognised script line `{line}`"),
    };
    Ok(Some(action))
}

fn parse_direction(word: &str) -> Result<Direction> {
    match word {
        "n" | "north" | "up" => Ok(Direction::North),
        "s" | "south" | "down" => Ok(Direction::South),
        "e" | "east" | "right" => Ok(Direction::East),
        "w" | "west" | "left" => Ok(Direction::West),
        _ => bail!("unknown pan direction `{word}`"),
    }
}

/// Renders scenes as text after every script action.
#[derive(Debug)]
pub(crate) struct TerminalBackend<R, W> {
    script: R,
    output: W,
    frame_interval: Duration,
    color: bool,
    realtime: bool,
}

impl<R, W> TerminalBackend<R, W>
where
    R: BufRead,
    W: Write,
{
    /// Creates a backend reading actions from `script` and drawing to `output`.
    ///
    /// Waits are simulated in frames of `frame_interval`.
    pub(crate) fn new(script: R, output: W, frame_interval: Duration, color: bool) -> Self {
        Self {
            script,
            output,
            frame_interval: if frame_interval.is_zero() {
                Duration::from_millis(16)
            } else {
                frame_interval
            },
            color,
            realtime: false,
        }
    }

    /// Sleeps for each simulated frame so waits play out at wall-clock speed.
    pub(crate) fn with_realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    fn draw(&mut self, scene: &Scene) -> Result<()> {
        let window = scene.window;
        for row in 0..window.height() {
            let mut line = String::new();
            for column in 0..window.width() {
                match scene.tile_at(CellCoord::new(column, row)) {
                    Some(tile) if self.color => line.push_str(&colored_glyph(tile)),
                    Some(tile) => line.push(glyph(tile)),
                    None => line.push(' '),
                }
            }
            writeln!(self.output, "{line}")?;
        }
        writeln!(self.output, "{}", scene.hud.position_line())?;
        writeln!(self.output, "{}", scene.hud.resources_line())?;
        writeln!(self.output)?;
        Ok(())
    }
}

impl<R, W> RenderingBackend for TerminalBackend<R, W>
where
    R: BufRead,
    W: Write,
{
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene),
    {
        let Presentation {
            window_title,
            controls_hint,
            mut scene,
            ..
        } = presentation;

        writeln!(self.output, "{window_title}")?;
        writeln!(self.output, "{controls_hint}")?;
        writeln!(self.output)?;
        self.draw(&scene)?;

        let mut line = String::new();
        let mut line_number = 0usize;
        loop {
            line.clear();
            if self.script.read_line(&mut line)? == 0 {
                break;
            }
            line_number += 1;

            let action = parse_action(&line)
                .with_context(|| format!("script line {line_number}"))?;
            let Some(action) = action else {
                continue;
            };

            match action {
                Action::Quit => break,
                Action::Click(coord) => update_scene(
                    Duration::ZERO,
                    FrameInput {
                        click: Some(coord),
                        pan: None,
                    },
                    &mut scene,
                ),
                Action::Pan(direction) => update_scene(
                    Duration::ZERO,
                    FrameInput {
                        click: None,
                        pan: Some(direction),
                    },
                    &mut scene,
                ),
                Action::Wait(mut remaining) => {
                    while !remaining.is_zero() {
                        let dt = remaining.min(self.frame_interval);
                        remaining -= dt;
                        if self.realtime {
                            thread::sleep(dt);
                        }
                        update_scene(dt, FrameInput::default(), &mut scene);
                    }
                }
            }

            self.draw(&scene)?;
        }

        self.output.flush()?;
        Ok(())
    }
}

fn glyph(tile: &TilePresentation) -> char {
    if tile.token {
        return '@';
    }
    if tile.target {
        return 'X';
    }
    if let Some(resource) = tile.resource {
        return match resource {
            ResourceKind::Wood => 'w',
            ResourceKind::Stone => 'o',
            ResourceKind::Sulfur => '%',
        };
    }
    if tile.future_path {
        return '*';
    }
    match tile.terrain {
        TerrainKind::Grass => '.',
        TerrainKind::Sand => ':',
        TerrainKind::Water => '~',
        TerrainKind::Mountain => '^',
    }
}

fn colored_glyph(tile: &TilePresentation) -> String {
    let fill = if tile.future_path {
        tile.fill().lighten(PATH_HIGHLIGHT)
    } else {
        tile.fill()
    };
    let (red, green, blue) = fill.to_rgb_u8();
    let (fg_red, fg_green, fg_blue) = tile
        .marker()
        .or_else(|| tile.outline())
        .unwrap_or(fill)
        .to_rgb_u8();
    format!(
        "\x1b[48;2;{red};{green};{blue}m\x1b[38;2;{fg_red};{fg_green};{fg_blue}m{}\x1b[0m",
        glyph(tile)
    )
}
