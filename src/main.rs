use std::io;
use std::time::{Duration, Instant};

use anyhow::ensure;
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};

use spin2d::app::App;
use spin2d::graphics::TermSurface;
use spin2d::mesh::{circle_mesh, square_mesh};
use spin2d::state::ShapeState;
use spin2d::vertex::Vertex;

/// A console-based 2D shape rotation demo
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Half size of the square, in world units
    #[arg(long, default_value_t = 100.0)]
    square_size: f64,

    /// World position of the square's center, as X,Y
    #[arg(long, default_value = "300,300", value_parser = parse_point)]
    square_pos: Vertex,

    /// Radius of the circle, in world units
    #[arg(long, default_value_t = 50.0)]
    circle_radius: f64,

    /// Number of vertices the circle outline is sampled with
    #[arg(long, default_value_t = 30)]
    circle_samples: usize,

    /// World position of the circle's center, as X,Y
    #[arg(long, default_value = "100,300", value_parser = parse_point)]
    circle_pos: Vertex,

    /// World-space canvas mapped onto the terminal, as WIDTHxHEIGHT
    #[arg(long, default_value = "600x450", value_parser = parse_extent)]
    canvas: (f64, f64),

    /// Animation rate in ticks per second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Initial rotation step in degrees per tick
    #[arg(long, default_value_t = 2.0)]
    step: f64,

    /// Start with rotation switched off
    #[arg(long)]
    paused: bool,
}

fn parse_point(s: &str) -> Result<Vertex, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
    let x = x.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<f64>().map_err(|e| e.to_string())?;
    Ok(Vertex::new(x, y))
}

fn parse_extent(s: &str) -> Result<(f64, f64), String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w = w.trim().parse::<f64>().map_err(|e| e.to_string())?;
    let h = h.trim().parse::<f64>().map_err(|e| e.to_string())?;
    if w <= 0.0 || h <= 0.0 {
        return Err("canvas dimensions must be positive".into());
    }
    Ok((w, h))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    ensure!(args.circle_samples >= 3, "--circle-samples must be at least 3");
    ensure!(args.fps > 0, "--fps must be positive");
    ensure!(
        args.step.is_finite() && args.step >= 0.0,
        "--step must be a non-negative number"
    );
    ensure!(args.square_size > 0.0, "--square-size must be positive");
    ensure!(args.circle_radius > 0.0, "--circle-radius must be positive");

    let size = termsize::get().unwrap_or(termsize::Size { rows: 24, cols: 80 });
    let (world_width, world_height) = args.canvas;
    let mut surface = TermSurface::new(
        world_width,
        world_height,
        size.cols as usize,
        size.rows as usize,
    );
    log::info!(
        "{world_width}x{world_height} world units on a {}x{} cell grid",
        size.cols,
        size.rows
    );

    let mut app = App::new(
        vec![
            ShapeState::new("square", square_mesh(args.square_size), args.square_pos),
            ShapeState::new(
                "circle",
                circle_mesh(args.circle_radius, args.circle_samples),
                args.circle_pos,
            ),
        ],
        args.step,
        !args.paused,
    );

    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)?;
    let result = run(
        &mut app,
        &mut surface,
        Duration::from_secs_f64(1.0 / args.fps as f64),
    );
    execute!(io::stdout(), cursor::Show, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    result
}

/// Drives the fixed-tick loop: pump input until the next deadline, then
/// advance and draw one frame. Ticks never overlap; when a frame runs late
/// the deadline skips forward instead of trying to catch up.
fn run(app: &mut App, surface: &mut TermSurface, tick: Duration) -> anyhow::Result<()> {
    let mut out = io::stdout();
    let mut next_tick = Instant::now();
    while !app.quit {
        while !app.quit && Instant::now() < next_tick {
            if event::poll(next_tick.saturating_duration_since(Instant::now()))? {
                match event::read()? {
                    Event::Key(key) => app.handle_key(key),
                    Event::Resize(cols, rows) => surface.resize(cols as usize, rows as usize),
                    _ => {}
                }
            }
        }
        if app.quit {
            break;
        }
        app.tick(surface)?;
        app.overlay(surface);
        surface.present(&mut out)?;
        next_tick += tick;
        let now = Instant::now();
        if next_tick < now {
            next_tick = now;
        }
    }
    Ok(())
}
