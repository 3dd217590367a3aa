use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::graphics::{render_mesh, RenderError, Surface, TermSurface};
use crate::math::{rotate, to_world_space};
use crate::state::{Controls, ShapeState};

/// Slider-equivalent bounds on the per-tick rotation step, in degrees.
pub const STEP_MIN: f64 = 0.0;
pub const STEP_MAX: f64 = 30.0;
const STEP_INCREMENT: f64 = 0.5;

/// The animation driver. Owns the per-shape rotation state and the control
/// inputs, advances and draws the scene once per tick, and reacts to
/// keyboard input between ticks.
pub struct App {
    pub shapes: Vec<ShapeState>,
    pub controls: Controls,
    pub debug: bool,
    pub quit: bool,
    initial_step: f64,
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
}

impl App {
    /// `shapes` draw in the order given, first shape bottom-most.
    pub fn new(shapes: Vec<ShapeState>, step_degrees: f64, rotating: bool) -> Self {
        App {
            shapes,
            controls: Controls {
                rotating,
                step_degrees,
            },
            debug: false,
            quit: false,
            initial_step: step_degrees,
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
        }
    }

    /// Runs one animation step: clear the frame once, then for each shape
    /// advance its angle if rotation is on, rebuild its world-space outline
    /// from the immutable local mesh, and stroke it.
    pub fn tick(&mut self, surface: &mut impl Surface) -> Result<(), RenderError> {
        surface.clear();
        for shape in &mut self.shapes {
            if self.controls.rotating {
                shape.advance(self.controls.step_degrees);
            }
            let rotated = rotate(&shape.mesh, shape.angle);
            let world = to_world_space(&rotated, shape.position);
            render_mesh(surface, &world)?;
        }

        // FPS measured over one-second windows
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }
        Ok(())
    }

    /// Handle a key event between ticks.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit = true;
            }
            KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => {
                self.controls.rotating = !self.controls.rotating;
                log::debug!("rotation {}", if self.controls.rotating { "on" } else { "off" });
            }
            KeyCode::Up => {
                self.controls.step_degrees =
                    (self.controls.step_degrees + STEP_INCREMENT).min(STEP_MAX);
                log::debug!("step now {:.1} deg/tick", self.controls.step_degrees);
            }
            KeyCode::Down => {
                self.controls.step_degrees =
                    (self.controls.step_degrees - STEP_INCREMENT).max(STEP_MIN);
                log::debug!("step now {:.1} deg/tick", self.controls.step_degrees);
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                self.debug = !self.debug;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                for shape in &mut self.shapes {
                    shape.angle = 0.0;
                }
                self.controls.step_degrees = self.initial_step;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.quit = true;
            }
            _ => {}
        }
    }

    /// Draws the status line and, when enabled, the debug readout. These
    /// are terminal chrome rather than part of the world-space scene, so
    /// they write cell text directly instead of going through the path API.
    pub fn overlay(&self, surface: &mut TermSurface) {
        let status = format!(
            "rotation {}   step {:.1} deg/tick   [space] toggle  [up/down] step  [r] reset  [d] debug  [q] quit",
            if self.controls.rotating { "on " } else { "off" },
            self.controls.step_degrees
        );
        let last_row = surface.rows().saturating_sub(1);
        surface.draw_text(last_row, 0, &status);

        if self.debug {
            surface.draw_text(
                0,
                0,
                &format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            );
            for (i, shape) in self.shapes.iter().enumerate() {
                surface.draw_text(
                    i + 1,
                    0,
                    &format!("{} angle: {:.2}", shape.label, shape.angle),
                );
            }
            surface.draw_text(
                self.shapes.len() + 1,
                0,
                &format!("fps: {:.2}", self.fps),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::square_mesh;
    use crate::vertex::Vertex;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app(step: f64, rotating: bool) -> App {
        App::new(
            vec![ShapeState::new(
                "square",
                square_mesh(100.0),
                Vertex::new(300.0, 300.0),
            )],
            step,
            rotating,
        )
    }

    #[test]
    fn space_toggles_rotation() {
        let mut app = test_app(2.0, true);
        app.handle_key(key(KeyCode::Char(' ')));
        assert!(!app.controls.rotating);
        app.handle_key(key(KeyCode::Char(' ')));
        assert!(app.controls.rotating);
    }

    #[test]
    fn step_is_clamped_to_the_slider_range() {
        let mut app = test_app(STEP_MAX - 0.1, true);
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.controls.step_degrees, STEP_MAX);

        let mut app = test_app(0.1, true);
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.controls.step_degrees, STEP_MIN);
    }

    #[test]
    fn reset_restores_angles_and_step() {
        let mut app = test_app(2.0, true);
        app.shapes[0].angle = 123.0;
        app.handle_key(key(KeyCode::Up));
        app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(app.shapes[0].angle, 0.0);
        assert_eq!(app.controls.step_degrees, 2.0);
    }

    #[test]
    fn quit_keys_raise_the_quit_flag() {
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let mut app = test_app(2.0, true);
            app.handle_key(key(code));
            assert!(app.quit);
        }
        let mut app = test_app(2.0, true);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.quit);
    }

    #[test]
    fn key_releases_are_ignored() {
        let mut app = test_app(2.0, true);
        let mut release = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        app.handle_key(release);
        assert!(app.controls.rotating);
    }
}
