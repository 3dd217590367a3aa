use crate::mesh::Mesh;
use crate::vertex::Vertex;

/// Everything the animation loop tracks for one shape. The mesh and world
/// position are fixed at startup; the rotation angle is the only field a
/// tick mutates.
pub struct ShapeState {
    /// Name shown in the debug overlay
    pub label: &'static str,
    /// Local-space outline, centered on the shape's own origin
    pub mesh: Mesh,
    /// Center of the shape in world space
    pub position: Vertex,
    /// Current rotation in degrees, kept in [0, 360)
    pub angle: f64,
}

impl ShapeState {
    pub fn new(label: &'static str, mesh: Mesh, position: Vertex) -> Self {
        ShapeState {
            label,
            mesh,
            position,
            angle: 0.0,
        }
    }

    /// Advances the rotation by `step` degrees and wraps back into
    /// [0, 360). A single subtraction is enough because the control layer
    /// keeps the per-tick step well below a full turn.
    pub fn advance(&mut self, step: f64) {
        self.angle += step;
        if self.angle >= 360.0 {
            self.angle -= 360.0;
        }
    }
}

/// Control inputs the animation loop reads each tick. The event layer owns
/// and mutates them; the loop itself never writes them.
#[derive(Debug, Clone, Copy)]
pub struct Controls {
    /// Whether shapes spin this tick
    pub rotating: bool,
    /// Degrees added to each spinning shape's angle per tick
    pub step_degrees: f64,
}
