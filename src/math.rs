use crate::mesh::Mesh;
use crate::vertex::Vertex;

/// Rotates every vertex around the local origin by `angle_degrees`,
/// clockwise with the y-axis pointing down. Returns a new mesh and leaves
/// the input untouched. Any real angle is accepted; keeping accumulators
/// inside [0, 360) is the caller's job.
pub fn rotate(mesh: &[Vertex], angle_degrees: f64) -> Mesh {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    mesh.iter()
        .map(|v| Vertex::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos))
        .collect()
}

/// Translates a local-space mesh into world space by adding `position` to
/// every vertex. Returns a new mesh and leaves the input untouched.
pub fn to_world_space(mesh: &[Vertex], position: Vertex) -> Mesh {
    mesh.iter().map(|&v| v + position).collect()
}
