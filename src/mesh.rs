use crate::vertex::Vertex;

/// Ordered vertex list defining a closed polygon outline. Vertex i connects
/// to vertex i + 1, and the last vertex connects back to the first.
pub type Mesh = Vec<Vertex>;

/// Builds the square outline centered on its local origin. Corners run
/// top-left, top-right, bottom-right, bottom-left, which is clockwise with
/// the y-axis pointing down.
pub fn square_mesh(half_extent: f64) -> Mesh {
    let h = half_extent;
    vec![
        Vertex::new(-h, -h),
        Vertex::new(h, -h),
        Vertex::new(h, h),
        Vertex::new(-h, h),
    ]
}

/// Samples `samples` vertices evenly around a circle of `radius` centered
/// on the local origin. Vertex i sits at `i * 360 / samples` degrees under
/// the same angular convention `math::rotate` uses, so an unrotated circle
/// is already oriented the way the rest of the pipeline draws it.
///
/// # Panics
///
/// Panics if `samples < 3`; fewer vertices degenerate to a line or a point.
pub fn circle_mesh(radius: f64, samples: usize) -> Mesh {
    assert!(samples >= 3, "a circle mesh needs at least 3 samples, got {samples}");
    (0..samples)
        .map(|i| {
            let theta = (i as f64 * 360.0 / samples as f64).to_radians();
            Vertex::new(radius * theta.cos(), radius * theta.sin())
        })
        .collect()
}
