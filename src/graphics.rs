use std::fmt;
use std::io::{self, Write};

use crossterm::{cursor, queue, style};

use crate::vertex::Vertex;

/// Rejected renderer input. This marks a programming error upstream, not a
/// runtime condition; callers surface it immediately instead of retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    /// The mesh had no vertices, so there is no outline to stroke.
    EmptyMesh,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::EmptyMesh => write!(f, "cannot render an empty mesh"),
        }
    }
}

impl std::error::Error for RenderError {}

/// The render-target contract: path construction plus a full-surface clear,
/// over a known width and height in world units.
pub trait Surface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    /// Wipes the whole surface. Path state is unaffected.
    fn clear(&mut self);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn close_path(&mut self);
    fn stroke(&mut self);
}

/// Strokes the closed outline of `mesh` onto `surface`: one path through
/// the vertices in order, with a final edge from the last vertex back to
/// the first. Only path and stroke state of the surface is touched; nothing
/// is cleared.
pub fn render_mesh(surface: &mut impl Surface, mesh: &[Vertex]) -> Result<(), RenderError> {
    let first = mesh.first().ok_or(RenderError::EmptyMesh)?;
    surface.begin_path();
    surface.move_to(first.x, first.y);
    for v in &mesh[1..] {
        surface.line_to(v.x, v.y);
    }
    surface.close_path();
    surface.stroke();
    Ok(())
}

/// Character-cell drawing surface. The world-space canvas is scaled onto a
/// grid of terminal cells; `stroke` rasterizes the recorded path into the
/// grid with Bresenham lines, and `present` writes the whole grid to the
/// terminal cursor-addressed, so each frame replaces the previous one.
pub struct TermSurface {
    world_width: f64,
    world_height: f64,
    cols: usize,
    rows: usize,
    cells: Vec<char>,
    paths: Vec<Vec<(f64, f64)>>,
}

impl TermSurface {
    pub fn new(world_width: f64, world_height: f64, cols: usize, rows: usize) -> Self {
        TermSurface {
            world_width,
            world_height,
            cols,
            rows,
            cells: vec![' '; cols * rows],
            paths: Vec::new(),
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Rebuilds the cell grid for a new terminal size. The old frame
    /// contents are dropped; the next tick redraws everything anyway.
    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![' '; cols * rows];
    }

    pub fn cell(&self, col: usize, row: usize) -> char {
        assert!(
            col < self.cols && row < self.rows,
            "cell ({col}, {row}) outside {cols}x{rows} grid",
            cols = self.cols,
            rows = self.rows
        );
        self.cells[row * self.cols + col]
    }

    /// Writes `text` into the grid at the given row and column. Text that
    /// runs past the right edge is cut off.
    pub fn draw_text(&mut self, row: usize, col: usize, text: &str) {
        for (i, ch) in text.chars().enumerate() {
            let col = col + i;
            if row >= self.rows || col >= self.cols {
                break;
            }
            self.cells[row * self.cols + col] = ch;
        }
    }

    /// Queues the full frame to `out` and flushes it.
    pub fn present(&self, out: &mut impl Write) -> io::Result<()> {
        for row in 0..self.rows {
            let line: String = self.cells[row * self.cols..(row + 1) * self.cols]
                .iter()
                .collect();
            queue!(out, cursor::MoveTo(0, row as u16), style::Print(line))?;
        }
        out.flush()
    }

    fn to_cell(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x / self.world_width * self.cols as f64,
            y / self.world_height * self.rows as f64,
        )
    }

    fn plot(&mut self, col: isize, row: isize) {
        if col >= 0 && col < self.cols as isize && row >= 0 && row < self.rows as isize {
            self.cells[row as usize * self.cols + col as usize] = '#';
        }
    }

    /// Draws a line between two cell coordinates using Bresenham's
    /// algorithm. Cells outside the grid are skipped.
    fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) {
        let (mut x0, mut y0, x1, y1) = (
            x0.round() as isize,
            y0.round() as isize,
            x1.round() as isize,
            y1.round() as isize,
        );
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy; // error value e_xy

        loop {
            self.plot(x0, y0);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

impl Surface for TermSurface {
    fn width(&self) -> f64 {
        self.world_width
    }

    fn height(&self) -> f64 {
        self.world_height
    }

    fn clear(&mut self) {
        self.cells.fill(' ');
    }

    fn begin_path(&mut self) {
        self.paths.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.paths.push(vec![(x, y)]);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        match self.paths.last_mut() {
            Some(path) => path.push((x, y)),
            // line_to without a current point starts a path, like canvas
            None => self.paths.push(vec![(x, y)]),
        }
    }

    fn close_path(&mut self) {
        if let Some(path) = self.paths.last_mut() {
            if path.len() >= 2 && path.first() != path.last() {
                path.push(path[0]);
            }
        }
    }

    fn stroke(&mut self) {
        let paths = self.paths.clone();
        for path in &paths {
            for pair in path.windows(2) {
                let (x0, y0) = self.to_cell(pair[0].0, pair[0].1);
                let (x1, y1) = self.to_cell(pair[1].0, pair[1].1);
                self.draw_line(x0, y0, x1, y1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // One world unit per cell, so expected cells are easy to read off.
    fn surface_8x8() -> TermSurface {
        TermSurface::new(8.0, 8.0, 8, 8)
    }

    fn frame_string(surface: &TermSurface) -> String {
        (0..surface.rows())
            .map(|row| {
                (0..surface.cols())
                    .map(|col| match surface.cell(col, row) {
                        ' ' => '.',
                        ch => ch,
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn empty_mesh_is_rejected() {
        let mut surface = surface_8x8();
        assert_eq!(render_mesh(&mut surface, &[]), Err(RenderError::EmptyMesh));
    }

    #[test]
    fn square_outline_is_stroked_closed() {
        let mut surface = surface_8x8();
        let mesh = [
            Vertex::new(2.0, 2.0),
            Vertex::new(6.0, 2.0),
            Vertex::new(6.0, 6.0),
            Vertex::new(2.0, 6.0),
        ];
        render_mesh(&mut surface, &mesh).unwrap();
        assert_eq!(
            frame_string(&surface),
            "\
........
........
..#####.
..#...#.
..#...#.
..#...#.
..#####.
........"
        );
    }

    #[test]
    fn single_vertex_strokes_nothing() {
        let mut surface = surface_8x8();
        render_mesh(&mut surface, &[Vertex::new(4.0, 4.0)]).unwrap();
        assert!((0..8).all(|row| (0..8).all(|col| surface.cell(col, row) == ' ')));
    }

    #[test]
    fn clear_wipes_the_frame() {
        let mut surface = surface_8x8();
        let mesh = [Vertex::new(1.0, 1.0), Vertex::new(6.0, 6.0)];
        render_mesh(&mut surface, &mesh).unwrap();
        assert_eq!(surface.cell(1, 1), '#');
        surface.clear();
        assert!((0..8).all(|row| (0..8).all(|col| surface.cell(col, row) == ' ')));
    }

    #[test]
    fn stroke_skips_out_of_bounds_cells() {
        let mut surface = surface_8x8();
        // Runs off the right edge; the in-bounds part still lands.
        let mesh = [Vertex::new(5.0, 3.0), Vertex::new(12.0, 3.0)];
        render_mesh(&mut surface, &mesh).unwrap();
        assert_eq!(surface.cell(5, 3), '#');
        assert_eq!(surface.cell(7, 3), '#');
    }

    #[test]
    fn world_coordinates_scale_onto_the_grid() {
        // 100x100 world on a 10x10 grid: world (50, 50) is cell (5, 5).
        let mut surface = TermSurface::new(100.0, 100.0, 10, 10);
        let mesh = [Vertex::new(50.0, 50.0), Vertex::new(50.0, 50.0)];
        render_mesh(&mut surface, &mesh).unwrap();
        assert_eq!(surface.cell(5, 5), '#');
    }

    #[test]
    fn draw_text_is_clipped_at_the_edge() {
        let mut surface = surface_8x8();
        surface.draw_text(0, 5, "status");
        assert_eq!(surface.cell(5, 0), 's');
        assert_eq!(surface.cell(7, 0), 'a');
    }

    #[test]
    fn present_writes_the_frame() {
        let mut surface = surface_8x8();
        surface.draw_text(3, 0, "hi");
        let mut out = Vec::new();
        surface.present(&mut out).unwrap();
        let written = String::from_utf8(out).unwrap();
        assert!(written.contains("hi"));
    }
}
