//! Segment rasterization over integer grid cells.

/// Yields the ordered grid cells a segment between two cells passes through.
pub trait Rasterizer {
    fn cells(&self, from: (i64, i64), to: (i64, i64)) -> Vec<(i64, i64)>;
}

/// Bresenham's line algorithm; both endpoints are included.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bresenham;

impl Rasterizer for Bresenham {
    fn cells(&self, from: (i64, i64), to: (i64, i64)) -> Vec<(i64, i64)> {
        let (x0, y0) = from;
        let (x1, y1) = to;

        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx - dy;

        let mut cells = Vec::with_capacity((dx.max(dy) + 1) as usize);
        let mut x = x0;
        let mut y = y0;

        loop {
            cells.push((x, y));
            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }

        cells
    }
}
