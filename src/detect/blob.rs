//! Connected-component blob extraction and shape measures.
//!
//! Blobs stand in for contours: each is a set of connected foreground
//! pixels with its bounding box, pixel count, and enough geometry to
//! judge squareness and convexity.

use super::binarize::Mask;
use std::collections::VecDeque;

/// Pixel connectivity used when growing components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    /// Edge-adjacent neighbors only. Keeps diagonally touching cell
    /// interiors separate.
    Four,
    /// Edge- and corner-adjacent neighbors. Keeps thin lattices connected.
    Eight,
}

/// A connected foreground component.
#[derive(Debug, Clone)]
pub struct Blob {
    /// Bounding box origin x.
    pub x: u32,
    /// Bounding box origin y.
    pub y: u32,
    /// Bounding box width.
    pub w: u32,
    /// Bounding box height.
    pub h: u32,
    /// Foreground pixel count.
    pub area: usize,
    /// True if any pixel lies on the mask border.
    pub touches_border: bool,
    /// Member pixels, for hull computations.
    pub points: Vec<(u32, u32)>,
}

impl Blob {
    /// Bounding box area in pixels.
    #[inline]
    pub fn bbox_area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    /// Width over height of the bounding box.
    #[inline]
    pub fn aspect_ratio(&self) -> f64 {
        self.w as f64 / self.h.max(1) as f64
    }

    /// Fraction of the bounding box covered by foreground pixels.
    #[inline]
    pub fn fill_ratio(&self) -> f64 {
        self.area as f64 / self.bbox_area().max(1) as f64
    }

    /// Pixel area with enclosed holes filled in.
    ///
    /// Thresholding often reduces a solid glyph to its outline; filling
    /// the interior recovers the shape the outline traces, so a ring
    /// measures like the disc it came from.
    pub fn filled_area(&self) -> usize {
        let (w, h) = (self.w as usize, self.h as usize);
        // Padded occupancy grid so the outside is a single border region.
        let pw = w + 2;
        let ph = h + 2;
        let mut occupied = vec![false; pw * ph];
        for &(px, py) in &self.points {
            let lx = (px - self.x) as usize + 1;
            let ly = (py - self.y) as usize + 1;
            occupied[ly * pw + lx] = true;
        }

        let mut outside = vec![false; pw * ph];
        let mut queue = VecDeque::new();
        outside[0] = true;
        queue.push_back((0usize, 0usize));
        while let Some((x, y)) = queue.pop_front() {
            for &(dx, dy) in &NEIGHBORS_4 {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if nx < 0 || ny < 0 || nx as usize >= pw || ny as usize >= ph {
                    continue;
                }
                let idx = ny as usize * pw + nx as usize;
                if !outside[idx] && !occupied[idx] {
                    outside[idx] = true;
                    queue.push_back((nx as usize, ny as usize));
                }
            }
        }

        (0..pw * ph).filter(|&i| !outside[i]).count()
    }

    /// Ratio of hole-filled pixel area to convex hull area, capped at 1.0.
    ///
    /// Near 1.0 for convex outlines (discs, bars); markedly lower for
    /// crescents and crosses.
    pub fn solidity(&self) -> f64 {
        let hull = convex_hull(&self.points);
        let hull_px = hull_area(&hull);
        if hull_px <= 0.0 {
            // Degenerate hull (a line of pixels) is trivially convex.
            return 1.0;
        }
        (self.filled_area() as f64 / hull_px).min(1.0)
    }
}

const NEIGHBORS_4: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const NEIGHBORS_8: [(i64, i64); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Extracts all connected foreground components of a mask.
pub fn find_blobs(mask: &Mask, connectivity: Connectivity) -> Vec<Blob> {
    let (w, h) = (mask.width(), mask.height());
    let neighbors: &[(i64, i64)] = match connectivity {
        Connectivity::Four => &NEIGHBORS_4,
        Connectivity::Eight => &NEIGHBORS_8,
    };

    let mut visited = vec![false; w * h];
    let mut blobs = Vec::new();
    let mut queue = VecDeque::new();

    for start_y in 0..h {
        for start_x in 0..w {
            if visited[start_y * w + start_x] || !mask.is_set(start_x, start_y) {
                continue;
            }

            let mut points = Vec::new();
            let (mut min_x, mut min_y) = (start_x, start_y);
            let (mut max_x, mut max_y) = (start_x, start_y);
            let mut touches_border = false;

            visited[start_y * w + start_x] = true;
            queue.push_back((start_x, start_y));

            while let Some((x, y)) = queue.pop_front() {
                points.push((x as u32, y as u32));
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
                if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
                    touches_border = true;
                }

                for &(dx, dy) in neighbors {
                    let nx = x as i64 + dx;
                    let ny = y as i64 + dy;
                    if nx < 0 || ny < 0 || nx as usize >= w || ny as usize >= h {
                        continue;
                    }
                    let (nx, ny) = (nx as usize, ny as usize);
                    if !visited[ny * w + nx] && mask.is_set(nx, ny) {
                        visited[ny * w + nx] = true;
                        queue.push_back((nx, ny));
                    }
                }
            }

            blobs.push(Blob {
                x: min_x as u32,
                y: min_y as u32,
                w: (max_x - min_x + 1) as u32,
                h: (max_y - min_y + 1) as u32,
                area: points.len(),
                touches_border,
                points,
            });
        }
    }

    blobs
}

/// Andrew's monotone chain convex hull over pixel coordinates.
///
/// Returns hull vertices in counter-clockwise order.
pub fn convex_hull(points: &[(u32, u32)]) -> Vec<(i64, i64)> {
    let mut pts: Vec<(i64, i64)> = points.iter().map(|&(x, y)| (x as i64, y as i64)).collect();
    pts.sort_unstable();
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }

    fn cross(o: (i64, i64), a: (i64, i64), b: (i64, i64)) -> i64 {
        (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
    }

    let mut hull: Vec<(i64, i64)> = Vec::with_capacity(pts.len() * 2);
    for &p in &pts {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0 {
            hull.pop();
        }
        hull.push(p);
    }
    let lower_len = hull.len() + 1;
    for &p in pts.iter().rev() {
        while hull.len() >= lower_len && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0
        {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();
    hull
}

/// Shoelace area of a polygon given in vertex order.
pub fn hull_area(hull: &[(i64, i64)]) -> f64 {
    if hull.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0i64;
    for i in 0..hull.len() {
        let (x0, y0) = hull[i];
        let (x1, y1) = hull[(i + 1) % hull.len()];
        twice_area += x0 * y1 - x1 * y0;
    }
    (twice_area.abs() as f64) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from_rows(rows: &[&str]) -> Mask {
        let mut mask = Mask::new(rows[0].len(), rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    mask.set(x, y);
                }
            }
        }
        mask
    }

    #[test]
    fn test_two_separate_blobs() {
        let mask = mask_from_rows(&[
            "##....",
            "##....",
            "....##",
            "....##",
        ]);
        let blobs = find_blobs(&mask, Connectivity::Four);
        assert_eq!(blobs.len(), 2);
        assert!(blobs.iter().all(|b| b.area == 4));
        assert!(blobs.iter().all(|b| b.touches_border));
    }

    #[test]
    fn test_diagonal_split_by_connectivity() {
        let mask = mask_from_rows(&[
            "#.",
            ".#",
        ]);
        assert_eq!(find_blobs(&mask, Connectivity::Four).len(), 2);
        assert_eq!(find_blobs(&mask, Connectivity::Eight).len(), 1);
    }

    #[test]
    fn test_interior_blob_does_not_touch_border() {
        let mask = mask_from_rows(&[
            ".....",
            ".###.",
            ".###.",
            ".....",
        ]);
        let blobs = find_blobs(&mask, Connectivity::Four);
        assert_eq!(blobs.len(), 1);
        assert!(!blobs[0].touches_border);
        assert_eq!(blobs[0].w, 3);
        assert_eq!(blobs[0].h, 2);
        assert!((blobs[0].fill_ratio() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_square_hull_area() {
        let points: Vec<(u32, u32)> = (0..10)
            .flat_map(|y| (0..10).map(move |x| (x, y)))
            .collect();
        let hull = convex_hull(&points);
        // Hull of pixel centers spans 9x9.
        assert!((hull_area(&hull) - 81.0).abs() < 1e-9);
    }

    #[test]
    fn test_filled_square_is_solid() {
        let mask = mask_from_rows(&[
            "######",
            "######",
            "######",
            "######",
            "######",
            "######",
        ]);
        let blobs = find_blobs(&mask, Connectivity::Four);
        assert!(blobs[0].solidity() > 0.95);
    }

    #[test]
    fn test_ring_fills_to_disc() {
        let mask = mask_from_rows(&[
            ".######.",
            "##....##",
            "#......#",
            "#......#",
            "#......#",
            "#......#",
            "##....##",
            ".######.",
        ]);
        let blobs = find_blobs(&mask, Connectivity::Eight);
        assert_eq!(blobs.len(), 1);
        // The enclosed hole counts toward the filled area.
        assert!(blobs[0].filled_area() > blobs[0].area);
        assert!(blobs[0].solidity() > 0.9);
    }

    #[test]
    fn test_l_shape_is_not_solid() {
        let mask = mask_from_rows(&[
            "##........",
            "##........",
            "##........",
            "##........",
            "##........",
            "##........",
            "##........",
            "##........",
            "##########",
            "##########",
        ]);
        let blobs = find_blobs(&mask, Connectivity::Four);
        assert_eq!(blobs.len(), 1);
        assert!(blobs[0].solidity() < 0.85);
    }
}
