/// Bounding box with top-left origin coordinate system.
///
/// - `x0`: left edge
/// - `top`: top edge (distance from top of page)
/// - `x1`: right edge
/// - `bottom`: bottom edge (distance from top of page)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl BBox {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Center point `(x, y)`.
    pub fn center(&self) -> (f64, f64) {
        ((self.x0 + self.x1) / 2.0, (self.top + self.bottom) / 2.0)
    }

    /// Whether `(x, y)` lies inside the box, edges included.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.top && y <= self.bottom
    }

    /// Compute the union of two bounding boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            top: self.top.min(other.top),
            x1: self.x1.max(other.x1),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

/// Orientation of a ruling segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// An axis-aligned ruling segment, in top-left page coordinates.
///
/// Horizontal segments have `top == bottom`, vertical segments `x0 == x1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
    pub orientation: Orientation,
}

impl Edge {
    /// Build an edge from two end points.
    ///
    /// Returns `None` for diagonal segments (neither axis within
    /// `tolerance`) and for degenerate points.
    pub fn from_points(a: (f64, f64), b: (f64, f64), tolerance: f64) -> Option<Edge> {
        let dx = (a.0 - b.0).abs();
        let dy = (a.1 - b.1).abs();
        if dx <= tolerance && dy <= tolerance {
            return None;
        }
        if dy <= tolerance {
            let y = (a.1 + b.1) / 2.0;
            Some(Edge {
                x0: a.0.min(b.0),
                top: y,
                x1: a.0.max(b.0),
                bottom: y,
                orientation: Orientation::Horizontal,
            })
        } else if dx <= tolerance {
            let x = (a.0 + b.0) / 2.0;
            Some(Edge {
                x0: x,
                top: a.1.min(b.1),
                x1: x,
                bottom: a.1.max(b.1),
                orientation: Orientation::Vertical,
            })
        } else {
            None
        }
    }

    /// The four sides of a rectangle.
    pub fn from_rect(bbox: BBox) -> [Edge; 4] {
        let h = |y: f64| Edge {
            x0: bbox.x0,
            top: y,
            x1: bbox.x1,
            bottom: y,
            orientation: Orientation::Horizontal,
        };
        let v = |x: f64| Edge {
            x0: x,
            top: bbox.top,
            x1: x,
            bottom: bbox.bottom,
            orientation: Orientation::Vertical,
        };
        [h(bbox.top), h(bbox.bottom), v(bbox.x0), v(bbox.x1)]
    }

    /// Length along the edge's axis.
    pub fn length(&self) -> f64 {
        match self.orientation {
            Orientation::Horizontal => self.x1 - self.x0,
            Orientation::Vertical => self.bottom - self.top,
        }
    }
}

/// Affine transform `[a b c d e f]` as used by PDF content streams.
///
/// A point maps as `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// `self` applied first, then `other`.
    pub fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Vertical scale factor, used to size glyphs.
    pub fn vertical_scale(&self) -> f64 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_dimensions() {
        let bbox = BBox::new(10.0, 20.0, 50.0, 60.0);
        assert_eq!(bbox.width(), 40.0);
        assert_eq!(bbox.height(), 40.0);
        assert_eq!(bbox.center(), (30.0, 40.0));
    }

    #[test]
    fn test_bbox_union() {
        let a = BBox::new(10.0, 20.0, 30.0, 40.0);
        let b = BBox::new(5.0, 25.0, 35.0, 45.0);
        assert_eq!(a.union(&b), BBox::new(5.0, 20.0, 35.0, 45.0));
    }

    #[test]
    fn test_bbox_contains_point_includes_edges() {
        let bbox = BBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(bbox.contains_point(10.0, 0.0));
        assert!(!bbox.contains_point(10.5, 5.0));
    }

    #[test]
    fn test_edge_from_points_horizontal() {
        let edge = Edge::from_points((50.0, 100.0), (10.0, 100.2), 0.5).unwrap();
        assert_eq!(edge.orientation, Orientation::Horizontal);
        assert_eq!(edge.x0, 10.0);
        assert_eq!(edge.x1, 50.0);
        assert!((edge.top - 100.1).abs() < 1e-9);
        assert_eq!(edge.length(), 40.0);
    }

    #[test]
    fn test_edge_from_points_rejects_diagonal_and_dot() {
        assert!(Edge::from_points((0.0, 0.0), (10.0, 10.0), 0.5).is_none());
        assert!(Edge::from_points((5.0, 5.0), (5.0, 5.0), 0.5).is_none());
    }

    #[test]
    fn test_edge_from_rect() {
        let edges = Edge::from_rect(BBox::new(0.0, 0.0, 20.0, 10.0));
        let horizontal = edges
            .iter()
            .filter(|e| e.orientation == Orientation::Horizontal)
            .count();
        assert_eq!(horizontal, 2);
        assert_eq!(edges[3].x0, 20.0);
    }

    #[test]
    fn test_matrix_then_applies_in_order() {
        let scale = Matrix::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        let shift = Matrix::translation(10.0, 5.0);
        assert_eq!(scale.then(&shift).apply(1.0, 1.0), (12.0, 7.0));
        assert_eq!(shift.then(&scale).apply(1.0, 1.0), (22.0, 12.0));
    }

    #[test]
    fn test_matrix_vertical_scale() {
        let m = Matrix::new(12.0, 0.0, 0.0, 12.0, 72.0, 700.0);
        assert_eq!(m.vertical_scale(), 12.0);
        assert_eq!(Matrix::default(), Matrix::identity());
    }
}
