//! Polygon container: an ordered point sequence with its derived winding, area and bounds.

use alloc::vec::Vec;
use num_traits::float::Float;

use crate::error::TessError;
use crate::geom::{self, Bounds};

/// Points whose triangle with their neighbors is smaller than this are removed by
/// [`Polygon::optimize`].
pub const COLLINEAR_EPSILON: f64 = 1e-4;

/// Rotational direction of a polygon boundary, in screen coordinates (y axis down).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    Clockwise,
    CounterClockwise,
}

/// A closed polygon boundary of at least 3 points.
///
/// The first point is not repeated at the end; if it is, the tessellator drops the
/// duplicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<T: Float> {
    points: Vec<[T; 2]>,
    signed_area: T,
    bounds: Bounds<T>,
}

// never empty: construction requires 3 points
#[allow(clippy::len_without_is_empty)]
impl<T: Float> Polygon<T> {
    /// Creates a polygon from its boundary points.
    ///
    /// Fails with [`TessError::InvalidInput`] for fewer than 3 points and with
    /// [`TessError::NonFinite`] if a coordinate is NaN or infinite.
    pub fn new(points: impl IntoIterator<Item = [T; 2]>) -> Result<Self, TessError> {
        Self::from_vec(points.into_iter().collect())
    }

    fn from_vec(points: Vec<[T; 2]>) -> Result<Self, TessError> {
        if points.len() < 3 {
            return Err(TessError::InvalidInput(points.len()));
        }
        if let Some(i) = points
            .iter()
            .position(|[x, y]| !x.is_finite() || !y.is_finite())
        {
            return Err(TessError::NonFinite(i));
        }
        let bounds = Bounds::enclosing(points[0], &points[1..]);
        let two = T::one() + T::one();
        Ok(Self {
            signed_area: signed_area(&points) / two,
            bounds,
            points,
        })
    }

    pub fn points(&self) -> &[[T; 2]] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Area with sign: positive for clockwise polygons (y axis down).
    pub fn signed_area(&self) -> T {
        self.signed_area
    }

    pub fn area(&self) -> T {
        self.signed_area.abs()
    }

    /// A polygon without area counts as clockwise.
    pub fn winding(&self) -> Winding {
        if self.signed_area < T::zero() {
            Winding::CounterClockwise
        } else {
            Winding::Clockwise
        }
    }

    pub fn is_clockwise(&self) -> bool {
        self.winding() == Winding::Clockwise
    }

    pub fn bounds(&self) -> Bounds<T> {
        self.bounds
    }

    /// Center of mass of the enclosed area; `None` when the polygon has no area.
    pub fn centroid(&self) -> Option<[T; 2]> {
        let n = self.points.len();
        let (mut cx, mut cy, mut sum) = (T::zero(), T::zero(), T::zero());
        for i in 0..n {
            let [x0, y0] = self.points[i];
            let [x1, y1] = self.points[(i + 1) % n];
            let a = x0 * y1 - x1 * y0;
            cx = cx + (x0 + x1) * a;
            cy = cy + (y0 + y1) * a;
            sum = sum + a;
        }
        if sum == T::zero() {
            return None;
        }
        // sum is twice the signed area
        let denom = sum * T::from(3.0)?;
        let (x, y) = (cx / denom, cy / denom);
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        Some([x, y])
    }

    /// Even-odd ray cast test.
    pub fn contains_point(&self, [px, py]: [T; 2]) -> bool {
        let mut inside = false;
        let mut j = self.points.len() - 1;
        for (i, &[xi, yi]) in self.points.iter().enumerate() {
            let [xj, yj] = self.points[j];
            if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Boundary edges in order, the last one closing the loop.
    pub fn segments(&self) -> impl Iterator<Item = ([T; 2], [T; 2])> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Intersection of the boundary with segment p1-p2 closest to `p1`.
    pub fn intersect_segment(&self, p1: [T; 2], p2: [T; 2]) -> Option<[T; 2]> {
        self.segments()
            .filter_map(|(a, b)| geom::segment_intersection(a, b, p1, p2))
            .fold(None, |closest: Option<[T; 2]>, p| match closest {
                Some(c) if geom::distance_sq(c, p1) <= geom::distance_sq(p, p1) => Some(c),
                _ => Some(p),
            })
    }

    /// Point of the boundary closest to `p`.
    pub fn closest_boundary_point(&self, p: [T; 2]) -> [T; 2] {
        let mut best = self.points[0];
        let mut best_dist = T::infinity();
        for (a, b) in self.segments() {
            let c = geom::closest_point_on_segment(a, b, p);
            let d = geom::distance_sq(c, p);
            if d < best_dist {
                (best, best_dist) = (c, d);
            }
        }
        best
    }

    /// Reverses the point order, flipping the winding.
    pub fn reverse(&mut self) {
        self.points.reverse();
        self.signed_area = -self.signed_area;
    }

    pub fn translate(&mut self, offset: [T; 2]) {
        for p in &mut self.points {
            *p = geom::add(*p, offset);
        }
        self.bounds = Bounds {
            min: geom::add(self.bounds.min, offset),
            max: geom::add(self.bounds.max, offset),
        };
    }

    /// Rotates the points by `angle` radians, turning the x axis towards the y axis,
    /// around `origin` or, if `None`, around the centroid.
    pub fn rotate(&mut self, angle: T, origin: Option<[T; 2]>) {
        let [ox, oy] = origin
            .or_else(|| self.centroid())
            .unwrap_or_else(|| self.bounds.center());
        let (sin, cos) = angle.sin_cos();
        for p in &mut self.points {
            let [dx, dy] = geom::sub(*p, [ox, oy]);
            *p = [ox + dx * cos - dy * sin, oy + dx * sin + dy * cos];
        }
        self.bounds = Bounds::enclosing(self.points[0], &self.points[1..]);
    }

    /// Moves every edge `distance` along its outward normal; negative values shrink the
    /// polygon. Each new point is where the moved edges around it meet, or the moved
    /// edge start when both edges are parallel.
    ///
    /// Leaves the polygon untouched and fails with [`TessError::NonFinite`] if a new
    /// point overflows.
    pub fn offset(&mut self, distance: T) -> Result<(), TessError> {
        let n = self.points.len();
        let distance = if self.is_clockwise() { distance } else { -distance };

        // every edge i moved out, from point i to point i + 1
        let edges: Vec<([T; 2], [T; 2])> = self
            .segments()
            .map(|(a, b)| {
                let [dx, dy] = geom::sub(b, a);
                let len = geom::dot([dx, dy], [dx, dy]).sqrt();
                if len == T::zero() {
                    return (a, b);
                }
                let shift = [dy / len * distance, -dx / len * distance];
                (geom::add(a, shift), geom::add(b, shift))
            })
            .collect();

        let points: Vec<[T; 2]> = (0..n)
            .map(|i| {
                let (p1, p2) = edges[(i + n - 1) % n];
                let (q1, q2) = edges[i];
                geom::line_intersection(p1, p2, q1, q2).unwrap_or(q1)
            })
            .collect();
        *self = Self::from_vec(points)?;
        Ok(())
    }

    /// Drops repeated points, then points nearly collinear with their neighbors.
    ///
    /// Collinearity is judged against the neighbors after deduplication, not against
    /// the points kept so far. Leaves the polygon untouched and fails with
    /// [`TessError::InvalidInput`] if fewer than 3 points would remain.
    pub fn optimize(&mut self) -> Result<(), TessError> {
        let eps = T::from(COLLINEAR_EPSILON).unwrap_or_else(T::epsilon);
        let two = T::one() + T::one();

        let mut points = self.points.clone();
        points.dedup();
        while points.len() > 1 && points.first() == points.last() {
            points.pop();
        }

        let n = points.len();
        let kept: Vec<[T; 2]> = (0..n)
            .filter(|&i| {
                let prev = points[(i + n - 1) % n];
                let p = points[i];
                let next = points[(i + 1) % n];
                let area = geom::cross(geom::sub(p, prev), geom::sub(next, p)) / two;
                area.abs() >= eps
            })
            .map(|i| points[i])
            .collect();
        *self = Self::from_vec(kept)?;
        Ok(())
    }
}

/// twice the signed area of a ring, positive for clockwise rings (y axis down)
pub(crate) fn signed_area<T: Float>(data: &[[T; 2]]) -> T {
    let Some(&[mut bx, mut by]) = data.last() else {
        return T::zero();
    };
    let mut sum = T::zero();
    for &[ax, ay] in data {
        sum = sum + (bx - ax) * (ay + by);
        (bx, by) = (ax, ay);
    }
    sum
}
