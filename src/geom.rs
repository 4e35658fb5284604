//! Small 2D primitives used by the polygon container.

use num_traits::float::Float;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<T: Float> {
    pub min: [T; 2],
    pub max: [T; 2],
}

impl<T: Float> Bounds<T> {
    /// Smallest box holding `first` and every point of `rest`.
    pub fn enclosing(first: [T; 2], rest: &[[T; 2]]) -> Self {
        rest.iter().fold(
            Self {
                min: first,
                max: first,
            },
            |b, &[x, y]| Self {
                min: [b.min[0].min(x), b.min[1].min(y)],
                max: [b.max[0].max(x), b.max[1].max(y)],
            },
        )
    }

    pub fn width(&self) -> T {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> T {
        self.max[1] - self.min[1]
    }

    /// The larger of width and height.
    pub fn longest_side(&self) -> T {
        self.width().max(self.height())
    }

    pub fn center(&self) -> [T; 2] {
        let two = T::one() + T::one();
        [
            (self.min[0] + self.max[0]) / two,
            (self.min[1] + self.max[1]) / two,
        ]
    }

    pub fn contains(&self, [x, y]: [T; 2]) -> bool {
        x >= self.min[0] && x <= self.max[0] && y >= self.min[1] && y <= self.max[1]
    }
}

#[inline]
pub(crate) fn add<T: Float>([ax, ay]: [T; 2], [bx, by]: [T; 2]) -> [T; 2] {
    [ax + bx, ay + by]
}

#[inline]
pub(crate) fn sub<T: Float>([ax, ay]: [T; 2], [bx, by]: [T; 2]) -> [T; 2] {
    [ax - bx, ay - by]
}

#[inline]
pub(crate) fn cross<T: Float>([ax, ay]: [T; 2], [bx, by]: [T; 2]) -> T {
    ax * by - ay * bx
}

#[inline]
pub(crate) fn dot<T: Float>([ax, ay]: [T; 2], [bx, by]: [T; 2]) -> T {
    ax * bx + ay * by
}

#[inline]
pub(crate) fn distance_sq<T: Float>(a: [T; 2], b: [T; 2]) -> T {
    let d = sub(a, b);
    dot(d, d)
}

/// Intersection point of segments p1-p2 and q1-q2, endpoints included.
/// Parallel and collinear segments give `None`.
pub(crate) fn segment_intersection<T: Float>(
    p1: [T; 2],
    p2: [T; 2],
    q1: [T; 2],
    q2: [T; 2],
) -> Option<[T; 2]> {
    let r = sub(p2, p1);
    let s = sub(q2, q1);
    let denom = cross(r, s);
    if denom == T::zero() {
        return None;
    }
    let qp = sub(q1, p1);
    let t = cross(qp, s) / denom;
    let u = cross(qp, r) / denom;
    let (zero, one) = (T::zero(), T::one());
    if t < zero || t > one || u < zero || u > one {
        return None;
    }
    Some([p1[0] + r[0] * t, p1[1] + r[1] * t])
}

/// Intersection point of the infinite lines through p1-p2 and q1-q2.
/// Parallel lines give `None`.
pub(crate) fn line_intersection<T: Float>(
    p1: [T; 2],
    p2: [T; 2],
    q1: [T; 2],
    q2: [T; 2],
) -> Option<[T; 2]> {
    let r = sub(p2, p1);
    let s = sub(q2, q1);
    let denom = cross(r, s);
    if denom == T::zero() {
        return None;
    }
    let t = cross(sub(q1, p1), s) / denom;
    Some([p1[0] + r[0] * t, p1[1] + r[1] * t])
}

/// Point of segment a-b closest to `p`.
pub(crate) fn closest_point_on_segment<T: Float>(a: [T; 2], b: [T; 2], p: [T; 2]) -> [T; 2] {
    let ab = sub(b, a);
    let len_sq = dot(ab, ab);
    if len_sq == T::zero() {
        return a;
    }
    let t = (dot(sub(p, a), ab) / len_sq).max(T::zero()).min(T::one());
    [a[0] + ab[0] * t, a[1] + ab[1] * t]
}
