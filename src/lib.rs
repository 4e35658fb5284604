//! Ear-clipping triangulation of simple polygons, tolerant of self-intersections and
//! degenerate input.
//!
//! ```
//! use polytess::{Polygon, Tessellator};
//!
//! let polygon = Polygon::new([[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]]).unwrap();
//! let mut tessellator = Tessellator::new();
//! let mut triangles: Vec<u32> = vec![];
//! tessellator.tessellate(&polygon, &mut triangles).unwrap();
//! assert_eq!(triangles.len(), 6);
//! ```

#![no_std]

extern crate alloc;

macro_rules! node {
    ($self:ident.$nodes:ident, $index:expr) => {
        &$self.$nodes[$index.get() as usize]
    };
    ($nodes:ident, $index:expr) => {
        &$nodes[$index.get() as usize]
    };
}

macro_rules! node_mut {
    ($self:ident.$nodes:ident, $index:expr) => {
        &mut $self.$nodes[$index.get() as usize]
    };
    ($nodes:ident, $index:expr) => {
        &mut $nodes[$index.get() as usize]
    };
}

mod engine;
mod error;
mod geom;
mod list;
mod polygon;
mod predicates;
mod zorder;

pub use error::TessError;
pub use geom::Bounds;
pub use polygon::{Polygon, Winding, COLLINEAR_EPSILON};

use alloc::vec::Vec;
use num_traits::float::Float;

use crate::engine::Pass;
use crate::list::{Node, NodeIndex};
use crate::zorder::ZHash;

/// Index of a vertex
pub trait Index: Copy {
    fn into_usize(self) -> usize;
    fn from_usize(v: usize) -> Self;
    /// `None` when `v` does not fit the index type.
    fn try_from_usize(v: usize) -> Option<Self>;
}
impl Index for u32 {
    fn into_usize(self) -> usize {
        self as usize
    }
    fn from_usize(v: usize) -> Self {
        v as Self
    }
    fn try_from_usize(v: usize) -> Option<Self> {
        Self::try_from(v).ok()
    }
}
impl Index for u16 {
    fn into_usize(self) -> usize {
        self as usize
    }
    fn from_usize(v: usize) -> Self {
        v as Self
    }
    fn try_from_usize(v: usize) -> Option<Self> {
        Self::try_from(v).ok()
    }
}
impl Index for usize {
    fn into_usize(self) -> usize {
        self
    }
    fn from_usize(v: usize) -> Self {
        v as Self
    }
    fn try_from_usize(v: usize) -> Option<Self> {
        Some(v)
    }
}

/// Polygons with at least this many points are sliced with the z-order index.
pub const HASH_THRESHOLD: usize = 70;

/// Tessellator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Point count from which ear tests go through the z-order index.
    /// `usize::MAX` disables the index.
    pub hash_threshold: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            hash_threshold: HASH_THRESHOLD,
        }
    }
}

/// Reusable ear-clipping triangulator.
pub struct Tessellator<T: Float> {
    nodes: Vec<Node<T>>,
    queue: Vec<(NodeIndex, Pass)>,
    options: Options,
}

impl<T: Float> Default for Tessellator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> Tessellator<T> {
    /// Creates a tessellator with default [`Options`].
    ///
    /// You can reuse a single instance for multiple polygons to reduce memory allocations.
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Self {
        Self {
            nodes: Vec::new(),
            queue: Vec::new(),
            options,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Triangulates a polygon into `triangles_out`, which is cleared first.
    ///
    /// Every three entries are indices into [`Polygon::points`] forming one triangle, in
    /// the clockwise winding. A polygon without area may give no triangles at all.
    ///
    /// Fails with [`TessError::IndexOverflow`] if the points can not all be addressed by
    /// `N`, and with [`TessError::TriangulationIncomplete`] if part of the polygon could
    /// not be triangulated; the triangles found are still in `triangles_out`.
    pub fn tessellate<N: Index>(
        &mut self,
        polygon: &Polygon<T>,
        triangles_out: &mut Vec<N>,
    ) -> Result<(), TessError> {
        triangles_out.clear();
        let points = polygon.points();
        let clockwise = polygon.is_clockwise();

        // node handles are u32 as well
        let last = points.len() - 1;
        if N::try_from_usize(last).is_none() || u32::try_from_usize(points.len()).is_none() {
            return Err(TessError::IndexOverflow(points.len()));
        }

        if points.len() == 3 {
            let triangle = if clockwise { [0, 1, 2] } else { [2, 1, 0] };
            triangles_out.extend(triangle.map(N::from_usize));
            log::debug!("tessellated a single triangle");
            return Ok(());
        }

        triangles_out.reserve(points.len() * 3);
        list::reset(&mut self.nodes, points.len() / 2 * 3);

        // create nodes
        let Some(start_i) = list::linked_list(&mut self.nodes, points, clockwise) else {
            return Ok(());
        };
        let start = node!(self.nodes, start_i);
        if start.next_i == start.prev_i {
            return Ok(());
        }

        // if the shape is not too simple, we'll use z-order curve hash later
        let hash = match points.len() >= self.options.hash_threshold {
            true => ZHash::new(&polygon.bounds()),
            false => None,
        };

        let unresolved = engine::earcut_linked(
            &mut self.nodes,
            start_i,
            triangles_out,
            hash.as_ref(),
            &mut self.queue,
        );
        log::debug!(
            "tessellated {} points into {} triangles (z-order index: {})",
            points.len(),
            triangles_out.len() / 3,
            hash.is_some()
        );

        if unresolved > 0 {
            log::warn!(
                "incomplete triangulation: {} of {} vertices left over",
                unresolved,
                points.len()
            );
            return Err(TessError::TriangulationIncomplete {
                remaining: unresolved,
            });
        }
        Ok(())
    }

    /// Builds a [`Polygon`] from `points` and triangulates it.
    pub fn tessellate_points<N: Index>(
        &mut self,
        points: impl IntoIterator<Item = [T; 2]>,
        triangles_out: &mut Vec<N>,
    ) -> Result<(), TessError> {
        triangles_out.clear();
        let polygon = Polygon::new(points)?;
        self.tessellate(&polygon, triangles_out)
    }
}

/// Resolves triangle indices to their points. Triples with an out-of-range index are
/// skipped.
pub fn triangle_points<T: Float, N: Index>(points: &[[T; 2]], triangles: &[N]) -> Vec<[[T; 2]; 3]> {
    triangles
        .chunks_exact(3)
        .filter_map(|t| {
            Some([
                *points.get(t[0].into_usize())?,
                *points.get(t[1].into_usize())?,
                *points.get(t[2].into_usize())?,
            ])
        })
        .collect()
}

/// Returns a relative difference between the polygon area and its triangulation area;
/// used to verify correctness of triangulation
pub fn deviation<T: Float, N: Index>(data: &[[T; 2]], triangles: &[N]) -> T {
    let polygon_area = polygon::signed_area(data).abs();

    let mut triangles_area = T::zero();
    for [a, b, c] in triangle_points(data, triangles) {
        triangles_area = triangles_area
            + ((a[0] - c[0]) * (b[1] - a[1]) - (a[0] - b[0]) * (c[1] - a[1])).abs();
    }
    if polygon_area == T::zero() && triangles_area == T::zero() {
        T::zero()
    } else {
        ((polygon_area - triangles_area) / polygon_area).abs()
    }
}
