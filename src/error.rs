/// Errors reported by [`Polygon`](crate::Polygon) construction and by the
/// [`Tessellator`](crate::Tessellator).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TessError {
    /// A polygon needs at least 3 points; holds the number given.
    #[error("a polygon needs at least 3 points, got {0}")]
    InvalidInput(usize),

    /// The point at this index has a NaN or infinite coordinate.
    #[error("point {0} has a non-finite coordinate")]
    NonFinite(usize),

    /// The polygon has more points than the output index type can address; holds the
    /// number of points.
    #[error("{0} points can not be addressed by the output index type")]
    IndexOverflow(usize),

    /// Part of the polygon could not be split by any valid diagonal.
    ///
    /// The output buffer still holds every triangle emitted before giving up.
    #[error("triangulation incomplete: {remaining} vertices left without a valid diagonal")]
    TriangulationIncomplete { remaining: usize },
}
