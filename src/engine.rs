//! Ear slicing with escalating recovery passes.

use alloc::vec::Vec;
use num_traits::float::Float;

use crate::list::{
    filter_points, remove_node, ring_len, ring_signed_area, split_polygon, Node, NodeIndex,
};
use crate::predicates::{
    area, equals, intersects, is_valid_diagonal, locally_inside, point_in_triangle,
};
use crate::zorder::{index_curve, ZHash};
use crate::Index;

/// Recovery pass a ring is sliced in. A ring stalled in [`Pass::P2`] is split in two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pass {
    P0 = 0,
    P1 = 1,
    P2 = 2,
}

/// main ear slicing loop which triangulates a polygon (given as a linked list)
///
/// Pending rings are kept on `queue` rather than the call stack. Returns the number of
/// vertices left in rings that could not be split.
pub(crate) fn earcut_linked<T: Float, N: Index>(
    nodes: &mut Vec<Node<T>>,
    start_i: NodeIndex,
    triangles: &mut Vec<N>,
    hash: Option<&ZHash<T>>,
    queue: &mut Vec<(NodeIndex, Pass)>,
) -> usize {
    let mut unresolved = 0;
    queue.clear();
    queue.push((start_i, Pass::P0));

    while let Some((ear_i, pass)) = queue.pop() {
        let Some(ear_i) = slice_ears(nodes, ear_i, triangles, hash, pass) else {
            continue;
        };

        // we looped through the whole remaining polygon and can't find any more ears
        match pass {
            Pass::P0 => {
                // try filtering points and slicing again
                if let Some(ear_i) = filter_points(nodes, ear_i, None) {
                    log::trace!("no ear found, retrying after filtering points");
                    queue.push((ear_i, Pass::P1));
                }
            }
            Pass::P1 => {
                // if this didn't work, try curing all small self-intersections locally
                let Some(filtered_i) = filter_points(nodes, ear_i, None) else {
                    continue;
                };
                if let Some(ear_i) = cure_local_intersections(nodes, filtered_i, triangles) {
                    log::trace!("no ear found, retrying after curing local intersections");
                    queue.push((ear_i, Pass::P2));
                }
            }
            Pass::P2 => {
                // as a last resort, try splitting the remaining polygon into two
                if let Some((a_i, c_i)) = split_earcut(nodes, ear_i) {
                    log::trace!("splitting the remaining polygon");
                    // filter colinear points around the cuts
                    let end_i = Some(node!(nodes, a_i).next_i);
                    let a_i = filter_points(nodes, a_i, end_i);
                    let end_i = Some(node!(nodes, c_i).next_i);
                    let c_i = filter_points(nodes, c_i, end_i);

                    // the first half is taken off the queue first
                    if let Some(c_i) = c_i {
                        queue.push((c_i, Pass::P0));
                    }
                    if let Some(a_i) = a_i {
                        queue.push((a_i, Pass::P0));
                    }
                } else if ring_signed_area(nodes, ear_i) > T::zero() {
                    let len = ring_len(nodes, ear_i);
                    log::trace!("no valid diagonal in a ring of {} vertices", len);
                    unresolved += len;
                } else {
                    // inverted or flat lobe of a self-intersecting polygon
                    log::trace!("dropping an inverted ring");
                }
            }
        }
    }
    unresolved
}

/// Slices ears off the ring until fewer than 3 nodes are left (returns `None`) or a full
/// lap finds no ear (returns the node the lap stopped at).
fn slice_ears<T: Float, N: Index>(
    nodes: &mut [Node<T>],
    ear_i: NodeIndex,
    triangles: &mut Vec<N>,
    hash: Option<&ZHash<T>>,
    pass: Pass,
) -> Option<NodeIndex> {
    let mut ear_i = ear_i;

    // interlink polygon nodes in z-order
    if pass == Pass::P0 {
        if let Some(hash) = hash {
            index_curve(nodes, ear_i, hash);
        }
    }

    let mut stop_i = ear_i;

    // iterate through ears, slicing them one by one
    loop {
        let ear = node!(nodes, ear_i);
        if ear.prev_i == ear.next_i {
            return None;
        }
        let pi = ear.prev_i;
        let ni = ear.next_i;

        let is_ear = match hash {
            Some(hash) => is_ear_hashed(nodes, ear_i, hash),
            None => is_ear(nodes, ear_i),
        };
        if is_ear {
            let next = node!(nodes, ni);
            let next_next_i = next.next_i;

            // cut off the triangle
            triangles.push(N::from_usize(node!(nodes, pi).i as usize));
            triangles.push(N::from_usize(ear.i as usize));
            triangles.push(N::from_usize(next.i as usize));

            remove_node(nodes, ear_i);

            // skipping the next vertex leads to less sliver triangles
            (ear_i, stop_i) = (next_next_i, next_next_i);

            continue;
        }

        ear_i = ni;

        if ear_i == stop_i {
            return Some(ear_i);
        }
    }
}

/// check whether a polygon node forms a valid ear with adjacent nodes
pub(crate) fn is_ear<T: Float>(nodes: &[Node<T>], ear_i: NodeIndex) -> bool {
    let b = node!(nodes, ear_i);
    let a = node!(nodes, b.prev_i);
    let c = node!(nodes, b.next_i);

    if area(a, b, c) >= T::zero() {
        // reflex, can't be an ear
        return false;
    }

    // now make sure we don't have other points inside the potential ear

    // triangle bbox
    let x0 = a.x.min(b.x.min(c.x));
    let y0 = a.y.min(b.y.min(c.y));
    let x1 = a.x.max(b.x.max(c.x));
    let y1 = a.y.max(b.y.max(c.y));

    let mut p_i = c.next_i;
    while p_i != b.prev_i {
        let p = node!(nodes, p_i);
        if (p.x >= x0 && p.x <= x1 && p.y >= y0 && p.y <= y1)
            && point_in_triangle(a, b, c, p)
            && area(node!(nodes, p.prev_i), p, node!(nodes, p.next_i)) >= T::zero()
        {
            return false;
        }
        p_i = p.next_i;
    }
    true
}

/// [`is_ear`] answered from the z-order index: only nodes whose keys fall between the
/// keys of the triangle's bbox corners are examined.
pub(crate) fn is_ear_hashed<T: Float>(
    nodes: &[Node<T>],
    ear_i: NodeIndex,
    hash: &ZHash<T>,
) -> bool {
    let b = node!(nodes, ear_i);
    let (a_i, c_i) = (b.prev_i, b.next_i);
    let a = node!(nodes, a_i);
    let c = node!(nodes, c_i);

    if area(a, b, c) >= T::zero() {
        // reflex, can't be an ear
        return false;
    }

    // triangle bbox
    let x0 = a.x.min(b.x.min(c.x));
    let y0 = a.y.min(b.y.min(c.y));
    let x1 = a.x.max(b.x.max(c.x));
    let y1 = a.y.max(b.y.max(c.y));

    // z-order range for the current triangle bbox;
    let min_z = hash.z_order(x0, y0);
    let max_z = hash.z_order(x1, y1);

    let blocks = |p_i: NodeIndex| {
        let p = node!(nodes, p_i);
        (p.x >= x0 && p.x <= x1 && p.y >= y0 && p.y <= y1)
            && (p_i != a_i && p_i != c_i)
            && point_in_triangle(a, b, c, p)
            && area(node!(nodes, p.prev_i), p, node!(nodes, p.next_i)) >= T::zero()
    };

    let mut o_p = b.prev_z_i;
    let mut o_n = b.next_z_i;

    // look for points inside the triangle in both directions
    while let (Some(p_i), Some(n_i)) = (o_p, o_n) {
        let p = node!(nodes, p_i);
        let n = node!(nodes, n_i);
        if p.z < min_z || n.z > max_z {
            break;
        }
        if blocks(p_i) || blocks(n_i) {
            return false;
        }
        o_p = p.prev_z_i;
        o_n = n.next_z_i;
    }

    // look for remaining points in decreasing z-order
    while let Some(p_i) = o_p {
        let p = node!(nodes, p_i);
        if p.z < min_z {
            break;
        }
        if blocks(p_i) {
            return false;
        }
        o_p = p.prev_z_i;
    }

    // look for remaining points in increasing z-order
    while let Some(n_i) = o_n {
        let n = node!(nodes, n_i);
        if n.z > max_z {
            break;
        }
        if blocks(n_i) {
            return false;
        }
        o_n = n.next_z_i;
    }

    true
}

/// go through all polygon nodes and cure small local self-intersections
///
/// A node whose incoming edge crosses the edge after its successor is clipped together
/// with that successor. Returns the filtered ring, or `None` if it collapsed.
fn cure_local_intersections<T: Float, N: Index>(
    nodes: &mut [Node<T>],
    mut start_i: NodeIndex,
    triangles: &mut Vec<N>,
) -> Option<NodeIndex> {
    let mut p_i = start_i;
    loop {
        let p = node!(nodes, p_i);
        let a_i = p.prev_i;
        let p_next_i = p.next_i;
        let b_i = node!(nodes, p_next_i).next_i;
        let a = node!(nodes, a_i);
        let b = node!(nodes, b_i);

        if !equals(a, b)
            && intersects(a, p, node!(nodes, p_next_i), b)
            && locally_inside(nodes, a_i, b_i)
            && locally_inside(nodes, b_i, a_i)
        {
            triangles.extend([a.i, p.i, b.i].map(|i| N::from_usize(i as usize)));

            // remove two nodes involved
            remove_node(nodes, p_i);
            remove_node(nodes, p_next_i);

            (p_i, start_i) = (b_i, b_i);
        }

        p_i = node!(nodes, p_i).next_i;
        if p_i == start_i {
            return filter_points(nodes, p_i, None);
        }
    }
}

/// Looks for a valid diagonal and splits the polygon along the first one found.
/// Returns the heads of both halves.
fn split_earcut<T: Float>(
    nodes: &mut Vec<Node<T>>,
    start_i: NodeIndex,
) -> Option<(NodeIndex, NodeIndex)> {
    let mut a_i = start_i;
    loop {
        let a = node!(nodes, a_i);
        let (a_prev_i, a_next_i, a_src) = (a.prev_i, a.next_i, a.i);
        let mut b_i = node!(nodes, a_next_i).next_i;

        while b_i != a_prev_i {
            let b = node!(nodes, b_i);
            if a_src != b.i && is_valid_diagonal(nodes, a_i, b_i) {
                // split the polygon in two by the diagonal
                let c_i = split_polygon(nodes, a_i, b_i);
                return Some((a_i, c_i));
            }
            b_i = b.next_i;
        }

        a_i = a_next_i;
        if a_i == start_i {
            return None;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geom::Bounds;
    use crate::list::{linked_list, reset};
    use alloc::vec;

    fn ring(nodes: &mut Vec<Node<f64>>, points: &[[f64; 2]]) -> NodeIndex {
        reset(nodes, points.len());
        linked_list(nodes, points, true).unwrap()
    }

    fn by_src(nodes: &[Node<f64>], start_i: NodeIndex, src: u32) -> NodeIndex {
        let mut p_i = start_i;
        while node!(nodes, p_i).i != src {
            p_i = node!(nodes, p_i).next_i;
        }
        p_i
    }

    #[test]
    fn test_is_ear_square() {
        let mut nodes = Vec::new();
        let start = ring(&mut nodes, &[[0., 0.], [4., 0.], [4., 4.], [0., 4.]]);
        let mut p_i = start;
        for _ in 0..4 {
            assert!(is_ear(&nodes, p_i));
            p_i = node!(nodes, p_i).next_i;
        }
    }

    #[test]
    fn test_is_ear_reflex_and_blocked() {
        let mut nodes = Vec::new();
        // arrow head: (2, 1) is reflex and lies inside the triangle of the tip
        let points = [[0., 0.], [2., 1.], [4., 0.], [2., 4.]];
        let start = ring(&mut nodes, &points);
        assert!(!is_ear(&nodes, by_src(&nodes, start, 1)));
        assert!(!is_ear(&nodes, by_src(&nodes, start, 3)));
        assert!(is_ear(&nodes, by_src(&nodes, start, 0)));
        assert!(is_ear(&nodes, by_src(&nodes, start, 2)));
    }

    #[test]
    fn test_hashed_matches_plain() {
        let mut nodes = Vec::new();
        // a comb with deep notches
        let mut points = vec![[0.0, 0.0], [40.0, 0.5]];
        for k in (0..10).rev() {
            let x = 4.0 * k as f64;
            points.push([x + 3.0, 20.0 + (k % 3) as f64]);
            points.push([x + 2.0, 6.0 + (k % 2) as f64]);
            points.push([x + 1.0, 6.5]);
        }
        let start = ring(&mut nodes, &points);
        let hash = ZHash::new(&Bounds::enclosing(points[0], &points[1..])).unwrap();
        index_curve(&mut nodes, start, &hash);

        let mut p_i = start;
        loop {
            assert_eq!(is_ear(&nodes, p_i), is_ear_hashed(&nodes, p_i, &hash));
            p_i = node!(nodes, p_i).next_i;
            if p_i == start {
                break;
            }
        }
    }

    #[test]
    fn test_cure_local_intersection() {
        let mut nodes = Vec::new();
        let points = [[0., 3.], [5., 5.], [7., 0.], [1., 3.], [3., 1.], [2., 3.]];
        reset(&mut nodes, points.len());
        let start = linked_list(&mut nodes, &points, false).unwrap();
        let mut triangles: Vec<u32> = vec![];
        let rest = cure_local_intersections(&mut nodes, start, &mut triangles).unwrap();
        assert_eq!(triangles, vec![0, 5, 3]);
        assert_eq!(ring_len(&nodes, rest), 4);
    }

    #[test]
    fn test_split_earcut() {
        let mut nodes = Vec::new();
        let points = [[0., 0.], [4., 0.], [4., 2.], [2., 2.], [2., 4.], [0., 4.]];
        let start = ring(&mut nodes, &points);
        let (a_i, c_i) = split_earcut(&mut nodes, start).unwrap();
        assert_eq!(ring_len(&nodes, a_i) + ring_len(&nodes, c_i), 8);
        assert!(ring_signed_area(&nodes, a_i) > 0.0);
        assert!(ring_signed_area(&nodes, c_i) > 0.0);
    }

    #[test]
    fn test_earcut_linked_reports_unsplittable_ring() {
        let mut nodes = Vec::new();
        let points = [
            [1., 10.],
            [3., 16.],
            [1., 1.],
            [8., 8.],
            [19., 15.],
            [9., 7.],
            [4., 10.],
            [19., 11.],
            [2., 18.],
            [10., 3.],
        ];
        let start = ring(&mut nodes, &points);
        let mut triangles: Vec<u32> = vec![];
        let mut queue = vec![];
        let unresolved = earcut_linked(&mut nodes, start, &mut triangles, None, &mut queue);
        assert_eq!(unresolved, 10);
        assert!(triangles.is_empty());
        assert!(queue.is_empty());
    }
}
