//! Geometric predicates over ring nodes.
//!
//! Signs follow the engine winding: [`area`] is negative for a convex turn, zero for
//! collinear points and positive for a reflex turn.

use num_traits::float::Float;

use crate::list::{Node, NodeIndex};

/// signed area of a triangle
pub(crate) fn area<T: Float>(p: &Node<T>, q: &Node<T>, r: &Node<T>) -> T {
    (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y)
}

/// check if two points are equal
pub(crate) fn equals<T: Float>(p1: &Node<T>, p2: &Node<T>) -> bool {
    p1.x == p2.x && p1.y == p2.y
}

/// check if a point lies within a convex triangle, boundary included
pub(crate) fn point_in_triangle<T: Float>(
    a: &Node<T>,
    b: &Node<T>,
    c: &Node<T>,
    p: &Node<T>,
) -> bool {
    (c.x - p.x) * (a.y - p.y) >= (a.x - p.x) * (c.y - p.y)
        && (a.x - p.x) * (b.y - p.y) >= (b.x - p.x) * (a.y - p.y)
        && (b.x - p.x) * (c.y - p.y) >= (c.x - p.x) * (b.y - p.y)
}

/// check if two segments cross; two segments over the same pair of points always do,
/// as do two degenerate ones
pub(crate) fn intersects<T: Float>(p1: &Node<T>, q1: &Node<T>, p2: &Node<T>, q2: &Node<T>) -> bool {
    if (equals(p1, q1) && equals(p2, q2))
        || (equals(p1, p2) && equals(q1, q2))
        || (equals(p1, q2) && equals(p2, q1))
    {
        return true;
    }
    let zero = T::zero();
    (area(p1, q1, p2) > zero) != (area(p1, q1, q2) > zero)
        && (area(p2, q2, p1) > zero) != (area(p2, q2, q1) > zero)
}

/// check if a polygon diagonal is locally inside the polygon
pub(crate) fn locally_inside<T: Float>(nodes: &[Node<T>], a_i: NodeIndex, b_i: NodeIndex) -> bool {
    let a = node!(nodes, a_i);
    let b = node!(nodes, b_i);
    let a_prev = node!(nodes, a.prev_i);
    let a_next = node!(nodes, a.next_i);
    if area(a_prev, a, a_next) < T::zero() {
        area(a, b, a_next) >= T::zero() && area(a, a_prev, b) >= T::zero()
    } else {
        area(a, b, a_prev) < T::zero() || area(a, a_next, b) < T::zero()
    }
}

/// check if the middle point of a polygon diagonal is inside the polygon
pub(crate) fn middle_inside<T: Float>(nodes: &[Node<T>], a_i: NodeIndex, b_i: NodeIndex) -> bool {
    let a = node!(nodes, a_i);
    let b = node!(nodes, b_i);
    let two = T::one() + T::one();
    let (px, py) = ((a.x + b.x) / two, (a.y + b.y) / two);

    let mut inside = false;
    let mut p_i = a_i;
    loop {
        let p = node!(nodes, p_i);
        let p_next = node!(nodes, p.next_i);
        inside ^= (p.y > py) != (p_next.y > py)
            && p_next.y != p.y
            && (px < (p_next.x - p.x) * (py - p.y) / (p_next.y - p.y) + p.x);
        p_i = p.next_i;
        if p_i == a_i {
            return inside;
        }
    }
}

/// check if a polygon diagonal intersects any polygon segments
pub(crate) fn intersects_polygon<T: Float>(
    nodes: &[Node<T>],
    a_i: NodeIndex,
    b_i: NodeIndex,
) -> bool {
    let a = node!(nodes, a_i);
    let b = node!(nodes, b_i);
    let mut p_i = a_i;
    loop {
        let p = node!(nodes, p_i);
        let p_next = node!(nodes, p.next_i);
        if (p.i != a.i && p.i != b.i && p_next.i != a.i && p_next.i != b.i)
            && intersects(p, p_next, a, b)
        {
            return true;
        }
        p_i = p.next_i;
        if p_i == a_i {
            return false;
        }
    }
}

/// check if a diagonal between two polygon nodes is valid (lies in polygon interior)
pub(crate) fn is_valid_diagonal<T: Float>(
    nodes: &[Node<T>],
    a_i: NodeIndex,
    b_i: NodeIndex,
) -> bool {
    let a = node!(nodes, a_i);
    let b = node!(nodes, b_i);
    node!(nodes, a.next_i).i != b.i
        && node!(nodes, a.prev_i).i != b.i
        && !intersects_polygon(nodes, a_i, b_i)
        && locally_inside(nodes, a_i, b_i)
        && locally_inside(nodes, b_i, a_i)
        && middle_inside(nodes, a_i, b_i)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::list::{linked_list, reset};
    use alloc::vec::Vec;

    fn n(x: f64, y: f64) -> Node<f64> {
        Node::new(0, x, y)
    }

    #[test]
    fn test_area_sign() {
        // convex turn in engine winding
        assert!(area(&n(0., 0.), &n(4., 0.), &n(4., 4.)) < 0.);
        // reflex turn
        assert!(area(&n(4., 4.), &n(4., 0.), &n(0., 0.)) > 0.);
        assert_eq!(area(&n(0., 0.), &n(1., 1.), &n(3., 3.)), 0.);
        assert_eq!(area(&n(0., 0.), &n(4., 0.), &n(4., 4.)), -16.);
    }

    #[test]
    fn test_point_in_triangle_inclusive() {
        let (a, b, c) = (n(0., 0.), n(4., 0.), n(0., 4.));
        assert!(point_in_triangle(&a, &b, &c, &n(1., 1.)));
        assert!(point_in_triangle(&a, &b, &c, &n(2., 0.)));
        assert!(point_in_triangle(&a, &b, &c, &n(4., 0.)));
        assert!(!point_in_triangle(&a, &b, &c, &n(3., 3.)));
        assert!(!point_in_triangle(&a, &b, &c, &n(-1., 1.)));
    }

    #[test]
    fn test_intersects() {
        assert!(intersects(&n(0., 0.), &n(4., 4.), &n(0., 4.), &n(4., 0.)));
        assert!(!intersects(&n(0., 0.), &n(1., 1.), &n(3., 0.), &n(4., 1.)));
        // parallel
        assert!(!intersects(&n(0., 0.), &n(4., 0.), &n(0., 1.), &n(4., 1.)));
        // same endpoints in either order
        assert!(intersects(&n(1., 2.), &n(3., 4.), &n(1., 2.), &n(3., 4.)));
        assert!(intersects(&n(1., 2.), &n(3., 4.), &n(3., 4.), &n(1., 2.)));
        // two degenerate segments
        assert!(intersects(&n(1., 1.), &n(1., 1.), &n(5., 5.), &n(5., 5.)));
        // sharing one endpoint is not enough
        assert!(!intersects(&n(1., 2.), &n(3., 4.), &n(1., 2.), &n(3., 0.)));
    }

    /// L-shaped hexagon with its reflex vertex at (2, 2)
    fn l_shape(nodes: &mut Vec<Node<f64>>) -> [NodeIndex; 6] {
        let points = [[0., 0.], [4., 0.], [4., 2.], [2., 2.], [2., 4.], [0., 4.]];
        reset(nodes, points.len());
        let last = linked_list(nodes, &points, true).unwrap();
        let mut handles = [last; 6];
        let mut p_i = node!(nodes, last).next_i;
        for h in handles.iter_mut() {
            *h = p_i;
            p_i = node!(nodes, p_i).next_i;
        }
        handles
    }

    #[test]
    fn test_locally_inside() {
        let mut nodes = Vec::new();
        let h = l_shape(&mut nodes);
        // from the reflex vertex the diagonal to (0, 0) enters the interior
        assert!(locally_inside(&nodes, h[3], h[0]));
        // from the convex corner (0, 0) both (2, 2) and (4, 2) are inside
        assert!(locally_inside(&nodes, h[0], h[3]));
        assert!(locally_inside(&nodes, h[0], h[2]));
        assert!(!locally_inside(&nodes, h[2], h[5]));
    }

    #[test]
    fn test_middle_inside_and_valid_diagonal() {
        let mut nodes = Vec::new();
        let h = l_shape(&mut nodes);
        assert!(middle_inside(&nodes, h[0], h[3]));
        // midpoint (3, 3) lies in the notch
        assert!(!middle_inside(&nodes, h[2], h[4]));

        assert!(is_valid_diagonal(&nodes, h[0], h[3]));
        assert!(!is_valid_diagonal(&nodes, h[2], h[4]));
        // adjacent vertices never form a diagonal
        assert!(!is_valid_diagonal(&nodes, h[0], h[1]));
    }

    #[test]
    fn test_intersects_polygon() {
        let mut nodes = Vec::new();
        let h = l_shape(&mut nodes);
        // (4, 0) -> (0, 4) passes the reflex corner's edges
        assert!(intersects_polygon(&nodes, h[1], h[5]));
        assert!(!intersects_polygon(&nodes, h[0], h[3]));
    }
}
