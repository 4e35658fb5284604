//! Z-order (Morton) spatial index over the nodes of a ring.

use num_traits::float::Float;

use crate::geom::Bounds;
use crate::list::{Node, NodeIndex};

/// Transform from polygon coordinates to the 15-bit integer grid of the z-order curve.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ZHash<T: Float> {
    min_x: T,
    min_y: T,
    /// 32767 over the longer side of the bounding box
    inv_size: T,
}

impl<T: Float> ZHash<T> {
    /// `None` for a bounding box without extent.
    pub(crate) fn new(bounds: &Bounds<T>) -> Option<Self> {
        let size = bounds.longest_side();
        if size <= T::zero() || !size.is_finite() {
            return None;
        }
        Some(Self {
            min_x: bounds.min[0],
            min_y: bounds.min[1],
            inv_size: T::from(32767.0)? / size,
        })
    }

    /// z-order of a point given coords and inverse of the longer side of data bbox
    pub(crate) fn z_order(&self, x: T, y: T) -> u32 {
        // coords are transformed into non-negative 15-bit integer range
        let x = ((x - self.min_x) * self.inv_size).to_u32().unwrap_or(0);
        let y = ((y - self.min_y) * self.inv_size).to_u32().unwrap_or(0);
        let mut xy = (x as u64) << 32 | y as u64;
        xy = (xy | (xy << 8)) & 0x00FF00FF00FF00FF;
        xy = (xy | (xy << 4)) & 0x0F0F0F0F0F0F0F0F;
        xy = (xy | (xy << 2)) & 0x3333333333333333;
        xy = (xy | (xy << 1)) & 0x5555555555555555;
        (xy >> 32 | xy << 1) as u32
    }
}

/// interlink polygon nodes in z-order
pub(crate) fn index_curve<T: Float>(nodes: &mut [Node<T>], start_i: NodeIndex, hash: &ZHash<T>) {
    let mut p_i = start_i;
    loop {
        let p = node_mut!(nodes, p_i);
        p.z = hash.z_order(p.x, p.y);
        p.prev_z_i = Some(p.prev_i);
        p.next_z_i = Some(p.next_i);
        p_i = p.next_i;
        if p_i == start_i {
            break;
        }
    }

    if let Some(tail_i) = node_mut!(nodes, start_i).prev_z_i.take() {
        node_mut!(nodes, tail_i).next_z_i = None;
    }
    sort_linked(nodes, start_i);
}

/// Simon Tatham's linked list merge sort algorithm
/// http://www.chiark.greenend.org.uk/~sgtatham/algorithms/listsort.html
///
/// Sorts the z-links starting at `list_i` by ascending key and returns the new head.
pub(crate) fn sort_linked<T: Float>(nodes: &mut [Node<T>], list_i: NodeIndex) -> NodeIndex {
    let mut in_size: usize = 1;
    let mut head_i = list_i;

    loop {
        let mut p_i = Some(head_i);
        let mut list_i: Option<NodeIndex> = None;
        let mut tail_i: Option<NodeIndex> = None;
        let mut num_merges = 0;

        while let Some(p_start_i) = p_i {
            num_merges += 1;
            let mut q_i = node!(nodes, p_start_i).next_z_i;
            let mut p_size: usize = 1;
            while p_size < in_size {
                let Some(i) = q_i else { break };
                p_size += 1;
                q_i = node!(nodes, i).next_z_i;
            }
            let mut q_size = in_size;

            loop {
                let (e_i, from_p) = match (p_i, q_i) {
                    (Some(p), Some(q)) if p_size > 0 && q_size > 0 => {
                        if node!(nodes, p).z <= node!(nodes, q).z {
                            (p, true)
                        } else {
                            (q, false)
                        }
                    }
                    (Some(p), _) if p_size > 0 => (p, true),
                    (_, Some(q)) if q_size > 0 => (q, false),
                    _ => break,
                };

                let e = node_mut!(nodes, e_i);
                e.prev_z_i = tail_i;
                if from_p {
                    p_size -= 1;
                    p_i = e.next_z_i;
                } else {
                    q_size -= 1;
                    q_i = e.next_z_i;
                }

                match tail_i {
                    Some(tail_i) => node_mut!(nodes, tail_i).next_z_i = Some(e_i),
                    None => list_i = Some(e_i),
                }
                tail_i = Some(e_i);
            }

            p_i = q_i;
        }

        if let Some(tail_i) = tail_i {
            node_mut!(nodes, tail_i).next_z_i = None;
        }
        if let Some(list_i) = list_i {
            head_i = list_i;
        }
        if num_merges <= 1 {
            return head_i;
        }
        in_size *= 2;
    }
}
