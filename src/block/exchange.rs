//! Copy layers: the one-cell-thick slabs exchanged between neighbors.
//!
//! Every step each block sends the interior strip adjacent to each
//! `Connect` edge to the neighbor on that side, and fills its own ghost
//! strip from the layer the neighbor sent. The message is tagged with the
//! *sender's* edge: a layer tagged `Right` came off the sender's right
//! interior column and lands in the receiver's left ghost column.
//!
//! Bathymetry rides along exactly once, on the first exchange after
//! initialization; afterwards the `b` payload is absent.
//!
//! Packing exploits the column-major layout: left/right strips are
//! contiguous column slices, bottom/top strips are strided gathers.

use super::Block;
use crate::types::{BoundaryEdge, BoundaryType};

/// One copy layer in flight between two neighboring blocks.
///
/// `h`, `hu`, `hv` have length `ny` for left/right layers and `nx` for
/// bottom/top layers. `b` is `Some` only on the first exchange.
#[derive(Clone, Debug)]
pub struct CopyLayer {
    /// The sender's edge this layer was packed from.
    pub edge: BoundaryEdge,
    /// Water heights along the strip.
    pub h: Vec<f32>,
    /// x-momenta along the strip.
    pub hu: Vec<f32>,
    /// y-momenta along the strip.
    pub hv: Vec<f32>,
    /// Bathymetry, present only on the first exchange.
    pub b: Option<Vec<f32>>,
}

impl CopyLayer {
    /// Whether this layer carries bathymetry.
    #[inline]
    pub fn contains_bathymetry(&self) -> bool {
        self.b.is_some()
    }

    /// Number of samples in the strip.
    #[inline]
    pub fn len(&self) -> usize {
        self.h.len()
    }

    /// True when the strip is empty (degenerate zero-cell block).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.h.is_empty()
    }
}

impl Block {
    /// Pack the interior strip adjacent to `edge` into a copy layer.
    pub fn copy_layer(&self, edge: BoundaryEdge, with_bathymetry: bool) -> CopyLayer {
        let nx = self.layout.nx;
        let ny = self.layout.ny;

        match edge {
            // Interior columns are contiguous: slice, don't gather.
            BoundaryEdge::Left | BoundaryEdge::Right => {
                let x = if edge == BoundaryEdge::Left { 1 } else { nx };
                CopyLayer {
                    edge,
                    h: self.h.column(x)[1..=ny].to_vec(),
                    hu: self.hu.column(x)[1..=ny].to_vec(),
                    hv: self.hv.column(x)[1..=ny].to_vec(),
                    b: with_bathymetry.then(|| self.b.column(x)[1..=ny].to_vec()),
                }
            }
            BoundaryEdge::Bottom | BoundaryEdge::Top => {
                let y = if edge == BoundaryEdge::Bottom { 1 } else { ny };
                let gather = |field: &crate::grid::Float2D| {
                    let mut strip = vec![0.0; nx];
                    field.row_gather(y, 1, &mut strip);
                    strip
                };
                CopyLayer {
                    edge,
                    h: gather(&self.h),
                    hu: gather(&self.hu),
                    hv: gather(&self.hv),
                    b: with_bathymetry.then(|| gather(&self.b)),
                }
            }
        }
    }

    /// Unpack a neighbor's copy layer into the matching ghost strip.
    ///
    /// A layer tagged with the sender's `Right` edge fills this block's
    /// left ghost column, and so on. The layer is only consumed if the
    /// receiving edge is `Connect`; anything else is ignored.
    pub fn apply_copy_layer(&mut self, layer: &CopyLayer) {
        let nx = self.layout.nx;
        let ny = self.layout.ny;
        let receiving_edge = layer.edge.opposite();
        if *self.layout.boundaries.get(receiving_edge) != BoundaryType::Connect {
            return;
        }

        match receiving_edge {
            BoundaryEdge::Left | BoundaryEdge::Right => {
                debug_assert_eq!(layer.len(), ny);
                let x = if receiving_edge == BoundaryEdge::Left {
                    0
                } else {
                    nx + 1
                };
                self.h.column_mut(x)[1..=ny].copy_from_slice(&layer.h);
                self.hu.column_mut(x)[1..=ny].copy_from_slice(&layer.hu);
                self.hv.column_mut(x)[1..=ny].copy_from_slice(&layer.hv);
                if let Some(b) = &layer.b {
                    self.b.column_mut(x)[1..=ny].copy_from_slice(b);
                }
            }
            BoundaryEdge::Bottom | BoundaryEdge::Top => {
                debug_assert_eq!(layer.len(), nx);
                let y = if receiving_edge == BoundaryEdge::Bottom {
                    0
                } else {
                    ny + 1
                };
                self.h.row_scatter(y, 1, &layer.h);
                self.hu.row_scatter(y, 1, &layer.hu);
                self.hv.row_scatter(y, 1, &layer.hv);
                if let Some(b) = &layer.b {
                    self.b.row_scatter(y, 1, b);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Block, BlockLayout};
    use super::*;
    use crate::types::EdgeBoundaries;

    fn numbered_block(boundaries: EdgeBoundaries<BoundaryType>) -> Block {
        let mut block = Block::new(BlockLayout {
            nx: 3,
            ny: 4,
            dx: 1.0,
            dy: 1.0,
            origin_x: 0.0,
            origin_y: 0.0,
            pos_x: 0,
            pos_y: 0,
            boundaries,
        });
        for x in 0..5 {
            for y in 0..6 {
                let v = (100 * x + y) as f32;
                block.h.set(x, y, v);
                block.hu.set(x, y, v + 0.1);
                block.hv.set(x, y, v + 0.2);
                block.b.set(x, y, v + 0.3);
            }
        }
        block
    }

    #[test]
    fn test_pack_right_edge_takes_last_interior_column() {
        let block = numbered_block(EdgeBoundaries::uniform(BoundaryType::Connect));
        let layer = block.copy_layer(BoundaryEdge::Right, false);

        assert_eq!(layer.edge, BoundaryEdge::Right);
        assert_eq!(layer.len(), 4);
        // Column x = nx = 3, rows 1..=4.
        assert_eq!(layer.h, vec![301.0, 302.0, 303.0, 304.0]);
        assert!(!layer.contains_bathymetry());
    }

    #[test]
    fn test_pack_top_edge_gathers_row() {
        let block = numbered_block(EdgeBoundaries::uniform(BoundaryType::Connect));
        let layer = block.copy_layer(BoundaryEdge::Top, true);

        assert_eq!(layer.len(), 3);
        // Row y = ny = 4, columns 1..=3.
        assert_eq!(layer.h, vec![104.0, 204.0, 304.0]);
        let b = layer.b.as_ref().unwrap();
        for i in 0..3 {
            assert_eq!(b[i], block.b.get(i + 1, 4));
        }
    }

    #[test]
    fn test_round_trip_fills_opposite_ghost_strip() {
        let sender = numbered_block(EdgeBoundaries::uniform(BoundaryType::Connect));
        let mut receiver = numbered_block(EdgeBoundaries::uniform(BoundaryType::Connect));

        // Sender's right interior column becomes the receiver's left ghost
        // column, bit-exactly.
        let layer = sender.copy_layer(BoundaryEdge::Right, true);
        receiver.apply_copy_layer(&layer);

        for j in 1..=4 {
            assert_eq!(receiver.h.get(0, j), sender.h.get(3, j));
            assert_eq!(receiver.hu.get(0, j), sender.hu.get(3, j));
            assert_eq!(receiver.hv.get(0, j), sender.hv.get(3, j));
            assert_eq!(receiver.b.get(0, j), sender.b.get(3, j));
        }
    }

    #[test]
    fn test_vertical_round_trip() {
        let sender = numbered_block(EdgeBoundaries::uniform(BoundaryType::Connect));
        let mut receiver = numbered_block(EdgeBoundaries::uniform(BoundaryType::Connect));

        // Sender's bottom row lands in the receiver's top ghost row.
        let layer = sender.copy_layer(BoundaryEdge::Bottom, false);
        receiver.apply_copy_layer(&layer);

        for i in 1..=3 {
            assert_eq!(receiver.h.get(i, 5), sender.h.get(i, 1));
            assert_eq!(receiver.hv.get(i, 5), sender.hv.get(i, 1));
        }
    }

    #[test]
    fn test_layer_ignored_unless_edge_is_connect() {
        let sender = numbered_block(EdgeBoundaries::uniform(BoundaryType::Connect));
        let mut receiver = numbered_block(EdgeBoundaries::uniform(BoundaryType::Wall));

        let ghost_before = receiver.h.get(0, 2);
        let layer = sender.copy_layer(BoundaryEdge::Right, false);
        receiver.apply_copy_layer(&layer);
        assert_eq!(receiver.h.get(0, 2), ghost_before);
    }

    #[test]
    fn test_bathymetry_only_written_when_present() {
        let sender = numbered_block(EdgeBoundaries::uniform(BoundaryType::Connect));
        let mut receiver = numbered_block(EdgeBoundaries::uniform(BoundaryType::Connect));

        let b_ghost_before = receiver.b.get(0, 2);
        let layer = sender.copy_layer(BoundaryEdge::Right, false);
        receiver.apply_copy_layer(&layer);

        assert_eq!(receiver.b.get(0, 2), b_ghost_before);
        assert_eq!(receiver.h.get(0, 2), sender.h.get(3, 2));
    }
}
