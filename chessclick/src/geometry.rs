//! Mapping between terminal cells and board squares.
//!
//! Screen row 0 is rank 8: the vertical axis is flipped, files run left to
//! right. A square covers `square_width` x `square_height` cells.

use chess::{File, Rank, Square};
use ratatui::layout::Rect;

/// Squares per side.
pub const DIMENSION: u8 = 8;

/// Square for a grid column and screen row, both in `0..8`.
pub fn grid_to_square(col: u8, row: u8) -> Option<Square> {
    if col >= DIMENSION || row >= DIMENSION {
        return None;
    }
    Some(Square::new(
        File::index(col as usize),
        Rank::index((DIMENSION - 1 - row) as usize),
    ))
}

/// Grid column and screen row of a square.
pub fn square_to_grid(square: Square) -> (u8, u8) {
    let col = square.file() as u8;
    let row = DIMENSION - 1 - square.rank() as u8;
    (col, row)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardGeometry {
    pub origin_x: u16,
    pub origin_y: u16,
    pub square_width: u16,
    pub square_height: u16,
}

impl Default for BoardGeometry {
    fn default() -> Self {
        Self::new(0, 0, 8, 4)
    }
}

impl BoardGeometry {
    pub fn new(origin_x: u16, origin_y: u16, square_width: u16, square_height: u16) -> Self {
        Self {
            origin_x,
            origin_y,
            square_width: square_width.max(1),
            square_height: square_height.max(1),
        }
    }

    pub fn width(&self) -> u16 {
        self.square_width * DIMENSION as u16
    }

    pub fn height(&self) -> u16 {
        self.square_height * DIMENSION as u16
    }

    /// Cells covered by the whole board.
    pub fn area(&self) -> Rect {
        Rect::new(self.origin_x, self.origin_y, self.width(), self.height())
    }

    /// Square under the cell at (`x`, `y`), or `None` off the board.
    pub fn square_at(&self, x: u16, y: u16) -> Option<Square> {
        let dx = x.checked_sub(self.origin_x)?;
        let dy = y.checked_sub(self.origin_y)?;
        let col = dx / self.square_width;
        let row = dy / self.square_height;
        if col >= DIMENSION as u16 || row >= DIMENSION as u16 {
            return None;
        }
        grid_to_square(col as u8, row as u8)
    }

    /// Cells covered by `square`.
    pub fn square_rect(&self, square: Square) -> Rect {
        let (col, row) = square_to_grid(square);
        Rect::new(
            self.origin_x + col as u16 * self.square_width,
            self.origin_y + row as u16 * self.square_height,
            self.square_width,
            self.square_height,
        )
    }

    /// Sprite resolution: one pixel per column, two per row (half blocks).
    pub fn sprite_size(&self) -> (u32, u32) {
        (
            u32::from(self.square_width),
            u32::from(self.square_height) * 2,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess::parse_square;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn corners_are_flipped_vertically() {
        assert_eq!(grid_to_square(0, 0), parse_square("a8"));
        assert_eq!(grid_to_square(7, 0), parse_square("h8"));
        assert_eq!(grid_to_square(0, 7), parse_square("a1"));
        assert_eq!(grid_to_square(7, 7), parse_square("h1"));
        assert_eq!(grid_to_square(8, 0), None);
        assert_eq!(grid_to_square(0, 8), None);
    }

    #[test]
    fn grid_mapping_is_a_bijection() {
        let mut seen = HashSet::new();
        for row in 0..DIMENSION {
            for col in 0..DIMENSION {
                let square = grid_to_square(col, row).unwrap();
                assert!(seen.insert(square));
                assert_eq!(square_to_grid(square), (col, row));
            }
        }
        assert_eq!(seen.len(), 64);
    }

    #[test]
    fn pixel_division_matches_original_layout() {
        let geometry = BoardGeometry::default();
        // e2: column 4, screen row 6.
        assert_eq!(geometry.square_at(4 * 8, 6 * 4), parse_square("e2"));
        assert_eq!(geometry.square_at(4 * 8 + 7, 6 * 4 + 3), parse_square("e2"));
        assert_eq!(geometry.square_at(4 * 8 + 8, 6 * 4), parse_square("f2"));
        assert_eq!(geometry.square_at(64, 0), None);
        assert_eq!(geometry.square_at(0, 32), None);
    }

    #[test]
    fn offset_board_ignores_cells_before_origin() {
        let geometry = BoardGeometry::new(2, 1, 8, 4);
        assert_eq!(geometry.square_at(1, 5), None);
        assert_eq!(geometry.square_at(2, 0), None);
        assert_eq!(geometry.square_at(2, 1), parse_square("a8"));
    }

    proptest! {
        #[test]
        fn flip_is_self_inverse(col in 0u8..8, row in 0u8..8) {
            let square = grid_to_square(col, row).unwrap();
            let rank = square.rank() as u8;
            prop_assert_eq!(DIMENSION - 1 - rank, row);
            prop_assert_eq!(square_to_grid(square), (col, row));
        }

        #[test]
        fn every_cell_of_a_square_maps_back(
            idx in 0usize..64,
            w in 1u16..12,
            h in 1u16..8,
            ox in 0u16..20,
            oy in 0u16..20,
        ) {
            let geometry = BoardGeometry::new(ox, oy, w, h);
            let square = Square::index(idx);
            let rect = geometry.square_rect(square);
            for y in rect.top()..rect.bottom() {
                for x in rect.left()..rect.right() {
                    prop_assert_eq!(geometry.square_at(x, y), Some(square));
                }
            }
        }
    }
}
