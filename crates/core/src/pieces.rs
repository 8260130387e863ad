//! Pieces module - Tetromino rotation matrices and the simplified kick policy
//!
//! Every kind has four square rotation matrices of identical size
//! (`I` 4x4, `O` 2x2, the rest 3x3). The table is static and shared by
//! reference for the lifetime of the program.
//!
//! Rotation uses a fixed, purely horizontal kick sequence (`0, -1, +1, -2, +2`)
//! instead of a full SRS kick table.

use crate::types::{PieceKind, Rotation, SPAWN_X, SPAWN_Y};

/// Offset of a single mino relative to the matrix origin, as `(col, row)`
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from the matrix origin
pub type PieceShape = [MinoOffset; 4];

/// One rotation state of a piece kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RotationMatrix {
    size: u8,
    minos: PieceShape,
}

impl RotationMatrix {
    /// Build a matrix from rows of `#` (occupied) and `.` (empty).
    ///
    /// Panics at compile time when the matrix is not square or does not
    /// hold exactly four occupied cells.
    pub const fn parse(rows: &[&str]) -> Self {
        let size = rows.len();
        let mut minos = [(0i8, 0i8); 4];
        let mut count = 0;
        let mut r = 0;
        while r < size {
            let bytes = rows[r].as_bytes();
            assert!(bytes.len() == size, "rotation matrix must be square");
            let mut c = 0;
            while c < size {
                if bytes[c] == b'#' {
                    assert!(count < 4, "tetromino has more than four cells");
                    minos[count] = (c as i8, r as i8);
                    count += 1;
                }
                c += 1;
            }
            r += 1;
        }
        assert!(count == 4, "tetromino must have exactly four cells");
        Self {
            size: size as u8,
            minos,
        }
    }

    /// Side length of the (square) matrix
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Occupied cells as `(col, row)` offsets
    pub fn minos(&self) -> &PieceShape {
        &self.minos
    }

    pub fn is_occupied(&self, col: u8, row: u8) -> bool {
        self.minos
            .iter()
            .any(|&(c, r)| c == col as i8 && r == row as i8)
    }
}

const I_SHAPES: [RotationMatrix; 4] = [
    RotationMatrix::parse(&["....", "####", "....", "...."]),
    RotationMatrix::parse(&["..#.", "..#.", "..#.", "..#."]),
    RotationMatrix::parse(&["....", "....", "####", "...."]),
    RotationMatrix::parse(&[".#..", ".#..", ".#..", ".#.."]),
];

const O_SHAPES: [RotationMatrix; 4] = [
    RotationMatrix::parse(&["##", "##"]),
    RotationMatrix::parse(&["##", "##"]),
    RotationMatrix::parse(&["##", "##"]),
    RotationMatrix::parse(&["##", "##"]),
];

const T_SHAPES: [RotationMatrix; 4] = [
    RotationMatrix::parse(&[".#.", "###", "..."]),
    RotationMatrix::parse(&[".#.", ".##", ".#."]),
    RotationMatrix::parse(&["...", "###", ".#."]),
    RotationMatrix::parse(&[".#.", "##.", ".#."]),
];

const S_SHAPES: [RotationMatrix; 4] = [
    RotationMatrix::parse(&[".##", "##.", "..."]),
    RotationMatrix::parse(&[".#.", ".##", "..#"]),
    RotationMatrix::parse(&["...", ".##", "##."]),
    RotationMatrix::parse(&["#..", "##.", ".#."]),
];

const Z_SHAPES: [RotationMatrix; 4] = [
    RotationMatrix::parse(&["##.", ".##", "..."]),
    RotationMatrix::parse(&["..#", ".##", ".#."]),
    RotationMatrix::parse(&["...", "##.", ".##"]),
    RotationMatrix::parse(&[".#.", "##.", "#.."]),
];

const J_SHAPES: [RotationMatrix; 4] = [
    RotationMatrix::parse(&["#..", "###", "..."]),
    RotationMatrix::parse(&[".##", ".#.", ".#."]),
    RotationMatrix::parse(&["...", "###", "..#"]),
    RotationMatrix::parse(&[".#.", ".#.", "##."]),
];

const L_SHAPES: [RotationMatrix; 4] = [
    RotationMatrix::parse(&["..#", "###", "..."]),
    RotationMatrix::parse(&[".#.", ".#.", ".##"]),
    RotationMatrix::parse(&["...", "###", "#.."]),
    RotationMatrix::parse(&["##.", ".#.", ".#."]),
];

/// Rotation table indexed by [`PieceKind::index`] then rotation index
static SHAPES: [[RotationMatrix; 4]; 7] = [
    I_SHAPES, O_SHAPES, T_SHAPES, S_SHAPES, Z_SHAPES, J_SHAPES, L_SHAPES,
];

/// Get the rotation matrix for a piece kind and rotation
pub fn matrix(kind: PieceKind, rotation: Rotation) -> &'static RotationMatrix {
    &SHAPES[kind.index()][rotation.index()]
}

/// Get the shape (mino offsets) for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    *matrix(kind, rotation).minos()
}

/// Horizontal offsets tried, in order, when a rotation collides.
/// The vertical offset is always 0.
pub const ROTATION_KICKS: [i8; 5] = [0, -1, 1, -2, 2];

/// Try to rotate a piece one step clockwise with the simplified kicks.
///
/// `collides(x, y, matrix)` is the board collision predicate.
/// Returns the new rotation and the kicked column of the first offset that
/// fits, or `None` when every offset collides.
pub fn try_rotate(
    kind: PieceKind,
    rotation: Rotation,
    x: i8,
    y: i8,
    collides: impl Fn(i8, i8, &RotationMatrix) -> bool,
) -> Option<(Rotation, i8)> {
    let new_rotation = rotation.next();
    let new_matrix = matrix(kind, new_rotation);

    ROTATION_KICKS
        .iter()
        .map(|&dx| x + dx)
        .find(|&new_x| !collides(new_x, y, new_matrix))
        .map(|new_x| (new_rotation, new_x))
}

/// Spawn position for new pieces (x, y)
pub const SPAWN_POSITION: (i8, i8) = (SPAWN_X, SPAWN_Y);

/// Get initial shape for a new piece at spawn position
pub fn get_spawn_shape(kind: PieceKind) -> PieceShape {
    get_shape(kind, Rotation::SPAWN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rotation_has_the_kind_size() {
        for kind in PieceKind::ALL {
            let size = matrix(kind, Rotation::SPAWN).size();
            for r in 0..4 {
                assert_eq!(matrix(kind, Rotation::new(r)).size(), size, "{:?}", kind);
            }
        }
        assert_eq!(matrix(PieceKind::I, Rotation::SPAWN).size(), 4);
        assert_eq!(matrix(PieceKind::O, Rotation::SPAWN).size(), 2);
        assert_eq!(matrix(PieceKind::T, Rotation::SPAWN).size(), 3);
    }

    #[test]
    fn parse_records_offsets_in_row_major_order() {
        let m = RotationMatrix::parse(&[".#.", "###", "..."]);
        assert_eq!(m.minos(), &[(1, 0), (0, 1), (1, 1), (2, 1)]);
        assert!(m.is_occupied(1, 0));
        assert!(!m.is_occupied(0, 0));
    }

    #[test]
    fn kick_order_is_fixed() {
        assert_eq!(ROTATION_KICKS, [0, -1, 1, -2, 2]);
    }
}
