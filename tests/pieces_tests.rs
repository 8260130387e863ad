//! Pieces tests - rotation matrices and the horizontal kick sequence

use std::cell::RefCell;

use neon_tetris::core::pieces::{get_shape, get_spawn_shape, matrix, try_rotate, SPAWN_POSITION};
use neon_tetris::core::Board;
use neon_tetris::types::{PieceKind, Rotation};

const R0: Rotation = Rotation::SPAWN;

fn r(i: u8) -> Rotation {
    Rotation::new(i)
}

// ============== Shape Tests ==============

#[test]
fn test_i_piece_shapes() {
    assert_eq!(get_shape(PieceKind::I, R0), [(0, 1), (1, 1), (2, 1), (3, 1)]);
    assert_eq!(get_shape(PieceKind::I, r(1)), [(2, 0), (2, 1), (2, 2), (2, 3)]);
    assert_eq!(get_shape(PieceKind::I, r(2)), [(0, 2), (1, 2), (2, 2), (3, 2)]);
    assert_eq!(get_shape(PieceKind::I, r(3)), [(1, 0), (1, 1), (1, 2), (1, 3)]);
}

#[test]
fn test_o_piece_is_rotation_invariant() {
    let spawn = get_shape(PieceKind::O, R0);
    assert_eq!(spawn, [(0, 0), (1, 0), (0, 1), (1, 1)]);
    for i in 1..4 {
        assert_eq!(get_shape(PieceKind::O, r(i)), spawn);
    }
}

#[test]
fn test_t_piece_shapes() {
    assert_eq!(get_shape(PieceKind::T, R0), [(1, 0), (0, 1), (1, 1), (2, 1)]);
    assert_eq!(get_shape(PieceKind::T, r(1)), [(1, 0), (1, 1), (2, 1), (1, 2)]);
    assert_eq!(get_shape(PieceKind::T, r(2)), [(0, 1), (1, 1), (2, 1), (1, 2)]);
    assert_eq!(get_shape(PieceKind::T, r(3)), [(1, 0), (0, 1), (1, 1), (1, 2)]);
}

#[test]
fn test_s_and_z_piece_shapes() {
    assert_eq!(get_shape(PieceKind::S, R0), [(1, 0), (2, 0), (0, 1), (1, 1)]);
    assert_eq!(get_shape(PieceKind::S, r(1)), [(1, 0), (1, 1), (2, 1), (2, 2)]);
    assert_eq!(get_shape(PieceKind::Z, R0), [(0, 0), (1, 0), (1, 1), (2, 1)]);
    assert_eq!(get_shape(PieceKind::Z, r(1)), [(2, 0), (1, 1), (2, 1), (1, 2)]);
}

#[test]
fn test_j_and_l_piece_shapes() {
    assert_eq!(get_shape(PieceKind::J, R0), [(0, 0), (0, 1), (1, 1), (2, 1)]);
    assert_eq!(get_shape(PieceKind::J, r(1)), [(1, 0), (2, 0), (1, 1), (1, 2)]);
    assert_eq!(get_shape(PieceKind::L, R0), [(2, 0), (0, 1), (1, 1), (2, 1)]);
    assert_eq!(get_shape(PieceKind::L, r(1)), [(1, 0), (1, 1), (1, 2), (2, 2)]);
}

#[test]
fn test_every_shape_has_four_distinct_cells_inside_its_matrix() {
    for kind in PieceKind::ALL {
        for i in 0..4 {
            let m = matrix(kind, r(i));
            let cells = m.minos();
            for (a, &(c, row)) in cells.iter().enumerate() {
                assert!(c >= 0 && (c as u8) < m.size() && row >= 0 && (row as u8) < m.size());
                assert!(!cells[a + 1..].contains(&(c, row)), "{:?} r{} repeats a cell", kind, i);
            }
        }
    }
}

#[test]
fn test_four_rotations_cycle_back() {
    for kind in PieceKind::ALL {
        let mut rot = R0;
        for _ in 0..4 {
            rot = rot.next();
        }
        assert_eq!(rot, R0);
        assert_eq!(get_shape(kind, rot), get_spawn_shape(kind));
    }
}

#[test]
fn test_spawn_position() {
    assert_eq!(SPAWN_POSITION, (3, 0));
}

// ============== Rotation / Kick Tests ==============

#[test]
fn test_rotation_without_obstacles_uses_zero_offset() {
    let board = Board::new();
    let result = try_rotate(PieceKind::T, R0, 3, 5, |x, y, m| board.collides(x, y, m));
    assert_eq!(result, Some((r(1), 3)));
}

#[test]
fn test_kicks_are_tried_in_fixed_order() {
    let tried = RefCell::new(Vec::new());
    let result = try_rotate(PieceKind::T, R0, 4, 5, |x, y, _| {
        assert_eq!(y, 5, "kicks never move vertically");
        tried.borrow_mut().push(x);
        true
    });
    assert_eq!(result, None);
    assert_eq!(tried.into_inner(), vec![4, 3, 5, 2, 6]);
}

#[test]
fn test_first_free_offset_wins() {
    // Everything but offsets +1 and +2 collides: +1 is tried first.
    let result = try_rotate(PieceKind::J, R0, 4, 5, |x, _, _| x != 5 && x != 6);
    assert_eq!(result, Some((r(1), 5)));
}

#[test]
fn test_vertical_i_kicks_off_the_left_wall() {
    let board = Board::new();
    // Vertical I at x=-2 fills column 0; horizontal needs columns x..x+3.
    let result = try_rotate(PieceKind::I, r(1), -2, 5, |x, y, m| board.collides(x, y, m));
    assert_eq!(result, Some((r(2), 0)));
}

#[test]
fn test_vertical_i_kicks_off_the_right_wall() {
    let board = Board::new();
    // Vertical I (rotation 3, column offset 1) at x=8 fills column 9.
    let result = try_rotate(PieceKind::I, r(3), 8, 5, |x, y, m| board.collides(x, y, m));
    assert_eq!(result, Some((R0, 6)));
}

#[test]
fn test_rotation_fails_when_every_kick_collides() {
    // A one-column well: the vertical I cannot turn horizontal.
    let mut board = Board::new();
    for y in 0..21 {
        for x in 0..10 {
            if x != 4 {
                board.set(x, y, Some(PieceKind::Z));
            }
        }
    }
    let result = try_rotate(PieceKind::I, r(1), 2, 10, |x, y, m| board.collides(x, y, m));
    assert_eq!(result, None);
}

#[test]
fn test_successful_rotation_never_collides() {
    let board = Board::from_rows(&[
        "..z.......",
        "..zz...l..",
        "t..z...l.i",
        "tt.ooo.lli",
        "t..ooo...i",
    ]);
    for kind in PieceKind::ALL {
        for i in 0..4 {
            for x in -3..12 {
                for y in -2..21 {
                    if board.collides(x, y, matrix(kind, r(i))) {
                        continue;
                    }
                    if let Some((rot, nx)) =
                        try_rotate(kind, r(i), x, y, |x, y, m| board.collides(x, y, m))
                    {
                        assert!(!board.collides(nx, y, matrix(kind, rot)));
                        assert_eq!(rot, r(i).next());
                        assert!((nx - x).abs() <= 2);
                    }
                }
            }
        }
    }
}
