//! Board tests - placement validation, shots and sunk tracking

use tetromino_battleship::core::{
    coordinates_for, Board, Cell, PlacementError, ShipPlacement, ShotError, ShotOutcome,
};
use tetromino_battleship::types::{Rotation, Shape};

#[test]
fn test_board_new_empty() {
    let board = Board::new(10, 14);
    assert_eq!(board.width(), 10);
    assert_eq!(board.height(), 14);

    // All cells should be empty
    for row in 0..14 {
        for col in 0..10 {
            assert_eq!(board.get(row, col), Some(Cell::Empty), "({}, {})", row, col);
        }
    }
    assert_eq!(board.remaining_ship_count(), 0);
}

#[test]
fn test_board_bounds_follow_width_and_height() {
    let board = Board::new(12, 10);

    // Negative coordinates
    assert!(board.is_out_of_bounds(-1, 0));
    assert!(board.is_out_of_bounds(0, -1));

    // rows are bounded by height, columns by width
    assert!(board.is_out_of_bounds(10, 0));
    assert!(!board.is_out_of_bounds(9, 11));
    assert!(board.is_out_of_bounds(0, 12));
}

#[test]
fn test_validate_does_not_mutate() {
    let board = Board::new(10, 10);
    let cells = coordinates_for(Shape::O, Rotation::BASE, 4, 4);
    assert!(board.validate_placement(&cells).is_ok());
    assert_eq!(board.occupied_count(), 0);
}

#[test]
fn test_place_out_of_bounds_at_every_edge() {
    let mut board = Board::new(10, 10);

    // I hangs off the bottom
    let cells = coordinates_for(Shape::I, Rotation::BASE, 7, 0);
    assert!(matches!(
        board.place(&cells, 1),
        Err(PlacementError::OutOfBounds { .. })
    ));

    // S rises above the top from row 0
    let cells = coordinates_for(Shape::S, Rotation::BASE, 0, 0);
    assert!(matches!(
        board.place(&cells, 1),
        Err(PlacementError::OutOfBounds { .. })
    ));

    // J reaches left of column 0
    let cells = coordinates_for(Shape::J, Rotation::BASE, 0, 0);
    assert!(matches!(
        board.place(&cells, 1),
        Err(PlacementError::OutOfBounds { .. })
    ));

    // T runs past the right edge
    let cells = coordinates_for(Shape::T, Rotation::BASE, 0, 8);
    assert!(matches!(
        board.place(&cells, 1),
        Err(PlacementError::OutOfBounds { .. })
    ));

    assert_eq!(board.occupied_count(), 0);
}

#[test]
fn test_place_overlap() {
    let mut board = Board::new(10, 10);
    board
        .place_ship(&ShipPlacement::new(2, 1, 0, 0), 1)
        .expect("first piece fits");

    // L at (2, 0) shares (2, 0) and (3, 0) with the I
    let err = board
        .place_ship(&ShipPlacement::new(4, 1, 2, 0), 2)
        .unwrap_err();
    assert_eq!(err, PlacementError::Overlap { row: 2, col: 0 });
    assert_eq!(board.occupied_count(), 4);
}

#[test]
fn test_adjacent_pieces_are_fine() {
    let mut board = Board::new(10, 10);
    board.place_ship(&ShipPlacement::new(1, 1, 0, 0), 1).unwrap();
    board.place_ship(&ShipPlacement::new(1, 1, 0, 2), 2).unwrap();
    board.place_ship(&ShipPlacement::new(1, 1, 2, 0), 3).unwrap();
    assert_eq!(board.get(1, 1), Some(Cell::Ship(1)));
    assert_eq!(board.get(1, 2), Some(Cell::Ship(2)));
    assert_eq!(board.get(2, 0), Some(Cell::Ship(3)));
    assert_eq!(board.remaining_ship_count(), 3);
}

#[test]
fn test_shoot_hit_iff_occupied() {
    let mut board = Board::new(10, 10);
    board.place_ship(&ShipPlacement::new(5, 1, 4, 4), 2).unwrap();

    for row in 0..10 {
        for col in 0..10 {
            let occupied = matches!(board.get(row, col), Some(Cell::Ship(_)));
            let outcome = board.shoot(row, col).unwrap();
            assert_eq!(matches!(outcome, ShotOutcome::Hit(2)), occupied);
        }
    }
    assert!(board.is_sunk(2));
    assert_eq!(board.remaining_ship_count(), 0);
}

#[test]
fn test_shoot_out_of_bounds() {
    let mut board = Board::new(10, 10);
    assert_eq!(
        board.shoot(0, 10),
        Err(ShotError::OutOfBounds { row: 0, col: 10 })
    );
}

#[test]
fn test_sunk_only_after_last_cell() {
    let mut board = Board::new(10, 10);
    board.place_ship(&ShipPlacement::new(1, 1, 0, 0), 1).unwrap();
    board.place_ship(&ShipPlacement::new(2, 1, 5, 5), 2).unwrap();

    let cells = coordinates_for(Shape::O, Rotation::BASE, 0, 0);
    for (i, &(row, col)) in cells.iter().enumerate() {
        assert_eq!(board.shoot(row, col), Ok(ShotOutcome::Hit(1)));
        assert_eq!(board.is_sunk(1), i == cells.len() - 1);
    }
    assert!(!board.is_sunk(2));
    assert_eq!(board.remaining_ship_count(), 1);
}
