//! Session tests - full packet exchanges without sockets

use tetromino_battleship::core::{EndReason, GameSession, Outbox, Phase};
use tetromino_battleship::types::PlayerId;

use tetromino_battleship::types::PlayerId::{One as P1, Two as P2};

const FLEET_P1: &str = "I 2 1 0 0 2 1 0 2 2 1 0 4 2 1 0 6 2 1 0 8";
/// O, S, L, Z and T spread over the board
const FLEET_P2: &str = "I 1 1 0 0 3 1 4 4 4 1 0 8 5 1 7 0 7 1 7 6";

fn send(session: &mut GameSession, from: PlayerId, line: &str) -> Vec<(PlayerId, String)> {
    collect(session.handle_line(from, line))
}

fn collect(out: Outbox) -> Vec<(PlayerId, String)> {
    out.into_iter().map(|o| (o.to, o.response.encode())).collect()
}

fn reply(to: PlayerId, line: &str) -> Vec<(PlayerId, String)> {
    vec![(to, line.to_string())]
}

fn ready() -> GameSession {
    let mut session = GameSession::default();
    assert_eq!(send(&mut session, P1, "B 10 10"), reply(P1, "A"));
    assert_eq!(send(&mut session, P2, "B"), reply(P2, "A"));
    assert_eq!(send(&mut session, P1, FLEET_P1), reply(P1, "A"));
    assert_eq!(send(&mut session, P2, FLEET_P2), reply(P2, "A"));
    session
}

#[test]
fn test_opening_exchange() {
    let mut session = ready();
    assert_eq!(session.phase(), Phase::Turn(P1));
    // (0, 0) belongs to player 2's O piece
    assert_eq!(send(&mut session, P1, "S 0 0"), reply(P1, "R 5 H"));
    assert_eq!(send(&mut session, P2, "S 0 1"), reply(P2, "R 5 M"));
}

#[test]
fn test_every_shape_places() {
    let session = ready();
    let board = session.board(P2).unwrap();
    assert_eq!(board.occupied_count(), 20);
    assert_eq!(board.remaining_ship_count(), 5);
}

#[test]
fn test_query_counts_successful_shots() {
    let mut session = ready();
    let mut successes = 0;

    for turn in 0..6 {
        // every other volley is a miss off the board
        if turn % 2 == 1 {
            send(&mut session, P1, "S 10 10");
        }
        let out = send(&mut session, P1, &format!("S {} 9", turn));
        assert!(out[0].1.starts_with("R "), "{:?}", out);
        successes += 1;
        send(&mut session, P2, &format!("S 9 {}", turn));

        let out = send(&mut session, P1, "Q");
        assert_eq!(out.len(), 1);
        let fields: Vec<&str> = out[0].1.split(' ').collect();
        assert_eq!(fields[0], "G");
        // G <remaining> then three fields per shot
        assert_eq!((fields.len() - 2) / 3, successes);
        assert_eq!(session.phase(), Phase::Turn(P1));
    }
}

#[test]
fn test_query_lists_shots_in_row_major_order() {
    let mut session = ready();
    send(&mut session, P1, "S 5 5");
    send(&mut session, P2, "S 9 9");
    send(&mut session, P1, "S 0 0");
    send(&mut session, P2, "S 9 8");
    send(&mut session, P1, "S 5 1");
    send(&mut session, P2, "S 9 7");
    assert_eq!(
        send(&mut session, P1, "Q"),
        reply(P1, "G 5 H 0 0 M 5 1 M 5 5")
    );
}

#[test]
fn test_repeat_shot_is_401_even_after_a_miss() {
    let mut session = ready();
    send(&mut session, P1, "S 3 3");
    send(&mut session, P2, "S 9 9");
    assert_eq!(send(&mut session, P1, "S 3 3"), reply(P1, "E 401"));
    assert_eq!(session.phase(), Phase::Turn(P1));
}

#[test]
fn test_initialize_rejection_leaves_board_empty() {
    let mut session = GameSession::default();
    send(&mut session, P1, "B 10 10");
    send(&mut session, P2, "B");

    // a partial piece, then whole pieces but too few of them
    assert_eq!(send(&mut session, P1, "I 1 1 0 0 1 1 2"), reply(P1, "E 201"));
    assert_eq!(send(&mut session, P1, "I 1 1 0 0 1 1 2 2"), reply(P1, "E 101"));
    // non-numeric field
    assert_eq!(
        send(&mut session, P1, "I 1 1 0 0 x 1 0 2 2 1 0 4 2 1 0 6 2 1 0 8"),
        reply(P1, "E 101")
    );
    // rotation 5 (301) and an overlap (303)
    assert_eq!(
        send(&mut session, P1, "I 2 1 0 0 2 1 0 0 2 5 0 4 2 1 0 6 2 1 0 8"),
        reply(P1, "E 301")
    );
    assert_eq!(session.board(P1).unwrap().occupied_count(), 0);
    assert_eq!(session.phase(), Phase::AwaitInitP1);

    assert_eq!(send(&mut session, P1, FLEET_P1), reply(P1, "A"));
}

#[test]
fn test_begin_rejection_is_repeatable() {
    let mut session = GameSession::default();
    for _ in 0..3 {
        assert_eq!(send(&mut session, P1, "B 10 9"), reply(P1, "E 200"));
        assert_eq!(session.phase(), Phase::AwaitBeginP1);
    }
    assert_eq!(send(&mut session, P1, "B 12 10"), reply(P1, "A"));
}

#[test]
fn test_out_of_turn_packets_are_rejected_without_side_effects() {
    let mut session = ready();
    assert_eq!(send(&mut session, P2, "S 0 0"), reply(P2, "E 100"));
    assert_eq!(send(&mut session, P2, "Q"), reply(P2, "E 100"));
    assert!(session.shots(P2).unwrap().is_empty());
    assert_eq!(session.phase(), Phase::Turn(P1));
}

#[test]
fn test_unknown_packets_are_100() {
    let mut session = ready();
    assert_eq!(send(&mut session, P1, "X 1 2"), reply(P1, "E 100"));
    assert_eq!(send(&mut session, P1, "SHOOT 1 2"), reply(P1, "E 100"));
    assert_eq!(send(&mut session, P1, "B 10 10"), reply(P1, "E 100"));
    assert_eq!(send(&mut session, P1, "F now"), reply(P1, "E 100"));
    assert!(!session.is_over());
}

#[test]
fn test_remaining_cache_matches_board() {
    let mut session = ready();
    // the O at (0, 0): sinks on the fourth hit
    let o_cells = [(0, 0), (0, 1), (1, 0), (1, 1)];
    for (i, (row, col)) in o_cells.into_iter().enumerate() {
        let out = send(&mut session, P1, &format!("S {} {}", row, col));
        let expected = if i == 3 { "R 4 H" } else { "R 5 H" };
        assert_eq!(out, reply(P1, expected));
        assert_eq!(
            session.remaining_ships(P2),
            Some(session.board(P2).unwrap().remaining_ship_count())
        );
        send(&mut session, P2, &format!("S 9 {}", i));
    }
}

#[test]
fn test_forfeit_mid_game() {
    let mut session = ready();
    send(&mut session, P1, "S 0 0");
    let out = send(&mut session, P1, "F");
    assert_eq!(
        out,
        vec![(P1, "H 0".to_string()), (P2, "H 1".to_string())]
    );
    let result = session.result().unwrap();
    assert_eq!(result.winner, P2);
    assert_eq!(result.reason, EndReason::Forfeit);
    assert!(session.board(P1).is_none());
    assert!(session.shots(P2).is_none());
}

#[test]
fn test_drain_timeout_still_halts_loser() {
    let mut session = GameSession::default();
    send(&mut session, P1, "B 10 10");
    send(&mut session, P2, "B");
    send(&mut session, P1, FLEET_P1);
    send(&mut session, P2, FLEET_P1);

    let mut last = Vec::new();
    let mut miss = 0;
    for col in [0, 2, 4, 6, 8] {
        for row in 0..4 {
            last = send(&mut session, P1, &format!("S {} {}", row, col));
            if session.is_over() || matches!(session.phase(), Phase::Draining { .. }) {
                break;
            }
            send(&mut session, P2, &format!("S {} {}", 9 - miss / 10, miss % 10));
            miss += 1;
        }
    }
    assert_eq!(last, vec![(P1, "R 0 H".to_string()), (P1, "H 1".to_string())]);
    assert_eq!(session.phase(), Phase::Draining { loser: P2 });
    assert_eq!(session.awaiting(), Some(P2));

    assert_eq!(collect(session.handle_timeout()), reply(P2, "H 0"));
    assert!(session.is_over());
    assert_eq!(session.result().unwrap().reason, EndReason::AllShipsSunk);
}
