use fifteen::{
    is_solvable, shuffle, Cell, Controller, Direction, Frontend, Game, GameState, MoveError,
    MoveRequest, NewGame, Permutation, ScoreRecord, ScoreStore,
};
use fifteen::controller::BoardView;

#[derive(Default)]
struct Quiet {
    renders: usize,
    finished: Vec<ScoreRecord>,
}

impl Frontend for Quiet {
    fn render(&mut self, _view: &BoardView) {
        self.renders += 1;
    }

    fn solved(&mut self, record: &ScoreRecord, _rank: Option<usize>) {
        self.finished.push(record.clone());
    }
}

#[test]
fn shuffled_games_are_well_formed_and_solvable() {
    for _ in 0..1000 {
        let p = shuffle();
        let tiles: Vec<u8> = p
            .cells()
            .iter()
            .filter_map(|c| match c {
                Cell::Tile(n) => Some(*n),
                Cell::Blank => None,
            })
            .collect();
        let mut sorted = tiles.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (1..=15).collect::<Vec<u8>>());
        assert_eq!(p.cells().iter().filter(|c| c.is_blank()).count(), 1);
        assert!(is_solvable(&p));
    }
}

#[test]
fn adjacent_swap_of_first_tiles_is_never_dealt() {
    let swapped = Permutation::from_labels(&[2, 1, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, -1])
        .unwrap();
    assert!(!is_solvable(&swapped));
    for _ in 0..1000 {
        assert_ne!(shuffle(), swapped);
    }
}

#[test]
fn solved_board_toggles_with_one_move() {
    let mut game = Game::new();
    game.start(Permutation::solved(), false).unwrap();
    assert!(game.is_solved());

    game.attempt_move(2, 3).unwrap();
    assert!(!game.is_solved());
    game.attempt_move(3, 3).unwrap();
    assert!(game.is_solved());
    assert_eq!(game.state(), GameState::Solved);
    assert_eq!(game.moves(), 2);
}

#[test]
fn random_walk_keeps_board_a_solvable_permutation() {
    let mut game = Game::new();
    game.start(shuffle(), false).unwrap();

    let mut accepted = 0;
    for step in 0..400 {
        let dir = Direction::ALL[(step * 7 + step / 3) % 4];
        match game.attempt_directional_move(dir) {
            Ok(outcome) => {
                accepted += 1;
                assert_eq!(outcome.moves, accepted);
                if outcome.solved {
                    break;
                }
            }
            Err(MoveError::OutOfBounds { .. }) => {}
            Err(e) => panic!("unexpected rejection: {}", e),
        }

        let p = Permutation::from_cells(&game.cells()).unwrap();
        assert!(p.is_solvable());
        let blank = p.blank_index();
        assert_eq!(game.blank(), (blank / 4, blank % 4));
    }
    assert_eq!(game.moves(), accepted);
}

#[test]
fn controller_replays_a_stored_start() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.txt");
    let start = Permutation::from_labels(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, -1, 13, 14, 15, 12])
        .unwrap();

    let mut ctl = Controller::new(Quiet::default()).with_scores(ScoreStore::new(&path, 10), true);
    assert!(ctl.request_new_game(false, NewGame::Position(start)));
    ctl.request_move(MoveRequest::Toward(Direction::Up)).unwrap();
    assert_eq!(ctl.game().state(), GameState::Solved);
    assert_eq!(ctl.frontend().finished.len(), 1);
    assert_eq!(ctl.frontend().renders, 2);

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.ends_with(&start.to_string()));

    let mut other = Controller::new(Quiet::default()).with_scores(ScoreStore::new(&path, 10), true);
    assert!(other.request_new_game(false, NewGame::Replay(0)));
    assert_eq!(*other.game().initial(), start);
}
