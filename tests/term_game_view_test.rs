use gem_cascade::core::{GameState, Grid};
use gem_cascade::term::{AnchorY, GameView, Hud, Overlay, Viewport};
use gem_cascade::types::{Intent, LevelConfig, Pos, SpecialKind, TICK_MS};

const CHECKER: [&str; 8] = [
    "RGBYRGBY", "BYRGBYRG", "RGBYRGBY", "BYRGBYRG", "RGBYRGBY", "BYRGBYRG", "RGBYRGBY",
    "BYRGBYRG",
];

fn checker_game(config: LevelConfig) -> GameState {
    GameState::from_grid(1, config, Grid::from_layout(&CHECKER).unwrap())
}

// Board (26 wide) + gap + panel (18) centered in 60 columns => board at x = 7
const BOARD_X: u16 = 7;

#[test]
fn term_view_renders_border_and_tiles() {
    let mut grid = Grid::from_layout(&CHECKER).unwrap();
    grid.set_special(Pos::new(1, 0), SpecialKind::RowClear);
    let game = GameState::from_grid(1, LevelConfig::new(1, 1000, 20, 4), grid);

    let view = GameView::default().with_anchor_y(AnchorY::Top);
    let fb = view.render(&game.snapshot(), &Overlay::default(), Viewport::new(60, 14));

    assert_eq!(fb.get(BOARD_X, 0).unwrap().ch, '┌');
    assert_eq!(fb.get(BOARD_X + 25, 0).unwrap().ch, '┐');
    assert_eq!(fb.get(BOARD_X, 9).unwrap().ch, '└');
    assert_eq!(fb.get(BOARD_X + 25, 9).unwrap().ch, '┘');

    // Each cell is 3 wide with the glyph in the middle.
    assert_eq!(fb.get(BOARD_X + 2, 1).unwrap().ch, '●');
    assert_eq!(fb.get(BOARD_X + 5, 1).unwrap().ch, '═');
}

#[test]
fn term_view_draws_cursor_and_selection() {
    let game = checker_game(LevelConfig::new(1, 1000, 20, 4));
    let overlay = Overlay {
        cursor: Some(Pos::new(0, 0)),
        selected: Some(Pos::new(1, 0)),
        ..Overlay::default()
    };
    let view = GameView::default().with_anchor_y(AnchorY::Top);
    let fb = view.render(&game.snapshot(), &overlay, Viewport::new(60, 14));

    assert_eq!(fb.get(BOARD_X + 1, 1).unwrap().ch, '[');
    assert_eq!(fb.get(BOARD_X + 3, 1).unwrap().ch, ']');
    assert!(fb.get(BOARD_X + 5, 1).unwrap().style.reverse);
    assert!(!fb.get(BOARD_X + 2, 1).unwrap().style.reverse);
}

#[test]
fn term_view_shows_score_and_loss_banner() {
    let mut rows = CHECKER;
    rows[0] = "RRGRBYBY";
    let grid = Grid::from_layout(&rows).unwrap();
    let mut game = GameState::from_grid(1, LevelConfig::new(3, 1_000_000, 1, 4), grid);

    assert!(game.apply_intent(Intent::Swap {
        a: Pos::new(2, 0),
        b: Pos::new(3, 0),
    }));
    game.settle();

    let mut hud = Hud::new();
    game.publish(&mut hud);
    hud.tick(TICK_MS);

    let snap = hud.snapshot().unwrap();
    let overlay = Overlay {
        message: hud.message(),
        ..Overlay::default()
    };
    let view = GameView::default().with_anchor_y(AnchorY::Top);
    let fb = view.render(snap, &overlay, Viewport::new(60, 14));

    let text: String = (0..14).map(|y| fb.row_text(y) + "\n").collect();
    assert!(text.contains("OUT OF MOVES"));
    assert!(text.contains("SCORE"));
    assert!(text.contains(&game.score().to_string()));
    assert!(text.contains("r: retry"));
}

#[test]
fn term_view_tiny_viewport_does_not_panic() {
    let game = checker_game(LevelConfig::new(1, 1000, 20, 4));
    let view = GameView::default();
    for (w, h) in [(0, 0), (1, 1), (10, 4), (26, 10)] {
        let fb = view.render(&game.snapshot(), &Overlay::default(), Viewport::new(w, h));
        assert_eq!((fb.width(), fb.height()), (w, h));
    }
}
