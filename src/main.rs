//! Terminal Gem Cascade runner (default binary).
//!
//! crossterm input, a framebuffer renderer, and tracing output to a log file
//! since the terminal itself is in raw mode.

mod cli;

use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{debug, info};

use gem_cascade::core::GameState;
use gem_cascade::input::{handle_key_event, should_quit, Command, InputHandler};
use gem_cascade::term::{FrameBuffer, GameView, Hud, Overlay, TerminalRenderer, Viewport};
use gem_cascade::types::{
    Difficulty, LevelConfig, Outcome, LEVELS, MAX_COLORS, MIN_COLORS, TICK_MS,
};

use cli::Cli;

const ALL_LEVELS_DONE: &str = "YOU FINISHED ALL LEVELS!  q: quit";

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_file)?;

    let levels = load_levels(cli.levels.as_deref(), cli.difficulty)?;
    ensure!(
        (1..=levels.len()).contains(&cli.level),
        "level {} out of range (1-{})",
        cli.level,
        levels.len()
    );
    let seed = cli.seed.unwrap_or_else(clock_seed);
    info!(seed, difficulty = cli.difficulty.as_str(), levels = levels.len(), "starting");

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &levels, cli.level - 1, seed);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_tracing(path: &Path) -> Result<()> {
    let log_file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

/// Built-in table, or a JSON array of level configs, scaled by difficulty
fn load_levels(path: Option<&Path>, difficulty: Difficulty) -> Result<Vec<LevelConfig>> {
    let base = match path {
        None => LEVELS.to_vec(),
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read levels from {}", path.display()))?;
            serde_json::from_str::<Vec<LevelConfig>>(&text)
                .with_context(|| format!("invalid level file {}", path.display()))?
        }
    };
    prepare_levels(base, difficulty)
}

/// Scale every level, then validate what the engine will actually get
fn prepare_levels(base: Vec<LevelConfig>, difficulty: Difficulty) -> Result<Vec<LevelConfig>> {
    ensure!(!base.is_empty(), "no levels configured");
    let levels: Vec<LevelConfig> = base.into_iter().map(|cfg| cfg.scaled(difficulty)).collect();
    for cfg in &levels {
        ensure!(
            (MIN_COLORS..=MAX_COLORS).contains(&cfg.color_count),
            "level {}: color count {} outside {}-{}",
            cfg.level,
            cfg.color_count,
            MIN_COLORS,
            MAX_COLORS
        );
        ensure!(
            cfg.moves > 0,
            "level {}: needs at least one move on {}",
            cfg.level,
            difficulty.as_str()
        );
    }
    Ok(levels)
}

/// Index of the level after `current`, or `None` once the table is done
fn next_level(current: usize, count: usize) -> Option<usize> {
    let next = current + 1;
    (next < count).then_some(next)
}

/// One fixed step: tick the engine and HUD, then publish. Returns the bell request.
fn advance(game: &mut GameState, hud: &mut Hud) -> bool {
    game.tick(TICK_MS);
    hud.tick(TICK_MS);
    game.publish(hud);
    hud.take_bell()
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u32)
        .unwrap_or(1)
}

fn run(term: &mut TerminalRenderer, levels: &[LevelConfig], first: usize, seed: u32) -> Result<()> {
    let mut level_index = first;
    let mut game = GameState::new(seed);
    game.start_level(levels[level_index]);

    let view = GameView::default();
    let mut input = InputHandler::new();
    let mut hud = Hud::new();
    let mut fb = FrameBuffer::new(0, 0);
    game.publish(&mut hud);

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        if let Some(snap) = hud.snapshot() {
            let overlay = Overlay {
                cursor: Some(input.cursor()),
                selected: input.selected(),
                message: hud.message(),
                gain: hud.gain(),
                shake: hud.shake_offset(),
            };
            view.render_into(snap, &overlay, Viewport::new(w, h), &mut fb);
            term.draw_swap(&mut fb)?;
        }

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        info!(score = game.score(), level = game.level(), "quit");
                        return Ok(());
                    }
                    let command = handle_key_event(key).and_then(|action| input.handle(action));
                    match command {
                        Some(Command::Intent(intent)) => {
                            let accepted = game.apply_intent(intent);
                            debug!(?intent, accepted, "intent");
                        }
                        Some(Command::Restart) => {
                            game.restart();
                            input.reset();
                            hud.reset();
                        }
                        Some(Command::NextLevel) if game.outcome() == Some(Outcome::Won) => {
                            match next_level(level_index, levels.len()) {
                                Some(next) => {
                                    level_index = next;
                                    game.start_level(levels[level_index]);
                                    input.reset();
                                    hud.reset();
                                }
                                None => {
                                    info!(score = game.score(), "all levels finished");
                                    hud.pin(ALL_LEVELS_DONE);
                                }
                            }
                        }
                        Some(Command::NextLevel) => {}
                        None => {}
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            if advance(&mut game, &mut hud) {
                term.bell()?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hard_scaling_never_produces_a_frozen_level() {
        let levels = prepare_levels(vec![LevelConfig::new(1, 1000, 1, 4)], Difficulty::Hard)
            .unwrap();
        assert_eq!(levels[0].moves, 1);
        assert_eq!(levels[0].target_score, 1200);
    }

    #[test]
    fn invalid_levels_are_rejected() {
        assert!(prepare_levels(Vec::new(), Difficulty::Normal).is_err());
        assert!(prepare_levels(vec![LevelConfig::new(1, 1000, 0, 4)], Difficulty::Easy).is_err());
        assert!(prepare_levels(vec![LevelConfig::new(1, 1000, 9, 7)], Difficulty::Normal).is_err());
        assert!(prepare_levels(vec![LevelConfig::new(1, 1000, 9, 3)], Difficulty::Normal).is_err());
    }

    #[test]
    fn builtin_table_loads_on_every_difficulty() {
        for difficulty in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
            let levels = load_levels(None, difficulty).unwrap();
            assert_eq!(levels.len(), LEVELS.len());
            assert!(levels.iter().all(|cfg| cfg.moves > 0));
        }
    }

    #[test]
    fn each_step_publishes_once() {
        let mut game = GameState::new(11);
        game.start_level(LEVELS[0]);
        let mut hud = Hud::new();
        assert!(hud.snapshot().is_none());

        assert!(!advance(&mut game, &mut hud));
        assert!(game.pending_events().is_empty());
        let snap = hud.snapshot().unwrap();
        assert_eq!(snap.score, game.score());
        assert_eq!(snap.moves_left, game.moves_left());
    }

    #[test]
    fn last_level_does_not_wrap() {
        assert_eq!(next_level(0, 5), Some(1));
        assert_eq!(next_level(3, 5), Some(4));
        assert_eq!(next_level(4, 5), None);
        assert_eq!(next_level(0, 1), None);
    }
}
