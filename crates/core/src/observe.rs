//! Observer seam between the engine and presentation
//!
//! The engine queues [`EngineEvent`]s as it resolves; a front-end either
//! drains them directly with [`GameState::drain_events`] or hands an
//! [`Observer`] to [`GameState::publish`], which delivers the current snapshot
//! followed by every queued event in emission order.
//!
//! [`GameState::drain_events`]: crate::GameState::drain_events
//! [`GameState::publish`]: crate::GameState::publish

use crate::snapshot::GameSnapshot;
use crate::types::{Effect, EngineEvent, GameEvent};

/// Receives engine output; every method defaults to a no-op
pub trait Observer {
    fn on_snapshot(&mut self, _snapshot: &GameSnapshot) {}

    fn on_game_event(&mut self, _event: GameEvent) {}

    fn on_effect(&mut self, _effect: &Effect) {}
}

/// Observer that keeps everything it is handed
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    pub snapshots: usize,
    pub last_snapshot: Option<GameSnapshot>,
    pub events: Vec<EngineEvent>,
}

impl Recorder {
    pub fn game_events(&self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.iter().filter_map(|e| match e {
            EngineEvent::Game(g) => Some(*g),
            EngineEvent::Effect(_) => None,
        })
    }

    pub fn effects(&self) -> impl Iterator<Item = &Effect> + '_ {
        self.events.iter().filter_map(|e| match e {
            EngineEvent::Effect(fx) => Some(fx),
            EngineEvent::Game(_) => None,
        })
    }
}

impl Observer for Recorder {
    fn on_snapshot(&mut self, snapshot: &GameSnapshot) {
        self.snapshots += 1;
        self.last_snapshot = Some(*snapshot);
    }

    fn on_game_event(&mut self, event: GameEvent) {
        self.events.push(EngineEvent::Game(event));
    }

    fn on_effect(&mut self, effect: &Effect) {
        self.events.push(EngineEvent::Effect(*effect));
    }
}
