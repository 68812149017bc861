//! Hud: turns engine notifications into short-lived on-screen state.
//!
//! The engine only emits cues; the HUD decides how long each one stays
//! visible. Messages disappear after [`MESSAGE_DISMISS_MS`].

use crate::core::{GameSnapshot, Observer};
use crate::types::{Effect, GameEvent, SoundCue, TextTier, MESSAGE_DISMISS_MS};

/// How long a screen shake lasts
const SHAKE_MS: u32 = 240;
/// How long a score popup lasts
const GAIN_MS: u32 = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreGain {
    pub amount: u32,
    pub tier: TextTier,
}

#[derive(Debug, Clone, Default)]
pub struct Hud {
    snapshot: Option<GameSnapshot>,
    message: Option<(String, u32)>,
    /// Message stays until `reset` or the next `show`
    pinned: bool,
    gain: Option<(ScoreGain, u32)>,
    shake_ms: u32,
    shake_intensity: u8,
    bell: bool,
}

impl Hud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance display timers
    pub fn tick(&mut self, elapsed_ms: u32) {
        if !self.pinned {
            if let Some((_, ms)) = &mut self.message {
                *ms = ms.saturating_sub(elapsed_ms);
                if *ms == 0 {
                    self.message = None;
                }
            }
        }
        if let Some((_, ms)) = &mut self.gain {
            *ms = ms.saturating_sub(elapsed_ms);
            if *ms == 0 {
                self.gain = None;
            }
        }
        self.shake_ms = self.shake_ms.saturating_sub(elapsed_ms);
    }

    /// Forget everything (level change)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn show(&mut self, text: impl Into<String>) {
        self.message = Some((text.into(), MESSAGE_DISMISS_MS));
        self.pinned = false;
    }

    /// Show a message that does not time out
    pub fn pin(&mut self, text: impl Into<String>) {
        self.message = Some((text.into(), MESSAGE_DISMISS_MS));
        self.pinned = true;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_ref().map(|(m, _)| m.as_str())
    }

    pub fn gain(&self) -> Option<ScoreGain> {
        self.gain.map(|(g, _)| g)
    }

    pub fn snapshot(&self) -> Option<&GameSnapshot> {
        self.snapshot.as_ref()
    }

    /// Horizontal board offset for the current shake frame
    pub fn shake_offset(&self) -> u16 {
        if self.shake_ms == 0 {
            return 0;
        }
        let amplitude = if self.shake_intensity >= 15 { 2 } else { 1 };
        // Alternate sides every 40ms
        if (self.shake_ms / 40) % 2 == 0 {
            amplitude
        } else {
            0
        }
    }

    /// Take the pending terminal bell request
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell)
    }
}

impl Observer for Hud {
    fn on_snapshot(&mut self, snapshot: &GameSnapshot) {
        self.snapshot = Some(*snapshot);
    }

    fn on_game_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::Win => self.show("LEVEL COMPLETE!  n: next level"),
            GameEvent::Lose => self.show("OUT OF MOVES  r: retry"),
            GameEvent::Reshuffle => self.show("RESHUFFLE!"),
            // The matching callout carries the text
            GameEvent::MultiMatch => {}
        }
    }

    fn on_effect(&mut self, effect: &Effect) {
        match *effect {
            Effect::Callout { callout, .. } => self.show(callout.text()),
            Effect::Shake { intensity } => {
                if intensity >= self.shake_intensity || self.shake_ms == 0 {
                    self.shake_intensity = intensity;
                }
                self.shake_ms = SHAKE_MS;
            }
            Effect::ScoreText { amount, tier, .. } => {
                let amount = match self.gain {
                    Some((prev, _)) => prev.amount.saturating_add(amount),
                    None => amount,
                };
                let tier = match (self.gain, tier) {
                    (Some((prev, _)), TextTier::Normal) => prev.tier,
                    _ => tier,
                };
                self.gain = Some((ScoreGain { amount, tier }, GAIN_MS));
            }
            Effect::Sound(SoundCue::Win) => self.bell = true,
            Effect::Sound(_) | Effect::Burst { .. } => {}
        }
    }
}
