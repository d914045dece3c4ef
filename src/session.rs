use std::collections::HashSet;
use std::time::Duration;

use crate::timers::Timers;

pub const INITIAL_SECS: u32 = 60;
pub const BONUS_SECS: u32 = 6;
pub const MESSAGE_TTL_MS: u64 = 2000;
pub const BONUS_TTL_MS: u64 = 1000;
pub const TICK_PERIOD_MS: u64 = 1000;

pub const NOT_RECOGNISED: &str = "Not a recognised Pokemon!";
pub const ALREADY_GUESSED: &str = "Already guessed!";

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum GameState {
    Idle,
    Playing,
    Ended,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Error,
    Bonus,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

impl Message {
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }
}

/// Timing rules, fixed for the lifetime of a game
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rules {
    pub initial_secs: u32,
    pub bonus_secs: u32,
    pub message_ttl: Duration,
    pub bonus_ttl: Duration,
    pub tick_period: Duration,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            initial_secs: INITIAL_SECS,
            bonus_secs: BONUS_SECS,
            message_ttl: Duration::from_millis(MESSAGE_TTL_MS),
            bonus_ttl: Duration::from_millis(BONUS_TTL_MS),
            tick_period: Duration::from_millis(TICK_PERIOD_MS),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Session {
    pub rules: Rules,
    pub state: GameState,
    pub time_left: u32,
    pub input: String,
    pub message: Option<Message>,
    pub bonus_active: bool,
    pub focus_requested: bool,
    pub timers: Timers,
    // Most recent first. Only mutated through `record_guess` so the key set
    // always mirrors it.
    guessed: Vec<String>,
    guessed_keys: HashSet<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}

impl Session {
    pub fn new(rules: Rules) -> Self {
        Self {
            rules,
            state: GameState::Idle,
            time_left: rules.initial_secs,
            input: String::new(),
            message: None,
            bonus_active: false,
            focus_requested: false,
            timers: Timers::new(),
            guessed: Vec::new(),
            guessed_keys: HashSet::new(),
        }
    }

    pub fn guessed(&self) -> &[String] {
        &self.guessed
    }

    pub fn has_guessed(&self, key: &str) -> bool {
        self.guessed_keys.contains(key)
    }

    /// Returns false, leaving the session untouched, if `key` was already guessed
    pub fn record_guess(&mut self, key: String, canonical: String) -> bool {
        if !self.guessed_keys.insert(key) {
            return false;
        }
        self.guessed.insert(0, canonical);
        true
    }

    pub fn score(&self) -> usize {
        self.guessed.len()
    }

    pub fn is_playing(&self) -> bool {
        self.state == GameState::Playing
    }

    /// Hands the pending focus request to the render surface, once
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }
}
