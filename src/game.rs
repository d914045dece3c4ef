use std::time::Duration;

use crate::dictionary::Dictionary;
use crate::session::{GameState, Message, Rules, Session, ALREADY_GUESSED, NOT_RECOGNISED};
use crate::timers::{TimerHandle, TimerKind};

/// Everything that can change a session
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Restart,
    InputChanged(String),
    Submit(String),
    Elapsed(Duration),
    Teardown,
}

/// Applies one event to a session and returns the resulting session.
///
/// Events are processed one at a time and never block; scheduled callbacks
/// only run from inside `Elapsed`.
pub fn transition(dictionary: &Dictionary, mut session: Session, event: GameEvent) -> Session {
    match event {
        GameEvent::Restart => restart(session),
        GameEvent::InputChanged(text) => {
            input_changed(&mut session, text);
            session
        }
        GameEvent::Submit(text) => {
            submit(dictionary, &mut session, &text);
            session
        }
        GameEvent::Elapsed(elapsed) => {
            let until = session.timers.now() + elapsed;
            while let Some(handle) = session.timers.pop_due(until) {
                fire(&mut session, handle);
            }
            session.timers.settle(until);
            session
        }
        GameEvent::Teardown => {
            session.timers.cancel_all();
            tracing::debug!(state = %session.state, "session torn down");
            session
        }
    }
}

fn restart(mut previous: Session) -> Session {
    previous.timers.cancel_all();
    tracing::info!(previous_score = previous.score(), "game restarted");

    let mut session = Session::new(previous.rules);
    // Keep the clock and id sequence so no old handle can ever match again
    session.timers = previous.timers;
    session.focus_requested = true;
    session
}

fn input_changed(session: &mut Session, text: String) {
    match session.state {
        GameState::Ended => {}
        GameState::Idle => {
            let starting = !text.is_empty();
            session.input = text;
            if starting {
                session.state = GameState::Playing;
                session
                    .timers
                    .schedule_repeating(TimerKind::Countdown, session.rules.tick_period);
                tracing::info!(time_left = session.time_left, "game started");
            }
        }
        GameState::Playing => session.input = text,
    }
}

fn submit(dictionary: &Dictionary, session: &mut Session, text: &str) {
    if !session.is_playing() || text.trim().is_empty() {
        return;
    }

    let Some((key, canonical)) = dictionary.lookup(text) else {
        tracing::debug!(input = %text, "guess not recognised");
        show_error(session, NOT_RECOGNISED);
        return;
    };

    if session.has_guessed(&key) {
        tracing::debug!(%canonical, "guess already made");
        show_error(session, ALREADY_GUESSED);
        return;
    }

    session.record_guess(key, canonical.to_string());
    session.input.clear();
    session.message = None;
    session.timers.cancel(TimerKind::MessageClear);

    session.time_left = session.time_left.saturating_add(session.rules.bonus_secs);
    session.bonus_active = true;
    session
        .timers
        .schedule_once(TimerKind::BonusClear, session.rules.bonus_ttl);

    tracing::info!(
        %canonical,
        score = session.score(),
        time_left = session.time_left,
        "correct guess"
    );
}

fn show_error(session: &mut Session, text: &str) {
    session.message = Some(Message::error(text));
    session
        .timers
        .schedule_once(TimerKind::MessageClear, session.rules.message_ttl);
}

fn fire(session: &mut Session, handle: TimerHandle) {
    tracing::trace!(kind = %handle.kind, id = handle.id, "timer fired");

    match handle.kind {
        TimerKind::Countdown => {
            if !session.is_playing() {
                session.timers.cancel(TimerKind::Countdown);
                return;
            }
            if session.time_left <= 1 {
                session.time_left = 0;
                session.timers.cancel(TimerKind::Countdown);
                session.state = GameState::Ended;
                tracing::info!(score = session.score(), "time is up");
            } else {
                session.time_left -= 1;
            }
        }
        TimerKind::BonusClear => session.bonus_active = false,
        TimerKind::MessageClear => session.message = None,
    }
}

/// Owns the dictionary and the live session, feeding events through
/// [`transition`].
#[derive(Debug)]
pub struct Game {
    dictionary: Dictionary,
    session: Session,
}

impl Game {
    pub fn new(dictionary: Dictionary, rules: Rules) -> Self {
        Self {
            dictionary,
            session: Session::new(rules),
        }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn dispatch(&mut self, event: GameEvent) {
        let session = std::mem::take(&mut self.session);
        self.session = transition(&self.dictionary, session, event);
    }

    pub fn start_game(&mut self) {
        self.dispatch(GameEvent::Restart);
    }

    pub fn on_input_change(&mut self, text: impl Into<String>) {
        self.dispatch(GameEvent::InputChanged(text.into()));
    }

    pub fn on_submit(&mut self, text: impl Into<String>) {
        self.dispatch(GameEvent::Submit(text.into()));
    }

    /// Submits whatever is currently in the input buffer
    pub fn submit_input(&mut self) {
        let text = self.session.input.clone();
        self.on_submit(text);
    }

    pub fn advance(&mut self, elapsed: Duration) {
        self.dispatch(GameEvent::Elapsed(elapsed));
    }

    pub fn teardown(&mut self) {
        self.dispatch(GameEvent::Teardown);
    }

    pub fn state(&self) -> GameState {
        self.session.state
    }

    pub fn score(&self) -> usize {
        self.session.score()
    }

    pub fn total(&self) -> usize {
        self.dictionary.len()
    }
}
