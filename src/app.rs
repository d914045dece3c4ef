use std::ops::ControlFlow;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::game::Game;
use crate::runtime::DexEvent;
use crate::session::GameState;
use crate::view::{project, ViewModel};

/// What a key press means for the game
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Type(char),
    Backspace,
    Submit,
    Restart,
    Quit,
    Ignore,
}

pub fn map_key(key: KeyEvent, state: GameState) -> Command {
    if key.kind == KeyEventKind::Release {
        return Command::Ignore;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        // ctrl+c to quit
        return match key.code {
            KeyCode::Char('c') => Command::Quit,
            _ => Command::Ignore,
        };
    }

    match (state, key.code) {
        (_, KeyCode::Esc) => Command::Quit,
        (GameState::Ended, KeyCode::Enter | KeyCode::Char('r')) => Command::Restart,
        (GameState::Ended, _) => Command::Ignore,
        (_, KeyCode::Enter) => Command::Submit,
        (_, KeyCode::Backspace) => Command::Backspace,
        (_, KeyCode::Char(c)) => Command::Type(c),
        _ => Command::Ignore,
    }
}

/// Binds terminal events to the game controller
#[derive(Debug)]
pub struct App {
    pub game: Game,
    input_focused: bool,
}

impl App {
    /// The input starts focused, as on launch
    pub fn new(game: Game) -> Self {
        Self {
            game,
            input_focused: true,
        }
    }

    /// Whether the input line holds the terminal cursor
    pub fn input_focused(&self) -> bool {
        self.input_focused
    }

    // An ended game hides the input and drops focus; only a restart's focus
    // request brings it back.
    fn sync_focus(&mut self) {
        if self.game.session_mut().take_focus_request() {
            self.input_focused = true;
        }
        if self.game.state() == GameState::Ended {
            self.input_focused = false;
        }
    }

    pub fn view(&self) -> ViewModel {
        project(self.game.session(), self.game.dictionary())
    }

    pub fn apply(&mut self, command: Command) -> ControlFlow<()> {
        match command {
            Command::Type(c) => {
                let mut text = self.game.session().input.clone();
                text.push(c);
                self.game.on_input_change(text);
            }
            Command::Backspace => {
                let mut text = self.game.session().input.clone();
                if text.pop().is_some() {
                    self.game.on_input_change(text);
                }
            }
            Command::Submit => self.game.submit_input(),
            Command::Restart => self.game.start_game(),
            Command::Quit => {
                self.game.teardown();
                return ControlFlow::Break(());
            }
            Command::Ignore => {}
        }
        self.sync_focus();
        ControlFlow::Continue(())
    }

    pub fn on_key(&mut self, key: KeyEvent) -> ControlFlow<()> {
        let command = map_key(key, self.game.state());
        self.apply(command)
    }

    /// Feeds one runner event in, with the wall time that passed since the
    /// previous one. Time is advanced before the event is applied.
    pub fn on_event(&mut self, event: DexEvent, elapsed: Duration) -> ControlFlow<()> {
        self.game.advance(elapsed);
        self.sync_focus();
        match event {
            DexEvent::Key(key) => self.on_key(key),
            DexEvent::Resize | DexEvent::Tick => ControlFlow::Continue(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Dictionary;
    use crate::session::Rules;
    use assert_matches::assert_matches;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        let dex = Dictionary::from_names("test", ["Pikachu", "Eevee"]);
        App::new(Game::new(dex, Rules::default()))
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            let _ = app.on_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_map_key_while_playing() {
        let state = GameState::Playing;
        assert_eq!(map_key(key(KeyCode::Char('r')), state), Command::Type('r'));
        assert_eq!(map_key(key(KeyCode::Enter), state), Command::Submit);
        assert_eq!(map_key(key(KeyCode::Backspace), state), Command::Backspace);
        assert_eq!(map_key(key(KeyCode::Esc), state), Command::Quit);
        assert_eq!(map_key(key(KeyCode::Left), state), Command::Ignore);
    }

    #[test]
    fn test_map_key_once_ended() {
        let state = GameState::Ended;
        assert_eq!(map_key(key(KeyCode::Char('r')), state), Command::Restart);
        assert_eq!(map_key(key(KeyCode::Enter), state), Command::Restart);
        assert_eq!(map_key(key(KeyCode::Char('x')), state), Command::Ignore);
        assert_eq!(map_key(key(KeyCode::Esc), state), Command::Quit);
    }

    #[test]
    fn test_map_key_ctrl_c_quits() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_c, GameState::Idle), Command::Quit);

        let ctrl_x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL);
        assert_eq!(map_key(ctrl_x, GameState::Idle), Command::Ignore);
    }

    #[test]
    fn test_typing_starts_and_submits() {
        let mut app = app();
        type_str(&mut app, "eevee");
        assert_eq!(app.game.state(), GameState::Playing);
        assert_eq!(app.game.session().input, "eevee");

        let _ = app.on_key(key(KeyCode::Enter));
        assert_eq!(app.game.session().guessed(), ["Eevee"]);
        assert!(app.game.session().input.is_empty());
    }

    #[test]
    fn test_backspace_edits_buffer() {
        let mut app = app();
        type_str(&mut app, "pik");
        let _ = app.on_key(key(KeyCode::Backspace));
        assert_eq!(app.game.session().input, "pi");

        let _ = app.on_key(key(KeyCode::Backspace));
        let _ = app.on_key(key(KeyCode::Backspace));
        let _ = app.on_key(key(KeyCode::Backspace));
        assert_eq!(app.game.session().input, "");
        assert_eq!(app.game.state(), GameState::Playing);
    }

    #[test]
    fn test_quit_tears_down_timers() {
        let mut app = app();
        type_str(&mut app, "p");

        assert_matches!(app.on_key(key(KeyCode::Esc)), ControlFlow::Break(()));
        assert!(!app.game.session().timers.has_pending());
    }

    #[test]
    fn test_restart_from_ended() {
        let mut app = app();
        type_str(&mut app, "p");
        let _ = app.on_event(DexEvent::Tick, Duration::from_secs(60));
        assert_eq!(app.game.state(), GameState::Ended);

        // typing does nothing until restart
        type_str(&mut app, "x");
        assert_eq!(app.game.state(), GameState::Ended);

        let _ = app.on_key(key(KeyCode::Char('r')));
        assert_eq!(app.game.state(), GameState::Idle);
        assert_eq!(app.view().clock, "1:00");
    }

    #[test]
    fn test_input_focus_follows_game_over_and_restart() {
        let mut app = app();
        assert!(app.input_focused());

        type_str(&mut app, "p");
        assert!(app.input_focused());

        let _ = app.on_event(DexEvent::Tick, Duration::from_secs(60));
        assert!(!app.input_focused());

        let _ = app.on_key(key(KeyCode::Enter));
        assert!(app.input_focused());
        assert!(!app.game.session().focus_requested);
    }
}
