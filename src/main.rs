use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use dexrush::{
    app::App,
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore, Overrides},
    dictionary::Dictionary,
    error::DexError,
    game::Game,
    logging,
    runtime::{CrosstermEventSource, DexEventSource, FixedTicker, Runner, Ticker},
    ui,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

const TICK_RATE_MS: u64 = 100;

/// name as many pokemon as you can before the clock runs out
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type Pokemon names against a countdown. Every new correct name adds bonus seconds; repeats and unknown names just cost you time."
)]
pub struct Cli {
    /// seconds on the clock at the start of a game
    #[clap(short = 's', long)]
    seconds: Option<u32>,

    /// seconds added for each new correct name
    #[clap(short = 'b', long)]
    bonus: Option<u32>,

    /// json name list to play with instead of the builtin one
    #[clap(short = 'd', long)]
    dictionary: Option<PathBuf>,

    /// where to write the log
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// store the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            initial_secs: self.seconds,
            bonus_secs: self.bonus,
            dictionary: self.dictionary.clone(),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let log_path = cli.log_file.clone().unwrap_or_else(AppDirs::log_path);
    logging::init(&log_path)?;

    let store = FileConfigStore::new();
    let config = store.load().with_overrides(&cli.overrides());
    if cli.save_config {
        store.save(&config)?;
        tracing::info!(path = %store.path().display(), "config saved");
    }

    // Fail before the terminal is taken over
    let dictionary = match &config.dictionary {
        Some(path) => Dictionary::from_path(path)?,
        None => Dictionary::builtin()?,
    };

    if !stdin().is_tty() {
        return Err(DexError::NotATty.into());
    }

    let mut app = App::new(Game::new(dictionary, config.rules()));
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!(score = app.game.score(), total = app.game.total(), "exiting");
    result
}

fn start_tui<B: Backend, E: DexEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut runner: Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| draw(app, f))?;

    loop {
        let event = runner.step();
        let elapsed = runner.lap();

        if app.on_event(event, elapsed).is_break() {
            break;
        }

        terminal.draw(|f| draw(app, f))?;
    }

    Ok(())
}

fn draw(app: &App, f: &mut Frame) {
    let view = app.view();
    let area = f.area();

    f.render_widget(&view, area);
    if !app.input_focused() {
        return;
    }
    if let Some(position) = ui::cursor_position(area, &view) {
        f.set_cursor_position(position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use dexrush::runtime::DexEvent;
    use dexrush::session::Rules;
    use ratatui::{
        backend::TestBackend,
        layout::{Position, Rect},
    };

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["dexrush"]);

        assert_eq!(cli.seconds, None);
        assert_eq!(cli.bonus, None);
        assert_eq!(cli.dictionary, None);
        assert_eq!(cli.log_file, None);
        assert!(!cli.save_config);
        assert_eq!(cli.overrides(), Overrides::default());
    }

    #[test]
    fn test_cli_seconds_and_bonus() {
        let cli = Cli::parse_from(["dexrush", "-s", "90", "-b", "3"]);
        assert_eq!(cli.seconds, Some(90));
        assert_eq!(cli.bonus, Some(3));

        let cli = Cli::parse_from(["dexrush", "--seconds", "120", "--bonus", "10"]);
        assert_eq!(cli.overrides().initial_secs, Some(120));
        assert_eq!(cli.overrides().bonus_secs, Some(10));
    }

    #[test]
    fn test_cli_dictionary_and_log_file() {
        let cli = Cli::parse_from([
            "dexrush",
            "-d",
            "gen1.json",
            "--log-file",
            "/tmp/dex.log",
            "--save-config",
        ]);

        assert_eq!(cli.dictionary, Some(PathBuf::from("gen1.json")));
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/dex.log")));
        assert!(cli.save_config);
    }

    #[test]
    fn test_cli_rejects_negative_seconds() {
        assert!(Cli::try_parse_from(["dexrush", "-s", "-5"]).is_err());
    }

    #[test]
    fn test_draw_on_test_backend() {
        let dex = Dictionary::from_names("test", ["Pikachu"]);
        let mut app = App::new(Game::new(dex, Rules::default()));
        app.game.on_input_change("Pik");

        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|f| draw(&app, f)).unwrap();

        let rendered: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(rendered.contains("Pik"));
        assert!(rendered.contains("Score: 0 / 1"));
    }

    #[test]
    fn test_draw_places_cursor_only_while_focused() {
        let dex = Dictionary::from_names("test", ["Pikachu"]);
        let mut app = App::new(Game::new(dex, Rules::default()));
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        let area = Rect::new(0, 0, 60, 20);
        let expected = ui::cursor_position(area, &app.view()).unwrap();

        terminal.draw(|f| draw(&app, f)).unwrap();
        terminal.backend_mut().assert_cursor_position(expected);

        app.game.on_input_change("P");
        let _ = app.on_event(DexEvent::Tick, Duration::from_secs(60));
        assert!(!app.input_focused());

        // restarted behind the app's back: the input is back but unfocused
        app.game.start_game();
        terminal.set_cursor_position(Position::ORIGIN).unwrap();
        terminal.draw(|f| draw(&app, f)).unwrap();
        terminal.backend_mut().assert_cursor_position(Position::ORIGIN);

        let _ = app.on_event(DexEvent::Tick, Duration::ZERO);
        terminal.draw(|f| draw(&app, f)).unwrap();
        terminal.backend_mut().assert_cursor_position(expected);
    }
}
