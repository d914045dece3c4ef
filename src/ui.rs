use std::rc::Rc;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::session::MessageKind;
use crate::util::grid_columns;
use crate::view::{Notice, ViewModel};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const GRID_GAP: u16 = 2;

const TITLE: usize = 0;
const TIMER: usize = 2;
const SCORE: usize = 3;
const MESSAGE: usize = 5;
const INPUT: usize = 6;
const GUESSED: usize = 7;

fn chunks(area: Rect, ended: bool) -> Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1),                         // title
            Constraint::Length(1),                         // padding
            Constraint::Length(1),                         // timer + badge
            Constraint::Length(1),                         // score
            Constraint::Length(1),                         // padding
            Constraint::Length(1),                         // message
            Constraint::Length(if ended { 4 } else { 3 }), // input or summary
            Constraint::Min(0),                            // guessed grid
        ])
        .split(area)
}

fn notice_style(notice: &Notice) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match notice.kind {
        MessageKind::Error => bold.fg(Color::Red),
        MessageKind::Bonus => bold.fg(Color::Green),
    }
}

/// Where the terminal cursor belongs: the end of the typed text
pub fn cursor_position(area: Rect, view: &ViewModel) -> Option<Position> {
    let input = view.input.as_ref()?;
    let chunk = chunks(area, false)[INPUT];
    if chunk.width < 3 || chunk.height < 3 {
        return None;
    }

    let max_x = chunk.x + chunk.width - 2;
    let typed = u16::try_from(input.text.width()).unwrap_or(u16::MAX);
    let x = (chunk.x + 1).saturating_add(typed).min(max_x);
    Some(Position::new(x, chunk.y + 1))
}

impl Widget for &ViewModel {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = chunks(area, self.summary.is_some());

        Paragraph::new(Span::styled(self.title, bold_style.fg(Color::Yellow)))
            .alignment(Alignment::Center)
            .render(chunks[TITLE], buf);

        let timer_style = if self.danger {
            bold_style.fg(Color::Red).add_modifier(Modifier::SLOW_BLINK)
        } else {
            bold_style
        };
        let mut timer = vec![Span::styled(self.clock.clone(), timer_style)];
        if let Some(badge) = &self.badge {
            timer.push(Span::raw(" "));
            timer.push(Span::styled(badge.text.clone(), notice_style(badge)));
        }
        Paragraph::new(Line::from(timer))
            .alignment(Alignment::Center)
            .render(chunks[TIMER], buf);

        Paragraph::new(Line::from(vec![
            Span::raw("Score: "),
            Span::styled(self.score.to_string(), bold_style.fg(Color::Cyan)),
            Span::styled(format!(" / {}", self.total), dim_style),
        ]))
        .alignment(Alignment::Center)
        .render(chunks[SCORE], buf);

        if let Some(message) = &self.message {
            Paragraph::new(Span::styled(message.text.clone(), notice_style(message)))
                .alignment(Alignment::Center)
                .render(chunks[MESSAGE], buf);
        }

        if let Some(input) = &self.input {
            let text = if input.text.is_empty() {
                Span::styled(input.placeholder, dim_style.patch(italic_style))
            } else {
                Span::styled(input.text.clone(), bold_style)
            };
            Paragraph::new(text)
                .block(Block::default().borders(Borders::ALL))
                .render(chunks[INPUT], buf);
        }

        if let Some(summary) = &self.summary {
            Paragraph::new(vec![
                Line::from(Span::styled(summary.headline, bold_style.fg(Color::Magenta))),
                Line::from(Span::raw(summary.detail.clone())),
                Line::from(""),
                Line::from(Span::styled("(enter/r) play again / (esc)ape", italic_style)),
            ])
            .alignment(Alignment::Center)
            .render(chunks[INPUT], buf);
        }

        if !self.guessed.is_empty() {
            render_guessed(&self.guessed, chunks[GUESSED], buf);
        }
    }
}

fn render_guessed(guessed: &[String], area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .borders(Borders::TOP)
        .title(format!("Guessed ({})", guessed.len()));
    let inner = block.inner(area);
    block.render(area, buf);

    let (columns, cell) = grid_columns(guessed, inner.width, GRID_GAP);
    let gap = " ".repeat(GRID_GAP as usize);

    let lines: Vec<Line> = guessed
        .chunks(columns)
        .map(|row| {
            let cells: Vec<String> = row
                .iter()
                .map(|name| {
                    let pad = (cell as usize).saturating_sub(name.width());
                    format!("{name}{}", " ".repeat(pad))
                })
                .collect();
            Line::from(cells.join(gap.as_str()))
        })
        .collect();

    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .render(inner, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Dictionary;
    use crate::game::Game;
    use crate::session::{GameState, Rules};
    use crate::view::project;
    use std::time::Duration;

    fn render(view: &ViewModel, area: Rect) -> String {
        let mut buffer = Buffer::empty(area);
        view.render(area, &mut buffer);
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    fn game() -> Game {
        let dex = Dictionary::from_names("test", ["Pikachu", "Bulbasaur", "Mr. Mime"]);
        Game::new(dex, Rules::default())
    }

    fn view(game: &Game) -> ViewModel {
        project(game.session(), game.dictionary())
    }

    #[test]
    fn test_idle_screen() {
        let game = game();
        let rendered = render(&view(&game), Rect::new(0, 0, 80, 24));

        assert!(rendered.contains("Name Pokemon Until Failure"));
        assert!(rendered.contains("1:00"));
        assert!(rendered.contains("Score: 0 / 3"));
        assert!(rendered.contains("Start typing to begin..."));
        assert!(!rendered.contains("Guessed"));
    }

    #[test]
    fn test_playing_screen_shows_badge_and_grid() {
        let mut game = game();
        game.on_input_change("P");
        game.on_submit("Pikachu");
        game.on_submit("Bulbasaur");

        let rendered = render(&view(&game), Rect::new(0, 0, 80, 24));

        assert!(rendered.contains("1:12 +6"));
        assert!(rendered.contains("Score: 2 / 3"));
        assert!(rendered.contains("Name a Pokemon..."));
        assert!(rendered.contains("Guessed (2)"));
        assert!(rendered.contains("Bulbasaur  Pikachu"));
    }

    #[test]
    fn test_error_message_is_rendered_in_red() {
        let mut game = game();
        game.on_input_change("x");
        game.on_submit("Charmander");

        let area = Rect::new(0, 0, 80, 24);
        let view = view(&game);
        let mut buffer = Buffer::empty(area);
        (&view).render(area, &mut buffer);

        let row = chunks(area, false)[MESSAGE].y;
        let line: String = (0..area.width)
            .map(|x| buffer[(x, row)].symbol().to_string())
            .collect();
        assert!(line.contains("Not a recognised Pokemon!"));

        let start = line.find('N').unwrap() as u16;
        assert_eq!(buffer[(start, row)].fg, Color::Red);
    }

    #[test]
    fn test_ended_screen_shows_summary() {
        let mut game = game();
        game.on_input_change("P");
        game.on_submit("Pikachu");
        game.advance(Duration::from_secs(100));
        assert_eq!(game.state(), GameState::Ended);

        let rendered = render(&view(&game), Rect::new(0, 0, 80, 24));

        assert!(rendered.contains("0:00"));
        assert!(rendered.contains("Time's Up!"));
        assert!(rendered.contains("You named 1 Pokemon!"));
        assert!(!rendered.contains("Name a Pokemon..."));
    }

    #[test]
    fn test_cursor_follows_typed_text() {
        let mut game = game();
        let area = Rect::new(0, 0, 80, 24);

        let idle = cursor_position(area, &view(&game)).unwrap();
        game.on_input_change("Pika");
        let typed = cursor_position(area, &view(&game)).unwrap();

        assert_eq!(typed.x, idle.x + 4);
        assert_eq!(typed.y, idle.y);
    }

    #[test]
    fn test_cursor_stays_inside_box_for_huge_input() {
        let mut game = game();
        game.on_input_change("m".repeat(70_000));
        let area = Rect::new(0, 0, 80, 24);
        let chunk = chunks(area, false)[INPUT];

        let cursor = cursor_position(area, &view(&game)).unwrap();
        assert_eq!(cursor.x, chunk.x + chunk.width - 2);
    }

    #[test]
    fn test_no_cursor_once_ended() {
        let mut game = game();
        game.on_input_change("P");
        game.advance(Duration::from_secs(61));

        assert_eq!(cursor_position(Rect::new(0, 0, 80, 24), &view(&game)), None);
    }

    #[test]
    fn test_extreme_sizes() {
        let mut game = game();
        game.on_input_change("P");
        game.on_submit("Mr. Mime");
        let view = view(&game);

        for area in [
            Rect::new(0, 0, 10, 5),
            Rect::new(0, 0, 1, 1),
            Rect::new(0, 0, 80, 24),
            Rect::new(0, 0, 500, 200),
        ] {
            let mut buffer = Buffer::empty(area);
            (&view).render(area, &mut buffer);
            assert_eq!(*buffer.area(), area);
            let _ = cursor_position(area, &view);
        }
    }
}
