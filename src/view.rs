use crate::dictionary::Dictionary;
use crate::session::{GameState, MessageKind, Session};
use crate::util::format_clock;

pub const TITLE: &str = "Name Pokemon Until Failure";
pub const DANGER_SECS: u32 = 10;

const IDLE_PLACEHOLDER: &str = "Start typing to begin...";
const PLAYING_PLACEHOLDER: &str = "Name a Pokemon...";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputView {
    pub text: String,
    pub placeholder: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryView {
    pub headline: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: MessageKind,
    pub text: String,
}

/// Everything the render surface draws, derived from a session alone
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewModel {
    pub title: &'static str,
    pub clock: String,
    pub danger: bool,
    pub badge: Option<Notice>,
    pub score: usize,
    pub total: usize,
    pub message: Option<Notice>,
    /// Present until the game ends
    pub input: Option<InputView>,
    /// Present once the game ends
    pub summary: Option<SummaryView>,
    pub guessed: Vec<String>,
}

pub fn project(session: &Session, dictionary: &Dictionary) -> ViewModel {
    let ended = session.state == GameState::Ended;
    let score = session.score();

    let badge = session.bonus_active.then(|| Notice {
        kind: MessageKind::Bonus,
        text: format!("+{}", session.rules.bonus_secs),
    });

    let message = if ended {
        None
    } else {
        session.message.as_ref().map(|m| Notice {
            kind: m.kind,
            text: m.text.clone(),
        })
    };

    let input = (!ended).then(|| InputView {
        text: session.input.clone(),
        placeholder: if session.state == GameState::Idle {
            IDLE_PLACEHOLDER
        } else {
            PLAYING_PLACEHOLDER
        },
    });

    let summary = ended.then(|| SummaryView {
        headline: "Time's Up!",
        detail: format!("You named {score} Pokemon!"),
    });

    ViewModel {
        title: TITLE,
        clock: format_clock(session.time_left),
        danger: session.is_playing() && session.time_left <= DANGER_SECS,
        badge,
        score,
        total: dictionary.len(),
        message,
        input,
        summary,
        guessed: session.guessed().to_vec(),
    }
}
