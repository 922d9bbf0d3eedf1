use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use crate::location::LocationQuery;
use crate::session::Session;

/// What a text prompt is collecting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    City,
    Ip,
}

impl PromptKind {
    pub fn label(self) -> &'static str {
        match self {
            PromptKind::City => "Search for Cities...",
            PromptKind::Ip => "Look up an IP address...",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing { kind: PromptKind, buffer: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

/// Keyboard state of the terminal UI
#[derive(Debug, Default)]
pub struct InputState {
    pub mode: InputMode,
    /// Last submitted search, shown in the header
    pub last_search: Option<String>,
}

impl InputState {
    pub fn handle_key(&mut self, key: KeyEvent, session: &mut Session) -> KeyOutcome {
        if key.kind != KeyEventKind::Press {
            return KeyOutcome::Continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyOutcome::Quit;
        }

        match &mut self.mode {
            InputMode::Normal => self.handle_normal(key.code, session),
            InputMode::Editing { kind, buffer } => {
                match key.code {
                    KeyCode::Esc => self.mode = InputMode::Normal,
                    KeyCode::Backspace => {
                        buffer.pop();
                    }
                    KeyCode::Char(c) => buffer.push(c),
                    KeyCode::Enter => {
                        let kind = *kind;
                        let text = buffer.trim().to_string();
                        self.mode = InputMode::Normal;
                        self.submit(kind, text, session);
                    }
                    _ => {}
                }
                KeyOutcome::Continue
            }
        }
    }

    fn handle_normal(&mut self, code: KeyCode, session: &mut Session) -> KeyOutcome {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return KeyOutcome::Quit,
            KeyCode::Left | KeyCode::Char('-') => {
                let radius = session.airports().radius().previous();
                session.set_radius(radius);
            }
            KeyCode::Right | KeyCode::Char('+') => {
                let radius = session.airports().radius().next();
                session.set_radius(radius);
            }
            KeyCode::Up | KeyCode::Char('k') => session.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => session.select_next(),
            KeyCode::Char('/') => self.open_prompt(PromptKind::City),
            KeyCode::Char('i') => self.open_prompt(PromptKind::Ip),
            KeyCode::Char('r') => {
                self.last_search = None;
                session.resolve(LocationQuery::Auto);
            }
            _ => {}
        }
        KeyOutcome::Continue
    }

    fn open_prompt(&mut self, kind: PromptKind) {
        self.mode = InputMode::Editing {
            kind,
            buffer: String::new(),
        };
    }

    fn submit(&mut self, kind: PromptKind, text: String, session: &mut Session) {
        if text.is_empty() {
            return;
        }
        debug!(kind = ?kind, text = %text, "Search submitted");
        match kind {
            PromptKind::City => session.search_city(&text),
            PromptKind::Ip => session.resolve(LocationQuery::Ip(text.clone())),
        }
        self.last_search = Some(text);
    }
}
