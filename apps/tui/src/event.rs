use crate::app::Action;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use std::time::Duration;

/// Polls crossterm for key presses on behalf of the canvas loop.
pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    /// Waits at most 250 ms for a key press. An idle wait, a key release or an unbound key
    /// yields `Action::Tick` so the loop redraws and polls again.
    pub fn next(&self, input_mode: bool) -> Result<Action> {
        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(map_key(key, input_mode));
                }
            }
        }
        Ok(Action::Tick)
    }
}

/// While typing every printable key goes to the buffer; otherwise keys are commands.
pub fn map_key(key: KeyEvent, input_mode: bool) -> Action {
    if input_mode {
        return match key.code {
            KeyCode::Enter => Action::CommitInput,
            KeyCode::Esc => Action::CancelInput,
            KeyCode::Backspace => Action::Backspace,
            KeyCode::Char(ch) => Action::InputChar(ch),
            _ => Action::Tick,
        };
    }
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Tab | KeyCode::Down | KeyCode::Right | KeyCode::Char('j') => Action::Next,
        KeyCode::BackTab | KeyCode::Up | KeyCode::Left | KeyCode::Char('k') => Action::Prev,
        KeyCode::Enter => Action::BeginEdit,
        KeyCode::Char('s') => Action::Submit,
        KeyCode::Char('a') => Action::AddCompetitor,
        KeyCode::Char('f') => Action::AddFeature,
        KeyCode::Char('x') => Action::RemoveFocused,
        KeyCode::Char('e') => Action::ReturnToEdit,
        KeyCode::Char('r') => Action::Reset,
        _ => Action::Tick,
    }
}
