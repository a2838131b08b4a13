use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseEventKind};

use crate::game::Direction;

/// How key presses should be read on the current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Characters go into the focused text field
    Typing,
    /// Arrows and WASD steer the snake
    Steering,
}

/// Screen-agnostic input the controller reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Steer(Direction),
    Text(char),
    Backspace,
    NextField,
    PrevField,
    Submit,
    /// Pointer press at a terminal cell
    Click { column: u16, row: u16 },
    /// Any other key press
    AnyKey,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_event(&self, event: &Event, mode: InputMode) -> UiEvent {
        match event {
            Event::Key(key) => self.handle_key_event(*key, mode),
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(_) => UiEvent::Click {
                    column: mouse.column,
                    row: mouse.row,
                },
                _ => UiEvent::None,
            },
            _ => UiEvent::None,
        }
    }

    pub fn handle_key_event(&self, key: KeyEvent, mode: InputMode) -> UiEvent {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') | KeyCode::Char('C') => UiEvent::Quit,
                _ if mode == InputMode::Steering => UiEvent::AnyKey,
                _ => UiEvent::None,
            };
        }

        match mode {
            InputMode::Typing => match key.code {
                KeyCode::Char(c) => UiEvent::Text(c),
                KeyCode::Backspace => UiEvent::Backspace,
                KeyCode::Tab => UiEvent::NextField,
                KeyCode::BackTab => UiEvent::PrevField,
                KeyCode::Enter => UiEvent::Submit,
                _ => UiEvent::AnyKey,
            },
            InputMode::Steering => match Self::steering_direction(key.code) {
                Some(direction) => UiEvent::Steer(direction),
                None => UiEvent::AnyKey,
            },
        }
    }

    fn steering_direction(code: KeyCode) -> Option<Direction> {
        match code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Up),
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Direction::Down),
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),
            _ => None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
