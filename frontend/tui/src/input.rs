//! Keyboard Input Handler
//!
//! Processes crossterm key events per screen and updates `AppState`.

use cardcheck_core::Screen;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{AppState, Command};

fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

/// Handles a single keyboard event, returning async work to start, if any.
pub fn handle_key_event(key: KeyEvent, state: &mut AppState) -> Option<Command> {
    if is_ctrl(&key, 'c') {
        state.should_quit = true;
        return None;
    }
    // An open alert swallows the next key.
    if state.alert.take().is_some() {
        return None;
    }

    match state.screen() {
        Screen::Landing => handle_landing(key, state),
        Screen::FileIntake => handle_file_intake(key, state),
        Screen::LiveCapture => handle_live_capture(key, state),
        Screen::Review => handle_review(key, state),
    }
}

fn handle_landing(key: KeyEvent, state: &mut AppState) -> Option<Command> {
    match key.code {
        KeyCode::Char('u') | KeyCode::Char('1') => state.navigate(Screen::FileIntake),
        KeyCode::Char('c') | KeyCode::Char('2') => state.navigate(Screen::LiveCapture),
        KeyCode::Char('r') => {
            state.reload();
            None
        }
        KeyCode::Char('q') | KeyCode::Esc => {
            state.should_quit = true;
            None
        }
        _ => None,
    }
}

fn handle_file_intake(key: KeyEvent, state: &mut AppState) -> Option<Command> {
    if is_ctrl(&key, 's') {
        return state.intake_submit();
    }
    match key.code {
        KeyCode::Esc => state.navigate(Screen::Landing),
        KeyCode::Enter => state.intake_load(),
        KeyCode::Backspace => {
            if let Some(intake) = state.intake_mut() {
                intake.path_input.pop();
            }
            None
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(intake) = state.intake_mut() {
                intake.path_input.push(c);
            }
            None
        }
        _ => None,
    }
}

fn handle_live_capture(key: KeyEvent, state: &mut AppState) -> Option<Command> {
    if key.code == KeyCode::Esc {
        return state.navigate(Screen::Landing);
    }
    let has_still = state.capture_mut().is_some_and(|c| c.still.is_some());
    if has_still {
        match key.code {
            KeyCode::Enter => state.capture_submit(),
            _ if is_ctrl(&key, 's') => state.capture_submit(),
            KeyCode::Char('r') => {
                if let Some(capture) = state.capture_mut() {
                    capture.retake();
                }
                None
            }
            _ => None,
        }
    } else {
        if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
            if let Some(capture) = state.capture_mut() {
                capture.capture();
            }
        }
        None
    }
}

fn handle_review(key: KeyEvent, state: &mut AppState) -> Option<Command> {
    if is_ctrl(&key, 's') {
        return state.review_submit();
    }
    match key.code {
        KeyCode::Esc => state.navigate(Screen::Landing),
        KeyCode::Enter => state.review_submit(),
        KeyCode::Tab | KeyCode::Down => {
            if let Some(review) = state.review_mut() {
                review.focus_next();
            }
            None
        }
        KeyCode::BackTab | KeyCode::Up => {
            if let Some(review) = state.review_mut() {
                review.focus_previous();
            }
            None
        }
        KeyCode::Backspace => {
            if let Some(review) = state.review_mut() {
                review.backspace();
            }
            None
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(review) = state.review_mut() {
                review.push_char(c);
            }
            None
        }
        _ => None,
    }
}
