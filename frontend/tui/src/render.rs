//! TUI Rendering
//!
//! Translates `AppState` into Ratatui `Widget`s and draws to the terminal frame.

use cardcheck_core::FieldClass;
use image::RgbImage;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::AppState;
use crate::preview::image_lines;
use crate::screens::{CaptureState, FileIntakeState, ReviewState, ScreenState};

/// Main draw loop function.
pub fn draw_ui(f: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(6),    // Screen body
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Key hints
        ])
        .split(f.size());

    let title = Paragraph::new(state.screen().title())
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let status = match state.screen_state() {
        ScreenState::Landing => {
            draw_landing(f, chunks[1]);
            None
        }
        ScreenState::FileIntake(intake) => {
            draw_file_intake(f, chunks[1], intake);
            intake.status.as_deref()
        }
        ScreenState::LiveCapture(capture) => {
            draw_live_capture(f, chunks[1], capture);
            capture.status.as_deref()
        }
        ScreenState::Review(review) => {
            draw_review(f, chunks[1], review);
            review.status.as_deref()
        }
    };
    if let Some(status) = status {
        let line = Paragraph::new(status).style(Style::default().fg(Color::Yellow));
        f.render_widget(line, chunks[2]);
    }

    let hints = Paragraph::new(key_hints(state.screen_state())).style(Style::default().fg(Color::DarkGray));
    f.render_widget(hints, chunks[3]);

    if let Some(alert) = &state.alert {
        draw_alert(f, alert);
    }
}

fn key_hints(screen: &ScreenState) -> &'static str {
    match screen {
        ScreenState::Landing => "u: upload image  c: capture image  r: reload  q: quit",
        ScreenState::FileIntake(intake) if intake.can_submit() => {
            "Enter: load path  Ctrl+S: submit  Esc: back"
        }
        ScreenState::FileIntake(_) => "type a path  Enter: load  Esc: back",
        ScreenState::LiveCapture(capture) if capture.still.is_some() => {
            "Enter: submit  r: retake  Esc: back"
        }
        ScreenState::LiveCapture(_) => "Space: capture  Esc: back",
        ScreenState::Review(_) => "Tab/Shift+Tab: field  Enter: submit  Esc: back",
    }
}

fn draw_landing(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from("Verify an Aadhar card from a saved image or the camera."),
        Line::from(""),
        Line::from(vec![
            Span::styled("[u] ", Style::default().fg(Color::Cyan)),
            Span::raw("Upload Aadhar Card"),
        ]),
        Line::from(vec![
            Span::styled("[c] ", Style::default().fg(Color::Cyan)),
            Span::raw("Capture Aadhar Card"),
        ]),
    ];
    let body = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(body, area);
}

/// Draw `image` inside a bordered pane, or `placeholder` when there is none.
fn draw_image_pane(f: &mut Frame, area: Rect, title: &str, image: Option<&RgbImage>, guide: bool, placeholder: &str) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);
    let body = match image {
        Some(img) => Paragraph::new(image_lines(img, inner.width, inner.height, guide)),
        None => Paragraph::new(placeholder.to_string())
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
    };
    f.render_widget(body, inner);
}

fn draw_file_intake(f: &mut Frame, area: Rect, intake: &FileIntakeState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let title = if intake.pending.is_some() { "Image path (reading...)" } else { "Image path" };
    let input = Paragraph::new(intake.path_input.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().title(title).borders(Borders::ALL));
    f.render_widget(input, chunks[0]);

    let thumb = intake.loaded.as_ref().and_then(|l| l.thumbnail.as_ref());
    let placeholder = match &intake.loaded {
        Some(_) => "Image loaded (no preview)",
        None => "No image selected",
    };
    draw_image_pane(f, chunks[1], "Preview", thumb, false, placeholder);
}

fn draw_live_capture(f: &mut Frame, area: Rect, capture: &CaptureState) {
    if let Some(still) = &capture.still {
        draw_image_pane(f, area, "Captured image", still.thumbnail.as_ref(), false, "Captured (no preview)");
        return;
    }
    let title = match capture.source_name() {
        Some(name) => format!("Live: {name}"),
        None => "Live".to_string(),
    };
    let placeholder = if capture.is_streaming() { "Waiting for frames..." } else { "Camera not available" };
    draw_image_pane(f, area, &title, capture.preview(), true, placeholder);
}

fn draw_review(f: &mut Frame, area: Rect, review: &ReviewState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    draw_image_pane(f, chunks[0], "Card", review.image.thumbnail.as_ref(), false, "No preview");

    if !review.is_editable() {
        let loading = Paragraph::new("Extracting details...")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(loading, chunks[1]);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(chunks[1]);

    for (class, row) in FieldClass::ALL.into_iter().zip(rows.iter()) {
        let focused = class == review.focus;
        let style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let value = review.fields.get(class);
        let text = if focused && !review.is_submitting() {
            format!("{value}_")
        } else {
            value.to_string()
        };
        let field = Paragraph::new(text)
            .style(style)
            .block(Block::default().title(class.label()).borders(Borders::ALL).border_style(style));
        f.render_widget(field, *row);
    }
}

/// A rectangle of `width` x `height` cells centered in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn draw_alert(f: &mut Frame, message: &str) {
    let area = centered(f.size(), 40, 5);
    f.render_widget(Clear, area);
    let popup = Paragraph::new(vec![Line::from(message.to_string()), Line::from(""), Line::from("press any key")])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Green))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(popup, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::still_settings;
    use cardcheck_core::{ActiveImage, Detection, ExtractionResponse, Screen};
    use ratatui::{Terminal, backend::TestBackend};

    fn rendered(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| draw_ui(f, state)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn landing_offers_both_sources() {
        let state = AppState::new(still_settings());
        let screen = rendered(&state);
        assert!(screen.contains("Aadhar Card Verifier"));
        assert!(screen.contains("Upload Aadhar Card"));
        assert!(screen.contains("Capture Aadhar Card"));
    }

    #[test]
    fn review_shows_loading_then_fields() {
        let mut state = AppState::new(still_settings());
        let image = ActiveImage::from_bytes("image/png", &[1, 2, 3]).unwrap();
        let crate::app::Command::Extract { ticket, .. } = state.validate(image) else {
            panic!("validate must request extraction");
        };
        assert!(rendered(&state).contains("Extracting details..."));

        state.handle_event(crate::app::AppEvent::Extracted {
            ticket,
            result: Ok(ExtractionResponse {
                detections: vec![Detection {
                    class_name: "NAME".into(),
                    extracted_text: "Asha Rao".into(),
                    confidence: None,
                }],
            }),
        });
        assert_eq!(state.screen(), Screen::Review);
        let screen = rendered(&state);
        assert!(screen.contains("Aadhar No"));
        assert!(screen.contains("Asha Rao"));
    }

    #[test]
    fn alert_popup_is_drawn() {
        let mut state = AppState::new(still_settings());
        state.alert = Some(crate::app::SUBMITTED_ALERT.to_string());
        assert!(rendered(&state).contains("Submitted successfully!"));
    }
}
