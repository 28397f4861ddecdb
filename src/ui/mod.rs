mod canvas;
mod help;
mod helpers;
mod stats;
mod theme;
mod timer;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    prelude::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Clear, Paragraph},
};

use crate::app::{App, AppView, DurationField, DurationPopup, SubjectPopup};
use theme::Theme;

use helpers::{bold, centered_rect, panel};

/// Renders the entire UI for a single frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    let header_lines = vec![Line::from(vec![
        Span::styled(
            "  studytick  ",
            Style::default().fg(Color::Black).bg(Theme::primary()),
        ),
        Span::raw(" "),
        Span::styled(
            "study timer",
            Style::default()
                .fg(Theme::secondary())
                .add_modifier(Modifier::BOLD),
        ),
    ])];
    let header = Paragraph::new(Text::from(header_lines))
        .alignment(Alignment::Left)
        .block(panel(""));
    frame.render_widget(header, layout[0]);

    match app.view {
        AppView::Help => {
            let body = Paragraph::new(help::build_help_text())
                .style(Style::default().fg(Theme::text()))
                .block(panel(" Help "));
            frame.render_widget(body, layout[1]);
        }
        AppView::Main => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                .split(layout[1]);
            timer::render_timer_panel(frame, columns[0], app);
            stats::render_stats_panel(frame, columns[1], app);
        }
    }

    let footer = Paragraph::new(Text::from(footer_line(app)))
        .alignment(Alignment::Left)
        .block(panel(""));
    frame.render_widget(footer, layout[2]);

    if let Some(popup) = &app.duration_popup {
        render_duration_popup(frame, popup);
    }
    if let Some(popup) = &app.subject_popup {
        render_subject_popup(frame, popup);
    }
}

fn footer_line(app: &App) -> Line<'static> {
    if let Some(status) = &app.status {
        return Line::from(Span::styled(
            format!(" {status}"),
            bold(Theme::paused()),
        ));
    }
    let hints = [
        ("s", "start"),
        ("x", "stop"),
        ("r", "reset"),
        ("c", "record"),
        ("m", "mode"),
        ("d", "duration"),
        ("a", "subject"),
        ("?", "help"),
        ("q", "quit"),
    ];
    let mut spans = vec![Span::raw(" ")];
    for (key, label) in hints {
        spans.push(Span::styled(key, bold(Theme::selection_marker())));
        spans.push(Span::styled(
            format!(" {label}  "),
            Style::default().fg(Theme::dim()),
        ));
    }
    Line::from(spans)
}

fn render_duration_popup(frame: &mut Frame, popup: &DurationPopup) {
    let area = centered_rect(50, 40, frame.area());
    frame.render_widget(Clear, area);

    let field_style = |field: DurationField| {
        if popup.field == field {
            bold(Theme::highlight())
        } else {
            Style::default().fg(Theme::text())
        }
    };
    let placeholder = |value: &str| {
        if value.is_empty() {
            "0".to_string()
        } else {
            value.to_string()
        }
    };

    let lines = vec![
        Line::from(Span::styled("Countdown duration", bold(Theme::accent()))),
        Line::from(""),
        Line::from(vec![
            Span::styled("Hours:   ", Style::default().fg(Theme::dim())),
            Span::styled(placeholder(&popup.hours), field_style(DurationField::Hours)),
        ]),
        Line::from(vec![
            Span::styled("Minutes: ", Style::default().fg(Theme::dim())),
            Span::styled(
                placeholder(&popup.minutes),
                field_style(DurationField::Minutes),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Digits to edit. Tab: switch field. Enter: save. Esc: cancel.",
            Style::default().fg(Theme::dim()),
        )),
    ];

    let widget = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Left)
        .block(panel(" Duration "));
    frame.render_widget(widget, area);
}

fn render_subject_popup(frame: &mut Frame, popup: &SubjectPopup) {
    let area = centered_rect(50, 30, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled("New subject", bold(Theme::accent()))),
        Line::from(""),
        Line::from(vec![
            Span::styled("Name: ", Style::default().fg(Theme::dim())),
            Span::styled(popup.name.clone(), bold(Theme::highlight())),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Type a name. Enter: save. Esc: cancel.",
            Style::default().fg(Theme::dim()),
        )),
    ];

    let widget = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Left)
        .block(panel(" Subject "));
    frame.render_widget(widget, area);
}
