use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::Paragraph,
};

use crate::app::App;
use crate::chart::face::format_clock;
use crate::timer::TimerStatus;
use crate::types::Mode;

use super::canvas::render_chart;
use super::helpers::{bold, clamp_name, panel};
use super::theme::Theme;

pub fn render_timer_panel(frame: &mut Frame, area: Rect, app: &App) {
    let subject_rows = app.settings.subjects.len().max(1) as u16;
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),
            Constraint::Length(4),
            Constraint::Length(subject_rows + 2),
        ])
        .split(area);

    render_chart(frame, layout[0], &app.face, panel(" Timer "));

    let details = Paragraph::new(build_timer_details(app))
        .style(Style::default().fg(Theme::text()))
        .block(panel(" Session "));
    frame.render_widget(details, layout[1]);

    let subjects = Paragraph::new(build_subject_list(app))
        .style(Style::default().fg(Theme::text()))
        .block(panel(" Subjects "));
    frame.render_widget(subjects, layout[2]);
}

fn build_timer_details(app: &App) -> Text<'static> {
    let engine = &app.engine;
    let (state_label, state_color) = match engine.status() {
        TimerStatus::Idle => ("idle", Theme::dim()),
        TimerStatus::Running => ("running", Theme::active()),
        TimerStatus::Stopped => ("stopped", Theme::paused()),
    };

    let mode_line = Line::from(vec![
        Span::styled("Mode: ", Style::default().fg(Theme::dim())),
        Span::styled(engine.mode().label(), bold(Theme::accent())),
        Span::raw("   "),
        Span::styled("State: ", Style::default().fg(Theme::dim())),
        Span::styled(state_label, bold(state_color)),
    ]);

    let progress_line = match engine.mode() {
        Mode::Countdown => Line::from(vec![
            Span::styled("Remaining ", Style::default().fg(Theme::dim())),
            Span::styled(
                format_clock(engine.remaining_seconds()),
                Style::default().fg(Theme::text()),
            ),
            Span::styled(" of ", Style::default().fg(Theme::dim())),
            Span::styled(
                format_clock(engine.total_seconds()),
                Style::default().fg(Theme::text()),
            ),
        ]),
        Mode::Stopwatch => Line::from(vec![
            Span::styled("Elapsed ", Style::default().fg(Theme::dim())),
            Span::styled(
                format_clock(engine.elapsed_seconds()),
                Style::default().fg(Theme::text()),
            ),
        ]),
    };

    Text::from(vec![mode_line, progress_line])
}

fn build_subject_list(app: &App) -> Text<'static> {
    if app.settings.subjects.is_empty() {
        return Text::from(Line::from(Span::styled(
            "No subjects. Press a to add one.",
            Style::default().fg(Theme::dim()),
        )));
    }

    let lines = app
        .settings
        .subjects
        .iter()
        .enumerate()
        .map(|(index, subject)| {
            let selected = index == app.selected_subject_index;
            let marker_style = if selected {
                bold(Theme::selection_marker())
            } else {
                Style::default().fg(Theme::dim())
            };
            let name_style = if selected {
                Style::default()
                    .fg(Theme::highlight())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Theme::text())
            };
            Line::from(vec![
                Span::styled(if selected { "> " } else { "  " }, marker_style),
                Span::styled(clamp_name(subject, 24), name_style),
            ])
        })
        .collect::<Vec<_>>();
    Text::from(lines)
}
