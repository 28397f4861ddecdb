use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::Paragraph,
};

use crate::app::App;
use crate::chart::format_minutes;
use crate::types::Range;

use super::canvas::render_chart;
use super::helpers::{bold, clamp_name, panel};
use super::theme::Theme;

pub fn render_stats_panel(frame: &mut Frame, area: Rect, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(5)])
        .split(area);

    frame.render_widget(Paragraph::new(range_tabs_line(app.range)), layout[0]);

    if !app.has_records() {
        let empty = Paragraph::new(Text::from(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No records yet",
                bold(Theme::dim()),
            )),
            Line::from(Span::styled(
                "Run the timer and press c to record a session.",
                Style::default().fg(Theme::dim()),
            )),
        ]))
        .alignment(Alignment::Center)
        .block(panel(" Statistics "));
        frame.render_widget(empty, layout[1]);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),
            Constraint::Length(app.totals.len().max(1) as u16 + 3),
        ])
        .split(layout[1]);
    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[0]);

    render_chart(frame, charts[0], &app.bar_chart, panel(" Minutes "));
    render_chart(frame, charts[1], &app.pie_chart, panel(" Share "));

    let legend = Paragraph::new(build_legend(app))
        .style(Style::default().fg(Theme::text()))
        .block(panel(" Totals "));
    frame.render_widget(legend, rows[1]);
}

fn range_tabs_line(active: Range) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (index, range) in Range::ALL.iter().enumerate() {
        let style = if *range == active {
            Style::default()
                .fg(Theme::highlight())
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(Theme::dim())
        };
        spans.push(Span::styled(
            format!(" {} {} ", index + 1, range.label()),
            style,
        ));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn build_legend(app: &App) -> Text<'static> {
    if app.totals.is_empty() {
        return Text::from(Line::from(Span::styled(
            format!("Nothing recorded this {}.", app.range.label().to_lowercase()),
            Style::default().fg(Theme::dim()),
        )));
    }

    let sum = app.totals.sum().max(1) as f64;
    let mut lines = app
        .totals
        .iter()
        .map(|(subject, minutes)| {
            let color = app.subject_color(subject).unwrap_or(Theme::text());
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(color)),
                Span::styled(clamp_name(subject, 18), Style::default().fg(Theme::text())),
                Span::styled(
                    format!("{:>8}", format_minutes(minutes)),
                    Style::default().fg(Theme::accent()),
                ),
                Span::styled(
                    format!("{:>6.1}%", f64::from(minutes) / sum * 100.0),
                    Style::default().fg(Theme::dim()),
                ),
            ])
        })
        .collect::<Vec<_>>();

    let total = u32::try_from(app.totals.sum()).unwrap_or(u32::MAX);
    lines.push(Line::from(vec![
        Span::styled("  Total", bold(Theme::text())),
        Span::styled(format!("  {}", format_minutes(total)), bold(Theme::accent())),
    ]));
    Text::from(lines)
}
