use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::theme::Theme;

pub fn build_help_text() -> Text<'static> {
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        "Key bindings",
        Style::default()
            .fg(Theme::accent())
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    lines.push(section_title("Global"));
    lines.extend(section_lines(&["q: Quit", "?/esc: Toggle help"]));

    lines.push(Line::from(""));
    lines.push(section_title("Timer"));
    lines.extend(section_lines(&[
        "s/space: Start or resume",
        "x: Stop",
        "r: Reset",
        "c: Record elapsed minutes for the selected subject",
        "m: Switch between timer and stopwatch",
        "d: Set countdown duration",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("Subjects"));
    lines.extend(section_lines(&["Up/Down: Select subject", "a: Add subject"]));

    lines.push(Line::from(""));
    lines.push(section_title("Statistics"));
    lines.extend(section_lines(&[
        "1/2/3: Day, week or month",
        "Tab/Right: Next range",
        "Shift+Tab/Left: Previous range",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("Popups"));
    lines.extend(section_lines(&[
        "Duration: digits edit, Tab switch field, Enter save, Esc cancel",
        "New subject: type a name, Enter save, Esc cancel",
    ]));

    Text::from(lines)
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(Theme::secondary())
            .add_modifier(Modifier::BOLD),
    ))
}

fn section_lines(items: &[&str]) -> Vec<Line<'static>> {
    items
        .iter()
        .map(|item| {
            Line::from(Span::styled(
                format!("  - {item}"),
                Style::default().fg(Theme::text()),
            ))
        })
        .collect()
}
