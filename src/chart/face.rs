use std::f64::consts::{FRAC_PI_2, TAU};

use ratatui::style::Color;

use super::{Anchor, INK, Surface};
use crate::timer::TimerEngine;

pub const FACE_RADIUS: f64 = 90.0;
const TRACK: Color = Color::DarkGray;
const PROGRESS: Color = Color::LightBlue;

/// `MM:SS`; minutes are not wrapped into hours.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Draws the dial: background ring, countdown progress arc and the clock text.
pub fn draw<S: Surface>(surface: &mut S, engine: &TimerEngine) {
    let (width, height) = surface.size();
    let (cx, cy) = (width / 2.0, height / 2.0);

    surface.stroke_arc(cx, cy, FACE_RADIUS, -FRAC_PI_2, TAU, TRACK);
    if let Some(progress) = engine.progress() {
        if progress > 0.0 {
            surface.stroke_arc(cx, cy, FACE_RADIUS, -FRAC_PI_2, TAU * progress, PROGRESS);
        }
    }
    surface.text(
        cx,
        cy,
        &format_clock(engine.display_seconds()),
        Anchor::Center,
        INK,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{DrawCmd, DrawList};
    use crate::types::Mode;

    fn arcs(list: &DrawList) -> Vec<(f64, f64, Color)> {
        list.commands()
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCmd::Arc {
                    start, sweep, color, ..
                } => Some((*start, *sweep, *color)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn clock_text_is_minutes_and_seconds() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(3600), "60:00");
    }

    #[test]
    fn stopwatch_has_no_progress_arc() {
        let mut engine = TimerEngine::new(Mode::Stopwatch);
        engine.start();
        engine.tick();
        let mut list = DrawList::new(220.0, 220.0);
        draw(&mut list, &engine);
        assert_eq!(arcs(&list).len(), 1);
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["00:01"]);
    }

    #[test]
    fn countdown_arc_tracks_remaining_share() {
        let mut engine = TimerEngine::new(Mode::Countdown);
        engine.configure_duration(0, 4);
        engine.start();
        for _ in 0..60 {
            engine.tick();
        }
        let mut list = DrawList::new(220.0, 220.0);
        draw(&mut list, &engine);
        let arcs = arcs(&list);
        assert_eq!(arcs.len(), 2);
        assert_eq!(arcs[1].0, -FRAC_PI_2);
        assert!((arcs[1].1 - TAU * 0.75).abs() < 1e-12);
        assert_eq!(arcs[1].2, PROGRESS);
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["03:00"]);
    }

    #[test]
    fn finished_countdown_shows_track_only() {
        let mut engine = TimerEngine::new(Mode::Countdown);
        engine.configure_duration(0, 1);
        engine.start();
        for _ in 0..60 {
            engine.tick();
        }
        assert_eq!(engine.remaining_seconds(), 0);
        assert_eq!(engine.progress(), Some(0.0));

        let mut list = DrawList::new(220.0, 220.0);
        draw(&mut list, &engine);
        assert_eq!(arcs(&list), vec![(-FRAC_PI_2, TAU, TRACK)]);
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["00:00"]);
    }

    #[test]
    fn unconfigured_countdown_shows_track_only() {
        let engine = TimerEngine::new(Mode::Countdown);
        let mut list = DrawList::new(220.0, 220.0);
        draw(&mut list, &engine);
        assert_eq!(arcs(&list).len(), 1);
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["00:00"]);
    }
}
