use std::f64::consts::{FRAC_PI_2, TAU};

use super::{Anchor, INK, Surface};
use crate::color::ColorAssigner;
use crate::stats::Totals;

const RIM: f64 = 10.0;
const LABEL_RADIUS: f64 = 0.6;

#[derive(Clone, Debug, PartialEq)]
pub struct Wedge {
    pub subject: String,
    pub start: f64,
    pub sweep: f64,
    pub percent: u32,
    pub label_x: f64,
    pub label_y: f64,
}

/// Splits the circle into wedges starting at 12 o'clock, clockwise.
/// Returns nothing when the totals sum to zero.
pub fn wedges(totals: &Totals, (width, height): (f64, f64)) -> Vec<Wedge> {
    let total = totals.sum();
    if total == 0 {
        return Vec::new();
    }
    let total = total as f64;
    let (cx, cy, radius) = geometry(width, height);
    let label_radius = radius * LABEL_RADIUS;

    let mut angle = -FRAC_PI_2;
    totals
        .iter()
        .map(|(subject, minutes)| {
            let share = f64::from(minutes) / total;
            let sweep = share * TAU;
            let mid = angle + sweep / 2.0;
            let wedge = Wedge {
                subject: subject.to_string(),
                start: angle,
                sweep,
                percent: (share * 100.0).round() as u32,
                label_x: cx + mid.cos() * label_radius,
                label_y: cy + mid.sin() * label_radius,
            };
            angle += sweep;
            wedge
        })
        .collect()
}

pub fn draw<S: Surface>(surface: &mut S, totals: &Totals, colors: &mut ColorAssigner) {
    let (width, height) = surface.size();
    let (cx, cy, radius) = geometry(width, height);
    for (index, wedge) in wedges(totals, (width, height)).into_iter().enumerate() {
        let color = colors.color_for(&wedge.subject, index).to_color();
        surface.fill_wedge(cx, cy, radius, wedge.start, wedge.sweep, color);
        surface.text(
            wedge.label_x,
            wedge.label_y,
            &format!("{}%", wedge.percent),
            Anchor::Center,
            INK,
        );
    }
}

fn geometry(width: f64, height: f64) -> (f64, f64, f64) {
    let radius = (width.min(height) / 2.0 - RIM).max(0.0);
    (width / 2.0, height / 2.0, radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{DrawCmd, DrawList};

    fn totals(entries: &[(&str, u32)]) -> Totals {
        entries.iter().copied().collect()
    }

    #[test]
    fn sweeps_sum_to_full_circle() {
        let cases: [&[(&str, u32)]; 4] = [
            &[("Math", 1)],
            &[("Math", 30), ("English", 10)],
            &[("a", 7), ("b", 13), ("c", 1), ("d", 0)],
            &[("a", 1), ("b", 1), ("c", 1)],
        ];
        for case in cases {
            let sum: f64 = wedges(&totals(case), (220.0, 220.0)).iter().map(|w| w.sweep).sum();
            assert!((sum - TAU).abs() < 1e-9, "sum {sum} for {case:?}");
        }
    }

    #[test]
    fn wedges_are_contiguous_from_twelve_oclock() {
        let list = wedges(&totals(&[("Math", 30), ("English", 10)]), (220.0, 220.0));
        assert_eq!(list[0].start, -FRAC_PI_2);
        assert!((list[1].start - (list[0].start + list[0].sweep)).abs() < 1e-12);
        assert_eq!(list[0].percent, 75);
        assert_eq!(list[1].percent, 25);
    }

    #[test]
    fn label_sits_at_mid_angle() {
        let list = wedges(&totals(&[("Math", 1)]), (220.0, 220.0));
        // a full circle's mid-angle points straight down
        assert!((list[0].label_x - 110.0).abs() < 1e-9);
        assert!((list[0].label_y - (110.0 + 60.0)).abs() < 1e-9);
    }

    #[test]
    fn zero_total_draws_nothing() {
        let mut list = DrawList::new(220.0, 220.0);
        let mut colors = ColorAssigner::new();
        draw(&mut list, &totals(&[("Math", 0)]), &mut colors);
        draw(&mut list, &Totals::default(), &mut colors);
        assert!(list.commands().is_empty());
        assert_eq!(colors.len(), 0);
    }

    #[test]
    fn percentages_are_rounded() {
        let list = wedges(&totals(&[("a", 1), ("b", 2)]), (220.0, 220.0));
        assert_eq!(list[0].percent, 33);
        assert_eq!(list[1].percent, 67);
    }

    #[test]
    fn draw_uses_index_colors() {
        let mut list = DrawList::new(220.0, 220.0);
        let mut colors = ColorAssigner::new();
        draw(&mut list, &totals(&[("Math", 1), ("English", 1)]), &mut colors);
        let fills: Vec<_> = list
            .commands()
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCmd::Wedge { color, radius, .. } => Some((*color, *radius)),
                _ => None,
            })
            .collect();
        assert_eq!(fills.len(), 2);
        assert_eq!(fills[0].0, colors.color_for("Math", 9).to_color());
        assert_eq!(fills[1].0, colors.color_for("English", 9).to_color());
        assert_eq!(fills[0].1, 100.0);
    }
}
