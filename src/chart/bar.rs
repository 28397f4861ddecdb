use super::{Anchor, INK, Surface, format_minutes};
use crate::color::ColorAssigner;
use crate::stats::Totals;

pub const BAR_WIDTH: f64 = 40.0;
const LEFT_MARGIN: f64 = 20.0;
const BAR_STEP: f64 = 60.0;
const HEADROOM: f64 = 40.0;
const BASELINE_OFFSET: f64 = 25.0;
const NAME_OFFSET: f64 = 8.0;
const VALUE_GAP: f64 = 4.0;

#[derive(Clone, Debug, PartialEq)]
pub struct BarShape {
    pub subject: String,
    pub minutes: u32,
    pub x: f64,
    pub y: f64,
    pub height: f64,
}

/// Lays bars out left to right in iteration order. Bars past the surface
/// width are kept; the surface decides what is visible.
pub fn layout(totals: &Totals, surface_height: f64) -> Vec<BarShape> {
    let max = f64::from(totals.max().max(1));
    totals
        .iter()
        .enumerate()
        .map(|(index, (subject, minutes))| {
            let height = f64::from(minutes) / max * (surface_height - HEADROOM);
            BarShape {
                subject: subject.to_string(),
                minutes,
                x: LEFT_MARGIN + BAR_STEP * index as f64,
                y: surface_height - height - BASELINE_OFFSET,
                height,
            }
        })
        .collect()
}

pub fn draw<S: Surface>(surface: &mut S, totals: &Totals, colors: &mut ColorAssigner) {
    let (_, surface_height) = surface.size();
    for (index, bar) in layout(totals, surface_height).into_iter().enumerate() {
        let color = colors.color_for(&bar.subject, index).to_color();
        surface.fill_rect(bar.x, bar.y, BAR_WIDTH, bar.height, color);
        surface.text(
            bar.x,
            bar.y - VALUE_GAP,
            &format_minutes(bar.minutes),
            Anchor::Start,
            INK,
        );
        surface.text(
            bar.x,
            surface_height - NAME_OFFSET,
            &bar.subject,
            Anchor::Start,
            INK,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{DrawCmd, DrawList};

    fn totals(entries: &[(&str, u32)]) -> Totals {
        entries.iter().copied().collect()
    }

    #[test]
    fn tallest_bar_fills_the_scale() {
        let bars = layout(&totals(&[("Math", 90), ("English", 45)]), 220.0);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].x, 20.0);
        assert_eq!(bars[1].x, 80.0);
        assert_eq!(bars[0].height, 180.0);
        assert_eq!(bars[1].height, 90.0);
        assert_eq!(bars[0].y, 220.0 - 180.0 - 25.0);
        // every bar shares the same baseline
        for bar in &bars {
            assert_eq!(bar.y + bar.height, 195.0);
        }
    }

    #[test]
    fn all_zero_values_do_not_divide_by_zero() {
        let bars = layout(&totals(&[("Math", 0), ("English", 0)]), 220.0);
        assert!(bars.iter().all(|bar| bar.height == 0.0 && bar.y.is_finite()));
        assert!(layout(&Totals::default(), 220.0).is_empty());
    }

    #[test]
    fn bars_are_not_wrapped() {
        let many: Vec<(String, u32)> = (0..12).map(|i| (format!("s{i}"), 10)).collect();
        let totals: Totals = many.iter().map(|(s, m)| (s.as_str(), *m)).collect();
        let bars = layout(&totals, 220.0);
        assert_eq!(bars[11].x, 20.0 + 60.0 * 11.0);
    }

    #[test]
    fn draw_labels_value_and_subject() {
        let mut list = DrawList::new(400.0, 220.0);
        let mut colors = ColorAssigner::new();
        draw(&mut list, &totals(&[("Math", 65), ("English", 30)]), &mut colors);
        let texts: Vec<_> = list.texts().collect();
        assert_eq!(texts, vec!["1h5m", "Math", "30m", "English"]);
        let rects = list
            .commands()
            .iter()
            .filter(|cmd| matches!(cmd, DrawCmd::Rect { width, .. } if *width == BAR_WIDTH))
            .count();
        assert_eq!(rects, 2);
        assert_eq!(colors.len(), 2);
    }
}
