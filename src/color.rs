/// Subject color assignment for the charts.
use std::collections::HashMap;
use std::fmt;

use ratatui::style::Color;

const SATURATION: f64 = 0.70;
const LIGHTNESS: f64 = 0.55;

/// A chart color expressed as a hue at fixed saturation/lightness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubjectColor {
    pub hue: u16,
}

impl SubjectColor {
    pub fn to_rgb(self) -> (u8, u8, u8) {
        hsl_to_rgb(f64::from(self.hue), SATURATION, LIGHTNESS)
    }

    pub fn to_color(self) -> Color {
        let (r, g, b) = self.to_rgb();
        Color::Rgb(r, g, b)
    }
}

impl fmt::Display for SubjectColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({},{}%,{}%)",
            self.hue,
            (SATURATION * 100.0).round(),
            (LIGHTNESS * 100.0).round()
        )
    }
}

/// Binds each subject to a color the first time it is drawn.
///
/// The hue comes from the position the subject had in that first draw, so
/// the binding is first-seen-wins: later calls ignore the index.
#[derive(Debug, Default)]
pub struct ColorAssigner {
    table: HashMap<String, SubjectColor>,
}

impl ColorAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color_for(&mut self, subject: &str, index: usize) -> SubjectColor {
        if let Some(color) = self.table.get(subject) {
            return *color;
        }
        let color = SubjectColor {
            hue: ((index * 60) % 360) as u16,
        };
        self.table.insert(subject.to_string(), color);
        color
    }

    pub fn get(&self, subject: &str) -> Option<SubjectColor> {
        self.table.get(subject).copied()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }
}

fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let sector = (hue / 60.0) % 6.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u8 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (channel(r), channel(g), channel(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_seen_index_wins() {
        let mut colors = ColorAssigner::new();
        let first = colors.color_for("Math", 0);
        let again = colors.color_for("Math", 3);
        assert_eq!(first, again);
        assert_eq!(first.hue, 0);
        assert_eq!(colors.len(), 1);
    }

    #[test]
    fn hue_wraps_every_six_subjects() {
        let mut colors = ColorAssigner::new();
        assert_eq!(colors.color_for("a", 1).hue, 60);
        assert_eq!(colors.color_for("b", 5).hue, 300);
        assert_eq!(colors.color_for("c", 6).hue, 0);
        assert_eq!(colors.color_for("d", 7).hue, 60);
    }

    #[test]
    fn table_only_grows() {
        let mut colors = ColorAssigner::new();
        colors.color_for("a", 0);
        colors.color_for("b", 1);
        colors.color_for("a", 2);
        assert_eq!(colors.len(), 2);
    }

    #[test]
    fn hsl_conversion_matches_css() {
        // hsl(0,70%,55%) == rgb(221,60,60)
        assert_eq!(SubjectColor { hue: 0 }.to_rgb(), (221, 60, 60));
        assert_eq!(SubjectColor { hue: 120 }.to_rgb(), (60, 221, 60));
        assert_eq!(SubjectColor { hue: 240 }.to_string(), "hsl(240,70%,55%)");
    }
}
