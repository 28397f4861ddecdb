//! Chart geometry for the statistics panel and the timer face.
//!
//! Renderers draw through [`Surface`], a small set of primitive calls in a
//! logical pixel space with the origin at the top-left and y growing
//! downwards. Angles are radians measured from the positive x axis, so with
//! y pointing down a positive sweep runs clockwise and `-PI / 2` is
//! 12 o'clock.
pub mod bar;
pub mod face;
pub mod pie;

use ratatui::style::Color;

/// Color used for labels drawn on top of charts.
pub const INK: Color = Color::White;

pub trait Surface {
    fn size(&self) -> (f64, f64);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color);
    fn fill_wedge(&mut self, cx: f64, cy: f64, radius: f64, start: f64, sweep: f64, color: Color);
    fn stroke_arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, sweep: f64, color: Color);
    fn text(&mut self, x: f64, y: f64, text: &str, anchor: Anchor, color: Color);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Center,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCmd {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    },
    Wedge {
        cx: f64,
        cy: f64,
        radius: f64,
        start: f64,
        sweep: f64,
        color: Color,
    },
    Arc {
        cx: f64,
        cy: f64,
        radius: f64,
        start: f64,
        sweep: f64,
        color: Color,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        anchor: Anchor,
        color: Color,
    },
}

/// A surface that records draw calls so they can be replayed later.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawList {
    width: f64,
    height: f64,
    commands: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Surface for DrawList {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        self.commands.push(DrawCmd::Rect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn fill_wedge(&mut self, cx: f64, cy: f64, radius: f64, start: f64, sweep: f64, color: Color) {
        self.commands.push(DrawCmd::Wedge {
            cx,
            cy,
            radius,
            start,
            sweep,
            color,
        });
    }

    fn stroke_arc(&mut self, cx: f64, cy: f64, radius: f64, start: f64, sweep: f64, color: Color) {
        self.commands.push(DrawCmd::Arc {
            cx,
            cy,
            radius,
            start,
            sweep,
            color,
        });
    }

    fn text(&mut self, x: f64, y: f64, text: &str, anchor: Anchor, color: Color) {
        self.commands.push(DrawCmd::Text {
            x,
            y,
            text: text.to_string(),
            anchor,
            color,
        });
    }
}

/// Formats whole minutes as `1h5m`, or `45m` under an hour.
pub fn format_minutes(minutes: u32) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;
    if hours > 0 {
        format!("{hours}h{rest}m")
    } else {
        format!("{rest}m")
    }
}
