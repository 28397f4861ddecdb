use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    symbols::Marker,
    text::Line,
    widgets::{
        Block,
        canvas::{Canvas, Context, Line as CanvasLine, Points},
    },
};

use crate::chart::{Anchor, DrawCmd, DrawList, Surface};

/// Spacing, in logical pixels, between the strokes that fill areas.
const FILL_STEP: f64 = 0.75;

/// Renders a recorded chart into `area`, scaled to fit.
pub fn render_chart(frame: &mut Frame, area: Rect, list: &DrawList, block: Block<'_>) {
    let (width, height) = list.size();
    let columns = f64::from(area.width.saturating_sub(2).max(1));
    let units_per_column = width / columns;
    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| replay(ctx, list, units_per_column));
    frame.render_widget(canvas, area);
}

/// Chart space has y growing downwards; the canvas has it growing upwards.
fn replay(ctx: &mut Context, list: &DrawList, units_per_column: f64) {
    let (_, height) = list.size();
    let flip = |y: f64| height - y;

    for cmd in list.commands() {
        match cmd {
            DrawCmd::Rect {
                x,
                y,
                width,
                height: rect_height,
                color,
            } => {
                let mut dx = 0.0;
                while dx <= *width {
                    ctx.draw(&CanvasLine {
                        x1: x + dx,
                        y1: flip(*y),
                        x2: x + dx,
                        y2: flip(y + rect_height),
                        color: *color,
                    });
                    dx += FILL_STEP;
                }
            }
            DrawCmd::Wedge {
                cx,
                cy,
                radius,
                start,
                sweep,
                color,
            } => {
                let steps = arc_steps(*radius, *sweep);
                for i in 0..=steps {
                    let angle = start + sweep * i as f64 / steps as f64;
                    ctx.draw(&CanvasLine {
                        x1: *cx,
                        y1: flip(*cy),
                        x2: cx + radius * angle.cos(),
                        y2: flip(cy + radius * angle.sin()),
                        color: *color,
                    });
                }
            }
            DrawCmd::Arc {
                cx,
                cy,
                radius,
                start,
                sweep,
                color,
            } => {
                let steps = arc_steps(*radius, *sweep);
                let coords = (0..=steps)
                    .map(|i| {
                        let angle = start + sweep * i as f64 / steps as f64;
                        (cx + radius * angle.cos(), flip(cy + radius * angle.sin()))
                    })
                    .collect::<Vec<_>>();
                ctx.draw(&Points {
                    coords: &coords,
                    color: *color,
                });
            }
            DrawCmd::Text {
                x,
                y,
                text,
                anchor,
                color,
            } => {
                let x = match anchor {
                    Anchor::Start => *x,
                    Anchor::Center => x - text.chars().count() as f64 * units_per_column / 2.0,
                };
                ctx.print(x, flip(*y), Line::styled(text.clone(), Style::default().fg(*color)));
            }
        }
    }
}

fn arc_steps(radius: f64, sweep: f64) -> usize {
    ((radius * sweep.abs()) / FILL_STEP).ceil().max(1.0) as usize
}
