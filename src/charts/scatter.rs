//! Mutation count vs fraction of genome altered, colored by analysis group.

use crate::binning::{format_count_tick, nice_ticks};
use crate::config::{ColorParser, Rgb};
use crate::model::ScatterDatum;
use crate::vector::{Anchor, Shape, VectorDocument};

use super::{Interaction, Plottable, RenderContext, SelectionEvent};

pub const X_AXIS_LABEL: &str = "Fraction of copy number altered genome";
pub const Y_AXIS_LABEL: &str = "# of mutations";

const PAD_LEFT: f64 = 50.0;
const PAD_RIGHT: f64 = 16.0;
const PAD_TOP: f64 = 16.0;
const PAD_BOTTOM: f64 = 48.0;
const POINT_RADIUS: f64 = 3.0;
const FONT: f64 = 9.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub datum: ScatterDatum,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPlot {
    points: Vec<ScatterPoint>,
    size: (f64, f64),
    axis: Rgb,
    text: Rgb,
}

impl ScatterPlot {
    /// `None` until the sample to group mapping has loaded.
    pub fn new(data: &[ScatterDatum], ctx: &RenderContext<'_>) -> Option<Self> {
        let mapping = ctx.sample_to_group?;
        let parser = ColorParser::new();
        let na = ctx.theme.get("na_group");
        let groups = &ctx.analysis_groups.groups;

        let points = data
            .iter()
            .map(|datum| {
                let color = mapping
                    .get(&datum.unique_sample_key)
                    .and_then(|value| groups.iter().position(|g| &g.value == value))
                    .map(|i| {
                        parser
                            .parse(&groups[i].color)
                            .unwrap_or_else(|_| ctx.theme.series_color(i))
                    })
                    .unwrap_or(na);
                ScatterPoint {
                    datum: datum.clone(),
                    color,
                }
            })
            .collect();

        Some(Self {
            points,
            size: (ctx.size.0 as f64, ctx.size.1 as f64),
            axis: ctx.theme.get("axis"),
            text: ctx.theme.get("text"),
        })
    }

    pub fn points(&self) -> &[ScatterPoint] {
        &self.points
    }

    /// Sample keys inside the rectangle, in data order.
    pub fn samples_in_rect(&self, x0: f64, x1: f64, y0: f64, y1: f64) -> Vec<String> {
        let (xl, xh) = (x0.min(x1), x0.max(x1));
        let (yl, yh) = (y0.min(y1), y0.max(y1));
        self.points
            .iter()
            .filter(|p| (xl..=xh).contains(&p.datum.x) && (yl..=yh).contains(&p.datum.y))
            .map(|p| p.datum.unique_sample_key.clone())
            .collect()
    }

    pub fn on_interaction(&self, interaction: &Interaction) -> Option<SelectionEvent> {
        match *interaction {
            Interaction::Drag { x0, x1, y0, y1 } => {
                Some(SelectionEvent::Values(self.samples_in_rect(x0, x1, y0, y1)))
            }
            Interaction::Click { .. } => None,
        }
    }

    fn y_max(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.datum.y)
            .fold(0.0, f64::max)
            .max(1.0)
    }
}

impl Plottable for ScatterPlot {
    fn to_vector_document(&self) -> VectorDocument {
        let (width, height) = self.size;
        let plot_w = (width - PAD_LEFT - PAD_RIGHT).max(1.0);
        let plot_h = (height - PAD_TOP - PAD_BOTTOM).max(1.0);
        let base_y = PAD_TOP + plot_h;

        let y_ticks = nice_ticks(0.0, self.y_max(), 5);
        let y_top = y_ticks.last().copied().unwrap_or(1.0).max(self.y_max());
        let x_px = |x: f64| PAD_LEFT + x.clamp(0.0, 1.0) * plot_w;
        let y_px = |y: f64| base_y - y / y_top * plot_h;

        let mut doc = VectorDocument::new(width, height);
        doc.push(Shape::line((PAD_LEFT, base_y), (PAD_LEFT + plot_w, base_y), self.axis));
        doc.push(Shape::line((PAD_LEFT, PAD_TOP), (PAD_LEFT, base_y), self.axis));

        for v in nice_ticks(0.0, 1.0, 5) {
            let x = x_px(v);
            doc.push(Shape::line((x, base_y), (x, base_y + 4.0), self.axis));
            doc.push(Shape::text((x, base_y + 14.0), format!("{}", v), FONT, self.text));
        }
        for v in y_ticks {
            let label = format_count_tick(v);
            if label.is_empty() {
                continue;
            }
            let y = y_px(v);
            doc.push(Shape::line((PAD_LEFT - 4.0, y), (PAD_LEFT, y), self.axis));
            doc.push(Shape::Text {
                at: (PAD_LEFT - 6.0, y + 3.0),
                content: label,
                size: FONT,
                anchor: Anchor::End,
                angle: 0.0,
                fill: self.text,
            });
        }

        for p in &self.points {
            doc.push(Shape::Circle {
                center: (x_px(p.datum.x), y_px(p.datum.y)),
                radius: POINT_RADIUS,
                fill: p.color,
            });
        }

        doc.push(Shape::text(
            (PAD_LEFT + plot_w / 2.0, height - 8.0),
            X_AXIS_LABEL,
            FONT + 1.0,
            self.text,
        ));
        doc.push(Shape::Text {
            at: (12.0, PAD_TOP + plot_h / 2.0),
            content: Y_AXIS_LABEL.to_string(),
            size: FONT + 1.0,
            anchor: Anchor::Middle,
            angle: 270.0,
            fill: self.text,
        });
        doc
    }
}
