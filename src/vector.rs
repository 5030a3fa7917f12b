//! Renderer-independent vector scene. Charts draw into a `VectorDocument`; exporters serialize
//! it as SVG, convert it to EPS, or rasterize it.

use std::fmt::Write;

use crate::config::Rgb;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn svg(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// One drawing primitive, in pixel coordinates with y growing downwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Rgb,
    },
    Polygon {
        points: Vec<(f64, f64)>,
        fill: Rgb,
        stroke: Option<Rgb>,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        stroke: Rgb,
        width: f64,
    },
    Circle {
        center: (f64, f64),
        radius: f64,
        fill: Rgb,
    },
    Text {
        at: (f64, f64),
        content: String,
        size: f64,
        anchor: Anchor,
        /// Clockwise rotation in degrees around `at`.
        angle: f64,
        fill: Rgb,
    },
}

impl Shape {
    pub fn text(at: (f64, f64), content: impl Into<String>, size: f64, fill: Rgb) -> Self {
        Self::Text {
            at,
            content: content.into(),
            size,
            anchor: Anchor::Middle,
            angle: 0.0,
            fill,
        }
    }

    pub fn line(from: (f64, f64), to: (f64, f64), stroke: Rgb) -> Self {
        Self::Line {
            from,
            to,
            stroke,
            width: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VectorDocument {
    pub width: f64,
    pub height: f64,
    pub elements: Vec<Shape>,
}

impl VectorDocument {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
        }
    }

    /// A valid document with nothing in it, for charts that have not rendered yet.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn push(&mut self, shape: Shape) {
        self.elements.push(shape);
    }

    /// Text contents in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|s| match s {
            Shape::Text { content, .. } => Some(content.as_str()),
            _ => None,
        })
    }

    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<svg xmlns="{}" width="{}" height="{}" viewBox="0 0 {} {}""#,
            SVG_NS,
            num(self.width),
            num(self.height),
            num(self.width),
            num(self.height)
        );
        if self.elements.is_empty() {
            out.push_str("/>");
            return out;
        }
        out.push('>');
        for shape in &self.elements {
            write_svg_shape(&mut out, shape);
        }
        out.push_str("</svg>");
        out
    }
}

/// Coordinates rounded to two decimals without trailing zeros.
pub(crate) fn num(v: f64) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn write_svg_shape(out: &mut String, shape: &Shape) {
    // Writing into a String cannot fail.
    let _ = match shape {
        Shape::Rect {
            x,
            y,
            width,
            height,
            fill,
        } => write!(
            out,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
            num(*x),
            num(*y),
            num(*width),
            num(*height),
            fill.to_hex()
        ),
        Shape::Polygon {
            points,
            fill,
            stroke,
        } => {
            let pts: Vec<String> = points
                .iter()
                .map(|(x, y)| format!("{},{}", num(*x), num(*y)))
                .collect();
            let stroke = stroke
                .map(|s| format!(r#" stroke="{}""#, s.to_hex()))
                .unwrap_or_default();
            write!(
                out,
                r#"<polygon points="{}" fill="{}"{}/>"#,
                pts.join(" "),
                fill.to_hex(),
                stroke
            )
        }
        Shape::Line {
            from,
            to,
            stroke,
            width,
        } => write!(
            out,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
            num(from.0),
            num(from.1),
            num(to.0),
            num(to.1),
            stroke.to_hex(),
            num(*width)
        ),
        Shape::Circle {
            center,
            radius,
            fill,
        } => write!(
            out,
            r#"<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
            num(center.0),
            num(center.1),
            num(*radius),
            fill.to_hex()
        ),
        Shape::Text {
            at,
            content,
            size,
            anchor,
            angle,
            fill,
        } => {
            let transform = if *angle != 0.0 {
                format!(
                    r#" transform="rotate({} {} {})""#,
                    num(*angle),
                    num(at.0),
                    num(at.1)
                )
            } else {
                String::new()
            };
            write!(
                out,
                r#"<text x="{}" y="{}" font-family="Arial, sans-serif" font-size="{}" text-anchor="{}" fill="{}"{}>{}</text>"#,
                num(at.0),
                num(at.1),
                num(*size),
                anchor.svg(),
                fill.to_hex(),
                transform,
                xml_escape(content)
            )
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_valid_svg() {
        let svg = VectorDocument::empty().to_svg_string();
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.ends_with("/>"));
    }

    #[test]
    fn shapes_serialize_in_order() {
        let mut doc = VectorDocument::new(100.0, 50.0);
        doc.push(Shape::Rect {
            x: 1.0,
            y: 2.5,
            width: 10.0,
            height: 20.0,
            fill: Rgb(255, 0, 0),
        });
        doc.push(Shape::Text {
            at: (5.0, 45.0),
            content: "A & <B>".to_string(),
            size: 10.0,
            anchor: Anchor::End,
            angle: 315.0,
            fill: Rgb::BLACK,
        });
        let svg = doc.to_svg_string();
        let rect = svg.find("<rect x=\"1\" y=\"2.5\"").unwrap();
        let text = svg.find("<text").unwrap();
        assert!(rect < text);
        assert!(svg.contains("A &amp; &lt;B&gt;"));
        assert!(svg.contains("rotate(315 5 45)"));
        assert!(svg.contains("text-anchor=\"end\""));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(doc.texts().collect::<Vec<_>>(), vec!["A & <B>"]);
    }

    #[test]
    fn numbers_are_compact() {
        assert_eq!(num(3.0), "3");
        assert_eq!(num(2.456), "2.46");
        assert_eq!(num(-0.001), "0");
    }
}
