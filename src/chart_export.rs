//! Chart export: raw SVG, EPS converted from the same scene (minimal PostScript, no deps), PNG via
//! the plotters bitmap backend, and TSV helpers for chart data.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::rc::Rc;

use crate::model::{ClinicalDataCount, DataBin};
use crate::vector::{num, Anchor, Shape, VectorDocument};

/// Download formats a chart header can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartDownloadType {
    /// Chart data as tab-separated text. Only offered with a caller-supplied generator.
    Tsv,
    /// Raw serialized vector document.
    Svg,
    /// Vector document converted to Encapsulated PostScript.
    Eps,
}

impl ChartDownloadType {
    pub const ALL: [Self; 3] = [Self::Tsv, Self::Svg, Self::Eps];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Tsv => "tsv",
            Self::Svg => "svg",
            Self::Eps => "eps",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tsv => "TSV",
            Self::Svg => "SVG",
            Self::Eps => "EPS",
        }
    }
}

/// Produces export content on demand.
pub type DownloadGenerator = Rc<dyn Fn() -> Result<String>>;

/// A format the caller wants offered, with an optional custom generator.
#[derive(Clone)]
pub struct DownloadRequest {
    pub kind: ChartDownloadType,
    pub init_download: Option<DownloadGenerator>,
}

impl DownloadRequest {
    pub fn new(kind: ChartDownloadType) -> Self {
        Self {
            kind,
            init_download: None,
        }
    }

    pub fn with_generator<F>(kind: ChartDownloadType, generator: F) -> Self
    where
        F: Fn() -> Result<String> + 'static,
    {
        Self {
            kind,
            init_download: Some(Rc::new(generator)),
        }
    }
}

impl fmt::Debug for DownloadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadRequest")
            .field("kind", &self.kind)
            .field("custom", &self.init_download.is_some())
            .finish()
    }
}

/// A resolved download entry: exactly one generator per offered format.
#[derive(Clone)]
pub struct ChartDownload {
    pub kind: ChartDownloadType,
    pub init_download: DownloadGenerator,
}

impl ChartDownload {
    pub fn generate(&self) -> Result<String> {
        (self.init_download)()
    }
}

impl fmt::Debug for ChartDownload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartDownload")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Escape a string for PostScript ( and ) and \. Non-ASCII falls outside the standard encoding.
fn ps_escape(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\\' => "\\\\".to_string(),
            '(' => "\\(".to_string(),
            ')' => "\\)".to_string(),
            '×' => "x".to_string(),
            c if c.is_ascii() => c.to_string(),
            _ => "?".to_string(),
        })
        .collect()
}

fn rgb_ps(rgb: crate::config::Rgb) -> String {
    let (r, g, b) = rgb.to_unit();
    format!("{:.3} {:.3} {:.3} setrgbcolor", r, g, b)
}

/// Convert a vector document to EPS. PostScript y grows upwards, so every y is flipped.
pub fn document_to_eps(doc: &VectorDocument) -> String {
    let h = doc.height;
    let fy = |y: f64| num(h - y);
    let mut out = String::new();

    out.push_str("%!PS-Adobe-3.0 EPSF-3.0\n");
    out.push_str(&format!(
        "%%BoundingBox: 0 0 {} {}\n",
        doc.width.ceil() as i64,
        doc.height.ceil() as i64
    ));
    out.push_str("%%Creator: chartslot\n");
    out.push_str("%%EndComments\n");
    out.push_str("gsave\n");
    out.push_str("1 setlinewidth\n");

    for shape in &doc.elements {
        match shape {
            Shape::Rect {
                x,
                y,
                width,
                height,
                fill,
            } => {
                out.push_str(&format!(
                    "{} {} {} {} {} rectfill\n",
                    rgb_ps(*fill),
                    num(*x),
                    fy(y + height),
                    num(*width),
                    num(*height)
                ));
            }
            Shape::Polygon {
                points,
                fill,
                stroke,
            } => {
                let Some((first, rest)) = points.split_first() else {
                    continue;
                };
                let mut path = format!("newpath {} {} moveto", num(first.0), fy(first.1));
                for (x, y) in rest {
                    path.push_str(&format!(" {} {} lineto", num(*x), fy(*y)));
                }
                path.push_str(" closepath");
                match stroke {
                    Some(s) => out.push_str(&format!(
                        "{} {} gsave fill grestore {} stroke\n",
                        path,
                        rgb_ps(*fill),
                        rgb_ps(*s)
                    )),
                    None => out.push_str(&format!("{} {} fill\n", path, rgb_ps(*fill))),
                }
            }
            Shape::Line {
                from,
                to,
                stroke,
                width,
            } => {
                out.push_str(&format!(
                    "{} {} setlinewidth newpath {} {} moveto {} {} lineto stroke\n",
                    rgb_ps(*stroke),
                    num(*width),
                    num(from.0),
                    fy(from.1),
                    num(to.0),
                    fy(to.1)
                ));
            }
            Shape::Circle {
                center,
                radius,
                fill,
            } => {
                out.push_str(&format!(
                    "{} newpath {} {} {} 0 360 arc fill\n",
                    rgb_ps(*fill),
                    num(center.0),
                    fy(center.1),
                    num(*radius)
                ));
            }
            Shape::Text {
                at,
                content,
                size,
                anchor,
                angle,
                fill,
            } => {
                let align = match anchor {
                    Anchor::Start => "0",
                    Anchor::Middle => "dup stringwidth pop 2 div neg",
                    Anchor::End => "dup stringwidth pop neg",
                };
                out.push_str(&format!(
                    "/Helvetica findfont {} scalefont setfont {} gsave {} {} translate {} rotate ({}) {} 0 moveto show grestore\n",
                    num(*size),
                    rgb_ps(*fill),
                    num(at.0),
                    fy(at.1),
                    num(-angle),
                    ps_escape(content),
                    align
                ));
            }
        }
    }

    out.push_str("grestore\n");
    out.push_str("%%EOF\n");
    out
}

/// Write chart to EPS (Encapsulated PostScript).
pub fn write_chart_eps(path: &Path, doc: &VectorDocument) -> Result<()> {
    let mut f = File::create(path)?;
    f.write_all(document_to_eps(doc).as_bytes())?;
    f.sync_all()?;
    Ok(())
}

/// Write chart to PNG using plotters bitmap backend. The scene is scaled to (width, height).
pub fn write_chart_png(path: &Path, doc: &VectorDocument, (width, height): (u32, u32)) -> Result<()> {
    use plotters::prelude::*;
    use plotters::style::text_anchor::{HPos, Pos, VPos};

    if doc.is_empty() || doc.width <= 0.0 || doc.height <= 0.0 {
        return Err(eyre!("No chart to export"));
    }

    let sx = width as f64 / doc.width;
    let sy = height as f64 / doc.height;
    let px = |(x, y): (f64, f64)| ((x * sx).round() as i32, (y * sy).round() as i32);
    let color = |c: crate::config::Rgb| RGBColor(c.0, c.1, c.2);

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    for shape in &doc.elements {
        match shape {
            Shape::Rect {
                x,
                y,
                width,
                height,
                fill,
            } => {
                root.draw(&Rectangle::new(
                    [px((*x, *y)), px((x + width, y + height))],
                    color(*fill).filled(),
                ))?;
            }
            Shape::Polygon {
                points,
                fill,
                stroke,
            } => {
                let pts: Vec<(i32, i32)> = points.iter().copied().map(px).collect();
                root.draw(&Polygon::new(pts.clone(), color(*fill).filled()))?;
                if let (Some(s), Some(first)) = (stroke, pts.first()) {
                    let mut outline = pts.clone();
                    outline.push(*first);
                    root.draw(&PathElement::new(outline, color(*s).stroke_width(1)))?;
                }
            }
            Shape::Line {
                from,
                to,
                stroke,
                width,
            } => {
                let w = (width * sx).round().max(1.0) as u32;
                root.draw(&PathElement::new(
                    vec![px(*from), px(*to)],
                    color(*stroke).stroke_width(w),
                ))?;
            }
            Shape::Circle {
                center,
                radius,
                fill,
            } => {
                let r = (radius * sx.min(sy)).round().max(1.0) as i32;
                root.draw(&Circle::new(px(*center), r, color(*fill).filled()))?;
            }
            Shape::Text {
                at,
                content,
                size,
                anchor,
                angle,
                fill,
            } => {
                let h = match anchor {
                    Anchor::Start => HPos::Left,
                    Anchor::Middle => HPos::Center,
                    Anchor::End => HPos::Right,
                };
                let style = ("sans-serif", size * sy)
                    .into_font()
                    .transform(font_transform(*angle))
                    .color(&color(*fill))
                    .pos(Pos::new(h, VPos::Bottom));
                root.draw(&Text::new(content.as_str(), px(*at), style))?;
            }
        }
    }

    root.present()?;
    Ok(())
}

/// Bitmap fonts only rotate in quarter turns; 315 degrees becomes vertical.
fn font_transform(angle: f64) -> plotters::style::FontTransform {
    use plotters::style::FontTransform;
    match (angle.rem_euclid(360.0) / 90.0).floor() as i32 {
        1 => FontTransform::Rotate90,
        2 => FontTransform::Rotate180,
        3 => FontTransform::Rotate270,
        _ => FontTransform::None,
    }
}

fn tsv_cell(s: &str) -> String {
    s.replace(['\t', '\n', '\r'], " ")
}

/// Value and count per clinical value, with a header row.
pub fn clinical_counts_to_tsv(counts: &[ClinicalDataCount]) -> String {
    let mut out = String::from("Value\tCount\n");
    for c in counts {
        out.push_str(&format!("{}\t{}\n", tsv_cell(&c.value), c.count));
    }
    out
}

/// One row per bin; empty cells for the fields a bin does not carry.
pub fn data_bins_to_tsv(bins: &[DataBin]) -> String {
    let opt = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
    let mut out = String::from("Start\tEnd\tSpecial Value\tCount\n");
    for b in bins {
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\n",
            opt(b.start),
            opt(b.end),
            b.special_value.as_deref().map(tsv_cell).unwrap_or_default(),
            b.count
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Rgb;

    fn sample_doc() -> VectorDocument {
        let mut doc = VectorDocument::new(200.0, 100.0);
        doc.push(Shape::Rect {
            x: 10.0,
            y: 20.0,
            width: 30.0,
            height: 40.0,
            fill: Rgb(41, 134, 226),
        });
        doc.push(Shape::line((0.0, 90.0), (200.0, 90.0), Rgb::BLACK));
        doc.push(Shape::Text {
            at: (50.0, 95.0),
            content: "2.5×10 (x)".to_string(),
            size: 10.0,
            anchor: Anchor::Middle,
            angle: 315.0,
            fill: Rgb::BLACK,
        });
        doc
    }

    #[test]
    fn eps_contains_desired_elements() {
        let eps = document_to_eps(&sample_doc());
        assert!(eps.starts_with("%!PS-Adobe-3.0 EPSF-3.0"));
        assert!(eps.contains("%%BoundingBox: 0 0 200 100"));
        assert!(eps.contains("%%Creator: chartslot"));
        // rect bottom edge: 100 - (20 + 40)
        assert!(eps.contains("10 40 30 40 rectfill"));
        assert!(eps.contains("0 10 moveto 200 10 lineto stroke"));
        assert!(eps.contains("-315 rotate (2.5x10 \\(x\\))"));
        assert!(eps.contains("setrgbcolor"));
        assert!(eps.trim_end().ends_with("%%EOF"));
    }

    #[test]
    fn empty_document_converts() {
        let eps = document_to_eps(&VectorDocument::empty());
        assert!(eps.contains("%%BoundingBox: 0 0 0 0"));
    }

    #[test]
    fn write_eps_to_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("chart.eps");
        write_chart_eps(&path, &sample_doc()).expect("write_chart_eps");
        let content = std::fs::read_to_string(&path).expect("read");
        assert!(content.contains("rectfill"));
    }

    #[test]
    fn png_needs_a_scene() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("chart.png");
        assert!(write_chart_png(&path, &VectorDocument::empty(), (100, 100)).is_err());
    }

    #[test]
    fn tsv_helpers() {
        let counts = vec![ClinicalDataCount {
            value: "Male".to_string(),
            count: 12,
            color: None,
        }];
        assert_eq!(clinical_counts_to_tsv(&counts), "Value\tCount\nMale\t12\n");

        let bins = vec![DataBin::numeric(0.0, 10.5, 3), DataBin::special("NA", 1)];
        assert_eq!(
            data_bins_to_tsv(&bins),
            "Start\tEnd\tSpecial Value\tCount\n0\t10.5\t\t3\n\t\tNA\t1\n"
        );
    }

    #[test]
    fn quarter_turn_rotation() {
        use plotters::style::FontTransform;
        assert!(matches!(font_transform(0.0), FontTransform::None));
        assert!(matches!(font_transform(315.0), FontTransform::Rotate270));
        assert!(matches!(font_transform(-90.0), FontTransform::Rotate270));
    }
}
