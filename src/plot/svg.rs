//! Render a [`Figure`] as a standalone SVG document
//!
//! Every panel gets its own cell of the layout grid containing the title, the color mapped
//! plane, axis labels and a colorbar scaled to that panel's value range. Planes are drawn
//! as one polygon per grid cell, colored by the mean of its four corner values, so curved
//! structured grids keep their shape.

use super::colormap::{normalize, Colormap};
use super::{Figure, Panel};
use crate::prelude::*;

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;
use tracing::{debug, info};

const CELL_WIDTH: f64 = 380.0;
const CELL_HEIGHT: f64 = 330.0;

const PLOT_LEFT: f64 = 55.0;
const PLOT_TOP: f64 = 40.0;
const PLOT_SIZE: f64 = 230.0;

const COLORBAR_GAP: f64 = 18.0;
const COLORBAR_WIDTH: f64 = 14.0;
const COLORBAR_STEPS: usize = 32;

const MARKER_RADIUS: f64 = 3.0;
const BACKGROUND: &str = "#ffffff";
const TEXT_COLOR: &str = "#222222";

/// [`PlotRenderer`] that writes the figure to an SVG file
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    output: PathBuf,
    colormap: Colormap,
}

impl SvgRenderer {
    pub fn new<P: Into<PathBuf>>(output: P) -> Self {
        Self {
            output: output.into(),
            colormap: Colormap::viridis(),
        }
    }
}

impl PlotRenderer for SvgRenderer {
    fn render(&mut self, figure: &Figure) -> Result<(), Error> {
        let file = File::create(&self.output)?;
        let writer = write_svg_with(figure, BufWriter::new(file), &self.colormap)?;
        writer.into_inner().map_err(|e| e.into_error())?;

        info!(path = %self.output.display(), panels = figure.panels.len(), "wrote figure");
        Ok(())
    }
}

/// Write `figure` as SVG to any writer using the viridis color map, returning the writer
pub fn write_svg<W: Write>(figure: &Figure, writer: W) -> Result<W, quick_xml::Error> {
    write_svg_with(figure, writer, &Colormap::viridis())
}

fn write_svg_with<W: Write>(
    figure: &Figure,
    writer: W,
    colormap: &Colormap,
) -> Result<W, quick_xml::Error> {
    let mut writer = Writer::new_with_indent(writer, b' ', 2);

    let width = num(CELL_WIDTH * figure.layout.cols.max(1) as f64);
    let height = num(CELL_HEIGHT * figure.layout.rows.max(1) as f64);
    let view_box = format!("0 0 {width} {height}");

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    start(
        &mut writer,
        "svg",
        &[
            ("xmlns", "http://www.w3.org/2000/svg"),
            ("width", width.as_str()),
            ("height", height.as_str()),
            ("viewBox", view_box.as_str()),
            ("font-family", "sans-serif"),
        ],
    )?;
    empty(
        &mut writer,
        "rect",
        &[("width", "100%"), ("height", "100%"), ("fill", BACKGROUND)],
    )?;

    for (idx, panel) in figure.panels.iter().enumerate() {
        let (row, col) = figure.layout.position(idx);
        debug!(idx, row, col, title = %panel.title, "drawing panel");
        write_panel(&mut writer, panel, idx, row, col, colormap)?;
    }

    end(&mut writer, "svg")?;

    Ok(writer.into_inner())
}

/// maps physical coordinates of a panel onto the pixels of its plot area
struct Projection {
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl Projection {
    fn new(panel: &Panel) -> Self {
        Self {
            x_range: panel.abscissa_range().unwrap_or((0.0, 1.0)),
            y_range: panel.ordinate_range().unwrap_or((0.0, 1.0)),
        }
    }

    fn project(&self, x: f64, y: f64) -> (f64, f64) {
        let px = PLOT_LEFT + normalize(x, self.x_range.0, self.x_range.1) * PLOT_SIZE;
        // svg y grows downwards
        let py = PLOT_TOP + PLOT_SIZE
            - normalize(y, self.y_range.0, self.y_range.1) * PLOT_SIZE;
        (px, py)
    }
}

fn write_panel<W: Write>(
    writer: &mut Writer<W>,
    panel: &Panel,
    idx: usize,
    row: usize,
    col: usize,
    colormap: &Colormap,
) -> Result<(), quick_xml::Error> {
    let id = format!("panel-{idx}");
    let transform = format!(
        "translate({},{})",
        num(col as f64 * CELL_WIDTH),
        num(row as f64 * CELL_HEIGHT)
    );
    start(
        writer,
        "g",
        &[("class", "panel"), ("id", id.as_str()), ("transform", transform.as_str())],
    )?;

    text(
        writer,
        PLOT_LEFT + PLOT_SIZE / 2.0,
        PLOT_TOP - 14.0,
        "middle",
        "14",
        &panel.title,
    )?;

    let (min, max) = panel.value_range().unwrap_or((0.0, 0.0));
    let projection = Projection::new(panel);

    start(writer, "g", &[("class", "plane")])?;
    let (rows, cols) = panel.values.dim();
    if rows >= 2 && cols >= 2 {
        write_quads(writer, panel, &projection, colormap, min, max)?;
    } else {
        // a plane that is a single row or column has no area to fill
        write_markers(writer, panel, &projection, colormap, min, max)?;
    }
    end(writer, "g")?;

    let frame_x = num(PLOT_LEFT);
    let frame_y = num(PLOT_TOP);
    let frame_size = num(PLOT_SIZE);
    empty(
        writer,
        "rect",
        &[
            ("x", frame_x.as_str()),
            ("y", frame_y.as_str()),
            ("width", frame_size.as_str()),
            ("height", frame_size.as_str()),
            ("fill", "none"),
            ("stroke", TEXT_COLOR),
        ],
    )?;

    write_axis_labels(writer, panel, &projection)?;
    write_colorbar(writer, colormap, min, max)?;

    end(writer, "g")
}

fn write_quads<W: Write>(
    writer: &mut Writer<W>,
    panel: &Panel,
    projection: &Projection,
    colormap: &Colormap,
    min: f64,
    max: f64,
) -> Result<(), quick_xml::Error> {
    let (rows, cols) = panel.values.dim();

    for r in 0..rows - 1 {
        for c in 0..cols - 1 {
            let corners = [(r, c), (r, c + 1), (r + 1, c + 1), (r + 1, c)];

            let mean = corners
                .iter()
                .map(|&(i, j)| panel.values[[i, j]])
                .sum::<f64>()
                / 4.0;
            if mean.is_nan() {
                continue;
            }

            let points = corners
                .iter()
                .map(|&(i, j)| {
                    let (abscissa, ordinate) = (panel.abscissa[[i, j]], panel.ordinate[[i, j]]);
                    let (x, y) = projection.project(abscissa, ordinate);
                    format!("{},{}", num(x), num(y))
                })
                .collect::<Vec<_>>()
                .join(" ");

            let fill = colormap.map(mean, min, max).to_string();
            empty(
                writer,
                "polygon",
                &[
                    ("points", points.as_str()),
                    ("fill", fill.as_str()),
                    ("stroke", fill.as_str()),
                ],
            )?;
        }
    }

    Ok(())
}

fn write_markers<W: Write>(
    writer: &mut Writer<W>,
    panel: &Panel,
    projection: &Projection,
    colormap: &Colormap,
    min: f64,
    max: f64,
) -> Result<(), quick_xml::Error> {
    let radius = num(MARKER_RADIUS);

    for (value, (abscissa, ordinate)) in panel
        .values
        .iter()
        .zip(panel.abscissa.iter().zip(panel.ordinate.iter()))
    {
        if value.is_nan() {
            continue;
        }

        let (x, y) = projection.project(*abscissa, *ordinate);
        let (cx, cy) = (num(x), num(y));
        let fill = colormap.map(*value, min, max).to_string();

        empty(
            writer,
            "circle",
            &[
                ("cx", cx.as_str()),
                ("cy", cy.as_str()),
                ("r", radius.as_str()),
                ("fill", fill.as_str()),
            ],
        )?;
    }

    Ok(())
}

fn write_axis_labels<W: Write>(
    writer: &mut Writer<W>,
    panel: &Panel,
    projection: &Projection,
) -> Result<(), quick_xml::Error> {
    let bottom = PLOT_TOP + PLOT_SIZE;
    let right = PLOT_LEFT + PLOT_SIZE;

    // tick values at the ends of both axes
    text(writer, PLOT_LEFT, bottom + 14.0, "start", "10", &num(projection.x_range.0))?;
    text(writer, right, bottom + 14.0, "end", "10", &num(projection.x_range.1))?;
    text(writer, PLOT_LEFT - 4.0, bottom, "end", "10", &num(projection.y_range.0))?;
    text(writer, PLOT_LEFT - 4.0, PLOT_TOP + 10.0, "end", "10", &num(projection.y_range.1))?;

    text(
        writer,
        PLOT_LEFT + PLOT_SIZE / 2.0,
        bottom + 30.0,
        "middle",
        "12",
        panel.abscissa_label(),
    )?;
    text(
        writer,
        PLOT_LEFT - 30.0,
        PLOT_TOP + PLOT_SIZE / 2.0,
        "middle",
        "12",
        panel.ordinate_label(),
    )
}

fn write_colorbar<W: Write>(
    writer: &mut Writer<W>,
    colormap: &Colormap,
    min: f64,
    max: f64,
) -> Result<(), quick_xml::Error> {
    let left = PLOT_LEFT + PLOT_SIZE + COLORBAR_GAP;
    let step = PLOT_SIZE / COLORBAR_STEPS as f64;

    start(writer, "g", &[("class", "colorbar")])?;

    let x = num(left);
    let width = num(COLORBAR_WIDTH);
    // one extra pixel so neighbouring steps overlap without seams
    let height = num(step + 1.0);

    for idx in 0..COLORBAR_STEPS {
        let t = (idx as f64 + 0.5) / COLORBAR_STEPS as f64;
        // low values at the bottom
        let y = num(PLOT_TOP + PLOT_SIZE - (idx as f64 + 1.0) * step);
        let fill = colormap.sample(t).to_string();

        empty(
            writer,
            "rect",
            &[
                ("x", x.as_str()),
                ("y", y.as_str()),
                ("width", width.as_str()),
                ("height", height.as_str()),
                ("fill", fill.as_str()),
            ],
        )?;
    }

    let label_x = left + COLORBAR_WIDTH + 4.0;
    text(writer, label_x, PLOT_TOP + 10.0, "start", "10", &num(max))?;
    text(writer, label_x, PLOT_TOP + PLOT_SIZE, "start", "10", &num(min))?;

    end(writer, "g")
}

fn start<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    attributes: &[(&str, &str)],
) -> Result<(), quick_xml::Error> {
    let element = BytesStart::new(name).with_attributes(attributes.iter().copied());
    writer.write_event(Event::Start(element))
}

fn empty<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    attributes: &[(&str, &str)],
) -> Result<(), quick_xml::Error> {
    let element = BytesStart::new(name).with_attributes(attributes.iter().copied());
    writer.write_event(Event::Empty(element))
}

fn end<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::End(BytesEnd::new(name)))
}

fn text<W: Write>(
    writer: &mut Writer<W>,
    x: f64,
    y: f64,
    anchor: &str,
    size: &str,
    content: &str,
) -> Result<(), quick_xml::Error> {
    let (x, y) = (num(x), num(y));
    start(
        writer,
        "text",
        &[
            ("x", x.as_str()),
            ("y", y.as_str()),
            ("text-anchor", anchor),
            ("font-size", size),
            ("fill", TEXT_COLOR),
        ],
    )?;
    writer.write_event(Event::Text(BytesText::new(content)))?;
    end(writer, "text")
}

/// shortest representation of a value rounded to two decimals
fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;

    if rounded.is_finite() && rounded.fract() == 0.0 && rounded.abs() < 1e15 {
        format!("{}", rounded as i64)
    } else {
        let mut buffer = ryu::Buffer::new();
        buffer.format(rounded).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slice::{Axis, GridLayout};

    fn panel(title: &str, values: Array2<f64>) -> Panel {
        let (rows, cols) = values.dim();
        let abscissa = Array2::from_shape_fn((rows, cols), |(_, j)| j as f64);
        let ordinate = Array2::from_shape_fn((rows, cols), |(i, _)| i as f64);

        Panel {
            title: title.into(),
            axis: Axis::Z,
            index: 0,
            abscissa,
            ordinate,
            values,
        }
    }

    fn render(figure: &Figure) -> String {
        let bytes = write_svg(figure, Vec::new()).unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn one_group_and_colorbar_per_panel() {
        let panels = vec![
            panel("Pressure", ndarray::arr2(&[[0., 1.], [2., 3.]])),
            panel("Density", ndarray::arr2(&[[1., 1., 1.], [1., 1., 1.]])),
            panel("Velocity", ndarray::arr2(&[[4., 5., 6.]])),
        ];
        let figure = Figure::new(GridLayout::for_panels(panels.len()), panels);

        let svg = render(&figure);

        assert_eq!(svg.matches(r#"class="panel""#).count(), 3);
        assert_eq!(svg.matches(r#"class="colorbar""#).count(), 3);
        assert!(svg.contains(">Pressure</text>"));
        assert!(svg.contains(">Density</text>"));
        // 2x2 plane is one quad, 2x3 plane is two, 1x3 plane is markers
        assert_eq!(svg.matches("<polygon").count(), 3);
        assert_eq!(svg.matches("<circle").count(), 3);
        // 2x2 layout, third panel wraps to the second row
        assert!(svg.contains(r#"transform="translate(0,330)""#));
    }

    #[test]
    fn escapes_titles() {
        let panels = vec![panel("p<q>", ndarray::arr2(&[[0., 1.], [2., 3.]]))];
        let figure = Figure::new(GridLayout::for_panels(1), panels);

        let svg = render(&figure);
        assert!(svg.contains("p&lt;q&gt;"));
    }

    #[test]
    fn number_formatting() {
        assert_eq!(num(330.0), "330");
        assert_eq!(num(1.23456), "1.23");
        assert_eq!(num(-0.5), "-0.5");
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("figure.svg");

        let panels = vec![panel("Pressure", ndarray::arr2(&[[0., 1.], [2., 3.]]))];
        let figure = Figure::new(GridLayout::for_panels(1), panels);

        let mut renderer = SvgRenderer::new(&path);
        renderer.render(&figure).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("<?xml"));
        assert!(contents.trim_end().ends_with("</svg>"));
    }
}
