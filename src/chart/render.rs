//! Drawing a [`Figure`] onto SVG or PNG surfaces with plotters.

use crate::analysis::Category;
use crate::chart::figure::{Figure, FigureData, Series};
use crate::chart::fonts::{ensure_font, FONT_FAMILY};
use crate::error::{PunctalyzerError, Result};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fmt::Display;
use std::ops::Range;
use std::path::Path;

// tab10
const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

const CAPTION_SIZE: u32 = 24;
const DESC_SIZE: u32 = 16;
const LABEL_SIZE: u32 = 13;
const BAR_HALF_WIDTH: f64 = 0.35;
const MARKER_RADIUS: u32 = 4;

/// Chart text needs a registered font; `font` overrides the system search.
pub struct ChartRenderer<'a> {
    font: Option<&'a Path>,
}

impl<'a> ChartRenderer<'a> {
    pub fn new(font: Option<&'a Path>) -> Self {
        Self { font }
    }

    /// SVG document, the displayable rendering.
    pub fn render_svg(&self, figure: &Figure) -> Result<String> {
        ensure_font(self.font)?;

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (figure.width, figure.height))
                .into_drawing_area();
            draw_on(&root, figure)?;
        }
        Ok(svg)
    }

    /// PNG-encoded raster image.
    pub fn render_png(&self, figure: &Figure) -> Result<Vec<u8>> {
        ensure_font(self.font)?;

        let (width, height) = (figure.width, figure.height);
        let mut pixels = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
            draw_on(&root, figure)?;
        }

        let mut png = Vec::new();
        PngEncoder::new(&mut png).write_image(&pixels, width, height, ColorType::Rgb8)?;
        Ok(png)
    }
}

fn chart_error<E: Display>(error: E) -> PunctalyzerError {
    PunctalyzerError::Chart {
        message: error.to_string(),
    }
}

fn draw_on<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, figure: &Figure) -> Result<()> {
    root.fill(&WHITE).map_err(chart_error)?;

    match &figure.data {
        FigureData::Bar { bars } => draw_bars(root, figure, bars)?,
        FigureData::Line { documents, series } => draw_lines(root, figure, documents, series)?,
    }

    root.present().map_err(chart_error)?;
    Ok(())
}

fn draw_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    bars: &[(Category, usize)],
) -> Result<()> {
    let labels: Vec<String> = bars.iter().map(|(c, _)| c.key().to_string()).collect();
    let mut chart = ChartBuilder::on(root)
        .caption(&figure.title, (FONT_FAMILY, CAPTION_SIZE))
        .margin(20)
        .x_label_area_size(label_area_size(&labels, figure.height))
        .y_label_area_size(60)
        .build_cartesian_2d(slot_range(bars.len()), 0u32..axis_top(figure))
        .map_err(chart_error)?;

    let formatter = |x: &f64| slot_label(&labels, *x);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&formatter)
        .x_label_style(rotated_label_style())
        .y_label_style((FONT_FAMILY, LABEL_SIZE))
        .x_desc(figure.x_label.as_str())
        .y_desc(figure.y_label.as_str())
        .axis_desc_style((FONT_FAMILY, DESC_SIZE))
        .draw()
        .map_err(chart_error)?;

    chart
        .draw_series(bars.iter().enumerate().map(|(i, (_, value))| {
            let x = i as f64;
            Rectangle::new(
                [(x - BAR_HALF_WIDTH, 0u32), (x + BAR_HALF_WIDTH, to_axis(*value))],
                PALETTE[0].filled(),
            )
        }))
        .map_err(chart_error)?;

    Ok(())
}

fn draw_lines<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    documents: &[String],
    series: &[Series],
) -> Result<()> {
    let mut chart = ChartBuilder::on(root)
        .caption(&figure.title, (FONT_FAMILY, CAPTION_SIZE))
        .margin(20)
        .x_label_area_size(label_area_size(documents, figure.height))
        .y_label_area_size(60)
        .build_cartesian_2d(slot_range(documents.len()), 0u32..axis_top(figure))
        .map_err(chart_error)?;

    let formatter = |x: &f64| slot_label(documents, *x);
    chart
        .configure_mesh()
        .x_labels(documents.len())
        .x_label_formatter(&formatter)
        .x_label_style(rotated_label_style())
        .y_label_style((FONT_FAMILY, LABEL_SIZE))
        .x_desc(figure.x_label.as_str())
        .y_desc(figure.y_label.as_str())
        .axis_desc_style((FONT_FAMILY, DESC_SIZE))
        .draw()
        .map_err(chart_error)?;

    for (index, line) in series.iter().enumerate() {
        let color = PALETTE[index % PALETTE.len()];
        let points: Vec<(f64, u32)> = line
            .values
            .iter()
            .enumerate()
            .map(|(x, y)| (x as f64, to_axis(*y)))
            .collect();

        chart
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
            .map_err(chart_error)?
            .label(line.category.key())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

        chart
            .draw_series(
                points
                    .into_iter()
                    .map(move |point| Circle::new(point, MARKER_RADIUS, color.filled())),
            )
            .map_err(chart_error)?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font((FONT_FAMILY, LABEL_SIZE))
        .draw()
        .map_err(chart_error)?;

    Ok(())
}

/// One unit-wide slot per x item, centred on its index.
fn slot_range(count: usize) -> Range<f64> {
    -0.5..(count as f64 - 0.5)
}

fn slot_label<S: AsRef<str>>(labels: &[S], x: f64) -> String {
    let nearest = x.round();
    if (x - nearest).abs() > 1e-6 || nearest < 0.0 {
        return String::new();
    }
    labels
        .get(nearest as usize)
        .map(|s| s.as_ref().to_string())
        .unwrap_or_default()
}

fn axis_top(figure: &Figure) -> u32 {
    to_axis(figure.y_upper_bound())
}

/// Counts beyond the y axis range are clamped to its top.
fn to_axis(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn rotated_label_style() -> TextStyle<'static> {
    TextStyle::from((FONT_FAMILY, LABEL_SIZE).into_font()).transform(FontTransform::Rotate90)
}

/// Room below the x axis for labels drawn vertically.
fn label_area_size<S: AsRef<str>>(labels: &[S], height: u32) -> u32 {
    let longest = to_axis(
        labels
            .iter()
            .map(|l| l.as_ref().chars().count())
            .max()
            .unwrap_or(0),
    );
    longest
        .saturating_mul(LABEL_SIZE * 6 / 10)
        .saturating_add(30)
        .min(height / 2)
}
