use crate::analysis::Category;
use crate::chart::ChartSelection;
use crate::config::ChartConfig;
use crate::report::DocumentRecord;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Line,
}

/// One category's counts across every document, in document order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub category: Category,
    pub values: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FigureData {
    /// A single document: one bar per selected category.
    Bar { bars: Vec<(Category, usize)> },
    /// Several documents: one line per selected category.
    Line {
        documents: Vec<String>,
        series: Vec<Series>,
    },
}

/// Everything needed to draw a chart. Renderers only draw it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub width: u32,
    pub height: u32,
    pub data: FigureData,
}

impl Figure {
    /// Build the chart for a batch. `None` when there is nothing to draw:
    /// no records or no selected categories.
    pub fn from_records(
        records: &[DocumentRecord],
        selection: &ChartSelection,
        config: &ChartConfig,
    ) -> Option<Figure> {
        if records.is_empty() || selection.is_empty() {
            return None;
        }

        let categories = selection.categories();

        if let [record] = records {
            let [width, height] = config.bar_size;
            return Some(Figure {
                title: format!("Punctuation Count for: {}", record.filename),
                x_label: "Punctuation Type".to_string(),
                y_label: "Count".to_string(),
                width,
                height,
                data: FigureData::Bar {
                    bars: categories
                        .into_iter()
                        .map(|c| (c, record.punctuation.get(c)))
                        .collect(),
                },
            });
        }

        let [width, height] = config.line_size;
        Some(Figure {
            title: "Punctuation Count Comparison".to_string(),
            x_label: "Document".to_string(),
            y_label: "Count".to_string(),
            width,
            height,
            data: FigureData::Line {
                documents: records.iter().map(|r| display_name(&r.filename)).collect(),
                series: categories
                    .into_iter()
                    .map(|category| Series {
                        category,
                        values: records.iter().map(|r| r.punctuation.get(category)).collect(),
                    })
                    .collect(),
            },
        })
    }

    pub fn kind(&self) -> ChartKind {
        match self.data {
            FigureData::Bar { .. } => ChartKind::Bar,
            FigureData::Line { .. } => ChartKind::Line,
        }
    }

    pub fn max_value(&self) -> usize {
        match &self.data {
            FigureData::Bar { bars } => bars.iter().map(|(_, v)| *v).max().unwrap_or(0),
            FigureData::Line { series, .. } => series
                .iter()
                .flat_map(|s| s.values.iter().copied())
                .max()
                .unwrap_or(0),
        }
    }

    /// Top of the y axis, leaving headroom above the tallest value.
    pub fn y_upper_bound(&self) -> usize {
        let max = self.max_value();
        (max + max / 10).max(max + 1)
    }
}

/// Axis label for a document: file extension removed, underscores as spaces.
pub fn display_name(filename: &str) -> String {
    let stem = match filename.rfind('.') {
        Some(dot) if dot > 0 => &filename[..dot],
        _ => filename,
    };
    stem.replace('_', " ")
}
