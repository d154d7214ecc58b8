pub mod figure;
pub mod fonts;
pub mod render;
pub mod selection;

pub use figure::{display_name, ChartKind, Figure, FigureData, Series};
pub use fonts::ensure_font;
pub use render::ChartRenderer;
pub use selection::ChartSelection;
