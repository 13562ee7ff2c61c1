//! Data models shared by the loader and the renderer

pub mod chart;
pub mod row;

pub use chart::RenderedChart;
pub use row::{PriceRow, RawRow, Series};
