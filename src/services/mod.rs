pub mod axis;
pub mod canvas;
pub mod chart_service;
pub mod line;
pub mod loader;
pub mod page;
pub mod png_service;
pub mod scale;
