pub mod errors;
pub mod svg;
