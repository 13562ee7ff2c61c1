use std::path::Path;

use tracing::info;

use crate::utils::errors::ChartError;
use crate::utils::svg::SvgDocument;

const PAGE_STYLE: &str = "\
.close-line { fill: none; stroke: steelblue; stroke-width: 2px; }
.open-line { fill: none; stroke: red; stroke-width: 2px; }";

/// Wrap the rendered document in an HTML page, the SVG placed directly in `<body>`
pub fn render_page(doc: &SvgDocument) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>linegraph</title>\n<style>\n{}\n</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        PAGE_STYLE,
        doc.to_svg_string()
    )
}

pub async fn write_page(path: &Path, html: &str) -> Result<(), ChartError> {
    tokio::fs::write(path, html).await?;
    info!("💾 Wrote page to {}", path.display());
    Ok(())
}
