use tracing::{debug, info};

use crate::models::{PriceRow, RenderedChart, Series};
use crate::services::axis::Axis;
use crate::services::canvas::{setup_canvas, CanvasLayout};
use crate::services::line::LineGenerator;
use crate::services::scale::{LinearScale, TimeScale};
use crate::utils::errors::ChartError;
use crate::utils::svg::{fmt_num, Element, NodeId, SvgDocument};

const MARKER_RADIUS: u32 = 10;

/// Horizontal and vertical scales for the plotting area of `layout`
pub fn build_scales(
    rows: &[PriceRow],
    layout: &CanvasLayout,
) -> Result<(TimeScale, LinearScale), ChartError> {
    let x = TimeScale::from_rows(rows, (0.0, layout.inner_width()))?;
    let y = LinearScale::from_rows(rows, (layout.inner_height(), 0.0))?;
    Ok((x, y))
}

/// Draw both series, the close-price markers and the two axes into `group`.
///
/// Everything is appended to the handle passed in; later draws sit on top.
pub fn render_chart(
    doc: &mut SvgDocument,
    group: NodeId,
    rows: &[PriceRow],
    layout: &CanvasLayout,
) -> Result<RenderedChart, ChartError> {
    // Map dates to x and prices to y
    let (x, y) = build_scales(rows, layout)?;
    debug!(
        "Scales: x {:?} -> {:?}, y {:?} -> {:?}",
        x.domain(),
        x.range(),
        y.domain(),
        y.range()
    );

    // Draw the two series, close first
    let close_line = LineGenerator::new(&x, &y, Series::Close);
    let open_line = LineGenerator::new(&x, &y, Series::Open);

    let close_path = append_series(doc, group, &close_line, rows);
    let open_path = append_series(doc, group, &open_line, rows);

    // Mark every close price that has a position
    let mut markers = Vec::with_capacity(rows.len());
    for (cx, cy) in close_line.points(rows) {
        if !(cx.is_finite() && cy.is_finite()) {
            continue;
        }
        markers.push(doc.append(
            group,
            Element::new("circle")
                .attr("cx", fmt_num(cx))
                .attr("cy", fmt_num(cy))
                .attr("r", MARKER_RADIUS)
                .attr("stroke", "black")
                .attr("stroke-width", 2)
                .attr("fill", "none"),
        ));
    }

    // Axes last, x at the bottom of the plotting area
    let x_axis = doc.append(
        group,
        Element::new("g").attr("transform", format!("translate(0,{})", layout.inner_height())),
    );
    let bottom = Axis::bottom(&x);
    bottom.render_into(doc, x_axis);

    let y_axis = doc.append(group, Element::new("g"));
    let left = Axis::left(&y);
    left.render_into(doc, y_axis);
    debug!("Axis ticks: {} bottom, {} left", bottom.tick_count(), left.tick_count());

    info!(
        "📈 Rendered {} rows: 2 lines, {} markers, 2 axes",
        rows.len(),
        markers.len()
    );

    Ok(RenderedChart {
        close_path,
        open_path,
        markers,
        x_axis,
        y_axis,
    })
}

fn append_series(
    doc: &mut SvgDocument,
    group: NodeId,
    line: &LineGenerator<'_>,
    rows: &[PriceRow],
) -> NodeId {
    doc.append(
        group,
        Element::new("path")
            .attr("class", line.series().css_class())
            .attr("d", line.path_data(rows)),
    )
}

/// Full pipeline into a fresh document: canvas setup followed by rendering.
/// Scales are validated before anything is appended, so a failure leaves no partial output.
pub fn render_document(
    rows: &[PriceRow],
    layout: &CanvasLayout,
) -> Result<(SvgDocument, RenderedChart), ChartError> {
    build_scales(rows, layout)?;

    let mut doc = SvgDocument::new();
    let group = setup_canvas(&mut doc, layout);
    let chart = render_chart(&mut doc, group, rows, layout)?;
    Ok((doc, chart))
}
