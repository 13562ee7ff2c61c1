use tracing::debug;

use crate::utils::svg::{Element, NodeId, SvgDocument};

/// Space reserved around the plotting area, clockwise from top
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 30.0,
            left: 50.0,
        }
    }
}

/// Outer canvas size plus margins
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasLayout {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
}

impl Default for CanvasLayout {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 500.0,
            margin: Margin::default(),
        }
    }
}

impl CanvasLayout {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin: Margin::default(),
        }
    }

    pub fn inner_width(&self) -> f64 {
        self.width - self.margin.left - self.margin.right
    }

    pub fn inner_height(&self) -> f64 {
        self.height - self.margin.top - self.margin.bottom
    }
}

/// Create the root `<svg>` in `doc` and the margin-offset `<g>`; returns the group handle
pub fn setup_canvas(doc: &mut SvgDocument, layout: &CanvasLayout) -> NodeId {
    let svg = doc.append(
        doc.root(),
        Element::new("svg")
            .attr("width", layout.width)
            .attr("height", layout.height),
    );

    let group = doc.append(
        svg,
        Element::new("g").attr(
            "transform",
            format!("translate({},{})", layout.margin.left, layout.margin.top),
        ),
    );

    debug!(
        "Canvas {}x{}, plotting area {}x{}",
        layout.width,
        layout.height,
        layout.inner_width(),
        layout.inner_height()
    );
    group
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_dimensions() {
        let layout = CanvasLayout::default();
        assert_eq!(layout.inner_width(), 890.0);
        assert_eq!(layout.inner_height(), 450.0);
    }

    #[test]
    fn test_setup_canvas_creates_offset_group() {
        let mut doc = SvgDocument::new();
        let group = setup_canvas(&mut doc, &CanvasLayout::default());

        let svg = doc.children(doc.root())[0];
        assert_eq!(doc.element(svg).tag, "svg");
        assert_eq!(doc.element(svg).get("width"), Some("960"));
        assert_eq!(doc.element(svg).get("height"), Some("500"));
        assert_eq!(doc.children(svg), &[group]);
        assert_eq!(doc.element(group).get("transform"), Some("translate(50,20)"));
    }
}
