use crate::services::scale::{LinearScale, TimeScale};
use crate::utils::svg::{fmt_num, Element, NodeId, SvgDocument};

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;
const TICK_COUNT: usize = 10;
// Crisp 1px lines on standard-density displays
const OFFSET: f64 = 0.5;

/// Anything an axis can be drawn for
pub trait AxisScale {
    fn range(&self) -> (f64, f64);
    /// Pixel position and label of each tick
    fn tick_marks(&self, count: usize) -> Vec<(f64, String)>;
}

impl AxisScale for TimeScale {
    fn range(&self) -> (f64, f64) {
        TimeScale::range(self)
    }

    fn tick_marks(&self, count: usize) -> Vec<(f64, String)> {
        self.ticks(count)
            .into_iter()
            .map(|t| (self.apply_datetime(t), self.tick_format(t)))
            .collect()
    }
}

impl AxisScale for LinearScale {
    fn range(&self) -> (f64, f64) {
        LinearScale::range(self)
    }

    fn tick_marks(&self, count: usize) -> Vec<(f64, String)> {
        let format = self.tick_format(count);
        self.ticks(count)
            .into_iter()
            .map(|t| (self.apply(t), format(t)))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orient {
    Bottom,
    Left,
}

/// A horizontal or vertical axis with automatically generated ticks
#[derive(Debug, Clone)]
pub struct Axis {
    orient: Orient,
    range: (f64, f64),
    ticks: Vec<(f64, String)>,
}

impl Axis {
    pub fn bottom(scale: &impl AxisScale) -> Self {
        Self::new(Orient::Bottom, scale)
    }

    pub fn left(scale: &impl AxisScale) -> Self {
        Self::new(Orient::Left, scale)
    }

    fn new(orient: Orient, scale: &impl AxisScale) -> Self {
        Self {
            orient,
            range: scale.range(),
            ticks: scale
                .tick_marks(TICK_COUNT)
                .into_iter()
                .filter(|(pos, _)| pos.is_finite())
                .collect(),
        }
    }

    pub fn tick_count(&self) -> usize {
        self.ticks.len()
    }

    /// Draw into the (already positioned) `group`: domain path first, then one `g.tick` per tick
    pub fn render_into(&self, doc: &mut SvgDocument, group: NodeId) {
        let k = match self.orient {
            Orient::Bottom => 1.0,
            Orient::Left => -1.0,
        };
        let anchor = match self.orient {
            Orient::Bottom => "middle",
            Orient::Left => "end",
        };

        doc.set_attr(group, "fill", "none");
        doc.set_attr(group, "font-size", 10);
        doc.set_attr(group, "font-family", "sans-serif");
        doc.set_attr(group, "text-anchor", anchor);

        let r0 = fmt_num(self.range.0 + OFFSET);
        let r1 = fmt_num(self.range.1 + OFFSET);
        let outer = fmt_num(k * TICK_SIZE);
        let off = fmt_num(OFFSET);
        let domain = match self.orient {
            Orient::Bottom => format!("M{},{}V{}H{}V{}", r0, outer, off, r1, outer),
            Orient::Left => format!("M{},{}H{}V{}H{}", outer, r0, off, r1, outer),
        };
        doc.append(
            group,
            Element::new("path")
                .attr("class", "domain")
                .attr("stroke", "currentColor")
                .attr("d", domain),
        );

        let spacing = fmt_num(k * (TICK_SIZE + TICK_PADDING));
        let tick_len = fmt_num(k * TICK_SIZE);
        for (pos, label) in &self.ticks {
            let at = fmt_num(pos + OFFSET);
            let (transform, line, text) = match self.orient {
                Orient::Bottom => (
                    format!("translate({},0)", at),
                    Element::new("line").attr("stroke", "currentColor").attr("y2", &tick_len),
                    Element::new("text")
                        .attr("fill", "currentColor")
                        .attr("y", &spacing)
                        .attr("dy", "0.71em"),
                ),
                Orient::Left => (
                    format!("translate(0,{})", at),
                    Element::new("line").attr("stroke", "currentColor").attr("x2", &tick_len),
                    Element::new("text")
                        .attr("fill", "currentColor")
                        .attr("x", &spacing)
                        .attr("dy", "0.32em"),
                ),
            };

            let tick = doc.append(
                group,
                Element::new("g")
                    .attr("class", "tick")
                    .attr("opacity", 1)
                    .attr("transform", transform),
            );
            doc.append(tick, line);
            doc.append(tick, text.text(label.as_str()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_left_axis_structure() {
        let scale = LinearScale::new((0.0, 13.0), (450.0, 0.0));
        let mut doc = SvgDocument::new();
        let g = doc.append(doc.root(), Element::new("g"));
        let axis = Axis::left(&scale);
        axis.render_into(&mut doc, g);

        let children = doc.children(g);
        assert_eq!(children.len(), 1 + axis.tick_count());
        assert_eq!(doc.element(children[0]).get("d"), Some("M-6,450.5H0.5V0.5H-6"));
        assert_eq!(doc.element(g).get("text-anchor"), Some("end"));

        // Tick for 0 sits at the bottom, labelled without decimals
        let first_tick = children[1];
        assert_eq!(doc.element(first_tick).get("transform"), Some("translate(0,450.5)"));
        let label = doc.children(first_tick)[1];
        assert_eq!(doc.element(label).text.as_deref(), Some("0"));
        assert_eq!(doc.element(label).get("x"), Some("-9"));
    }

    #[test]
    fn test_bottom_axis_domain() {
        let scale = TimeScale::new(
            (
                NaiveDate::from_ymd_opt(2012, 5, 1).unwrap(),
                NaiveDate::from_ymd_opt(2012, 5, 11).unwrap(),
            ),
            (0.0, 890.0),
        );
        let mut doc = SvgDocument::new();
        let g = doc.append(doc.root(), Element::new("g"));
        let axis = Axis::bottom(&scale);
        axis.render_into(&mut doc, g);

        assert_eq!(axis.tick_count(), 11);
        let domain = doc.children(g)[0];
        assert_eq!(doc.element(domain).get("d"), Some("M0.5,6V0.5H890.5V6"));
        assert_eq!(doc.find_by_class("tick").len(), 11);
    }
}
