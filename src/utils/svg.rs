//! Minimal retained SVG document used as an explicit render target.
//!
//! Nodes live in an arena owned by the document and are addressed through
//! [`NodeId`] handles, so a caller always appends to the exact group it
//! created instead of looking one up.

use std::fmt::Write;

/// Handle to a node inside one [`SvgDocument`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A single SVG element with ordered attributes and optional text content
#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub text: Option<String>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: Vec::new(),
            text: None,
        }
    }

    /// Builder-style attribute setter; replaces an existing attribute of the same name
    pub fn attr(mut self, name: &str, value: impl ToString) -> Self {
        self.set(name, value.to_string());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn set(&mut self, name: &str, value: String) {
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.get("class")
            .map(|c| c.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone)]
struct Node {
    element: Element,
    children: Vec<NodeId>,
}

/// Arena-backed document. The root is an invisible container; its children
/// are serialized in insertion order.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    nodes: Vec<Node>,
}

impl Default for SvgDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgDocument {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                element: Element::new("#root"),
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append `element` as the last child of `parent`
    pub fn append(&mut self, parent: NodeId, element: Element) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            element,
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: impl ToString) {
        self.nodes[node.0].element.set(name, value.to_string());
    }

    pub fn element(&self, node: NodeId) -> &Element {
        &self.nodes[node.0].element
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// All elements carrying `class`, in document order
    pub fn find_by_class(&self, class: &str) -> Vec<NodeId> {
        self.walk(self.root())
            .into_iter()
            .filter(|id| self.nodes[id.0].element.has_class(class))
            .collect()
    }

    pub fn count_tag(&self, tag: &str) -> usize {
        self.walk(self.root())
            .into_iter()
            .filter(|id| self.nodes[id.0].element.tag == tag)
            .count()
    }

    /// Depth-first pre-order walk below `from` (excluding `from` itself)
    fn walk(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[from.0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        for child in self.children(self.root()) {
            self.write_node(*child, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id.0];
        let el = &node.element;
        out.push('<');
        out.push_str(&el.tag);
        if el.tag == "svg" && el.get("xmlns").is_none() {
            out.push_str(" xmlns=\"http://www.w3.org/2000/svg\"");
        }
        for (k, v) in &el.attrs {
            // Writing into a String cannot fail
            let _ = write!(out, " {}=\"{}\"", k, escape(v));
        }
        if node.children.is_empty() && el.text.is_none() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        if let Some(text) = &el.text {
            out.push_str(&escape(text));
        }
        for child in &node.children {
            self.write_node(*child, out);
        }
        let _ = write!(out, "</{}>", el.tag);
    }
}

/// Format a coordinate the way a browser would print it; `-0` is normalized to `0`
pub fn fmt_num(v: f64) -> String {
    if v == 0.0 {
        "0".to_string()
    } else {
        format!("{}", v)
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
