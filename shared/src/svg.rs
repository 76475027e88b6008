//! Minimal SVG document builder.
//!
//! Elements are assembled as a tree and serialized in one pass, so every
//! attribute value and text node goes through escaping.

use std::fmt::{self, Display, Write};

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An SVG element with attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Root `<svg>` element with size, viewBox and namespace set.
    pub fn svg(width: u32, height: u32) -> Self {
        Self::new("svg")
            .attr("width", width)
            .attr("height", height)
            .attr("viewBox", format!("0 0 {} {}", width, height))
            .attr("xmlns", SVG_NS)
    }

    pub fn attr(mut self, key: &'static str, value: impl Display) -> Self {
        self.attrs.push((key, value.to_string()));
        self
    }

    pub fn child(mut self, element: Element) -> Self {
        self.push(element);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn push(&mut self, element: Element) {
        self.children.push(Node::Element(element));
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// All descendant elements, depth first.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        let mut stack: Vec<&Element> = self.children().collect();
        stack.reverse();
        while let Some(element) = stack.pop() {
            out.push(element);
            let mut kids: Vec<&Element> = element.children().collect();
            kids.reverse();
            stack.extend(kids);
        }
        out
    }

    fn write_to(&self, out: &mut String, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        write!(out, "{}<{}", indent, self.name)?;
        for (key, value) in &self.attrs {
            write!(out, " {}=\"{}\"", key, escape_attr(value))?;
        }

        if self.children.is_empty() {
            return out.write_str("/>");
        }
        out.write_char('>')?;

        let text_only = self.children.iter().all(|node| matches!(node, Node::Text(_)));
        for node in &self.children {
            match node {
                Node::Text(text) if text_only => out.write_str(&escape_text(text))?,
                Node::Text(text) => write!(out, "\n{}  {}", indent, escape_text(text))?,
                Node::Element(element) => {
                    out.write_char('\n')?;
                    element.write_to(out, depth + 1)?;
                }
            }
        }
        if !text_only {
            write!(out, "\n{}", indent)?;
        }
        write!(out, "</{}>", self.name)
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_to(&mut out, 0)?;
        f.write_str(&out)
    }
}

pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}
