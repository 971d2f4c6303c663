//! Presentational tree produced by the renderer and its HTML serialisation.

use std::fmt;

use super::types::AudioTrack;

const VOID_ELEMENTS: [&str; 6] = ["img", "source", "br", "hr", "input", "track"];

/// A CSS property value. Numbers are lengths in pixels, strings are emitted verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Pixels(f64),
    Keyword(String),
}

impl StyleValue {
    pub fn keyword(value: impl Into<String>) -> Self {
        Self::Keyword(value.into())
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Pixels(value) => write!(f, "{value}px"),
            StyleValue::Keyword(value) => f.write_str(value),
        }
    }
}

/// Ordered inline style declarations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    declarations: Vec<(String, StyleValue)>,
}

impl Style {
    /// Set `property`, replacing any earlier declaration of it.
    pub fn set(&mut self, property: impl Into<String>, value: StyleValue) {
        let property = property.into();
        match self
            .declarations
            .iter_mut()
            .find(|(existing, _)| *existing == property)
        {
            Some((_, slot)) => *slot = value,
            None => self.declarations.push((property, value)),
        }
    }

    pub fn get(&self, property: &str) -> Option<&StyleValue> {
        self.declarations
            .iter()
            .find(|(existing, _)| existing == property)
            .map(|(_, value)| value)
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn to_css(&self) -> String {
        self.declarations
            .iter()
            .map(|(property, value)| format!("{property}: {value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// An HTML element with inline style and children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub class: Option<String>,
    pub style: Style,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            class: None,
            style: Style::default(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(Node::Text(text.into()))
    }

    pub fn push_child(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        if let Some(class) = &self.class {
            push_attribute(out, "class", class);
        }
        if !self.style.is_empty() {
            push_attribute(out, "style", &self.style.to_css());
        }
        for (name, value) in &self.attributes {
            push_attribute(out, name, value);
        }

        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            out.push_str(" />");
            return;
        }

        out.push('>');
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

/// Node of the presentational tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// Plain text, escaped on output.
    Text(String),
    /// Markup produced by a transform, emitted verbatim.
    Html(String),
    /// Playable control for one extracted audio track.
    AudioPlayer(AudioTrack),
    /// Sibling nodes without a wrapper.
    Fragment(Vec<Node>),
}

impl Node {
    pub fn empty() -> Self {
        Node::Fragment(Vec::new())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Audio players anywhere in the tree, in document order.
    pub fn audio_tracks(&self) -> Vec<&AudioTrack> {
        fn walk<'a>(node: &'a Node, found: &mut Vec<&'a AudioTrack>) {
            match node {
                Node::AudioPlayer(track) => found.push(track),
                Node::Element(element) => element.children.iter().for_each(|c| walk(c, found)),
                Node::Fragment(children) => children.iter().for_each(|c| walk(c, found)),
                Node::Text(_) | Node::Html(_) => {}
            }
        }

        let mut found = Vec::new();
        walk(self, &mut found);
        found
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Element(element) => element.write_html(out),
            Node::Text(text) => out.push_str(&escape_text(text)),
            Node::Html(html) => out.push_str(html),
            Node::AudioPlayer(track) => audio_player_element(track).write_html(out),
            Node::Fragment(children) => children.iter().for_each(|child| child.write_html(out)),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

fn audio_player_element(track: &AudioTrack) -> Element {
    Element::new("div").with_class("audio-player").with_child(
        Element::new("audio")
            .with_attribute("controls", "")
            .with_attribute("preload", "none")
            .with_attribute("src", track.src.as_str())
            .into(),
    )
}

fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape_attribute(value));
    out.push('"');
}

fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\n' | '\r' | '\t' => escaped.push(' '),
            _ => escaped.push(ch),
        }
    }
    escaped
}
