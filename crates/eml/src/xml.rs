//! Ordered XML node tree and text writer.
//!
//! The EML record is mapped onto [`XmlNode`]s before it becomes text. A node carries its
//! attributes and children in insertion order, so the order in which a record is assembled is
//! exactly the order in which it is written. Nothing here sorts, deduplicates or reorders.
//!
//! Rendering rules:
//! - attributes are written inside the start tag, in insertion order
//! - repeated children with the same name are written as repeated siblings
//! - a node with neither text nor children is self-closed (`<para/>`)
//! - text and attribute values are escaped; names are validated, never escaped
//! - characters XML 1.0 cannot carry are rejected, and `\r` is written as `&#13;` so it
//!   survives line-ending normalisation

use crate::constants::XML_DECLARATION;
use crate::{EmlWireError, EmlWireResult};
use std::borrow::Cow;

/// Upper bound for the pretty-print indent width.
const MAX_INDENT: usize = 8;

/// A single XML element.
#[derive(Clone, Debug, PartialEq)]
pub struct XmlNode {
    name: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<XmlNode>,
}

impl XmlNode {
    /// Creates an element with no attributes, text or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Creates an element holding only text content.
    pub fn leaf(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name).with_text(text)
    }

    /// Appends an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Sets the text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Appends a child element.
    pub fn child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    /// Appends a child element when one is present.
    pub fn optional_child(mut self, child: Option<XmlNode>) -> Self {
        if let Some(child) = child {
            self.children.push(child);
        }
        self
    }

    /// Appends every element yielded by `children`, preserving their order.
    pub fn children(mut self, children: impl IntoIterator<Item = XmlNode>) -> Self {
        self.children.extend(children);
        self
    }
}

/// Options controlling the textual layout of rendered XML.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Write one element per line, indented by depth.
    pub pretty: bool,

    /// Spaces per nesting level when `pretty` is set.
    pub indent: usize,

    /// Emit the XML declaration ahead of the root element.
    pub declaration: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: 2,
            declaration: true,
        }
    }
}

impl RenderOptions {
    /// Single-line output without a declaration.
    pub fn compact() -> Self {
        Self {
            pretty: false,
            indent: 0,
            declaration: false,
        }
    }
}

/// Renders [`XmlNode`] trees to text.
#[derive(Clone, Debug)]
pub struct XmlWriter {
    options: RenderOptions,
}

impl XmlWriter {
    /// Creates a writer, rejecting indent widths above the supported maximum.
    pub fn new(options: RenderOptions) -> EmlWireResult<Self> {
        if options.indent > MAX_INDENT {
            return Err(EmlWireError::InvalidOptions(format!(
                "indent must be at most {MAX_INDENT} spaces, got {}",
                options.indent
            )));
        }
        Ok(Self { options })
    }

    /// Renders `root` (and the declaration, if enabled) to a string.
    pub fn render(&self, root: &XmlNode) -> EmlWireResult<String> {
        let mut out = String::new();
        if self.options.declaration {
            out.push_str(XML_DECLARATION);
            self.newline(&mut out);
        }
        self.write_node(&mut out, root, 0)?;
        Ok(out)
    }

    fn write_node(&self, out: &mut String, node: &XmlNode, depth: usize) -> EmlWireResult<()> {
        validate_name(&node.name)?;
        self.write_indent(out, depth);
        out.push('<');
        out.push_str(&node.name);

        for (name, value) in &node.attributes {
            validate_name(name)?;
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape(value, true)?);
            out.push('"');
        }

        let text = node.text.as_deref().filter(|text| !text.is_empty());

        if node.children.is_empty() {
            match text {
                None => out.push_str("/>"),
                Some(text) => {
                    out.push('>');
                    out.push_str(&escape(text, false)?);
                    write_close(out, &node.name);
                }
            }
            return Ok(());
        }

        out.push('>');
        if let Some(text) = text {
            self.newline(out);
            self.write_indent(out, depth + 1);
            out.push_str(&escape(text, false)?);
        }
        for child in &node.children {
            self.newline(out);
            self.write_node(out, child, depth + 1)?;
        }
        self.newline(out);
        self.write_indent(out, depth);
        write_close(out, &node.name);
        Ok(())
    }

    fn newline(&self, out: &mut String) {
        if self.options.pretty {
            out.push('\n');
        }
    }

    fn write_indent(&self, out: &mut String, depth: usize) {
        if self.options.pretty {
            out.extend(std::iter::repeat(' ').take(depth * self.options.indent));
        }
    }
}

fn write_close(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

/// Validates an element or attribute name.
///
/// Accepts ASCII names starting with a letter or `_`, followed by letters, digits, `-`, `_`,
/// `.` or `:` (namespace prefixes such as `eml:eml` and `xmlns:xsi`).
fn validate_name(name: &str) -> EmlWireResult<()> {
    let mut bytes = name.bytes();
    let valid_start = matches!(bytes.next(), Some(b'a'..=b'z' | b'A'..=b'Z' | b'_'));
    let valid_rest = bytes.all(|b| {
        matches!(b, b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b':')
    });

    if valid_start && valid_rest {
        Ok(())
    } else {
        Err(EmlWireError::InvalidName(name.to_string()))
    }
}

/// Characters outside the XML 1.0 `Char` production. `\t`, `\n` and `\r` are allowed.
fn is_forbidden(c: char) -> bool {
    matches!(
        c,
        '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}'
    )
}

fn escape(value: &str, in_attribute: bool) -> EmlWireResult<Cow<'_, str>> {
    if let Some(c) = value.chars().find(|&c| is_forbidden(c)) {
        return Err(EmlWireError::InvalidText(format!(
            "U+{:04X} cannot appear in XML content",
            u32::from(c)
        )));
    }

    let needs_escape = |c: char| match c {
        '&' | '<' | '>' | '\r' => true,
        '"' => in_attribute,
        _ => false,
    };

    if !value.chars().any(needs_escape) {
        return Ok(Cow::Borrowed(value));
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\r' => escaped.push_str("&#13;"),
            '"' if in_attribute => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    Ok(Cow::Owned(escaped))
}
