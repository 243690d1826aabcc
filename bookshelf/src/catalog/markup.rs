//! Catalog serialization and parsing.
//!
//! Two layouts are written. [`Layout::Lines`] puts the whole front matter on
//! one line and every body node on a line of its own, which is what the line
//! dedupe pass operates on. [`Layout::Pretty`] is the final, indented form.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use roxmltree::Node;

use super::{Catalog, CatalogNode};
use crate::config::CatalogConfig;
use crate::error::{BookshelfError, Result};

const ROOT: &str = "FictionBook";
const SUBTITLE: &str = "subtitle";
const PARAGRAPH: &str = "p";
const LINK: &str = "a";
const SPACER: &str = "empty-line";

/// Output layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One body node per line, front matter on a single line.
    Lines,
    /// Indented by two spaces per level.
    Pretty,
}

/// Serialize `catalog` as an FB2 document.
pub fn render(catalog: &Catalog, config: &CatalogConfig, layout: Layout) -> Result<String> {
    let mut out = match layout {
        Layout::Lines => Markup::new(Writer::new(Vec::new()), true),
        Layout::Pretty => Markup::new(Writer::new_with_indent(Vec::new(), b' ', 2), false),
    };

    out.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    out.newline()?;

    let xmlns_link = format!("xmlns:{}", config.link_prefix);
    out.start(BytesStart::new(ROOT).with_attributes([
        ("xmlns", config.document_ns.as_str()),
        (xmlns_link.as_str(), config.link_ns.as_str()),
    ]))?;
    out.newline()?;

    front_matter(&mut out, &catalog.title)?;
    out.newline()?;

    out.start(BytesStart::new("body"))?;
    out.newline()?;
    out.start(BytesStart::new("section"))?;
    out.newline()?;

    let href_attr = format!("{}:href", config.link_prefix);
    for node in &catalog.nodes {
        match node {
            CatalogNode::Header(author) => out.text_element(SUBTITLE, author)?,
            CatalogNode::Entry { href, label } => {
                out.start(BytesStart::new(PARAGRAPH).with_attributes([("name", "book")]))?;
                out.start(BytesStart::new(LINK).with_attributes([(href_attr.as_str(), href.as_str())]))?;
                out.text(label)?;
                out.end(LINK)?;
                out.end(PARAGRAPH)?;
            }
            CatalogNode::Spacer => out.event(Event::Empty(BytesStart::new(SPACER)))?,
        }
        out.newline()?;
    }

    out.end("section")?;
    out.newline()?;
    out.end("body")?;
    out.newline()?;
    out.end(ROOT)?;
    out.newline()?;

    String::from_utf8(out.writer.into_inner())
        .map_err(|e| BookshelfError::malformed_catalog(e.to_string()))
}

/// The fixed description block. Only the book title varies.
fn front_matter(out: &mut Markup, title: &str) -> Result<()> {
    out.start(BytesStart::new("description"))?;

    out.start(BytesStart::new("title-info"))?;
    out.empty("genre")?;
    blank_author(out)?;
    out.text_element("book-title", title)?;
    out.empty("coverpage")?;
    out.empty("lang")?;
    out.empty("keywords")?;
    out.end("title-info")?;

    out.start(BytesStart::new("document-info"))?;
    blank_author(out)?;
    for name in ["program-used", "date", "id", "version"] {
        out.empty(name)?;
    }
    out.end("document-info")?;

    out.start(BytesStart::new("publish-info"))?;
    for name in ["publisher", "year", "isbn"] {
        out.empty(name)?;
    }
    out.end("publish-info")?;

    out.end("description")
}

fn blank_author(out: &mut Markup) -> Result<()> {
    out.start(BytesStart::new("author"))?;
    out.empty("first-name")?;
    out.empty("last-name")?;
    out.end("author")
}

/// Event writer that knows whether line breaks are explicit.
struct Markup {
    writer: Writer<Vec<u8>>,
    explicit_lines: bool,
}

impl Markup {
    fn new(writer: Writer<Vec<u8>>, explicit_lines: bool) -> Self {
        Self {
            writer,
            explicit_lines,
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| BookshelfError::malformed_catalog(e.to_string()))
    }

    fn newline(&mut self) -> Result<()> {
        if self.explicit_lines {
            self.event(Event::Text(BytesText::from_escaped("\n")))?;
        }
        Ok(())
    }

    fn start(&mut self, start: BytesStart<'_>) -> Result<()> {
        self.event(Event::Start(start))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn empty(&mut self, name: &str) -> Result<()> {
        self.event(Event::Empty(BytesStart::new(name)))
    }

    fn text(&mut self, text: &str) -> Result<()> {
        self.event(Event::Text(BytesText::new(text)))
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<()> {
        self.start(BytesStart::new(name))?;
        self.text(text)?;
        self.end(name)
    }
}

/// Parse catalog text back into a [`Catalog`].
///
/// # Errors
///
/// Returns [`BookshelfError::MalformedCatalog`] if the text is not
/// well-formed XML, lacks the `body/section` container, or the section holds
/// anything other than headers, linked entries and spacers.
pub fn parse(text: &str, config: &CatalogConfig) -> Result<Catalog> {
    let doc = roxmltree::Document::parse(text)
        .map_err(|e| BookshelfError::malformed_catalog(e.to_string()))?;
    let root = doc.root_element();
    let ns = config.document_ns.as_str();

    if !root.has_tag_name((ns, ROOT)) {
        return Err(BookshelfError::malformed_catalog(format!(
            "unexpected root element <{}>",
            root.tag_name().name()
        )));
    }

    let title = child(root, ns, "description")
        .and_then(|d| child(d, ns, "title-info"))
        .and_then(|t| child(t, ns, "book-title"))
        .and_then(|b| b.text())
        .unwrap_or_default()
        .to_string();

    let section = child(root, ns, "body")
        .and_then(|b| child(b, ns, "section"))
        .ok_or_else(|| BookshelfError::malformed_catalog("missing body/section"))?;

    let mut nodes = Vec::new();
    for element in section.children().filter(Node::is_element) {
        let name = element.tag_name();
        if name.namespace() != Some(ns) {
            return Err(unexpected(element));
        }

        let node = match name.name() {
            SUBTITLE => CatalogNode::Header(element.text().unwrap_or_default().to_string()),
            PARAGRAPH => {
                let link = child(element, ns, LINK)
                    .and_then(|a| a.attribute((config.link_ns.as_str(), "href")).map(|h| (a, h)));
                let Some((link, href)) = link else {
                    return Err(BookshelfError::malformed_catalog(
                        "book entry without a link",
                    ));
                };
                CatalogNode::Entry {
                    href: href.to_string(),
                    label: link.text().unwrap_or_default().to_string(),
                }
            }
            SPACER => CatalogNode::Spacer,
            _ => return Err(unexpected(element)),
        };
        nodes.push(node);
    }

    Ok(Catalog { title, nodes })
}

fn child<'a, 'input>(node: Node<'a, 'input>, ns: &str, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|c| c.has_tag_name((ns, name)))
}

fn unexpected(element: Node<'_, '_>) -> BookshelfError {
    BookshelfError::malformed_catalog(format!(
        "unexpected <{}> in catalog section",
        element.tag_name().name()
    ))
}
