//! Lightweight Markdown rendering
//!
//! Supports the subset a short post needs: `#`..`###` headings, `**strong**`,
//! `*emphasis*`, images, links, `- ` list items and blank-line separated
//! paragraphs. The source is first parsed into a typed [`Fragment`] and then
//! serialized, so every piece of text and every attribute is escaped on the
//! way out.

use lazy_static::lazy_static;
use regex::Regex;

use crate::helpers::{escape_text, html_escape, is_absolute_url};

lazy_static! {
    static ref BLOCK_SEPARATOR: Regex = Regex::new(r"\n{2,}").unwrap();
    static ref HEADING: Regex = Regex::new(r"^(#{1,3})\s+(.+)$").unwrap();
    static ref LIST_ITEM: Regex = Regex::new(r"^-\s+(.+)$").unwrap();

    /// Inline passes, applied in this order over the whole text run
    static ref INLINE_PASSES: Vec<(InlineRule, Regex)> = vec![
        (InlineRule::Strong, Regex::new(r"\*\*(.+?)\*\*").unwrap()),
        (InlineRule::Emphasis, Regex::new(r"\*(.+?)\*").unwrap()),
        (InlineRule::Image, Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap()),
        (InlineRule::Link, Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap()),
    ];
}

/// Inline element of a rendered fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
    Image {
        src: String,
        alt: String,
    },
    Link {
        href: String,
        /// Off-site links open in a new browsing context without an opener
        external: bool,
        children: Vec<Inline>,
    },
}

/// Block element of a rendered fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, children: Vec<Inline> },
    Paragraph(Vec<Inline>),
    /// Inline content emitted without a paragraph wrapper
    Bare(Vec<Inline>),
    List(Vec<Vec<Inline>>),
}

/// A parsed Markdown document, ready to be serialized as HTML
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InlineRule {
    Strong,
    Emphasis,
    Image,
    Link,
}

/// One line-level piece of a blank-line separated block
enum Segment<'a> {
    Heading(u8, &'a str),
    List(Vec<&'a str>),
    Text(Vec<&'a str>),
}

/// First code point standing in for already-matched inline markup.
/// Planes 15 and 16 are private use, so every char from here up is a marker.
const MARKER_BASE: u32 = 0xF0000;

/// What a marker code point stands for
#[derive(Debug, Clone)]
enum Marker {
    /// Opening of a wrapping rule; `target` is the link URL, empty otherwise
    Open { rule: InlineRule, target: String },
    Close(InlineRule),
    /// A finished element with no further inline content
    Atom(Inline),
}

impl Marker {
    /// Source text the marker replaced
    fn literal(&self) -> String {
        match self {
            Marker::Open { rule, .. } => rule.delimiters().0.to_string(),
            Marker::Close(rule) => rule.delimiters().1.to_string(),
            Marker::Atom(Inline::Text(text)) => text.clone(),
            Marker::Atom(Inline::Image { src, alt }) => format!("![{}]({})", alt, src),
            Marker::Atom(_) => String::new(),
        }
    }
}

impl InlineRule {
    fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            InlineRule::Strong => ("**", "**"),
            InlineRule::Emphasis => ("*", "*"),
            InlineRule::Image => ("![", "]"),
            InlineRule::Link => ("[", "]"),
        }
    }

    fn into_inline(self, target: String, children: Vec<Inline>) -> Inline {
        match self {
            InlineRule::Strong => Inline::Strong(children),
            InlineRule::Emphasis => Inline::Emphasis(children),
            InlineRule::Image | InlineRule::Link => Inline::Link {
                external: is_absolute_url(&target),
                href: target,
                children,
            },
        }
    }
}

/// A text run being rewritten one inline pass at a time
///
/// Each match is replaced by marker code points, so later passes cannot
/// re-match delimiters an earlier pass consumed, yet may still span the
/// markup it produced. A match is only taken when the markers inside it
/// are balanced, which keeps the final tree well-nested.
struct InlineMarkup {
    text: String,
    markers: Vec<Marker>,
}

impl InlineMarkup {
    fn new(source: &str) -> Self {
        let mut markup = Self {
            text: String::with_capacity(source.len()),
            markers: Vec::new(),
        };
        for c in source.chars() {
            if is_marker(c) {
                // Source chars in the marker range are carried as literal atoms
                let atom = markup
                    .marker(Marker::Atom(Inline::Text(c.to_string())))
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                markup.text.push(atom);
            } else {
                markup.text.push(c);
            }
        }
        markup
    }

    fn marker(&mut self, marker: Marker) -> Option<char> {
        let index = u32::try_from(self.markers.len()).ok()?;
        let c = char::from_u32(MARKER_BASE.checked_add(index)?)?;
        self.markers.push(marker);
        Some(c)
    }

    fn lookup(&self, c: char) -> Option<&Marker> {
        if !is_marker(c) {
            return None;
        }
        self.markers.get((c as u32 - MARKER_BASE) as usize)
    }

    fn is_balanced(&self, span: &str) -> bool {
        let mut depth = 0usize;
        for marker in span.chars().filter_map(|c| self.lookup(c)) {
            match marker {
                Marker::Open { .. } => depth += 1,
                Marker::Close(_) => match depth.checked_sub(1) {
                    Some(d) => depth = d,
                    None => return false,
                },
                Marker::Atom(_) => {}
            }
        }
        depth == 0
    }

    /// Restore the source text of a span, for attribute values
    fn literal(&self, span: &str) -> String {
        let mut out = String::with_capacity(span.len());
        for c in span.chars() {
            match self.lookup(c) {
                Some(marker) => out.push_str(&marker.literal()),
                None => out.push(c),
            }
        }
        out
    }

    /// Rewrite every match of one rule, left to right
    fn apply(&mut self, rule: InlineRule, re: &Regex) {
        let text = std::mem::take(&mut self.text);
        let mut out = String::with_capacity(text.len());
        let mut pos = 0;

        while let Some(caps) = re.captures(&text[pos..]) {
            let Some(whole) = caps.get(0) else { break };
            let start = pos + whole.start();
            let end = pos + whole.end();
            let inner = caps.get(1).map_or("", |m| m.as_str());
            let target = caps.get(2).map_or("", |m| m.as_str());

            match self.replacement(rule, &text[start..end], inner, target) {
                Some(replacement) => {
                    out.push_str(&text[pos..start]);
                    out.push_str(&replacement);
                    pos = end;
                }
                None => {
                    // Retry past the opening char so a later delimiter can pair up
                    let next = start + text[start..].chars().next().map_or(1, char::len_utf8);
                    out.push_str(&text[pos..next]);
                    pos = next;
                }
            }
        }

        out.push_str(&text[pos..]);
        self.text = out;
    }

    fn replacement(
        &mut self,
        rule: InlineRule,
        whole: &str,
        inner: &str,
        target: &str,
    ) -> Option<String> {
        if !self.is_balanced(whole) {
            return None;
        }
        match rule {
            InlineRule::Image => {
                let image = Inline::Image {
                    src: self.literal(target),
                    alt: self.literal(inner),
                };
                self.marker(Marker::Atom(image)).map(String::from)
            }
            InlineRule::Link => {
                let target = self.literal(target);
                self.wrap(rule, target, inner)
            }
            InlineRule::Strong | InlineRule::Emphasis => self.wrap(rule, String::new(), inner),
        }
    }

    fn wrap(&mut self, rule: InlineRule, target: String, inner: &str) -> Option<String> {
        let open = self.marker(Marker::Open { rule, target })?;
        let close = self.marker(Marker::Close(rule))?;
        let mut out = String::with_capacity(inner.len() + 8);
        out.push(open);
        out.push_str(inner);
        out.push(close);
        Some(out)
    }

    /// Build the inline tree from the rewritten text
    fn finish(&self) -> Vec<Inline> {
        let mut stack: Vec<(InlineRule, String, Vec<Inline>)> = Vec::new();
        let mut current: Vec<Inline> = Vec::new();
        let mut buffer = String::new();

        for c in self.text.chars() {
            let Some(marker) = self.lookup(c) else {
                buffer.push(c);
                continue;
            };
            push_text(&mut current, &std::mem::take(&mut buffer));
            match marker {
                Marker::Atom(inline) => current.push(inline.clone()),
                Marker::Open { rule, target } => {
                    stack.push((*rule, target.clone(), std::mem::take(&mut current)));
                }
                Marker::Close(_) => {
                    if let Some((rule, target, parent)) = stack.pop() {
                        let children = std::mem::replace(&mut current, parent);
                        current.push(rule.into_inline(target, children));
                    }
                }
            }
        }
        push_text(&mut current, &buffer);

        // Balanced matches leave nothing open; fold anything left regardless
        while let Some((rule, target, parent)) = stack.pop() {
            let children = std::mem::replace(&mut current, parent);
            current.push(rule.into_inline(target, children));
        }
        current
    }
}

fn is_marker(c: char) -> bool {
    c as u32 >= MARKER_BASE
}

/// Markdown renderer for the supported subset
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self
    }

    /// Render markdown to an HTML fragment
    pub fn render(&self, markdown: &str) -> String {
        self.parse(markdown).to_html()
    }

    /// Parse markdown into a typed fragment
    pub fn parse(&self, markdown: &str) -> Fragment {
        let normalized = markdown.replace("\r\n", "\n");
        let mut blocks = Vec::new();

        for chunk in BLOCK_SEPARATOR.split(&normalized) {
            for (i, segment) in split_segments(chunk).into_iter().enumerate() {
                match segment {
                    Segment::Heading(level, text) => blocks.push(Block::Heading {
                        level,
                        children: parse_inlines(text.trim_end()),
                    }),
                    Segment::List(items) => blocks.push(Block::List(
                        items
                            .into_iter()
                            .map(|item| parse_inlines(item.trim_end()))
                            .collect(),
                    )),
                    Segment::Text(lines) => {
                        let text = lines.join("\n");
                        let text = text.trim();
                        if text.is_empty() {
                            continue;
                        }
                        let children = parse_inlines(text);
                        // Only text opening a block is wrapped; a block led by
                        // an image or link stays bare, as does text after a
                        // heading or list within the same block.
                        let leads_with_media = matches!(
                            children.first(),
                            Some(Inline::Image { .. }) | Some(Inline::Link { .. })
                        );
                        if i == 0 && !leads_with_media {
                            blocks.push(Block::Paragraph(children));
                        } else {
                            blocks.push(Block::Bare(children));
                        }
                    }
                }
            }
        }

        Fragment { blocks }
    }
}

/// Group the lines of one block into headings, list runs and text runs
fn split_segments(chunk: &str) -> Vec<Segment<'_>> {
    let mut segments: Vec<Segment<'_>> = Vec::new();

    for line in chunk.split('\n') {
        if let Some(caps) = HEADING.captures(line) {
            let level = caps.get(1).map_or(1, |m| m.as_str().len()) as u8;
            let text = caps.get(2).map_or("", |m| m.as_str());
            segments.push(Segment::Heading(level, text));
        } else if let Some(item) = LIST_ITEM.captures(line).and_then(|c| c.get(1)) {
            match segments.last_mut() {
                Some(Segment::List(items)) => items.push(item.as_str()),
                _ => segments.push(Segment::List(vec![item.as_str()])),
            }
        } else {
            match segments.last_mut() {
                Some(Segment::Text(lines)) => lines.push(line),
                _ => segments.push(Segment::Text(vec![line])),
            }
        }
    }

    segments
}

/// Parse inline markup: bold, then italic, then images, then links
fn parse_inlines(text: &str) -> Vec<Inline> {
    let mut markup = InlineMarkup::new(text);
    for (rule, re) in INLINE_PASSES.iter() {
        markup.apply(*rule, re);
    }
    markup.finish()
}

fn push_text(out: &mut Vec<Inline>, text: &str) {
    if !text.is_empty() {
        out.push(Inline::Text(text.to_string()));
    }
}

impl Fragment {
    /// Serialize to HTML; blocks are separated by newlines
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                html.push('\n');
            }
            block.push_html(&mut html);
        }
        html
    }
}

impl Block {
    fn push_html(&self, out: &mut String) {
        match self {
            Block::Heading { level, children } => {
                out.push_str(&format!("<h{}>", level));
                push_inlines(out, children);
                out.push_str(&format!("</h{}>", level));
            }
            Block::Paragraph(children) => {
                out.push_str("<p>");
                push_inlines(out, children);
                out.push_str("</p>");
            }
            Block::Bare(children) => push_inlines(out, children),
            Block::List(items) => {
                out.push_str("<ul>");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push('\n');
                    }
                    out.push_str("<li>");
                    push_inlines(out, item);
                    out.push_str("</li>");
                }
                out.push_str("</ul>");
            }
        }
    }
}

fn push_inlines(out: &mut String, inlines: &[Inline]) {
    for inline in inlines {
        inline.push_html(out);
    }
}

impl Inline {
    fn push_html(&self, out: &mut String) {
        match self {
            Inline::Text(text) => out.push_str(&escape_text(text)),
            Inline::Strong(children) => {
                out.push_str("<strong>");
                push_inlines(out, children);
                out.push_str("</strong>");
            }
            Inline::Emphasis(children) => {
                out.push_str("<em>");
                push_inlines(out, children);
                out.push_str("</em>");
            }
            Inline::Image { src, alt } => {
                out.push_str(&format!(
                    r#"<img src="{}" alt="{}" loading="lazy">"#,
                    html_escape(src),
                    html_escape(alt)
                ));
            }
            Inline::Link {
                href,
                external,
                children,
            } => {
                if *external {
                    out.push_str(&format!(
                        r#"<a href="{}" target="_blank" rel="noopener">"#,
                        html_escape(href)
                    ));
                } else {
                    out.push_str(&format!(r#"<a href="{}">"#, html_escape(href)));
                }
                push_inlines(out, children);
                out.push_str("</a>");
            }
        }
    }
}
