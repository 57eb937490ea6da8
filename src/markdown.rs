//! Markdown to ANSI terminal text.
//!
//! Replies are parsed with the `markdown` crate (GFM) and walked block by
//! block.  Character styling is applied at the leaves only, so a reset at the
//! end of one span never clears the styling of its parent.

use markdown::{ParseOptions, mdast, to_mdast};
use unicode_width::UnicodeWidthChar;

use crate::style::{StyleConfig, StylePrimitive};

const DEFAULT_BULLET: &str = "• ";
const DEFAULT_ENUMERATION: &str = ". ";
const DEFAULT_LEVEL_INDENT: usize = 2;
const DEFAULT_CODE_MARGIN: usize = 2;
const DEFAULT_QUOTE_TOKEN: &str = "│ ";
const MIN_WRAP_WIDTH: usize = 20;

/// Renders Markdown with a style document.
pub struct MarkdownRenderer<'a> {
    style: &'a StyleConfig,
    width: usize,
    use_color: bool,
}

impl<'a> MarkdownRenderer<'a> {
    /// Creates a renderer wrapping at `width` columns.
    pub fn new(style: &'a StyleConfig, width: usize, use_color: bool) -> Self {
        Self {
            style,
            width,
            use_color,
        }
    }

    /// Renders `text` to terminal lines, each terminated by a newline.
    pub fn render(&self, text: &str) -> String {
        let document = &self.style.document;
        let margin = document.margin.unwrap_or(0);
        let width = self.width.saturating_sub(margin * 2).max(MIN_WRAP_WIDTH);
        let base = document.attributes().merged(&self.style.text.attributes());

        let normalized = text.replace('\t', "    ");
        let root = match to_mdast(&normalized, &ParseOptions::gfm()) {
            Ok(node) => node,
            Err(_) => mdast::Node::Text(mdast::Text {
                value: normalized.clone(),
                position: None,
            }),
        };
        let nodes = match root {
            mdast::Node::Root(root) => root.children,
            other => vec![other],
        };

        let mut lines: Vec<String> = Vec::new();
        for node in &nodes {
            let block = self.block(node, width, &base);
            if block.is_empty() {
                continue;
            }
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.extend(block);
        }

        let pad = " ".repeat(margin);
        let mut out = String::new();
        out.push_str(document.block_prefix.as_deref().unwrap_or(""));
        for line in lines {
            if !line.is_empty() {
                out.push_str(&pad);
            }
            out.push_str(&line);
            out.push('\n');
        }
        out.push_str(document.block_suffix.as_deref().unwrap_or(""));
        out
    }

    fn paint(&self, style: &StylePrimitive, text: &str) -> String {
        style.apply(text, self.use_color)
    }

    fn block(&self, node: &mdast::Node, width: usize, base: &StylePrimitive) -> Vec<String> {
        match node {
            mdast::Node::Paragraph(paragraph) => {
                let base = base.merged(&self.style.paragraph.attributes());
                let text = self.inline(&paragraph.children, &base);
                wrap_text(&text, width)
            }
            mdast::Node::Heading(heading) => {
                let level = self.style.heading_level(heading.depth);
                let attrs = base.merged(&level.attributes());
                let text = format!(
                    "{}{}{}",
                    self.paint(&attrs, level.prefix.as_deref().unwrap_or("")),
                    self.inline(&heading.children, &attrs),
                    self.paint(&attrs, level.suffix.as_deref().unwrap_or("")),
                );
                wrap_text(&text, width)
            }
            mdast::Node::Code(code) => self.code_lines(&code.value),
            mdast::Node::Math(math) => self.code_lines(&math.value),
            mdast::Node::List(list) => self.list(list, 0, width, base),
            mdast::Node::Blockquote(quote) => self.blockquote(quote, width, base),
            mdast::Node::ThematicBreak(_) => {
                let hr = &self.style.hr;
                let rule = match hr.format.as_deref().map(|f| f.trim_matches('\n')) {
                    Some(format) if !format.is_empty() => format.to_string(),
                    _ => "─".repeat(width.min(80)),
                };
                vec![self.paint(&hr.attributes(), &rule)]
            }
            mdast::Node::Html(html) => html
                .value
                .trim_end()
                .lines()
                .map(|line| self.paint(base, line))
                .collect(),
            mdast::Node::Table(table) => self.table(table, base),
            other => match other.children() {
                Some(children) => {
                    let text = self.inline(children, base);
                    wrap_text(&text, width)
                }
                None => Vec::new(),
            },
        }
    }

    fn code_lines(&self, value: &str) -> Vec<String> {
        let code_block = &self.style.code_block;
        let pad = " ".repeat(code_block.margin.unwrap_or(DEFAULT_CODE_MARGIN));
        let attrs = code_block.attributes();
        value
            .split('\n')
            .map(|line| format!("{pad}{}", self.paint(&attrs, line)))
            .collect()
    }

    fn list(
        &self,
        list: &mdast::List,
        depth: usize,
        width: usize,
        base: &StylePrimitive,
    ) -> Vec<String> {
        let level_indent = self.style.list.level_indent.unwrap_or(DEFAULT_LEVEL_INDENT);
        let indent = " ".repeat(level_indent * depth);
        let start = list.start.unwrap_or(1);
        let mut lines = Vec::new();

        for (i, node) in list.children.iter().enumerate() {
            let mdast::Node::ListItem(item) = node else {
                continue;
            };
            let mut marker = if list.ordered {
                let suffix = self
                    .style
                    .enumeration
                    .block_prefix
                    .as_deref()
                    .unwrap_or(DEFAULT_ENUMERATION);
                format!("{}{}", start as usize + i, suffix)
            } else {
                self.style
                    .item
                    .block_prefix
                    .clone()
                    .unwrap_or_else(|| DEFAULT_BULLET.to_string())
            };
            match item.checked {
                Some(true) => marker.push_str("[x] "),
                Some(false) => marker.push_str("[ ] "),
                None => {}
            }
            let marker_width = visible_width(&marker);
            let hang = " ".repeat(marker_width);
            let inner_width = width
                .saturating_sub(indent.len() + marker_width)
                .max(MIN_WRAP_WIDTH);
            let marker = self.paint(&self.style.item.attributes(), &marker);

            let mut first = true;
            for child in &item.children {
                if let mdast::Node::List(nested) = child {
                    lines.extend(self.list(nested, depth + 1, width, base));
                    continue;
                }
                for line in self.block(child, inner_width, base) {
                    if first {
                        lines.push(format!("{indent}{marker}{line}"));
                        first = false;
                    } else {
                        lines.push(format!("{indent}{hang}{line}"));
                    }
                }
            }
            if first {
                lines.push(format!("{indent}{marker}"));
            }
        }
        lines
    }

    fn blockquote(
        &self,
        quote: &mdast::Blockquote,
        width: usize,
        base: &StylePrimitive,
    ) -> Vec<String> {
        let style = &self.style.block_quote;
        let token = style
            .indent_token
            .as_deref()
            .unwrap_or(DEFAULT_QUOTE_TOKEN)
            .repeat(style.indent.unwrap_or(1).max(1));
        let inner_width = width.saturating_sub(visible_width(&token)).max(MIN_WRAP_WIDTH);
        let base = base.merged(&style.attributes());
        let token = self.paint(&style.attributes(), &token);

        let mut lines = Vec::new();
        for (i, child) in quote.children.iter().enumerate() {
            if i > 0 {
                lines.push(token.trim_end().to_string());
            }
            for line in self.block(child, inner_width, &base) {
                lines.push(format!("{token}{line}"));
            }
        }
        lines
    }

    fn table(&self, table: &mdast::Table, base: &StylePrimitive) -> Vec<String> {
        let rows: Vec<Vec<String>> = table
            .children
            .iter()
            .filter_map(|row| match row {
                mdast::Node::TableRow(row) => Some(
                    row.children
                        .iter()
                        .map(|cell| match cell.children() {
                            Some(children) => self.inline(children, base),
                            None => String::new(),
                        })
                        .collect(),
                ),
                _ => None,
            })
            .collect();

        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut widths = vec![0usize; columns];
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(visible_width(cell));
            }
        }

        let mut lines = Vec::new();
        for (r, row) in rows.iter().enumerate() {
            let cells: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, width)| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    let pad = width.saturating_sub(visible_width(cell));
                    format!("{cell}{}", " ".repeat(pad))
                })
                .collect();
            lines.push(cells.join(" │ ").trim_end().to_string());
            if r == 0 {
                let rule: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
                lines.push(rule.join("─┼─"));
            }
        }
        lines
    }

    fn inline(&self, nodes: &[mdast::Node], style: &StylePrimitive) -> String {
        let mut out = String::new();
        for node in nodes {
            match node {
                mdast::Node::Text(text) => {
                    out.push_str(&self.paint(style, &text.value.replace('\n', " ")));
                }
                mdast::Node::Strong(strong) => {
                    let style = style.merged(&self.style.strong.attributes());
                    out.push_str(&self.inline(&strong.children, &style));
                }
                mdast::Node::Emphasis(emphasis) => {
                    let style = style.merged(&self.style.emph.attributes());
                    out.push_str(&self.inline(&emphasis.children, &style));
                }
                mdast::Node::Delete(delete) => {
                    let style = style.merged(&self.style.strikethrough.attributes());
                    out.push_str(&self.inline(&delete.children, &style));
                }
                mdast::Node::InlineCode(code) => {
                    out.push_str(&self.paint(&style.merged(&self.style.code), &code.value));
                }
                mdast::Node::InlineMath(math) => {
                    out.push_str(&self.paint(&style.merged(&self.style.code), &math.value));
                }
                mdast::Node::Link(link) => {
                    let text_style = style.merged(&self.style.link_text.attributes());
                    out.push_str(&self.inline(&link.children, &text_style));
                    let label = plain_text(&link.children);
                    let href = link.url.as_str();
                    let bare = href.strip_prefix("mailto:").unwrap_or(href);
                    if label != href && label != bare {
                        let url_style = style.merged(&self.style.link.attributes());
                        out.push(' ');
                        out.push_str(&self.paint(&url_style, &format!("({href})")));
                    }
                }
                mdast::Node::Image(image) => {
                    let label = if image.alt.is_empty() {
                        image.url.as_str()
                    } else {
                        image.alt.as_str()
                    };
                    let image_style = style.merged(&self.style.image_text.attributes());
                    out.push_str(&self.paint(&image_style, label));
                }
                mdast::Node::Break(_) => out.push('\n'),
                mdast::Node::Html(html) => out.push_str(&self.paint(style, &html.value)),
                other => {
                    if let Some(children) = other.children() {
                        out.push_str(&self.inline(children, style));
                    }
                }
            }
        }
        out
    }
}

/// Renders `text` with `style`, wrapping at `width` columns.
pub fn render_markdown(text: &str, style: &StyleConfig, width: usize, use_color: bool) -> String {
    MarkdownRenderer::new(style, width, use_color).render(text)
}

fn plain_text(nodes: &[mdast::Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            mdast::Node::Text(text) => out.push_str(&text.value),
            mdast::Node::InlineCode(code) => out.push_str(&code.value),
            other => {
                if let Some(children) = other.children() {
                    out.push_str(&plain_text(children));
                }
            }
        }
    }
    out
}

/// Display width of `text`, ignoring ANSI escape sequences.
pub fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // CSI sequences end at a byte in '@'..='~'
            if chars.next() == Some('[') {
                for c in chars.by_ref() {
                    if ('@'..='~').contains(&c) {
                        break;
                    }
                }
            }
            continue;
        }
        width += c.width().unwrap_or(0);
    }
    width
}

/// Greedy word wrap measured in visible columns; hard breaks are kept.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for segment in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0;
        for word in segment.split(' ').filter(|w| !w.is_empty()) {
            let word_width = visible_width(word);
            if line_width > 0 && line_width + 1 + word_width > width {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }
            if line_width > 0 {
                line.push(' ');
                line_width += 1;
            }
            line.push_str(word);
            line_width += word_width;
        }
        lines.push(line);
    }
    lines
}
