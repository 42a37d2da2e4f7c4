// src/render.rs
// =============================================================================
// Renders Markdown (the repository's long description) for the terminal.
//
// We use the `pulldown-cmark` crate which turns Markdown into a stream of
// events (Start(Heading), Text, End(Heading), ...). We walk those events and
// write plain text, with a few ANSI escapes for bold/italic when the output
// is a terminal.
//
// What we keep:
// - headings (as "## Title", bold)
// - paragraphs, bullet and numbered lists, block quotes
// - code blocks (indented by 4 spaces), inline code
// - links as "text (url)"
// - tables as "a | b | c" rows
//
// Raw HTML blocks are dropped; many Docker Hub descriptions are full of them.
// =============================================================================

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

const BOLD: &str = "\x1b[1m";
const ITALIC: &str = "\x1b[3m";
const DIM: &str = "\x1b[2m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

pub fn render_markdown(markdown: &str, ansi: bool) -> String {
    let mut renderer = Renderer::new(ansi);

    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    for event in Parser::new_ext(markdown, options) {
        renderer.event(event);
    }

    renderer.finish()
}

struct Renderer {
    out: String,
    ansi: bool,
    // One entry per open list: Some(next number) for ordered lists
    lists: Vec<Option<u64>>,
    // Destinations of the links we're inside
    links: Vec<String>,
    in_code_block: bool,
    quote_depth: usize,
    first_cell: bool,
}

impl Renderer {
    fn new(ansi: bool) -> Self {
        Renderer {
            out: String::new(),
            ansi,
            lists: Vec::new(),
            links: Vec::new(),
            in_code_block: false,
            quote_depth: 0,
            first_cell: true,
        }
    }

    fn style(&mut self, code: &str) {
        if self.ansi {
            self.out.push_str(code);
        }
    }

    // Makes sure the output ends with a line break (unless it's empty)
    fn line_break(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }

    // Ends a block: a blank line outside lists, a single break inside them
    fn end_block(&mut self) {
        self.line_break();
        if self.lists.is_empty() && !self.out.ends_with("\n\n") {
            self.out.push('\n');
        }
    }

    fn quote_prefix(&mut self) {
        for _ in 0..self.quote_depth {
            self.out.push_str("> ");
        }
    }

    fn event(&mut self, event: Event) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if self.in_code_block {
                    for line in text.lines() {
                        self.out.push_str("    ");
                        self.out.push_str(line);
                        self.out.push('\n');
                    }
                } else {
                    self.out.push_str(&text);
                }
            }
            Event::Code(code) => {
                if self.ansi {
                    self.out.push_str(CYAN);
                    self.out.push_str(&code);
                    self.out.push_str(RESET);
                } else {
                    self.out.push('`');
                    self.out.push_str(&code);
                    self.out.push('`');
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                self.out.push('\n');
                self.quote_prefix();
            }
            Event::Rule => {
                self.line_break();
                self.out.push_str(&"─".repeat(40));
                self.end_block();
            }
            Event::TaskListMarker(done) => {
                self.out.push_str(if done { "[x] " } else { "[ ] " });
            }
            Event::FootnoteReference(name) => {
                self.out.push('[');
                self.out.push_str(&name);
                self.out.push(']');
            }
            // Inline and block HTML
            Event::Html(_) => {}
        }
    }

    fn start(&mut self, tag: Tag) {
        match tag {
            Tag::Paragraph => self.quote_prefix(),
            Tag::Heading(level, ..) => {
                self.line_break();
                self.style(BOLD);
                self.out.push_str(&"#".repeat(level as usize));
                self.out.push(' ');
            }
            Tag::BlockQuote => self.quote_depth += 1,
            Tag::CodeBlock(kind) => {
                self.line_break();
                if let CodeBlockKind::Fenced(lang) = kind {
                    if !lang.is_empty() {
                        self.style(DIM);
                        self.out.push_str(&format!("    [{}]\n", lang));
                        self.style(RESET);
                    }
                }
                self.in_code_block = true;
            }
            Tag::List(start) => {
                self.line_break();
                self.lists.push(start);
            }
            Tag::Item => {
                self.line_break();
                let depth = self.lists.len().saturating_sub(1);
                self.out.push_str(&"  ".repeat(depth));
                match self.lists.last_mut() {
                    Some(Some(number)) => {
                        self.out.push_str(&format!("{}. ", number));
                        *number += 1;
                    }
                    _ => self.out.push_str("• "),
                }
            }
            Tag::Emphasis => self.style(ITALIC),
            Tag::Strong => self.style(BOLD),
            Tag::Strikethrough => self.out.push_str("~~"),
            Tag::Link(_, dest, _) => self.links.push(dest.to_string()),
            Tag::Image(_, _, _) => self.out.push_str("[image: "),
            Tag::Table(_) => self.line_break(),
            Tag::TableHead | Tag::TableRow => self.first_cell = true,
            Tag::TableCell => {
                if !self.first_cell {
                    self.out.push_str(" | ");
                }
                self.first_cell = false;
            }
            Tag::FootnoteDefinition(name) => {
                self.line_break();
                self.out.push_str(&format!("[{}]: ", name));
            }
        }
    }

    fn end(&mut self, tag: Tag) {
        match tag {
            Tag::Paragraph => self.end_block(),
            Tag::Heading(..) => {
                self.style(RESET);
                self.end_block();
            }
            Tag::BlockQuote => {
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.end_block();
            }
            Tag::CodeBlock(_) => {
                self.in_code_block = false;
                self.end_block();
            }
            Tag::List(_) => {
                self.lists.pop();
                self.end_block();
            }
            Tag::Item => self.line_break(),
            Tag::Emphasis | Tag::Strong => self.style(RESET),
            Tag::Strikethrough => self.out.push_str("~~"),
            Tag::Link(..) => {
                if let Some(dest) = self.links.pop() {
                    // Autolinks (<https://...>) already show the URL as text
                    if !dest.is_empty() && !self.out.ends_with(dest.as_str()) {
                        self.style(DIM);
                        self.out.push_str(&format!(" ({})", dest));
                        self.style(RESET);
                    }
                }
            }
            Tag::Image(..) => self.out.push(']'),
            Tag::Table(_) => self.end_block(),
            Tag::TableHead | Tag::TableRow => self.out.push('\n'),
            Tag::TableCell | Tag::FootnoteDefinition(_) => {}
        }
    }

    fn finish(self) -> String {
        self.out.trim_end().to_string()
    }
}
