//! PDF rendering with `lopdf`.
//!
//! ## Layout
//!
//! ```text
//! +-------------------------------+  US Letter, 72pt margins
//! |   Factual Summary of: x.pdf   |  Helvetica-Bold 18, centered
//! |                               |
//! | Summary at 1:100 Ratio        |  Helvetica-Bold 14
//! | Lorem ipsum dolor sit amet,   |  Helvetica 11, word-wrapped
//! | consectetur adipiscing elit.  |
//! |                               |  blank line between paragraphs
//! +-------------------------------+
//! ```
//!
//! Only the built-in Type 1 fonts are used, so nothing is embedded. Text is
//! encoded as WinAnsi; characters outside it print as `?`. Line widths use
//! approximate Helvetica metrics, which is close enough for ragged-right
//! wrapping.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::hierarchical::paragraphs;
use crate::{Error, Renderer, Report, Result};

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 72.0;
const TEXT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    const fn resource(self) -> &'static [u8] {
        match self {
            Self::Regular => b"F1",
            Self::Bold => b"F2",
        }
    }
}

/// A text style: font, size and line height.
#[derive(Debug, Clone, Copy)]
struct Style {
    font: Font,
    size: f32,
    leading: f32,
}

const TITLE: Style = Style {
    font: Font::Bold,
    size: 18.0,
    leading: 22.0,
};
const HEADING: Style = Style {
    font: Font::Bold,
    size: 14.0,
    leading: 18.0,
};
const BODY: Style = Style {
    font: Font::Regular,
    size: 11.0,
    leading: 14.0,
};

/// One positioned line of text.
#[derive(Debug)]
struct Line {
    font: Font,
    size: f32,
    x: f32,
    y: f32,
    text: String,
}

/// Renders reports as PDF documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfRenderer;

impl PdfRenderer {
    fn layout(report: &Report) -> Vec<Vec<Line>> {
        let mut layout = Layout::new();

        for line in wrap(&report.title, TITLE, TEXT_WIDTH) {
            let x = MARGIN + (TEXT_WIDTH - text_width(&line, TITLE)).max(0.0) / 2.0;
            layout.place(TITLE, x, line);
        }
        layout.skip(TITLE.leading);

        for section in &report.sections {
            if let Some(heading) = &section.heading {
                layout.skip(HEADING.size);
                for line in wrap(heading, HEADING, TEXT_WIDTH) {
                    layout.place(HEADING, MARGIN, line);
                }
                layout.skip(HEADING.size / 2.0);
            }

            for paragraph in paragraphs(&section.body) {
                for line in wrap(paragraph, BODY, TEXT_WIDTH) {
                    layout.place(BODY, MARGIN, line);
                }
                layout.skip(BODY.leading - 2.0);
            }
        }

        layout.finish()
    }
}

impl Renderer for PdfRenderer {
    fn render(&self, report: &Report) -> Result<Vec<u8>> {
        let pages = Self::layout(report);

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular_id,
                "F2" => bold_id,
            },
        });

        let mut kids = Vec::with_capacity(pages.len());
        for page in &pages {
            let mut operations = Vec::with_capacity(page.len() * 5);
            for line in page {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new(
                    "Tf",
                    vec![
                        Object::Name(line.font.resource().to_vec()),
                        Object::Integer(line.size.round() as i64),
                    ],
                ));
                operations.push(Operation::new(
                    "Td",
                    vec![
                        Object::Integer(line.x.round() as i64),
                        Object::Integer(line.y.round() as i64),
                    ],
                ));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(win_ansi(&line.text))],
                ));
                operations.push(Operation::new("ET", vec![]));
            }

            let content = Content { operations }
                .encode()
                .map_err(|e| Error::Render(e.to_string()))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let page_count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
                "Resources" => resources_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(PAGE_WIDTH as i64),
                    Object::Integer(PAGE_HEIGHT as i64),
                ],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| Error::Render(e.to_string()))?;
        Ok(bytes)
    }

    fn extension(&self) -> &str {
        "pdf"
    }
}

/// Top-down line placement with page breaks.
struct Layout {
    pages: Vec<Vec<Line>>,
    current: Vec<Line>,
    cursor: f32,
}

impl Layout {
    const TOP: f32 = PAGE_HEIGHT - MARGIN;

    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            cursor: Self::TOP,
        }
    }

    fn place(&mut self, style: Style, x: f32, text: String) {
        if self.cursor - style.leading < MARGIN && !self.current.is_empty() {
            self.pages.push(std::mem::take(&mut self.current));
            self.cursor = Self::TOP;
        }
        self.cursor -= style.leading;
        self.current.push(Line {
            font: style.font,
            size: style.size,
            x,
            y: self.cursor,
            text,
        });
    }

    fn skip(&mut self, amount: f32) {
        // Vertical space at the top of a fresh page is dropped.
        if !self.current.is_empty() {
            self.cursor -= amount;
        }
    }

    fn finish(mut self) -> Vec<Vec<Line>> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

/// Approximate Helvetica advance width, in 1/1000 em.
fn char_width(c: char) -> f32 {
    match c {
        'i' | 'j' | 'l' | '\'' | '|' => 222.0,
        ' ' | '.' | ',' | ':' | ';' | '!' | 'f' | 't' | 'I' | '/' | '[' | ']' => 278.0,
        'r' | '(' | ')' | '-' | '"' => 333.0,
        'm' => 833.0,
        'w' | 'M' => 778.0,
        'W' => 944.0,
        'A'..='Z' => 667.0,
        _ => 556.0,
    }
}

fn text_width(text: &str, style: Style) -> f32 {
    let bold = if style.font == Font::Bold { 1.06 } else { 1.0 };
    text.chars().map(char_width).sum::<f32>() * style.size * bold / 1000.0
}

/// Greedy word wrap. Words wider than a line are broken by character.
fn wrap(text: &str, style: Style, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if text_width(&candidate, style) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if text_width(word, style) <= max_width {
            current = word.to_string();
        } else {
            for c in word.chars() {
                current.push(c);
                if text_width(&current, style) > max_width && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(c);
                }
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Encode text for a WinAnsi simple font.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '\t' => b' ',
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8A,
            '‹' => 0x8B,
            'Œ' => 0x8C,
            'Ž' => 0x8E,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9A,
            '›' => 0x9B,
            'œ' => 0x9C,
            'ž' => 0x9E,
            'Ÿ' => 0x9F,
            _ => b'?',
        })
        .collect()
}
