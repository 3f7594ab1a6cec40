//! PDF export
//!
//! A plain text dump: centered title, then one `column: value` block per row.
//! Text flows top to bottom and continues on a new page at the bottom margin.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::error::Result;
use crate::models::RowSet;

use super::{ReportEncoder, REPORT_TITLE};

// US Letter, 1 inch margins
const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN: i64 = 72;

const TITLE_SIZE: i64 = 16;
const BODY_SIZE: i64 = 12;
const LINE_GAP: i64 = 4;

/// Courier glyphs are 600/1000 em wide
const COURIER_ADVANCE_PER_MILLE: i64 = 600;

const EMPTY_NOTICE: &str = "No records found.";

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfEncoder;

impl ReportEncoder for PdfEncoder {
    fn content_type(&self) -> &'static str {
        "application/pdf"
    }

    fn encode(&self, rows: &RowSet) -> Result<Vec<u8>> {
        let mut layout = Layout::new();

        layout.centered_line(REPORT_TITLE, TITLE_SIZE);
        layout.blank_line(TITLE_SIZE);

        if rows.is_empty() {
            layout.line(EMPTY_NOTICE, BODY_SIZE);
        }

        for record in rows.records() {
            for (column, value) in record {
                layout.wrapped(&format!("{}: {}", column, value), BODY_SIZE);
            }
            layout.blank_line(BODY_SIZE);
        }

        render(layout.finish())
    }
}

/// Positions text lines and breaks pages
struct Layout {
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    cursor_y: i64,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            cursor_y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn advance(&mut self, size: i64) {
        if self.cursor_y - size < MARGIN {
            let page = std::mem::take(&mut self.current);
            self.pages.push(page);
            self.cursor_y = PAGE_HEIGHT - MARGIN;
        }
        self.cursor_y -= size;
    }

    fn line(&mut self, text: &str, size: i64) {
        self.line_at(MARGIN, text, size);
    }

    fn centered_line(&mut self, text: &str, size: i64) {
        let x = (PAGE_WIDTH - text_width(text, size)) / 2;
        self.line_at(x.max(MARGIN), text, size);
    }

    fn line_at(&mut self, x: i64, text: &str, size: i64) {
        self.advance(size);
        let y = self.cursor_y;
        self.current.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(size)]),
            Operation::new("Td", vec![Object::Integer(x), Object::Integer(y)]),
            Operation::new("Tj", vec![Object::string_literal(to_latin1(text))]),
            Operation::new("ET", vec![]),
        ]);
        self.cursor_y -= LINE_GAP;
    }

    fn blank_line(&mut self, size: i64) {
        self.advance(size);
    }

    /// Split on newlines and hard-wrap at the usable page width
    fn wrapped(&mut self, text: &str, size: i64) {
        let max_chars = max_chars_per_line(size);
        for source_line in text.split('\n') {
            let chars: Vec<char> = source_line.chars().collect();
            if chars.is_empty() {
                self.blank_line(size);
                continue;
            }
            for chunk in chars.chunks(max_chars) {
                let piece: String = chunk.iter().collect();
                self.line(&piece, size);
            }
        }
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

fn text_width(text: &str, size: i64) -> i64 {
    text.chars().count() as i64 * size * COURIER_ADVANCE_PER_MILLE / 1000
}

fn max_chars_per_line(size: i64) -> usize {
    let usable = PAGE_WIDTH - 2 * MARGIN;
    (usable * 1000 / (size * COURIER_ADVANCE_PER_MILLE)).max(1) as usize
}

/// WinAnsi covers Latin-1; anything outside it prints as `?`
fn to_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

fn render(pages: Vec<Vec<Operation>>) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<ObjectId> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id);
    }

    let page_count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids.into_iter().map(Object::Reference).collect::<Vec<Object>>(),
        "Count" => page_count,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(PAGE_WIDTH),
            Object::Integer(PAGE_HEIGHT),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}
