use super::model::{Align, Column, DocumentSpec, FontStyle};

/// US-Letter page size in points.
pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
pub const MARGIN: f32 = 50.0;
/// The vertical cursor wraps to a new page once it crosses this line.
pub const LOW_WATER: f32 = 100.0;

const TOP_Y: f32 = PAGE_HEIGHT - 12.0;
const LINE_STEP: f32 = 20.0;
const BODY_SIZE: f32 = 11.0;
const FOOTER_Y: f32 = 30.0;
const TOTALS_LABEL_X: f32 = 350.0;
const TOTALS_VALUE_X: f32 = 550.0;

/// A positioned drawing primitive. Coordinates are points from the
/// bottom-left corner, matching PDF user space.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        size: f32,
        font: FontStyle,
        text: String,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

/// Approximate Helvetica advance width. Only relative placement matters and
/// the estimate is deterministic, which keeps the layout byte-stable.
fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5
}

pub fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

struct Cursor {
    pages: Vec<Page>,
    y: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            y: TOP_Y,
        }
    }

    fn page(&mut self) -> &mut Page {
        self.pages.last_mut().expect("cursor always has a page")
    }

    fn text(&mut self, x: f32, size: f32, font: FontStyle, text: impl Into<String>) {
        let y = self.y;
        self.page().ops.push(DrawOp::Text {
            x,
            y,
            size,
            font,
            text: text.into(),
        });
    }

    fn cell(&mut self, column: &Column, size: f32, font: FontStyle, raw: &str) {
        let text = truncate(raw, column.max_chars);
        let x = match column.align {
            Align::Left => column.x,
            Align::Right => column.x - text_width(&text, size),
        };
        self.text(x, size, font, text);
    }

    fn rule(&mut self, x1: f32, x2: f32) {
        let y = self.y;
        self.page().ops.push(DrawOp::Rule { x1, x2, y });
    }

    fn advance(&mut self, step: f32) {
        self.y -= step;
    }

    /// Moves down one line, wrapping to a fresh page below the low-water
    /// mark.
    fn next_line(&mut self) {
        self.y -= LINE_STEP;
        if self.y < LOW_WATER {
            self.pages.push(Page::default());
            self.y = TOP_Y;
        }
    }
}

/// Lays the document out into pages of draw operations. Pure and
/// deterministic: identical input yields identical pages.
pub fn layout(doc: &DocumentSpec) -> Vec<Page> {
    let mut cursor = Cursor::new();

    // Letterhead
    cursor.text(MARGIN, 14.0, FontStyle::Bold, doc.company.clone());
    cursor.advance(15.0);
    cursor.text(MARGIN, 10.0, FontStyle::Regular, doc.tagline.clone());
    cursor.advance(25.0);

    let title_x = (PAGE_WIDTH - text_width(&doc.title, 12.0)) / 2.0;
    cursor.text(title_x, 12.0, FontStyle::Bold, doc.title.clone());
    cursor.advance(5.0);
    cursor.rule(MARGIN, PAGE_WIDTH - MARGIN);
    cursor.advance(25.0);

    for line in &doc.meta {
        cursor.text(MARGIN, BODY_SIZE, FontStyle::Regular, line.clone());
        cursor.advance(LINE_STEP);
    }
    cursor.advance(10.0);

    // Line-item table
    for column in &doc.columns {
        cursor.cell(column, BODY_SIZE, FontStyle::Bold, &column.header);
    }
    cursor.advance(5.0);
    cursor.rule(MARGIN, PAGE_WIDTH - MARGIN);
    cursor.next_line();

    for row in &doc.rows {
        for (column, value) in doc.columns.iter().zip(row) {
            cursor.cell(column, BODY_SIZE, FontStyle::Regular, value);
        }
        cursor.next_line();
    }

    // Totals block
    if !doc.totals.is_empty() {
        cursor.rule(MARGIN, PAGE_WIDTH - MARGIN);
        cursor.next_line();
        for total in &doc.totals {
            let font = if total.emphasis {
                FontStyle::Bold
            } else {
                FontStyle::Regular
            };
            if total.emphasis {
                cursor.rule(TOTALS_LABEL_X, TOTALS_VALUE_X);
                cursor.next_line();
            }
            cursor.text(TOTALS_LABEL_X, BODY_SIZE, font, total.label.clone());
            let amount_x = TOTALS_VALUE_X - text_width(&total.amount, BODY_SIZE);
            cursor.text(amount_x, BODY_SIZE, font, total.amount.clone());
            cursor.next_line();
        }
    }

    if let Some(note) = &doc.note {
        cursor.next_line();
        cursor.text(MARGIN, 10.0, FontStyle::Oblique, note.clone());
    }

    // Footer sits at a fixed position on the final page.
    cursor.y = FOOTER_Y;
    cursor.text(MARGIN, 9.0, FontStyle::Regular, doc.footer.clone());

    cursor.pages
}
