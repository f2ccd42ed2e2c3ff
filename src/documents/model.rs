/// Cell alignment within a table column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
    Oblique,
}

/// One column of the line-item table. `x` anchors the left edge of
/// left-aligned cells and the right edge of right-aligned ones; cells are
/// truncated to `max_chars`.
#[derive(Clone, Debug)]
pub struct Column {
    pub header: String,
    pub x: f32,
    pub align: Align,
    pub max_chars: usize,
}

/// One entry of the totals block.
#[derive(Clone, Debug)]
pub struct TotalLine {
    pub label: String,
    pub amount: String,
    pub emphasis: bool,
}

impl TotalLine {
    pub fn new(label: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            amount: amount.into(),
            emphasis: false,
        }
    }

    pub fn emphasized(label: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            amount: amount.into(),
            emphasis: true,
        }
    }
}

/// The generic printable document: header fields, tabular line items, a
/// totals block, an optional closing note and a footer line.
#[derive(Clone, Debug)]
pub struct DocumentSpec {
    pub company: String,
    pub tagline: String,
    pub title: String,
    pub meta: Vec<String>,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
    pub totals: Vec<TotalLine>,
    pub note: Option<String>,
    pub footer: String,
}
