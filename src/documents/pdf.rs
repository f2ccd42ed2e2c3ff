use printpdf::{BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point};

use super::layout::{self, DrawOp, Page, PAGE_HEIGHT, PAGE_WIDTH};
use super::model::{DocumentSpec, FontStyle};
use crate::errors::ServiceError;

const PT_TO_MM: f32 = 25.4 / 72.0;

fn mm(pt: f32) -> Mm {
    Mm((pt * PT_TO_MM).into())
}

/// Lays the document out and renders the pages to PDF bytes.
pub fn render(doc: &DocumentSpec) -> Result<Vec<u8>, ServiceError> {
    render_pages(&doc.title, &layout::layout(doc))
}

/// Renders pre-laid-out pages. The layout is byte-stable; the only varying
/// bytes in the output are the PDF metadata timestamps.
pub fn render_pages(title: &str, pages: &[Page]) -> Result<Vec<u8>, ServiceError> {
    let (document, first_page, first_layer) =
        PdfDocument::new(title, mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "content");

    let regular = document
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ServiceError::DocumentError(e.to_string()))?;
    let bold = document
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ServiceError::DocumentError(e.to_string()))?;
    let oblique = document
        .add_builtin_font(BuiltinFont::HelveticaOblique)
        .map_err(|e| ServiceError::DocumentError(e.to_string()))?;

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            document.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) =
                document.add_page(mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "content");
            document.get_page(page_index).get_layer(layer_index)
        };
        draw_page(&layer, page, &regular, &bold, &oblique);
    }

    document
        .save_to_bytes()
        .map_err(|e| ServiceError::DocumentError(e.to_string()))
}

fn draw_page(
    layer: &PdfLayerReference,
    page: &Page,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
    oblique: &IndirectFontRef,
) {
    for op in &page.ops {
        match op {
            DrawOp::Text {
                x,
                y,
                size,
                font,
                text,
            } => {
                let font_ref = match font {
                    FontStyle::Regular => regular,
                    FontStyle::Bold => bold,
                    FontStyle::Oblique => oblique,
                };
                layer.use_text(text.clone(), (*size).into(), mm(*x), mm(*y), font_ref);
            }
            DrawOp::Rule { x1, x2, y } => {
                layer.set_outline_thickness(1.0);
                layer.add_line(Line {
                    points: vec![
                        (Point::new(mm(*x1), mm(*y)), false),
                        (Point::new(mm(*x2), mm(*y)), false),
                    ],
                    is_closed: false,
                });
            }
        }
    }
}
