use std::io::BufWriter;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use crate::error::NotificationError;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const TOP: f32 = 280.0;
const BOTTOM: f32 = 20.0;
const LEFT: f32 = 20.0;
const BODY_INDENT: f32 = 25.0;
const LINE_HEIGHT: f32 = 5.0;
const WRAP_WIDTH: usize = 85;

fn pdf_error(e: impl std::fmt::Display) -> NotificationError {
    NotificationError::Pdf(e.to_string())
}

/// Greedy word wrap on character count. Words longer than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                lines.push(word.drain(..width).collect());
            }
            let word: String = word.into_iter().collect();

            let needed = if line.is_empty() { 0 } else { 1 } + word.chars().count();
            if !line.is_empty() && line.chars().count() + needed > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(&word);
        }
        if !line.is_empty() || paragraph.trim().is_empty() {
            lines.push(line);
        }
    }

    lines
}

struct PageCursor {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    pages: usize,
}

impl PageCursor {
    fn ensure_room(&mut self, height: f32) {
        if self.y - height >= BOTTOM {
            return;
        }
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = TOP;
        self.pages += 1;
    }

    fn write(&mut self, text: &str, size: f32, x: f32, font: &IndirectFontRef) {
        self.ensure_room(LINE_HEIGHT);
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
        self.y -= LINE_HEIGHT;
    }

    fn gap(&mut self, height: f32) {
        self.y -= height;
    }
}

/// Patient-facing copy of a medical record, A4, paged as needed.
pub fn render_medical_record(
    patient_name: &str,
    diagnosis: &str,
    prescription: &str,
    care_suggestion: &str,
) -> Result<Vec<u8>, NotificationError> {
    let (doc, page1, layer1) =
        PdfDocument::new("Medical Record", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?;
    let layer = doc.get_page(page1).get_layer(layer1);

    let mut cursor = PageCursor {
        doc,
        layer,
        y: TOP,
        pages: 1,
    };

    cursor.write("Medical Record", 18.0, LEFT, &bold);
    cursor.gap(4.0);
    cursor.write("Patient Information", 13.0, LEFT, &bold);
    cursor.gap(2.0);

    let sections = [
        ("Patient Name", patient_name),
        ("Diagnosis", diagnosis),
        ("Prescription", prescription),
        ("Care Suggestion", care_suggestion),
    ];

    for (label, value) in sections {
        cursor.ensure_room(LINE_HEIGHT * 2.0);
        cursor.write(label, 11.0, LEFT, &bold);
        for line in wrap_text(value, WRAP_WIDTH) {
            cursor.write(&line, 10.0, BODY_INDENT, &font);
        }
        cursor.gap(3.0);
    }

    tracing::debug!("Rendered medical record PDF with {} page(s)", cursor.pages);

    let mut buf = BufWriter::new(Vec::new());
    cursor.doc.save(&mut buf).map_err(pdf_error)?;
    buf.into_inner().map_err(pdf_error)
}
