//! Spreadsheet and PDF renderings of the client/address listing.

use chrono::{DateTime, Utc};
use domain::models::{export_rows, ClientDetail, ClientExportRow, EXPORT_HEADERS};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::error::ApiError;

pub const XLSX_FILENAME: &str = "clients_addresses.xlsx";
pub const PDF_FILENAME: &str = "clients_addresses.pdf";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

const SHEET_NAME: &str = "Clients and Addresses";

// A4 in points, Courier 10pt is 6pt per glyph.
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;
const FONT_SIZE: i64 = 10;
const LINE_HEIGHT: i64 = 14;
const LINE_CHARS: usize = 82;
const LINES_PER_PAGE: usize = ((PAGE_HEIGHT - 2 * MARGIN) / LINE_HEIGHT) as usize;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Spreadsheet rendering failed: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("PDF rendering failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF write failed: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// Width of each export column: the longest text in it plus two.
pub fn column_widths(rows: &[ClientExportRow]) -> [usize; 6] {
    let mut widths = EXPORT_HEADERS.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }
    widths.map(|w| w + 2)
}

/// One sheet, one row per address.
pub fn render_xlsx(clients: &[ClientDetail]) -> Result<Vec<u8>, ExportError> {
    let rows = export_rows(clients);
    let widths = column_widths(&rows);
    let bold = Format::new().set_bold();

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, header) in EXPORT_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }
    for (index, row) in rows.iter().enumerate() {
        for (col, cell) in row.cells().iter().enumerate() {
            sheet.write_string(index as u32 + 1, col as u16, *cell)?;
        }
    }
    for (col, width) in widths.iter().enumerate() {
        sheet.set_column_width(col as u16, *width as f64)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Text lines of the PDF report, before pagination.
pub fn document_lines(clients: &[ClientDetail], generated_at: DateTime<Utc>) -> Vec<String> {
    let mut lines = vec![
        "Clients and Addresses".to_string(),
        format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M UTC")),
        String::new(),
    ];

    for detail in clients {
        let client = &detail.client;
        lines.push(client.name.clone());
        lines.push(format!("  Tax id: {}", client.tax_id));
        lines.push(format!("  Email: {}", client.email.as_deref().unwrap_or("-")));
        lines.push(format!(
            "  Agent: {}",
            client.agent.as_ref().map_or("-", |agent| agent.name.as_str())
        ));
        if detail.addresses.is_empty() {
            lines.push("  No addresses".to_string());
        }
        for address in &detail.addresses {
            lines.push(format!(
                "  - {}: {}, {}, {} {}, {}",
                address.address_type.name,
                address.street_line(),
                address.locality,
                address.postal_code,
                address.city,
                address.country
            ));
        }
        lines.push(String::new());
    }

    lines.into_iter().flat_map(|line| wrap(&line)).collect()
}

fn wrap(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    if chars.len() <= LINE_CHARS {
        return vec![line.to_string()];
    }
    chars
        .chunks(LINE_CHARS)
        .enumerate()
        .map(|(i, chunk)| {
            let text: String = chunk.iter().collect();
            if i == 0 {
                text
            } else {
                format!("    {}", text.trim_start())
            }
        })
        .collect()
}

/// WinAnsi text; anything outside Latin-1 becomes `?`.
fn pdf_text(line: &str) -> Object {
    let bytes = line
        .chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect();
    Object::String(bytes, StringFormat::Literal)
}

fn page_content(lines: &[String]) -> Content {
    let mut operations = Vec::with_capacity(lines.len() * 5);
    let mut y = PAGE_HEIGHT - MARGIN;
    for line in lines {
        y -= LINE_HEIGHT;
        if line.is_empty() {
            continue;
        }
        operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
            Operation::new("Td", vec![MARGIN.into(), y.into()]),
            Operation::new("Tj", vec![pdf_text(line)]),
            Operation::new("ET", vec![]),
        ]);
    }
    Content { operations }
}

/// A4 Courier listing of every client and its addresses.
pub fn render_pdf(
    clients: &[ClientDetail],
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>, ExportError> {
    let lines = document_lines(clients, generated_at);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for chunk in lines.chunks(LINES_PER_PAGE) {
        let content_id = doc.add_object(Stream::new(dictionary! {}, page_content(chunk).encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(PAGE_WIDTH),
                Object::Integer(PAGE_HEIGHT),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}
