//! Minimal PDF 1.4 writer for tabular exports
//!
//! Landscape A4 pages with the standard Helvetica fonts, one text line per
//! row. Text outside WinAnsi (Latin-1) is printed as `?` because the
//! standard fonts carry no other glyphs.

use super::ExportTable;

const PAGE_WIDTH: f32 = 842.0;
const PAGE_HEIGHT: f32 = 595.0;
const MARGIN: f32 = 36.0;
const FONT_SIZE: f32 = 8.0;
const TITLE_SIZE: f32 = 11.0;
const LINE_HEIGHT: f32 = 12.0;
/// Average Helvetica glyph width as a fraction of the font size
const CHAR_WIDTH: f32 = 0.5;

/// Rows that fit under the title and header of one page
fn rows_per_page() -> usize {
    let usable = PAGE_HEIGHT - 2.0 * MARGIN - 2.0 * LINE_HEIGHT - LINE_HEIGHT;
    (usable / LINE_HEIGHT).floor() as usize
}

pub fn render_pdf(table: &ExportTable) -> Vec<u8> {
    let per_page = rows_per_page();
    let chunks: Vec<&[serde_json::Map<String, serde_json::Value>]> = if table.rows.is_empty() {
        vec![&[]]
    } else {
        table.rows.chunks(per_page).collect()
    };
    let page_count = chunks.len();

    let mut objects: Vec<Vec<u8>> = Vec::new();
    // 1 catalog, 2 page tree, 3 regular font, 4 bold font, then page + content pairs
    let page_ids: Vec<usize> = (0..page_count).map(|i| 5 + i * 2).collect();
    objects.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());
    let kids = page_ids
        .iter()
        .map(|id| format!("{} 0 R", id))
        .collect::<Vec<_>>()
        .join(" ");
    objects.push(format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, page_count).into_bytes());
    objects.push(
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>".to_vec(),
    );
    objects.push(
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
            .to_vec(),
    );

    for (index, rows) in chunks.iter().enumerate() {
        let content = page_content(table, rows, index + 1, page_count);
        let content_id = page_ids[index] + 1;
        objects.push(
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                PAGE_WIDTH, PAGE_HEIGHT, content_id
            )
            .into_bytes(),
        );
        let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
        stream.extend_from_slice(&content);
        stream.extend_from_slice(b"\nendstream");
        objects.push(stream);
    }

    assemble(&objects)
}

fn assemble(objects: &[Vec<u8>]) -> Vec<u8> {
    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", index + 1).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }
    let xref_at = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_at
        )
        .as_bytes(),
    );
    out
}

fn page_content(
    table: &ExportTable,
    rows: &[serde_json::Map<String, serde_json::Value>],
    page: usize,
    page_count: usize,
) -> Vec<u8> {
    let mut ops: Vec<u8> = Vec::new();
    let top = PAGE_HEIGHT - MARGIN;
    let width = PAGE_WIDTH - 2.0 * MARGIN;
    let column_width = if table.columns.is_empty() {
        width
    } else {
        width / table.columns.len() as f32
    };
    let max_chars = ((column_width / (FONT_SIZE * CHAR_WIDTH)) as usize).saturating_sub(1).max(1);

    let title = format!("{}  ({} / {})", table.title, page, page_count);
    text(&mut ops, "F2", TITLE_SIZE, MARGIN, top - TITLE_SIZE, &title);

    let mut y = top - 2.0 * LINE_HEIGHT - FONT_SIZE;
    for (i, column) in table.columns.iter().enumerate() {
        let x = MARGIN + i as f32 * column_width;
        text(&mut ops, "F2", FONT_SIZE, x, y, &truncate(column, max_chars));
    }
    let rule_y = y - 3.0;
    ops.extend_from_slice(
        format!("0.5 w {} {} m {} {} l S\n", MARGIN, rule_y, PAGE_WIDTH - MARGIN, rule_y).as_bytes(),
    );

    for row in rows {
        y -= LINE_HEIGHT;
        for (i, cell) in table.cells(row).iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            let x = MARGIN + i as f32 * column_width;
            text(&mut ops, "F1", FONT_SIZE, x, y, &truncate(cell, max_chars));
        }
    }
    if rows.is_empty() {
        text(&mut ops, "F1", FONT_SIZE, MARGIN, y - LINE_HEIGHT, "No data");
    }
    ops
}

fn text(ops: &mut Vec<u8>, font: &str, size: f32, x: f32, y: f32, value: &str) {
    ops.extend_from_slice(format!("BT /{} {} Tf {:.1} {:.1} Td (", font, size, x, y).as_bytes());
    ops.extend_from_slice(&encode_text(value));
    ops.extend_from_slice(b") Tj ET\n");
}

fn truncate(value: &str, max_chars: usize) -> String {
    let single_line = value.replace(['\r', '\n', '\t'], " ");
    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let keep = max_chars.saturating_sub(3);
    let mut cut: String = single_line.chars().take(keep).collect();
    cut.push_str("...");
    cut
}

/// PDF literal string body in WinAnsi, escaped and kept 7-bit
fn encode_text(value: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push(b'\\');
                out.push(ch as u8);
            }
            ' '..='~' => out.push(ch as u8),
            '\u{a0}'..='\u{ff}' => out.extend_from_slice(format!("\\{:03o}", ch as u32).as_bytes()),
            _ => out.push(b'?'),
        }
    }
    out
}
