use super::ExportTable;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// CSV with a UTF-8 BOM so spreadsheet tools detect Arabic text; the header
/// row holds the column keys
pub fn render_csv(table: &ExportTable) -> anyhow::Result<Vec<u8>> {
    let mut csv_writer = csv::Writer::from_writer(UTF8_BOM.to_vec());
    csv_writer.write_record(table.columns)?;
    for row in table.rows {
        csv_writer.write_record(table.cells(row))?;
    }
    csv_writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("csv flush failed: {}", e.error()))
}
