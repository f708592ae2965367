// ==========================================
// 考务花名册管理系统 - 最小 XLSX 序列化器
// ==========================================
// 口径: 只写入纯文本单元格（inlineStr），不写样式/公式；
//       花名册导出与再导入只关心文本值
// ==========================================

use crate::export::assembler::{Sheet, Workbook};
use std::io::{Cursor, Write};
use thiserror::Error;
use zip::write::FileOptions;

#[derive(Debug, Error)]
pub enum XlsxWriteError {
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("工作簿为空")]
    EmptyWorkbook,
}

/// 将工作簿序列化为 .xlsx 字节流
pub fn write_workbook(workbook: &Workbook) -> Result<Vec<u8>, XlsxWriteError> {
    if workbook.sheets.is_empty() {
        return Err(XlsxWriteError::EmptyWorkbook);
    }

    let mut buffer = Cursor::new(Vec::new());
    {
        let mut zip = zip::ZipWriter::new(&mut buffer);
        let options =
            FileOptions::<()>::default().compression_method(zip::CompressionMethod::Deflated);

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(content_types_xml(workbook.sheets.len()).as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(rels_xml().as_bytes())?;

        zip.start_file("xl/workbook.xml", options)?;
        zip.write_all(workbook_xml(&workbook.sheets).as_bytes())?;

        zip.start_file("xl/_rels/workbook.xml.rels", options)?;
        zip.write_all(workbook_rels_xml(workbook.sheets.len()).as_bytes())?;

        for (idx, sheet) in workbook.sheets.iter().enumerate() {
            zip.start_file(format!("xl/worksheets/sheet{}.xml", idx + 1), options)?;
            zip.write_all(worksheet_xml(sheet).as_bytes())?;
        }

        zip.finish()?;
    }
    Ok(buffer.into_inner())
}

fn content_types_xml(sheet_count: usize) -> String {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    out.push('\n');
    out.push_str(r#"  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    out.push('\n');
    out.push_str(r#"  <Default Extension="xml" ContentType="application/xml"/>"#);
    out.push('\n');
    out.push_str(r#"  <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#);
    out.push('\n');
    for idx in 1..=sheet_count {
        out.push_str(&format!(
            r#"  <Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            idx
        ));
        out.push('\n');
    }
    out.push_str("</Types>\n");
    out
}

fn rels_xml() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>
"#
    .to_owned()
}

fn workbook_xml(sheets: &[Sheet]) -> String {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(
        r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main""#,
    );
    out.push('\n');
    out.push_str(
        r#"          xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    );
    out.push('\n');
    out.push_str("  <sheets>\n");
    for (idx, sheet) in sheets.iter().enumerate() {
        let sheet_no = idx + 1;
        out.push_str(&format!(
            r#"    <sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape_xml(&sheet.name),
            sheet_no,
            sheet_no
        ));
        out.push('\n');
    }
    out.push_str("  </sheets>\n</workbook>\n");
    out
}

fn workbook_rels_xml(sheet_count: usize) -> String {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    out.push('\n');
    for idx in 1..=sheet_count {
        out.push_str(&format!(
            r#"  <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            idx, idx
        ));
        out.push('\n');
    }
    out.push_str("</Relationships>\n");
    out
}

fn worksheet_xml(sheet: &Sheet) -> String {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );
    out.push('\n');
    out.push_str("  <sheetData>\n");

    // 首行表头，数据行随后
    write_row(&mut out, 1, &sheet.headers);
    for (idx, row) in sheet.rows.iter().enumerate() {
        write_row(&mut out, idx + 2, row);
    }

    out.push_str("  </sheetData>\n</worksheet>\n");
    out
}

fn write_row(out: &mut String, row_no: usize, cells: &[String]) {
    out.push_str(&format!(r#"    <row r="{}">"#, row_no));
    for (col, value) in cells.iter().enumerate() {
        out.push_str(&format!(
            r#"<c r="{}{}" t="inlineStr"><is><t>{}</t></is></c>"#,
            column_letters(col),
            row_no,
            escape_xml(value)
        ));
    }
    out.push_str("</row>\n");
}

/// 0 基列号 → A1 列标（0 → A, 25 → Z, 26 → AA）
fn column_letters(mut col: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (col % 26) as u8);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

fn escape_xml(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
