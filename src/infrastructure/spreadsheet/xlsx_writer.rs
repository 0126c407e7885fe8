use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatPattern, Workbook, Worksheet, XlsxError};

use crate::domain::error::{AppError, Result};
use crate::domain::fixed_profile::{FixedProfile, HeaderStyle};
use crate::domain::record::{is_spacer, row_values, Record};

/// Writes one sheet: header row, then one row per record in header order.
pub struct XlsxExporter<'a> {
    sheet_name: &'a str,
    profile: Option<&'a FixedProfile>,
}

struct HeaderCell<'h> {
    col: u16,
    text: &'h str,
    width: Option<f64>,
    format: Option<Format>,
}

struct HeaderLayout<'h> {
    row_height: Option<f64>,
    cells: Vec<HeaderCell<'h>>,
}

fn export_err(e: XlsxError) -> AppError {
    AppError::ExportFailure(e.to_string())
}

fn header_format(style: &HeaderStyle) -> Format {
    let mut format = Format::new()
        .set_font_size(style.font_size)
        .set_font_color(Color::RGB(style.font_color))
        .set_background_color(Color::RGB(style.fill_color))
        .set_pattern(FormatPattern::Solid)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap();
    if style.bold {
        format = format.set_bold();
    }
    format
}

fn column_index(idx: usize) -> Result<u16> {
    u16::try_from(idx).map_err(|_| AppError::ExportFailure(format!("too many columns: {}", idx)))
}

fn row_index(idx: usize) -> Result<u32> {
    u32::try_from(idx).map_err(|_| AppError::ExportFailure(format!("too many rows: {}", idx)))
}

impl<'a> XlsxExporter<'a> {
    pub fn new(sheet_name: &'a str) -> Self {
        Self {
            sheet_name,
            profile: None,
        }
    }

    /// Style header cells and size columns from a fixed profile.
    pub fn with_profile(mut self, profile: Option<&'a FixedProfile>) -> Self {
        self.profile = profile;
        self
    }

    pub fn write_to_buffer(&self, headers: &[String], records: &[Record]) -> Result<Vec<u8>> {
        let mut workbook = self.build_workbook(headers, records)?;
        workbook.save_to_buffer().map_err(export_err)
    }

    pub fn write_to_file(&self, path: &Path, headers: &[String], records: &[Record]) -> Result<()> {
        let mut workbook = self.build_workbook(headers, records)?;
        workbook.save(path).map_err(export_err)
    }

    fn build_workbook(&self, headers: &[String], records: &[Record]) -> Result<Workbook> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(self.sheet_name).map_err(export_err)?;

        self.write_header_row(worksheet, headers)?;

        for (idx, record) in records.iter().enumerate() {
            let row = row_index(idx + 1)?;
            for (col, value) in row_values(headers, record).iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                worksheet
                    .write_string(row, column_index(col)?, value)
                    .map_err(export_err)?;
            }
        }

        tracing::debug!(
            rows = records.len(),
            columns = headers.len(),
            "built export workbook"
        );
        Ok(workbook)
    }

    /// Row height, widths and formats for the header row.
    fn header_layout<'h>(&self, headers: &'h [String]) -> Result<HeaderLayout<'h>> {
        let mut cells = Vec::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            cells.push(HeaderCell {
                col: column_index(idx)?,
                text: header.as_str(),
                width: self.profile.and_then(|p| p.width_at(idx)),
                format: self.profile.and_then(|p| p.style_at(idx)).map(header_format),
            });
        }
        Ok(HeaderLayout {
            row_height: self.profile.map(FixedProfile::header_row_height),
            cells,
        })
    }

    fn write_header_row(&self, worksheet: &mut Worksheet, headers: &[String]) -> Result<()> {
        let layout = self.header_layout(headers)?;
        if let Some(height) = layout.row_height {
            worksheet.set_row_height(0, height).map_err(export_err)?;
        }

        for cell in &layout.cells {
            if let Some(width) = cell.width {
                worksheet.set_column_width(cell.col, width).map_err(export_err)?;
            }

            match &cell.format {
                Some(format) if is_spacer(cell.text) => {
                    worksheet.write_blank(0, cell.col, format).map_err(export_err)?;
                }
                Some(format) => {
                    worksheet
                        .write_string_with_format(0, cell.col, cell.text, format)
                        .map_err(export_err)?;
                }
                None if is_spacer(cell.text) => {}
                None => {
                    worksheet.write_string(0, cell.col, cell.text).map_err(export_err)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::record_from_pairs;
    use crate::infrastructure::spreadsheet::{decode_workbook, rows_to_records};

    #[test]
    fn test_buffer_round_trip() {
        let headers = vec!["编号".to_string(), "段位".to_string(), "等级".to_string()];
        let records = vec![
            record_from_pairs([("编号", "1818781769481982541"), ("段位", "黑鹰")]),
            record_from_pairs([("编号", "2"), ("等级", "30")]),
        ];
        let bytes = XlsxExporter::new("Parsed Data")
            .write_to_buffer(&headers, &records)
            .unwrap();

        let rows = decode_workbook(bytes).unwrap();
        assert_eq!(rows[0], headers);
        let imported = rows_to_records(rows);
        assert_eq!(imported, records);
    }

    #[test]
    fn test_fixed_profile_export_keeps_column_positions() {
        let profile = FixedProfile::builtin();
        let headers = profile.headers().clone();
        let mut record = Record::new();
        for h in &headers {
            record.insert(h.clone(), String::new());
        }
        record.insert("编号".to_string(), "9".to_string());
        record.insert("备注".to_string(), "急租".to_string());

        let bytes = XlsxExporter::new("Parsed Data")
            .with_profile(Some(&profile))
            .write_to_buffer(&headers, &[record])
            .unwrap();

        let rows = decode_workbook(bytes).unwrap();
        let notes_col = headers.iter().position(|h| h == "备注").unwrap();
        assert_eq!(rows[0][0], "编号");
        assert_eq!(rows[0][notes_col], "备注");
        assert_eq!(rows[1][notes_col], "急租");
        assert!(headers
            .iter()
            .enumerate()
            .filter(|(_, h)| h.is_empty())
            .all(|(i, _)| rows[0][i].is_empty()));
    }

    #[test]
    fn test_fixed_profile_header_styling() {
        let profile = FixedProfile::builtin();
        let headers = profile.headers().clone();
        let exporter = XlsxExporter::new("Parsed Data").with_profile(Some(&profile));
        let layout = exporter.header_layout(&headers).unwrap();

        assert_eq!(layout.row_height, Some(32.0));
        assert_eq!(layout.cells.len(), headers.len());

        let identity = Format::new()
            .set_font_size(11.0)
            .set_font_color(Color::RGB(0xFFFFFF))
            .set_background_color(Color::RGB(0x1F4E78))
            .set_pattern(FormatPattern::Solid)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap()
            .set_bold();
        assert_eq!(layout.cells[0].text, "编号");
        assert_eq!(layout.cells[0].format, Some(identity));
        assert_eq!(layout.cells[0].width, Some(22.0));

        let spacer = layout.cells.iter().find(|c| c.text.is_empty()).unwrap();
        let spacer_format = Format::new()
            .set_font_size(11.0)
            .set_font_color(Color::RGB(0x000000))
            .set_background_color(Color::RGB(0xD9D9D9))
            .set_pattern(FormatPattern::Solid)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap();
        assert_eq!(spacer.format, Some(spacer_format));
    }

    #[test]
    fn test_plain_header_without_profile() {
        let headers = vec!["编号".to_string(), "段位".to_string()];
        let exporter = XlsxExporter::new("Parsed Data");
        let layout = exporter.header_layout(&headers).unwrap();
        assert_eq!(layout.row_height, None);
        assert!(layout
            .cells
            .iter()
            .all(|c| c.format.is_none() && c.width.is_none()));
    }

    #[test]
    fn test_invalid_sheet_name() {
        let err = XlsxExporter::new("bad[name]")
            .write_to_buffer(&["a".to_string()], &[])
            .unwrap_err();
        assert!(matches!(err, AppError::ExportFailure(_)));
    }
}
