//! Excel export
//!
//! One worksheet: a styled header row from the report columns, then one row per record.

use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{
    Color, ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook, Worksheet,
};

use crate::error::{Error, Result};
use crate::models::{ReportValue, RowSet};

use super::{ReportEncoder, REPORT_TITLE};

const MIN_COLUMN_WIDTH: usize = 10;
const MAX_COLUMN_WIDTH: usize = 50;

// Worksheet limits enforced by the xlsx format
const MAX_CELL_CHARS: usize = 32_767;
const EXCEL_YEARS: std::ops::RangeInclusive<u16> = 1900..=9999;

#[derive(Debug, Clone, Copy, Default)]
pub struct ExcelEncoder;

impl ReportEncoder for ExcelEncoder {
    fn content_type(&self) -> &'static str {
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    }

    fn encode(&self, rows: &RowSet) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let styles = Styles::new();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(REPORT_TITLE)?;
        let extent = write_sheet(worksheet, rows, &styles)?;
        log::debug!(
            "Excel sheet written: {} row(s) x {} column(s)",
            extent.rows,
            extent.columns
        );

        Ok(workbook.save_to_buffer()?)
    }
}

struct Styles {
    header: Format,
    number: Format,
    date: Format,
}

impl Styles {
    fn new() -> Self {
        // Header style: blue background, white bold text
        let header = Format::new()
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(0x4472C4))
            .set_align(FormatAlign::Center)
            .set_border(FormatBorder::Thin);

        let number = Format::new()
            .set_num_format("General")
            .set_border(FormatBorder::Thin);

        let date = Format::new()
            .set_num_format("yyyy-mm-dd")
            .set_align(FormatAlign::Center)
            .set_border(FormatBorder::Thin);

        Self { header, number, date }
    }
}

/// Number of rows (header included) and columns written to a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SheetExtent {
    rows: u32,
    columns: u16,
}

fn write_sheet(worksheet: &mut Worksheet, rows: &RowSet, styles: &Styles) -> Result<SheetExtent> {
    let columns = rows.columns();
    if columns.len() > u16::MAX as usize {
        return Err(Error::encoding("excel: too many columns"));
    }

    let mut written_rows: u32 = 1;

    for (col, name) in columns.iter().enumerate() {
        worksheet.write_with_format(0, col as u16, name, &styles.header)?;
    }

    for (idx, row) in rows.rows().iter().enumerate() {
        let excel_row = u32::try_from(idx + 1)
            .map_err(|_| Error::encoding("excel: too many rows"))?;
        for (col, value) in row.values().iter().enumerate() {
            write_cell(worksheet, excel_row, col as u16, value, styles)?;
        }
        written_rows = excel_row + 1;
    }

    for (col, width) in column_widths(rows).into_iter().enumerate() {
        let width = (width + 2).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
        worksheet.set_column_width(col as u16, width as f64)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    Ok(SheetExtent {
        rows: written_rows,
        columns: columns.len() as u16,
    })
}

/// Widest rendered value per column, in characters
fn column_widths(rows: &RowSet) -> Vec<usize> {
    let mut widths: Vec<usize> = rows.columns().iter().map(|c| c.chars().count()).collect();
    for row in rows.rows() {
        for (width, value) in widths.iter_mut().zip(row.values()) {
            *width = (*width).max(value.to_string().chars().count());
        }
    }
    widths
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &ReportValue,
    styles: &Styles,
) -> Result<()> {
    match value {
        // Nulls stay blank
        ReportValue::Null => {}
        ReportValue::Integer(v) => {
            worksheet.write_number_with_format(row, col, *v as f64, &styles.number)?;
        }
        ReportValue::Real(v) => {
            worksheet.write_number_with_format(row, col, *v, &styles.number)?;
        }
        ReportValue::Text(v) => {
            write_text(worksheet, row, col, v)?;
        }
        // Dates Excel cannot represent keep their ISO text
        ReportValue::Date(d) => match excel_date(d) {
            Some(date) => {
                worksheet.write_datetime_with_format(row, col, &date, &styles.date)?;
            }
            None => write_text(worksheet, row, col, &d.to_string())?,
        },
    }
    Ok(())
}

fn write_text(worksheet: &mut Worksheet, row: u32, col: u16, text: &str) -> Result<()> {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((cut, _)) => {
            log::warn!("Truncating cell ({}, {}) to {} characters", row, col, MAX_CELL_CHARS);
            worksheet.write_string(row, col, &text[..cut])?;
        }
        None => {
            worksheet.write_string(row, col, text)?;
        }
    }
    Ok(())
}

fn excel_date(date: &NaiveDate) -> Option<ExcelDateTime> {
    let year = u16::try_from(date.year())
        .ok()
        .filter(|year| EXCEL_YEARS.contains(year))?;
    ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8).ok()
}
