//! Report renderer: writes application aggregation rows to an XLSX workbook.

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::errors::AppError;
use crate::services::aggregation::ApplicationRow;

/// MIME type of the generated workbook.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Offers the workbook to the browser as a download.
pub const REPORT_DISPOSITION: &str = "attachment; filename=dashboard_report.xlsx";

pub const SHEET_NAME: &str = "Applications";

/// Column headers and widths, in output order.
const COLUMNS: [(&str, f64); 5] = [
    ("Period", 18.0),
    ("Total Applications", 20.0),
    ("Approved", 15.0),
    ("Rejected", 15.0),
    ("Pending", 15.0),
];

/// Render `rows` into an in-memory XLSX file, one data row per input row.
pub fn render_application_report(rows: &[ApplicationRow]) -> Result<Vec<u8>, AppError> {
    build_workbook(rows).map_err(|e| AppError::Internal(format!("Report rendering failed: {e}")))
}

fn build_workbook(rows: &[ApplicationRow]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, (header, width)) in (0u16..).zip(COLUMNS) {
        worksheet.set_column_width(col, width)?;
        worksheet.write_string_with_format(0, col, header, &header_format)?;
    }

    for (row, data) in (1u32..).zip(rows) {
        worksheet.write_string(row, 0, &data.period)?;
        worksheet.write_number(row, 1, data.total as f64)?;
        worksheet.write_number(row, 2, data.counts.approved as f64)?;
        worksheet.write_number(row, 3, data.counts.rejected as f64)?;
        worksheet.write_number(row, 4, data.counts.pending as f64)?;
    }

    workbook.save_to_buffer()
}
