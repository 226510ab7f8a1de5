//! Excel export functionality.

use crate::models::AppointmentRecord;
use chrono::Local;
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, XlsxError};
use std::path::{Path, PathBuf};

/// Export the appointment table to an Excel file.
pub fn export_appointments_to_excel(records: &[AppointmentRecord], path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet.set_name("Appointments")?;

    // Header format
    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x4472C4))
        .set_font_color(Color::White)
        .set_border(FormatBorder::Thin);

    let headers = [
        "ID",
        "Patient",
        "Patient ID",
        "Doctor",
        "Branch",
        "Date",
        "Time",
        "Status",
        "Payment",
        "Queue #",
    ];

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    // Column widths
    worksheet.set_column_width(0, 10)?; // ID
    worksheet.set_column_width(1, 28)?; // Patient
    worksheet.set_column_width(2, 12)?; // Patient ID
    worksheet.set_column_width(3, 25)?; // Doctor
    worksheet.set_column_width(4, 22)?; // Branch
    worksheet.set_column_width(5, 12)?; // Date
    worksheet.set_column_width(6, 10)?; // Time
    worksheet.set_column_width(7, 16)?; // Status
    worksheet.set_column_width(8, 12)?; // Payment
    worksheet.set_column_width(9, 9)?; // Queue

    for (idx, record) in records.iter().enumerate() {
        let row = (idx + 1) as u32;

        worksheet.write_string(row, 0, &record.id)?;
        worksheet.write_string(row, 1, &record.patient_name)?;
        worksheet.write_string(row, 2, &record.patient_id)?;
        worksheet.write_string(row, 3, &record.doctor_name)?;
        worksheet.write_string(row, 4, &record.branch_name)?;
        worksheet.write_string(row, 5, &record.date)?;
        worksheet.write_string(row, 6, &record.time)?;
        worksheet.write_string(row, 7, record.status.label())?;
        worksheet.write_string(row, 8, record.payment_status.label())?;

        match record.queue_number {
            Some(queue) => worksheet.write_number(row, 9, queue)?,
            None => worksheet.write_string(row, 9, "-")?,
        };
    }

    if !records.is_empty() {
        let last_row = records.len() as u32;
        worksheet.autofilter(0, 0, last_row, 9)?;
    }

    // Freeze top row
    worksheet.set_freeze_panes(1, 0)?;

    workbook.save(path)?;
    Ok(())
}

/// Open save file dialog and return selected path.
pub fn show_save_dialog(default_name: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_file_name(default_name)
        .add_filter("Excel Files", &["xlsx"])
        .save_file()
}

/// Generate default filename for export.
pub fn generate_export_filename(prefix: &str) -> String {
    let now = Local::now();
    format!("{prefix}_{ts}.xlsx", ts = now.format("%Y%m%d_%H%M%S"))
}
