use std::path::PathBuf;

use log::info;
use rust_xlsxwriter::{Format, Workbook};

use crate::{error::Result, listing::export::Sheet};

/// A trait, necessary for every entity that will turn an exported sheet into
/// a downloadable file.
pub trait SheetWriter {
    fn write_sheet(&self, sheet: &Sheet, file_name: &str) -> Result<PathBuf>;
}

/// Writes `.xlsx` workbooks with a bold header row into `out_dir`.
#[derive(Debug, Clone)]
pub struct XlsxWriter {
    pub out_dir: PathBuf,
}

impl XlsxWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        XlsxWriter {
            out_dir: out_dir.into(),
        }
    }
}

impl SheetWriter for XlsxWriter {
    fn write_sheet(&self, sheet: &Sheet, file_name: &str) -> Result<PathBuf> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (col, header) in sheet.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
        }
        for (row, cells) in sheet.rows.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                worksheet.write_string(row as u32 + 1, col as u16, cell)?;
            }
        }

        let path = self.out_dir.join(file_name);
        workbook.save(&path)?;
        info!("Wrote {} rows to {}", sheet.rows.len(), path.display());
        Ok(path)
    }
}
