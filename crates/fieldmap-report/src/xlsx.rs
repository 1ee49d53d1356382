//! Workbook serialization to `.xlsx`.
//!
//! The document creation time is pinned, so the same workbook always
//! produces the same bytes.

use anyhow::{Context, Result};
use rust_xlsxwriter::{Color, DocProperties, ExcelDateTime, Format, FormatAlign, Worksheet};

use fieldmap_model::ScoreTier;

use crate::workbook::{Sheet, Workbook, tier_color};

/// Cell formats shared by every sheet of one workbook.
struct SheetFormats {
    header: Format,
    low: Format,
    medium: Format,
    high: Format,
}

impl SheetFormats {
    fn new() -> Result<Self> {
        Ok(Self {
            header: Format::new().set_bold(),
            low: tier_format(ScoreTier::Low)?,
            medium: tier_format(ScoreTier::Medium)?,
            high: tier_format(ScoreTier::High)?,
        })
    }

    fn tier(&self, tier: ScoreTier) -> &Format {
        match tier {
            ScoreTier::Low => &self.low,
            ScoreTier::Medium => &self.medium,
            ScoreTier::High => &self.high,
        }
    }
}

/// Parses a `#RRGGBB` colour into a spreadsheet colour.
pub fn rgb(hex: &str) -> Result<Color> {
    let value = u32::from_str_radix(hex.trim_start_matches('#'), 16)
        .with_context(|| format!("invalid colour {hex}"))?;
    Ok(Color::RGB(value))
}

fn tier_format(tier: ScoreTier) -> Result<Format> {
    Ok(Format::new()
        .set_background_color(rgb(tier_color(tier))?)
        .set_align(FormatAlign::Center))
}

/// Serializes a workbook into xlsx bytes.
pub fn write_xlsx(workbook: &Workbook) -> Result<Vec<u8>> {
    let formats = SheetFormats::new()?;
    let mut xlsx = rust_xlsxwriter::Workbook::new();
    let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
    xlsx.set_properties(&DocProperties::new().set_creation_datetime(&created));

    for sheet in &workbook.sheets {
        let worksheet = xlsx.add_worksheet();
        write_sheet(worksheet, sheet, &formats)
            .with_context(|| format!("write sheet {}", sheet.name))?;
    }

    xlsx.save_to_buffer().context("serialize workbook")
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &Sheet, formats: &SheetFormats) -> Result<()> {
    worksheet.set_name(&sheet.name)?;

    for (idx, column) in sheet.columns.iter().enumerate() {
        let col = u16::try_from(idx).context("too many columns")?;
        worksheet.set_column_width(col, column.width as f64)?;
        worksheet.write_string_with_format(0, col, &column.header, &formats.header)?;
    }
    if !sheet.columns.is_empty() {
        worksheet.set_freeze_panes(1, 0)?;
    }

    for (row_idx, row) in sheet.rows.iter().enumerate() {
        let row_num = u32::try_from(row_idx + 1).context("too many rows")?;
        for (col_idx, cell) in row.iter().enumerate() {
            let col = u16::try_from(col_idx).context("too many columns")?;
            match cell.fill {
                Some(tier) => {
                    worksheet.write_string_with_format(
                        row_num,
                        col,
                        &cell.value,
                        formats.tier(tier),
                    )?;
                }
                None => {
                    worksheet.write_string(row_num, col, &cell.value)?;
                }
            }
        }
    }
    Ok(())
}
