//! Workbook fixtures shaped like the monthly overtime sheets.
#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use calamine::{Reader, open_workbook_auto};
use chrono::NaiveDate;
use partes::dialogs::FilePicker;
use umya_spreadsheet::Spreadsheet;
use umya_spreadsheet::structs::drawing::spreadsheet::MarkerType;
use umya_spreadsheet::structs::{Border, HorizontalAlignmentValues, Image, PatternValues, Worksheet};

pub const HIDDEN_ROW: u32 = 40;

/// Row holding `day` in every month sheet: header on row 1, day 1 on row 2.
pub fn day_row(day: u32) -> u32 {
    day + 1
}

/// Days between the 1900 and 1904 date-system epochs.
pub const DATE1904_OFFSET: f64 = 1462.0;

fn serial(date: NaiveDate) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap();
    (date - epoch).num_days() as f64
}

/// 1x1 transparent PNG.
const PIXEL_PNG: [u8; 67] = [
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
    0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0a, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

fn style_mark_cell(sheet: &mut Worksheet, coordinate: &str) {
    let style = sheet.get_style_mut(coordinate);
    style.get_font_mut().set_bold(true).set_size(12.0);
    style
        .get_borders_mut()
        .get_bottom_mut()
        .set_border_style(Border::BORDER_THIN);
    style
        .get_borders_mut()
        .get_right_mut()
        .set_border_style(Border::BORDER_MEDIUM);
    style
        .get_fill_mut()
        .get_pattern_fill_mut()
        .set_pattern_type(PatternValues::Solid);
    style
        .get_fill_mut()
        .get_pattern_fill_mut()
        .get_foreground_color_mut()
        .set_argb("ffddebf7");
    style
        .get_alignment_mut()
        .set_horizontal(HorizontalAlignmentValues::Center);
}

fn header(sheet: &mut Worksheet) {
    for (coordinate, text) in [
        ("A1", "Día"),
        ("B1", "Fecha"),
        ("C1", "Mañana"),
        ("D1", "Tarde"),
        ("E1", "Noche"),
        ("F1", "Observaciones"),
        ("P1", "Justificación"),
    ] {
        sheet.get_cell_mut(coordinate).set_value(text);
    }
    sheet.add_merge_cells("F1:H1");
}

/// Column A holds literal day numbers.
fn literal_sheet(sheet: &mut Worksheet, year: i32, month: u32) {
    header(sheet);
    for day in 1..=31u32 {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            break;
        };
        let row = day_row(day);
        sheet.get_cell_mut(format!("A{row}").as_str()).set_value_number(day);
        sheet
            .get_cell_mut(format!("B{row}").as_str())
            .set_value_number(serial(date));
        sheet
            .get_style_mut(format!("B{row}").as_str())
            .get_number_format_mut()
            .set_format_code("yyyy-mm-dd");
        for column in ["C", "D", "E", "P"] {
            style_mark_cell(sheet, &format!("{column}{row}"));
        }
        sheet
            .get_cell_mut(format!("F{row}").as_str())
            .set_value(format!("obs {day}"));
    }
    sheet.get_cell_mut("C3").set_value("X");
    sheet.get_cell_mut("P3").set_value("Sustitución Operador");
    sheet.get_row_dimension_mut(&HIDDEN_ROW).set_hidden(true);
    sheet
        .get_cell_mut(format!("A{HIDDEN_ROW}").as_str())
        .set_value("Total");
}

/// Column A holds `DAY(Bn)` and column B the date, as a serial shifted back
/// by `epoch_offset` days.
fn formula_sheet(sheet: &mut Worksheet, year: i32, month: u32, epoch_offset: f64) {
    header(sheet);
    for day in 1..=31u32 {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            break;
        };
        let row = day_row(day);
        sheet
            .get_cell_mut(format!("A{row}").as_str())
            .set_formula(format!("DAY(B{row})"));
        sheet
            .get_cell_mut(format!("B{row}").as_str())
            .set_value_number(serial(date) - epoch_offset);
        sheet
            .get_style_mut(format!("B{row}").as_str())
            .get_number_format_mut()
            .set_format_code("yyyy-mm-dd");
        for column in ["C", "D", "E", "P"] {
            style_mark_cell(sheet, &format!("{column}{row}"));
        }
    }
}

/// Portada, Febrero, Marzo (literal days) and "Abril 2025" (DAY formulas).
pub fn monthly_book() -> Spreadsheet {
    let mut book = umya_spreadsheet::new_file();
    {
        let cover = book.get_sheet_mut(&0).unwrap();
        cover.set_name("Portada");
        cover.get_cell_mut("A1").set_value("Parte mensual de horas");
    }
    literal_sheet(book.new_sheet("Febrero").unwrap(), 2025, 2);
    literal_sheet(book.new_sheet("Marzo").unwrap(), 2025, 3);
    formula_sheet(book.new_sheet("Abril 2025").unwrap(), 2025, 4, 0.0);
    book
}

/// "Abril 2025" with `DAY()` rows whose dates are stored as 1904-system
/// serials. Call [`mark_date1904`] on the written file.
pub fn date1904_book() -> Spreadsheet {
    let mut book = umya_spreadsheet::new_file();
    book.get_sheet_mut(&0).unwrap().set_name("Portada");
    formula_sheet(
        book.new_sheet("Abril 2025").unwrap(),
        2025,
        4,
        DATE1904_OFFSET,
    );
    book
}

/// Anchors a small picture at H2 of `sheet`.
pub fn add_picture(book: &mut Spreadsheet, sheet: &str, dir: &Path) {
    let png = dir.join("logo.png");
    fs::write(&png, PIXEL_PNG).unwrap();

    let mut marker = MarkerType::default();
    marker.set_coordinate("H2");
    let mut image = Image::default();
    image.new_image(png.to_str().unwrap(), marker);
    book.get_sheet_by_name_mut(sheet).unwrap().add_image(image);
}

pub fn write_book(book: &Spreadsheet, dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    umya_spreadsheet::writer::xlsx::write(book, &path).unwrap();
    path
}

pub fn write_monthly_book(dir: &Path) -> PathBuf {
    write_book(&monthly_book(), dir, "partes.xlsx")
}

pub fn read_book(path: &Path) -> Spreadsheet {
    umya_spreadsheet::reader::xlsx::read(path).unwrap()
}

/// Every non-empty value and formula, keyed by (sheet, 1-based row, 1-based column).
pub fn snapshot_cells(path: &Path) -> BTreeMap<(String, u32, u32), String> {
    let mut workbook = open_workbook_auto(path).unwrap();
    let mut cells = BTreeMap::new();
    for name in workbook.sheet_names() {
        let values = workbook.worksheet_range(&name).unwrap();
        if let Some((row0, col0)) = values.start() {
            for (r, c, value) in values.used_cells() {
                let key = (name.clone(), row0 + r as u32 + 1, col0 + c as u32 + 1);
                cells.insert(key, format!("{value:?}"));
            }
        }
        let formulas = workbook.worksheet_formula(&name).unwrap();
        if let Some((row0, col0)) = formulas.start() {
            for (r, c, formula) in formulas.used_cells() {
                let key = (name.clone(), row0 + r as u32 + 1, col0 + c as u32 + 1);
                cells.insert(key, format!("={formula}"));
            }
        }
    }
    cells
}

pub fn zip_entry(path: &Path, name: &str) -> Vec<u8> {
    let file = fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes).unwrap();
    bytes
}

/// Every archive entry whose name starts with one of `prefixes`.
pub fn zip_entries(path: &Path, prefixes: &[&str]) -> BTreeMap<String, Vec<u8>> {
    let file = fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut entries = BTreeMap::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        let name = entry.name().to_string();
        if prefixes.iter().any(|p| name.starts_with(p)) {
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes).unwrap();
            entries.insert(name, bytes);
        }
    }
    entries
}

fn with_date1904(xml: &str) -> String {
    let existing = xml.match_indices("<workbookPr").find(|(at, tag)| {
        matches!(xml.as_bytes().get(at + tag.len()), Some(b' ' | b'/' | b'>'))
    });
    match existing {
        Some((at, tag)) => {
            let at = at + tag.len();
            format!("{} date1904=\"1\"{}", &xml[..at], &xml[at..])
        }
        None => {
            let open = xml.find("<workbook ").unwrap();
            let end = open + xml[open..].find('>').unwrap() + 1;
            format!("{}<workbookPr date1904=\"1\"/>{}", &xml[..end], &xml[end..])
        }
    }
}

/// Switches a written workbook to the 1904 date system.
pub fn mark_date1904(path: &Path) {
    let bytes = fs::read(path).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut writer = zip::ZipWriter::new(fs::File::create(path).unwrap());
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        let name = entry.name().to_string();
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents).unwrap();
        if name == "xl/workbook.xml" {
            contents = with_date1904(&String::from_utf8(contents).unwrap()).into_bytes();
        }
        writer
            .start_file(name, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(&contents).unwrap();
    }
    writer.finish().unwrap();
}

/// Answers file dialogs from a fixed list; an exhausted list dismisses them.
#[derive(Debug, Default)]
pub struct ScriptedPicker {
    answers: VecDeque<Option<PathBuf>>,
}

impl ScriptedPicker {
    pub fn answering(answers: impl IntoIterator<Item = Option<PathBuf>>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
        }
    }
}

impl FilePicker for ScriptedPicker {
    fn pick_workbook(&mut self, _current: Option<&Path>) -> Option<PathBuf> {
        self.answers.pop_front().flatten()
    }

    fn pick_destination(&mut self, _source: &Path) -> Option<PathBuf> {
        self.answers.pop_front().flatten()
    }
}

pub fn dir_listing(dir: &Path) -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    entries.sort();
    entries
}
