//! Sheet and row lookup over the values read by calamine.
//!
//! Rows and columns handed to calamine are 0-based; the row returned by
//! [`find_day_row`] is 1-based like the A1 references written by umya.

use std::sync::LazyLock;

use calamine::{Data, Range};
use chrono::{Datelike, NaiveDate};
use regex::Regex;

const DAY_COLUMN: u32 = 0;
const DATE_COLUMN: u32 = 1;

static DAY_FORMULA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*=?\s*DAY\(").expect("valid regex"));

/// First sheet whose trimmed, lowercased name starts with the requested month.
pub fn find_sheet<'a>(names: &'a [String], month: &str) -> Option<&'a str> {
    let wanted = month.trim().to_lowercase();
    names
        .iter()
        .find(|name| name.trim().to_lowercase().starts_with(&wanted))
        .map(String::as_str)
}

/// How column 1 of a day row encodes its day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayCell {
    Literal(i64),
    /// `=DAY(...)`: the day comes from the date in column 2.
    FormulaDerived,
}

pub fn read_day_cell(value: Option<&Data>, formula: Option<&str>) -> Option<DayCell> {
    if let Some(formula) = formula.filter(|f| !f.trim().is_empty()) {
        // Only the prefix is checked; other formulas never hold a literal day.
        return DAY_FORMULA
            .is_match(formula)
            .then_some(DayCell::FormulaDerived);
    }
    value.and_then(literal_day).map(DayCell::Literal)
}

fn literal_day(value: &Data) -> Option<i64> {
    match value {
        Data::Int(n) => Some(*n),
        Data::Float(n) if n.is_finite() && n.fract() == 0.0 => Some(*n as i64),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Day of month of a date cell, if the cell holds a date.
///
/// Serial dates go through calamine, which knows whether the workbook uses
/// the 1900 or the 1904 date system.
pub fn date_day(value: &Data) -> Option<u32> {
    match value {
        Data::DateTime(dt) => dt.as_datetime().map(|d| d.day()),
        Data::DateTimeIso(s) => s
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(|d| d.day()),
        _ => None,
    }
}

fn row_span(values: &Range<Data>, formulas: &Range<String>) -> Option<(u32, u32)> {
    let starts = [values.start(), formulas.start()];
    let ends = [values.end(), formulas.end()];
    let first = starts.iter().flatten().map(|&(row, _)| row).min()?;
    let last = ends.iter().flatten().map(|&(row, _)| row).max()?;
    Some((first, last))
}

/// 1-based row whose column 1 designates `day`, scanning top to bottom.
pub fn find_day_row(values: &Range<Data>, formulas: &Range<String>, day: u32) -> Option<u32> {
    let (first, last) = row_span(values, formulas)?;

    (first..=last)
        .find(|&row| {
            let value = values.get_value((row, DAY_COLUMN));
            let formula = formulas.get_value((row, DAY_COLUMN)).map(String::as_str);
            match read_day_cell(value, formula) {
                Some(DayCell::Literal(n)) => n == i64::from(day),
                Some(DayCell::FormulaDerived) => {
                    values.get_value((row, DATE_COLUMN)).and_then(date_day) == Some(day)
                }
                None => false,
            }
        })
        .map(|row| row + 1)
}
