//! Writes one overtime entry into the monthly workbook.
//!
//! All edits happen on a scratch copy. The finished document is staged next to
//! the destination and renamed over it, so the destination is either the old
//! file or the new one.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use calamine::{Reader, open_workbook_auto};
use tempfile::TempDir;
use thiserror::Error;
use umya_spreadsheet::structs::{Alignment, Cell, Fill, Font, Style, Worksheet};

use crate::lookup::{find_day_row, find_sheet};
use crate::request::{JUSTIFICATION_COLUMN, PRESENCE_MARK, RegistrationRequest, SaveMode};

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("No se encontró el archivo: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("No se pudo leer el libro {}: {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error("No existe hoja para '{0}'")]
    SheetNotFound(String),

    #[error("No se encontró el día {day} en la hoja '{sheet}'")]
    DayNotFound { day: u32, sheet: String },

    #[error("Cierre el archivo Excel antes de registrar ({}).", .0.display())]
    Locked(PathBuf),

    #[error("No se pudo escribir el libro: {0}")]
    Workbook(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Saved(PathBuf),
    /// The save-as dialog was dismissed; nothing was written.
    Cancelled,
}

/// Visual formatting of a cell that a value write must not disturb.
///
/// umya does not export its border container, so borders are held in a
/// `Style` that carries nothing else.
#[derive(Debug, Clone, PartialEq)]
pub struct CellFormat {
    pub font: Option<Font>,
    pub fill: Option<Fill>,
    pub alignment: Option<Alignment>,
    borders: Style,
}

impl CellFormat {
    pub fn of(cell: &Cell) -> Self {
        let style = cell.get_style();
        let mut borders = Style::default();
        if let Some(cell_borders) = style.get_borders() {
            *borders.get_borders_mut() = cell_borders.clone();
        }
        Self {
            font: style.get_font().cloned(),
            fill: style.get_fill().cloned(),
            alignment: style.get_alignment().cloned(),
            borders,
        }
    }

    pub fn has_borders(&self) -> bool {
        self.borders.get_borders().is_some()
    }
}

fn column_number_to_name(mut column: u32) -> String {
    // 1 -> A, 26 -> Z, 27 -> AA ...
    let mut name = String::new();
    while column > 0 {
        let rem = ((column - 1) % 26) as u8;
        name.insert(0, (b'A' + rem) as char);
        column = (column - 1) / 26;
    }
    name
}

pub fn to_a1(col_1based: u32, row_1based: u32) -> String {
    format!("{}{}", column_number_to_name(col_1based), row_1based)
}

/// Sheet and 1-based row the request resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub sheet: String,
    pub row: u32,
}

/// Resolves month sheet and day row without modifying anything.
pub fn locate(path: &Path, request: &RegistrationRequest) -> Result<Target, RegisterError> {
    let unreadable = |reason: String| RegisterError::Unreadable {
        path: path.to_path_buf(),
        reason,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| unreadable(e.to_string()))?;
    let names = workbook.sheet_names();
    let sheet = find_sheet(&names, request.month.name())
        .ok_or_else(|| RegisterError::SheetNotFound(request.month.name().to_string()))?
        .to_string();

    let values = workbook
        .worksheet_range(&sheet)
        .map_err(|e| unreadable(e.to_string()))?;
    let formulas = workbook
        .worksheet_formula(&sheet)
        .map_err(|e| unreadable(e.to_string()))?;

    let row = find_day_row(&values, &formulas, request.day).ok_or_else(|| {
        RegisterError::DayNotFound {
            day: request.day,
            sheet: sheet.clone(),
        }
    })?;

    log::debug!("día {} de {} -> hoja '{sheet}', fila {row}", request.day, request.month);
    Ok(Target { sheet, row })
}

/// Replaces the value of a cell and puts its previous style back.
fn overwrite_value(sheet: &mut Worksheet, coordinate: &str, value: &str) {
    let cell = sheet.get_cell_mut(coordinate);
    let snapshot = cell.get_style().clone();
    cell.set_value(value);
    cell.set_style(snapshot);
}

/// Private copy of the source workbook, removed when dropped.
struct ScratchCopy {
    dir: TempDir,
    working: PathBuf,
    extension: String,
}

impl ScratchCopy {
    fn of(source: &Path) -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("partes-").tempdir()?;
        let extension = source
            .extension()
            .and_then(OsStr::to_str)
            .unwrap_or("xlsx")
            .to_string();
        let working = dir.path().join(format!("working.{extension}"));
        fs::copy(source, &working)?;
        Ok(Self {
            dir,
            working,
            extension,
        })
    }

    fn output(&self) -> PathBuf {
        self.dir.path().join(format!("output.{}", self.extension))
    }
}

fn is_lock_error(err: &io::Error) -> bool {
    // 32/33: ERROR_SHARING_VIOLATION / ERROR_LOCK_VIOLATION
    err.kind() == io::ErrorKind::PermissionDenied
        || (cfg!(windows) && matches!(err.raw_os_error(), Some(32 | 33)))
}

fn classify_write_error(err: io::Error, destination: &Path) -> RegisterError {
    if is_lock_error(&err) {
        RegisterError::Locked(destination.to_path_buf())
    } else {
        RegisterError::Io(err)
    }
}

/// Moves the rendered workbook onto `destination` in one rename.
///
/// An existing destination keeps its permissions; a new one takes the
/// source's. A read-only destination is refused as locked.
fn persist(rendered: &Path, source: &Path, destination: &Path) -> Result<(), RegisterError> {
    let permissions = match fs::metadata(destination) {
        Ok(meta) if meta.permissions().readonly() => {
            return Err(RegisterError::Locked(destination.to_path_buf()));
        }
        Ok(meta) => meta.permissions(),
        Err(err) if err.kind() == io::ErrorKind::NotFound => fs::metadata(source)?.permissions(),
        Err(err) => return Err(classify_write_error(err, destination)),
    };

    let dir = match destination.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut staged = tempfile::Builder::new()
        .prefix(".partes-")
        .tempfile_in(dir)
        .map_err(|e| classify_write_error(e, destination))?;
    io::copy(&mut fs::File::open(rendered)?, &mut staged)?;
    staged.as_file().sync_all()?;
    staged.as_file().set_permissions(permissions)?;

    staged
        .persist(destination)
        .map_err(|e| classify_write_error(e.error, destination))?;
    Ok(())
}

/// Marks `request.shift` and writes the coverage text on the day row of the
/// month sheet, then saves according to `mode`.
///
/// For [`SaveMode::NewFile`] `choose_destination` is called with the source
/// path once the document is ready; returning `None` cancels without writing.
pub fn register<F>(
    source: &Path,
    request: &RegistrationRequest,
    mode: SaveMode,
    choose_destination: F,
) -> Result<Outcome, RegisterError>
where
    F: FnOnce(&Path) -> Option<PathBuf>,
{
    if !source.is_file() {
        return Err(RegisterError::MissingFile(source.to_path_buf()));
    }

    let scratch = ScratchCopy::of(source)?;
    let target = locate(&scratch.working, request)?;

    let mut book = umya_spreadsheet::reader::xlsx::read(&scratch.working).map_err(|e| {
        RegisterError::Unreadable {
            path: source.to_path_buf(),
            reason: e.to_string(),
        }
    })?;
    let sheet = book
        .get_sheet_by_name_mut(&target.sheet)
        .ok_or_else(|| RegisterError::SheetNotFound(target.sheet.clone()))?;

    overwrite_value(
        sheet,
        &to_a1(request.shift.column(), target.row),
        PRESENCE_MARK,
    );
    overwrite_value(
        sheet,
        &to_a1(JUSTIFICATION_COLUMN, target.row),
        request.coverage.text(),
    );

    let destination = match mode {
        SaveMode::InPlace => source.to_path_buf(),
        SaveMode::NewFile => match choose_destination(source) {
            Some(path) => path,
            None => {
                log::info!("guardado cancelado; {} sin cambios", source.display());
                return Ok(Outcome::Cancelled);
            }
        },
    };

    let output = scratch.output();
    umya_spreadsheet::writer::xlsx::write(&book, &output)
        .map_err(|e| RegisterError::Workbook(e.to_string()))?;

    persist(&output, source, &destination)?;

    log::info!(
        "registrado día {} de {} ({}, {}) en {}",
        request.day,
        request.month,
        request.shift,
        request.coverage,
        destination.display()
    );
    Ok(Outcome::Saved(destination))
}
