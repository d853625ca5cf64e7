//! Native file dialogs for the workbook and for save-as destinations.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

const WORKBOOK_EXTENSIONS: [&str; 2] = ["xlsx", "xlsm"];

/// Where the user picks files. `None` means the dialog was dismissed.
pub trait FilePicker {
    fn pick_workbook(&mut self, current: Option<&Path>) -> Option<PathBuf>;
    fn pick_destination(&mut self, source: &Path) -> Option<PathBuf>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NativeDialogs;

impl FilePicker for NativeDialogs {
    fn pick_workbook(&mut self, current: Option<&Path>) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new()
            .set_title("Seleccionar archivo de partes")
            .add_filter("Libros Excel", &WORKBOOK_EXTENSIONS)
            .add_filter("Todos los archivos", &["*"]);
        if let Some(dir) = current.and_then(Path::parent) {
            dialog = dialog.set_directory(dir);
        }
        dialog.pick_file()
    }

    fn pick_destination(&mut self, source: &Path) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new()
            .set_title("Guardar copia del parte")
            .add_filter("Libro Excel", &[source_extension(source)]);
        if let Some(name) = source.file_name() {
            dialog = dialog.set_file_name(name.to_string_lossy());
        }
        if let Some(dir) = source.parent().filter(|d| !d.as_os_str().is_empty()) {
            dialog = dialog.set_directory(dir);
        }
        dialog.save_file()
    }
}

/// Extension of the source workbook, `xlsx` when it has none.
pub fn source_extension(source: &Path) -> &str {
    source
        .extension()
        .and_then(OsStr::to_str)
        .unwrap_or("xlsx")
}

/// A destination without extension takes the source's, so a macro workbook
/// stays `.xlsm`.
pub fn with_source_extension(mut path: PathBuf, source: &Path) -> PathBuf {
    if path.extension().is_none() {
        path.set_extension(source_extension(source));
    }
    path
}
