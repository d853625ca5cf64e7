use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::ConfigStore;
use crate::dialogs::{FilePicker, NativeDialogs};
use crate::engine::{self, Outcome, RegisterError};
use crate::request::SaveMode;
use crate::terminal::{Action, Terminal};
use crate::view::{Screen, ViewModel};

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_TITLE: &str = "Horas Extraordinarias - Parte Mensual";

/// Dialogs and prompts the registration flow needs from the user interface.
pub trait Surface {
    fn error(&mut self, title: &str, message: &str);
    fn warning(&mut self, title: &str, message: &str);
    fn info(&mut self, title: &str, message: &str);
    /// `None` when the user dismisses the dialog.
    fn ask_save_path(&mut self, source: &Path) -> Option<PathBuf>;
}

fn failure_title(err: &RegisterError) -> &'static str {
    match err {
        RegisterError::SheetNotFound(_) => "Hoja no encontrada",
        RegisterError::DayNotFound { .. } => "Día no encontrado",
        RegisterError::Locked(_) => "Archivo bloqueado",
        RegisterError::MissingFile(_) => "Archivo no encontrado",
        RegisterError::Unreadable { .. } => "Archivo ilegible",
        RegisterError::Workbook(_) | RegisterError::Io(_) => "Error",
    }
}

/// Validates the chosen path, moves to the form and persists the choice.
pub fn confirm_file(
    vm: &mut ViewModel,
    store: &ConfigStore,
    surface: &mut impl Surface,
    input: &str,
) {
    match vm.confirm_file(input) {
        Ok(config) => {
            if let Err(err) = store.save(config) {
                log::warn!("no se pudo guardar {}: {err}", store.path().display());
                surface.warning(
                    "Advertencia",
                    &format!("No se pudo guardar la configuración. {err}"),
                );
            }
        }
        Err(err) => surface.error("Error", &err.to_string()),
    }
}

/// Runs one registration and reports its result.
pub fn submit(vm: &mut ViewModel, mode: SaveMode, surface: &mut impl Surface) {
    let (source, request) = match vm.submission() {
        Ok(submission) => submission,
        Err(err) => {
            surface.error("Error", &err.to_string());
            return;
        }
    };

    match engine::register(&source, &request, mode, |src| surface.ask_save_path(src)) {
        Ok(Outcome::Saved(destination)) => {
            vm.record_success(&request);
            surface.info(
                "Éxito",
                &format!("Datos guardados en:\n{}", destination.display()),
            );
        }
        Ok(Outcome::Cancelled) => {}
        Err(err) => {
            log::warn!("registro fallido: {err}");
            surface.error(failure_title(&err), &err.to_string());
        }
    }
}

/// Drives both screens until the user leaves or input ends.
pub fn run_with<R, W, P>(store: &ConfigStore, terminal: &mut Terminal<R, W, P>) -> Result<()>
where
    R: io::BufRead,
    W: io::Write,
    P: FilePicker,
{
    let mut vm = ViewModel::new(store.load());
    terminal.banner(APP_TITLE, APP_VERSION)?;

    loop {
        let action = match vm.screen() {
            Screen::SelectFile => terminal.select_file_screen(&vm)?,
            Screen::FillForm => terminal.form_screen(&mut vm)?,
        };

        match action {
            Action::ConfirmFile(input) => confirm_file(&mut vm, store, terminal, &input),
            Action::Register(mode) => submit(&mut vm, mode, terminal),
            Action::ChangeFile => vm.change_file(),
            Action::Stay => {}
            Action::Quit => return Ok(()),
        }
    }
}

pub fn run() -> Result<()> {
    let store = ConfigStore::beside_executable()
        .context("no se pudo localizar el directorio del programa")?;
    log::debug!("configuración en {}", store.path().display());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut terminal = Terminal::new(stdin.lock(), stdout.lock(), NativeDialogs);
    run_with(&store, &mut terminal)
}
