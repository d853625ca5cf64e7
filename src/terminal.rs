//! Line-oriented rendering of the two screens.
//!
//! Every prompt shows its default in brackets; an empty answer keeps it.
//! End of input leaves the program. Files are chosen through a [`FilePicker`].

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::app::Surface;
use crate::dialogs::{FilePicker, with_source_extension};
use crate::request::{Coverage, Month, SaveMode, Shift};
use crate::view::{Form, ViewModel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ConfirmFile(String),
    Register(SaveMode),
    ChangeFile,
    Stay,
    Quit,
}

pub struct Terminal<R, W, P> {
    input: R,
    output: W,
    picker: P,
}

/// Option by 1-based position or by its label, ignoring case.
fn choose<T: Copy + Display>(options: &[T], answer: &str) -> Option<T> {
    let answer = answer.trim();
    if let Ok(n) = answer.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| options.get(i)).copied();
    }
    let answer = answer.to_lowercase();
    options
        .iter()
        .find(|o| o.to_string().to_lowercase() == answer)
        .copied()
}

fn position<T: PartialEq>(options: &[T], current: &T) -> String {
    options
        .iter()
        .position(|o| o == current)
        .map(|i| (i + 1).to_string())
        .unwrap_or_default()
}

impl<R: BufRead, W: Write, P: FilePicker> Terminal<R, W, P> {
    pub fn new(input: R, output: W, picker: P) -> Self {
        Self {
            input,
            output,
            picker,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn banner(&mut self, title: &str, version: &str) -> io::Result<()> {
        writeln!(self.output, "{title}  v{version}")
    }

    fn ask(&mut self, label: &str, default: &str) -> io::Result<Option<String>> {
        if default.is_empty() {
            write!(self.output, "{label}: ")?;
        } else {
            write!(self.output, "{label} [{default}]: ")?;
        }
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim();
        Ok(Some(if line.is_empty() {
            default.to_string()
        } else {
            line.to_string()
        }))
    }

    fn notice(&mut self, kind: &str, title: &str, message: &str) {
        if let Err(err) = writeln!(self.output, "[{kind}] {title}: {message}") {
            log::warn!("no se pudo mostrar el aviso '{title}': {err}");
        }
    }

    pub fn select_file_screen(&mut self, vm: &ViewModel) -> io::Result<Action> {
        writeln!(self.output)?;
        writeln!(self.output, "Seleccionar archivo de partes")?;
        writeln!(
            self.output,
            "Indique la ruta del libro Excel con los partes mensuales \
             (e para examinar, q para salir)."
        )?;

        let suggestion = vm.path_suggestion();
        match self.ask("Ruta del archivo (.xlsx/.xlsm)", &suggestion)? {
            None => Ok(Action::Quit),
            Some(answer) if answer.eq_ignore_ascii_case("q") => Ok(Action::Quit),
            Some(answer) if answer.eq_ignore_ascii_case("e") => {
                match self.picker.pick_workbook(vm.workbook()) {
                    Some(path) => Ok(Action::ConfirmFile(path.to_string_lossy().into_owned())),
                    None => Ok(Action::Stay),
                }
            }
            Some(answer) => Ok(Action::ConfirmFile(answer)),
        }
    }

    pub fn form_screen(&mut self, vm: &mut ViewModel) -> io::Result<Action> {
        writeln!(self.output)?;
        writeln!(self.output, "Registrar horas extraordinarias")?;
        writeln!(self.output, "Archivo: {}", vm.workbook_name())?;
        if let Some(status) = vm.status() {
            writeln!(self.output, "{status}")?;
        }
        writeln!(self.output, "  1) Registrar y guardar")?;
        writeln!(self.output, "  2) Registrar en copia…")?;
        writeln!(self.output, "  c) Cambiar archivo")?;
        writeln!(self.output, "  q) Salir")?;

        let Some(choice) = self.ask("Opción", "1")? else {
            return Ok(Action::Quit);
        };
        let mode = match choice.to_lowercase().as_str() {
            "1" => SaveMode::InPlace,
            "2" => SaveMode::NewFile,
            "c" => return Ok(Action::ChangeFile),
            "q" => return Ok(Action::Quit),
            other => {
                self.notice("Error", "Error", &format!("Opción no válida: {other}"));
                return Ok(Action::Stay);
            }
        };

        if !self.fill_form(vm.form_mut())? {
            return Ok(Action::Quit);
        }
        Ok(Action::Register(mode))
    }

    /// Returns `false` when input ended midway.
    fn fill_form(&mut self, form: &mut Form) -> io::Result<bool> {
        let Some(day) = self.ask("1. Día (1-31)", &form.day)? else {
            return Ok(false);
        };
        form.day = day;

        let current = form.month.map(Month::name).unwrap_or_default();
        let Some(month) = self.ask("   Mes (1-12 o nombre)", current)? else {
            return Ok(false);
        };
        form.month = Month::parse(&month);

        let labels = Shift::ALL.map(|s| s.label()).join(", ");
        let Some(shift) = self.ask(
            &format!("2. Turno ({labels})"),
            &position(&Shift::ALL, &form.shift),
        )?
        else {
            return Ok(false);
        };
        match choose(&Shift::ALL, &shift) {
            Some(shift) => form.shift = shift,
            None => self.notice("Error", "Turno", &format!("Opción no válida: {shift}")),
        }

        writeln!(self.output, "3. ¿A quién cubre?")?;
        for (i, coverage) in Coverage::ALL.iter().enumerate() {
            writeln!(self.output, "   {}) {coverage}", i + 1)?;
        }
        let Some(coverage) = self.ask("   Cobertura", &position(&Coverage::ALL, &form.coverage))?
        else {
            return Ok(false);
        };
        match choose(&Coverage::ALL, &coverage) {
            Some(coverage) => form.coverage = coverage,
            None => self.notice("Error", "Cobertura", &format!("Opción no válida: {coverage}")),
        }

        Ok(true)
    }
}

impl<R: BufRead, W: Write, P: FilePicker> Surface for Terminal<R, W, P> {
    fn error(&mut self, title: &str, message: &str) {
        self.notice("Error", title, message);
    }

    fn warning(&mut self, title: &str, message: &str) {
        self.notice("Aviso", title, message);
    }

    fn info(&mut self, title: &str, message: &str) {
        self.notice("Info", title, message);
    }

    fn ask_save_path(&mut self, source: &Path) -> Option<PathBuf> {
        let chosen = self.picker.pick_destination(source);
        if chosen.is_none() {
            log::debug!("diálogo de guardado cerrado sin destino");
        }
        chosen.map(|path| with_source_extension(path, source))
    }
}
