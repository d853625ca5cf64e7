//! Screen state, independent of whatever draws it.

use std::path::{Path, PathBuf};

use chrono::{Datelike, Local};
use thiserror::Error;

use crate::config::SessionConfig;
use crate::request::{Coverage, Month, RegistrationRequest, Shift};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    SelectFile,
    FillForm,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Debe seleccionar un archivo.")]
    EmptyPath,

    #[error("No se encontró el archivo indicado. Verifique la ruta.")]
    FileNotFound(PathBuf),

    #[error("Introduzca un día válido (1-31).")]
    InvalidDay,

    #[error("Seleccione un mes.")]
    MissingMonth,
}

/// Raw form fields. The day stays text until submission, as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub day: String,
    pub month: Option<Month>,
    pub shift: Shift,
    pub coverage: Coverage,
}

impl Form {
    pub fn today() -> Self {
        Self {
            day: Local::now().day().to_string(),
            month: Some(Month::current()),
            shift: Shift::default(),
            coverage: Coverage::default(),
        }
    }

    /// No month-length check here: day 31 of a 30-day month fails at lookup.
    pub fn request(&self) -> Result<RegistrationRequest, InputError> {
        let day = self
            .day
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|d| (1..=31).contains(d))
            .ok_or(InputError::InvalidDay)?;
        let month = self.month.ok_or(InputError::MissingMonth)?;
        Ok(RegistrationRequest {
            day,
            month,
            shift: self.shift,
            coverage: self.coverage,
        })
    }
}

#[derive(Debug)]
pub struct ViewModel {
    config: SessionConfig,
    screen: Screen,
    form: Form,
    status: Option<String>,
}

impl ViewModel {
    pub fn new(config: SessionConfig) -> Self {
        let screen = if config.existing_file().is_some() {
            Screen::FillForm
        } else {
            Screen::SelectFile
        };
        Self {
            config,
            screen,
            form: Form::today(),
            status: None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn workbook(&self) -> Option<&Path> {
        self.config.filepath.as_deref()
    }

    /// File name shown in the form header.
    pub fn workbook_name(&self) -> String {
        self.workbook()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Initial content of the path entry.
    pub fn path_suggestion(&self) -> String {
        self.workbook()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    }

    /// SelectFile -> FillForm. Returns the updated config for persistence.
    pub fn confirm_file(&mut self, input: &str) -> Result<&SessionConfig, InputError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(InputError::EmptyPath);
        }
        let path = PathBuf::from(input);
        if !path.is_file() {
            return Err(InputError::FileNotFound(path));
        }

        self.config.filepath = Some(path);
        self.enter_form();
        Ok(&self.config)
    }

    /// FillForm -> SelectFile.
    pub fn change_file(&mut self) {
        self.screen = Screen::SelectFile;
    }

    fn enter_form(&mut self) {
        self.screen = Screen::FillForm;
        self.form = Form::today();
        self.status = None;
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form {
        &mut self.form
    }

    /// Validated source path and request for one submission.
    pub fn submission(&self) -> Result<(PathBuf, RegistrationRequest), InputError> {
        let source = self.workbook().ok_or(InputError::EmptyPath)?.to_path_buf();
        let request = self.form.request()?;
        Ok((source, request))
    }

    pub fn record_success(&mut self, request: &RegistrationRequest) {
        self.status = Some(format!(
            "Registrado: {} de {} ({})",
            request.day, request.month, request.shift
        ));
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}
