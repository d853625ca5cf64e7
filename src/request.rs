use std::fmt;

use chrono::{Datelike, Local};

/// Value written into the shift cell.
pub const PRESENCE_MARK: &str = "X";

/// Column P, free-text justification of the overtime.
pub const JUSTIFICATION_COLUMN: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Month {
    Enero,
    Febrero,
    Marzo,
    Abril,
    Mayo,
    Junio,
    Julio,
    Agosto,
    Septiembre,
    Octubre,
    Noviembre,
    Diciembre,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Enero,
        Month::Febrero,
        Month::Marzo,
        Month::Abril,
        Month::Mayo,
        Month::Junio,
        Month::Julio,
        Month::Agosto,
        Month::Septiembre,
        Month::Octubre,
        Month::Noviembre,
        Month::Diciembre,
    ];

    /// 1 = Enero ... 12 = Diciembre.
    pub fn from_number(number: u32) -> Option<Month> {
        let index = usize::try_from(number).ok()?.checked_sub(1)?;
        Self::ALL.get(index).copied()
    }

    pub fn current() -> Month {
        // chrono guarantees 1..=12
        Self::from_number(Local::now().month()).unwrap_or(Month::Enero)
    }

    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    pub fn name(self) -> &'static str {
        match self {
            Month::Enero => "Enero",
            Month::Febrero => "Febrero",
            Month::Marzo => "Marzo",
            Month::Abril => "Abril",
            Month::Mayo => "Mayo",
            Month::Junio => "Junio",
            Month::Julio => "Julio",
            Month::Agosto => "Agosto",
            Month::Septiembre => "Septiembre",
            Month::Octubre => "Octubre",
            Month::Noviembre => "Noviembre",
            Month::Diciembre => "Diciembre",
        }
    }

    /// Accepts a month number or a month name in any case.
    pub fn parse(text: &str) -> Option<Month> {
        let text = text.trim();
        if let Ok(number) = text.parse::<u32>() {
            return Self::from_number(number);
        }
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(text))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shift {
    #[default]
    Morning,
    Afternoon,
    Night,
}

impl Shift {
    pub const ALL: [Shift; 3] = [Shift::Morning, Shift::Afternoon, Shift::Night];

    /// 1-based column holding the presence marks of this shift (C, D, E).
    pub fn column(self) -> u32 {
        match self {
            Shift::Morning => 3,
            Shift::Afternoon => 4,
            Shift::Night => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Shift::Morning => "Mañana",
            Shift::Afternoon => "Tarde",
            Shift::Night => "Noche",
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Coverage {
    #[default]
    SubstituteOperator,
    SubstituteShiftLead,
}

impl Coverage {
    pub const ALL: [Coverage; 2] = [Coverage::SubstituteOperator, Coverage::SubstituteShiftLead];

    pub fn text(self) -> &'static str {
        match self {
            Coverage::SubstituteOperator => "Sustitución Operador",
            Coverage::SubstituteShiftLead => "Sustitución Jefe de Turno",
        }
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// One overtime entry, built per submission and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub day: u32,
    pub month: Month,
    pub shift: Shift,
    pub coverage: Coverage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    InPlace,
    NewFile,
}
