//! Overtime registration into the monthly shift workbook.
//!
//! The month sheet and day row are found with calamine, the two cells are
//! rewritten with umya-spreadsheet on a scratch copy, and only the finished
//! document reaches the destination file.

pub mod app;
pub mod config;
pub mod dialogs;
pub mod engine;
pub mod lookup;
pub mod request;
pub mod terminal;
pub mod view;

pub use config::{ConfigStore, SessionConfig};
pub use engine::{CellFormat, Outcome, RegisterError, locate, register};
pub use request::{Coverage, Month, RegistrationRequest, SaveMode, Shift};
