pub mod file_magic;

pub use file_magic::{SpreadsheetKind, file_extension, spreadsheet_kind, validate_magic_bytes};
