pub mod imports;

pub use imports::ImportService;
