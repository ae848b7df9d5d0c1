pub mod imports;

pub use imports::configure_import_routes;
