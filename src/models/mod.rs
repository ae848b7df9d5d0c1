pub mod common;
pub mod imports;
pub mod roster;

pub use common::{ApiResponse, ErrorCode};
