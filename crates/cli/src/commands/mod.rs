//! Command implementations.

mod run;
mod send_once;
mod validate;

pub use run::run_reporter;
pub use send_once::run_send_once;
pub use validate::run_validate;
