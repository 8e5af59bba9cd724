//! Command handlers, one module per subcommand.

pub mod config_cmd;
pub mod countries;
pub mod coverage;
pub mod detail;
pub mod schemes;
pub mod years;
