//! CLI command implementations

mod config_gen;
mod create;
mod report;
mod resolve;

pub use config_gen::config_generate;
pub use create::create_link;
pub use report::print_report;
pub use resolve::resolve_link;
