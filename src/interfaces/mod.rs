//! User-facing entry points other than the HTTP host

pub mod cli;
