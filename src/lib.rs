// src/lib.rs — Library root for proxydash

pub mod api;
pub mod cli;
pub mod infra;
pub mod session;
