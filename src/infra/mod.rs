// src/infra/mod.rs

pub mod errors;
pub mod logger;
pub mod paths;
