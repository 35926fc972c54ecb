// src/lib.rs

//! Portfolio repository harvester library

pub mod error;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod services;
pub mod session;
pub mod utils;
