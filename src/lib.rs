// src/lib.rs

pub mod app;
pub mod core;
pub mod logging;
pub mod service;
pub mod ui;
