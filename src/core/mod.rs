// src/core/mod.rs

pub mod error;
pub mod knowledge_base;
pub mod models;
pub mod normalize;
pub mod scanner;
pub mod scoring;
