//! Google Gemini question source.

mod client;
mod config;
mod error;
mod models;

pub use client::GeminiQuestionSource;
pub use config::GeminiConfig;
pub use error::{GeminiError, GeminiResult};
