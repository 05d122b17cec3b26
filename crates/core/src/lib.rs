//! Shared domain types and pure logic for the Vocalis TTS service.

pub mod error;
pub mod language;
pub mod output;
pub mod types;
pub mod voice;
