pub mod admin;
pub mod tts;
pub mod voices;
