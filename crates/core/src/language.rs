//! Language code resolution for the synthesis engine.
//!
//! The engine expects full language names, not short codes. This
//! table normalizes the codes accepted on the submission API;
//! anything unrecognized falls back to the default language so a
//! bad code degrades gracefully instead of failing the job.

/// Language the engine falls back to for unrecognized codes.
pub const DEFAULT_LANGUAGE: &str = "English";

/// Accepted (case-insensitive) language codes and the engine-side
/// language name each resolves to. Bengali has no engine support
/// and deliberately maps to English.
const LANGUAGE_MAP: &[(&str, &str)] = &[
    ("en", "English"),
    ("english", "English"),
    ("zh", "中文"),
    ("chinese", "中文"),
    ("ja", "日本語"),
    ("japanese", "日本語"),
    ("ko", "한국어"),
    ("korean", "한국어"),
    ("yue", "粤语"),
    ("cantonese", "粤语"),
    ("bn", "English"),
];

/// Resolve a client-supplied language code to the engine's full
/// language name. Unrecognized codes resolve to [`DEFAULT_LANGUAGE`].
pub fn resolve_language(code: &str) -> &'static str {
    let lower = code.trim().to_lowercase();
    LANGUAGE_MAP
        .iter()
        .find(|(short, _)| *short == lower)
        .map(|(_, full)| *full)
        .unwrap_or(DEFAULT_LANGUAGE)
}
