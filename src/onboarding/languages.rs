//! Languages offered by the onboarding form.

/// Display names, in the order the form lists them.
pub const LANGUAGES: [&str; 14] = [
    "English",
    "Spanish",
    "French",
    "German",
    "Mandarin",
    "Japanese",
    "Korean",
    "Hindi",
    "Russian",
    "Portuguese",
    "Arabic",
    "Italian",
    "Turkish",
    "Dutch",
];

/// The value stored in the draft when `display_name` is chosen.
pub fn language_option_value(display_name: &str) -> String {
    display_name.to_lowercase()
}

/// Resolve user input (any casing) to a known language id.
pub fn resolve_language(input: &str) -> Option<String> {
    let input = input.trim();
    LANGUAGES
        .iter()
        .find(|lang| lang.eq_ignore_ascii_case(input))
        .map(|lang| language_option_value(lang))
}
