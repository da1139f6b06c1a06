//! Identifier case helpers shared by the component library.

use std::sync::LazyLock;

use heck::{ToSnakeCase, ToTitleCase, ToUpperCamelCase};
use regex::Regex;

static NON_MACHINE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[^a-z0-9_]+").ok());

/// Lowercase machine name: `"My Module!"` becomes `my_module`.
///
/// Runs of characters outside `[a-z0-9_]` collapse into one underscore, and
/// leading digits are prefixed so the result is a valid PHP identifier part.
pub fn machine_name(input: &str) -> String {
    let snake = input.to_snake_case();
    let cleaned = match NON_MACHINE.as_ref() {
        Some(pattern) => pattern.replace_all(&snake, "_").into_owned(),
        None => snake,
    };
    let joined = cleaned.split('_').filter(|part| !part.is_empty()).collect::<Vec<_>>().join("_");
    match joined.chars().next() {
        Some(first) if first.is_ascii_digit() => format!("_{joined}"),
        _ => joined,
    }
}

/// PHP class name: `settings_form` becomes `SettingsForm`.
pub fn class_name(input: &str) -> String {
    input.to_upper_camel_case()
}

/// Human-readable label: `settings_form` becomes `Settings Form`.
pub fn readable(input: &str) -> String {
    input.to_title_case()
}

/// Sentence-case label: `administer foo` becomes `Administer foo`.
pub fn sentence(input: &str) -> String {
    let spaced = input.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Split a backslash-separated class name into namespace and short name.
///
/// `Drupal\Core\Form\FormBase` becomes `("Drupal\Core\Form", "FormBase")`.
pub fn split_class(qualified: &str) -> (&str, &str) {
    let qualified = qualified.trim_start_matches('\\');
    match qualified.rsplit_once('\\') {
        Some((namespace, short)) => (namespace, short),
        None => ("", qualified),
    }
}
