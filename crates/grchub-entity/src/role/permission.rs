//! Permission codename helpers.
//!
//! Codenames follow the `<action>_<model>` convention (`view_asset`,
//! `change_riskscenario`). Whether a codename lets its holder modify data
//! is decided purely by its prefix.

/// Whether `codename` starts with one of the edit-capable `prefixes`.
pub fn is_edit_capable<S: AsRef<str>>(codename: &str, prefixes: &[S]) -> bool {
    prefixes
        .iter()
        .any(|prefix| codename.starts_with(prefix.as_ref()))
}

/// Whether `codename` is well formed: non-empty, lowercase, `<action>_<model>`.
pub fn is_valid_codename(codename: &str) -> bool {
    let Some((action, model)) = codename.split_once('_') else {
        return false;
    };
    !action.is_empty()
        && !model.is_empty()
        && codename
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
