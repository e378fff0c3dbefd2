//! Cohort ("Zenturie") naming conventions.

/// Derive the year tag from a cohort name.
///
/// The year tag is the two characters following the first one, e.g.
/// `I24c` -> `24`. Names shorter than three characters have no year tag.
pub fn year_tag(cohort_name: &str) -> String {
    let chars: Vec<char> = cohort_name.chars().collect();
    if chars.len() < 3 {
        return String::new();
    }
    chars[1..3].iter().collect()
}

/// Validate a cohort name supplied by a user.
///
/// Cohort names become part of the feed URL, so only ASCII letters, digits,
/// `-` and `_` are accepted.
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() || name.len() > 32 {
        return Err("Zenturie name must be between 1 and 32 characters".to_string());
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(format!(
            "Zenturie name '{name}' may only contain letters, digits, '-' and '_'"
        ));
    }
    Ok(())
}
