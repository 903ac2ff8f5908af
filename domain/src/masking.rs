//! Display-safe masking of secrets.

/// Masks an API key for display purposes.
///
/// Secrets of 12 characters or fewer reveal the first 4 and last 2
/// characters; longer secrets reveal the first 8 and last 4. The hidden
/// middle is replaced by a fixed `...` placeholder, so the mask is
/// reproducible and never reconstructable into the full secret for inputs
/// longer than the reveal window. Display only - never use the mask for
/// comparison or lookup.
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();

    let (prefix_len, suffix_len) = if chars.len() <= 12 { (4, 2) } else { (8, 4) };

    let prefix: String = chars.iter().take(prefix_len).collect();
    let suffix: String = chars
        .iter()
        .skip(chars.len().saturating_sub(suffix_len))
        .collect();

    format!("{prefix}...{suffix}")
}
