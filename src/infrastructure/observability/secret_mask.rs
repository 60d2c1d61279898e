const VISIBLE_PREFIX: usize = 4;

/// Masks a credential for logging, keeping only a short prefix.
pub fn mask_secret(secret: &str) -> String {
    let trimmed = secret.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let char_count = trimmed.chars().count();
    if char_count <= VISIBLE_PREFIX * 2 {
        return String::from("[REDACTED]");
    }

    let prefix: String = trimmed.chars().take(VISIBLE_PREFIX).collect();
    format!("{}****({} chars)", prefix, char_count)
}
