/// Authorization scheme prefix stored and sent with every authorized call.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Bring a raw token into bearer form. Idempotent: an already prefixed token
/// is returned unchanged (surrounding whitespace aside).
pub fn normalize_bearer(raw: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with(BEARER_PREFIX) {
        raw.to_string()
    } else {
        format!("{BEARER_PREFIX}{raw}")
    }
}
