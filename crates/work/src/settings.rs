//! Backend settings keys.

/// Environment file written when none is given.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Keys the backend reads.
pub const KNOWN_KEYS: &[&str] = &[
    "SUPABASE_URL",
    "SUPABASE_API_KEY",
    "ALLOWED_ORIGINS",
    "RESEND_API_KEY",
    "TALLY_API_KEY",
    "OPENAI_API_KEY",
    "TAVILY_API_KEY",
];

/// Whether the backend is known to read `key`.
pub fn is_known_key(key: &str) -> bool {
    KNOWN_KEYS.contains(&key)
}
