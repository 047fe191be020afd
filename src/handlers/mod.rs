// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (JWT auth when `security.require_auth` is on)
pub mod protected; // /api/* resource endpoints
pub mod public; // /api/auth/*

/// Treats a missing or blank string field as absent.
pub(crate) fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
