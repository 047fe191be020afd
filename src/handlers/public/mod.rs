// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition and account creation. Route prefix: /api/auth/*
pub mod auth;
