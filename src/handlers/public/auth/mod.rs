// handlers/public/auth/mod.rs - Public authentication handlers
pub mod login; // POST /api/auth/login - verify credentials, issue JWT
pub mod register; // POST /api/auth/register - create a professor account

pub use login::login;
pub use register::register;
