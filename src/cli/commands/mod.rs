pub mod attendance;
pub mod auth;
pub mod dashboard;
pub mod division;
pub mod professor;
pub mod server;
pub mod student;
