// handlers/protected/mod.rs - Resource handlers behind the JWT middleware
//
// Route prefix: /api/*
pub mod attendance;
pub mod dashboard;
pub mod divisions;
pub mod professors;
pub mod students;
