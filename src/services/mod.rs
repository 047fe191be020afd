pub mod attendance_service;
pub mod division_service;

pub use attendance_service::{AttendanceService, MarkEntry};
pub use division_service::DivisionService;
