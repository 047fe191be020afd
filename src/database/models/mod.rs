pub mod attendance;
pub mod division;
pub mod professor;
pub mod student;

pub use attendance::{
    parse_date_param, Attendance, AttendanceStatus, AttendanceTally, DateRange, NewAttendance,
};
pub use division::{Division, DivisionDetail, DivisionSummary, DivisionWithStudents};
pub use professor::{NewProfessor, Professor, ProfessorWithDivisions};
pub use student::{NewStudent, Student, StudentWithDivision};
