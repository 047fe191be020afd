//! In-memory store.
//!
//! Mirrors the relational constraints of the Postgres schema (unique
//! usernames, foreign keys without cascade) so handlers behave the same
//! against either backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::RwLock;

use super::error::{StoreError, StoreResult};
use super::models::{
    Attendance, AttendanceStatus, AttendanceTally, DateRange, Division, NewAttendance,
    NewProfessor, NewStudent, Professor, Student,
};
use super::store::Store;

#[derive(Default)]
struct Tables {
    professors: BTreeMap<i32, Professor>,
    divisions: BTreeMap<i32, Division>,
    // (professor_id, division_id)
    assignments: BTreeSet<(i32, i32)>,
    students: BTreeMap<i32, Student>,
    attendance: BTreeMap<i32, Attendance>,
    next_professor_id: i32,
    next_division_id: i32,
    next_student_id: i32,
    next_attendance_id: i32,
}

impl Tables {
    fn next_id(counter: &mut i32) -> i32 {
        *counter += 1;
        *counter
    }

    fn require_divisions(&self, division_ids: &[i32]) -> StoreResult<()> {
        match division_ids.iter().find(|id| !self.divisions.contains_key(*id)) {
            Some(missing) => Err(StoreError::not_found(format!("Division {} not found", missing))),
            None => Ok(()),
        }
    }

    fn division_records(&self, division_id: i32, range: DateRange) -> impl Iterator<Item = (&Student, &Attendance)> + '_ {
        self.attendance.values().filter_map(move |record| {
            let student = self.students.get(&record.student_id)?;
            (student.division_id == division_id && range.contains(record.date)).then_some((student, record))
        })
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn find_professor(&self, id: i32) -> StoreResult<Option<Professor>> {
        Ok(self.tables.read().await.professors.get(&id).cloned())
    }

    async fn find_professor_by_username(&self, username: &str) -> StoreResult<Option<Professor>> {
        let tables = self.tables.read().await;
        Ok(tables.professors.values().find(|p| p.username == username).cloned())
    }

    async fn create_professor(
        &self,
        professor: NewProfessor,
        division_ids: &[i32],
    ) -> StoreResult<Professor> {
        let mut tables = self.tables.write().await;

        if tables.professors.values().any(|p| p.username == professor.username) {
            return Err(StoreError::conflict("Username already exists"));
        }
        tables.require_divisions(division_ids)?;

        let id = Tables::next_id(&mut tables.next_professor_id);
        let created = Professor {
            id,
            username: professor.username,
            password: professor.password_hash,
            name: professor.name,
            department: professor.department,
            is_hod: professor.is_hod,
        };
        tables.professors.insert(id, created.clone());
        for &division_id in division_ids {
            tables.assignments.insert((id, division_id));
        }
        Ok(created)
    }

    async fn professor_divisions(&self, professor_id: i32) -> StoreResult<Vec<Division>> {
        let tables = self.tables.read().await;
        Ok(tables
            .assignments
            .iter()
            .filter(|(p, _)| *p == professor_id)
            .filter_map(|(_, d)| tables.divisions.get(d).cloned())
            .collect())
    }

    async fn assign_divisions(&self, professor_id: i32, division_ids: &[i32]) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.professors.contains_key(&professor_id) {
            return Err(StoreError::not_found("Professor not found"));
        }
        tables.require_divisions(division_ids)?;
        for &division_id in division_ids {
            tables.assignments.insert((professor_id, division_id));
        }
        Ok(())
    }

    async fn create_division(&self, name: &str) -> StoreResult<Division> {
        let mut tables = self.tables.write().await;
        let id = Tables::next_id(&mut tables.next_division_id);
        let division = Division { id, name: name.to_string() };
        tables.divisions.insert(id, division.clone());
        Ok(division)
    }

    async fn list_divisions(&self) -> StoreResult<Vec<Division>> {
        Ok(self.tables.read().await.divisions.values().cloned().collect())
    }

    async fn find_division(&self, id: i32) -> StoreResult<Option<Division>> {
        Ok(self.tables.read().await.divisions.get(&id).cloned())
    }

    async fn division_professors(&self, division_id: i32) -> StoreResult<Vec<Professor>> {
        let tables = self.tables.read().await;
        Ok(tables
            .assignments
            .iter()
            .filter(|(_, d)| *d == division_id)
            .filter_map(|(p, _)| tables.professors.get(p).cloned())
            .collect())
    }

    async fn create_student(&self, student: NewStudent) -> StoreResult<Student> {
        let mut tables = self.tables.write().await;
        if !tables.divisions.contains_key(&student.division_id) {
            return Err(StoreError::not_found("Division not found"));
        }
        let id = Tables::next_id(&mut tables.next_student_id);
        let created = Student {
            id,
            name: student.name,
            roll_number: student.roll_number,
            division_id: student.division_id,
        };
        tables.students.insert(id, created.clone());
        Ok(created)
    }

    async fn list_students(&self, division_id: i32) -> StoreResult<Vec<Student>> {
        let tables = self.tables.read().await;
        Ok(tables
            .students
            .values()
            .filter(|s| s.division_id == division_id)
            .cloned()
            .collect())
    }

    async fn find_student(&self, id: i32) -> StoreResult<Option<Student>> {
        Ok(self.tables.read().await.students.get(&id).cloned())
    }

    async fn update_student(&self, id: i32, student: NewStudent) -> StoreResult<Option<Student>> {
        let mut tables = self.tables.write().await;
        if !tables.students.contains_key(&id) {
            return Ok(None);
        }
        if !tables.divisions.contains_key(&student.division_id) {
            return Err(StoreError::not_found("Division not found"));
        }
        let updated = Student {
            id,
            name: student.name,
            roll_number: student.roll_number,
            division_id: student.division_id,
        };
        tables.students.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete_student(&self, id: i32) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.students.contains_key(&id) {
            return Ok(false);
        }
        if tables.attendance.values().any(|a| a.student_id == id) {
            return Err(StoreError::conflict("Student has attendance records"));
        }
        tables.students.remove(&id);
        Ok(true)
    }

    async fn create_attendance(&self, record: NewAttendance) -> StoreResult<Attendance> {
        let mut tables = self.tables.write().await;
        if !tables.students.contains_key(&record.student_id) {
            return Err(StoreError::not_found(format!("Student {} not found", record.student_id)));
        }
        let id = Tables::next_id(&mut tables.next_attendance_id);
        let created = Attendance {
            id,
            date: record.date,
            status: record.status,
            student_id: record.student_id,
        };
        tables.attendance.insert(id, created.clone());
        Ok(created)
    }

    async fn student_attendance(
        &self,
        student_id: i32,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> StoreResult<Vec<Attendance>> {
        let tables = self.tables.read().await;
        let mut records: Vec<Attendance> = tables
            .attendance
            .values()
            .filter(|a| a.student_id == student_id && a.date >= from && a.date <= to)
            .cloned()
            .collect();
        records.sort_by_key(|a| (a.date, a.id));
        Ok(records)
    }

    async fn count_division_attendance(&self, division_id: i32, range: DateRange) -> StoreResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables.division_records(division_id, range).count() as i64)
    }

    async fn attendance_tallies(
        &self,
        division_id: i32,
        range: DateRange,
    ) -> StoreResult<Vec<AttendanceTally>> {
        let tables = self.tables.read().await;
        let mut tallies: BTreeMap<i32, AttendanceTally> = BTreeMap::new();
        for (student, record) in tables.division_records(division_id, range) {
            let tally = tallies.entry(student.id).or_insert_with(|| AttendanceTally {
                student_id: student.id,
                student_name: student.name.clone(),
                present: 0,
                absent: 0,
            });
            match record.status {
                AttendanceStatus::Present => tally.present += 1,
                AttendanceStatus::Absent => tally.absent += 1,
            }
        }
        Ok(tallies.into_values().collect())
    }
}
