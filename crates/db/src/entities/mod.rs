//! `SeaORM` entity definitions.
//!
//! One module per table, plus the Postgres enum mappings in
//! `sea_orm_active_enums`.

pub mod attendance_records;
pub mod enrollments;
pub mod good_moral_certificates;
pub mod lecturers;
pub mod payments;
pub mod programs;
pub mod sea_orm_active_enums;
pub mod sessions;
pub mod students;
pub mod users;
