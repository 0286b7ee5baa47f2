//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod attendance;
pub mod certificate;
pub mod enrollment;
pub mod lecturer;
pub mod payment;
pub mod program;
pub mod report;
pub mod session;
pub mod student;
pub mod user;

pub use attendance::{AttendanceError, AttendanceRepository, RecordAttendanceInput};
pub use certificate::{CertificateError, CertificateRepository, IssueCertificateInput};
pub use enrollment::{
    CreateEnrollmentInput, EnrollmentError, EnrollmentFilter, EnrollmentRepository,
};
pub use lecturer::{CreateLecturerInput, LecturerError, LecturerRepository, UpdateLecturerInput};
pub use payment::{
    CreatePaymentInput, PaymentError, PaymentMutation, PaymentRepository, UpdatePaymentInput,
};
pub use program::{CreateProgramInput, ProgramError, ProgramRepository, UpdateProgramInput};
pub use report::{ReportError, ReportFilter, ReportRepository};
pub use session::{SessionError, SessionRepository};
pub use student::{CreateStudentInput, StudentError, StudentRepository, UpdateStudentInput};
pub use user::{CreateUserInput, UserError, UserRepository};
