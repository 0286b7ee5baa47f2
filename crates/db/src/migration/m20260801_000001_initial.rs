//! Initial database migration.
//!
//! Creates all core tables, enums, triggers, and indexes.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: STAFF ACCOUNTS
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;

        // ============================================================
        // PART 3: CATALOG
        // ============================================================
        db.execute_unprepared(LECTURERS_SQL).await?;
        db.execute_unprepared(PROGRAMS_SQL).await?;

        // ============================================================
        // PART 4: STUDENTS & ENROLLMENTS
        // ============================================================
        db.execute_unprepared(STUDENTS_SQL).await?;
        db.execute_unprepared(ENROLLMENTS_SQL).await?;

        // ============================================================
        // PART 5: PAYMENTS
        // ============================================================
        db.execute_unprepared(PAYMENTS_SQL).await?;

        // ============================================================
        // PART 6: ATTENDANCE & CERTIFICATES
        // ============================================================
        db.execute_unprepared(ATTENDANCE_SQL).await?;
        db.execute_unprepared(CERTIFICATES_SQL).await?;

        // ============================================================
        // PART 7: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Staff roles
CREATE TYPE user_role AS ENUM (
    'admin',
    'registrar',
    'cashier'
);

-- Payment lifecycle status
CREATE TYPE payment_status AS ENUM (
    'pending',
    'completed',
    'refunded'
);

-- Enrollment settlement status (derived, written only by reconciliation)
CREATE TYPE balance_status AS ENUM (
    'pending',
    'partial',
    'paid'
);

-- Attendance outcome per review session
CREATE TYPE attendance_status AS ENUM (
    'present',
    'absent',
    'late',
    'excused'
);
";

const USERS_SQL: &str = r"
-- Staff accounts for the admin console
CREATE TABLE users (
    id UUID PRIMARY KEY,
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    full_name VARCHAR(255) NOT NULL,
    role user_role NOT NULL DEFAULT 'registrar',
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_email ON users(email);
";

const LECTURERS_SQL: &str = r"
-- Lecturer catalog
CREATE TABLE lecturers (
    id UUID PRIMARY KEY,
    full_name VARCHAR(255) NOT NULL,
    specialization VARCHAR(255),
    email VARCHAR(255),
    phone VARCHAR(32),
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const PROGRAMS_SQL: &str = r"
-- Review program catalog
CREATE TABLE programs (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    description TEXT,
    fee NUMERIC(12, 2) NOT NULL CHECK (fee >= 0),
    schedule VARCHAR(255),
    lecturer_id UUID REFERENCES lecturers(id) ON DELETE SET NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_programs_active ON programs(is_active);
";

const STUDENTS_SQL: &str = r"
-- Student records
CREATE TABLE students (
    id UUID PRIMARY KEY,
    first_name VARCHAR(255) NOT NULL,
    last_name VARCHAR(255) NOT NULL,
    middle_name VARCHAR(255),
    email VARCHAR(255),
    phone VARCHAR(32),
    address TEXT,
    school_of_origin VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_students_last_name ON students(last_name, first_name);
";

const ENROLLMENTS_SQL: &str = r"
-- Enrollments: aggregate root for payment tracking.
-- total_value / total_paid / remaining_balance / payment_status are
-- written only by the payment reconciliation pass.
CREATE TABLE enrollments (
    id UUID PRIMARY KEY,
    student_id UUID NOT NULL REFERENCES students(id) ON DELETE RESTRICT,
    program_id UUID NOT NULL REFERENCES programs(id) ON DELETE RESTRICT,
    total_value NUMERIC(12, 2) NOT NULL CHECK (total_value >= 0),
    total_paid NUMERIC(12, 2) NOT NULL DEFAULT 0 CHECK (total_paid >= 0),
    remaining_balance NUMERIC(12, 2) NOT NULL DEFAULT 0 CHECK (remaining_balance >= 0),
    payment_status balance_status NOT NULL DEFAULT 'pending',
    enrolled_on DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_enrollments_student ON enrollments(student_id);
CREATE INDEX idx_enrollments_program ON enrollments(program_id);
CREATE INDEX idx_enrollments_status ON enrollments(payment_status);
CREATE INDEX idx_enrollments_date ON enrollments(enrolled_on);
";

const PAYMENTS_SQL: &str = r"
-- Payment rows: the sole financial source of truth for an enrollment
CREATE TABLE payments (
    id UUID PRIMARY KEY,
    enrollment_id UUID NOT NULL REFERENCES enrollments(id) ON DELETE CASCADE,
    amount NUMERIC(12, 2) NOT NULL CHECK (amount > 0),
    status payment_status NOT NULL DEFAULT 'completed',
    promo_override NUMERIC(12, 2) CHECK (promo_override IS NULL OR promo_override > 0),
    method VARCHAR(64) NOT NULL DEFAULT 'cash',
    reference_number VARCHAR(128),
    received_by UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
    paid_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_payments_enrollment ON payments(enrollment_id, id);
CREATE INDEX idx_payments_status ON payments(status);
CREATE INDEX idx_payments_paid_at ON payments(paid_at);
";

const ATTENDANCE_SQL: &str = r"
-- Attendance per enrollment per session date
CREATE TABLE attendance_records (
    id UUID PRIMARY KEY,
    enrollment_id UUID NOT NULL REFERENCES enrollments(id) ON DELETE CASCADE,
    session_date DATE NOT NULL,
    status attendance_status NOT NULL,
    remarks TEXT,
    recorded_by UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_attendance_session UNIQUE (enrollment_id, session_date)
);

CREATE INDEX idx_attendance_enrollment ON attendance_records(enrollment_id, session_date);
";

const CERTIFICATES_SQL: &str = r"
-- Good moral certificates with per-year serial sequences
CREATE TABLE good_moral_certificates (
    id UUID PRIMARY KEY,
    student_id UUID NOT NULL REFERENCES students(id) ON DELETE RESTRICT,
    serial VARCHAR(32) NOT NULL UNIQUE,
    serial_year INTEGER NOT NULL,
    serial_sequence INTEGER NOT NULL CHECK (serial_sequence > 0),
    purpose TEXT NOT NULL,
    issued_by UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
    issued_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_certificates_serial_seq UNIQUE (serial_year, serial_sequence)
);

CREATE INDEX idx_certificates_student ON good_moral_certificates(student_id);
";

const TRIGGERS_SQL: &str = r"
-- Keep updated_at current on row updates
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_users_updated_at BEFORE UPDATE ON users
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_lecturers_updated_at BEFORE UPDATE ON lecturers
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_programs_updated_at BEFORE UPDATE ON programs
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_students_updated_at BEFORE UPDATE ON students
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_enrollments_updated_at BEFORE UPDATE ON enrollments
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_payments_updated_at BEFORE UPDATE ON payments
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
CREATE TRIGGER trg_attendance_updated_at BEFORE UPDATE ON attendance_records
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS good_moral_certificates CASCADE;
DROP TABLE IF EXISTS attendance_records CASCADE;
DROP TABLE IF EXISTS payments CASCADE;
DROP TABLE IF EXISTS enrollments CASCADE;
DROP TABLE IF EXISTS students CASCADE;
DROP TABLE IF EXISTS programs CASCADE;
DROP TABLE IF EXISTS lecturers CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP FUNCTION IF EXISTS set_updated_at CASCADE;
DROP TYPE IF EXISTS attendance_status CASCADE;
DROP TYPE IF EXISTS balance_status CASCADE;
DROP TYPE IF EXISTS payment_status CASCADE;
DROP TYPE IF EXISTS user_role CASCADE;
";
