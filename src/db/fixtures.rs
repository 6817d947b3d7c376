//! Seeded hospital database shared by tab and router tests.

use chrono::NaiveDate;
use tempfile::TempDir;

use super::sqlite::{open_database, SqliteSource};

/// Monday. Seed dates are relative to it.
pub(crate) fn seed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).expect("valid date")
}

const SEED_SQL: &str = "
INSERT INTO doctor_schedule VALUES
    (1, 1, 'Dr. Andi', 'Cardiology', 'Monday', '08:00:00', '12:00:00', 'R101'),
    (2, 2, 'Dr. Budi', 'Neurology', 'Monday', '13:00:00', '17:00:00', 'R102'),
    (3, 1, 'Dr. Andi', 'Cardiology', 'Wednesday', '08:00:00', '12:00:00', 'R101'),
    (4, 3, 'Dr. Citra', 'Pediatrics', 'Tuesday', '09:00:00', '11:30:00', 'R103');

INSERT INTO rooms VALUES
    ('R101', 'ICU', 2, 1),
    ('R102', 'ICU', 2, 0),
    ('R103', 'Ward', 4, 3),
    ('R104', 'Ward', 4, 0);

INSERT INTO patients VALUES
    (1, 'Siti', 'F', '2010-01-15', 'Jakarta', 'Insurance', 'BPJS', '2024-06-03'),
    (2, 'Agus', 'M', '1990-06-03', 'Bandung', 'Cash', NULL, '2024-05-20'),
    (3, 'Rina', 'F', '1970-12-01', 'Jakarta', 'Insurance', 'Prudential', '2024-06-03 09:15:00'),
    (4, 'Joko', 'M', '1950-03-10', 'Surabaya', 'Cash', NULL, '2024-01-02');

INSERT INTO pharmacy_stock VALUES
    (1, 'Paracetamol', 'Analgesic', 100, 40, '2024-05-01', '2025-01-01', 'Kimia Farma'),
    (2, 'Amoxicillin', 'Antibiotic', 10, 10, '2024-05-01', '2024-06-20', 'Kalbe'),
    (3, 'Ibuprofen', 'Analgesic', 8, 4, '2024-05-01', '2024-06-01', 'Kimia Farma'),
    (4, 'Cetirizine', 'Antihistamine', 5, 7, '2024-05-01', NULL, 'Sanbe');

INSERT INTO staff VALUES
    (1, 'Ani', 'Nurse', 'ICU', '2014-06-03', 'True'),
    (2, 'Bayu', 'Lab Technician', 'Laboratory', '2020-01-15', 'True'),
    (3, 'Cici', 'Nurse', 'Ward', '2018-03-01', 'False'),
    (4, 'Dedi', 'Admin', 'Front Office', '2022-09-10', 'True');

INSERT INTO lab_tests VALUES
    (1, 1, 'Blood', '2024-06-03', NULL, 'Pending', 2),
    (2, 2, 'Urine', '2024-06-01', '2024-06-02', 'Completed', 2),
    (3, 3, 'Blood', '2024-06-03', '2024-06-03', 'Completed', 5),
    (4, 99, 'X-Ray', '2024-05-28', NULL, 'Pending', 5);
";

/// A migrated database file with the seed rows, plus the directory that
/// owns it. Keep the `TempDir` alive for as long as the source is used.
pub(crate) fn seeded_source() -> (TempDir, SqliteSource) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("hospital.db");
    let conn = open_database(&path).expect("open database");
    conn.execute_batch(SEED_SQL).expect("seed database");
    drop(conn);
    (dir, SqliteSource::new(path))
}

/// A source whose database file does not exist.
pub(crate) fn missing_source() -> (TempDir, SqliteSource) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("absent.db");
    (dir, SqliteSource::new(path))
}
