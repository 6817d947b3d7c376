//! Delimited-text export of a (typically filtered) table.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{Entity, ExportFormat, Table};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV writer error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Serialize `table`: header of column names in order, then one record per
/// row. Nulls are written as empty fields.
pub fn export(table: &Table, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(format.delimiter())
        .from_writer(Vec::new());

    writer.write_record(table.column_names())?;
    for row in table.rows() {
        writer.write_record(row.cells().iter().map(ToString::to_string))?;
    }
    writer.flush()?;

    writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

pub fn export_string(table: &Table, format: ExportFormat) -> Result<String, ExportError> {
    Ok(String::from_utf8(export(table, format)?)?)
}

/// `<stem>_<YYYYMMDD>.<ext>`, e.g. `lab_tests_20240115.csv`.
pub fn export_filename(entity: Entity, format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "{}_{}.{}",
        entity.export_stem(),
        date.format("%Y%m%d"),
        format.as_str()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{parse_delimited, RawTable};
    use crate::models::{Column, Value};
    use crate::pipeline::loader::conform;
    use chrono::NaiveTime;

    fn schedules() -> Table {
        let t = |h, m| Value::Time(NaiveTime::from_hms_opt(h, m, 0).unwrap());
        Table::with_rows(
            Entity::DoctorSchedule.columns(),
            vec![
                vec![
                    1.into(),
                    7.into(),
                    "Dr. Andi, Sp.JP".into(),
                    "Cardiology".into(),
                    "Monday".into(),
                    t(8, 0),
                    t(12, 30),
                    "R1".into(),
                    4.5.into(),
                ],
                vec![
                    2.into(),
                    8.into(),
                    "Dr. \"Budi\"".into(),
                    Value::Null,
                    "Tuesday".into(),
                    t(22, 0),
                    t(2, 0),
                    "R2".into(),
                    (-20.0).into(),
                ],
            ],
        )
    }

    #[test]
    fn csv_has_header_and_empty_nulls() {
        let text = export_string(&schedules(), ExportFormat::Csv).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "schedule_id,doctor_id,name,specialization,schedule_day,start_time,end_time,room_id,duration_hours"
        );
        assert_eq!(
            lines.next().unwrap(),
            "1,7,\"Dr. Andi, Sp.JP\",Cardiology,Monday,08:00:00,12:30:00,R1,4.5"
        );
        assert!(lines.next().unwrap().contains(",,Tuesday,"));
    }

    #[test]
    fn empty_table_exports_header_only() {
        let text = export_string(&Entity::Room.empty_table(), ExportFormat::Csv).unwrap();
        assert_eq!(text, "room_id,room_type,capacity,current_occupancy,occupied\n");
    }

    #[test]
    fn booleans_render_as_words() {
        let table = Table::with_rows(
            vec![Column::int("staff_id"), Column::bool("active")],
            vec![vec![1.into(), true.into()], vec![2.into(), false.into()]],
        );
        let text = export_string(&table, ExportFormat::Tsv).unwrap();
        assert_eq!(text, "staff_id\tactive\n1\tTrue\n2\tFalse\n");
    }

    #[test]
    fn export_round_trips_through_parser() {
        let mut rows: Vec<Vec<Value>> = schedules().rows().map(|r| r.cells().to_vec()).collect();
        let mut blank = rows[0].clone();
        blank[0] = 3.into();
        blank[2] = "".into();
        blank[7] = "   ".into();
        rows.push(blank);
        let raw = RawTable {
            columns: schedules().column_names().iter().map(|c| c.to_string()).collect(),
            rows,
        };
        let (original, _) = conform(&raw, schedules().columns());
        assert_eq!(original.row(2).unwrap().get("name"), Some(&Value::Null));

        for format in [ExportFormat::Csv, ExportFormat::Tsv] {
            let bytes = export(&original, format).unwrap();
            let raw = parse_delimited(bytes.as_slice(), format.delimiter()).unwrap();
            let (parsed, missing) = conform(&raw, original.columns());
            assert!(missing.is_empty());
            assert_eq!(parsed, original);
        }
    }

    #[test]
    fn filename_uses_stem_and_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(
            export_filename(Entity::PharmacyStock, ExportFormat::Csv, date),
            "pharmacy_data_20240105.csv"
        );
        assert_eq!(
            export_filename(Entity::LabTest, ExportFormat::Tsv, date),
            "lab_tests_20240105.tsv"
        );
    }
}
