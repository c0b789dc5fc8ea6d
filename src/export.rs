//! Dumps the timeline tables to CSV.

use duckdb::Connection;
use std::path::Path;

use crate::classify::Category;
use crate::error::Result;
use crate::util::sql_string;

/// Writes each category's timeline table to
/// `<output_dir>/vhi_timeline_<category>.csv`, header included, rows
/// ordered by (region, date) ascending. Existing files are overwritten.
///
/// One scoped connection per category: opened, used for the single COPY,
/// released on drop.
pub fn export_timelines(db_path: &Path, output_dir: &Path) -> Result<()> {
    for category in Category::ALL {
        let csv_path = output_dir.join(format!("vhi_timeline_{}.csv", category));

        let conn = Connection::open(db_path)?;
        conn.execute_batch(&format!(
            "COPY (
                 SELECT * FROM {table} ORDER BY region, date
             ) TO '{path}' (HEADER, DELIMITER ',');",
            table = category.table_name(),
            path = sql_string(&csv_path),
        ))?;

        println!("Saved {} timeline to {}", category, csv_path.display());
    }

    Ok(())
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn seed_database(db_path: &Path) {
        let conn = Connection::open(db_path).unwrap();
        // Inserted deliberately out of order; the export must sort.
        conn.execute_batch(
            "CREATE TABLE vegetation_timeline (
                 region INTEGER, date DATE, day_of_year INTEGER, vhi DOUBLE
             );
             INSERT INTO vegetation_timeline VALUES
                 (2, DATE '2024-01-01', 1, 0.4),
                 (1, DATE '2024-01-02', 2, 0.6),
                 (1, DATE '2024-01-01', 1, 0.5);

             CREATE TABLE forest_timeline (
                 region INTEGER, date DATE, day_of_year INTEGER, vhi DOUBLE
             );
             INSERT INTO forest_timeline VALUES
                 (3, DATE '2024-02-01', 32, 0.7);",
        )
        .unwrap();
    }

    #[test]
    fn should_export_sorted_csv_with_header() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("vhi.duckdb");
        seed_database(&db);

        export_timelines(&db, dir.path()).unwrap();

        let csv = fs::read_to_string(dir.path().join("vhi_timeline_vegetation.csv")).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "region,date,day_of_year,vhi");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("1,2024-01-01,"));
        assert!(lines[2].starts_with("1,2024-01-02,"));
        assert!(lines[3].starts_with("2,2024-01-01,"));

        let forest = fs::read_to_string(dir.path().join("vhi_timeline_forest.csv")).unwrap();
        assert_eq!(forest.lines().count(), 2);
    }

    #[test]
    fn should_round_trip_losslessly() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("vhi.duckdb");
        seed_database(&db);

        export_timelines(&db, dir.path()).unwrap();

        let csv_path = dir.path().join("vhi_timeline_vegetation.csv");
        let conn = Connection::open(&db).unwrap();
        let missing: i64 = conn
            .query_row(
                &format!(
                    "SELECT count(*) FROM (
                         SELECT * FROM vegetation_timeline
                         EXCEPT
                         SELECT region::INTEGER, date::DATE, day_of_year::INTEGER, vhi::DOUBLE
                         FROM read_csv_auto('{}', header = true)
                     )",
                    sql_string(&csv_path)
                ),
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(missing, 0);

        let extra: i64 = conn
            .query_row(
                &format!(
                    "SELECT count(*) FROM read_csv_auto('{}', header = true)",
                    sql_string(&csv_path)
                ),
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(extra, 3);
    }

    #[test]
    fn should_overwrite_an_existing_export() {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("vhi.duckdb");
        seed_database(&db);

        let csv_path = dir.path().join("vhi_timeline_forest.csv");
        fs::write(&csv_path, "stale contents").unwrap();

        export_timelines(&db, dir.path()).unwrap();

        let csv = fs::read_to_string(&csv_path).unwrap();
        assert!(csv.starts_with("region,date,day_of_year,vhi"));
    }
}
