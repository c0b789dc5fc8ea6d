//! Rebuilds the per-category timeline tables from the cached Parquet files.

use duckdb::Connection;
use std::path::Path;

use crate::classify::Category;
use crate::error::Result;
use crate::util::sql_string;

/// Drops and recreates every category's timeline table, aggregating all
/// Parquet files under `<output_dir>/<category>/` into per-region daily
/// averages.
///
/// Rows with `availability_percentage` at or below 20 are excluded before
/// averaging. The rebuild is not incremental, and an unreadable file fails
/// the whole run: the per-category glob is ingested as one statement.
pub fn build_timelines(output_dir: &Path, db_path: &Path) -> Result<()> {
    let conn = Connection::open(db_path)?;

    for category in Category::ALL {
        let pattern = output_dir.join(category.as_str()).join("*.parquet");
        let table = category.table_name();

        conn.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table};
             CREATE TABLE {table} (
                 region INTEGER,
                 date DATE,
                 day_of_year INTEGER,
                 vhi DOUBLE
             );

             INSERT INTO {table}
             SELECT
                 REGION_NR AS region,
                 date::DATE AS date,
                 EXTRACT(DOY FROM date::DATE) AS day_of_year,
                 AVG(vhi_mean) AS vhi
             FROM read_parquet('{pattern}')
             WHERE availability_percentage > 20
             GROUP BY REGION_NR, date
             ORDER BY region, date;",
            table = table,
            pattern = sql_string(&pattern),
        ))?;

        println!("Processed {} timeline data", category);
    }

    Ok(())
}

// -- Tests -------------------------------------------------------------------
