//! Dataset loader.
//!
//! Reads the two tabular inputs (routes, stops) and materializes them as two
//! named tables in a local SQLite store, fully replacing any prior content.
//! Column names are passed through verbatim with no schema validation; the
//! stop snapshot used by the rest of the process is selected once after the
//! load completes.

pub mod error;

use std::path::Path;

use serde::Serialize;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};
use utoipa::ToSchema;

use crate::config::DatasetConfig;

pub use error::DatasetError;

/// Column names accepted for the stop latitude, in priority order.
/// The sample feed labels coordinates `Y`/`X`; GTFS-style exports use
/// `stop_lat`/`stop_lon`.
const LATITUDE_CANDIDATES: &[&str] = &["latitude", "lat", "stop_lat", "y"];
/// Column names accepted for the stop longitude, in priority order.
const LONGITUDE_CANDIDATES: &[&str] = &["longitude", "lon", "lng", "stop_lon", "x"];

/// A bus stop from the loaded `stops` table.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Stop {
    pub stop_id: String,
    pub stop_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Result of a startup load: per-table row counts plus the stop snapshot
/// shared by the map, the simulator, and the assistant for the rest of the
/// process.
#[derive(Debug)]
pub struct LoadedDatasets {
    pub route_rows: usize,
    pub stop_rows: usize,
    pub stops: Vec<Stop>,
}

/// Load both datasets into the SQLite store and return the stop snapshot.
///
/// The store connection lives only for the duration of this call; once the
/// snapshot is read the pool is closed and nothing else touches the database.
pub async fn load(config: &DatasetConfig) -> Result<LoadedDatasets, DatasetError> {
    if let Some(parent) = config.db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let db_url = format!("sqlite:{}?mode=rwc", config.db_path.display());
    let pool = SqlitePool::connect(&db_url).await?;

    let result = load_into(&pool, config).await;
    pool.close().await;
    result
}

async fn load_into(
    pool: &SqlitePool,
    config: &DatasetConfig,
) -> Result<LoadedDatasets, DatasetError> {
    let mut tx = pool.begin().await?;
    let route_rows = replace_table(&mut tx, "routes", &config.routes_csv).await?;
    let stop_rows = replace_table(&mut tx, "stops", &config.stops_csv).await?;
    // Commit both tables atomically; a failure above rolls everything back so
    // the store never holds a partial load.
    tx.commit().await?;

    let stops = stop_snapshot(pool).await?;
    info!(route_rows, stop_rows, "Loaded datasets into store");

    Ok(LoadedDatasets {
        route_rows,
        stop_rows,
        stops,
    })
}

/// Drop and recreate `table` from the delimited file at `path`.
///
/// Every header becomes a TEXT column, quoted verbatim. Returns the number of
/// rows inserted.
async fn replace_table(
    tx: &mut Transaction<'_, Sqlite>,
    table: &str,
    path: &Path,
) -> Result<usize, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::MissingInput(path.to_path_buf()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(DatasetError::NoColumns {
            table: table.to_string(),
        });
    }

    let quoted: Vec<String> = headers.iter().map(quote_ident).collect();
    let create_sql = format!(
        "CREATE TABLE {} ({})",
        quote_ident(table),
        quoted
            .iter()
            .map(|column| format!("{column} TEXT"))
            .collect::<Vec<_>>()
            .join(", ")
    );

    sqlx::query(&format!("DROP TABLE IF EXISTS {}", quote_ident(table)))
        .execute(&mut **tx)
        .await?;
    sqlx::query(&create_sql).execute(&mut **tx).await?;

    let insert_sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        quoted.join(", "),
        vec!["?"; headers.len()].join(", ")
    );

    let mut rows = 0usize;
    for result in reader.records() {
        let record = result?;
        let mut query = sqlx::query(&insert_sql);
        for field in record.iter() {
            query = query.bind(field.to_string());
        }
        query.execute(&mut **tx).await?;
        rows += 1;
    }

    debug!(table, rows, "Replaced table from CSV");
    Ok(rows)
}

/// Read the full stop list back out of the store.
///
/// Resolves the identifier, name, and coordinate columns case-insensitively
/// so that feeds labelling coordinates `Y`/`X` load the same as ones using
/// `latitude`/`longitude`.
async fn stop_snapshot(pool: &SqlitePool) -> Result<Vec<Stop>, DatasetError> {
    let columns: Vec<(String,)> =
        sqlx::query_as("SELECT name FROM pragma_table_info('stops')")
            .fetch_all(pool)
            .await?;
    let names: Vec<String> = columns.into_iter().map(|(name,)| name).collect();

    let stop_id_col =
        resolve_column(&names, &["stop_id"]).ok_or(DatasetError::MissingColumn("stop_id"))?;
    let stop_name_col =
        resolve_column(&names, &["stop_name"]).ok_or(DatasetError::MissingColumn("stop_name"))?;
    let lat_col = resolve_column(&names, LATITUDE_CANDIDATES)
        .ok_or(DatasetError::MissingColumn("latitude"))?;
    let lon_col = resolve_column(&names, LONGITUDE_CANDIDATES)
        .ok_or(DatasetError::MissingColumn("longitude"))?;

    let select_sql = format!(
        "SELECT {}, {}, {}, {} FROM stops",
        quote_ident(stop_id_col),
        quote_ident(stop_name_col),
        quote_ident(lat_col),
        quote_ident(lon_col)
    );
    let rows: Vec<(String, String, String, String)> =
        sqlx::query_as(&select_sql).fetch_all(pool).await?;

    let mut stops = Vec::with_capacity(rows.len());
    for (stop_id, stop_name, lat, lon) in rows {
        let latitude = parse_coordinate(&stop_id, &lat)?;
        let longitude = parse_coordinate(&stop_id, &lon)?;
        stops.push(Stop {
            stop_id,
            stop_name,
            latitude,
            longitude,
        });
    }

    debug!(
        sample = ?stops.iter().take(5).collect::<Vec<_>>(),
        "First stop records"
    );
    Ok(stops)
}

/// Find the first column in `names` matching one of `candidates`,
/// case-insensitively.
fn resolve_column<'a>(names: &'a [String], candidates: &[&str]) -> Option<&'a str> {
    for candidate in candidates {
        if let Some(name) = names.iter().find(|n| n.eq_ignore_ascii_case(candidate)) {
            return Some(name);
        }
    }
    None
}

fn parse_coordinate(stop_id: &str, value: &str) -> Result<f64, DatasetError> {
    value
        .trim()
        .parse()
        .map_err(|_| DatasetError::InvalidCoordinate {
            stop_id: stop_id.to_string(),
            value: value.to_string(),
        })
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatasetConfig;
    use std::fs;
    use std::path::PathBuf;

    fn test_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "bus-tracker-datasets-{tag}-{}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_config(dir: &Path, routes: &str, stops: &str) -> DatasetConfig {
        let routes_csv = dir.join("routes.csv");
        let stops_csv = dir.join("stops.csv");
        fs::write(&routes_csv, routes).unwrap();
        fs::write(&stops_csv, stops).unwrap();
        DatasetConfig {
            routes_csv,
            stops_csv,
            db_path: dir.join("test.db"),
        }
    }

    const ROUTES: &str = "route_id,route_name\n22,Bayview - Mondawmin\n26,Dundalk - Downtown\n";

    #[tokio::test]
    async fn load_reads_both_tables() {
        let dir = test_dir("load");
        let config = write_config(
            &dir,
            ROUTES,
            "stop_id,stop_name,Y,X\n1,Park Street,39.29,-76.61\n2,Main Ave,39.30,-76.62\n",
        );

        let loaded = load(&config).await.unwrap();
        assert_eq!(loaded.route_rows, 2);
        assert_eq!(loaded.stop_rows, 2);
        assert_eq!(loaded.stops.len(), 2);
        assert_eq!(loaded.stops[0].stop_name, "Park Street");
        assert!((loaded.stops[0].latitude - 39.29).abs() < 1e-9);
        assert!((loaded.stops[0].longitude + 76.61).abs() < 1e-9);
    }

    #[tokio::test]
    async fn reload_fully_replaces_rows() {
        let dir = test_dir("reload");
        let config = write_config(
            &dir,
            ROUTES,
            "stop_id,stop_name,Y,X\n1,Park Street,39.29,-76.61\n2,Main Ave,39.30,-76.62\n3,Harbor East,39.28,-76.60\n",
        );
        let first = load(&config).await.unwrap();
        assert_eq!(first.stops.len(), 3);

        // Second load with a different file: only the second file's rows
        // survive, nothing accumulates.
        let config = write_config(
            &dir,
            ROUTES,
            "stop_id,stop_name,latitude,longitude\n9,Fells Point,39.282,-76.593\n",
        );
        let second = load(&config).await.unwrap();
        assert_eq!(second.stops.len(), 1);
        assert_eq!(second.stops[0].stop_id, "9");
        assert_eq!(second.stops[0].stop_name, "Fells Point");
    }

    #[tokio::test]
    async fn missing_input_fails_fast() {
        let dir = test_dir("missing");
        let mut config = write_config(&dir, ROUTES, "stop_id,stop_name,Y,X\n");
        config.stops_csv = dir.join("does-not-exist.csv");

        let err = load(&config).await.unwrap_err();
        assert!(matches!(err, DatasetError::MissingInput(_)));
    }

    #[tokio::test]
    async fn malformed_csv_fails_fast() {
        let dir = test_dir("malformed");
        // Second record has the wrong number of fields.
        let config = write_config(
            &dir,
            ROUTES,
            "stop_id,stop_name,Y,X\n1,Park Street,39.29,-76.61\n2,Main Ave,39.30\n",
        );

        let err = load(&config).await.unwrap_err();
        assert!(matches!(err, DatasetError::CsvError(_)));
    }

    #[tokio::test]
    async fn non_numeric_coordinate_fails_fast() {
        let dir = test_dir("coord");
        let config = write_config(
            &dir,
            ROUTES,
            "stop_id,stop_name,Y,X\n1,Park Street,not-a-number,-76.61\n",
        );

        let err = load(&config).await.unwrap_err();
        assert!(matches!(err, DatasetError::InvalidCoordinate { .. }));
    }

    #[tokio::test]
    async fn stops_without_resolvable_coordinates_fail() {
        let dir = test_dir("columns");
        let config = write_config(&dir, ROUTES, "stop_id,stop_name\n1,Park Street\n");

        let err = load(&config).await.unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn("latitude")));
    }

    #[test]
    fn resolve_column_is_case_insensitive_and_ordered() {
        let names: Vec<String> = ["stop_id", "stop_name", "Y", "X"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(resolve_column(&names, LATITUDE_CANDIDATES), Some("Y"));
        assert_eq!(resolve_column(&names, LONGITUDE_CANDIDATES), Some("X"));

        let names: Vec<String> = ["stop_id", "Latitude", "lat"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        // "latitude" outranks "lat" in the candidate list.
        assert_eq!(resolve_column(&names, LATITUDE_CANDIDATES), Some("Latitude"));
        assert_eq!(resolve_column(&names, &["missing"]), None);
    }

    #[test]
    fn quote_ident_escapes_quotes() {
        assert_eq!(quote_ident("plain"), "\"plain\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
