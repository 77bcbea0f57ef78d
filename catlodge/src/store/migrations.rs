//! Store schema management and migrations.

use rusqlite::Connection;

use crate::error::{Error, Result};

use super::schema::{
    CREATE_ANIMALS_TABLE, CREATE_ASSIGNMENTS_TABLE, CREATE_ASSIGNMENTS_UNIT_INDEX,
    CREATE_CATEGORIES_TABLE, CREATE_METADATA_TABLE, CREATE_PRICING_CONFIG_TABLE,
    CREATE_RESERVATIONS_STATUS_INDEX, CREATE_RESERVATIONS_TABLE,
    CREATE_RESERVATION_ADDONS_TABLE, CREATE_RESERVATION_ANIMALS_INDEX,
    CREATE_RESERVATION_ANIMALS_TABLE, CREATE_SERVICES_TABLE, CREATE_UNITS_CATEGORY_INDEX,
    CREATE_UNITS_TABLE, CURRENT_SCHEMA_VERSION, INSERT_SCHEMA_VERSION, SELECT_SCHEMA_VERSION,
};

/// Initializes the store schema on a fresh database.
///
/// # Errors
///
/// Returns an error if any SQL statement fails to execute.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_METADATA_TABLE, [])?;
    conn.execute(CREATE_CATEGORIES_TABLE, [])?;
    conn.execute(CREATE_UNITS_TABLE, [])?;
    conn.execute(CREATE_ANIMALS_TABLE, [])?;
    conn.execute(CREATE_SERVICES_TABLE, [])?;
    conn.execute(CREATE_RESERVATIONS_TABLE, [])?;
    conn.execute(CREATE_RESERVATION_ANIMALS_TABLE, [])?;
    conn.execute(CREATE_RESERVATION_ADDONS_TABLE, [])?;
    conn.execute(CREATE_ASSIGNMENTS_TABLE, [])?;
    conn.execute(CREATE_PRICING_CONFIG_TABLE, [])?;

    conn.execute(CREATE_RESERVATION_ANIMALS_INDEX, [])?;
    conn.execute(CREATE_UNITS_CATEGORY_INDEX, [])?;
    conn.execute(CREATE_ASSIGNMENTS_UNIT_INDEX, [])?;
    conn.execute(CREATE_RESERVATIONS_STATUS_INDEX, [])?;

    conn.execute(INSERT_SCHEMA_VERSION, [CURRENT_SCHEMA_VERSION])?;

    Ok(())
}

/// Gets the schema version stored in the database; 0 means uninitialized.
///
/// # Errors
///
/// Returns an error for database failures other than a missing metadata
/// table or row.
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    match conn.query_row(SELECT_SCHEMA_VERSION, [], |row| {
        let value: String = row.get(0)?;
        value
            .parse::<i32>()
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
    }) {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => {
            if let rusqlite::Error::SqliteFailure(ref sqlite_err, _) = e {
                if sqlite_err.code == rusqlite::ErrorCode::Unknown {
                    // Metadata table doesn't exist yet.
                    return Ok(0);
                }
            }
            Err(e.into())
        }
    }
}

/// Checks schema compatibility, initializing a fresh database.
///
/// # Errors
///
/// Returns [`Error::UnsupportedSchemaVersion`] when the stored version
/// differs from what this build understands.
pub fn check_schema_compatibility(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;

    if version == 0 {
        initialize_schema(conn)?;
    } else if version != CURRENT_SCHEMA_VERSION {
        #[allow(clippy::cast_sign_loss)]
        return Err(Error::UnsupportedSchemaVersion {
            expected: CURRENT_SCHEMA_VERSION as u32,
            found: version as u32,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_connection() -> Connection {
        Connection::open_in_memory().unwrap()
    }

    #[test]
    fn test_initialize_schema() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);

        let count: i32 = conn
            .query_row("SELECT COUNT(*) FROM reservations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_get_schema_version_uninitialized() {
        let conn = create_test_connection();
        assert_eq!(get_schema_version(&conn).unwrap(), 0);
    }

    #[test]
    fn test_check_schema_compatibility_initializes_fresh() {
        let conn = create_test_connection();
        check_schema_compatibility(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_check_schema_compatibility_rejects_mismatch() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();

        conn.execute(
            "UPDATE metadata SET value = '999' WHERE key = 'schema_version'",
            [],
        )
        .unwrap();

        let result = check_schema_compatibility(&conn);
        assert!(matches!(
            result.unwrap_err(),
            Error::UnsupportedSchemaVersion {
                found: 999,
                ..
            }
        ));
    }

    #[test]
    fn test_schema_creates_indices() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();

        let index_count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name LIKE 'idx_%'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(index_count, 4);
    }

    #[test]
    fn test_pricing_config_slot_constraint() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO pricing_config (slot, version, payload, updated_at) VALUES (1, 1, '{}', 0)",
            [],
        )
        .unwrap();

        // A second slot is rejected by the CHECK constraint.
        let result = conn.execute(
            "INSERT INTO pricing_config (slot, version, payload, updated_at) VALUES (2, 1, '{}', 0)",
            [],
        );
        assert!(result.is_err());
    }
}
