//! Store schema definitions and SQL constants.
//!
//! All table definitions, indices, and schema-version constants for the
//! boarding engine's `SQLite` store live here.

/// Current schema version for the store.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// SQL statement to create the metadata table.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to create the accommodation categories table.
///
/// Money columns are stored as canonical decimal strings to avoid float
/// rounding in the database layer.
pub const CREATE_CATEGORIES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        nightly_rate TEXT NOT NULL,
        unit_capacity INTEGER NOT NULL,
        active INTEGER NOT NULL DEFAULT 1
    )";

/// SQL statement to create the physical units table.
pub const CREATE_UNITS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS units (
        id INTEGER PRIMARY KEY,
        category_id INTEGER NOT NULL REFERENCES categories(id),
        label TEXT,
        capacity INTEGER NOT NULL,
        active INTEGER NOT NULL DEFAULT 1
    )";

/// SQL statement to create the animals table.
pub const CREATE_ANIMALS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS animals (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        customer_id INTEGER
    )";

/// SQL statement to create the boarding services table.
pub const CREATE_SERVICES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS services (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        price TEXT NOT NULL,
        active INTEGER NOT NULL DEFAULT 1
    )";

/// SQL statement to create the reservations table.
///
/// Dates are ISO `YYYY-MM-DD` strings; the check-out date is exclusive.
pub const CREATE_RESERVATIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        code TEXT UNIQUE,
        category_id INTEGER NOT NULL REFERENCES categories(id),
        check_in TEXT NOT NULL,
        check_out TEXT NOT NULL,
        status TEXT NOT NULL,
        customer_id INTEGER,
        allow_sharing INTEGER NOT NULL,
        special_requests TEXT,
        total TEXT NOT NULL,
        created_at INTEGER NOT NULL
    )";

/// SQL statement to create the reservation-to-animal join table.
pub const CREATE_RESERVATION_ANIMALS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservation_animals (
        reservation_id INTEGER NOT NULL REFERENCES reservations(id),
        animal_id INTEGER NOT NULL REFERENCES animals(id),
        PRIMARY KEY (reservation_id, animal_id)
    )";

/// SQL statement to create the add-on lines table.
pub const CREATE_RESERVATION_ADDONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservation_addons (
        reservation_id INTEGER NOT NULL REFERENCES reservations(id),
        service_id INTEGER NOT NULL REFERENCES services(id),
        quantity INTEGER NOT NULL,
        unit_price TEXT NOT NULL
    )";

/// SQL statement to create the unit assignments table.
///
/// One assignment per reservation; `locked_at` is set at check-in and
/// never changes afterwards.
pub const CREATE_ASSIGNMENTS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS unit_assignments (
        reservation_id INTEGER PRIMARY KEY REFERENCES reservations(id),
        unit_id INTEGER NOT NULL REFERENCES units(id),
        animal_count INTEGER NOT NULL,
        locked_at INTEGER
    )";

/// SQL statement to create the pricing configuration slot.
///
/// The CHECK constraint makes the active snapshot a single row by
/// construction; `version` carries the optimistic stamp for admin updates.
pub const CREATE_PRICING_CONFIG_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS pricing_config (
        slot INTEGER PRIMARY KEY CHECK (slot = 1),
        version INTEGER NOT NULL,
        payload TEXT NOT NULL,
        updated_at INTEGER NOT NULL
    )";

/// Index speeding up the per-animal conflict scan.
pub const CREATE_RESERVATION_ANIMALS_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_reservation_animals_animal
    ON reservation_animals(animal_id)";

/// Index speeding up per-category availability queries.
pub const CREATE_UNITS_CATEGORY_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_units_category ON units(category_id)";

/// Index speeding up assignment lookups by unit.
pub const CREATE_ASSIGNMENTS_UNIT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_assignments_unit ON unit_assignments(unit_id)";

/// Index speeding up reservation listings by status.
pub const CREATE_RESERVATIONS_STATUS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_status ON reservations(status)";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";
