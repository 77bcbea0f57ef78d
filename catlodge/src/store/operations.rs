//! Store CRUD operations and snapshot loaders.
//!
//! Catalog and reservation queries live here, together with the
//! transaction-scoped helpers the plan executor uses. Snapshot loaders
//! materialize the plain read models the pure scheduling core consumes.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use rust_decimal::Decimal;

use crate::assignment::UnitAssignment;
use crate::category::{AccommodationCategory, CategoryId, Unit, UnitId};
use crate::error::{Error, Result};
use crate::pricing::{PricingConfig, PricingConfigData};
use crate::reservation::{
    AddonLine, Animal, AnimalId, BoardingService, CustomerId, Reservation, ReservationCode,
    ReservationDraft, ReservationId, ReservationStatus, ServiceId,
};
use crate::scheduling::{AnimalBookings, AssignmentWindow, BookingWindow, CategorySnapshot};
use crate::stay::StayRange;

use super::connection::Store;

fn conversion_err(e: impl std::error::Error + Send + Sync + 'static) -> rusqlite::Error {
    rusqlite::Error::ToSqlConversionFailure(Box::new(e))
}

fn parse_decimal(text: &str) -> rusqlite::Result<Decimal> {
    text.parse::<Decimal>().map_err(conversion_err)
}

fn parse_date(text: &str) -> rusqlite::Result<NaiveDate> {
    text.parse::<NaiveDate>().map_err(conversion_err)
}

fn parse_status(text: &str) -> rusqlite::Result<ReservationStatus> {
    ReservationStatus::parse(text).map_err(conversion_err)
}

fn parse_stay(check_in: &str, check_out: &str) -> rusqlite::Result<StayRange> {
    StayRange::new(parse_date(check_in)?, parse_date(check_out)?).map_err(conversion_err)
}

fn datetime_from_secs(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::UNIX_EPOCH)
}

fn row_to_category(row: &rusqlite::Row<'_>) -> rusqlite::Result<AccommodationCategory> {
    let rate: String = row.get(2)?;
    Ok(AccommodationCategory {
        id: CategoryId::new(row.get(0)?),
        name: row.get(1)?,
        nightly_rate: parse_decimal(&rate)?,
        unit_capacity: row.get(3)?,
        active: row.get(4)?,
    })
}

fn row_to_unit(row: &rusqlite::Row<'_>) -> rusqlite::Result<Unit> {
    Ok(Unit {
        id: UnitId::new(row.get(0)?),
        category_id: CategoryId::new(row.get(1)?),
        label: row.get(2)?,
        capacity: row.get(3)?,
        active: row.get(4)?,
    })
}

fn row_to_service(row: &rusqlite::Row<'_>) -> rusqlite::Result<BoardingService> {
    let price: String = row.get(2)?;
    Ok(BoardingService {
        id: ServiceId::new(row.get(0)?),
        name: row.get(1)?,
        price: parse_decimal(&price)?,
        active: row.get(3)?,
    })
}

/// Main-row image of a reservation, before animals and add-ons are
/// attached.
struct ReservationRow {
    id: i64,
    code: Option<String>,
    category_id: i64,
    stay: StayRange,
    status: ReservationStatus,
    customer_id: Option<i64>,
    allow_sharing: bool,
    special_requests: Option<String>,
    total: Decimal,
    created_at: i64,
}

fn row_to_reservation_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ReservationRow> {
    let check_in: String = row.get(3)?;
    let check_out: String = row.get(4)?;
    let status: String = row.get(5)?;
    let total: String = row.get(9)?;
    Ok(ReservationRow {
        id: row.get(0)?,
        code: row.get(1)?,
        category_id: row.get(2)?,
        stay: parse_stay(&check_in, &check_out)?,
        status: parse_status(&status)?,
        customer_id: row.get(6)?,
        allow_sharing: row.get(7)?,
        special_requests: row.get(8)?,
        total: parse_decimal(&total)?,
        created_at: row.get(10)?,
    })
}

const SELECT_RESERVATION_COLUMNS: &str = r"
    SELECT id, code, category_id, check_in, check_out, status, customer_id,
           allow_sharing, special_requests, total, created_at
    FROM reservations
";

const SELECT_ANIMAL_BOOKINGS: &str = r"
    SELECT r.id, r.code, r.check_in, r.check_out, r.status
    FROM reservations r
    JOIN reservation_animals ra ON ra.reservation_id = r.id
    WHERE ra.animal_id = ?
";

const SELECT_CATEGORY_ASSIGNMENTS: &str = r"
    SELECT ua.unit_id, ua.reservation_id, ua.animal_count,
           r.check_in, r.check_out, r.status
    FROM unit_assignments ua
    JOIN reservations r ON r.id = ua.reservation_id
    JOIN units u ON u.id = ua.unit_id
    WHERE u.category_id = ? AND r.check_out > ? AND r.check_in < ?
";

const SELECT_UNIT_OCCUPANCY: &str = r"
    SELECT ua.animal_count, r.check_in, r.check_out, r.status
    FROM unit_assignments ua
    JOIN reservations r ON r.id = ua.reservation_id
    WHERE ua.unit_id = ? AND r.check_out > ? AND r.check_in < ?
";

impl Store {
    // --- catalog -----------------------------------------------------

    /// Creates an accommodation category.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (e.g. duplicate name).
    pub fn create_category(
        &mut self,
        name: &str,
        nightly_rate: Decimal,
        unit_capacity: u32,
    ) -> Result<AccommodationCategory> {
        self.conn.execute(
            "INSERT INTO categories (name, nightly_rate, unit_capacity, active) VALUES (?, ?, ?, 1)",
            params![name, nightly_rate.to_string(), unit_capacity],
        )?;
        let id = CategoryId::new(self.conn.last_insert_rowid());
        Ok(AccommodationCategory {
            id,
            name: name.to_string(),
            nightly_rate,
            unit_capacity,
            active: true,
        })
    }

    /// Fetches a category by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_category(&self, id: CategoryId) -> Result<Option<AccommodationCategory>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, name, nightly_rate, unit_capacity, active FROM categories WHERE id = ?",
                [id.value()],
                row_to_category,
            )
            .optional()?)
    }

    /// Lists all categories, ascending by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_categories(&self) -> Result<Vec<AccommodationCategory>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, nightly_rate, unit_capacity, active FROM categories ORDER BY id",
        )?;
        let rows = stmt.query_map([], row_to_category)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Sets a category's active flag. Returns `false` when no such
    /// category exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn set_category_active(&mut self, id: CategoryId, active: bool) -> Result<bool> {
        let rows = self.conn.execute(
            "UPDATE categories SET active = ? WHERE id = ?",
            params![active, id.value()],
        )?;
        Ok(rows > 0)
    }

    /// Creates a physical unit under a category.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RoomTypeNotFound`] if the category does not exist.
    pub fn create_unit(
        &mut self,
        category_id: CategoryId,
        label: Option<&str>,
        capacity: u32,
    ) -> Result<Unit> {
        if self.get_category(category_id)?.is_none() {
            return Err(Error::RoomTypeNotFound {
                category: category_id,
            });
        }
        self.conn.execute(
            "INSERT INTO units (category_id, label, capacity, active) VALUES (?, ?, ?, 1)",
            params![category_id.value(), label, capacity],
        )?;
        Ok(Unit {
            id: UnitId::new(self.conn.last_insert_rowid()),
            category_id,
            label: label.map(ToString::to_string),
            capacity,
            active: true,
        })
    }

    /// Lists the units of a category, ascending by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_units(&self, category_id: CategoryId) -> Result<Vec<Unit>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, category_id, label, capacity, active FROM units WHERE category_id = ? ORDER BY id",
        )?;
        let rows = stmt.query_map([category_id.value()], row_to_unit)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Sets a unit's active flag. Returns `false` when no such unit exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn set_unit_active(&mut self, id: UnitId, active: bool) -> Result<bool> {
        let rows = self.conn.execute(
            "UPDATE units SET active = ? WHERE id = ?",
            params![active, id.value()],
        )?;
        Ok(rows > 0)
    }

    /// Registers an animal.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_animal(&mut self, name: &str, customer_id: Option<CustomerId>) -> Result<Animal> {
        self.conn.execute(
            "INSERT INTO animals (name, customer_id) VALUES (?, ?)",
            params![name, customer_id.map(CustomerId::value)],
        )?;
        Ok(Animal {
            id: AnimalId::new(self.conn.last_insert_rowid()),
            name: name.to_string(),
            customer_id,
        })
    }

    /// Resolves a set of animal ids, failing when any is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CatsNotFound`] listing every unknown id.
    pub fn get_animals(&self, ids: &[AnimalId]) -> Result<Vec<Animal>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, customer_id FROM animals WHERE id = ?")?;
        let mut found = Vec::with_capacity(ids.len());
        let mut missing = Vec::new();
        for &id in ids {
            let animal = stmt
                .query_row([id.value()], |row| {
                    Ok(Animal {
                        id: AnimalId::new(row.get(0)?),
                        name: row.get(1)?,
                        customer_id: row.get::<_, Option<i64>>(2)?.map(CustomerId::new),
                    })
                })
                .optional()?;
            match animal {
                Some(animal) => found.push(animal),
                None => missing.push(id),
            }
        }
        if missing.is_empty() {
            Ok(found)
        } else {
            Err(Error::CatsNotFound { missing })
        }
    }

    /// Creates a boarding add-on service.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (e.g. duplicate name).
    pub fn create_service(&mut self, name: &str, price: Decimal) -> Result<BoardingService> {
        self.conn.execute(
            "INSERT INTO services (name, price, active) VALUES (?, ?, 1)",
            params![name, price.to_string()],
        )?;
        Ok(BoardingService {
            id: ServiceId::new(self.conn.last_insert_rowid()),
            name: name.to_string(),
            price,
            active: true,
        })
    }

    /// Fetches a service by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_service(&self, id: ServiceId) -> Result<Option<BoardingService>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, name, price, active FROM services WHERE id = ?",
                [id.value()],
                row_to_service,
            )
            .optional()?)
    }

    /// Lists all services, ascending by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_services(&self) -> Result<Vec<BoardingService>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, price, active FROM services ORDER BY id")?;
        let rows = stmt.query_map([], row_to_service)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    // --- reservations ------------------------------------------------

    /// Fetches a reservation by id, with its animals and add-on lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_reservation(&self, id: ReservationId) -> Result<Option<Reservation>> {
        let sql = format!("{SELECT_RESERVATION_COLUMNS} WHERE id = ?");
        let row = self
            .conn
            .query_row(&sql, [id.value()], row_to_reservation_row)
            .optional()?;
        row.map(|row| Self::attach_details(&self.conn, row)).transpose()
    }

    /// Fetches a reservation by its human-facing code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_reservation_by_code(&self, code: &str) -> Result<Option<Reservation>> {
        let sql = format!("{SELECT_RESERVATION_COLUMNS} WHERE code = ?");
        let row = self
            .conn
            .query_row(&sql, [code], row_to_reservation_row)
            .optional()?;
        row.map(|row| Self::attach_details(&self.conn, row)).transpose()
    }

    /// Lists reservations, optionally filtered by status, ascending by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_reservations(
        &self,
        status: Option<ReservationStatus>,
    ) -> Result<Vec<Reservation>> {
        let rows = match status {
            Some(status) => {
                let sql = format!("{SELECT_RESERVATION_COLUMNS} WHERE status = ? ORDER BY id");
                let mut stmt = self.conn.prepare(&sql)?;
                let mapped = stmt.query_map([status.as_str()], row_to_reservation_row)?;
                mapped.collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let sql = format!("{SELECT_RESERVATION_COLUMNS} ORDER BY id");
                let mut stmt = self.conn.prepare(&sql)?;
                let mapped = stmt.query_map([], row_to_reservation_row)?;
                mapped.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };
        rows.into_iter()
            .map(|row| Self::attach_details(&self.conn, row))
            .collect()
    }

    /// Fetches the unit assignment of a reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_assignment(&self, id: ReservationId) -> Result<Option<UnitAssignment>> {
        Ok(self
            .conn
            .query_row(
                "SELECT reservation_id, unit_id, animal_count, locked_at FROM unit_assignments WHERE reservation_id = ?",
                [id.value()],
                |row| {
                    Ok(UnitAssignment {
                        reservation_id: ReservationId::new(row.get(0)?),
                        unit_id: UnitId::new(row.get(1)?),
                        animal_count: row.get(2)?,
                        locked_at: row.get::<_, Option<i64>>(3)?.map(datetime_from_secs),
                    })
                },
            )
            .optional()?)
    }

    fn attach_details(conn: &Connection, row: ReservationRow) -> Result<Reservation> {
        let mut stmt = conn.prepare(
            "SELECT animal_id FROM reservation_animals WHERE reservation_id = ? ORDER BY animal_id",
        )?;
        let animal_ids = stmt
            .query_map([row.id], |r| r.get::<_, i64>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?
            .into_iter()
            .map(AnimalId::new)
            .collect();

        let mut stmt = conn.prepare(
            "SELECT service_id, quantity, unit_price FROM reservation_addons WHERE reservation_id = ?",
        )?;
        let addons = stmt
            .query_map([row.id], |r| {
                let price: String = r.get(2)?;
                Ok(AddonLine {
                    service_id: ServiceId::new(r.get(0)?),
                    quantity: r.get(1)?,
                    unit_price: parse_decimal(&price)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let id = ReservationId::new(row.id);
        Ok(Reservation {
            id,
            code: row
                .code
                .map_or_else(|| ReservationCode::from_id(id), ReservationCode::from_string),
            category_id: CategoryId::new(row.category_id),
            stay: row.stay,
            status: row.status,
            customer_id: row.customer_id.map(CustomerId::new),
            allow_sharing: row.allow_sharing,
            animal_ids,
            addons,
            special_requests: row.special_requests,
            total: row.total,
            created_at: datetime_from_secs(row.created_at),
        })
    }

    // --- snapshots ---------------------------------------------------

    /// Materializes the category snapshot the resolver and allocator
    /// consume: the category, all of its units, and every assignment whose
    /// reservation overlaps the window (any status; the pure core filters).
    ///
    /// # Errors
    ///
    /// Returns [`Error::RoomTypeNotFound`] for an unknown category.
    pub fn load_category_snapshot(
        &self,
        category_id: CategoryId,
        stay: &StayRange,
    ) -> Result<CategorySnapshot> {
        let category = self
            .get_category(category_id)?
            .ok_or(Error::RoomTypeNotFound {
                category: category_id,
            })?;
        let units = self.list_units(category_id)?;

        let mut stmt = self.conn.prepare(SELECT_CATEGORY_ASSIGNMENTS)?;
        let assignments = stmt
            .query_map(
                params![
                    category_id.value(),
                    stay.check_in().to_string(),
                    stay.check_out().to_string(),
                ],
                |row| {
                    let check_in: String = row.get(3)?;
                    let check_out: String = row.get(4)?;
                    let status: String = row.get(5)?;
                    Ok(AssignmentWindow {
                        unit_id: UnitId::new(row.get(0)?),
                        reservation_id: ReservationId::new(row.get(1)?),
                        animal_count: row.get(2)?,
                        stay: parse_stay(&check_in, &check_out)?,
                        status: parse_status(&status)?,
                    })
                },
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(CategorySnapshot {
            category,
            units,
            assignments,
        })
    }

    /// Materializes the per-animal booking index the conflict detector
    /// consumes. Every requested animal must exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CatsNotFound`] listing every unknown id.
    pub fn load_animal_bookings(&self, animal_ids: &[AnimalId]) -> Result<AnimalBookings> {
        let animals = self.get_animals(animal_ids)?;

        let mut bookings = AnimalBookings::new();
        for animal in &animals {
            bookings.register(animal.id, animal.name.clone());
        }

        let mut stmt = self.conn.prepare(SELECT_ANIMAL_BOOKINGS)?;
        for animal in &animals {
            let windows = stmt
                .query_map([animal.id.value()], |row| {
                    let code: Option<String> = row.get(1)?;
                    let check_in: String = row.get(2)?;
                    let check_out: String = row.get(3)?;
                    let status: String = row.get(4)?;
                    let id = ReservationId::new(row.get(0)?);
                    Ok(BookingWindow {
                        reservation_id: id,
                        code: code
                            .map_or_else(|| ReservationCode::from_id(id), ReservationCode::from_string),
                        stay: parse_stay(&check_in, &check_out)?,
                        status: parse_status(&status)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            for window in windows {
                bookings.add_booking(animal.id, window);
            }
        }

        Ok(bookings)
    }

    // --- pricing configuration --------------------------------------

    /// Loads the raw active pricing payload and its version, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or payload parse fails.
    pub fn load_pricing_config_data(&self) -> Result<Option<(u64, PricingConfigData)>> {
        let row: Option<(i64, String)> = self
            .conn
            .query_row(
                "SELECT version, payload FROM pricing_config WHERE slot = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match row {
            #[allow(clippy::cast_sign_loss)]
            Some((version, payload)) => {
                let data: PricingConfigData = serde_json::from_str(&payload)?;
                Ok(Some((version as u64, data)))
            }
            None => Ok(None),
        }
    }

    /// Loads and resolves the active pricing configuration. With nothing
    /// stored yet, every discount dimension is disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored payload fails to parse or validate.
    pub fn load_pricing_config(&self) -> Result<PricingConfig> {
        match self.load_pricing_config_data()? {
            Some((version, data)) => PricingConfig::resolve(&data, version),
            None => Ok(PricingConfig::disabled(0)),
        }
    }

    /// Saves a pricing configuration into the single active slot.
    ///
    /// The payload is validated and normalized before it is written. When
    /// `expected_version` is given the write only succeeds if the stored
    /// version still matches, so concurrent admin updates fail loudly
    /// instead of silently losing one of the edits. Returns the new
    /// version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VersionConflict`] on a stale `expected_version`
    /// and a validation error for out-of-range percents.
    pub fn save_pricing_config(
        &mut self,
        data: &PricingConfigData,
        expected_version: Option<u64>,
    ) -> Result<u64> {
        let normalized = data.normalized();
        // Resolution doubles as validation of the payload.
        PricingConfig::resolve(&normalized, 0)?;
        let payload = serde_json::to_string(&normalized)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        #[allow(clippy::cast_sign_loss)]
        let current: u64 = tx
            .query_row(
                "SELECT version FROM pricing_config WHERE slot = 1",
                [],
                |row| row.get::<_, i64>(0),
            )
            .optional()?
            .map_or(0, |v| v as u64);

        if let Some(expected) = expected_version {
            if expected != current {
                return Err(Error::VersionConflict {
                    expected,
                    found: current,
                });
            }
        }

        let next = current + 1;
        #[allow(clippy::cast_possible_wrap)]
        tx.execute(
            r"INSERT INTO pricing_config (slot, version, payload, updated_at)
              VALUES (1, ?, ?, ?)
              ON CONFLICT(slot) DO UPDATE SET
                  version = excluded.version,
                  payload = excluded.payload,
                  updated_at = excluded.updated_at",
            params![next as i64, payload, Utc::now().timestamp()],
        )?;

        tx.commit()?;
        Ok(next)
    }

    // --- transaction-scoped helpers (used by the plan executor) ------

    /// Inserts a reservation (with its animals and add-on lines) inside an
    /// existing transaction. Returns the assigned id and derived code.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails.
    pub fn insert_reservation_tx(
        conn: &Connection,
        draft: &ReservationDraft,
        total: Decimal,
        created_at: DateTime<Utc>,
    ) -> Result<(ReservationId, ReservationCode)> {
        conn.execute(
            r"INSERT INTO reservations
              (category_id, check_in, check_out, status, customer_id,
               allow_sharing, special_requests, total, created_at)
              VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                draft.category_id.value(),
                draft.stay.check_in().to_string(),
                draft.stay.check_out().to_string(),
                draft.status.as_str(),
                draft.customer_id.map(CustomerId::value),
                draft.allow_sharing,
                draft.special_requests,
                total.to_string(),
                created_at.timestamp(),
            ],
        )?;

        let id = ReservationId::new(conn.last_insert_rowid());
        let code = ReservationCode::from_id(id);
        conn.execute(
            "UPDATE reservations SET code = ? WHERE id = ?",
            params![code.as_str(), id.value()],
        )?;

        for animal in &draft.animal_ids {
            conn.execute(
                "INSERT INTO reservation_animals (reservation_id, animal_id) VALUES (?, ?)",
                params![id.value(), animal.value()],
            )?;
        }
        for addon in &draft.addons {
            conn.execute(
                "INSERT INTO reservation_addons (reservation_id, service_id, quantity, unit_price) VALUES (?, ?, ?, ?)",
                params![
                    id.value(),
                    addon.service_id.value(),
                    addon.quantity,
                    addon.unit_price.to_string(),
                ],
            )?;
        }

        Ok((id, code))
    }

    /// Inserts a tentative unit assignment inside an existing transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_assignment_tx(
        conn: &Connection,
        reservation_id: ReservationId,
        unit_id: UnitId,
        animal_count: u32,
    ) -> Result<()> {
        conn.execute(
            "INSERT INTO unit_assignments (reservation_id, unit_id, animal_count, locked_at) VALUES (?, ?, ?, NULL)",
            params![reservation_id.value(), unit_id.value(), animal_count],
        )?;
        Ok(())
    }

    /// Recomputes a unit's minimum free capacity over a window, inside an
    /// existing transaction. Used by the executor to re-check capacity
    /// right before inserting an assignment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RoomNotFound`] for an unknown unit and
    /// [`Error::CapacityInvariantViolation`] if occupancy already exceeds
    /// capacity.
    pub fn unit_residual_capacity_tx(
        conn: &Connection,
        unit_id: UnitId,
        stay: &StayRange,
    ) -> Result<u32> {
        let capacity: u32 = conn
            .query_row(
                "SELECT capacity FROM units WHERE id = ?",
                [unit_id.value()],
                |row| row.get(0),
            )
            .optional()?
            .ok_or(Error::RoomNotFound { unit: unit_id })?;

        let mut stmt = conn.prepare(SELECT_UNIT_OCCUPANCY)?;
        let occupants = stmt
            .query_map(
                params![
                    unit_id.value(),
                    stay.check_in().to_string(),
                    stay.check_out().to_string(),
                ],
                |row| {
                    let check_in: String = row.get(1)?;
                    let check_out: String = row.get(2)?;
                    let status: String = row.get(3)?;
                    Ok((
                        row.get::<_, u32>(0)?,
                        parse_stay(&check_in, &check_out)?,
                        parse_status(&status)?,
                    ))
                },
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let live: Vec<_> = occupants
            .into_iter()
            .filter(|(_, _, status)| status.holds_capacity())
            .collect();

        let mut min_free = capacity;
        if !live.is_empty() {
            for night in stay.iter_nights() {
                let occupancy: u32 = live
                    .iter()
                    .filter(|(_, window, _)| window.contains_night(night))
                    .map(|(count, _, _)| count)
                    .sum();
                if occupancy > capacity {
                    return Err(Error::CapacityInvariantViolation {
                        unit: unit_id,
                        night,
                        details: format!("occupancy {occupancy} exceeds capacity {capacity}"),
                    });
                }
                min_free = min_free.min(capacity - occupancy);
            }
        }

        Ok(min_free)
    }

    /// Transitions a reservation's status inside an existing transaction,
    /// verifying the current status still matches `from`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReservationNotFound`] for an unknown id and
    /// [`Error::InvalidTransition`] if the stored status changed since
    /// planning.
    pub fn transition_status_tx(
        conn: &Connection,
        reservation_id: ReservationId,
        from: ReservationStatus,
        to: ReservationStatus,
    ) -> Result<()> {
        let row: Option<(Option<String>, String)> = conn
            .query_row(
                "SELECT code, status FROM reservations WHERE id = ?",
                [reservation_id.value()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((code, status)) = row else {
            return Err(Error::ReservationNotFound {
                code: reservation_id.to_string(),
            });
        };
        let code =
            code.unwrap_or_else(|| ReservationCode::from_id(reservation_id).to_string());
        let current = ReservationStatus::parse(&status)?;
        if current != from {
            return Err(Error::InvalidTransition {
                code,
                from: current,
                to,
            });
        }

        conn.execute(
            "UPDATE reservations SET status = ? WHERE id = ?",
            params![to.as_str(), reservation_id.value()],
        )?;
        Ok(())
    }

    /// Locks a reservation's assignment inside an existing transaction.
    /// An already-set lock timestamp is left untouched.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the reservation has no assignment.
    pub fn lock_assignment_tx(
        conn: &Connection,
        reservation_id: ReservationId,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let rows = conn.execute(
            "UPDATE unit_assignments SET locked_at = COALESCE(locked_at, ?) WHERE reservation_id = ?",
            params![at.timestamp(), reservation_id.value()],
        )?;
        if rows == 0 {
            return Err(Error::Validation {
                field: "assignment".into(),
                message: format!("reservation {reservation_id} has no unit assignment"),
            });
        }
        Ok(())
    }
}
