// ==========================================
// DUPA Estimator - Master data repository
// ==========================================
// Contract: find_rate(kind, key, location, as_of) -> Option<RateRecord>
// - LABOR:     key = designation; returns the location's labor rate sheet
// - EQUIPMENT: key = equipment id; location/as_of ignored
// - MATERIAL:  key = material code; price effective at location/as_of
// ==========================================

use crate::domain::rates::{
    select_material_price, EquipmentRate, LaborRate, MaterialPrice, RateRecord,
};
use crate::domain::types::RateKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ==========================================
// MasterDataRepository Trait
// ==========================================
#[async_trait]
pub trait MasterDataRepository: Send + Sync {
    /// Look up a master rate record
    ///
    /// # Returns
    /// - Ok(Some(record)): matching record
    /// - Ok(None): no record for this kind/key/location/date
    /// - Err: I/O failure
    async fn find_rate(
        &self,
        kind: RateKind,
        key: &str,
        location: &str,
        as_of: NaiveDate,
    ) -> RepositoryResult<Option<RateRecord>>;
}

// ==========================================
// SqliteMasterDataRepository
// ==========================================
// Reads run on the blocking pool so lookups can overlap and a caller's
// timeout can fire while SQLite waits on a busy database.
#[derive(Clone)]
pub struct SqliteMasterDataRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteMasterDataRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ===== Writes (master-data maintenance) =====

    /// Replace the labor rate sheet of a location
    pub fn upsert_labor_rate(&self, rate: &LaborRate) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM labor_rate WHERE location = ?1 COLLATE NOCASE",
            params![rate.location],
        )?;
        for (designation, hourly_rate) in &rate.hourly_rates {
            tx.execute(
                "INSERT INTO labor_rate (location, district, designation, hourly_rate) VALUES (?1, ?2, ?3, ?4)",
                params![rate.location, rate.district, designation, hourly_rate],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn upsert_equipment_rate(&self, rate: &EquipmentRate) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO equipment_rate (equipment_id, description, hourly_rate, rental_rate)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                rate.equipment_id,
                rate.description,
                rate.hourly_rate,
                rate.rental_rate
            ],
        )?;
        Ok(())
    }

    /// Append a material price (prices are dated, history is kept)
    pub fn insert_material_price(&self, price: &MaterialPrice) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO material_price (material_code, description, unit, base_price, location, effective_date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                price.material_code,
                price.description,
                price.unit,
                price.base_price,
                price.location,
                price.effective_date.map(|d| d.format(DATE_FORMAT).to_string()),
            ],
        )?;
        Ok(())
    }

    // ===== Reads =====

    fn find_labor(&self, location: &str) -> RepositoryResult<Option<LaborRate>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT location, district, designation, hourly_rate
            FROM labor_rate
            WHERE location = ?1 COLLATE NOCASE
            ORDER BY designation
            "#,
        )?;
        let rows = stmt
            .query_map(params![location.trim()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, f64>(3)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut sheet: Option<LaborRate> = None;
        for (loc, district, designation, hourly_rate) in rows {
            sheet
                .get_or_insert_with(|| LaborRate {
                    location: loc,
                    district,
                    hourly_rates: BTreeMap::new(),
                })
                .hourly_rates
                .insert(designation, hourly_rate);
        }
        Ok(sheet)
    }

    fn find_equipment(&self, equipment_id: &str) -> RepositoryResult<Option<EquipmentRate>> {
        let conn = self.get_conn()?;
        let rate = conn
            .query_row(
                r#"
                SELECT equipment_id, description, hourly_rate, rental_rate
                FROM equipment_rate
                WHERE equipment_id = ?1
                "#,
                params![equipment_id],
                |row| {
                    Ok(EquipmentRate {
                        equipment_id: row.get(0)?,
                        description: row.get(1)?,
                        hourly_rate: row.get(2)?,
                        rental_rate: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(rate)
    }

    fn find_material(
        &self,
        material_code: &str,
        location: &str,
        as_of: NaiveDate,
    ) -> RepositoryResult<Option<MaterialPrice>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT material_code, description, unit, base_price, location, effective_date
            FROM material_price
            WHERE material_code = ?1
            "#,
        )?;
        let raw = stmt
            .query_map(params![material_code], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, Option<String>>(5)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut candidates = Vec::with_capacity(raw.len());
        for (code, description, unit, base_price, loc, date) in raw {
            let effective_date = match date {
                Some(s) => Some(NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(|e| {
                    RepositoryError::FieldValueError {
                        field: "material_price.effective_date".to_string(),
                        message: format!("{}: {}", s, e),
                    }
                })?),
                None => None,
            };
            candidates.push(MaterialPrice {
                material_code: code,
                description,
                unit,
                base_price,
                location: loc,
                effective_date,
            });
        }

        Ok(select_material_price(&candidates, material_code, location, as_of).cloned())
    }

    fn find_rate_blocking(
        &self,
        kind: RateKind,
        key: &str,
        location: &str,
        as_of: NaiveDate,
    ) -> RepositoryResult<Option<RateRecord>> {
        let record = match kind {
            RateKind::Labor => self.find_labor(location)?.map(RateRecord::Labor),
            RateKind::Equipment => self.find_equipment(key)?.map(RateRecord::Equipment),
            RateKind::Material => self
                .find_material(key, location, as_of)?
                .map(RateRecord::Material),
        };
        Ok(record)
    }
}

#[async_trait]
impl MasterDataRepository for SqliteMasterDataRepository {
    async fn find_rate(
        &self,
        kind: RateKind,
        key: &str,
        location: &str,
        as_of: NaiveDate,
    ) -> RepositoryResult<Option<RateRecord>> {
        let repo = self.clone();
        let key = key.to_string();
        let location = location.to_string();

        tokio::task::spawn_blocking(move || repo.find_rate_blocking(kind, &key, &location, as_of))
            .await
            .map_err(|e| RepositoryError::InternalError(format!("rate lookup task failed: {}", e)))?
    }
}
