use crate::schema::*;
use common::{Assessment, Reading, Thresholds};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::{error, info, warn};

/// The conditions table holds exactly one row with this id.
pub const CONDITIONS_ID: i32 = 1;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS conditions (
        id INTEGER NOT NULL PRIMARY KEY,
        current_threshold DOUBLE NOT NULL,
        temperature_threshold DOUBLE NOT NULL,
        vibration_threshold DOUBLE NOT NULL
    );

    CREATE TABLE IF NOT EXISTS motors (
        id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        "current" DOUBLE NOT NULL,
        temperature DOUBLE NOT NULL,
        vibration DOUBLE NOT NULL,
        current_status TEXT NOT NULL,
        temperature_status TEXT NOT NULL,
        vibration_status TEXT NOT NULL
    );
"#;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("could not connect to database: {0}")]
    Connection(#[from] diesel::ConnectionError),
    #[error("query failed: {0}")]
    Query(#[from] diesel::result::Error),
    #[error("conditions row is missing")]
    MissingConditions,
}

#[derive(Debug, Clone, Queryable, serde::Serialize)]
pub struct Motor {
    pub id: i32,
    pub name: String,
    pub current: f64,     // A
    pub temperature: f64, // °C
    pub vibration: f64,   // mm/s
    pub current_status: String,
    pub temperature_status: String,
    pub vibration_status: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name=motors)]
pub struct NewMotor<'a> {
    pub name: &'a str,
    pub current: f64,
    pub temperature: f64,
    pub vibration: f64,
    pub current_status: &'a str,
    pub temperature_status: &'a str,
    pub vibration_status: &'a str,
}

impl<'a> NewMotor<'a> {
    pub fn new(name: &'a str, reading: &Reading, assessment: &Assessment) -> Self {
        Self {
            name,
            current: reading.current,
            temperature: reading.temperature,
            vibration: reading.vibration,
            current_status: assessment.current.as_str(),
            temperature_status: assessment.temperature.as_str(),
            vibration_status: assessment.vibration.as_str(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Insertable, serde::Serialize)]
#[diesel(table_name=conditions)]
pub struct Conditions {
    pub id: i32,
    pub current_threshold: f64,
    pub temperature_threshold: f64,
    pub vibration_threshold: f64,
}

impl Conditions {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            current: self.current_threshold,
            temperature: self.temperature_threshold,
            vibration: self.vibration_threshold,
        }
    }
}

/// One connection to the store. Opened per request and closed on drop.
pub struct Db {
    conn: SqliteConnection,
}

impl Db {
    pub fn connect(database_url: &str) -> Result<Self, DbError> {
        match SqliteConnection::establish(database_url) {
            Ok(conn) => Ok(Self { conn }),
            Err(e) => {
                error!("Error connecting to database: {e}");
                Err(DbError::Connection(e))
            }
        }
    }

    /// Creates missing tables and seeds the conditions row. Existing rows are left alone.
    pub fn bootstrap(&mut self, seed: &Thresholds) -> Result<(), DbError> {
        self.conn.batch_execute(SCHEMA)?;

        let seeded = diesel::insert_or_ignore_into(conditions::table)
            .values(&Conditions {
                id: CONDITIONS_ID,
                current_threshold: seed.current,
                temperature_threshold: seed.temperature,
                vibration_threshold: seed.vibration,
            })
            .execute(&mut self.conn)?;

        if seeded > 0 {
            info!("Seeded conditions row with {seed:?}");
        }
        Ok(())
    }

    pub fn motors(&mut self) -> Result<Vec<Motor>, DbError> {
        Ok(motors::table.load::<Motor>(&mut self.conn)?)
    }

    pub fn conditions(&mut self) -> Result<Option<Conditions>, DbError> {
        Ok(conditions::table
            .find(CONDITIONS_ID)
            .first::<Conditions>(&mut self.conn)
            .optional()?)
    }

    pub fn update_conditions(&mut self, thresholds: &Thresholds) -> Result<(), DbError> {
        let updated = diesel::update(conditions::table.find(CONDITIONS_ID))
            .set((
                conditions::current_threshold.eq(thresholds.current),
                conditions::temperature_threshold.eq(thresholds.temperature),
                conditions::vibration_threshold.eq(thresholds.vibration),
            ))
            .execute(&mut self.conn)?;

        if updated == 0 {
            warn!("Conditions row {CONDITIONS_ID} does not exist, nothing updated");
        }
        Ok(())
    }

    pub fn insert_motor(&mut self, motor: &NewMotor) -> Result<(), DbError> {
        diesel::insert_into(motors::table)
            .values(motor)
            .execute(&mut self.conn)?;
        Ok(())
    }

    /// Assesses the reading against the thresholds current right now and stores it.
    pub fn add_reading(&mut self, name: &str, reading: &Reading) -> Result<Assessment, DbError> {
        let thresholds = self
            .conditions()?
            .ok_or(DbError::MissingConditions)?
            .thresholds();
        let assessment = thresholds.assess(reading);

        self.insert_motor(&NewMotor::new(name, reading, &assessment))?;
        Ok(assessment)
    }

    pub fn statuses(&mut self) -> Result<Vec<(String, String, String)>, DbError> {
        Ok(motors::table
            .select((
                motors::current_status,
                motors::temperature_status,
                motors::vibration_status,
            ))
            .load::<(String, String, String)>(&mut self.conn)?)
    }
}
