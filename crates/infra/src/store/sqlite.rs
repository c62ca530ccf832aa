//! SQLite-backed store.
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `StoreError` by `ErrorKind`:
//!
//! | SQLx Error | StoreError | Scenario |
//! |------------|------------|----------|
//! | Database (foreign key violation) | `ForeignKey` | hero_power with unknown hero/power |
//! | Database (check / not null / unique) | `Constraint` | short description, unknown strength |
//! | Database (other) | `Backend` | other engine errors |
//! | PoolClosed / Io / other | `Backend` | connection failures |

use std::str::FromStr;
use std::time::Duration;

use sqlx::error::ErrorKind;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use tracing::instrument;

use superheroes_core::{
    validate_strength, Hero, HeroId, HeroPower, HeroPowerId, NewHero, NewHeroPower, NewPower,
    Power, PowerId,
};

use super::r#trait::{StoreError, SuperheroStore};

/// Table definitions, applied with `CREATE TABLE IF NOT EXISTS` on connect.
///
/// The description check counts bytes: `length()` on TEXT stops at the first
/// NUL, and the column must never be stricter than `validate_description`.
const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS hero (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        name       TEXT NOT NULL,
        super_name TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS power (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT NOT NULL,
        description TEXT NOT NULL CHECK (length(CAST(description AS BLOB)) >= 20)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS hero_power (
        id       INTEGER PRIMARY KEY AUTOINCREMENT,
        strength TEXT NOT NULL CHECK (strength IN ('Strong', 'Weak', 'Average')),
        hero_id  INTEGER NOT NULL REFERENCES hero (id) ON DELETE CASCADE,
        power_id INTEGER NOT NULL REFERENCES power (id) ON DELETE CASCADE
    )
    "#,
];

/// SQLite store over a `sqlx` connection pool.
///
/// Foreign keys are switched on for every connection, so cascades and
/// referential checks are done by the engine.
#[derive(Debug, Clone)]
pub struct SqliteSuperheroStore {
    pool: SqlitePool,
}

impl SqliteSuperheroStore {
    /// Wrap an existing pool. Call `ensure_schema` before use.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating the file if needed) and make sure the tables exist.
    ///
    /// `sqlite::memory:` URLs get a single long-lived connection, since every
    /// connection to an in-memory database sees its own private database.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| map_sqlx_error("parse_url", e))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool_options = if url.contains(":memory:") || url.contains("mode=memory") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .acquire_timeout(Duration::from_secs(5))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Create the three tables if they are missing. Existing tables are left alone.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for ddl in SCHEMA {
            sqlx::query(ddl)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl SuperheroStore for SqliteSuperheroStore {
    #[instrument(level = "debug", skip(self), err)]
    async fn list_heroes(&self) -> Result<Vec<Hero>, StoreError> {
        let rows =
            sqlx::query_as::<_, HeroRow>("SELECT id, name, super_name FROM hero ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("list_heroes", e))?;

        Ok(rows.into_iter().map(Hero::from).collect())
    }

    #[instrument(level = "debug", skip(self), fields(hero_id = %id), err)]
    async fn get_hero(&self, id: HeroId) -> Result<Option<Hero>, StoreError> {
        let row = sqlx::query_as::<_, HeroRow>(
            "SELECT id, name, super_name FROM hero WHERE id = ?1",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_hero", e))?;

        Ok(row.map(Hero::from))
    }

    #[instrument(level = "debug", skip(self, hero), err)]
    async fn insert_hero(&self, hero: NewHero) -> Result<Hero, StoreError> {
        let result = sqlx::query("INSERT INTO hero (name, super_name) VALUES (?1, ?2)")
            .bind(hero.name())
            .bind(hero.super_name())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_hero", e))?;

        Ok(hero.into_hero(HeroId::new(result.last_insert_rowid())))
    }

    #[instrument(level = "debug", skip(self), fields(hero_id = %id), err)]
    async fn delete_hero(&self, id: HeroId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM hero WHERE id = ?1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_hero", e))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(level = "debug", skip(self), err)]
    async fn list_powers(&self) -> Result<Vec<Power>, StoreError> {
        let rows =
            sqlx::query_as::<_, PowerRow>("SELECT id, name, description FROM power ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("list_powers", e))?;

        Ok(rows.into_iter().map(Power::from).collect())
    }

    #[instrument(level = "debug", skip(self), fields(power_id = %id), err)]
    async fn get_power(&self, id: PowerId) -> Result<Option<Power>, StoreError> {
        let row = sqlx::query_as::<_, PowerRow>(
            "SELECT id, name, description FROM power WHERE id = ?1",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_power", e))?;

        Ok(row.map(Power::from))
    }

    #[instrument(level = "debug", skip(self, power), err)]
    async fn insert_power(&self, power: NewPower) -> Result<Power, StoreError> {
        let result = sqlx::query("INSERT INTO power (name, description) VALUES (?1, ?2)")
            .bind(power.name())
            .bind(power.description())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_power", e))?;

        Ok(power.into_power(PowerId::new(result.last_insert_rowid())))
    }

    #[instrument(level = "debug", skip(self, power), fields(power_id = %power.id), err)]
    async fn update_power(&self, power: &Power) -> Result<Option<Power>, StoreError> {
        let result = sqlx::query("UPDATE power SET name = ?1, description = ?2 WHERE id = ?3")
            .bind(&power.name)
            .bind(&power.description)
            .bind(power.id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("update_power", e))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(power.clone()))
    }

    #[instrument(level = "debug", skip(self), fields(power_id = %id), err)]
    async fn delete_power(&self, id: PowerId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM power WHERE id = ?1")
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_power", e))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(level = "debug", skip(self), err)]
    async fn list_hero_powers(&self) -> Result<Vec<HeroPower>, StoreError> {
        let rows = sqlx::query_as::<_, HeroPowerRow>(
            "SELECT id, strength, hero_id, power_id FROM hero_power ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_hero_powers", e))?;

        rows.into_iter().map(HeroPower::try_from).collect()
    }

    #[instrument(level = "debug", skip(self), fields(hero_power_id = %id), err)]
    async fn get_hero_power(&self, id: HeroPowerId) -> Result<Option<HeroPower>, StoreError> {
        let row = sqlx::query_as::<_, HeroPowerRow>(
            "SELECT id, strength, hero_id, power_id FROM hero_power WHERE id = ?1",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_hero_power", e))?;

        row.map(HeroPower::try_from).transpose()
    }

    #[instrument(
        level = "debug",
        skip(self, hero_power),
        fields(hero_id = %hero_power.hero_id, power_id = %hero_power.power_id),
        err
    )]
    async fn insert_hero_power(&self, hero_power: NewHeroPower) -> Result<HeroPower, StoreError> {
        let result = sqlx::query(
            "INSERT INTO hero_power (strength, hero_id, power_id) VALUES (?1, ?2, ?3)",
        )
        .bind(hero_power.strength.as_str())
        .bind(hero_power.hero_id.get())
        .bind(hero_power.power_id.get())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_hero_power", e))?;

        Ok(hero_power.into_hero_power(HeroPowerId::new(result.last_insert_rowid())))
    }

    #[instrument(level = "debug", skip(self), err)]
    async fn reset(&self) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        for stmt in [
            "DELETE FROM hero_power",
            "DELETE FROM hero",
            "DELETE FROM power",
            "DELETE FROM sqlite_sequence WHERE name IN ('hero', 'power', 'hero_power')",
        ] {
            sqlx::query(stmt)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("reset", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        tracing::info!("store reset");
        Ok(())
    }
}

/// Map SQLx errors to StoreError.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.kind() {
                ErrorKind::ForeignKeyViolation => StoreError::ForeignKey(msg),
                ErrorKind::CheckViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::UniqueViolation => StoreError::Constraint(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {}", operation))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}

// SQLx row types

#[derive(Debug, FromRow)]
struct HeroRow {
    id: i64,
    name: String,
    super_name: String,
}

impl From<HeroRow> for Hero {
    fn from(row: HeroRow) -> Self {
        Hero {
            id: HeroId::new(row.id),
            name: row.name,
            super_name: row.super_name,
        }
    }
}

#[derive(Debug, FromRow)]
struct PowerRow {
    id: i64,
    name: String,
    description: String,
}

impl From<PowerRow> for Power {
    fn from(row: PowerRow) -> Self {
        Power {
            id: PowerId::new(row.id),
            name: row.name,
            description: row.description,
        }
    }
}

#[derive(Debug, FromRow)]
struct HeroPowerRow {
    id: i64,
    strength: String,
    hero_id: i64,
    power_id: i64,
}

impl TryFrom<HeroPowerRow> for HeroPower {
    type Error = StoreError;

    fn try_from(row: HeroPowerRow) -> Result<Self, Self::Error> {
        let strength = validate_strength(&row.strength).map_err(|e| {
            StoreError::Backend(format!("hero_power {} has unreadable strength: {}", row.id, e))
        })?;

        Ok(HeroPower {
            id: HeroPowerId::new(row.id),
            strength,
            hero_id: HeroId::new(row.hero_id),
            power_id: PowerId::new(row.power_id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use superheroes_core::Strength;

    async fn memory_store() -> SqliteSuperheroStore {
        SqliteSuperheroStore::connect("sqlite::memory:").await.unwrap()
    }

    async fn seed_pair(store: &SqliteSuperheroStore) -> (Hero, Power) {
        let hero = store
            .insert_hero(NewHero::new("Kamala Khan", "Ms. Marvel").unwrap())
            .await
            .unwrap();
        let power = store
            .insert_power(
                NewPower::new("elasticity", "can stretch the human body to extreme lengths")
                    .unwrap(),
            )
            .await
            .unwrap();
        (hero, power)
    }

    #[tokio::test]
    async fn ensure_schema_is_idempotent() {
        let store = memory_store().await;
        store.ensure_schema().await.unwrap();
        assert!(store.list_heroes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn inserted_rows_read_back_with_fresh_ids() {
        let store = memory_store().await;
        let (hero, power) = seed_pair(&store).await;

        assert_eq!(hero.id, HeroId::new(1));
        assert_eq!(store.get_hero(hero.id).await.unwrap(), Some(hero.clone()));
        assert_eq!(store.list_powers().await.unwrap(), vec![power.clone()]);

        let hp = store
            .insert_hero_power(NewHeroPower::new(Strength::Average, hero.id, power.id))
            .await
            .unwrap();
        assert_eq!(hp.id, HeroPowerId::new(1));
        assert_eq!(store.get_hero_power(hp.id).await.unwrap(), Some(hp));
    }

    #[tokio::test]
    async fn unknown_ids_read_as_none() {
        let store = memory_store().await;
        assert_eq!(store.get_hero(HeroId::new(5)).await.unwrap(), None);
        assert_eq!(store.get_power(PowerId::new(5)).await.unwrap(), None);
        assert_eq!(store.get_hero_power(HeroPowerId::new(5)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let store = memory_store().await;
        let (hero, _power) = seed_pair(&store).await;

        let err = store
            .insert_hero_power(NewHeroPower::new(Strength::Strong, hero.id, PowerId::new(77)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKey(_)), "got {err:?}");
        assert!(store.list_hero_powers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn check_constraint_guards_description_at_rest() {
        let store = memory_store().await;
        let (_hero, power) = seed_pair(&store).await;

        // Bypass the domain constructor to hit the column constraint directly.
        let bad = Power {
            description: "too short".to_string(),
            ..power.clone()
        };
        let err = store.update_power(&bad).await.unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)), "got {err:?}");
        assert_eq!(store.get_power(power.id).await.unwrap(), Some(power));
    }

    #[tokio::test]
    async fn update_power_persists_new_description() {
        let store = memory_store().await;
        let (_hero, power) = seed_pair(&store).await;

        let next = power
            .with_description("bends and stretches into any shape imaginable")
            .unwrap();
        assert_eq!(store.update_power(&next).await.unwrap(), Some(next.clone()));
        assert_eq!(store.get_power(power.id).await.unwrap(), Some(next));

        let gone = Power {
            id: PowerId::new(404),
            ..power
        };
        assert_eq!(store.update_power(&gone).await.unwrap(), None);
    }

    #[tokio::test]
    async fn descriptions_with_nul_characters_are_stored() {
        let store = memory_store().await;
        let (_hero, power) = seed_pair(&store).await;
        let description = format!("\u{0}{}", "a".repeat(25));

        let next = power.with_description(description.clone()).unwrap();
        assert_eq!(store.update_power(&next).await.unwrap(), Some(next.clone()));
        assert_eq!(store.get_power(power.id).await.unwrap(), Some(next));

        let inserted = store
            .insert_power(NewPower::new("phasing", description.clone()).unwrap())
            .await
            .unwrap();
        assert_eq!(inserted.description, description);
    }

    #[tokio::test]
    async fn deletes_cascade_to_hero_powers() {
        let store = memory_store().await;
        let (hero, power) = seed_pair(&store).await;
        store
            .insert_hero_power(NewHeroPower::new(Strength::Weak, hero.id, power.id))
            .await
            .unwrap();

        assert!(store.delete_hero(hero.id).await.unwrap());
        assert!(store.list_hero_powers().await.unwrap().is_empty());
        assert_eq!(store.list_powers().await.unwrap().len(), 1);
        assert!(!store.delete_hero(hero.id).await.unwrap());
    }

    #[tokio::test]
    async fn reset_clears_rows_and_sequences() {
        let store = memory_store().await;
        seed_pair(&store).await;
        store.reset().await.unwrap();

        assert!(store.list_heroes().await.unwrap().is_empty());
        assert!(store.list_powers().await.unwrap().is_empty());

        let (hero, power) = seed_pair(&store).await;
        assert_eq!(hero.id, HeroId::new(1));
        assert_eq!(power.id, PowerId::new(1));
    }
}
