use std::sync::Arc;

use thiserror::Error;

use superheroes_core::{
    Hero, HeroId, HeroPower, HeroPowerId, NewHero, NewHeroPower, NewPower, Power, PowerId,
};

/// Store operation error.
///
/// These are **infrastructure errors** as opposed to domain errors (validation).
/// A missing row is not an error: lookups return `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A hero_power row referenced a hero or power that does not exist.
    #[error("foreign key violation: {0}")]
    ForeignKey(String),

    /// A column constraint (CHECK / NOT NULL / UNIQUE) rejected the write.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// Connection, I/O or decoding failure in the backing engine.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Durable keyed storage for the three record types.
///
/// ## Semantics
///
/// - Ids are assigned on insert, per table, starting at 1.
/// - `list_*` return rows ordered by id.
/// - Deleting a hero or a power removes its hero_power rows (cascade).
/// - Every mutating call is atomic: it either fully commits or leaves storage unchanged.
#[async_trait::async_trait]
pub trait SuperheroStore: Send + Sync {
    async fn list_heroes(&self) -> Result<Vec<Hero>, StoreError>;

    async fn get_hero(&self, id: HeroId) -> Result<Option<Hero>, StoreError>;

    async fn insert_hero(&self, hero: NewHero) -> Result<Hero, StoreError>;

    /// Returns `false` when no row had that id.
    async fn delete_hero(&self, id: HeroId) -> Result<bool, StoreError>;

    async fn list_powers(&self) -> Result<Vec<Power>, StoreError>;

    async fn get_power(&self, id: PowerId) -> Result<Option<Power>, StoreError>;

    async fn insert_power(&self, power: NewPower) -> Result<Power, StoreError>;

    /// Persist the full state of an existing power.
    ///
    /// Returns `Ok(None)` if the row no longer exists.
    async fn update_power(&self, power: &Power) -> Result<Option<Power>, StoreError>;

    async fn delete_power(&self, id: PowerId) -> Result<bool, StoreError>;

    async fn list_hero_powers(&self) -> Result<Vec<HeroPower>, StoreError>;

    async fn get_hero_power(&self, id: HeroPowerId) -> Result<Option<HeroPower>, StoreError>;

    /// Fails with `StoreError::ForeignKey` if the hero or the power is missing.
    async fn insert_hero_power(&self, hero_power: NewHeroPower) -> Result<HeroPower, StoreError>;

    /// Remove every row and restart id assignment at 1.
    async fn reset(&self) -> Result<(), StoreError>;
}

#[async_trait::async_trait]
impl<S> SuperheroStore for Arc<S>
where
    S: SuperheroStore + ?Sized,
{
    async fn list_heroes(&self) -> Result<Vec<Hero>, StoreError> {
        (**self).list_heroes().await
    }

    async fn get_hero(&self, id: HeroId) -> Result<Option<Hero>, StoreError> {
        (**self).get_hero(id).await
    }

    async fn insert_hero(&self, hero: NewHero) -> Result<Hero, StoreError> {
        (**self).insert_hero(hero).await
    }

    async fn delete_hero(&self, id: HeroId) -> Result<bool, StoreError> {
        (**self).delete_hero(id).await
    }

    async fn list_powers(&self) -> Result<Vec<Power>, StoreError> {
        (**self).list_powers().await
    }

    async fn get_power(&self, id: PowerId) -> Result<Option<Power>, StoreError> {
        (**self).get_power(id).await
    }

    async fn insert_power(&self, power: NewPower) -> Result<Power, StoreError> {
        (**self).insert_power(power).await
    }

    async fn update_power(&self, power: &Power) -> Result<Option<Power>, StoreError> {
        (**self).update_power(power).await
    }

    async fn delete_power(&self, id: PowerId) -> Result<bool, StoreError> {
        (**self).delete_power(id).await
    }

    async fn list_hero_powers(&self) -> Result<Vec<HeroPower>, StoreError> {
        (**self).list_hero_powers().await
    }

    async fn get_hero_power(&self, id: HeroPowerId) -> Result<Option<HeroPower>, StoreError> {
        (**self).get_hero_power(id).await
    }

    async fn insert_hero_power(&self, hero_power: NewHeroPower) -> Result<HeroPower, StoreError> {
        (**self).insert_hero_power(hero_power).await
    }

    async fn reset(&self) -> Result<(), StoreError> {
        (**self).reset().await
    }
}
