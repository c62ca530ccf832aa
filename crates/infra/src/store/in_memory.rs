use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use superheroes_core::{
    Entity, Hero, HeroId, HeroPower, HeroPowerId, NewHero, NewHeroPower, NewPower, Power, PowerId,
};

use super::r#trait::{StoreError, SuperheroStore};

/// One table: rows keyed by id plus the next id to hand out.
#[derive(Debug)]
struct Table<E: Entity> {
    rows: BTreeMap<E::Id, E>,
    next_id: i64,
}

impl<E: Entity + Clone> Table<E> {
    fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    fn get(&self, id: E::Id) -> Option<E> {
        self.rows.get(&id).cloned()
    }

    fn contains(&self, id: E::Id) -> bool {
        self.rows.contains_key(&id)
    }

    fn all(&self) -> Vec<E> {
        self.rows.values().cloned().collect()
    }

    fn insert_with(&mut self, build: impl FnOnce(i64) -> E) -> E {
        let row = build(self.next_id);
        self.next_id += 1;
        self.rows.insert(row.id(), row.clone());
        row
    }

    fn remove(&mut self, id: E::Id) -> bool {
        self.rows.remove(&id).is_some()
    }
}

#[derive(Debug)]
struct Tables {
    heroes: Table<Hero>,
    powers: Table<Power>,
    hero_powers: Table<HeroPower>,
}

impl Tables {
    fn new() -> Self {
        Self {
            heroes: Table::new(),
            powers: Table::new(),
            hero_powers: Table::new(),
        }
    }
}

/// In-memory store for tests/dev.
///
/// All three tables sit behind one lock so cascades and FK checks are atomic.
#[derive(Debug)]
pub struct InMemorySuperheroStore {
    tables: RwLock<Tables>,
}

impl InMemorySuperheroStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }
}

impl Default for InMemorySuperheroStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SuperheroStore for InMemorySuperheroStore {
    async fn list_heroes(&self) -> Result<Vec<Hero>, StoreError> {
        Ok(self.read()?.heroes.all())
    }

    async fn get_hero(&self, id: HeroId) -> Result<Option<Hero>, StoreError> {
        Ok(self.read()?.heroes.get(id))
    }

    async fn insert_hero(&self, hero: NewHero) -> Result<Hero, StoreError> {
        let mut tables = self.write()?;
        Ok(tables
            .heroes
            .insert_with(|id| hero.into_hero(HeroId::new(id))))
    }

    async fn delete_hero(&self, id: HeroId) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        if !tables.heroes.remove(id) {
            return Ok(false);
        }
        tables.hero_powers.rows.retain(|_, hp| hp.hero_id != id);
        Ok(true)
    }

    async fn list_powers(&self) -> Result<Vec<Power>, StoreError> {
        Ok(self.read()?.powers.all())
    }

    async fn get_power(&self, id: PowerId) -> Result<Option<Power>, StoreError> {
        Ok(self.read()?.powers.get(id))
    }

    async fn insert_power(&self, power: NewPower) -> Result<Power, StoreError> {
        let mut tables = self.write()?;
        Ok(tables
            .powers
            .insert_with(|id| power.into_power(PowerId::new(id))))
    }

    async fn update_power(&self, power: &Power) -> Result<Option<Power>, StoreError> {
        let mut tables = self.write()?;
        match tables.powers.rows.get_mut(&power.id) {
            Some(row) => {
                *row = power.clone();
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_power(&self, id: PowerId) -> Result<bool, StoreError> {
        let mut tables = self.write()?;
        if !tables.powers.remove(id) {
            return Ok(false);
        }
        tables.hero_powers.rows.retain(|_, hp| hp.power_id != id);
        Ok(true)
    }

    async fn list_hero_powers(&self) -> Result<Vec<HeroPower>, StoreError> {
        Ok(self.read()?.hero_powers.all())
    }

    async fn get_hero_power(&self, id: HeroPowerId) -> Result<Option<HeroPower>, StoreError> {
        Ok(self.read()?.hero_powers.get(id))
    }

    async fn insert_hero_power(&self, hero_power: NewHeroPower) -> Result<HeroPower, StoreError> {
        let mut tables = self.write()?;

        if !tables.heroes.contains(hero_power.hero_id) {
            return Err(StoreError::ForeignKey(format!(
                "hero {} does not exist",
                hero_power.hero_id
            )));
        }
        if !tables.powers.contains(hero_power.power_id) {
            return Err(StoreError::ForeignKey(format!(
                "power {} does not exist",
                hero_power.power_id
            )));
        }

        Ok(tables
            .hero_powers
            .insert_with(|id| hero_power.into_hero_power(HeroPowerId::new(id))))
    }

    async fn reset(&self) -> Result<(), StoreError> {
        *self.write()? = Tables::new();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use superheroes_core::Strength;

    async fn store_with_hero_and_power() -> (InMemorySuperheroStore, Hero, Power) {
        let store = InMemorySuperheroStore::new();
        let hero = store
            .insert_hero(NewHero::new("Carol Danvers", "Captain Marvel").unwrap())
            .await
            .unwrap();
        let power = store
            .insert_power(NewPower::new("flight", "gives the wielder the ability to fly").unwrap())
            .await
            .unwrap();
        (store, hero, power)
    }

    #[tokio::test]
    async fn ids_start_at_one_per_table() {
        let (store, hero, power) = store_with_hero_and_power().await;
        assert_eq!(hero.id, HeroId::new(1));
        assert_eq!(power.id, PowerId::new(1));

        let hp = store
            .insert_hero_power(NewHeroPower::new(Strength::Strong, hero.id, power.id))
            .await
            .unwrap();
        assert_eq!(hp.id, HeroPowerId::new(1));
        assert_eq!(store.get_hero_power(hp.id).await.unwrap(), Some(hp));
    }

    #[tokio::test]
    async fn missing_rows_are_none_not_errors() {
        let store = InMemorySuperheroStore::new();
        assert_eq!(store.get_hero(HeroId::new(99)).await.unwrap(), None);
        assert_eq!(store.get_power(PowerId::new(99)).await.unwrap(), None);
        assert!(store.list_heroes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_hero_power_requires_existing_hero_and_power() {
        let (store, hero, power) = store_with_hero_and_power().await;

        let err = store
            .insert_hero_power(NewHeroPower::new(Strength::Weak, HeroId::new(42), power.id))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKey(_)));

        let err = store
            .insert_hero_power(NewHeroPower::new(Strength::Weak, hero.id, PowerId::new(42)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ForeignKey(_)));

        assert!(store.list_hero_powers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_hero_or_power_cascades() {
        let (store, hero, power) = store_with_hero_and_power().await;
        let other = store
            .insert_hero(NewHero::new("Clark Kent", "Superman").unwrap())
            .await
            .unwrap();

        store
            .insert_hero_power(NewHeroPower::new(Strength::Strong, hero.id, power.id))
            .await
            .unwrap();
        let kept = store
            .insert_hero_power(NewHeroPower::new(Strength::Average, other.id, power.id))
            .await
            .unwrap();

        assert!(store.delete_hero(hero.id).await.unwrap());
        assert_eq!(store.list_hero_powers().await.unwrap(), vec![kept]);

        assert!(store.delete_power(power.id).await.unwrap());
        assert!(store.list_hero_powers().await.unwrap().is_empty());
        assert!(!store.delete_power(power.id).await.unwrap());
    }

    #[tokio::test]
    async fn update_power_replaces_row() {
        let (store, _hero, power) = store_with_hero_and_power().await;
        let next = power
            .with_description("lets the wielder soar above the clouds")
            .unwrap();

        let saved = store.update_power(&next).await.unwrap();
        assert_eq!(saved.as_ref(), Some(&next));
        assert_eq!(store.get_power(power.id).await.unwrap(), Some(next));
    }

    #[tokio::test]
    async fn update_power_on_vanished_row_is_none() {
        let (store, _hero, power) = store_with_hero_and_power().await;
        store.delete_power(power.id).await.unwrap();

        assert_eq!(store.update_power(&power).await.unwrap(), None);
        assert!(store.list_powers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reset_restarts_ids() {
        let (store, _hero, _power) = store_with_hero_and_power().await;
        store.reset().await.unwrap();

        assert!(store.list_heroes().await.unwrap().is_empty());
        let hero = store
            .insert_hero(NewHero::new("Bruce Wayne", "Batman").unwrap())
            .await
            .unwrap();
        assert_eq!(hero.id, HeroId::new(1));
    }
}
