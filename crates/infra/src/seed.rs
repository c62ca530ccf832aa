//! Initial data population (drops everything, then inserts the demo roster).

use thiserror::Error;

use superheroes_core::{DomainError, Hero, NewHero, NewPower, Power};

use crate::store::{StoreError, SuperheroStore};

/// `(name, super_name)` of the seeded heroes, in insertion order.
pub const HEROES: [(&str, &str); 5] = [
    ("Kamala Khan", "Ms. Marvel"),
    ("Peter Parker", "Spider-Man"),
    ("Carol Danvers", "Captain Marvel"),
    ("Bruce Wayne", "Batman"),
    ("Clark Kent", "Superman"),
];

/// `(name, description)` of the seeded powers, in insertion order.
pub const POWERS: [(&str, &str); 4] = [
    ("super strength", "gives the wielder super-human strengths"),
    (
        "flight",
        "gives the wielder the ability to fly through the skies at supersonic speed",
    ),
    (
        "super human senses",
        "allows the wielder to use her senses at a super-human level",
    ),
    ("elasticity", "can stretch the human body to extreme lengths"),
];

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What `seed` inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub heroes: Vec<Hero>,
    pub powers: Vec<Power>,
}

/// Reset the store and insert `HEROES` and `POWERS`.
pub async fn seed(store: &dyn SuperheroStore) -> Result<SeedSummary, SeedError> {
    store.reset().await?;

    let mut heroes = Vec::with_capacity(HEROES.len());
    for (name, super_name) in HEROES {
        heroes.push(store.insert_hero(NewHero::new(name, super_name)?).await?);
    }

    let mut powers = Vec::with_capacity(POWERS.len());
    for (name, description) in POWERS {
        powers.push(store.insert_power(NewPower::new(name, description)?).await?);
    }

    tracing::info!(
        heroes = heroes.len(),
        powers = powers.len(),
        "database seeded"
    );

    Ok(SeedSummary { heroes, powers })
}
