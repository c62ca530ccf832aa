//! `superheroes-core` — domain model for the superheroes service.
//!
//! This crate contains **pure domain** types and validation (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod hero;
pub mod hero_power;
pub mod id;
pub mod power;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use hero::{Hero, NewHero};
pub use hero_power::{validate_strength, HeroPower, NewHeroPower, Strength};
pub use id::{HeroId, HeroPowerId, PowerId};
pub use power::{validate_description, NewPower, Power, MIN_DESCRIPTION_LEN};
