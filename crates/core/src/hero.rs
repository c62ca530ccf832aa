use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::id::HeroId;

/// A superhero character: civilian name plus super-name.
///
/// Serializes to the flat wire shape `{id, name, super_name}`; associated
/// powers are never embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hero {
    pub id: HeroId,
    pub name: String,
    pub super_name: String,
}

impl Entity for Hero {
    type Id = HeroId;

    fn id(&self) -> HeroId {
        self.id
    }
}

/// Insert payload for a hero (id is assigned by the store).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHero {
    name: String,
    super_name: String,
}

impl NewHero {
    pub fn new(name: impl Into<String>, super_name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        let super_name = super_name.into();

        if name.trim().is_empty() {
            return Err(DomainError::validation("Hero name cannot be empty"));
        }
        if super_name.trim().is_empty() {
            return Err(DomainError::validation("Hero super_name cannot be empty"));
        }

        Ok(Self { name, super_name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn super_name(&self) -> &str {
        &self.super_name
    }

    /// Attach the store-assigned id.
    pub fn into_hero(self, id: HeroId) -> Hero {
        Hero {
            id,
            name: self.name,
            super_name: self.super_name,
        }
    }
}
