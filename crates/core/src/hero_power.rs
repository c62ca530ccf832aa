use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::id::{HeroId, HeroPowerId, PowerId};

/// How strongly a hero possesses a power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strength {
    Strong,
    Weak,
    Average,
}

impl Strength {
    pub const ALL: [Strength; 3] = [Strength::Strong, Strength::Weak, Strength::Average];

    pub fn as_str(self) -> &'static str {
        match self {
            Strength::Strong => "Strong",
            Strength::Weak => "Weak",
            Strength::Average => "Average",
        }
    }
}

impl core::fmt::Display for Strength {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strength {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_strength(s)
    }
}

/// Check that `value` is one of the strength ratings (case-sensitive).
pub fn validate_strength(value: &str) -> DomainResult<Strength> {
    Strength::ALL
        .into_iter()
        .find(|s| s.as_str() == value)
        .ok_or_else(|| {
            DomainError::validation("Strength must be 'Strong', 'Weak', or 'Average'")
        })
}

/// Join record: this hero has this power at this strength.
///
/// Wire shape is `{id, strength, hero_id, power_id}` with both foreign keys inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroPower {
    pub id: HeroPowerId,
    pub strength: Strength,
    pub hero_id: HeroId,
    pub power_id: PowerId,
}

impl Entity for HeroPower {
    type Id = HeroPowerId;

    fn id(&self) -> HeroPowerId {
        self.id
    }
}

/// Insert payload for a hero/power association.
///
/// Takes an already-validated `Strength`, so an invalid rating can never be staged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewHeroPower {
    pub strength: Strength,
    pub hero_id: HeroId,
    pub power_id: PowerId,
}

impl NewHeroPower {
    pub fn new(strength: Strength, hero_id: HeroId, power_id: PowerId) -> Self {
        Self {
            strength,
            hero_id,
            power_id,
        }
    }

    pub fn into_hero_power(self, id: HeroPowerId) -> HeroPower {
        HeroPower {
            id,
            strength: self.strength,
            hero_id: self.hero_id,
            power_id: self.power_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_the_three_ratings() {
        assert_eq!(validate_strength("Strong").unwrap(), Strength::Strong);
        assert_eq!(validate_strength("Weak").unwrap(), Strength::Weak);
        assert_eq!(validate_strength("Average").unwrap(), Strength::Average);
    }

    #[test]
    fn rejection_message_lists_the_ratings() {
        let err = validate_strength("Mighty").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Strength must be 'Strong', 'Weak', or 'Average'"
        );
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!(validate_strength("strong").is_err());
        assert!(validate_strength("AVERAGE").is_err());
        assert!(validate_strength(" Weak").is_err());
    }

    #[test]
    fn hero_power_serializes_flat_with_foreign_keys() {
        let hp = NewHeroPower::new(Strength::Average, HeroId::new(3), PowerId::new(2))
            .into_hero_power(HeroPowerId::new(1));

        assert_eq!(
            serde_json::to_value(&hp).unwrap(),
            serde_json::json!({"id": 1, "strength": "Average", "hero_id": 3, "power_id": 2})
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: anything outside the three ratings is rejected.
        #[test]
        fn unknown_ratings_are_rejected(value in "\\PC{0,12}") {
            prop_assume!(!["Strong", "Weak", "Average"].contains(&value.as_str()));
            prop_assert!(validate_strength(&value).is_err());
        }
    }
}
