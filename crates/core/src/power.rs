use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::id::PowerId;

/// Minimum description length, in characters.
pub const MIN_DESCRIPTION_LEN: usize = 20;

/// Check the description-length invariant.
///
/// Length is counted in characters, not bytes.
pub fn validate_description(text: &str) -> DomainResult<()> {
    if text.chars().count() < MIN_DESCRIPTION_LEN {
        return Err(DomainError::validation(
            "Description must be at least 20 characters long",
        ));
    }
    Ok(())
}

/// An ability definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Power {
    pub id: PowerId,
    pub name: String,
    pub description: String,
}

impl Power {
    /// Build the next state of this power with a new description.
    ///
    /// `self` is left untouched; callers persist the returned value and only
    /// then treat it as current.
    pub fn with_description(&self, description: impl Into<String>) -> DomainResult<Power> {
        let description = description.into();
        validate_description(&description)?;

        Ok(Power {
            id: self.id,
            name: self.name.clone(),
            description,
        })
    }
}

impl Entity for Power {
    type Id = PowerId;

    fn id(&self) -> PowerId {
        self.id
    }
}

/// Insert payload for a power. Enforces the same description invariant as updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPower {
    name: String,
    description: String,
}

impl NewPower {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        let description = description.into();

        if name.trim().is_empty() {
            return Err(DomainError::validation("Power name cannot be empty"));
        }
        validate_description(&description)?;

        Ok(Self { name, description })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn into_power(self, id: PowerId) -> Power {
        Power {
            id,
            name: self.name,
            description: self.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn flight() -> Power {
        NewPower::new("flight", "gives the wielder the ability to fly through the skies")
            .unwrap()
            .into_power(PowerId::new(1))
    }

    #[test]
    fn short_description_is_rejected_with_client_message() {
        let err = validate_description("short").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Description must be at least 20 characters long"
        );
    }

    #[test]
    fn boundary_is_inclusive() {
        assert!(validate_description(&"a".repeat(19)).is_err());
        assert!(validate_description(&"a".repeat(20)).is_ok());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 19 multi-byte characters: more than 20 bytes, still too short.
        assert!(validate_description(&"é".repeat(19)).is_err());
        assert!(validate_description(&"é".repeat(20)).is_ok());
    }

    #[test]
    fn with_description_leaves_original_untouched_on_failure() {
        let power = flight();
        let before = power.clone();

        assert!(power.with_description("too short").is_err());
        assert_eq!(power, before);
    }

    #[test]
    fn with_description_returns_updated_copy() {
        let power = flight();
        let updated = power
            .with_description("lets the wielder soar at supersonic speed")
            .unwrap();

        assert_eq!(updated.id(), power.id());
        assert_eq!(updated.name, "flight");
        assert_eq!(updated.description, "lets the wielder soar at supersonic speed");
        assert_ne!(power.description, updated.description);
    }

    #[test]
    fn new_power_enforces_description_invariant() {
        assert!(matches!(
            NewPower::new("flight", "flies"),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            NewPower::new(" ", "a perfectly long enough description"),
            Err(DomainError::Validation(_))
        ));
    }

    mod properties {
        use super::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: every string under 20 characters fails validation.
            #[test]
            fn short_descriptions_always_fail(text in "\\PC{0,19}") {
                prop_assert!(validate_description(&text).is_err());
            }

            /// Property: every string of 20 or more characters passes validation.
            #[test]
            fn long_descriptions_always_pass(text in "\\PC{20,80}") {
                prop_assert!(validate_description(&text).is_ok());
            }
        }
    }
}
