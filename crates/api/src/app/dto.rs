use serde::Deserialize;

// -------------------------
// Request DTOs
// -------------------------
//
// Every field is optional so handlers can report a missing field with their
// own message instead of a deserialization failure.

/// Body of `PATCH /powers/:id`.
#[derive(Debug, Deserialize)]
pub struct UpdatePowerRequest {
    pub description: Option<String>,
}

impl UpdatePowerRequest {
    /// The new description, if present and non-empty.
    pub fn description(self) -> Option<String> {
        self.description.filter(|d| !d.is_empty())
    }
}

/// Body of `POST /hero_powers`.
#[derive(Debug, Deserialize)]
pub struct CreateHeroPowerRequest {
    pub strength: Option<String>,
    pub hero_id: Option<i64>,
    pub power_id: Option<i64>,
}

/// `CreateHeroPowerRequest` with every field present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateHeroPowerFields {
    pub strength: String,
    pub hero_id: i64,
    pub power_id: i64,
}

impl CreateHeroPowerRequest {
    /// All three fields, or `None` if any is absent, null, empty or zero.
    pub fn required_fields(self) -> Option<CreateHeroPowerFields> {
        let strength = self.strength.filter(|s| !s.is_empty())?;
        let hero_id = self.hero_id.filter(|id| *id != 0)?;
        let power_id = self.power_id.filter(|id| *id != 0)?;

        Some(CreateHeroPowerFields {
            strength,
            hero_id,
            power_id,
        })
    }
}
