use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wellnest_core::{AddressId, UserId};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub owner_id: UserId,
    pub recipient: String,
    pub phone: String,
    pub postal_code: String,
    pub line1: String,
    pub line2: Option<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a new address.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    pub recipient: String,
    pub phone: String,
    pub postal_code: String,
    pub line1: String,
    pub line2: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl NewAddress {
    /// Trim fields and reject blank required ones.
    ///
    /// # Errors
    ///
    /// Returns the name of the first blank required field.
    pub fn normalized(self) -> Result<Self, &'static str> {
        let required = |value: String, field: &'static str| {
            let trimmed = value.trim().to_owned();
            if trimmed.is_empty() {
                Err(field)
            } else {
                Ok(trimmed)
            }
        };

        Ok(Self {
            recipient: required(self.recipient, "recipient")?,
            phone: required(self.phone, "phone")?,
            postal_code: required(self.postal_code, "postalCode")?,
            line1: required(self.line1, "line1")?,
            line2: self
                .line2
                .map(|l| l.trim().to_owned())
                .filter(|l| !l.is_empty()),
            is_default: self.is_default,
        })
    }
}
