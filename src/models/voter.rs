//! Voter model matching the remote voter resource.

use serde::{Deserialize, Deserializer, Serialize};

/// Which of a voter's two phone numbers is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneSlot {
    One,
    Two,
}

impl PhoneSlot {
    /// Wire field name for this slot.
    pub fn field_name(&self) -> &'static str {
        match self {
            PhoneSlot::One => "phone_number1",
            PhoneSlot::Two => "phone_number2",
        }
    }

    /// The 1-based number shown to volunteers.
    pub fn as_number(&self) -> u8 {
        match self {
            PhoneSlot::One => 1,
            PhoneSlot::Two => 2,
        }
    }
}

/// City and state of a voter's address. Other address fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
}

/// One contact target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voter {
    pub id: i64,
    /// Locator used to address flag updates
    #[serde(default)]
    pub resource_uri: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub gender: Option<String>,
    #[serde(default)]
    pub address: Address,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone_number1: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone_number2: Option<String>,
    #[serde(default)]
    pub number1_flagged: bool,
    #[serde(default)]
    pub number2_flagged: bool,
}

impl Voter {
    /// The number to dial next: number1 unless absent or flagged, then number2.
    pub fn active_number(&self) -> Option<PhoneSlot> {
        [PhoneSlot::One, PhoneSlot::Two]
            .into_iter()
            .find(|&slot| !self.is_flagged(slot) && self.phone(slot).is_some())
    }

    /// Raw digits of the active number.
    pub fn active_phone(&self) -> Option<&str> {
        self.active_number().and_then(|slot| self.phone(slot))
    }

    pub fn phone(&self, slot: PhoneSlot) -> Option<&str> {
        match slot {
            PhoneSlot::One => self.phone_number1.as_deref(),
            PhoneSlot::Two => self.phone_number2.as_deref(),
        }
    }

    pub fn is_flagged(&self, slot: PhoneSlot) -> bool {
        match slot {
            PhoneSlot::One => self.number1_flagged,
            PhoneSlot::Two => self.number2_flagged,
        }
    }

    pub fn mark_flagged(&mut self, slot: PhoneSlot) {
        match slot {
            PhoneSlot::One => self.number1_flagged = true,
            PhoneSlot::Two => self.number2_flagged = true,
        }
    }

    /// Clear both flags; every freshly downloaded voter starts unflagged.
    pub fn reset_flags(&mut self) {
        self.number1_flagged = false;
        self.number2_flagged = false;
    }

    pub fn is_contactable(&self) -> bool {
        self.active_number().is_some()
    }

    /// "First Last", plus " (G)" when a gender is known.
    pub fn display_name(&self) -> String {
        let mut name = format!("{} {}", self.first_name, self.last_name);
        if let Some(gender) = &self.gender {
            name.push_str(&format!(" ({})", gender));
        }
        name
    }

    pub fn location(&self) -> String {
        format!("{}, {}", self.address.city, self.address.state)
    }
}

/// Format a 10-digit number as `XXX-XXX-XXXX`; anything else passes through.
pub fn format_phone(raw: &str) -> String {
    if raw.len() == 10 && raw.bytes().all(|b| b.is_ascii_digit()) {
        format!("{}-{}-{}", &raw[..3], &raw[3..6], &raw[6..])
    } else {
        raw.to_string()
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
