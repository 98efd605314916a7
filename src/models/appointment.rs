use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Service,
    Name,
    Email,
    Phone,
    Date,
    Time,
}

impl Field {
    /// Required fields in prompting priority order.
    pub const ALL: [Field; 6] = [
        Field::Service,
        Field::Name,
        Field::Email,
        Field::Phone,
        Field::Date,
        Field::Time,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Service => "service",
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Date => "date",
            Field::Time => "time",
        }
    }
}

/// A partially completed booking. Absent and empty values both count as unfilled.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Appointment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Appointment {
    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::Service => &self.service,
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Date => &self.date,
            Field::Time => &self.time,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }

    pub fn is_filled(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    /// Stores `value` only if the field is still empty. Returns whether it was stored.
    pub fn fill(&mut self, field: Field, value: String) -> bool {
        if self.is_filled(field) {
            return false;
        }
        let slot = match field {
            Field::Service => &mut self.service,
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::Date => &mut self.date,
            Field::Time => &mut self.time,
        };
        *slot = Some(value);
        true
    }

    pub fn missing(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| !self.is_filled(*f))
            .collect()
    }

    /// Fields filled in `self` that were empty in `before`.
    pub fn newly_filled(&self, before: &Appointment) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.is_filled(*f) && !before.is_filled(*f))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }
}
