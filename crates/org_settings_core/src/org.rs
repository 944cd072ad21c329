use crate::Field;

/// Read model of the organization being edited.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrgSnapshot {
    pub id: String,
    pub name: String,
    pub website: Option<String>,
    pub email: Option<String>,
    pub logo_url: Option<String>,
}

impl OrgSnapshot {
    /// Current value of a field, empty when unset.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Website => self.website.as_deref().unwrap_or_default(),
            Field::Email => self.email.as_deref().unwrap_or_default(),
        }
    }

    pub fn set_value(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Website => self.website = Some(value),
            Field::Email => self.email = Some(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadingStates {
    pub is_fetching_org: bool,
    pub is_saving_org: bool,
}
