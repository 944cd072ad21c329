use std::fmt;

/// Editable text fields of the general settings page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Name,
    Website,
    Email,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Website, Field::Email];

    /// Key used for this field in save requests.
    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Website => "website",
            Field::Email => "email",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Organization Name",
            Field::Website => "Website",
            Field::Email => "Email",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Field::Name => "Workspace name",
            Field::Website => "Your website",
            Field::Email => "Email",
        }
    }

    /// Runs the validator attached to this field. Website accepts anything.
    pub fn validate(self, value: &str) -> Result<(), ValidationError> {
        match self {
            Field::Name => validate_not_empty(value),
            Field::Website => Ok(()),
            Field::Email => validate_email(value),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Request to persist one field's new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEditIntent {
    pub org_id: String,
    pub field: Field,
    pub value: String,
}

impl FieldEditIntent {
    pub fn new(org_id: impl Into<String>, field: Field, value: impl Into<String>) -> Self {
        Self {
            org_id: org_id.into(),
            field,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    Empty,
    InvalidEmail,
}

impl ValidationError {
    pub fn message(self) -> &'static str {
        match self {
            ValidationError::Empty => "This field cannot be empty",
            ValidationError::InvalidEmail => "Please enter a valid email",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Empty)
    } else {
        Ok(())
    }
}

fn validate_email(value: &str) -> Result<(), ValidationError> {
    let candidate = value.trim();
    if candidate.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidEmail);
    }
    let Some((local, domain)) = candidate.split_once('@') else {
        return Err(ValidationError::InvalidEmail);
    };
    let domain_ok = !domain.contains('@')
        && domain.contains('.')
        && !domain.contains("..")
        && domain
            .split('.')
            .all(|label| !label.is_empty() && !label.starts_with('-') && !label.ends_with('-'));
    if local.is_empty() || !domain_ok {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_must_not_be_blank() {
        assert_eq!(Field::Name.validate("   "), Err(ValidationError::Empty));
        assert_eq!(Field::Name.validate("Acme"), Ok(()));
    }

    #[test]
    fn website_has_no_validator() {
        assert_eq!(Field::Website.validate(""), Ok(()));
        assert_eq!(Field::Website.validate("not a url"), Ok(()));
    }

    #[test]
    fn email_validator_accepts_common_addresses() {
        for ok in ["a@b.co", "first.last+tag@mail.example.org", " ops@acme.io "] {
            assert_eq!(Field::Email.validate(ok), Ok(()), "{ok}");
        }
    }

    #[test]
    fn email_validator_rejects_malformed_addresses() {
        for bad in [
            "",
            "abc",
            "@acme.io",
            "ops@",
            "ops@acme",
            "ops@@acme.io",
            "ops@acme..io",
            "ops@-acme.io",
            "o ps@acme.io",
        ] {
            assert_eq!(
                Field::Email.validate(bad),
                Err(ValidationError::InvalidEmail),
                "{bad}"
            );
        }
    }

    #[test]
    fn keys_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_key(field.key()), Some(field));
        }
        assert_eq!(Field::from_key("logo"), None);
    }
}
