use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::UnknownField;

/// One input of the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    Email,
    Phone,
    Organization,
    Country,
    City,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::Name,
        FormField::Email,
        FormField::Phone,
        FormField::Organization,
        FormField::Country,
        FormField::City,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Phone => "phone",
            FormField::Organization => "organization",
            FormField::Country => "country",
            FormField::City => "city",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormField {
    type Err = UnknownField;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "name" | "fullName" | "full_name" => Ok(FormField::Name),
            "email" => Ok(FormField::Email),
            "phone" => Ok(FormField::Phone),
            "organization" => Ok(FormField::Organization),
            "country" => Ok(FormField::Country),
            "city" => Ok(FormField::City),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// The six-field contact record, also the shape of a `registration_requests` row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub organization: String,
    pub country: String,
    pub city: String,
}

impl RegistrationPayload {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Phone => &self.phone,
            FormField::Organization => &self.organization,
            FormField::Country => &self.country,
            FormField::City => &self.city,
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        let slot = match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Phone => &mut self.phone,
            FormField::Organization => &mut self.organization,
            FormField::Country => &mut self.country,
            FormField::City => &mut self.city,
        };
        *slot = value;
    }

    /// Fields whose value is empty once surrounding whitespace is removed.
    pub fn missing_fields(&self) -> Vec<FormField> {
        FormField::ALL
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }

    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            organization: self.organization.trim().to_string(),
            country: self.country.trim().to_string(),
            city: self.city.trim().to_string(),
        }
    }

    pub fn confirmation_request(&self) -> ConfirmationRequest {
        ConfirmationRequest {
            name: self.name.clone(),
            email: self.email.clone(),
            organization: self.organization.clone(),
        }
    }
}

/// Reduced payload handed to the confirmation email function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationRequest {
    pub name: String,
    pub email: String,
    pub organization: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Home,
    Register,
    ThankYou,
}
