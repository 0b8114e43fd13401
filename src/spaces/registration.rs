use serde::Serialize;
use thiserror::Error;

use crate::models::Amenity;

/// Someone offering a room in their home as a prayer space.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SpaceRegistration {
    pub name: String,
    pub capacity: u32,
    pub available_hours: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub amenities: Vec<Amenity>,
    pub notes: Option<String>,
    pub consent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Error)]
#[error("registration has {} invalid field(s)", .0.len())]
pub struct RegistrationError(pub Vec<FieldError>);

fn min_len(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: &str,
    min: usize,
    message: &'static str,
) {
    if value.trim().chars().count() < min {
        errors.push(FieldError { field, message });
    }
}

impl SpaceRegistration {
    /// Check every field and report all problems together.
    pub fn validate(&self) -> Result<(), RegistrationError> {
        let mut errors = Vec::new();

        min_len(&mut errors, "name", &self.name, 3, "Space name must be at least 3 characters.");
        if self.capacity < 1 {
            errors.push(FieldError {
                field: "capacity",
                message: "Capacity must be at least 1.",
            });
        }
        min_len(
            &mut errors,
            "available_hours",
            &self.available_hours,
            3,
            "Please specify available hours.",
        );
        min_len(&mut errors, "street", &self.street, 3, "Please enter a street address.");
        min_len(&mut errors, "city", &self.city, 2, "Please enter a city.");
        min_len(&mut errors, "state", &self.state, 2, "Please enter a state.");
        min_len(&mut errors, "zip", &self.zip, 5, "Please enter a valid zip code.");
        if !self.consent {
            errors.push(FieldError {
                field: "consent",
                message: "You must agree to the terms to proceed.",
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(RegistrationError(errors))
        }
    }
}
