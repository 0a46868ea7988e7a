use serde::Deserialize;

use crate::models::{wire::datetime_local, MeetingDraft, TripDraft};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
    fn push(&mut self, field: &'static str, message: &'static str) {
        self.0.push(FieldError { field, message });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// First message for `field`, or an empty string.
    pub fn message_for(&self, field: &str) -> &'static str {
        self.0
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message)
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start_trip: String,
    #[serde(default)]
    pub end_trip: String,
    /// Month filter active when the form was submitted.
    #[serde(default)]
    pub month: String,
}

impl TripForm {
    pub fn validate(&self) -> Result<TripDraft, FormErrors> {
        let mut errors = FormErrors::default();
        let title = required(&self.title, "title", "Title is required", &mut errors);
        let description = required(
            &self.description,
            "description",
            "Description is required",
            &mut errors,
        );
        let start_trip = instant(
            &self.start_trip,
            "startTrip",
            "Start date is required",
            "Start date must be a valid date",
            &mut errors,
        );
        let end_trip = instant(
            &self.end_trip,
            "endTrip",
            "End date is required",
            "End date must be a valid date",
            &mut errors,
        );

        match (title, description, start_trip, end_trip) {
            (Some(title), Some(description), Some(start_trip), Some(end_trip))
                if errors.is_empty() =>
            {
                Ok(TripDraft {
                    title,
                    description,
                    start_trip,
                    end_trip,
                })
            }
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeetingForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl MeetingForm {
    pub fn validate(&self) -> Result<MeetingDraft, FormErrors> {
        let mut errors = FormErrors::default();
        let title = required(&self.title, "title", "Title is required", &mut errors);
        let description = required(
            &self.description,
            "description",
            "Description is required",
            &mut errors,
        );
        match (title, description) {
            (Some(title), Some(description)) => Ok(MeetingDraft { title, description }),
            _ => Err(errors),
        }
    }
}

fn required(
    raw: &str,
    field: &'static str,
    message: &'static str,
    errors: &mut FormErrors,
) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.push(field, message);
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn instant(
    raw: &str,
    field: &'static str,
    missing: &'static str,
    invalid: &'static str,
    errors: &mut FormErrors,
) -> Option<chrono::NaiveDateTime> {
    if raw.trim().is_empty() {
        errors.push(field, missing);
        return None;
    }
    let parsed = datetime_local::parse(raw);
    if parsed.is_none() {
        errors.push(field, invalid);
    }
    parsed
}
