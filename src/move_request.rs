use std::{error::Error, fmt};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::selection::SelectionState;

const PICKUP_REQUIRED: &str = "Pickup location is required";
const DROPOFF_REQUIRED: &str = "Dropoff location is required";
const DATE_TIME_REQUIRED: &str = "Pickup date & time are required";
const NAME_REQUIRED: &str = "Name is required";
const EMAIL_REQUIRED: &str = "Email is required";
const CONTACT_NUMBER_REQUIRED: &str = "Contact number is required";
const CONTACT_NUMBER_INVALID: &str = "Please enter a valid 10-digit phone number";

const PHONE_DIGITS: usize = 10;

/// The signed-in user, as far as a move request cares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Customer {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// What the user typed into the booking form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteForm {
    pub pickup: String,
    pub dropoff: String,
    pub contact_number: String,
}

/// Per-field validation failures, `None` where the field is fine.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub pickup: Option<&'static str>,
    pub dropoff: Option<&'static str>,
    pub date_time: Option<&'static str>,
    pub name: Option<&'static str>,
    pub email: Option<&'static str>,
    pub contact_number: Option<&'static str>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.messages().next().is_none()
    }

    pub fn messages(&self) -> impl Iterator<Item = &'static str> {
        [
            self.pickup,
            self.dropoff,
            self.date_time,
            self.name,
            self.email,
            self.contact_number,
        ]
        .into_iter()
        .flatten()
    }
}

impl Error for FieldErrors {}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().collect::<Vec<_>>().join("; "))
    }
}

/// A validated request, ready to be sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub pickup: String,
    pub dropoff: String,
    /// Local wall-clock time of the pickup.
    pub pickup_at: NaiveDateTime,
    /// Digits only.
    pub phone: String,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
struct MoveRequestPayload<'a> {
    pickup: &'a str,
    dropoff: &'a str,
    move_datetime: DateTime<Utc>,
    phone: &'a str,
    email: &'a str,
    name: &'a str,
}

impl QuoteForm {
    /// Checks every field at once so the form can flag them all together.
    pub fn validate(
        &self,
        customer: &Customer,
        selection: &SelectionState,
    ) -> Result<MoveRequest, FieldErrors> {
        let mut errors = FieldErrors::default();

        if self.pickup.trim().is_empty() {
            errors.pickup = Some(PICKUP_REQUIRED);
        }
        if self.dropoff.trim().is_empty() {
            errors.dropoff = Some(DROPOFF_REQUIRED);
        }
        let pickup_at = selection.to_pickup_timestamp().ok();
        if pickup_at.is_none() {
            errors.date_time = Some(DATE_TIME_REQUIRED);
        }
        let name = non_blank(customer.name.as_deref());
        if name.is_none() {
            errors.name = Some(NAME_REQUIRED);
        }
        let email = non_blank(customer.email.as_deref());
        if email.is_none() {
            errors.email = Some(EMAIL_REQUIRED);
        }
        let phone = match normalise_phone(&self.contact_number) {
            Ok(phone) => Some(phone),
            Err(message) => {
                errors.contact_number = Some(message);
                None
            }
        };

        match (pickup_at, name, email, phone) {
            (Some(pickup_at), Some(name), Some(email), Some(phone)) if errors.is_empty() => {
                Ok(MoveRequest {
                    pickup: self.pickup.clone(),
                    dropoff: self.dropoff.clone(),
                    pickup_at,
                    phone,
                    email: email.to_owned(),
                    name: name.to_owned(),
                })
            }
            _ => Err(errors),
        }
    }
}

impl MoveRequest {
    /// The JSON body for the backend, with the pickup time resolved in `tz`
    /// and sent as UTC.
    pub fn to_json<Tz: TimeZone>(&self, tz: &Tz) -> Result<String> {
        let move_datetime = tz
            .from_local_datetime(&self.pickup_at)
            .earliest()
            .ok_or_else(|| anyhow!("Pickup time {} doesn't exist locally", self.pickup_at))?
            .with_timezone(&Utc);

        let payload = MoveRequestPayload {
            pickup: &self.pickup,
            dropoff: &self.dropoff,
            move_datetime,
            phone: &self.phone,
            email: &self.email,
            name: &self.name,
        };
        serde_json::to_string(&payload).context("Failed to encode move request")
    }
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    success: bool,
    error: Option<String>,
}

/// Interprets the backend's answer to a submitted move request.
pub fn check_submit_response(body: &str) -> Result<()> {
    let response: SubmitResponse =
        serde_json::from_str(body).context("Unexpected move request response")?;
    if response.success {
        Ok(())
    } else {
        Err(anyhow!(response
            .error
            .unwrap_or_else(|| "Something went wrong".to_owned())))
    }
}

/// A move request as listed back by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequestRecord {
    pub id: String,
    pub pickup: String,
    pub dropoff: String,
    pub phone: String,
    #[serde(rename = "move_datetime")]
    pub move_datetime: DateTime<Utc>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Where the backend says a move request has got to. Unknown values are kept as sent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum RequestStatus {
    Pending,
    Confirmed,
    Cancelled,
    Other(String),
}

impl From<String> for RequestStatus {
    fn from(status: String) -> Self {
        match status.to_lowercase().as_str() {
            "pending" => RequestStatus::Pending,
            "confirmed" => RequestStatus::Confirmed,
            "cancelled" => RequestStatus::Cancelled,
            _ => RequestStatus::Other(status),
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "PENDING"),
            RequestStatus::Confirmed => write!(f, "CONFIRMED"),
            RequestStatus::Cancelled => write!(f, "CANCELLED"),
            RequestStatus::Other(status) => write!(f, "{}", status.to_uppercase()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RequestList {
    requests: Vec<MoveRequestRecord>,
}

#[derive(Debug, Deserialize)]
struct RequestListFailure {
    message: Option<String>,
}

impl MoveRequestRecord {
    /// Decodes the backend's `{ "requests": [..] }` listing. Anything else is
    /// treated as a failure and its `message`, if any, becomes the error.
    pub fn list_from_json(body: &str) -> Result<Vec<MoveRequestRecord>> {
        let value: serde_json::Value =
            serde_json::from_str(body).context("Failed to decode move request list")?;
        if value.get("requests").is_some() {
            let list: RequestList =
                serde_json::from_value(value).context("Failed to decode move request list")?;
            return Ok(list.requests);
        }

        let failure: RequestListFailure =
            serde_json::from_value(value).context("Failed to decode move request list")?;
        Err(anyhow!(failure
            .message
            .unwrap_or_else(|| "Failed to fetch requests".to_owned())))
    }

    /// e.g. "1 Jun 2025"
    pub fn display_date<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: fmt::Display,
    {
        self.move_datetime
            .with_timezone(tz)
            .format("%-d %b %Y")
            .to_string()
    }

    /// e.g. "02:00 pm"
    pub fn display_time<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: fmt::Display,
    {
        self.move_datetime
            .with_timezone(tz)
            .format("%I:%M %P")
            .to_string()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn normalise_phone(raw: &str) -> Result<String, &'static str> {
    if raw.trim().is_empty() {
        return Err(CONTACT_NUMBER_REQUIRED);
    }
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == PHONE_DIGITS {
        Ok(digits)
    } else {
        Err(CONTACT_NUMBER_INVALID)
    }
}
