//! Read models for the booking calendar. Built by whoever owns availability;
//! never persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::reservation::Reservation;
use crate::validation::{self, Validate, ValidationError, ValidationLimits};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    #[serde(with = "crate::date")]
    pub date: NaiveDate,
    pub is_available: bool,
    pub has_reservation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub reservations: Vec<Reservation>,
}

impl Validate for CalendarDay {
    fn validate(&self, limits: &ValidationLimits) -> Result<(), ValidationError> {
        if let Some(price) = self.price {
            validation::money("price", price)?;
        }
        if self.has_reservation == self.reservations.is_empty() {
            return Err(ValidationError::new(
                "hasReservation",
                format!(
                    "is {} but {} reservation(s) are listed",
                    self.has_reservation,
                    self.reservations.len()
                ),
            ));
        }
        for (i, reservation) in self.reservations.iter().enumerate() {
            let parent = format!("reservations[{i}]");
            if reservation.date != self.date {
                return Err(ValidationError::new(
                    format!("{parent}.fecha"),
                    format!("{} is not {}", reservation.date, self.date),
                ));
            }
            reservation.validate(limits).map_err(|e| e.nested(&parent))?;
        }
        Ok(())
    }
}

/// A bookable interval within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    #[serde(rename = "inicio")]
    pub start: String,
    #[serde(rename = "fin")]
    pub end: String,
    #[serde(rename = "disponible")]
    pub available: bool,
    #[serde(rename = "precio")]
    pub price: f64,
}

impl Validate for TimeSlot {
    fn validate(&self, _limits: &ValidationLimits) -> Result<(), ValidationError> {
        validation::time_window(("inicio", &self.start), ("fin", &self.end))?;
        validation::money("precio", self.price)
    }
}
