use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::validation::{self, Validate, ValidationError, ValidationLimits};

/// Weekly template: the venue can be booked on `day_of_week` between the two
/// times at `base_price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityRule {
    pub id: String,
    /// 0 = Sunday, 1 = Monday, ... 6 = Saturday.
    #[serde(rename = "diaSemana")]
    pub day_of_week: u8,
    #[serde(rename = "horaInicio")]
    pub start_time: String,
    #[serde(rename = "horaFin")]
    pub end_time: String,
    #[serde(rename = "precioBase")]
    pub base_price: f64,
    #[serde(rename = "activo")]
    pub active: bool,
}

impl AvailabilityRule {
    /// `None` when `day_of_week` is out of range.
    pub fn weekday(&self) -> Option<Weekday> {
        weekday_from_index(self.day_of_week)
    }
}

/// Map the Sunday-based index used on the wire to a [`Weekday`].
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

pub fn weekday_index(day: Weekday) -> u8 {
    day.num_days_from_sunday() as u8
}

impl Validate for AvailabilityRule {
    fn validate(&self, _limits: &ValidationLimits) -> Result<(), ValidationError> {
        validation::non_blank("id", &self.id)?;
        validation::day_of_week("diaSemana", self.day_of_week)?;
        validation::time_window(("horaInicio", &self.start_time), ("horaFin", &self.end_time))?;
        validation::money("precioBase", self.base_price)
    }
}

/// A single date closed for bookings regardless of the weekly rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlackoutDate {
    pub id: String,
    #[serde(rename = "fecha", with = "crate::date")]
    pub date: NaiveDate,
    #[serde(rename = "motivo")]
    pub reason: String,
    #[serde(rename = "activo")]
    pub active: bool,
}

impl Validate for BlackoutDate {
    fn validate(&self, _limits: &ValidationLimits) -> Result<(), ValidationError> {
        validation::non_blank("id", &self.id)?;
        validation::non_blank("motivo", &self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use serde_json::json;

    #[test]
    fn rule_day_index_is_sunday_based() {
        let rule: AvailabilityRule = serde_json::from_value(json!({
            "id": "rule_sat",
            "diaSemana": 6,
            "horaInicio": "20:00",
            "horaFin": "04:00",
            "precioBase": 520000,
            "activo": true
        }))
        .unwrap();
        assert_eq!(rule.weekday(), Some(Weekday::Sat));
        assert!(rule.validate(&ValidationLimits::default()).is_ok());

        let sunday = NaiveDate::from_ymd_opt(2025, 6, 22).unwrap();
        assert_eq!(weekday_index(sunday.weekday()), 0);
        for i in 0..=6 {
            assert_eq!(weekday_from_index(i).map(weekday_index), Some(i));
        }
    }

    #[test]
    fn rule_rejects_out_of_range_day() {
        let rule = AvailabilityRule {
            id: "rule_x".into(),
            day_of_week: 7,
            start_time: "10:00".into(),
            end_time: "12:00".into(),
            base_price: 1000.0,
            active: false,
        };
        assert_eq!(rule.weekday(), None);
        assert_eq!(rule.validate(&ValidationLimits::default()).unwrap_err().field, "diaSemana");
    }

    #[test]
    fn rule_rejects_negative_day_at_shape_level() {
        let raw = json!({
            "id": "rule_x",
            "diaSemana": -1,
            "horaInicio": "10:00",
            "horaFin": "12:00",
            "precioBase": 1000,
            "activo": true
        });
        assert!(serde_json::from_value::<AvailabilityRule>(raw).is_err());
    }

    #[test]
    fn blackout_date_needs_reason() {
        let mut b: BlackoutDate = serde_json::from_value(json!({
            "id": "bo_1",
            "fecha": "2025-12-25",
            "motivo": "Navidad",
            "activo": true
        }))
        .unwrap();
        assert_eq!(b.date, NaiveDate::from_ymd_opt(2025, 12, 25).unwrap());
        assert!(b.validate(&ValidationLimits::default()).is_ok());

        b.reason = String::new();
        assert_eq!(b.validate(&ValidationLimits::default()).unwrap_err().field, "motivo");
    }
}
