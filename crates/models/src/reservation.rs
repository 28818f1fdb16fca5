use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::customer::{Customer, NewCustomer};
use crate::validation::{self, Validate, ValidationError, ValidationLimits};

/// Reservation lifecycle state. Transitions are managed elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReservationStatus {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "confirmada")]
    Confirmed,
    #[serde(rename = "completada")]
    Completed,
    #[serde(rename = "cancelada")]
    Cancelled,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 4] = [
        ReservationStatus::Pending,
        ReservationStatus::Confirmed,
        ReservationStatus::Completed,
        ReservationStatus::Cancelled,
    ];

    /// Label used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pendiente",
            ReservationStatus::Confirmed => "confirmada",
            ReservationStatus::Completed => "completada",
            ReservationStatus::Cancelled => "cancelada",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::new("estado", format!("unknown status '{s}'")))
    }
}

/// How `descuento` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiscountType {
    #[serde(rename = "porcentaje")]
    Percentage,
    #[serde(rename = "monto")]
    Amount,
}

/// A discount value resolved against its discriminator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Discount {
    /// Percentage of the base price, 0–100.
    Percentage(f64),
    /// Fixed amount subtracted from the base price.
    Amount(f64),
}

impl Discount {
    pub fn new(value: f64, kind: DiscountType) -> Self {
        match kind {
            DiscountType::Percentage => Discount::Percentage(value),
            DiscountType::Amount => Discount::Amount(value),
        }
    }

    pub fn from_parts(value: Option<f64>, kind: DiscountType) -> Option<Self> {
        value.map(|v| Self::new(v, kind))
    }

    pub fn kind(self) -> DiscountType {
        match self {
            Discount::Percentage(_) => DiscountType::Percentage,
            Discount::Amount(_) => DiscountType::Amount,
        }
    }

    /// Bounds check. `base_price` is only needed for fixed amounts and the
    /// upper bound is skipped when it is unknown.
    fn check(self, base_price: Option<f64>) -> Result<(), ValidationError> {
        match self {
            Discount::Percentage(v) => {
                validation::money("descuento", v)?;
                if v > 100.0 {
                    return Err(ValidationError::new("descuento", format!("percentage must not exceed 100 (got {v})")));
                }
            }
            Discount::Amount(v) => {
                validation::money("descuento", v)?;
                if let Some(base) = base_price {
                    if v > base + validation::MONEY_EPSILON {
                        return Err(ValidationError::new(
                            "descuento",
                            format!("amount {v} exceeds base price {base}"),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

/// A booking of the venue for an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub customer_id: String,
    #[serde(rename = "fecha", with = "crate::date")]
    pub date: NaiveDate,
    #[serde(rename = "horaInicio")]
    pub start_time: String,
    #[serde(rename = "horaFin")]
    pub end_time: String,
    #[serde(rename = "tipoEvento")]
    pub event_type: String,
    #[serde(rename = "cantidadPersonas")]
    pub party_size: u32,
    #[serde(rename = "precioBase")]
    pub base_price: f64,
    #[serde(rename = "descuento", default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    #[serde(rename = "tipoDescuento")]
    pub discount_type: DiscountType,
    #[serde(rename = "montoTotal")]
    pub total: f64,
    #[serde(rename = "seña")]
    pub deposit: f64,
    #[serde(rename = "saldoPendiente")]
    pub balance: f64,
    #[serde(rename = "estado")]
    pub status: ReservationStatus,
    pub pin: String,
    #[serde(rename = "notas", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Denormalized copy of the owning customer, present on some reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
}

impl Reservation {
    pub fn discount(&self) -> Option<Discount> {
        Discount::from_parts(self.discount, self.discount_type)
    }
}

impl Validate for Reservation {
    fn validate(&self, limits: &ValidationLimits) -> Result<(), ValidationError> {
        validation::non_blank("id", &self.id)?;
        validation::non_blank("customerId", &self.customer_id)?;
        validation::time_window(("horaInicio", &self.start_time), ("horaFin", &self.end_time))?;
        validation::non_blank("tipoEvento", &self.event_type)?;
        validation::party_size("cantidadPersonas", self.party_size, limits)?;
        validation::money("precioBase", self.base_price)?;
        if let Some(discount) = self.discount() {
            discount.check(Some(self.base_price))?;
        }
        validation::money("montoTotal", self.total)?;
        validation::money("seña", self.deposit)?;
        validation::money("saldoPendiente", self.balance)?;
        if self.deposit > self.total + validation::MONEY_EPSILON {
            return Err(ValidationError::new(
                "seña",
                format!("deposit {} exceeds total {}", self.deposit, self.total),
            ));
        }
        if !validation::approx_eq(self.balance, self.total - self.deposit) {
            return Err(ValidationError::new(
                "saldoPendiente",
                format!(
                    "expected {:.2} (montoTotal - seña), got {}",
                    self.total - self.deposit,
                    self.balance
                ),
            ));
        }
        validation::pin("pin", &self.pin, limits)?;
        if self.updated_at < self.created_at {
            return Err(ValidationError::new("updatedAt", "must not precede createdAt"));
        }
        if let Some(customer) = &self.customer {
            if customer.id != self.customer_id {
                return Err(ValidationError::new(
                    "customer.id",
                    format!("'{}' does not match customerId '{}'", customer.id, self.customer_id),
                ));
            }
            customer.validate(limits).map_err(|e| e.nested("customer"))?;
        }
        Ok(())
    }
}

/// Form payload for a new reservation. The customer is either referenced by
/// id or described inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_data: Option<NewCustomer>,
    #[serde(rename = "fecha", with = "crate::date")]
    pub date: NaiveDate,
    #[serde(rename = "horaInicio")]
    pub start_time: String,
    #[serde(rename = "horaFin")]
    pub end_time: String,
    #[serde(rename = "tipoEvento")]
    pub event_type: String,
    #[serde(rename = "cantidadPersonas")]
    pub party_size: u32,
    #[serde(rename = "precioBase")]
    pub base_price: f64,
    #[serde(rename = "descuento", default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    #[serde(rename = "tipoDescuento")]
    pub discount_type: DiscountType,
    #[serde(rename = "seña")]
    pub deposit: f64,
    #[serde(rename = "notas", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn customer_reference(
    customer_id: Option<&str>,
    customer_data: Option<&NewCustomer>,
    limits: &ValidationLimits,
) -> Result<(), ValidationError> {
    match (customer_id, customer_data) {
        (Some(_), Some(_)) => Err(ValidationError::new(
            "customerData",
            "must not be sent together with customerId",
        )),
        (Some(id), None) => validation::non_blank("customerId", id),
        (None, Some(data)) => data.validate(limits).map_err(|e| e.nested("customerData")),
        (None, None) => Ok(()),
    }
}

impl Validate for CreateReservationData {
    fn validate(&self, limits: &ValidationLimits) -> Result<(), ValidationError> {
        if self.customer_id.is_none() && self.customer_data.is_none() {
            return Err(ValidationError::new("customerId", "either customerId or customerData is required"));
        }
        customer_reference(self.customer_id.as_deref(), self.customer_data.as_ref(), limits)?;
        validation::time_window(("horaInicio", &self.start_time), ("horaFin", &self.end_time))?;
        validation::non_blank("tipoEvento", &self.event_type)?;
        validation::party_size("cantidadPersonas", self.party_size, limits)?;
        validation::money("precioBase", self.base_price)?;
        if let Some(discount) = Discount::from_parts(self.discount, self.discount_type) {
            discount.check(Some(self.base_price))?;
        }
        validation::money("seña", self.deposit)?;
        if self.deposit > self.base_price + validation::MONEY_EPSILON {
            return Err(ValidationError::new(
                "seña",
                format!("deposit {} exceeds base price {}", self.deposit, self.base_price),
            ));
        }
        Ok(())
    }
}

/// Partial update of a reservation. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationData {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_data: Option<NewCustomer>,
    #[serde(
        rename = "fecha",
        default,
        with = "crate::date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<NaiveDate>,
    #[serde(rename = "horaInicio", default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(rename = "horaFin", default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(rename = "tipoEvento", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(rename = "cantidadPersonas", default, skip_serializing_if = "Option::is_none")]
    pub party_size: Option<u32>,
    #[serde(rename = "precioBase", default, skip_serializing_if = "Option::is_none")]
    pub base_price: Option<f64>,
    #[serde(rename = "descuento", default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    #[serde(rename = "tipoDescuento", default, skip_serializing_if = "Option::is_none")]
    pub discount_type: Option<DiscountType>,
    #[serde(rename = "seña", default, skip_serializing_if = "Option::is_none")]
    pub deposit: Option<f64>,
    #[serde(rename = "notas", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(rename = "estado", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReservationStatus>,
}

impl UpdateReservationData {
    /// True when nothing besides the id is set.
    pub fn is_empty(&self) -> bool {
        *self == UpdateReservationData { id: self.id.clone(), ..Default::default() }
    }
}

impl Validate for UpdateReservationData {
    fn validate(&self, limits: &ValidationLimits) -> Result<(), ValidationError> {
        validation::non_blank("id", &self.id)?;
        customer_reference(self.customer_id.as_deref(), self.customer_data.as_ref(), limits)?;
        match (&self.start_time, &self.end_time) {
            (Some(start), Some(end)) => {
                validation::time_window(("horaInicio", start), ("horaFin", end))?
            }
            (Some(start), None) => {
                validation::parse_time_of_day("horaInicio", start)?;
            }
            (None, Some(end)) => {
                validation::parse_time_of_day("horaFin", end)?;
            }
            (None, None) => {}
        }
        if let Some(event_type) = &self.event_type {
            validation::non_blank("tipoEvento", event_type)?;
        }
        if let Some(size) = self.party_size {
            validation::party_size("cantidadPersonas", size, limits)?;
        }
        if let Some(base) = self.base_price {
            validation::money("precioBase", base)?;
        }
        match (self.discount, self.discount_type) {
            (Some(v), Some(kind)) => Discount::new(v, kind).check(self.base_price)?,
            (Some(v), None) => validation::money("descuento", v)?,
            _ => {}
        }
        if let Some(deposit) = self.deposit {
            validation::money("seña", deposit)?;
            if let Some(base) = self.base_price {
                if deposit > base + validation::MONEY_EPSILON {
                    return Err(ValidationError::new(
                        "seña",
                        format!("deposit {deposit} exceeds base price {base}"),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn limits() -> ValidationLimits {
        ValidationLimits::default()
    }

    fn reservation_json() -> serde_json::Value {
        json!({
            "id": "res_100",
            "customerId": "cus_01",
            "fecha": "2025-06-21T03:00:00.000Z",
            "horaInicio": "20:00",
            "horaFin": "02:00",
            "tipoEvento": "Cumpleaños de 15",
            "cantidadPersonas": 120,
            "precioBase": 450000.0,
            "descuento": 10,
            "tipoDescuento": "porcentaje",
            "montoTotal": 405000.0,
            "seña": 100000.0,
            "saldoPendiente": 305000.0,
            "estado": "confirmada",
            "pin": "4821",
            "createdAt": "2025-02-01T12:00:00Z",
            "updatedAt": "2025-02-03T08:15:00Z"
        })
    }

    fn reservation() -> Reservation {
        serde_json::from_value(reservation_json()).unwrap()
    }

    #[test]
    fn reads_front_end_payload() {
        let r = reservation();
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2025, 6, 21).unwrap());
        assert_eq!(r.status, ReservationStatus::Confirmed);
        assert_eq!(r.discount(), Some(Discount::Percentage(10.0)));
        assert!(r.customer.is_none());
        assert!(r.validate(&limits()).is_ok());

        let out = serde_json::to_value(&r).unwrap();
        assert_eq!(out["fecha"], "2025-06-21");
        assert_eq!(out["seña"], 100000.0);
        assert_eq!(out["tipoDescuento"], "porcentaje");
        assert!(out.get("notas").is_none());
        assert!(out.get("customer").is_none());
    }

    #[test]
    fn status_only_takes_declared_labels() {
        for status in ReservationStatus::ALL {
            let parsed: ReservationStatus = serde_json::from_value(json!(status.as_str())).unwrap();
            assert_eq!(parsed, status);
            assert_eq!(status.to_string().parse::<ReservationStatus>().unwrap(), status);
        }
        assert!(serde_json::from_value::<ReservationStatus>(json!("pending")).is_err());
        assert!("archivada".parse::<ReservationStatus>().is_err());

        let mut raw = reservation_json();
        raw["estado"] = json!("borrador");
        assert!(serde_json::from_value::<Reservation>(raw).is_err());
    }

    #[test]
    fn discount_type_only_takes_declared_labels() {
        let mut raw = reservation_json();
        raw["tipoDescuento"] = json!("monto");
        raw["descuento"] = json!(45000.0);
        let r: Reservation = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(r.discount(), Some(Discount::Amount(45000.0)));
        assert_eq!(r.discount().map(Discount::kind), Some(DiscountType::Amount));

        raw["tipoDescuento"] = json!("fijo");
        assert!(serde_json::from_value::<Reservation>(raw).is_err());
    }

    #[test]
    fn discount_bounds_depend_on_type() {
        let mut r = reservation();
        r.discount = Some(120.0);
        assert_eq!(r.validate(&limits()).unwrap_err().field, "descuento");

        r.discount_type = DiscountType::Amount;
        assert!(r.validate(&limits()).is_ok());

        r.discount = Some(500000.0);
        assert_eq!(r.validate(&limits()).unwrap_err().field, "descuento");

        r.discount = None;
        assert!(r.validate(&limits()).is_ok());
    }

    #[test]
    fn balance_must_match_total_minus_deposit() {
        let mut r = reservation();
        r.balance = 300000.0;
        let err = r.validate(&limits()).unwrap_err();
        assert_eq!(err.field, "saldoPendiente");

        r.balance = 305000.004;
        assert!(r.validate(&limits()).is_ok());
    }

    #[test]
    fn deposit_cannot_exceed_total() {
        let mut r = reservation();
        r.deposit = 410000.0;
        r.balance = 0.0;
        assert_eq!(r.validate(&limits()).unwrap_err().field, "seña");
    }

    #[test]
    fn pin_and_window_checked() {
        let mut r = reservation();
        r.pin = "12".into();
        assert_eq!(r.validate(&limits()).unwrap_err().field, "pin");

        let mut r = reservation();
        r.end_time = "20:00".into();
        assert_eq!(r.validate(&limits()).unwrap_err().field, "horaFin");
    }

    #[test]
    fn embedded_customer_must_match() {
        let mut raw = reservation_json();
        raw["customer"] = json!({
            "id": "cus_02",
            "nombre": "Martín",
            "telefono": "1155550000",
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z"
        });
        let mut r: Reservation = serde_json::from_value(raw).unwrap();
        assert_eq!(r.validate(&limits()).unwrap_err().field, "customer.id");

        if let Some(c) = r.customer.as_mut() {
            c.id = "cus_01".into();
            c.phone = "n/a".into();
        }
        assert_eq!(r.validate(&limits()).unwrap_err().field, "customer.telefono");
    }

    fn create_json() -> serde_json::Value {
        json!({
            "customerData": {
                "nombre": "Sofía Ruiz",
                "telefono": "11 6000-1234",
                "email": "sofia@example.com"
            },
            "fecha": "2025-09-13",
            "horaInicio": "13:00",
            "horaFin": "18:00",
            "tipoEvento": "Bautismo",
            "cantidadPersonas": 40,
            "precioBase": 200000,
            "tipoDescuento": "monto",
            "seña": 50000
        })
    }

    #[test]
    fn create_with_inline_customer() {
        let data: CreateReservationData = serde_json::from_value(create_json()).unwrap();
        assert!(data.customer_id.is_none());
        assert_eq!(data.discount, None);
        assert!(data.validate(&limits()).is_ok());
    }

    #[test]
    fn create_needs_exactly_one_customer_reference() {
        let mut raw = create_json();
        raw["customerId"] = json!("cus_01");
        let data: CreateReservationData = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(data.validate(&limits()).unwrap_err().field, "customerData");

        raw.as_object_mut().unwrap().remove("customerData");
        let data: CreateReservationData = serde_json::from_value(raw.clone()).unwrap();
        assert!(data.validate(&limits()).is_ok());

        raw.as_object_mut().unwrap().remove("customerId");
        let data: CreateReservationData = serde_json::from_value(raw).unwrap();
        assert_eq!(data.validate(&limits()).unwrap_err().field, "customerId");
    }

    #[test]
    fn create_reports_nested_customer_field() {
        let mut raw = create_json();
        raw["customerData"]["email"] = json!("sofia.example.com");
        let data: CreateReservationData = serde_json::from_value(raw).unwrap();
        assert_eq!(data.validate(&limits()).unwrap_err().field, "customerData.email");
    }

    #[test]
    fn create_respects_party_limit() {
        let data: CreateReservationData = serde_json::from_value(create_json()).unwrap();
        let capped = ValidationLimits { max_party_size: Some(30), ..Default::default() };
        assert_eq!(data.validate(&capped).unwrap_err().field, "cantidadPersonas");
    }

    #[test]
    fn negative_party_size_is_a_shape_error() {
        let mut raw = create_json();
        raw["cantidadPersonas"] = json!(-3);
        assert!(serde_json::from_value::<CreateReservationData>(raw).is_err());
    }

    #[test]
    fn update_is_partial() {
        let data: UpdateReservationData =
            serde_json::from_value(json!({ "id": "res_100", "estado": "cancelada" })).unwrap();
        assert_eq!(data.status, Some(ReservationStatus::Cancelled));
        assert!(!data.is_empty());
        assert!(data.validate(&limits()).is_ok());

        let out = serde_json::to_value(&data).unwrap();
        assert_eq!(out, json!({ "id": "res_100", "estado": "cancelada" }));

        let empty: UpdateReservationData = serde_json::from_value(json!({ "id": "res_100" })).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn update_checks_present_fields() {
        let data: UpdateReservationData = serde_json::from_value(json!({
            "id": "res_100",
            "fecha": "2025-07-01",
            "horaInicio": "9pm"
        }))
        .unwrap();
        assert_eq!(data.date, NaiveDate::from_ymd_opt(2025, 7, 1));
        assert_eq!(data.validate(&limits()).unwrap_err().field, "horaInicio");

        let data: UpdateReservationData = serde_json::from_value(json!({
            "id": "res_100",
            "descuento": 150,
            "tipoDescuento": "porcentaje"
        }))
        .unwrap();
        assert_eq!(data.validate(&limits()).unwrap_err().field, "descuento");

        let data: UpdateReservationData = serde_json::from_value(json!({
            "id": "res_100",
            "descuento": 150000,
            "tipoDescuento": "monto"
        }))
        .unwrap();
        assert!(data.validate(&limits()).is_ok());

        let data: UpdateReservationData = serde_json::from_value(json!({ "id": "" })).unwrap();
        assert_eq!(data.validate(&limits()).unwrap_err().field, "id");
    }

    #[test]
    fn update_deposit_bounded_by_base_price_when_both_sent() {
        let data: UpdateReservationData = serde_json::from_value(json!({
            "id": "res_100",
            "precioBase": 100,
            "seña": 500
        }))
        .unwrap();
        assert_eq!(data.validate(&limits()).unwrap_err().field, "seña");

        let data: UpdateReservationData =
            serde_json::from_value(json!({ "id": "res_100", "seña": 500 })).unwrap();
        assert!(data.validate(&limits()).is_ok());

        let data: UpdateReservationData = serde_json::from_value(json!({
            "id": "res_100",
            "precioBase": 500,
            "seña": 500
        }))
        .unwrap();
        assert!(data.validate(&limits()).is_ok());
    }
}
