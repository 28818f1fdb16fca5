//! Typed checking of raw JSON payloads.
//!
//! Deserializing into the model type is the shape check (field types,
//! optionality, discriminator labels); `Validate` covers the rest.

use std::fmt;

use clap::ValueEnum;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use venue_models::{
    AdminUser, AvailabilityRule, BlackoutDate, CalendarDay, CreateReservationData, Customer,
    NewCustomer, Reservation, TimeSlot, UpdateReservationData, Validate, ValidationError,
    ValidationLimits,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PayloadKind {
    Customer,
    NewCustomer,
    Reservation,
    CreateReservation,
    UpdateReservation,
    AvailabilityRule,
    BlackoutDate,
    CalendarDay,
    TimeSlot,
    AdminUser,
}

impl PayloadKind {
    /// Parse the kebab-case name used on the CLI and in URLs.
    pub fn parse(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }

    pub fn name(self) -> &'static str {
        match self {
            PayloadKind::Customer => "customer",
            PayloadKind::NewCustomer => "new-customer",
            PayloadKind::Reservation => "reservation",
            PayloadKind::CreateReservation => "create-reservation",
            PayloadKind::UpdateReservation => "update-reservation",
            PayloadKind::AvailabilityRule => "availability-rule",
            PayloadKind::BlackoutDate => "blackout-date",
            PayloadKind::CalendarDay => "calendar-day",
            PayloadKind::TimeSlot => "time-slot",
            PayloadKind::AdminUser => "admin-user",
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("malformed {kind} payload: {source}")]
    Shape {
        kind: PayloadKind,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid {kind} payload: {source}")]
    Invalid {
        kind: PayloadKind,
        #[source]
        source: ValidationError,
    },
}

/// Check `value` as a payload of `kind` and return it re-serialized in
/// canonical form (dates as `YYYY-MM-DD`, absent optionals dropped).
pub fn check(kind: PayloadKind, value: Value, limits: &ValidationLimits) -> Result<Value, PayloadError> {
    match kind {
        PayloadKind::Customer => normalize::<Customer>(kind, value, limits),
        PayloadKind::NewCustomer => normalize::<NewCustomer>(kind, value, limits),
        PayloadKind::Reservation => normalize::<Reservation>(kind, value, limits),
        PayloadKind::CreateReservation => normalize::<CreateReservationData>(kind, value, limits),
        PayloadKind::UpdateReservation => normalize::<UpdateReservationData>(kind, value, limits),
        PayloadKind::AvailabilityRule => normalize::<AvailabilityRule>(kind, value, limits),
        PayloadKind::BlackoutDate => normalize::<BlackoutDate>(kind, value, limits),
        PayloadKind::CalendarDay => normalize::<CalendarDay>(kind, value, limits),
        PayloadKind::TimeSlot => normalize::<TimeSlot>(kind, value, limits),
        PayloadKind::AdminUser => normalize::<AdminUser>(kind, value, limits),
    }
}

fn normalize<T>(kind: PayloadKind, value: Value, limits: &ValidationLimits) -> Result<Value, PayloadError>
where
    T: DeserializeOwned + Serialize + Validate,
{
    let parsed: T = serde_json::from_value(value).map_err(|source| PayloadError::Shape { kind, source })?;
    parsed
        .validate(limits)
        .map_err(|source| PayloadError::Invalid { kind, source })?;
    serde_json::to_value(&parsed).map_err(|source| PayloadError::Shape { kind, source })
}

// --- Samples ---

fn sample_customer() -> Value {
    json!({
        "id": "cus_0001",
        "nombre": "Valentina Gómez",
        "telefono": "+54 9 11 5555-0101",
        "instagram": "@vale.gomez",
        "email": "vale.gomez@example.com",
        "createdAt": "2025-03-01T12:00:00Z",
        "updatedAt": "2025-03-02T09:30:00Z"
    })
}

fn sample_reservation() -> Value {
    json!({
        "id": "res_0001",
        "customerId": "cus_0001",
        "fecha": "2025-10-18",
        "horaInicio": "21:00",
        "horaFin": "04:00",
        "tipoEvento": "Cumpleaños de 15",
        "cantidadPersonas": 110,
        "precioBase": 600000.0,
        "descuento": 10.0,
        "tipoDescuento": "porcentaje",
        "montoTotal": 540000.0,
        "seña": 150000.0,
        "saldoPendiente": 390000.0,
        "estado": "confirmada",
        "pin": "7314",
        "notas": "DJ propio, ingreso de equipo 19:00",
        "createdAt": "2025-03-02T10:00:00Z",
        "updatedAt": "2025-03-05T16:45:00Z",
        "customer": sample_customer()
    })
}

/// A well-formed example of `kind` in wire form.
pub fn sample(kind: PayloadKind) -> Value {
    match kind {
        PayloadKind::Customer => sample_customer(),
        PayloadKind::NewCustomer => json!({
            "nombre": "Tomás Pereyra",
            "telefono": "11 4000-2222",
            "email": "tomas@example.com"
        }),
        PayloadKind::Reservation => sample_reservation(),
        PayloadKind::CreateReservation => json!({
            "customerId": "cus_0001",
            "fecha": "2025-11-22",
            "horaInicio": "13:00",
            "horaFin": "18:00",
            "tipoEvento": "Bautismo",
            "cantidadPersonas": 45,
            "precioBase": 250000.0,
            "descuento": 20000.0,
            "tipoDescuento": "monto",
            "seña": 80000.0
        }),
        PayloadKind::UpdateReservation => json!({
            "id": "res_0001",
            "cantidadPersonas": 120,
            "estado": "completada"
        }),
        PayloadKind::AvailabilityRule => json!({
            "id": "rule_sat_night",
            "diaSemana": 6,
            "horaInicio": "21:00",
            "horaFin": "05:00",
            "precioBase": 600000.0,
            "activo": true
        }),
        PayloadKind::BlackoutDate => json!({
            "id": "blk_2025_12_24",
            "fecha": "2025-12-24",
            "motivo": "Nochebuena",
            "activo": true
        }),
        PayloadKind::CalendarDay => json!({
            "date": "2025-10-18",
            "isAvailable": false,
            "hasReservation": true,
            "price": 600000.0,
            "reservations": [sample_reservation()]
        }),
        PayloadKind::TimeSlot => json!({
            "inicio": "13:00",
            "fin": "18:00",
            "disponible": true,
            "precio": 250000.0
        }),
        PayloadKind::AdminUser => json!({
            "id": "adm_0001",
            "email": "admin@example.com",
            "name": "Carla",
            "role": "admin",
            "createdAt": "2024-12-01T00:00:00Z"
        }),
    }
}
