//! Data shapes exchanged between the venue booking front end and its backend.
//!
//! Field names on the wire follow the front end (camelCase, Spanish labels
//! such as `fecha` or `seña`); the Rust names are English.

pub mod admin;
pub mod availability;
pub mod calendar;
pub mod customer;
pub mod date;
pub mod reservation;
pub mod response;
pub mod validation;

pub use admin::{AdminRole, AdminUser};
pub use availability::{AvailabilityRule, BlackoutDate};
pub use calendar::{CalendarDay, TimeSlot};
pub use customer::{Customer, NewCustomer};
pub use reservation::{
    CreateReservationData, Discount, DiscountType, Reservation, ReservationStatus,
    UpdateReservationData,
};
pub use response::{ApiResponse, EnvelopeError, PaginatedResponse};
pub use validation::{Validate, ValidationError, ValidationLimits};
