//! Domain models for the staff roster.
//!
//! - [`Employee`]: the unit of state. Records are created by hiring, marked
//!   unemployed by firing, and physically removed only after firing.
//! - [`Position`]: closed enumeration of job titles. `Director` is the only
//!   title the hierarchy engine treats specially.
//! - [`EmployeeView`]: transport-facing projection consumed by the API layer.

mod employee;
mod view;

pub use employee::*;
pub use view::*;
