//! API endpoint handlers.
//!
//! Each module corresponds to a dashboard tab. Handlers parse parameters,
//! then run the tab's pipeline on the blocking pool.

pub mod doctors;
pub mod export;
pub mod health;
pub mod labs;
pub mod overview;
pub mod patients;
pub mod pharmacy;
pub mod rooms;
pub mod staff;
