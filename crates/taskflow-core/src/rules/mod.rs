//! Business rules applied at the point of a single write or read
//!
//! Pure functions only: no store access, no clocks except where a `now`
//! is passed in.

pub mod duplicate;
pub mod lockout;
pub mod numbering;
pub mod scope;
pub mod validation;
