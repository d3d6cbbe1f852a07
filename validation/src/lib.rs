//! Validation collaborators of the KAIROS schema toolchain.
//!
//! - [`roundtrip`]: checks that typed parsing lost nothing from the raw input
//! - [`remote`]: forwards a finished library to the program validator service
//!
//! The round-trip check is fatal on mismatch. The remote validator is
//! advisory: an unreachable service is reported, never raised.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod remote;
pub mod roundtrip;

pub use remote::{
    RemoteValidator, RemoteValidatorConfig, ValidatorError, ValidatorOutcome, ValidatorReport,
};
pub use roundtrip::{check_round_trip, Mismatch, RoundTripError};
