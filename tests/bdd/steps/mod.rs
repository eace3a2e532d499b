//! Step definition modules for BDD scenarios.
//!
//! Each module covers one area of the services. Steps read and write only the
//! scenario's `TestWorld`, chiefly its `Session`.
//!
//! `needless_pass_by_value` is suppressed because placeholder captures and
//! data tables arrive as owned values.

#![expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd step signatures prioritise ergonomics"
)]

mod admin;
mod basket;
mod library;
mod responses;
mod samples;
mod users;
