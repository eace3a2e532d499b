//! Test utilities for the acceptance suite.
//!
//! Provides a local stub of the remote services together with guards for
//! serialising environment mutations.

pub mod env_lock;
pub mod env_var_guard;
pub mod stub;

pub use env_lock::EnvLock;
pub use env_var_guard::EnvVarGuard;
pub use stub::{RecordedRequest, StubResponse, StubServer};

/// Username of the administrator seeded by [`seeded_stub`].
pub const STUB_ADMIN_USERNAME: &str = "admin@bbbtest.com";
/// Password of the administrator seeded by [`seeded_stub`].
pub const STUB_ADMIN_PASSWORD: &str = "Adm1n-Passw0rd!";

/// Start a stub server holding one administrator account.
///
/// # Panics
///
/// Panics if the server cannot bind a local port.
pub fn seeded_stub() -> StubServer {
    let server = StubServer::spawn().expect("bind stub server");
    server.add_user(STUB_ADMIN_USERNAME, STUB_ADMIN_PASSWORD, &[stub::ADMIN_ROLE]);
    server
}
