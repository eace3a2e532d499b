//! Step definitions establishing who the scenario acts as.

use crate::bdd::fixtures::TestWorld;
use anyhow::{Context, Result};
use rstest_bdd_macros::given;
use serde_json::Value;
use shelfcheck::auth::{Credentials, Registration};
use shelfcheck::data::DataKind;

/// Token no auth service will ever have issued.
const FAKE_TOKEN: &str = "something_totally_fake";

fn credentials_from(user: &Value) -> Result<Credentials> {
    let field = |name: &str| {
        user.get(name)
            .and_then(Value::as_str)
            .with_context(|| format!("user record needs a string '{name}'"))
    };
    Ok(Credentials::new(field("username")?, field("password")?))
}

#[given("I am authenticated as a user with the {role} role")]
fn authenticated_with_role(world: &TestWorld, role: String) -> Result<()> {
    let user = world.one_for(DataKind::User, &format!("has the {role} role"))?;
    let credentials = credentials_from(&user)?;
    world.with_session(|session| {
        session.authenticate(&credentials)?;
        Ok(())
    })
}

#[given("I am an authenticated user")]
fn authenticated_new_user(world: &TestWorld) -> Result<()> {
    world.with_session(|session| {
        let credentials = session
            .register_new_user(&Registration::default())?
            .credentials
            .clone();
        session.authenticate(&credentials)?;
        Ok(())
    })
}

#[given("I am not authenticated")]
fn not_authenticated(world: &TestWorld) -> Result<()> {
    world.with_session(|session| {
        session.set_access_token(Some(FAKE_TOKEN.to_owned()));
        Ok(())
    })
}
