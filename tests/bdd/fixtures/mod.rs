//! Scenario world for the acceptance scenarios.
//!
//! The `TestWorld` owns the scenario's [`Session`] and the data provider the
//! steps look fixture records up in. Non-Clone state lives in
//! `RefCell<Option<T>>`, Clone state in `Slot<T>`.

// The `#[fixture]` macro generates types that cannot have doc comments attached
#![allow(
    missing_docs,
    reason = "Generated fixture types cannot have doc comments attached"
)]

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd::Slot;
use serde_json::Value;
use shelf_env::LIVE_ENV;
use shelfcheck::Session;
use shelfcheck::config::{TestConfig, switch_is_on};
use shelfcheck::data::{DataKind, DataProvider, YamlDataProvider};
use shelfcheck::logging;
use std::cell::RefCell;
use test_support::{StubServer, seeded_stub};

/// Test-data records matching the seeded stub services.
const STUB_DATA_FILE: &str = "tests/data/stub_data.yml";

/// Combined test world for all BDD scenarios.
pub struct TestWorld {
    /// Stub services, absent in live mode (non-Clone).
    pub stub: RefCell<Option<StubServer>>,
    /// Per-scenario session (non-Clone).
    pub session: RefCell<Option<Session>>,
    /// Fixture records looked up by steps.
    pub data: YamlDataProvider,
    /// Numeric id of the customer registered for admin scenarios.
    pub customer_id: Slot<u64>,
    /// ISBNs of the samples provisioned by the scenario.
    pub samples: Slot<Vec<String>>,
    /// Identifier of the basket item added by the scenario.
    pub basket_item: Slot<String>,
}

impl TestWorld {
    /// Build a world backed by a freshly seeded stub.
    ///
    /// # Errors
    ///
    /// Fails when the stub data cannot be loaded or the session cannot be
    /// created.
    pub fn stubbed() -> Result<Self> {
        let stub = seeded_stub();
        let session = Session::for_registry(stub.registry(), None)?;
        let data_file = Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(STUB_DATA_FILE);
        let data = YamlDataProvider::from_path(&data_file)?;
        Ok(Self::assemble(Some(stub), session, data))
    }

    /// Build a world against the environment selected by the process
    /// configuration.
    ///
    /// # Errors
    ///
    /// Fails when the configuration, catalogue or data file is unusable.
    pub fn live() -> Result<Self> {
        let config = TestConfig::from_env()?;
        if logging::init(config.debug) {
            tracing::debug!("installed test subscriber");
        }
        let session = Session::from_config(&config)?;
        let data = config.data_provider()?;
        Ok(Self::assemble(None, session, data))
    }

    fn assemble(stub: Option<StubServer>, session: Session, data: YamlDataProvider) -> Self {
        Self {
            stub: RefCell::new(stub),
            session: RefCell::new(Some(session)),
            data,
            customer_id: Slot::default(),
            samples: Slot::default(),
            basket_item: Slot::default(),
        }
    }

    /// Run `f` against the scenario's session.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `f`.
    pub fn with_session<R>(
        &self,
        f: impl FnOnce(&mut Session) -> shelfcheck::Result<R>,
    ) -> Result<R> {
        let mut guard = self.session.borrow_mut();
        let session = guard.as_mut().context("session should be initialised")?;
        Ok(f(session)?)
    }

    /// Look up `instances` records of `kind` described by `which`.
    ///
    /// # Errors
    ///
    /// Fails when the data provider holds too few matching records.
    pub fn data_for(&self, kind: DataKind, which: &str, instances: usize) -> Result<Vec<Value>> {
        Ok(self.data.data_for(kind, which, instances)?)
    }

    /// Look up one record of `kind` described by `which`.
    ///
    /// # Errors
    ///
    /// Fails when the data provider holds no matching record.
    pub fn one_for(&self, kind: DataKind, which: &str) -> Result<Value> {
        Ok(self.data.one_for(kind, which)?)
    }
}

impl Drop for TestWorld {
    fn drop(&mut self) {
        // The session must not outlive the stub it talks to.
        self.session.borrow_mut().take();
        self.stub.borrow_mut().take();
    }
}

/// Fixture providing a fresh `TestWorld` for each scenario.
///
/// # Panics
///
/// Panics when the world cannot be built; the scenario cannot run without it.
#[fixture]
#[expect(
    clippy::expect_used,
    reason = "a scenario cannot run without its world"
)]
pub fn world() -> TestWorld {
    let live = std::env::var(LIVE_ENV).is_ok_and(|value| switch_is_on(&value));
    if live {
        TestWorld::live().expect("live world")
    } else {
        TestWorld::stubbed().expect("stubbed world")
    }
}
