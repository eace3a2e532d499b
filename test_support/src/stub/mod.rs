//! Local stand-in for the remote books services.
//!
//! [`StubServer`] listens on `127.0.0.1`, serves the auth, library, admin,
//! basket and payment routes from one in-memory model, and records every
//! request it receives. The listener is polled in non-blocking mode so the
//! server thread notices shutdown promptly; dropping the handle stops and
//! joins it.

mod routes;
mod wire;

pub use routes::{ADDED_DATE, ADMIN_ROLE, USER_URN_PREFIX};
pub use wire::{RecordedRequest, StubResponse};

use routes::StubState;
use shelfcheck::environments::ServiceRegistry;
use std::{
    io,
    net::{SocketAddr, TcpListener, TcpStream},
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Handle to a running stub server.
#[derive(Debug)]
#[must_use]
pub struct StubServer {
    addr: SocketAddr,
    url: String,
    state: Arc<Mutex<StubState>>,
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl StubServer {
    /// Bind to an ephemeral local port and start serving.
    ///
    /// # Errors
    ///
    /// Returns any error from binding or configuring the listener.
    pub fn spawn() -> io::Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0))?;
        listener.set_nonblocking(true)?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(StubState::default()));
        let stop = Arc::new(AtomicBool::new(false));
        let handle = {
            let state = Arc::clone(&state);
            let stop = Arc::clone(&stop);
            thread::spawn(move || serve(&listener, &state, &stop))
        };
        Ok(Self {
            addr,
            url: format!("http://{addr}"),
            state,
            stop,
            handle: Some(handle),
        })
    }

    /// Base URL of the server.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Registry pointing every service at this server.
    ///
    /// # Panics
    ///
    /// Never in practice: the server URL is always a valid base URI.
    #[must_use]
    pub fn registry(&self) -> ServiceRegistry {
        ServiceRegistry::uniform(&self.url).expect("stub URL is a valid base URI")
    }

    fn state(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create an account with `roles`, returning its numeric user id.
    pub fn add_user(&self, username: &str, password: &str, roles: &[&str]) -> u64 {
        self.state().add_account(username, password, roles)
    }

    /// Answer every `method` request for `path` with `response` instead of
    /// the modelled behaviour.
    pub fn script(&self, method: &str, path: &str, response: StubResponse) {
        self.state().script(method, path, response);
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state().log().to_vec()
    }

    /// Number of `method` requests received for `path`.
    #[must_use]
    pub fn request_count(&self, method: &str, path: &str) -> usize {
        self.state()
            .log()
            .iter()
            .filter(|request| request.method == method && request.path == path)
            .count()
    }

    /// Library items currently held by `username`.
    #[must_use]
    pub fn library_of(&self, username: &str) -> Vec<serde_json::Value> {
        self.state().library_of(username)
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        // Wake the accept loop; the outcome is irrelevant.
        drop(TcpStream::connect(self.addr));
        if let Some(handle) = self.handle.take() {
            drop(handle.join());
        }
    }
}

fn serve(listener: &TcpListener, state: &Mutex<StubState>, stop: &AtomicBool) {
    while !stop.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, _)) => {
                if stop.load(Ordering::SeqCst) {
                    break;
                }
                // A broken connection only affects the client that made it.
                drop(handle_connection(stream, state));
            }
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => thread::sleep(POLL_INTERVAL),
            Err(_) => break,
        }
    }
}

fn handle_connection(mut stream: TcpStream, state: &Mutex<StubState>) -> io::Result<()> {
    let request = wire::read_request(&stream)?;
    let response = state
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .handle(request);
    wire::write_response(&mut stream, &response)
}
