//! OAuth2 grant exchanges against the auth service.
//!
//! Two grants are supported: the standard `password` grant used to sign in
//! existing accounts, and the registration grant that creates an account and
//! signs it in with one request. Issued tokens are memoised per username in a
//! [`TokenCache`] owned by the caller.

mod credentials;

pub use credentials::{EMAIL_DOMAIN, random_email, random_password};

use crate::environments::ServiceName;
use crate::error::{AcceptanceError, Result};
use crate::http::{CapturedResponse, FORM_MEDIA_TYPE, Headers, HttpClient, JSON_MEDIA_TYPE, Method};
use rand::Rng;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Route of the token endpoint on the auth service.
pub const TOKEN_PATH: &str = "/oauth2/token";
/// Grant type that registers a new account.
pub const REGISTRATION_GRANT: &str = "urn:blinkbox:oauth:grant-type:registration";

/// OAuth2 client identity sent alongside user credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    /// Registered client identifier.
    pub client_id: String,
    /// Secret issued with the client identifier.
    pub client_secret: String,
}

/// Username and password of an account, with an optional client identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account username, usually an email address.
    pub username: String,
    /// Account password.
    pub password: String,
    /// Client identity presented with the grant, if any.
    pub client: Option<ClientCredentials>,
}

impl Credentials {
    /// Credentials without a client identity.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            client: None,
        }
    }
}

/// Options for [`register_new_user`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Registration {
    /// Register a client device together with the account.
    pub with_client: bool,
}

/// Account created through the registration grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredUser {
    /// Generated username and password.
    pub credentials: Credentials,
    /// Token issued by the registration grant.
    pub access_token: String,
    /// Numeric identifier taken from the issued `user_id` URN, when the auth
    /// service returned a usable one.
    pub user_id: Option<u64>,
}

/// Tokens issued so far, keyed by username.
///
/// Entries are never invalidated; a cache lives as long as the session that
/// owns it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenCache {
    tokens: BTreeMap<String, String>,
}

impl TokenCache {
    /// Cached token for `username`.
    #[must_use]
    pub fn get(&self, username: &str) -> Option<&str> {
        self.tokens.get(username).map(String::as_str)
    }

    /// Remember `token` for `username`, replacing any earlier entry.
    pub fn insert(&mut self, username: String, token: String) {
        self.tokens.insert(username, token);
    }

    /// Number of cached usernames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether no token has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct GrantResponse {
    access_token: Option<String>,
    user_id: Option<String>,
}

/// Return a token for `credentials`, signing in only on a cache miss.
///
/// # Errors
///
/// Returns [`AcceptanceError::Authentication`] when the grant is not answered
/// with HTTP 200 or the answer holds no `access_token`, and propagates
/// transport and configuration failures.
pub fn get_token(
    client: &HttpClient,
    cache: &mut TokenCache,
    credentials: &Credentials,
) -> Result<String> {
    if let Some(token) = cache.get(&credentials.username) {
        tracing::debug!(username = %credentials.username, "reusing cached access token");
        return Ok(token.to_owned());
    }
    let token = authenticate(client, credentials)?;
    cache.insert(credentials.username.clone(), token.clone());
    Ok(token)
}

/// Sign in with the `password` grant, bypassing any cache.
///
/// # Errors
///
/// As [`get_token`].
pub fn authenticate(client: &HttpClient, credentials: &Credentials) -> Result<String> {
    let mut fields = Map::new();
    fields.insert("grant_type".into(), "password".into());
    fields.insert("username".into(), credentials.username.as_str().into());
    fields.insert("password".into(), credentials.password.as_str().into());
    if let Some(identity) = &credentials.client {
        fields.insert("client_id".into(), identity.client_id.as_str().into());
        fields.insert("client_secret".into(), identity.client_secret.as_str().into());
    }
    tracing::debug!(username = %credentials.username, "requesting password grant");
    let grant = exchange(client, &credentials.username, fields)?;
    access_token(&credentials.username, grant)
}

/// Register an account with generated credentials.
///
/// # Errors
///
/// Returns [`AcceptanceError::Authentication`] when registration is not
/// answered with HTTP 200 or the answer lacks a token. A missing or
/// malformed `user_id` leaves [`RegisteredUser::user_id`] empty.
pub fn register_new_user<R: Rng + ?Sized>(
    client: &HttpClient,
    rng: &mut R,
    registration: &Registration,
) -> Result<RegisteredUser> {
    let credentials = Credentials::new(random_email(rng), random_password(rng));
    let mut fields = Map::new();
    fields.insert("grant_type".into(), REGISTRATION_GRANT.into());
    fields.insert("first_name".into(), "Testy".into());
    fields.insert("last_name".into(), "McTest".into());
    fields.insert("username".into(), credentials.username.as_str().into());
    fields.insert("password".into(), credentials.password.as_str().into());
    fields.insert("accepted_terms_and_conditions".into(), true.into());
    fields.insert("allow_marketing_communications".into(), false.into());
    if registration.with_client {
        fields.insert("client_name".into(), "Test Client".into());
        fields.insert("client_brand".into(), "Test Brand".into());
        fields.insert("client_model".into(), "Test Model".into());
        fields.insert("client_os".into(), "Test OS".into());
    }
    tracing::debug!(username = %credentials.username, "registering new user");
    let grant = exchange(client, &credentials.username, fields)?;
    registered_user(credentials, grant)
}

fn registered_user(credentials: Credentials, grant: GrantResponse) -> Result<RegisteredUser> {
    let user_id = grant.user_id.as_deref().and_then(parse_user_id);
    if user_id.is_none() {
        tracing::warn!(
            username = %credentials.username,
            urn = ?grant.user_id,
            "registration returned no usable user_id"
        );
    }
    let token = access_token(&credentials.username, grant)?;
    Ok(RegisteredUser {
        credentials,
        access_token: token,
        user_id,
    })
}

/// Extract the numeric id from the last `:` segment of a user URN.
///
/// # Examples
///
/// ```
/// use shelfcheck::auth::parse_user_id;
///
/// assert_eq!(parse_user_id("urn:blinkbox:zuul:user:1234"), Some(1234));
/// assert_eq!(parse_user_id("urn:blinkbox:zuul:user:"), None);
/// ```
#[must_use]
pub fn parse_user_id(urn: &str) -> Option<u64> {
    urn.rsplit(':').next()?.parse().ok()
}

fn exchange(client: &HttpClient, username: &str, fields: Map<String, Value>) -> Result<GrantResponse> {
    let headers = Headers::new()
        .with("Content-Type", FORM_MEDIA_TYPE)
        .with("Accept", JSON_MEDIA_TYPE);
    let response = client.request(
        ServiceName::Auth,
        Method::Post,
        TOKEN_PATH,
        Some(&Value::Object(fields)),
        &headers,
    )?;
    decode_grant(username, &response)
}

fn decode_grant(username: &str, response: &CapturedResponse) -> Result<GrantResponse> {
    let failure = |reason: String| AcceptanceError::Authentication {
        username: username.to_owned(),
        reason,
    };
    if response.status() != 200 {
        return Err(failure(format!(
            "token endpoint answered {}: {}",
            response.status(),
            response.body_text()
        )));
    }
    serde_json::from_slice(response.body())
        .map_err(|err| failure(format!("token response is not valid JSON: {err}")))
}

fn access_token(username: &str, grant: GrantResponse) -> Result<String> {
    grant
        .access_token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AcceptanceError::Authentication {
            username: username.to_owned(),
            reason: String::from("token response has no access_token"),
        })
}
