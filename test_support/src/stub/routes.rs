//! In-memory model of the auth, library, admin, basket and payment services.

use super::wire::{RecordedRequest, StubResponse};
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashMap};

/// Prefix of the `user_id` URNs issued by the auth route.
pub const USER_URN_PREFIX: &str = "urn:blinkbox:zuul:user:";
/// Date stamped on every library item the stub creates.
pub const ADDED_DATE: &str = "2023-01-05T10:00:00Z";
/// Role allowing use of the admin API.
pub const ADMIN_ROLE: &str = "admin";

const REGISTRATION_GRANT: &str = "urn:blinkbox:oauth:grant-type:registration";

#[derive(Debug, Clone)]
struct Account {
    password: String,
    user_id: u64,
    roles: Vec<String>,
    library: BTreeMap<String, Value>,
    basket: BTreeMap<u64, Value>,
}

/// Mutable state behind the stub server.
#[derive(Debug, Default)]
pub(crate) struct StubState {
    accounts: BTreeMap<String, Account>,
    tokens: HashMap<String, String>,
    scripted: HashMap<(String, String), StubResponse>,
    log: Vec<RecordedRequest>,
    next_user_id: u64,
    next_token: u64,
    next_basket_item: u64,
}

fn error_body(status: u16, code: &str, description: &str) -> StubResponse {
    StubResponse::json(status, &json!({ "code": code, "description": description }))
}

fn oauth_error(error: &str) -> StubResponse {
    StubResponse::json(400, &json!({ "error": error }))
}

fn unauthorised() -> StubResponse {
    StubResponse::empty(401).with_header("WWW-Authenticate", "Bearer")
}

fn library_item(isbn: &str, title: &str, ownership: &str) -> Value {
    json!({
        "isbn": isbn,
        "title": title,
        "ownership": ownership,
        "readingStatus": "Unread",
        "addedDate": ADDED_DATE,
        "links": [
            { "rel": "urn:blinkbox:zuul:books:rel:book", "href": format!("/catalogue/books/{isbn}") },
            { "rel": "urn:blinkbox:zuul:books:rel:library_item", "href": format!("/my/library/{isbn}") },
        ],
        "images": [
            { "rel": "urn:blinkbox:zuul:books:rel:cover", "src": format!("https://media.example.test/covers/{isbn}.png") },
        ],
    })
}

fn string_field<'a>(body: &'a Value, name: &str) -> Option<&'a str> {
    body.get(name).and_then(Value::as_str)
}

impl StubState {
    pub(crate) fn add_account(&mut self, username: &str, password: &str, roles: &[&str]) -> u64 {
        self.next_user_id += 1;
        let user_id = self.next_user_id;
        self.accounts.insert(
            username.to_owned(),
            Account {
                password: password.to_owned(),
                user_id,
                roles: roles.iter().map(|role| (*role).to_owned()).collect(),
                library: BTreeMap::new(),
                basket: BTreeMap::new(),
            },
        );
        user_id
    }

    pub(crate) fn script(&mut self, method: &str, path: &str, response: StubResponse) {
        self.scripted
            .insert((method.to_owned(), path.to_owned()), response);
    }

    pub(crate) fn log(&self) -> &[RecordedRequest] {
        &self.log
    }

    pub(crate) fn library_of(&self, username: &str) -> Vec<Value> {
        self.accounts
            .get(username)
            .map(|account| account.library.values().cloned().collect())
            .unwrap_or_default()
    }

    pub(crate) fn handle(&mut self, request: RecordedRequest) -> StubResponse {
        let key = (request.method.clone(), request.path.clone());
        let response = match self.scripted.get(&key) {
            Some(scripted) => scripted.clone(),
            None => self.route(&request),
        };
        self.log.push(request);
        response
    }

    fn route(&mut self, request: &RecordedRequest) -> StubResponse {
        let segments: Vec<&str> = request
            .path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();
        if request.method == "POST" && segments == ["oauth2", "token"] {
            return self.token(request);
        }
        let Some(username) = request
            .bearer_token()
            .and_then(|token| self.tokens.get(token))
            .cloned()
        else {
            return unauthorised();
        };
        match (request.method.as_str(), segments.as_slice()) {
            ("GET", ["my", "library"]) => self.get_library(&username),
            ("GET", ["my", "library", isbn]) => self.get_library_item(&username, isbn),
            ("POST", ["my", "library", "samples"]) => self.add_sample(&username, request),
            ("POST", ["admin", "users", user_id, "library"]) => {
                self.admin_add(&username, user_id, request)
            }
            ("DELETE", ["my", "baskets"]) => self.clear_basket(&username),
            ("GET", ["my", "baskets"]) => self.basket_list(&username),
            ("POST", ["my", "baskets", "items"]) => self.add_to_basket(&username, request),
            ("GET", ["my", "baskets", "items", id]) => self.basket_item(&username, id),
            ("DELETE", ["my", "baskets", "items", id]) => self.remove_basket_item(&username, id),
            ("POST", ["my", "payments"]) => self.pay(&username, request),
            _ => error_body(404, "not_found", "no such route"),
        }
    }

    fn issue_token(&mut self, username: &str, user_id: u64) -> StubResponse {
        self.next_token += 1;
        let token = format!("stub-token-{}", self.next_token);
        self.tokens.insert(token.clone(), username.to_owned());
        StubResponse::json(
            200,
            &json!({
                "access_token": token,
                "token_type": "bearer",
                "expires_in": 1800,
                "user_id": format!("{USER_URN_PREFIX}{user_id}"),
                "user_username": username,
            }),
        )
    }

    fn token(&mut self, request: &RecordedRequest) -> StubResponse {
        let (Some(username), Some(password)) =
            (request.form_field("username"), request.form_field("password"))
        else {
            return oauth_error("invalid_request");
        };
        match request.form_field("grant_type").as_deref() {
            Some("password") => match self.accounts.get(&username) {
                Some(account) if account.password == password => {
                    let user_id = account.user_id;
                    self.issue_token(&username, user_id)
                }
                _ => oauth_error("invalid_grant"),
            },
            Some(REGISTRATION_GRANT) => {
                let accepted = request.form_field("accepted_terms_and_conditions");
                if accepted.as_deref() != Some("true")
                    || request.form_field("first_name").is_none()
                    || request.form_field("last_name").is_none()
                {
                    return oauth_error("invalid_request");
                }
                if self.accounts.contains_key(&username) {
                    return StubResponse::json(
                        400,
                        &json!({ "error": "invalid_request", "error_reason": "username_already_taken" }),
                    );
                }
                let user_id = self.add_account(&username, &password, &[]);
                self.issue_token(&username, user_id)
            }
            _ => oauth_error("unsupported_grant_type"),
        }
    }

    fn account(&mut self, username: &str) -> Option<&mut Account> {
        self.accounts.get_mut(username)
    }

    fn get_library(&mut self, username: &str) -> StubResponse {
        let items = self.library_of(username);
        StubResponse::json(
            200,
            &json!({ "type": "urn:blinkbox:schema:list", "items": items }),
        )
    }

    fn get_library_item(&mut self, username: &str, isbn: &str) -> StubResponse {
        match self
            .account(username)
            .and_then(|account| account.library.get(isbn))
        {
            Some(item) => StubResponse::json(200, item),
            None => error_body(
                404,
                "library.item_not_found",
                "The requested item is not in your library",
            ),
        }
    }

    fn add_sample(&mut self, username: &str, request: &RecordedRequest) -> StubResponse {
        let body = request.json().unwrap_or(Value::Null);
        let Some(isbn) = string_field(&body, "isbn").map(str::to_owned) else {
            return error_body(400, "invalid_request", "an isbn is required");
        };
        let Some(account) = self.account(username) else {
            return unauthorised();
        };
        if account.library.contains_key(&isbn) {
            return error_body(409, "library.item_already_exists", "The item is already in your library");
        }
        let item = library_item(&isbn, &format!("Sample of {isbn}"), "Sample");
        account.library.insert(isbn, item.clone());
        StubResponse::json(200, &item)
    }

    fn admin_add(&mut self, caller: &str, user_id: &str, request: &RecordedRequest) -> StubResponse {
        let is_admin = self
            .accounts
            .get(caller)
            .is_some_and(|account| account.roles.iter().any(|role| role == ADMIN_ROLE));
        if !is_admin {
            return error_body(403, "forbidden", "admin role required");
        }
        let body = request.json().unwrap_or(Value::Null);
        let Some(isbn) = string_field(&body, "isbn").map(str::to_owned) else {
            return error_body(400, "invalid_request", "an isbn is required");
        };
        let ownership = string_field(&body, "ownership").unwrap_or("Owned").to_owned();
        let title = string_field(&body, "title")
            .map_or_else(|| format!("Book {isbn}"), str::to_owned);
        let Some(account) = self
            .accounts
            .values_mut()
            .find(|account| user_id.parse::<u64>().ok() == Some(account.user_id))
        else {
            return error_body(404, "user_not_found", "no such user");
        };
        account
            .library
            .insert(isbn.clone(), library_item(&isbn, &title, &ownership));
        StubResponse::empty(204)
    }

    fn clear_basket(&mut self, username: &str) -> StubResponse {
        if let Some(account) = self.account(username) {
            account.basket.clear();
        }
        StubResponse::empty(204)
    }

    fn basket_list(&mut self, username: &str) -> StubResponse {
        let items: Vec<Value> = self
            .account(username)
            .map(|account| account.basket.values().cloned().collect())
            .unwrap_or_default();
        StubResponse::json(200, &json!({ "items": items }))
    }

    fn add_to_basket(&mut self, username: &str, request: &RecordedRequest) -> StubResponse {
        let body = request.json().unwrap_or(Value::Null);
        let Some(isbn) = string_field(&body, "isbn").map(str::to_owned) else {
            return error_body(400, "invalid_request", "an isbn is required");
        };
        self.next_basket_item += 1;
        let id = self.next_basket_item;
        let price = body.get("price").cloned().unwrap_or_else(|| json!(4.99));
        let item = json!({ "id": id.to_string(), "isbn": isbn, "price": price });
        let Some(account) = self.account(username) else {
            return unauthorised();
        };
        account.basket.insert(id, item.clone());
        StubResponse::json(201, &item)
    }

    fn basket_item(&mut self, username: &str, id: &str) -> StubResponse {
        let item = id.parse::<u64>().ok().and_then(|id| {
            self.account(username)
                .and_then(|account| account.basket.get(&id).cloned())
        });
        match item {
            Some(item) => StubResponse::json(200, &item),
            None => error_body(404, "basket.item_not_found", "no such basket item"),
        }
    }

    fn remove_basket_item(&mut self, username: &str, id: &str) -> StubResponse {
        let removed = id.parse::<u64>().ok().and_then(|id| {
            self.account(username)
                .and_then(|account| account.basket.remove(&id))
        });
        match removed {
            Some(_) => StubResponse::empty(204),
            None => error_body(404, "basket.item_not_found", "no such basket item"),
        }
    }

    fn pay(&mut self, username: &str, request: &RecordedRequest) -> StubResponse {
        let body = request.json().unwrap_or(Value::Null);
        if !body.get("creditCard").is_some_and(Value::is_object) {
            return error_body(400, "invalid_request", "a creditCard is required");
        }
        let Some(account) = self.account(username) else {
            return unauthorised();
        };
        if account.basket.is_empty() {
            return error_body(400, "payment.basket_empty", "the basket is empty");
        }
        let purchased: Vec<String> = account
            .basket
            .values()
            .filter_map(|item| string_field(item, "isbn").map(str::to_owned))
            .collect();
        account.basket.clear();
        for isbn in &purchased {
            account
                .library
                .insert(isbn.clone(), library_item(isbn, &format!("Book {isbn}"), "Owned"));
        }
        StubResponse::json(
            200,
            &json!({ "status": "Complete", "items": purchased }),
        )
    }
}
