//! Request body encoding driven by the declared content type.

use crate::error::{AcceptanceError, Result};
use serde_json::Value;
use url::form_urlencoded;

/// Media type used when a request declares no content type.
pub const JSON_MEDIA_TYPE: &str = "application/json";
/// Media type of form-encoded bodies such as OAuth2 grant requests.
pub const FORM_MEDIA_TYPE: &str = "application/x-www-form-urlencoded";

/// Serialised request payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    /// Content type sent with the payload.
    pub content_type: String,
    /// Payload bytes.
    pub bytes: Vec<u8>,
}

/// Encode `body` for `content_type`, defaulting to JSON.
///
/// Form bodies take the members of a JSON object as fields, rendering strings
/// verbatim and other scalars as their JSON text. Any media type mentioning
/// `json` receives the JSON document. Other media types receive string bodies
/// verbatim and everything else as JSON text.
pub(crate) fn encode(body: &Value, content_type: Option<&str>) -> Result<EncodedBody> {
    let media_type = content_type.unwrap_or(JSON_MEDIA_TYPE);
    let essence = media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    let bytes = if essence == FORM_MEDIA_TYPE {
        encode_form(body)?.into_bytes()
    } else if essence.contains("json") {
        json_bytes(body)?
    } else if let Value::String(text) = body {
        text.clone().into_bytes()
    } else {
        json_bytes(body)?
    };
    Ok(EncodedBody {
        content_type: media_type.to_owned(),
        bytes,
    })
}

fn json_bytes(body: &Value) -> Result<Vec<u8>> {
    serde_json::to_vec(body).map_err(|err| AcceptanceError::Parse {
        message: format!("cannot serialise request body: {err}"),
    })
}

fn encode_form(body: &Value) -> Result<String> {
    let Value::Object(fields) = body else {
        return Err(AcceptanceError::configuration(
            "form-encoded bodies must be JSON objects",
        ));
    };
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in fields {
        match value {
            Value::Null => {}
            Value::String(text) => {
                serializer.append_pair(name, text);
            }
            Value::Bool(_) | Value::Number(_) => {
                serializer.append_pair(name, &value.to_string());
            }
            Value::Array(_) | Value::Object(_) => {
                return Err(AcceptanceError::configuration(format!(
                    "form field '{name}' must be a scalar"
                )));
            }
        }
    }
    Ok(serializer.finish())
}
