//! In-process emulation of the cleaning endpoints.
//!
//! Checks the `Authorization: Token …` and `X-Secret` headers, then answers
//! every submitted item with a cleaned object. Items that cannot be cleaned
//! come back without a usable result field so clients can exercise the
//! absent-field path.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;
use tracing::{debug, warn};

/// Credentials the server accepts.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub token: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            secret: secret.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StructureRequest {
    pub structure: Vec<String>,
    pub data: Vec<Vec<Value>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StructureResponse {
    pub structure: Vec<String>,
    pub data: Vec<Vec<Value>>,
}

type Rejection = (StatusCode, Json<Value>);

pub fn app(credentials: Credentials) -> Router {
    Router::new()
        .route("/clean", post(clean_structure))
        .route("/clean/{kind}", post(clean_items))
        .with_state(Arc::new(credentials))
}

pub async fn run(listener: TcpListener, credentials: Credentials) -> Result<(), std::io::Error> {
    axum::serve(listener, app(credentials)).await
}

async fn clean_items(
    State(credentials): State<Arc<Credentials>>,
    Path(kind): Path<String>,
    headers: HeaderMap,
    Json(items): Json<Vec<Value>>,
) -> Result<Json<Vec<Value>>, Rejection> {
    authorize(&credentials, &headers)?;
    let cleaner = cleaner_for(&kind).ok_or_else(|| {
        reject(StatusCode::NOT_FOUND, &format!("unknown clean type: {kind}"))
    })?;
    debug!(%kind, items = items.len(), "cleaning items");
    Ok(Json(items.iter().map(|item| cleaner(source_text(item))).collect()))
}

async fn clean_structure(
    State(credentials): State<Arc<Credentials>>,
    headers: HeaderMap,
    Json(input): Json<StructureRequest>,
) -> Result<Json<StructureResponse>, Rejection> {
    authorize(&credentials, &headers)?;
    let cleaners = input
        .structure
        .iter()
        .map(|column| {
            structure_cleaner(column)
                .ok_or_else(|| reject(StatusCode::BAD_REQUEST, &format!("unknown structure type: {column}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut rows = Vec::with_capacity(input.data.len());
    for row in &input.data {
        if row.len() != cleaners.len() {
            return Err(reject(StatusCode::BAD_REQUEST, "row length does not match structure"));
        }
        rows.push(
            row.iter()
                .zip(&cleaners)
                .map(|(cell, cleaner)| cleaner(source_text(cell)))
                .collect(),
        );
    }
    debug!(columns = cleaners.len(), rows = rows.len(), "cleaning records");
    Ok(Json(StructureResponse {
        structure: input.structure,
        data: rows,
    }))
}

fn authorize(credentials: &Credentials, headers: &HeaderMap) -> Result<(), Rejection> {
    let header = |name: &str| headers.get(name).and_then(|value| value.to_str().ok());
    let expected_token = format!("Token {}", credentials.token);
    if header("authorization") != Some(expected_token.as_str()) {
        warn!("rejected request with a bad token");
        return Err(reject(StatusCode::UNAUTHORIZED, "Invalid API key"));
    }
    if header("x-secret") != Some(credentials.secret.as_str()) {
        warn!("rejected request with a bad secret");
        return Err(reject(StatusCode::UNAUTHORIZED, "Invalid secret key"));
    }
    Ok(())
}

fn reject(status: StatusCode, detail: &str) -> Rejection {
    (status, Json(json!({ "detail": detail })))
}

fn source_text(item: &Value) -> &str {
    item.as_str().unwrap_or_default()
}

type Cleaner = fn(&str) -> Value;

fn cleaner_for(kind: &str) -> Option<Cleaner> {
    let cleaner: Cleaner = match kind {
        "name" => clean_name,
        "phone" => clean_phone,
        "passport" => clean_passport,
        "email" => clean_email,
        "birthdate" => clean_birthdate,
        "vehicle" => clean_vehicle,
        _ => return None,
    };
    Some(cleaner)
}

fn structure_cleaner(column: &str) -> Option<Cleaner> {
    match column {
        "AS_IS" => Some(as_is as Cleaner),
        other => cleaner_for(&other.to_ascii_lowercase()),
    }
}

/// Object with `source`, `qc` and, when cleaning succeeded, the given fields.
fn cleaned(source: &str, fields: Option<Vec<(&str, Value)>>) -> Value {
    let mut object = Map::new();
    object.insert("source".to_string(), Value::from(source));
    let qc = match fields {
        Some(fields) => {
            for (name, value) in fields {
                object.insert(name.to_string(), value);
            }
            0
        }
        None => 2,
    };
    object.insert("qc".to_string(), Value::from(qc));
    Value::Object(object)
}

fn as_is(source: &str) -> Value {
    json!({ "source": source })
}

fn clean_name(source: &str) -> Value {
    let words: Vec<String> = source.split_whitespace().map(capitalize).collect();
    if words.is_empty() {
        return json!({ "source": source, "result": null, "qc": 1 });
    }
    cleaned(source, Some(vec![("result", Value::from(words.join(" ")))]))
}

fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn digits(source: &str) -> String {
    source.chars().filter(char::is_ascii_digit).collect()
}

fn clean_phone(source: &str) -> Value {
    let digits = digits(source);
    let national = match digits.len() {
        11 if digits.starts_with('7') || digits.starts_with('8') => &digits[1..],
        10 => digits.as_str(),
        _ => return json!({ "source": source, "phone": null, "qc": 1 }),
    };
    let phone = format!(
        "+7 {} {}-{}-{}",
        &national[0..3],
        &national[3..6],
        &national[6..8],
        &national[8..10]
    );
    cleaned(source, Some(vec![("phone", Value::from(phone))]))
}

fn clean_passport(source: &str) -> Value {
    let digits = digits(source);
    if digits.len() != 10 {
        return cleaned(source, None);
    }
    let series = format!("{} {}", &digits[0..2], &digits[2..4]);
    cleaned(
        source,
        Some(vec![
            ("series", Value::from(series)),
            ("number", Value::from(&digits[4..])),
        ]),
    )
}

fn clean_email(source: &str) -> Value {
    let email = source.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.contains('@'),
        None => false,
    };
    if !valid {
        return cleaned(source, None);
    }
    cleaned(source, Some(vec![("email", Value::from(email))]))
}

fn clean_birthdate(source: &str) -> Value {
    let text = source.trim();
    let parts: Vec<&str> = text.split(['.', '-', '/']).collect();
    let (day, month, year) = match parts.as_slice() {
        [year, month, day] if year.len() == 4 => (*day, *month, *year),
        [day, month, year] if year.len() == 4 => (*day, *month, *year),
        _ => return json!({ "source": source, "birthdate": null, "qc": 1 }),
    };
    match (day.parse::<u8>(), month.parse::<u8>(), year.parse::<u16>()) {
        (Ok(d @ 1..=31), Ok(m @ 1..=12), Ok(y)) => cleaned(
            source,
            Some(vec![("birthdate", Value::from(format!("{d:02}.{m:02}.{y:04}")))]),
        ),
        _ => json!({ "source": source, "birthdate": null, "qc": 1 }),
    }
}

fn clean_vehicle(source: &str) -> Value {
    let vehicle = source.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
    if vehicle.is_empty() {
        return cleaned(source, None);
    }
    cleaned(source, Some(vec![("vehicle", Value::from(vehicle))]))
}
