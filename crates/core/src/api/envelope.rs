//! Response shapes of the back-office API.
//!
//! Most endpoints wrap their payload as `{ "data": ... }`; list endpoints add
//! a `total`, and the finance lists nest one level deeper
//! (`{ "data": { "expenses": [...] } }`). Error bodies carry `{ "message" }`.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::CoreError;
use crate::models::finance::{Expense, Investment};
use crate::models::wire::null_as_default;

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct ListEnvelope<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<T>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub total: u64,
}

#[derive(Default, Deserialize)]
pub(crate) struct ExpenseList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub expenses: Vec<Expense>,
}

#[derive(Default, Deserialize)]
pub(crate) struct InvestmentList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub investments: Vec<Investment>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Take `data` when the body is wrapped, otherwise the body itself.
/// A missing or null `data` maps to `T::default()`.
pub(crate) fn unwrap_data<T>(body: Value) -> Result<T, CoreError>
where
    T: DeserializeOwned + Default,
{
    let inner = match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };
    if inner.is_null() {
        return Ok(T::default());
    }
    Ok(serde_json::from_value(inner)?)
}

/// Like [`unwrap_data`] but a missing record is an error, not a default.
pub(crate) fn unwrap_record<T>(body: Value, what: &str) -> Result<T, CoreError>
where
    T: DeserializeOwned,
{
    let inner = match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };
    if inner.is_null() {
        return Err(CoreError::Deserialization(format!("response carried no {what}")));
    }
    Ok(serde_json::from_value(inner)?)
}

/// Server-supplied error message, if the body has one.
pub(crate) fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}
