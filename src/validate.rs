//! Submission validation.
//!
//! Checks run in a fixed order and stop at the first failure, so exactly one
//! reason reaches the user per attempt:
//!
//!   product chosen  →  at least one variable selected  →  date range present
//!
//! The order is a priority, not a measure of which field is "more missing":
//! with nothing filled in the user is told about the product first.

use std::fmt;

use serde_json::Value;

use crate::model::{END_TIME, Geometry, Product, START_TIME, UserInputs};
use crate::selection::Snapshot;

/// Why a submission attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NoProduct,
    NoVariable,
    NoDateRange,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NoProduct => write!(f, "no product selected"),
            Rejection::NoVariable => write!(f, "no variable selected"),
            Rejection::NoDateRange => write!(f, "no date range selected"),
        }
    }
}

impl std::error::Error for Rejection {}

/// A snapshot that passed validation, with the selected keys resolved.
#[derive(Debug, Clone)]
pub struct ValidSelection<'a> {
    pub product: &'a Product,
    pub variables: Vec<String>,
    pub user_inputs: &'a UserInputs,
    pub geometry: &'a [Geometry],
}

/// Validates a selection snapshot.
pub fn validate<'a>(snapshot: &Snapshot<'a>) -> Result<ValidSelection<'a>, Rejection> {
    let product = snapshot.product.ok_or(Rejection::NoProduct)?;

    let variables = product.selected_keys();
    if variables.is_empty() {
        return Err(Rejection::NoVariable);
    }

    if !has_input(snapshot.user_inputs, START_TIME) || !has_input(snapshot.user_inputs, END_TIME) {
        return Err(Rejection::NoDateRange);
    }

    Ok(ValidSelection {
        product,
        variables,
        user_inputs: snapshot.user_inputs,
        geometry: snapshot.geometry,
    })
}

/// A form field counts as filled unless it is absent or holds a falsy
/// value: `null`, `false`, zero or an empty string.
fn has_input(inputs: &UserInputs, key: &str) -> bool {
    match inputs.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|x| x != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}
