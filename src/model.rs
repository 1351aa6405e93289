/// Product, Variable, UserInputs, Payload, CatalogError, SubmitError
/// core data structures and error handling
///
/// Core data types for the GDDP fetch client.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no I/O; the only logic is read-only inspection of a product.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Well-known keys
// ---------------------------------------------------------------------------

/// UserInputs key holding the start of the requested date range.
pub const START_TIME: &str = "start_time";

/// UserInputs key holding the end of the requested date range.
pub const END_TIME: &str = "end_time";

/// Display color given to every product loaded from the catalog.
pub const DEFAULT_PRODUCT_COLOR: &str = "#17a2b8";

// ---------------------------------------------------------------------------
// Catalog types
// ---------------------------------------------------------------------------

/// One selectable quantity of a product.
///
/// `selected` is the only field that changes after loading; it is flipped
/// through `SelectionStore::set_variable_selected`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variable {
    pub key: String,         // catalog short_name, e.g. "tasmax"
    pub description: String, // catalog long_name
    pub selected: bool,
}

impl Variable {
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            selected: false,
        }
    }
}

/// A data product offered by the service.
///
/// Built from one `/getBoundaries` record and held read-only for the rest
/// of the session. `id` and `label` are both the record's `product` string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: String,
    pub label: String,
    pub variables: Vec<Variable>,
    pub color: String,
    /// Polygon coordinates of the product's spatial domain, as served.
    pub bbox: Value,
    pub valid_start_time: String,
    pub valid_end_time: String,
}

impl Product {
    /// Keys of the variables currently flagged as selected, in the
    /// product's variable order.
    pub fn selected_keys(&self) -> Vec<String> {
        self.variables
            .iter()
            .filter(|v| v.selected)
            .map(|v| v.key.clone())
            .collect()
    }

    /// `[min_lon, min_lat, max_lon, max_lat]` of every position found in
    /// `bbox`, however deeply the coordinate arrays are nested.
    ///
    /// Returns `None` when `bbox` holds no numeric `[x, y, ..]` position.
    pub fn bbox_extent(&self) -> Option<[f64; 4]> {
        let mut extent: Option<[f64; 4]> = None;
        collect_extent(&self.bbox, &mut extent);
        extent
    }

    /// Whether a calendar date lies inside the product's valid interval.
    ///
    /// Only the leading `YYYY-MM-DD` of each value is compared, so full
    /// timestamps work too. Returns `None` when any of the three values is
    /// not a date (e.g. a numeric time axis).
    pub fn covers_date(&self, date: &str) -> Option<bool> {
        let day = parse_day(date)?;
        let start = parse_day(&self.valid_start_time)?;
        let end = parse_day(&self.valid_end_time)?;
        Some(start <= day && day <= end)
    }
}

fn parse_day(s: &str) -> Option<NaiveDate> {
    let head = s.trim().get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn collect_extent(value: &Value, extent: &mut Option<[f64; 4]>) {
    let Some(items) = value.as_array() else {
        return;
    };

    let position = match (items.first().and_then(Value::as_f64), items.get(1).and_then(Value::as_f64)) {
        (Some(x), Some(y)) => Some((x, y)),
        _ => None,
    };

    match position {
        Some((x, y)) => {
            let e = extent.get_or_insert([x, y, x, y]);
            e[0] = e[0].min(x);
            e[1] = e[1].min(y);
            e[2] = e[2].max(x);
            e[3] = e[3].max(y);
        }
        None => {
            for item in items {
                collect_extent(item, extent);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Selection types
// ---------------------------------------------------------------------------

/// Free-form form inputs keyed by field name. Must eventually contain
/// `START_TIME` and `END_TIME` before a submission is accepted.
pub type UserInputs = Map<String, Value>;

/// One drawn or uploaded GeoJSON geometry object.
pub type Geometry = Value;

/// JSON object posted to `/fetchResult`.
pub type Payload = Map<String, Value>;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or parsing the product catalog.
#[derive(Debug, PartialEq)]
pub enum CatalogError {
    /// Non-2xx HTTP response from `/getBoundaries`.
    HttpError(u16),
    /// The request never produced a response (connection refused, DNS, ...).
    RequestFailed(String),
    /// The response body was not a JSON array of records.
    ParseError(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::HttpError(code) => write!(f, "HTTP error: {}", code),
            CatalogError::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            CatalogError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::RequestFailed(err.to_string())
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::ParseError(err.to_string())
    }
}

/// Errors from editing the selection store.
#[derive(Debug, PartialEq)]
pub enum SelectionError {
    /// A variable flag was changed before any product was chosen.
    NoProduct,
    /// The key is not one of the chosen product's variables.
    UnknownVariable(String),
}

impl std::fmt::Display for SelectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionError::NoProduct => write!(f, "No product chosen"),
            SelectionError::UnknownVariable(key) => {
                write!(f, "Variable '{}' does not belong to the chosen product", key)
            }
        }
    }
}

impl std::error::Error for SelectionError {}

/// Errors from posting a selection to `/fetchResult` or saving its result.
#[derive(Debug, PartialEq)]
pub enum SubmitError {
    /// Non-2xx HTTP response from the result service.
    HttpError(u16),
    /// The request never produced a response, or the body could not be read.
    RequestFailed(String),
    /// The result file could not be written.
    WriteFailed(String),
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::HttpError(code) => write!(f, "HTTP error: {}", code),
            SubmitError::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            SubmitError::WriteFailed(msg) => write!(f, "Write failed: {}", msg),
        }
    }
}

impl std::error::Error for SubmitError {}

impl From<reqwest::Error> for SubmitError {
    fn from(err: reqwest::Error) -> Self {
        SubmitError::RequestFailed(err.to_string())
    }
}

impl From<std::io::Error> for SubmitError {
    fn from(err: std::io::Error) -> Self {
        SubmitError::WriteFailed(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
