/// Product catalog client for the `/getBoundaries` endpoint.
///
/// The service answers with a JSON array. Every element is an object with a
/// single key (the product's internal name) whose value describes the
/// product:
///
/// ```json
/// [{"sst_v1": {
///     "product": "SST",
///     "variables": [{"short_name": "sst", "long_name": "Sea surface temperature"}],
///     "domain": [{"geometry": {"coordinates": [[[-180, -90], ...]]}}],
///     "time": ["2020-01-01", "...", "2020-12-31"]
/// }}]
/// ```
///
/// Loading never fails from the caller's point of view: `load_products`
/// logs what went wrong and hands back an empty catalog.

use serde::Deserialize;
use serde_json::Value;

use crate::logging::{self, Component};
use crate::model::{CatalogError, DEFAULT_PRODUCT_COLOR, Product, Variable};

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawProduct {
    product: String,
    #[serde(default)]
    variables: Vec<RawVariable>,
    #[serde(default)]
    domain: Vec<RawDomain>,
    #[serde(default)]
    time: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawVariable {
    short_name: String,
    #[serde(default)]
    long_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDomain {
    geometry: RawGeometry,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    coordinates: Value,
}

// ============================================================================
// URL construction
// ============================================================================

/// Builds the catalog URL for a service base address.
pub fn build_catalog_url(base_url: &str) -> String {
    format!("{}/getBoundaries", base_url.trim_end_matches('/'))
}

// ============================================================================
// Parsing
// ============================================================================

/// Parses a `/getBoundaries` body into products.
///
/// Records that cannot be mapped (not exactly one key, no `product`,
/// empty `domain` or `time`) are skipped with a warning so that one bad
/// entry does not hide the rest of the catalog. Only a body that is not a
/// JSON array at all is an error.
pub fn parse_catalog(json: &str) -> Result<Vec<Product>, CatalogError> {
    let records: Vec<Value> = serde_json::from_str(json)?;

    let mut products = Vec::with_capacity(records.len());
    for (i, record) in records.into_iter().enumerate() {
        match parse_record(record) {
            Ok(product) => products.push(product),
            Err(reason) => logging::warn(
                Component::Catalog,
                None,
                &format!("Skipping catalog record {}: {}", i, reason),
            ),
        }
    }

    Ok(products)
}

fn parse_record(record: Value) -> Result<Product, String> {
    let body = match record {
        Value::Object(map) if map.len() == 1 => map.into_iter().next().map(|(_, v)| v).ok_or("empty record")?,
        Value::Object(map) => return Err(format!("expected a single-key object, got {} keys", map.len())),
        _ => return Err("record is not an object".to_string()),
    };

    let raw: RawProduct = serde_json::from_value(body).map_err(|e| e.to_string())?;

    let bbox = raw
        .domain
        .into_iter()
        .next()
        .map(|d| d.geometry.coordinates)
        .ok_or_else(|| format!("product '{}' has no domain", raw.product))?;

    let (valid_start_time, valid_end_time) = match (raw.time.first(), raw.time.last()) {
        (Some(first), Some(last)) => (time_to_string(first), time_to_string(last)),
        _ => return Err(format!("product '{}' has no time axis", raw.product)),
    };

    let variables = raw
        .variables
        .into_iter()
        .map(|v| Variable::new(v.short_name, v.long_name.unwrap_or_default()))
        .collect();

    Ok(Product {
        id: raw.product.clone(),
        label: raw.product,
        variables,
        color: DEFAULT_PRODUCT_COLOR.to_string(),
        bbox,
        valid_start_time,
        valid_end_time,
    })
}

fn time_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// API Client Functions
// ============================================================================

/// Fetch and parse the product catalog with one GET request.
pub fn fetch_catalog(
    client: &reqwest::blocking::Client,
    base_url: &str,
) -> Result<Vec<Product>, CatalogError> {
    let url = build_catalog_url(base_url);

    let response = client
        .get(&url)
        .header("Accept", "application/json")
        .send()?;

    if !response.status().is_success() {
        return Err(CatalogError::HttpError(response.status().as_u16()));
    }

    let text = response.text()?;
    parse_catalog(&text)
}

/// Load the products offered by the service.
///
/// Any failure is logged and degrades to an empty catalog; the caller
/// always gets a list it can present.
pub fn load_products(client: &reqwest::blocking::Client, base_url: &str) -> Vec<Product> {
    match fetch_catalog(client, base_url) {
        Ok(products) => {
            if products.is_empty() {
                logging::warn(Component::Catalog, Some(base_url), "Service returned an empty catalog");
            } else {
                logging::info(
                    Component::Catalog,
                    None,
                    &format!("Loaded {} product(s) from {}", products.len(), base_url),
                );
            }
            products
        }
        Err(e) => {
            logging::log_catalog_failure(&build_catalog_url(base_url), &e);
            Vec::new()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
