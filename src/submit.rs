/// Result service client for the `/fetchResult` endpoint.
///
/// Posts a request payload and returns the response body untouched. The
/// service answers with a binary file (NetCDF, or a zip of rendered layers
/// depending on deployment); nothing here inspects its format.
///
/// There is no retry. A failed submission is reported once and the caller
/// decides what to tell the user.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde_json::Value;

use crate::model::{END_TIME, Payload, START_TIME, SubmitError};

/// Builds the submission URL for a service base address.
pub fn build_submit_url(base_url: &str) -> String {
    format!("{}/fetchResult", base_url.trim_end_matches('/'))
}

/// Post `payload` as JSON and return the raw response body.
pub fn submit(
    client: &reqwest::blocking::Client,
    base_url: &str,
    payload: &Payload,
) -> Result<Vec<u8>, SubmitError> {
    let url = build_submit_url(base_url);

    let response = client
        .post(&url)
        .header("Accept", "application/x-netcdf, */*")
        .json(payload)
        .send()?;

    if !response.status().is_success() {
        return Err(SubmitError::HttpError(response.status().as_u16()));
    }

    Ok(response.bytes()?.to_vec())
}

/// Write a result file, creating missing parent directories.
///
/// The bytes go to a temporary file next to `path` which is renamed into
/// place once complete, so a failed write never leaves a partial file under
/// the final name.
pub fn save_result(path: &Path, bytes: &[u8]) -> Result<(), SubmitError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// File name for a result when the user did not choose one:
/// `{product}_{start}_{end}.nc`, reduced to characters safe in file names.
pub fn default_file_name(payload: &Payload) -> String {
    let part = |key: &str| -> String {
        match payload.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    };

    let stem = [part("product"), part(START_TIME), part(END_TIME)]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    let safe: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
        .collect();

    if safe.is_empty() {
        "result.nc".to_string()
    } else {
        format!("{}.nc", safe)
    }
}
