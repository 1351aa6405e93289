//! Shallow overwrite merge for JSON objects.
//!
//! Both the user-input accumulator and the final request payload resolve key
//! collisions the same way: the right-hand side wins, keys it does not
//! mention are kept. Nested objects are replaced, never merged.

use serde_json::{Map, Value};

/// Copies every entry of `overlay` into `target`, replacing existing values
/// under the same key.
pub fn shallow_merge(target: &mut Map<String, Value>, overlay: &Map<String, Value>) {
    for (key, value) in overlay {
        target.insert(key.clone(), value.clone());
    }
}
