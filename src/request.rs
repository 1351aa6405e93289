//! Request payload assembly for `/fetchResult`.

use serde_json::Value;

use crate::merge::shallow_merge;
use crate::model::Payload;
use crate::validate::ValidSelection;

/// Builds the JSON body for a validated selection.
///
/// The computed keys `variables`, `product` and `bounding_geom` come first;
/// the user inputs are merged on top and win any collision.
pub fn build(selection: &ValidSelection) -> Payload {
    let mut payload = Payload::new();
    payload.insert(
        "variables".to_string(),
        Value::Array(selection.variables.iter().cloned().map(Value::String).collect()),
    );
    payload.insert("product".to_string(), Value::String(selection.product.id.clone()));
    payload.insert("bounding_geom".to_string(), Value::Array(selection.geometry.to_vec()));

    shallow_merge(&mut payload, selection.user_inputs);
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DEFAULT_PRODUCT_COLOR, END_TIME, Product, START_TIME, Variable};
    use crate::selection::SelectionStore;
    use crate::validate::validate;
    use serde_json::json;

    fn store_with(keys: &[&str], selected: &[&str]) -> SelectionStore {
        let mut store = SelectionStore::new();
        store.set_product(Product {
            id: "GDDP".to_string(),
            label: "GDDP".to_string(),
            variables: keys.iter().map(|k| Variable::new(*k, "")).collect(),
            color: DEFAULT_PRODUCT_COLOR.to_string(),
            bbox: Value::Null,
            valid_start_time: "1950-01-01".to_string(),
            valid_end_time: "2100-12-31".to_string(),
        });
        for k in selected {
            store.set_variable_selected(k, true).unwrap();
        }
        store.set_user_input(START_TIME, "2030-01-01");
        store.set_user_input(END_TIME, "2030-12-31");
        store
    }

    #[test]
    fn test_payload_contains_computed_keys_and_inputs() {
        let mut store = store_with(&["tasmax", "tasmin", "pr"], &["pr", "tasmax"]);
        let ring = json!({"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]});
        store.set_geometry(vec![ring.clone()]);

        let snapshot = store.snapshot();
        let payload = build(&validate(&snapshot).unwrap());

        assert_eq!(payload["variables"], json!(["tasmax", "pr"]));
        assert_eq!(payload["product"], json!("GDDP"));
        assert_eq!(payload["bounding_geom"], json!([ring]));
        assert_eq!(payload[START_TIME], json!("2030-01-01"));
        assert_eq!(payload[END_TIME], json!("2030-12-31"));
        assert_eq!(payload.len(), 5);
    }

    #[test]
    fn test_empty_geometry_gives_empty_array() {
        let store = store_with(&["pr"], &["pr"]);
        let snapshot = store.snapshot();
        let payload = build(&validate(&snapshot).unwrap());
        assert_eq!(payload["bounding_geom"], json!([]));
    }

    #[test]
    fn test_user_inputs_override_computed_keys() {
        let mut store = store_with(&["pr"], &["pr"]);
        store.set_user_input("product", "OVERRIDE");
        let snapshot = store.snapshot();
        let payload = build(&validate(&snapshot).unwrap());
        assert_eq!(payload["product"], json!("OVERRIDE"));
        assert_eq!(payload["variables"], json!(["pr"]));
    }

    #[test]
    fn test_extra_inputs_are_passed_through() {
        let mut store = store_with(&["pr"], &["pr"]);
        store.set_user_input("scenario", "rcp85");
        let snapshot = store.snapshot();
        let payload = build(&validate(&snapshot).unwrap());
        assert_eq!(payload["scenario"], json!("rcp85"));
    }
}
