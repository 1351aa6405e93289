//! Live service checks
//!
//! Talk to a running result service (default http://127.0.0.1:5000, or
//! GDDP_SERVICE_URL from the environment / .env). They are marked
//! #[ignore] so normal builds don't depend on the service being up.
//!
//! Run with: cargo test --test live_service -- --ignored --test-threads=1

use gddp_fetch::catalog::fetch_catalog;
use gddp_fetch::config::load_config_with_env;
use gddp_fetch::model::{END_TIME, START_TIME};
use gddp_fetch::request::build;
use gddp_fetch::submit::submit;
use gddp_fetch::validate::validate;
use gddp_fetch::{geometry, SelectionStore};

fn setup() -> (reqwest::blocking::Client, String) {
    let config = load_config_with_env(None).expect("config should load");
    let client = config.http_client().expect("client should build");
    (client, config.service.base_url)
}

#[test]
#[ignore] // Don't run in CI - depends on a running service
fn test_live_catalog_lists_products() {
    let (client, base) = setup();

    let products = fetch_catalog(&client, &base).expect("catalog request should succeed");

    println!("\n🔍 Catalog at {}:", base);
    for p in &products {
        println!("  {} ({} variables, {} .. {})", p.id, p.variables.len(), p.valid_start_time, p.valid_end_time);
    }

    assert!(!products.is_empty(), "service returned no products");
    for p in &products {
        assert!(!p.variables.is_empty(), "product '{}' has no variables", p.id);
    }
}

#[test]
#[ignore] // Don't run in CI - depends on a running service
fn test_live_submit_first_variable_of_first_product() {
    let (client, base) = setup();

    let products = fetch_catalog(&client, &base).expect("catalog request should succeed");
    let product = products.first().cloned().expect("service returned no products");
    let key = product.variables[0].key.clone();
    let start = product.valid_start_time.clone();

    let mut store = SelectionStore::new();
    if let Some([w, s, e, n]) = product.bbox_extent() {
        store.set_geometry(vec![geometry::rectangle(w, s, e, n).expect("catalog extent should be valid")]);
    }
    store.set_product(product);
    store.set_variable_selected(&key, true).unwrap();
    store.set_user_input(START_TIME, start.as_str());
    store.set_user_input(END_TIME, start.as_str());

    let snapshot = store.snapshot();
    let payload = build(&validate(&snapshot).expect("selection should validate"));

    let bytes = submit(&client, &base, &payload).expect("submission should succeed");
    println!("\n✓ received {} bytes", bytes.len());
    assert!(!bytes.is_empty());
}
