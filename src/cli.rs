//! Command-line surface of the client.
//!
//! Flags stand in for the form widgets: `--product` is the product picker,
//! `--var` the variable checkboxes, `--start` / `--end` / `--input` the form
//! fields and `--geojson` / `--bbox` the map drawing tools. `FetchArgs::apply`
//! feeds them into a `SelectionStore` in that order, so a later `--input`
//! for `start_time` or `end_time` overrides `--start` / `--end`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::geometry::{self, GeometryError};
use crate::logging::{self, Component};
use crate::model::{END_TIME, Product, START_TIME};
use crate::selection::SelectionStore;

#[derive(Parser, Debug)]
#[command(name = "gddp_fetch", version, about = "select GDDP products and fetch result files from the service")]
pub struct Cli {
    /// TOML config file (default: ./gddp_fetch.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// service address, overrides config and GDDP_SERVICE_URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// debug | info | warn | error
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// list the products offered by the service
    Products,
    /// validate a selection and download its result
    Fetch(FetchArgs),
}

#[derive(clap::Args, Debug, Default)]
pub struct FetchArgs {
    /// product id as listed by `products`
    #[arg(short, long)]
    pub product: Option<String>,

    /// variable key, repeatable
    #[arg(long = "var")]
    pub vars: Vec<String>,

    #[arg(long)]
    pub start: Option<String>,

    #[arg(long)]
    pub end: Option<String>,

    /// additional KEY=VALUE form input, repeatable
    #[arg(long = "input", value_parser = parse_key_value)]
    pub inputs: Vec<(String, String)>,

    /// GeoJSON file with the bounding geometry
    #[arg(long, conflicts_with = "bbox")]
    pub geojson: Option<PathBuf>,

    /// bounding rectangle as WEST,SOUTH,EAST,NORTH
    #[arg(long, allow_hyphen_values = true)]
    pub bbox: Option<String>,

    /// result file (default: <product>_<start>_<end>.nc in the output directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// don't ask for confirmation before submitting
    #[arg(short, long)]
    pub yes: bool,
}

pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((k, v)) if !k.trim().is_empty() => Ok((k.trim().to_string(), v.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}

impl FetchArgs {
    /// Feeds the command-line selection into the store.
    ///
    /// An unknown product or variable is logged and left unselected, so the
    /// validator reports what is missing. Only unreadable geometry input is
    /// an error.
    pub fn apply(&self, store: &mut SelectionStore, products: &[Product]) -> Result<(), GeometryError> {
        if let Some(id) = &self.product {
            match products.iter().find(|p| &p.id == id) {
                Some(p) => store.set_product(p.clone()),
                None => logging::warn(Component::Selection, Some(id.as_str()), "Unknown product"),
            }
        }

        if store.product().is_some() {
            for key in &self.vars {
                if let Err(e) = store.set_variable_selected(key, true) {
                    logging::warn(Component::Selection, Some(key.as_str()), &e.to_string());
                }
            }
        }

        if let Some(start) = &self.start {
            store.set_user_input(START_TIME, start.as_str());
        }
        if let Some(end) = &self.end {
            store.set_user_input(END_TIME, end.as_str());
        }
        for (k, v) in &self.inputs {
            store.set_user_input(k, v.as_str());
        }

        if let Some(path) = &self.geojson {
            store.set_geometry(geometry::load_geojson_file(path)?);
        } else if let Some(bbox) = &self.bbox {
            store.set_geometry(vec![geometry::parse_bbox_arg(bbox)?]);
        }

        Ok(())
    }
}

/// Logs a warning for each of `start_time` / `end_time` that falls outside
/// the product's valid interval and returns the offending keys. Values that
/// are not `YYYY-MM-DD` dates are not checked.
pub fn warn_outside_interval(product: &Product, store: &SelectionStore) -> Vec<&'static str> {
    let mut outside = Vec::new();

    for key in [START_TIME, END_TIME] {
        let Some(value) = store.user_inputs().get(key).and_then(|v| v.as_str()) else {
            continue;
        };
        if product.covers_date(value) == Some(false) {
            logging::warn(
                Component::Selection,
                Some(product.id.as_str()),
                &format!(
                    "{} {} is outside the valid range {} .. {}",
                    key, value, product.valid_start_time, product.valid_end_time
                ),
            );
            outside.push(key);
        }
    }

    outside
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(parse_key_value("scenario=rcp85"), Ok(("scenario".to_string(), "rcp85".to_string())));
        assert_eq!(parse_key_value(" model =a=b"), Ok(("model".to_string(), "a=b".to_string())));
        assert_eq!(parse_key_value("empty="), Ok(("empty".to_string(), String::new())));
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn test_fetch_flags_parse() {
        let cli = Cli::try_parse_from([
            "gddp_fetch", "--base-url", "http://svc:5000", "fetch", "-p", "SST", "--var", "sst", "--var", "sst_anom",
            "--bbox", "-10,-5,10,5", "--yes",
        ])
        .expect("flags should parse");

        assert_eq!(cli.base_url.as_deref(), Some("http://svc:5000"));
        let Command::Fetch(args) = cli.command else {
            panic!("expected fetch subcommand");
        };
        assert_eq!(args.product.as_deref(), Some("SST"));
        assert_eq!(args.vars, vec!["sst", "sst_anom"]);
        assert_eq!(args.bbox.as_deref(), Some("-10,-5,10,5"));
        assert!(args.yes);
    }

    #[test]
    fn test_geojson_and_bbox_conflict() {
        let result = Cli::try_parse_from(["gddp_fetch", "fetch", "--geojson", "area.geojson", "--bbox", "0,0,1,1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_bbox_is_error_and_leaves_geometry_alone() {
        let args = FetchArgs { bbox: Some("1,2,3".to_string()), ..Default::default() };
        let mut store = SelectionStore::new();
        assert!(matches!(args.apply(&mut store, &[]), Err(GeometryError::InvalidBounds(_))));
        assert!(store.geometry().is_empty());
    }
}
