//! Client for the GDDP result service.
//!
//! Loads the product catalog, keeps the user's product / variable / date /
//! geometry selection, validates it and posts it to `/fetchResult`, saving
//! the returned file.
//!
//! Modules:
//! - `model`: shared types and error enums.
//! - `merge`: the shallow overwrite merge used for inputs and payloads.
//! - `catalog`: `/getBoundaries` loader.
//! - `selection`: selection store and snapshots.
//! - `validate`: submission validator.
//! - `request`: payload builder.
//! - `submit`: `/fetchResult` transport and result files.
//! - `geometry`: GeoJSON files and bounding rectangles.
//! - `cli`: command-line arguments and how they drive the store.
//! - `config`, `logging`: runtime setup.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod geometry;
pub mod logging;
pub mod merge;
pub mod model;
pub mod request;
pub mod selection;
pub mod submit;
pub mod validate;

pub use model::{Payload, Product, UserInputs, Variable};
pub use selection::{SelectionStore, Snapshot};
pub use validate::{Rejection, ValidSelection};
