//! Selection store: everything the user has picked so far.
//!
//! Product choice, variable flags, form inputs and the drawn geometry are
//! explicit fields of one store. Each mutation touches only its own piece of
//! state and takes effect immediately. A `Snapshot` borrows the current
//! contents for one validation/submission attempt.

use serde_json::Value;

use crate::merge::shallow_merge;
use crate::model::{Geometry, Product, SelectionError, UserInputs};

#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    product: Option<Product>,
    user_inputs: UserInputs,
    geometry: Vec<Geometry>,
}

/// Point-in-time view of a `SelectionStore`.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub product: Option<&'a Product>,
    pub user_inputs: &'a UserInputs,
    pub geometry: &'a [Geometry],
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the chosen product. All of its variable flags start
    /// unselected, whatever the passed value carried.
    pub fn set_product(&mut self, mut product: Product) {
        for v in &mut product.variables {
            v.selected = false;
        }
        self.product = Some(product);
    }

    /// Sets one variable flag of the chosen product.
    pub fn set_variable_selected(&mut self, key: &str, selected: bool) -> Result<(), SelectionError> {
        let product = self.product.as_mut().ok_or(SelectionError::NoProduct)?;
        let variable = product
            .variables
            .iter_mut()
            .find(|v| v.key == key)
            .ok_or_else(|| SelectionError::UnknownVariable(key.to_string()))?;
        variable.selected = selected;
        Ok(())
    }

    /// Right-biased merge of `partial` into the user inputs.
    pub fn merge_user_inputs(&mut self, partial: &UserInputs) {
        shallow_merge(&mut self.user_inputs, partial);
    }

    /// One-key form of `merge_user_inputs`.
    pub fn set_user_input(&mut self, key: &str, value: impl Into<Value>) {
        let mut partial = UserInputs::new();
        partial.insert(key.to_string(), value.into());
        self.merge_user_inputs(&partial);
    }

    /// Replaces the whole geometry sequence.
    pub fn set_geometry(&mut self, features: Vec<Geometry>) {
        self.geometry = features;
    }

    pub fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    pub fn user_inputs(&self) -> &UserInputs {
        &self.user_inputs
    }

    pub fn geometry(&self) -> &[Geometry] {
        &self.geometry
    }

    /// Selected variable keys of the chosen product; empty without one.
    pub fn selected_keys(&self) -> Vec<String> {
        self.product.as_ref().map(Product::selected_keys).unwrap_or_default()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            product: self.product.as_ref(),
            user_inputs: &self.user_inputs,
            geometry: &self.geometry,
        }
    }
}
