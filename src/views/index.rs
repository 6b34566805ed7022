//! The listing page: upload form plus one card per pet.

use crate::models::pet::PetView;
use tera::{Context, Tera};

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");

/// Render the listing page for `pets`.
///
/// Every interpolated value, including photo URLs, goes through tera's HTML
/// autoescaping.
pub fn render_index(pets: &[PetView]) -> tera::Result<String> {
    let mut context = Context::new();
    context.insert("pets", pets);
    Tera::one_off(INDEX_TEMPLATE, &context, true)
}
