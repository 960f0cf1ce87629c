//! Matches a raw storefront cart against the catalog.
//!
//! Validation fails fast: the first bad line aborts the whole cart, and nothing is written.
use std::collections::HashMap;

use log::*;

use crate::{
    checkout_objects::{CartItem, ValidatedLine},
    db_types::{CatalogProduct, ProductId, StoreId, VariationId},
    shop_api::errors::{CheckoutError, ValidationError},
    traits::CatalogManagement,
};

/// The most lines a single payment session can carry.
pub const MAX_CART_LINES: usize = 100;

pub struct CartValidator<'a, B> {
    catalog: &'a B,
}

impl<'a, B> CartValidator<'a, B>
where B: CatalogManagement
{
    pub fn new(catalog: &'a B) -> Self {
        Self { catalog }
    }

    /// Validates every line of the cart against the store's catalog. The result has one entry per input line, in the
    /// same order.
    ///
    /// * A cart of more than [`MAX_CART_LINES`] lines fails with [`ValidationError::TooManyItems`].
    /// * A line without a product id fails with [`ValidationError::MissingRequiredField`].
    /// * A product that does not exist in this store fails with [`ValidationError::UnknownProduct`].
    /// * A variation that does not belong to the line's product fails with [`ValidationError::UnknownVariation`], even
    ///   if the variation exists elsewhere.
    /// * A line without a variation gets the product's first variation. If there is none, the line fails with
    ///   [`ValidationError::NoVariationAvailable`].
    pub async fn validate(&self, store_id: &StoreId, items: &[CartItem]) -> Result<Vec<ValidatedLine>, CheckoutError> {
        if items.is_empty() {
            return Err(ValidationError::EmptyCart.into());
        }
        if items.len() > MAX_CART_LINES {
            return Err(ValidationError::TooManyItems { count: items.len(), max: MAX_CART_LINES }.into());
        }
        let references = items.iter().map(line_reference).collect::<Result<Vec<_>, _>>()?;
        let mut ids = references.iter().map(|(p, _)| p.clone()).collect::<Vec<ProductId>>();
        ids.sort();
        ids.dedup();
        trace!("🛒️ Looking up {} distinct products for a cart of {} lines in store {store_id}", ids.len(), items.len());
        let products = self
            .catalog
            .fetch_products_by_id(store_id, &ids)
            .await?
            .into_iter()
            .map(|p| (p.product.id.clone(), p))
            .collect::<HashMap<ProductId, CatalogProduct>>();
        let lines = references
            .into_iter()
            .map(|(product_id, variation_id)| match_line(&products, product_id, variation_id))
            .collect::<Result<Vec<ValidatedLine>, ValidationError>>()?;
        debug!("🛒️ Cart of {} lines validated for store {store_id}", lines.len());
        Ok(lines)
    }
}

/// Blank identifiers are treated as absent.
fn line_reference(item: &CartItem) -> Result<(ProductId, Option<VariationId>), ValidationError> {
    let product_id = item
        .product_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ValidationError::MissingRequiredField("productId".into()))?;
    let variation_id = item.variation_id.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(VariationId::from);
    Ok((ProductId::from(product_id), variation_id))
}

fn match_line(
    products: &HashMap<ProductId, CatalogProduct>,
    product_id: ProductId,
    variation_id: Option<VariationId>,
) -> Result<ValidatedLine, ValidationError> {
    let product = products.get(&product_id).ok_or_else(|| {
        debug!("🛒️ Product {product_id} is not in the catalog");
        ValidationError::UnknownProduct(product_id.clone())
    })?;
    let variation = match variation_id {
        Some(variation_id) => product.find_variation(&variation_id).ok_or_else(|| {
            debug!("🛒️ Variation {variation_id} does not belong to product {product_id}");
            ValidationError::UnknownVariation { product_id: product_id.clone(), variation_id }
        })?,
        None => product.default_variation().ok_or_else(|| {
            debug!("🛒️ Product {product_id} has no variations to default to");
            ValidationError::NoVariationAvailable(product_id.clone())
        })?,
    };
    Ok(ValidatedLine::new(product.product.clone(), variation.clone()))
}
