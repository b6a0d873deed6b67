//! Products and branches.
//!
//! Catalog maintenance is not part of checkout; these actors give the engine an
//! in-process catalog to read prices and names from.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::CatalogClient;
use crate::model::{Branch, Product};
use actor_framework::ResourceActor;

/// Creates the product and branch actors and the catalog client over both.
pub fn new(
    buffer_size: usize,
) -> (ResourceActor<Product>, ResourceActor<Branch>, CatalogClient) {
    let (product_actor, products) = ResourceActor::new(buffer_size);
    let (branch_actor, branches) = ResourceActor::new(buffer_size);
    (
        product_actor,
        branch_actor,
        CatalogClient::new(products, branches),
    )
}
