//! [`ActorEntity`] implementations for [`Product`] and [`Branch`].

use super::error::CatalogError;
use crate::model::{
    Branch, BranchCreate, BranchId, BranchUpdate, Product, ProductCreate, ProductId, ProductUpdate,
};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use rust_decimal::Decimal;

fn non_blank(name: String) -> Result<String, CatalogError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::BlankName);
    }
    Ok(trimmed.to_string())
}

fn valid_price(price: Decimal) -> Result<Decimal, CatalogError> {
    if price.is_sign_negative() {
        return Err(CatalogError::InvalidPrice(price));
    }
    Ok(price)
}

#[async_trait]
impl ActorEntity for Product {
    type Id = ProductId;
    type Create = ProductCreate;
    type Update = ProductUpdate;
    type Action = ();
    type ActionResult = ();
    type Filter = ();
    type Context = ();
    type Error = CatalogError;

    fn id(&self) -> ProductId {
        self.id
    }

    fn from_create_params(seq: u32, params: ProductCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProductId(seq),
            name: non_blank(params.name)?,
            unit_price: valid_price(params.unit_price)?,
            size: params.size,
        })
    }

    /// Handles updates to the Product entity.
    ///
    /// The update is validated as a whole before any field changes.
    async fn on_update(&mut self, update: ProductUpdate, _ctx: &()) -> Result<(), Self::Error> {
        let name = update.name.map(non_blank).transpose()?;
        let unit_price = update.unit_price.map(valid_price).transpose()?;
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(unit_price) = unit_price {
            self.unit_price = unit_price;
        }
        if let Some(size) = update.size {
            self.size = Some(size);
        }
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[async_trait]
impl ActorEntity for Branch {
    type Id = BranchId;
    type Create = BranchCreate;
    type Update = BranchUpdate;
    type Action = ();
    type ActionResult = ();
    type Filter = ();
    type Context = ();
    type Error = CatalogError;

    fn id(&self) -> BranchId {
        self.id
    }

    fn from_create_params(seq: u32, params: BranchCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            id: BranchId(seq),
            name: non_blank(params.name)?,
            region: params.region,
        })
    }

    async fn on_update(&mut self, update: BranchUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(name) = update.name {
            self.name = non_blank(name)?;
        }
        if let Some(region) = update.region {
            self.region = region;
        }
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), Self::Error> {
        Ok(())
    }
}
