use crate::catalog_actor::CatalogError;
use crate::model::{
    Branch, BranchCreate, BranchId, Product, ProductCreate, ProductId, ProductUpdate,
};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

/// Read-only view of the catalog used by checkout and reporting.
///
/// The engine never writes through this trait. Tests substitute their own implementation
/// to simulate a catalog that is missing entries.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    async fn product(&self, id: ProductId) -> Result<Option<Product>, CatalogError>;
    async fn branch(&self, id: BranchId) -> Result<Option<Branch>, CatalogError>;
}

fn map_catalog_error(e: FrameworkError) -> CatalogError {
    if let FrameworkError::NotFound(id) = e {
        return CatalogError::NotFound(id);
    }
    match e.entity_error::<CatalogError>() {
        Some(catalog) => catalog.clone(),
        None => CatalogError::ActorCommunicationError(e.to_string()),
    }
}

/// Client for the product and branch actors.
#[derive(Clone)]
pub struct CatalogClient {
    products: ResourceClient<Product>,
    branches: ResourceClient<Branch>,
}

impl CatalogClient {
    pub fn new(products: ResourceClient<Product>, branches: ResourceClient<Branch>) -> Self {
        Self { products, branches }
    }

    #[instrument(skip(self))]
    pub async fn create_product(&self, product: ProductCreate) -> Result<ProductId, CatalogError> {
        debug!("Sending request");
        self.products.create(product).await.map_err(map_catalog_error)
    }

    #[instrument(skip(self))]
    pub async fn create_branch(&self, branch: BranchCreate) -> Result<BranchId, CatalogError> {
        debug!("Sending request");
        self.branches.create(branch).await.map_err(map_catalog_error)
    }

    /// Changes a product's price. Sales already recorded keep the price they were made at.
    #[instrument(skip(self))]
    pub async fn update_price(&self, id: ProductId, unit_price: Decimal) -> Result<Product, CatalogError> {
        debug!("Sending request");
        let update = ProductUpdate {
            unit_price: Some(unit_price),
            ..ProductUpdate::default()
        };
        self.products.update(id, update).await.map_err(map_catalog_error)
    }
}

#[async_trait]
impl ActorClient<Product> for CatalogClient {
    type Error = CatalogError;

    fn inner(&self) -> &ResourceClient<Product> {
        &self.products
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        map_catalog_error(e)
    }
}

#[async_trait]
impl ActorClient<Branch> for CatalogClient {
    type Error = CatalogError;

    fn inner(&self) -> &ResourceClient<Branch> {
        &self.branches
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        map_catalog_error(e)
    }
}

#[async_trait]
impl CatalogReader for CatalogClient {
    async fn product(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        ActorClient::<Product>::get(self, id).await
    }

    async fn branch(&self, id: BranchId) -> Result<Option<Branch>, CatalogError> {
        ActorClient::<Branch>::get(self, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> CatalogClient {
        let (product_actor, branch_actor, catalog) = crate::catalog_actor::new(16);
        tokio::spawn(product_actor.run(()));
        tokio::spawn(branch_actor.run(()));
        catalog
    }

    #[tokio::test]
    async fn test_reader_sees_created_items() {
        let catalog = catalog();
        let branch = catalog
            .create_branch(BranchCreate {
                name: "Harbour".into(),
                region: "South".into(),
            })
            .await
            .unwrap();
        let product = catalog
            .create_product(ProductCreate {
                name: "Rye bread".into(),
                unit_price: Decimal::new(350, 2),
                size: None,
            })
            .await
            .unwrap();

        assert_eq!(catalog.branch(branch).await.unwrap().unwrap().name, "Harbour");
        assert_eq!(
            catalog.product(product).await.unwrap().unwrap().unit_price,
            Decimal::new(350, 2)
        );
        assert!(catalog.product(ProductId(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_price() {
        let catalog = catalog();
        let id = catalog
            .create_product(ProductCreate {
                name: "Tea".into(),
                unit_price: Decimal::new(400, 2),
                size: Some("100g".into()),
            })
            .await
            .unwrap();

        let updated = catalog.update_price(id, Decimal::new(450, 2)).await.unwrap();
        assert_eq!(updated.unit_price, Decimal::new(450, 2));

        let missing = catalog.update_price(ProductId(42), Decimal::ONE).await;
        assert!(matches!(missing, Err(CatalogError::NotFound(_))));

        let negative = catalog.update_price(id, Decimal::NEGATIVE_ONE).await;
        assert!(matches!(negative, Err(CatalogError::InvalidPrice(_))));
    }
}
