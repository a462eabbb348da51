use crate::data::models::product::{NewProduct, Product, ProductDeletion, UpdateProduct};
use crate::data::models::user::UserRole;
use crate::data::repos::traits::product_repository::ProductRepository;
use crate::services::errors::ProductServiceError;
use bigdecimal::{BigDecimal, Zero};

#[derive(Clone)]
pub struct ProductService<R> {
    repo: R,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repo: R) -> Self {
        ProductService { repo }
    }

    pub async fn get_all_products(&self) -> Result<Vec<Product>, ProductServiceError> {
        Ok(self.repo.get_all_products().await?)
    }

    pub async fn get_product_by_id(&self, product_id: i32) -> Result<Product, ProductServiceError> {
        self.repo
            .get_product_by_id(product_id)
            .await?
            .ok_or(ProductServiceError::ProductNotFound)
    }

    /// Creates a product (requires Admin)
    #[tracing::instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create_product(
        &self,
        role: UserRole,
        product: NewProduct,
    ) -> Result<i32, ProductServiceError> {
        Self::require_admin(role)?;
        validate_fields(Some(&product.name), Some(&product.price), Some(product.stock))?;

        let product_id = self.repo.add_product(product).await?;
        tracing::info!(product_id, "Product created");
        Ok(product_id)
    }

    /// Updates the given fields of a product (requires Admin)
    #[tracing::instrument(skip(self, changes))]
    pub async fn update_product(
        &self,
        role: UserRole,
        product_id: i32,
        changes: UpdateProduct,
    ) -> Result<(), ProductServiceError> {
        Self::require_admin(role)?;
        validate_fields(changes.name.as_ref(), changes.price.as_ref(), changes.stock)?;

        if self.repo.update_product(product_id, changes).await? {
            Ok(())
        } else {
            Err(ProductServiceError::ProductNotFound)
        }
    }

    /// Deletes a product that no order line references (requires Admin)
    #[tracing::instrument(skip(self))]
    pub async fn delete_product(
        &self,
        role: UserRole,
        product_id: i32,
    ) -> Result<(), ProductServiceError> {
        Self::require_admin(role)?;

        match self.repo.delete_product(product_id).await? {
            ProductDeletion::Deleted => {
                tracing::info!(product_id, "Product deleted");
                Ok(())
            }
            ProductDeletion::NotFound => Err(ProductServiceError::ProductNotFound),
            ProductDeletion::Referenced => Err(ProductServiceError::ProductInUse),
        }
    }

    fn require_admin(role: UserRole) -> Result<(), ProductServiceError> {
        match role {
            UserRole::Admin => Ok(()),
            UserRole::Customer => Err(ProductServiceError::PermissionDenied),
        }
    }
}

const PRICE_SCALE: i64 = 2;
const PRICE_LIMIT: i64 = 100_000_000;

fn validate_fields(
    name: Option<&String>,
    price: Option<&BigDecimal>,
    stock: Option<i32>,
) -> Result<(), ProductServiceError> {
    if name.is_some_and(|n| n.trim().is_empty()) {
        return Err(ProductServiceError::InvalidProduct(
            "Name must not be empty".into(),
        ));
    }
    if let Some(price) = price {
        if *price < BigDecimal::zero() {
            return Err(ProductServiceError::InvalidProduct(
                "Price must not be negative".into(),
            ));
        }
        // Prices are stored as DECIMAL(10,2).
        if price.with_scale(PRICE_SCALE) != *price || *price >= BigDecimal::from(PRICE_LIMIT) {
            return Err(ProductServiceError::InvalidProduct(format!(
                "Price must have at most {} decimal places and be below {}",
                PRICE_SCALE, PRICE_LIMIT
            )));
        }
    }
    if stock.is_some_and(|s| s < 0) {
        return Err(ProductServiceError::InvalidProduct(
            "Stock must not be negative".into(),
        ));
    }
    Ok(())
}
