use storefront_server_lib::data::models::product::{NewProduct, UpdateProduct};
use storefront_server_lib::data::models::user::UserRole;
use storefront_server_lib::data::repos::implementors::memory_repo::MemoryDatabase;
use storefront_server_lib::services::errors::ProductServiceError;
use storefront_server_lib::services::order_service::{CartItem, OrderService};
use storefront_server_lib::services::product_service::ProductService;
use bigdecimal::BigDecimal;
use std::str::FromStr;

fn new_product(name: &str, price: &str, stock: i32) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        description: None,
        price: BigDecimal::from_str(price).unwrap(),
        stock,
        image_url: None,
    }
}

#[tokio::test]
async fn test_create_and_get_product() {
    let service = ProductService::new(MemoryDatabase::new());

    let product_id = service
        .create_product(UserRole::Admin, new_product("Hammer", "10.00", 5))
        .await
        .expect("Failed to create product");

    let product = service.get_product_by_id(product_id).await.unwrap();
    assert_eq!(product.name, "Hammer");
    assert_eq!(product.stock, 5);

    let all = service.get_all_products().await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_customer_cannot_manage_products() {
    let service = ProductService::new(MemoryDatabase::new());
    let product_id = service
        .create_product(UserRole::Admin, new_product("Saw", "25.00", 2))
        .await
        .unwrap();

    assert_eq!(
        service
            .create_product(UserRole::Customer, new_product("Saw", "25.00", 2))
            .await,
        Err(ProductServiceError::PermissionDenied)
    );
    assert_eq!(
        service
            .update_product(UserRole::Customer, product_id, UpdateProduct::default())
            .await,
        Err(ProductServiceError::PermissionDenied)
    );
    assert_eq!(
        service.delete_product(UserRole::Customer, product_id).await,
        Err(ProductServiceError::PermissionDenied)
    );
}

#[tokio::test]
async fn test_invalid_products_are_rejected() {
    let service = ProductService::new(MemoryDatabase::new());

    let result = service
        .create_product(UserRole::Admin, new_product("Saw", "-0.01", 2))
        .await;
    assert!(matches!(result, Err(ProductServiceError::InvalidProduct(_))));

    let product_id = service
        .create_product(UserRole::Admin, new_product("Saw", "1.00", 2))
        .await
        .unwrap();

    let result = service
        .update_product(
            UserRole::Admin,
            product_id,
            UpdateProduct {
                stock: Some(-1),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(ProductServiceError::InvalidProduct(_))));
    assert_eq!(service.get_product_by_id(product_id).await.unwrap().stock, 2);
}

#[tokio::test]
async fn test_update_missing_product() {
    let service = ProductService::new(MemoryDatabase::new());

    let result = service
        .update_product(
            UserRole::Admin,
            404,
            UpdateProduct {
                stock: Some(1),
                ..Default::default()
            },
        )
        .await;

    assert_eq!(result, Err(ProductServiceError::ProductNotFound));
    assert_eq!(
        service.get_product_by_id(404).await,
        Err(ProductServiceError::ProductNotFound)
    );
}

#[tokio::test]
async fn test_delete_product_in_use() {
    let db = MemoryDatabase::new();
    let service = ProductService::new(db.clone());
    let product_id = service
        .create_product(UserRole::Admin, new_product("Pliers", "12.00", 3))
        .await
        .unwrap();

    OrderService::new(db)
        .place_order(
            1,
            vec![CartItem {
                product_id,
                quantity: 1,
            }],
        )
        .await
        .unwrap();

    assert_eq!(
        service.delete_product(UserRole::Admin, product_id).await,
        Err(ProductServiceError::ProductInUse)
    );
    assert!(service.get_product_by_id(product_id).await.is_ok());
}

#[tokio::test]
async fn test_price_must_fit_two_decimal_column() {
    let service = ProductService::new(MemoryDatabase::new());

    for price in ["1.005", "0.001", "100000000", "123456789.00"] {
        let result = service
            .create_product(UserRole::Admin, new_product("Level", price, 1))
            .await;
        assert!(
            matches!(result, Err(ProductServiceError::InvalidProduct(_))),
            "price {price}"
        );
    }

    for price in ["2.500", "99999999.99", "0"] {
        service
            .create_product(UserRole::Admin, new_product("Level", price, 1))
            .await
            .unwrap_or_else(|e| panic!("price {price} rejected: {e}"));
    }

    let product_id = service
        .create_product(UserRole::Admin, new_product("Square", "7.25", 1))
        .await
        .unwrap();
    let result = service
        .update_product(
            UserRole::Admin,
            product_id,
            UpdateProduct {
                price: Some(BigDecimal::from_str("7.255").unwrap()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(ProductServiceError::InvalidProduct(_))));
    assert_eq!(
        service.get_product_by_id(product_id).await.unwrap().price,
        BigDecimal::from_str("7.25").unwrap()
    );
}
