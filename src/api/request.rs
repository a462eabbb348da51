use bigdecimal::BigDecimal;
use serde::Deserialize;

/// Order placement body: `{"items": [{"productId": 1, "cantidad": 2}]}`.
///
/// Fields are optional so that missing values surface as a validation error
/// with a readable message instead of a generic deserialization failure.
/// There is no price field.
#[derive(Deserialize, Debug, Default)]
pub struct CreateOrderRequest {
    pub items: Option<Vec<OrderItemRequest>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: Option<i64>,
    #[serde(alias = "quantity")]
    pub cantidad: Option<i64>,
}

#[derive(Deserialize, Debug)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub stock: i32,
    pub image_url: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<BigDecimal>,
    pub stock: Option<i32>,
    pub image_url: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
