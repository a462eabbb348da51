use crate::api::request::{CreateProductRequest, UpdateProductRequest};
use crate::api::response::{OrderLineResponse, OrderResponse, ProductResponse, UserResponse};
use crate::data::models::order::{OrderLine, OrderWithItems};
use crate::data::models::product::{NewProduct, Product, UpdateProduct};
use crate::data::models::user::User;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

impl From<CreateProductRequest> for NewProduct {
    fn from(req: CreateProductRequest) -> Self {
        NewProduct {
            name: req.name.trim().to_string(),
            description: req.description,
            price: req.price,
            stock: req.stock,
            image_url: req.image_url,
        }
    }
}

impl From<UpdateProductRequest> for UpdateProduct {
    fn from(req: UpdateProductRequest) -> Self {
        UpdateProduct {
            name: req.name.map(|n| n.trim().to_string()),
            description: req.description,
            price: req.price,
            stock: req.stock,
            image_url: req.image_url,
        }
    }
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        ProductResponse {
            product_id: product.product_id,
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            image_url: product.image_url,
            created_at: product.created_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

impl From<OrderLine> for OrderLineResponse {
    fn from(line: OrderLine) -> Self {
        OrderLineResponse {
            product_id: line.product_id,
            name: line.product_name,
            quantity: line.quantity,
            unit_price: line.unit_price,
        }
    }
}

impl From<OrderWithItems> for OrderResponse {
    fn from(entry: OrderWithItems) -> Self {
        let OrderWithItems { order, items } = entry;

        OrderResponse {
            order_id: order.order_id,
            total: order.total,
            status: order.status,
            created_at: order.created_at.format(TIMESTAMP_FORMAT).to_string(),
            items: items.into_iter().map(OrderLineResponse::from).collect(),
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            user_id: user.user_id,
            role: user.get_role().as_str().to_string(),
            name: user.name,
            email: user.email,
        }
    }
}
