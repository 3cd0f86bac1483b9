//! HTTP surface: one router per resource family, assembled here.

use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod admin;
pub mod cart;
pub mod categories;
pub mod coupons;
pub mod orders;
pub mod products;
pub mod staff;
pub mod users;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(|| async { Json(serde_json::json!({ "message": "App works properly!" })) }),
        )
        .route(
            "/health",
            get(|| async {
                Json(serde_json::json!({ "status": "healthy", "service": "printcraft-commerce" }))
            }),
        )
        .nest("/api/products", product_routes())
        .nest("/api/users", user_routes())
        .nest("/api/order", order_routes())
        .nest("/api/category", category_routes())
        .nest("/api/coupon", coupon_routes())
        .nest("/api/staff", staff_routes())
        .nest("/api/admin", admin_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(products::add_product))
        .route("/all", post(products::add_all_products))
        .route("/getall", get(products::get_all_products))
        .route("/show", get(products::get_showing_products))
        .route("/discount", get(products::get_discounted_products))
        .route("/stock-out", get(products::get_stock_out_products))
        .route("/getall-search", get(products::get_products_by_fields))
        .route("/search", get(products::search_products))
        .route("/similar", get(products::get_similar_products))
        .route("/category/:category", get(products::get_products_by_category))
        .route("/singleproduct/:id", get(products::get_product_by_id))
        .route("/update-product/:id", put(products::update_product))
        .route("/status/:id", put(products::update_product_status))
        .route("/delete-product/:id", delete(products::delete_product))
        .route("/rate/:userId", post(products::submit_rating))
        .route("/ratings/:productId", get(products::get_product_ratings))
        .route(
            "/variations/:id",
            post(products::add_variation).get(products::list_variations),
        )
        .route("/generate-template/:id", post(products::generate_template))
        .route("/:slug", get(products::get_product_by_slug))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::get_all_users))
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/signup", post(users::signup_with_provider))
        .route("/change-password", post(users::change_password))
        .route("/forget-password", put(users::forget_password))
        .route("/reset-password", put(users::reset_password))
        .route("/update-user/:userId", put(users::update_user))
        .route("/get-shipping-address/:userId", get(users::get_shipping_address))
        .route("/wishlist/:userId", post(users::toggle_wishlist))
        .route("/get-wishlist/:userId", get(users::get_wishlist))
        .route("/cart/:userId", post(cart::upsert_cart))
        .route("/getcart/:userId", get(cart::get_cart))
        .route("/delete-cart/:userId", delete(cart::remove_cart_item))
        .route("/:id", get(users::get_user_by_id).delete(users::delete_user))
}

fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/create-order/:userId", post(orders::create_order))
        .route("/get-orders", get(orders::get_all_orders))
        .route("/getorder/:userId", get(orders::get_user_orders))
        .route("/updateOrderStatus/:id", put(orders::update_order_status))
        .route("/cancel-order-by-user/:userId", put(orders::cancel_order))
        .route("/dashboard-count", get(orders::dashboard_count))
        .route(
            "/download-invoice/:userId/:orderId",
            get(orders::download_invoice),
        )
        .route("/:id", get(orders::get_order_by_id).delete(orders::delete_order))
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(categories::add_category))
        .route("/all", get(categories::get_all_categories))
        .route("/show", get(categories::get_showing_categories))
        .route("/edit/:id", put(categories::update_category))
        .route("/status/:id", put(categories::update_category_status))
        .route(
            "/:id",
            get(categories::get_category_by_id).delete(categories::delete_category),
        )
}

fn coupon_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(coupons::get_all_coupons))
        .route("/add", post(coupons::add_coupon))
        .route(
            "/:id",
            get(coupons::get_coupon_by_id)
                .put(coupons::update_coupon)
                .delete(coupons::delete_coupon),
        )
}

fn staff_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(staff::add_staff))
        .route("/all", get(staff::get_all_staff))
        .route(
            "/:id",
            get(staff::get_staff_by_id)
                .put(staff::update_staff)
                .delete(staff::delete_staff),
        )
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(admin::register_admin))
        .route("/login", post(admin::login_admin))
        .route("/forget-password", put(admin::forget_password))
        .route("/reset-password", put(admin::reset_password))
        .route("/:id", put(admin::update_admin))
}
