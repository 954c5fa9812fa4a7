//! Supercommerce admin API tools, one module per tool.

pub mod create_address;
pub mod create_main_product;
pub mod edit_order_status;
pub mod edit_promo_code;
pub mod get_details_product_by_id;
pub mod get_product_list;
pub mod list_orders;
pub mod list_payment_methods;
pub mod login;
pub mod view_customer;
pub mod view_order;
