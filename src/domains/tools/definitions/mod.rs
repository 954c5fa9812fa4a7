//! Tool definitions module.
//!
//! Each tool lives in its own file under `supercommerce/` and exports a
//! factory producing the uniform `ApiTool` shape. The manifest below pairs
//! every factory with the module identifier its registry name derives from.

pub mod supercommerce;

use super::loader::ManifestEntry;

/// The compiled-in tool manifest, in discovery order.
pub fn manifest() -> Vec<ManifestEntry> {
    vec![
        ManifestEntry {
            path: "supercommerce-api/backend-ap-is/login.js",
            factory: supercommerce::login::api_tool,
        },
        ManifestEntry {
            path: "supercommerce-api/backend-ap-is/view-order.js",
            factory: supercommerce::view_order::api_tool,
        },
        ManifestEntry {
            path: "supercommerce-api/backend-ap-is/list-orders.js",
            factory: supercommerce::list_orders::api_tool,
        },
        ManifestEntry {
            path: "supercommerce-api/backend-ap-is/edit-order-status.js",
            factory: supercommerce::edit_order_status::api_tool,
        },
        ManifestEntry {
            path: "supercommerce-api/backend-ap-is/get-product-list.js",
            factory: supercommerce::get_product_list::api_tool,
        },
        ManifestEntry {
            path: "supercommerce-api/backend-ap-is/get-details-product-by-id.js",
            factory: supercommerce::get_details_product_by_id::api_tool,
        },
        ManifestEntry {
            path: "supercommerce-api/backend-ap-is/create-main-product.js",
            factory: supercommerce::create_main_product::api_tool,
        },
        ManifestEntry {
            path: "supercommerce-api/backend-ap-is/create-address.js",
            factory: supercommerce::create_address::api_tool,
        },
        ManifestEntry {
            path: "supercommerce-api/backend-ap-is/view-customer.js",
            factory: supercommerce::view_customer::api_tool,
        },
        ManifestEntry {
            path: "supercommerce-api/backend-ap-is/list-payment-methods.js",
            factory: supercommerce::list_payment_methods::api_tool,
        },
        ManifestEntry {
            path: "supercommerce-api/backend-ap-is/edit-promo-code.js",
            factory: supercommerce::edit_promo_code::api_tool,
        },
    ]
}
