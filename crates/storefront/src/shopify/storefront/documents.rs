//! Storefront GraphQL operations.
//!
//! Each document is its operation file from `graphql/storefront/` followed
//! by the fragments it spreads, so it can be sent as-is. The operation name
//! is declared alongside and sent as `operationName`.

/// A named operation and the document that defines it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    pub document: &'static str,
}

macro_rules! operation {
    ($name:literal, $file:literal $(, $fragment:literal)* $(,)?) => {
        Operation {
            name: $name,
            document: concat!(
                include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/graphql/storefront/", $file))
                $(, "\n", include_str!(concat!(
                    env!("CARGO_MANIFEST_DIR"),
                    "/graphql/storefront/fragments/",
                    $fragment
                )))*
            ),
        }
    };
}

// Carts

pub const CART: Operation =
    operation!("Cart", "cart.graphql", "cart.graphql", "money.graphql", "image.graphql");
pub const CART_CREATE: Operation = operation!(
    "CartCreate",
    "cart_create.graphql",
    "cart.graphql",
    "money.graphql",
    "image.graphql",
);
pub const CART_LINES_ADD: Operation = operation!(
    "CartLinesAdd",
    "cart_lines_add.graphql",
    "cart.graphql",
    "money.graphql",
    "image.graphql",
);
pub const CART_LINES_UPDATE: Operation = operation!(
    "CartLinesUpdate",
    "cart_lines_update.graphql",
    "cart.graphql",
    "money.graphql",
    "image.graphql",
);
pub const CART_LINES_REMOVE: Operation = operation!(
    "CartLinesRemove",
    "cart_lines_remove.graphql",
    "cart.graphql",
    "money.graphql",
    "image.graphql",
);

// Catalog

pub const PRODUCT: Operation =
    operation!("Product", "product.graphql", "image.graphql", "money.graphql");
pub const COLLECTION: Operation = operation!(
    "Collection",
    "collection.graphql",
    "product_card.graphql",
    "image.graphql",
    "money.graphql",
);
pub const FEATURED_COLLECTION: Operation = operation!(
    "FeaturedCollection",
    "featured_collection.graphql",
    "collection_card.graphql",
    "image.graphql",
);
pub const RECOMMENDED_PRODUCTS: Operation = operation!(
    "RecommendedProducts",
    "recommended_products.graphql",
    "product_card.graphql",
    "image.graphql",
    "money.graphql",
);
pub const POLICIES: Operation = operation!("Policies", "policies.graphql");

// Search

pub const SEARCH: Operation = operation!(
    "Search",
    "search.graphql",
    "product_card.graphql",
    "collection_card.graphql",
    "image.graphql",
    "money.graphql",
);
pub const PREDICTIVE_SEARCH: Operation = operation!(
    "PredictiveSearch",
    "predictive_search.graphql",
    "product_card.graphql",
    "collection_card.graphql",
    "image.graphql",
    "money.graphql",
);

// Routing

pub const URL_REDIRECTS: Operation = operation!("UrlRedirects", "url_redirects.graphql");
