//! Catalog, policy and search operations.

use serde::Deserialize;
use tracing::instrument;

use super::{CacheHint, LocalizedStorefront, QueryOptions, documents};
use crate::shopify::{
    Collection, CollectionSummary, PredictiveSearchResults, Product, ProductSummary,
    SearchResults, ShopPolicies, ShopifyError,
};

#[derive(Deserialize)]
struct Nodes<T> {
    nodes: Vec<T>,
}

impl LocalizedStorefront<'_> {
    /// Get a product by its handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(locale = %self.locale()))]
    pub async fn product(&self, handle: &str) -> Result<Option<Product>, ShopifyError> {
        #[derive(Deserialize)]
        struct Data {
            product: Option<Product>,
        }

        let data: Data = self
            .query(
                documents::PRODUCT,
                QueryOptions::new()
                    .variable("handle", handle)
                    .cache(CacheHint::Short),
            )
            .await?;
        Ok(data.product)
    }

    /// Get a collection with one page of its products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(locale = %self.locale()))]
    pub async fn collection(
        &self,
        handle: &str,
        first: u32,
        after: Option<&str>,
    ) -> Result<Option<Collection>, ShopifyError> {
        #[derive(Deserialize)]
        struct Data {
            collection: Option<Collection>,
        }

        let data: Data = self
            .query(
                documents::COLLECTION,
                QueryOptions::new()
                    .variable("handle", handle)
                    .variable("first", first)
                    .variable("after", after)
                    .cache(CacheHint::Short),
            )
            .await?;
        Ok(data.collection)
    }

    /// The most recently updated collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(locale = %self.locale()))]
    pub async fn featured_collection(&self) -> Result<Option<CollectionSummary>, ShopifyError> {
        #[derive(Deserialize)]
        struct Data {
            collections: Nodes<CollectionSummary>,
        }

        let data: Data = self
            .query(
                documents::FEATURED_COLLECTION,
                QueryOptions::new().cache(CacheHint::Long),
            )
            .await?;
        Ok(data.collections.nodes.into_iter().next())
    }

    /// The most recently updated products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(locale = %self.locale()))]
    pub async fn recommended_products(
        &self,
        first: u32,
    ) -> Result<Vec<ProductSummary>, ShopifyError> {
        #[derive(Deserialize)]
        struct Data {
            products: Nodes<ProductSummary>,
        }

        let data: Data = self
            .query(
                documents::RECOMMENDED_PRODUCTS,
                QueryOptions::new()
                    .variable("first", first)
                    .cache(CacheHint::Short),
            )
            .await?;
        Ok(data.products.nodes)
    }

    /// All shop policies.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(locale = %self.locale()))]
    pub async fn policies(&self) -> Result<ShopPolicies, ShopifyError> {
        #[derive(Deserialize)]
        struct Data {
            shop: ShopPolicies,
        }

        let data: Data = self
            .query(documents::POLICIES, QueryOptions::new().cache(CacheHint::Long))
            .await?;
        Ok(data.shop)
    }

    /// Full-text search over products and collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(locale = %self.locale()))]
    pub async fn search(&self, query: &str, first: u32) -> Result<SearchResults, ShopifyError> {
        self.query(
            documents::SEARCH,
            QueryOptions::new()
                .variable("query", query)
                .variable("first", first)
                .cache(CacheHint::Short),
        )
        .await
    }

    /// Type-ahead search returning products, collections and query
    /// suggestions.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(locale = %self.locale()))]
    pub async fn predictive_search(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<PredictiveSearchResults, ShopifyError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            predictive_search: Option<PredictiveSearchResults>,
        }

        let data: Data = self
            .query(
                documents::PREDICTIVE_SEARCH,
                QueryOptions::new()
                    .variable("query", query)
                    .variable("limit", limit)
                    .cache(CacheHint::Short),
            )
            .await?;
        Ok(data.predictive_search.unwrap_or_default())
    }
}
