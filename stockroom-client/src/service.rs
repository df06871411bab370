//! Product service
//!
//! Builds paths, query strings and bodies for the product endpoints on top of
//! any [`HttpClient`]. Request/response only: no retries, no caching.

use indexmap::IndexSet;
use shared::{Metric, Page, Product, ProductDraft, Query};
use validator::Validate;

use crate::{ClientResult, HttpClient};

const PRODUCTS: &str = "products";
const CATEGORIES: &str = "products/categories";
const METRICS: &str = "products/metrics";

/// Which stock endpoint a toggle hits
///
/// An explicit two-state toggle: products with stock are marked out of
/// stock, products without stock are restocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockAction {
    MarkOutOfStock,
    MarkInStock,
}

impl StockAction {
    pub fn for_product(product: &Product) -> Self {
        if product.is_in_stock() {
            Self::MarkOutOfStock
        } else {
            Self::MarkInStock
        }
    }

    /// Endpoint path for product `id`
    pub fn path(&self, id: i64) -> String {
        match self {
            Self::MarkOutOfStock => format!("{PRODUCTS}/{id}/outofstock"),
            Self::MarkInStock => format!("{PRODUCTS}/{id}/inStock"),
        }
    }
}

/// Typed access to the product endpoints
#[derive(Debug, Clone)]
pub struct ProductService<H> {
    http: H,
}

impl<H: HttpClient> ProductService<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }

    /// GET products with the query's exact parameter ordering
    pub async fn list(&self, query: &Query) -> ClientResult<Page<Product>> {
        let params = query.request_snapshot();
        self.http.get(PRODUCTS, params.as_slice()).await
    }

    /// POST products; the server assigns the id
    pub async fn create(&self, draft: &ProductDraft) -> ClientResult<Product> {
        draft.validate()?;
        let product: Product = self.http.post(PRODUCTS, draft).await?;
        tracing::info!(id = product.id, name = %product.name, "product created");
        Ok(product)
    }

    /// PUT products/{id}; an unknown id surfaces as `Api { status: 404, .. }`
    pub async fn update(&self, product: &Product) -> ClientResult<Product> {
        product.draft().validate()?;
        let path = format!("{PRODUCTS}/{}", product.id);
        let updated: Product = self.http.put(&path, product).await?;
        tracing::info!(id = updated.id, "product updated");
        Ok(updated)
    }

    /// Toggle stock status through the endpoint matching the current level.
    ///
    /// The backend answers 204 for both endpoints, so the product is only
    /// returned when the server sends one.
    pub async fn set_stock(&self, product: &Product) -> ClientResult<Option<Product>> {
        let action = StockAction::for_product(product);
        let path = action.path(product.id);
        let result = match action {
            StockAction::MarkOutOfStock => self.http.post_empty(&path).await?,
            StockAction::MarkInStock => self.http.put_empty(&path).await?,
        };
        tracing::info!(id = product.id, ?action, "stock status changed");
        Ok(result)
    }

    /// DELETE products/{id}
    pub async fn remove(&self, id: i64) -> ClientResult<()> {
        self.http.delete(&format!("{PRODUCTS}/{id}")).await?;
        tracing::info!(id, "product removed");
        Ok(())
    }

    /// Distinct category names, in server order
    pub async fn categories(&self) -> ClientResult<Vec<String>> {
        let categories: Vec<String> = self.http.get(CATEGORIES, &[]).await?;
        let distinct: IndexSet<String> = categories
            .into_iter()
            .filter(|category| !category.is_empty())
            .collect();
        Ok(distinct.into_iter().collect())
    }

    /// Per-category aggregates plus the "Overall" row
    pub async fn metrics(&self) -> ClientResult<Vec<Metric>> {
        self.http.get(METRICS, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockHttpClient, MockReply, sample_product};
    use serde_json::json;
    use shared::{Availability, SortField};

    #[tokio::test]
    async fn test_list_sends_snapshot_params() {
        let http = MockHttpClient::new();
        http.route(
            "GET",
            "products",
            MockReply::json(json!({
                "content": [sample_product(1, "Milk", 3)],
                "pageNumber": 0,
                "pageSize": 10,
                "totalElements": 1
            })),
        );
        let service = ProductService::new(http.clone());

        let mut query = Query::new(10);
        query.set_filters("milk", ["dairy"], Availability::InStock);
        query.toggle_sort(SortField::UnitPrice);

        let page = service.list(&query).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Milk");

        let request = http.last_request().unwrap();
        assert_eq!(request.method, "GET");
        assert_eq!(request.path, "products");
        assert_eq!(
            request.query_string(),
            "page=0&size=10&name=milk&category=dairy&availability=in_stock&sortBy1=unitPrice&sortDirection1=asc"
        );
    }

    #[tokio::test]
    async fn test_set_stock_on_empty_product_uses_in_stock_endpoint() {
        let http = MockHttpClient::new();
        http.route("PUT", "products/4/inStock", MockReply::Empty);
        let service = ProductService::new(http.clone());

        let product = sample_product(4, "Bread", 0);
        let result = service.set_stock(&product).await.unwrap();

        assert!(result.is_none());
        let request = http.last_request().unwrap();
        assert_eq!(request.method, "PUT");
        assert_eq!(request.path, "products/4/inStock");
        assert_eq!(http.count("POST", "products/4/outofstock"), 0);
    }

    #[tokio::test]
    async fn test_set_stock_on_stocked_product_uses_out_of_stock_endpoint() {
        let http = MockHttpClient::new();
        http.route("POST", "products/9/outofstock", MockReply::Empty);
        let service = ProductService::new(http.clone());

        service.set_stock(&sample_product(9, "Eggs", 12)).await.unwrap();

        let request = http.last_request().unwrap();
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "products/9/outofstock");
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn test_create_posts_draft_body() {
        let http = MockHttpClient::new();
        http.route("POST", "products", MockReply::json(sample_product(11, "Tea", 5)));
        let service = ProductService::new(http.clone());

        let draft = ProductDraft {
            name: "Tea".to_string(),
            category: "drinks".to_string(),
            unit_price: 2.5,
            expiration_date: None,
            in_stock: 5,
        };
        let created = service.create(&draft).await.unwrap();
        assert_eq!(created.id, 11);

        let body = http.last_request().unwrap().body.unwrap();
        assert_eq!(body["name"], "Tea");
        assert_eq!(body["unitPrice"], 2.5);
        assert!(body.get("id").is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_draft_without_request() {
        let http = MockHttpClient::new();
        let service = ProductService::new(http.clone());

        let err = service.create(&ProductDraft::default()).await.unwrap_err();
        assert!(matches!(err, crate::ClientError::Validation(_)));
        assert!(http.requests().is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let http = MockHttpClient::new();
        http.route("PUT", "products/77", MockReply::error(404, "Product not found"));
        let service = ProductService::new(http.clone());

        let err = service
            .update(&sample_product(77, "Ghost", 1))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_remove_hits_delete_endpoint() {
        let http = MockHttpClient::new();
        http.route("DELETE", "products/5", MockReply::Empty);
        let service = ProductService::new(http.clone());

        service.remove(5).await.unwrap();
        assert_eq!(http.count("DELETE", "products/5"), 1);
    }

    #[tokio::test]
    async fn test_categories_are_distinct_and_ordered() {
        let http = MockHttpClient::new();
        http.route(
            "GET",
            "products/categories",
            MockReply::json(json!(["fruit", "dairy", "fruit", "", "bakery"])),
        );
        let service = ProductService::new(http);

        let categories = service.categories().await.unwrap();
        assert_eq!(categories, vec!["fruit", "dairy", "bakery"]);
    }

    #[tokio::test]
    async fn test_metrics() {
        let http = MockHttpClient::new();
        http.route(
            "GET",
            "products/metrics",
            MockReply::json(json!([
                {"category": "fruit", "productCount": 2, "totalValue": 10.0, "averagePrice": 2.5},
                {"category": "Overall", "productCount": 2, "totalValue": 10.0, "averagePrice": 2.5}
            ])),
        );
        let service = ProductService::new(http);

        let metrics = service.metrics().await.unwrap();
        assert_eq!(metrics.len(), 2);
        assert!(metrics[1].is_overall());
    }

    #[test]
    fn test_stock_action_paths() {
        assert_eq!(StockAction::MarkOutOfStock.path(3), "products/3/outofstock");
        assert_eq!(StockAction::MarkInStock.path(3), "products/3/inStock");
        assert_eq!(
            StockAction::for_product(&sample_product(1, "x", 0)),
            StockAction::MarkInStock
        );
    }
}
