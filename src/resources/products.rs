use super::{required, required_opt, trimmed, ListOptions};
use crate::{
    client::{Document, KeygenClient, ListDocument, RequestOptions, WriteDocument},
    models::{DistributionStrategy, Product, ProductAttributes, Token},
    Result,
};
use serde::Serialize;
use serde_json::{Map, Value};

const PRODUCTS: &str = "products";

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution_strategy: Option<DistributionStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platforms: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution_strategy: Option<DistributionStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platforms: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

pub struct ProductResource<'a> {
    client: &'a KeygenClient,
}

impl<'a> ProductResource<'a> {
    pub(crate) fn new(client: &'a KeygenClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, options: &ListOptions) -> Result<ListDocument<ProductAttributes>> {
        self.client
            .request(PRODUCTS, RequestOptions::get().params(options.params()))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Document<Product>> {
        self.client
            .request(&format!("products/{}", id), RequestOptions::get())
            .await
    }

    pub async fn create(&self, product: &NewProduct) -> Result<Document<Product>> {
        let product = NewProduct {
            name: required(&product.name, "name", "Product name is required")?,
            url: trimmed(&product.url),
            ..product.clone()
        };
        let body = WriteDocument::create(PRODUCTS, &product);

        self.client
            .request(PRODUCTS, RequestOptions::post().json(&body)?)
            .await
    }

    pub async fn update(&self, id: &str, updates: &ProductUpdate) -> Result<Document<Product>> {
        let updates = ProductUpdate {
            name: required_opt(&updates.name, "name", "Product name is required")?,
            ..updates.clone()
        };
        let body = WriteDocument::update(PRODUCTS, id, &updates);

        self.client
            .request(
                &format!("products/{}", id),
                RequestOptions::patch().json(&body)?,
            )
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .request_raw(&format!("products/{}", id), RequestOptions::delete())
            .await?;

        Ok(())
    }

    /// Generates a product token.
    pub async fn generate_token(&self, id: &str) -> Result<Document<Token>> {
        self.client
            .request(&format!("products/{}/tokens", id), RequestOptions::post())
            .await
    }
}
