use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;

use super::{Query, Store, StoreError, StoreResult, Table};
use crate::config::Config;

/// Postgres error code for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";

/// Supabase REST (PostgREST) backed store, authenticated with the service-role key
#[derive(Clone)]
pub struct PostgrestStore {
    client: Client,
    base_url: String,
    service_key: String,
}

#[derive(Debug, Deserialize)]
struct PostgrestError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl PostgrestStore {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: format!("{}/rest/v1", config.supabase_url),
            service_key: config.supabase_service_key.clone(),
        }
    }

    fn table_url(&self, table: Table) -> String {
        format!("{}/{}", self.base_url, table.name())
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    async fn check(res: Response) -> StoreResult<Response> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        let body = res.text().await.unwrap_or_default();
        let parsed: Option<PostgrestError> = serde_json::from_str(&body).ok();
        let code = parsed.as_ref().and_then(|e| e.code.clone());
        let message = parsed
            .and_then(|e| e.message)
            .unwrap_or_else(|| format!("Store responded {}: {}", status, body));

        if code.as_deref() == Some(UNIQUE_VIOLATION) {
            return Err(StoreError::UniqueViolation(message));
        }

        Err(StoreError::Api {
            status: status.as_u16(),
            code,
            message,
        })
    }
}

/// Render a filter value in PostgREST's `eq.<value>` syntax
fn filter_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("eq.{}", s),
        Value::Null => "is.null".to_string(),
        other => format!("eq.{}", other),
    }
}

fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut params = vec![(
        "select".to_string(),
        query.columns.unwrap_or("*").to_string(),
    )];

    for (column, value) in &query.filters {
        params.push((column.to_string(), filter_value(value)));
    }

    if let Some(order) = query.order {
        let direction = if order.ascending { "asc" } else { "desc" };
        params.push(("order".to_string(), format!("{}.{}", order.column, direction)));
    }

    params
}

#[async_trait]
impl Store for PostgrestStore {
    async fn select(&self, table: Table, query: Query) -> StoreResult<Vec<Value>> {
        let res = self
            .authed(self.client.get(self.table_url(table)))
            .query(&query_params(&query))
            .send()
            .await?;

        Ok(Self::check(res).await?.json().await?)
    }

    async fn insert(&self, table: Table, row: Value) -> StoreResult<Value> {
        let res = self
            .authed(self.client.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await?;

        let mut rows: Vec<Value> = Self::check(res).await?.json().await?;
        if rows.is_empty() {
            return Err(StoreError::EmptyResult);
        }
        Ok(rows.swap_remove(0))
    }

    async fn update(&self, table: Table, id: &str, patch: Value) -> StoreResult<Vec<Value>> {
        let res = self
            .authed(self.client.patch(self.table_url(table)))
            .header("Prefer", "return=representation")
            .query(&[("id", format!("eq.{}", id))])
            .json(&patch)
            .send()
            .await?;

        Ok(Self::check(res).await?.json().await?)
    }

    async fn delete(&self, table: Table, id: &str) -> StoreResult<()> {
        let res = self
            .authed(self.client.delete(self.table_url(table)))
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await?;

        Self::check(res).await?;
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<bool> {
        let res = self
            .authed(self.client.get(self.table_url(Table::Events)))
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .await?;

        Ok(res.status().is_success())
    }
}
