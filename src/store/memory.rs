use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use dashmap::DashMap;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use super::{Query, Store, StoreError, StoreResult, Table};

/// In-process store for local development and tests.
///
/// Mirrors the managed store's observable behavior: generated ids and
/// `created_at`, column defaults, unique subscriber emails, and pass-through
/// update/delete on unknown ids.
#[derive(Default)]
pub struct MemoryStore {
    tables: DashMap<Table, Vec<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn column_defaults(table: Table) -> Value {
    match table {
        Table::Events => json!({ "is_active": true }),
        Table::GalleryImages => json!({ "is_active": true, "display_order": 0 }),
        Table::DrinkMenu => json!({ "is_available": true, "display_order": 0 }),
        Table::Rsvps | Table::NewsletterSubscribers => json!({}),
    }
}

fn unique_columns(table: Table) -> &'static [&'static str] {
    match table {
        Table::NewsletterSubscribers => &["email"],
        _ => &[],
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        // nulls sort last
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Greater,
        (_, None | Some(Value::Null)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

fn project(row: &Value, columns: Option<&str>) -> Value {
    let Some(columns) = columns.filter(|c| c.trim() != "*") else {
        return row.clone();
    };

    let picked: Map<String, Value> = columns
        .split(',')
        .map(str::trim)
        .filter_map(|col| row.get(col).map(|v| (col.to_string(), v.clone())))
        .collect();
    Value::Object(picked)
}

#[async_trait]
impl Store for MemoryStore {
    async fn select(&self, table: Table, query: Query) -> StoreResult<Vec<Value>> {
        let mut rows: Vec<Value> = self
            .tables
            .get(&table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| {
                        query
                            .filters
                            .iter()
                            .all(|(column, value)| row.get(*column) == Some(value))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = query.order {
            rows.sort_by(|a, b| {
                let ord = compare_values(a.get(order.column), b.get(order.column));
                if order.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            });
        }

        Ok(rows
            .iter()
            .map(|row| project(row, query.columns))
            .collect())
    }

    async fn insert(&self, table: Table, row: Value) -> StoreResult<Value> {
        let Value::Object(fields) = row else {
            return Err(StoreError::Api {
                status: 400,
                code: None,
                message: "Insert payload must be a JSON object".to_string(),
            });
        };

        let mut stored = match column_defaults(table) {
            Value::Object(defaults) => defaults,
            _ => Map::new(),
        };
        stored.insert("id".to_string(), json!(Uuid::new_v4()));
        stored.insert(
            "created_at".to_string(),
            json!(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)),
        );
        stored.extend(fields);
        let stored = Value::Object(stored);

        let mut rows = self.tables.entry(table).or_default();
        for column in unique_columns(table) {
            let candidate = stored.get(*column);
            if candidate.is_some() && rows.iter().any(|r| r.get(*column) == candidate) {
                return Err(StoreError::UniqueViolation(format!(
                    "duplicate key value violates unique constraint \"{}_{}_key\"",
                    table.name(),
                    column
                )));
            }
        }

        rows.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, table: Table, id: &str, patch: Value) -> StoreResult<Vec<Value>> {
        let Some(mut rows) = self.tables.get_mut(&table) else {
            return Ok(Vec::new());
        };

        let mut updated = Vec::new();
        for row in rows.iter_mut().filter(|r| r.get("id").and_then(Value::as_str) == Some(id)) {
            if let (Value::Object(target), Value::Object(changes)) = (&mut *row, &patch) {
                for (key, value) in changes {
                    if key != "id" {
                        target.insert(key.clone(), value.clone());
                    }
                }
            }
            updated.push(row.clone());
        }

        Ok(updated)
    }

    async fn delete(&self, table: Table, id: &str) -> StoreResult<()> {
        if let Some(mut rows) = self.tables.get_mut(&table) {
            rows.retain(|r| r.get("id").and_then(Value::as_str) != Some(id));
        }
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<bool> {
        Ok(true)
    }
}
