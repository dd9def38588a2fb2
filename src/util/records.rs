use std::collections::{btree_map, BTreeMap};

use rusqlite::{
    types::{ToSqlOutput, Value as SqlValue},
    Row, ToSql,
};
use serde::Serialize;

use super::contract::Column;
use crate::error::{Error, Result};

/// A single payload value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    Integer(i64),
    Text(String),
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(SqlValue::Null),
            Value::Integer(i) => ToSqlOutput::from(*i),
            Value::Text(s) => ToSqlOutput::from(s.as_str()),
        })
    }
}

/// Field values for an insert or update. Only the columns present are acted upon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductValues(BTreeMap<Column, Value>);

impl ProductValues {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn put(&mut self, column: Column, value: impl Into<Value>) -> &mut Self {
        self.0.insert(column, value.into());
        self
    }

    pub fn put_null(&mut self, column: Column) -> &mut Self {
        self.0.insert(column, Value::Null);
        self
    }

    pub fn get(&self, column: Column) -> Option<&Value> {
        self.0.get(&column)
    }

    pub fn contains(&self, column: Column) -> bool {
        self.0.contains_key(&column)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Column, Value> {
        self.0.iter()
    }

    /// Checks a payload for a new product. `model` and `supplier` are required.
    pub fn validate_insert(&self) -> Result<ProductValues> {
        for required in [Column::Model, Column::SupplierName] {
            if !self.contains(required) {
                return Err(Error::invalid(format!("{} is required", required)));
            }
        }
        self.validate_present()
    }

    /// Checks only the fields present in the payload.
    pub fn validate_update(&self) -> Result<ProductValues> {
        self.validate_present()
    }

    fn validate_present(&self) -> Result<ProductValues> {
        let mut normalized = ProductValues::new();
        for (&column, value) in self {
            let value = match column {
                Column::Id => {
                    return Err(Error::invalid("_id is assigned by the store"));
                }
                Column::Model | Column::SupplierName => required_text(column, value)?,
                Column::Price | Column::Quantity => non_negative(column, value)?,
                Column::Brand | Column::SupplierEmail | Column::ImageUri => match value {
                    Value::Integer(i) => Value::Text(i.to_string()),
                    other => other.clone(),
                },
            };
            normalized.put(column, value);
        }
        Ok(normalized)
    }
}

impl<'a> IntoIterator for &'a ProductValues {
    type Item = (&'a Column, &'a Value);

    type IntoIter = btree_map::Iter<'a, Column, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn required_text(column: Column, value: &Value) -> Result<Value> {
    match value {
        Value::Text(s) if !s.trim().is_empty() => Ok(Value::Text(s.clone())),
        Value::Integer(i) => Ok(Value::Text(i.to_string())),
        _ => Err(Error::invalid(format!("{} is required", column))),
    }
}

fn non_negative(column: Column, value: &Value) -> Result<Value> {
    let number = match value {
        Value::Integer(i) => *i,
        Value::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| Error::invalid(format!("{} is not a number: {:?}", column, s)))?,
        Value::Null => return Err(Error::invalid(format!("{} must not be null", column))),
    };

    if number < 0 {
        return Err(Error::invalid(format!("{} must not be negative", column)));
    }
    Ok(Value::Integer(number))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub brand: Option<String>,
    pub model: String,
    pub price: i64,
    pub quantity: i64,
    pub supplier_name: String,
    pub supplier_email: Option<String>,
    pub image_uri: Option<String>,
}

impl Product {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(Column::Id.name())?,
            brand: row.get(Column::Brand.name())?,
            model: row.get(Column::Model.name())?,
            price: row.get(Column::Price.name())?,
            quantity: row.get(Column::Quantity.name())?,
            supplier_name: row.get(Column::SupplierName.name())?,
            supplier_email: row.get(Column::SupplierEmail.name())?,
            image_uri: row.get(Column::ImageUri.name())?,
        })
    }
}
