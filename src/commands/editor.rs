use std::sync::Arc;

use chrono::NaiveDate;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use url::Url;

use crate::error::{Error, Result};
use crate::util::{content_uri, item_uri, Column, InventoryProvider, Product, ProductValues};

pub const ORDER_SUBJECT: &str = "Order Summary";

/// Raw user input for a product, before trimming and validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorForm {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub price: Option<String>,
    pub quantity: Option<String>,
    pub supplier: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

fn filled(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl EditorForm {
    pub fn is_blank(&self) -> bool {
        [
            &self.brand,
            &self.model,
            &self.price,
            &self.quantity,
            &self.supplier,
            &self.email,
            &self.image,
        ]
        .into_iter()
        .all(|field| filled(field).is_none())
    }

    /// Builds a payload from the filled fields. New products get a zero price
    /// and quantity when none was entered.
    pub fn to_values(&self, new_product: bool) -> ProductValues {
        let mut values = ProductValues::new();
        let fields = [
            (Column::Brand, &self.brand),
            (Column::Model, &self.model),
            (Column::Price, &self.price),
            (Column::Quantity, &self.quantity),
            (Column::SupplierName, &self.supplier),
            (Column::SupplierEmail, &self.email),
            (Column::ImageUri, &self.image),
        ];
        for (column, field) in fields {
            if let Some(text) = filled(field) {
                values.put(column, text);
            } else if new_product && matches!(column, Column::Price | Column::Quantity) {
                values.put(column, 0);
            }
        }
        values
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Unchanged,
    Inserted(i64),
    Updated(usize),
}

/// An email asking the supplier for more stock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl OrderEmail {
    pub fn for_product(product: &Product, date: NaiveDate) -> Self {
        let body = [
            format!("Supplier: {}", product.supplier_name),
            format!("Model: {}", product.model),
            format!("Price: {}", product.price),
            format!("Date: {}", date.format("%Y-%m-%d")),
        ]
        .join("\n");

        Self {
            to: product.supplier_email.clone().unwrap_or_default(),
            subject: ORDER_SUBJECT.to_string(),
            body,
        }
    }

    pub fn mailto(&self) -> Result<Url> {
        let mut url = Url::parse(&format!("mailto:{}", self.to.trim()))
            .map_err(|e| Error::invalid(format!("bad supplier email {:?}: {}", self.to, e)))?;
        // Mail clients read `+` literally, so spaces must go out as %20.
        url.set_query(Some(&format!(
            "subject={}&body={}",
            utf8_percent_encode(&self.subject, NON_ALPHANUMERIC),
            utf8_percent_encode(&self.body, NON_ALPHANUMERIC)
        )));
        Ok(url)
    }
}

/// Edits a single product, or creates one when no id is given.
pub struct Editor {
    provider: Arc<InventoryProvider>,
    current: Option<i64>,
}

impl Editor {
    pub fn new_product(provider: Arc<InventoryProvider>) -> Self {
        Self {
            provider,
            current: None,
        }
    }

    pub fn existing(provider: Arc<InventoryProvider>, id: i64) -> Self {
        Self {
            provider,
            current: Some(id),
        }
    }

    fn current(&self) -> Result<i64> {
        self.current
            .ok_or_else(|| Error::invalid("no product is being edited"))
    }

    pub fn load(&self) -> Result<Product> {
        let id = self.current()?;
        self.provider.get(id)?.ok_or(Error::NotFound(id))
    }

    pub fn save(&self, form: &EditorForm) -> Result<SaveOutcome> {
        if form.is_blank() {
            return Ok(SaveOutcome::Unchanged);
        }

        match self.current {
            None => {
                let values = form.to_values(true);
                let id = self.provider.insert(&content_uri(), &values)?;
                tracing::info!(id, "product saved");
                Ok(SaveOutcome::Inserted(id))
            }
            Some(id) => {
                let values = form.to_values(false);
                let rows = self.provider.update(&item_uri(id), &values)?;
                if rows == 0 {
                    tracing::warn!(id, "update matched no product");
                }
                Ok(SaveOutcome::Updated(rows))
            }
        }
    }

    pub fn delete(&self) -> Result<usize> {
        let id = self.current()?;
        let rows = self.provider.delete(&item_uri(id))?;
        if rows == 0 {
            tracing::warn!(id, "delete matched no product");
        }
        Ok(rows)
    }

    /// Adds `amount` units and returns the new stock.
    pub fn restock(&self, amount: u32) -> Result<i64> {
        let product = self.load()?;
        let quantity = product.quantity.saturating_add(amount.into());

        let mut values = ProductValues::new();
        values.put(Column::Quantity, quantity);
        self.provider.update(&item_uri(product.id), &values)?;

        Ok(quantity)
    }

    pub fn order(&self, date: NaiveDate) -> Result<OrderEmail> {
        Ok(OrderEmail::for_product(&self.load()?, date))
    }
}
