use std::sync::Arc;

use crate::error::{Error, Result};
use crate::util::{
    content_uri, item_uri, Column, InventoryProvider, Loader, Page, Product, ProductValues,
    SortOrder,
};

/// The product list and the actions offered alongside it.
pub struct Inventory {
    provider: Arc<InventoryProvider>,
}

impl Inventory {
    pub fn new(provider: Arc<InventoryProvider>) -> Self {
        Self { provider }
    }

    /// Loads every product in the background and returns the requested page.
    pub async fn list(
        &self,
        sort: Option<SortOrder>,
        page_index: usize,
        per_page: usize,
    ) -> Result<Page<Product>> {
        let mut loader = Loader::spawn(Arc::clone(&self.provider), content_uri(), sort)?;
        let products = loader.load_finished().await?;

        let mut page = Page::new(per_page);
        page.extend(products.iter().cloned());
        page.select(page_index);

        Ok(page)
    }

    pub fn insert_dummy(&self) -> Result<i64> {
        let mut values = ProductValues::new();
        values
            .put(Column::Brand, "Apple")
            .put(Column::Model, "MacBook Pro 15 in.")
            .put(Column::Price, "2799")
            .put(Column::Quantity, "10")
            .put(Column::SupplierName, "Apple")
            .put(Column::SupplierEmail, "apple@apple.com");

        self.provider.insert(&content_uri(), &values)
    }

    pub fn delete_all(&self) -> Result<usize> {
        let rows = self.provider.delete_all()?;
        tracing::info!("{} rows deleted from products database", rows);
        Ok(rows)
    }

    /// Sells one unit. Returns the new stock, or `None` when there was nothing to sell.
    pub fn sale(&self, id: i64) -> Result<Option<i64>> {
        let product = self.provider.get(id)?.ok_or(Error::NotFound(id))?;
        if product.quantity <= 0 {
            return Ok(None);
        }

        let quantity = product.quantity - 1;
        let mut values = ProductValues::new();
        values.put(Column::Quantity, quantity);
        self.provider.update(&item_uri(id), &values)?;

        Ok(Some(quantity))
    }
}

pub fn render_row(product: &Product) -> String {
    format!(
        "#{:<4} {:<12} {:<24} ${:<8} Stock: {}",
        product.id,
        product.brand.as_deref().unwrap_or(""),
        product.model,
        product.price,
        product.quantity
    )
}

/// The page label followed by the `--page` flags for neighbouring pages.
pub fn render_footer<T>(page: &Page<T>) -> String {
    let mut footer = page.label();
    if page.has_previous() {
        footer.push_str(&format!("  previous: --page {}", page.index()));
    }
    if page.has_next() {
        footer.push_str(&format!("  next: --page {}", page.index() + 2));
    }
    footer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::DbHelper;

    fn inventory() -> (tempfile::TempDir, Inventory) {
        let dir = tempfile::tempdir().expect("Unable to create tempdir");
        let provider = InventoryProvider::new(DbHelper::new(dir.path().join("inventory.db")));
        (dir, Inventory::new(Arc::new(provider)))
    }

    #[tokio::test]
    async fn lists_pages_of_products() {
        let (_dir, inventory) = inventory();
        for _ in 0..3 {
            inventory.insert_dummy().unwrap();
        }

        let page = inventory
            .list(Some(SortOrder::ascending(Column::Id)), 1, 2)
            .await
            .unwrap();
        assert_eq!(page.label(), "Page 2/2");
        assert_eq!(render_footer(&page), "Page 2/2  previous: --page 1");
        assert_eq!(page.items().len(), 1);
        assert_eq!(page.items()[0].model, "MacBook Pro 15 in.");
    }

    #[test]
    fn sale_stops_at_zero() {
        let (_dir, inventory) = inventory();
        let id = inventory.insert_dummy().unwrap();

        let mut values = ProductValues::new();
        values.put(Column::Quantity, 1);
        inventory.provider.update(&item_uri(id), &values).unwrap();

        assert_eq!(inventory.sale(id).unwrap(), Some(0));
        assert_eq!(inventory.sale(id).unwrap(), None);
        assert_eq!(inventory.provider.get(id).unwrap().unwrap().quantity, 0);
        assert!(matches!(inventory.sale(id + 1), Err(Error::NotFound(_))));
    }

    #[test]
    fn delete_all_reports_rows() {
        let (_dir, inventory) = inventory();
        inventory.insert_dummy().unwrap();
        inventory.insert_dummy().unwrap();

        assert_eq!(inventory.delete_all().unwrap(), 2);
        assert_eq!(inventory.delete_all().unwrap(), 0);
    }

    #[test]
    fn footer_points_at_neighbours() {
        let mut page = Page::new(1);
        page.extend(1..=3);
        assert_eq!(render_footer(&page), "Page 1/3  next: --page 2");

        page.select(1);
        assert_eq!(
            render_footer(&page),
            "Page 2/3  previous: --page 1  next: --page 3"
        );

        let single = Page::<u8>::new(20);
        assert_eq!(render_footer(&single), "Page 1/1");
    }

    #[test]
    fn row_shows_stock() {
        let product = Product {
            id: 1,
            brand: Some("Apple".to_string()),
            model: "MacBook Pro".to_string(),
            price: 2799,
            quantity: 10,
            supplier_name: "Apple".to_string(),
            supplier_email: None,
            image_uri: None,
        };

        let row = render_row(&product);
        assert!(row.contains("$2799"));
        assert!(row.ends_with("Stock: 10"));
    }
}
