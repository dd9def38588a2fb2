use std::sync::Arc;

use url::Url;

use super::contract::{content_uri, Route};
use super::db::{DbHelper, Selection, SortOrder};
use super::observers::{ChangeObserver, ObserverRegistry, SubscriptionId};
use super::records::{Product, ProductValues};
use crate::error::{Error, Result};

/// Routes product locators to the record store, validating payloads before any write.
pub struct InventoryProvider {
    helper: DbHelper,
    observers: ObserverRegistry,
}

impl InventoryProvider {
    pub fn new(helper: DbHelper) -> Self {
        Self {
            helper,
            observers: ObserverRegistry::new(),
        }
    }

    pub fn helper(&self) -> &DbHelper {
        &self.helper
    }

    fn route(uri: &Url, operation: &str) -> Result<Route> {
        Route::match_uri(uri)
            .ok_or_else(|| Error::invalid(format!("Cannot {} unknown URI {}", operation, uri)))
    }

    fn selection(route: Route) -> Selection {
        match route {
            Route::Products => Selection::All,
            Route::ProductId(id) => Selection::Id(id),
        }
    }

    pub fn query(&self, uri: &Url, sort: Option<SortOrder>) -> Result<Vec<Product>> {
        let route = Self::route(uri, "query")?;
        let products = self.helper.query(Self::selection(route), sort)?;
        tracing::trace!(%uri, rows = products.len(), "query");
        Ok(products)
    }

    pub fn get_type(&self, uri: &Url) -> Result<&'static str> {
        Ok(Self::route(uri, "resolve type of")?.mime_type())
    }

    /// Inserts a product and returns its newly assigned id.
    pub fn insert(&self, uri: &Url, values: &ProductValues) -> Result<i64> {
        match Self::route(uri, "insert into")? {
            Route::Products => {}
            Route::ProductId(_) => {
                return Err(Error::invalid(format!("Insertion not supported for {}", uri)))
            }
        }

        let values = values.validate_insert()?;
        let id = self.helper.insert(&values).map_err(|e| {
            tracing::error!(%uri, error = %e, "failed to insert row");
            e
        })?;

        tracing::debug!(%uri, id, "inserted product");
        self.observers.notify_change(Route::Products, uri);

        Ok(id)
    }

    pub fn update(&self, uri: &Url, values: &ProductValues) -> Result<usize> {
        let route = Self::route(uri, "update")?;
        if values.is_empty() {
            return Ok(0);
        }

        let values = values.validate_update()?;
        let rows = self.helper.update(&values, Self::selection(route))?;

        tracing::debug!(%uri, rows, "updated products");
        if rows != 0 {
            self.observers.notify_change(route, uri);
        }

        Ok(rows)
    }

    pub fn delete(&self, uri: &Url) -> Result<usize> {
        let route = Self::route(uri, "delete")?;
        let rows = self.helper.delete(Self::selection(route))?;

        tracing::debug!(%uri, rows, "deleted products");
        if rows != 0 {
            self.observers.notify_change(route, uri);
        }

        Ok(rows)
    }

    pub fn register_observer(
        &self,
        uri: &Url,
        observer: Arc<dyn ChangeObserver>,
    ) -> Result<SubscriptionId> {
        let route = Self::route(uri, "observe")?;
        Ok(self.observers.register(route, observer))
    }

    pub fn unregister_observer(&self, id: SubscriptionId) -> bool {
        self.observers.unregister(id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Convenience over `query` for a single product.
    pub fn get(&self, id: i64) -> Result<Option<Product>> {
        let uri = super::contract::item_uri(id);
        Ok(self.query(&uri, None)?.into_iter().next())
    }

    pub fn delete_all(&self) -> Result<usize> {
        self.delete(&content_uri())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::util::contract::{item_uri, Column, CONTENT_ITEM_TYPE, CONTENT_LIST_TYPE};

    fn provider() -> (tempfile::TempDir, InventoryProvider) {
        let dir = tempfile::tempdir().expect("Unable to create tempdir");
        let provider = InventoryProvider::new(DbHelper::new(dir.path().join("inventory.db")));
        (dir, provider)
    }

    fn macbook() -> ProductValues {
        let mut values = ProductValues::new();
        values
            .put(Column::Model, "MacBook Pro")
            .put(Column::SupplierName, "Apple")
            .put(Column::Price, 2799)
            .put(Column::Quantity, 10);
        values
    }

    fn counter(provider: &InventoryProvider, uri: &Url) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let observed = Arc::clone(&count);
        provider
            .register_observer(
                uri,
                Arc::new(move |_: &Url| {
                    observed.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();
        count
    }

    #[test]
    fn insert_then_query_round_trips() {
        let (_dir, provider) = provider();
        let id = provider.insert(&content_uri(), &macbook()).unwrap();

        let products = provider.query(&item_uri(id), None).unwrap();
        assert_eq!(
            products,
            vec![Product {
                id,
                brand: None,
                model: "MacBook Pro".to_string(),
                price: 2799,
                quantity: 10,
                supplier_name: "Apple".to_string(),
                supplier_email: None,
                image_uri: None,
            }]
        );
    }

    #[test]
    fn insert_rejects_invalid_payloads() {
        let (_dir, provider) = provider();

        let mut empty_model = macbook();
        empty_model.put(Column::Model, "");
        let mut negative_price = macbook();
        negative_price.put(Column::Price, -1);
        let mut negative_quantity = macbook();
        negative_quantity.put(Column::Quantity, -1);

        for values in [empty_model, negative_price, negative_quantity] {
            assert!(matches!(
                provider.insert(&content_uri(), &values),
                Err(Error::InvalidArgument(_))
            ));
        }
        assert!(provider.query(&content_uri(), None).unwrap().is_empty());
    }

    #[test]
    fn insert_requires_collection_locator() {
        let (_dir, provider) = provider();
        assert!(matches!(
            provider.insert(&item_uri(1), &macbook()),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn unknown_locators_are_invalid() {
        let (_dir, provider) = provider();
        let staff = Url::parse("content://com.example.inventory/staff").unwrap();

        assert!(matches!(provider.query(&staff, None), Err(Error::InvalidArgument(_))));
        assert!(matches!(provider.get_type(&staff), Err(Error::InvalidArgument(_))));
        assert!(matches!(provider.delete(&staff), Err(Error::InvalidArgument(_))));
        assert!(matches!(
            provider.update(&staff, &macbook()),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn mime_types() {
        let (_dir, provider) = provider();
        assert_eq!(provider.get_type(&content_uri()).unwrap(), CONTENT_LIST_TYPE);
        assert_eq!(provider.get_type(&item_uri(3)).unwrap(), CONTENT_ITEM_TYPE);
    }

    #[test]
    fn empty_update_is_a_no_op() {
        let (_dir, provider) = provider();
        let id = provider.insert(&content_uri(), &macbook()).unwrap();
        let count = counter(&provider, &content_uri());

        assert_eq!(provider.update(&item_uri(id), &ProductValues::new()).unwrap(), 0);
        assert_eq!(provider.get(id).unwrap().unwrap().quantity, 10);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn partial_update_validates_present_fields() {
        let (_dir, provider) = provider();
        let id = provider.insert(&content_uri(), &macbook()).unwrap();

        let mut values = ProductValues::new();
        values.put(Column::Quantity, "9");
        assert_eq!(provider.update(&item_uri(id), &values).unwrap(), 1);
        assert_eq!(provider.get(id).unwrap().unwrap().quantity, 9);

        values.put_null(Column::SupplierName);
        assert!(matches!(
            provider.update(&item_uri(id), &values),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(provider.get(id).unwrap().unwrap().supplier_name, "Apple");
    }

    #[test]
    fn update_through_collection_touches_every_row() {
        let (_dir, provider) = provider();
        provider.insert(&content_uri(), &macbook()).unwrap();
        provider.insert(&content_uri(), &macbook()).unwrap();
        let count = counter(&provider, &content_uri());

        let mut values = ProductValues::new();
        values.put(Column::Quantity, 7);
        assert_eq!(provider.update(&content_uri(), &values).unwrap(), 2);

        let products = provider.query(&content_uri(), None).unwrap();
        assert_eq!(products.len(), 2);
        assert!(products.iter().all(|product| product.quantity == 7));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn update_and_delete_of_missing_ids_return_zero() {
        let (_dir, provider) = provider();
        let count = counter(&provider, &content_uri());

        let mut values = ProductValues::new();
        values.put(Column::Quantity, 1);
        assert_eq!(provider.update(&item_uri(404), &values).unwrap(), 0);
        assert_eq!(provider.delete(&item_uri(404)).unwrap(), 0);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn mutations_notify_observers() {
        let (_dir, provider) = provider();
        let count = counter(&provider, &content_uri());

        let id = provider.insert(&content_uri(), &macbook()).unwrap();
        let mut values = ProductValues::new();
        values.put(Column::Brand, "Apple");
        provider.update(&item_uri(id), &values).unwrap();
        provider.insert(&content_uri(), &macbook()).unwrap();
        assert_eq!(provider.delete_all().unwrap(), 2);

        assert_eq!(count.load(Ordering::SeqCst), 4);
    }
}
