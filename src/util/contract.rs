use std::fmt;

use url::Url;

pub const CONTENT_SCHEME: &str = "content";
pub const CONTENT_AUTHORITY: &str = "com.example.inventory";
pub const PATH_PRODUCTS: &str = "products";

pub const TABLE_NAME: &str = "products";

pub const CONTENT_LIST_TYPE: &str = "vnd.android.cursor.dir/com.example.inventory/products";
pub const CONTENT_ITEM_TYPE: &str = "vnd.android.cursor.item/com.example.inventory/products";

/// The collection locator, `content://com.example.inventory/products`.
pub fn content_uri() -> Url {
    Url::parse(&format!(
        "{}://{}/{}",
        CONTENT_SCHEME, CONTENT_AUTHORITY, PATH_PRODUCTS
    ))
    .expect("content uri is well formed")
}

/// The locator of a single product.
pub fn item_uri(id: i64) -> Url {
    let mut uri = content_uri();
    uri.set_path(&format!("{}/{}", PATH_PRODUCTS, id));
    uri
}

pub fn parse_id(uri: &Url) -> Option<i64> {
    uri.path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()?
        .parse()
        .ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Products,
    ProductId(i64),
}

impl Route {
    pub fn match_uri(uri: &Url) -> Option<Route> {
        if uri.scheme() != CONTENT_SCHEME || uri.host_str() != Some(CONTENT_AUTHORITY) {
            return None;
        }

        let segments = uri
            .path_segments()?
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>();

        match segments.as_slice() {
            [PATH_PRODUCTS] => Some(Route::Products),
            [PATH_PRODUCTS, id] if id.bytes().all(|b| b.is_ascii_digit()) => {
                parse_id(uri).map(Route::ProductId)
            }
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Route::Products => CONTENT_LIST_TYPE,
            Route::ProductId(_) => CONTENT_ITEM_TYPE,
        }
    }
}

/// Columns of the products table, named as they appear in SQL and in payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Id,
    Brand,
    Model,
    Price,
    Quantity,
    SupplierName,
    SupplierEmail,
    ImageUri,
}

impl Column {
    pub const ALL: [Column; 8] = [
        Column::Id,
        Column::Brand,
        Column::Model,
        Column::Price,
        Column::Quantity,
        Column::SupplierName,
        Column::SupplierEmail,
        Column::ImageUri,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Column::Id => "_id",
            Column::Brand => "brand",
            Column::Model => "model",
            Column::Price => "price",
            Column::Quantity => "quantity",
            Column::SupplierName => "supplier",
            Column::SupplierEmail => "email",
            Column::ImageUri => "image",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
