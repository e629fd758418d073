use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents a product in the catalog.
///
/// `stock` is unsigned so it can never go negative; every decrement goes
/// through a conditional check in the catalog actor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    pub price: Decimal,
    pub stock: u32,
    pub sold: u32,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

/// Payload for creating a product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub stock: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
}

/// Partial admin edit of a product.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<u32>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

impl ProductCreate {
    pub fn new(name: impl Into<String>, price: Decimal, stock: u32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            category: String::new(),
            brand: None,
            price,
            stock,
            is_active: true,
            is_featured: false,
        }
    }
}

/// Ordering of a catalog listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductSort {
    PriceLow,
    PriceHigh,
    Newest,
    /// Featured products first, then newest.
    #[default]
    Featured,
}

/// Filters and pagination of a catalog listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    #[serde(default)]
    pub sort: ProductSort,
    pub page: Option<usize>,
    pub limit: Option<usize>,
    #[serde(default)]
    pub include_inactive: bool,
}

/// One page of a catalog listing.
#[derive(Debug, Clone, Serialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub count: usize,
    pub total: usize,
    pub page: usize,
    pub pages: usize,
}

impl ProductQuery {
    pub const DEFAULT_LIMIT: usize = 12;

    fn matches(&self, product: &Product, search: Option<&str>) -> bool {
        if !self.include_inactive && !product.is_active {
            return false;
        }
        if let Some(needle) = search {
            let hit = product.name.to_lowercase().contains(needle)
                || product.description.to_lowercase().contains(needle);
            if !hit {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &product.category != category {
                return false;
            }
        }
        if self.min_price.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price > max) {
            return false;
        }
        true
    }

    /// Filters, sorts and paginates a snapshot of the catalog.
    pub fn apply(&self, products: Vec<Product>) -> ProductPage {
        let search = self
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let mut matched: Vec<Product> = products
            .into_iter()
            .filter(|product| self.matches(product, search.as_deref()))
            .collect();

        match self.sort {
            ProductSort::PriceLow => matched.sort_by(|a, b| a.price.cmp(&b.price)),
            ProductSort::PriceHigh => matched.sort_by(|a, b| b.price.cmp(&a.price)),
            ProductSort::Newest => matched.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            ProductSort::Featured => matched.sort_by(|a, b| {
                b.is_featured
                    .cmp(&a.is_featured)
                    .then_with(|| b.created_at.cmp(&a.created_at))
            }),
        }

        let limit = self.limit.unwrap_or(Self::DEFAULT_LIMIT).max(1);
        let page = self.page.unwrap_or(1).max(1);
        let total = matched.len();
        let products: Vec<Product> = matched
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .collect();

        ProductPage {
            count: products.len(),
            products,
            total,
            page,
            pages: total.div_ceil(limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, name: &str, price: i64, featured: bool, active: bool) -> Product {
        let now = Utc::now();
        Product {
            id: id.into(),
            name: name.into(),
            description: format!("Fresh {name}"),
            category: "Grocery".into(),
            brand: None,
            price: Decimal::new(price, 0),
            stock: 10,
            sold: 0,
            is_active: active,
            is_featured: featured,
            created_at: now,
            updated_at: now,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("product_1", "Brown Rice", 450, false, true),
            product("product_2", "Tomatoes", 80, true, true),
            product("product_3", "Green Tea", 250, false, true),
            product("product_4", "Old Stock Honey", 300, false, false),
        ]
    }

    #[test]
    fn test_inactive_products_are_hidden_by_default() {
        let page = ProductQuery::default().apply(catalog());
        assert_eq!(page.total, 3);
        assert!(page.products.iter().all(|p| p.is_active));
        assert_eq!(page.products[0].id, "product_2");

        let all = ProductQuery {
            include_inactive: true,
            ..ProductQuery::default()
        }
        .apply(catalog());
        assert_eq!(all.total, 4);
    }

    #[test]
    fn test_search_price_range_and_sort() {
        let page = ProductQuery {
            search: Some("  TEA ".into()),
            ..ProductQuery::default()
        }
        .apply(catalog());
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.products[0].name, "Green Tea");

        let page = ProductQuery {
            min_price: Some(Decimal::new(100, 0)),
            max_price: Some(Decimal::new(450, 0)),
            sort: ProductSort::PriceLow,
            ..ProductQuery::default()
        }
        .apply(catalog());
        let names: Vec<_> = page.products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Green Tea", "Brown Rice"]);
    }

    #[test]
    fn test_pagination() {
        let page = ProductQuery {
            sort: ProductSort::PriceHigh,
            page: Some(2),
            limit: Some(2),
            ..ProductQuery::default()
        }
        .apply(catalog());
        assert_eq!(page.total, 3);
        assert_eq!(page.pages, 2);
        assert_eq!(page.count, 1);
        assert_eq!(page.products[0].name, "Tomatoes");
    }
}
