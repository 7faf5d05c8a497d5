//! View queries over an in-memory product list.
//!
//! [`query`] is a pure function: it never mutates its input and always
//! returns the same ordering for the same list and query. Sorting is stable,
//! so products that compare equal keep their stored order.

use crate::types::{CategoryId, Product};

/// Sort order for product listings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Price ascending.
    PriceLow,
    /// Price descending.
    PriceHigh,
    /// Rating descending; unrated products count as 0.
    Rating,
    /// Creation time descending.
    #[default]
    Newest,
}

impl SortKey {
    /// Parse from a sort selector value. Unknown values sort by newest.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "price-low" => Self::PriceLow,
            "price-high" => Self::PriceHigh,
            "rating" => Self::Rating,
            _ => Self::Newest,
        }
    }

    /// Convert to the sort selector value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Rating => "rating",
            Self::Newest => "newest",
        }
    }
}

/// Category restriction for product listings.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    /// The `"all"` sentinel: no restriction.
    #[default]
    All,
    /// Only products in this category.
    Only(CategoryId),
}

impl CategoryFilter {
    /// Sentinel value meaning "every category".
    pub const ALL: &'static str = "all";

    /// Parse from a filter selector value.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s == Self::ALL {
            Self::All
        } else {
            Self::Only(CategoryId::new(s))
        }
    }

    /// Whether a product in `category` passes the filter.
    #[must_use]
    pub fn matches(&self, category: &CategoryId) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }
}

/// The parameters of a product listing.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Free-text search term, matched case-insensitively against name and
    /// description.
    pub term: String,
    pub category: CategoryFilter,
    pub sort: SortKey,
}

impl CatalogQuery {
    /// Whether a single product passes the term and category filters.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        matches_term(product, &normalize_term(&self.term)) && self.category.matches(&product.category)
    }
}

fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

fn matches_term(product: &Product, term: &str) -> bool {
    term.is_empty()
        || product.name.to_lowercase().contains(term)
        || product.description.to_lowercase().contains(term)
}

/// Filter and order `products` for display.
#[must_use]
pub fn query<'a>(products: &'a [Product], q: &CatalogQuery) -> Vec<&'a Product> {
    let term = normalize_term(&q.term);

    let mut matched: Vec<&Product> = products
        .iter()
        .filter(|p| matches_term(p, &term) && q.category.matches(&p.category))
        .collect();

    // slice::sort_by is stable
    match q.sort {
        SortKey::PriceLow => matched.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceHigh => matched.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::Rating => matched.sort_by(|a, b| b.rating.cmp(&a.rating)),
        SortKey::Newest => matched.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }

    matched
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::{Price, ProductId, Rating};

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn product(id: &str, name: &str, category: &str, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            price: Price::from_cents(cents).unwrap(),
            category: CategoryId::new(category),
            description: String::new(),
            images: vec!["img".to_owned()],
            featured: false,
            rating: Rating::ZERO,
            review_count: 0,
            created_at: epoch(),
            updated_at: None,
        }
    }

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    fn catalog() -> Vec<Product> {
        let mut tea = product("3", "Ceylon Black Tea OP", "tea", 1299);
        tea.description = "High-grown organic black tea".to_owned();
        tea.rating = Rating::new(Decimal::new(47, 1)).unwrap();
        tea.created_at = epoch() + Duration::days(2);

        let mut oil = product("2", "Organic Virgin Coconut Oil", "coconut", 2450);
        oil.rating = Rating::new(Decimal::new(49, 1)).unwrap();
        oil.created_at = epoch() + Duration::days(1);

        let basket = product("4", "Handwoven Coconut Basket", "handicraft", 3200);

        vec![product("1", "Cinnamon Quills", "spices", 1899), oil, tea, basket]
    }

    #[test]
    fn test_term_matches_name_or_description_case_insensitive() {
        let products = catalog();
        let q = CatalogQuery {
            term: "  COCONUT ".to_owned(),
            ..CatalogQuery::default()
        };
        let mut found = ids(&query(&products, &q));
        found.sort();
        assert_eq!(found, vec!["2", "4"]);

        let q = CatalogQuery {
            term: "organic black".to_owned(),
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&query(&products, &q)), vec!["3"]);
    }

    #[test]
    fn test_category_filter() {
        let products = catalog();
        let q = CatalogQuery {
            category: CategoryFilter::parse("coconut"),
            ..CatalogQuery::default()
        };
        assert_eq!(ids(&query(&products, &q)), vec!["2"]);
        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
    }

    #[test]
    fn test_sort_orders() {
        let products = catalog();
        let sorted = |sort| {
            ids(&query(
                &products,
                &CatalogQuery {
                    sort,
                    ..CatalogQuery::default()
                },
            ))
        };
        assert_eq!(sorted(SortKey::PriceLow), vec!["3", "1", "2", "4"]);
        assert_eq!(sorted(SortKey::PriceHigh), vec!["4", "2", "1", "3"]);
        // unrated products tie at 0 and keep stored order
        assert_eq!(sorted(SortKey::Rating), vec!["2", "3", "1", "4"]);
        assert_eq!(sorted(SortKey::Newest), vec!["3", "2", "1", "4"]);
    }

    #[test]
    fn test_sort_key_parse_round_trip() {
        for key in [
            SortKey::PriceLow,
            SortKey::PriceHigh,
            SortKey::Rating,
            SortKey::Newest,
        ] {
            assert_eq!(SortKey::parse(key.as_str()), key);
        }
        assert_eq!(SortKey::parse("bogus"), SortKey::Newest);
    }

    #[test]
    fn test_query_does_not_mutate_input() {
        let products = catalog();
        let before = products.clone();
        let _ = query(
            &products,
            &CatalogQuery {
                sort: SortKey::PriceHigh,
                ..CatalogQuery::default()
            },
        );
        assert_eq!(products, before);
    }

    fn arb_products() -> impl Strategy<Value = Vec<Product>> {
        prop::collection::vec((0i64..20, 0i64..50, 0i64..5), 0..24).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (cents, tenths, days))| {
                    let mut p = product(&i.to_string(), "item", "spices", cents * 100);
                    p.rating = Rating::new(Decimal::new(tenths, 1)).unwrap();
                    p.created_at = epoch() + Duration::days(days);
                    p
                })
                .collect()
        })
    }

    fn position(list: &[&Product], id: &ProductId) -> usize {
        list.iter().position(|p| &p.id == id).unwrap()
    }

    proptest! {
        #[test]
        fn prop_unfiltered_query_is_permutation(products in arb_products(), sort_idx in 0usize..4) {
            let sort = [SortKey::PriceLow, SortKey::PriceHigh, SortKey::Rating, SortKey::Newest][sort_idx];
            let q = CatalogQuery { sort, ..CatalogQuery::default() };
            let result = query(&products, &q);
            prop_assert_eq!(result.len(), products.len());

            let mut got = ids(&result);
            got.sort();
            let mut expected: Vec<String> = products.iter().map(|p| p.id.to_string()).collect();
            expected.sort();
            prop_assert_eq!(got, expected);
        }

        #[test]
        fn prop_price_sorts_are_mirrored_and_stable(products in arb_products()) {
            let low = query(&products, &CatalogQuery { sort: SortKey::PriceLow, ..CatalogQuery::default() });
            let high = query(&products, &CatalogQuery { sort: SortKey::PriceHigh, ..CatalogQuery::default() });

            for (i, a) in products.iter().enumerate() {
                for b in products.iter().skip(i + 1) {
                    let low_order = position(&low, &a.id) < position(&low, &b.id);
                    let high_order = position(&high, &a.id) < position(&high, &b.id);
                    if a.price == b.price {
                        // stored order: a before b in both
                        prop_assert!(low_order);
                        prop_assert!(high_order);
                    } else {
                        prop_assert_ne!(low_order, high_order);
                    }
                }
            }
        }

        #[test]
        fn prop_query_is_deterministic(products in arb_products(), sort_idx in 0usize..4) {
            let sort = [SortKey::PriceLow, SortKey::PriceHigh, SortKey::Rating, SortKey::Newest][sort_idx];
            let q = CatalogQuery { sort, ..CatalogQuery::default() };
            prop_assert_eq!(ids(&query(&products, &q)), ids(&query(&products, &q)));
        }
    }
}
