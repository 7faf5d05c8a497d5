//! First-run demo catalog for the storefront.

use chrono::{DateTime, Utc};
use ecobloom_core::{CategoryId, Price, Product, ProductId, Rating};
use rust_decimal::Decimal;

struct SeedRow {
    id: &'static str,
    name: &'static str,
    cents: i64,
    category: &'static str,
    description: &'static str,
    image: &'static str,
    featured: bool,
    rating_tenths: i64,
    reviews: u32,
}

const ROWS: [SeedRow; 4] = [
    SeedRow {
        id: "1",
        name: "Premium Ceylon Cinnamon Quills",
        cents: 1899,
        category: "spices",
        description: "Organic C-5 grade Ceylon cinnamon quills. True cinnamon (Cinnamomum verum) from Sri Lanka. Low coumarin, delicate sweet flavor.",
        image: "https://images.unsplash.com/photo-1599639668363-325b9655cd3d?w=800&q=80",
        featured: true,
        rating_tenths: 48,
        reviews: 24,
    },
    SeedRow {
        id: "2",
        name: "Organic Virgin Coconut Oil",
        cents: 2450,
        category: "coconut",
        description: "Cold-pressed, unrefined virgin coconut oil in glass jar. Perfect for cooking, skincare, and hair care. 500ml.",
        image: "https://images.unsplash.com/photo-1623685267413-0b0c7d6b36d5?w=800&q=80",
        featured: true,
        rating_tenths: 49,
        reviews: 36,
    },
    SeedRow {
        id: "3",
        name: "Ceylon Black Tea OP",
        cents: 1299,
        category: "tea",
        description: "High-grown organic black tea from Uva region. Rich, full-bodied flavor with golden liquor. 100g loose leaf.",
        image: "https://images.unsplash.com/photo-1564834724105-918b73d1b9e0?w=800&q=80",
        featured: false,
        rating_tenths: 47,
        reviews: 18,
    },
    SeedRow {
        id: "4",
        name: "Handwoven Coconut Basket",
        cents: 3200,
        category: "handicraft",
        description: "Sustainable eco-friendly basket handwoven from coconut palm leaves. Perfect for storage or decoration.",
        image: "https://images.unsplash.com/photo-1596138252452-450089261e26?w=800&q=80",
        featured: false,
        rating_tenths: 46,
        reviews: 12,
    },
];

/// The four demo products, stamped with `now`.
pub fn demo_products(now: DateTime<Utc>) -> Vec<Product> {
    ROWS.iter()
        .map(|row| Product {
            id: ProductId::new(row.id),
            name: row.name.to_owned(),
            price: Price::from_cents(row.cents).unwrap_or_default(),
            category: CategoryId::new(row.category),
            description: row.description.to_owned(),
            images: vec![row.image.to_owned()],
            featured: row.featured,
            rating: Rating::new(Decimal::new(row.rating_tenths, 1)).unwrap_or_default(),
            review_count: row.reviews,
            created_at: now,
            updated_at: None,
        })
        .collect()
}
