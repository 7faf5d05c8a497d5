//! Presentation helpers shared by product cards, the detail view and
//! review panels.

use ecobloom_core::{CategoryId, Rating};
use rust_decimal::Decimal;

/// How one of the five rating stars is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StarFill {
    Full,
    Half,
    Empty,
}

/// The five stars for a rating. A star is half-filled when the rating
/// reaches at least half of it.
#[must_use]
pub fn star_fills(rating: Rating) -> [StarFill; 5] {
    let value = rating.value();
    let half = Decimal::new(5, 1);
    std::array::from_fn(|i| {
        let star = Decimal::from(i + 1);
        if star <= value {
            StarFill::Full
        } else if star - half <= value {
            StarFill::Half
        } else {
            StarFill::Empty
        }
    })
}

/// Category badge text: the identifier with its first letter capitalized.
#[must_use]
pub fn badge_label(category: &CategoryId) -> String {
    initial_upper(category.as_str())
}

/// Reviewer avatar letter.
#[must_use]
pub fn avatar_initial(name: &str) -> String {
    name.chars().next().map(|c| c.to_uppercase().collect()).unwrap_or_default()
}

fn initial_upper(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
