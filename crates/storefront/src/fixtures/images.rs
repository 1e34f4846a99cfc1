//! Image substitution for fixture data.
//!
//! Dishes with a dedicated photo use it; everything else gets one of four
//! photos from its category bucket. The pick is a stable hash of the item id,
//! so the same dish always shows the same photo.

/// Category buckets, each with four interchangeable photos.
const BUCKETS: &[(&str, [&str; 4])] = &[
    ("pizza", [
        "/images/food/pizza-1.jpg",
        "/images/food/pizza-2.jpg",
        "/images/food/pizza-3.jpg",
        "/images/food/pizza-4.jpg",
    ]),
    ("burger", [
        "/images/food/burger-1.jpg",
        "/images/food/burger-2.jpg",
        "/images/food/burger-3.jpg",
        "/images/food/burger-4.jpg",
    ]),
    ("indian", [
        "/images/food/indian-1.jpg",
        "/images/food/indian-2.jpg",
        "/images/food/indian-3.jpg",
        "/images/food/indian-4.jpg",
    ]),
    ("sushi", [
        "/images/food/sushi-1.jpg",
        "/images/food/sushi-2.jpg",
        "/images/food/sushi-3.jpg",
        "/images/food/sushi-4.jpg",
    ]),
    ("desserts", [
        "/images/food/dessert-1.jpg",
        "/images/food/dessert-2.jpg",
        "/images/food/dessert-3.jpg",
        "/images/food/dessert-4.jpg",
    ]),
    ("drinks", [
        "/images/food/drink-1.jpg",
        "/images/food/drink-2.jpg",
        "/images/food/drink-3.jpg",
        "/images/food/drink-4.jpg",
    ]),
    ("sides", [
        "/images/food/sides-1.jpg",
        "/images/food/sides-2.jpg",
        "/images/food/sides-3.jpg",
        "/images/food/sides-4.jpg",
    ]),
];

const SIDES: [&str; 4] = [
    "/images/food/sides-1.jpg",
    "/images/food/sides-2.jpg",
    "/images/food/sides-3.jpg",
    "/images/food/sides-4.jpg",
];

/// Dishes with a dedicated photo.
const SPECIFIC: &[(&str, &str)] = &[
    ("item-1", "/images/food/margherita-pizza.jpg"),
    ("item-2", "/images/food/pepperoni-pizza.jpg"),
    ("item-3", "/images/food/garlic-bread.jpg"),
    ("item-4", "/images/food/caesar-salad.jpg"),
    ("item-5", "/images/food/tiramisu.jpg"),
    ("item-6", "/images/food/classic-burger.jpg"),
    ("item-7", "/images/food/cheeseburger.jpg"),
    ("item-8", "/images/food/bacon-burger.jpg"),
    ("item-9", "/images/food/french-fries.jpg"),
    ("item-10", "/images/food/milkshake.jpg"),
    ("item-11", "/images/food/california-roll.jpg"),
    ("item-12", "/images/food/salmon-nigiri.jpg"),
    ("item-13", "/images/food/spicy-tuna-roll.jpg"),
    ("item-14", "/images/food/miso-soup.jpg"),
    ("item-15", "/images/food/edamame.jpg"),
];

const RESTAURANT_COVERS: &[(&str, &str)] = &[
    ("rest-1", "/images/restaurants/pizza-restaurant-cover.jpg"),
    ("rest-2", "/images/restaurants/burger-restaurant-cover.jpg"),
    ("rest-3", "/images/restaurants/sushi-restaurant-cover.jpg"),
    ("rest-4", "/images/restaurants/taco-restaurant-cover.jpg"),
    ("rest-5", "/images/restaurants/pasta-restaurant-cover.jpg"),
    ("rest-6", "/images/restaurants/curry-restaurant-cover.jpg"),
];

const SPECIAL_OFFERS: &[(&str, &str)] = &[
    ("special-1", "/images/food/special-biryani.jpg"),
    ("special-2", "/images/food/special-thali.jpg"),
    ("special-3", "/images/food/special-pizza.jpg"),
    ("special-4", "/images/food/special-burger.jpg"),
    ("special-5", "/images/food/special-dosa.jpg"),
    ("special-6", "/images/food/special-paneer.jpg"),
];

const RESTAURANT_PLACEHOLDER: &str = "/placeholder.svg?height=400&width=600&text=Restaurant";
const OFFER_PLACEHOLDER: &str = "/placeholder.svg?height=300&width=400&text=Special+Offer";

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Stable string hash (31-multiplier polynomial).
fn stable_hash(s: &str) -> usize {
    s.bytes()
        .fold(0usize, |h, b| h.wrapping_mul(31).wrapping_add(usize::from(b)))
}

/// Map a free-form menu category to a bucket name.
#[must_use]
pub fn category_bucket(category: &str) -> &'static str {
    let category = category.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| category.contains(w));

    if has(&["pizza"]) {
        "pizza"
    } else if has(&["burger"]) {
        "burger"
    } else if has(&["indian", "curry", "biryani", "paneer"]) {
        "indian"
    } else if has(&["sushi", "roll", "nigiri"]) {
        "sushi"
    } else if has(&["dessert", "sweet", "cake"]) {
        "desserts"
    } else if has(&["drink", "beverage", "shake"]) {
        "drinks"
    } else {
        "sides"
    }
}

fn bucket_photos(bucket: &str) -> &'static [&'static str; 4] {
    BUCKETS
        .iter()
        .find(|(name, _)| *name == bucket)
        .map_or(&SIDES, |(_, photos)| photos)
}

/// Photo for a dish: its dedicated photo, else one from its category bucket.
///
/// Without a category the bucket itself is picked by the id hash.
#[must_use]
pub fn food_image(id: &str, category: Option<&str>) -> &'static str {
    if let Some(photo) = lookup(SPECIFIC, id) {
        return photo;
    }

    let hash = stable_hash(id);
    let photos = match category {
        Some(category) => bucket_photos(category_bucket(category)),
        None => BUCKETS
            .get(hash % BUCKETS.len())
            .map_or(&SIDES, |(_, photos)| photos),
    };
    photos.get(hash % photos.len()).copied().unwrap_or(SIDES[0])
}

/// Cover photo for a restaurant card.
#[must_use]
pub fn restaurant_cover(restaurant_id: &str) -> &'static str {
    lookup(RESTAURANT_COVERS, restaurant_id).unwrap_or(RESTAURANT_PLACEHOLDER)
}

/// Photo for a special offer.
#[must_use]
pub fn special_offer_image(offer_id: &str) -> &'static str {
    lookup(SPECIAL_OFFERS, offer_id).unwrap_or(OFFER_PLACEHOLDER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specific_image_wins() {
        assert_eq!(food_image("item-1", Some("Drinks")), "/images/food/margherita-pizza.jpg");
    }

    #[test]
    fn test_category_bucket_mapping() {
        assert_eq!(category_bucket("Paneer Specials"), "indian");
        assert_eq!(category_bucket("Maki Rolls"), "sushi");
        assert_eq!(category_bucket("Shakes"), "drinks");
        assert_eq!(category_bucket("Bread"), "sides");
    }

    #[test]
    fn test_bucket_image_is_stable() {
        let first = food_image("item-curry-1", Some("Indian"));
        assert!(first.starts_with("/images/food/indian-"));
        assert_eq!(first, food_image("item-curry-1", Some("Indian")));
    }

    #[test]
    fn test_uncategorized_image_is_stable() {
        let first = food_image("mystery-dish", None);
        assert_eq!(first, food_image("mystery-dish", None));
        assert!(first.starts_with("/images/food/"));
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(restaurant_cover("rest-99"), RESTAURANT_PLACEHOLDER);
        assert_eq!(special_offer_image("special-2"), "/images/food/special-thali.jpg");
    }
}
