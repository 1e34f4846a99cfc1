//! Restaurants, menus and special offers served when the backend is away.
//!
//! Source prices are in US dollars and are converted for display with
//! [`super::to_inr`].

use campus_eats_core::{MenuItemId, OfferId, RestaurantId};
use rust_decimal::Decimal;

use super::images;
use super::{to_inr, inr_delivery_fee, inr_min_order};
use crate::api::{MenuItem, Restaurant, SpecialOffer};

struct RestaurantSeed {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    cuisine: &'static [&'static str],
    rating: f64,
    delivery_time: &'static str,
    /// Delivery fee in cents (USD).
    delivery_fee_cents: i64,
    /// Minimum order in cents (USD).
    min_order_cents: i64,
}

const RESTAURANTS: &[RestaurantSeed] = &[
    RestaurantSeed {
        id: "rest-1",
        name: "Pizza Paradise",
        description: "Wood-fired pizzas and Italian classics made with fresh ingredients",
        cuisine: &["Pizza", "Italian"],
        rating: 4.5,
        delivery_time: "20-30 min",
        delivery_fee_cents: 199,
        min_order_cents: 1000,
    },
    RestaurantSeed {
        id: "rest-2",
        name: "Burger Bliss",
        description: "Juicy handcrafted burgers, crispy fries and thick shakes",
        cuisine: &["Burgers", "American"],
        rating: 4.3,
        delivery_time: "15-25 min",
        delivery_fee_cents: 0,
        min_order_cents: 0,
    },
    RestaurantSeed {
        id: "rest-3",
        name: "Sushi Station",
        description: "Fresh rolls, nigiri and Japanese comfort food",
        cuisine: &["Sushi", "Japanese"],
        rating: 4.7,
        delivery_time: "25-35 min",
        delivery_fee_cents: 299,
        min_order_cents: 1500,
    },
    RestaurantSeed {
        id: "rest-4",
        name: "Taco Town",
        description: "Street-style tacos, loaded burritos and nachos",
        cuisine: &["Mexican", "Tacos"],
        rating: 4.2,
        delivery_time: "15-25 min",
        delivery_fee_cents: 99,
        min_order_cents: 0,
    },
    RestaurantSeed {
        id: "rest-5",
        name: "Pasta Palace",
        description: "Fresh pasta, creamy sauces and Italian desserts",
        cuisine: &["Italian", "Pasta"],
        rating: 4.4,
        delivery_time: "25-40 min",
        delivery_fee_cents: 0,
        min_order_cents: 1200,
    },
    RestaurantSeed {
        id: "rest-6",
        name: "Curry Corner",
        description: "North Indian curries, biryanis and tandoor breads",
        cuisine: &["Indian", "Curry"],
        rating: 4.6,
        delivery_time: "30-40 min",
        delivery_fee_cents: 149,
        min_order_cents: 1000,
    },
];

/// `(id, restaurant, name, description, USD cents, category)`
type MenuSeed = (&'static str, &'static str, &'static str, &'static str, i64, &'static str);

const MENU: &[MenuSeed] = &[
    ("item-1", "rest-1", "Margherita Pizza", "Tomato sauce, mozzarella and fresh basil", 1299, "Pizza"),
    ("item-2", "rest-1", "Pepperoni Pizza", "Loaded with spicy pepperoni and mozzarella", 1499, "Pizza"),
    ("item-3", "rest-1", "Garlic Bread", "Toasted bread with garlic butter and herbs", 499, "Sides"),
    ("item-4", "rest-1", "Caesar Salad", "Romaine, parmesan, croutons and Caesar dressing", 799, "Salads"),
    ("item-5", "rest-1", "Tiramisu", "Coffee-soaked ladyfingers with mascarpone cream", 699, "Desserts"),
    ("item-6", "rest-2", "Classic Burger", "Beef patty, lettuce, tomato and house sauce", 999, "Burgers"),
    ("item-7", "rest-2", "Cheeseburger", "Classic burger with melted cheddar", 1099, "Burgers"),
    ("item-8", "rest-2", "Bacon Burger", "Smoky bacon, cheddar and caramelized onions", 1249, "Burgers"),
    ("item-9", "rest-2", "French Fries", "Crispy golden fries with sea salt", 399, "Sides"),
    ("item-10", "rest-2", "Milkshake", "Thick vanilla, chocolate or strawberry shake", 499, "Drinks"),
    ("item-11", "rest-3", "California Roll", "Crab, avocado and cucumber", 899, "Sushi"),
    ("item-12", "rest-3", "Salmon Nigiri", "Fresh salmon over seasoned rice", 699, "Sushi"),
    ("item-13", "rest-3", "Spicy Tuna Roll", "Tuna, spicy mayo and scallions", 949, "Sushi"),
    ("item-14", "rest-3", "Miso Soup", "Tofu, seaweed and green onion", 299, "Sides"),
    ("item-15", "rest-3", "Edamame", "Steamed soybeans with sea salt", 349, "Sides"),
    ("item-16", "rest-4", "Chicken Tacos", "Grilled chicken, salsa and lime crema", 849, "Tacos"),
    ("item-17", "rest-4", "Beef Burrito", "Seasoned beef, rice, beans and cheese", 999, "Burritos"),
    ("item-18", "rest-4", "Nachos Supreme", "Tortilla chips, queso, jalapenos and guacamole", 749, "Sides"),
    ("item-19", "rest-4", "Churros", "Cinnamon sugar churros with chocolate dip", 449, "Desserts"),
    ("item-20", "rest-5", "Spaghetti Carbonara", "Egg, pecorino, pancetta and black pepper", 1349, "Pasta"),
    ("item-21", "rest-5", "Fettuccine Alfredo", "Fettuccine in a parmesan cream sauce", 1299, "Pasta"),
    ("item-22", "rest-5", "Penne Arrabbiata", "Penne in a spicy tomato sauce", 1149, "Pasta"),
    ("item-23", "rest-5", "Panna Cotta", "Vanilla cream with berry compote", 599, "Desserts"),
    ("item-24", "rest-6", "Butter Chicken", "Tandoori chicken in a creamy tomato gravy", 499, "Indian"),
    ("item-25", "rest-6", "Paneer Tikka Masala", "Grilled paneer in a spiced masala gravy", 449, "Indian"),
    ("item-26", "rest-6", "Chicken Biryani", "Basmati rice layered with spiced chicken", 549, "Biryani"),
    ("item-27", "rest-6", "Garlic Naan", "Tandoor flatbread brushed with garlic butter", 99, "Bread"),
    ("item-28", "rest-6", "Mango Lassi", "Chilled yogurt drink with mango pulp", 199, "Drinks"),
];

/// `(id, name, description, restaurant, original ₹, discounted ₹, discount %)`
type OfferSeed = (&'static str, &'static str, &'static str, &'static str, i64, i64, u8);

const OFFERS: &[OfferSeed] = &[
    ("special-1", "Hyderabadi Chicken Biryani", "Aromatic basmati rice cooked with tender chicken pieces and authentic spices", "rest-6", 299, 199, 33),
    ("special-2", "Punjabi Thali", "Complete meal with dal makhani, paneer butter masala, naan, rice, raita and dessert", "rest-6", 349, 249, 29),
    ("special-3", "Cheese Burst Pizza", "Loaded with extra cheese, bell peppers, olives, corn and jalapenos", "rest-1", 399, 299, 25),
    ("special-4", "Double Cheese Burger", "Juicy patty with double cheese, lettuce, tomato and special sauce", "rest-2", 249, 179, 28),
    ("special-5", "Masala Dosa", "Crispy dosa filled with spiced potato filling, served with sambar and chutney", "rest-5", 199, 149, 25),
    ("special-6", "Paneer Butter Masala", "Cottage cheese cubes in rich tomato and butter gravy, best with naan", "rest-6", 249, 199, 20),
];

fn build_restaurant(seed: &RestaurantSeed) -> Restaurant {
    Restaurant {
        id: RestaurantId::new(seed.id),
        name: seed.name.to_string(),
        description: seed.description.to_string(),
        image: images::restaurant_cover(seed.id).to_string(),
        cuisine: seed.cuisine.iter().map(|c| (*c).to_string()).collect(),
        rating: seed.rating,
        delivery_time: seed.delivery_time.to_string(),
        delivery_fee: inr_delivery_fee(Decimal::new(seed.delivery_fee_cents, 2)),
        min_order: inr_min_order(Decimal::new(seed.min_order_cents, 2)),
    }
}

fn build_menu_item(&(id, restaurant, name, description, cents, category): &MenuSeed) -> MenuItem {
    MenuItem {
        id: MenuItemId::new(id),
        restaurant_id: Some(RestaurantId::new(restaurant)),
        name: name.to_string(),
        description: description.to_string(),
        price: to_inr(Decimal::new(cents, 2)),
        image: images::food_image(id, Some(category)).to_string(),
        category: category.to_string(),
        available: true,
    }
}

fn restaurant_name(id: &str) -> &'static str {
    RESTAURANTS
        .iter()
        .find(|r| r.id == id)
        .map_or(campus_eats_core::pricing::UNKNOWN_RESTAURANT, |r| r.name)
}

/// Every fixture restaurant, prices in rupees.
#[must_use]
pub fn restaurants() -> Vec<Restaurant> {
    RESTAURANTS.iter().map(build_restaurant).collect()
}

/// The restaurant with `id`, or the first fixture restaurant if unknown.
#[must_use]
pub fn restaurant(id: &RestaurantId) -> Restaurant {
    RESTAURANTS
        .iter()
        .find(|r| r.id == id.as_str())
        .or_else(|| RESTAURANTS.first())
        .map(build_restaurant)
        .unwrap_or_else(|| Restaurant {
            id: id.clone(),
            name: campus_eats_core::pricing::UNKNOWN_RESTAURANT.to_string(),
            description: String::new(),
            image: images::restaurant_cover(id.as_str()).to_string(),
            cuisine: Vec::new(),
            rating: 0.0,
            delivery_time: String::new(),
            delivery_fee: Decimal::ZERO,
            min_order: Decimal::ZERO,
        })
}

/// Restaurants listing `cuisine`, ignoring case.
#[must_use]
pub fn restaurants_by_cuisine(cuisine: &str) -> Vec<Restaurant> {
    restaurants().into_iter().filter(|r| r.serves(cuisine)).collect()
}

/// Restaurants whose name or cuisine contains `keyword`, ignoring case.
#[must_use]
pub fn search_restaurants(keyword: &str) -> Vec<Restaurant> {
    restaurants().into_iter().filter(|r| r.matches(keyword)).collect()
}

/// A restaurant's menu, prices in rupees.
#[must_use]
pub fn menu_items(restaurant_id: &RestaurantId) -> Vec<MenuItem> {
    MENU.iter()
        .filter(|(_, restaurant, ..)| *restaurant == restaurant_id.as_str())
        .map(build_menu_item)
        .collect()
}

/// A restaurant's menu items in `category` (exact match).
#[must_use]
pub fn menu_items_by_category(restaurant_id: &RestaurantId, category: &str) -> Vec<MenuItem> {
    menu_items(restaurant_id)
        .into_iter()
        .filter(|item| item.category == category)
        .collect()
}

/// Today's special offers.
#[must_use]
pub fn special_offers() -> Vec<SpecialOffer> {
    OFFERS
        .iter()
        .map(
            |&(id, name, description, restaurant, original, discounted, discount)| SpecialOffer {
                id: OfferId::new(id),
                name: name.to_string(),
                description: description.to_string(),
                restaurant_id: RestaurantId::new(restaurant),
                restaurant_name: restaurant_name(restaurant).to_string(),
                original_price: Decimal::from(original),
                discounted_price: Decimal::from(discounted),
                discount,
                image: images::special_offer_image(id).to_string(),
            },
        )
        .collect()
}
