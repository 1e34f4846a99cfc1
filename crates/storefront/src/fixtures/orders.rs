//! Mock orders, addresses and accounts.

use campus_eats_core::order::{DeliveryAddress, GeoPoint, RestaurantRef};
use campus_eats_core::pricing::{self, UNKNOWN_RESTAURANT};
use campus_eats_core::{
    Address, AddressId, CartItem, CurrencyCode, Fees, MenuItemId, Order, OrderId, OrderItem, OrderRequest,
    OrderStatus, PaymentMethod, RestaurantId, UserId,
};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rust_decimal::Decimal;

use super::images;
use crate::api::{AuthResponse, UserProfile};

/// Fees recorded on the historical mock orders, in rupees.
pub const CAMPUS_FEES: Fees = Fees {
    delivery_fee: Decimal::from_parts(49, 0, 0, false, 0),
    service_fee: Decimal::from_parts(29, 0, 0, false, 0),
};

/// Campus location mock orders are delivered to.
pub const CAMPUS_LOCATION: GeoPoint = GeoPoint {
    lat: 30.7691,
    lng: 76.5764,
};

pub const CAMPUS_CITY: &str = "Chandigarh University";
pub const CAMPUS_STATE: &str = "Punjab";
pub const CAMPUS_ZIP: &str = "140413";

/// Token issued by the mock sign-in.
pub const MOCK_TOKEN: &str = "mock-jwt-token";

/// Generate a public order number of the form `ORD-NNNNNN`.
#[must_use]
pub fn generate_order_number() -> String {
    let number: u32 = rand::rng().random_range(100_000..1_000_000);
    format!("ORD-{number}")
}

fn campus_address(street: &str) -> DeliveryAddress {
    DeliveryAddress {
        street: street.to_string(),
        city: CAMPUS_CITY.to_string(),
        state: CAMPUS_STATE.to_string(),
        zip_code: CAMPUS_ZIP.to_string(),
    }
}

fn item(id: &str, name: &str, quantity: u32, price: i64, category: &str) -> OrderItem {
    OrderItem {
        id: MenuItemId::new(id),
        name: name.to_string(),
        quantity,
        price: Decimal::from(price),
        image: Some(images::food_image(id, Some(category)).to_string()),
    }
}

struct MockOrder<'a> {
    id: &'a str,
    order_number: String,
    status: OrderStatus,
    restaurant: (&'a str, &'a str),
    items: Vec<OrderItem>,
    created_at: DateTime<Utc>,
    street: &'a str,
    location: GeoPoint,
    eta: Option<&'a str>,
    payment_method: Option<PaymentMethod>,
}

impl MockOrder<'_> {
    fn build(self) -> Order {
        let subtotal = pricing::subtotal(&self.items);
        Order {
            id: OrderId::new(self.id),
            order_number: self.order_number,
            status: self.status,
            restaurant: RestaurantRef {
                id: RestaurantId::new(self.restaurant.0),
                name: self.restaurant.1.to_string(),
            },
            items: self.items,
            subtotal: Some(subtotal),
            delivery_fee: Some(CAMPUS_FEES.delivery_fee),
            service_fee: Some(CAMPUS_FEES.service_fee),
            total: Some(subtotal + CAMPUS_FEES.total()),
            currency: Some(CurrencyCode::INR),
            created_at: self.created_at,
            delivery_address: campus_address(self.street),
            delivery_location: Some(self.location),
            estimated_delivery_time: self.eta.map(str::to_string),
            payment_method: self.payment_method,
        }
    }
}

/// Order history shown when no session exists or the backend is away.
#[must_use]
pub fn mock_orders(now: DateTime<Utc>) -> Vec<Order> {
    vec![
        MockOrder {
            id: "order-1",
            order_number: "ORD-123456".to_string(),
            status: OrderStatus::Delivered,
            restaurant: ("rest-6", "Curry Corner"),
            items: vec![
                item("item-curry-1", "Butter Chicken", 2, 399, "Indian"),
                item("item-bread-1", "Garlic Naan", 3, 79, "Bread"),
            ],
            created_at: now - Duration::days(1),
            street: "Hostel Block A, Room 203",
            location: CAMPUS_LOCATION,
            eta: Some("Delivered"),
            payment_method: Some(PaymentMethod::CreditCard),
        }
        .build(),
        MockOrder {
            id: "order-2",
            order_number: "ORD-234567".to_string(),
            status: OrderStatus::OutForDelivery,
            restaurant: ("rest-1", "Pizza Paradise"),
            items: vec![
                item("item-pizza-1", "Margherita Pizza", 1, 349, "Pizza"),
                item("item-sides-1", "Garlic Bread", 1, 149, "Sides"),
                item("item-drink-1", "Coca Cola", 2, 59, "Drinks"),
            ],
            created_at: now,
            street: "Academic Block 3, Department of Computer Science",
            location: GeoPoint {
                lat: 30.7701,
                lng: 76.5774,
            },
            eta: Some("10-15 min"),
            payment_method: Some(PaymentMethod::Cash),
        }
        .build(),
        MockOrder {
            id: "order-3",
            order_number: "ORD-345678".to_string(),
            status: OrderStatus::Preparing,
            restaurant: ("rest-2", "Burger Bliss"),
            items: vec![
                item("item-burger-1", "Double Cheese Burger", 2, 299, "Burger"),
                item("item-sides-2", "French Fries", 2, 149, "Sides"),
                item("item-drink-2", "Chocolate Shake", 2, 179, "Drinks"),
            ],
            created_at: now - Duration::hours(1),
            street: "Student Center, Chandigarh University",
            location: GeoPoint {
                lat: 30.7681,
                lng: 76.5754,
            },
            eta: Some("25-35 min"),
            payment_method: Some(PaymentMethod::CreditCard),
        }
        .build(),
    ]
}

/// An order being prepared, used when a single order cannot be fetched.
#[must_use]
pub fn mock_order(id: &OrderId, order_number: String, now: DateTime<Utc>) -> Order {
    MockOrder {
        id: id.as_str(),
        order_number,
        status: OrderStatus::Preparing,
        restaurant: ("rest-1", "Pizza Paradise"),
        items: vec![
            item("item-1", "Margherita Pizza", 2, 399, "Pizza"),
            item("item-3", "Garlic Bread", 1, 149, "Sides"),
        ],
        created_at: now,
        street: "Hostel Block A, Room 203",
        location: CAMPUS_LOCATION,
        eta: None,
        payment_method: None,
    }
    .build()
}

/// The order a checkout produces when the backend cannot take it.
///
/// Lines, restaurant and prices come from the cart. `fees` and `currency`
/// must be the ones the cart was shown with. The status starts at RECEIVED.
#[must_use]
pub fn placed_order(
    request: &OrderRequest,
    cart: &[CartItem],
    address: Option<&Address>,
    fees: Fees,
    currency: CurrencyCode,
    now: DateTime<Utc>,
) -> Order {
    let restaurant_name = cart
        .iter()
        .filter(|c| c.restaurant_id == request.restaurant_id)
        .find_map(|c| c.restaurant_name.clone())
        .unwrap_or_else(|| UNKNOWN_RESTAURANT.to_string());

    let items: Vec<OrderItem> = cart
        .iter()
        .map(|c| OrderItem {
            id: c.id.clone(),
            name: c.name.clone(),
            quantity: c.quantity,
            price: c.price,
            image: Some(c.image.clone()).filter(|i| !i.is_empty()),
        })
        .collect();
    let subtotal = pricing::subtotal(&items);

    Order {
        id: OrderId::new(format!("order-{}", now.timestamp_millis())),
        order_number: generate_order_number(),
        status: OrderStatus::Received,
        restaurant: RestaurantRef {
            id: request.restaurant_id.clone(),
            name: restaurant_name,
        },
        items,
        subtotal: Some(subtotal),
        delivery_fee: Some(fees.delivery_fee),
        service_fee: Some(fees.service_fee),
        total: Some(subtotal + fees.total()),
        currency: Some(currency),
        created_at: now,
        delivery_address: address.map_or_else(
            || campus_address("Hostel Block A, Room 203"),
            DeliveryAddress::from,
        ),
        delivery_location: Some(CAMPUS_LOCATION),
        estimated_delivery_time: Some(format!("{} min", OrderStatus::Received.eta_minutes())),
        payment_method: Some(request.payment_method),
    }
}

/// Saved addresses for the mock account.
#[must_use]
pub fn mock_addresses() -> Vec<Address> {
    [
        ("addr-1", "Hostel Block A, Room 203", "Call when at the hostel gate", true),
        (
            "addr-2",
            "Academic Block 3, Department of Computer Science",
            "Deliver during lunch break (12-1 PM)",
            false,
        ),
        ("addr-3", "Student Center, Food Court", "Meet at the entrance", false),
    ]
    .into_iter()
    .map(|(id, street, instructions, is_default)| Address {
        id: AddressId::new(id),
        street: street.to_string(),
        city: CAMPUS_CITY.to_string(),
        state: CAMPUS_STATE.to_string(),
        zip_code: CAMPUS_ZIP.to_string(),
        instructions: Some(instructions.to_string()),
        is_default,
    })
    .collect()
}

/// Profile for the mock account.
#[must_use]
pub fn mock_profile() -> UserProfile {
    UserProfile {
        id: UserId::new("user-1"),
        name: "John Doe".to_string(),
        email: "john@example.com".to_string(),
        phone: Some("123-456-7890".to_string()),
    }
}

/// Sign-in response for `username` when the backend is away.
#[must_use]
pub fn mock_sign_in(username: &str) -> AuthResponse {
    let mut chars = username.chars();
    let name = chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect::<String>())
        .unwrap_or_default();

    AuthResponse {
        id: UserId::new("user-1"),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        name,
        token: Some(MOCK_TOKEN.to_string()),
        roles: vec!["ROLE_USER".to_string()],
    }
}
