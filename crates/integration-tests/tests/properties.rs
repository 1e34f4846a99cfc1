//! Invariants that must hold after any sequence of operations.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, HashSet};

use campus_eats_core::{
    AddressBook, AddressDraft, AddressError, AddressId, CartStore, Fees, MemoryStore, MenuItemId,
    NewCartItem, OrderProgress, OrderStatus, RestaurantId,
};
use proptest::prelude::*;
use proptest::test_runner::Config;
use rust_decimal::Decimal;

// =============================================================================
// Cart
// =============================================================================

#[derive(Debug, Clone)]
enum CartOp {
    Add { item: u8, cents: i64 },
    Remove(u8),
    Update(u8, i64),
    Clear,
}

fn cart_op() -> impl Strategy<Value = CartOp> {
    prop_oneof![
        4 => (0..6_u8, 0..5_000_i64).prop_map(|(item, cents)| CartOp::Add { item, cents }),
        1 => (0..6_u8).prop_map(CartOp::Remove),
        2 => (0..6_u8, -3..10_i64).prop_map(|(item, quantity)| CartOp::Update(item, quantity)),
        1 => Just(CartOp::Clear),
    ]
}

fn menu_id(item: u8) -> MenuItemId {
    MenuItemId::new(format!("item-{item}"))
}

fn new_item(item: u8, cents: i64) -> NewCartItem {
    let restaurant = item % 3;
    NewCartItem {
        id: menu_id(item),
        restaurant_id: RestaurantId::new(format!("rest-{restaurant}")),
        restaurant_name: Some(format!("Restaurant {restaurant}")),
        name: format!("Item {item}"),
        price: Decimal::new(cents, 2),
        image: String::new(),
    }
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn cart_quantities_match_model(ops in proptest::collection::vec(cart_op(), 0..40)) {
        let mut cart = CartStore::load(MemoryStore::new());
        let mut model: HashMap<MenuItemId, u32> = HashMap::new();

        for op in ops {
            match op {
                CartOp::Add { item, cents } => {
                    cart.add_to_cart(new_item(item, cents)).unwrap();
                    *model.entry(menu_id(item)).or_insert(0) += 1;
                }
                CartOp::Remove(item) => {
                    let removed = cart.remove_from_cart(&menu_id(item));
                    prop_assert_eq!(removed, model.remove(&menu_id(item)).is_some());
                }
                CartOp::Update(item, quantity) => {
                    let stored = cart.update_quantity(&menu_id(item), quantity);
                    if let Some(expected) = model.get_mut(&menu_id(item)) {
                        *expected = u32::try_from(quantity.max(1)).unwrap();
                    }
                    prop_assert_eq!(stored, model.get(&menu_id(item)).copied());
                }
                CartOp::Clear => {
                    cart.clear_cart();
                    model.clear();
                }
            }

            let ids: HashSet<&MenuItemId> = cart.items().iter().map(|i| &i.id).collect();
            prop_assert_eq!(ids.len(), cart.items().len(), "duplicate ids");
            prop_assert!(cart.items().iter().all(|i| i.quantity >= 1));

            let actual: HashMap<MenuItemId, u32> =
                cart.items().iter().map(|i| (i.id.clone(), i.quantity)).collect();
            prop_assert_eq!(&actual, &model);
        }
    }

    #[test]
    fn cart_totals_and_groups_follow_items(ops in proptest::collection::vec(cart_op(), 0..40)) {
        let mut cart = CartStore::load(MemoryStore::new());

        for op in ops {
            match op {
                CartOp::Add { item, cents } => {
                    cart.add_to_cart(new_item(item, cents)).unwrap();
                }
                CartOp::Remove(item) => {
                    cart.remove_from_cart(&menu_id(item));
                }
                CartOp::Update(item, quantity) => {
                    cart.update_quantity(&menu_id(item), quantity);
                }
                CartOp::Clear => cart.clear_cart(),
            }

            let expected: Decimal = cart
                .items()
                .iter()
                .map(|i| i.price * Decimal::from(i.quantity))
                .sum();
            let totals = cart.totals(Fees::standard());
            prop_assert_eq!(totals.subtotal, expected);
            prop_assert_eq!(cart.cart_total(), expected);
            prop_assert_eq!(totals.total, expected + Fees::standard().total());
            prop_assert_eq!(cart.item_count(), cart.items().iter().map(|i| i.quantity).sum::<u32>());

            let groups = cart.restaurant_groups();
            let restaurants: HashSet<&RestaurantId> = groups.iter().map(|g| &g.restaurant_id).collect();
            prop_assert_eq!(restaurants.len(), groups.len(), "one group per restaurant");

            let mut grouped: Vec<&MenuItemId> = Vec::new();
            for group in &groups {
                prop_assert!(!group.items.is_empty());
                prop_assert!(group.items.iter().all(|i| i.restaurant_id == group.restaurant_id));
                grouped.extend(group.items.iter().map(|i| &i.id));
            }
            let mut all: Vec<&MenuItemId> = cart.items().iter().map(|i| &i.id).collect();
            grouped.sort();
            all.sort();
            prop_assert_eq!(grouped, all, "groups partition the cart");

            let group_sum: Decimal = groups.iter().map(|g| g.subtotal()).sum();
            prop_assert_eq!(group_sum, expected);

            let reloaded = CartStore::load(cart.store().clone());
            prop_assert_eq!(reloaded.items(), cart.items());
        }
    }
}

// =============================================================================
// Address book
// =============================================================================

#[derive(Debug, Clone)]
enum AddressOp {
    Add(u8, bool),
    Update(u8, bool),
    SetDefault(u8),
    Remove(u8),
}

fn address_op() -> impl Strategy<Value = AddressOp> {
    prop_oneof![
        3 => (0..5_u8, any::<bool>()).prop_map(|(id, d)| AddressOp::Add(id, d)),
        2 => (0..5_u8, any::<bool>()).prop_map(|(id, d)| AddressOp::Update(id, d)),
        2 => (0..5_u8).prop_map(AddressOp::SetDefault),
        3 => (0..5_u8).prop_map(AddressOp::Remove),
    ]
}

fn address_id(id: u8) -> AddressId {
    AddressId::new(format!("addr-{id}"))
}

fn draft(id: u8, is_default: bool) -> AddressDraft {
    AddressDraft {
        street: format!("Hostel Block {id}"),
        city: "Chandigarh University".to_string(),
        state: "Punjab".to_string(),
        zip_code: "140413".to_string(),
        instructions: None,
        is_default,
    }
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn address_book_keeps_exactly_one_default(ops in proptest::collection::vec(address_op(), 0..40)) {
        let mut book = AddressBook::new();

        for op in ops {
            let before = book.clone();
            let was_default = |id: u8| {
                before.default_address().is_some_and(|a| a.id == address_id(id))
            };

            let failed = match op {
                AddressOp::Add(id, d) => book.add(address_id(id), draft(id, d)).is_err(),
                AddressOp::Update(id, d) => book.update(&address_id(id), draft(id, d)).is_err(),
                AddressOp::SetDefault(id) => book.set_default(&address_id(id)).is_err(),
                AddressOp::Remove(id) => {
                    let result = book.remove(&address_id(id));
                    if was_default(id) {
                        prop_assert!(matches!(
                            &result,
                            Err(AddressError::DefaultNotDeletable(refused)) if *refused == address_id(id)
                        ));
                    }
                    result.is_err()
                }
            };

            if failed {
                prop_assert_eq!(&book, &before, "failed operation changed the book");
            }

            let defaults = book.addresses().iter().filter(|a| a.is_default).count();
            prop_assert_eq!(defaults, usize::from(!book.is_empty()));

            let ids: HashSet<&AddressId> = book.addresses().iter().map(|a| &a.id).collect();
            prop_assert_eq!(ids.len(), book.len());
        }
    }
}

// =============================================================================
// Order status
// =============================================================================

const STATUSES: [OrderStatus; 6] = [
    OrderStatus::Received,
    OrderStatus::Preparing,
    OrderStatus::Ready,
    OrderStatus::OutForDelivery,
    OrderStatus::Delivered,
    OrderStatus::Cancelled,
];

fn rank(status: OrderStatus) -> Option<usize> {
    OrderStatus::FORWARD.iter().position(|s| *s == status)
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn status_never_moves_backward(
        start in proptest::sample::select(STATUSES.to_vec()),
        targets in proptest::collection::vec(proptest::sample::select(STATUSES.to_vec()), 0..20)
    ) {
        let mut progress = OrderProgress::new(start);

        for target in targets {
            let before = progress;
            match progress.advance_to(target) {
                Ok(()) => {
                    prop_assert!(!before.status.is_terminal());
                    prop_assert_eq!(progress.status, target);
                    prop_assert!(progress.progress >= before.progress);
                    if target != OrderStatus::Cancelled {
                        prop_assert_eq!(rank(target), rank(before.status).map(|r| r + 1));
                    }
                }
                Err(_) => prop_assert_eq!(progress, before),
            }
        }
    }
}
