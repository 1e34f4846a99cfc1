//! Address book invariants under mixed operations.

#![allow(clippy::unwrap_used)]

use campus_eats_core::{Address, AddressBook, AddressDraft, AddressError, AddressId};
use campus_eats_integration_tests::{UNREACHABLE_URL, api_config};
use campus_eats_storefront::api::{ApiClient, FallbackPolicy};
use campus_eats_storefront::services::AddressService;
use campus_eats_storefront::services::addresses::pin_to_campus;

fn draft(street: &str, is_default: bool) -> AddressDraft {
    AddressDraft {
        street: street.to_string(),
        city: "Chandigarh University".to_string(),
        state: "Punjab".to_string(),
        zip_code: "140413".to_string(),
        instructions: None,
        is_default,
    }
}

fn assert_single_default(book: &AddressBook) {
    let defaults = book.addresses().iter().filter(|a| a.is_default).count();
    assert_eq!(defaults, usize::from(!book.is_empty()), "book: {book:?}");
}

#[test]
fn test_exactly_one_default_through_every_operation() {
    let mut book = AddressBook::new();
    let id = AddressId::new;

    book.add(id("a"), draft("Hostel A", false)).unwrap();
    assert_single_default(&book);
    book.add(id("b"), draft("Hostel B", true)).unwrap();
    assert_single_default(&book);
    book.add(id("c"), draft("Library", false)).unwrap();
    assert_single_default(&book);
    book.set_default(&id("c")).unwrap();
    assert_single_default(&book);
    book.update(&id("c"), draft("Library, 2nd floor", false)).unwrap();
    assert_single_default(&book);
    book.remove(&id("a")).unwrap();
    assert_single_default(&book);
    book.update(&id("b"), draft("Hostel B", true)).unwrap();
    assert_single_default(&book);

    assert_eq!(book.default_address().unwrap().id, id("b"));
}

#[test]
fn test_default_is_never_removed() {
    let mut book = AddressBook::new();
    book.add(AddressId::new("only"), draft("Hostel A", false)).unwrap();

    let err = book.remove(&AddressId::new("only")).unwrap_err();
    assert_eq!(err, AddressError::DefaultNotDeletable(AddressId::new("only")));
    assert_eq!(book.len(), 1);
}

#[test]
fn test_invalid_draft_leaves_book_unchanged() {
    let mut book = AddressBook::new();
    book.add(AddressId::new("a"), draft("Hostel A", false)).unwrap();
    let before = book.clone();

    let err = book
        .add(AddressId::new("b"), draft("   ", true))
        .unwrap_err();
    assert!(matches!(err, AddressError::MissingFields(fields) if fields.contains(&"street")));
    assert_eq!(book, before);
}

#[test]
fn test_loaded_book_repairs_default_flags() {
    let address = |id: &str, is_default: bool| Address {
        id: AddressId::new(id),
        street: format!("Street {id}"),
        city: "Chandigarh University".to_string(),
        state: "Punjab".to_string(),
        zip_code: "140413".to_string(),
        instructions: None,
        is_default,
    };

    let none = AddressBook::from_addresses(vec![address("a", false), address("b", false)]);
    assert_eq!(none.default_address().unwrap().id.as_str(), "a");

    let many = AddressBook::from_addresses(vec![
        address("a", false),
        address("b", true),
        address("c", true),
    ]);
    assert_eq!(many.default_address().unwrap().id.as_str(), "b");
    assert_single_default(&many);
}

#[test]
fn test_campus_fields_are_pinned() {
    let mut off_campus = draft("Hostel A", false);
    off_campus.city = "Mumbai".to_string();
    off_campus.zip_code = "400001".to_string();

    let pinned = pin_to_campus(off_campus);
    assert_eq!(pinned.city, "Chandigarh University");
    assert_eq!(pinned.state, "Punjab");
    assert_eq!(pinned.zip_code, "140413");
    assert_eq!(pinned.street, "Hostel A");
}

#[tokio::test]
async fn test_service_keeps_single_default_offline() {
    let api = ApiClient::new(&api_config(UNREACHABLE_URL)).unwrap();
    let service = AddressService::new(&api, FallbackPolicy::Quiet, None);

    let mut book = service.load().await;
    assert_single_default(&book);

    let added = service
        .add(&mut book, draft("Sports Complex", true))
        .await
        .unwrap();
    let added_id = added.id.clone();
    assert_single_default(&book);
    assert_eq!(book.default_address().unwrap().id, added_id);

    let previous = book
        .addresses()
        .iter()
        .find(|a| a.id != added_id)
        .map(|a| a.id.clone())
        .unwrap();
    service.set_default(&mut book, &previous).await.unwrap();
    service.remove(&mut book, &added_id).await.unwrap();
    assert_single_default(&book);
    assert!(book.get(&added_id).is_none());
}
