//! Cart totals across arbitrary sequences of cart operations.
//!
//! Uses the bundled demo catalog:
//!
//! - P001 Wireless Headphones: $199.90
//! - P002 Mechanical Keyboard: $129.00
//! - P003 USB-C Hub: $49.90

use std::collections::BTreeMap;

use proptest::prelude::*;
use rusty_money::{Money, iso};
use testresult::TestResult;

use arturia::prelude::*;

const CODES: [&str; 3] = ["P001", "P002", "P003"];

#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    Remove(usize),
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..CODES.len()).prop_map(Op::Add),
        2 => (0..CODES.len()).prop_map(Op::Remove),
        1 => Just(Op::Clear),
    ]
}

fn code(index: usize) -> &'static str {
    CODES.get(index).copied().unwrap_or("P001")
}

proptest! {
    #[test]
    fn total_matches_sum_of_price_times_quantity(ops in prop::collection::vec(op(), 0..64)) {
        let catalog = demo_catalog().map_err(|e| TestCaseError::fail(e.to_string()))?;
        let mut cart = Cart::new(catalog.currency());
        let mut expected: BTreeMap<&str, i64> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Add(index) => {
                    let product = catalog
                        .get(code(index))
                        .ok_or_else(|| TestCaseError::fail("missing product"))?;

                    cart.add(product).map_err(|e| TestCaseError::fail(e.to_string()))?;
                    *expected.entry(code(index)).or_insert(0) += 1;
                }
                Op::Remove(index) => {
                    cart.remove(code(index));
                    expected.remove(code(index));
                }
                Op::Clear => {
                    cart.clear();
                    expected.clear();
                }
            }

            let expected_total: i64 = expected
                .iter()
                .filter_map(|(code, quantity)| {
                    catalog.get(code).map(|p| p.price.to_minor_units() * quantity)
                })
                .sum();

            let total = cart.total().map_err(|e| TestCaseError::fail(e.to_string()))?;

            prop_assert_eq!(total.to_minor_units(), expected_total);
            prop_assert_eq!(cart.len(), expected.len());

            for entry in cart.entries() {
                prop_assert!(entry.quantity >= 1, "entry {} has quantity 0", entry.code);
            }
        }
    }
}

#[test]
fn headphones_and_two_keyboards_total() -> TestResult {
    let catalog = demo_catalog()?;
    let mut cart = Cart::new(catalog.currency());

    let headphones = catalog.get("P001").ok_or("missing P001")?;
    let keyboard = catalog.get("P002").ok_or("missing P002")?;

    cart.add(headphones)?;
    cart.add(keyboard)?;
    cart.add(keyboard)?;

    let total = cart.total()?;

    assert_eq!(total, Money::from_minor(45_790, iso::USD));
    assert_eq!(format_money(&total), "$457.90");
    assert_eq!(cart.len(), 2);
    assert_eq!(cart.get("P002").map(|entry| entry.quantity), Some(2));

    Ok(())
}

#[test]
fn clear_after_any_contents_leaves_empty_cart() -> TestResult {
    let catalog = demo_catalog()?;
    let mut cart = Cart::new(catalog.currency());

    for product in catalog.iter() {
        cart.add(product)?;
        cart.add(product)?;
    }

    cart.clear();

    assert!(cart.is_empty());
    assert_eq!(cart.total()?, Money::from_minor(0, iso::USD));

    Ok(())
}
