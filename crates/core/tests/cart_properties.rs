//! Cart invariants over arbitrary operation sequences

use std::{collections::HashSet, sync::Arc};

use proptest::{prelude::*, test_runner::Config};
use rootcraft::prelude::*;
use rust_decimal::Decimal;

const IDS: [&str; 4] = ["p1", "p2", "p3", "p4"];

#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    Remove(usize),
    Update(usize, i64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..IDS.len()).prop_map(Op::Add),
        (0..IDS.len()).prop_map(Op::Remove),
        (0..IDS.len(), -3_i64..8).prop_map(|(index, quantity)| Op::Update(index, quantity)),
    ]
}

fn id(index: usize) -> &'static str {
    IDS.get(index).copied().unwrap_or("p1")
}

fn product(index: usize) -> Product {
    Product {
        id: id(index).to_string(),
        name: format!("Product {}", id(index)),
        description: String::new(),
        image: String::new(),
        price: Decimal::from(100 * (index + 1)),
        old_price: None,
        tag: None,
    }
}

fn cart_after(ops: &[Op]) -> Cart {
    let cart = Cart::new(Arc::new(MemoryStorage::new()), Toasts::new());

    for op in ops {
        match op {
            Op::Add(index) => cart.add_to_cart(product(*index)),
            Op::Remove(index) => cart.remove_from_cart(id(*index)),
            Op::Update(index, quantity) => cart.update_quantity(id(*index), *quantity),
        }
    }

    cart
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn one_line_per_id_and_totals_match(ops in prop::collection::vec(op(), 0..40)) {
        let cart = cart_after(&ops);
        let items = cart.items();

        let ids: HashSet<_> = items.iter().map(|line| line.id.as_str()).collect();
        let quantity_sum: u64 = items.iter().map(|line| u64::from(line.quantity)).sum();
        let price_sum: Decimal = items.iter().map(CartItem::line_total).sum();

        prop_assert_eq!(ids.len(), items.len());
        prop_assert!(items.iter().all(|line| line.quantity >= 1));
        prop_assert_eq!(cart.total_items(), quantity_sum);
        prop_assert_eq!(cart.total_price(), price_sum);
    }

    #[test]
    fn zero_quantity_matches_remove(
        ops in prop::collection::vec(op(), 0..40),
        target in 0..IDS.len(),
    ) {
        let updated = cart_after(&ops);
        let removed = cart_after(&ops);

        updated.update_quantity(id(target), 0);
        removed.remove_from_cart(id(target));

        prop_assert_eq!(updated.items(), removed.items());
    }
}
