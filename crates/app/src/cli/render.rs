//! Terminal rendering of storefront state.

use rootcraft::{
    cart::CartState,
    checkout::Confirmation,
    items::WishlistItem,
    pricing::{OrderTotals, format_inr},
    toasts::{Toast, ToastKind},
};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

pub(crate) fn cart(state: &CartState, totals: OrderTotals) -> String {
    if state.items.is_empty() {
        return "cart is empty".to_string();
    }

    let mut builder = Builder::default();

    builder.push_record(["ID", "Item", "Price", "Qty", "Total"]);

    for item in &state.items {
        builder.push_record([
            item.id.clone(),
            item.name.clone(),
            format_inr(item.price),
            item.quantity.to_string(),
            format_inr(item.line_total()),
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::modern_rounded())
        .modify(Columns::new(2..5), Alignment::right());

    format!("{table}\n{}", summary(totals))
}

pub(crate) fn wishlist(items: &[WishlistItem]) -> String {
    if items.is_empty() {
        return "wishlist is empty".to_string();
    }

    let mut builder = Builder::default();

    builder.push_record(["ID", "Item", "Price", "Was"]);

    for item in items {
        builder.push_record([
            item.id.clone(),
            item.name.clone(),
            format_inr(item.price),
            item.old_price.map(format_inr).unwrap_or_default(),
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::modern_rounded())
        .modify(Columns::new(2..4), Alignment::right());

    format!("{table}\n{} saved", items.len())
}

pub(crate) fn confirmation(confirmation: &Confirmation) -> String {
    let address = &confirmation.address;

    let mut builder = Builder::default();

    builder.push_record(["Item", "Qty", "Total"]);

    for item in &confirmation.items {
        builder.push_record([
            item.name.clone(),
            item.quantity.to_string(),
            format_inr(item.line_total()),
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::modern_rounded())
        .modify(Columns::new(1..3), Alignment::right());

    format!(
        "order {} placed at {}\n{table}\n{}\npayment: {}\ndeliver to: {} {}, {}, {}, {} {}, {}",
        confirmation.order_id,
        confirmation.placed_at,
        summary(confirmation.totals),
        confirmation.payment_method.label(),
        address.first_name,
        address.last_name,
        address.street,
        address.city,
        address.state,
        address.zip,
        address.country,
    )
}

pub(crate) fn toasts(toasts: &[Toast]) -> String {
    toasts
        .iter()
        .map(|toast| {
            let label = match toast.kind {
                ToastKind::Success => "ok",
                ToastKind::Error => "error",
                ToastKind::Info => "info",
            };

            format!("[{label}] {}", toast.message)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn summary(totals: OrderTotals) -> String {
    let shipping = if totals.shipping.is_zero() {
        "free".to_string()
    } else {
        format_inr(totals.shipping)
    };

    format!(
        "subtotal: {}\nshipping: {shipping}\ntotal: {}",
        format_inr(totals.subtotal),
        format_inr(totals.total)
    )
}
