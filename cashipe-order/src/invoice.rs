use crate::models::{DocumentRecord, Order};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use cashipe_shared::money::format_inr;
use chrono::Utc;

/// Renders a textual invoice for an order and wraps it in a data URL.
///
/// The line format is a reproducible contract with the storefront's
/// invoice viewer; change it deliberately.
pub fn generate(order: &Order) -> DocumentRecord {
    let text = render_text(order);
    let url = format!("data:text/plain;base64,{}", BASE64.encode(text));
    DocumentRecord {
        doc_type: "invoice".to_string(),
        url,
        created_at: Utc::now(),
    }
}

fn render_text(order: &Order) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push("CashiPe - Invoice".to_string());
    lines.push("===================".to_string());
    lines.push(format!("Order ID: {}", order.id));
    lines.push(format!("Type: {}", order.order_type.as_str()));
    if !order.items.is_empty() {
        lines.push("Items:".to_string());
        for item in &order.items {
            lines.push(format!(
                " - {} x{} @ {}",
                item.name, item.quantity, item.price
            ));
        }
    } else {
        lines.push(order.device_summary());
    }
    lines.push(format!("Amount: ₹ {}", format_inr(order.price)));
    lines.push(format!(
        "Created: {}",
        order.created_at.format("%d/%m/%Y, %H:%M:%S")
    ));
    lines.join("\n")
}
