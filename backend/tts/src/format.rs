//! Receipt-to-sentence formatting for speech output.

use receipt_core::Receipt;

/// Render a receipt as the human-readable sentence fed to the speech
/// engine. A missing tip reads as `0.00`.
pub fn format_receipt_text(receipt: &Receipt) -> String {
    let mut text = format!(
        "Receipt from {} on {}. ",
        receipt.establishment, receipt.date
    );
    for item in &receipt.items {
        text.push_str(&format!(
            "Item: {}, Quantity: {}, Unit Price: {:.2}, Subtotal: {:.2}. ",
            item.name, item.quantity, item.unit_price, item.total_price
        ));
    }
    text.push_str(&format!(
        "Tip: {:.2}. Total: {:.2}.",
        receipt.tip.unwrap_or(0.0),
        receipt.total
    ));
    text
}
