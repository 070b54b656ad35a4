//! Domain types shared across the pipeline.
//!
//! Receipts are parsed from the generative model's output, held for the
//! lifetime of one request, and discarded after the response is sent.

use serde::{Deserialize, Serialize};

/// One purchased line on a receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub total_price: f64,
}

/// A structured receipt as extracted by the generative model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub establishment: String,
    pub date: String,
    pub items: Vec<LineItem>,
    /// Absent when the receipt carries no tip line.
    #[serde(default)]
    pub tip: Option<f64>,
    pub total: f64,
}

/// The full shape the model is instructed to return: the receipt itself plus
/// a list of spending-category labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredReceipt {
    pub receipt: Receipt,
    pub categories: Vec<String>,
}
