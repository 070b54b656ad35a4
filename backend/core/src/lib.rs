pub mod error;
pub mod types;

pub use error::ReceiptError;
pub use types::{LineItem, Receipt, StructuredReceipt};
