//! Mock structurer for tests and offline development.

use async_trait::async_trait;
use receipt_core::{ReceiptError, StructuredReceipt};

use crate::ReceiptStructurer;

/// Returns a fixed structured receipt regardless of input, or a configured
/// failure.
pub struct MockStructurer {
    result: Result<StructuredReceipt, String>,
}

impl MockStructurer {
    pub fn returning(structured: StructuredReceipt) -> Self {
        Self {
            result: Ok(structured),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            result: Err(message.into()),
        }
    }
}

#[async_trait]
impl ReceiptStructurer for MockStructurer {
    async fn structure(&self, _raw_text: &str) -> Result<StructuredReceipt, ReceiptError> {
        match &self.result {
            Ok(structured) => Ok(structured.clone()),
            Err(message) => Err(ReceiptError::Parse(message.clone())),
        }
    }
}
