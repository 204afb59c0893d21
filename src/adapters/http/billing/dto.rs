//! Request shapes for billing endpoints.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AddPaymentMethodRequest {
    #[serde(default = "default_provider")]
    pub provider: String,
    pub gateway_method_id: String,
    #[serde(default)]
    pub last_four: Option<String>,
    #[serde(default)]
    pub card_type: Option<String>,
    #[serde(default)]
    pub expiry_month: Option<i16>,
    #[serde(default)]
    pub expiry_year: Option<i16>,
}

fn default_provider() -> String {
    "razorpay".to_string()
}
