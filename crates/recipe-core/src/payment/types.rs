use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Title shown on the hosted checkout page when the caller does not set one
pub const DEFAULT_CHECKOUT_TITLE: &str = "Recipe Purchase";

/// Currencies accepted by the Chapa checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Etb,
    Usd,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Etb => "ETB",
            Currency::Usd => "USD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ETB" => Ok(Currency::Etb),
            "USD" => Ok(Currency::Usd),
            other => Err(format!("Unsupported currency: {other}")),
        }
    }
}

/// Hosted checkout page customization
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Customization {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl Customization {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = Some(logo.into());
        self
    }
}

/// Server-to-server callback and browser return URLs for one purchase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackUrls {
    pub callback_url: String,
    pub return_url: String,
}

/// Who is paying
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payer {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl Payer {
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone_number: None,
        }
    }

    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }
}

/// Body of `POST /chapa-payment`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub amount: f64,
    pub currency: Currency,
    #[serde(flatten)]
    pub payer: Payer,
    pub tx_ref: String,
    pub callback_url: String,
    pub return_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customization: Option<Customization>,
}

impl PaymentRequest {
    pub fn new(amount: f64, payer: Payer, tx_ref: impl Into<String>, urls: CallbackUrls) -> Self {
        Self {
            amount,
            currency: Currency::default(),
            payer,
            tx_ref: tx_ref.into(),
            callback_url: urls.callback_url,
            return_url: urls.return_url,
            description: None,
            customization: None,
        }
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_customization(mut self, customization: Customization) -> Self {
        self.customization = Some(customization);
        self
    }

    /// Fill customization gaps: default title, description from the request.
    pub(crate) fn with_resolved_customization(mut self) -> Self {
        if let Some(custom) = self.customization.as_mut() {
            if custom.title.is_none() {
                custom.title = Some(DEFAULT_CHECKOUT_TITLE.to_string());
            }
            if custom.description.is_none() {
                custom.description = self.description.clone();
            }
        }
        self
    }
}

/// Outcome of `GET /chapa-payment/transaction/verify/{tx_ref}`
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationResult {
    pub tx_ref: String,
    pub status: String,
    /// The provider's `data` object as received
    pub data: Value,
}

impl VerificationResult {
    pub fn is_successful(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}

/// Snapshot of the adapter's request state for the host UI
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaymentState {
    pub loading: bool,
    pub error: Option<String>,
}
