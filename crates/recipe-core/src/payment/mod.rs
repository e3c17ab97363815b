//! Payment adapter for Chapa hosted checkout, reached through the backend proxy

pub mod amount;
pub mod client;
pub mod reference;
pub mod response;
pub mod types;
pub mod urls;

pub use amount::{round_to_cents, validate_and_format_amount, MINIMUM_AMOUNT};
pub use client::PaymentClient;
pub use reference::{ReferenceGenerator, DEFAULT_REFERENCE_PREFIX};
pub use response::extract_error_message;
pub use types::{
    CallbackUrls, Currency, Customization, Payer, PaymentRequest, PaymentState,
    VerificationResult, DEFAULT_CHECKOUT_TITLE,
};
pub use urls::build_callback_urls;
