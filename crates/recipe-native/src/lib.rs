//! Native runtime for the recipe client adapters
//!
//! Wires [`recipe_core`]'s session and payment adapters to reqwest, the system
//! clock and a file-backed token slot, configured from TOML.

pub mod config;
pub mod logging;
pub mod runtime_impl;

use anyhow::{Context, Result};
use recipe_core::payment::{Payer, PaymentRequest, VerificationResult, DEFAULT_REFERENCE_PREFIX};
use recipe_core::{PaymentClient, PaymentError, Session};
use tracing::info;

pub use config::ClientConfig;
pub use runtime_impl::{FileTokenStore, MemoryTokenStore, ReqwestHttpClient, SystemTimeProvider};

/// A started hosted checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    pub tx_ref: String,
    pub checkout_url: String,
}

/// Session and payments for one configured client
pub struct App {
    config: ClientConfig,
    session: Session<FileTokenStore>,
    payments: PaymentClient<ReqwestHttpClient, SystemTimeProvider>,
}

impl App {
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        if let Err(errors) = config.validate() {
            anyhow::bail!("Invalid client config:\n  {}", errors.join("\n  "));
        }

        let token_path = config.resolved_token_path()?;
        let store = FileTokenStore::new(config.token_cookie_name.clone(), token_path);
        let http = ReqwestHttpClient::new(config.request_timeout())
            .context("Failed to create HTTP client")?;

        info!(
            api_base_url = %config.api_base_url,
            token_path = %store.path().display(),
            "Client configured"
        );

        Ok(Self {
            session: Session::new(store),
            payments: PaymentClient::new(http, SystemTimeProvider, config.api_base_url.clone()),
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Session<FileTokenStore> {
        &self.session
    }

    pub fn payments(&self) -> &PaymentClient<ReqwestHttpClient, SystemTimeProvider> {
        &self.payments
    }

    /// Start a purchase of `item_id` in the configured default currency.
    pub async fn checkout(
        &self,
        item_id: &str,
        payer: Payer,
        amount: f64,
    ) -> Result<Checkout, PaymentError> {
        let tx_ref = self
            .payments
            .generate_transaction_reference(DEFAULT_REFERENCE_PREFIX);
        let urls = self
            .payments
            .build_callback_urls(&self.config.app_base_url, item_id, &tx_ref)?;

        let request = PaymentRequest::new(amount, payer, tx_ref.clone(), urls)
            .with_currency(self.config.default_currency);
        let checkout_url = self.payments.initialize_payment(request).await?;

        Ok(Checkout {
            tx_ref,
            checkout_url,
        })
    }

    pub async fn verify(&self, tx_ref: &str) -> Result<VerificationResult, PaymentError> {
        self.payments.verify_payment(tx_ref).await
    }
}
