use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::PaymentError;
use crate::payment::amount::validate_and_format_amount_in;
use crate::payment::reference::ReferenceGenerator;
use crate::payment::response::{self, CheckoutData};
use crate::payment::types::{CallbackUrls, PaymentRequest, PaymentState, VerificationResult};
use crate::payment::urls::{build_callback_urls, join_path};
use crate::runtime::{HttpClient, TimeProvider};

const INITIALIZE_PATH: [&str; 1] = ["chapa-payment"];

const MISSING_CHECKOUT_URL: &str = "Payment service did not return a checkout URL";
const MISSING_STATUS: &str = "Payment service did not return a transaction status";

#[derive(Default)]
struct RequestState {
    in_flight: usize,
    error: Option<String>,
    pending_refs: HashSet<String>,
}

/// Chapa checkout through the backend proxy.
///
/// Provider secrets live behind the proxy; this client only ever talks to
/// `{proxy_base_url}/chapa-payment...`.
pub struct PaymentClient<H: HttpClient, T: TimeProvider> {
    http_client: H,
    references: ReferenceGenerator<T>,
    proxy_base_url: String,
    state: Mutex<RequestState>,
}

impl<H: HttpClient, T: TimeProvider> PaymentClient<H, T> {
    pub fn new(http_client: H, time_provider: T, proxy_base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            references: ReferenceGenerator::new(time_provider),
            proxy_base_url: proxy_base_url.into(),
            state: Mutex::new(RequestState::default()),
        }
    }

    pub fn proxy_base_url(&self) -> &str {
        &self.proxy_base_url
    }

    /// Read-only snapshot of `loading` / `error`
    pub fn state(&self) -> PaymentState {
        let state = self.lock();
        PaymentState {
            loading: state.in_flight > 0,
            error: state.error.clone(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.lock().in_flight > 0
    }

    pub fn last_error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn generate_transaction_reference(&self, prefix: &str) -> String {
        self.references.generate(prefix)
    }

    pub fn validate_and_format_amount(&self, amount: f64) -> Result<f64, PaymentError> {
        crate::payment::amount::validate_and_format_amount(amount)
    }

    pub fn build_callback_urls(
        &self,
        base_url: &str,
        purchased_item_id: &str,
        tx_ref: &str,
    ) -> Result<CallbackUrls, PaymentError> {
        build_callback_urls(base_url, purchased_item_id, tx_ref)
    }

    /// Start a hosted checkout and return the URL to redirect the payer to.
    ///
    /// Clears `error` first. Validation failures are reported before any
    /// request is sent.
    pub async fn initialize_payment(
        &self,
        request: PaymentRequest,
    ) -> Result<String, PaymentError> {
        self.lock().error = None;

        let result = match self.prepare(request) {
            Ok(request) => self.send_initialize(request).await,
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            warn!("Payment initialization failed: {e}");
            self.lock().error = Some(e.message());
        }
        result
    }

    /// Look up the provider status of `tx_ref`.
    pub async fn verify_payment(&self, tx_ref: &str) -> Result<VerificationResult, PaymentError> {
        let result = self.send_verify(tx_ref).await;
        if let Err(e) = &result {
            warn!(tx_ref, "Payment verification failed: {e}");
            self.lock().error = Some(e.message());
        }
        result
    }

    fn prepare(&self, request: PaymentRequest) -> Result<PaymentRequest, PaymentError> {
        if request.tx_ref.trim().is_empty() {
            return Err(PaymentError::InvalidRequest(
                "transaction reference is required".to_string(),
            ));
        }
        let amount = validate_and_format_amount_in(request.amount, request.currency)?;
        Ok(PaymentRequest {
            amount,
            ..request.with_resolved_customization()
        })
    }

    async fn send_initialize(&self, request: PaymentRequest) -> Result<String, PaymentError> {
        let url = join_path(&self.proxy_base_url, &INITIALIZE_PATH)?;
        let body = serde_json::to_string(&request)
            .map_err(|e| PaymentError::InvalidRequest(format!("cannot encode request: {e}")))?;

        let _guard = InFlight::claim(self, Some(&request.tx_ref))?;
        debug!(tx_ref = %request.tx_ref, amount = request.amount, "Initializing payment");

        let response = self.http_client.post_json(url.as_str(), &body).await?;
        if !response.is_success() {
            return Err(PaymentError::PaymentInitFailed(
                response::extract_error_message(&response),
            ));
        }

        match response::parse_data::<CheckoutData>(&response.body).and_then(|d| d.checkout_url) {
            Some(checkout_url) if !checkout_url.is_empty() => {
                info!(tx_ref = %request.tx_ref, "Payment initialized");
                Ok(checkout_url)
            }
            _ => Err(PaymentError::PaymentInitFailed(
                response::message_from_incomplete_body(&response.body)
                    .unwrap_or_else(|| MISSING_CHECKOUT_URL.to_string()),
            )),
        }
    }

    async fn send_verify(&self, tx_ref: &str) -> Result<VerificationResult, PaymentError> {
        if tx_ref.trim().is_empty() {
            return Err(PaymentError::InvalidRequest(
                "transaction reference is required".to_string(),
            ));
        }
        let url = join_path(
            &self.proxy_base_url,
            &["chapa-payment", "transaction", "verify", tx_ref],
        )?;

        let _guard = InFlight::claim(self, None)?;
        debug!(tx_ref, "Verifying payment");

        let response = self.http_client.get(url.as_str()).await?;
        if !response.is_success() {
            return Err(PaymentError::PaymentVerifyFailed(
                response::extract_error_message(&response),
            ));
        }

        let data = response::parse_data::<Value>(&response.body).unwrap_or(Value::Null);
        match data.get("status").and_then(Value::as_str) {
            Some(status) => Ok(VerificationResult {
                tx_ref: tx_ref.to_string(),
                status: status.to_string(),
                data,
            }),
            None => Err(PaymentError::PaymentVerifyFailed(
                response::message_from_incomplete_body(&response.body)
                    .unwrap_or_else(|| MISSING_STATUS.to_string()),
            )),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RequestState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Marks one outstanding request; released on drop, including when the
/// caller abandons the future mid-request.
struct InFlight<'a, H: HttpClient, T: TimeProvider> {
    client: &'a PaymentClient<H, T>,
    tx_ref: Option<String>,
}

impl<'a, H: HttpClient, T: TimeProvider> InFlight<'a, H, T> {
    fn claim(client: &'a PaymentClient<H, T>, tx_ref: Option<&str>) -> Result<Self, PaymentError> {
        let mut state = client.lock();
        if let Some(tx_ref) = tx_ref {
            if !state.pending_refs.insert(tx_ref.to_string()) {
                return Err(PaymentError::DuplicateTransaction(tx_ref.to_string()));
            }
        }
        state.in_flight += 1;
        Ok(Self {
            client,
            tx_ref: tx_ref.map(String::from),
        })
    }
}

impl<H: HttpClient, T: TimeProvider> Drop for InFlight<'_, H, T> {
    fn drop(&mut self) {
        let mut state = self.client.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        if let Some(tx_ref) = &self.tx_ref {
            state.pending_refs.remove(tx_ref);
        }
    }
}
