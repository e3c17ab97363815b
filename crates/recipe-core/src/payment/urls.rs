use url::Url;

use crate::error::PaymentError;
use crate::payment::types::CallbackUrls;

const CALLBACK_PATH: [&str; 4] = ["api", "payments", "chapa", "callback"];
const PURCHASE_SUCCESS: &str = "purchase-success";

/// Callback and return URLs for a purchase, derived only from the inputs.
///
/// - callback: `{base}/api/payments/chapa/callback`
/// - return: `{base}/recipe/{item_id}/purchase-success?tx_ref={tx_ref}`
pub fn build_callback_urls(
    base_url: &str,
    purchased_item_id: &str,
    tx_ref: &str,
) -> Result<CallbackUrls, PaymentError> {
    if purchased_item_id.trim().is_empty() {
        return Err(PaymentError::InvalidRequest(
            "purchased item id is required".to_string(),
        ));
    }

    let callback = join_path(base_url, &CALLBACK_PATH)?;

    let mut return_url = join_path(base_url, &["recipe", purchased_item_id, PURCHASE_SUCCESS])?;
    return_url.query_pairs_mut().append_pair("tx_ref", tx_ref);

    Ok(CallbackUrls {
        callback_url: callback.into(),
        return_url: return_url.into(),
    })
}

/// Append percent-encoded path segments to `base`, dropping its query and fragment.
pub(crate) fn join_path(base: &str, segments: &[&str]) -> Result<Url, PaymentError> {
    let mut url = Url::parse(base.trim())
        .map_err(|e| PaymentError::InvalidRequest(format!("invalid base URL '{base}': {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(PaymentError::InvalidRequest(format!(
            "base URL '{base}' must use http or https"
        )));
    }

    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|_| PaymentError::InvalidRequest(format!("base URL '{base}' cannot have a path")))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}
