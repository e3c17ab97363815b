//! Session and payment adapters for the recipe-sharing client.
//!
//! Both adapters are generic over the runtime seams in [`runtime`] so the host
//! decides how HTTP, the token slot and the clock are provided.

pub mod error;
pub mod payment;
pub mod runtime;
pub mod session;

pub use error::{DecodeError, PaymentError, StoreError, TransportError};
pub use payment::PaymentClient;
pub use session::{Claims, CurrentUser, Session};
