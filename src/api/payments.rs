//! Online payment for appointments.

// self
use crate::{
	_prelude::*,
	api::{self, appointments},
	http::ApiTransport,
	pipeline::ApiClient,
};

const STRIPE_CHECKOUT: &str = "/api/user/payment-stripe";
const VERIFY_RAZORPAY: &str = "/api/user/verifyRazorpay";

/// Payment confirmation handed back by the Razorpay checkout widget.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RazorpayPayment {
	/// Payment identifier.
	pub razorpay_payment_id: String,
	/// Order identifier the payment settles.
	pub razorpay_order_id: String,
	/// Signature the backend verifies.
	pub razorpay_signature: String,
}

#[derive(Debug, Deserialize)]
struct CheckoutSession {
	session_url: Url,
}

impl<T> ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Starts a Stripe checkout for an appointment and returns the hosted checkout page.
	pub async fn stripe_checkout(&self, appointment_id: &str) -> Result<Url> {
		let response =
			self.post(STRIPE_CHECKOUT, &appointments::appointment_ref(appointment_id)).await?;

		Ok(api::unwrap_envelope::<CheckoutSession>(&response)?.data.session_url)
	}

	/// Submits a Razorpay confirmation for server-side verification.
	pub async fn verify_razorpay(&self, payment: &RazorpayPayment) -> Result<Option<String>> {
		let response = self.post(VERIFY_RAZORPAY, payment).await?;

		api::unwrap_ack(&response)
	}
}
