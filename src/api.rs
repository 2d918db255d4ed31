//! Typed booking endpoints layered over the request pipeline.
//!
//! Every endpoint answers with the backend envelope `{ success, message?, ...payload }`. A 2xx
//! envelope whose `success` is `false` surfaces as [`Error::Unsuccessful`]; everything else a
//! call can fail with comes from the pipeline unchanged.

pub mod account;
pub mod model;
pub mod payments;
pub mod profile;

mod appointments;
mod doctors;

pub use account::*;
pub use model::*;
pub use payments::*;
pub use profile::*;

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, http::ApiResponse};

/// Successful envelope with its payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Reply<T> {
	/// Backend-supplied message, if any.
	pub message: Option<String>,
	/// Endpoint-specific payload.
	pub data: T,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
	success: bool,
	#[serde(default)]
	message: Option<String>,
	#[serde(flatten)]
	data: T,
}

#[derive(Debug, Deserialize)]
struct Bare {}

/// Unwraps the envelope, turning `success: false` into [`Error::Unsuccessful`].
///
/// The failure check runs before the payload is decoded, since failed envelopes omit it.
pub(crate) fn unwrap_envelope<T>(response: &ApiResponse) -> Result<Reply<T>>
where
	T: DeserializeOwned,
{
	let head = response.json::<Envelope<Bare>>()?;

	if !head.success {
		return Err(Error::Unsuccessful { message: head.message.unwrap_or_default() });
	}

	let Envelope { message, data, .. } = response.json::<Envelope<T>>()?;

	Ok(Reply { message, data })
}

/// Unwraps an envelope that carries nothing beyond its message.
pub(crate) fn unwrap_ack(response: &ApiResponse) -> Result<Option<String>> {
	unwrap_envelope::<Bare>(response).map(|reply| reply.message)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Debug, Deserialize)]
	struct Doctors {
		doctors: Vec<Doctor>,
	}

	#[test]
	fn envelope_failure_wins_over_missing_payload() {
		let response = ApiResponse::json_body(
			200,
			&serde_json::json!({ "success": false, "message": "Slot not available" }),
		);
		let err = unwrap_envelope::<Doctors>(&response).expect_err("Failed envelope should error.");

		assert!(
			matches!(err, Error::Unsuccessful { ref message } if message == "Slot not available")
		);
	}

	#[test]
	fn envelope_payload_is_flattened() {
		let response = ApiResponse::json_body(
			200,
			&serde_json::json!({
				"success": true,
				"doctors": [{ "_id": "d1", "name": "Dr. Emily Larson", "fees": 60 }]
			}),
		);
		let reply = unwrap_envelope::<Doctors>(&response).expect("Envelope should decode.");

		assert_eq!(reply.message, None);
		assert_eq!(reply.data.doctors.len(), 1);
		assert_eq!(reply.data.doctors[0].id, "d1");
	}

	#[test]
	fn ack_keeps_message_and_rejects_non_envelope_bodies() {
		let response = ApiResponse::json_body(
			200,
			&serde_json::json!({ "success": true, "message": "Appointment Cancelled" }),
		);

		assert_eq!(
			unwrap_ack(&response).expect("Ack should decode.").as_deref(),
			Some("Appointment Cancelled")
		);
		assert!(matches!(
			unwrap_ack(&ApiResponse::new(200, "<html></html>")),
			Err(Error::Decode { status: 200, .. })
		));
	}
}
