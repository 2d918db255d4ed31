//! Public doctor directory.

// self
use crate::{
	_prelude::*,
	api::{self, Doctor},
	http::ApiTransport,
	pipeline::ApiClient,
};

/// Path of the doctor directory.
const DOCTOR_LIST: &str = "/api/doctor/list";

#[derive(Debug, Deserialize)]
struct DoctorList {
	doctors: Vec<Doctor>,
}

impl<T> ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Lists every doctor, including unavailable ones.
	pub async fn list_doctors(&self) -> Result<Vec<Doctor>> {
		let response = self.get(DOCTOR_LIST).await?;

		Ok(api::unwrap_envelope::<DoctorList>(&response)?.data.doctors)
	}
}
