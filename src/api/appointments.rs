//! Booking, listing, and cancelling appointments.

// self
use crate::{
	_prelude::*,
	api::{self, Appointment, SlotDate},
	http::ApiTransport,
	pipeline::ApiClient,
};

const MY_APPOINTMENTS: &str = "/api/user/my-appointments";
const BOOK_APPOINTMENT: &str = "/api/user/book-appointment";
const CANCEL_APPOINTMENT: &str = "/api/user/cancel-appointment";

#[derive(Debug, Deserialize)]
struct AppointmentList {
	appointments: Vec<Appointment>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BookingBody<'a> {
	doc_id: &'a str,
	slot_date: SlotDate,
	slot_time: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AppointmentRef<'a> {
	appointment_id: &'a str,
}

impl<T> ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Lists the patient's appointments, newest booking first.
	pub async fn my_appointments(&self) -> Result<Vec<Appointment>> {
		let response = self.get(MY_APPOINTMENTS).await?;
		let mut appointments =
			api::unwrap_envelope::<AppointmentList>(&response)?.data.appointments;

		// The backend lists in booking order.
		appointments.reverse();

		Ok(appointments)
	}

	/// Books `slot_time` on `slot_date` with the given doctor.
	pub async fn book_appointment(
		&self,
		doc_id: &str,
		slot_date: SlotDate,
		slot_time: &str,
	) -> Result<Option<String>> {
		let response =
			self.post(BOOK_APPOINTMENT, &BookingBody { doc_id, slot_date, slot_time }).await?;

		api::unwrap_ack(&response)
	}

	/// Cancels an open appointment.
	pub async fn cancel_appointment(&self, appointment_id: &str) -> Result<Option<String>> {
		let response = self.post(CANCEL_APPOINTMENT, &AppointmentRef { appointment_id }).await?;

		api::unwrap_ack(&response)
	}
}

pub(crate) fn appointment_ref(appointment_id: &str) -> impl '_ + Serialize {
	AppointmentRef { appointment_id }
}
