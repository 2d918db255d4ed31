//! Wire models returned by the booking backend.

// std
use std::str::FromStr;
// crates.io
use serde::{Deserializer, Serializer, de::Error as _};
use time::{Date, Month, format_description::BorrowedFormatItem, macros::format_description};
// self
use crate::_prelude::*;

const SLOT_DISPLAY: &[BorrowedFormatItem<'static>] =
	format_description!("[day padding:none] [month repr:short] [year]");

/// Two-line postal address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
	/// First line.
	#[serde(default)]
	pub line1: String,
	/// Second line.
	#[serde(default)]
	pub line2: String,
}

/// Doctor listed by the backend.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Doctor {
	/// Backend identifier.
	#[serde(rename = "_id")]
	pub id: String,
	/// Display name.
	pub name: String,
	/// Portrait URL.
	pub image: String,
	/// Medical speciality.
	pub speciality: String,
	/// Degree.
	pub degree: String,
	/// Experience, as free text (e.g. `4 Years`).
	pub experience: String,
	/// Biography.
	pub about: String,
	/// Consultation fee.
	pub fees: f64,
	/// Whether the doctor accepts bookings.
	pub available: bool,
	/// Practice address.
	pub address: Address,
}

/// Profile of the logged-in patient.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserProfile {
	/// Backend identifier.
	#[serde(rename = "_id")]
	pub id: String,
	/// Display name.
	pub name: String,
	/// Account e-mail.
	pub email: String,
	/// Avatar URL.
	pub image: String,
	/// Phone number.
	pub phone: String,
	/// Home address.
	pub address: Address,
	/// Gender, as entered by the patient.
	pub gender: String,
	/// Date of birth, as entered by the patient.
	pub dob: String,
}

/// Appointment owned by the logged-in patient.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
	/// Backend identifier.
	#[serde(rename = "_id")]
	pub id: String,
	/// Booked doctor's identifier.
	pub doc_id: String,
	/// Booked day.
	pub slot_date: SlotDate,
	/// Booked time, as displayed by the backend (e.g. `10:30 AM`).
	pub slot_time: String,
	/// Snapshot of the doctor at booking time.
	#[serde(default)]
	pub doc_data: Doctor,
	/// Amount due.
	#[serde(default)]
	pub amount: f64,
	/// Whether the appointment was cancelled.
	#[serde(default)]
	pub cancelled: bool,
	/// Whether the appointment was paid online.
	#[serde(default)]
	pub payment: bool,
	/// Whether the consultation took place.
	#[serde(default)]
	pub is_completed: bool,
}
impl Appointment {
	/// Open and unpaid, so an online payment can be started.
	pub fn is_payable(&self) -> bool {
		!self.cancelled && !self.payment && !self.is_completed
	}

	/// Still open, so the patient may cancel it.
	pub fn is_cancellable(&self) -> bool {
		!self.cancelled && !self.is_completed
	}

	/// Open and already paid.
	pub fn is_paid(&self) -> bool {
		!self.cancelled && self.payment && !self.is_completed
	}
}

/// Slot date failed to parse.
#[derive(Debug, ThisError)]
#[error("Slot date `{raw}` is not a valid day_month_year date.")]
pub struct SlotDateError {
	/// Offending input.
	pub raw: String,
}

/// Calendar day of a booking slot.
///
/// The backend encodes it as `day_month_year` with a 1-based month and no padding
/// (`12_3_2025`). [`Display`] renders it for people (`12 Mar 2025`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotDate(Date);
impl SlotDate {
	/// Wraps a calendar date.
	pub const fn new(date: Date) -> Self {
		Self(date)
	}

	/// Builds a slot date from its parts.
	pub fn from_parts(day: u8, month: u8, year: i32) -> Result<Self, SlotDateError> {
		let invalid = || SlotDateError { raw: format!("{day}_{month}_{year}") };
		let month = Month::try_from(month).map_err(|_| invalid())?;

		Date::from_calendar_date(year, month, day).map(Self).map_err(|_| invalid())
	}

	/// Underlying calendar date.
	pub const fn date(self) -> Date {
		self.0
	}

	/// Encodes the date the way the backend stores it.
	pub fn to_wire(self) -> String {
		format!("{}_{}_{}", self.0.day(), u8::from(self.0.month()), self.0.year())
	}
}
impl From<Date> for SlotDate {
	fn from(date: Date) -> Self {
		Self(date)
	}
}
impl FromStr for SlotDate {
	type Err = SlotDateError;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		let invalid = || SlotDateError { raw: raw.to_owned() };
		let mut parts = raw.trim().split('_');
		let (Some(day), Some(month), Some(year), None) =
			(parts.next(), parts.next(), parts.next(), parts.next())
		else {
			return Err(invalid());
		};
		let day = day.parse::<u8>().map_err(|_| invalid())?;
		let month = month.parse::<u8>().map_err(|_| invalid())?;
		let year = year.parse::<i32>().map_err(|_| invalid())?;

		Self::from_parts(day, month, year).map_err(|_| invalid())
	}
}
impl Display for SlotDate {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let rendered = self.0.format(SLOT_DISPLAY).map_err(|_| std::fmt::Error)?;

		f.write_str(&rendered)
	}
}
impl Serialize for SlotDate {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.to_wire())
	}
}
impl<'de> Deserialize<'de> for SlotDate {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;

		raw.parse().map_err(D::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::date;
	// self
	use super::*;

	fn appointment(cancelled: bool, payment: bool, is_completed: bool) -> Appointment {
		Appointment {
			id: "a1".into(),
			doc_id: "d1".into(),
			slot_date: SlotDate::new(date!(2025 - 03 - 12)),
			slot_time: "10:30 AM".into(),
			doc_data: Doctor::default(),
			amount: 50.,
			cancelled,
			payment,
			is_completed,
		}
	}

	#[test]
	fn slot_date_parses_backend_encoding() {
		let slot = "12_3_2025".parse::<SlotDate>().expect("Backend slot date should parse.");

		assert_eq!(slot.date(), date!(2025 - 03 - 12));
		assert_eq!(slot.to_string(), "12 Mar 2025");
		assert_eq!(slot.to_wire(), "12_3_2025");
	}

	#[test]
	fn slot_date_rejects_malformed_input() {
		for raw in ["", "12-3-2025", "12_3", "12_3_2025_1", "31_2_2025", "1_13_2025", "x_1_2025"] {
			assert!(raw.parse::<SlotDate>().is_err(), "{raw:?} should be rejected.");
		}
	}

	#[test]
	fn appointment_decodes_backend_shape() {
		let appointment: Appointment = serde_json::from_value(serde_json::json!({
			"_id": "a1",
			"userId": "u1",
			"docId": "d1",
			"slotDate": "5_11_2025",
			"slotTime": "09:00 AM",
			"docData": { "_id": "d1", "name": "Dr. Richard James", "speciality": "General physician" },
			"amount": 50,
			"cancelled": false,
			"payment": true,
			"isCompleted": false
		}))
		.expect("Appointment should decode.");

		assert_eq!(appointment.slot_date.to_string(), "5 Nov 2025");
		assert_eq!(appointment.doc_data.name, "Dr. Richard James");
		assert!(appointment.is_paid());
		assert!(!appointment.is_payable());
		assert!(appointment.is_cancellable());
	}

	#[test]
	fn appointment_status_predicates() {
		let open = appointment(false, false, false);

		assert!(open.is_payable() && open.is_cancellable() && !open.is_paid());

		let cancelled = appointment(true, false, false);

		assert!(!cancelled.is_payable() && !cancelled.is_cancellable() && !cancelled.is_paid());

		let completed = appointment(false, true, true);

		assert!(!completed.is_payable() && !completed.is_cancellable() && !completed.is_paid());
	}
}
