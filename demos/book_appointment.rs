//! Demonstrates booking an appointment through the reqwest-backed client against a mock backend:
//! the anti-forgery token is fetched lazily on the first state-changing call and reused after.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use booking_client::{
	api::SlotDate,
	config::ClientConfig,
	pipeline::ReqwestApiClient,
	session::MemorySession,
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/csrf-token");
			then.status(200).header("content-type", "application/json").body("{\"token\":\"demo\"}");
		})
		.await;
	let _doctors = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/doctor/list");
			then.status(200).header("content-type", "application/json").body(
				"{\"success\":true,\"doctors\":[{\"_id\":\"d1\",\"name\":\"Dr. Richard James\",\"speciality\":\"General physician\",\"fees\":50,\"available\":true}]}",
			);
		})
		.await;
	let booking_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/user/book-appointment").header("x-csrf-token", "demo");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"success\":true,\"message\":\"Appointment Booked\"}");
		})
		.await;
	let config = ClientConfig::builder(Url::parse(&server.base_url())?).build()?;
	let session = MemorySession::logged_in();
	let client = ReqwestApiClient::new(config, Arc::new(session.clone()))?;
	let doctors = client.list_doctors().await?;
	let doctor = doctors.first().ok_or_else(|| color_eyre::eyre::eyre!("No doctors listed."))?;
	let slot = "12_3_2025".parse::<SlotDate>()?;

	for time in ["10:00 AM", "10:30 AM"] {
		let message = client.book_appointment(&doctor.id, slot, time).await?;

		println!(
			"{} on {slot} at {time}: {}.",
			doctor.name,
			message.as_deref().unwrap_or("booked")
		);
	}

	token_mock.assert_calls_async(1).await;
	booking_mock.assert_calls_async(2).await;

	Ok(())
}
