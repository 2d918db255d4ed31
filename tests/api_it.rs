mod common;

// crates.io
#[cfg(feature = "reqwest")] use httpmock::prelude::*;
// self
use booking_client::{
	api::{
		Credentials, LoginOutcome, PasswordReset, ProfileImage, ProfileUpdate,
		REGISTRATION_OTP_MESSAGE, RazorpayPayment, RegisterOutcome, Registration, SlotDate,
		UserProfile,
	},
	csrf::CacheState,
	error::Error,
	request::{Method, PartValue, RequestBody},
};
use common::*;

#[tokio::test]
async fn register_distinguishes_otp_confirmation() {
	let (client, transport, session) = scripted_client();

	session_logged_out(&session);
	transport.token("t1").respond(
		200,
		serde_json::json!({ "success": true, "message": REGISTRATION_OTP_MESSAGE }),
	);

	let outcome = client
		.register(&Registration::new("Ada", "ada@example.com", "s3cret-Pass"))
		.await
		.expect("Registration should succeed.");

	assert!(matches!(outcome, RegisterOutcome::OtpSent { .. }));
	assert!(!session.is_logged_in());

	transport.respond(200, serde_json::json!({ "success": true }));

	let outcome = client
		.register(&Registration::new("Bob", "bob@example.com", "s3cret-Pass"))
		.await
		.expect("Registration should succeed.");

	assert_eq!(outcome, RegisterOutcome::Registered { message: None });
	assert!(session.is_logged_in());
}

#[tokio::test]
async fn login_follows_the_second_factor_flow() {
	let (client, transport, session) = scripted_client();

	session_logged_out(&session);
	transport
		.token("t1")
		.respond(
			200,
			serde_json::json!({ "success": true, "requiresOtp": true, "message": "OTP sent" }),
		)
		.respond(200, serde_json::json!({ "success": true, "message": "Login successful!" }));

	let outcome = client
		.login(&Credentials::new("ada@example.com", "s3cret-Pass").with_captcha("captcha"))
		.await
		.expect("Login should succeed.");

	assert_eq!(outcome, LoginOutcome::OtpRequired { message: Some("OTP sent".into()) });
	assert!(!session.is_logged_in());

	let message = client
		.verify_login_otp("ada@example.com", "123456")
		.await
		.expect("OTP verification should succeed.");

	assert_eq!(message.as_deref(), Some("Login successful!"));
	assert!(session.is_logged_in());

	let calls = transport.api_calls();

	assert_eq!(calls[0].path, "/api/user/login");
	assert_eq!(
		calls[0].body,
		Some(RequestBody::Json(serde_json::json!({
			"email": "ada@example.com",
			"password": "s3cret-Pass",
			"captchaToken": "captcha"
		})))
	);
	assert_eq!(calls[1].path, "/api/user/verify-login-otp");
}

#[tokio::test]
async fn unsuccessful_envelope_surfaces_its_message() {
	let (client, transport, session) = scripted_client();

	session_logged_out(&session);
	transport
		.token("t1")
		.respond(200, serde_json::json!({ "success": false, "message": "Invalid credentials" }));

	let err = client
		.login(&Credentials::new("ada@example.com", "wrong"))
		.await
		.expect_err("Failed login should surface.");

	assert!(matches!(err, Error::Unsuccessful { ref message } if message == "Invalid credentials"));
	assert!(!session.is_logged_in());
}

#[tokio::test]
async fn otp_and_reset_endpoints_post_expected_bodies() {
	let (client, transport, _session) = scripted_client();

	transport.token("t1").ok().ok().ok().ok().ok();

	client.verify_registration_otp("ada@example.com", "654321").await.expect("Verify should pass.");
	client.resend_registration_otp("ada@example.com").await.expect("Resend should pass.");
	client.resend_login_otp("ada@example.com").await.expect("Resend should pass.");
	client.verify_reset_token("reset-1").await.expect("Token check should pass.");
	client
		.reset_password(&PasswordReset::new("reset-1", "n3w-Passw0rd"))
		.await
		.expect("Reset should pass.");

	let calls = transport.api_calls();

	assert_eq!(
		calls.iter().map(|call| call.path.as_str()).collect::<Vec<_>>(),
		vec![
			"/api/user/verify-otp",
			"/api/user/resend-otp",
			"/api/user/resend-login-otp",
			"/api/user/verify-reset-token",
			"/api/user/reset-password",
		]
	);
	assert_eq!(
		calls[0].body,
		Some(RequestBody::Json(serde_json::json!({ "email": "ada@example.com", "otp": "654321" })))
	);
	assert_eq!(
		calls[4].body,
		Some(RequestBody::Json(serde_json::json!({
			"token": "reset-1",
			"password": "n3w-Passw0rd",
			"confirmPassword": "n3w-Passw0rd"
		})))
	);
}

#[tokio::test]
async fn logout_resets_local_state_even_when_rejected() {
	let (client, transport, session) = scripted_client();

	transport.token("t1").respond(500, serde_json::json!({ "message": "Logout failed" }));

	let err = client.logout().await.expect_err("Rejected logout should surface.");

	assert_eq!(err.status(), Some(500));
	assert!(!session.is_logged_in());
	assert_eq!(client.csrf().state(), CacheState::Absent);
	assert!(session.redirects().is_empty());
}

#[tokio::test]
async fn profile_update_is_sent_as_multipart() {
	let (client, transport, _session) = scripted_client();

	transport.token("t1").ok();

	let profile = UserProfile { id: "u1".into(), name: "Ada".into(), ..Default::default() };
	let update = ProfileUpdate::from_profile(&profile).with_image(ProfileImage {
		file_name: "avatar.png".into(),
		mime: Some("image/png".into()),
		bytes: vec![137, 80, 78, 71],
	});

	client.update_profile(&update).await.expect("Update should succeed.");

	let call = &transport.api_calls()[0];

	assert_eq!(call.method, Method::Post);
	assert_eq!(call.csrf.as_deref(), Some("t1"));

	let Some(RequestBody::Multipart(form)) = &call.body else {
		panic!("Profile update should be multipart, got {:?}.", call.body);
	};

	assert_eq!(form.text_value("userId"), Some("u1"));
	assert_eq!(form.text_value("name"), Some("Ada"));
	assert!(form.parts.iter().any(|part| matches!(
		&part.value,
		PartValue::File { file_name, .. } if file_name == "avatar.png"
	)));
}

#[tokio::test]
async fn appointments_are_listed_newest_first_and_managed() {
	let (client, transport, _session) = scripted_client();

	transport
		.respond(
			200,
			serde_json::json!({
				"success": true,
				"appointments": [
					appointment_json("a1", "1_3_2025", false),
					appointment_json("a2", "12_3_2025", true),
				]
			}),
		)
		.token("t1")
		.respond(200, serde_json::json!({ "success": true, "message": "Appointment Booked" }))
		.respond(200, serde_json::json!({ "success": true, "message": "Appointment Cancelled" }));

	let appointments = client.my_appointments().await.expect("Listing should succeed.");

	assert_eq!(appointments.iter().map(|a| a.id.as_str()).collect::<Vec<_>>(), vec!["a2", "a1"]);
	assert_eq!(appointments[0].slot_date.to_string(), "12 Mar 2025");
	assert!(appointments[0].is_paid());
	assert!(appointments[1].is_payable());

	let slot = "20_3_2025".parse::<SlotDate>().expect("Slot date should parse.");
	let booked =
		client.book_appointment("d1", slot, "10:30 AM").await.expect("Booking should succeed.");
	let cancelled = client.cancel_appointment("a1").await.expect("Cancel should succeed.");

	assert_eq!(booked.as_deref(), Some("Appointment Booked"));
	assert_eq!(cancelled.as_deref(), Some("Appointment Cancelled"));

	let calls = transport.api_calls();

	assert_eq!(
		calls[1].body,
		Some(RequestBody::Json(serde_json::json!({
			"docId": "d1",
			"slotDate": "20_3_2025",
			"slotTime": "10:30 AM"
		})))
	);
	assert_eq!(calls[2].body, Some(RequestBody::Json(serde_json::json!({ "appointmentId": "a1" }))));
}

#[tokio::test]
async fn razorpay_confirmation_is_forwarded() {
	let (client, transport, _session) = scripted_client();

	transport
		.token("t1")
		.respond(200, serde_json::json!({ "success": true, "message": "Payment Successful" }));

	let payment = RazorpayPayment {
		razorpay_payment_id: "pay_1".into(),
		razorpay_order_id: "order_1".into(),
		razorpay_signature: "sig".into(),
	};
	let message = client.verify_razorpay(&payment).await.expect("Verification should pass.");

	assert_eq!(message.as_deref(), Some("Payment Successful"));
	assert_eq!(transport.api_calls()[0].path, "/api/user/verifyRazorpay");
}

#[cfg(feature = "reqwest")]
#[tokio::test]
async fn doctors_are_listed_over_http() {
	let server = MockServer::start_async().await;
	let list = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/doctor/list");
			then.status(200).header("content-type", "application/json").json_body(
				serde_json::json!({
					"success": true,
					"doctors": [{
						"_id": "d1",
						"name": "Dr. Richard James",
						"image": "https://cdn.test/d1.png",
						"speciality": "General physician",
						"degree": "MBBS",
						"experience": "4 Years",
						"about": "Focused on preventive care.",
						"fees": 50,
						"available": true,
						"address": { "line1": "17th Cross", "line2": "Richmond" }
					}]
				}),
			);
		})
		.await;
	let (client, _session) = reqwest_client(&server.base_url());
	let doctors = client.list_doctors().await.expect("Doctor list should load.");

	assert_eq!(doctors.len(), 1);
	assert_eq!(doctors[0].id, "d1");
	assert_eq!(doctors[0].address.line2, "Richmond");
	assert!(doctors[0].available);

	list.assert_calls_async(1).await;
}

#[cfg(feature = "reqwest")]
#[tokio::test]
async fn session_cookie_is_replayed_after_login() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/csrf-token");
			then.status(200).header("content-type", "application/json").body("{\"token\":\"abc\"}");
		})
		.await;
	let login = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/user/login").header("x-csrf-token", "abc");
			then.status(200)
				.header("content-type", "application/json")
				.header("set-cookie", "token=s1; Path=/; HttpOnly")
				.body("{\"success\":true}");
		})
		.await;
	let profile = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/user/profile").header("cookie", "token=s1");
			then.status(200).header("content-type", "application/json").body(
				"{\"success\":true,\"userData\":{\"_id\":\"u1\",\"name\":\"Ada\",\"email\":\"ada@example.com\"}}",
			);
		})
		.await;
	let (client, session) = reqwest_client(&server.base_url());

	session_logged_out(&session);

	let outcome = client
		.login(&Credentials::new("ada@example.com", "s3cret-Pass"))
		.await
		.expect("Login should succeed.");

	assert_eq!(outcome, LoginOutcome::LoggedIn { message: None });
	assert!(session.is_logged_in());

	let user = client.load_profile().await.expect("Profile should load with the session cookie.");

	assert_eq!(user.id, "u1");
	assert_eq!(user.email, "ada@example.com");

	token.assert_calls_async(1).await;
	login.assert_calls_async(1).await;
	profile.assert_calls_async(1).await;
}

#[cfg(feature = "reqwest")]
#[tokio::test]
async fn stripe_checkout_returns_the_hosted_page() {
	let server = MockServer::start_async().await;
	let _token = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/csrf-token");
			then.status(200).header("content-type", "application/json").body("{\"token\":\"abc\"}");
		})
		.await;
	let checkout = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/user/payment-stripe")
				.header("x-csrf-token", "abc")
				.json_body(serde_json::json!({ "appointmentId": "a1" }));
			then.status(200).header("content-type", "application/json").json_body(
				serde_json::json!({
					"success": true,
					"session_url": "https://checkout.stripe.test/c/pay/cs_1"
				}),
			);
		})
		.await;
	let (client, _session) = reqwest_client(&server.base_url());
	let url = client.stripe_checkout("a1").await.expect("Checkout should start.");

	assert_eq!(url.as_str(), "https://checkout.stripe.test/c/pay/cs_1");

	checkout.assert_calls_async(1).await;
}

fn session_logged_out(session: &booking_client::session::MemorySession) {
	use booking_client::session::SessionHooks;

	session.set_logged_in(false);
}

fn appointment_json(id: &str, slot_date: &str, payment: bool) -> serde_json::Value {
	serde_json::json!({
		"_id": id,
		"docId": "d1",
		"slotDate": slot_date,
		"slotTime": "10:30 AM",
		"docData": { "_id": "d1", "name": "Dr. Richard James" },
		"amount": 50,
		"cancelled": false,
		"payment": payment,
		"isCompleted": false
	})
}
