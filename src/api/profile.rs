//! Patient profile read and update.

// self
use crate::{
	_prelude::*,
	api::{self, Address, UserProfile},
	http::ApiTransport,
	pipeline::ApiClient,
	request::{ApiRequest, MultipartForm},
};

const PROFILE: &str = "/api/user/profile";
const UPDATE_PROFILE: &str = "/api/user/update-profile";

/// Replacement avatar uploaded with a profile update.
#[derive(Clone, PartialEq, Eq)]
pub struct ProfileImage {
	/// File name reported to the backend.
	pub file_name: String,
	/// MIME type, e.g. `image/png`.
	pub mime: Option<String>,
	/// Image content.
	pub bytes: Vec<u8>,
}
impl Debug for ProfileImage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProfileImage")
			.field("file_name", &self.file_name)
			.field("mime", &self.mime)
			.field("len", &self.bytes.len())
			.finish()
	}
}

/// Editable profile fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileUpdate {
	/// Identifier of the profile being edited.
	pub user_id: String,
	/// Display name.
	pub name: String,
	/// Phone number.
	pub phone: String,
	/// Home address.
	pub address: Address,
	/// Gender.
	pub gender: String,
	/// Date of birth.
	pub dob: String,
	/// Optional new avatar.
	pub image: Option<ProfileImage>,
}
impl ProfileUpdate {
	/// Starts an update from the profile as currently loaded.
	pub fn from_profile(profile: &UserProfile) -> Self {
		Self {
			user_id: profile.id.clone(),
			name: profile.name.clone(),
			phone: profile.phone.clone(),
			address: profile.address.clone(),
			gender: profile.gender.clone(),
			dob: profile.dob.clone(),
			image: None,
		}
	}

	/// Attaches a new avatar.
	pub fn with_image(mut self, image: ProfileImage) -> Self {
		self.image = Some(image);

		self
	}

	/// Encodes the update as the multipart form the backend expects. The address travels as a
	/// JSON string field.
	pub fn to_form(&self) -> Result<MultipartForm> {
		let address = serde_json::to_string(&self.address).map_err(Error::Encode)?;
		let form = MultipartForm::default()
			.text("name", &self.name)
			.text("phone", &self.phone)
			.text("address", address)
			.text("gender", &self.gender)
			.text("dob", &self.dob)
			.text("userId", &self.user_id);

		Ok(match &self.image {
			Some(image) =>
				form.file("image", &image.file_name, image.mime.clone(), image.bytes.clone()),
			None => form,
		})
	}
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfilePayload {
	user_data: UserProfile,
}

impl<T> ApiClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Loads the logged-in patient's profile.
	pub async fn load_profile(&self) -> Result<UserProfile> {
		let response = self.get(PROFILE).await?;

		Ok(api::unwrap_envelope::<ProfilePayload>(&response)?.data.user_data)
	}

	/// Saves profile edits.
	pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Option<String>> {
		let request = ApiRequest::post(UPDATE_PROFILE).with_body(update.to_form()?);
		let response = self.send(request).await?;

		api::unwrap_ack(&response)
	}
}
