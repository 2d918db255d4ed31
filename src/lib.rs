//! Patient-side API client for the appointment booking backend: a uniform HTTP call surface with
//! transparent anti-forgery (CSRF) token handling, session-expiry reactions, and typed booking
//! endpoints layered on top.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod config;
pub mod csrf;
pub mod error;
pub mod http;
pub mod obs;
pub mod pipeline;
pub mod request;
pub mod session;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
