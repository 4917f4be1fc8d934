//! Typed, synthesizable declaration of an OAuth2/OIDC user-pool stack: declare a user pool,
//! resource server, app client, and hosted domain as one validated unit and hand the synthesized
//! template to a provisioning engine.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod engine;
pub mod error;
pub mod gateway;
pub mod naming;
pub mod obs;
pub mod resource;
pub mod scope;
pub mod stack;
pub mod template;

mod _prelude {
	pub use std::{
		collections::{BTreeSet, HashMap},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use url;
#[cfg(test)] use {color_eyre as _, tokio as _};
