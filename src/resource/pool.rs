// self
use crate::_prelude::*;

/// Errors raised while constructing or validating user pools.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum UserPoolError {
	/// A pool name is required.
	#[error("Missing pool name.")]
	MissingPoolName,
	/// At least one sign-in alias must be enabled.
	#[error("User pool must enable at least one sign-in alias.")]
	NoSignInAlias,
	/// Auto-verification only applies to attributes users can sign in with.
	#[error("Auto-verification of {attribute} requires the matching sign-in alias.")]
	AutoVerifyWithoutAlias {
		/// Attribute requested for auto-verification.
		attribute: &'static str,
	},
}

/// Attributes end users may sign in with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInAliases {
	/// Sign in with a verified email address.
	pub email: bool,
	/// Sign in with a verified phone number.
	pub phone: bool,
	/// Sign in with a chosen username.
	pub username: bool,
}
impl SignInAliases {
	/// Returns true when no alias is enabled.
	pub fn is_empty(self) -> bool {
		!self.email && !self.phone && !self.username
	}
}

/// Attributes the directory verifies automatically on sign-up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoVerify {
	/// Send and check an email verification code automatically.
	pub email: bool,
	/// Send and check an SMS verification code automatically.
	pub phone: bool,
}

/// A directory of end-user identities.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPool {
	/// Human-readable pool name.
	pub pool_name: String,
	/// Whether end users may register themselves.
	pub self_sign_up_enabled: bool,
	/// Enabled sign-in aliases.
	pub sign_in_aliases: SignInAliases,
	/// Automatic verification rules.
	pub auto_verify: AutoVerify,
}
impl UserPool {
	/// Creates a new builder.
	pub fn builder() -> UserPoolBuilder {
		UserPoolBuilder::default()
	}
}

/// Builder for [`UserPool`] values.
#[derive(Debug, Default)]
pub struct UserPoolBuilder {
	/// Pool name being assembled (required).
	pub pool_name: Option<String>,
	/// Self-sign-up flag (defaults to disabled).
	pub self_sign_up_enabled: bool,
	/// Sign-in aliases enabled so far.
	pub sign_in_aliases: SignInAliases,
	/// Auto-verification rules enabled so far.
	pub auto_verify: AutoVerify,
}
impl UserPoolBuilder {
	/// Sets the pool name.
	pub fn pool_name(mut self, name: impl Into<String>) -> Self {
		self.pool_name = Some(name.into());

		self
	}

	/// Enables or disables self sign-up.
	pub fn self_sign_up_enabled(mut self, enabled: bool) -> Self {
		self.self_sign_up_enabled = enabled;

		self
	}

	/// Overrides the sign-in alias set.
	pub fn sign_in_aliases(mut self, aliases: SignInAliases) -> Self {
		self.sign_in_aliases = aliases;

		self
	}

	/// Overrides the auto-verification rules.
	pub fn auto_verify(mut self, auto_verify: AutoVerify) -> Self {
		self.auto_verify = auto_verify;

		self
	}

	/// Consumes the builder and validates the resulting pool.
	pub fn build(self) -> Result<UserPool, UserPoolError> {
		let pool_name =
			self.pool_name.filter(|name| !name.is_empty()).ok_or(UserPoolError::MissingPoolName)?;
		let pool = UserPool {
			pool_name,
			self_sign_up_enabled: self.self_sign_up_enabled,
			sign_in_aliases: self.sign_in_aliases,
			auto_verify: self.auto_verify,
		};

		pool.validate()?;

		Ok(pool)
	}
}

impl UserPool {
	/// Validates invariants for the pool declaration.
	fn validate(&self) -> Result<(), UserPoolError> {
		if self.sign_in_aliases.is_empty() {
			return Err(UserPoolError::NoSignInAlias);
		}
		if self.auto_verify.email && !self.sign_in_aliases.email {
			return Err(UserPoolError::AutoVerifyWithoutAlias { attribute: "email" });
		}
		if self.auto_verify.phone && !self.sign_in_aliases.phone {
			return Err(UserPoolError::AutoVerifyWithoutAlias { attribute: "phone" });
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn pools_require_name_and_alias() {
		let err = UserPool::builder()
			.sign_in_aliases(SignInAliases { email: true, ..Default::default() })
			.build()
			.expect_err("Pool without a name must be rejected.");

		assert_eq!(err, UserPoolError::MissingPoolName);

		let err = UserPool::builder()
			.pool_name("dev-userpool")
			.build()
			.expect_err("Pool without sign-in aliases must be rejected.");

		assert_eq!(err, UserPoolError::NoSignInAlias);
	}

	#[test]
	fn auto_verify_requires_matching_alias() {
		let err = UserPool::builder()
			.pool_name("dev-userpool")
			.sign_in_aliases(SignInAliases { username: true, ..Default::default() })
			.auto_verify(AutoVerify { email: true, phone: false })
			.build()
			.expect_err("Auto-verify without the email alias must be rejected.");

		assert_eq!(err, UserPoolError::AutoVerifyWithoutAlias { attribute: "email" });
	}

	#[test]
	fn valid_pool_builds() {
		let pool = UserPool::builder()
			.pool_name("dev-userpool")
			.self_sign_up_enabled(true)
			.sign_in_aliases(SignInAliases { email: true, ..Default::default() })
			.auto_verify(AutoVerify { email: true, phone: false })
			.build()
			.expect("Pool fixture should build successfully.");

		assert_eq!(pool.pool_name, "dev-userpool");
		assert!(pool.self_sign_up_enabled);
		assert!(pool.sign_in_aliases.email);
	}
}
