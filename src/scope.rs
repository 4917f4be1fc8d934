//! OAuth scope modeling shared by resource servers and app clients.

// self
use crate::_prelude::*;

const SCOPE_NAME_MAX_LEN: usize = 256;

/// Errors emitted when validating scopes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ScopeValidationError {
	/// Empty scope entries are not allowed.
	#[error("Scope entries cannot be empty.")]
	Empty,
	/// Scopes cannot contain embedded whitespace characters.
	#[error("Scope contains whitespace: {scope}.")]
	ContainsWhitespace {
		/// The offending scope string.
		scope: String,
	},
	/// Scope names are capped to keep them engine-admissible.
	#[error("Scope exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
	/// Resource-server scopes require a human-readable description.
	#[error("Scope description cannot be empty.")]
	MissingDescription,
}

/// Standard OIDC scopes grantable to any client without a resource server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandardScope {
	/// OIDC `openid` scope.
	OpenId,
	/// OIDC `email` scope.
	Email,
	/// OIDC `profile` scope.
	Profile,
	/// OIDC `phone` scope.
	Phone,
}
impl StandardScope {
	/// Returns the wire identifier for the scope.
	pub fn as_str(self) -> &'static str {
		match self {
			StandardScope::OpenId => "openid",
			StandardScope::Email => "email",
			StandardScope::Profile => "profile",
			StandardScope::Phone => "phone",
		}
	}
}
impl Display for StandardScope {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// A scope declared on a resource server: a name plus a human-readable description.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceScope {
	/// Scope name, unqualified (the resource-server identifier is prepended when granted).
	pub name: String,
	/// Description shown in consent and admin surfaces.
	pub description: String,
}
impl ResourceScope {
	/// Creates a resource scope after validating the name and description.
	pub fn new(
		name: impl Into<String>,
		description: impl Into<String>,
	) -> Result<Self, ScopeValidationError> {
		let name = name.into();
		let description = description.into();

		validate_scope_name(&name)?;

		if description.trim().is_empty() {
			return Err(ScopeValidationError::MissingDescription);
		}

		Ok(Self { name, description })
	}
}

/// A scope an app client may request: either a standard OIDC scope or a custom scope
/// qualified by the identifier of the resource server that declares it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OAuthScope {
	/// Standard OIDC scope.
	Standard(StandardScope),
	/// Custom scope granted through a resource server.
	Custom {
		/// Identifier of the declaring resource server.
		qualifier: String,
		/// Unqualified scope name.
		name: String,
	},
}
impl OAuthScope {
	/// Builds a custom scope reference after validating both parts.
	pub fn custom(
		qualifier: impl Into<String>,
		name: impl Into<String>,
	) -> Result<Self, ScopeValidationError> {
		let qualifier = qualifier.into();
		let name = name.into();

		validate_scope_name(&qualifier)?;
		validate_scope_name(&name)?;

		Ok(Self::Custom { qualifier, name })
	}

	/// Renders the wire form (`openid`, or `{qualifier}/{name}` for custom scopes).
	pub fn render(&self) -> String {
		match self {
			OAuthScope::Standard(scope) => scope.as_str().to_owned(),
			OAuthScope::Custom { qualifier, name } => format!("{qualifier}/{name}"),
		}
	}
}
impl From<StandardScope> for OAuthScope {
	fn from(scope: StandardScope) -> Self {
		Self::Standard(scope)
	}
}
impl Display for OAuthScope {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.render())
	}
}

/// Normalized set of requested scopes.
///
/// Rendered scope strings are deduplicated and sorted so equality and the canonical
/// space-delimited form stay stable regardless of declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ScopeSet(Vec<String>);
impl<'de> Deserialize<'de> for ScopeSet {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		let values = <Vec<String>>::deserialize(deserializer)?;
		let set: BTreeSet<String> = values.into_iter().collect();

		Ok(Self(set.into_iter().collect()))
	}
}
impl ScopeSet {
	/// Creates a normalized scope set from any iterator of scopes.
	pub fn new<I>(scopes: I) -> Self
	where
		I: IntoIterator<Item = OAuthScope>,
	{
		let set: BTreeSet<String> = scopes.into_iter().map(|scope| scope.render()).collect();

		Self(set.into_iter().collect())
	}

	/// Number of distinct scopes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if no scopes are requested.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns true if the normalized set contains the provided rendered scope.
	pub fn contains(&self, scope: &str) -> bool {
		self.0.binary_search_by(|candidate| candidate.as_str().cmp(scope)).is_ok()
	}

	/// Iterator over rendered scopes in normalized order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(|s| s.as_str())
	}

	/// Returns the canonical space-delimited representation.
	pub fn normalized(&self) -> String {
		self.0.join(" ")
	}

	/// Returns the underlying slice of rendered scope strings.
	pub fn as_slice(&self) -> &[String] {
		&self.0
	}
}
impl Display for ScopeSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.normalized())
	}
}
impl FromIterator<OAuthScope> for ScopeSet {
	fn from_iter<I: IntoIterator<Item = OAuthScope>>(iter: I) -> Self {
		Self::new(iter)
	}
}

fn validate_scope_name(view: &str) -> Result<(), ScopeValidationError> {
	if view.is_empty() {
		return Err(ScopeValidationError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(ScopeValidationError::ContainsWhitespace { scope: view.to_owned() });
	}
	if view.len() > SCOPE_NAME_MAX_LEN {
		return Err(ScopeValidationError::TooLong { max: SCOPE_NAME_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn scope_sets_normalize_and_dedup() {
		let lhs = ScopeSet::new([
			OAuthScope::Standard(StandardScope::Profile),
			OAuthScope::Standard(StandardScope::Email),
			OAuthScope::Standard(StandardScope::Email),
		]);
		let rhs = ScopeSet::new([
			OAuthScope::Standard(StandardScope::Email),
			OAuthScope::Standard(StandardScope::Profile),
		]);

		assert_eq!(lhs, rhs);
		assert_eq!(lhs.normalized(), "email profile");
		assert_eq!(lhs.len(), 2);
	}

	#[test]
	fn custom_scopes_render_qualified() {
		let scope = OAuthScope::custom("dev.novagateway.co.nz", "orders.read")
			.expect("Custom scope fixture should be valid.");

		assert_eq!(scope.render(), "dev.novagateway.co.nz/orders.read");
	}

	#[test]
	fn invalid_scope_parts_error() {
		assert!(OAuthScope::custom("", "orders.read").is_err());
		assert!(OAuthScope::custom("api", "has space").is_err());
		assert!(ResourceScope::new("orders.read", "").is_err());
		assert!(ResourceScope::new("orders.read", "   ").is_err());
	}

	#[test]
	fn resource_scopes_carry_descriptions() {
		let scope = ResourceScope::new("orders.read", "Read orders")
			.expect("Resource scope fixture should be valid.");

		assert_eq!(scope.name, "orders.read");
		assert_eq!(scope.description, "Read orders");
	}

	#[test]
	fn contains_uses_normalized_order() {
		let scopes = ScopeSet::new([
			OAuthScope::Standard(StandardScope::OpenId),
			OAuthScope::custom("api.example", "orders.read")
				.expect("Custom scope fixture should be valid."),
		]);

		assert!(scopes.contains("openid"));
		assert!(scopes.contains("api.example/orders.read"));
		assert!(!scopes.contains("email"));
	}
}
