// self
use crate::{
	_prelude::*,
	scope::{ResourceScope, ScopeValidationError},
};

const IDENTIFIER_MAX_LEN: usize = 256;

/// Errors raised while constructing or validating resource servers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ResourceServerError {
	/// An identifier is required.
	#[error("Missing resource-server identifier.")]
	MissingIdentifier,
	/// The identifier contained whitespace or exceeded the length cap.
	#[error("Invalid resource-server identifier: {identifier}.")]
	InvalidIdentifier {
		/// The offending identifier.
		identifier: String,
	},
	/// A display name is required.
	#[error("Missing resource-server name.")]
	MissingName,
	/// At least one scope must be declared.
	#[error("Resource server must declare at least one scope.")]
	NoScopes,
	/// Scope names must be unique within a server.
	#[error("Duplicate scope name: {name}.")]
	DuplicateScope {
		/// The contested scope name.
		name: String,
	},
	/// A declared scope failed validation.
	#[error(transparent)]
	Scope(#[from] ScopeValidationError),
}

/// A named grouping of authorization scopes.
///
/// Custom scopes granted to clients are qualified by the server's `identifier`
/// (`{identifier}/{scope_name}`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceServer {
	/// Stable identifier prepended to scope names when granted.
	pub identifier: String,
	/// Human-readable server name.
	pub name: String,
	/// Declared scopes.
	pub scopes: Vec<ResourceScope>,
}
impl ResourceServer {
	/// Creates a new builder seeded with the provided identifier.
	pub fn builder(identifier: impl Into<String>) -> ResourceServerBuilder {
		ResourceServerBuilder { identifier: identifier.into(), name: None, scopes: Vec::new() }
	}

	/// Returns true if the server declares a scope with the provided name.
	pub fn declares_scope(&self, name: &str) -> bool {
		self.scopes.iter().any(|scope| scope.name == name)
	}
}

/// Builder for [`ResourceServer`] values.
#[derive(Debug)]
pub struct ResourceServerBuilder {
	/// Identifier for the server being constructed.
	pub identifier: String,
	/// Optional display name (required at build time).
	pub name: Option<String>,
	/// Scopes declared so far.
	pub scopes: Vec<ResourceScope>,
}
impl ResourceServerBuilder {
	/// Sets the display name.
	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());

		self
	}

	/// Declares a single scope.
	pub fn scope(mut self, scope: ResourceScope) -> Self {
		self.scopes.push(scope);

		self
	}

	/// Declares multiple scopes.
	pub fn scopes<I>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = ResourceScope>,
	{
		self.scopes.extend(scopes);

		self
	}

	/// Consumes the builder and validates the resulting server.
	pub fn build(self) -> Result<ResourceServer, ResourceServerError> {
		if self.identifier.is_empty() {
			return Err(ResourceServerError::MissingIdentifier);
		}
		if self.identifier.chars().any(char::is_whitespace)
			|| self.identifier.len() > IDENTIFIER_MAX_LEN
		{
			return Err(ResourceServerError::InvalidIdentifier { identifier: self.identifier });
		}

		let name = self.name.filter(|n| !n.is_empty()).ok_or(ResourceServerError::MissingName)?;

		if self.scopes.is_empty() {
			return Err(ResourceServerError::NoScopes);
		}

		let mut seen = BTreeSet::new();

		for scope in &self.scopes {
			if !seen.insert(scope.name.as_str()) {
				return Err(ResourceServerError::DuplicateScope { name: scope.name.clone() });
			}
		}

		Ok(ResourceServer { identifier: self.identifier, name, scopes: self.scopes })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn scope(name: &str) -> ResourceScope {
		ResourceScope::new(name, "test scope").expect("Scope fixture should be valid.")
	}

	#[test]
	fn servers_require_identifier_name_and_scopes() {
		assert_eq!(
			ResourceServer::builder("").name("api").scope(scope("orders.read")).build(),
			Err(ResourceServerError::MissingIdentifier)
		);
		assert_eq!(
			ResourceServer::builder("dev.example.com").scope(scope("orders.read")).build(),
			Err(ResourceServerError::MissingName)
		);
		assert_eq!(
			ResourceServer::builder("dev.example.com").name("api").build(),
			Err(ResourceServerError::NoScopes)
		);
	}

	#[test]
	fn duplicate_scope_names_are_rejected() {
		let err = ResourceServer::builder("dev.example.com")
			.name("api")
			.scopes([scope("orders.read"), scope("orders.read")])
			.build()
			.expect_err("Duplicate scope names must be rejected.");

		assert_eq!(err, ResourceServerError::DuplicateScope { name: "orders.read".into() });
	}

	#[test]
	fn identifiers_reject_whitespace() {
		let err = ResourceServer::builder("dev example")
			.name("api")
			.scope(scope("orders.read"))
			.build()
			.expect_err("Identifier with whitespace must be rejected.");

		assert!(matches!(err, ResourceServerError::InvalidIdentifier { .. }));
	}

	#[test]
	fn declares_scope_matches_by_name() {
		let server = ResourceServer::builder("dev.example.com")
			.name("api")
			.scope(scope("orders.read"))
			.build()
			.expect("Server fixture should build successfully.");

		assert!(server.declares_scope("orders.read"));
		assert!(!server.declares_scope("orders.write"));
	}
}
