//! Crate-level error types shared across naming, resources, stacks, and engines.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical crate error exposed by public APIs.
#[derive(Clone, Debug, ThisError)]
pub enum Error {
	/// Engine-layer failure.
	#[error("{0}")]
	Engine(
		#[from]
		#[source]
		crate::engine::EngineError,
	),
	/// Name validation failure.
	#[error(transparent)]
	Naming(#[from] crate::naming::NamingError),
	/// Scope validation failure.
	#[error(transparent)]
	Scope(#[from] crate::scope::ScopeValidationError),
	/// User pool declaration failure.
	#[error(transparent)]
	UserPool(#[from] crate::resource::UserPoolError),
	/// Resource server declaration failure.
	#[error(transparent)]
	ResourceServer(#[from] crate::resource::ResourceServerError),
	/// App client declaration failure.
	#[error(transparent)]
	AppClient(#[from] crate::resource::AppClientError),
	/// Hosted domain declaration failure.
	#[error(transparent)]
	HostedDomain(#[from] crate::resource::HostedDomainError),
	/// Stack assembly or synthesis failure.
	#[error(transparent)]
	Stack(#[from] crate::stack::StackError),
	/// Template graph or serialization failure.
	#[error(transparent)]
	Template(#[from] crate::template::TemplateError),
	/// Expression resolution failure.
	#[error(transparent)]
	Resolve(#[from] crate::template::ResolveError),
	/// URL parsing failure.
	#[error("Invalid URL.")]
	InvalidUrl(#[from] url::ParseError),
}
