//! Synthesized declaration tree handed to provisioning engines.
//!
//! A [`Template`] is the passive, serializable output of [`Stack::synth`](crate::stack::Stack).
//! Resources appear in declaration order and carry explicit dependency edges so an engine (or
//! [`Template::validate`]) can check the reference graph without understanding property payloads.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use serde_json::Value;
use sha2::{Digest, Sha256};
// self
use crate::{_prelude::*, naming::LogicalId};

/// Errors raised while validating a template's reference graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum TemplateError {
	/// Two resources were declared under the same logical id.
	#[error("Duplicate logical id: {id}.")]
	DuplicateLogicalId {
		/// The contested logical id.
		id: LogicalId,
	},
	/// A declaration references a logical id that does not exist in the template.
	#[error("{referrer} references unknown resource {target}.")]
	UnknownReference {
		/// Logical id (or output name) holding the reference.
		referrer: String,
		/// The missing target.
		target: LogicalId,
	},
	/// A declaration references a resource declared after it.
	#[error("{referrer} references {target} before it is declared.")]
	ForwardReference {
		/// Logical id holding the reference.
		referrer: String,
		/// The forward-declared target.
		target: LogicalId,
	},
	/// Template serialization failed while computing the fingerprint.
	#[error("Failed to serialize template: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
}

/// Errors raised while resolving template expressions outside an engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ResolveError {
	/// Resource references resolve to physical ids only the engine knows.
	#[error("Reference to {target} can only be resolved by the provisioning engine.")]
	UnresolvedReference {
		/// The referenced logical id.
		target: LogicalId,
	},
}

/// Kinds of resources a user-pool stack can declare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
	/// A directory of end-user identities.
	UserPool,
	/// A named grouping of authorization scopes.
	ResourceServer,
	/// An application permitted to request tokens.
	AppClient,
	/// A hosted sign-in/sign-up URL surface.
	HostedDomain,
}
impl ResourceKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ResourceKind::UserPool => "user_pool",
			ResourceKind::ResourceServer => "resource_server",
			ResourceKind::AppClient => "app_client",
			ResourceKind::HostedDomain => "hosted_domain",
		}
	}
}
impl Display for ResourceKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Template value expression.
///
/// Literals and concatenations are fixed at synth time; the region pseudo-parameter and
/// resource references are placeholders the engine substitutes at provisioning time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
	/// Fixed string value.
	Lit(String),
	/// Region pseudo-parameter resolved by the engine.
	Region,
	/// Physical id of a previously declared resource.
	Ref(LogicalId),
	/// Attribute of a previously declared resource.
	GetAtt {
		/// Logical id of the target resource.
		target: LogicalId,
		/// Attribute name exposed by the target.
		attribute: String,
	},
	/// Concatenation of sub-expressions.
	Concat(Vec<Expr>),
}
impl Expr {
	/// Builds a literal expression.
	pub fn lit(value: impl Into<String>) -> Self {
		Self::Lit(value.into())
	}

	/// Builds a concatenation from any iterator of parts.
	pub fn concat<I>(parts: I) -> Self
	where
		I: IntoIterator<Item = Expr>,
	{
		Self::Concat(parts.into_iter().collect())
	}

	/// Collects every logical id the expression references.
	pub fn referenced_ids(&self, acc: &mut Vec<LogicalId>) {
		match self {
			Expr::Lit(_) | Expr::Region => {},
			Expr::Ref(target) => acc.push(target.clone()),
			Expr::GetAtt { target, .. } => acc.push(target.clone()),
			Expr::Concat(parts) =>
				for part in parts {
					part.referenced_ids(acc);
				},
		}
	}

	/// Resolves the expression against a concrete region.
	///
	/// Only literals, the region pseudo-parameter, and concatenations thereof can be resolved
	/// outside an engine; resource references yield [`ResolveError::UnresolvedReference`].
	pub fn resolve(&self, region: &str) -> Result<String, ResolveError> {
		match self {
			Expr::Lit(value) => Ok(value.clone()),
			Expr::Region => Ok(region.to_owned()),
			Expr::Ref(target) | Expr::GetAtt { target, .. } =>
				Err(ResolveError::UnresolvedReference { target: target.clone() }),
			Expr::Concat(parts) => {
				let mut out = String::new();

				for part in parts {
					out.push_str(&part.resolve(region)?);
				}

				Ok(out)
			},
		}
	}
}
impl From<&str> for Expr {
	fn from(value: &str) -> Self {
		Self::Lit(value.to_owned())
	}
}
impl From<String> for Expr {
	fn from(value: String) -> Self {
		Self::Lit(value)
	}
}

/// A single declared resource within a template.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemplateResource {
	/// Template-local identifier.
	pub logical_id: LogicalId,
	/// Resource kind tag.
	pub kind: ResourceKind,
	/// Kind-specific property payload.
	pub properties: Value,
	/// Logical ids this resource depends on; all must be declared earlier.
	pub depends_on: Vec<LogicalId>,
}

/// A named value surfaced to the operator after provisioning completes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateOutput {
	/// Output name.
	pub name: String,
	/// Output value expression.
	pub value: Expr,
}

/// The full declaration unit submitted to a provisioning engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Template {
	/// Human-readable description of the unit.
	pub description: String,
	/// Declared resources in declaration order.
	pub resources: Vec<TemplateResource>,
	/// Deployment-time outputs.
	pub outputs: Vec<TemplateOutput>,
}
impl Template {
	/// Looks up a resource by logical id.
	pub fn resource(&self, id: &str) -> Option<&TemplateResource> {
		self.resources.iter().find(|resource| resource.logical_id.as_ref() == id)
	}

	/// Looks up an output by name.
	pub fn output(&self, name: &str) -> Option<&TemplateOutput> {
		self.outputs.iter().find(|output| output.name == name)
	}

	/// Validates the reference graph: unique logical ids, dependency edges pointing strictly
	/// at earlier declarations, and output expressions referencing existing resources.
	pub fn validate(&self) -> Result<(), TemplateError> {
		let mut declared: Vec<&LogicalId> = Vec::with_capacity(self.resources.len());

		for resource in &self.resources {
			if declared.contains(&&resource.logical_id) {
				return Err(TemplateError::DuplicateLogicalId {
					id: resource.logical_id.clone(),
				});
			}

			for target in &resource.depends_on {
				if !declared.contains(&target) {
					let referrer = resource.logical_id.to_string();

					return Err(if self.resource(target).is_some() {
						TemplateError::ForwardReference { referrer, target: target.clone() }
					} else {
						TemplateError::UnknownReference { referrer, target: target.clone() }
					});
				}
			}

			declared.push(&resource.logical_id);
		}

		for output in &self.outputs {
			let mut targets = Vec::new();

			output.value.referenced_ids(&mut targets);

			for target in targets {
				if !declared.contains(&&target) {
					return Err(TemplateError::UnknownReference {
						referrer: output.name.clone(),
						target,
					});
				}
			}
		}

		Ok(())
	}

	/// Stable fingerprint of the template.
	///
	/// A base64 (no padding) encoding of the SHA-256 digest of the canonical JSON form.
	/// Engines use it to decide whether a repeat declaration changes anything.
	pub fn fingerprint(&self) -> Result<String, TemplateError> {
		let canonical = serde_json::to_vec(self)
			.map_err(|e| TemplateError::Serialization { message: e.to_string() })?;
		let mut hasher = Sha256::new();

		hasher.update(&canonical);

		let digest = hasher.finalize();

		Ok(STANDARD_NO_PAD.encode(digest))
	}
}
