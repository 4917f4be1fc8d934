//! The declaration unit: an ordered, validated registry of resources and outputs.
//!
//! Resources are declared in dependency order; every add returns a typed handle that later
//! declarations use to reference the resource. References are checked twice: when the
//! referencing declaration is added, and again when [`Stack::synth`] re-walks the assembled
//! template's graph.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	naming::{LogicalId, StackName},
	obs::{self, OpOutcome, OpSpan, StackOp},
	resource::{AppClient, HostedDomain, ResourceServer, UserPool},
	scope::{OAuthScope, ScopeValidationError},
	template::{Expr, ResourceKind, Template, TemplateError, TemplateOutput, TemplateResource},
};

/// Errors raised while assembling or synthesizing a stack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StackError {
	/// Two resources were declared under the same logical id.
	#[error("Duplicate logical id: {id}.")]
	DuplicateLogicalId {
		/// The contested logical id.
		id: LogicalId,
	},
	/// A declaration referenced a resource this stack has not declared yet.
	#[error("{referrer} references {target}, which is not declared in this stack.")]
	UnknownReference {
		/// Logical id (or output name) holding the reference.
		referrer: String,
		/// The missing target.
		target: LogicalId,
	},
	/// A client requested a custom scope no declared resource server provides.
	#[error("Client {referrer} requests scope {scope}, which no declared resource server provides.")]
	UndeclaredScope {
		/// Logical id of the requesting client.
		referrer: String,
		/// The rendered scope string.
		scope: String,
	},
	/// Two outputs were declared under the same name.
	#[error("Duplicate output name: {name}.")]
	DuplicateOutput {
		/// The contested output name.
		name: String,
	},
	/// Resource properties failed to serialize.
	#[error("Failed to serialize {id} properties: {message}.")]
	Properties {
		/// Logical id of the resource.
		id: LogicalId,
		/// Human-readable error payload.
		message: String,
	},
	/// The assembled template failed graph validation.
	#[error(transparent)]
	Template(#[from] TemplateError),
}

/// Handle to a declared user pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolHandle {
	logical_id: LogicalId,
}
impl PoolHandle {
	/// Logical id of the pool.
	pub fn logical_id(&self) -> &LogicalId {
		&self.logical_id
	}
}

/// Handle to a declared resource server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerHandle {
	logical_id: LogicalId,
	identifier: String,
}
impl ServerHandle {
	/// Logical id of the server.
	pub fn logical_id(&self) -> &LogicalId {
		&self.logical_id
	}

	/// Identifier custom scopes are qualified with.
	pub fn identifier(&self) -> &str {
		&self.identifier
	}

	/// Builds a qualified scope reference against this server.
	pub fn scope(&self, name: impl Into<String>) -> Result<OAuthScope, ScopeValidationError> {
		OAuthScope::custom(self.identifier.clone(), name)
	}
}

/// Handle to a declared app client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientHandle {
	logical_id: LogicalId,
}
impl ClientHandle {
	/// Logical id of the client.
	pub fn logical_id(&self) -> &LogicalId {
		&self.logical_id
	}
}

/// Handle to a declared hosted domain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainHandle {
	logical_id: LogicalId,
	base_url: Expr,
}
impl DomainHandle {
	/// Logical id of the domain.
	pub fn logical_id(&self) -> &LogicalId {
		&self.logical_id
	}

	/// Base URL expression of the hosted UI surface.
	pub fn base_url(&self) -> Expr {
		self.base_url.clone()
	}
}

/// Record of a declared resource server, kept for client scope checks.
#[derive(Clone, Debug)]
struct ServerRecord {
	logical_id: LogicalId,
	identifier: String,
	scope_names: Vec<String>,
}

/// Child-resource property payload carrying the owning pool reference.
#[derive(Serialize)]
struct ChildProperties<'a, T> {
	user_pool: Expr,
	#[serde(flatten)]
	inner: &'a T,
}

/// A named declaration unit assembled in dependency order.
#[derive(Clone, Debug)]
pub struct Stack {
	name: StackName,
	description: String,
	resources: Vec<TemplateResource>,
	outputs: Vec<TemplateOutput>,
	servers: Vec<ServerRecord>,
}
impl Stack {
	/// Creates an empty stack.
	pub fn new(name: StackName, description: impl Into<String>) -> Self {
		Self {
			name,
			description: description.into(),
			resources: Vec::new(),
			outputs: Vec::new(),
			servers: Vec::new(),
		}
	}

	/// Name of the provisioning unit.
	pub fn name(&self) -> &StackName {
		&self.name
	}

	/// Number of declared resources.
	pub fn len(&self) -> usize {
		self.resources.len()
	}

	/// Returns true when nothing has been declared.
	pub fn is_empty(&self) -> bool {
		self.resources.is_empty()
	}

	/// Declares a user pool.
	pub fn add_user_pool(
		&mut self,
		id: LogicalId,
		pool: UserPool,
	) -> Result<PoolHandle, StackError> {
		self.push_resource(id.clone(), ResourceKind::UserPool, to_properties(&id, &pool)?, vec![])?;

		Ok(PoolHandle { logical_id: id })
	}

	/// Declares a resource server owned by a previously declared pool.
	pub fn add_resource_server(
		&mut self,
		id: LogicalId,
		pool: &PoolHandle,
		server: ResourceServer,
	) -> Result<ServerHandle, StackError> {
		self.ensure_declared(&id, &pool.logical_id)?;

		let record = ServerRecord {
			logical_id: id.clone(),
			identifier: server.identifier.clone(),
			scope_names: server.scopes.iter().map(|scope| scope.name.clone()).collect(),
		};
		let properties = to_properties(
			&id,
			&ChildProperties { user_pool: Expr::Ref(pool.logical_id.clone()), inner: &server },
		)?;

		self.push_resource(
			id.clone(),
			ResourceKind::ResourceServer,
			properties,
			vec![pool.logical_id.clone()],
		)?;
		self.servers.push(record);

		Ok(ServerHandle { logical_id: id, identifier: server.identifier })
	}

	/// Declares an app client owned by a previously declared pool.
	///
	/// Every custom scope the client requests must be provided by a resource server already
	/// declared in this stack; the matching servers become dependency edges of the client.
	pub fn add_app_client(
		&mut self,
		id: LogicalId,
		pool: &PoolHandle,
		client: AppClient,
	) -> Result<ClientHandle, StackError> {
		self.ensure_declared(&id, &pool.logical_id)?;

		let mut depends_on = vec![pool.logical_id.clone()];

		for scope in client.scopes.iter() {
			// Standard OIDC scopes carry no qualifier; everything else must resolve to a
			// declared resource server.
			let Some((qualifier, name)) = scope.split_once('/') else {
				continue;
			};
			let server = self
				.servers
				.iter()
				.find(|server| {
					server.identifier == qualifier
						&& server.scope_names.iter().any(|declared| declared == name)
				})
				.ok_or_else(|| StackError::UndeclaredScope {
					referrer: id.to_string(),
					scope: scope.to_owned(),
				})?;

			if !depends_on.contains(&server.logical_id) {
				depends_on.push(server.logical_id.clone());
			}
		}

		let properties = to_properties(
			&id,
			&ChildProperties { user_pool: Expr::Ref(pool.logical_id.clone()), inner: &client },
		)?;

		self.push_resource(id.clone(), ResourceKind::AppClient, properties, depends_on)?;

		Ok(ClientHandle { logical_id: id })
	}

	/// Declares a hosted domain owned by a previously declared pool.
	pub fn add_hosted_domain(
		&mut self,
		id: LogicalId,
		pool: &PoolHandle,
		domain: HostedDomain,
	) -> Result<DomainHandle, StackError> {
		self.ensure_declared(&id, &pool.logical_id)?;

		let base_url = domain.base_url();
		let properties = to_properties(
			&id,
			&ChildProperties { user_pool: Expr::Ref(pool.logical_id.clone()), inner: &domain },
		)?;

		self.push_resource(
			id.clone(),
			ResourceKind::HostedDomain,
			properties,
			vec![pool.logical_id.clone()],
		)?;

		Ok(DomainHandle { logical_id: id, base_url })
	}

	/// Declares a deployment-time output.
	pub fn add_output(
		&mut self,
		name: impl Into<String>,
		value: Expr,
	) -> Result<(), StackError> {
		let name = name.into();

		if self.outputs.iter().any(|output| output.name == name) {
			return Err(StackError::DuplicateOutput { name });
		}

		let mut targets = Vec::new();

		value.referenced_ids(&mut targets);

		for target in targets {
			if self.lookup(&target).is_none() {
				return Err(StackError::UnknownReference { referrer: name, target });
			}
		}

		self.outputs.push(TemplateOutput { name, value });

		Ok(())
	}

	/// Synthesizes the template, re-validating the full reference graph.
	pub fn synth(&self) -> Result<Template, StackError> {
		let _span = OpSpan::new(StackOp::Synth, "synth").entered();

		obs::record_op_outcome(StackOp::Synth, OpOutcome::Attempt);

		let template = Template {
			description: self.description.clone(),
			resources: self.resources.clone(),
			outputs: self.outputs.clone(),
		};

		match template.validate() {
			Ok(()) => {
				obs::record_op_outcome(StackOp::Synth, OpOutcome::Success);

				Ok(template)
			},
			Err(e) => {
				obs::record_op_outcome(StackOp::Synth, OpOutcome::Failure);

				Err(e.into())
			},
		}
	}

	fn lookup(&self, id: &LogicalId) -> Option<&TemplateResource> {
		self.resources.iter().find(|resource| &resource.logical_id == id)
	}

	fn ensure_declared(&self, referrer: &LogicalId, target: &LogicalId) -> Result<(), StackError> {
		if self.lookup(target).is_none() {
			return Err(StackError::UnknownReference {
				referrer: referrer.to_string(),
				target: target.clone(),
			});
		}

		Ok(())
	}

	fn push_resource(
		&mut self,
		id: LogicalId,
		kind: ResourceKind,
		properties: Value,
		depends_on: Vec<LogicalId>,
	) -> Result<(), StackError> {
		if self.lookup(&id).is_some() {
			return Err(StackError::DuplicateLogicalId { id });
		}

		self.resources.push(TemplateResource { logical_id: id, kind, properties, depends_on });

		Ok(())
	}
}

fn to_properties<T: Serialize>(id: &LogicalId, value: &T) -> Result<Value, StackError> {
	serde_json::to_value(value)
		.map_err(|e| StackError::Properties { id: id.clone(), message: e.to_string() })
}
