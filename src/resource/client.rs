// self
use crate::{
	_prelude::*,
	scope::{OAuthScope, ScopeSet},
};

/// OAuth 2.0 grant flows a client may be permitted to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OAuthFlow {
	/// Authorization Code grant (PKCE recommended).
	AuthorizationCode,
	/// Implicit grant (legacy browser flows).
	Implicit,
	/// Client Credentials grant for app-only tokens.
	ClientCredentials,
}
impl OAuthFlow {
	/// Returns the RFC 6749 identifier for the flow.
	pub fn as_str(self) -> &'static str {
		match self {
			OAuthFlow::AuthorizationCode => "authorization_code",
			OAuthFlow::Implicit => "implicit",
			OAuthFlow::ClientCredentials => "client_credentials",
		}
	}
}
impl Display for OAuthFlow {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Collection of flow flags enabled on a client.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthFlows {
	/// Indicates whether the Authorization Code grant is enabled.
	pub authorization_code: bool,
	/// Indicates whether the Implicit grant is enabled.
	pub implicit: bool,
	/// Indicates whether the Client Credentials grant is enabled.
	pub client_credentials: bool,
}
impl OAuthFlows {
	/// Returns true if the provided flow is enabled.
	pub fn supports(self, flow: OAuthFlow) -> bool {
		match flow {
			OAuthFlow::AuthorizationCode => self.authorization_code,
			OAuthFlow::Implicit => self.implicit,
			OAuthFlow::ClientCredentials => self.client_credentials,
		}
	}

	/// Marks a flow as enabled.
	pub fn enable(mut self, flow: OAuthFlow) -> Self {
		match flow {
			OAuthFlow::AuthorizationCode => self.authorization_code = true,
			OAuthFlow::Implicit => self.implicit = true,
			OAuthFlow::ClientCredentials => self.client_credentials = true,
		}

		self
	}

	/// Returns true when no flow is enabled.
	pub fn is_empty(self) -> bool {
		!self.authorization_code && !self.implicit && !self.client_credentials
	}

	/// Returns true when a redirect-based flow (code or implicit) is enabled.
	pub fn needs_callback(self) -> bool {
		self.authorization_code || self.implicit
	}
}

/// Identity providers a client may accept sign-ins from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityProvider {
	/// The declaring user pool's own directory.
	UserPool,
	/// Federated Google sign-in.
	Google,
	/// Federated Facebook sign-in.
	Facebook,
	/// Federated Amazon sign-in.
	Amazon,
	/// Federated Apple sign-in.
	Apple,
}
impl IdentityProvider {
	/// Returns a stable label for the provider.
	pub const fn as_str(self) -> &'static str {
		match self {
			IdentityProvider::UserPool => "user_pool",
			IdentityProvider::Google => "google",
			IdentityProvider::Facebook => "facebook",
			IdentityProvider::Amazon => "amazon",
			IdentityProvider::Apple => "apple",
		}
	}
}
impl Display for IdentityProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Errors raised while constructing or validating app clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum AppClientError {
	/// A client name is required.
	#[error("Missing client name.")]
	MissingClientName,
	/// At least one flow must be enabled.
	#[error("Client must enable at least one OAuth flow.")]
	NoFlows,
	/// At least one scope must be requested.
	#[error("Client must request at least one scope.")]
	NoScopes,
	/// Redirect-based flows require a callback allow-list.
	#[error("Redirect-based flows require at least one callback URL.")]
	MissingCallbackUrl,
	/// Callback URLs must use HTTPS.
	#[error("Callback URL must use HTTPS: {url}.")]
	InsecureCallback {
		/// Callback URL that failed validation.
		url: String,
	},
}

/// An application permitted to request tokens against the pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppClient {
	/// Human-readable client name.
	pub client_name: String,
	/// Whether the engine generates a confidential client secret.
	pub generate_secret: bool,
	/// Enabled grant flows.
	pub flows: OAuthFlows,
	/// Normalized requested scope set.
	pub scopes: ScopeSet,
	/// Callback URL allow-list for redirect-based flows.
	pub callback_urls: Vec<Url>,
	/// Identity providers the client accepts sign-ins from.
	pub identity_providers: Vec<IdentityProvider>,
}
impl AppClient {
	/// Creates a new builder.
	pub fn builder() -> AppClientBuilder {
		AppClientBuilder::default()
	}
}

/// Builder for [`AppClient`] values.
#[derive(Debug, Default)]
pub struct AppClientBuilder {
	/// Client name being assembled (required).
	pub client_name: Option<String>,
	/// Secret-generation flag (defaults to public client).
	pub generate_secret: bool,
	/// Flows enabled so far.
	pub flows: OAuthFlows,
	/// Scopes requested so far.
	pub scopes: Vec<OAuthScope>,
	/// Callback URLs allowed so far.
	pub callback_urls: Vec<Url>,
	/// Identity providers accepted so far (defaults to the pool's own directory).
	pub identity_providers: Vec<IdentityProvider>,
}
impl AppClientBuilder {
	/// Sets the client name.
	pub fn client_name(mut self, name: impl Into<String>) -> Self {
		self.client_name = Some(name.into());

		self
	}

	/// Enables or disables confidential secret generation.
	pub fn generate_secret(mut self, generate: bool) -> Self {
		self.generate_secret = generate;

		self
	}

	/// Marks a single flow as enabled.
	pub fn flow(mut self, flow: OAuthFlow) -> Self {
		self.flows = self.flows.enable(flow);

		self
	}

	/// Requests a single scope.
	pub fn scope(mut self, scope: OAuthScope) -> Self {
		self.scopes.push(scope);

		self
	}

	/// Requests multiple scopes.
	pub fn scopes<I>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = OAuthScope>,
	{
		self.scopes.extend(scopes);

		self
	}

	/// Allows a callback URL.
	pub fn callback_url(mut self, url: Url) -> Self {
		self.callback_urls.push(url);

		self
	}

	/// Accepts sign-ins from an identity provider.
	pub fn identity_provider(mut self, provider: IdentityProvider) -> Self {
		self.identity_providers.push(provider);

		self
	}

	/// Consumes the builder and validates the resulting client.
	pub fn build(self) -> Result<AppClient, AppClientError> {
		let client_name = self
			.client_name
			.filter(|name| !name.is_empty())
			.ok_or(AppClientError::MissingClientName)?;

		if self.flows.is_empty() {
			return Err(AppClientError::NoFlows);
		}
		if self.scopes.is_empty() {
			return Err(AppClientError::NoScopes);
		}
		if self.flows.needs_callback() && self.callback_urls.is_empty() {
			return Err(AppClientError::MissingCallbackUrl);
		}

		for url in &self.callback_urls {
			if url.scheme() != "https" {
				return Err(AppClientError::InsecureCallback { url: url.to_string() });
			}
		}

		let identity_providers = if self.identity_providers.is_empty() {
			vec![IdentityProvider::UserPool]
		} else {
			self.identity_providers
		};

		Ok(AppClient {
			client_name,
			generate_secret: self.generate_secret,
			flows: self.flows,
			scopes: ScopeSet::new(self.scopes),
			callback_urls: self.callback_urls,
			identity_providers,
		})
	}
}
