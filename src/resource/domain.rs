// self
use crate::{_prelude::*, template::Expr};

/// Errors raised while constructing or validating hosted domains.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum HostedDomainError {
	/// A non-empty domain prefix is required.
	#[error("Missing domain prefix.")]
	MissingPrefix,
	/// Literal prefix segments must stay within the hosted-domain charset.
	#[error("Domain prefix segment contains an illegal character: {segment}.")]
	IllegalPrefixSegment {
		/// The offending literal segment.
		segment: String,
	},
	/// Resource references cannot appear inside a domain prefix.
	#[error("Domain prefix cannot reference other resources.")]
	ReferenceInPrefix,
}

/// A public sign-in/sign-up URL surface attached to a user pool.
///
/// The prefix may embed the region pseudo-parameter (the original deployment derives
/// `{name}-{region}` prefixes so stages collide neither across regions nor accounts).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedDomain {
	/// Domain prefix expression; literal segments are charset-checked.
	pub domain_prefix: Expr,
}
impl HostedDomain {
	/// Creates a hosted domain after validating the prefix expression.
	pub fn new(domain_prefix: Expr) -> Result<Self, HostedDomainError> {
		validate_prefix(&domain_prefix)?;

		if matches!(domain_prefix, Expr::Concat(ref parts) if parts.is_empty()) {
			return Err(HostedDomainError::MissingPrefix);
		}

		Ok(Self { domain_prefix })
	}

	/// Derives the base URL of the hosted UI surface.
	///
	/// The host pattern is fixed by the provider (`{prefix}.auth.{region}.amazoncognito.com`);
	/// the region placeholder resolves at provisioning time.
	pub fn base_url(&self) -> Expr {
		Expr::concat([
			Expr::lit("https://"),
			self.domain_prefix.clone(),
			Expr::lit(".auth."),
			Expr::Region,
			Expr::lit(".amazoncognito.com"),
		])
	}
}

fn validate_prefix(expr: &Expr) -> Result<(), HostedDomainError> {
	match expr {
		Expr::Lit(segment) => {
			if segment.is_empty() {
				return Err(HostedDomainError::MissingPrefix);
			}
			if segment.chars().any(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'))
			{
				return Err(HostedDomainError::IllegalPrefixSegment { segment: segment.clone() });
			}

			Ok(())
		},
		Expr::Region => Ok(()),
		Expr::Ref(_) | Expr::GetAtt { .. } => Err(HostedDomainError::ReferenceInPrefix),
		Expr::Concat(parts) => {
			for part in parts {
				validate_prefix(part)?;
			}

			Ok(())
		},
	}
}
