//! The auth-code entity and its expiry status helpers.

// self
use crate::{
	_prelude::*,
	auth::{AuthCodeAction, AuthCodeTarget, AuthCodeType, CodeAssociation, CodeSecret},
	clock::Clock,
};

/// Lifecycle status of an auth code at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthCodeStatus {
	/// Code may still be redeemed.
	Active,
	/// `valid_until` has been reached.
	Expired,
}

/// Single-use bearer code and what it grants.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCode {
	/// Opaque bearer secret; callers must avoid logging it.
	pub code: CodeSecret,
	/// Identity or record the code is bound to.
	pub target: AuthCodeTarget,
	/// First instant at which the code is no longer valid.
	#[serde(with = "time::serde::rfc3339")]
	pub valid_until: OffsetDateTime,
}
impl AuthCode {
	/// Classification of the code.
	pub fn code_type(&self) -> AuthCodeType {
		self.target.code_type()
	}

	/// Action label of the code.
	pub fn action(&self) -> AuthCodeAction {
		self.target.action()
	}

	/// Match criteria for every code superseded by, or superseding, this one.
	pub fn association(&self) -> CodeAssociation {
		self.target.association()
	}

	/// Computes the lifecycle status at a given instant.
	pub fn status_at(&self, instant: OffsetDateTime) -> AuthCodeStatus {
		if instant >= self.valid_until {
			return AuthCodeStatus::Expired;
		}

		AuthCodeStatus::Active
	}

	/// Returns `true` if the code has expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.status_at(instant), AuthCodeStatus::Expired)
	}

	/// Returns `true` if the code is expired at the instant reported by `clock`.
	pub fn is_expired(&self, clock: &dyn Clock) -> bool {
		self.is_expired_at(clock.now())
	}
}
impl Debug for AuthCode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthCode")
			.field("code", &"<redacted>")
			.field("target", &self.target)
			.field("valid_until", &self.valid_until)
			.finish()
	}
}
