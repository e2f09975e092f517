//! Caller role extraction and role gating.
//!
//! An upstream authenticator places the caller's role in the `x-user-role`
//! header. Handlers gate mutations with [`require_any_role`] before touching
//! the domain; the domain itself never inspects who is calling.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload};

use crate::domain::{Error, UserRole};

/// Header carrying the authenticated caller's role.
pub const ROLE_HEADER: &str = "x-user-role";

/// Caller identity as far as role gating is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    /// No role header was supplied.
    Anonymous,
    /// A role header was supplied; `None` when it names no known role.
    Authenticated {
        /// Parsed role, if recognised.
        role: Option<UserRole>,
    },
}

impl Caller {
    fn from_request_head(req: &HttpRequest) -> Self {
        match req.headers().get(ROLE_HEADER) {
            None => Self::Anonymous,
            Some(value) => Self::Authenticated {
                role: value
                    .to_str()
                    .ok()
                    .and_then(|raw| raw.trim().parse::<UserRole>().ok()),
            },
        }
    }
}

impl FromRequest for Caller {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self::from_request_head(req)))
    }
}

/// Fail with `forbidden` unless the caller holds one of `allowed`.
///
/// # Examples
/// ```
/// use user_records::domain::UserRole;
/// use user_records::inbound::http::roles::{Caller, require_any_role};
///
/// let moderator = Caller::Authenticated { role: Some(UserRole::Moderator) };
/// assert!(require_any_role(&moderator, &[UserRole::Admin, UserRole::Moderator]).is_ok());
/// assert!(require_any_role(&Caller::Anonymous, &[UserRole::Admin]).is_err());
/// ```
pub fn require_any_role(caller: &Caller, allowed: &[UserRole]) -> Result<(), Error> {
    match caller {
        Caller::Anonymous => Err(Error::forbidden("authentication required")),
        Caller::Authenticated { role: Some(role) } if allowed.contains(role) => Ok(()),
        Caller::Authenticated { .. } => {
            let names: Vec<&str> = allowed.iter().map(|role| role.as_str()).collect();
            Err(Error::forbidden(format!(
                "requires one of the following roles: {}",
                names.join(", ")
            )))
        }
    }
}
