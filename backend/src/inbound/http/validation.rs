//! Request validation helpers for the HTTP adapter.
//!
//! Every rejection is an `invalid_argument` error whose details name the
//! offending field and a stable machine-readable code.

use actix_web::{HttpRequest, error::JsonPayloadError, error::QueryPayloadError, web};
use pagination::{Cursor, PageLimit};
use serde_json::json;

use crate::domain::{EmailAddress, Error, UserId, UserName, UserRole};

/// Validation error codes reported in error details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidField,
    MalformedBody,
    MalformedQuery,
}

impl ValidationCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidField => "invalid_field",
            Self::MalformedBody => "malformed_body",
            Self::MalformedQuery => "malformed_query",
        }
    }
}

/// Newtype wrapper for request field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    const fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const ID: FieldName = FieldName::new("id");
pub(crate) const NAME: FieldName = FieldName::new("name");
pub(crate) const EMAIL: FieldName = FieldName::new("email");
pub(crate) const ROLE: FieldName = FieldName::new("role");
pub(crate) const LIMIT: FieldName = FieldName::new("limit");
pub(crate) const CURSOR: FieldName = FieldName::new("cursor");

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::invalid_argument(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": ValidationCode::MissingField.as_str(),
    }))
}

pub(crate) fn invalid_field_error(
    field: FieldName,
    value: impl std::fmt::Display,
    reason: impl std::fmt::Display,
) -> Error {
    Error::invalid_argument(reason.to_string()).with_details(json!({
        "field": field.as_str(),
        "value": value.to_string(),
        "code": ValidationCode::InvalidField.as_str(),
    }))
}

pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_user_id(raw: String, field: FieldName) -> Result<UserId, Error> {
    UserId::new(raw.as_str()).map_err(|err| invalid_field_error(field, &raw, err))
}

pub(crate) fn parse_name(raw: String) -> Result<UserName, Error> {
    UserName::new(raw.as_str()).map_err(|err| invalid_field_error(NAME, &raw, err))
}

pub(crate) fn parse_email(raw: String) -> Result<EmailAddress, Error> {
    EmailAddress::new(raw.as_str()).map_err(|err| invalid_field_error(EMAIL, &raw, err))
}

pub(crate) fn parse_role(raw: &str) -> Result<UserRole, Error> {
    raw.parse().map_err(|err| invalid_field_error(ROLE, raw, err))
}

pub(crate) fn parse_optional_role(raw: Option<String>) -> Result<Option<UserRole>, Error> {
    raw.as_deref().map(parse_role).transpose()
}

pub(crate) fn parse_limit(raw: Option<u32>) -> Result<PageLimit, Error> {
    PageLimit::from_optional(raw).map_err(|err| {
        let shown = raw.map_or_else(String::new, |value| value.to_string());
        invalid_field_error(LIMIT, shown, err)
    })
}

pub(crate) fn parse_cursor(raw: Option<String>) -> Result<Option<Cursor>, Error> {
    raw.map(|token| {
        Cursor::new(token.as_str()).map_err(|err| invalid_field_error(CURSOR, &token, err))
    })
    .transpose()
}

fn malformed(code: ValidationCode, message: String) -> actix_web::Error {
    Error::invalid_argument(message)
        .with_details(json!({ "code": code.as_str() }))
        .into()
}

/// JSON extractor configuration reporting bad bodies as `invalid_argument`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        malformed(ValidationCode::MalformedBody, format!("invalid request body: {err}"))
    })
}

/// Query extractor configuration reporting bad query strings as
/// `invalid_argument`.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req: &HttpRequest| {
        malformed(ValidationCode::MalformedQuery, format!("invalid query string: {err}"))
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    fn missing_fields_name_the_field() {
        let error = missing_field_error(EMAIL);
        assert_eq!(error.code(), ErrorCode::InvalidArgument);
        assert_eq!(error.message(), "missing required field: email");
        assert_eq!(
            error.details(),
            Some(&json!({ "field": "email", "code": "missing_field" }))
        );
    }

    #[rstest]
    #[case(None, 10)]
    #[case(Some(1), 1)]
    #[case(Some(100), 100)]
    fn limits_default_and_accept_range(#[case] raw: Option<u32>, #[case] expected: u16) {
        assert_eq!(parse_limit(raw).expect("limit accepted").get(), expected);
    }

    #[rstest]
    #[case(0)]
    #[case(101)]
    fn limits_outside_range_are_rejected(#[case] raw: u32) {
        let error = parse_limit(Some(raw)).expect_err("limit rejected");
        assert_eq!(error.code(), ErrorCode::InvalidArgument);
        assert_eq!(
            error.details().and_then(|details| details.get("field")),
            Some(&json!("limit"))
        );
    }

    #[rstest]
    fn unknown_roles_are_rejected() {
        let error = parse_role("owner").expect_err("role rejected");
        assert_eq!(
            error.details(),
            Some(&json!({ "field": "role", "value": "owner", "code": "invalid_field" }))
        );
    }

    #[rstest]
    fn path_ids_follow_document_id_rules() {
        assert!(parse_user_id("abc".to_owned(), ID).is_ok());
        let error = parse_user_id("a b".to_owned(), ID).expect_err("id rejected");
        assert_eq!(error.code(), ErrorCode::InvalidArgument);
    }
}
