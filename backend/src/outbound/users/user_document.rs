//! Mapping between user records and stored documents.

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::domain::ports::{Document, NewUser, UserPatch, WriteFields, WriteValue};
use crate::domain::{EmailAddress, User, UserId, UserName, UserRole, UserValidationError};

pub(super) const NAME: &str = "name";
pub(super) const EMAIL: &str = "email";
pub(super) const ROLE: &str = "role";
pub(super) const IS_ACTIVE: &str = "isActive";
pub(super) const CREATED_AT: &str = "createdAt";
pub(super) const UPDATED_AT: &str = "updatedAt";

/// A stored document could not be decoded into a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum UserDocumentError {
    #[error("document {id} is missing field `{field}`")]
    MissingField { id: String, field: &'static str },
    #[error("document {id} has invalid field `{field}`: {reason}")]
    InvalidField {
        id: String,
        field: &'static str,
        reason: String,
    },
}

fn text(value: &str) -> WriteValue {
    WriteValue::Value(Value::String(value.to_owned()))
}

/// Fields written when a record is created.
pub(super) fn new_user_fields(user: &NewUser) -> WriteFields {
    WriteFields::from([
        (NAME.to_owned(), text(user.name.as_ref())),
        (EMAIL.to_owned(), text(user.email.as_ref())),
        (ROLE.to_owned(), text(user.role.as_str())),
        (IS_ACTIVE.to_owned(), WriteValue::Value(Value::Bool(true))),
        (CREATED_AT.to_owned(), WriteValue::ServerTimestamp),
        (UPDATED_AT.to_owned(), WriteValue::ServerTimestamp),
    ])
}

/// Fields written for a partial update; absent patch fields are left alone.
pub(super) fn patch_fields(patch: &UserPatch) -> WriteFields {
    let mut fields = WriteFields::new();
    if let Some(name) = &patch.name {
        fields.insert(NAME.to_owned(), text(name.as_ref()));
    }
    if let Some(email) = &patch.email {
        fields.insert(EMAIL.to_owned(), text(email.as_ref()));
    }
    if let Some(role) = patch.role {
        fields.insert(ROLE.to_owned(), text(role.as_str()));
    }
    if let Some(is_active) = patch.is_active {
        fields.insert(IS_ACTIVE.to_owned(), WriteValue::Value(Value::Bool(is_active)));
    }
    fields.insert(UPDATED_AT.to_owned(), WriteValue::ServerTimestamp);
    fields
}

struct Decoder<'a> {
    document: &'a Document,
}

impl Decoder<'_> {
    fn missing(&self, field: &'static str) -> UserDocumentError {
        UserDocumentError::MissingField {
            id: self.document.id.clone(),
            field,
        }
    }

    fn invalid(&self, field: &'static str, reason: impl ToString) -> UserDocumentError {
        UserDocumentError::InvalidField {
            id: self.document.id.clone(),
            field,
            reason: reason.to_string(),
        }
    }

    fn string(&self, field: &'static str) -> Result<Option<&str>, UserDocumentError> {
        match self.document.field(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.as_str())),
            Some(_) => Err(self.invalid(field, "expected a string")),
        }
    }

    fn required_string(&self, field: &'static str) -> Result<&str, UserDocumentError> {
        self.string(field)?.ok_or_else(|| self.missing(field))
    }

    fn parse<T>(
        &self,
        field: &'static str,
        parse: impl FnOnce(&str) -> Result<T, UserValidationError>,
    ) -> Result<T, UserDocumentError> {
        parse(self.required_string(field)?).map_err(|err| self.invalid(field, err))
    }

    fn timestamp(&self, field: &'static str) -> Result<DateTime<Utc>, UserDocumentError> {
        let raw = self.required_string(field)?;
        DateTime::parse_from_rfc3339(raw)
            .map(|at| at.with_timezone(&Utc))
            .map_err(|err| self.invalid(field, err))
    }
}

/// Decode a stored document.
///
/// Records written before `isActive` and `role` existed decode as active
/// regular users.
pub(super) fn user_from_document(document: &Document) -> Result<User, UserDocumentError> {
    let decoder = Decoder { document };
    let id = UserId::new(document.id.as_str()).map_err(|err| decoder.invalid("id", err))?;
    let name = decoder.parse(NAME, |raw| UserName::new(raw))?;
    let email = decoder.parse(EMAIL, |raw| EmailAddress::new(raw))?;
    let role = match decoder.string(ROLE)? {
        Some(raw) => raw.parse::<UserRole>().map_err(|err| decoder.invalid(ROLE, err))?,
        None => UserRole::default(),
    };
    let is_active = match document.field(IS_ACTIVE) {
        None | Some(Value::Null) => true,
        Some(Value::Bool(flag)) => *flag,
        Some(_) => return Err(decoder.invalid(IS_ACTIVE, "expected a boolean")),
    };
    let created_at = decoder.timestamp(CREATED_AT)?;
    let updated_at = decoder.timestamp(UPDATED_AT)?;

    User::builder(id, name, email)
        .role(role)
        .active(is_active)
        .build(created_at, updated_at)
        .map_err(|err| decoder.invalid(UPDATED_AT, err))
}
