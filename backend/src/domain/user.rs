//! User record model and its validated value types.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Validation errors raised while constructing user values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// The identifier was empty.
    EmptyId,
    /// The identifier was too long or contained whitespace or `/`.
    InvalidId,
    /// The name was empty once trimmed.
    EmptyName,
    /// The name was shorter than the minimum.
    NameTooShort {
        /// Minimum number of characters.
        min: usize,
    },
    /// The name exceeded the maximum.
    NameTooLong {
        /// Maximum number of characters.
        max: usize,
    },
    /// The email was empty.
    EmptyEmail,
    /// The email was not a plausible address.
    InvalidEmail,
    /// The role was not one of the known roles.
    UnknownRole {
        /// The rejected input.
        value: String,
    },
    /// `updatedAt` preceded `createdAt`.
    TimestampsOutOfOrder,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(
                f,
                "user id must be at most {USER_ID_MAX} characters without whitespace or '/'",
            ),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooShort { min } => write!(f, "name must be at least {min} characters"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::UnknownRole { value } => write!(
                f,
                "role \"{value}\" must be one of: admin, user, moderator",
            ),
            Self::TimestampsOutOfOrder => {
                write!(f, "updatedAt must not precede createdAt")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Maximum length of a document identifier.
pub const USER_ID_MAX: usize = 128;
/// Minimum allowed length for a name.
pub const USER_NAME_MIN: usize = 2;
/// Maximum allowed length for a name.
pub const USER_NAME_MAX: usize = 100;

static USER_ID_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn user_id_regex() -> &'static Regex {
    USER_ID_RE.get_or_init(|| {
        // Length is enforced separately.
        Regex::new(r"^[^\s/]+$")
            .unwrap_or_else(|error| panic!("user id regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Opaque, store-assigned record identifier.
///
/// Any document id is accepted as long as it is 1 to 128 characters long and
/// contains neither whitespace nor a path separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.into())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.chars().count() > USER_ID_MAX || !user_id_regex().is_match(&id) {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Human readable name of the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate and construct a [`UserName`].
    ///
    /// Surrounding whitespace is dropped before the length is checked.
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(name.into())
    }

    fn from_owned(name: String) -> Result<Self, UserValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        let length = trimmed.chars().count();
        if length < USER_NAME_MIN {
            return Err(UserValidationError::NameTooShort { min: USER_NAME_MIN });
        }
        if length > USER_NAME_MAX {
            return Err(UserValidationError::NameTooLong { max: USER_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Email address, compared and stored exactly as supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(email.into())
    }

    fn from_owned(email: String) -> Result<Self, UserValidationError> {
        if email.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email_regex().is_match(&email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Role granted to a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full administrative access.
    Admin,
    /// Regular account.
    #[default]
    User,
    /// May edit but not create or delete records.
    Moderator,
}

impl UserRole {
    /// Wire representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::Moderator => "moderator",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            "moderator" => Ok(Self::Moderator),
            other => Err(UserValidationError::UnknownRole {
                value: other.to_owned(),
            }),
        }
    }
}

/// A user record.
///
/// ## Invariants
/// - `updated_at >= created_at`.
/// - `id` never changes once assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    id: UserId,
    name: UserName,
    email: EmailAddress,
    role: UserRole,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Start assembling a user with the default role and active status.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use user_records::domain::{EmailAddress, User, UserId, UserName, UserRole};
    ///
    /// let now = Utc::now();
    /// let user = User::builder(
    ///     UserId::new("u1").expect("valid id"),
    ///     UserName::new("Ada").expect("valid name"),
    ///     EmailAddress::new("ada@example.com").expect("valid email"),
    /// )
    /// .role(UserRole::Admin)
    /// .build(now, now)
    /// .expect("timestamps are ordered");
    /// assert!(user.is_active());
    /// ```
    #[must_use]
    pub const fn builder(id: UserId, name: UserName, email: EmailAddress) -> UserBuilder {
        UserBuilder {
            id,
            name,
            email,
            role: UserRole::User,
            is_active: true,
        }
    }

    /// Store-assigned identifier.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Display name.
    #[must_use]
    pub const fn name(&self) -> &UserName {
        &self.name
    }

    /// Email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Granted role.
    #[must_use]
    pub const fn role(&self) -> UserRole {
        self.role
    }

    /// Whether the account is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Creation timestamp assigned by the store.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last-modified timestamp assigned by the store.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Incrementally assembles a [`User`].
#[derive(Debug, Clone)]
pub struct UserBuilder {
    id: UserId,
    name: UserName,
    email: EmailAddress,
    role: UserRole,
    is_active: bool,
}

impl UserBuilder {
    /// Override the role.
    #[must_use]
    pub const fn role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    /// Override the active flag.
    #[must_use]
    pub const fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Finish the user, checking timestamp ordering.
    pub fn build(
        self,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<User, UserValidationError> {
        if updated_at < created_at {
            return Err(UserValidationError::TimestampsOutOfOrder);
        }
        Ok(User {
            id: self.id,
            name: self.name,
            email: self.email,
            role: self.role,
            is_active: self.is_active,
            created_at,
            updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
struct UserDto {
    id: UserId,
    name: UserName,
    email: EmailAddress,
    role: UserRole,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            role: value.role,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        Self::builder(value.id, value.name, value.email)
            .role(value.role)
            .active(value.is_active)
            .build(value.created_at, value.updated_at)
    }
}
