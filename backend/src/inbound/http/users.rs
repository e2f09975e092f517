//! Users API handlers.
//!
//! ```text
//! POST   /api/v1/users        {"name":"Ada","email":"ada@example.com","role":"admin"}
//! GET    /api/v1/users?limit=10&cursor=<id>&role=admin
//! GET    /api/v1/users/{id}
//! PATCH  /api/v1/users/{id}   {"isActive":false}
//! DELETE /api/v1/users/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{ListUsersRequest, NewUser, UserPatch};
use crate::domain::{Error, User, UserId, UserRole};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{ApiResponse, PaginatedResponse};
use crate::inbound::http::roles::{Caller, require_any_role};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    EMAIL, ID, NAME, parse_cursor, parse_email, parse_limit, parse_name, parse_optional_role,
    parse_role, parse_user_id, require,
};

/// Request body for `POST /api/v1/users`.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateUserBody {
    /// Display name.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Role; defaults to `user`.
    pub role: Option<String>,
}

impl TryFrom<CreateUserBody> for NewUser {
    type Error = Error;

    fn try_from(body: CreateUserBody) -> Result<Self, Self::Error> {
        let name = parse_name(require(body.name, NAME)?)?;
        let email = parse_email(require(body.email, EMAIL)?)?;
        let role = body
            .role
            .as_deref()
            .map(parse_role)
            .transpose()?
            .unwrap_or_default();
        Ok(Self::new(name, email).with_role(role))
    }
}

/// Request body for `PATCH /api/v1/users/{id}`.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUserBody {
    /// Replacement display name.
    pub name: Option<String>,
    /// Replacement email address.
    pub email: Option<String>,
    /// Replacement role.
    pub role: Option<String>,
    /// Replacement active flag.
    pub is_active: Option<bool>,
}

impl TryFrom<UpdateUserBody> for UserPatch {
    type Error = Error;

    fn try_from(body: UpdateUserBody) -> Result<Self, Self::Error> {
        Ok(Self {
            name: body.name.map(parse_name).transpose()?,
            email: body.email.map(parse_email).transpose()?,
            role: parse_optional_role(body.role)?,
            is_active: body.is_active,
        })
    }
}

/// Query string for `GET /api/v1/users`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListUsersParams {
    /// Page size, 1 to 100.
    pub limit: Option<u32>,
    /// Id of the last record on the previous page.
    pub cursor: Option<String>,
    /// Role filter.
    pub role: Option<String>,
}

impl TryFrom<ListUsersParams> for ListUsersRequest {
    type Error = Error;

    fn try_from(params: ListUsersParams) -> Result<Self, Self::Error> {
        Ok(Self {
            limit: parse_limit(params.limit)?,
            cursor: parse_cursor(params.cursor)?,
            role: parse_optional_role(params.role)?,
        })
    }
}

fn path_id(path: web::Path<String>) -> Result<UserId, Error> {
    parse_user_id(path.into_inner(), ID)
}

/// Create a user. Admin only.
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    caller: Caller,
    payload: web::Json<CreateUserBody>,
) -> ApiResult<HttpResponse> {
    require_any_role(&caller, &[UserRole::Admin])?;
    let new_user = NewUser::try_from(payload.into_inner())?;
    let user = state.users_command.create(new_user).await?;
    Ok(HttpResponse::Created().json(ApiResponse::new(user, state.clock.utc())))
}

/// List users newest first, one page at a time.
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    params: web::Query<ListUsersParams>,
) -> ApiResult<web::Json<PaginatedResponse<User>>> {
    let request = ListUsersRequest::try_from(params.into_inner())?;
    let page = state.users_query.find_all(&request).await?;
    Ok(web::Json(PaginatedResponse::new(page, state.clock.utc())))
}

/// Fetch a single user.
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ApiResponse<User>>> {
    let id = path_id(path)?;
    let user = state.users_query.find_one(&id).await?;
    Ok(web::Json(ApiResponse::new(user, state.clock.utc())))
}

/// Partially update a user. Admins and moderators.
#[patch("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<String>,
    payload: web::Json<UpdateUserBody>,
) -> ApiResult<web::Json<ApiResponse<User>>> {
    require_any_role(&caller, &[UserRole::Admin, UserRole::Moderator])?;
    let id = path_id(path)?;
    let patch = UserPatch::try_from(payload.into_inner())?;
    let user = state.users_command.update(&id, patch).await?;
    Ok(web::Json(ApiResponse::new(user, state.clock.utc())))
}

/// Delete a user. Admin only.
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    require_any_role(&caller, &[UserRole::Admin])?;
    let id = path_id(path)?;
    state.users_command.remove(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Register the users endpoints on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_user)
        .service(list_users)
        .service(get_user)
        .service(update_user)
        .service(delete_user);
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
