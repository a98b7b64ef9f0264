//! 사용자 계정과 역할.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::Entity;
use crate::error::PortfluxError;
use crate::ports::FilterValue;
use crate::validation::FieldOrder;

/// 사용자 역할.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// 관리자 - 삭제 권한 보유
    Admin,
    /// 일반 사용자
    #[default]
    Member,
}

impl Role {
    /// 역할 수준. 높을수록 권한이 많습니다.
    pub fn level(&self) -> u8 {
        match self {
            Role::Admin => 2,
            Role::Member => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Member => "member",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = PortfluxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "member" => Ok(Role::Member),
            other => Err(PortfluxError::Validation(format!("unknown role: {}", other))),
        }
    }
}

/// 저장된 사용자 레코드.
///
/// 비밀번호 해시는 직렬화되지 않습니다. API 응답은 [`UserResponse`]를 사용합니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    #[serde(rename = "userid")]
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(feature = "sqlx-support")]
impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for User {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;

        let role: String = row.try_get("role")?;
        let role = role.parse().map_err(|e: PortfluxError| sqlx::Error::ColumnDecode {
            index: "role".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            id: row.try_get("id")?,
            firstname: row.try_get("firstname")?,
            lastname: row.try_get("lastname")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            role,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// 비교와 저장에 쓰는 이메일 정규형 (앞뒤 공백 제거, 소문자).
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Entity for User {
    const NAME: &'static str = "user";
    const FILTERABLE: &'static [&'static str] = &["email", "firstname", "lastname", "role"];
    const UNIQUE: &'static [&'static str] = &["email"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn filter_value(&self, column: &str) -> Option<FilterValue> {
        match column {
            "email" => Some(self.email.as_str().into()),
            "firstname" => Some(self.firstname.as_str().into()),
            "lastname" => Some(self.lastname.as_str().into()),
            "role" => Some(self.role.as_str().into()),
            _ => None,
        }
    }
}

/// 사용자 응답 (비밀번호 해시 제외).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct UserResponse {
    #[serde(rename = "userid")]
    pub id: Uuid,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            firstname: user.firstname,
            lastname: user.lastname,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// 회원 가입 요청.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct CreateUserRequest {
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "email cannot be empty"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "password cannot be empty"))]
    pub password: String,
}

impl FieldOrder for CreateUserRequest {
    const FIELDS: &'static [&'static str] = &["email", "password"];
}

/// 로그인 요청.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "email cannot be empty"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "password cannot be empty"))]
    pub password: String,
}

impl FieldOrder for LoginRequest {
    const FIELDS: &'static [&'static str] = &["email", "password"];
}

/// 로그인 응답.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct LoginResponse {
    pub user: UserResponse,
    /// Bearer 토큰
    pub token: String,
}

/// 사용자 부분 수정 요청.
///
/// 지정한 필드만 변경합니다. 비밀번호 변경에는 기존 비밀번호가 필요합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
#[validate(schema(function = "validate_password_change"))]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "email cannot be empty"))]
    pub email: Option<String>,
    #[serde(default)]
    pub old_password: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "new password cannot be empty"))]
    pub new_password: Option<String>,
}

impl FieldOrder for UpdateUserRequest {
    const FIELDS: &'static [&'static str] = &["email", "new_password"];
}

fn validate_password_change(request: &UpdateUserRequest) -> Result<(), ValidationError> {
    if request.new_password.is_some() && request.old_password.is_none() {
        return Err(ValidationError::new("old_password_required")
            .with_message("old password is required to set a new password".into()));
    }
    Ok(())
}

impl User {
    /// 비밀번호 외의 프로필 필드를 반영합니다.
    pub fn apply_profile(&mut self, request: &UpdateUserRequest, now: DateTime<Utc>) {
        if let Some(firstname) = &request.firstname {
            self.firstname = firstname.clone();
        }
        if let Some(lastname) = &request.lastname {
            self.lastname = lastname.clone();
        }
        if let Some(email) = &request.email {
            self.email = email.clone();
        }
        self.updated_at = now;
    }
}
