//! 사용자 서비스.
//!
//! 가입 시 비밀번호를 Argon2로 해싱하고, 로그인에 성공하면 JWT를 발급합니다.
//! 이메일은 [`normalize_email`]로 정규화한 값으로 저장하고 비교합니다.

use std::sync::Arc;

use chrono::Utc;
use portflux_core::{
    normalize_email, validate_request, AuthConfig, CreateUserRequest, CreationResponse, Filter,
    LoginRequest, LoginResponse, MultiCreationResponse, Pagination, PortfluxError, PortfluxResult,
    Repository, Role, UpdateUserRequest, User, UserResponse,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::observe;
use crate::auth::{
    create_token, hash_password_blocking, verify_password_blocking, Claims, PasswordError,
};

const ENTITY: &str = "user";

fn invalid_credentials() -> PortfluxError {
    PortfluxError::Unauthorized("invalid email or password".to_string())
}

fn id_not_found(id: Uuid) -> PortfluxError {
    PortfluxError::NotFound(format!("ID {} not found", id))
}

fn email_taken(email: &str) -> PortfluxError {
    PortfluxError::Conflict(format!("email {} is already registered", email))
}

async fn hash(password: String) -> PortfluxResult<String> {
    hash_password_blocking(password)
        .await
        .map_err(|e| PortfluxError::Internal(e.to_string()))
}

/// 비밀번호 일치 여부. 해싱 작업 자체가 실패한 경우만 에러입니다.
async fn password_matches(password: String, hash: String) -> PortfluxResult<bool> {
    match verify_password_blocking(password, hash).await {
        Ok(()) => Ok(true),
        Err(PasswordError::TaskFailed(e)) => Err(PortfluxError::Internal(e)),
        Err(e) => {
            debug!(error = %e, "Password verification failed");
            Ok(false)
        }
    }
}

/// 사용자 서비스.
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn Repository<User>>,
    auth: AuthConfig,
}

impl UserService {
    pub fn new(repository: Arc<dyn Repository<User>>, auth: AuthConfig) -> Self {
        Self { repository, auth }
    }

    /// 이메일과 비밀번호를 확인하고 Access Token을 발급합니다.
    ///
    /// 존재하지 않는 이메일과 틀린 비밀번호는 같은 에러를 반환합니다.
    pub async fn login(&self, mut request: LoginRequest) -> PortfluxResult<LoginResponse> {
        let result: PortfluxResult<LoginResponse> = async {
            request.email = normalize_email(&request.email);
            validate_request(&request)?;

            let user = self
                .find_by_email(&request.email)
                .await?
                .ok_or_else(invalid_credentials)?;

            if !password_matches(request.password, user.password_hash.clone()).await? {
                warn!(user_id = %user.id, "Login rejected");
                return Err(invalid_credentials());
            }

            let claims = Claims::new(
                user.id,
                user.email.clone(),
                user.role,
                self.auth.token_expiry_minutes,
            );
            let token = create_token(&claims, &self.auth.jwt_secret)
                .map_err(|e| PortfluxError::Internal(e.to_string()))?;

            info!(user_id = %user.id, "User logged in");
            Ok(LoginResponse {
                user: user.into(),
                token,
            })
        }
        .await;
        observe(ENTITY, "login", result)
    }

    pub async fn create(&self, mut request: CreateUserRequest) -> PortfluxResult<CreationResponse> {
        let result: PortfluxResult<CreationResponse> = async {
            request.email = normalize_email(&request.email);
            validate_request(&request)?;
            if self.find_by_email(&request.email).await?.is_some() {
                return Err(email_taken(&request.email));
            }

            let user = self.new_user(request).await?;
            let inserted_id = self.repository.create(user).await?;
            info!(user_id = %inserted_id, "User registered");
            Ok(CreationResponse { inserted_id })
        }
        .await;
        observe(ENTITY, "create", result)
    }

    /// 일괄 가입. 하나라도 유효하지 않거나 이메일이 중복되면 아무도 저장하지 않습니다.
    pub async fn create_many(
        &self,
        mut requests: Vec<CreateUserRequest>,
    ) -> PortfluxResult<MultiCreationResponse> {
        let result: PortfluxResult<MultiCreationResponse> = async {
            if requests.is_empty() {
                return Err(PortfluxError::Validation(
                    "at least one item is required".to_string(),
                ));
            }
            for request in &mut requests {
                request.email = normalize_email(&request.email);
                validate_request(request)?;
            }

            let mut seen: Vec<&str> = Vec::with_capacity(requests.len());
            for request in &requests {
                if seen.contains(&request.email.as_str())
                    || self.find_by_email(&request.email).await?.is_some()
                {
                    return Err(email_taken(&request.email));
                }
                seen.push(&request.email);
            }

            let mut users = Vec::with_capacity(requests.len());
            for request in requests {
                users.push(self.new_user(request).await?);
            }

            let inserted_ids = self.repository.create_many(users).await?;
            info!(count = inserted_ids.len(), "Users registered");
            Ok(MultiCreationResponse { inserted_ids })
        }
        .await;
        observe(ENTITY, "create_many", result)
    }

    /// 목록 조회. 결과가 없으면 빈 목록을 반환합니다.
    pub async fn get_all(&self, page: Pagination) -> PortfluxResult<Vec<UserResponse>> {
        debug!(skip = ?page.skip, take = ?page.take, "Listing users");
        let result = match self.repository.get(&Filter::new(), page).await {
            Ok(users) => Ok(users.into_iter().map(UserResponse::from).collect()),
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(e),
        };
        observe(ENTITY, "get_all", result)
    }

    pub async fn get_by_id(&self, id: Uuid) -> PortfluxResult<UserResponse> {
        debug!(user_id = %id, "Fetching user");
        let result = self.load(id).await.map(UserResponse::from);
        observe(ENTITY, "get_by_id", result)
    }

    pub async fn get_by_email(&self, email: &str) -> PortfluxResult<UserResponse> {
        debug!(%email, "Fetching user by email");
        let result = match self.find_by_email(&normalize_email(email)).await {
            Ok(Some(user)) => Ok(user.into()),
            Ok(None) => Err(PortfluxError::NotFound(format!("email {} not found", email))),
            Err(e) => Err(e),
        };
        observe(ENTITY, "get_by_email", result)
    }

    /// 부분 수정.
    ///
    /// 새 비밀번호는 기존 비밀번호가 일치할 때만 설정됩니다.
    pub async fn update(&self, id: Uuid, mut request: UpdateUserRequest) -> PortfluxResult<()> {
        let result: PortfluxResult<()> = async {
            if let Some(email) = request.email.as_mut() {
                *email = normalize_email(email);
            }
            validate_request(&request)?;
            let mut user = self.load(id).await?;

            if let Some(new_password) = &request.new_password {
                let old_password = request.old_password.clone().unwrap_or_default();
                if !password_matches(old_password, user.password_hash.clone()).await? {
                    return Err(PortfluxError::Unauthorized(
                        "old password is incorrect".to_string(),
                    ));
                }
                user.password_hash = hash(new_password.clone()).await?;
            }

            if let Some(email) = &request.email {
                if let Some(owner) = self.find_by_email(email).await? {
                    if owner.id != id {
                        return Err(email_taken(email));
                    }
                }
            }

            user.apply_profile(&request, Utc::now());
            self.repository.update(id, user).await.map_err(|e| {
                if e.is_not_found() {
                    id_not_found(id)
                } else {
                    e
                }
            })?;
            info!(user_id = %id, "User updated");
            Ok(())
        }
        .await;
        observe(ENTITY, "update", result)
    }

    pub async fn delete(&self, id: Uuid) -> PortfluxResult<()> {
        let result = match self.repository.delete(id).await {
            Ok(()) => {
                info!(user_id = %id, "User deleted");
                Ok(())
            }
            Err(e) if e.is_not_found() => Err(id_not_found(id)),
            Err(e) => Err(e),
        };
        observe(ENTITY, "delete", result)
    }

    /// 정규화와 검증을 마친 요청으로 사용자를 만듭니다.
    async fn new_user(&self, request: CreateUserRequest) -> PortfluxResult<User> {
        let password_hash = hash(request.password).await?;
        let role = if self.auth.is_admin_email(&request.email) {
            Role::Admin
        } else {
            Role::Member
        };
        let now = Utc::now();

        Ok(User {
            id: Uuid::new_v4(),
            firstname: request.firstname,
            lastname: request.lastname,
            email: request.email,
            password_hash,
            role,
            created_at: now,
            updated_at: now,
        })
    }

    async fn load(&self, id: Uuid) -> PortfluxResult<User> {
        self.repository.get_by_id(id).await.map_err(|e| {
            if e.is_not_found() {
                id_not_found(id)
            } else {
                e
            }
        })
    }

    async fn find_by_email(&self, email: &str) -> PortfluxResult<Option<User>> {
        match self
            .repository
            .get(&Filter::new().eq("email", email), Pagination::new(None, Some(1)))
            .await
        {
            Ok(users) => Ok(users.into_iter().next()),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::decode_token;
    use portflux_core::MemoryRepository;

    fn service() -> UserService {
        let auth = AuthConfig {
            admin_emails: vec!["root@example.com".to_string()],
            ..Default::default()
        };
        UserService::new(Arc::new(MemoryRepository::<User>::new()), auth)
    }

    fn signup(email: &str, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            firstname: "Ada".into(),
            lastname: "Lovelace".into(),
            email: email.into(),
            password: password.into(),
        }
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let service = service();
        let id = service
            .create(signup("ada@example.com", "engine"))
            .await
            .unwrap()
            .inserted_id;

        let response = service.login(login("ada@example.com", "engine")).await.unwrap();
        assert_eq!(response.user.id, id);
        assert_eq!(response.user.role, Role::Member);

        let claims = decode_token(&response.token, &service.auth.jwt_secret)
            .unwrap()
            .claims;
        assert_eq!(claims.user_id(), Some(id));
        assert_eq!(claims.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let service = service();
        service.create(signup("ada@example.com", "engine")).await.unwrap();

        let wrong_password = service
            .login(login("ada@example.com", "difference"))
            .await
            .unwrap_err();
        let unknown_email = service
            .login(login("grace@example.com", "engine"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, PortfluxError::Unauthorized(_)));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let service = service();
        service.create(signup("ada@example.com", "engine")).await.unwrap();

        let err = service
            .create(signup("ada@example.com", "other"))
            .await
            .unwrap_err();
        assert!(matches!(err, PortfluxError::Conflict(_)));

        let err = service
            .create_many(vec![
                signup("grace@example.com", "cobol"),
                signup("grace@example.com", "cobol"),
            ])
            .await
            .unwrap_err();
        assert!(matches!(err, PortfluxError::Conflict(_)));
        assert_eq!(service.get_all(Pagination::all()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_admin_email_gets_admin_role() {
        let service = service();
        let id = service
            .create(signup("root@example.com", "toor"))
            .await
            .unwrap()
            .inserted_id;
        assert_eq!(service.get_by_id(id).await.unwrap().role, Role::Admin);
    }

    #[tokio::test]
    async fn test_get_by_email_missing() {
        let err = service().get_by_email("nobody@example.com").await.unwrap_err();
        assert_eq!(err.to_string(), "email nobody@example.com not found");
    }

    #[tokio::test]
    async fn test_password_change_requires_matching_old_password() {
        let service = service();
        let id = service
            .create(signup("ada@example.com", "engine"))
            .await
            .unwrap()
            .inserted_id;

        let err = service
            .update(
                id,
                UpdateUserRequest {
                    old_password: Some("wrong".into()),
                    new_password: Some("analytical".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, PortfluxError::Unauthorized(_)));

        service
            .update(
                id,
                UpdateUserRequest {
                    old_password: Some("engine".into()),
                    new_password: Some("analytical".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(service.login(login("ada@example.com", "engine")).await.is_err());
        assert!(service.login(login("ada@example.com", "analytical")).await.is_ok());
    }

    #[tokio::test]
    async fn test_email_change_to_taken_address_conflicts() {
        let service = service();
        let ada = service
            .create(signup("ada@example.com", "engine"))
            .await
            .unwrap()
            .inserted_id;
        service.create(signup("grace@example.com", "cobol")).await.unwrap();

        let err = service
            .update(
                ada,
                UpdateUserRequest {
                    email: Some("grace@example.com".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, PortfluxError::Conflict(_)));

        // 자기 이메일로 다시 저장하는 것은 허용
        service
            .update(
                ada,
                UpdateUserRequest {
                    email: Some("ada@example.com".into()),
                    firstname: Some("Augusta".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(service.get_by_id(ada).await.unwrap().firstname, "Augusta");
    }

    #[tokio::test]
    async fn test_email_case_variant_cannot_claim_admin() {
        let service = service();
        service.create(signup("root@example.com", "toor")).await.unwrap();

        let err = service
            .create(signup("ROOT@example.com", "mallory"))
            .await
            .unwrap_err();
        assert!(matches!(err, PortfluxError::Conflict(_)));

        let err = service
            .create_many(vec![signup(" Root@Example.com ", "mallory")])
            .await
            .unwrap_err();
        assert!(matches!(err, PortfluxError::Conflict(_)));
        assert_eq!(service.get_all(Pagination::all()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_email_normalized_on_every_lookup() {
        let service = service();
        let id = service
            .create(signup("  Ada@Example.COM ", "engine"))
            .await
            .unwrap()
            .inserted_id;

        let user = service.get_by_id(id).await.unwrap();
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.role, Role::Member);

        assert!(service.login(login("ADA@example.com", "engine")).await.is_ok());
        assert_eq!(service.get_by_email("Ada@Example.com").await.unwrap().id, id);

        let grace = service
            .create(signup("grace@example.com", "cobol"))
            .await
            .unwrap()
            .inserted_id;
        let err = service
            .update(
                grace,
                UpdateUserRequest {
                    email: Some("ADA@EXAMPLE.COM".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, PortfluxError::Conflict(_)));
    }
}
