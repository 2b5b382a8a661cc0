use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use tracing::{info, instrument};
use uuid::Uuid;

use super::domain::{AuthSession, AuthUser, ChangePasswordInput, LoginInput, RegisterInput, TokenClaims};
use super::errors::AuthError;
use super::repository::AuthRepository;

/// Password applied by the reset flow until the user picks a new one.
pub const RESET_PASSWORD: &str = "changeme-123";

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub password_algorithm: String,
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self {
        Self { repo, cfg }
    }

    fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string())
    }

    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
    }

    /// Register a new user with a hashed password.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        if input.password.len() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        if self.repo.find_user_by_email(&input.email).await?.is_some() {
            return Err(AuthError::Conflict);
        }

        let user = self.repo.create_user(&input.email, &input.name).await?;
        let hash = self.hash_password(&input.password)?;
        let _cred = self
            .repo
            .upsert_password(user.id, hash, self.cfg.password_algorithm.clone())
            .await?;
        info!(user_id = %user.id, email = %user.email, "user_registered");
        Ok(user)
    }

    /// Authenticate a user and optionally issue a token.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self
            .repo
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self
            .repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if !self.verify_password(&input.password, &cred.password_hash)? {
            return Err(AuthError::Unauthorized);
        }

        let mut token = None;
        if let Some(secret) = &self.cfg.jwt_secret {
            let exp = (chrono::Utc::now() + chrono::Duration::hours(12)).timestamp() as usize;
            let claims = TokenClaims { sub: user.email.clone(), uid: user.id.to_string(), exp };
            token = Some(
                encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
                    .map_err(|e| AuthError::TokenError(e.to_string()))?,
            );
        }

        Ok(AuthSession { user, token })
    }

    /// Decode and validate a bearer token issued by `login`.
    pub fn verify_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let secret = self
            .cfg
            .jwt_secret
            .as_ref()
            .ok_or_else(|| AuthError::TokenError("no jwt secret configured".into()))?;
        let key = DecodingKey::from_secret(secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        let data = decode::<TokenClaims>(token, &key, &validation)
            .map_err(|e| AuthError::TokenError(e.to_string()))?;
        Ok(data.claims)
    }

    /// Resolve the user a token belongs to.
    pub async fn current_user(&self, token: &str) -> Result<AuthUser, AuthError> {
        let claims = self.verify_token(token)?;
        let uid = Uuid::parse_str(&claims.uid).map_err(|e| AuthError::TokenError(e.to_string()))?;
        self.repo.find_user_by_id(uid).await?.ok_or(AuthError::NotFound)
    }

    /// Replace the user's password after checking the old one.
    #[instrument(skip(self, input))]
    pub async fn change_password(&self, user_id: Uuid, input: ChangePasswordInput) -> Result<(), AuthError> {
        if input.new_password.len() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        let cred = self
            .repo
            .get_credentials(user_id)
            .await?
            .ok_or(AuthError::NotFound)?;
        if !self.verify_password(&input.old_password, &cred.password_hash)? {
            return Err(AuthError::Unauthorized);
        }
        let hash = self.hash_password(&input.new_password)?;
        self.repo
            .upsert_password(user_id, hash, self.cfg.password_algorithm.clone())
            .await?;
        info!(user_id = %user_id, "password_changed");
        Ok(())
    }

    /// Reset the user's password to the fixed default.
    pub async fn reset_password(&self, user_id: Uuid) -> Result<(), AuthError> {
        let hash = self.hash_password(RESET_PASSWORD)?;
        self.repo
            .upsert_password(user_id, hash, self.cfg.password_algorithm.clone())
            .await?;
        info!(user_id = %user_id, "password_reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn service(secret: Option<&str>) -> AuthService<MockAuthRepository> {
        AuthService::new(
            Arc::new(MockAuthRepository::default()),
            AuthConfig {
                jwt_secret: secret.map(Into::into),
                password_algorithm: "argon2".into(),
            },
        )
    }

    #[tokio::test]
    async fn register_then_login_round_trip() {
        let svc = service(Some("test-secret"));
        let user = svc
            .register(RegisterInput {
                email: "bob@example.com".into(),
                name: "Bob".into(),
                password: "S3curePass!".into(),
            })
            .await
            .unwrap();

        let session = svc
            .login(LoginInput { email: "bob@example.com".into(), password: "S3curePass!".into() })
            .await
            .unwrap();
        assert_eq!(session.user.id, user.id);
        let token = session.token.expect("token issued when secret configured");

        let claims = svc.verify_token(&token).unwrap();
        assert_eq!(claims.uid, user.id.to_string());

        let me = svc.current_user(&token).await.unwrap();
        assert_eq!(me.email, "bob@example.com");
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let svc = service(None);
        let input = RegisterInput {
            email: "dup@example.com".into(),
            name: "Dup".into(),
            password: "longenough".into(),
        };
        svc.register(input.clone()).await.unwrap();
        assert!(matches!(svc.register(input).await, Err(AuthError::Conflict)));
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let svc = service(Some("s"));
        svc.register(RegisterInput {
            email: "eve@example.com".into(),
            name: "Eve".into(),
            password: "rightpass".into(),
        })
        .await
        .unwrap();

        let res = svc
            .login(LoginInput { email: "eve@example.com".into(), password: "wrongpass".into() })
            .await;
        assert!(matches!(res, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn change_password_requires_old_one() {
        let svc = service(Some("s"));
        let user = svc
            .register(RegisterInput {
                email: "carol@example.com".into(),
                name: "Carol".into(),
                password: "originalpw".into(),
            })
            .await
            .unwrap();

        let denied = svc
            .change_password(
                user.id,
                ChangePasswordInput { old_password: "guess".into(), new_password: "replacement".into() },
            )
            .await;
        assert!(matches!(denied, Err(AuthError::Unauthorized)));

        svc.change_password(
            user.id,
            ChangePasswordInput { old_password: "originalpw".into(), new_password: "replacement".into() },
        )
        .await
        .unwrap();

        let session = svc
            .login(LoginInput { email: "carol@example.com".into(), password: "replacement".into() })
            .await
            .unwrap();
        assert!(session.token.is_some());
    }

    #[tokio::test]
    async fn tampered_token_is_rejected() {
        let svc = service(Some("secret-a"));
        svc.register(RegisterInput {
            email: "tok@example.com".into(),
            name: "Tok".into(),
            password: "longenough".into(),
        })
        .await
        .unwrap();
        let session = svc
            .login(LoginInput { email: "tok@example.com".into(), password: "longenough".into() })
            .await
            .unwrap();
        let token = session.token.unwrap();

        let other = service(Some("secret-b"));
        assert!(matches!(other.verify_token(&token), Err(AuthError::TokenError(_))));
    }
}
