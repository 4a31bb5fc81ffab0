use anyhow::anyhow;
use tracing::{info, instrument};

use memories_auth::create_access_token;
use memories_config::JwtConfig;
use memories_core::{AppError, hash_password, verify_password};
use memories_db::UserRepository;
use memories_models::users::normalize_email;
use memories_models::{AuthResponse, NewUser, SignInRequest, SignUpRequest, User};

use crate::metrics::{track_jwt_issued, track_signin_failure, track_signin_success, track_signup};

pub struct UserService;

impl UserService {
    fn issue_token(user: User, jwt_config: &JwtConfig) -> Result<AuthResponse, AppError> {
        let token = create_access_token(&user.id.to_string(), &user.email, &user.name, jwt_config)?;
        track_jwt_issued();
        Ok(AuthResponse {
            result: user,
            token,
        })
    }

    #[instrument(skip(users, jwt_config, dto), fields(user.email = %dto.email))]
    pub async fn sign_up(
        users: &dyn UserRepository,
        jwt_config: &JwtConfig,
        dto: SignUpRequest,
    ) -> Result<AuthResponse, AppError> {
        if !dto.passwords_match() {
            return Err(AppError::bad_request(anyhow!("Passwords don't match")));
        }

        let email = normalize_email(&dto.email);
        if users.find_by_email(&email).await?.is_some() {
            return Err(AppError::bad_request(anyhow!("User already exists")));
        }

        let password_hash = hash_password(&dto.password)?;
        let new_user = NewUser::new(&dto.full_name(), &email, password_hash);

        // A concurrent sign-up may have taken the email since the lookup.
        let user = users
            .insert(&new_user)
            .await?
            .ok_or_else(|| AppError::bad_request(anyhow!("User already exists")))?;

        track_signup();
        info!(user.id = %user.id, "User signed up");
        Self::issue_token(user, jwt_config)
    }

    #[instrument(skip(users, jwt_config, dto), fields(user.email = %dto.email))]
    pub async fn sign_in(
        users: &dyn UserRepository,
        jwt_config: &JwtConfig,
        dto: SignInRequest,
    ) -> Result<AuthResponse, AppError> {
        let Some(credentials) = users.find_by_email(&normalize_email(&dto.email)).await? else {
            track_signin_failure("unknown_user");
            return Err(AppError::not_found(anyhow!("User doesn't exist")));
        };

        if !verify_password(&dto.password, &credentials.password_hash)? {
            track_signin_failure("invalid_password");
            return Err(AppError::bad_request(anyhow!("Invalid credentials")));
        }

        track_signin_success();
        Self::issue_token(credentials.user, jwt_config)
    }
}
