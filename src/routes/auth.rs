use crate::{
    auth::{hash_password_blocking, verify_password_blocking, MessageResponse, TokenResponse},
    error::AppError,
    models::{Credentials, User},
    state::AppState,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Sign up a new user
///
/// Stores the username with a bcrypt hash of the password.
///
/// ## Responses:
/// - `201 Created`: `{"message": "User created successfully"}`.
/// - `400 Bad Request`: the username is taken, or the body is not valid JSON.
/// - `422 Unprocessable Entity`: the username or password fails validation.
/// - `500 Internal Server Error`: store or hashing failure.
#[post("/signup")]
pub async fn signup(
    state: web::Data<AppState>,
    signup_data: web::Json<Credentials>,
) -> Result<impl Responder, AppError> {
    signup_data.validate()?;
    let Credentials { username, password } = signup_data.into_inner();

    if state.db.find_user_by_username(&username).await?.is_some() {
        return Err(AppError::Conflict("User already exists".into()));
    }

    let password_hash = hash_password_blocking(password, state.bcrypt_cost).await?;
    let user = User::new(username, password_hash);

    // The unique index still catches a concurrent signup for the same name.
    state.db.insert_user(&user).await.map_err(|e| match e {
        AppError::Conflict(_) => AppError::Conflict("User already exists".into()),
        other => other,
    })?;

    log::info!("Created user {} ({})", user.username, user.id);

    Ok(HttpResponse::Created().json(MessageResponse {
        message: "User created successfully".into(),
    }))
}

/// Log in
///
/// Checks the credentials and returns a bearer token valid for the configured lifetime.
/// An unknown username and a wrong password produce the same `400 Invalid credentials`.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<Credentials>,
) -> Result<impl Responder, AppError> {
    let Credentials { username, password } = login_data.into_inner();

    let user = match state.db.find_user_by_username(&username).await? {
        Some(user) => user,
        None => {
            log::warn!("Login attempt for unknown user {}", username);
            return Err(AppError::InvalidCredentials);
        }
    };

    if !verify_password_blocking(password, user.password_hash.clone()).await? {
        log::warn!("Wrong password for user {}", user.username);
        return Err(AppError::InvalidCredentials);
    }

    let token = state.tokens.generate_token(user.id)?;
    log::info!("User {} logged in", user.username);

    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}
