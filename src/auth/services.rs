use tracing::{info, warn};

use crate::auth::{
    dto::{field, LoginRequest, RegisterRequest},
    error::{AuthError, MISSING_FIELDS, PASSWORD_MISMATCH, PASSWORD_TOO_SHORT},
    jwt::JwtKeys,
    password::{hash_password_blocking, verify_password_blocking},
    repo::UserStore,
    repo_types::NewUser,
};

pub const MIN_PASSWORD_CHARS: usize = 6;

type Check<T> = fn(&T) -> Result<(), AuthError>;

// Evaluated in order; the first failure is reported.
const REGISTER_CHECKS: &[Check<RegisterRequest>] =
    &[register_fields_present, password_long_enough, passwords_match];

const LOGIN_CHECKS: &[Check<LoginRequest>] = &[login_fields_present];

fn run_checks<T>(input: &T, checks: &[Check<T>]) -> Result<(), AuthError> {
    checks.iter().try_for_each(|check| check(input))
}

fn register_fields_present(req: &RegisterRequest) -> Result<(), AuthError> {
    let all_present = [
        &req.first_name,
        &req.last_name,
        &req.email,
        &req.password,
        &req.confirm_password,
    ]
    .into_iter()
    .all(|v| !field(v).is_empty());
    if all_present {
        Ok(())
    } else {
        Err(AuthError::Validation(MISSING_FIELDS))
    }
}

fn password_long_enough(req: &RegisterRequest) -> Result<(), AuthError> {
    if field(&req.password).chars().count() < MIN_PASSWORD_CHARS {
        return Err(AuthError::Validation(PASSWORD_TOO_SHORT));
    }
    Ok(())
}

fn passwords_match(req: &RegisterRequest) -> Result<(), AuthError> {
    if field(&req.password) != field(&req.confirm_password) {
        return Err(AuthError::Validation(PASSWORD_MISMATCH));
    }
    Ok(())
}

fn login_fields_present(req: &LoginRequest) -> Result<(), AuthError> {
    if field(&req.email).is_empty() || field(&req.password).is_empty() {
        return Err(AuthError::Validation(MISSING_FIELDS));
    }
    Ok(())
}

/// Creates the account and returns a signed session token for it.
pub async fn register(
    users: &dyn UserStore,
    keys: &JwtKeys,
    req: RegisterRequest,
) -> Result<String, AuthError> {
    run_checks(&req, REGISTER_CHECKS).inspect_err(|e| warn!(reason = %e, "register rejected"))?;

    let RegisterRequest {
        first_name,
        last_name,
        email,
        password,
        ..
    } = req;
    let email = email.unwrap_or_default();

    if users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AuthError::Conflict);
    }

    let password_hash = hash_password_blocking(password.unwrap_or_default()).await?;

    // The unique index still guards against a concurrent register slipping past the check above.
    let user = users
        .insert(NewUser {
            first_name: first_name.unwrap_or_default(),
            last_name: last_name.unwrap_or_default(),
            email,
            password_hash,
        })
        .await
        .inspect_err(|e| warn!(error = %e, "insert user failed"))?;

    let token = keys.sign(&user)?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(token)
}

/// Checks the credentials and returns a signed session token.
pub async fn login(
    users: &dyn UserStore,
    keys: &JwtKeys,
    req: LoginRequest,
) -> Result<String, AuthError> {
    run_checks(&req, LOGIN_CHECKS).inspect_err(|e| warn!(reason = %e, "login rejected"))?;

    let email = req.email.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    let Some(user) = users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AuthError::InvalidCredentials);
    };

    if !verify_password_blocking(password, user.password_hash.clone()).await? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(AuthError::InvalidCredentials);
    }

    let token = keys.sign(&user)?;
    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(token)
}
