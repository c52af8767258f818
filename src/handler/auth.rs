use std::sync::Arc;

use axum::{
    http::header,
    response::IntoResponse,
    routing::post,
    Extension, Json, Router,
};
use axum_extra::extract::cookie::Cookie;
use chrono::Utc;
use validator::Validate;

use crate::{
    db::userdb::UserExt,
    dtos::{
        userdtos::{
            FilterUserDto, LoginData, MobileLoginDto, RegisterProviderDto, RegisterUserDto,
            UserData, VerifyOtpDto,
        },
        ApiResponse,
    },
    error::{ErrorMessage, HttpError},
    mail::mails::send_otp_email,
    models::usermodel::{User, UserRole},
    utils::{otp_generator::generate_otp, token},
    AppState,
};

pub fn auth_handler() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/provider/register", post(register_provider))
        .route("/verify-otp", post(verify_otp))
        .route("/login", post(login))
        .route("/login/verify-otp", post(verify_login_otp))
}

/// Maps unique-constraint violations from the users table to the taxonomy
/// the clients already know.
fn map_user_conflict(err: sqlx::Error) -> HttpError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or_default();
            if constraint.contains("single_admin") {
                return HttpError::conflict(ErrorMessage::AdminExist.to_string());
            }
            if constraint.contains("email") {
                return HttpError::conflict(ErrorMessage::EmailExist.to_string());
            }
            if constraint.contains("username") {
                return HttpError::conflict(ErrorMessage::UsernameExist.to_string());
            }
            if constraint.contains("mobile") {
                return HttpError::conflict(ErrorMessage::MobileExist.to_string());
            }
        }
    }
    HttpError::server_error(err.to_string())
}

/// Issues a login code for the user. A still-valid code is re-sent as is so
/// rapid retries cannot mint fresh codes; otherwise a new one is stored.
/// The code only ever leaves over SMS and email.
async fn issue_otp(app_state: &Arc<AppState>, user: &User) -> Result<(), HttpError> {
    let now = Utc::now();

    let (user, otp) = if user.is_otp_valid(now) {
        match &user.otp {
            Some(otp) => (user.clone(), otp.clone()),
            None => return Err(HttpError::server_error(ErrorMessage::ServerError.to_string())),
        }
    } else {
        let otp = generate_otp();
        let updated = app_state
            .db_client
            .set_user_otp(user.id, &otp, now)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;
        (updated, otp)
    };

    if let Err(e) = app_state
        .sms
        .send_otp(&user.country_code, &user.mobile, &otp)
        .await
    {
        tracing::warn!("failed to send OTP sms to {}: {}", user.mobile, e);
    }

    if let Err(e) = send_otp_email(&user.email, &user.username, &otp).await {
        tracing::warn!("failed to send OTP email to {}: {}", user.email, e);
    }

    Ok(())
}

pub async fn register(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<RegisterUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(HttpError::validation)?;

    let role = body.role.unwrap_or(UserRole::Customer);

    if role == UserRole::Admin {
        let existing_admin = app_state
            .db_client
            .get_admin_user()
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;
        if existing_admin.is_some() {
            return Err(HttpError::conflict(ErrorMessage::AdminExist.to_string()));
        }
    }

    let existing = app_state
        .db_client
        .get_user(None, None, Some((&body.country_code, &body.mobile)))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let (user, created) = match existing {
        Some(user) => (user, false),
        None => {
            let user = app_state
                .db_client
                .save_customer(
                    body.username.clone(),
                    body.email.clone(),
                    body.country_code.clone(),
                    body.mobile.clone(),
                    role,
                )
                .await
                .map_err(map_user_conflict)?;
            (user, true)
        }
    };

    issue_otp(&app_state, &user).await?;

    let data = UserData {
        user: FilterUserDto::filter_user(&user),
    };

    if created {
        Ok(ApiResponse::created(
            "Account created. OTP sent to your mobile number",
            Some(data),
        ))
    } else {
        Ok(ApiResponse::ok("OTP sent to your mobile number", Some(data)))
    }
}

pub async fn register_provider(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<RegisterProviderDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(HttpError::validation)?;
    body.validate_provider_fields().map_err(HttpError::validation)?;

    let existing = app_state
        .db_client
        .get_user(None, None, Some((&body.country_code, &body.mobile)))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let (user, created) = match existing {
        Some(user) => (user, false),
        None => {
            // validate_provider_fields guarantees these are present.
            let experience_year = body.experience_year.unwrap_or_default();
            let service_skill = body.service_skill.clone().unwrap_or_default();
            let service_km = body.service_km.unwrap_or_default();

            let user = app_state
                .db_client
                .save_provider(
                    body.username.clone(),
                    body.email.clone(),
                    body.country_code.clone(),
                    body.mobile.clone(),
                    experience_year,
                    service_skill,
                    service_km,
                    body.document_type.clone(),
                    body.document_file.clone(),
                )
                .await
                .map_err(map_user_conflict)?;
            (user, true)
        }
    };

    issue_otp(&app_state, &user).await?;

    let data = UserData {
        user: FilterUserDto::filter_user(&user),
    };

    if created {
        Ok(ApiResponse::created(
            "Provider account created. OTP sent to your mobile number",
            Some(data),
        ))
    } else {
        Ok(ApiResponse::ok("OTP sent to your mobile number", Some(data)))
    }
}

pub async fn verify_otp(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<VerifyOtpDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(HttpError::validation)?;

    let user = app_state
        .db_client
        .get_user(None, None, Some((&body.country_code, &body.mobile)))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(ErrorMessage::UserNotFound.to_string()))?;

    let now = Utc::now();

    if !user.is_otp_valid(now) {
        return Err(HttpError::bad_request(ErrorMessage::OtpExpired.to_string()));
    }

    if !user.otp_matches(&body.otp) {
        return Err(HttpError::bad_request(ErrorMessage::OtpInvalid.to_string()));
    }

    let user = app_state
        .db_client
        .consume_user_otp(user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let message = match user.role {
        UserRole::ServiceProvider => "Account verified. Your profile is under review by the admin.",
        _ => "Account verified successfully",
    };

    Ok(ApiResponse::ok(
        message,
        Some(UserData {
            user: FilterUserDto::filter_user(&user),
        }),
    ))
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<MobileLoginDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(HttpError::validation)?;

    let user = app_state
        .db_client
        .get_user(None, None, Some((&body.country_code, &body.mobile)))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(ErrorMessage::UserNotFound.to_string()))?;

    issue_otp(&app_state, &user).await?;

    Ok(ApiResponse::<()>::ok(
        "OTP sent to your registered mobile number",
        None,
    ))
}

pub async fn verify_login_otp(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<VerifyOtpDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(HttpError::validation)?;

    let user = app_state
        .db_client
        .get_user(None, None, Some((&body.country_code, &body.mobile)))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(ErrorMessage::UserNotFound.to_string()))?;

    let now = Utc::now();

    if !user.is_otp_valid(now) {
        return Err(HttpError::bad_request(ErrorMessage::OtpExpired.to_string()));
    }

    if !user.otp_matches(&body.otp) {
        return Err(HttpError::bad_request(ErrorMessage::OtpInvalid.to_string()));
    }

    if user.is_blocked {
        let reason = user
            .blocked_reason
            .clone()
            .unwrap_or_else(|| "Your account has been blocked".to_string());
        return Err(HttpError::forbidden(reason));
    }

    if user.role == UserRole::ServiceProvider && !user.is_admin_verified {
        return Err(HttpError::forbidden(
            "Your profile is under review by the admin. Please be patient.",
        ));
    }

    let user = app_state
        .db_client
        .consume_user_otp(user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if let Err(e) = app_state
        .db_client
        .record_system_log(
            "login",
            Some(user.id),
            &format!("User {} logged in", user.username),
        )
        .await
    {
        tracing::warn!("failed to record login for {}: {}", user.id, e);
    }

    let token = token::create_token(
        &user.id.to_string(),
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let cookie = Cookie::build(("token", token.clone()))
        .path("/")
        .max_age(time::Duration::minutes(app_state.env.jwt_maxage))
        .http_only(true)
        .build();

    let data = LoginData {
        token,
        user: FilterUserDto::filter_user(&user),
    };

    let mut response = ApiResponse::ok("Login successful", Some(data)).into_response();
    response.headers_mut().append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error(ErrorMessage::ServerError.to_string()))?,
    );

    Ok(response)
}
