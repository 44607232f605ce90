use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use sanrakshan_auth_types::identity::IdentityHeaders;
use sanrakshan_domain::id::UserId;
use sanrakshan_domain::profile::Department;

use crate::error::StorageServiceError;
use crate::state::AppState;
use crate::usecase::account::{GetMeUseCase, RegisterAccountUseCase, RegisterInput};
use crate::usecase::password_reset::{
    ConfirmPasswordResetInput, ConfirmPasswordResetUseCase, RequestPasswordResetInput,
    RequestPasswordResetUseCase,
};

// ── POST /accounts ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateAccountRequest {
    pub username: String,
    pub email: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub password: String,
    pub roll_number: String,
    pub department: String,
    pub year: u8,
    pub phone: Option<String>,
    pub hostel_room: Option<String>,
}

#[derive(Serialize)]
pub struct CreateAccountResponse {
    pub id: UserId,
}

pub async fn create_account(
    State(state): State<AppState>,
    Json(body): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<CreateAccountResponse>), StorageServiceError> {
    let usecase = RegisterAccountUseCase {
        accounts: state.account_repo(),
        hasher: state.password_hasher(),
    };
    let id = usecase
        .execute(RegisterInput {
            username: body.username,
            email: body.email,
            first_name: body.first_name,
            last_name: body.last_name,
            password: body.password,
            roll_number: body.roll_number,
            department: body.department,
            year: body.year,
            phone: body.phone,
            hostel_room: body.hostel_room,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(CreateAccountResponse { id })))
}

// ── GET /accounts/@me ────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ProfileResponse {
    pub roll_number: String,
    pub department: Department,
    pub year: u8,
    pub phone: Option<String>,
    pub hostel_room: Option<String>,
}

#[derive(Serialize)]
pub struct MeResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: u8,
    pub profile: Option<ProfileResponse>,
    #[serde(serialize_with = "sanrakshan_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub async fn get_me(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<MeResponse>, StorageServiceError> {
    let usecase = GetMeUseCase {
        accounts: state.account_repo(),
        profiles: state.profile_repo(),
    };
    let (account, profile) = usecase.execute(identity.user_id).await?;

    Ok(Json(MeResponse {
        id: account.id,
        username: account.username,
        email: account.email,
        first_name: account.first_name,
        last_name: account.last_name,
        role: account.role.as_u8(),
        profile: profile.map(|p| ProfileResponse {
            roll_number: p.roll_number,
            department: p.department,
            year: p.year,
            phone: p.phone,
            hostel_room: p.hostel_room,
        }),
        created_at: account.created_at,
    }))
}

// ── POST /accounts/password-reset ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(body): Json<PasswordResetRequest>,
) -> Result<StatusCode, StorageServiceError> {
    let usecase = RequestPasswordResetUseCase {
        accounts: state.account_repo(),
        resets: state.reset_repo(),
    };
    usecase
        .execute(RequestPasswordResetInput { email: body.email })
        .await?;
    Ok(StatusCode::ACCEPTED)
}

// ── PATCH /accounts/password-reset ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct ConfirmPasswordResetRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

pub async fn confirm_password_reset(
    State(state): State<AppState>,
    Json(body): Json<ConfirmPasswordResetRequest>,
) -> Result<StatusCode, StorageServiceError> {
    let usecase = ConfirmPasswordResetUseCase {
        accounts: state.account_repo(),
        resets: state.reset_repo(),
        hasher: state.password_hasher(),
    };
    usecase
        .execute(ConfirmPasswordResetInput {
            email: body.email,
            code: body.code,
            new_password: body.new_password,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
