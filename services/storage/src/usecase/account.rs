use chrono::Utc;
use uuid::Uuid;

use sanrakshan_domain::id::UserId;
use sanrakshan_domain::profile::{Department, RollNumber, is_valid_phone, is_valid_year};
use sanrakshan_domain::user::UserRole;

use crate::domain::repository::{AccountRepository, PasswordHasher, ProfileRepository};
use crate::domain::types::{
    Account, MIN_PASSWORD_LEN, StudentProfile, normalize_email, validate_username,
};
use crate::error::StorageServiceError;

fn invalid(reason: impl Into<String>) -> StorageServiceError {
    StorageServiceError::InvalidRegistration(reason.into())
}

pub(crate) fn check_password(password: &str) -> Result<(), StorageServiceError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(StorageServiceError::WeakPassword);
    }
    Ok(())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub roll_number: String,
    pub department: String,
    pub year: u8,
    pub phone: Option<String>,
    pub hostel_room: Option<String>,
}

pub struct RegisterAccountUseCase<A, H>
where
    A: AccountRepository,
    H: PasswordHasher,
{
    pub accounts: A,
    pub hasher: H,
}

impl<A, H> RegisterAccountUseCase<A, H>
where
    A: AccountRepository,
    H: PasswordHasher,
{
    /// Create a student account with its profile.
    pub async fn execute(&self, input: RegisterInput) -> Result<UserId, StorageServiceError> {
        let username = input.username.trim().to_owned();
        if !validate_username(&username) {
            return Err(invalid("username must be 3-30 letters, digits, '.', '-' or '_'"));
        }
        let email = normalize_email(&input.email).ok_or_else(|| invalid("email is malformed"))?;
        let first_name = input.first_name.trim().to_owned();
        let last_name = input.last_name.trim().to_owned();
        if first_name.is_empty() {
            return Err(invalid("first name is required"));
        }

        let roll = RollNumber::parse(&input.roll_number).map_err(|e| invalid(e.to_string()))?;
        let department: Department = input
            .department
            .trim()
            .to_ascii_uppercase()
            .parse()
            .map_err(|_| invalid("unknown department"))?;
        if !department.accepts(&roll) {
            return Err(invalid(format!(
                "roll number {roll} does not belong to department {department}"
            )));
        }
        if !is_valid_year(input.year) {
            return Err(invalid("year must be between 1 and 5"));
        }
        let phone = optional(input.phone);
        if phone.as_deref().is_some_and(|p| !is_valid_phone(p)) {
            return Err(invalid("phone must be 9-15 digits"));
        }
        check_password(&input.password)?;

        let password_hash = self.hasher.hash(&input.password)?;
        let now = Utc::now();
        let id = UserId(Uuid::now_v7());
        let account = Account {
            id,
            username,
            email,
            first_name,
            last_name,
            password_hash,
            role: UserRole::Student,
            created_at: now,
            updated_at: now,
        };
        let profile = StudentProfile {
            id: Uuid::now_v7(),
            user_id: id,
            roll_number: roll.as_str().to_owned(),
            department,
            year: input.year,
            phone,
            hostel_room: optional(input.hostel_room),
            created_at: now,
            updated_at: now,
        };

        self.accounts.create_with_profile(&account, &profile).await?;
        tracing::info!(user_id = %id, roll_number = %roll, "student account registered");
        Ok(id)
    }
}

// ── GetMe ────────────────────────────────────────────────────────────────────

pub struct GetMeUseCase<A, P>
where
    A: AccountRepository,
    P: ProfileRepository,
{
    pub accounts: A,
    pub profiles: P,
}

impl<A, P> GetMeUseCase<A, P>
where
    A: AccountRepository,
    P: ProfileRepository,
{
    /// Account plus student profile; staff accounts have no profile.
    pub async fn execute(
        &self,
        user_id: UserId,
    ) -> Result<(Account, Option<StudentProfile>), StorageServiceError> {
        let account = self
            .accounts
            .find_by_id(user_id)
            .await?
            .ok_or(StorageServiceError::AccountNotFound)?;
        let profile = self.profiles.find_by_user(user_id).await?;
        Ok((account, profile))
    }
}
