use chrono::{Duration, Utc};
use uuid::Uuid;

use sanrakshan_domain::id::UserId;
use sanrakshan_storage::domain::types::{
    MAX_ACTIVE_RESET_CODES, PASSWORD_RESET_REQUESTED, PasswordResetCode,
};
use sanrakshan_storage::error::StorageServiceError;
use sanrakshan_storage::usecase::password_reset::{
    ConfirmPasswordResetInput, ConfirmPasswordResetUseCase, RequestPasswordResetInput,
    RequestPasswordResetUseCase,
};

use crate::helpers::{MockAccountRepo, MockHasher, MockResetRepo, MockStore, seed_student};

fn request_usecase(store: &MockStore) -> RequestPasswordResetUseCase<MockAccountRepo, MockResetRepo> {
    RequestPasswordResetUseCase {
        accounts: store.accounts(),
        resets: store.resets(),
    }
}

fn confirm_usecase(
    store: &MockStore,
) -> ConfirmPasswordResetUseCase<MockAccountRepo, MockResetRepo, MockHasher> {
    ConfirmPasswordResetUseCase {
        accounts: store.accounts(),
        resets: store.resets(),
        hasher: MockHasher,
    }
}

fn issued_code(store: &MockStore, user_id: UserId) -> String {
    store.with(|d| {
        d.resets
            .iter()
            .rev()
            .find(|r| r.user_id == user_id)
            .map(|r| r.code.clone())
            .unwrap()
    })
}

fn confirm(email: &str, code: &str, new_password: &str) -> ConfirmPasswordResetInput {
    ConfirmPasswordResetInput {
        email: email.to_owned(),
        code: code.to_owned(),
        new_password: new_password.to_owned(),
    }
}

// ── Request ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_store_code_and_queue_email() {
    let store = MockStore::new();
    let account = seed_student(&store, "asha", "2024BCS0042");

    request_usecase(&store)
        .execute(RequestPasswordResetInput {
            email: account.email.to_uppercase(),
        })
        .await
        .unwrap();

    store.with(|d| {
        assert_eq!(d.resets.len(), 1);
        let reset = &d.resets[0];
        assert_eq!(reset.code.len(), 6);
        assert!(reset.expires_at > Utc::now() + Duration::minutes(14));

        assert_eq!(d.outbox.len(), 1);
        let event = &d.outbox[0].event;
        assert_eq!(event.kind, PASSWORD_RESET_REQUESTED);
        assert_eq!(event.user_id, Some(account.id));
        assert_eq!(event.payload["email"], account.email.as_str());
        assert_eq!(event.payload["code"], reset.code.as_str());
        assert_eq!(
            event.idempotency_key,
            format!("{PASSWORD_RESET_REQUESTED}:{}", reset.id)
        );
    });
}

#[tokio::test]
async fn should_report_unknown_email() {
    let store = MockStore::new();
    let result = request_usecase(&store)
        .execute(RequestPasswordResetInput {
            email: "nobody@iiitk.ac.in".to_owned(),
        })
        .await;
    assert!(
        matches!(result, Err(StorageServiceError::AccountNotFound)),
        "expected AccountNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_limit_live_codes_per_account() {
    let store = MockStore::new();
    let account = seed_student(&store, "asha", "2024BCS0042");
    let usecase = request_usecase(&store);

    for _ in 0..MAX_ACTIVE_RESET_CODES {
        usecase
            .execute(RequestPasswordResetInput {
                email: account.email.clone(),
            })
            .await
            .unwrap();
    }
    let result = usecase
        .execute(RequestPasswordResetInput {
            email: account.email.clone(),
        })
        .await;
    assert!(
        matches!(result, Err(StorageServiceError::TooManyResetCodes)),
        "expected TooManyResetCodes, got {result:?}"
    );
    store.with(|d| assert_eq!(d.outbox.len(), MAX_ACTIVE_RESET_CODES as usize));
}

// ── Confirm ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_set_new_password_and_consume_code() {
    let store = MockStore::new();
    let account = seed_student(&store, "asha", "2024BCS0042");
    request_usecase(&store)
        .execute(RequestPasswordResetInput {
            email: account.email.clone(),
        })
        .await
        .unwrap();
    let code = issued_code(&store, account.id);

    confirm_usecase(&store)
        .execute(confirm(&account.email, &code, "brand new secret"))
        .await
        .unwrap();

    store.with(|d| {
        let stored = d.accounts.iter().find(|a| a.id == account.id).unwrap();
        assert_eq!(stored.password_hash, "hashed:brand new secret");
        assert!(d.resets[0].used_at.is_some());
    });

    let reuse = confirm_usecase(&store)
        .execute(confirm(&account.email, &code, "another secret"))
        .await;
    assert!(
        matches!(reuse, Err(StorageServiceError::InvalidResetCode)),
        "expected InvalidResetCode, got {reuse:?}"
    );
}

#[tokio::test]
async fn should_reject_wrong_or_expired_code() {
    let store = MockStore::new();
    let account = seed_student(&store, "asha", "2024BCS0042");
    let now = Utc::now();
    store.with(|d| {
        d.resets.push(PasswordResetCode {
            id: Uuid::now_v7(),
            user_id: account.id,
            code: "111111".to_owned(),
            expires_at: now - Duration::seconds(1),
            used_at: None,
            created_at: now - Duration::minutes(16),
        });
    });

    for (email, code) in [
        (account.email.as_str(), "111111"),
        (account.email.as_str(), "999999"),
        ("nobody@iiitk.ac.in", "111111"),
    ] {
        let result = confirm_usecase(&store)
            .execute(confirm(email, code, "brand new secret"))
            .await;
        assert!(
            matches!(result, Err(StorageServiceError::InvalidResetCode)),
            "expected InvalidResetCode for {email}/{code}, got {result:?}"
        );
    }
    store.with(|d| {
        let stored = d.accounts.iter().find(|a| a.id == account.id).unwrap();
        assert_eq!(stored.password_hash, "hashed:old-password");
    });
}

#[tokio::test]
async fn should_reject_weak_new_password() {
    let store = MockStore::new();
    let account = seed_student(&store, "asha", "2024BCS0042");
    request_usecase(&store)
        .execute(RequestPasswordResetInput {
            email: account.email.clone(),
        })
        .await
        .unwrap();
    let code = issued_code(&store, account.id);

    let result = confirm_usecase(&store)
        .execute(confirm(&account.email, &code, "short"))
        .await;
    assert!(
        matches!(result, Err(StorageServiceError::WeakPassword)),
        "expected WeakPassword, got {result:?}"
    );
    store.with(|d| assert!(d.resets[0].used_at.is_none()));
}

#[tokio::test]
async fn should_consume_code_once_under_concurrency() {
    let store = MockStore::new();
    let account = seed_student(&store, "asha", "2024BCS0042");
    request_usecase(&store)
        .execute(RequestPasswordResetInput {
            email: account.email.clone(),
        })
        .await
        .unwrap();
    let code = issued_code(&store, account.id);

    let a = confirm_usecase(&store);
    let b = confirm_usecase(&store);
    let (ra, rb) = tokio::join!(
        a.execute(confirm(&account.email, &code, "first new secret")),
        b.execute(confirm(&account.email, &code, "second new secret")),
    );

    let ok = [ra.is_ok(), rb.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(ok, 1, "results: {ra:?} / {rb:?}");
}
