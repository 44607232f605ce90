use sanrakshan_domain::entry::EntryStatus;
use sanrakshan_domain::id::UserId;
use sanrakshan_storage::domain::types::{ScanAction, VerifyOutcome};
use sanrakshan_storage::error::StorageServiceError;
use sanrakshan_storage::usecase::claim::{ClaimCodeUseCase, ClaimInput};
use sanrakshan_storage::usecase::verify::VerifyCodeUseCase;

use crate::helpers::{
    MockCodeRepo, MockEntryRepo, MockScanRepo, MockStore, seed_entry, seed_staff, seed_student,
};

fn claim_usecase(store: &MockStore) -> ClaimCodeUseCase<MockCodeRepo, MockEntryRepo, MockScanRepo> {
    ClaimCodeUseCase {
        codes: store.codes(),
        entries: store.entries(),
        scans: store.scans(),
    }
}

fn claim(code: &str, staff: UserId) -> ClaimInput {
    ClaimInput {
        code: code.to_owned(),
        staff,
    }
}

#[tokio::test]
async fn should_claim_active_code_and_deactivate_it() {
    let store = MockStore::new();
    let owner = seed_student(&store, "asha", "2024BCS0042");
    let staff = seed_staff(&store);
    let created = seed_entry(&store, owner.id, "A7B2-9XY1", &["laptop", "backpack"]).await;

    let receipt = claim_usecase(&store)
        .execute(claim("a7b2-9xy1", staff.id))
        .await
        .unwrap();

    assert_eq!(receipt.entry_id, created.entry_id);
    assert_eq!(receipt.code.as_str(), "A7B2-9XY1");
    assert_eq!(receipt.claimed_by, staff.id);
    assert_eq!(receipt.item_count, 2);

    let entry = store.entry(created.entry_id).unwrap();
    assert_eq!(entry.status, EntryStatus::Claimed);
    assert_eq!(entry.claimed_by, Some(staff.id));
    assert_eq!(entry.claimed_at, Some(receipt.claimed_at));

    let code = store.code_for(created.entry_id).unwrap();
    assert!(!code.is_active);
    assert_eq!(code.deactivated_at, Some(receipt.claimed_at));
}

#[tokio::test]
async fn should_reject_second_claim_and_leave_entry_unchanged() {
    let store = MockStore::new();
    let owner = seed_student(&store, "asha", "2024BCS0042");
    let staff = seed_staff(&store);
    let created = seed_entry(&store, owner.id, "A7B2-9XY1", &["laptop"]).await;

    let first = claim_usecase(&store)
        .execute(claim("A7B2-9XY1", staff.id))
        .await
        .unwrap();
    let other_staff = UserId(uuid::Uuid::now_v7());
    let second = claim_usecase(&store)
        .execute(claim("A7B2-9XY1", other_staff))
        .await;

    assert!(
        matches!(second, Err(StorageServiceError::AlreadyClaimed)),
        "expected AlreadyClaimed, got {second:?}"
    );
    let entry = store.entry(created.entry_id).unwrap();
    assert_eq!(entry.claimed_by, Some(staff.id));
    assert_eq!(entry.claimed_at, Some(first.claimed_at));
}

#[tokio::test]
async fn should_let_exactly_one_concurrent_claim_win() {
    let store = MockStore::new();
    let owner = seed_student(&store, "asha", "2024BCS0042");
    let created = seed_entry(&store, owner.id, "A7B2-9XY1", &["laptop"]).await;
    let desk_a = UserId(uuid::Uuid::now_v7());
    let desk_b = UserId(uuid::Uuid::now_v7());

    let usecase_a = claim_usecase(&store);
    let usecase_b = claim_usecase(&store);
    let (a, b) = tokio::join!(
        usecase_a.execute(claim("A7B2-9XY1", desk_a)),
        usecase_b.execute(claim("A7B2-9XY1", desk_b)),
    );

    let results = [a, b];
    let wins: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    let losses = results
        .iter()
        .filter(|r| matches!(r, Err(StorageServiceError::AlreadyClaimed)))
        .count();
    assert_eq!(wins.len(), 1, "results: {results:?}");
    assert_eq!(losses, 1, "results: {results:?}");

    let entry = store.entry(created.entry_id).unwrap();
    assert_eq!(entry.status, EntryStatus::Claimed);
    assert_eq!(entry.claimed_by, Some(wins[0].claimed_by));
}

#[tokio::test]
async fn should_report_unknown_code() {
    let store = MockStore::new();
    let staff = seed_staff(&store);
    let result = claim_usecase(&store)
        .execute(claim("ZZZZ-ZZZZ", staff.id))
        .await;
    assert!(
        matches!(result, Err(StorageServiceError::CodeNotFound)),
        "expected CodeNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_malformed_code() {
    let store = MockStore::new();
    let staff = seed_staff(&store);
    let result = claim_usecase(&store).execute(claim("A7B2", staff.id)).await;
    assert!(
        matches!(result, Err(StorageServiceError::InvalidCode)),
        "expected InvalidCode, got {result:?}"
    );
}

#[tokio::test]
async fn should_refuse_expired_entry_and_keep_code_active() {
    let store = MockStore::new();
    let owner = seed_student(&store, "asha", "2024BCS0042");
    let staff = seed_staff(&store);
    let created = seed_entry(&store, owner.id, "A7B2-9XY1", &["laptop"]).await;
    store.with(|d| {
        let entry = d.entries.iter_mut().find(|e| e.id == created.entry_id).unwrap();
        entry.status = EntryStatus::Expired;
    });

    let result = claim_usecase(&store)
        .execute(claim("A7B2-9XY1", staff.id))
        .await;

    assert!(
        matches!(
            result,
            Err(StorageServiceError::EntryNotClaimable(EntryStatus::Expired))
        ),
        "expected EntryNotClaimable(Expired), got {result:?}"
    );
    let entry = store.entry(created.entry_id).unwrap();
    assert_eq!(entry.status, EntryStatus::Expired);
    assert_eq!(entry.claimed_by, None);
    assert!(store.code_for(created.entry_id).unwrap().is_active);
}

#[tokio::test]
async fn should_complete_store_verify_claim_flow() {
    let store = MockStore::new();
    let owner = seed_student(&store, "asha", "2024BCS0042");
    let staff = seed_staff(&store);
    let created = seed_entry(&store, owner.id, "A7B2-9XY1", &["backpack", "laptop"]).await;
    assert_eq!(created.code.as_str(), "A7B2-9XY1");

    let verify = VerifyCodeUseCase {
        codes: store.codes(),
        entries: store.entries(),
        accounts: store.accounts(),
        profiles: store.profiles(),
        scans: store.scans(),
    };

    match verify.execute(staff.id, "a7b29xy1").await.unwrap() {
        VerifyOutcome::Verified(details) => {
            let names: Vec<&str> = details.items.iter().map(|i| i.description.as_str()).collect();
            assert_eq!(names, vec!["backpack", "laptop"]);
            assert_eq!(details.owner.user_id, owner.id);
            assert!(details.can_claim);
        }
        other => panic!("expected Verified, got {other:?}"),
    }

    let receipt = claim_usecase(&store)
        .execute(claim("a7b29xy1", staff.id))
        .await
        .unwrap();
    assert_eq!(receipt.entry_id, created.entry_id);
    assert_eq!(receipt.item_count, 2);

    match verify.execute(staff.id, "A7B2-9XY1").await.unwrap() {
        VerifyOutcome::Inactive { claimed_at, .. } => {
            assert_eq!(claimed_at, Some(receipt.claimed_at));
        }
        other => panic!("expected Inactive, got {other:?}"),
    }
    assert_eq!(
        store.scan_actions(),
        [ScanAction::Verified, ScanAction::Claimed, ScanAction::Inactive]
    );
}

// ── Scan log ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_record_claim_then_repeat_attempt() {
    let store = MockStore::new();
    let owner = seed_student(&store, "asha", "2024BCS0042");
    let staff = seed_staff(&store);
    let created = seed_entry(&store, owner.id, "A7B2-9XY1", &["laptop"]).await;
    let other_staff = UserId(uuid::Uuid::now_v7());

    claim_usecase(&store)
        .execute(claim("A7B2-9XY1", staff.id))
        .await
        .unwrap();
    let repeat = claim_usecase(&store)
        .execute(claim("A7B2-9XY1", other_staff))
        .await;

    assert!(matches!(repeat, Err(StorageServiceError::AlreadyClaimed)));
    assert_eq!(
        store.scan_actions(),
        [ScanAction::Claimed, ScanAction::AlreadyClaimed]
    );
    store.with(|d| {
        assert_eq!(d.scans[0].scanned_by, staff.id);
        assert_eq!(d.scans[1].scanned_by, other_staff);
        assert!(d.scans.iter().all(|s| s.entry_id == Some(created.entry_id)));
    });
}

#[tokio::test]
async fn should_record_unknown_and_unclaimable_attempts() {
    let store = MockStore::new();
    let owner = seed_student(&store, "asha", "2024BCS0042");
    let staff = seed_staff(&store);
    let created = seed_entry(&store, owner.id, "A7B2-9XY1", &["laptop"]).await;
    store.with(|d| {
        let entry = d.entries.iter_mut().find(|e| e.id == created.entry_id).unwrap();
        entry.status = EntryStatus::Expired;
    });

    let usecase = claim_usecase(&store);
    assert!(usecase.execute(claim("ZZZZ-ZZZZ", staff.id)).await.is_err());
    assert!(usecase.execute(claim("A7B2-9XY1", staff.id)).await.is_err());
    assert!(usecase.execute(claim("A7B2", staff.id)).await.is_err());

    assert_eq!(
        store.scan_actions(),
        [ScanAction::NotFound, ScanAction::NotClaimable]
    );
    store.with(|d| {
        assert_eq!(d.scans[0].entry_id, None);
        assert_eq!(d.scans[1].entry_id, Some(created.entry_id));
        assert!(d.scans.iter().all(|s| !s.action.is_valid()));
    });
}

#[tokio::test]
async fn should_keep_committed_claim_when_scan_log_fails() {
    let store = MockStore::new();
    let owner = seed_student(&store, "asha", "2024BCS0042");
    let staff = seed_staff(&store);
    let created = seed_entry(&store, owner.id, "A7B2-9XY1", &["laptop"]).await;
    store.with(|d| d.fail_scan_writes = true);

    let receipt = claim_usecase(&store)
        .execute(claim("A7B2-9XY1", staff.id))
        .await
        .unwrap();

    assert_eq!(receipt.entry_id, created.entry_id);
    assert_eq!(
        store.entry(created.entry_id).unwrap().status,
        EntryStatus::Claimed
    );
    assert!(store.scan_actions().is_empty());
}
