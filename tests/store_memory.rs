// self
use authcode::{
	_preludet::*,
	auth::{
		AuthCode, AuthCodeTarget, CodeAssociation, CodeSecret, FieldName, IndependentTarget,
		RecordAction, RecordReference, TableName,
	},
	store::{AuthCodeStore, MemoryStore},
};

const NOW: OffsetDateTime = TEST_EPOCH;

fn independent(code: &str, identifier: &str, valid_until: OffsetDateTime) -> AuthCode {
	AuthCode {
		code: CodeSecret::new(code),
		target: AuthCodeTarget::Independent(IndependentTarget {
			identifier: identifier.into(),
			context: "survey".into(),
		}),
		valid_until,
	}
}

fn reference(uid: u64, uid_field: &str, hidden_field: &str) -> RecordReference {
	RecordReference {
		table: TableName::new("pages").expect("Table fixture should be valid."),
		uid,
		uid_field: FieldName::new(uid_field).expect("Uid field fixture should be valid."),
		hidden_field: FieldName::new(hidden_field).expect("Hidden field fixture should be valid."),
	}
}

fn record(code: &str, reference: RecordReference) -> AuthCode {
	AuthCode {
		code: CodeSecret::new(code),
		target: AuthCodeTarget::Record { reference, action: RecordAction::EnableRecord },
		valid_until: NOW + Duration::hours(1),
	}
}

#[tokio::test]
async fn fetch_never_returns_expired_codes() {
	let store = MemoryStore::default();

	store.insert(independent("edge", "form-1", NOW)).await.expect("Insert should succeed.");
	store
		.insert(independent("live", "form-2", NOW + Duration::SECOND))
		.await
		.expect("Insert should succeed.");

	assert!(store.fetch("edge", NOW).await.expect("Fetch should succeed.").is_none());
	assert!(store.fetch("live", NOW).await.expect("Fetch should succeed.").is_some());
	assert!(store.fetch("missing", NOW).await.expect("Fetch should succeed.").is_none());
	assert!(
		store.fetch("live", NOW + Duration::SECOND).await.expect("Fetch should succeed.").is_none()
	);
}

#[tokio::test]
async fn delete_expired_is_idempotent() {
	let store = MemoryStore::default();

	store
		.insert(independent("old", "form-1", NOW - Duration::DAY))
		.await
		.expect("Insert should succeed.");
	store
		.insert(independent("new", "form-2", NOW + Duration::DAY))
		.await
		.expect("Insert should succeed.");

	assert_eq!(store.delete_expired(NOW).await.expect("Sweep should succeed."), 1);
	assert_eq!(store.delete_expired(NOW).await.expect("Sweep should succeed."), 0);
	assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn record_matching_requires_all_four_fields() {
	let store = MemoryStore::default();

	store.insert(record("exact", reference(7, "uid", "hidden"))).await.expect("Insert.");
	store.insert(record("other-uid", reference(8, "uid", "hidden"))).await.expect("Insert.");
	store.insert(record("other-uid-field", reference(7, "pid", "hidden"))).await.expect("Insert.");
	store.insert(record("other-hidden", reference(7, "uid", "disabled"))).await.expect("Insert.");

	let target = reference(7, "uid", "hidden");
	let removed = store
		.delete_matching_record(&target.table, target.uid, &target.uid_field, &target.hidden_field)
		.await
		.expect("Delete should succeed.");

	assert_eq!(removed, 1);
	assert_eq!(store.len(), 3);
	assert!(store.fetch("exact", NOW).await.expect("Fetch should succeed.").is_none());
}

#[tokio::test]
async fn independent_matching_uses_identifier_and_context() {
	let store = MemoryStore::default();
	let valid_until = NOW + Duration::HOUR;

	store.insert(independent("a", "form-42", valid_until)).await.expect("Insert.");
	store.insert(independent("b", "form-43", valid_until)).await.expect("Insert.");

	let removed = store
		.delete_matching(&CodeAssociation::Independent {
			identifier: "form-42".into(),
			context: "other".into(),
		})
		.await
		.expect("Delete should succeed.");

	assert_eq!(removed, 0);
	assert_eq!(
		store
			.delete_matching_independent("form-42", "survey")
			.await
			.expect("Delete should succeed."),
		1
	);
	assert_eq!(store.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_take_has_single_winner() {
	let store = Arc::new(MemoryStore::default());

	store.insert(independent("once", "form-1", NOW + Duration::HOUR)).await.expect("Insert.");

	let handles = (0..8)
		.map(|_| {
			let store = store.clone();

			tokio::spawn(async move { store.take("once", NOW).await })
		})
		.collect::<Vec<_>>();
	let mut winners = 0;

	for handle in handles {
		let taken = handle.await.expect("Task should not panic.").expect("Take should succeed.");

		if taken.is_some() {
			winners += 1;
		}
	}

	assert_eq!(winners, 1);
	assert!(store.is_empty());
}
