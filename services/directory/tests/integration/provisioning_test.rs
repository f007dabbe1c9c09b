use staffdesk_directory::domain::types::EmployeeStatus;
use staffdesk_directory::error::DirectoryServiceError;
use staffdesk_directory::usecase::provisioning::{
    ArchiveEmployeeUseCase, CreateEmployeeInput, CreateEmployeeUseCase, DeleteEmployeeUseCase,
    UpdateEmployeeInput, UpdateEmployeeUseCase,
};
use staffdesk_domain::credentials::PasswordConvention;

use crate::helpers::{TestStore, test_employee};

fn create_usecase(
    store: &TestStore,
    convention: PasswordConvention,
) -> CreateEmployeeUseCase<
    crate::helpers::MockEmployeeRepo,
    crate::helpers::MockUserProjectionRepo,
    crate::helpers::FakeIdentityProvider,
> {
    CreateEmployeeUseCase {
        employees: store.employee_repo(),
        users: store.user_repo(),
        identity: store.identity_provider(),
        email_domain: "lazysquad.com".into(),
        convention,
    }
}

fn update_usecase(
    store: &TestStore,
    convention: PasswordConvention,
) -> UpdateEmployeeUseCase<
    crate::helpers::MockEmployeeRepo,
    crate::helpers::MockUserProjectionRepo,
    crate::helpers::FakeIdentityProvider,
> {
    UpdateEmployeeUseCase {
        employees: store.employee_repo(),
        users: store.user_repo(),
        identity: store.identity_provider(),
        convention,
    }
}

fn archive_usecase(
    store: &TestStore,
) -> ArchiveEmployeeUseCase<
    crate::helpers::MockEmployeeRepo,
    crate::helpers::MockUserProjectionRepo,
    crate::helpers::FakeIdentityProvider,
> {
    ArchiveEmployeeUseCase {
        employees: store.employee_repo(),
        users: store.user_repo(),
        identity: store.identity_provider(),
    }
}

fn delete_usecase(
    store: &TestStore,
) -> DeleteEmployeeUseCase<
    crate::helpers::MockEmployeeRepo,
    crate::helpers::MockUserProjectionRepo,
    crate::helpers::FakeIdentityProvider,
> {
    DeleteEmployeeUseCase {
        employees: store.employee_repo(),
        users: store.user_repo(),
        identity: store.identity_provider(),
    }
}

fn input(name: &str, digits: Option<&str>) -> CreateEmployeeInput {
    CreateEmployeeInput {
        name: name.into(),
        email: None,
        code_digits: digits.map(str::to_owned),
        phone: "+91 9876543210".into(),
        dob: "01/01/1995".into(),
        blood_group: "O+".into(),
        department: "Engineering".into(),
        role: "Employee".into(),
        designation: "Developer".into(),
        working_project: "Dashboard".into(),
        joining_date: "01/06/2023".into(),
        location: "Pune".into(),
        work_format: "Remote".into(),
        nationality: "Indian".into(),
        position: "SDE".into(),
    }
}

// ── CreateEmployee ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_provision_identity_document_and_projection_together() {
    let store = TestStore::default();
    let employee = create_usecase(&store, PasswordConvention::Code)
        .execute(input("anirudh malode", Some("0007")))
        .await
        .unwrap();

    assert_eq!(employee.code.as_str(), "LSEMP0007");
    assert_eq!(employee.name, "Anirudh Malode");
    assert_eq!(employee.email, "anirudhmalode@lazysquad.com");

    let identities = store.identities.lock().unwrap();
    assert_eq!(identities.len(), 1);
    assert_eq!(identities[0].email, "anirudhmalode@lazysquad.com");
    assert_eq!(identities[0].password, "LSEMP0007");

    let users = store.users.lock().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].uid, identities[0].uid);
    assert_eq!(users[0].avatar_text, "AM");
}

#[tokio::test]
async fn should_derive_name_code_password_when_configured() {
    let store = TestStore::default();
    create_usecase(&store, PasswordConvention::NameCode)
        .execute(input("anirudh malode", Some("0001")))
        .await
        .unwrap();

    let identities = store.identities.lock().unwrap();
    assert_eq!(identities[0].password, "AnirudhMalodeLSEMP0001");
}

#[tokio::test]
async fn should_auto_number_past_tombstones() {
    let store = TestStore::default();
    store.seed_employee(test_employee(
        "LSEMP0001",
        "Anirudh Malode",
        "anirudhmalode@lazysquad.com",
    ));
    let mut gone = test_employee("LSEMP0003", "Rahul Verma", "rahulverma@lazysquad.com");
    gone.status = EmployeeStatus::Deleted;
    store.seed_employee(gone);

    let employee = create_usecase(&store, PasswordConvention::Code)
        .execute(input("priya nair", None))
        .await
        .unwrap();
    // max + 1 over every code ever assigned, never the first gap
    assert_eq!(employee.code.as_str(), "LSEMP0004");
}

#[tokio::test]
async fn should_fail_cleanly_when_employee_codes_run_out() {
    let store = TestStore::default();
    store.seed_employee(test_employee(
        "LSEMP9999",
        "Anirudh Malode",
        "anirudhmalode@lazysquad.com",
    ));

    let result = create_usecase(&store, PasswordConvention::Code)
        .execute(input("priya nair", None))
        .await;
    assert!(matches!(result, Err(DirectoryServiceError::Internal(_))));
    assert!(store.identities.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_duplicate_active_code_and_allow_reuse_after_archive() {
    let store = TestStore::default();
    let first = create_usecase(&store, PasswordConvention::Code)
        .execute(input("anirudh malode", Some("0001")))
        .await
        .unwrap();

    let duplicate = create_usecase(&store, PasswordConvention::Code)
        .execute(input("rahul verma", Some("0001")))
        .await;
    assert!(matches!(duplicate, Err(DirectoryServiceError::DuplicateCode)));

    archive_usecase(&store).execute(first.id).await.unwrap();

    let reused = create_usecase(&store, PasswordConvention::Code)
        .execute(input("rahul verma", Some("0001")))
        .await
        .unwrap();
    assert_eq!(reused.code.as_str(), "LSEMP0001");
}

#[tokio::test]
async fn should_reuse_identity_when_derived_credentials_match() {
    let store = TestStore::default();
    let existing_uid = store.seed_identity("anirudhmalode@lazysquad.com", "LSEMP0001");

    create_usecase(&store, PasswordConvention::Code)
        .execute(input("anirudh malode", Some("0001")))
        .await
        .unwrap();

    let identities = store.identities.lock().unwrap();
    assert_eq!(identities.len(), 1, "no second identity for the email");
    let users = store.users.lock().unwrap();
    assert_eq!(users[0].uid, existing_uid);
}

#[tokio::test]
async fn should_conflict_when_email_registered_with_other_credentials() {
    let store = TestStore::default();
    store.seed_identity("anirudhmalode@lazysquad.com", "somebody-elses-password");

    let result = create_usecase(&store, PasswordConvention::Code)
        .execute(input("anirudh malode", Some("0001")))
        .await;
    assert!(matches!(
        result,
        Err(DirectoryServiceError::IdentityConflict)
    ));
    assert!(store.employees.lock().unwrap().is_empty());
}

// ── UpdateEmployee ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_not_touch_identity_on_unrelated_update() {
    let store = TestStore::default();
    let employee = create_usecase(&store, PasswordConvention::Code)
        .execute(input("anirudh malode", Some("0001")))
        .await
        .unwrap();
    let before = store.identities.lock().unwrap()[0].clone();

    update_usecase(&store, PasswordConvention::Code)
        .execute(
            employee.id,
            UpdateEmployeeInput {
                location: Some("Bengaluru".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let after = store.identities.lock().unwrap()[0].clone();
    assert_eq!(after.uid, before.uid);
    assert_eq!(after.email, before.email);
    assert_eq!(after.password, before.password);
}

#[tokio::test]
async fn should_rotate_credentials_in_place_on_code_change() {
    let store = TestStore::default();
    let employee = create_usecase(&store, PasswordConvention::Code)
        .execute(input("anirudh malode", Some("0001")))
        .await
        .unwrap();
    let original_uid = store.identities.lock().unwrap()[0].uid;

    let updated = update_usecase(&store, PasswordConvention::Code)
        .execute(
            employee.id,
            UpdateEmployeeInput {
                code_digits: Some("0009".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.code.as_str(), "LSEMP0009");

    let identities = store.identities.lock().unwrap();
    assert_eq!(identities.len(), 1);
    // same uid: rotated in place, never delete-then-recreate
    assert_eq!(identities[0].uid, original_uid);
    assert_eq!(identities[0].password, "LSEMP0009");

    let users = store.users.lock().unwrap();
    assert_eq!(users[0].code.as_str(), "LSEMP0009");
}

#[tokio::test]
async fn should_rotate_password_on_name_change_under_name_code() {
    let store = TestStore::default();
    let employee = create_usecase(&store, PasswordConvention::NameCode)
        .execute(input("anirudh malode", Some("0001")))
        .await
        .unwrap();
    let original_uid = store.identities.lock().unwrap()[0].uid;

    update_usecase(&store, PasswordConvention::NameCode)
        .execute(
            employee.id,
            UpdateEmployeeInput {
                name: Some("rahul verma".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let identities = store.identities.lock().unwrap();
    assert_eq!(identities[0].uid, original_uid);
    assert_eq!(identities[0].password, "RahulVermaLSEMP0001");
    let users = store.users.lock().unwrap();
    assert_eq!(users[0].name, "Rahul Verma");
}

// ── Archive / Delete ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_tombstone_and_strip_identity_on_archive() {
    let store = TestStore::default();
    let employee = create_usecase(&store, PasswordConvention::Code)
        .execute(input("anirudh malode", Some("0001")))
        .await
        .unwrap();

    archive_usecase(&store).execute(employee.id).await.unwrap();

    let employees = store.employees.lock().unwrap();
    assert_eq!(employees.len(), 1, "tombstone stays in the store");
    assert_eq!(employees[0].status, EmployeeStatus::Deleted);
    assert!(store.identities.lock().unwrap().is_empty());
    assert!(store.users.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_report_counts_once_then_zeros_on_repeat_delete() {
    let store = TestStore::default();
    let employee = create_usecase(&store, PasswordConvention::Code)
        .execute(input("anirudh malode", Some("0001")))
        .await
        .unwrap();

    let first = delete_usecase(&store).execute(employee.id).await.unwrap();
    assert_eq!(first.identities_deleted, 1);
    assert_eq!(first.users_deleted, 1);
    assert_eq!(first.employees_deleted, 1);

    let second = delete_usecase(&store).execute(employee.id).await.unwrap();
    assert_eq!(second.identities_deleted, 0);
    assert_eq!(second.users_deleted, 0);
    assert_eq!(second.employees_deleted, 0);
}
