use staffdesk_directory::domain::types::{EmployeeStatus, UserProjection};
use staffdesk_directory::error::DirectoryServiceError;
use staffdesk_directory::usecase::session::{LoginInput, LoginUseCase, validate_token};
use staffdesk_domain::code::EmployeeCode;
use staffdesk_domain::credentials::PasswordConvention;

use crate::helpers::{TEST_JWT_SECRET, TestStore, test_employee};

fn login_usecase(
    store: &TestStore,
) -> LoginUseCase<
    crate::helpers::MockEmployeeRepo,
    crate::helpers::MockUserProjectionRepo,
    crate::helpers::FakeIdentityProvider,
> {
    LoginUseCase {
        employees: store.employee_repo(),
        users: store.user_repo(),
        identity: store.identity_provider(),
        jwt_secret: TEST_JWT_SECRET.into(),
        convention: PasswordConvention::Code,
    }
}

#[tokio::test]
async fn should_login_and_issue_validating_token() {
    let store = TestStore::default();
    store.seed_employee(test_employee(
        "LSEMP0001",
        "Anirudh Malode",
        "anirudhmalode@lazysquad.com",
    ));
    let uid = store.seed_identity("anirudhmalode@lazysquad.com", "LSEMP0001");

    let out = login_usecase(&store)
        .execute(LoginInput {
            email: "anirudhmalode@lazysquad.com".into(),
            password: "LSEMP0001".into(),
        })
        .await
        .unwrap();

    assert_eq!(out.user.uid, uid);
    let claims = validate_token(&out.access_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(claims.sub, uid.to_string());
    assert_eq!(claims.role, "Employee");
    assert_eq!(claims.exp, out.access_token_exp);
}

#[tokio::test]
async fn should_reject_wrong_password() {
    let store = TestStore::default();
    store.seed_employee(test_employee(
        "LSEMP0001",
        "Anirudh Malode",
        "anirudhmalode@lazysquad.com",
    ));
    store.seed_identity("anirudhmalode@lazysquad.com", "LSEMP0001");

    let result = login_usecase(&store)
        .execute(LoginInput {
            email: "anirudhmalode@lazysquad.com".into(),
            password: "LSEMP0002".into(),
        })
        .await;
    assert!(matches!(
        result,
        Err(DirectoryServiceError::InvalidCredential)
    ));
}

#[tokio::test]
async fn should_reject_unknown_email() {
    let store = TestStore::default();
    let result = login_usecase(&store)
        .execute(LoginInput {
            email: "nobody@lazysquad.com".into(),
            password: "LSEMP0001".into(),
        })
        .await;
    assert!(matches!(
        result,
        Err(DirectoryServiceError::InvalidCredential)
    ));
}

#[tokio::test]
async fn should_backfill_missing_identity_on_login() {
    let store = TestStore::default();
    store.seed_employee(test_employee(
        "LSEMP0001",
        "Anirudh Malode",
        "anirudhmalode@lazysquad.com",
    ));
    // no identity seeded: provisioned before the identity store existed

    let out = login_usecase(&store)
        .execute(LoginInput {
            email: "anirudhmalode@lazysquad.com".into(),
            password: "LSEMP0001".into(),
        })
        .await
        .unwrap();

    let identities = store.identities.lock().unwrap();
    assert_eq!(identities.len(), 1);
    assert_eq!(identities[0].uid, out.user.uid);
    assert_eq!(identities[0].password, "LSEMP0001");
}

#[tokio::test]
async fn should_not_backfill_with_wrong_password() {
    let store = TestStore::default();
    store.seed_employee(test_employee(
        "LSEMP0001",
        "Anirudh Malode",
        "anirudhmalode@lazysquad.com",
    ));

    let result = login_usecase(&store)
        .execute(LoginInput {
            email: "anirudhmalode@lazysquad.com".into(),
            password: "not-the-derived-one".into(),
        })
        .await;
    assert!(matches!(
        result,
        Err(DirectoryServiceError::InvalidCredential)
    ));
    assert!(store.identities.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_reject_tombstoned_employee() {
    let store = TestStore::default();
    let mut employee = test_employee(
        "LSEMP0001",
        "Anirudh Malode",
        "anirudhmalode@lazysquad.com",
    );
    employee.status = EmployeeStatus::Deleted;
    store.seed_employee(employee);
    store.seed_identity("anirudhmalode@lazysquad.com", "LSEMP0001");

    let result = login_usecase(&store)
        .execute(LoginInput {
            email: "anirudhmalode@lazysquad.com".into(),
            password: "LSEMP0001".into(),
        })
        .await;
    assert!(matches!(
        result,
        Err(DirectoryServiceError::InvalidCredential)
    ));
}

#[tokio::test]
async fn should_refresh_stale_projection_on_login() {
    let store = TestStore::default();
    store.seed_employee(test_employee(
        "LSEMP0001",
        "Anirudh Malode",
        "anirudhmalode@lazysquad.com",
    ));
    let uid = store.seed_identity("anirudhmalode@lazysquad.com", "LSEMP0001");
    store.users.lock().unwrap().push(UserProjection {
        uid,
        email: "anirudhmalode@lazysquad.com".into(),
        name: "Stale Name".into(),
        code: EmployeeCode::parse("LSEMP0001").unwrap(),
        role: "Employee".into(),
        avatar_text: "SN".into(),
    });

    login_usecase(&store)
        .execute(LoginInput {
            email: "anirudhmalode@lazysquad.com".into(),
            password: "LSEMP0001".into(),
        })
        .await
        .unwrap();

    let users = store.users.lock().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "Anirudh Malode");
    assert_eq!(users[0].avatar_text, "AM");
}
