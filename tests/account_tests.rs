//! User account service tests

mod common;

use common::Fixture;
use docuhub::core::Role;
use docuhub::notify::{EventKind, RecordingNotifier};
use docuhub::services::{NewUser, UserAccountService, WorkflowError};
use docuhub::store::users;

fn new_user(username: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        display_name: "Jane Smith".to_string(),
        role: Role::Submitter,
        department: "Drafting".to_string(),
        ..NewUser::default()
    }
}

#[test]
fn test_create_user_writes_profile_and_sends_setup() {
    let mut fx = Fixture::new();
    let notifier = RecordingNotifier::new();
    let admin = fx.admin.actor();

    let user = UserAccountService::new(&mut fx.store, &notifier)
        .create_user(
            &admin,
            new_user("jsmith"),
            Some("https://docuhub.local/setup/abc".to_string()),
        )
        .unwrap();

    // The profile fields exist from the moment the account does.
    let loaded = users::by_username(fx.store.conn(), "jsmith").unwrap().unwrap();
    assert_eq!(loaded.id, user.id);
    assert_eq!(loaded.department, "Drafting");
    assert_eq!(loaded.role, Role::Submitter);
    assert!(loaded.is_active);

    assert_eq!(notifier.count_of(EventKind::AccountSetup), 1);
}

#[test]
fn test_create_user_rejects_duplicates_and_non_admins() {
    let mut fx = Fixture::new();
    let notifier = RecordingNotifier::new();
    let admin = fx.admin.actor();

    UserAccountService::new(&mut fx.store, &notifier)
        .create_user(&admin, new_user("jsmith"), None)
        .unwrap();

    let result = UserAccountService::new(&mut fx.store, &notifier)
        .create_user(&admin, new_user("jsmith"), None);
    assert!(matches!(result, Err(WorkflowError::DuplicateUsername { .. })));

    let approver = fx.approver.actor();
    let result = UserAccountService::new(&mut fx.store, &notifier)
        .create_user(&approver, new_user("someone"), None);
    assert!(matches!(result, Err(WorkflowError::NotAuthorized { .. })));
}

#[test]
fn test_role_changes_are_admin_gated_and_never_self() {
    let mut fx = Fixture::new();
    let notifier = RecordingNotifier::new();
    let admin = fx.admin.actor();

    let user = UserAccountService::new(&mut fx.store, &notifier)
        .set_role(&admin, "owner", Role::Approver)
        .unwrap();
    assert_eq!(user.role, Role::Approver);

    let result =
        UserAccountService::new(&mut fx.store, &notifier).set_role(&admin, "admin", Role::Viewer);
    assert!(matches!(result, Err(WorkflowError::CannotModifySelf)));

    let approver = fx.approver.actor();
    let result =
        UserAccountService::new(&mut fx.store, &notifier).set_role(&approver, "owner", Role::Admin);
    assert!(matches!(result, Err(WorkflowError::NotAuthorized { .. })));
}

#[test]
fn test_deactivated_accounts_lose_access() {
    let mut fx = Fixture::new();
    let notifier = RecordingNotifier::new();
    let admin = fx.admin.actor();

    UserAccountService::new(&mut fx.store, &notifier)
        .set_active(&admin, "owner", false)
        .unwrap();

    let loaded = users::by_username(fx.store.conn(), "owner").unwrap().unwrap();
    assert!(!loaded.is_active);

    // An inactive actor fails every permission predicate.
    let inactive = loaded.actor();
    assert!(!docuhub::core::permissions::is_project_manager(&inactive));
}

#[test]
fn test_password_reset_for_self_or_by_admin() {
    let mut fx = Fixture::new();
    let notifier = RecordingNotifier::new();

    let owner = fx.owner.actor();
    let delivered = UserAccountService::new(&mut fx.store, &notifier)
        .request_password_reset(&owner, "owner", "temp-1234")
        .unwrap();
    assert!(delivered);
    assert_eq!(notifier.count_of(EventKind::PasswordReset), 1);

    // A plain user cannot reset someone else's password.
    let result = UserAccountService::new(&mut fx.store, &notifier)
        .request_password_reset(&owner, "approver", "temp-1234");
    assert!(matches!(result, Err(WorkflowError::NotAuthorized { .. })));

    let admin = fx.admin.actor();
    let delivered = UserAccountService::new(&mut fx.store, &notifier)
        .request_password_reset(&admin, "approver", "temp-1234")
        .unwrap();
    assert!(delivered);
}
