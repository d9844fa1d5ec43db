//! Unit tests for the store module

use super::*;
use crate::core::actor::{RequestMeta, Role};
use crate::core::identity::{new_receipt_id, GroupId};
use crate::core::status::{ApprovalAction, DocumentStatus, ProjectStatus};
use crate::entities::{ApprovalEvent, Document, Project, ProjectGroup, SubmissionRecord, User};
use chrono::Utc;

fn seed_user(store: &Store, username: &str, role: Role) -> User {
    let user = User::new(username, format!("{username}@example.com"), role);
    users::insert(store.conn(), &user).unwrap();
    user
}

fn seed_group(store: &Store, owner: &User) -> ProjectGroup {
    let code = groups::next_code(store.conn()).unwrap();
    let group = ProjectGroup::new(code, "Water Treatment Plant", "Utilities Dept", owner.id);
    groups::insert(store.conn(), &group).unwrap();
    group
}

fn seed_project(store: &Store, group: &ProjectGroup, owner: &User) -> Project {
    let project = Project::first_version(group.id, &group.name, "", owner.id);
    projects::insert_as_latest(store.conn(), &project).unwrap();
    project
}

#[test]
fn test_schema_is_idempotent() {
    let store = Store::open_in_memory().unwrap();
    // Re-running the schema batch must not fail
    store.conn().execute_batch(super::SCHEMA).unwrap();
}

#[test]
fn test_user_roundtrip() {
    let store = Store::open_in_memory().unwrap();
    let user = seed_user(&store, "jsmith", Role::Approver);

    let loaded = users::by_username(store.conn(), "jsmith").unwrap().unwrap();
    assert_eq!(loaded.id, user.id);
    assert_eq!(loaded.role, Role::Approver);

    // Username lookup is case-insensitive
    assert!(users::by_username(store.conn(), "JSMITH").unwrap().is_some());
}

#[test]
fn test_duplicate_username_rejected() {
    let store = Store::open_in_memory().unwrap();
    seed_user(&store, "jsmith", Role::Submitter);

    let dup = User::new("JSmith", "other@example.com", Role::Viewer);
    assert!(users::insert(store.conn(), &dup).is_err());
}

#[test]
fn test_reviewers_query() {
    let store = Store::open_in_memory().unwrap();
    seed_user(&store, "admin1", Role::Admin);
    seed_user(&store, "approver1", Role::Approver);
    seed_user(&store, "submitter1", Role::Submitter);
    let mut staff = User::new("staffer", "staff@example.com", Role::Submitter);
    staff.is_staff = true;
    users::insert(store.conn(), &staff).unwrap();
    let mut inactive = User::new("ghost", "ghost@example.com", Role::Admin);
    inactive.is_active = false;
    users::insert(store.conn(), &inactive).unwrap();

    let reviewers = users::reviewers(store.conn()).unwrap();
    let names: Vec<&str> = reviewers.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["admin1", "approver1", "staffer"]);
}

#[test]
fn test_group_codes_are_sequential() {
    let store = Store::open_in_memory().unwrap();
    let owner = seed_user(&store, "owner", Role::Submitter);

    assert_eq!(groups::next_code(store.conn()).unwrap(), "PG-0001");
    seed_group(&store, &owner);
    assert_eq!(groups::next_code(store.conn()).unwrap(), "PG-0002");
}

#[test]
fn test_insert_as_latest_flips_sibling_flag() {
    let store = Store::open_in_memory().unwrap();
    let owner = seed_user(&store, "owner", Role::Submitter);
    let group = seed_group(&store, &owner);
    let v1 = seed_project(&store, &group, &owner);

    let v2 = v1.next_version(2, owner.id, "");
    projects::insert_as_latest(store.conn(), &v2).unwrap();

    let loaded_v1 = projects::by_id(store.conn(), &v1.id).unwrap().unwrap();
    let loaded_v2 = projects::by_id(store.conn(), &v2.id).unwrap().unwrap();
    assert!(!loaded_v1.is_latest);
    assert!(loaded_v2.is_latest);

    let latest = projects::latest_in_group(store.conn(), &group.id)
        .unwrap()
        .unwrap();
    assert_eq!(latest.id, v2.id);
}

#[test]
fn test_duplicate_version_number_rejected() {
    let store = Store::open_in_memory().unwrap();
    let owner = seed_user(&store, "owner", Role::Submitter);
    let group = seed_group(&store, &owner);
    let v1 = seed_project(&store, &group, &owner);

    // Same group, same version number: the unique constraint must fire
    let dup = v1.next_version(1, owner.id, "");
    assert!(projects::insert_as_latest(store.conn(), &dup).is_err());
}

#[test]
fn test_max_version_and_predecessor() {
    let store = Store::open_in_memory().unwrap();
    let owner = seed_user(&store, "owner", Role::Submitter);
    let group = seed_group(&store, &owner);
    let mut v1 = seed_project(&store, &group, &owner);

    assert_eq!(projects::max_version(store.conn(), &group.id).unwrap(), Some(1));
    assert_eq!(
        projects::max_version(store.conn(), &GroupId::new()).unwrap(),
        None
    );

    v1.status = ProjectStatus::Approved;
    projects::update(store.conn(), &v1).unwrap();

    let v2 = v1.next_version(2, owner.id, "");
    projects::insert_as_latest(store.conn(), &v2).unwrap();

    let predecessor = projects::approved_predecessor(store.conn(), &group.id, 2)
        .unwrap()
        .unwrap();
    assert_eq!(predecessor.id, v1.id);

    // No approved version below v1
    assert!(projects::approved_predecessor(store.conn(), &group.id, 1)
        .unwrap()
        .is_none());
}

#[test]
fn test_active_doc_no_unique_index() {
    let store = Store::open_in_memory().unwrap();
    let owner = seed_user(&store, "owner", Role::Submitter);
    let group = seed_group(&store, &owner);
    let project = seed_project(&store, &group, &owner);

    let doc = Document::new(project.id, "D-101", "Site plan", owner.id);
    documents::insert(store.conn(), &doc).unwrap();

    let dup = Document::new(project.id, "D-101", "Another plan", owner.id);
    assert!(documents::insert(store.conn(), &dup).is_err());

    // Retiring the first document frees the number
    documents::set_status(store.conn(), &doc.id, DocumentStatus::Inactive).unwrap();
    documents::insert(store.conn(), &dup).unwrap();

    assert_eq!(documents::active_count(store.conn(), &project.id).unwrap(), 1);
    assert!(documents::has_active_doc_no(store.conn(), &project.id, "D-101").unwrap());
}

#[test]
fn test_history_append_and_read_back() {
    let store = Store::open_in_memory().unwrap();
    let owner = seed_user(&store, "owner", Role::Submitter);
    let group = seed_group(&store, &owner);
    let project = seed_project(&store, &group, &owner);

    let event = ApprovalEvent::record(
        project.id,
        1,
        ApprovalAction::Submitted,
        &owner.actor(),
        &RequestMeta::cli(),
    )
    .with_transition(Some(ProjectStatus::Draft), ProjectStatus::PendingApproval);
    let row_id = history::append(store.conn(), &event).unwrap();
    assert!(row_id > 0);

    let trail = history::for_project(store.conn(), &project.id).unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].action, ApprovalAction::Submitted);
    assert_eq!(trail[0].new_status, Some(ProjectStatus::PendingApproval));
    assert!(trail[0].user_agent.as_deref().unwrap().starts_with("docuhub-cli/"));
}

#[test]
fn test_submission_status_update_targets_version() {
    let store = Store::open_in_memory().unwrap();
    let owner = seed_user(&store, "owner", Role::Submitter);
    let group = seed_group(&store, &owner);
    let project = seed_project(&store, &group, &owner);

    let record = SubmissionRecord {
        id: 0,
        project_id: project.id,
        version: 1,
        submitted_by: owner.id,
        date_submitted: Utc::now(),
        submission_link: String::new(),
        document_count: 2,
        document_numbers: "D-101, D-102".to_string(),
        receipt_id: new_receipt_id(),
        approval_status: ProjectStatus::PendingApproval,
    };
    history::insert_submission(store.conn(), &record).unwrap();

    // Updating a different version touches nothing
    let touched =
        history::set_submission_status(store.conn(), &project.id, 2, ProjectStatus::Obsolete)
            .unwrap();
    assert_eq!(touched, 0);

    let touched =
        history::set_submission_status(store.conn(), &project.id, 1, ProjectStatus::Approved)
            .unwrap();
    assert_eq!(touched, 1);

    let latest = history::latest_submission(store.conn(), &project.id, 1)
        .unwrap()
        .unwrap();
    assert_eq!(latest.approval_status, ProjectStatus::Approved);
    assert_eq!(latest.document_count, 2);
}

#[test]
fn test_ids_with_status_filters_silently() {
    let store = Store::open_in_memory().unwrap();
    let owner = seed_user(&store, "owner", Role::Submitter);
    let group_a = seed_group(&store, &owner);
    let group_b = seed_group(&store, &owner);

    let mut pending = seed_project(&store, &group_a, &owner);
    pending.status = ProjectStatus::PendingApproval;
    projects::update(store.conn(), &pending).unwrap();

    let draft = seed_project(&store, &group_b, &owner);

    let matched = projects::ids_with_status(
        store.conn(),
        &[pending.id, draft.id],
        ProjectStatus::PendingApproval,
    )
    .unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].id, pending.id);
}
