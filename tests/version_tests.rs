//! Version service tests: cloning, numbering, and the single-latest invariant

mod common;

use common::{meta, Fixture};
use docuhub::core::{DocumentStatus, ProjectStatus};
use docuhub::services::{ProjectService, VersionService, WorkflowError};
use docuhub::store::{documents, history, projects};

#[test]
fn test_new_version_clones_active_documents() {
    let mut fx = Fixture::new();
    let v1 = fx.create_project("Pump House", &["D-101", "D-102"]);
    fx.submit_and_approve(&v1);

    // Retire one document after approval so only active ones clone.
    // (Documents stay editable only in Draft; retire directly for the test.)
    let extra = docuhub::entities::Document::new(v1.id, "D-999", "Scratch sheet", fx.owner.id);
    documents::insert(fx.store.conn(), &extra).unwrap();
    documents::set_status(fx.store.conn(), &extra.id, DocumentStatus::Inactive).unwrap();

    let owner = fx.owner.actor();
    let v2 = VersionService::new(&mut fx.store)
        .create_new_version(&v1.id, &owner, "Rework per RFI-12", &meta())
        .unwrap();

    assert_eq!(v2.version, 2);
    assert_eq!(v2.status, ProjectStatus::Draft);
    assert_eq!(v2.name, v1.name);
    assert_eq!(v2.revision_notes, "Rework per RFI-12");

    // Clone fidelity: exactly the two active documents, one revision up,
    // active on the new version.
    let clones = documents::all_for_project(fx.store.conn(), &v2.id).unwrap();
    assert_eq!(clones.len(), 2);
    let originals = documents::active_for_project(fx.store.conn(), &v1.id).unwrap();
    for clone in &clones {
        let source = originals
            .iter()
            .find(|d| d.doc_no == clone.doc_no)
            .expect("clone matches a source document");
        assert_eq!(clone.revision, source.revision + 1);
        assert_eq!(clone.status, DocumentStatus::Active);
        assert_eq!(clone.title, source.title);
    }

    // The predecessor is obsolete, with its submission record updated.
    let old = projects::by_id(fx.store.conn(), &v1.id).unwrap().unwrap();
    assert_eq!(old.status, ProjectStatus::Obsolete);
    assert!(!old.is_latest);
    let record = history::latest_submission(fx.store.conn(), &v1.id, 1)
        .unwrap()
        .unwrap();
    assert_eq!(record.approval_status, ProjectStatus::Obsolete);
}

#[test]
fn test_new_version_has_no_submission_record() {
    let mut fx = Fixture::new();
    let v1 = fx.create_project("Pump House", &["D-101"]);
    fx.submit_and_approve(&v1);

    let owner = fx.owner.actor();
    let v2 = VersionService::new(&mut fx.store)
        .create_new_version(&v1.id, &owner, "", &meta())
        .unwrap();

    // A submission record appears only on an explicit submit.
    let records = history::submissions_for_project(fx.store.conn(), &v2.id).unwrap();
    assert!(records.is_empty());

    // But the creation is on the approval trail.
    let trail = history::for_project(fx.store.conn(), &v2.id).unwrap();
    assert!(trail
        .iter()
        .any(|e| e.action == docuhub::core::ApprovalAction::VersionCreated));
}

#[test]
fn test_single_latest_invariant_across_successions() {
    let mut fx = Fixture::new();
    let v1 = fx.create_project("Pump House", &["D-101"]);
    fx.submit_and_approve(&v1);

    let owner = fx.owner.actor();
    let v2 = VersionService::new(&mut fx.store)
        .create_new_version(&v1.id, &owner, "", &meta())
        .unwrap();

    let versions = projects::in_group(fx.store.conn(), &v1.group_id).unwrap();
    assert_eq!(versions.len(), 2);
    let latest: Vec<_> = versions.iter().filter(|p| p.is_latest).collect();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].id, v2.id);
}

#[test]
fn test_version_numbers_are_monotonic_without_gaps() {
    let mut fx = Fixture::new();
    let mut current = fx.create_project("Pump House", &["D-101"]);

    for _ in 0..3 {
        fx.submit_and_approve(&current);
        let owner = fx.owner.actor();
        current = VersionService::new(&mut fx.store)
            .create_new_version(&current.id, &owner, "", &meta())
            .unwrap();
    }

    let mut versions: Vec<u32> = projects::in_group(fx.store.conn(), &current.group_id)
        .unwrap()
        .iter()
        .map(|p| p.version)
        .collect();
    versions.sort_unstable();
    assert_eq!(versions, vec![1, 2, 3, 4]);
}

#[test]
fn test_only_the_submitter_can_create_versions() {
    let mut fx = Fixture::new();
    let v1 = fx.create_project("Pump House", &["D-101"]);
    fx.submit_and_approve(&v1);

    // Administrators get no override on the authorship chain.
    let admin = fx.admin.actor();
    let result =
        VersionService::new(&mut fx.store).create_new_version(&v1.id, &admin, "", &meta());
    assert!(matches!(result, Err(WorkflowError::NotAuthorized { .. })));
}

#[test]
fn test_draft_and_pending_projects_cannot_be_versioned() {
    let mut fx = Fixture::new();
    let draft = fx.create_project("Pump House", &["D-101"]);

    let owner = fx.owner.actor();
    let result =
        VersionService::new(&mut fx.store).create_new_version(&draft.id, &owner, "", &meta());
    assert!(matches!(result, Err(WorkflowError::NotAuthorized { .. })));
}

#[test]
fn test_failed_version_creation_leaves_no_partial_state() {
    let mut fx = Fixture::new();
    let v1 = fx.create_project("Pump House", &["D-101", "D-102"]);
    fx.submit_and_approve(&v1);

    // A stranger's attempt fails the permission gate; nothing changes.
    let stranger = fx.approver.actor();
    let result =
        VersionService::new(&mut fx.store).create_new_version(&v1.id, &stranger, "", &meta());
    assert!(result.is_err());

    let versions = projects::in_group(fx.store.conn(), &v1.group_id).unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].status, ProjectStatus::Approved);
    assert!(versions[0].is_latest);
}

#[test]
fn test_next_version_number_starts_at_one() {
    let mut fx = Fixture::new();
    let project = fx.create_project("Pump House", &["D-101"]);

    let service = VersionService::new(&mut fx.store);
    assert_eq!(service.next_version_number(&project.group_id).unwrap(), 2);
    assert_eq!(
        service
            .next_version_number(&docuhub::core::GroupId::new())
            .unwrap(),
        1
    );
}

#[test]
fn test_group_stats_follow_successions() {
    let mut fx = Fixture::new();
    let v1 = fx.create_project("Pump House", &["D-101"]);
    fx.submit_and_approve(&v1);

    let owner = fx.owner.actor();
    let v2 = VersionService::new(&mut fx.store)
        .create_new_version(&v1.id, &owner, "", &meta())
        .unwrap();

    let stats = docuhub::services::ProjectStatsService::new(&fx.store)
        .group_stats(&v1.group_id)
        .unwrap();
    assert_eq!(stats.total_versions, 2);
    assert_eq!(stats.approved_versions, 0);
    assert_eq!(stats.latest_version.unwrap().id, v2.id);
}

#[test]
fn test_rescinded_projects_can_be_versioned() {
    let mut fx = Fixture::new();
    let v1 = fx.create_project("Pump House", &["D-101"]);
    fx.submit_and_approve(&v1);

    let approver = fx.approver.actor();
    let notifier = docuhub::notify::RecordingNotifier::new();
    docuhub::services::SubmissionService::new(&mut fx.store, &notifier)
        .rescind_project(&v1.id, &approver, "Standard superseded", &meta())
        .unwrap();

    let owner = fx.owner.actor();
    let v2 = VersionService::new(&mut fx.store)
        .create_new_version(&v1.id, &owner, "Reissue to new standard", &meta())
        .unwrap();
    assert_eq!(v2.version, 2);

    let old = projects::by_id(fx.store.conn(), &v1.id).unwrap().unwrap();
    assert_eq!(old.status, ProjectStatus::Obsolete);
}

#[test]
fn test_edit_rights_move_with_the_latest_version() {
    let mut fx = Fixture::new();
    let v1 = fx.create_project("Pump House", &["D-101"]);
    fx.submit_and_approve(&v1);

    let owner = fx.owner.actor();
    let v2 = VersionService::new(&mut fx.store)
        .create_new_version(&v1.id, &owner, "", &meta())
        .unwrap();

    // The obsolete predecessor rejects document changes even from its owner.
    let mut service = ProjectService::new(&mut fx.store);
    let result = service.add_document(
        &owner,
        &v1.id,
        docuhub::services::NewDocumentInput {
            doc_no: "D-200".to_string(),
            title: "Late addition".to_string(),
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(WorkflowError::NotAuthorized { .. })));

    // The new draft accepts them.
    let mut service = ProjectService::new(&mut fx.store);
    service
        .add_document(
            &owner,
            &v2.id,
            docuhub::services::NewDocumentInput {
                doc_no: "D-200".to_string(),
                title: "New sheet".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
}
