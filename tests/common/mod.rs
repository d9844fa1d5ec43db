//! Shared test helpers for integration tests
//!
//! This module provides common utilities used across all test files.

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use tempfile::TempDir;

use docuhub::core::{Actor, RequestMeta, Role};
use docuhub::entities::{Project, User};
use docuhub::notify::RecordingNotifier;
use docuhub::services::{NewDocumentInput, NewProjectInput, ProjectService, SubmissionService};
use docuhub::store::{users, Store};

/// Helper to get a docuhub command with a clean environment
pub fn docuhub() -> Command {
    let mut command = Command::new(cargo::cargo_bin!("docuhub"));
    command.env_remove("DOCUHUB_DB").env_remove("DOCUHUB_USER");
    command
}

/// Helper to create an initialized database in a temp directory.
/// The database lives at `<dir>/docuhub.sqlite3`.
pub fn setup_test_db() -> TempDir {
    let tmp = TempDir::new().unwrap();
    docuhub()
        .args(["--db", db_path(&tmp).as_str(), "init"])
        .assert()
        .success();
    tmp
}

pub fn db_path(tmp: &TempDir) -> String {
    tmp.path().join("docuhub.sqlite3").display().to_string()
}

/// In-memory store with the three standard accounts seeded
pub struct Fixture {
    pub store: Store,
    pub owner: User,
    pub approver: User,
    pub admin: User,
}

impl Fixture {
    pub fn new() -> Self {
        let store = Store::open_in_memory().unwrap();

        let owner = User::new("owner", "owner@example.com", Role::Submitter);
        users::insert(store.conn(), &owner).unwrap();

        let approver = User::new("approver", "approver@example.com", Role::Approver);
        users::insert(store.conn(), &approver).unwrap();

        let mut admin = User::new("admin", "admin@example.com", Role::Admin);
        admin.is_staff = true;
        admin.is_superuser = true;
        users::insert(store.conn(), &admin).unwrap();

        Self {
            store,
            owner,
            approver,
            admin,
        }
    }

    /// Create a draft project owned by `owner` with active documents
    /// registered under the given numbers.
    pub fn create_project(&mut self, name: &str, doc_numbers: &[&str]) -> Project {
        let owner = self.owner.actor();
        let mut service = ProjectService::new(&mut self.store);
        let (_, project) = service
            .create_project(
                &owner,
                NewProjectInput {
                    name: name.to_string(),
                    description: "Test project".to_string(),
                    client: "Utilities Dept".to_string(),
                    ..NewProjectInput::default()
                },
                &meta(),
            )
            .unwrap();

        for doc_no in doc_numbers {
            service
                .add_document(
                    &owner,
                    &project.id,
                    NewDocumentInput {
                        doc_no: doc_no.to_string(),
                        title: format!("Drawing {doc_no}"),
                        ..NewDocumentInput::default()
                    },
                )
                .unwrap();
        }
        project
    }

    /// Submit a draft project and approve it; the project ends up Approved.
    pub fn submit_and_approve(&mut self, project: &Project) {
        let notifier = RecordingNotifier::new();
        let owner = self.owner.actor();
        let approver = self.approver.actor();
        SubmissionService::new(&mut self.store, &notifier)
            .submit_for_approval(&project.id, &owner, &meta())
            .unwrap();
        SubmissionService::new(&mut self.store, &notifier)
            .approve_project(&project.id, &approver, "Looks good", &meta())
            .unwrap();
    }

    pub fn actor_of(&self, user: &User) -> Actor {
        user.actor()
    }
}

/// Request metadata used across service tests
pub fn meta() -> RequestMeta {
    RequestMeta {
        ip_address: Some("127.0.0.1".to_string()),
        user_agent: Some("integration-test".to_string()),
    }
}
