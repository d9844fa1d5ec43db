//! Permission predicates
//!
//! Pure boolean checks over an [`Actor`] and, where relevant, a target
//! [`Project`]. None of these touch the store; callers load the target
//! first and services call the predicate before any write.

use crate::core::actor::{Actor, Role};
use crate::core::status::ProjectStatus;
use crate::entities::Project;

/// Full administrative access: superuser or the Admin role.
pub fn is_project_administrator(actor: &Actor) -> bool {
    actor.is_active && (actor.is_superuser || actor.role == Role::Admin)
}

/// Review and bulk-action access: administrators, staff, and approvers.
pub fn is_project_manager(actor: &Actor) -> bool {
    actor.is_active
        && (actor.is_superuser
            || actor.is_staff
            || matches!(actor.role, Role::Admin | Role::Approver))
}

/// Whether the actor may edit the project.
///
/// Administrators edit anything; otherwise only the creator, only while the
/// project is in Draft, and only on the latest version of its group.
pub fn can_edit_project(actor: &Actor, project: &Project) -> bool {
    if !actor.is_active {
        return false;
    }
    if is_project_administrator(actor) {
        return true;
    }
    actor.id == project.submitted_by && project.status.is_editable() && project.is_latest
}

/// Whether the actor may cut a follow-up version from the project.
///
/// Only the original submitter may continue the authorship chain; there is
/// deliberately no administrator override. The project must be the latest
/// version and sit in a versionable status (approved, revision requested,
/// or rescinded).
pub fn can_create_new_version(actor: &Actor, project: &Project) -> bool {
    actor.is_active
        && project.is_latest
        && project.status.is_versionable()
        && actor.id == project.submitted_by
}

/// Whether the actor may view the project.
///
/// Administrators see everything; managers see everything except drafts;
/// everyone else sees their own projects in any status plus any approved
/// project.
pub fn can_view_project(actor: &Actor, project: &Project) -> bool {
    if !actor.is_active {
        return false;
    }
    if is_project_administrator(actor) {
        return true;
    }
    if is_project_manager(actor) {
        return project.status != ProjectStatus::Draft;
    }
    if actor.id == project.submitted_by {
        return true;
    }
    project.status == ProjectStatus::Approved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::{GroupId, UserId};

    fn actor(role: Role) -> Actor {
        Actor::with_role(UserId::new(), "someone", role)
    }

    fn project_owned_by(owner: &Actor, status: ProjectStatus, is_latest: bool) -> Project {
        let mut project = Project::first_version(GroupId::new(), "Substation", "", owner.id);
        project.status = status;
        project.is_latest = is_latest;
        project
    }

    #[test]
    fn test_administrator_check() {
        assert!(is_project_administrator(&actor(Role::Admin)));
        assert!(!is_project_administrator(&actor(Role::Approver)));
        assert!(!is_project_administrator(&actor(Role::Submitter)));

        let mut superuser = actor(Role::Viewer);
        superuser.is_superuser = true;
        assert!(is_project_administrator(&superuser));

        let mut inactive = actor(Role::Admin);
        inactive.is_active = false;
        assert!(!is_project_administrator(&inactive));
    }

    #[test]
    fn test_manager_check() {
        assert!(is_project_manager(&actor(Role::Admin)));
        assert!(is_project_manager(&actor(Role::Approver)));
        assert!(!is_project_manager(&actor(Role::Submitter)));
        assert!(!is_project_manager(&actor(Role::Viewer)));

        let mut staff = actor(Role::Submitter);
        staff.is_staff = true;
        assert!(is_project_manager(&staff));
    }

    #[test]
    fn test_edit_requires_owner_draft_latest() {
        let owner = actor(Role::Submitter);
        let draft = project_owned_by(&owner, ProjectStatus::Draft, true);
        assert!(can_edit_project(&owner, &draft));

        // Not the owner
        assert!(!can_edit_project(&actor(Role::Submitter), &draft));

        // Wrong status
        let pending = project_owned_by(&owner, ProjectStatus::PendingApproval, true);
        assert!(!can_edit_project(&owner, &pending));

        // Not the latest version
        let stale = project_owned_by(&owner, ProjectStatus::Draft, false);
        assert!(!can_edit_project(&owner, &stale));

        // Administrators may edit anything
        assert!(can_edit_project(&actor(Role::Admin), &pending));
    }

    #[test]
    fn test_new_version_has_no_admin_override() {
        let owner = actor(Role::Submitter);
        let approved = project_owned_by(&owner, ProjectStatus::Approved, true);
        assert!(can_create_new_version(&owner, &approved));

        // Even administrators cannot continue someone else's chain
        assert!(!can_create_new_version(&actor(Role::Admin), &approved));
    }

    #[test]
    fn test_new_version_status_gate() {
        let owner = actor(Role::Submitter);
        for status in [
            ProjectStatus::Approved,
            ProjectStatus::RevisionRequested,
            ProjectStatus::Rescinded,
        ] {
            let project = project_owned_by(&owner, status, true);
            assert!(can_create_new_version(&owner, &project), "{status}");
        }
        for status in [
            ProjectStatus::Draft,
            ProjectStatus::PendingApproval,
            ProjectStatus::Rejected,
            ProjectStatus::Obsolete,
        ] {
            let project = project_owned_by(&owner, status, true);
            assert!(!can_create_new_version(&owner, &project), "{status}");
        }

        // Non-latest versions are never versionable
        let stale = project_owned_by(&owner, ProjectStatus::Approved, false);
        assert!(!can_create_new_version(&owner, &stale));
    }

    #[test]
    fn test_view_rules() {
        let owner = actor(Role::Submitter);
        let stranger = actor(Role::Submitter);
        let manager = actor(Role::Approver);
        let admin = actor(Role::Admin);

        let draft = project_owned_by(&owner, ProjectStatus::Draft, true);
        let pending = project_owned_by(&owner, ProjectStatus::PendingApproval, true);
        let approved = project_owned_by(&owner, ProjectStatus::Approved, true);

        // Administrators see everything
        assert!(can_view_project(&admin, &draft));

        // Managers see everything except drafts
        assert!(!can_view_project(&manager, &draft));
        assert!(can_view_project(&manager, &pending));
        assert!(can_view_project(&manager, &approved));

        // Owners see their own in any status
        assert!(can_view_project(&owner, &draft));
        assert!(can_view_project(&owner, &pending));

        // Strangers see only approved projects
        assert!(!can_view_project(&stranger, &draft));
        assert!(!can_view_project(&stranger, &pending));
        assert!(can_view_project(&stranger, &approved));
    }
}
