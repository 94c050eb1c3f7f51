//! Authoritative in-memory IAM tables.

use std::collections::{BTreeSet, HashMap};

use grchub_auth::{EffectiveGrant, SeatLimiter};
use grchub_core::types::{FolderId, RoleAssignmentId, RoleId, UserGroupId, UserId};
use grchub_entity::group::{GroupMembership, UserGroup};
use grchub_entity::role::{Principal, Role, RoleAssignment};
use grchub_entity::user::User;

/// Users, roles, groups, memberships, and assignments as loaded from storage.
///
/// Only [`IamService`](super::service::IamService) mutates this, always
/// under its mutex and only after the matching repository write succeeded.
#[derive(Debug, Default)]
pub struct IamState {
    pub(crate) users: HashMap<UserId, User>,
    pub(crate) roles: HashMap<RoleId, Role>,
    pub(crate) groups: HashMap<UserGroupId, UserGroup>,
    pub(crate) memberships: HashMap<(UserId, UserGroupId), GroupMembership>,
    pub(crate) assignments: HashMap<RoleAssignmentId, RoleAssignment>,
}

impl IamState {
    /// Build state from stored rows.
    pub fn from_rows(
        users: Vec<User>,
        roles: Vec<Role>,
        groups: Vec<UserGroup>,
        memberships: Vec<GroupMembership>,
        assignments: Vec<RoleAssignment>,
    ) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
            roles: roles.into_iter().map(|r| (r.id, r)).collect(),
            groups: groups.into_iter().map(|g| (g.id, g)).collect(),
            memberships: memberships.into_iter().map(|m| (m.key(), m)).collect(),
            assignments: assignments.into_iter().map(|a| (a.id, a)).collect(),
        }
    }

    /// Ids of every member of `group`.
    pub fn members_of(&self, group: UserGroupId) -> BTreeSet<UserId> {
        self.memberships
            .keys()
            .filter(|(_, g)| *g == group)
            .map(|(u, _)| *u)
            .collect()
    }

    /// Ids of every group `user` belongs to.
    pub fn groups_of(&self, user: UserId) -> BTreeSet<UserGroupId> {
        self.memberships
            .keys()
            .filter(|(u, _)| *u == user)
            .map(|(_, g)| *g)
            .collect()
    }

    /// Users an assignment to `principal` reaches.
    pub fn principal_users(&self, principal: Principal) -> BTreeSet<UserId> {
        match principal {
            Principal::User(user) => BTreeSet::from([user]),
            Principal::Group(group) => self.members_of(group),
        }
    }

    /// Whether `principal` refers to an existing user or group.
    pub fn principal_exists(&self, principal: Principal) -> bool {
        match principal {
            Principal::User(user) => self.users.contains_key(&user),
            Principal::Group(group) => self.groups.contains_key(&group),
        }
    }

    /// Assignments reaching `user` directly or through a group.
    pub fn assignments_of(&self, user: UserId) -> Vec<&RoleAssignment> {
        let groups = self.groups_of(user);
        self.assignments
            .values()
            .filter(|a| match a.principal() {
                Some(Principal::User(u)) => u == user,
                Some(Principal::Group(g)) => groups.contains(&g),
                None => false,
            })
            .collect()
    }

    /// Every user holding at least one edit-capable permission.
    ///
    /// Inactive users keep their seat until their grants are revoked.
    pub fn editors(&self, limiter: &SeatLimiter) -> BTreeSet<UserId> {
        let mut editors = BTreeSet::new();
        for assignment in self.assignments.values() {
            let grants_edit = self
                .roles
                .get(&assignment.role_id)
                .is_some_and(|role| limiter.role_grants_edit(role));
            if !grants_edit {
                continue;
            }
            if let Some(principal) = assignment.principal() {
                editors.extend(self.principal_users(principal));
            }
        }
        editors
    }

    /// Whether any assignment to `group` carries an edit-capable permission.
    pub fn group_grants_edit(&self, group: UserGroupId, limiter: &SeatLimiter) -> bool {
        self.assignments.values().any(|a| {
            a.user_group_id == Some(group)
                && self
                    .roles
                    .get(&a.role_id)
                    .is_some_and(|role| limiter.role_grants_edit(role))
        })
    }

    /// Grants of `user` with role permissions inlined; empty for inactive or unknown users.
    pub fn effective_grants(&self, user: UserId) -> Vec<EffectiveGrant> {
        if !self.users.get(&user).is_some_and(|u| u.is_active) {
            return Vec::new();
        }
        self.assignments_of(user)
            .into_iter()
            .filter_map(|a| {
                self.roles.get(&a.role_id).map(|role| EffectiveGrant {
                    folder_id: a.folder_id,
                    is_recursive: a.is_recursive,
                    permissions: role.permissions.clone(),
                })
            })
            .collect()
    }

    /// Number of groups and assignments pointing at `folder`.
    pub fn folder_references(&self, folder: FolderId) -> usize {
        let groups = self.groups.values().filter(|g| g.folder_id == folder).count();
        let assignments = self
            .assignments
            .values()
            .filter(|a| a.folder_id == folder)
            .count();
        groups + assignments
    }

    /// Whether an e-mail is taken, ignoring case.
    pub fn email_taken(&self, email: &str) -> bool {
        self.users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(email))
    }

    /// Whether a role name is taken.
    pub fn role_name_taken(&self, name: &str) -> bool {
        self.roles.values().any(|r| r.name == name)
    }

    /// Users sorted by creation time.
    pub fn sorted_users(&self) -> Vec<&User> {
        let mut users: Vec<&User> = self.users.values().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        users
    }
}

#[cfg(test)]
mod tests {
    use grchub_core::config::LicenseConfig;
    use grchub_entity::group::CreateUserGroup;
    use grchub_entity::role::{CreateRole, CreateRoleAssignment};
    use grchub_entity::user::CreateUser;

    use super::*;

    fn user(email: &str) -> User {
        User::new(CreateUser {
            email: email.to_string(),
            first_name: None,
            last_name: None,
        })
    }

    fn role(name: &str, permissions: &[&str]) -> Role {
        Role::new(CreateRole {
            name: name.to_string(),
            description: None,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        })
    }

    fn assign(role: &Role, principal: Principal, folder: FolderId) -> RoleAssignment {
        RoleAssignment::new(CreateRoleAssignment {
            role_id: role.id,
            principal,
            folder_id: folder,
            is_recursive: true,
        })
    }

    #[test]
    fn test_group_members_are_editors_through_group_grant() {
        let folder = FolderId::new();
        let alice = user("alice@example.com");
        let bob = user("bob@example.com");
        let editor = role("Editor", &["change_asset"]);
        let reader = role("Reader", &["view_asset"]);
        let group = UserGroup::new(CreateUserGroup {
            name: "Auditors".to_string(),
            folder_id: folder,
        });

        let state = IamState::from_rows(
            vec![alice.clone(), bob.clone()],
            vec![editor.clone(), reader.clone()],
            vec![group.clone()],
            vec![GroupMembership::new(alice.id, group.id)],
            vec![
                assign(&editor, Principal::Group(group.id), folder),
                assign(&reader, Principal::User(bob.id), folder),
            ],
        );

        let limiter = SeatLimiter::new(&LicenseConfig::default());
        assert_eq!(state.editors(&limiter), BTreeSet::from([alice.id]));
        assert!(state.group_grants_edit(group.id, &limiter));
        assert_eq!(state.effective_grants(alice.id).len(), 1);
        assert_eq!(state.folder_references(folder), 3);
    }

    #[test]
    fn test_inactive_user_has_no_effective_grants_but_keeps_seat() {
        let folder = FolderId::new();
        let mut carol = user("carol@example.com");
        carol.is_active = false;
        let editor = role("Editor", &["add_risk"]);
        let state = IamState::from_rows(
            vec![carol.clone()],
            vec![editor.clone()],
            vec![],
            vec![],
            vec![assign(&editor, Principal::User(carol.id), folder)],
        );

        let limiter = SeatLimiter::new(&LicenseConfig::default());
        assert!(state.effective_grants(carol.id).is_empty());
        assert!(state.editors(&limiter).contains(&carol.id));
    }

    #[test]
    fn test_email_taken_ignores_case() {
        let state = IamState::from_rows(vec![user("Dana@Example.com")], vec![], vec![], vec![], vec![]);
        assert!(state.email_taken("dana@example.com"));
        assert!(!state.email_taken("erin@example.com"));
    }
}
