//! Users, roles, groups, and seat-limited role assignments.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use grchub_auth::{PermissionEvaluator, SeatLimiter, SeatStatus};
use grchub_core::error::AppError;
use grchub_core::result::AppResult;
use grchub_core::types::{FolderId, PageRequest, PageResponse, RoleAssignmentId, UserGroupId, UserId};
use grchub_database::Repositories;
use grchub_entity::folder::Folder;
use grchub_entity::group::{CreateUserGroup, GroupMembership, UserGroup};
use grchub_entity::role::permission::is_valid_codename;
use grchub_entity::role::{CreateRole, CreateRoleAssignment, Role, RoleAssignment};
use grchub_entity::user::{CreateUser, User};

use crate::context::RequestContext;
use crate::folder::FolderHierarchy;

use super::state::IamState;

/// Identity and access management with editor seat enforcement.
///
/// All state lives in one [`IamState`] behind a Tokio mutex. Every mutation
/// holds the mutex across check, persist, and apply, so two concurrent
/// grants can never both take the last seat. When the hierarchy is also
/// needed it is locked after the IAM mutex, never before.
pub struct IamService {
    state: Mutex<IamState>,
    repos: Repositories,
    hierarchy: Arc<FolderHierarchy>,
    limiter: SeatLimiter,
    evaluator: PermissionEvaluator,
}

impl IamService {
    /// Load every IAM row from `repos`.
    pub async fn load(
        repos: Repositories,
        hierarchy: Arc<FolderHierarchy>,
        limiter: SeatLimiter,
    ) -> AppResult<Self> {
        let state = IamState::from_rows(
            repos.users.find_all().await?,
            repos.roles.find_all().await?,
            repos.groups.find_all().await?,
            repos.memberships.find_all().await?,
            repos.assignments.find_all().await?,
        );

        let editors = state.editors(&limiter).len();
        info!(
            users = state.users.len(),
            roles = state.roles.len(),
            groups = state.groups.len(),
            assignments = state.assignments.len(),
            editors,
            "IAM state loaded"
        );
        if limiter.check(0, editors).is_err() {
            warn!(editors, "Stored editors already exceed the licensed seats");
        }

        let evaluator = PermissionEvaluator::new(hierarchy.clone());
        Ok(Self {
            state: Mutex::new(state),
            repos,
            hierarchy,
            limiter,
            evaluator,
        })
    }

    // ── Users ──

    /// Create a user. E-mails are unique, ignoring case.
    pub async fn create_user(&self, ctx: &RequestContext, data: CreateUser) -> AppResult<User> {
        let email = data.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::validation(format!("Invalid e-mail address '{email}'")));
        }

        let mut state = self.state.lock().await;
        if state.email_taken(&email) {
            return Err(AppError::conflict(format!("E-mail '{email}' already exists")));
        }

        let user = User::new(CreateUser {
            email,
            first_name: non_blank(data.first_name),
            last_name: non_blank(data.last_name),
        });
        let stored = self.repos.users.create(&user).await?;
        state.users.insert(stored.id, stored.clone());

        info!(
            request_id = %ctx.request_id,
            user_id = %stored.id,
            email = %stored.email,
            "User created"
        );
        Ok(stored)
    }

    /// Fetch one user.
    pub async fn get_user(&self, id: UserId) -> AppResult<User> {
        let state = self.state.lock().await;
        state
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    /// One page of users in creation order.
    pub async fn list_users(&self, page: &PageRequest) -> PageResponse<User> {
        let state = self.state.lock().await;
        let all: Vec<User> = state.sorted_users().into_iter().cloned().collect();
        PageResponse::from_ordered(all, page)
    }

    /// Activate or deactivate a user. Inactive users keep their grants and
    /// seat but hold no effective permissions.
    pub async fn set_user_active(
        &self,
        ctx: &RequestContext,
        id: UserId,
        is_active: bool,
    ) -> AppResult<User> {
        let mut state = self.state.lock().await;
        let mut user = state
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        if user.is_active == is_active {
            return Ok(user);
        }
        user.is_active = is_active;
        user.updated_at = chrono::Utc::now();

        let stored = self.repos.users.update(&user).await?;
        state.users.insert(id, stored.clone());

        info!(request_id = %ctx.request_id, user_id = %id, is_active, "User activation changed");
        Ok(stored)
    }

    /// Groups `id` belongs to.
    pub async fn user_groups(&self, id: UserId) -> AppResult<Vec<UserGroupId>> {
        let state = self.state.lock().await;
        if !state.users.contains_key(&id) {
            return Err(AppError::not_found(format!("User {id} not found")));
        }
        Ok(state.groups_of(id).into_iter().collect())
    }

    // ── Roles ──

    /// Create a role. Names are unique and codenames must look like `view_asset`.
    pub async fn create_role(&self, ctx: &RequestContext, data: CreateRole) -> AppResult<Role> {
        let name = data.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("Role name cannot be empty"));
        }
        if let Some(bad) = data.permissions.iter().find(|p| !is_valid_codename(p)) {
            return Err(AppError::validation(format!("Invalid permission codename '{bad}'")));
        }

        let mut state = self.state.lock().await;
        if state.role_name_taken(&name) {
            return Err(AppError::conflict(format!("Role '{name}' already exists")));
        }

        let role = Role::new(CreateRole { name, ..data });
        let stored = self.repos.roles.create(&role).await?;
        state.roles.insert(stored.id, stored.clone());

        info!(
            request_id = %ctx.request_id,
            role_id = %stored.id,
            name = %stored.name,
            grants_edit = self.limiter.role_grants_edit(&stored),
            "Role created"
        );
        Ok(stored)
    }

    /// Every role, sorted by name.
    pub async fn list_roles(&self) -> Vec<Role> {
        let state = self.state.lock().await;
        let mut roles: Vec<Role> = state.roles.values().cloned().collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        roles
    }

    // ── Groups ──

    /// Create a group owned by an existing folder.
    pub async fn create_group(
        &self,
        ctx: &RequestContext,
        data: CreateUserGroup,
    ) -> AppResult<UserGroup> {
        let name = data.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("Group name cannot be empty"));
        }

        let mut state = self.state.lock().await;
        self.require_folder(data.folder_id).await?;

        let group = UserGroup::new(CreateUserGroup { name, ..data });
        let stored = self.repos.groups.create(&group).await?;
        state.groups.insert(stored.id, stored.clone());

        info!(
            request_id = %ctx.request_id,
            group_id = %stored.id,
            folder_id = %stored.folder_id,
            "User group created"
        );
        Ok(stored)
    }

    /// Every group, sorted by name.
    pub async fn list_groups(&self) -> Vec<UserGroup> {
        let state = self.state.lock().await;
        let mut groups: Vec<UserGroup> = state.groups.values().cloned().collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        groups
    }

    /// Members of `group`.
    pub async fn group_members(&self, group: UserGroupId) -> AppResult<Vec<User>> {
        let state = self.state.lock().await;
        if !state.groups.contains_key(&group) {
            return Err(AppError::not_found(format!("User group {group} not found")));
        }
        Ok(state
            .members_of(group)
            .into_iter()
            .filter_map(|id| state.users.get(&id).cloned())
            .collect())
    }

    /// Add `user` to `group`.
    ///
    /// If the group holds an edit-capable assignment and `user` is not an
    /// editor yet, the membership takes a seat and fails with
    /// `LicenseLimit` when none is left. Adding an existing member is a no-op.
    pub async fn add_user_to_group(
        &self,
        ctx: &RequestContext,
        user: UserId,
        group: UserGroupId,
    ) -> AppResult<GroupMembership> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&user) {
            return Err(AppError::not_found(format!("User {user} not found")));
        }
        if !state.groups.contains_key(&group) {
            return Err(AppError::not_found(format!("User group {group} not found")));
        }
        if let Some(existing) = state.memberships.get(&(user, group)) {
            return Ok(existing.clone());
        }

        if state.group_grants_edit(group, &self.limiter) {
            let editors = state.editors(&self.limiter);
            let new_editors = usize::from(!editors.contains(&user));
            self.limiter.check(editors.len(), new_editors)?;
        }

        let membership = GroupMembership::new(user, group);
        let stored = self.repos.memberships.create(&membership).await?;
        state.memberships.insert(stored.key(), stored.clone());

        info!(
            request_id = %ctx.request_id,
            user_id = %user,
            group_id = %group,
            "User added to group"
        );
        Ok(stored)
    }

    /// Remove `user` from `group`. Returns whether a membership existed.
    pub async fn remove_user_from_group(
        &self,
        ctx: &RequestContext,
        user: UserId,
        group: UserGroupId,
    ) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        if !state.groups.contains_key(&group) {
            return Err(AppError::not_found(format!("User group {group} not found")));
        }
        if !state.memberships.contains_key(&(user, group)) {
            return Ok(false);
        }

        self.repos.memberships.delete(&(user, group)).await?;
        state.memberships.remove(&(user, group));

        info!(
            request_id = %ctx.request_id,
            user_id = %user,
            group_id = %group,
            "User removed from group"
        );
        Ok(true)
    }

    // ── Role assignments ──

    /// Grant a role to a user or group on a folder.
    ///
    /// When the role carries an edit-capable permission, every reached user
    /// that is not an editor yet needs a free seat; otherwise the grant
    /// fails with `LicenseLimit` and nothing is stored.
    pub async fn assign_role(
        &self,
        ctx: &RequestContext,
        data: CreateRoleAssignment,
    ) -> AppResult<RoleAssignment> {
        let mut state = self.state.lock().await;
        let role = state
            .roles
            .get(&data.role_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Role {} not found", data.role_id)))?;
        if !state.principal_exists(data.principal) {
            return Err(AppError::not_found(format!(
                "Principal {:?} not found",
                data.principal
            )));
        }
        self.require_folder(data.folder_id).await?;

        if self.limiter.role_grants_edit(&role) {
            let reached = state.principal_users(data.principal);
            let editors = state.editors(&self.limiter);
            let new_editors = reached.difference(&editors).count();
            if let Err(e) = self.limiter.check(editors.len(), new_editors) {
                warn!(
                    request_id = %ctx.request_id,
                    role_id = %role.id,
                    principal = ?data.principal,
                    "Role assignment rejected by seat limit"
                );
                return Err(e);
            }
        }

        let assignment = RoleAssignment::new(data);
        let stored = self.repos.assignments.create(&assignment).await?;
        state.assignments.insert(stored.id, stored.clone());

        info!(
            request_id = %ctx.request_id,
            assignment_id = %stored.id,
            role = %role.name,
            folder_id = %stored.folder_id,
            is_recursive = stored.is_recursive,
            "Role assigned"
        );
        Ok(stored)
    }

    /// Revoke an assignment and return it.
    pub async fn revoke_assignment(
        &self,
        ctx: &RequestContext,
        id: RoleAssignmentId,
    ) -> AppResult<RoleAssignment> {
        let mut state = self.state.lock().await;
        if !state.assignments.contains_key(&id) {
            return Err(AppError::not_found(format!("Role assignment {id} not found")));
        }

        self.repos.assignments.delete(&id).await?;
        let removed = state
            .assignments
            .remove(&id)
            .ok_or_else(|| AppError::not_found(format!("Role assignment {id} not found")))?;

        info!(request_id = %ctx.request_id, assignment_id = %id, "Role assignment revoked");
        Ok(removed)
    }

    /// Assignments in creation order, optionally only those on `folder`.
    pub async fn list_assignments(&self, folder: Option<FolderId>) -> Vec<RoleAssignment> {
        let state = self.state.lock().await;
        let mut assignments: Vec<RoleAssignment> = state
            .assignments
            .values()
            .filter(|a| folder.is_none_or(|f| a.folder_id == f))
            .cloned()
            .collect();
        assignments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        assignments
    }

    // ── Seats and permissions ──

    /// Users currently holding an edit-capable permission.
    pub async fn editors(&self) -> Vec<User> {
        let state = self.state.lock().await;
        state
            .editors(&self.limiter)
            .into_iter()
            .filter_map(|id| state.users.get(&id).cloned())
            .collect()
    }

    /// Current seat usage.
    pub async fn seat_status(&self) -> SeatStatus {
        let state = self.state.lock().await;
        self.limiter.status(state.editors(&self.limiter).len())
    }

    /// Whether `user` holds `codename` on records stored in `folder`.
    pub async fn has_permission(
        &self,
        user: UserId,
        codename: &str,
        folder: FolderId,
    ) -> AppResult<bool> {
        let grants = {
            let state = self.state.lock().await;
            if !state.users.contains_key(&user) {
                return Err(AppError::not_found(format!("User {user} not found")));
            }
            state.effective_grants(user)
        };
        self.evaluator.has_permission(&grants, codename, folder).await
    }

    /// Every folder on which `user` holds `codename`.
    pub async fn permitted_folders(
        &self,
        user: UserId,
        codename: &str,
    ) -> AppResult<BTreeSet<FolderId>> {
        let grants = {
            let state = self.state.lock().await;
            if !state.users.contains_key(&user) {
                return Err(AppError::not_found(format!("User {user} not found")));
            }
            state.effective_grants(user)
        };
        self.evaluator.permitted_folders(&grants, codename).await
    }

    // ── Folder lifecycle ──

    /// Delete a folder unless a group or assignment still points at it.
    ///
    /// The IAM mutex stays held across the hierarchy delete so no grant can
    /// be attached to the folder between the check and the removal.
    pub async fn delete_unreferenced_folder(
        &self,
        ctx: &RequestContext,
        folder: FolderId,
    ) -> AppResult<Folder> {
        let state = self.state.lock().await;
        let references = state.folder_references(folder);
        if references > 0 {
            return Err(AppError::conflict(format!(
                "Folder {folder} is still referenced by {references} group(s) or role assignment(s)"
            )));
        }

        let removed = self.hierarchy.delete_folder(folder).await?;
        info!(request_id = %ctx.request_id, folder_id = %folder, "Unreferenced folder deleted");
        Ok(removed)
    }

    async fn require_folder(&self, folder: FolderId) -> AppResult<()> {
        if self.hierarchy.contains(folder).await {
            Ok(())
        } else {
            Err(AppError::not_found(format!("Folder {folder} not found")))
        }
    }
}

impl std::fmt::Debug for IamService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IamService")
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
