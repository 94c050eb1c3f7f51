//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use grchub_core::types::{FolderId, RoleId, UserGroupId, UserId};

/// Create folder request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(length(min = 1, max = 200, message = "Folder name must be 1-200 characters"))]
    pub name: String,
    /// Description.
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    /// Parent folder; omitted means the root.
    pub parent_id: Option<FolderId>,
}

/// Update folder request. Omitted fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateFolderRequest {
    /// New name.
    #[validate(length(min = 1, max = 200, message = "Folder name must be 1-200 characters"))]
    pub name: Option<String>,
    /// New description; empty clears it.
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    /// New parent folder.
    pub parent_id: Option<FolderId>,
}

/// Query for the tree endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeQuery {
    /// Levels below the requested folder to include.
    pub max_depth: Option<u32>,
}

/// Create user request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Login e-mail.
    #[validate(email(message = "A valid e-mail address is required"))]
    pub email: String,
    /// Given name.
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    /// Family name.
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
}

/// Update user request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// Activate or deactivate the user.
    pub is_active: Option<bool>,
}

/// Permission check query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionQuery {
    /// Permission codename, such as `view_asset`.
    pub permission: String,
    /// Folder the record lives in. Omitted lists every permitted folder.
    pub folder: Option<FolderId>,
}

/// Create role request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRoleRequest {
    /// Role name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Permission codenames.
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Create user group request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateGroupRequest {
    /// Group name.
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Owning folder.
    pub folder_id: FolderId,
}

/// Add member request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddMemberRequest {
    /// User to add.
    pub user_id: UserId,
}

/// Create role assignment request. Exactly one of `user_id` and
/// `user_group_id` must be set.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_single_principal"))]
pub struct CreateAssignmentRequest {
    /// Role to grant.
    pub role_id: RoleId,
    /// Receiving user.
    pub user_id: Option<UserId>,
    /// Receiving group.
    pub user_group_id: Option<UserGroupId>,
    /// Perimeter folder.
    pub folder_id: FolderId,
    /// Whether the grant covers descendants.
    #[serde(default)]
    pub is_recursive: bool,
}

fn validate_single_principal(
    req: &CreateAssignmentRequest,
) -> Result<(), validator::ValidationError> {
    if req.user_id.is_some() == req.user_group_id.is_some() {
        let mut err = validator::ValidationError::new("principal");
        err.message = Some("Exactly one of user_id and user_group_id is required".into());
        return Err(err);
    }
    Ok(())
}

/// Role assignment listing query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentQuery {
    /// Only assignments on this folder.
    pub folder: Option<FolderId>,
}
