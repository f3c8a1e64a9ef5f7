//! Role-derived permission flags

use super::models::{User, UserRole};
use serde::Serialize;
use std::fmt;

/// Capabilities of the current user; always recomputed, never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    pub can_create_todo: bool,
    pub can_edit_todo: bool,
    pub can_delete_todo: bool,
    pub can_export_pdf: bool,
    pub can_sync_todos: bool,
    pub can_manage_users: bool,
    pub can_view_analytics: bool,
}

/// A single permission flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    CreateTodo,
    EditTodo,
    DeleteTodo,
    ExportPdf,
    SyncTodos,
    ManageUsers,
    ViewAnalytics,
}

impl Permission {
    pub const ALL: [Permission; 7] = [
        Permission::CreateTodo,
        Permission::EditTodo,
        Permission::DeleteTodo,
        Permission::ExportPdf,
        Permission::SyncTodos,
        Permission::ManageUsers,
        Permission::ViewAnalytics,
    ];
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Permission::CreateTodo => "canCreateTodo",
            Permission::EditTodo => "canEditTodo",
            Permission::DeleteTodo => "canDeleteTodo",
            Permission::ExportPdf => "canExportPdf",
            Permission::SyncTodos => "canSyncTodos",
            Permission::ManageUsers => "canManageUsers",
            Permission::ViewAnalytics => "canViewAnalytics",
        };
        f.write_str(name)
    }
}

impl Permissions {
    /// Everything denied
    pub fn none() -> Self {
        Self::default()
    }

    pub fn for_role(role: UserRole) -> Self {
        let admin = role == UserRole::Admin;
        Self {
            can_create_todo: true,
            can_edit_todo: true,
            can_delete_todo: true,
            can_export_pdf: true,
            can_sync_todos: admin,
            can_manage_users: admin,
            can_view_analytics: admin,
        }
    }

    pub fn for_user(user: Option<&User>) -> Self {
        user.map(|u| Self::for_role(u.role)).unwrap_or_default()
    }

    pub fn has(&self, permission: Permission) -> bool {
        match permission {
            Permission::CreateTodo => self.can_create_todo,
            Permission::EditTodo => self.can_edit_todo,
            Permission::DeleteTodo => self.can_delete_todo,
            Permission::ExportPdf => self.can_export_pdf,
            Permission::SyncTodos => self.can_sync_todos,
            Permission::ManageUsers => self.can_manage_users,
            Permission::ViewAnalytics => self.can_view_analytics,
        }
    }

    /// Granted flags, in declaration order
    pub fn granted(&self) -> Vec<Permission> {
        Permission::ALL
            .into_iter()
            .filter(|p| self.has(*p))
            .collect()
    }
}
