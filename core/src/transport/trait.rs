use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::{
    AddMemberRequest, AuthResponse, Column, CreateColumnRequest, CreateProjectRequest,
    LoginRequest, MessageResponse, NewTaskRequest, Project, ProjectMember, RegisterRequest, Task,
    UpdateColumnRequest, UpdateMemberRoleRequest, UpdatePasswordRequest, UpdateProjectRequest,
    UpdateUserRequest, User,
};

/// Single no-payload call used to tell whether the backend is up.
#[async_trait]
pub trait LivenessPlugin: Send + Sync {
    fn name(&self) -> &str;
    async fn check_status(&self) -> Result<String, ApiError>;
}

/// Authentication and user endpoints. `token` arguments are already in
/// bearer form and are sent verbatim as the `Authorization` header.
#[async_trait]
pub trait AccountPlugin: Send + Sync {
    fn name(&self) -> &str;
    async fn login(&self, request: LoginRequest) -> Result<AuthResponse, ApiError>;
    async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, ApiError>;
    async fn fetch_profile(&self, token: &str) -> Result<User, ApiError>;
    async fn update_user(
        &self,
        token: &str,
        user_id: i64,
        request: UpdateUserRequest,
    ) -> Result<User, ApiError>;
    async fn update_password(
        &self,
        token: &str,
        user_id: i64,
        request: UpdatePasswordRequest,
    ) -> Result<MessageResponse, ApiError>;
    async fn delete_user(&self, token: &str, user_id: i64) -> Result<MessageResponse, ApiError>;
}

/// Plain request/response board calls (projects, members, columns, tasks).
#[async_trait]
pub trait BoardPlugin: Send + Sync {
    fn name(&self) -> &str;

    async fn list_projects(&self) -> Result<Vec<Project>, ApiError>;
    async fn get_project(&self, id: i64) -> Result<Project, ApiError>;
    async fn create_project(&self, request: CreateProjectRequest) -> Result<Project, ApiError>;
    async fn update_project(
        &self,
        id: i64,
        request: UpdateProjectRequest,
    ) -> Result<Project, ApiError>;
    async fn delete_project(&self, id: i64) -> Result<MessageResponse, ApiError>;

    async fn list_members(&self, project_id: i64) -> Result<Vec<ProjectMember>, ApiError>;
    async fn add_member(
        &self,
        project_id: i64,
        request: AddMemberRequest,
    ) -> Result<ProjectMember, ApiError>;
    async fn update_member_role(
        &self,
        project_id: i64,
        user_id: i64,
        request: UpdateMemberRoleRequest,
    ) -> Result<ProjectMember, ApiError>;
    async fn remove_member(
        &self,
        project_id: i64,
        user_id: i64,
    ) -> Result<MessageResponse, ApiError>;

    async fn list_columns(&self, project_id: Option<i64>) -> Result<Vec<Column>, ApiError>;
    async fn list_project_columns(&self, project_id: i64) -> Result<Vec<Column>, ApiError>;
    async fn get_column(&self, id: i64) -> Result<Column, ApiError>;
    async fn create_column(&self, request: CreateColumnRequest) -> Result<Column, ApiError>;
    async fn update_column(&self, id: i64, request: UpdateColumnRequest)
        -> Result<Column, ApiError>;
    async fn delete_column(&self, id: i64) -> Result<MessageResponse, ApiError>;

    async fn list_tasks(&self, column_id: i64) -> Result<Vec<Task>, ApiError>;
    async fn create_task(&self, request: NewTaskRequest) -> Result<Task, ApiError>;
}
