use async_trait::async_trait;
use kanban_core::api::{
    AccountPlugin, AddMemberRequest, ApiError, AuthResponse, BoardPlugin, Column,
    CreateColumnRequest, CreateProjectRequest, LivenessPlugin, LoginRequest, MessageResponse,
    NewTaskRequest, Project, ProjectMember, RegisterRequest, Task, UpdateColumnRequest,
    UpdateMemberRoleRequest, UpdatePasswordRequest, UpdateProjectRequest, UpdateUserRequest, User,
};
use reqwest::Method;

use crate::http::HttpClient;

/// REST backend behind all three plugin seams.
pub struct ApiServicePlugin {
    client: HttpClient,
}

impl ApiServicePlugin {
    pub fn new(base_url: &str, timeout_ms: u64) -> anyhow::Result<Self> {
        Ok(Self {
            client: HttpClient::new(base_url, timeout_ms)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }
}

#[async_trait]
impl LivenessPlugin for ApiServicePlugin {
    fn name(&self) -> &str {
        "rest"
    }

    async fn check_status(&self) -> Result<String, ApiError> {
        self.client.check_status().await
    }
}

#[async_trait]
impl AccountPlugin for ApiServicePlugin {
    fn name(&self) -> &str {
        "rest"
    }

    async fn login(&self, request: LoginRequest) -> Result<AuthResponse, ApiError> {
        self.client
            .call_with(Method::POST, "/api/users/login", None, &request)
            .await
    }

    async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.client
            .call_with(Method::POST, "/api/users/register", None, &request)
            .await
    }

    async fn fetch_profile(&self, token: &str) -> Result<User, ApiError> {
        self.client
            .call(Method::GET, "/api/users/auth/me", Some(token))
            .await
    }

    async fn update_user(
        &self,
        token: &str,
        user_id: i64,
        request: UpdateUserRequest,
    ) -> Result<User, ApiError> {
        let path = format!("/api/users/{user_id}");
        self.client
            .call_with(Method::PUT, &path, Some(token), &request)
            .await
    }

    async fn update_password(
        &self,
        token: &str,
        user_id: i64,
        request: UpdatePasswordRequest,
    ) -> Result<MessageResponse, ApiError> {
        let path = format!("/api/users/{user_id}/password");
        self.client
            .call_with(Method::PATCH, &path, Some(token), &request)
            .await
    }

    async fn delete_user(&self, token: &str, user_id: i64) -> Result<MessageResponse, ApiError> {
        let path = format!("/api/users/{user_id}");
        self.client.call(Method::DELETE, &path, Some(token)).await
    }
}

#[async_trait]
impl BoardPlugin for ApiServicePlugin {
    fn name(&self) -> &str {
        "rest"
    }

    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.client.call(Method::GET, "/api/projects", None).await
    }

    async fn get_project(&self, id: i64) -> Result<Project, ApiError> {
        let path = format!("/api/projects/{id}");
        self.client.call(Method::GET, &path, None).await
    }

    async fn create_project(&self, request: CreateProjectRequest) -> Result<Project, ApiError> {
        self.client
            .call_with(Method::POST, "/api/projects", None, &request)
            .await
    }

    async fn update_project(
        &self,
        id: i64,
        request: UpdateProjectRequest,
    ) -> Result<Project, ApiError> {
        let path = format!("/api/projects/{id}");
        self.client
            .call_with(Method::PUT, &path, None, &request)
            .await
    }

    async fn delete_project(&self, id: i64) -> Result<MessageResponse, ApiError> {
        let path = format!("/api/projects/{id}");
        self.client.call(Method::DELETE, &path, None).await
    }

    async fn list_members(&self, project_id: i64) -> Result<Vec<ProjectMember>, ApiError> {
        let path = format!("/api/projects/{project_id}/members");
        self.client.call(Method::GET, &path, None).await
    }

    async fn add_member(
        &self,
        project_id: i64,
        request: AddMemberRequest,
    ) -> Result<ProjectMember, ApiError> {
        let path = format!("/api/projects/{project_id}/members");
        self.client
            .call_with(Method::POST, &path, None, &request)
            .await
    }

    async fn update_member_role(
        &self,
        project_id: i64,
        user_id: i64,
        request: UpdateMemberRoleRequest,
    ) -> Result<ProjectMember, ApiError> {
        let path = format!("/api/projects/{project_id}/members/{user_id}");
        self.client
            .call_with(Method::PATCH, &path, None, &request)
            .await
    }

    async fn remove_member(
        &self,
        project_id: i64,
        user_id: i64,
    ) -> Result<MessageResponse, ApiError> {
        let path = format!("/api/projects/{project_id}/members/{user_id}");
        self.client.call(Method::DELETE, &path, None).await
    }

    async fn list_columns(&self, project_id: Option<i64>) -> Result<Vec<Column>, ApiError> {
        let path = match project_id {
            Some(id) => format!("/api/columns?project_id={id}"),
            None => "/api/columns".to_string(),
        };
        self.client.call(Method::GET, &path, None).await
    }

    async fn list_project_columns(&self, project_id: i64) -> Result<Vec<Column>, ApiError> {
        let path = format!("/api/projects/{project_id}/columns");
        self.client.call(Method::GET, &path, None).await
    }

    async fn get_column(&self, id: i64) -> Result<Column, ApiError> {
        let path = format!("/api/columns/{id}");
        self.client.call(Method::GET, &path, None).await
    }

    async fn create_column(&self, request: CreateColumnRequest) -> Result<Column, ApiError> {
        self.client
            .call_with(Method::POST, "/api/columns", None, &request)
            .await
    }

    async fn update_column(
        &self,
        id: i64,
        request: UpdateColumnRequest,
    ) -> Result<Column, ApiError> {
        let path = format!("/api/columns/{id}");
        self.client
            .call_with(Method::PUT, &path, None, &request)
            .await
    }

    async fn delete_column(&self, id: i64) -> Result<MessageResponse, ApiError> {
        let path = format!("/api/columns/{id}");
        self.client.call(Method::DELETE, &path, None).await
    }

    async fn list_tasks(&self, column_id: i64) -> Result<Vec<Task>, ApiError> {
        let path = format!("/api/tasks?column_id={column_id}");
        self.client.call(Method::GET, &path, None).await
    }

    async fn create_task(&self, request: NewTaskRequest) -> Result<Task, ApiError> {
        self.client
            .call_with(Method::POST, "/api/tasks", None, &request)
            .await
    }
}
