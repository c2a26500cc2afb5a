pub mod board;
pub mod user;

pub use board::{
    AddMemberRequest, Column, CreateColumnRequest, CreateProjectRequest, NewTaskRequest, Project,
    ProjectMember, Task, UpdateColumnRequest, UpdateMemberRoleRequest, UpdateProjectRequest,
};
pub use user::{
    AuthResponse, LoginRequest, MessageResponse, RegisterRequest, UpdatePasswordRequest,
    UpdateUserRequest, User,
};
