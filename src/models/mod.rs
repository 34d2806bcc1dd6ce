pub mod task;
pub mod user;

pub use task::{Task, TaskAssignment, TaskInput, TaskPatch, TaskQuery, TaskStatus, TaskStatusUpdate};
pub use user::{AuthResponse, LoginRequest, RegisterRequest, User, UserProfile};
