pub mod task;
pub mod user;

pub use task::{Task, TaskCreate, TaskQuery, TaskStatus, TaskStatusUpdate, TaskUpdate};
pub use user::{NewUser, User, UserChanges, UserCreate, UserResponse, UserRole, UserUpdate};
