pub mod todo;
pub mod user;

pub use todo::{NewTodo, Todo, TodoUpdate};
pub use user::{Credentials, User};
