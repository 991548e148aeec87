pub mod todo;

pub use todo::{CompletionFilter, NewTodoRequest, Todo, UpdateTodoRequest};
