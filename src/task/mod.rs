pub mod task_dto;
pub mod task_handlers;
pub mod task_models;
pub mod task_repository;
pub mod task_service;

pub use task_models::{Task, TaskCategory, TaskStatus};
pub use task_repository::TaskRepository;
pub use task_service::TaskService;
