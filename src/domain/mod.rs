pub mod entity;
pub mod pomodoro;
pub mod repository;
pub mod timer;
