pub mod calendar_service;
pub mod diary_api;
pub mod journal_service;
