pub mod diary_client;
