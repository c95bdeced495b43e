pub mod auth_helper;
