// src/handlers/mod.rs

pub mod admin;
pub mod auth;
pub mod authors;
pub mod comments;
pub mod contact;
pub mod interactions;
pub mod media;
pub mod site;
pub mod stories;
pub mod profile;
