// src/models/mod.rs

pub mod ad;
pub mod block;
pub mod comment;
pub mod contact;
pub mod story;
pub mod team;
pub mod user;
