//! Conversation domain.

pub mod entities;
