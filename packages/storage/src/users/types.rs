// ABOUTME: Type definitions for user records
// ABOUTME: Mirrors the users table layout

use serde::{Deserialize, Serialize};

/// User row stored in the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub provider: String,
    pub provider_id: Option<String>,
    pub max_usage: i64,
    pub usage: i64,
    pub created_at: String,
}

/// Attributes supplied when creating a user on first sign-in
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub provider: String,
    pub provider_id: Option<String>,
}
