//! # JIRA API Rust client
//!
//! An async Rust client for the JIRA REST API, providing a thin JSON
//! transport, cookie-session and basic-auth credential handling, and typed
//! views over the common JIRA resources.
//!
//! ## Overview
//!
//! This crate provides:
//! - A JSON-speaking HTTP transport via [`RestClient`], with one exchange
//!   per call and structured errors for server rejections
//! - Basic and cookie-session authentication via [`Credentials`], with lazy
//!   login on first use
//! - Permissive field extraction via [`field`]: sparse or mistyped payloads
//!   produce resources with empty fields, never errors
//! - Typed resources ([`resources::Issue`], [`resources::Project`],
//!   [`resources::Comment`], ...) built through one construction path
//! - Multipart attachment uploads and the quoted-string `POST` shape some
//!   JIRA endpoints require
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use jira_api::{Credentials, Jira};
//!
//! let jira = Jira::with_credentials(
//!     "https://jira.example.com",
//!     Credentials::session("bob", "secret"),
//! )?;
//!
//! let issue = jira.issue("PROJ-1").await?;
//! println!("{}: {}", issue, issue.summary.as_deref().unwrap_or(""));
//!
//! for comment in issue.comments().await? {
//!     println!("  {}", comment.body.as_deref().unwrap_or(""));
//! }
//!
//! jira.logout().await?;
//! ```
//!
//! ## Working with the transport directly
//!
//! The typed layer is optional; [`RestClient`] can be used on its own for
//! endpoints this crate has no types for:
//!
//! ```rust,ignore
//! use jira_api::{BaseUrl, Credentials, RestClient};
//!
//! let client = RestClient::with_credentials(
//!     BaseUrl::new("https://jira.example.com")?,
//!     Credentials::basic("bob", "secret"),
//! );
//!
//! let board = client.get_object("rest/agile/1.0/board/42").await?;
//! ```
//!
//! ## Error handling
//!
//! Resource operations return [`JiraError`], which wraps the transport's
//! [`RestError`] with the context of the failed operation. Server
//! rejections keep their status code, body, and headers, so callers can
//! branch on a 404 without parsing message strings.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod field;
pub mod resources;
pub mod rest;

pub use auth::{AuthError, Credentials, SessionCredentials};
pub use client::Jira;
pub use config::{BaseUrl, API_PATH, AUTH_PATH};
pub use error::{ConfigError, JiraError};
pub use rest::{AttachmentContent, NewAttachment, ResponseError, RestClient, RestError};
