//! ownergate-domain: Core access-control domain logic
//!
//! This crate contains the pure, synchronous parts of ownergate:
//! - Identities and the news/notes resource types
//! - The `authorize` decision function and login redirects
//! - Comment, note and account form validation
//! - Title transliteration into note slugs
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              ownergate-domain                │
//! ├─────────────────────────────────────────────┤
//! │  model/      - Identity & resource types    │
//! │  authorizer/ - Access decisions, redirects  │
//! │  validation/ - Form validation              │
//! │  slug.rs     - Slug generation              │
//! └─────────────────────────────────────────────┘
//! ```

pub mod authorizer;
pub mod error;
pub mod model;
pub mod slug;
pub mod validation;

// Re-export commonly used types at the crate root
pub use authorizer::{authorize, AccessDecision, Action, Guarded, LoginRedirect, Visibility};
pub use error::{DomainError, DomainResult};
pub use model::{Comment, Identity, News, Note, User, UserId};
