//! HTTP endpoints.
//!
//! Serves the news and notes applications as JSON. Every page asks the
//! authorizer first; `RedirectToLogin` becomes `302 Found` with a
//! `Location: <login>?next=<path>` header and `NotFound` becomes a bare 404.
//!
//! # Endpoints
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/news/` | GET | Latest news |
//! | `/news/:id/` | GET, POST | News with comments; add a comment |
//! | `/news/edit_comment/:id/` | GET, POST | Edit own comment |
//! | `/news/delete_comment/:id/` | GET, POST, DELETE | Delete own comment |
//! | `/notes/` | GET | Notes home |
//! | `/notes/list/` | GET | Own notes |
//! | `/notes/add/` | GET, POST | Add a note |
//! | `/notes/done/` | GET | Success page |
//! | `/notes/note/:slug/` | GET | Own note |
//! | `/notes/edit/:slug/` | GET, POST | Edit own note |
//! | `/notes/delete/:slug/` | GET, POST | Delete own note |
//! | `/auth/login/`, `/auth/logout/` | GET | Auth pages |
//! | `/auth/signup/` | GET, POST | Sign up |

pub mod identity;
pub mod routes;
pub mod state;

pub use identity::Requester;
pub use routes::{
    create_router, create_router_with_observability, error_codes, ApiError, JsonBadRequest,
};
pub use state::AppState;

#[cfg(test)]
mod tests;
