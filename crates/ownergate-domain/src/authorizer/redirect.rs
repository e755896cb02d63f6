//! Login redirect targets.

use std::fmt;

/// Query parameter carrying the originally requested path.
pub const NEXT_PARAM: &str = "next";

/// A redirect to the login page that remembers the original request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRedirect {
    login_path: String,
    next: String,
}

impl LoginRedirect {
    pub fn new(login_path: impl Into<String>, original_path: impl Into<String>) -> Self {
        Self {
            login_path: login_path.into(),
            next: original_path.into(),
        }
    }

    /// Builds `<login_path>?next=<original_path>`.
    ///
    /// Segments of the original path are percent-encoded one by one so the
    /// `/` separators survive and `next=/notes/edit/my-note/` reads as-is.
    pub fn location(&self) -> String {
        let encoded: Vec<String> = self
            .next
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!("{}?{}={}", self.login_path, NEXT_PARAM, encoded.join("/"))
    }
}

impl fmt::Display for LoginRedirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.location())
    }
}
