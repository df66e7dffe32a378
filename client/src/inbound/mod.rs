//! Inbound side: what page scripts call.
//!
//! [`Router`] navigates between pages and enforces role gates;
//! [`PageContext`] bootstraps a page with its session and gateway client.

pub mod page;
pub mod router;

pub use page::{PageContext, SIGNED_IN_REDIRECT_DELAY};
pub use router::{DEFAULT_REDIRECT_DELAY, LOGIN_REDIRECT_DELAY, PUBLIC_PAGES, Router};
