//! Mission list view.
//!
//! [`derive_view`] is the pure filter and paginate step. [`Dashboard`] owns
//! the single mission list, the filter state and the current page, and keeps
//! the page valid as missions are created and deleted.

#![warn(missing_docs)]

pub mod view;
pub mod dashboard;

pub use view::{clamp_page, derive_view, max_page, MissionPage, DEFAULT_PAGE_SIZE};
pub use dashboard::{Dashboard, DashboardError, MissionStats, Result};
