//! Business logic services.
//!
//! This module contains the list-view machinery shared by every portal
//! screen: talking to the platform API, building queries, normalizing list
//! responses, paging, row actions and the view composer that ties them
//! together.
//!
//! Services take their collaborators (session, transport, notifier) as
//! arguments and hold no global state.

pub mod api_client;
pub mod debounce;
pub mod list_fetcher;
pub mod list_view;
pub mod notifications;
pub mod pagination;
pub mod query_builder;
pub mod row_actions;
pub mod session;
pub mod text;

pub use api_client::{PortalClient, PortalClientConfig, Transport};
pub use list_fetcher::{fetch_page, FetchTicket};
pub use list_view::{FetchCompletion, ListView, ViewMessages, ViewSpec, ViewState};
pub use notifications::{LogNotifier, Notice, NoticeBuffer, NoticeLevel, Notifier};
pub use pagination::PaginationController;
pub use query_builder::build_query;
pub use row_actions::RowActionDispatcher;
pub use session::{Role, Session};
