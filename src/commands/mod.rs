//! Portal command handlers.
//!
//! Each command takes a [`PortalContext`] and a camelCase input, drives a
//! list view or row action, and returns a serializable response. Commands
//! are organized by functionality:
//! - `views`: the list screens and their texts
//! - `lists`: loading a page of a list screen
//! - `review`: approve/reject, closing vacancies, resubmitting a company

pub mod context;
pub mod lists;
pub mod review;
pub mod views;

pub use context::PortalContext;
pub use lists::{
    list_companies, list_employer_vacancies, list_pending_users, list_pending_vacancies,
    load_list, ListInput, ListPage,
};
pub use review::{close_vacancy, resubmit_company, review, ActionResponse, ReviewInput, ReviewTarget};
pub use views::ViewKind;
