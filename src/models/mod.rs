//! Data models for the application.
//!
//! These models represent the records owned by the platform backend and the
//! list/action state the portal keeps around them. Entities are transient,
//! request-scoped copies; nothing is persisted locally.

pub mod company;
pub mod list;
pub mod row_action;
pub mod user_candidate;
pub mod vacancy;

// Re-exports for convenient access
pub use company::{AccountStatus, Company, CompanyAccount, CompanyData, CompanyStatus};
pub use list::{FilterValue, ListQuery, ListResult, ListRow, TotalCount, DEFAULT_PAGE_SIZE};
pub use row_action::{Decision, DispatchOutcome, ReviewBody, RowActionRequest, StatusTransition};
pub use user_candidate::{UserCandidate, UserStatus};
pub use vacancy::{Vacancy, VacancyCompany, VacancyItem, VacancyStatus};
