//! List commands: load one page of a portal list screen.

use crate::commands::context::PortalContext;
use crate::commands::views::ViewKind;
use crate::error::AppError;
use crate::models::{
    AccountStatus, CompanyData, FilterValue, ListRow, TotalCount, UserCandidate, Vacancy,
    VacancyItem,
};
use crate::services::list_view::{ListView, ViewState};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Input for the list commands.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListInput {
    /// 1-based page; clamped to the last page.
    #[serde(default)]
    pub page: Option<u32>,
    /// Rows per page; defaults to the configured size.
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub search: Option<String>,
    /// Field filters keyed by backend field name.
    #[serde(default)]
    pub filters: BTreeMap<String, FilterValue>,
}

/// One rendered page of a list screen.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage<T> {
    pub title: String,
    pub state: ViewState,
    pub rows: Vec<T>,
    /// Shown instead of the table when `state` is empty.
    pub empty_message: Option<String>,
    pub page: u32,
    pub page_size: u32,
    pub total: TotalCount,
    pub total_items: u64,
    pub total_pages: u32,
    pub can_go_previous: bool,
    pub can_go_next: bool,
    pub pages: Vec<Option<u32>>,
}

impl<T: Clone> ListPage<T> {
    /// Snapshot the current state of a view.
    pub fn from_view(view: &ListView<T>) -> Self
    where
        T: ListRow + DeserializeOwned,
    {
        let pagination = view.pagination();
        let state = view.view_state();
        Self {
            title: view.spec().messages.title.clone(),
            state,
            rows: view.rows().to_vec(),
            empty_message: (state == ViewState::Empty).then(|| view.spec().messages.empty.clone()),
            page: pagination.current_page(),
            page_size: pagination.page_size(),
            total: pagination.total(),
            total_items: pagination.total_items(),
            total_pages: pagination.total_pages(),
            can_go_previous: pagination.can_go_previous(),
            can_go_next: pagination.can_go_next(),
            pages: pagination.page_window(),
        }
    }
}

/// Apply `input` to a fresh view and fetch the requested page.
///
/// Fetch failures are not errors here: the view clears itself and the
/// notifier receives the error notice.
pub async fn load_list<T>(
    ctx: &PortalContext,
    kind: ViewKind,
    input: ListInput,
) -> Result<ListPage<T>, AppError>
where
    T: ListRow + DeserializeOwned + Clone,
{
    let mut view = ctx.open_view::<T>(kind)?;
    apply_input(&mut view, input)?;
    view.refresh().await;
    Ok(ListPage::from_view(&view))
}

/// Set filters, search and paging from `input` on an unfetched view.
pub(crate) fn apply_input<T>(view: &mut ListView<T>, input: ListInput) -> Result<(), AppError>
where
    T: ListRow + DeserializeOwned,
{
    for (key, value) in input.filters {
        view.set_filter(key, value);
    }
    if let Some(search) = input.search {
        view.commit_search(search.trim());
    }
    if let Some(page_size) = input.page_size {
        view.set_page_size(page_size)?;
    }
    if let Some(page) = input.page {
        if page == 0 {
            return Err(AppError::invalid_input_field("page must be at least 1", "page"));
        }
        view.seek_page(page);
    }
    Ok(())
}

/// Companies pending review, or already approved.
pub async fn list_companies(
    ctx: &PortalContext,
    approved: bool,
    input: ListInput,
) -> Result<ListPage<CompanyData>, AppError> {
    let kind = if approved {
        ViewKind::ApprovedCompanies
    } else {
        ViewKind::PendingCompanies
    };
    load_list(ctx, kind, input).await
}

/// Job seekers pending review.
pub async fn list_pending_users(
    ctx: &PortalContext,
    input: ListInput,
) -> Result<ListPage<UserCandidate>, AppError> {
    load_list(ctx, ViewKind::PendingUsers, input).await
}

/// Vacancies pending review.
pub async fn list_pending_vacancies(
    ctx: &PortalContext,
    input: ListInput,
) -> Result<ListPage<VacancyItem>, AppError> {
    load_list(ctx, ViewKind::PendingVacancies, input).await
}

/// Open vacancies of the logged-in employer.
///
/// Only approved company accounts have a vacancy list.
pub async fn list_employer_vacancies(
    ctx: &PortalContext,
    input: ListInput,
) -> Result<ListPage<Vacancy>, AppError> {
    require_approved_account(ctx)?;
    load_list(ctx, ViewKind::EmployerVacancies, input).await
}

pub(crate) fn require_approved_account(ctx: &PortalContext) -> Result<(), AppError> {
    match AccountStatus::from_loose(ctx.session.account_status.as_deref()) {
        AccountStatus::Aprobada => Ok(()),
        status => Err(AppError::invalid_input_field(
            format!("Company account is {:?}, vacancies are unavailable", status),
            "accountStatus",
        )),
    }
}
