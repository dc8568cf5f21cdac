//! Row action commands: linker reviews, closing vacancies, resubmitting a
//! company for review.

use crate::commands::context::PortalContext;
use crate::commands::lists::require_approved_account;
use crate::commands::views::ViewKind;
use crate::error::AppError;
use crate::models::{
    CompanyData, Decision, DispatchOutcome, ListRow, RowActionRequest, StatusTransition,
    UserCandidate, Vacancy, VacancyItem,
};
use crate::services::list_view::{ListView, ViewState};
use crate::services::notifications::Notice;
use crate::services::row_actions::put_status;
use crate::services::session::Role;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Collections a linker reviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewTarget {
    Companies,
    Users,
    Vacancies,
}

impl ReviewTarget {
    /// The pending list the reviewed row lives in.
    pub fn view(&self) -> ViewKind {
        match self {
            Self::Companies => ViewKind::PendingCompanies,
            Self::Users => ViewKind::PendingUsers,
            Self::Vacancies => ViewKind::PendingVacancies,
        }
    }
}

/// Input for the review command.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInput {
    pub target: ReviewTarget,
    pub row_id: String,
    pub decision: Decision,
    /// Required when rejecting.
    #[serde(default)]
    pub reason: Option<String>,
}

impl ReviewInput {
    fn request(&self) -> RowActionRequest {
        RowActionRequest {
            row_id: self.row_id.trim().to_string(),
            decision: self.decision,
            reason: self.reason.clone(),
        }
    }
}

/// Result of a row action, with the state of the refetched list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub success: bool,
    pub state: ViewState,
    /// Rows on the refetched page.
    pub remaining_rows: usize,
    pub total_items: u64,
}

impl ActionResponse {
    fn from_view<T: ListRow + DeserializeOwned>(success: bool, view: &ListView<T>) -> Self {
        Self {
            success,
            state: view.view_state(),
            remaining_rows: view.rows().len(),
            total_items: view.pagination().total_items(),
        }
    }
}

/// Approve or reject a pending company, user or vacancy.
///
/// Works like the review screen: load the first page of the pending list,
/// open the row's detail, send the decision, then refetch. The decision is
/// sent even when the row is not on the first page; the detail step is then
/// skipped. On failure the loaded rows stay in the response.
///
/// # Arguments
/// * `ctx` - Linker context
/// * `input` - Target collection, row and decision
///
/// # Returns
/// Whether the backend accepted the decision, and the refreshed list state
pub async fn review(ctx: &PortalContext, input: ReviewInput) -> Result<ActionResponse, AppError> {
    let request = input.request();
    request.validate()?;

    match input.target {
        ReviewTarget::Companies => review_in::<CompanyData>(ctx, input.target.view(), &request).await,
        ReviewTarget::Users => review_in::<UserCandidate>(ctx, input.target.view(), &request).await,
        ReviewTarget::Vacancies => review_in::<VacancyItem>(ctx, input.target.view(), &request).await,
    }
}

async fn review_in<T>(
    ctx: &PortalContext,
    kind: ViewKind,
    request: &RowActionRequest,
) -> Result<ActionResponse, AppError>
where
    T: ListRow + DeserializeOwned,
{
    let mut view = ctx.open_view::<T>(kind)?;
    view.refresh().await;
    if !view.open_detail(&request.row_id) {
        log::debug!(
            "{} is not on the first page of {}, sending without detail",
            request.row_id,
            view.endpoint()
        );
    }

    let success = view.review_row(request).await;
    Ok(ActionResponse::from_view(success, &view))
}

/// Close one of the employer's open vacancies.
///
/// Loads the open vacancies first so the response reflects the list before
/// and after the change, as the vacancies screen does.
pub async fn close_vacancy(ctx: &PortalContext, vacancy_id: &str) -> Result<ActionResponse, AppError> {
    let vacancy_id = vacancy_id.trim();
    if vacancy_id.is_empty() {
        return Err(AppError::invalid_input_field("Vacancy ID is required", "vacancyId"));
    }
    require_approved_account(ctx)?;

    let mut view = ctx.open_view::<Vacancy>(ViewKind::EmployerVacancies)?;
    view.refresh().await;
    let transition = StatusTransition::new(vacancy_id, "companyStatus", "CERRADA");
    let success = view
        .transition_row(&transition, "Vacante cerrada correctamente.")
        .await;
    Ok(ActionResponse::from_view(success, &view))
}

/// Put the employer's company back into review after its data was edited.
///
/// A 409 means the company is already in review and is not an error.
pub async fn resubmit_company(ctx: &PortalContext) -> Result<DispatchOutcome, AppError> {
    ctx.session.require_role(Role::Employer)?;
    let endpoint = format!("{}/status", ctx.session.scope_path()?);

    match put_status(ctx.transport.as_ref(), &endpoint, &json!({ "status": "REVISION" })).await {
        Ok(outcome) => {
            ctx.notifier
                .notify(Notice::success("Tu empresa fue enviada a revisión."));
            Ok(outcome)
        }
        Err(e) => {
            ctx.notifier
                .notify(Notice::error("Error al actualizar el estatus."));
            Err(e)
        }
    }
}
