//! Shared state handed to every command.

use crate::commands::views::ViewKind;
use crate::config::PortalConfig;
use crate::error::AppError;
use crate::models::ListRow;
use crate::services::api_client::{PortalClient, Transport};
use crate::services::debounce::DEFAULT_SEARCH_DEBOUNCE_MS;
use crate::services::list_view::ListView;
use crate::services::notifications::Notifier;
use crate::services::session::Session;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Session, transport and notice sink of one logged-in portal user.
#[derive(Clone)]
pub struct PortalContext {
    pub session: Session,
    pub transport: Arc<dyn Transport>,
    pub notifier: Arc<dyn Notifier>,
    pub page_size: u32,
    pub search_debounce: Duration,
}

impl PortalContext {
    pub fn new(session: Session, transport: Arc<dyn Transport>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            session,
            transport,
            notifier,
            page_size: crate::models::DEFAULT_PAGE_SIZE,
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
        }
    }

    /// Build a context talking to the configured API.
    pub fn from_config(config: &PortalConfig, notifier: Arc<dyn Notifier>) -> Result<Self, AppError> {
        let client = PortalClient::new(config.client_config())?;
        Ok(Self {
            session: config.session.clone(),
            transport: Arc::new(client),
            notifier,
            page_size: config.page_size,
            search_debounce: config.search_debounce(),
        })
    }

    /// Open a list view, checking the session may see it.
    pub fn open_view<T>(&self, kind: ViewKind) -> Result<ListView<T>, AppError>
    where
        T: ListRow + DeserializeOwned,
    {
        self.session.require_role(kind.required_role())?;
        ListView::new(
            kind.spec(),
            &self.session,
            Arc::clone(&self.transport),
            Arc::clone(&self.notifier),
        )?
        .with_search_debounce(self.search_debounce)
        .with_page_size(self.page_size)
    }
}
