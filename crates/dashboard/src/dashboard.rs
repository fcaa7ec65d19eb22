//! Dashboard state and commands.

use std::sync::Arc;
use chrono::{DateTime, TimeZone};
use missiondesk_client::{ApiError, MissionApi};
use missiondesk_core::{
    FilterState, Mission, MissionId, Notice, Notifier, PeriodFilter, StatusFilter, User,
};
use tracing::{debug, error, info};
use crate::view::{clamp_page, derive_view, MissionPage, DEFAULT_PAGE_SIZE};

/// Result alias for dashboard commands.
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Errors raised by [`Dashboard`] commands.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// A backend call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// `confirm_delete` without a prior `request_delete`
    #[error("no deletion is awaiting confirmation")]
    NothingToConfirm,
}

/// Headline counters over the unfiltered list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MissionStats {
    /// All missions
    pub total: usize,
    /// Created in the current calendar month
    pub this_month: usize,
    /// With a final report
    pub completed: usize,
    /// Without a final report
    pub in_progress: usize,
}

/// The signed-in user's mission list with its filters and pagination.
pub struct Dashboard {
    missions: Vec<Mission>,
    filter: FilterState,
    page: usize,
    page_size: usize,
    pending_delete: Option<MissionId>,
    notifier: Arc<dyn Notifier>,
}

impl Dashboard {
    /// Empty dashboard with the default page size.
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            missions: Vec::new(),
            filter: FilterState::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            pending_delete: None,
            notifier,
        }
    }

    /// Override the page size. Zero is treated as one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Every loaded mission, unfiltered.
    pub fn missions(&self) -> &[Mission] {
        &self.missions
    }

    /// Active filters.
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Current 1-based page.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Missions per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Mission awaiting delete confirmation.
    pub fn pending_delete(&self) -> Option<&MissionId> {
        self.pending_delete.as_ref()
    }

    /// Reload the user's missions.
    ///
    /// On failure the previous list is kept.
    pub async fn refresh(&mut self, api: &impl MissionApi, user: &User) -> Result<()> {
        match api.user_missions(&user.id).await {
            Ok(missions) => {
                debug!("Loaded {} missions for {}", missions.len(), user.id);
                self.missions = missions;
                Ok(())
            }
            Err(e) => {
                error!("Failed to load missions: {}", e);
                self.notifier
                    .notify(Notice::error(format!("Failed to load missions: {}", e.user_message())));
                Err(e.into())
            }
        }
    }

    /// Set the name search term.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
        self.page = 1;
    }

    /// Set the completion filter.
    pub fn set_status(&mut self, status: StatusFilter) {
        self.filter.status = status;
        self.page = 1;
    }

    /// Set the creation period filter.
    pub fn set_period(&mut self, period: PeriodFilter) {
        self.filter.period = period;
        self.page = 1;
    }

    /// Clear every filter.
    pub fn reset_filters(&mut self) {
        self.filter = FilterState::default();
        self.page = 1;
    }

    /// Jump to `page`, clamped to the pages that exist.
    pub fn set_page<Tz: TimeZone>(&mut self, page: usize, now: &DateTime<Tz>) {
        self.page = clamp_page(page, self.filtered_count(now), self.page_size);
    }

    /// The current page.
    pub fn view<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> MissionPage<'_> {
        derive_view(&self.missions, &self.filter, self.page, self.page_size, now)
    }

    /// Counters for the header cards.
    pub fn stats<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> MissionStats {
        let completed = self.missions.iter().filter(|m| m.is_completed()).count();
        MissionStats {
            total: self.missions.len(),
            this_month: self
                .missions
                .iter()
                .filter(|m| PeriodFilter::ThisMonth.contains(&m.created_at, now))
                .count(),
            completed,
            in_progress: self.missions.len() - completed,
        }
    }

    /// Look up a loaded mission.
    pub fn find(&self, id: &MissionId) -> Option<&Mission> {
        self.missions.iter().find(|m| &m.id == id)
    }

    /// A mission was just created: reload and show the first page.
    ///
    /// If the reload fails the mission is added to the local list instead.
    pub async fn mission_created(&mut self, api: &impl MissionApi, user: &User, mission: &Mission) -> Result<()> {
        info!("Mission {} created", mission.id);
        self.page = 1;
        if self.refresh(api, user).await.is_err() && self.find(&mission.id).is_none() {
            self.missions.insert(0, mission.clone());
        }
        self.notifier
            .notify(Notice::success(format!("Mission \"{}\" created", mission.name)));
        Ok(())
    }

    /// Ask for confirmation before deleting `id`.
    pub fn request_delete(&mut self, id: MissionId) {
        self.pending_delete = Some(id);
    }

    /// Drop the pending deletion.
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the pending mission, reload, and pull the page back if it no
    /// longer exists.
    ///
    /// The pending request is consumed whether or not the delete succeeds.
    /// A failed reload after a successful delete drops the mission locally.
    pub async fn confirm_delete<Tz: TimeZone>(
        &mut self,
        api: &impl MissionApi,
        user: &User,
        now: &DateTime<Tz>,
    ) -> Result<MissionId> {
        let id = self.pending_delete.take().ok_or(DashboardError::NothingToConfirm)?;

        if let Err(e) = api.delete_mission(&id).await {
            error!("Failed to delete mission {}: {}", id, e);
            self.notifier
                .notify(Notice::error(format!("Failed to delete mission: {}", e.user_message())));
            return Err(e.into());
        }
        info!("Mission {} deleted", id);

        if self.refresh(api, user).await.is_err() {
            self.missions.retain(|m| m.id != id);
        }
        self.page = clamp_page(self.page, self.filtered_count(now), self.page_size);
        self.notifier.notify(Notice::success("Mission deleted"));
        Ok(id)
    }

    fn filtered_count<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> usize {
        let matches = self.filter.matcher(now);
        self.missions.iter().filter(|&m| matches(m)).count()
    }
}
