//! Filtering and pagination of the mission list.

use chrono::{DateTime, TimeZone};
use missiondesk_core::{FilterState, Mission};

/// Missions shown per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// One page of the filtered mission list.
#[derive(Debug, Clone, PartialEq)]
pub struct MissionPage<'a> {
    /// Missions on this page, in list order
    pub missions: Vec<&'a Mission>,
    /// Size of the unfiltered list
    pub total_count: usize,
    /// Missions passing the filters
    pub filtered_count: usize,
    /// Number of pages, never below 1
    pub total_pages: usize,
    /// The 1-based page this slice belongs to
    pub page: usize,
}

impl MissionPage<'_> {
    /// True when this page shows nothing.
    pub fn is_empty(&self) -> bool {
        self.missions.is_empty()
    }
}

/// Number of pages needed for `filtered` missions. Always at least 1.
pub fn max_page(filtered: usize, page_size: usize) -> usize {
    filtered.div_ceil(page_size.max(1)).max(1)
}

/// Bring `page` into `1..=max_page(filtered, page_size)`.
pub fn clamp_page(page: usize, filtered: usize, page_size: usize) -> usize {
    page.clamp(1, max_page(filtered, page_size))
}

/// Filter `missions` and cut out the requested page.
///
/// A page past the end yields an empty slice. Page 0 is read as page 1 and a
/// page size of 0 as 1.
pub fn derive_view<'a, Tz: TimeZone>(
    missions: &'a [Mission],
    filter: &FilterState,
    page: usize,
    page_size: usize,
    now: &DateTime<Tz>,
) -> MissionPage<'a> {
    let page = page.max(1);
    let page_size = page_size.max(1);

    let matches = filter.matcher(now);
    let filtered: Vec<&Mission> = missions.iter().filter(|&m| matches(m)).collect();
    let filtered_count = filtered.len();

    let start = (page - 1).saturating_mul(page_size);
    let slice = filtered.into_iter().skip(start).take(page_size).collect();

    MissionPage {
        missions: slice,
        total_count: missions.len(),
        filtered_count,
        total_pages: max_page(filtered_count, page_size),
        page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use missiondesk_core::{MissionId, PeriodFilter, StatusFilter, UserId};

    fn mission(n: usize, name: &str, created_at: DateTime<Utc>) -> Mission {
        Mission {
            id: MissionId::new(format!("m-{}", n)),
            name: name.to_string(),
            context: None,
            problem: None,
            tools: None,
            constraints: Vec::new(),
            kpis: None,
            objectives: Vec::new(),
            created_at,
            user_id: UserId::from("u-1"),
            report_path: None,
            form_url: None,
            form_id: None,
        }
    }

    fn seven() -> Vec<Mission> {
        let now = Utc::now();
        (1..=7).map(|n| mission(n, &format!("Mission {}", n), now)).collect()
    }

    fn names(page: &MissionPage<'_>) -> Vec<String> {
        page.missions.iter().map(|m| m.name.clone()).collect()
    }

    #[test]
    fn test_first_page_of_seven() {
        let missions = seven();
        let view = derive_view(&missions, &FilterState::default(), 1, 6, &Utc::now());

        assert_eq!(view.missions.len(), 6);
        assert_eq!(names(&view)[0], "Mission 1");
        assert_eq!(names(&view)[5], "Mission 6");
        assert_eq!(view.total_count, 7);
        assert_eq!(view.filtered_count, 7);
        assert_eq!(view.total_pages, 2);
    }

    #[test]
    fn test_second_and_out_of_range_pages() {
        let missions = seven();
        let now = Utc::now();

        let second = derive_view(&missions, &FilterState::default(), 2, 6, &now);
        assert_eq!(names(&second), vec!["Mission 7"]);

        let beyond = derive_view(&missions, &FilterState::default(), 9, 6, &now);
        assert!(beyond.is_empty());
        assert_eq!(beyond.total_pages, 2);
    }

    #[test]
    fn test_search_without_match() {
        let missions = seven();
        let filter = FilterState { search: "zzz".to_string(), ..Default::default() };
        let view = derive_view(&missions, &filter, 1, 6, &Utc::now());

        assert_eq!(view.filtered_count, 0);
        assert!(view.is_empty());
        assert_eq!(view.total_pages, 1);
    }

    #[test]
    fn test_search_is_case_insensitive_on_name() {
        let now = Utc::now();
        let mut missions = vec![mission(1, "Retail Pricing", now), mission(2, "Logistics", now)];
        missions[1].context = Some("pricing".to_string());

        let filter = FilterState { search: "PRIC".to_string(), ..Default::default() };
        let view = derive_view(&missions, &filter, 1, 6, &now);
        assert_eq!(names(&view), vec!["Retail Pricing"]);
    }

    #[test]
    fn test_completed_status() {
        let mut missions = seven();
        for i in [0, 3, 6] {
            missions[i].report_path = Some(format!("reports/{}.pdf", i));
        }

        let completed = FilterState { status: StatusFilter::Completed, ..Default::default() };
        let view = derive_view(&missions, &completed, 1, 6, &Utc::now());
        assert_eq!(view.filtered_count, 3);
        assert_eq!(names(&view), vec!["Mission 1", "Mission 4", "Mission 7"]);

        let open = FilterState { status: StatusFilter::InProgress, ..Default::default() };
        assert_eq!(derive_view(&missions, &open, 1, 6, &Utc::now()).filtered_count, 4);
    }

    #[test]
    fn test_predicates_are_anded() {
        let now = Utc::now();
        let mut missions = vec![
            mission(1, "Audit A", now),
            mission(2, "Audit B", now - Duration::days(400)),
            mission(3, "Survey", now),
        ];
        missions[0].report_path = Some("a.pdf".to_string());
        missions[1].report_path = Some("b.pdf".to_string());

        let filter = FilterState {
            search: "audit".to_string(),
            status: StatusFilter::Completed,
            period: PeriodFilter::Last15Days,
        };
        let view = derive_view(&missions, &filter, 1, 6, &now);
        assert_eq!(names(&view), vec!["Audit A"]);
    }

    #[test]
    fn test_degenerate_page_and_size() {
        let missions = seven();
        let view = derive_view(&missions, &FilterState::default(), 0, 0, &Utc::now());
        assert_eq!(view.page, 1);
        assert_eq!(view.missions.len(), 1);
        assert_eq!(view.total_pages, 7);
    }

    #[test]
    fn test_page_math() {
        assert_eq!(max_page(0, 6), 1);
        assert_eq!(max_page(6, 6), 1);
        assert_eq!(max_page(7, 6), 2);
        assert_eq!(max_page(3, 0), 3);

        assert_eq!(clamp_page(2, 6, 6), 1);
        assert_eq!(clamp_page(0, 10, 6), 1);
        assert_eq!(clamp_page(2, 7, 6), 2);
    }
}
