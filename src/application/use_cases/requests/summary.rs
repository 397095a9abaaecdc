use chrono::NaiveDate;

use crate::application::access::Viewer;
use crate::application::dto::requests::{RequestFilter, RequestSummary, TeamCount, TypeCount};
use crate::application::ports::request_repository::RequestRepository;
use crate::domain::maintenance::request::RequestType;

/// Counts for the reporting page over the requests the viewer can see.
pub struct SummarizeRequests<'a, R: RequestRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: RequestRepository + ?Sized> SummarizeRequests<'a, R> {
    pub async fn execute(
        &self,
        viewer: &Viewer,
        today: NaiveDate,
    ) -> anyhow::Result<RequestSummary> {
        let rows = self
            .repo
            .list(&viewer.request_scope(), &RequestFilter::default())
            .await?;

        let mut by_team: Vec<TeamCount> = Vec::new();
        for row in &rows {
            match by_team.iter_mut().find(|t| t.team_id == row.team_id) {
                Some(entry) => entry.count += 1,
                None => by_team.push(TeamCount {
                    team_id: row.team_id,
                    team_name: row.team_name.clone(),
                    count: 1,
                }),
            }
        }
        by_team.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.team_name.cmp(&b.team_name)));

        let by_type = RequestType::ALL
            .into_iter()
            .map(|request_type| TypeCount {
                request_type,
                count: rows.iter().filter(|r| r.request_type == request_type).count(),
            })
            .collect();

        Ok(RequestSummary {
            total: rows.len(),
            open: rows.iter().filter(|r| !r.status.is_closed()).count(),
            overdue: rows.iter().filter(|r| r.is_overdue(today)).count(),
            by_team,
            by_type,
        })
    }
}
