use uuid::Uuid;

use crate::application::dto::teams::{NewTeam, TeamFilter, TeamPatch};
use crate::application::ports::team_repository::TeamRepository;
use crate::application::use_cases::write_error::{WriteError, optional_required, required};
use crate::domain::maintenance::team::MaintenanceTeam;

pub struct ListTeams<'a, R: TeamRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: TeamRepository + ?Sized> ListTeams<'a, R> {
    pub async fn execute(&self, filter: &TeamFilter) -> anyhow::Result<Vec<MaintenanceTeam>> {
        self.repo.list(filter).await
    }
}

pub struct GetTeam<'a, R: TeamRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: TeamRepository + ?Sized> GetTeam<'a, R> {
    pub async fn execute(&self, id: Uuid) -> anyhow::Result<Option<MaintenanceTeam>> {
        self.repo.get(id).await
    }
}

pub struct CreateTeam<'a, R: TeamRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: TeamRepository + ?Sized> CreateTeam<'a, R> {
    pub async fn execute(&self, team: NewTeam) -> Result<MaintenanceTeam, WriteError> {
        let team = NewTeam {
            team_name: required("team_name", &team.team_name)?,
            description: team.description.trim().to_string(),
        };
        Ok(self.repo.create(&team).await?)
    }
}

pub struct UpdateTeam<'a, R: TeamRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: TeamRepository + ?Sized> UpdateTeam<'a, R> {
    pub async fn execute(&self, id: Uuid, patch: TeamPatch) -> Result<MaintenanceTeam, WriteError> {
        let patch = TeamPatch {
            team_name: optional_required("team_name", patch.team_name.as_deref())?,
            description: patch.description.map(|d| d.trim().to_string()),
        };
        self.repo
            .update(id, &patch)
            .await?
            .ok_or(WriteError::NotFound)
    }
}

pub struct DeleteTeam<'a, R: TeamRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: TeamRepository + ?Sized> DeleteTeam<'a, R> {
    pub async fn execute(&self, id: Uuid) -> anyhow::Result<bool> {
        self.repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::SortOrder;
    use crate::application::dto::teams::TeamSort;
    use crate::testing::InMemoryStore;

    #[tokio::test]
    async fn search_and_descending_order() {
        let store = InMemoryStore::new();
        store.add_team("Electrical");
        store.add_team("General Maintenance");
        store.add_team("IT Support");

        let uc = ListTeams { repo: &store };
        let names = |teams: Vec<MaintenanceTeam>| {
            teams.into_iter().map(|t| t.team_name).collect::<Vec<_>>()
        };

        let all = uc
            .execute(&TeamFilter {
                search: None,
                ordering: SortOrder::desc(TeamSort::TeamName),
            })
            .await
            .unwrap();
        assert_eq!(
            names(all),
            vec!["IT Support", "General Maintenance", "Electrical"]
        );

        let found = uc
            .execute(&TeamFilter {
                search: Some("MAINT".into()),
                ..TeamFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(names(found), vec!["General Maintenance"]);
    }

    #[tokio::test]
    async fn blank_names_are_rejected() {
        let store = InMemoryStore::new();
        let err = CreateTeam { repo: &store }
            .execute(NewTeam {
                team_name: "   ".into(),
                description: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, WriteError::Invalid(_)));
    }

    #[tokio::test]
    async fn update_of_missing_team_is_not_found() {
        let store = InMemoryStore::new();
        let err = UpdateTeam { repo: &store }
            .execute(
                Uuid::new_v4(),
                TeamPatch {
                    team_name: Some("Fleet".into()),
                    description: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WriteError::NotFound));
    }
}
