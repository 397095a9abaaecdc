use super::{SortField, SortOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamSort {
    TeamName,
}

impl SortField for TeamSort {
    const ALL: &'static [Self] = &[TeamSort::TeamName];

    fn name(&self) -> &'static str {
        match self {
            TeamSort::TeamName => "team_name",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TeamFilter {
    pub search: Option<String>,
    pub ordering: SortOrder<TeamSort>,
}

impl Default for TeamFilter {
    fn default() -> Self {
        Self {
            search: None,
            ordering: SortOrder::asc(TeamSort::TeamName),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewTeam {
    pub team_name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct TeamPatch {
    pub team_name: Option<String>,
    pub description: Option<String>,
}
