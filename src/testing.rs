//! In-memory implementation of every repository port, used by unit and router tests.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, OnceLock};

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use crate::application::access::{RequestScope, Viewer};
use crate::application::dto::accounts::{NewAccount, ProfileFilter, ProfilePatch, ProfileSort};
use crate::application::dto::equipment::{
    EquipmentFilter, EquipmentPatch, EquipmentSort, NewEquipment,
};
use crate::application::dto::notifications::{
    NewNotification, NotificationPatch, NotificationSort,
};
use crate::application::dto::requests::{NewRequest, RequestFilter, RequestPatch, RequestSort};
use crate::application::dto::teams::{NewTeam, TeamFilter, TeamPatch};
use crate::application::dto::{SortOrder, contains_ci};
use crate::application::ports::equipment_repository::EquipmentRepository;
use crate::application::ports::errors::DuplicateKey;
use crate::application::ports::notification_repository::NotificationRepository;
use crate::application::ports::request_repository::RequestRepository;
use crate::application::ports::team_repository::TeamRepository;
use crate::application::ports::user_repository::{UserRepository, UserRow};
use crate::application::use_cases::auth::password::hash_password;
use crate::domain::accounts::profile::{Account, Profile};
use crate::domain::accounts::user::{Role, User};
use crate::domain::maintenance::equipment::Equipment;
use crate::domain::maintenance::notification::Notification;
use crate::domain::maintenance::request::{MaintenanceRequest, RequestStatus, RequestType};
use crate::domain::maintenance::team::MaintenanceTeam;

pub const TEST_PASSWORD: &str = "password123";

fn test_password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(TEST_PASSWORD).unwrap())
        .clone()
}

struct UserRec {
    user: User,
    password_hash: Option<String>,
}

struct ProfileRec {
    id: Uuid,
    user_id: Uuid,
    role: Role,
    team_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    users: Vec<UserRec>,
    profiles: Vec<ProfileRec>,
    teams: Vec<MaintenanceTeam>,
    equipment: Vec<Equipment>,
    requests: Vec<MaintenanceRequest>,
    notifications: Vec<Notification>,
    ticks: i64,
}

impl State {
    // strictly increasing timestamps keep created_at ordering deterministic
    fn now(&mut self) -> DateTime<Utc> {
        self.ticks += 1;
        Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap() + Duration::seconds(self.ticks)
    }

    fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().map(|u| &u.user).find(|u| u.id == id)
    }

    fn team_name(&self, id: Option<Uuid>) -> Option<String> {
        let id = id?;
        self.teams
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.team_name.clone())
    }

    fn team_view(&self, team: &MaintenanceTeam) -> MaintenanceTeam {
        MaintenanceTeam {
            member_count: self
                .profiles
                .iter()
                .filter(|p| p.team_id == Some(team.id))
                .count() as i64,
            ..team.clone()
        }
    }

    fn equipment_view(&self, e: &Equipment) -> Equipment {
        Equipment {
            maintenance_team_name: self.team_name(e.maintenance_team_id),
            open_request_count: self
                .requests
                .iter()
                .filter(|r| r.equipment_id == Some(e.id) && !r.status.is_closed())
                .count() as i64,
            ..e.clone()
        }
    }

    fn request_view(&self, r: &MaintenanceRequest) -> MaintenanceRequest {
        MaintenanceRequest {
            equipment_name: r.equipment_id.and_then(|id| {
                self.equipment
                    .iter()
                    .find(|e| e.id == id)
                    .map(|e| e.name.clone())
            }),
            team_name: self.team_name(r.team_id),
            technician_name: r
                .technician_id
                .and_then(|id| self.user(id))
                .map(User::full_name),
            ..r.clone()
        }
    }

    fn profile_view(&self, p: &ProfileRec) -> Option<Profile> {
        Some(Profile {
            id: p.id,
            role: p.role,
            team_id: p.team_id,
            team_name: self.team_name(p.team_id),
            user: self.user(p.user_id)?.clone(),
            created_at: p.created_at,
        })
    }

    fn account(&self, user_id: Uuid) -> Option<Account> {
        let user = self.user(user_id)?.clone();
        let profile = self.profiles.iter().find(|p| p.user_id == user_id);
        Some(Account {
            user,
            role: profile.map(|p| p.role),
            team_id: profile.and_then(|p| p.team_id),
        })
    }

    fn insert_user(&mut self, account: &NewAccount, is_active: bool) -> anyhow::Result<Uuid> {
        if self.users.iter().any(|u| u.user.username == account.username) {
            return Err(DuplicateKey { field: "username" }.into());
        }
        let created_at = self.now();
        let user = User {
            id: Uuid::new_v4(),
            username: account.username.clone(),
            email: account.email.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            is_active,
            created_at,
        };
        let id = user.id;
        self.users.push(UserRec {
            user,
            password_hash: Some(account.password_hash.clone()),
        });
        Ok(id)
    }

    fn insert_profile(&mut self, user_id: Uuid, role: Role, team_id: Option<Uuid>) -> Uuid {
        let created_at = self.now();
        let id = Uuid::new_v4();
        self.profiles.push(ProfileRec {
            id,
            user_id,
            role,
            team_id,
            created_at,
        });
        id
    }

    fn insert_team(&mut self, team: &NewTeam) -> anyhow::Result<MaintenanceTeam> {
        if self.teams.iter().any(|t| t.team_name == team.team_name) {
            return Err(DuplicateKey { field: "team_name" }.into());
        }
        let created_at = self.now();
        let row = MaintenanceTeam {
            id: Uuid::new_v4(),
            team_name: team.team_name.clone(),
            description: team.description.clone(),
            member_count: 0,
            created_at,
        };
        self.teams.push(row.clone());
        Ok(row)
    }

    fn insert_equipment(&mut self, e: &NewEquipment) -> anyhow::Result<Equipment> {
        if self.equipment.iter().any(|x| x.serial_number == e.serial_number) {
            return Err(DuplicateKey {
                field: "serial_number",
            }
            .into());
        }
        let created_at = self.now();
        let row = Equipment {
            id: Uuid::new_v4(),
            name: e.name.clone(),
            serial_number: e.serial_number.clone(),
            department: e.department.clone(),
            owner_name: e.owner_name.clone(),
            location: e.location.clone(),
            purchase_date: e.purchase_date,
            warranty_expiry: e.warranty_expiry,
            maintenance_team_id: e.maintenance_team_id,
            maintenance_team_name: None,
            is_active: e.is_active,
            notes: e.notes.clone(),
            open_request_count: 0,
            created_at,
        };
        self.equipment.push(row.clone());
        Ok(self.equipment_view(&row))
    }

    fn retire_equipment(&mut self, id: Option<Uuid>) {
        if let Some(e) = self.equipment.iter_mut().find(|e| Some(e.id) == id) {
            e.is_active = false;
        }
    }

    fn insert_request(&mut self, r: &NewRequest) -> MaintenanceRequest {
        let now = self.now();
        let row = MaintenanceRequest {
            id: Uuid::new_v4(),
            subject: r.subject.clone(),
            description: r.description.clone(),
            request_type: r.request_type,
            status: r.status,
            equipment_id: r.equipment_id,
            equipment_name: None,
            team_id: r.team_id,
            team_name: None,
            technician_id: r.technician_id,
            technician_name: None,
            created_by_id: Some(r.created_by_id),
            client_id: r.client_id,
            scheduled_date: r.scheduled_date,
            due_date: r.due_date,
            duration_hours: r.duration_hours,
            created_at: now,
            updated_at: now,
        };
        self.requests.push(row.clone());
        self.request_view(&row)
    }
}

/// Mutex-guarded store implementing all repository ports with the same
/// uniqueness and set-null rules as the database schema.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn add_team(&self, team_name: &str) -> Uuid {
        self.state()
            .insert_team(&NewTeam {
                team_name: team_name.into(),
                description: String::new(),
            })
            .unwrap()
            .id
    }

    /// Adds an active account with password `password123`; `role: None` leaves it without a profile.
    pub fn add_user(&self, username: &str, role: Option<Role>, team_id: Option<Uuid>) -> Uuid {
        let mut state = self.state();
        let account = NewAccount {
            username: username.into(),
            password_hash: test_password_hash(),
            email: format!("{username}@example.com"),
            first_name: username.into(),
            last_name: "Test".into(),
            role: role.unwrap_or(Role::User),
            team_id,
        };
        let id = state.insert_user(&account, true).unwrap();
        if let Some(role) = role {
            state.insert_profile(id, role, team_id);
        }
        id
    }

    pub fn deactivate(&self, user_id: Uuid) {
        let mut state = self.state();
        if let Some(rec) = state.users.iter_mut().find(|u| u.user.id == user_id) {
            rec.user.is_active = false;
        }
    }

    pub fn account_by_username(&self, username: &str) -> Option<Account> {
        let state = self.state();
        let id = state
            .users
            .iter()
            .find(|u| u.user.username == username)?
            .user
            .id;
        state.account(id)
    }

    pub fn profile_id(&self, username: &str) -> Option<Uuid> {
        let account = self.account_by_username(username)?;
        self.state()
            .profiles
            .iter()
            .find(|p| p.user_id == account.user.id)
            .map(|p| p.id)
    }

    pub fn viewer(&self, username: &str) -> Viewer {
        let account = self
            .account_by_username(username)
            .unwrap_or_else(|| panic!("no user named {username}"));
        Viewer::from(&account)
    }

    pub fn add_equipment(&self, name: &str, team_id: Option<Uuid>) -> Uuid {
        self.state()
            .insert_equipment(&NewEquipment {
                name: name.into(),
                serial_number: format!("SN-{}", Uuid::new_v4().simple()),
                department: "Production".into(),
                owner_name: String::new(),
                location: String::new(),
                purchase_date: None,
                warranty_expiry: None,
                maintenance_team_id: team_id,
                is_active: true,
                notes: String::new(),
            })
            .unwrap()
            .id
    }

    pub fn set_equipment_active(&self, id: Uuid, is_active: bool) {
        let mut state = self.state();
        if let Some(e) = state.equipment.iter_mut().find(|e| e.id == id) {
            e.is_active = is_active;
        }
    }

    pub fn equipment_active(&self, id: Uuid) -> bool {
        self.state()
            .equipment
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.is_active)
            .unwrap_or(false)
    }

    pub fn request_count(&self) -> usize {
        self.state().requests.len()
    }

    pub fn notifications_for(&self, recipient_id: Uuid) -> Vec<Notification> {
        self.state()
            .notifications
            .iter()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect()
    }

    pub fn insert_request(&self, request: &NewRequest) -> Uuid {
        self.state().insert_request(request).id
    }
}

fn apply_order<T, K: Ord>(items: &mut [T], descending: bool, key: impl Fn(&T) -> K) {
    items.sort_by_key(|item| key(item));
    if descending {
        items.reverse();
    }
}

/// Postgres ordering for nullable columns: NULLs last ascending, first descending.
fn apply_nullable_order<T, K: Ord>(
    items: &mut [T],
    descending: bool,
    key: impl Fn(&T) -> Option<K>,
) {
    apply_order(items, descending, |item| {
        let k = key(item);
        (k.is_none(), k)
    });
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_credentials(&self, username: &str) -> anyhow::Result<Option<UserRow>> {
        Ok(self
            .state()
            .users
            .iter()
            .find(|u| u.user.username == username)
            .map(|u| UserRow {
                id: u.user.id,
                username: u.user.username.clone(),
                is_active: u.user.is_active,
                password_hash: u.password_hash.clone(),
            }))
    }

    async fn find_account(&self, id: Uuid) -> anyhow::Result<Option<Account>> {
        Ok(self.state().account(id))
    }

    async fn username_exists(&self, username: &str) -> anyhow::Result<bool> {
        Ok(self
            .state()
            .users
            .iter()
            .any(|u| u.user.username == username))
    }

    async fn create_with_profile(&self, account: &NewAccount) -> anyhow::Result<Profile> {
        let mut state = self.state();
        let user_id = state.insert_user(account, true)?;
        let id = state.insert_profile(user_id, account.role, account.team_id);
        let rec = state
            .profiles
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| anyhow::anyhow!("profile vanished"))?;
        state
            .profile_view(rec)
            .ok_or_else(|| anyhow::anyhow!("user vanished"))
    }

    async fn list_profiles(&self, filter: &ProfileFilter) -> anyhow::Result<Vec<Profile>> {
        let state = self.state();
        let mut out: Vec<Profile> = state
            .profiles
            .iter()
            .filter_map(|p| state.profile_view(p))
            .filter(|p| filter.role.is_none_or(|r| p.role == r))
            .filter(|p| filter.team_id.is_none_or(|t| p.team_id == Some(t)))
            .filter(|p| {
                filter.search.as_deref().is_none_or(|q| {
                    contains_ci(&p.user.username, q)
                        || contains_ci(&p.user.first_name, q)
                        || contains_ci(&p.user.last_name, q)
                })
            })
            .collect();
        let descending = filter.ordering.descending;
        match filter.ordering.field {
            ProfileSort::Username => apply_order(&mut out, descending, |p| p.user.username.clone()),
            ProfileSort::Role => apply_order(&mut out, descending, |p| p.role.as_str()),
        }
        Ok(out)
    }

    async fn get_profile(&self, id: Uuid) -> anyhow::Result<Option<Profile>> {
        let state = self.state();
        Ok(state
            .profiles
            .iter()
            .find(|p| p.id == id)
            .and_then(|p| state.profile_view(p)))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        patch: &ProfilePatch,
    ) -> anyhow::Result<Option<Profile>> {
        let mut state = self.state();
        let Some(profile) = state.profiles.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(role) = patch.role {
            profile.role = role;
        }
        if let Some(team_id) = patch.team_id {
            profile.team_id = team_id;
        }
        let user_id = profile.user_id;
        if let Some(rec) = state.users.iter_mut().find(|u| u.user.id == user_id) {
            if let Some(email) = &patch.email {
                rec.user.email = email.clone();
            }
            if let Some(first) = &patch.first_name {
                rec.user.first_name = first.clone();
            }
            if let Some(last) = &patch.last_name {
                rec.user.last_name = last.clone();
            }
            if let Some(active) = patch.is_active {
                rec.user.is_active = active;
            }
            if let Some(hash) = &patch.password_hash {
                rec.password_hash = Some(hash.clone());
            }
        }
        Ok(state
            .profiles
            .iter()
            .find(|p| p.id == id)
            .and_then(|p| state.profile_view(p)))
    }

    async fn delete_profile(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut state = self.state();
        let Some(pos) = state.profiles.iter().position(|p| p.id == id) else {
            return Ok(false);
        };
        let user_id = state.profiles.remove(pos).user_id;
        state.users.retain(|u| u.user.id != user_id);
        state.notifications.retain(|n| n.recipient_id != user_id);
        for r in &mut state.requests {
            for slot in [&mut r.technician_id, &mut r.created_by_id, &mut r.client_id] {
                if *slot == Some(user_id) {
                    *slot = None;
                }
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl TeamRepository for InMemoryStore {
    async fn list(&self, filter: &TeamFilter) -> anyhow::Result<Vec<MaintenanceTeam>> {
        let state = self.state();
        let mut out: Vec<MaintenanceTeam> = state
            .teams
            .iter()
            .filter(|t| {
                filter
                    .search
                    .as_deref()
                    .is_none_or(|q| contains_ci(&t.team_name, q))
            })
            .map(|t| state.team_view(t))
            .collect();
        apply_order(&mut out, filter.ordering.descending, |t| t.team_name.clone());
        Ok(out)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<MaintenanceTeam>> {
        let state = self.state();
        Ok(state
            .teams
            .iter()
            .find(|t| t.id == id)
            .map(|t| state.team_view(t)))
    }

    async fn find_by_name(&self, team_name: &str) -> anyhow::Result<Option<MaintenanceTeam>> {
        let state = self.state();
        Ok(state
            .teams
            .iter()
            .find(|t| t.team_name == team_name)
            .map(|t| state.team_view(t)))
    }

    async fn create(&self, team: &NewTeam) -> anyhow::Result<MaintenanceTeam> {
        self.state().insert_team(team)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &TeamPatch,
    ) -> anyhow::Result<Option<MaintenanceTeam>> {
        let mut state = self.state();
        if let Some(name) = &patch.team_name {
            if state.teams.iter().any(|t| t.id != id && &t.team_name == name) {
                return Err(DuplicateKey { field: "team_name" }.into());
            }
        }
        let Some(team) = state.teams.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &patch.team_name {
            team.team_name = name.clone();
        }
        if let Some(description) = &patch.description {
            team.description = description.clone();
        }
        let team = team.clone();
        Ok(Some(state.team_view(&team)))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut state = self.state();
        let before = state.teams.len();
        state.teams.retain(|t| t.id != id);
        if state.teams.len() == before {
            return Ok(false);
        }
        for p in &mut state.profiles {
            if p.team_id == Some(id) {
                p.team_id = None;
            }
        }
        for e in &mut state.equipment {
            if e.maintenance_team_id == Some(id) {
                e.maintenance_team_id = None;
            }
        }
        for r in &mut state.requests {
            if r.team_id == Some(id) {
                r.team_id = None;
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl EquipmentRepository for InMemoryStore {
    async fn list(&self, filter: &EquipmentFilter) -> anyhow::Result<Vec<Equipment>> {
        let state = self.state();
        let mut out: Vec<Equipment> = state
            .equipment
            .iter()
            .filter(|e| {
                filter
                    .maintenance_team_id
                    .is_none_or(|t| e.maintenance_team_id == Some(t))
            })
            .filter(|e| {
                filter
                    .department
                    .as_deref()
                    .is_none_or(|d| e.department == d)
            })
            .filter(|e| filter.is_active.is_none_or(|a| e.is_active == a))
            .filter(|e| {
                filter.search.as_deref().is_none_or(|q| {
                    contains_ci(&e.name, q)
                        || contains_ci(&e.serial_number, q)
                        || contains_ci(&e.owner_name, q)
                })
            })
            .map(|e| state.equipment_view(e))
            .collect();
        let descending = filter.ordering.descending;
        match filter.ordering.field {
            EquipmentSort::Name => apply_order(&mut out, descending, |e| e.name.clone()),
            EquipmentSort::PurchaseDate => {
                apply_nullable_order(&mut out, descending, |e| e.purchase_date)
            }
        }
        Ok(out)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Equipment>> {
        let state = self.state();
        Ok(state
            .equipment
            .iter()
            .find(|e| e.id == id)
            .map(|e| state.equipment_view(e)))
    }

    async fn create(&self, equipment: &NewEquipment) -> anyhow::Result<Equipment> {
        self.state().insert_equipment(equipment)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &EquipmentPatch,
    ) -> anyhow::Result<Option<Equipment>> {
        let mut state = self.state();
        if let Some(serial) = &patch.serial_number {
            if state
                .equipment
                .iter()
                .any(|e| e.id != id && &e.serial_number == serial)
            {
                return Err(DuplicateKey {
                    field: "serial_number",
                }
                .into());
            }
        }
        let Some(e) = state.equipment.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        if let Some(v) = &patch.name {
            e.name = v.clone();
        }
        if let Some(v) = &patch.serial_number {
            e.serial_number = v.clone();
        }
        if let Some(v) = &patch.department {
            e.department = v.clone();
        }
        if let Some(v) = &patch.owner_name {
            e.owner_name = v.clone();
        }
        if let Some(v) = &patch.location {
            e.location = v.clone();
        }
        if let Some(v) = patch.purchase_date {
            e.purchase_date = v;
        }
        if let Some(v) = patch.warranty_expiry {
            e.warranty_expiry = v;
        }
        if let Some(v) = patch.maintenance_team_id {
            e.maintenance_team_id = v;
        }
        if let Some(v) = patch.is_active {
            e.is_active = v;
        }
        if let Some(v) = &patch.notes {
            e.notes = v.clone();
        }
        let e = e.clone();
        Ok(Some(state.equipment_view(&e)))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut state = self.state();
        let before = state.equipment.len();
        state.equipment.retain(|e| e.id != id);
        if state.equipment.len() == before {
            return Ok(false);
        }
        for r in &mut state.requests {
            if r.equipment_id == Some(id) {
                r.equipment_id = None;
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl RequestRepository for InMemoryStore {
    async fn list(
        &self,
        scope: &RequestScope,
        filter: &RequestFilter,
    ) -> anyhow::Result<Vec<MaintenanceRequest>> {
        let state = self.state();
        let mut out: Vec<MaintenanceRequest> = state
            .requests
            .iter()
            .filter(|r| scope.permits(r))
            .filter(|r| filter.status.is_none_or(|s| r.status == s))
            .filter(|r| filter.request_type.is_none_or(|t| r.request_type == t))
            .filter(|r| filter.team_id.is_none_or(|t| r.team_id == Some(t)))
            .filter(|r| {
                filter
                    .technician_id
                    .is_none_or(|t| r.technician_id == Some(t))
            })
            .map(|r| state.request_view(r))
            .filter(|r| {
                filter.search.as_deref().is_none_or(|q| {
                    contains_ci(&r.subject, q)
                        || r.equipment_name
                            .as_deref()
                            .is_some_and(|name| contains_ci(name, q))
                })
            })
            .collect();
        let descending = filter.ordering.descending;
        match filter.ordering.field {
            RequestSort::CreatedAt => apply_order(&mut out, descending, |r| r.created_at),
            RequestSort::DueDate => apply_nullable_order(&mut out, descending, |r| r.due_date),
            RequestSort::ScheduledDate => {
                apply_nullable_order(&mut out, descending, |r| r.scheduled_date)
            }
        }
        Ok(out)
    }

    async fn get(
        &self,
        scope: &RequestScope,
        id: Uuid,
    ) -> anyhow::Result<Option<MaintenanceRequest>> {
        let state = self.state();
        Ok(state
            .requests
            .iter()
            .find(|r| r.id == id && scope.permits(r))
            .map(|r| state.request_view(r)))
    }

    async fn create(&self, request: &NewRequest) -> anyhow::Result<MaintenanceRequest> {
        let mut state = self.state();
        let created = state.insert_request(request);
        if created.status == RequestStatus::Scrap {
            state.retire_equipment(created.equipment_id);
        }
        Ok(created)
    }

    async fn update(
        &self,
        scope: &RequestScope,
        id: Uuid,
        patch: &RequestPatch,
    ) -> anyhow::Result<Option<MaintenanceRequest>> {
        let mut state = self.state();
        let now = state.now();
        let Some(r) = state
            .requests
            .iter_mut()
            .find(|r| r.id == id && scope.permits(r))
        else {
            return Ok(None);
        };
        if let Some(v) = &patch.subject {
            r.subject = v.clone();
        }
        if let Some(v) = &patch.description {
            r.description = v.clone();
        }
        if let Some(v) = patch.request_type {
            r.request_type = v;
        }
        if let Some(v) = patch.status {
            r.status = v;
        }
        if let Some(v) = patch.equipment_id {
            r.equipment_id = v;
        }
        if let Some(v) = patch.team_id {
            r.team_id = v;
        }
        if let Some(v) = patch.technician_id {
            r.technician_id = v;
        }
        if let Some(v) = patch.client_id {
            r.client_id = v;
        }
        if let Some(v) = patch.scheduled_date {
            r.scheduled_date = v;
        }
        if let Some(v) = patch.due_date {
            r.due_date = v;
        }
        if let Some(v) = patch.duration_hours {
            r.duration_hours = v;
        }
        r.updated_at = now;
        let r = r.clone();
        if patch.retire_equipment {
            state.retire_equipment(r.equipment_id);
        }
        Ok(Some(state.request_view(&r)))
    }

    async fn delete(&self, scope: &RequestScope, id: Uuid) -> anyhow::Result<bool> {
        let mut state = self.state();
        let Some(pos) = state
            .requests
            .iter()
            .position(|r| r.id == id && scope.permits(r))
        else {
            return Ok(false);
        };
        state.requests.remove(pos);
        for n in &mut state.notifications {
            if n.request_id == Some(id) {
                n.request_id = None;
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn list_for(
        &self,
        recipient_id: Uuid,
        ordering: SortOrder<NotificationSort>,
    ) -> anyhow::Result<Vec<Notification>> {
        let mut out = self.notifications_for(recipient_id);
        match ordering.field {
            NotificationSort::CreatedAt => {
                apply_order(&mut out, ordering.descending, |n| n.created_at)
            }
        }
        Ok(out)
    }

    async fn get_for(&self, recipient_id: Uuid, id: Uuid) -> anyhow::Result<Option<Notification>> {
        Ok(self
            .state()
            .notifications
            .iter()
            .find(|n| n.id == id && n.recipient_id == recipient_id)
            .cloned())
    }

    async fn create(&self, notification: &NewNotification) -> anyhow::Result<Notification> {
        let mut state = self.state();
        if state.user(notification.recipient_id).is_none() {
            anyhow::bail!("recipient {} does not exist", notification.recipient_id);
        }
        let created_at = state.now();
        let row = Notification {
            id: Uuid::new_v4(),
            recipient_id: notification.recipient_id,
            message: notification.message.clone(),
            request_id: notification.request_id,
            is_read: false,
            created_at,
        };
        state.notifications.push(row.clone());
        Ok(row)
    }

    async fn update_for(
        &self,
        recipient_id: Uuid,
        id: Uuid,
        patch: &NotificationPatch,
    ) -> anyhow::Result<Option<Notification>> {
        let mut state = self.state();
        let Some(n) = state
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.recipient_id == recipient_id)
        else {
            return Ok(None);
        };
        if let Some(message) = &patch.message {
            n.message = message.clone();
        }
        if let Some(is_read) = patch.is_read {
            n.is_read = is_read;
        }
        Ok(Some(n.clone()))
    }

    async fn delete_for(&self, recipient_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let mut state = self.state();
        let before = state.notifications.len();
        state
            .notifications
            .retain(|n| !(n.id == id && n.recipient_id == recipient_id));
        Ok(state.notifications.len() != before)
    }
}

/// Six requests spread over every visibility rule.
///
/// Users: `manager`, `tech` (team Mechanics), `tech2` (team Electrical),
/// `client`, `other` (clients) and `bare` (no profile).
pub struct Fixture {
    pub mechanics: Uuid,
    pub electrical: Uuid,
    pub press: Uuid,
    /// Assigned to `tech`, team Electrical, created by the manager.
    pub assigned_to_tech: Uuid,
    /// Team Mechanics, nobody assigned, overdue.
    pub team_unassigned: Uuid,
    /// Created by `client` on the press.
    pub created_by_client: Uuid,
    /// Created by `other` with `client` as the client; repaired.
    pub client_of: Uuid,
    /// Created by the profile-less `bare`; scrapped.
    pub created_by_bare: Uuid,
    /// Created by `other`, assigned to `tech2`.
    pub unrelated: Uuid,
}

impl Fixture {
    pub fn build(store: &InMemoryStore) -> Self {
        let mechanics = store.add_team("Mechanics");
        let electrical = store.add_team("Electrical");
        let manager = store.add_user("manager", Some(Role::Manager), None);
        let tech = store.add_user("tech", Some(Role::Technician), Some(mechanics));
        let tech2 = store.add_user("tech2", Some(Role::Technician), Some(electrical));
        let client = store.add_user("client", Some(Role::User), None);
        let other = store.add_user("other", Some(Role::User), None);
        let bare = store.add_user("bare", None, None);
        let press = store.add_equipment("Hydraulic Press", Some(electrical));
        let yesterday: NaiveDate = Utc::now().date_naive() - Duration::days(1);

        let request = |subject: &str, created_by_id: Uuid| NewRequest {
            subject: subject.into(),
            description: String::new(),
            request_type: RequestType::Corrective,
            status: RequestStatus::New,
            equipment_id: None,
            team_id: None,
            technician_id: None,
            created_by_id,
            client_id: None,
            scheduled_date: None,
            due_date: None,
            duration_hours: None,
        };

        let assigned_to_tech = store.insert_request(&NewRequest {
            technician_id: Some(tech),
            team_id: Some(electrical),
            ..request("Generator noisy", manager)
        });
        let team_unassigned = store.insert_request(&NewRequest {
            team_id: Some(mechanics),
            status: RequestStatus::InProgress,
            request_type: RequestType::Preventive,
            due_date: Some(yesterday),
            ..request("Conveyor belt service", manager)
        });
        let created_by_client = store.insert_request(&NewRequest {
            team_id: Some(electrical),
            equipment_id: Some(press),
            client_id: Some(client),
            ..request("Press leaking oil", client)
        });
        let client_of = store.insert_request(&NewRequest {
            client_id: Some(client),
            technician_id: Some(tech2),
            status: RequestStatus::Repaired,
            due_date: Some(yesterday),
            ..request("Office AC filter", other)
        });
        let created_by_bare = store.insert_request(&NewRequest {
            status: RequestStatus::Scrap,
            ..request("Broken desk lamp", bare)
        });
        let unrelated = store.insert_request(&NewRequest {
            team_id: Some(electrical),
            technician_id: Some(tech2),
            ..request("Lighting flicker", other)
        });

        Fixture {
            mechanics,
            electrical,
            press,
            assigned_to_tech,
            team_unassigned,
            created_by_client,
            client_of,
            created_by_bare,
            unrelated,
        }
    }

    pub fn viewer(&self, store: &InMemoryStore, username: &str) -> Viewer {
        store.viewer(username)
    }

    pub fn all_requests(&self) -> BTreeSet<Uuid> {
        BTreeSet::from([
            self.assigned_to_tech,
            self.team_unassigned,
            self.created_by_client,
            self.client_of,
            self.created_by_bare,
            self.unrelated,
        ])
    }
}
