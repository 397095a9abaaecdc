//! Checks that foreign keys supplied by a caller point at existing rows.
//!
//! A dangling reference is a client mistake, so each check fails with
//! [`WriteError::Invalid`] before the store would reject it as a constraint
//! violation.

use uuid::Uuid;

use crate::application::access::Viewer;
use crate::application::ports::equipment_repository::EquipmentRepository;
use crate::application::ports::request_repository::RequestRepository;
use crate::application::ports::team_repository::TeamRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::write_error::WriteError;
use crate::domain::maintenance::equipment::Equipment;

pub(crate) async fn load_equipment<E: EquipmentRepository + ?Sized>(
    repo: &E,
    id: Option<Uuid>,
) -> Result<Option<Equipment>, WriteError> {
    let Some(id) = id else { return Ok(None) };
    match repo.get(id).await? {
        Some(e) => Ok(Some(e)),
        None => Err(WriteError::Invalid("equipment does not exist".into())),
    }
}

/// `field` names the team in the error, e.g. "maintenance team".
pub(crate) async fn ensure_team<T: TeamRepository + ?Sized>(
    repo: &T,
    field: &str,
    id: Option<Uuid>,
) -> Result<(), WriteError> {
    if let Some(id) = id {
        if repo.get(id).await?.is_none() {
            return Err(WriteError::Invalid(format!("{field} does not exist")));
        }
    }
    Ok(())
}

pub(crate) async fn ensure_user<U: UserRepository + ?Sized>(
    repo: &U,
    field: &str,
    id: Option<Uuid>,
) -> Result<(), WriteError> {
    if let Some(id) = id {
        if repo.find_account(id).await?.is_none() {
            return Err(WriteError::Invalid(format!("{field} does not exist")));
        }
    }
    Ok(())
}

/// Requests outside the viewer's scope are reported as missing.
pub(crate) async fn ensure_request<R: RequestRepository + ?Sized>(
    repo: &R,
    viewer: &Viewer,
    id: Option<Uuid>,
) -> Result<(), WriteError> {
    if let Some(id) = id {
        if repo.get(&viewer.request_scope(), id).await?.is_none() {
            return Err(WriteError::Invalid("request does not exist".into()));
        }
    }
    Ok(())
}
