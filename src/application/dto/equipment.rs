use chrono::NaiveDate;
use uuid::Uuid;

use super::{SortField, SortOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipmentSort {
    Name,
    PurchaseDate,
}

impl SortField for EquipmentSort {
    const ALL: &'static [Self] = &[EquipmentSort::Name, EquipmentSort::PurchaseDate];

    fn name(&self) -> &'static str {
        match self {
            EquipmentSort::Name => "name",
            EquipmentSort::PurchaseDate => "purchase_date",
        }
    }
}

#[derive(Debug, Clone)]
pub struct EquipmentFilter {
    pub maintenance_team_id: Option<Uuid>,
    pub department: Option<String>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
    pub ordering: SortOrder<EquipmentSort>,
}

impl Default for EquipmentFilter {
    fn default() -> Self {
        Self {
            maintenance_team_id: None,
            department: None,
            is_active: None,
            search: None,
            ordering: SortOrder::asc(EquipmentSort::Name),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewEquipment {
    pub name: String,
    pub serial_number: String,
    pub department: String,
    pub owner_name: String,
    pub location: String,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_expiry: Option<NaiveDate>,
    pub maintenance_team_id: Option<Uuid>,
    pub is_active: bool,
    pub notes: String,
}

// Nullable fields: None => not provided; Some(None) => clear; Some(Some(v)) => set
#[derive(Debug, Clone, Default)]
pub struct EquipmentPatch {
    pub name: Option<String>,
    pub serial_number: Option<String>,
    pub department: Option<String>,
    pub owner_name: Option<String>,
    pub location: Option<String>,
    pub purchase_date: Option<Option<NaiveDate>>,
    pub warranty_expiry: Option<Option<NaiveDate>>,
    pub maintenance_team_id: Option<Option<Uuid>>,
    pub is_active: Option<bool>,
    pub notes: Option<String>,
}
