//! Drivers and vehicles: the leaf resources owned by contractors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A driver employed by one contractor. Ownership is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
  pub id:            Uuid,
  pub contractor_id: Uuid,
  pub full_name:     String,
  /// Individual identification number.
  pub iin:           String,
  pub birth_year:    i32,
  pub phone:         String,
  pub is_active:     bool,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

/// Equality predicates for [`crate::store::Store::list_drivers`].
#[derive(Debug, Clone, Default)]
pub struct DriverFilter {
  pub contractor_id: Option<Uuid>,
  pub active_only:   bool,
}

/// A snow-removal vehicle registered to a contractor.
///
/// Completes the data model and backs the `vehicles` table; no operation
/// reads or writes vehicles yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
  pub id:             Uuid,
  pub contractor_id:  Uuid,
  /// Globally unique.
  pub plate_number:   String,
  pub brand:          String,
  pub model:          String,
  pub color:          String,
  pub year:           i32,
  pub body_volume_m3: f64,
  pub driver_id:      Option<Uuid>,
  pub is_active:      bool,
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
}
