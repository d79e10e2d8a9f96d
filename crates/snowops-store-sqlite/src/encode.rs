//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. UUIDs are stored as
//! hyphenated lowercase strings. Roles and organization types are stored as
//! their wire names (`TOO_ADMIN`, `CONTRACTOR`).

use chrono::{DateTime, Utc};
use snowops_core::{
  fleet::Driver,
  organization::Organization,
  role::{OrgType, Role},
  user::User,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn encode_opt_uuid(id: Option<Uuid>) -> Option<String> { id.map(encode_uuid) }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn decode_opt_uuid(s: Option<&str>) -> Result<Option<Uuid>> {
  s.map(decode_uuid).transpose()
}

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Taxonomy ─────────────────────────────────────────────────────────────────

pub fn decode_role(s: &str) -> Result<Role> {
  s.parse().map_err(|_| Error::UnknownTag { column: "role", value: s.to_owned() })
}

pub fn decode_org_type(s: &str) -> Result<OrgType> {
  s.parse().map_err(|_| Error::UnknownTag { column: "type", value: s.to_owned() })
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const ORGANIZATION_COLUMNS: &str = "id, name, type, bin, head_full_name, address, phone, \
                                        parent_org_id, is_active, created_at, updated_at";

/// Raw values read directly from an `organizations` row.
pub struct RawOrganization {
  pub id:             String,
  pub name:           String,
  pub org_type:       String,
  pub bin:            String,
  pub head_full_name: String,
  pub address:        String,
  pub phone:          String,
  pub parent_org_id:  Option<String>,
  pub is_active:      bool,
  pub created_at:     String,
  pub updated_at:     String,
}

impl RawOrganization {
  /// Map a row selected with [`ORGANIZATION_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      name:           row.get(1)?,
      org_type:       row.get(2)?,
      bin:            row.get(3)?,
      head_full_name: row.get(4)?,
      address:        row.get(5)?,
      phone:          row.get(6)?,
      parent_org_id:  row.get(7)?,
      is_active:      row.get(8)?,
      created_at:     row.get(9)?,
      updated_at:     row.get(10)?,
    })
  }

  pub fn into_organization(self) -> Result<Organization> {
    Ok(Organization {
      id:             decode_uuid(&self.id)?,
      name:           self.name,
      org_type:       decode_org_type(&self.org_type)?,
      bin:            self.bin,
      head_full_name: self.head_full_name,
      address:        self.address,
      phone:          self.phone,
      parent_org_id:  decode_opt_uuid(self.parent_org_id.as_deref())?,
      is_active:      self.is_active,
      created_at:     decode_dt(&self.created_at)?,
      updated_at:     decode_dt(&self.updated_at)?,
    })
  }
}

pub const USER_COLUMNS: &str = "id, phone, role, login, password_hash, organization_id, \
                                driver_id, is_active, created_at, updated_at";

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub id:              String,
  pub phone:           String,
  pub role:            String,
  pub login:           Option<String>,
  pub password_hash:   Option<String>,
  pub organization_id: Option<String>,
  pub driver_id:       Option<String>,
  pub is_active:       bool,
  pub created_at:      String,
  pub updated_at:      String,
}

impl RawUser {
  /// Map a row selected with [`USER_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:              row.get(0)?,
      phone:           row.get(1)?,
      role:            row.get(2)?,
      login:           row.get(3)?,
      password_hash:   row.get(4)?,
      organization_id: row.get(5)?,
      driver_id:       row.get(6)?,
      is_active:       row.get(7)?,
      created_at:      row.get(8)?,
      updated_at:      row.get(9)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:              decode_uuid(&self.id)?,
      phone:           self.phone,
      role:            decode_role(&self.role)?,
      login:           self.login,
      password_hash:   self.password_hash,
      organization_id: decode_opt_uuid(self.organization_id.as_deref())?,
      driver_id:       decode_opt_uuid(self.driver_id.as_deref())?,
      is_active:       self.is_active,
      created_at:      decode_dt(&self.created_at)?,
      updated_at:      decode_dt(&self.updated_at)?,
    })
  }
}

pub const DRIVER_COLUMNS: &str =
  "id, contractor_id, full_name, iin, birth_year, phone, is_active, created_at, updated_at";

/// Raw values read directly from a `drivers` row.
pub struct RawDriver {
  pub id:            String,
  pub contractor_id: String,
  pub full_name:     String,
  pub iin:           String,
  pub birth_year:    i32,
  pub phone:         String,
  pub is_active:     bool,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawDriver {
  /// Map a row selected with [`DRIVER_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      contractor_id: row.get(1)?,
      full_name:     row.get(2)?,
      iin:           row.get(3)?,
      birth_year:    row.get(4)?,
      phone:         row.get(5)?,
      is_active:     row.get(6)?,
      created_at:    row.get(7)?,
      updated_at:    row.get(8)?,
    })
  }

  pub fn into_driver(self) -> Result<Driver> {
    Ok(Driver {
      id:            decode_uuid(&self.id)?,
      contractor_id: decode_uuid(&self.contractor_id)?,
      full_name:     self.full_name,
      iin:           self.iin,
      birth_year:    self.birth_year,
      phone:         self.phone,
      is_active:     self.is_active,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}
