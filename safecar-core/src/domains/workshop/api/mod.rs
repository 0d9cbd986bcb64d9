pub mod appointment;
pub mod workshop;

use crate::domain::Role;

/// Roles allowed to run a workshop and move appointments forward
pub(crate) const WORKSHOP_STAFF: &[Role] = &[Role::Mechanic, Role::Admin];
