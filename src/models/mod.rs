//! Rostering domain models.
//!
//! Provides the core data types of a rostering problem and its solution:
//! who can be rostered (`Nurse`, `Team`), when (`Horizon`, `Day`,
//! `Weekday`), for which duties (`ShiftType`, `Coverage`), and the
//! decoded answer (`Roster`).
//!
//! # Domain Mappings
//!
//! | u-roster | Hospital | Call centre | Security |
//! |----------|----------|-------------|----------|
//! | Nurse | Nurse | Agent | Guard |
//! | Team | Ward team | Skill group | Crew |
//! | ShiftType | ED Day / ED Night | Early / Late | Day / Night |
//! | Roster | Rota | Agent schedule | Duty roster |

mod calendar;
mod domain;
mod nurse;
mod roster;
mod shift;

pub use calendar::{Day, Horizon, Weekday, DAYS_PER_WEEK};
pub use domain::RosterDomain;
pub use nurse::{Nurse, Team};
pub use roster::{Roster, RosterEntry, REST_DAY_LABEL};
pub use shift::{Coverage, ShiftKind, ShiftType, OFF_SHIFT_ID};
