//! The assignment variable space.

use crate::cp::{BoolVar, CpModel};
use crate::models::RosterDomain;

/// One boolean per (nurse, day, shift): "nurse works shift on day".
///
/// This is the explicit handle every rule family receives; rule functions
/// never create variables of their own.
#[derive(Debug, Clone)]
pub struct AssignmentVars {
    nurses: usize,
    days: usize,
    shifts: usize,
    vars: Vec<BoolVar>,
}

impl AssignmentVars {
    /// Declares the variables in `model`, in (nurse, day, shift) order.
    pub fn create(model: &mut CpModel, domain: &RosterDomain) -> Self {
        let mut vars =
            Vec::with_capacity(domain.nurse_count() * domain.day_count() * domain.shift_count());
        for nurse in domain.nurses() {
            for day in domain.days() {
                for shift in domain.shifts() {
                    vars.push(model.new_bool_var(format!(
                        "shift_n{}_d{}_s{}",
                        nurse.id, day.index, shift.id
                    )));
                }
            }
        }

        Self {
            nurses: domain.nurse_count(),
            days: domain.day_count(),
            shifts: domain.shift_count(),
            vars,
        }
    }

    /// Variable for (nurse, day, shift).
    ///
    /// # Panics
    /// If any index is out of range.
    #[inline]
    pub fn get(&self, nurse: usize, day: usize, shift: usize) -> BoolVar {
        assert!(
            nurse < self.nurses && day < self.days && shift < self.shifts,
            "assignment index ({nurse}, {day}, {shift}) out of range"
        );
        self.vars[(nurse * self.days + day) * self.shifts + shift]
    }

    /// All shift variables of a nurse on a day.
    pub fn nurse_day(&self, nurse: usize, day: usize) -> impl Iterator<Item = BoolVar> + '_ {
        (0..self.shifts).map(move |s| self.get(nurse, day, s))
    }

    /// Variables of a nurse on a day restricted to `shifts`.
    pub fn select<'a>(
        &'a self,
        nurse: usize,
        day: usize,
        shifts: &'a [usize],
    ) -> impl Iterator<Item = BoolVar> + 'a {
        shifts.iter().map(move |&s| self.get(nurse, day, s))
    }

    /// Variables of `nurses` × `days` × `shifts`.
    pub fn block(&self, nurses: &[usize], days: &[usize], shifts: &[usize]) -> Vec<BoolVar> {
        let mut out = Vec::with_capacity(nurses.len() * days.len() * shifts.len());
        for &n in nurses {
            for &d in days {
                out.extend(self.select(n, d, shifts));
            }
        }
        out
    }

    /// Variables in day-major order: (day, nurse, shift).
    pub fn day_major(&self) -> Vec<BoolVar> {
        let mut out = Vec::with_capacity(self.vars.len());
        for d in 0..self.days {
            for n in 0..self.nurses {
                out.extend(self.nurse_day(n, d));
            }
        }
        out
    }

    /// All variables in creation order.
    pub fn all(&self) -> &[BoolVar] {
        &self.vars
    }

    pub fn nurse_count(&self) -> usize {
        self.nurses
    }

    pub fn day_count(&self) -> usize {
        self.days
    }

    pub fn shift_count(&self) -> usize {
        self.shifts
    }
}
