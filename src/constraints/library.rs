//! Rule family functions.
//!
//! Each function maps (variable space, domain, parameters) to the
//! relations of one rule family. Functions are pure: they read the
//! variable handles they are given and create nothing.

use crate::builder::AssignmentVars;
use crate::cp::Relation;
use crate::models::RosterDomain;

use super::rules::{
    ConsecutiveCap, CountBounds, ExclusionTarget, FairnessRule, FairnessScope,
    ForbiddenSuccession, PeriodCap, ShiftBlock, ShiftExclusion,
};

/// Every nurse holds exactly one shift type (`Off` included) per day.
pub fn single_assignment(vars: &AssignmentVars, domain: &RosterDomain) -> Vec<Relation> {
    let mut relations = Vec::with_capacity(domain.nurse_count() * domain.day_count());
    for (n, nurse) in domain.nurses().iter().enumerate() {
        for day in domain.days() {
            relations.push(Relation::exactly(
                format!("single_assignment n{} d{}", nurse.id, day.index),
                vars.nurse_day(n, day.index),
                1,
            ));
        }
    }
    relations
}

/// Headcount of every working shift on every day lies within its coverage.
pub fn coverage(vars: &AssignmentVars, domain: &RosterDomain) -> Vec<Relation> {
    let mut relations = Vec::new();
    for day in domain.days() {
        for s in domain.active_shifts() {
            let shift = &domain.shifts()[s];
            let required = shift.coverage_on(day);
            if required.min == 0 && required.max.is_none() {
                continue;
            }
            relations.push(Relation::between(
                format!("coverage d{} {}", day.index, shift.id),
                (0..domain.nurse_count()).map(|n| vars.get(n, day.index, s)),
                i64::from(required.min),
                required.max.map_or(i64::MAX, i64::from),
            ));
        }
    }
    relations
}

/// Forbidden shift successions on adjacent days.
///
/// `x[n, d, from] ⇒ ¬x[n, d + 1, to]` for each succession.
pub fn rest(
    vars: &AssignmentVars,
    domain: &RosterDomain,
    successions: &[ForbiddenSuccession],
) -> Vec<Relation> {
    let mut relations = Vec::new();
    for succession in successions {
        let from = succession.from.resolve(domain);
        let to = succession.to.resolve(domain);
        for (n, nurse) in domain.nurses().iter().enumerate() {
            for d in 0..domain.day_count().saturating_sub(1) {
                for &f in &from {
                    for &t in &to {
                        relations.push(Relation::implies(
                            format!(
                                "rest n{} d{} {} -> {}",
                                nurse.id,
                                d,
                                domain.shifts()[f].id,
                                domain.shifts()[t].id
                            ),
                            vars.get(n, d, f).is_true(),
                            vars.get(n, d + 1, t).is_false(),
                        ));
                    }
                }
            }
        }
    }
    relations
}

/// No more than `max_days` consecutive days on the selected shifts.
///
/// Every window of `max_days + 1` days sums to at most `max_days`.
/// Horizons shorter than the window produce no relations.
pub fn consecutive_cap(
    vars: &AssignmentVars,
    domain: &RosterDomain,
    cap: &ConsecutiveCap,
) -> Vec<Relation> {
    let shifts = cap.shifts.resolve(domain);
    let window = cap.max_days as usize + 1;
    if domain.day_count() < window {
        return Vec::new();
    }

    let mut relations = Vec::new();
    for (n, nurse) in domain.nurses().iter().enumerate() {
        for start in 0..=domain.day_count() - window {
            let days: Vec<usize> = (start..start + window).collect();
            relations.push(Relation::at_most(
                format!("consecutive_cap n{} d{}..{}", nurse.id, start, start + window),
                vars.block(&[n], &days, &shifts),
                i64::from(cap.max_days),
            ));
        }
    }
    relations
}

/// Count bounds on the selected shifts per nurse or per team.
pub fn fairness(vars: &AssignmentVars, domain: &RosterDomain, rule: &FairnessRule) -> Vec<Relation> {
    let shifts = rule.shifts.resolve(domain);
    let days = rule.days.days(domain);

    let groups: Vec<(String, Vec<usize>)> = match rule.scope {
        FairnessScope::PerNurse => domain
            .nurses()
            .iter()
            .enumerate()
            .map(|(n, nurse)| (nurse.id.clone(), vec![n]))
            .collect(),
        FairnessScope::PerTeam => domain
            .teams()
            .into_iter()
            .map(|team| (team.name, team.members))
            .collect(),
    };

    let slots = required_slots(domain, &days, &shifts);
    groups
        .into_iter()
        .map(|(label, members)| {
            let (min, max) = match rule.bounds {
                CountBounds::Fixed { min, max } => (u64::from(min), u64::from(max)),
                CountBounds::Even { tolerance } => {
                    even_share(slots, members.len() as u64, domain.nurse_count() as u64, tolerance)
                }
            };
            Relation::between(
                format!("fairness {label}"),
                vars.block(&members, &days, &shifts),
                min as i64,
                max as i64,
            )
        })
        .collect()
}

/// Minimum number of nurse-shifts coverage demands on `days` for `shifts`.
pub(crate) fn required_slots(domain: &RosterDomain, days: &[usize], shifts: &[usize]) -> u64 {
    days.iter()
        .flat_map(|&d| {
            shifts
                .iter()
                .map(move |&s| u64::from(domain.shifts()[s].coverage_on(&domain.days()[d]).min))
        })
        .sum()
}

/// Share of `slots` for a group of `members` out of `staff` nurses.
///
/// Returns `(min, max)`: the floor of the proportional share, plus
/// `tolerance` when the division is not exact.
fn even_share(slots: u64, members: u64, staff: u64, tolerance: u32) -> (u64, u64) {
    let weighted = slots * members;
    let min = weighted / staff.max(1);
    let max = if weighted % staff.max(1) == 0 {
        min
    } else {
        min + u64::from(tolerance)
    };
    (min, max)
}

/// At most `max_shifts` selected shifts per nurse in each period.
pub fn period_cap(vars: &AssignmentVars, domain: &RosterDomain, cap: &PeriodCap) -> Vec<Relation> {
    let shifts = cap.shifts.resolve(domain);
    let period = (cap.period_days as usize).max(1);

    let mut relations = Vec::new();
    for (n, nurse) in domain.nurses().iter().enumerate() {
        for start in (0..domain.day_count()).step_by(period) {
            let end = (start + period).min(domain.day_count());
            let days: Vec<usize> = (start..end).collect();
            relations.push(Relation::at_most(
                format!("period_cap n{} d{}..{}", nurse.id, start, end),
                vars.block(&[n], &days, &shifts),
                i64::from(cap.max_shifts),
            ));
        }
    }
    relations
}

/// At most `max_per_team` working nurses of the same team per day.
pub fn team_daily_limit(
    vars: &AssignmentVars,
    domain: &RosterDomain,
    max_per_team: u32,
) -> Vec<Relation> {
    let active: Vec<usize> = domain.active_shifts().collect();
    let mut relations = Vec::new();
    for team in domain.teams() {
        for day in domain.days() {
            relations.push(Relation::at_most(
                format!("team_daily_limit {} d{}", team.name, day.index),
                vars.block(&team.members, &[day.index], &active),
                i64::from(max_per_team),
            ));
        }
    }
    relations
}

/// The target nurses never hold the selected shifts.
pub fn exclusion(
    vars: &AssignmentVars,
    domain: &RosterDomain,
    exclusion: &ShiftExclusion,
) -> Vec<Relation> {
    let members: Vec<usize> = match &exclusion.target {
        ExclusionTarget::Team(name) => domain.team(name).map(|t| t.members).unwrap_or_default(),
        ExclusionTarget::Nurse(id) => domain.nurse_index(id).into_iter().collect(),
    };
    let shifts = exclusion.shifts.resolve(domain);
    let days: Vec<usize> = (0..domain.day_count()).collect();

    members
        .into_iter()
        .map(|n| {
            Relation::at_most(
                format!("exclusion n{}", domain.nurses()[n].id),
                vars.block(&[n], &days, &shifts),
                0,
            )
        })
        .collect()
}

/// Block rostering: `length` days of one shift, then `rest_days` off.
pub fn shift_block(vars: &AssignmentVars, domain: &RosterDomain, block: &ShiftBlock) -> Vec<Relation> {
    let Some(s) = domain.shift_index(&block.shift) else {
        return Vec::new();
    };
    let off = domain.off_shift();
    let horizon = domain.day_count();
    let length = block.length as usize;

    let mut relations = Vec::new();
    for day in domain.days().iter().filter(|d| d.weekday == block.start) {
        for (n, nurse) in domain.nurses().iter().enumerate() {
            let head = vars.get(n, day.index, s);
            for d in (day.index + 1..day.index + length).filter(|&d| d < horizon) {
                relations.push(Relation::equal(
                    format!("shift_block n{} d{}..d{}", nurse.id, day.index, d),
                    head,
                    vars.get(n, d, s),
                ));
            }
            let rest_start = day.index + length;
            for d in (rest_start..rest_start + block.rest_days as usize).filter(|&d| d < horizon) {
                relations.push(Relation::implies(
                    format!("shift_block_rest n{} d{}", nurse.id, d),
                    head.is_true(),
                    vars.get(n, d, off).is_true(),
                ));
            }
        }
    }
    relations
}
