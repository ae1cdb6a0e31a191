//! Cycle projection: rolling a last-visit position forward to a horizon.
//!
//! Projection is a small state machine. The state is the current cycle
//! number, the index of the next visit day in that cycle, and the date of the
//! cycle's first visit day. Each step either consumes the next visit day or
//! rolls into the following cycle (`cycle + 1`, first-day date advanced by
//! the cycle length). The machine stops at the first date past the horizon.

use std::iter::FusedIterator;

use chrono::{Days, NaiveDate};

use dispense_model::Cadence;

use crate::label::LabelPosition;

/// Where a patient stands: the parsed cycle/day and the date it happened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitPosition {
    pub cycle: u32,
    pub day: u32,
    pub crossover: bool,
    pub anchor_date: NaiveDate,
}

impl VisitPosition {
    pub fn new(label: LabelPosition, anchor_date: NaiveDate) -> Self {
        Self {
            cycle: label.cycle,
            day: label.day,
            crossover: label.crossover,
            anchor_date,
        }
    }
}

/// One future dispensing visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectedPoint {
    pub date: NaiveDate,
    pub cycle: u32,
    pub day: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProjectionState {
    Active {
        cycle: u32,
        next: usize,
        cycle_start: NaiveDate,
    },
    Done,
}

/// Lazy, finite sequence of projected visits, strictly increasing in date.
///
/// Cloning yields an independent iterator from the same point; calling
/// [`project`] again restarts from the beginning.
#[derive(Debug, Clone)]
pub struct CycleProjection<'a> {
    cadence: &'a Cadence,
    anchor: NaiveDate,
    horizon: NaiveDate,
    anchored: bool,
    state: ProjectionState,
}

impl CycleProjection<'_> {
    /// False when the position's cycle start lies outside the calendar, in
    /// which case the projection is empty.
    pub fn is_anchored(&self) -> bool {
        self.anchored
    }
}

/// Project visits after `position` up to and including `horizon`.
///
/// Only dates strictly after the anchor are emitted, so the last recorded
/// visit itself never is. A position day that is not one of the cadence's
/// visit days continues at the next greater visit day of the same cycle, or
/// at the next cycle when none is left.
pub fn project<'a>(
    position: &VisitPosition,
    cadence: &'a Cadence,
    horizon: NaiveDate,
) -> CycleProjection<'a> {
    let first_day = cadence.first_day();
    let cycle_start = shift(
        position.anchor_date,
        i64::from(first_day) - i64::from(position.day),
    );
    let next = cadence
        .visit_days()
        .iter()
        .position(|&day| day > position.day)
        .unwrap_or(cadence.visit_days().len());
    let state = match cycle_start {
        Some(cycle_start) => ProjectionState::Active {
            cycle: position.cycle,
            next,
            cycle_start,
        },
        None => ProjectionState::Done,
    };
    CycleProjection {
        cadence,
        anchor: position.anchor_date,
        horizon,
        anchored: cycle_start.is_some(),
        state,
    }
}

impl Iterator for CycleProjection<'_> {
    type Item = ProjectedPoint;

    fn next(&mut self) -> Option<Self::Item> {
        let days = self.cadence.visit_days();
        loop {
            let ProjectionState::Active {
                cycle,
                next,
                cycle_start,
            } = self.state
            else {
                return None;
            };

            if next >= days.len() {
                self.state = match (
                    cycle.checked_add(1),
                    shift(cycle_start, i64::from(self.cadence.cycle_length())),
                ) {
                    (Some(cycle), Some(cycle_start)) => ProjectionState::Active {
                        cycle,
                        next: 0,
                        cycle_start,
                    },
                    _ => ProjectionState::Done,
                };
                continue;
            }

            let day = days[next];
            let offset = i64::from(day - self.cadence.first_day());
            let Some(date) = shift(cycle_start, offset).filter(|date| *date <= self.horizon)
            else {
                self.state = ProjectionState::Done;
                return None;
            };
            self.state = ProjectionState::Active {
                cycle,
                next: next + 1,
                cycle_start,
            };
            // A day past the cycle length can put early slots behind the anchor.
            if date <= self.anchor {
                continue;
            }
            return Some(ProjectedPoint { date, cycle, day });
        }
    }
}

impl FusedIterator for CycleProjection<'_> {}

fn shift(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}
