//! Day schedule and slot entities, and default calendar generation.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::constants::{FIRST_SLOT_HOUR, LAST_SLOT_HOUR, MAX_HORIZON_DAYS};
use crate::error::{DomainError, DomainResult};
use crate::ids::{DayScheduleId, ProviderId, ReservationId, SlotId};
use crate::time::{slot_end, slot_start};

/// A single bookable 50-minute unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: SlotId,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Reservation currently holding the slot
    pub occupant: Option<ReservationId>,
}

impl Slot {
    /// Create a free slot starting at `start_time`
    pub fn new(start_time: NaiveTime) -> Self {
        Self {
            id: SlotId::new(),
            start_time,
            end_time: slot_end(start_time),
            occupant: None,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }
}

/// All slots a provider offers on one calendar date, keyed by start time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub id: DayScheduleId,
    pub provider_id: ProviderId,
    pub date: NaiveDate,
    pub slots: BTreeMap<NaiveTime, Slot>,
}

impl DaySchedule {
    /// Create a day without any slots
    pub fn new(provider_id: ProviderId, date: NaiveDate) -> Self {
        Self {
            id: DayScheduleId::new(),
            provider_id,
            date,
            slots: BTreeMap::new(),
        }
    }

    pub fn slot(&self, start_time: NaiveTime) -> Option<&Slot> {
        self.slots.get(&start_time)
    }

    pub fn slot_mut(&mut self, start_time: NaiveTime) -> Option<&mut Slot> {
        self.slots.get_mut(&start_time)
    }

    /// Add a free slot; start times are unique within a day
    pub fn add_slot(&mut self, start_time: NaiveTime) -> DomainResult<&Slot> {
        if self.slots.contains_key(&start_time) {
            return Err(DomainError::validation(format!(
                "slot {} already exists on {}",
                start_time, self.date
            )));
        }
        let slot: &Slot = self
            .slots
            .entry(start_time)
            .or_insert_with(|| Slot::new(start_time));
        Ok(slot)
    }

    pub fn remove_slot(&mut self, start_time: NaiveTime) -> Option<Slot> {
        self.slots.remove(&start_time)
    }

    /// Offered start times in chronological order
    pub fn start_times(&self) -> BTreeSet<NaiveTime> {
        self.slots.keys().copied().collect()
    }

    pub fn has_bookings(&self) -> bool {
        self.slots.values().any(Slot::is_occupied)
    }
}

/// Builds a provider's default day structure for a date range.
#[derive(Debug, Clone, Copy)]
pub struct CalendarGenerator {
    first_hour: u32,
    last_hour: u32,
}

impl Default for CalendarGenerator {
    fn default() -> Self {
        Self {
            first_hour: FIRST_SLOT_HOUR,
            last_hour: LAST_SLOT_HOUR,
        }
    }
}

impl CalendarGenerator {
    /// Default day for `date`: one slot per hour in the configured window
    pub fn day(&self, provider_id: ProviderId, date: NaiveDate) -> DaySchedule {
        let mut day = DaySchedule::new(provider_id, date);
        for start in (self.first_hour..=self.last_hour).filter_map(slot_start) {
            day.slots.insert(start, Slot::new(start));
        }
        day
    }

    /// Dates covered by a generation request starting at `anchor`
    pub fn dates(&self, anchor: NaiveDate, horizon_days: u32) -> DomainResult<Vec<NaiveDate>> {
        if horizon_days == 0 || horizon_days > MAX_HORIZON_DAYS {
            return Err(DomainError::validation(format!(
                "horizon must be between 1 and {} days",
                MAX_HORIZON_DAYS
            )));
        }

        (0..horizon_days)
            .map(|offset| {
                anchor
                    .checked_add_signed(Duration::days(i64::from(offset)))
                    .ok_or_else(|| DomainError::validation("date range out of bounds"))
            })
            .collect()
    }

    /// Default days for `[anchor, anchor + horizon_days)`
    pub fn generate(
        &self,
        provider_id: ProviderId,
        anchor: NaiveDate,
        horizon_days: u32,
    ) -> DomainResult<Vec<DaySchedule>> {
        Ok(self
            .dates(anchor, horizon_days)?
            .into_iter()
            .map(|date| self.day(provider_id, date))
            .collect())
    }
}
