//! Availability calendar: per-provider day schedules with per-day locking.
//!
//! Every day schedule lives behind its own mutex. Holding that mutex is the
//! mutual-exclusion region for everything touching the day's slots (booking,
//! cancellation, slot patches). A provider's date map sits behind a
//! reader/writer lock that is only taken for writing by batch inserts and
//! replacements, and providers are kept in a concurrent map so unrelated
//! providers never contend.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};

use common::AppResult;
use domain::{DaySchedule, DomainError, ProviderId};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Shared handle to one day's lock.
pub type DayHandle = Arc<Mutex<DaySchedule>>;

type ProviderCalendar = RwLock<BTreeMap<NaiveDate, DayHandle>>;

/// How a single day schedule is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutMode {
    /// Fail if the date already has a schedule
    Insert,
    /// Overwrite an existing schedule that holds no bookings
    Replace,
}

/// Calendar repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait CalendarRepository: Send + Sync {
    /// Lock handle for the provider's day; fails if the date has no schedule
    fn day_handle(&self, provider_id: ProviderId, date: NaiveDate) -> AppResult<DayHandle>;

    /// Snapshot of the provider's day
    fn get_day_schedule(&self, provider_id: ProviderId, date: NaiveDate) -> AppResult<DaySchedule>;

    /// Write a single day schedule
    fn put_day_schedule(
        &self,
        provider_id: ProviderId,
        schedule: DaySchedule,
        mode: PutMode,
    ) -> AppResult<()>;

    /// Insert a batch of new days; fails without writing if any date exists
    fn put_day_schedules(
        &self,
        provider_id: ProviderId,
        schedules: Vec<DaySchedule>,
    ) -> AppResult<Vec<NaiveDate>>;

    /// Insert only the days whose dates are not scheduled yet
    fn insert_missing(
        &self,
        provider_id: ProviderId,
        schedules: Vec<DaySchedule>,
    ) -> AppResult<Vec<NaiveDate>>;

    /// Scheduled dates of the provider in ascending order
    fn dates(&self, provider_id: ProviderId) -> AppResult<Vec<NaiveDate>>;
}

/// In-memory calendar store.
#[derive(Default)]
pub struct AvailabilityCalendar {
    providers: DashMap<ProviderId, Arc<ProviderCalendar>>,
}

impl AvailabilityCalendar {
    /// Create an empty calendar store
    pub fn new() -> Self {
        Self::default()
    }

    fn calendar(&self, provider_id: ProviderId) -> Option<Arc<ProviderCalendar>> {
        self.providers
            .get(&provider_id)
            .map(|calendar| Arc::clone(calendar.value()))
    }

    fn calendar_or_create(&self, provider_id: ProviderId) -> Arc<ProviderCalendar> {
        Arc::clone(self.providers.entry(provider_id).or_default().value())
    }

    fn check_owner(provider_id: ProviderId, schedules: &[DaySchedule]) -> AppResult<()> {
        if schedules.iter().any(|s| s.provider_id != provider_id) {
            return Err(DomainError::validation("schedule belongs to another provider").into());
        }
        Ok(())
    }
}

impl CalendarRepository for AvailabilityCalendar {
    fn day_handle(&self, provider_id: ProviderId, date: NaiveDate) -> AppResult<DayHandle> {
        let calendar = self
            .calendar(provider_id)
            .ok_or(DomainError::UnavailableDate(date))?;
        let days = calendar.read();
        days.get(&date)
            .cloned()
            .ok_or_else(|| DomainError::UnavailableDate(date).into())
    }

    fn get_day_schedule(&self, provider_id: ProviderId, date: NaiveDate) -> AppResult<DaySchedule> {
        let handle = self.day_handle(provider_id, date)?;
        let day = handle.lock();
        Ok(day.clone())
    }

    fn put_day_schedule(
        &self,
        provider_id: ProviderId,
        schedule: DaySchedule,
        mode: PutMode,
    ) -> AppResult<()> {
        Self::check_owner(provider_id, std::slice::from_ref(&schedule))?;

        let calendar = self.calendar_or_create(provider_id);
        let mut days = calendar.write();

        let Some(existing) = days.get(&schedule.date).cloned() else {
            days.insert(schedule.date, Arc::new(Mutex::new(schedule)));
            return Ok(());
        };

        if mode == PutMode::Insert {
            return Err(DomainError::ScheduleExists(schedule.date).into());
        }

        let mut current = existing.lock();
        if let Some(slot) = current.slots.values().find(|s| s.is_occupied()) {
            return Err(DomainError::SlotDeletionDenied(slot.start_time).into());
        }
        // Swap contents in place so waiters on this handle see the new day
        *current = schedule;

        Ok(())
    }

    fn put_day_schedules(
        &self,
        provider_id: ProviderId,
        schedules: Vec<DaySchedule>,
    ) -> AppResult<Vec<NaiveDate>> {
        Self::check_owner(provider_id, &schedules)?;

        let calendar = self.calendar_or_create(provider_id);
        let mut days = calendar.write();

        if let Some(existing) = schedules.iter().find(|s| days.contains_key(&s.date)) {
            return Err(DomainError::ScheduleExists(existing.date).into());
        }

        let mut inserted = Vec::with_capacity(schedules.len());
        for schedule in schedules {
            if days.contains_key(&schedule.date) {
                // Duplicate date inside the batch itself
                for date in &inserted {
                    days.remove(date);
                }
                return Err(DomainError::ScheduleExists(schedule.date).into());
            }
            inserted.push(schedule.date);
            days.insert(schedule.date, Arc::new(Mutex::new(schedule)));
        }

        Ok(inserted)
    }

    fn insert_missing(
        &self,
        provider_id: ProviderId,
        schedules: Vec<DaySchedule>,
    ) -> AppResult<Vec<NaiveDate>> {
        Self::check_owner(provider_id, &schedules)?;

        let calendar = self.calendar_or_create(provider_id);
        let mut days = calendar.write();

        let mut inserted = Vec::new();
        for schedule in schedules {
            if days.contains_key(&schedule.date) {
                continue;
            }
            inserted.push(schedule.date);
            days.insert(schedule.date, Arc::new(Mutex::new(schedule)));
        }

        Ok(inserted)
    }

    fn dates(&self, provider_id: ProviderId) -> AppResult<Vec<NaiveDate>> {
        let Some(calendar) = self.calendar(provider_id) else {
            return Ok(Vec::new());
        };
        let days = calendar.read();
        Ok(days.keys().copied().collect())
    }
}
