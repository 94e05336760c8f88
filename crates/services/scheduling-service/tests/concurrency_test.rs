//! Concurrent booking tests.

use std::sync::mpsc;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use domain::{Actor, SessionType};
use scheduling_service_lib::notification::DisabledNotifier;
use scheduling_service_lib::repository::{
    AvailabilityCalendar, CalendarRepository, ReservationStore,
};
use scheduling_service_lib::service::{ReservationRequest, Scheduler, SchedulingService};

const CALLERS: usize = 32;

fn t(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn setup() -> (Arc<Scheduler>, Uuid) {
    let scheduler = Arc::new(Scheduler::new(
        Arc::new(AvailabilityCalendar::new()),
        Arc::new(ReservationStore::new()),
        Arc::new(DisabledNotifier),
        30,
    ));
    let provider = Uuid::new_v4();
    scheduler
        .generate_calendar(&Actor::counselor(provider), provider, date(), Some(2))
        .unwrap();
    (scheduler, provider)
}

fn request(provider: Uuid, client: Uuid, times: Vec<NaiveTime>) -> ReservationRequest {
    ReservationRequest {
        provider_id: provider,
        client_id: client,
        date: date(),
        start_times: times,
        session_type: SessionType::Chat,
    }
}

/// Run `CALLERS` bookings released at the same instant; returns the outcomes
fn race<F>(scheduler: &Arc<Scheduler>, provider: Uuid, times_for: F) -> Vec<bool>
where
    F: Fn(usize) -> Vec<NaiveTime>,
{
    let barrier = Arc::new(Barrier::new(CALLERS));
    let handles: Vec<_> = (0..CALLERS)
        .map(|i| {
            let scheduler = Arc::clone(scheduler);
            let barrier = Arc::clone(&barrier);
            let times = times_for(i);
            thread::spawn(move || {
                let client = Uuid::new_v4();
                barrier.wait();
                match scheduler.create_reservation(&Actor::client(client), request(provider, client, times)) {
                    Ok(_) => true,
                    Err(err) => {
                        assert!(err.is_domain("RESERVATION_TIMESLOT_OCCUPIED"));
                        false
                    }
                }
            })
        })
        .collect();

    handles.into_iter().map(|h| h.join().unwrap()).collect()
}

#[test]
fn test_exactly_one_caller_wins_a_slot() {
    let (scheduler, provider) = setup();

    let outcomes = race(&scheduler, provider, |_| vec![t(9)]);

    assert_eq!(outcomes.iter().filter(|won| **won).count(), 1);
    let day = scheduler.get_availability(provider, date()).unwrap();
    let occupied = day.slots.values().filter(|s| s.is_occupied()).count();
    assert_eq!(occupied, 1);
}

#[test]
fn test_overlapping_blocks_never_double_book() {
    let (scheduler, provider) = setup();

    // Every caller wants a two-slot block starting somewhere in 9:00..=12:00
    let outcomes = race(&scheduler, provider, |i| {
        let start = 9 + (i % 4) as u32;
        vec![t(start), t(start + 1)]
    });

    let winners = outcomes.iter().filter(|won| **won).count();
    assert!((1..=2).contains(&winners));

    let day = scheduler.get_availability(provider, date()).unwrap();
    let occupied = day.slots.values().filter(|s| s.is_occupied()).count();
    assert_eq!(occupied, winners * 2);

    let provider_view = scheduler
        .list_reservations(&Actor::counselor(provider))
        .unwrap();
    assert_eq!(provider_view.len(), winners);
}

#[test]
fn test_cancel_and_rebook_race() {
    let (scheduler, provider) = setup();
    let first_client = Uuid::new_v4();
    let first = scheduler
        .create_reservation(
            &Actor::client(first_client),
            request(provider, first_client, vec![t(14)]),
        )
        .unwrap();

    let canceller = {
        let scheduler = Arc::clone(&scheduler);
        thread::spawn(move || {
            scheduler
                .cancel_reservation(first.id, &Actor::client(first_client))
                .unwrap();
        })
    };
    let rebookers: Vec<_> = (0..8)
        .map(|_| {
            let scheduler = Arc::clone(&scheduler);
            thread::spawn(move || {
                let client = Uuid::new_v4();
                scheduler
                    .create_reservation(&Actor::client(client), request(provider, client, vec![t(14)]))
                    .is_ok()
            })
        })
        .collect();

    canceller.join().unwrap();
    let wins = rebookers
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|won| *won)
        .count();
    assert!(wins <= 1);

    // With the cancellation done the slot is either taken by one rebooker or free
    let day = scheduler.get_availability(provider, date()).unwrap();
    assert_eq!(day.slot(t(14)).unwrap().is_occupied(), wins == 1);
}

#[test]
fn test_different_days_do_not_interfere() {
    let (scheduler, provider) = setup();
    let second_day = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();

    let handles: Vec<_> = [date(), second_day]
        .into_iter()
        .map(|day| {
            let scheduler = Arc::clone(&scheduler);
            thread::spawn(move || {
                let client = Uuid::new_v4();
                let mut req = request(provider, client, vec![t(9), t(10)]);
                req.date = day;
                scheduler.create_reservation(&Actor::client(client), req).is_ok()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

#[test]
fn test_held_day_lock_blocks_only_that_day() {
    let calendar = Arc::new(AvailabilityCalendar::new());
    let scheduler = Arc::new(Scheduler::new(
        calendar.clone(),
        Arc::new(ReservationStore::new()),
        Arc::new(DisabledNotifier),
        30,
    ));
    let provider = Uuid::new_v4();
    let other_provider = Uuid::new_v4();
    for p in [provider, other_provider] {
        scheduler
            .generate_calendar(&Actor::counselor(p), p, date(), Some(2))
            .unwrap();
    }
    let second_day = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();

    let handle = calendar.day_handle(provider, date()).unwrap();
    let held = handle.lock();

    let (tx, rx) = mpsc::channel();
    let targets = [(provider, second_day), (other_provider, date()), (provider, date())];
    let workers: Vec<_> = targets
        .into_iter()
        .map(|(p, day)| {
            let scheduler = Arc::clone(&scheduler);
            let tx = tx.clone();
            thread::spawn(move || {
                let client = Uuid::new_v4();
                let mut req = request(p, client, vec![t(9)]);
                req.date = day;
                let booked = scheduler.create_reservation(&Actor::client(client), req).is_ok();
                tx.send((p, day, booked)).unwrap();
            })
        })
        .collect();
    drop(tx);

    let mut finished = Vec::new();
    for _ in 0..2 {
        finished.push(rx.recv_timeout(Duration::from_secs(5)).unwrap());
    }
    finished.sort_by_key(|(p, day, _)| (*day, *p == provider));
    assert_eq!(
        finished,
        vec![(other_provider, date(), true), (provider, second_day, true)]
    );

    // The booking on the held day is still waiting for the lock
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());

    drop(held);
    let (p, day, booked) = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!((p, day, booked), (provider, date(), true));

    for worker in workers {
        worker.join().unwrap();
    }
}
