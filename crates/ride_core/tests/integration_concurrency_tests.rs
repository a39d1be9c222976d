mod support;

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use ride_core::error::RideError;
use ride_core::model::{BookingId, CarCategory, DriverId};
use support::fixtures::{register_fleet, ride, seeded_service};

#[test]
fn concurrent_requests_never_double_book_a_driver() {
    let service = Arc::new(seeded_service(11));
    register_fleet(&service, CarCategory::Sedan, 5);
    register_fleet(&service, CarCategory::Suv, 5);

    let handles: Vec<_> = (0..16)
        .map(|t| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                let rider = format!("rider-{t}");
                let mut booked = Vec::new();
                for _ in 0..4 {
                    match service.quote_and_request(&ride(&rider, 6, CarCategory::Sedan), None) {
                        Ok((_, booking)) => booked.push(booking),
                        Err(RideError::Unavailable { .. }) => {}
                        Err(err) => panic!("unexpected rejection: {err}"),
                    }
                }
                booked
            })
        })
        .collect();

    let bookings: Vec<_> = handles
        .into_iter()
        .flat_map(|h| h.join().expect("worker"))
        .collect();

    // Nothing was released, so the fleet caps the number of bookings.
    assert_eq!(bookings.len(), 10);
    let drivers: HashSet<DriverId> = bookings.iter().map(|b| b.driver_id).collect();
    assert_eq!(drivers.len(), 10);
    let ids: HashSet<BookingId> = bookings.iter().map(|b| b.id).collect();
    assert_eq!(ids.len(), 10);
    assert!(ids.iter().all(|id| (1..=10).contains(&id.0)));
    assert_eq!(service.telemetry().requests_unmatched, 64 - 10);
}

#[test]
fn concurrent_completions_release_every_driver() {
    let service = Arc::new(seeded_service(12));
    register_fleet(&service, CarCategory::Compact, 8);

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                let rider = format!("rider-{t}");
                for _ in 0..25 {
                    let (_, booking) = loop {
                        match service.quote_and_request(&ride(&rider, 2, CarCategory::Compact), None)
                        {
                            Ok(ok) => break ok,
                            Err(RideError::Unavailable { .. }) => thread::yield_now(),
                            Err(err) => panic!("unexpected rejection: {err}"),
                        }
                    };
                    service
                        .complete_booking(booking.id, &rider)
                        .expect("own active booking");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker");
    }

    assert_eq!(service.all_bookings().len(), 200);
    assert!(service.list_drivers().iter().all(|d| d.available));
    let telemetry = service.telemetry();
    assert_eq!(telemetry.bookings_created, 200);
    assert_eq!(telemetry.bookings_completed, 200);
}

#[test]
fn promo_uses_are_never_overspent() {
    let service = Arc::new(seeded_service(13));
    service.add_promo("FLASH", 10.0, 7).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                (0..10)
                    .filter(|_| {
                        service
                            .estimate_fare(5, CarCategory::Sedan, Some("flash"))
                            .expect("estimate")
                            .promo_code
                            .is_some()
                    })
                    .count()
            })
        })
        .collect();
    let discounted: usize = handles.into_iter().map(|h| h.join().expect("worker")).sum();

    assert_eq!(discounted, 7);
    assert_eq!(service.find_promo("FLASH").unwrap().uses_left, 0);
    assert_eq!(service.telemetry().promo_uses, 7);
}
