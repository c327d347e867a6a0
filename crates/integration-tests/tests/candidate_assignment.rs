//! Dispatch passes against in-memory fakes.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use star_burger_core::{Candidate, MenuAvailabilityIndex, MenuItem, ProductId, RestaurantId};
use star_burger_integration_tests::{
    InMemoryGeocodeStore, ScriptedGeocoder, coordinate, menu, order, resolver, restaurant,
};
use star_burger_restaurateur::geocoder::GeocodeError;
use star_burger_restaurateur::services::{CandidateAssigner, DispatchContext};

const CUSTOMER: &str = "Москва, Красная площадь 1";
const ARBAT: &str = "Москва, Арбат 10";
const TVERSKAYA: &str = "Москва, Тверская 20";
const LUBYANKA: &str = "Москва, Лубянка 5";

fn city_geocoder() -> ScriptedGeocoder {
    ScriptedGeocoder::new()
        .found(CUSTOMER, coordinate(37.6208, 55.7539))
        .found(ARBAT, coordinate(37.5950, 55.7500))
        .found(TVERSKAYA, coordinate(37.6050, 55.7650))
        .found(LUBYANKA, coordinate(37.6270, 55.7590))
}

fn city_context() -> DispatchContext {
    let mut rows: Vec<MenuItem> = Vec::new();
    rows.extend(menu(1, &[1, 2]));
    rows.extend(menu(2, &[1, 2, 3]));
    rows.extend(menu(3, &[1, 2, 3]));
    // Listed but out of stock.
    rows.push(MenuItem {
        restaurant_id: RestaurantId::new(1),
        product_id: ProductId::new(3),
        available: false,
    });

    DispatchContext::new(
        vec![
            restaurant(1, "Арбат", ARBAT),
            restaurant(2, "Тверская", TVERSKAYA),
            restaurant(3, "Лубянка", LUBYANKA),
        ],
        MenuAvailabilityIndex::build(rows),
    )
}

fn assigner(geocoder: Arc<ScriptedGeocoder>) -> CandidateAssigner {
    CandidateAssigner::new(resolver(Arc::new(InMemoryGeocodeStore::default()), geocoder))
}

#[tokio::test]
async fn test_only_restaurants_with_every_product_are_candidates() {
    let geocoder = Arc::new(city_geocoder());

    let result = assigner(geocoder.clone())
        .assign_candidates(&order(1, CUSTOMER, &[1, 2, 3]), &city_context())
        .await;

    let ids: Vec<i32> = result
        .candidates
        .iter()
        .map(|c| c.restaurant_id().get())
        .collect();
    assert_eq!(ids, vec![3, 2]);
    assert_eq!(geocoder.calls_for(ARBAT), 0);
}

#[tokio::test]
async fn test_candidates_are_sorted_nearest_first() {
    let result = assigner(Arc::new(city_geocoder()))
        .assign_candidates(&order(1, CUSTOMER, &[1]), &city_context())
        .await;

    let distances: Vec<f64> = result
        .candidates
        .iter()
        .map(|c| match c {
            Candidate::Ranked(ranked) => ranked.distance_km,
            other => panic!("expected ranked candidate, got {other:?}"),
        })
        .collect();
    assert_eq!(distances.len(), 3);
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    assert!(result.candidates[0].label().starts_with("Лубянка - "));
    assert!(result.candidates[0].label().ends_with(" км."));
}

#[tokio::test]
async fn test_unavailable_restaurant_address_is_unknown_distance() {
    let geocoder = Arc::new(city_geocoder().failing(
        TVERSKAYA,
        GeocodeError::Http("connection reset".to_string()),
    ));

    let result = assigner(geocoder)
        .assign_candidates(&order(1, CUSTOMER, &[1, 2, 3]), &city_context())
        .await;

    assert_eq!(result.candidates.len(), 2);
    assert!(matches!(&result.candidates[0], Candidate::Ranked(r) if r.restaurant_id.get() == 3));
    assert!(
        matches!(&result.candidates[1], Candidate::UnknownDistance(u) if u.restaurant_id.get() == 2)
    );
    assert_eq!(
        result.candidates[1].label(),
        "Тверская - расстояние неизвестно"
    );
}

#[tokio::test]
async fn test_no_eligible_restaurant_makes_no_geocoder_calls() {
    let geocoder = Arc::new(city_geocoder());

    let result = assigner(geocoder.clone())
        .assign_candidates(&order(1, CUSTOMER, &[42]), &city_context())
        .await;

    assert!(result.candidates.is_empty());
    assert_eq!(geocoder.total_calls(), 0);
}

#[tokio::test]
async fn test_pre_assigned_order_has_single_candidate() {
    let geocoder = Arc::new(city_geocoder());
    let mut pinned = order(1, CUSTOMER, &[1, 2, 3]);
    pinned.restaurant = Some(restaurant(1, "Арбат", ARBAT));

    let result = assigner(geocoder.clone())
        .assign_candidates(&pinned, &city_context())
        .await;

    assert_eq!(result.candidates.len(), 1);
    assert!(matches!(
        &result.candidates[0],
        Candidate::Assigned { restaurant_id, .. } if restaurant_id.get() == 1
    ));
    assert_eq!(geocoder.total_calls(), 0);
}

#[tokio::test]
async fn test_batch_shares_cache_and_isolates_failures() {
    let geocoder = Arc::new(city_geocoder().failing(
        "Москва, Несуществующая 0",
        GeocodeError::Timeout(std::time::Duration::from_secs(10)),
    ));
    let orders = vec![
        order(1, CUSTOMER, &[1]),
        order(2, "Москва, Несуществующая 0", &[1]),
        order(3, CUSTOMER, &[1, 2, 3]),
    ];

    let results = assigner(geocoder.clone())
        .assign_all(&orders, &city_context())
        .await;

    let order_ids: Vec<i64> = results.iter().map(|r| r.order_id.get()).collect();
    assert_eq!(order_ids, vec![1, 2, 3]);

    assert!(results[0].candidates.iter().all(|c| matches!(c, Candidate::Ranked(_))));
    assert_eq!(results[1].candidates.len(), 3);
    assert!(
        results[1]
            .candidates
            .iter()
            .all(|c| matches!(c, Candidate::UnknownDistance(_)))
    );
    assert_eq!(results[2].candidates.len(), 2);

    // Each address is looked up once across the whole batch.
    assert_eq!(geocoder.calls_for(CUSTOMER), 1);
    assert_eq!(geocoder.calls_for(ARBAT), 1);
    assert_eq!(geocoder.calls_for(LUBYANKA), 1);
}
