use hifitime::{Epoch, Unit};
use std::str::FromStr;

use crate::prelude::{
    Config, EntityId, Error, GeodeticPoint, Highlight, OrbitalElementRecord, Scenario, Selection,
    SelectionController, ValidationHit, VesselReport,
};

const ISS_L1: &str = "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
const ISS_L2: &str = "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn t0() -> Epoch {
    Epoch::from_str("2008-09-20T12:30:00 UTC").unwrap()
}

/// Selection instant
fn t() -> Epoch {
    t0() + 30.0 * Unit::Minute
}

fn elements() -> Vec<OrbitalElementRecord> {
    let t0 = t0();
    vec![
        OrbitalElementRecord::new("ISS", t0 + 2.0 * Unit::Hour, ISS_L1, ISS_L2),
        OrbitalElementRecord::new("LATE", t0 + 3.0 * Unit::Hour, ISS_L1, ISS_L2),
        OrbitalElementRecord::new("ISS", t0, ISS_L1, ISS_L2),
        OrbitalElementRecord::new("LATE", t0 + 5.0 * Unit::Hour, ISS_L1, ISS_L2),
        OrbitalElementRecord::new("BROKEN", t0, "1 garbage", "2 garbage"),
    ]
}

/// ISS sub satellite point at selection instant
fn sub_point() -> GeodeticPoint {
    let scenario = Scenario::new(Config::default(), elements(), vec![], vec![]);
    scenario
        .position_at(&EntityId::satellite("ISS"), t())
        .unwrap()
        .on_surface()
}

/// NEAR sits below the ISS at selection instant, FAR almost on the other side of the globe.
fn scenario() -> Scenario {
    scenario_with(Config::default())
}

fn scenario_with(cfg: Config) -> Scenario {
    let (t0, t) = (t0(), t());
    let (lon, lat) = sub_point().ddeg();
    let (far_lon, far_lat) = (lon + 162.0, -lat);

    let reports = vec![
        VesselReport::new("111", "NEAR", t0 + 2.0 * Unit::Hour, lon, lat),
        VesselReport::new("222", "FAR", t0, far_lon, far_lat),
        VesselReport::new("111", "NEAR", t0, lon, lat),
        VesselReport::new("222", "FAR", t0 + 2.0 * Unit::Hour, far_lon, far_lat),
        VesselReport::new("333", "LOST", t0, 0.0, 0.0),
    ];

    let hits = vec![
        ValidationHit::new("111", t, "ISS", true, lon, lat),
        ValidationHit::new("222", t, "ISS", true, 0.0, 0.0),
        ValidationHit::new("111", t0 + 4.0 * Unit::Hour, "LATE", false, 0.0, 0.0),
    ];

    Scenario::new(cfg, elements(), reports, hits)
}

#[test]
fn scenario_construction() {
    init_logger();
    let scenario = scenario();
    let t0 = t0();

    assert_eq!(scenario.satellites().count(), 3);
    assert_eq!(scenario.vessels().count(), 2);
    assert!(scenario.vessel("333").is_none(), "degenerate track should be dropped");
    assert!(scenario.satellite("BROKEN").unwrap().timeline().is_empty());
    assert_eq!(scenario.entities().count(), 3 + 2 + 3);

    let ids = scenario.entities().map(|entity| entity.id()).collect::<Vec<_>>();
    assert_eq!(ids.first(), Some(&EntityId::satellite("BROKEN")));
    assert!(ids.contains(&EntityId::vessel("111")));
    assert!(!ids.contains(&EntityId::vessel("333")));
    assert_eq!(ids.last(), Some(&EntityId::Hit(2)));
    for id in ids.iter() {
        assert_eq!(scenario.entity(id).map(|entity| entity.id()).as_ref(), Some(id));
    }

    assert_eq!(scenario.time_span(), Some((t0, t0 + 5.0 * Unit::Hour)));

    assert_eq!(
        scenario.position_at(&EntityId::vessel("333"), t()),
        Err(Error::UnknownEntity("Vessel: 333".to_string()))
    );
    assert!(scenario
        .position_at(&EntityId::satellite("LATE"), t())
        .is_err());
    assert!(scenario
        .position_at(&EntityId::satellite("LATE"), t0 + 4.0 * Unit::Hour)
        .is_ok());
}

#[test]
fn hit_marker_position() {
    init_logger();
    let scenario = scenario();
    let sub_point = sub_point();
    // markers are static
    for t in [t0(), t(), t0() + 10.0 * Unit::Hour] {
        let marker = scenario.position_at(&EntityId::Hit(0), t).unwrap();
        let err = crate::prelude::surface_distance(&marker, &sub_point).unwrap();
        assert!(err < 1.0, "marker position error too large {}", err);
    }
    assert!(scenario.position_at(&EntityId::Hit(10), t()).is_err());
}

#[test]
fn visibility_sets() {
    init_logger();
    let scenario = scenario();
    let t = t();

    let set = scenario
        .visibility_set(&EntityId::vessel("111"), t)
        .unwrap();
    // LATE and BROKEN have no coverage at this instant
    assert_eq!(set.len(), 1);
    assert!(set[&EntityId::satellite("ISS")].in_range());

    let set = scenario
        .visibility_set(&EntityId::satellite("ISS"), t)
        .unwrap();
    assert_eq!(set.len(), 2);
    assert!(set[&EntityId::vessel("111")].in_range());
    assert!(!set[&EntityId::vessel("222")].in_range());

    let summary = scenario
        .selection_summary(&EntityId::satellite("ISS"), t)
        .unwrap();
    assert_eq!(summary.peers, vec![(EntityId::vessel("111"), "NEAR".to_string())]);
    assert_eq!(summary.to_string(), "Vessels in range: NEAR");

    let summary = scenario
        .selection_summary(&EntityId::vessel("222"), t)
        .unwrap();
    assert!(summary.is_empty());
    assert_eq!(summary.to_string(), "No satellites in range");

    // hit markers have no peers
    let summary = scenario.selection_summary(&EntityId::Hit(0), t).unwrap();
    assert!(summary.is_empty());
    assert_eq!(summary.to_string(), "No peers in range");

    // reference without position
    assert!(scenario
        .visibility_set(&EntityId::vessel("111"), t0() + 3.0 * Unit::Hour)
        .is_err());
}

#[test]
fn ship_selection() {
    init_logger();
    let scenario = scenario();
    let mut controller = SelectionController::default();

    let update = controller
        .on_pick(&scenario, Some(EntityId::vessel("111")), t())
        .unwrap();

    assert_eq!(update.selection, Selection::ShipSelected("111".to_string()));
    assert_eq!(update.epoch, t());
    assert_eq!(update.highlights.len(), 3);
    assert_eq!(update.highlights[&EntityId::satellite("ISS")], Highlight::InRange);
    assert_eq!(update.highlights[&EntityId::satellite("LATE")], Highlight::Default);
    assert_eq!(update.highlights[&EntityId::satellite("BROKEN")], Highlight::Default);
    assert_eq!(
        update.in_range().collect::<Vec<_>>(),
        vec![&EntityId::satellite("ISS")]
    );
    assert_eq!(update.markers, vec![EntityId::Hit(0), EntityId::Hit(2)]);

    let summary = update.summary.unwrap();
    assert_eq!(summary.to_string(), "Satellites in range: ISS");

    assert_eq!(controller.highlighted().len(), 1);
    assert!(controller.highlighted().contains(&EntityId::satellite("ISS")));
}

#[test]
fn satellite_selection() {
    init_logger();
    let scenario = scenario();
    let mut controller = SelectionController::default();

    let update = controller
        .on_pick(&scenario, Some(EntityId::satellite("ISS")), t())
        .unwrap();

    assert_eq!(update.selection, Selection::SatelliteSelected("ISS".to_string()));
    assert_eq!(update.highlights.len(), 2);
    assert_eq!(update.highlights[&EntityId::vessel("111")], Highlight::InRange);
    assert_eq!(update.highlights[&EntityId::vessel("222")], Highlight::Default);
    assert_eq!(update.markers, vec![EntityId::Hit(0), EntityId::Hit(1)]);

    // satellite without coverage: nothing in range
    let update = controller
        .on_pick(&scenario, Some(EntityId::satellite("BROKEN")), t())
        .unwrap();
    assert!(update.highlights.values().all(|h| *h == Highlight::Default));
    assert_eq!(update.summary.unwrap().to_string(), "No vessels in range");
    assert!(controller.highlighted().is_empty());
}

#[test]
fn idle_transitions() {
    init_logger();
    let scenario = scenario();
    let mut controller = SelectionController::default();
    assert_eq!(controller.selection(), &Selection::Idle);
    assert!(controller.on_clock_tick(&scenario, t()).is_none());

    controller.on_pick(&scenario, Some(EntityId::vessel("111")), t());

    // hit markers are not selectable
    assert!(controller
        .on_pick(&scenario, Some(EntityId::Hit(0)), t())
        .is_none());
    assert_eq!(controller.selection(), &Selection::ShipSelected("111".to_string()));

    // empty space
    let update = controller.on_pick(&scenario, None, t()).unwrap();
    assert_eq!(update.selection, Selection::Idle);
    assert!(update.summary.is_none());
    assert!(update.markers.is_empty());
    assert_eq!(update.highlights.len(), 5);
    assert!(update.highlights.values().all(|h| *h == Highlight::Default));
    assert!(controller.highlighted().is_empty());
    assert!(controller.on_clock_tick(&scenario, t() + 10.0 * Unit::Second).is_none());

    // unknown entity
    controller.on_pick(&scenario, Some(EntityId::satellite("ISS")), t());
    let update = controller
        .on_pick(&scenario, Some(EntityId::vessel("333")), t())
        .unwrap();
    assert_eq!(update.selection, Selection::Idle);
}

#[test]
fn recompute_debouncing() {
    init_logger();
    let scenario = scenario();
    let mut controller = SelectionController::default();
    let t = t();

    controller.on_pick(&scenario, Some(EntityId::vessel("111")), t);

    for (dt_s, expected) in [
        (0.5, false),
        (1.0, true),
        (1.5, false),
        (2.0, true),
        (60.0, true),
        (60.2, false),
        // backward scrubbing
        (-600.0, true),
        (-600.9, false),
    ] {
        let tick = t + dt_s * Unit::Second;
        let update = controller.on_clock_tick(&scenario, tick);
        assert_eq!(update.is_some(), expected, "bad debounce @{}s", dt_s);
        if let Some(update) = update {
            assert_eq!(update.epoch, tick);
        }
    }
}

#[test]
fn selection_replacement() {
    init_logger();
    let scenario = scenario();
    let mut controller = SelectionController::default();
    let t = t();

    controller.on_pick(&scenario, Some(EntityId::vessel("111")), t);
    controller.on_clock_tick(&scenario, t + 5.0 * Unit::Second);

    let update = controller
        .on_pick(&scenario, Some(EntityId::satellite("ISS")), t + 5.5 * Unit::Second)
        .unwrap();
    assert_eq!(update.selection, Selection::SatelliteSelected("ISS".to_string()));
    // previous highlights are superseded
    assert!(!controller.highlighted().contains(&EntityId::satellite("ISS")));
    assert!(controller.highlighted().contains(&EntityId::vessel("111")));

    assert!(controller
        .on_clock_tick(&scenario, t + 6.0 * Unit::Second)
        .is_none());
    let update = controller
        .on_clock_tick(&scenario, t + 6.5 * Unit::Second)
        .unwrap();
    assert_eq!(update.selection, Selection::SatelliteSelected("ISS".to_string()));
    assert!(update.highlights.keys().all(|id| matches!(id, EntityId::Vessel(_))));
}

#[test]
fn vessel_out_of_validity() {
    init_logger();
    let scenario = scenario();
    let mut controller = SelectionController::default();

    let update = controller
        .on_pick(
            &scenario,
            Some(EntityId::vessel("111")),
            t0() + 3.5 * Unit::Hour,
        )
        .unwrap();

    assert_eq!(update.selection, Selection::ShipSelected("111".to_string()));
    assert!(update.highlights.values().all(|h| *h == Highlight::Default));
    assert_eq!(update.summary.unwrap().to_string(), "No satellites in range");
}

#[test]
fn hit_validation() {
    init_logger();
    let scenario = scenario();
    let checks = scenario.validate_hits();
    assert_eq!(checks.len(), 3);

    let expected = [Some(true), Some(false), None];

    for ((index, check), expected) in checks.iter().zip(expected) {
        let hit = &scenario.hits()[*index];
        assert_eq!(check.plausible(hit), expected, "hit #{} bad verdict", index);
    }

    let (_, check) = &checks[0];
    let deviation = check.deviation_km.unwrap();
    assert!(deviation < 1.0, "deviation too large {}", deviation);
}

#[test]
fn visibility_range() {
    init_logger();
    let t = t();
    for (range_km, in_range) in [(1.0, true), (0.0, false)] {
        let scenario = scenario_with(Config::default().with_visibility_range_km(range_km));
        let set = scenario
            .visibility_set(&EntityId::satellite("ISS"), t)
            .unwrap();
        assert_eq!(
            set[&EntityId::vessel("111")].in_range(),
            in_range,
            "bad classification with {}km range",
            range_km
        );
        assert!(!set[&EntityId::vessel("222")].in_range());
    }
}
