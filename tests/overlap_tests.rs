//! Overlap engine and containment tests
//!
//! Pairwise isolation, full-overlap short-circuiting, first-match POI
//! classification, and the two-location end-to-end scenario.

mod fixtures;

use std::sync::Arc;

use fixtures::{location, poi, square, FailingProvider, SquareProvider, StaticPoiSource};
use reachmap::cache::IsochroneCache;
use reachmap::fetch::IsochroneFetcher;
use reachmap::manager::ReachabilitySet;
use reachmap::overlap::{compute_overlaps, OverlapInput, RegionKind};
use reachmap::poi::match_pois;
use reachmap::traits::TravelMode;

#[test]
fn malformed_polygon_only_costs_its_own_pairs() {
    let mut broken = square(1.0, 1.0, 1.0);
    broken.0[0].exterior_mut(|ring| ring.0[1].x = f64::NAN);
    let b = square(1.5, 1.0, 1.0);
    let c = square(2.0, 1.0, 1.0);

    let entries = [
        OverlapInput { name: "A", minutes: 10, geometry: &broken },
        OverlapInput { name: "B", minutes: 10, geometry: &b },
        OverlapInput { name: "C", minutes: 10, geometry: &c },
    ];
    let regions = compute_overlaps(&entries);

    // Pairs (A,B) and (A,C) fail, (B,C) still comes through; the full
    // pass starts from the broken polygon and is skipped too.
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].participants, ["B", "C"]);
    assert_eq!(regions[0].kind, RegionKind::Pairwise);
}

#[test]
fn full_overlap_short_circuits_when_accumulation_runs_dry() {
    let a = square(1.0, 1.0, 1.0);
    let b = square(2.0, 2.0, 1.0);
    let c = square(11.0, 11.0, 1.0);

    let entries = [
        OverlapInput { name: "A", minutes: 10, geometry: &a },
        OverlapInput { name: "B", minutes: 10, geometry: &b },
        OverlapInput { name: "C", minutes: 10, geometry: &c },
    ];
    let regions = compute_overlaps(&entries);

    // A and B overlap; C is far away, so no other pair and no full region.
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].kind, RegionKind::Pairwise);
    assert_eq!(regions[0].participants, ["A", "B"]);
}

#[test]
fn three_overlapping_polygons_produce_pairs_then_full() {
    let a = square(0.0, 0.0, 2.0);
    let b = square(1.0, 0.0, 2.0);
    let c = square(0.5, 0.5, 2.0);

    let entries = [
        OverlapInput { name: "A", minutes: 10, geometry: &a },
        OverlapInput { name: "B", minutes: 15, geometry: &b },
        OverlapInput { name: "C", minutes: 20, geometry: &c },
    ];
    let regions = compute_overlaps(&entries);

    assert_eq!(regions.len(), 4);
    assert!(regions[..3]
        .iter()
        .all(|region| region.kind == RegionKind::Pairwise));
    let full = &regions[3];
    assert_eq!(full.kind, RegionKind::Full);
    assert_eq!(full.label, "All Locations Overlap");
    assert_eq!(full.participants, ["A", "B", "C"]);
    assert_eq!(
        full.areas,
        ["A (10 min)", "B (15 min)", "C (20 min)"]
    );
}

#[test]
fn poi_in_triple_overlap_reports_under_first_pairwise_region() {
    let a = square(0.0, 0.0, 2.0);
    let b = square(1.0, 0.0, 2.0);
    let c = square(0.5, 0.5, 2.0);

    let entries = [
        OverlapInput { name: "A", minutes: 10, geometry: &a },
        OverlapInput { name: "B", minutes: 10, geometry: &b },
        OverlapInput { name: "C", minutes: 10, geometry: &c },
    ];
    let regions = compute_overlaps(&entries);
    assert_eq!(regions.last().map(|r| r.kind), Some(RegionKind::Full));

    // (0.5, 0.25) sits inside every region, including the full one.
    let matches = match_pois(&[poi("Central", 0.5, 0.25)], &regions, true);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].region_label, regions[0].label);
    assert_eq!(regions[0].kind, RegionKind::Pairwise);
}

#[test]
fn two_nearby_locations_end_to_end() {
    // Roughly 5 km apart on the equator.
    let provider = SquareProvider::new(0.01);
    let fetcher = IsochroneFetcher::new(&provider, FailingProvider, Arc::new(IsochroneCache::new()));
    let set = ReachabilitySet::new(fetcher);

    set.load_pois(&StaticPoiSource(vec![
        poi("Old Mill", 0.02, 0.0),
        poi("Lighthouse", 3.0, 3.0),
    ]));
    set.add_location(location("Alpha, North Province", 0.0, 0.0, 15, TravelMode::Driving));
    set.add_location(location("Beta, South Province", 0.045, 0.0, 20, TravelMode::Driving));
    let outcome = set.set_show_pois(true).expect("latest rebuild is current");

    assert_eq!(outcome.resolved.len(), 2);
    assert_eq!(outcome.regions.len(), 1);
    let region = &outcome.regions[0];
    assert_eq!(region.label, "Overlap between Alpha & Beta");
    assert_eq!(region.kind, RegionKind::Pairwise);
    assert_eq!(
        region.areas,
        [
            "Alpha, North Province (15 min)",
            "Beta, South Province (20 min)"
        ]
    );

    // The mill sits in the shared area and appears exactly once, grouped
    // under the region label; the lighthouse is outside everything.
    assert_eq!(outcome.poi_groups.len(), 1);
    let group = &outcome.poi_groups[0];
    assert_eq!(group.region_label, region.label);
    assert_eq!(group.pois.len(), 1);
    assert_eq!(group.pois[0].name, "Old Mill");
}

#[test]
fn toggling_pois_off_empties_the_groups() {
    let provider = SquareProvider::new(0.01);
    let fetcher = IsochroneFetcher::new(&provider, FailingProvider, Arc::new(IsochroneCache::new()));
    let set = ReachabilitySet::new(fetcher);

    set.load_pois(&StaticPoiSource(vec![poi("Old Mill", 0.02, 0.0)]));
    set.add_location(location("Alpha", 0.0, 0.0, 15, TravelMode::Driving));
    set.add_location(location("Beta", 0.045, 0.0, 20, TravelMode::Driving));

    let shown = set.set_show_pois(true).expect("rebuild");
    assert_eq!(shown.poi_groups.len(), 1);

    let hidden = set.set_show_pois(false).expect("rebuild");
    assert!(hidden.poi_groups.is_empty());
    // Overlap regions are unaffected by the toggle.
    assert_eq!(hidden.regions.len(), 1);
}
