//! Shared Mobile, AL road network definition.
//!
//! A 5-node synthetic network inspired by the geography of Mobile, Alabama
//! — the same layout the `rust_dt` simulation examples use, rebuilt here
//! with the attributes the eco-routing engine needs (free-flow speed,
//! lanes, road class) instead of a fixed travel-time edge weight.

use eco_core::GeoPoint;
use eco_core::NodeId;
use eco_graph::{RoadClass, RoadGraph, RoadGraphBuilder};

/// Build the 5-node Mobile, AL–inspired road network.
///
/// Returns `(graph, [north_residential, south_residential, downtown,
/// commerce_park, connector])`.
pub fn build_network() -> (RoadGraph, [NodeId; 5]) {
    let mut b = RoadGraphBuilder::new();

    let north_residential = b.add_node(GeoPoint::new(30.710, -88.070));
    let south_residential = b.add_node(GeoPoint::new(30.670, -88.030));
    let downtown = b.add_node(GeoPoint::new(30.695, -88.050));
    let commerce_park = b.add_node(GeoPoint::new(30.700, -88.030));
    let connector = b.add_node(GeoPoint::new(30.680, -88.060));

    // Bidirectional roads; lanes/class set so free-flow speeds roughly
    // match the original fixed-travel-time edges (~45 km/h urban, faster
    // on the arterial to downtown).
    b.add_road(north_residential, downtown, 2_500.0, 70.0, 70.0, 2, RoadClass::Primary);
    b.add_road(north_residential, connector, 1_500.0, 45.0, 45.0, 1, RoadClass::Secondary);
    b.add_road(connector, downtown, 1_000.0, 45.0, 45.0, 1, RoadClass::Secondary);
    b.add_road(south_residential, connector, 1_500.0, 45.0, 45.0, 1, RoadClass::Secondary);
    b.add_road(south_residential, commerce_park, 2_000.0, 50.0, 50.0, 2, RoadClass::Primary);
    b.add_road(downtown, commerce_park, 2_000.0, 50.0, 50.0, 2, RoadClass::Primary);

    let graph = b.build();
    (graph, [north_residential, south_residential, downtown, commerce_park, connector])
}
