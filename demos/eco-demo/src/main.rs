//! eco-demo — drives the eco-routing core end to end over a small
//! synthetic road network inspired by the geography of Mobile, Alabama.
//!
//! Plans a route, enumerates the Pareto preset set, then simulates a few
//! MPC replan ticks with a mid-ride traffic spike.

mod network;

use std::collections::HashMap;
use std::process::ExitCode;

use anyhow::Result;

use eco_core::{GeoPoint, RideId, RoutingConfig};
use eco_facade::{exit_code, ParetoRequest, PlanRequest, ReplanRequest, RoutingFacade};
use eco_graph::TrafficPrediction;
use eco_routing::Weights;

use network::build_network;

const DEPART: &str = "2024-06-03T08:00:00Z";

fn run() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    println!("=== eco-demo — eco-routing core ===\n");

    let (graph, [north_residential, south_residential, downtown, commerce_park, _connector]) = build_network();
    println!("Road network: {} nodes, {} edges", graph.node_count(), graph.edge_count());

    let origin = graph.node_pos(south_residential);
    let destination = graph.node_pos(downtown);

    let config = RoutingConfig::default();
    let facade = RoutingFacade::with_contraction_hierarchy(graph, config);

    // 1. Plan a balanced route.
    let plan_req = PlanRequest::new(origin, destination, DEPART, Weights::BALANCED);
    let plan_resp = match facade.plan(&plan_req, None) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("plan failed: {e}");
            return Err(e.into());
        }
    };
    println!(
        "\nbalanced plan: {:.2} km, {:.1} min, {:.0} g CO2, {} nodes explored",
        plan_resp.primary.distance_km, plan_resp.primary.duration_min, plan_resp.primary.co2_g, plan_resp.primary.nodes_explored
    );
    println!("  path: {:?}", plan_resp.primary.path);
    if let Some(alt) = &plan_resp.alternative {
        println!("  alternative: {:.2} km, {:.1} min, {:.0} g CO2", alt.distance_km, alt.duration_min, alt.co2_g);
    }

    // 2. Pareto preset sweep.
    let pareto_req = ParetoRequest {
        origin,
        destination,
        departure_time: DEPART.to_string(),
        fuel: Default::default(),
    };
    let survivors = facade.pareto(&pareto_req, None)?;
    println!("\npareto survivors ({}):", survivors.len());
    for s in &survivors {
        println!(
            "  {:<10} {:.2} km  {:.1} min  {:.0} g CO2",
            s.preset_name, s.route.distance_km, s.route.duration_min, s.route.co2_g
        );
    }

    // 3. MPC replan loop: three ticks, a traffic spike hits on the second.
    let ride = RideId(1);
    let ticks = [
        ("2024-06-03T08:00:00Z", 0.0, false, false),
        ("2024-06-03T08:00:50Z", 0.35, false, false), // traffic spike forces replan
        ("2024-06-03T08:01:40Z", 0.0, false, false),
    ];

    println!("\nreplan ticks for ride {}:", ride.0);
    for (now, traffic_change_pct, off_route, incident) in ticks {
        let mut predictions = HashMap::new();
        if traffic_change_pct > 0.20 {
            // Congest the direct primary road through downtown.
            if let Some(edge_id) = facade.graph().find_edge(north_residential, downtown) {
                let edge = facade.graph().edge(edge_id);
                predictions.insert(
                    (edge.from, edge.to),
                    TrafficPrediction { speed_kmh: 15.0, flow: 1800.0, congestion: 0.9 },
                );
            }
        }

        let req = ReplanRequest {
            ride_id: ride,
            current_position: origin,
            destination,
            departure_time: now.to_string(),
            weights: Weights::BALANCED,
            traffic_change_pct,
            is_off_route: off_route,
            incident_on_route: incident,
            fuel: Default::default(),
        };
        let resp = facade.replan(&req, Some(&predictions))?;
        println!(
            "  {now}: replanned={} reason={} replan_count={}",
            resp.replanned, resp.reason, resp.status.replan_count
        );
    }

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::from(exit_code::SUCCESS as u8),
        Err(e) => {
            eprintln!("error: {e}");
            let code = e.downcast_ref::<eco_facade::FacadeError>().map(|fe| fe.exit_code()).unwrap_or(exit_code::BAD_INPUT);
            ExitCode::from(code as u8)
        }
    }
}
