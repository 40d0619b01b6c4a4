// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]
//! End-to-end behavior of the street network store.

use closure_graph::{
    ClockIds, ConnectionId, EdgeId, Feature, Geometry, NodeId, ProcessingResult, SequentialIds,
    StreetNetwork, MANUAL_CONNECTION_TYPE, PLACEHOLDER_ERROR,
};

fn seq_net() -> StreetNetwork<SequentialIds> {
    StreetNetwork::with_ids(SequentialIds::new())
}

#[test]
fn created_nodes_are_fresh_and_keep_coordinates() {
    let mut net = StreetNetwork::with_ids(ClockIds::seeded(3));
    let mut seen = std::collections::HashSet::new();
    for i in 0..200 {
        let coords = [f64::from(i) * 0.5, -f64::from(i)];
        let id = net.create_node(coords);
        assert!(seen.insert(id.clone()), "duplicate id {id}");
        assert_eq!(net.node(&id).unwrap().coordinates, coords);
    }
    assert_eq!(net.nodes_len(), 200);
}

#[test]
fn full_path_builds_one_edge_per_hop_with_adjacency() {
    let mut net = seq_net();
    let path: Vec<NodeId> = (0..5)
        .map(|i| net.create_node([f64::from(i), f64::from(i) * 2.0]))
        .collect();
    let conn_id = net.add_manual_connection("K Street NW", &path).unwrap();
    let conn = net.manual_connection(&conn_id).unwrap();

    assert_eq!(conn.edges.len(), path.len() - 1);
    assert!(conn.is_fully_connected());
    for (i, edge_id) in conn.edges.iter().enumerate() {
        assert_eq!(edge_id, &EdgeId::for_hop(&conn_id, i));
        let edge = net.edge(edge_id).unwrap();
        let src = net.node(&path[i]).unwrap().coordinates;
        let dst = net.node(&path[i + 1]).unwrap().coordinates;
        assert_eq!(edge.coordinates, [src, dst]);
        assert!(net.adjacent_edges(&path[i]).contains(edge_id));
        assert!(net.adjacent_edges(&path[i + 1]).contains(edge_id));
    }
    // Interior nodes see their incoming hop before their outgoing hop.
    assert_eq!(
        net.adjacent_edges(&path[2]),
        [conn.edges[1].clone(), conn.edges[2].clone()]
    );
}

#[test]
fn short_path_leaves_counts_unchanged() {
    let mut net = seq_net();
    let a = net.create_node([0.0, 0.0]);
    let before = (net.nodes_len(), net.edges_len(), net.manual_connections().len());
    assert!(net.add_manual_connection("K", &[a]).is_err());
    assert!(net.add_manual_connection("K", &[]).is_err());
    assert_eq!(
        (net.nodes_len(), net.edges_len(), net.manual_connections().len()),
        before
    );
}

#[test]
fn missing_interior_node_drops_touching_hops() {
    let mut net = seq_net();
    let a = net.create_node([0.0, 0.0]);
    let b = net.create_node([1.0, 0.0]);
    let c = net.create_node([2.0, 0.0]);
    let ghost = NodeId::from("never_created");
    let path = [a, b, ghost.clone(), c];

    let conn_id = net.add_manual_connection("K", &path).unwrap();
    let conn = net.manual_connection(&conn_id).unwrap();
    assert_eq!(conn.node_path.len(), 4);
    // hops 1 (b->ghost) and 2 (ghost->c) touch the missing node
    assert_eq!(conn.edges, [EdgeId::for_hop(&conn_id, 0)]);
    let skipped: Vec<usize> = conn.unresolved_hops.iter().map(|h| h.index).collect();
    assert_eq!(skipped, [1, 2]);
    assert!(conn.unresolved_hops.iter().all(|h| h.missing == [ghost.clone()]));
    assert!(net.adjacent_edges(&ghost).is_empty());

    // export still draws the resolvable part of the path
    let fc = net.export_features(&ProcessingResult::default());
    assert_eq!(
        fc.features[0].geometry,
        Geometry::LineString(vec![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]])
    );
}

#[test]
fn missing_path_endpoint_drops_a_single_hop() {
    let mut net = seq_net();
    let a = net.create_node([0.0, 0.0]);
    let b = net.create_node([1.0, 1.0]);
    let c = net.create_node([2.0, 2.0]);
    let path = [NodeId::from("gone"), a, b, c];
    let conn_id = net.add_manual_connection("K", &path).unwrap();
    let conn = net.manual_connection(&conn_id).unwrap();
    assert_eq!(conn.edges.len(), path.len() - 2);
    assert_eq!(
        conn.edges,
        [EdgeId::for_hop(&conn_id, 1), EdgeId::for_hop(&conn_id, 2)]
    );
    assert!(!conn.is_fully_connected());
}

#[test]
fn replacement_is_visible_with_and_without_a_batch() {
    let mut net = seq_net();
    net.replace_disconnected_segments("A_St", &ConnectionId::from("whatever"));
    assert!(net.is_segment_replaced("A_St"));

    net.process_segments(&["B St"]);
    net.replace_disconnected_segments("B_St", &ConnectionId::from("whatever"));
    assert!(net.is_segment_replaced("A_St"));
    assert!(net.is_segment_replaced("B_St"));
    assert!(!net.is_segment_replaced("C_St"));
}

#[test]
fn export_is_idempotent_and_drops_degenerate_connections() {
    let mut net = seq_net();
    let a = net.create_node([0.0, 0.0]);
    let b = net.create_node([1.0, 1.0]);
    net.add_manual_connection("Good", &[a.clone(), b]).unwrap();
    net.add_manual_connection("Bad", &[a, NodeId::from("gone")]).unwrap();

    let results = ProcessingResult::default();
    let first = net.export_features(&results);
    let second = net.export_features(&results);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(first.len(), 1);
    assert_eq!(first.features[0].property_str("streetKey"), Some("Good"));
}

#[test]
fn export_puts_parser_features_before_manual_connections() {
    let mut net = seq_net();
    let a = net.create_node([0.0, 0.0]);
    let b = net.create_node([1.0, 1.0]);
    let c = net.create_node([2.0, 2.0]);
    let first = net.add_manual_connection("First", &[a.clone(), b.clone()]).unwrap();
    let second = net.add_manual_connection("Second", &[b, c]).unwrap();

    let parsed = Feature::new(Geometry::LineString(vec![[5.0, 5.0], [6.0, 6.0]]))
        .with_property("main_street", "Main Street");
    let results = ProcessingResult::with_features(vec![parsed.clone()]);
    let fc = net.export_features(&results);

    assert_eq!(fc.len(), 3);
    assert_eq!(fc.features[0], parsed);
    assert_eq!(fc.features[1].property_str("id"), Some(first.as_str()));
    assert_eq!(fc.features[2].property_str("id"), Some(second.as_str()));
    // the input collection is untouched
    assert_eq!(results.features.len(), 1);
}

#[test]
fn k_street_end_to_end() {
    let mut net = StreetNetwork::new();
    let a = net.create_node([0.0, 0.0]);
    let b = net.create_node([1.0, 1.0]);
    let c = net.create_node([2.0, 2.0]);
    let conn_id = net.add_manual_connection("K Street NW", &[a, b, c]).unwrap();
    assert_eq!(net.manual_connection(&conn_id).unwrap().edges.len(), 2);

    let fc = net.export_features(&ProcessingResult::with_features(vec![]));
    assert_eq!(fc.len(), 1);
    let feature = &fc.features[0];
    assert_eq!(
        feature.geometry,
        Geometry::LineString(vec![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]])
    );
    assert_eq!(feature.property_str("streetKey"), Some("K Street NW"));
    assert_eq!(feature.property_str("type"), Some(MANUAL_CONNECTION_TYPE));
    assert_eq!(feature.property_str("id"), Some(conn_id.as_str()));
}

#[test]
fn placeholder_batch_reports_every_input_as_failure() {
    let mut net = seq_net();
    let result = net.process_segments(&["Main Street from Cross1 to Cross2"]);
    assert!(result.features.is_empty());
    assert_eq!(result.failures.len(), 1);
    let failure = &result.failures[0];
    assert_eq!(failure.street_key, "Main_Street_from_Cross1_to_Cross2");
    assert_eq!(failure.input, "Main Street from Cross1 to Cross2");
    assert_eq!(failure.error, PLACEHOLDER_ERROR);
}

#[test]
fn failure_json_uses_camel_case_keys() {
    let mut net = seq_net();
    let result = net.process_segments(&["A St"]).clone();
    let json = serde_json::to_value(&result.failures[0]).unwrap();
    assert_eq!(json["streetKey"], "A_St");
    assert_eq!(json["input"], "A St");

    let legacy = serde_json::json!({
        "originalInput": "B St",
        "streetKey": "B_St",
        "error": "nope"
    });
    let parsed: closure_graph::SegmentFailure = serde_json::from_value(legacy).unwrap();
    assert_eq!(parsed.input, "B St");
}
