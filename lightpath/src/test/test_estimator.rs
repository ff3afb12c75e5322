// Lightpath: Resource-Scoped Service Provisioning for OpenROADM Networks
// Copyright (C) 2021  Tibor Schneider
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! Test the signal quality estimation along paths of the three ROADM network.

use crate::estimator::*;
use crate::example_networks::{ExampleNetwork, ThreeRoadmNet};
use crate::model::{optical_links, FiberType, LinkType, OpticalLink, PathHop};
use crate::Error;
use assert_approx_eq::assert_approx_eq;
use std::collections::HashMap;

/// Links with the given spans as `(loss, length)`, named `span-0`, `span-1`, ...
fn links(spans: &[(f64, u64)]) -> HashMap<String, OpticalLink> {
    spans
        .iter()
        .enumerate()
        .map(|(i, (loss, length))| {
            let id = format!("span-{}", i);
            (id.clone(), OpticalLink::span(id, *loss, *length, FiberType::Smf))
        })
        .collect()
}

/// Path over all links `span-0`, `span-1`, ... in this order.
fn path(num_spans: usize) -> Vec<PathHop> {
    (0..num_spans).map(|i| PathHop::link(i as u32, format!("span-{}", i))).collect()
}

fn params(spans: &[(f64, u64)]) -> Vec<SpanParams> {
    spans.iter().map(|(loss, length)| SpanParams::new(*loss, *length, FiberType::Smf)).collect()
}

fn estimate_spans(spans: &[(f64, u64)]) -> QualityReport {
    estimate(&path(spans.len()), &links(spans), Calibration::Current).unwrap()
}

#[test]
fn determinism() {
    let spans = [(17.0, 80000), (18.0, 90000)];
    let first = estimate_spans(&spans);
    let second = estimate_spans(&spans);
    assert_eq!(first, second);
    assert_approx_eq!(first.osnr_db, 25.5, 1e-9);
    assert_approx_eq!(first.gsnr_db, 23.7, 1e-9);
}

#[test]
fn empty_path() {
    let report = estimate(&[], &HashMap::new(), Calibration::Current).unwrap();
    assert!(report.osnr_db.is_finite() && report.gsnr_db.is_finite());
    assert_approx_eq!(report.osnr_db, 29.2, 1e-9);
    assert_approx_eq!(report.gsnr_db, 29.2, 1e-9);

    // path within a single ROADM
    let mut links = HashMap::new();
    links.insert(
        "add".to_string(),
        OpticalLink {
            link_id: "add".to_string(),
            link_type: LinkType::AddDrop,
            span_loss_db: None,
            length_m: None,
            fiber_type: FiberType::Smf,
        },
    );
    let path = vec![PathHop::node(0, "ROADM-A1-SRG1"), PathHop::link(1, "add")];
    assert_eq!(estimate(&path, &links, Calibration::Current).unwrap(), report);
}

#[test]
fn rounded_to_one_decimal() {
    let report = estimate_spans(&[(21.3, 97000)]);
    assert_approx_eq!(report.osnr_db * 10.0, (report.osnr_db * 10.0).round(), 1e-9);
    assert_approx_eq!(report.gsnr_db * 10.0, (report.gsnr_db * 10.0).round(), 1e-9);
    assert!(report.gsnr_db <= report.osnr_db);
}

#[test]
fn more_loss_never_improves_osnr() {
    for calibration in [Calibration::Current, Calibration::Legacy].iter() {
        let mut previous = f64::INFINITY;
        for i in 0..80 {
            let loss = 1.5 + 0.5 * i as f64;
            let report = estimate(&path(1), &links(&[(loss, 80000)]), *calibration).unwrap();
            assert!(
                report.osnr_db <= previous + 1e-9,
                "OSNR increased from {} to {} at {} dB",
                previous,
                report.osnr_db,
                loss
            );
            previous = report.osnr_db;
        }
    }
}

#[test]
fn swapped_spans() {
    // within the gain range, every amplifier sees the same input power in both orders
    let spans = [(17.0, 80000), (18.0, 90000)];
    let swapped = [(18.0, 90000), (17.0, 80000)];
    let forward = simulate(&params(&spans), Calibration::Current);
    let backward = simulate(&params(&swapped), Calibration::Current);
    assert_approx_eq!(forward.osnr_db, backward.osnr_db, 1e-9);
    assert_approx_eq!(forward.gsnr_db, backward.gsnr_db, 1e-9);
    assert_eq!(estimate_spans(&spans), estimate_spans(&swapped));

    let spans = [(17.0, 80000), (34.0, 170000)];
    let swapped = [(34.0, 170000), (17.0, 80000)];

    // the amplifier after the 34 dB span would need more gain than it can provide
    let forward = simulate(&params(&spans), Calibration::Current);
    let backward = simulate(&params(&swapped), Calibration::Current);
    assert!((forward.osnr_db - backward.osnr_db).abs() > 0.1);
    assert_ne!(estimate_spans(&spans), estimate_spans(&swapped));
}

#[test]
fn hops_are_sorted() {
    let spans = [(17.0, 80000), (34.0, 170000)];
    let mut hops = path(2);
    hops.reverse();
    assert_eq!(
        estimate(&hops, &links(&spans), Calibration::Current).unwrap(),
        estimate_spans(&spans)
    );
}

#[test]
fn calibrations() {
    let spans = [(17.0, 80000)];
    let current = estimate_spans(&spans);
    let legacy = estimate(&path(1), &links(&spans), Calibration::Legacy).unwrap();
    assert_approx_eq!(current.osnr_db, 27.1, 1e-9);
    assert_approx_eq!(current.gsnr_db, 25.8, 1e-9);
    assert_approx_eq!(legacy.osnr_db, 26.4, 1e-9);
    assert_approx_eq!(legacy.gsnr_db, 26.0, 1e-9);
    assert_eq!("legacy".parse::<Calibration>(), Ok(Calibration::Legacy));
    assert!("newest".parse::<Calibration>().is_err());
}

#[test]
fn fiber_types() {
    let mut ull = links(&[(17.0, 80000)]);
    ull.get_mut("span-0").unwrap().fiber_type = FiberType::Ull;
    let ull = estimate(&path(1), &ull, Calibration::Current).unwrap();
    let smf = estimate_spans(&[(17.0, 80000)]);
    // the fiber type only changes the nonlinear interference
    assert_eq!(ull.osnr_db, smf.osnr_db);
    assert!(ull.gsnr_db > smf.gsnr_db);
}

#[test]
fn invalid_paths() {
    // unknown link
    let result = estimate(&path(2), &links(&[(17.0, 80000)]), Calibration::Current);
    assert!(matches!(result, Err(Error::InvalidPathError(_))));

    // missing span attributes
    let mut l = links(&[(17.0, 80000)]);
    l.get_mut("span-0").unwrap().span_loss_db = None;
    let result = estimate(&path(1), &l, Calibration::Current);
    assert!(matches!(result, Err(Error::InvalidPathError(_))));

    let mut l = links(&[(17.0, 80000)]);
    l.get_mut("span-0").unwrap().length_m = None;
    let result = estimate(&path(1), &l, Calibration::Current);
    assert!(matches!(result, Err(Error::InvalidPathError(_))));

    // zero length
    let result = estimate(&path(1), &links(&[(17.0, 0)]), Calibration::Current);
    assert!(matches!(result, Err(Error::InvalidPathError(_))));

    // not more loss than the connectors
    let result = estimate(&path(1), &links(&[(1.0, 80000)]), Calibration::Current);
    assert!(matches!(result, Err(Error::InvalidPathError(_))));
}

#[test]
fn three_roadm_net() {
    let links = optical_links(&ThreeRoadmNet::topology());
    let a_to_c = ThreeRoadmNet::span_id("ROADM-A1", 2, "ROADM-C1", 1);
    let a_to_b = ThreeRoadmNet::span_id("ROADM-A1", 1, "ROADM-B1", 1);
    let b_to_c = ThreeRoadmNet::span_id("ROADM-B1", 2, "ROADM-C1", 2);
    let express = "ROADM-B1-DEG1-CTP-TXRXtoROADM-B1-DEG2-CTP-TXRX";
    assert_eq!(links[express].link_type, LinkType::Express);

    let direct = vec![
        PathHop::node(0, "ROADM-A1"),
        PathHop::link(1, a_to_c),
        PathHop::node(2, "ROADM-C1"),
    ];
    let detour = vec![
        PathHop::link(1, a_to_b),
        PathHop::node(2, "ROADM-B1"),
        PathHop::link(3, express),
        PathHop::link(4, b_to_c),
    ];
    let direct = estimate(&direct, &links, Calibration::Current).unwrap();
    let detour = estimate(&detour, &links, Calibration::Current).unwrap();
    assert_eq!(direct, estimate_spans(&[(17.0, 80000)]));
    assert!(detour.osnr_db < direct.osnr_db);
    assert!(detour.gsnr_db < direct.gsnr_db);
}
