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

//! Three ROADMs connected in a triangle

use super::ExampleNetwork;
use maplit::btreemap;
use tpce::*;

/// # Three ROADM Network
///
/// Three ROADMs with two degrees each, connected in a triangle. The span losses are given in dB
/// for both directions in the figure below. `ROADM-A1` has the SRGs `SRG1` and `SRG3`, the other
/// ROADMs only `SRG1`. Each SRG has four add/drop ports `SRGx-PPy-TXRX` and all 40 channels
/// available. The transponders `XPDR-A1` and `XPDR-C1` are not yet linked to the ROADMs.
///
/// ```text
///            ROADM-B1
///      19/20 .'    '. 21/22
///          .'        '.
/// ROADM-A1 ------------ ROADM-C1
///            17/18
/// ```
pub struct ThreeRoadmNet;

/// Spans as `(roadm, degree, roadm, degree, loss, length)`
const SPANS: [(&str, u32, &str, u32, f64, u64); 6] = [
    ("ROADM-A1", 2, "ROADM-C1", 1, 17.0, 80000),
    ("ROADM-C1", 1, "ROADM-A1", 2, 18.0, 80000),
    ("ROADM-A1", 1, "ROADM-B1", 1, 19.0, 90000),
    ("ROADM-B1", 1, "ROADM-A1", 1, 20.0, 90000),
    ("ROADM-B1", 2, "ROADM-C1", 2, 21.0, 100000),
    ("ROADM-C1", 2, "ROADM-B1", 2, 22.0, 100000),
];

impl ExampleNetwork for ThreeRoadmNet {
    fn topology() -> Topology {
        let roadms = btreemap! {
            "ROADM-A1" => vec![1, 3],
            "ROADM-B1" => vec![1],
            "ROADM-C1" => vec![1],
        };

        let mut nodes = Vec::new();
        let mut links = Vec::new();
        for (roadm, srgs) in roadms.iter() {
            for deg in 1..=2 {
                nodes.push(degree(roadm, deg));
            }
            for srg_num in srgs.iter() {
                nodes.push(srg(roadm, *srg_num, 4));
                for deg in 1..=2 {
                    let srg_id = format!("{}-SRG{}", roadm, srg_num);
                    let deg_id = format!("{}-DEG{}", roadm, deg);
                    links.push(link(&srg_id, "CP-TXRX", &deg_id, "CTP-TXRX", "ADD-LINK"));
                    links.push(link(&deg_id, "CTP-TXRX", &srg_id, "CP-TXRX", "DROP-LINK"));
                }
            }
            let deg_1 = format!("{}-DEG1", roadm);
            let deg_2 = format!("{}-DEG2", roadm);
            links.push(link(&deg_1, "CTP-TXRX", &deg_2, "CTP-TXRX", "EXPRESS-LINK"));
            links.push(link(&deg_2, "CTP-TXRX", &deg_1, "CTP-TXRX", "EXPRESS-LINK"));
        }
        nodes.push(xponder("XPDR-A1"));
        nodes.push(xponder("XPDR-C1"));

        for (src, src_deg, dst, dst_deg, loss, length) in SPANS.iter() {
            let src_id = format!("{}-DEG{}", src, src_deg);
            let dst_id = format!("{}-DEG{}", dst, dst_deg);
            let src_tp = format!("DEG{}-TTP-TXRX", src_deg);
            let dst_tp = format!("DEG{}-TTP-TXRX", dst_deg);
            let mut l = link(&src_id, &src_tp, &dst_id, &dst_tp, "ROADM-TO-ROADM");
            l.oms_attributes = Some(OmsAttributes {
                span: Some(Span {
                    spanloss_current: Some(*loss),
                    link_concatenation: vec![LinkConcatenation {
                        srlg_id: 0,
                        fiber_type: Some("smf".to_string()),
                        srlg_length: Some(*length),
                    }],
                }),
            });
            links.push(l);
        }

        Topology { id: "openroadm-topology".to_string(), nodes, links }
    }
}

impl ThreeRoadmNet {
    /// ID of the ROADM-to-ROADM link from the degree of one ROADM to the degree of another one.
    pub fn span_id(src: &str, src_deg: u32, dst: &str, dst_deg: u32) -> String {
        format!(
            "{}-DEG{}-DEG{}-TTP-TXRXto{}-DEG{}-DEG{}-TTP-TXRX",
            src, src_deg, src_deg, dst, dst_deg, dst_deg
        )
    }
}

fn supporting(roadm: &str) -> Vec<SupportingNode> {
    vec![SupportingNode {
        network_ref: "openroadm-network".to_string(),
        node_ref: roadm.to_string(),
    }]
}

fn degree(roadm: &str, deg: u32) -> TopologyNode {
    TopologyNode {
        id: format!("{}-DEG{}", roadm, deg),
        node_type: NODE_TYPE_DEGREE.to_string(),
        supporting_nodes: supporting(roadm),
        degree_attributes: Some(WavelengthAttributes::from_indices(1..=40)),
        ..Default::default()
    }
}

fn srg(roadm: &str, srg_num: u32, num_pps: u32) -> TopologyNode {
    TopologyNode {
        id: format!("{}-SRG{}", roadm, srg_num),
        node_type: NODE_TYPE_SRG.to_string(),
        supporting_nodes: supporting(roadm),
        srg_attributes: Some(WavelengthAttributes::from_indices(1..=40)),
        termination_points: (1..=num_pps)
            .map(|pp| TerminationPoint {
                id: format!("SRG{}-PP{}-TXRX", srg_num, pp),
                tp_type: Some(TP_TYPE_SRG_PP.to_string()),
                pp_attributes: None,
            })
            .collect(),
        ..Default::default()
    }
}

fn xponder(xpdr: &str) -> TopologyNode {
    TopologyNode {
        id: format!("{}-XPDR1", xpdr),
        node_type: NODE_TYPE_XPONDER.to_string(),
        supporting_nodes: supporting(xpdr),
        termination_points: vec![TerminationPoint {
            id: "XPDR1-NETWORK1".to_string(),
            tp_type: Some(TP_TYPE_XPONDER_NETWORK.to_string()),
            pp_attributes: None,
        }],
        ..Default::default()
    }
}

fn link(src: &str, src_tp: &str, dst: &str, dst_tp: &str, link_type: &str) -> TopologyLink {
    TopologyLink {
        id: format!("{}-{}to{}-{}", src, src_tp, dst, dst_tp),
        source: LinkSource { node: src.to_string(), tp: src_tp.to_string() },
        destination: LinkDestination { node: dst.to_string(), tp: dst_tp.to_string() },
        link_type: Some(link_type.to_string()),
        oms_attributes: None,
    }
}
