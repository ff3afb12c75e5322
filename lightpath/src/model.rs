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

//! # Data Model
//!
//! Resource groups (SRGs), add/drop ports, endpoints of a service, and the optical links and path
//! hops consumed by the [estimator](crate::estimator). All types are plain values; the state they
//! describe is owned by the controller.

use crate::{Error, Result};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use tpce::{AToZ, PathDescription, TerminationPoint, Topology, TopologyLink};

/// Shared resource group (SRG) with the set of wavelengths that are still available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGroup {
    /// Node ID of the SRG, e.g., `ROADM-A1-SRG1`
    pub group_id: String,
    /// Available channel indices, in ascending order
    pub available_wavelengths: BTreeSet<u32>,
}

/// Usage state of an add/drop port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortState {
    /// ID of the termination point, e.g., `SRG1-PP3-TXRX`
    pub port_id: String,
    /// Whether the port carries a channel.
    pub in_use: bool,
}

impl From<&TerminationPoint> for PortState {
    fn from(tp: &TerminationPoint) -> Self {
        Self { port_id: tp.id.clone(), in_use: tp.is_used() }
    }
}

/// Add/drop port of a ROADM
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SrgPort {
    /// Node ID of the ROADM, e.g., `ROADM-A1`
    pub roadm_node_id: String,
    /// Logical connection point of the port, e.g., `SRG1-PP3-TXRX`
    pub logical_connection_point: String,
}

impl SrgPort {
    /// Create a new SRG port
    pub fn new(roadm_node_id: impl Into<String>, lcp: impl Into<String>) -> Self {
        Self { roadm_node_id: roadm_node_id.into(), logical_connection_point: lcp.into() }
    }

    /// Returns the ID of the SRG this port belongs to, e.g., `ROADM-A1-SRG1` for the port
    /// `SRG1-PP3-TXRX` on `ROADM-A1`.
    pub fn group_id(&self) -> String {
        let srg = self.logical_connection_point.split('-').next().unwrap_or_default();
        format!("{}-{}", self.roadm_node_id, srg)
    }
}

impl fmt::Display for SrgPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.roadm_node_id, self.logical_connection_point)
    }
}

/// Network port of a transponder
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct XponderPort {
    /// Node ID of the transponder, e.g., `XPDR-A1`
    pub xpdr_node_id: String,
    /// Logical connection point of the network port, e.g., `XPDR1-NETWORK1`
    pub logical_connection_point: String,
}

impl XponderPort {
    /// Create a new transponder port
    pub fn new(xpdr_node_id: impl Into<String>, lcp: impl Into<String>) -> Self {
        Self { xpdr_node_id: xpdr_node_id.into(), logical_connection_point: lcp.into() }
    }
}

impl fmt::Display for XponderPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.xpdr_node_id, self.logical_connection_point)
    }
}

/// End of a service, either directly at an add/drop port of a ROADM, or at a transponder which is
/// attached to an add/drop port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endpoint {
    /// Add/drop port of a ROADM
    Roadm(SrgPort),
    /// Transponder network port, connected to the add/drop port.
    Xponder {
        /// Transponder network port
        xpdr: XponderPort,
        /// Add/drop port the transponder is connected to
        srg: SrgPort,
    },
}

impl Endpoint {
    /// Returns the add/drop port of the endpoint.
    pub fn srg(&self) -> &SrgPort {
        match self {
            Self::Roadm(srg) => srg,
            Self::Xponder { srg, .. } => srg,
        }
    }

    /// Returns the node ID used as service end: the transponder if present, and the ROADM
    /// otherwise.
    pub fn node_id(&self) -> &str {
        match self {
            Self::Roadm(srg) => &srg.roadm_node_id,
            Self::Xponder { xpdr, .. } => &xpdr.xpdr_node_id,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Roadm(srg) => write!(f, "{}", srg),
            Self::Xponder { xpdr, srg } => write!(f, "{}_{}", xpdr, srg),
        }
    }
}

/// Non-empty set of channel indices to which a service should be limited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WavelengthHint(BTreeSet<u32>);

impl WavelengthHint {
    /// Create a hint from a set of channels. Returns `None` if the set is empty.
    pub fn new(channels: impl IntoIterator<Item = u32>) -> Option<Self> {
        let channels: BTreeSet<u32> = channels.into_iter().collect();
        if channels.is_empty() {
            None
        } else {
            Some(Self(channels))
        }
    }

    /// Returns the channel, if the hint contains exactly one.
    pub fn single(&self) -> Option<u32> {
        if self.0.len() == 1 {
            self.0.iter().next().copied()
        } else {
            None
        }
    }

    /// Returns all channels of the hint
    pub fn channels(&self) -> &BTreeSet<u32> {
        &self.0
    }

    /// Returns the channels which are both in the hint and in `available`.
    pub fn narrow(&self, available: &BTreeSet<u32>) -> BTreeSet<u32> {
        self.0.intersection(available).copied().collect()
    }
}

impl From<u32> for WavelengthHint {
    fn from(channel: u32) -> Self {
        Self(maplit::btreeset! {channel})
    }
}

/// Type of a link in the OpenROADM topology
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkType {
    /// `ROADM-TO-ROADM`: fiber span between two degrees
    RoadmToRoadm,
    /// `EXPRESS-LINK`: between two degrees of the same ROADM
    Express,
    /// `ADD-LINK` or `DROP-LINK`: between an SRG and a degree
    AddDrop,
    /// `XPONDER-INPUT` or `XPONDER-OUTPUT`: between a transponder and an SRG
    XponderFacing,
    /// Any other link type
    Other(String),
}

impl From<&str> for LinkType {
    fn from(s: &str) -> Self {
        match s {
            "ROADM-TO-ROADM" => Self::RoadmToRoadm,
            "EXPRESS-LINK" => Self::Express,
            "ADD-LINK" | "DROP-LINK" => Self::AddDrop,
            "XPONDER-INPUT" | "XPONDER-OUTPUT" => Self::XponderFacing,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Fiber type of a span, determining the chromatic dispersion and the nonlinear coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FiberType {
    /// Standard single mode fiber (G.652)
    Smf,
    /// Non-zero dispersion shifted fiber
    NzDsf,
    /// Enhanced effective area fiber
    Eleaf,
    /// Optimized large effective area fiber
    Oleaf,
    /// TrueWave fiber
    Truewave,
    /// TrueWave classic fiber
    Truewavec,
    /// Ultra low loss fiber
    Ull,
}

impl Default for FiberType {
    fn default() -> Self {
        Self::Smf
    }
}

impl FiberType {
    /// Parse the name used in the OMS attributes. Unknown names are treated as `smf`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "nz-dsf" => Self::NzDsf,
            "eleaf" => Self::Eleaf,
            "oleaf" => Self::Oleaf,
            "truewave" => Self::Truewave,
            "truewavec" => Self::Truewavec,
            "ull" => Self::Ull,
            _ => Self::Smf,
        }
    }

    /// Name of the fiber type in the OMS attributes
    pub fn name(&self) -> &'static str {
        match self {
            Self::Smf => "smf",
            Self::NzDsf => "nz-dsf",
            Self::Eleaf => "eleaf",
            Self::Oleaf => "oleaf",
            Self::Truewave => "truewave",
            Self::Truewavec => "truewavec",
            Self::Ull => "ull",
        }
    }

    /// Chromatic dispersion in s/m^2
    pub fn dispersion(&self) -> f64 {
        match self {
            Self::Smf => 16.7e-6,
            Self::NzDsf => 5e-6,
            Self::Eleaf | Self::Oleaf => 4e-6,
            Self::Truewave => 4.3e-6,
            Self::Truewavec => 7.2e-6,
            Self::Ull => 18e-6,
        }
    }

    /// Nonlinear coefficient in 1/(W m)
    pub fn gamma(&self) -> f64 {
        match self {
            Self::Smf => 1.27e-3,
            Self::NzDsf => 1.46e-3,
            Self::Eleaf | Self::Oleaf => 1.41e-3,
            Self::Truewave => 1.95e-3,
            Self::Truewavec => 1.84e-3,
            Self::Ull => 0.81e-3,
        }
    }
}

impl fmt::Display for FiberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Link of the topology with its physical parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpticalLink {
    /// ID of the link
    pub link_id: String,
    /// Type of the link
    pub link_type: LinkType,
    /// Current (measured) span loss in dB
    pub span_loss_db: Option<f64>,
    /// Length of the fiber in meters
    pub length_m: Option<u64>,
    /// Type of the fiber
    pub fiber_type: FiberType,
}

impl OpticalLink {
    /// Create a ROADM-to-ROADM link
    pub fn span(
        link_id: impl Into<String>,
        loss_db: f64,
        length_m: u64,
        fiber_type: FiberType,
    ) -> Self {
        Self {
            link_id: link_id.into(),
            link_type: LinkType::RoadmToRoadm,
            span_loss_db: Some(loss_db),
            length_m: Some(length_m),
            fiber_type,
        }
    }
}

impl From<&TopologyLink> for OpticalLink {
    fn from(link: &TopologyLink) -> Self {
        let span = link.span();
        let concatenation = span.and_then(|s| s.link_concatenation.first());
        Self {
            link_id: link.id.clone(),
            link_type: link
                .link_type
                .as_deref()
                .map(LinkType::from)
                .unwrap_or_else(|| LinkType::Other(String::new())),
            span_loss_db: span.and_then(|s| s.spanloss_current),
            length_m: concatenation.and_then(|c| c.srlg_length),
            fiber_type: concatenation
                .and_then(|c| c.fiber_type.as_deref())
                .map(FiberType::from_name)
                .unwrap_or_default(),
        }
    }
}

/// Extract all links of the topology, indexed by their ID.
pub fn optical_links(topology: &Topology) -> HashMap<String, OpticalLink> {
    topology.links.iter().map(|l| (l.id.clone(), OpticalLink::from(l))).collect()
}

/// One hop of a service path (an element of the `aToZ` list).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathHop {
    /// Sequence number of the hop
    pub id: u32,
    /// Link traversed by this hop
    pub link_id: Option<String>,
    /// Node traversed by this hop
    pub node_id: Option<String>,
    /// Termination point traversed by this hop
    pub tp_id: Option<String>,
}

impl PathHop {
    /// Create a hop which traverses a link
    pub fn link(id: u32, link_id: impl Into<String>) -> Self {
        Self { id, link_id: Some(link_id.into()), node_id: None, tp_id: None }
    }

    /// Create a hop which traverses a node
    pub fn node(id: u32, node_id: impl Into<String>) -> Self {
        Self { id, link_id: None, node_id: Some(node_id.into()), tp_id: None }
    }

    /// Parse an `aToZ` element. The ID must be a number.
    pub fn from_atoz(hop: &AToZ) -> Result<Self> {
        let id = hop
            .id
            .trim()
            .parse()
            .map_err(|_| Error::InvalidPathError(format!("hop id {:?} is not a number", hop.id)))?;
        Ok(Self {
            id,
            link_id: hop.resource.link_id.clone(),
            node_id: hop.resource.node_id.clone(),
            tp_id: hop.resource.tp_id.clone(),
        })
    }
}

/// Extract all hops of a path description in the A to Z direction.
pub fn path_hops(description: &PathDescription) -> Result<Vec<PathHop>> {
    description.a_to_z.hops.iter().map(PathHop::from_atoz).collect()
}
