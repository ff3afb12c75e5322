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

//! # TransportPCE Types
//!
//! Subset of the OpenROADM / TransportPCE data model, as returned by the RESTCONF interface. Only
//! the fields required for provisioning and for the signal quality estimation are parsed, all
//! other fields are ignored while deserializing.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Node type of an SRG node in the OpenROADM topology
pub const NODE_TYPE_SRG: &str = "SRG";
/// Node type of a degree node in the OpenROADM topology
pub const NODE_TYPE_DEGREE: &str = "DEGREE";
/// Node type of a transponder node in the OpenROADM topology
pub const NODE_TYPE_XPONDER: &str = "XPONDER";
/// Termination point type of an add/drop port on an SRG
pub const TP_TYPE_SRG_PP: &str = "SRG-TXRX-PP";
/// Termination point type of a transponder network port
pub const TP_TYPE_XPONDER_NETWORK: &str = "XPONDER-NETWORK";

/// OpenROADM topology (`openroadm-topology`)
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Topology {
    /// ID of the network
    #[serde(rename = "network-id", default)]
    pub id: String,
    /// All nodes in the topology
    #[serde(rename = "node", default)]
    pub nodes: Vec<TopologyNode>,
    /// All links in the topology
    #[serde(rename = "ietf-network-topology:link", default)]
    pub links: Vec<TopologyLink>,
}

impl Topology {
    /// Returns the node with the given ID
    pub fn node(&self, node_id: impl AsRef<str>) -> Option<&TopologyNode> {
        self.nodes.iter().find(|n| n.id == node_id.as_ref())
    }

    /// Returns the mutable reference to the node with the given ID
    pub fn node_mut(&mut self, node_id: impl AsRef<str>) -> Option<&mut TopologyNode> {
        self.nodes.iter_mut().find(|n| n.id == node_id.as_ref())
    }

    /// Returns the link with the given ID
    pub fn link(&self, link_id: impl AsRef<str>) -> Option<&TopologyLink> {
        self.links.iter().find(|l| l.id == link_id.as_ref())
    }
}

/// Node of the OpenROADM topology
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct TopologyNode {
    /// ID of the node, e.g., `ROADM-A1-SRG1`
    #[serde(rename = "node-id")]
    pub id: String,
    /// Type of the node (`SRG`, `DEGREE`, `XPONDER`, ...)
    #[serde(rename = "org-openroadm-common-network:node-type", default)]
    pub node_type: String,
    /// Supporting nodes. The first one references the physical device.
    #[serde(rename = "supporting-node", default)]
    pub supporting_nodes: Vec<SupportingNode>,
    /// SRG attributes (only for SRG nodes)
    #[serde(
        rename = "org-openroadm-network-topology:srg-attributes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub srg_attributes: Option<WavelengthAttributes>,
    /// Degree attributes (only for degree nodes)
    #[serde(
        rename = "org-openroadm-network-topology:degree-attributes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub degree_attributes: Option<WavelengthAttributes>,
    /// Termination points of the node
    #[serde(rename = "ietf-network-topology:termination-point", default)]
    pub termination_points: Vec<TerminationPoint>,
}

impl TopologyNode {
    /// Returns true if the node is a shared resource group
    pub fn is_srg(&self) -> bool {
        self.node_type == NODE_TYPE_SRG
    }

    /// Returns the ID of the physical device supporting this node, e.g., `ROADM-A1`.
    pub fn device_id(&self) -> Option<&str> {
        self.supporting_nodes.first().map(|s| s.node_ref.as_str())
    }
}

/// Reference to the supporting node
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct SupportingNode {
    /// Network in which the supporting node lives
    #[serde(rename = "network-ref", default)]
    pub network_ref: String,
    /// ID of the supporting node
    #[serde(rename = "node-ref")]
    pub node_ref: String,
}

/// Wavelength attributes of SRGs and degrees
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct WavelengthAttributes {
    /// All wavelengths that are still available
    #[serde(rename = "available-wavelengths", default)]
    pub available_wavelengths: Vec<WavelengthIndex>,
}

impl WavelengthAttributes {
    /// Create the attributes from a sequence of channel indices.
    pub fn from_indices(indices: impl IntoIterator<Item = u32>) -> Self {
        Self {
            available_wavelengths: indices
                .into_iter()
                .map(|index| WavelengthIndex { index })
                .collect(),
        }
    }

    /// Returns the channel indices
    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.available_wavelengths.iter().map(|w| w.index)
    }
}

/// Wavelength channel index
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct WavelengthIndex {
    /// Channel index
    #[serde(deserialize_with = "lenient_u32")]
    pub index: u32,
}

/// Termination point of a node
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct TerminationPoint {
    /// ID of the termination point, e.g., `SRG1-PP1-TXRX`
    #[serde(rename = "tp-id")]
    pub id: String,
    /// Type of the termination point
    #[serde(
        rename = "org-openroadm-common-network:tp-type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub tp_type: Option<String>,
    /// Attributes of an SRG add/drop port
    #[serde(
        rename = "org-openroadm-network-topology:pp-attributes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub pp_attributes: Option<PpAttributes>,
}

impl TerminationPoint {
    /// Returns true if the termination point is an add/drop port of an SRG
    pub fn is_srg_pp(&self) -> bool {
        self.tp_type.as_deref() == Some(TP_TYPE_SRG_PP)
    }

    /// Returns true if a wavelength is used on this port.
    pub fn is_used(&self) -> bool {
        self.pp_attributes
            .as_ref()
            .and_then(|pp| pp.used_wavelength.as_ref())
            .map(|used| !used.is_empty())
            .unwrap_or(false)
    }
}

/// Attributes of an add/drop port
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct PpAttributes {
    /// Wavelengths used on this port
    #[serde(rename = "used-wavelength", default, skip_serializing_if = "Option::is_none")]
    pub used_wavelength: Option<Vec<UsedWavelength>>,
}

/// Wavelength which is in use on a port
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct UsedWavelength {
    /// Channel index
    #[serde(deserialize_with = "lenient_u32")]
    pub index: u32,
    /// Center frequency in THz
    #[serde(deserialize_with = "lenient_f64")]
    pub frequency: f64,
    /// Width in GHz
    #[serde(deserialize_with = "lenient_f64")]
    pub width: f64,
}

impl UsedWavelength {
    /// Placeholder wavelength, used to block a port.
    pub fn placeholder() -> Self {
        Self { index: 1, frequency: 196.0, width: 92.0 }
    }
}

/// Link in the OpenROADM topology
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct TopologyLink {
    /// ID of the link
    #[serde(rename = "link-id")]
    pub id: String,
    /// Source of the link
    #[serde(default)]
    pub source: LinkSource,
    /// Destination of the link
    #[serde(default)]
    pub destination: LinkDestination,
    /// Type of the link, e.g., `ROADM-TO-ROADM`
    #[serde(
        rename = "org-openroadm-common-network:link-type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub link_type: Option<String>,
    /// OMS attributes, only present on ROADM-to-ROADM links
    #[serde(
        rename = "org-openroadm-network-topology:OMS-attributes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub oms_attributes: Option<OmsAttributes>,
}

impl TopologyLink {
    /// Returns the span information of the link, if present.
    pub fn span(&self) -> Option<&Span> {
        self.oms_attributes.as_ref().and_then(|oms| oms.span.as_ref())
    }
}

/// Source of a topology link
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct LinkSource {
    /// Source node
    #[serde(rename = "source-node", default)]
    pub node: String,
    /// Source termination point
    #[serde(rename = "source-tp", default)]
    pub tp: String,
}

/// Destination of a topology link
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct LinkDestination {
    /// Destination node
    #[serde(rename = "dest-node", default)]
    pub node: String,
    /// Destination termination point
    #[serde(rename = "dest-tp", default)]
    pub tp: String,
}

/// OMS attributes of a link
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct OmsAttributes {
    /// Span information
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

/// Measured span of a ROADM-to-ROADM link
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Span {
    /// Currently measured span loss in dB
    #[serde(
        rename = "spanloss-current",
        default,
        deserialize_with = "lenient_opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub spanloss_current: Option<f64>,
    /// Fiber segments of the span
    #[serde(rename = "link-concatenation", default)]
    pub link_concatenation: Vec<LinkConcatenation>,
}

/// Fiber segment of a span
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct LinkConcatenation {
    /// Shared risk link group
    #[serde(rename = "SRLG-Id", default, deserialize_with = "lenient_u32")]
    pub srlg_id: u32,
    /// Fiber type, e.g., `smf`
    #[serde(rename = "fiber-type", default, skip_serializing_if = "Option::is_none")]
    pub fiber_type: Option<String>,
    /// Length in meters
    #[serde(
        rename = "SRLG-length",
        default,
        deserialize_with = "lenient_opt_u64",
        skip_serializing_if = "Option::is_none"
    )]
    pub srlg_length: Option<u64>,
}

/// Service path, stored by the renderer
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct ServicePath {
    /// Name of the service path
    #[serde(rename = "service-path-name")]
    pub name: String,
    /// Path description
    #[serde(rename = "path-description", default)]
    pub path_description: PathDescription,
}

/// Path description (A to Z direction only)
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct PathDescription {
    /// A to Z direction
    #[serde(rename = "aToZ-direction", default)]
    pub a_to_z: AToZDirection,
}

/// A to Z direction of a path
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct AToZDirection {
    /// Wavelength channel assigned to the path
    #[serde(
        rename = "aToZ-wavelength-number",
        default,
        deserialize_with = "lenient_opt_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub wavelength_number: Option<u32>,
    /// All hops on the path
    #[serde(rename = "aToZ", default)]
    pub hops: Vec<AToZ>,
}

/// Single hop of a path
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct AToZ {
    /// Sequence number of the hop (stored as string by the controller)
    pub id: String,
    /// Resource referenced by the hop
    #[serde(default)]
    pub resource: PathResource,
}

/// Resource referenced by a path hop. Exactly one of the fields is usually set.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct PathResource {
    /// Termination point
    #[serde(rename = "tp-id", default, skip_serializing_if = "Option::is_none")]
    pub tp_id: Option<String>,
    /// Node of the termination point
    #[serde(rename = "tp-node-id", default, skip_serializing_if = "Option::is_none")]
    pub tp_node_id: Option<String>,
    /// Link
    #[serde(rename = "link-id", default, skip_serializing_if = "Option::is_none")]
    pub link_id: Option<String>,
    /// Node
    #[serde(rename = "node-id", default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
}

/// Request for a service, used both for `service-create` and `path-computation-request`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRequest {
    /// Name of the service
    pub service_name: String,
    /// Node ID of the A end
    pub a_end: String,
    /// Node ID of the Z end
    pub z_end: String,
    /// Request ID of the SDNC request header
    pub request_id: String,
    /// Common ID of the service
    pub common_id: String,
}

impl ServiceRequest {
    /// Create a new request with the default request ID and common ID.
    pub fn new(
        service_name: impl Into<String>,
        a_end: impl Into<String>,
        z_end: impl Into<String>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            a_end: a_end.into(),
            z_end: z_end.into(),
            request_id: String::from("default_rid"),
            common_id: String::from("default_cid"),
        }
    }
}

/// Response of a RESTCONF RPC (`{"output": {...}}`)
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct RpcResponse {
    /// Output of the RPC
    #[serde(default)]
    pub output: RpcOutput,
}

/// Output of an RPC
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct RpcOutput {
    /// Common response of the service handler and the PCE
    #[serde(
        rename = "configuration-response-common",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub response_common: Option<ResponseCommon>,
    /// Plain result string of simpler RPCs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Response parameters (path description of the PCE)
    #[serde(rename = "response-parameters", default, skip_serializing_if = "Option::is_none")]
    pub response_parameters: Option<ResponseParameters>,
}

impl RpcOutput {
    /// Returns the status message of the response. The `response-message` has precedence over the
    /// plain `result`.
    pub fn message(&self) -> Option<&str> {
        self.response_common
            .as_ref()
            .and_then(|c| c.response_message.as_deref())
            .or_else(|| self.result.as_deref())
    }

    /// Returns the response code, if present.
    pub fn response_code(&self) -> Option<&str> {
        self.response_common.as_ref().and_then(|c| c.response_code.as_deref())
    }

    /// Returns the path description of the response, if present.
    pub fn path_description(&self) -> Option<&PathDescription> {
        self.response_parameters.as_ref().and_then(|p| p.path_description.as_ref())
    }
}

/// `configuration-response-common` container
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct ResponseCommon {
    /// Response code, e.g. `200`
    #[serde(
        rename = "response-code",
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub response_code: Option<String>,
    /// Response message, e.g. `Path is calculated`
    #[serde(rename = "response-message", default, skip_serializing_if = "Option::is_none")]
    pub response_message: Option<String>,
    /// Final indicator
    #[serde(rename = "ack-final-indicator", default, skip_serializing_if = "Option::is_none")]
    pub ack_final_indicator: Option<String>,
    /// Request ID
    #[serde(rename = "request-id", default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// `response-parameters` container
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct ResponseParameters {
    /// Computed path
    #[serde(rename = "path-description", default, skip_serializing_if = "Option::is_none")]
    pub path_description: Option<PathDescription>,
}

/// Span loss measured by the OLM
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct MeasuredSpan {
    /// Link on which the span loss was measured
    #[serde(rename = "link-id")]
    pub link_id: String,
    /// Measured span loss in dB
    #[serde(deserialize_with = "lenient_f64")]
    pub spanloss: f64,
}

/// Node of the port mapping
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct PortMappingNode {
    /// ID of the device
    #[serde(rename = "node-id")]
    pub node_id: String,
    /// All port mappings of the device
    #[serde(default)]
    pub mapping: Vec<PortMapping>,
}

/// Mapping from a logical connection point to a physical port
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct PortMapping {
    /// Logical connection point, e.g., `SRG1-PP1-TXRX`
    #[serde(rename = "logical-connection-point")]
    pub logical_connection_point: String,
    /// Circuit pack of the port
    #[serde(rename = "supporting-circuit-pack-name", default)]
    pub circuit_pack_name: String,
    /// Name of the port
    #[serde(rename = "supporting-port", default)]
    pub port: String,
    /// Direction of the port
    #[serde(rename = "port-direction", default, skip_serializing_if = "Option::is_none")]
    pub port_direction: Option<String>,
}

// The controller is inconsistent about numbers: some leafs are returned as JSON strings, others as
// JSON numbers (depending on the YANG type and the RESTCONF version).

fn number_from_value<'de, D: Deserializer<'de>>(value: Value) -> Result<Option<f64>, D::Error> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid number: {}", n))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid number: {:?}", s))),
        v => Err(serde::de::Error::custom(format!("expected number, found {}", v))),
    }
}

fn lenient_opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    number_from_value::<D>(Value::deserialize(d)?)
}

fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    lenient_opt_f64(d)?.ok_or_else(|| serde::de::Error::custom("missing number"))
}

fn lenient_opt_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    match lenient_opt_f64(d)? {
        Some(x) if x >= 0.0 && x.fract() == 0.0 => Ok(Some(x as u64)),
        Some(x) => Err(serde::de::Error::custom(format!("expected unsigned integer, found {}", x))),
        None => Ok(None),
    }
}

fn lenient_opt_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    match lenient_opt_u64(d)? {
        Some(x) if x <= u32::MAX as u64 => Ok(Some(x as u32)),
        Some(x) => Err(serde::de::Error::custom(format!("integer out of range: {}", x))),
        None => Ok(None),
    }
}

fn lenient_u32<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    lenient_opt_u32(d)?.ok_or_else(|| serde::de::Error::custom("missing integer"))
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(d)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        v => Ok(Some(v.to_string())),
    }
}
