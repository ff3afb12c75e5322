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

//! # TransportPCE Controller

use crate::types::*;
use crate::{Error, Result};

use isahc::auth::{Authentication, Credentials};
use isahc::prelude::*;
use isahc::http::Response;
use isahc::{Body, HttpClient};
use log::*;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const TOPOLOGY: &str = "ietf-network:networks/network/openroadm-topology";
const SRG_ATTRIBUTES: &str = "org-openroadm-network-topology:srg-attributes";
const PP_ATTRIBUTES: &str = "org-openroadm-network-topology:pp-attributes";

/// Connection settings of the controller
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    /// Hostname or address of the controller
    pub host: String,
    /// Port of the RESTCONF interface
    pub port: u16,
    /// Username for basic authentication
    pub username: String,
    /// Password for basic authentication
    pub password: String,
    /// Timeout of every single request
    pub timeout: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            host: String::from("localhost"),
            port: 8181,
            username: String::from("admin"),
            password: String::from("admin"),
            timeout: Duration::from_secs(30),
        }
    }
}

/// # TransportPCE Controller Handle
#[derive(Debug, Clone)]
pub struct TransportPce {
    base_url: String,
    client: HttpClient,
}

impl TransportPce {
    /// Create a new handle for the controller. No request is sent to the controller.
    pub fn new(config: ControllerConfig) -> Result<Self> {
        let base_url = format!("http://{}:{}/restconf", config.host, config.port);
        let client = HttpClient::builder()
            .timeout(config.timeout)
            .authentication(Authentication::basic())
            .credentials(Credentials::new(config.username, config.password))
            .default_header("content-type", "application/json")
            .default_header("accept", "application/json")
            .build()?;
        Ok(Self { base_url, client })
    }

    /// Returns the base URL of the RESTCONF interface
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Mount a NETCONF device on the controller
    pub fn connect_device(
        &self,
        node_id: impl AsRef<str>,
        ip_addr: impl AsRef<str>,
        port: u16,
    ) -> Result<()> {
        let node_id = node_id.as_ref();
        let data = json!({"node": [{
            "node-id": node_id,
            "netconf-node-topology:username": "admin",
            "netconf-node-topology:password": "admin",
            "netconf-node-topology:host": ip_addr.as_ref(),
            "netconf-node-topology:port": port.to_string(),
            "netconf-node-topology:tcp-only": "false",
            "netconf-node-topology:pass-through": {}
        }]});
        self.request_put(
            format!(
                "config/network-topology:network-topology/topology/topology-netconf/node/{}",
                node_id
            ),
            data,
        )?;
        Ok(())
    }

    /// Returns the configuration of a mounted device
    pub fn get_config(&self, node_id: impl AsRef<str>) -> Result<Value> {
        self.get_device("config", node_id.as_ref())
    }

    /// Returns the operational state of a mounted device
    pub fn get_operational(&self, node_id: impl AsRef<str>) -> Result<Value> {
        self.get_device("operational", node_id.as_ref())
    }

    fn get_device(&self, datastore: &str, node_id: &str) -> Result<Value> {
        let device: Value = self.get_json(format!(
            "{}/network-topology:network-topology/topology/topology-netconf/node/{}/\
             yang-ext:mount/org-openroadm-device:org-openroadm-device",
            datastore, node_id
        ))?;
        take_field(device, "org-openroadm-device")
            .ok_or_else(|| Error::MalformedResponse(format!("no device data for {}", node_id)))
    }

    /// Returns the port mapping of all devices
    pub fn get_portmapping(&self) -> Result<Vec<PortMappingNode>> {
        #[derive(Deserialize)]
        struct Network {
            #[serde(default)]
            nodes: Vec<PortMappingNode>,
        }
        #[derive(Deserialize)]
        struct Wrapper {
            network: Network,
        }
        let w: Wrapper = self.get_json("config/transportpce-portmapping:network")?;
        Ok(w.network.nodes)
    }

    /// Returns the port mapping of a single device
    pub fn get_portmapping_node(&self, node_id: impl AsRef<str>) -> Result<PortMappingNode> {
        #[derive(Deserialize)]
        struct Wrapper {
            nodes: Vec<PortMappingNode>,
        }
        let w: Wrapper = self.get_json(format!(
            "config/transportpce-portmapping:network/nodes/{}",
            node_id.as_ref()
        ))?;
        w.nodes.into_iter().next().ok_or_else(|| {
            Error::MalformedResponse(format!("no port mapping for {}", node_id.as_ref()))
        })
    }

    /// Returns the logical connection point of a physical port
    pub fn get_logical_connection_point(
        &self,
        node_id: impl AsRef<str>,
        circuit_pack_name: impl AsRef<str>,
        port_name: impl AsRef<str>,
    ) -> Result<String> {
        self.get_portmapping_node(node_id.as_ref())?
            .mapping
            .into_iter()
            .find(|m| {
                m.circuit_pack_name == circuit_pack_name.as_ref() && m.port == port_name.as_ref()
            })
            .map(|m| m.logical_connection_point)
            .ok_or_else(|| {
                Error::MalformedResponse(format!(
                    "port {} on {} of {} is not mapped",
                    port_name.as_ref(),
                    circuit_pack_name.as_ref(),
                    node_id.as_ref()
                ))
            })
    }

    /// Returns the entire OpenROADM topology
    pub fn get_topology(&self) -> Result<Topology> {
        #[derive(Deserialize)]
        struct Wrapper {
            network: Vec<Topology>,
        }
        let w: Wrapper = self.get_json(format!("config/{}", TOPOLOGY))?;
        w.network
            .into_iter()
            .next()
            .ok_or_else(|| Error::MalformedResponse(String::from("topology is missing")))
    }

    /// Returns a single node of the OpenROADM topology
    pub fn get_topology_node(&self, node_id: impl AsRef<str>) -> Result<TopologyNode> {
        #[derive(Deserialize)]
        struct Wrapper {
            node: Vec<TopologyNode>,
        }
        let w: Wrapper = self.get_json(format!("config/{}/node/{}/", TOPOLOGY, node_id.as_ref()))?;
        w.node
            .into_iter()
            .next()
            .ok_or_else(|| Error::MalformedResponse(format!("node {} missing", node_id.as_ref())))
    }

    /// Returns the list of all services (raw data)
    pub fn get_service_list(&self) -> Result<Value> {
        let mut list: Value = self.get_json("operational/org-openroadm-service:service-list")?;
        Ok(list.get_mut("service-list").map(Value::take).unwrap_or(Value::Null))
    }

    /// Returns all service paths known to the renderer
    pub fn get_service_path_list(&self) -> Result<Vec<ServicePath>> {
        #[derive(Deserialize)]
        struct List {
            #[serde(rename = "service-paths", default)]
            service_paths: Vec<ServicePath>,
        }
        #[derive(Deserialize)]
        struct Wrapper {
            #[serde(rename = "service-path-list")]
            list: List,
        }
        let w: Wrapper = self.get_json("operational/transportpce-servicepath:service-path-list")?;
        Ok(w.list.service_paths)
    }

    /// Returns a single service path
    pub fn get_service_path(&self, service_path_name: impl AsRef<str>) -> Result<ServicePath> {
        #[derive(Deserialize)]
        struct Wrapper {
            #[serde(rename = "service-paths")]
            service_paths: Vec<ServicePath>,
        }
        let w: Wrapper = self.get_json(format!(
            "operational/transportpce-servicepath:service-path-list/service-paths/{}",
            service_path_name.as_ref()
        ))?;
        w.service_paths.into_iter().next().ok_or_else(|| {
            Error::MalformedResponse(format!("service path {} missing", service_path_name.as_ref()))
        })
    }

    /// Returns the available wavelengths of an SRG. An SRG without the attribute container has no
    /// wavelength available.
    pub fn get_srg_wavelengths(&self, srg_id: impl AsRef<str>) -> Result<Vec<u32>> {
        #[derive(Deserialize)]
        struct Wrapper {
            #[serde(rename = "org-openroadm-network-topology:srg-attributes", default)]
            attributes: WavelengthAttributes,
        }
        let key = format!("config/{}/node/{}/{}", TOPOLOGY, srg_id.as_ref(), SRG_ATTRIBUTES);
        match self.get_json::<Wrapper>(key) {
            Ok(w) => Ok(w.attributes.indices().collect()),
            Err(Error::ResponseError(404, _)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Returns all add/drop ports of an SRG
    pub fn get_srg_pps(&self, srg_id: impl AsRef<str>) -> Result<Vec<TerminationPoint>> {
        Ok(self
            .get_topology_node(srg_id)?
            .termination_points
            .into_iter()
            .filter(|tp| tp.is_srg_pp())
            .collect())
    }

    /// Limit the available wavelengths of an SRG (useful e.g. for AWGs).
    pub fn set_srg_wavelengths(&self, srg_id: impl AsRef<str>, wavelengths: &[u32]) -> Result<()> {
        let data = json!({
            SRG_ATTRIBUTES: WavelengthAttributes::from_indices(wavelengths.iter().copied())
        });
        self.request_put(
            format!("config/{}/node/{}/{}", TOPOLOGY, srg_id.as_ref(), SRG_ATTRIBUTES),
            data,
        )?;
        Ok(())
    }

    /// Block an add/drop port of an SRG by setting a used wavelength
    pub fn set_srg_pp_used(&self, srg_id: impl AsRef<str>, tp_id: impl AsRef<str>) -> Result<()> {
        let data = json!({"used-wavelength": [UsedWavelength::placeholder()]});
        self.request_put(
            format!(
                "config/{}/node/{}/ietf-network-topology:termination-point/{}/{}/used-wavelength/1",
                TOPOLOGY,
                srg_id.as_ref(),
                tp_id.as_ref(),
                PP_ATTRIBUTES
            ),
            data,
        )?;
        Ok(())
    }

    /// Free an add/drop port of an SRG by removing the used wavelength. Freeing a port which is
    /// already free succeeds.
    pub fn set_srg_pp_free(&self, srg_id: impl AsRef<str>, tp_id: impl AsRef<str>) -> Result<()> {
        self.request_delete(format!(
            "config/{}/node/{}/ietf-network-topology:termination-point/{}/{}",
            TOPOLOGY,
            srg_id.as_ref(),
            tp_id.as_ref(),
            PP_ATTRIBUTES
        ))
    }

    /// Add the OMS information to a link of the topology
    pub fn add_oms_attributes(
        &self,
        link_id: impl AsRef<str>,
        spanloss: f64,
        fiber_type: impl AsRef<str>,
        length_m: u64,
    ) -> Result<()> {
        let span = Span {
            spanloss_current: Some(spanloss),
            link_concatenation: vec![LinkConcatenation {
                srlg_id: 0,
                fiber_type: Some(fiber_type.as_ref().to_string()),
                srlg_length: Some(length_m),
            }],
        };
        self.request_put(
            format!(
                "config/{}/ietf-network-topology:link/{}/org-openroadm-network-topology:OMS-attributes/span",
                TOPOLOGY,
                link_id.as_ref()
            ),
            json!({ "span": span }),
        )?;
        Ok(())
    }

    /// Delete the links in both directions between two nodes of the topology (useful for ROADMs
    /// which are not direction-less).
    pub fn delete_link(
        &self,
        node_id_1: impl AsRef<str>,
        node_id_2: impl AsRef<str>,
    ) -> Result<()> {
        for link_id in link_ids(node_id_1.as_ref(), node_id_2.as_ref()).iter() {
            self.request_delete(format!(
                "config/{}/ietf-network-topology:link/{}",
                TOPOLOGY, link_id
            ))?;
        }
        Ok(())
    }

    /// Create the links in both directions between a transponder network port and an SRG
    /// add/drop port. Creating links which already exist is allowed.
    pub fn link_xpdr_roadm(
        &self,
        xpdr_node_id: impl AsRef<str>,
        xpdr_lcp: impl AsRef<str>,
        roadm_node_id: impl AsRef<str>,
        srg_lcp: impl AsRef<str>,
    ) -> Result<()> {
        let (xpdr_num, network_num) = parse_xpdr_lcp(xpdr_lcp.as_ref())?;
        let srg_num = parse_srg_lcp(srg_lcp.as_ref())?;
        let data = json!({"networkutils:input": {
            "networkutils:links-input": {
                "networkutils:xpdr-node": xpdr_node_id.as_ref(),
                "networkutils:xpdr-num": xpdr_num.to_string(),
                "networkutils:network-num": network_num.to_string(),
                "networkutils:rdm-node": roadm_node_id.as_ref(),
                "networkutils:srg-num": srg_num.to_string(),
                "networkutils:termination-point-num": srg_lcp.as_ref()
            }
        }});
        for rpc in ["init-xpdr-rdm-links", "init-rdm-xpdr-links"].iter() {
            let output = self.rpc(format!("transportpce-networkutils:{}", rpc), &data)?;
            debug!("{} on {}: {:?}", rpc, xpdr_node_id.as_ref(), output.message());
        }
        Ok(())
    }

    /// Create the OTS and OMS interfaces on a degree port
    pub fn create_ots_oms(
        &self,
        node_id: impl AsRef<str>,
        logical_connection_point: impl AsRef<str>,
    ) -> Result<RpcOutput> {
        let data = json!({"input": {
            "node-id": node_id.as_ref(),
            "logical-connection-point": logical_connection_point.as_ref()
        }});
        self.rpc("transportpce-device-renderer:create-ots-oms", &data)
    }

    /// Returns the current optical power measured on an OTS interface (raw data)
    pub fn get_optical_power(
        &self,
        node_id: impl AsRef<str>,
        logical_connection_point: impl AsRef<str>,
    ) -> Result<Value> {
        let data = json!({"input": {
            "node-id": node_id.as_ref(),
            "resource-type": "interface",
            "granularity": "15min",
            "resource-identifier": {
                "resource-name": format!("OTS-{}", logical_connection_point.as_ref())
            }
        }});
        let response: Value = self.post_json("operations/transportpce-olm:get-pm", &data)?;
        take_field(response, "output")
            .ok_or_else(|| Error::MalformedResponse(String::from("get-pm without output")))
    }

    /// Measure the span loss of all ROADM-to-ROADM links
    pub fn measure_spanloss(&self) -> Result<Vec<MeasuredSpan>> {
        #[derive(Deserialize)]
        struct Output {
            #[serde(default)]
            spans: Vec<MeasuredSpan>,
        }
        #[derive(Deserialize)]
        struct Wrapper {
            output: Output,
        }
        let data = json!({"input": {"src-type": "all"}});
        let w: Wrapper =
            self.post_json("operations/transportpce-olm:calculate-spanloss-base", &data)?;
        Ok(w.output.spans)
    }

    /// Request a new service (`org-openroadm-service:service-create`)
    pub fn create_service(&self, request: &ServiceRequest) -> Result<RpcOutput> {
        let direction = json!({
            "port": {
                "port-device-name": "n/a",
                "port-type": "n/a",
                "port-name": "n/a",
                "port-rack": "n/a",
                "port-shelf": "n/a"
            },
            "lgx": {
                "lgx-device-name": "n/a",
                "lgx-port-name": "n/a",
                "lgx-port-rack": "n/a",
                "lgx-port-shelf": "n/a"
            }
        });
        let service_end = |node_id: &str, clli: &str| {
            json!({
                "service-rate": "100",
                "node-id": node_id,
                "service-format": "Ethernet",
                "clli": clli,
                "tx-direction": direction,
                "rx-direction": direction,
                "optic-type": "dwdm"
            })
        };
        let data = json!({"input": {
            "sdnc-request-header": {
                "request-id": request.request_id,
                "rpc-action": "service-create"
            },
            "service-name": request.service_name,
            "common-id": request.common_id,
            "connection-type": "service",
            "service-a-end": service_end(&request.a_end, "clli_1"),
            "service-z-end": service_end(&request.z_end, "clli_2")
        }});
        self.rpc("org-openroadm-service:service-create", &data)
    }

    /// Delete an existing service (`org-openroadm-service:service-delete`)
    pub fn delete_service(&self, service_name: impl AsRef<str>) -> Result<RpcOutput> {
        let data = json!({"input": {
            "sdnc-request-header": {
                "request-id": "default_rid",
                "rpc-action": "service-delete"
            },
            "service-delete-req-info": {
                "service-name": service_name.as_ref(),
                "tail-retention": "no"
            }
        }});
        self.rpc("org-openroadm-service:service-delete", &data)
    }

    /// Only compute the path of a service, without creating it
    /// (`transportpce-pce:path-computation-request`).
    pub fn path_computation_request(&self, request: &ServiceRequest) -> Result<RpcOutput> {
        let service_end = |node_id: &str, clli: &str| {
            json!({
                "node-id": node_id,
                "service-rate": "0",
                "service-format": "OC",
                "clli": clli
            })
        };
        let data = json!({"input": {
            "service-name": request.service_name,
            "resource-reserve": "true",
            "pce-metric": "hop-count",
            "service-handler-header": {
                "request-id": request.request_id
            },
            "service-a-end": service_end(&request.a_end, "clli_1"),
            "service-z-end": service_end(&request.z_end, "clli_2")
        }});
        self.rpc("transportpce-pce:path-computation-request", &data)
    }

    fn rpc(&self, operation: impl AsRef<str>, data: &Value) -> Result<RpcOutput> {
        let key = format!("operations/{}", operation.as_ref());
        let response: RpcResponse = self.post_json(key, data)?;
        Ok(response.output)
    }

    fn get_json<T: DeserializeOwned>(&self, key: impl AsRef<str>) -> Result<T> {
        Ok(serde_json::from_str(&self.request_get(key)?)?)
    }

    fn post_json<T: DeserializeOwned>(&self, key: impl AsRef<str>, data: &Value) -> Result<T> {
        let text = self.request_post(key, data.to_string())?;
        if text.trim().is_empty() {
            // some RPCs return an empty body
            Ok(serde_json::from_value(json!({}))?)
        } else {
            Ok(serde_json::from_str(&text)?)
        }
    }

    fn request_get(&self, key: impl AsRef<str>) -> Result<String> {
        let addr = format!("{}/{}", self.base_url, key.as_ref());
        debug!("GET  {}", addr);
        self.handle_response(self.client.get(addr.as_str())?)
    }

    fn request_post(&self, key: impl AsRef<str>, data: String) -> Result<String> {
        let addr = format!("{}/{}", self.base_url, key.as_ref());
        debug!("POST {} {}", addr, data);
        self.handle_response(self.client.post(addr.as_str(), data)?)
    }

    fn request_put(&self, key: impl AsRef<str>, data: Value) -> Result<String> {
        let addr = format!("{}/{}", self.base_url, key.as_ref());
        let data = data.to_string();
        debug!("PUT  {} {}", addr, data);
        self.handle_response(self.client.put(addr.as_str(), data)?)
    }

    fn request_delete(&self, key: impl AsRef<str>) -> Result<()> {
        let addr = format!("{}/{}", self.base_url, key.as_ref());
        debug!("DEL  {}", addr);
        match self.handle_response(self.client.delete(addr.as_str())?) {
            Ok(_) => Ok(()),
            // nothing to delete
            Err(Error::ResponseError(404, _)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn handle_response(&self, mut response: Response<Body>) -> Result<String> {
        let status = response.status();
        if !status.is_success() {
            return Err(Error::ResponseError(status.as_u16(), response.text()?));
        }
        Ok(response.text()?)
    }
}

/// Parse the transponder and network number of a transponder network port, e.g., `(1, 2)` for
/// `XPDR1-NETWORK2`.
pub fn parse_xpdr_lcp(lcp: &str) -> Result<(u32, u32)> {
    let re = Regex::new(r"^XPDR(\d+)-NETWORK(\d+)$").unwrap();
    let invalid = || Error::InvalidConnectionPoint(lcp.to_string());
    let caps = re.captures(lcp).ok_or_else(invalid)?;
    let xpdr = caps[1].parse().map_err(|_| invalid())?;
    let network = caps[2].parse().map_err(|_| invalid())?;
    Ok((xpdr, network))
}

/// Parse the SRG number of an add/drop port, e.g., `3` for `SRG3-PP1-TXRX`.
pub fn parse_srg_lcp(lcp: &str) -> Result<u32> {
    let re = Regex::new(r"^SRG(\d+)-").unwrap();
    let invalid = || Error::InvalidConnectionPoint(lcp.to_string());
    let caps = re.captures(lcp).ok_or_else(invalid)?;
    caps[1].parse().map_err(|_| invalid())
}

/// Take a field out of a JSON object.
fn take_field(mut value: Value, field: &str) -> Option<Value> {
    value.get_mut(field).map(Value::take)
}

/// IDs of the links in both directions between two ROADM nodes
fn link_ids(node_id_1: &str, node_id_2: &str) -> [String; 2] {
    let end_1 = link_end(node_id_1);
    let end_2 = link_end(node_id_2);
    [format!("{}to{}", end_1, end_2), format!("{}to{}", end_2, end_1)]
}

/// Returns the endpoint of a link between ROADM nodes, e.g., `ROADM-A1-SRG1-SRG1-CP-TXRX` for
/// `ROADM-A1-SRG1`, or `ROADM-A1-DEG2-DEG2-CTP-TXRX` for `ROADM-A1-DEG2`.
fn link_end(node_id: &str) -> String {
    let sub = node_id.rsplit('-').next().unwrap_or(node_id);
    let tp = if sub.contains("SRG") { "CP" } else { "CTP" };
    format!("{}-{}-{}-TXRX", node_id, sub, tp)
}
