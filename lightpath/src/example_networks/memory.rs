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

//! In-memory controller

use crate::controller::Controller;
use crate::model::{FiberType, PortState, SrgPort, XponderPort};

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tpce::*;

/// Call to the controller, recorded by the [`MemoryController`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    /// Read the topology
    Topology,
    /// Read the wavelengths of a group
    SrgWavelengths(String),
    /// Set the wavelengths of a group
    SetSrgWavelengths(String, BTreeSet<u32>),
    /// Read the ports of a group
    SrgPorts(String),
    /// Mark a port as used, as `(group, port)`
    SetPortUsed(String, String),
    /// Mark a port as free, as `(group, port)`
    SetPortFree(String, String),
    /// Link a transponder with an add/drop port, as `(xpdr, roadm)`
    LinkXponderRoadm(String, String),
    /// Compute a path for a service
    PathComputation(String),
    /// Create a service
    CreateService(String),
    /// Delete a service
    DeleteService(String),
    /// Read the path of a service
    ServicePath(String),
    /// Measure the span loss of all links
    MeasureSpanloss,
    /// Store the span attributes of a link
    AddOmsAttributes(String, f64),
}

impl Call {
    /// Returns true if the call modifies the state of the controller.
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            Self::Topology
                | Self::SrgWavelengths(_)
                | Self::SrgPorts(_)
                | Self::ServicePath(_)
                | Self::MeasureSpanloss
        )
    }
}

struct Failure {
    matches: Box<dyn Fn(&Call) -> bool>,
    remaining: usize,
    timeout: bool,
}

#[derive(Default)]
struct State {
    topology: Topology,
    xponder_links: HashMap<String, String>,
    services: BTreeMap<String, ServicePath>,
    calls: Vec<Call>,
    failures: Vec<Failure>,
    response: Option<String>,
}

impl State {
    /// Record the call, and return the injected error, if any.
    fn record(&mut self, call: Call) -> tpce::Result<()> {
        let failure = self.failures.iter_mut().find(|f| f.remaining > 0 && (f.matches)(&call));
        self.calls.push(call);
        match failure {
            Some(f) => {
                f.remaining -= 1;
                Err(if f.timeout {
                    Error::Timeout
                } else {
                    Error::ResponseError(500, String::from("injected failure"))
                })
            }
            None => Ok(()),
        }
    }

    fn srg(&self, group_id: &str) -> tpce::Result<&TopologyNode> {
        self.topology
            .node(group_id)
            .filter(|n| n.is_srg())
            .ok_or_else(|| Error::ResponseError(404, format!("{} not found", group_id)))
    }

    fn srg_mut(&mut self, group_id: &str) -> tpce::Result<&mut TopologyNode> {
        self.topology
            .node_mut(group_id)
            .filter(|n| n.is_srg())
            .ok_or_else(|| Error::ResponseError(404, format!("{} not found", group_id)))
    }

    fn port_mut(&mut self, group_id: &str, port_id: &str) -> tpce::Result<&mut TerminationPoint> {
        self.srg_mut(group_id)?
            .termination_points
            .iter_mut()
            .find(|tp| tp.id == port_id)
            .ok_or_else(|| Error::ResponseError(404, format!("{} not found", port_id)))
    }

    /// Wavelengths offered at a node (ROADM or linked transponder): the union over all SRGs of the
    /// ROADM with a free port.
    fn offered(&self, node_id: &str) -> BTreeSet<u32> {
        let roadm = self.xponder_links.get(node_id).map(String::as_str).unwrap_or(node_id);
        self.topology
            .nodes
            .iter()
            .filter(|n| n.is_srg() && n.device_id() == Some(roadm))
            .filter(|n| n.termination_points.iter().any(|tp| tp.is_srg_pp() && !tp.is_used()))
            .flat_map(|n| n.srg_attributes.iter().flat_map(|a| a.indices()))
            .collect()
    }

    /// Compute the path of a service, choosing the lowest channel available at both ends.
    fn compute(&self, request: &ServiceRequest) -> Option<PathDescription> {
        let a = self.offered(&request.a_end);
        let z = self.offered(&request.z_end);
        let channel = a.intersection(&z).next().copied()?;

        let a_roadm = self.xponder_links.get(&request.a_end).unwrap_or(&request.a_end);
        let z_roadm = self.xponder_links.get(&request.z_end).unwrap_or(&request.z_end);
        let span = self.topology.links.iter().find(|l| {
            l.link_type.as_deref() == Some("ROADM-TO-ROADM")
                && l.source.node.starts_with(&format!("{}-", a_roadm))
                && l.destination.node.starts_with(&format!("{}-", z_roadm))
        });

        let resource = |node_id: Option<&str>, link_id: Option<&str>| PathResource {
            node_id: node_id.map(String::from),
            link_id: link_id.map(String::from),
            ..Default::default()
        };
        let mut hops = vec![resource(Some(a_roadm.as_str()), None)];
        if let Some(span) = span {
            hops.push(resource(None, Some(span.id.as_str())));
        }
        hops.push(resource(Some(z_roadm.as_str()), None));

        Some(PathDescription {
            a_to_z: AToZDirection {
                wavelength_number: Some(channel),
                hops: hops
                    .into_iter()
                    .enumerate()
                    .map(|(id, resource)| AToZ { id: id.to_string(), resource })
                    .collect(),
            },
        })
    }

    fn output(&mut self, message: &str, code: &str, path: Option<PathDescription>) -> RpcOutput {
        let message = self.response.take().unwrap_or_else(|| message.to_string());
        RpcOutput {
            response_common: Some(ResponseCommon {
                response_code: Some(code.to_string()),
                response_message: Some(message),
                ack_final_indicator: Some("Yes".to_string()),
                request_id: None,
            }),
            result: None,
            response_parameters: path
                .map(|p| ResponseParameters { path_description: Some(p) }),
        }
    }
}

/// # In-Memory Controller
///
/// Keeps the topology in memory, and records every call. The path computation is simplified: it
/// chooses the lowest channel that is available on an SRG with a free port on both ends. Failures
/// can be injected for specific calls.
pub struct MemoryController {
    state: RefCell<State>,
}

impl MemoryController {
    /// Create a new controller with the given topology.
    pub fn new(topology: Topology) -> Self {
        Self { state: RefCell::new(State { topology, ..Default::default() }) }
    }

    /// Returns a copy of the current topology, without recording a call.
    pub fn current_topology(&self) -> Topology {
        self.state.borrow().topology.clone()
    }

    /// Returns the available wavelengths and the port states of all SRGs, without recording a
    /// call.
    pub fn snapshot(&self) -> BTreeMap<String, (BTreeSet<u32>, Vec<PortState>)> {
        self.state
            .borrow()
            .topology
            .nodes
            .iter()
            .filter(|n| n.is_srg())
            .map(|n| {
                let wavelengths = n.srg_attributes.iter().flat_map(|a| a.indices()).collect();
                let ports = n.termination_points.iter().map(PortState::from).collect();
                (n.id.clone(), (wavelengths, ports))
            })
            .collect()
    }

    /// Set the available wavelengths of an SRG, without recording a call.
    pub fn prepare_wavelengths(&self, group_id: &str, wavelengths: impl IntoIterator<Item = u32>) {
        if let Some(node) = self.state.borrow_mut().topology.node_mut(group_id) {
            node.srg_attributes = Some(WavelengthAttributes::from_indices(wavelengths));
        }
    }

    /// Mark a port as used, without recording a call.
    pub fn prepare_port_used(&self, group_id: &str, port_id: &str) {
        if let Ok(tp) = self.state.borrow_mut().port_mut(group_id, port_id) {
            tp.pp_attributes =
                Some(PpAttributes { used_wavelength: Some(vec![UsedWavelength::placeholder()]) });
        }
    }

    /// Returns all calls recorded so far.
    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    /// Returns the recorded calls which modify the controller state.
    pub fn mutating_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutating).collect()
    }

    /// Names of all existing services
    pub fn services(&self) -> Vec<String> {
        self.state.borrow().services.keys().cloned().collect()
    }

    /// Let the next `times` calls matching the predicate fail with an HTTP error.
    pub fn fail_on<F>(&self, matches: F, times: usize)
    where
        F: Fn(&Call) -> bool + 'static,
    {
        self.state.borrow_mut().failures.push(Failure {
            matches: Box::new(matches),
            remaining: times,
            timeout: false,
        });
    }

    /// Let the next `times` calls matching the predicate time out.
    pub fn timeout_on<F>(&self, matches: F, times: usize)
    where
        F: Fn(&Call) -> bool + 'static,
    {
        self.state.borrow_mut().failures.push(Failure {
            matches: Box::new(matches),
            remaining: times,
            timeout: true,
        });
    }

    /// Reply to the next RPC with the given status message.
    pub fn respond_with(&self, message: impl Into<String>) {
        self.state.borrow_mut().response = Some(message.into());
    }
}

impl Controller for MemoryController {
    fn topology(&self) -> tpce::Result<Topology> {
        let mut state = self.state.borrow_mut();
        state.record(Call::Topology)?;
        Ok(state.topology.clone())
    }

    fn srg_wavelengths(&self, group_id: &str) -> tpce::Result<BTreeSet<u32>> {
        let mut state = self.state.borrow_mut();
        state.record(Call::SrgWavelengths(group_id.to_string()))?;
        Ok(state.srg(group_id)?.srg_attributes.iter().flat_map(|a| a.indices()).collect())
    }

    fn set_srg_wavelengths(&self, group_id: &str, wavelengths: &BTreeSet<u32>) -> tpce::Result<()> {
        let mut state = self.state.borrow_mut();
        state.record(Call::SetSrgWavelengths(group_id.to_string(), wavelengths.clone()))?;
        state.srg_mut(group_id)?.srg_attributes =
            Some(WavelengthAttributes::from_indices(wavelengths.iter().copied()));
        Ok(())
    }

    fn srg_ports(&self, group_id: &str) -> tpce::Result<Vec<PortState>> {
        let mut state = self.state.borrow_mut();
        state.record(Call::SrgPorts(group_id.to_string()))?;
        Ok(state
            .srg(group_id)?
            .termination_points
            .iter()
            .filter(|tp| tp.is_srg_pp())
            .map(PortState::from)
            .collect())
    }

    fn set_port_used(&self, group_id: &str, port_id: &str) -> tpce::Result<()> {
        let mut state = self.state.borrow_mut();
        state.record(Call::SetPortUsed(group_id.to_string(), port_id.to_string()))?;
        state.port_mut(group_id, port_id)?.pp_attributes =
            Some(PpAttributes { used_wavelength: Some(vec![UsedWavelength::placeholder()]) });
        Ok(())
    }

    fn set_port_free(&self, group_id: &str, port_id: &str) -> tpce::Result<()> {
        let mut state = self.state.borrow_mut();
        state.record(Call::SetPortFree(group_id.to_string(), port_id.to_string()))?;
        state.port_mut(group_id, port_id)?.pp_attributes = None;
        Ok(())
    }

    fn link_xponder_roadm(&self, xpdr: &XponderPort, srg: &SrgPort) -> tpce::Result<()> {
        let mut state = self.state.borrow_mut();
        state.record(Call::LinkXponderRoadm(xpdr.xpdr_node_id.clone(), srg.roadm_node_id.clone()))?;
        state.xponder_links.insert(xpdr.xpdr_node_id.clone(), srg.roadm_node_id.clone());
        Ok(())
    }

    fn path_computation(&self, request: &ServiceRequest) -> tpce::Result<RpcOutput> {
        let mut state = self.state.borrow_mut();
        state.record(Call::PathComputation(request.service_name.clone()))?;
        Ok(match state.compute(request) {
            Some(path) => state.output("Path is calculated", "200", Some(path)),
            None => state.output("No path available", "500", None),
        })
    }

    fn create_service(&self, request: &ServiceRequest) -> tpce::Result<RpcOutput> {
        let mut state = self.state.borrow_mut();
        state.record(Call::CreateService(request.service_name.clone()))?;
        if state.services.contains_key(&request.service_name) {
            let message = format!("Service {} already exists", request.service_name);
            return Ok(state.output(&message, "500", None));
        }
        Ok(match state.compute(request) {
            Some(path_description) => {
                let path = ServicePath {
                    name: request.service_name.clone(),
                    path_description,
                };
                state.services.insert(request.service_name.clone(), path);
                state.output("PCE calculation in progress", "200", None)
            }
            None => state.output("No path available", "500", None),
        })
    }

    fn delete_service(&self, service_name: &str) -> tpce::Result<RpcOutput> {
        let mut state = self.state.borrow_mut();
        state.record(Call::DeleteService(service_name.to_string()))?;
        Ok(match state.services.remove(service_name) {
            Some(_) => state.output("Renderer service delete in progress", "200", None),
            None => state.output(&format!("Service {} does not exist", service_name), "500", None),
        })
    }

    fn service_path(&self, service_name: &str) -> tpce::Result<ServicePath> {
        let mut state = self.state.borrow_mut();
        state.record(Call::ServicePath(service_name.to_string()))?;
        state
            .services
            .get(service_name)
            .cloned()
            .ok_or_else(|| Error::ResponseError(404, format!("{} not found", service_name)))
    }

    fn measure_spanloss(&self) -> tpce::Result<Vec<MeasuredSpan>> {
        let mut state = self.state.borrow_mut();
        state.record(Call::MeasureSpanloss)?;
        Ok(state
            .topology
            .links
            .iter()
            .filter(|l| l.link_type.as_deref() == Some("ROADM-TO-ROADM"))
            .filter_map(|l| {
                let loss = l.span().and_then(|s| s.spanloss_current)?;
                Some(MeasuredSpan { link_id: l.id.clone(), spanloss: loss })
            })
            .collect())
    }

    fn add_oms_attributes(
        &self,
        link_id: &str,
        spanloss: f64,
        fiber_type: FiberType,
        length_m: u64,
    ) -> tpce::Result<()> {
        let mut state = self.state.borrow_mut();
        state.record(Call::AddOmsAttributes(link_id.to_string(), spanloss))?;
        let link = state
            .topology
            .links
            .iter_mut()
            .find(|l| l.id == link_id)
            .ok_or_else(|| Error::ResponseError(404, format!("{} not found", link_id)))?;
        link.oms_attributes = Some(OmsAttributes {
            span: Some(Span {
                spanloss_current: Some(spanloss),
                link_concatenation: vec![LinkConcatenation {
                    srlg_id: 0,
                    fiber_type: Some(fiber_type.name().to_string()),
                    srlg_length: Some(length_m),
                }],
            }),
        });
        Ok(())
    }
}
