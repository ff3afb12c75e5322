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

//! # Controller Interface
//!
//! The [`Coordinator`](crate::Coordinator) only talks to the controller through the
//! [`Controller`] trait. It is implemented for the RESTCONF client [`tpce::TransportPce`], and by
//! the [`MemoryController`](crate::example_networks::MemoryController) used for testing.

use crate::model::{FiberType, PortState, SrgPort, XponderPort};

use std::collections::BTreeSet;
use tpce::{MeasuredSpan, RpcOutput, ServicePath, ServiceRequest, Topology, TransportPce};

/// Operations on the controller required by the coordinator. All methods are blocking.
pub trait Controller {
    /// Returns the current OpenROADM topology.
    fn topology(&self) -> tpce::Result<Topology>;

    /// Returns the available wavelengths of a resource group.
    fn srg_wavelengths(&self, group_id: &str) -> tpce::Result<BTreeSet<u32>>;

    /// Replace the available wavelengths of a resource group.
    fn set_srg_wavelengths(&self, group_id: &str, wavelengths: &BTreeSet<u32>) -> tpce::Result<()>;

    /// Returns all add/drop ports of a resource group.
    fn srg_ports(&self, group_id: &str) -> tpce::Result<Vec<PortState>>;

    /// Mark an add/drop port as used.
    fn set_port_used(&self, group_id: &str, port_id: &str) -> tpce::Result<()>;

    /// Mark an add/drop port as free. Must succeed if the port is already free.
    fn set_port_free(&self, group_id: &str, port_id: &str) -> tpce::Result<()>;

    /// Create the links in both directions between the transponder and the add/drop port. Must
    /// succeed if the links already exist.
    fn link_xponder_roadm(&self, xpdr: &XponderPort, srg: &SrgPort) -> tpce::Result<()>;

    /// Compute a path, without creating the service.
    fn path_computation(&self, request: &ServiceRequest) -> tpce::Result<RpcOutput>;

    /// Create a service.
    fn create_service(&self, request: &ServiceRequest) -> tpce::Result<RpcOutput>;

    /// Delete a service.
    fn delete_service(&self, service_name: &str) -> tpce::Result<RpcOutput>;

    /// Returns the path of an existing service.
    fn service_path(&self, service_name: &str) -> tpce::Result<ServicePath>;

    /// Measure the span loss of all ROADM-to-ROADM links.
    fn measure_spanloss(&self) -> tpce::Result<Vec<MeasuredSpan>>;

    /// Store the span attributes of a ROADM-to-ROADM link.
    fn add_oms_attributes(
        &self,
        link_id: &str,
        spanloss: f64,
        fiber_type: FiberType,
        length_m: u64,
    ) -> tpce::Result<()>;
}

impl Controller for TransportPce {
    fn topology(&self) -> tpce::Result<Topology> {
        self.get_topology()
    }

    fn srg_wavelengths(&self, group_id: &str) -> tpce::Result<BTreeSet<u32>> {
        Ok(self.get_srg_wavelengths(group_id)?.into_iter().collect())
    }

    fn set_srg_wavelengths(&self, group_id: &str, wavelengths: &BTreeSet<u32>) -> tpce::Result<()> {
        let wavelengths: Vec<u32> = wavelengths.iter().copied().collect();
        TransportPce::set_srg_wavelengths(self, group_id, &wavelengths)
    }

    fn srg_ports(&self, group_id: &str) -> tpce::Result<Vec<PortState>> {
        Ok(self.get_srg_pps(group_id)?.iter().map(PortState::from).collect())
    }

    fn set_port_used(&self, group_id: &str, port_id: &str) -> tpce::Result<()> {
        self.set_srg_pp_used(group_id, port_id)
    }

    fn set_port_free(&self, group_id: &str, port_id: &str) -> tpce::Result<()> {
        self.set_srg_pp_free(group_id, port_id)
    }

    fn link_xponder_roadm(&self, xpdr: &XponderPort, srg: &SrgPort) -> tpce::Result<()> {
        self.link_xpdr_roadm(
            &xpdr.xpdr_node_id,
            &xpdr.logical_connection_point,
            &srg.roadm_node_id,
            &srg.logical_connection_point,
        )
    }

    fn path_computation(&self, request: &ServiceRequest) -> tpce::Result<RpcOutput> {
        self.path_computation_request(request)
    }

    fn create_service(&self, request: &ServiceRequest) -> tpce::Result<RpcOutput> {
        TransportPce::create_service(self, request)
    }

    fn delete_service(&self, service_name: &str) -> tpce::Result<RpcOutput> {
        TransportPce::delete_service(self, service_name)
    }

    fn service_path(&self, service_name: &str) -> tpce::Result<ServicePath> {
        self.get_service_path(service_name)
    }

    fn measure_spanloss(&self) -> tpce::Result<Vec<MeasuredSpan>> {
        TransportPce::measure_spanloss(self)
    }

    fn add_oms_attributes(
        &self,
        link_id: &str,
        spanloss: f64,
        fiber_type: FiberType,
        length_m: u64,
    ) -> tpce::Result<()> {
        TransportPce::add_oms_attributes(self, link_id, spanloss, fiber_type.name(), length_m)
    }
}
