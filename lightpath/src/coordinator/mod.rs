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

//! # Resource Reservation Coordinator
//!
//! The path computation of the controller chooses the SRGs, add/drop ports and wavelengths on its
//! own. To create a service between two specific add/drop ports (and optionally on a specific
//! wavelength), the [`Coordinator`] temporarily hides all other resources on the two ROADMs:
//!
//! 1. Link the transponders to their add/drop ports (never reverted).
//! 2. Clear the available wavelengths of all other SRGs on both ROADMs.
//! 3. Mark all other free add/drop ports of the two chosen SRGs as used.
//! 4. With a wavelength hint, narrow the chosen SRGs to the hinted channels.
//! 5. Request the path computation or the service creation.
//! 6. Revert steps 4, 3 and 2 (in this order), also if step 5 failed.
//!
//! The controller has no locking. Calls to [`Coordinator::provision`] which touch the same ROADMs
//! must not run concurrently.

mod session;
pub use session::{ExclusionSession, ExclusionSet};

use crate::controller::Controller;
use crate::estimator::{self, Calibration, QualityReport};
use crate::model::{optical_links, path_hops, Endpoint, FiberType, PathHop, WavelengthHint};
use crate::{Error, Result};

use log::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;
use tpce::{MeasuredSpan, RpcOutput, ServiceRequest};

/// Default length of a span when storing measured span losses, in meters
pub const DEFAULT_SPAN_LENGTH: u64 = 10000;

/// Configuration of the coordinator
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorConfig {
    /// Number of attempts to revert a single modification
    pub restore_attempts: usize,
    /// Time to wait between two attempts
    pub restore_backoff: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self { restore_attempts: 3, restore_backoff: Duration::from_millis(500) }
    }
}

/// Request to provision a service between two endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisionRequest {
    /// A end of the service
    pub a_end: Endpoint,
    /// Z end of the service
    pub z_end: Endpoint,
    /// Channels the service is limited to. The controller chooses freely if `None`.
    pub wavelengths: Option<WavelengthHint>,
    /// Only compute the path, without creating the service.
    pub compute_only: bool,
    /// Name of the service. It is derived from the endpoints if `None`.
    pub service_name: Option<String>,
}

impl ProvisionRequest {
    /// Create a new request to create a service between two endpoints.
    pub fn new(a_end: Endpoint, z_end: Endpoint) -> Self {
        Self { a_end, z_end, wavelengths: None, compute_only: false, service_name: None }
    }

    /// Limit the service to the given channels.
    pub fn wavelengths(mut self, hint: WavelengthHint) -> Self {
        self.wavelengths = Some(hint);
        self
    }

    /// Limit the service to a single channel.
    pub fn wavelength(self, channel: u32) -> Self {
        self.wavelengths(WavelengthHint::from(channel))
    }

    /// Only compute the path.
    pub fn compute_only(mut self, compute_only: bool) -> Self {
        self.compute_only = compute_only;
        self
    }

    /// Set the service name explicitly.
    pub fn named(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = Some(service_name.into());
        self
    }

    /// Returns the name of the service. If no name was given, it is derived from both endpoints
    /// (and the channel, if the hint contains exactly one channel).
    pub fn service_name(&self) -> String {
        if let Some(name) = self.service_name.as_ref() {
            return name.clone();
        }
        let mut name = format!("{}_to_{}", self.a_end, self.z_end);
        if let Some(channel) = self.wavelengths.as_ref().and_then(|h| h.single()) {
            name.push_str(&format!("_ch{}", channel));
        }
        name
    }
}

/// Status reported by the controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ServiceStatus {
    /// `Path is calculated`
    PathCalculated,
    /// `PCE calculation in progress`
    CalculationInProgress,
    /// `No path available`
    NoPathAvailable,
    /// `Request processed`
    RequestProcessed,
    /// The service already exists
    AlreadyExists,
    /// Any other message, passed through as is
    Other(String),
}

impl ServiceStatus {
    /// Classify the status message of the controller.
    pub fn classify(message: &str) -> Self {
        match message {
            "Path is calculated" => Self::PathCalculated,
            "PCE calculation in progress" => Self::CalculationInProgress,
            "No path available" => Self::NoPathAvailable,
            "Request processed" => Self::RequestProcessed,
            m if m.contains("already exists") || m.contains("already used") => Self::AlreadyExists,
            m => Self::Other(m.to_string()),
        }
    }

    /// Classify the status of an RPC output. A missing message is classified as `Other("")`.
    pub fn from_output(output: &RpcOutput) -> Self {
        Self::classify(output.message().unwrap_or_default())
    }

    /// Returns the outcome of a provisioning request with this status.
    pub fn kind(&self, compute_only: bool) -> ProvisionKind {
        match self {
            Self::PathCalculated => ProvisionKind::Computed,
            Self::CalculationInProgress | Self::RequestProcessed if compute_only => {
                ProvisionKind::Computed
            }
            Self::CalculationInProgress | Self::RequestProcessed => ProvisionKind::Created,
            Self::NoPathAvailable => ProvisionKind::NoPath,
            Self::AlreadyExists => ProvisionKind::Conflict,
            Self::Other(_) => ProvisionKind::Other,
        }
    }
}

/// Outcome of a provisioning request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProvisionKind {
    /// The service is being created
    Created,
    /// The path was computed
    Computed,
    /// A service with the same name already exists
    Conflict,
    /// There exists no path between both endpoints
    NoPath,
    /// Any other response
    Other,
}

/// Result of a provisioning request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvisionResult {
    /// Outcome of the request
    pub kind: ProvisionKind,
    /// Name of the service
    pub service_name: String,
    /// Status reported by the controller
    pub status: ServiceStatus,
    /// Response code reported by the controller
    pub response_code: Option<String>,
    /// Assigned channel, if the controller returned a path
    pub wavelength: Option<u32>,
    /// Hops of the path, if the controller returned one
    pub path: Vec<PathHop>,
}

impl ProvisionResult {
    /// Build the result from the RPC output. A path which cannot be parsed is dropped, since the
    /// controller may already have acted on the request.
    fn from_output(service_name: String, compute_only: bool, output: &RpcOutput) -> Self {
        let status = ServiceStatus::from_output(output);
        let (wavelength, path) = match output.path_description() {
            Some(description) => {
                let path = path_hops(description).unwrap_or_else(|e| {
                    warn!("Ignoring the path returned for {}: {}", service_name, e);
                    Vec::new()
                });
                (description.a_to_z.wavelength_number, path)
            }
            None => (None, Vec::new()),
        };
        Self {
            kind: status.kind(compute_only),
            service_name,
            status,
            response_code: output.response_code().map(String::from),
            wavelength,
            path,
        }
    }
}

/// # Resource Reservation Coordinator
///
/// See the [module documentation](self).
#[derive(Debug)]
pub struct Coordinator<C: Controller> {
    controller: C,
    config: CoordinatorConfig,
}

impl<C: Controller> Coordinator<C> {
    /// Create a new coordinator.
    pub fn new(controller: C, config: CoordinatorConfig) -> Self {
        Self { controller, config }
    }

    /// Returns a reference to the controller.
    pub fn controller(&self) -> &C {
        &self.controller
    }

    /// Returns the configuration
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Provision a service between the two endpoints, using only the chosen add/drop ports, and
    /// only the hinted wavelengths. All temporary modifications are reverted before returning.
    ///
    /// Returns [`Error::ResourceConflict`] (or [`Error::UnknownPort`]) without modifying anything
    /// if an endpoint port is in use (or does not exist), [`Error::InvalidConnectionPoint`] if a
    /// transponder endpoint is not named like a network port, and [`Error::RestorationFailed`] if
    /// the modifications could not be reverted.
    pub fn provision(&self, request: &ProvisionRequest) -> Result<ProvisionResult> {
        let service_name = request.service_name();
        info!(
            "{} {}",
            if request.compute_only { "Compute path for" } else { "Provision" },
            service_name
        );

        // check both endpoints before modifying anything
        self.check_endpoint(&request.a_end)?;
        self.check_endpoint(&request.z_end)?;

        for end in [&request.a_end, &request.z_end].iter() {
            if let Endpoint::Xponder { xpdr, srg } = end {
                debug!("Link {} with {}", xpdr, srg);
                self.controller.link_xponder_roadm(xpdr, srg)?;
            }
        }

        let service_request =
            ServiceRequest::new(&service_name, request.a_end.node_id(), request.z_end.node_id());

        let mut session = ExclusionSession::new(&self.controller, &self.config);
        let outcome = self.exclude_and_delegate(&mut session, request, &service_request);
        let restored = session.release();

        let output = match (outcome, restored) {
            (Ok(output), Ok(())) => output,
            (Err(e), Ok(())) => return Err(e),
            (Err(cause), Err(Error::RestorationFailed { leftover, reason })) => {
                return Err(Error::RestorationFailed {
                    leftover,
                    reason: format!("{} (while recovering from: {})", reason, cause),
                })
            }
            (_, Err(e)) => return Err(e),
        };

        let result = ProvisionResult::from_output(service_name, request.compute_only, &output);
        info!("{}: {:?}", result.service_name, result.status);
        Ok(result)
    }

    /// Delete a service and return the status reported by the controller.
    pub fn delete_service(&self, service_name: &str) -> Result<ServiceStatus> {
        info!("Delete {}", service_name);
        let output = self.controller.delete_service(service_name)?;
        Ok(ServiceStatus::from_output(&output))
    }

    /// Estimate the signal quality of an existing service, using the span attributes currently
    /// stored in the topology.
    pub fn estimate_service(
        &self,
        service_name: &str,
        calibration: Calibration,
    ) -> Result<QualityReport> {
        let service_path = self.controller.service_path(service_name)?;
        let hops = path_hops(&service_path.path_description)?;
        let links = optical_links(&self.controller.topology()?);
        estimator::estimate(&hops, &links, calibration)
    }

    /// Measure the span loss of all ROADM-to-ROADM links, and store the results in the OMS
    /// attributes of the links (as `smf` with the default length).
    pub fn measure_and_store_spanloss(&self) -> Result<Vec<MeasuredSpan>> {
        let spans = self.controller.measure_spanloss()?;
        for span in spans.iter() {
            debug!("Span loss of {}: {} dB", span.link_id, span.spanloss);
            self.controller.add_oms_attributes(
                &span.link_id,
                span.spanloss,
                FiberType::Smf,
                DEFAULT_SPAN_LENGTH,
            )?;
        }
        info!("Stored the span loss of {} links", spans.len());
        Ok(spans)
    }

    /// Check that the endpoint port exists and is free. The connection points of transponder
    /// endpoints must be valid before any link is created.
    fn check_endpoint(&self, endpoint: &Endpoint) -> Result<()> {
        let srg = endpoint.srg();
        if let Endpoint::Xponder { xpdr, .. } = endpoint {
            tpce::parse_xpdr_lcp(&xpdr.logical_connection_point)?;
            tpce::parse_srg_lcp(&srg.logical_connection_point)?;
        }
        let group = srg.group_id();
        let unknown = || Error::UnknownPort {
            group: group.clone(),
            port: srg.logical_connection_point.clone(),
        };
        let ports = match self.controller.srg_ports(&group) {
            Ok(ports) => ports,
            Err(tpce::Error::ResponseError(404, _)) => return Err(unknown()),
            Err(e) => return Err(e.into()),
        };
        match ports.iter().find(|p| p.port_id == srg.logical_connection_point) {
            None => Err(unknown()),
            Some(p) if p.in_use => Err(Error::ResourceConflict {
                group: group.clone(),
                port: p.port_id.clone(),
            }),
            Some(_) => Ok(()),
        }
    }

    /// Apply the exclusions (steps 2 to 4) and send the request (step 5).
    fn exclude_and_delegate(
        &self,
        session: &mut ExclusionSession<C>,
        request: &ProvisionRequest,
        service_request: &ServiceRequest,
    ) -> Result<RpcOutput> {
        // chosen groups with their endpoint ports
        let mut chosen: BTreeMap<String, BTreeSet<&str>> = BTreeMap::new();
        for end in [&request.a_end, &request.z_end].iter() {
            let srg = end.srg();
            chosen.entry(srg.group_id()).or_default().insert(srg.logical_connection_point.as_str());
        }
        let roadms: BTreeSet<&str> = [&request.a_end, &request.z_end]
            .iter()
            .map(|e| e.srg().roadm_node_id.as_str())
            .collect();

        // clear all sibling groups
        let topology = self.controller.topology()?;
        let siblings: BTreeSet<&str> = topology
            .nodes
            .iter()
            .filter(|n| n.is_srg())
            .filter(|n| n.device_id().map(|d| roadms.contains(d)).unwrap_or(false))
            .filter(|n| !chosen.contains_key(&n.id))
            .map(|n| n.id.as_str())
            .collect();
        for group in siblings {
            session.exclude_group(group)?;
        }

        // block all other free ports of the chosen groups
        for (group, endpoint_ports) in chosen.iter() {
            for port in self.controller.srg_ports(group)? {
                if !port.in_use && !endpoint_ports.contains(port.port_id.as_str()) {
                    session.block_port(group, &port.port_id)?;
                }
            }
        }

        // narrow the chosen groups to the hint
        if let Some(hint) = request.wavelengths.as_ref() {
            for group in chosen.keys() {
                if session.narrow_group(group, hint)?.is_empty() {
                    info!("None of the channels {:?} is available on {}", hint.channels(), group);
                }
            }
        }

        debug!("Applied exclusion: {}", session.applied());
        Ok(if request.compute_only {
            self.controller.path_computation(service_request)?
        } else {
            self.controller.create_service(service_request)?
        })
    }
}
