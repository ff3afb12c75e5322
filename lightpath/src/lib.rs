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

#![deny(missing_docs)]

//! # Lightpath: Resource-Scoped Service Provisioning for OpenROADM Networks
//!
//! This library creates optical services between two specific add/drop ports through the
//! TransportPCE controller, and estimates the signal quality of the resulting paths.
//!
//! ## Structure
//!
//! - **[`Coordinator`]**: Provisions a service between two chosen add/drop ports (optionally
//!   through transponders, and on chosen wavelengths). The path computation of the controller
//!   picks resources on its own, so the coordinator temporarily hides all other SRGs, add/drop
//!   ports and wavelengths on both ROADMs while the request is processed, and restores them
//!   afterwards.
//!
//! - **[`Estimator`](estimator)**: Simulates the chain of amplifiers and fiber spans along a path
//!   to estimate the worst-case OSNR and GSNR at the receiver.
//!
//! - **[`Controller`](controller::Controller)**: Interface to the controller used by the
//!   coordinator. It is implemented for the RESTCONF client [`tpce::TransportPce`].
//!
//! - **[`ExampleNetworks`](example_networks)**: In-memory controller and prepared topologies for
//!   testing.
//!
//! ## Usage
//!
//! ```
//! use lightpath::example_networks::*;
//! use lightpath::model::{Endpoint, SrgPort};
//! use lightpath::{Coordinator, CoordinatorConfig, Error, ProvisionKind, ProvisionRequest};
//!
//! fn main() -> Result<(), Error> {
//!     // use `tpce::TransportPce` to talk to a real controller
//!     let controller = ThreeRoadmNet::controller();
//!     let coordinator = Coordinator::new(controller, CoordinatorConfig::default());
//!
//!     let request = ProvisionRequest::new(
//!         Endpoint::Roadm(SrgPort::new("ROADM-A1", "SRG1-PP1-TXRX")),
//!         Endpoint::Roadm(SrgPort::new("ROADM-C1", "SRG1-PP1-TXRX")),
//!     )
//!     .wavelength(4);
//!
//!     let result = coordinator.provision(&request)?;
//!     assert_eq!(result.kind, ProvisionKind::Created);
//!     assert_eq!(result.service_name, "ROADM-A1_SRG1-PP1-TXRX_to_ROADM-C1_SRG1-PP1-TXRX_ch4");
//!
//!     Ok(())
//! }
//! ```
// test modules
pub mod example_networks;
mod test;

pub mod controller;
pub mod coordinator;
mod error;
pub mod estimator;
pub mod model;

pub use coordinator::{
    Coordinator, CoordinatorConfig, ProvisionKind, ProvisionRequest, ProvisionResult,
    ServiceStatus,
};
pub use error::Error;

/// Result type of this crate
pub type Result<T> = core::result::Result<T, Error>;
