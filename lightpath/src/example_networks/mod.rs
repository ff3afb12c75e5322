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

//! Networks and controllers for testing
//!
//! The [`MemoryController`] keeps the topology in memory and implements the
//! [`Controller`](crate::controller::Controller) trait, recording every call. The example
//! networks provide prepared topologies for it.

use tpce::Topology;

mod memory;
pub use memory::{Call, MemoryController};

mod three_roadm_net;
pub use three_roadm_net::ThreeRoadmNet;

/// Trait for easier access to example networks.
pub trait ExampleNetwork {
    /// Get the topology of the network, with all wavelengths available and all ports free.
    fn topology() -> Topology;

    /// Get an in-memory controller holding the topology.
    fn controller() -> MemoryController {
        MemoryController::new(Self::topology())
    }
}
