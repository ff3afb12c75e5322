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

//! # TransportPCE RESTCONF API
//!
//! This is a very simple crate to interact with the TransportPCE controller over its RESTCONF
//! interface. It reads and modifies the OpenROADM topology (SRG wavelengths, add/drop ports, OMS
//! attributes), and calls the RPCs of the service handler, the PCE, the OLM and the network
//! utilities.
//!
//! ```no_run
//! use tpce::{ControllerConfig, ServiceRequest, TransportPce};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // connect to the controller
//!     let tpce = TransportPce::new(ControllerConfig::default())?;
//!
//!     // limit the wavelengths of an SRG
//!     let previous = tpce.get_srg_wavelengths("ROADM-A1-SRG1")?;
//!     tpce.set_srg_wavelengths("ROADM-A1-SRG1", &[4])?;
//!
//!     // create the service
//!     let request = ServiceRequest::new("service-1", "ROADM-A1", "ROADM-C1");
//!     let output = tpce.create_service(&request)?;
//!     println!("{:?}", output.message());
//!
//!     // restore the wavelengths
//!     tpce.set_srg_wavelengths("ROADM-A1-SRG1", &previous)?;
//!     Ok(())
//! }
//! ```
#![deny(missing_docs)]

mod controller;
mod types;
pub use controller::{parse_srg_lcp, parse_xpdr_lcp, ControllerConfig, TransportPce};
pub use types::*;

use thiserror::Error;

/// # TransportPCE Error type
#[derive(Debug, Error)]
pub enum Error {
    /// Error during handling of the HTTP request
    #[allow(clippy::upper_case_acronyms)]
    #[error("HTTP Error: {0}")]
    HTTPError(#[source] isahc::Error),
    /// The request did not complete within the configured timeout
    #[error("Request to the controller timed out")]
    Timeout,
    /// Cannot deserialize the response
    #[error("Cannot parse JSON response: {0}")]
    JsonError(#[from] serde_json::error::Error),
    /// IO Error
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    /// HTTP Response Error
    #[error("HTTP Response Error: {0}. Message:\n{1}")]
    ResponseError(u16, String),
    /// The response is valid JSON, but does not contain the expected data
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    /// The logical connection point does not follow the OpenROADM naming scheme
    #[error("Invalid logical connection point: {0}")]
    InvalidConnectionPoint(String),
}

impl From<isahc::Error> for Error {
    fn from(cause: isahc::Error) -> Self {
        if cause.is_timeout() {
            Self::Timeout
        } else {
            Self::HTTPError(cause)
        }
    }
}

impl Error {
    /// Returns true if the error was caused by a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

/// TransportPCE Result type
pub type Result<T> = core::result::Result<T, Error>;
