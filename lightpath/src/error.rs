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

//! Module containing all error types

use crate::coordinator::ExclusionSet;
use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    /// An endpoint port is already in use. Nothing was modified on the controller.
    #[error("Port {port} of {group} is already in use")]
    ResourceConflict {
        /// Resource group of the port
        group: String,
        /// Port which is in use
        port: String,
    },
    /// An endpoint port does not exist. Nothing was modified on the controller.
    #[error("Port {port} does not exist in {group}")]
    UnknownPort {
        /// Resource group which was searched
        group: String,
        /// Port which was not found
        port: String,
    },
    /// The logical connection point of an endpoint cannot be used to link a transponder. Nothing
    /// was modified on the controller.
    #[error("Invalid logical connection point: {0}")]
    InvalidConnectionPoint(String),
    /// Error while talking to the controller
    #[error("Controller Error: {0}")]
    ExternalServiceError(#[source] tpce::Error),
    /// The exclusion could not be reverted. The listed groups and ports are still excluded and must
    /// be repaired manually.
    #[error("Restoration failed: {reason}. Still excluded: {leftover}")]
    RestorationFailed {
        /// All modifications which are not yet reverted
        leftover: ExclusionSet,
        /// Error of the last restoration attempt
        reason: String,
    },
    /// A request to the controller timed out
    #[error("Request to the controller timed out")]
    Timeout,
    /// The path cannot be estimated, since it references unknown links or links without the
    /// required span attributes.
    #[error("Invalid path: {0}")]
    InvalidPathError(String),
}

impl From<tpce::Error> for Error {
    fn from(cause: tpce::Error) -> Self {
        match cause {
            tpce::Error::Timeout => Self::Timeout,
            tpce::Error::InvalidConnectionPoint(lcp) => Self::InvalidConnectionPoint(lcp),
            e => Self::ExternalServiceError(e),
        }
    }
}
