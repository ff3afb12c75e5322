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

//! # Cascaded Optical Estimator
//!
//! Estimates the worst-case OSNR and GSNR (in 0.1 nm reference bandwidth) at the receiver of a
//! path. The signal is launched on a grid of 40 channels (192.1 THz to 196 THz, 100 GHz spacing,
//! 32 GBd), and propagated through one amplifier followed by one fiber per ROADM-to-ROADM span of
//! the path. A last amplifier (drop) brings the signal back to 0 dBm before it reaches the
//! receiver.
//!
//! The amplifier noise figure depends on its input power, and its gain is chosen to reach a target
//! output power which depends on the loss of the following span. These models are given by the
//! [`Calibration`].
//!
//! ```
//! use lightpath::estimator::{estimate, Calibration};
//! use lightpath::model::{FiberType, OpticalLink, PathHop};
//! use std::collections::HashMap;
//!
//! let mut links = HashMap::new();
//! links.insert("A-C".to_string(), OpticalLink::span("A-C", 17.0, 80000, FiberType::Smf));
//! let path = vec![
//!     PathHop::node(0, "ROADM-A1"),
//!     PathHop::link(1, "A-C"),
//!     PathHop::node(2, "ROADM-C1"),
//! ];
//!
//! let report = estimate(&path, &links, Calibration::Current).unwrap();
//! assert!(report.gsnr_db <= report.osnr_db);
//! ```

mod elements;
mod spectrum;

pub use elements::{db2lin, dbm2watt, lin2db, watt2dbm, Edfa, Fiber, Transceiver};
pub use spectrum::{Channel, SpectralState};

use crate::model::{FiberType, LinkType, OpticalLink, PathHop};
use crate::{Error, Result};

use log::*;
use serde::Serialize;
use std::collections::HashMap;

/// Lower edge of the spectrum in Hz
pub const F_MIN: f64 = 192e12;
/// Upper edge of the spectrum in Hz
pub const F_MAX: f64 = 196e12;
/// Channel spacing in Hz
pub const SPACING: f64 = 100e9;
/// Roll-off of all channels
pub const ROLL_OFF: f64 = 0.15;
/// Symbol rate of all channels in Bd
pub const BAUD_RATE: f64 = 32e9;
/// OSNR of the transmitter in dB
pub const TX_OSNR: f64 = 33.0;
/// Loss of both fiber connectors together, which is included in the measured span loss, in dB
pub const CONNECTOR_LOSS: f64 = 1.0;

/// Set of amplifier and transceiver parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Calibration {
    /// Current parameter set
    Current,
    /// Parameter set of the first deployment: lower launch power and output power, and a fixed
    /// noise figure of the drop amplifier.
    Legacy,
}

impl Default for Calibration {
    fn default() -> Self {
        Self::Current
    }
}

impl std::str::FromStr for Calibration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "current" => Ok(Self::Current),
            "legacy" => Ok(Self::Legacy),
            other => Err(format!("unknown calibration: {}", other)),
        }
    }
}

/// OSNR of an amplifier in 0.1 nm for 1 mW input power and a noise figure of 0 dB, in dB
fn c58() -> f64 {
    -lin2db(elements::PLANCK * elements::REF_BANDWIDTH * 194e12 * 1000.0)
}

impl Calibration {
    /// Launch power per channel in dBm
    pub fn launch_power(&self) -> f64 {
        match self {
            Self::Current => -16.25,
            Self::Legacy => -20.0,
        }
    }

    /// Noise figure of an express (booster or line) amplifier for the given input power in dBm
    pub fn express_nf(&self, power_in: f64) -> f64 {
        match self {
            Self::Current => c58() + power_in - ((4.0 * power_in + 275.0) / 7.0).min(33.0),
            Self::Legacy => c58() + power_in - ((3.0 * power_in + 225.0) / 6.0).min(31.0),
        }
    }

    /// Noise figure of the drop amplifier for the given input power in dBm
    pub fn drop_nf(&self, power_in: f64) -> f64 {
        match self {
            Self::Current => self.express_nf(power_in),
            Self::Legacy => 6.5,
        }
    }

    /// Target output power per channel in dBm of an amplifier followed by a span with the given
    /// loss in dB.
    pub fn target_power(&self, loss: f64) -> f64 {
        match self {
            Self::Current => (loss - 12.5).min(3.0),
            Self::Legacy => (loss - 14.0).min(1.0),
        }
    }
}

/// Estimated signal quality at the receiver
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityReport {
    /// Minimal OSNR over all channels in 0.1 nm, in dB
    pub osnr_db: f64,
    /// Minimal GSNR over all channels in 0.1 nm, in dB
    pub gsnr_db: f64,
}

impl QualityReport {
    /// Round both values to one decimal place.
    pub fn rounded(&self) -> Self {
        Self { osnr_db: round(self.osnr_db), gsnr_db: round(self.gsnr_db) }
    }
}

fn round(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// ROADM-to-ROADM span of a path
#[derive(Debug, Clone, PartialEq)]
pub struct SpanParams {
    /// Measured loss in dB, including the connectors
    pub loss_db: f64,
    /// Length in m
    pub length_m: u64,
    /// Type of the fiber
    pub fiber_type: FiberType,
}

impl SpanParams {
    /// Create a new span
    pub fn new(loss_db: f64, length_m: u64, fiber_type: FiberType) -> Self {
        Self { loss_db, length_m, fiber_type }
    }
}

/// Extract the ROADM-to-ROADM spans of the path, in the order of the hop IDs. All hops which
/// reference a link must reference a known link. Hops of other links are skipped.
pub fn spans(path: &[PathHop], links: &HashMap<String, OpticalLink>) -> Result<Vec<SpanParams>> {
    let mut hops: Vec<&PathHop> = path.iter().collect();
    hops.sort_by_key(|h| h.id);

    let mut spans = Vec::new();
    for hop in hops {
        let link_id = match hop.link_id.as_ref() {
            Some(link_id) => link_id,
            None => continue,
        };
        let link = links
            .get(link_id)
            .ok_or_else(|| Error::InvalidPathError(format!("unknown link {}", link_id)))?;
        if link.link_type != LinkType::RoadmToRoadm {
            continue;
        }
        let (loss_db, length_m) = match (link.span_loss_db, link.length_m) {
            (Some(loss), Some(length)) => (loss, length),
            _ => {
                return Err(Error::InvalidPathError(format!(
                    "link {} has no span loss or length",
                    link_id
                )))
            }
        };
        if length_m == 0 {
            return Err(Error::InvalidPathError(format!("link {} has zero length", link_id)));
        }
        if !(loss_db > CONNECTOR_LOSS) {
            return Err(Error::InvalidPathError(format!(
                "span loss of link {} ({} dB) does not exceed the connector loss",
                link_id, loss_db
            )));
        }
        spans.push(SpanParams::new(loss_db, length_m, link.fiber_type));
    }
    Ok(spans)
}

/// Simulate the chain of amplifiers and fibers, and return the unrounded signal quality at the
/// receiver.
pub fn simulate(spans: &[SpanParams], calibration: Calibration) -> QualityReport {
    let mut si = SpectralState::new(
        F_MIN,
        F_MAX,
        SPACING,
        ROLL_OFF,
        BAUD_RATE,
        calibration.launch_power(),
    );

    let mut power_in = calibration.launch_power();
    for span in spans.iter() {
        let power_out = calibration.target_power(span.loss_db);
        let amp = Edfa::new(calibration.express_nf(power_in), power_out - power_in);
        let fiber = Fiber::new(span.loss_db, span.length_m as f64, span.fiber_type);
        amp.propagate(&mut si);
        fiber.propagate(&mut si);
        power_in = power_out - span.loss_db;
    }

    // flatten to 0 dBm
    Edfa::new(calibration.drop_nf(power_in), -power_in).propagate(&mut si);

    let (osnr_db, gsnr_db) = Transceiver { tx_osnr: TX_OSNR }.receive(&si);
    QualityReport { osnr_db, gsnr_db }
}

/// Estimate the OSNR and GSNR at the end of the path, rounded to one decimal place. See the
/// [module documentation](self).
pub fn estimate(
    path: &[PathHop],
    links: &HashMap<String, OpticalLink>,
    calibration: Calibration,
) -> Result<QualityReport> {
    let spans = spans(path, links)?;
    let report = simulate(&spans, calibration).rounded();
    debug!(
        "Estimated {} spans: OSNR {} dB, GSNR {} dB",
        spans.len(),
        report.osnr_db,
        report.gsnr_db
    );
    Ok(report)
}
