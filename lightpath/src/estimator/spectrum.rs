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

//! Spectral information propagated through the chain of network elements

use super::elements::{db2lin, dbm2watt};

/// Single channel of the WDM grid. All powers are in W.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    /// Channel number, starting at 1
    pub number: usize,
    /// Center frequency in Hz
    pub frequency: f64,
    /// Symbol rate in Bd
    pub baud_rate: f64,
    /// Roll-off of the pulse shape
    pub roll_off: f64,
    /// Signal power
    pub signal: f64,
    /// Accumulated amplified spontaneous emission
    pub ase: f64,
    /// Accumulated nonlinear interference
    pub nli: f64,
}

impl Channel {
    /// Signal to ASE noise ratio, in linear scale (referred to the symbol rate)
    pub fn osnr(&self) -> f64 {
        self.signal / self.ase
    }

    /// Signal to ASE and NLI noise ratio, in linear scale (referred to the symbol rate)
    pub fn gsnr(&self) -> f64 {
        self.signal / (self.ase + self.nli)
    }
}

/// Spectral state of all channels at one point in the chain
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralState {
    /// All channels, ordered by frequency
    pub channels: Vec<Channel>,
}

impl SpectralState {
    /// Create the spectrum leaving a transmitter: channels at `f_min + k * spacing` for all
    /// `k >= 1` up to `f_max`, each with the same signal power (in dBm) and without any noise.
    pub fn new(
        f_min: f64,
        f_max: f64,
        spacing: f64,
        roll_off: f64,
        baud_rate: f64,
        power_dbm: f64,
    ) -> Self {
        let num_channels = ((f_max - f_min) / spacing).floor() as usize;
        let signal = dbm2watt(power_dbm);
        let channels = (1..=num_channels)
            .map(|number| Channel {
                number,
                frequency: f_min + spacing * number as f64,
                baud_rate,
                roll_off,
                signal,
                ase: 0.0,
                nli: 0.0,
            })
            .collect();
        Self { channels }
    }

    /// Apply a gain (or a loss, if negative) in dB to the signal and all noise.
    pub fn amplify(&mut self, gain_db: f64) {
        let gain = db2lin(gain_db);
        for ch in self.channels.iter_mut() {
            ch.signal *= gain;
            ch.ase *= gain;
            ch.nli *= gain;
        }
    }

    /// Apply a loss in dB to the signal and all noise.
    pub fn attenuate(&mut self, loss_db: f64) {
        self.amplify(-loss_db);
    }

    /// Total signal power over all channels, in W
    pub fn total_signal(&self) -> f64 {
        self.channels.iter().map(|ch| ch.signal).sum()
    }
}
