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

//! # Network Elements
//!
//! Fiber spans, amplifiers and the receiving transceiver. Each element modifies the
//! [`SpectralState`] in place.

use super::spectrum::SpectralState;
use crate::model::FiberType;

use std::f64::consts::PI;

/// Planck constant in J s
pub const PLANCK: f64 = 6.62607015e-34;
/// Speed of light in vacuum in m/s
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;
/// Reference wavelength for the dispersion in m
pub const REF_WAVELENGTH: f64 = 1550e-9;
/// Reference bandwidth of 0.1 nm in Hz
pub const REF_BANDWIDTH: f64 = 12.5e9;

/// Convert dB to linear scale
pub fn db2lin(db: f64) -> f64 {
    10f64.powf(db / 10.0)
}

/// Convert linear scale to dB
pub fn lin2db(lin: f64) -> f64 {
    10.0 * lin.log10()
}

/// Convert dBm to W
pub fn dbm2watt(dbm: f64) -> f64 {
    db2lin(dbm) / 1000.0
}

/// Convert W to dBm
pub fn watt2dbm(watt: f64) -> f64 {
    lin2db(watt * 1000.0)
}

/// Fiber span with an input and an output connector
#[derive(Debug, Clone, PartialEq)]
pub struct Fiber {
    /// Length in m
    pub length: f64,
    /// Attenuation in dB/km
    pub loss_coef: f64,
    /// Loss of the input connector in dB
    pub con_in: f64,
    /// Loss of the output connector in dB
    pub con_out: f64,
    /// Chromatic dispersion in s/m^2
    pub dispersion: f64,
    /// Nonlinear coefficient in 1/(W m)
    pub gamma: f64,
}

impl Fiber {
    /// Create a span with a total loss (including both connectors of 0.5 dB each) in dB and a
    /// length in m.
    pub fn new(loss_db: f64, length_m: f64, fiber_type: FiberType) -> Self {
        let con_in = 0.5;
        let con_out = 0.5;
        Self {
            length: length_m,
            loss_coef: (loss_db - con_in - con_out) / (length_m / 1000.0),
            con_in,
            con_out,
            dispersion: fiber_type.dispersion(),
            gamma: fiber_type.gamma(),
        }
    }

    /// Total loss of the span in dB
    pub fn loss(&self) -> f64 {
        self.loss_coef * self.length / 1000.0 + self.con_in + self.con_out
    }

    /// Field attenuation coefficient in 1/m
    fn alpha(&self) -> f64 {
        self.loss_coef / 1000.0 / (20.0 * std::f64::consts::E.log10())
    }

    fn effective_length(&self) -> f64 {
        let alpha = self.alpha();
        (1.0 - (-2.0 * alpha * self.length).exp()) / (2.0 * alpha)
    }

    fn asymptotic_length(&self) -> f64 {
        1.0 / (2.0 * self.alpha())
    }

    fn beta2(&self) -> f64 {
        -REF_WAVELENGTH.powi(2) * self.dispersion / (2.0 * PI * SPEED_OF_LIGHT)
    }

    /// Propagate the spectrum through the span. The nonlinear interference is generated at the
    /// fiber input (after the input connector).
    pub fn propagate(&self, si: &mut SpectralState) {
        si.attenuate(self.con_in);
        let nli = self.nli(si);
        for (ch, nli) in si.channels.iter_mut().zip(nli) {
            ch.nli += nli;
        }
        si.attenuate(self.loss_coef * self.length / 1000.0 + self.con_out);
    }

    /// Nonlinear interference generated on each channel, using the incoherent GN model
    /// (self- and cross-channel interference).
    fn nli(&self, si: &SpectralState) -> Vec<f64> {
        let l_asym = self.asymptotic_length();
        let beta2 = self.beta2().abs();
        let eta = 16.0 / 27.0 * (self.gamma * self.effective_length()).powi(2)
            / (2.0 * PI * beta2 * l_asym);
        si.channels
            .iter()
            .map(|cut| {
                let g_cut = cut.signal / cut.baud_rate;
                let g_nli: f64 = si
                    .channels
                    .iter()
                    .map(|pump| {
                        let g_pump = pump.signal / pump.baud_rate;
                        let psi = if pump.number == cut.number {
                            (0.5 * PI.powi(2) * l_asym * beta2 * cut.baud_rate.powi(2)).asinh()
                        } else {
                            let delta_f = cut.frequency - pump.frequency;
                            let k = PI.powi(2) * l_asym * beta2 * cut.baud_rate;
                            (k * (delta_f + 0.5 * pump.baud_rate)).asinh()
                                - (k * (delta_f - 0.5 * pump.baud_rate)).asinh()
                        };
                        g_pump.powi(2) * g_cut * psi
                    })
                    .sum();
                eta * g_nli * cut.baud_rate
            })
            .collect()
    }
}

/// Fixed gain amplifier
#[derive(Debug, Clone, PartialEq)]
pub struct Edfa {
    /// Noise figure in dB
    pub nf: f64,
    /// Target gain in dB
    pub gain_target: f64,
    /// Minimal gain in dB
    pub gain_min: f64,
    /// Maximal flat gain in dB
    pub gain_flatmax: f64,
    /// Maximal total output power in dBm
    pub p_max: f64,
}

impl Edfa {
    /// Create an amplifier with the given noise figure and target gain, limited to a gain between
    /// 0 dB and 32 dB, and to a total output power of 21.82 dBm.
    pub fn new(nf: f64, gain_target: f64) -> Self {
        Self { nf, gain_target, gain_min: 0.0, gain_flatmax: 32.0, p_max: 21.82 }
    }

    /// Returns the gain applied to a spectrum with a total input power in dBm.
    pub fn effective_gain(&self, total_in_dbm: f64) -> f64 {
        let gain = self.gain_target.max(self.gain_min).min(self.gain_flatmax);
        if total_in_dbm + gain > self.p_max {
            (self.p_max - total_in_dbm).max(self.gain_min)
        } else {
            gain
        }
    }

    /// Amplify the spectrum and add the ASE noise of the amplifier.
    pub fn propagate(&self, si: &mut SpectralState) {
        let gain = self.effective_gain(watt2dbm(si.total_signal()));
        let gain_lin = db2lin(gain);
        let nf_lin = db2lin(self.nf);
        si.amplify(gain);
        for ch in si.channels.iter_mut() {
            ch.ase += PLANCK * ch.frequency * ch.baud_rate * nf_lin * gain_lin;
        }
    }
}

/// Receiving transceiver
#[derive(Debug, Clone, PartialEq)]
pub struct Transceiver {
    /// OSNR of the transmitter in dB (referred to the symbol rate)
    pub tx_osnr: f64,
}

impl Transceiver {
    /// Returns the minimal OSNR and GSNR over all channels, in dB referred to 0.1 nm, including the
    /// noise of the transmitter.
    pub fn receive(&self, si: &SpectralState) -> (f64, f64) {
        let tx = db2lin(self.tx_osnr);
        let combine = |snr: f64| lin2db(1.0 / (1.0 / snr + 1.0 / tx));
        let mut osnr = f64::INFINITY;
        let mut gsnr = f64::INFINITY;
        for ch in si.channels.iter() {
            let ratio = lin2db(ch.baud_rate / REF_BANDWIDTH);
            osnr = osnr.min(combine(ch.osnr()) + ratio);
            gsnr = gsnr.min(combine(ch.gsnr()) + ratio);
        }
        (osnr, gsnr)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn spectrum(power_dbm: f64) -> SpectralState {
        SpectralState::new(192e12, 196e12, 100e9, 0.15, 32e9, power_dbm)
    }

    #[test]
    fn conversions() {
        assert_approx_eq!(db2lin(20.0), 100.0);
        assert_approx_eq!(lin2db(0.5), -3.0103, 1e-4);
        assert_approx_eq!(watt2dbm(dbm2watt(-16.25)), -16.25);
    }

    #[test]
    fn grid() {
        let si = spectrum(0.0);
        assert_eq!(si.channels.len(), 40);
        assert_approx_eq!(si.channels[0].frequency, 192.1e12, 1.0);
        assert_approx_eq!(si.channels[39].frequency, 196.0e12, 1.0);
        assert_approx_eq!(watt2dbm(si.total_signal()), lin2db(40.0), 1e-9);
    }

    #[test]
    fn fiber_loss() {
        let fiber = Fiber::new(17.0, 80000.0, FiberType::Smf);
        assert_approx_eq!(fiber.loss_coef, 0.2);
        assert_approx_eq!(fiber.loss(), 17.0);
        let mut si = spectrum(0.0);
        fiber.propagate(&mut si);
        assert_approx_eq!(watt2dbm(si.channels[10].signal), -17.0, 1e-9);
        assert!(si.channels.iter().all(|ch| ch.nli > 0.0 && ch.ase == 0.0));
    }

    #[test]
    fn nli_grows_with_power() {
        let fiber = Fiber::new(17.0, 80000.0, FiberType::Smf);
        let mut low = spectrum(0.0);
        let mut high = spectrum(3.0);
        fiber.propagate(&mut low);
        fiber.propagate(&mut high);
        // NLI grows with the third power of the launch power
        let ratio = lin2db(high.channels[20].nli / low.channels[20].nli);
        assert_approx_eq!(ratio, 9.0, 1e-6);
    }

    #[test]
    fn edfa_gain_limits() {
        assert_approx_eq!(Edfa::new(5.0, 40.0).effective_gain(-40.0), 32.0);
        assert_approx_eq!(Edfa::new(5.0, -3.0).effective_gain(0.0), 0.0);
        assert_approx_eq!(Edfa::new(5.0, 20.0).effective_gain(10.0), 11.82);
    }

    #[test]
    fn edfa_osnr() {
        // a single amplifier with 20 dB of gain and 5 dB noise figure
        let mut si = spectrum(-20.0);
        Edfa::new(5.0, 20.0).propagate(&mut si);
        let ch = &si.channels[0];
        assert_approx_eq!(watt2dbm(ch.signal), 0.0, 1e-9);
        let expected = -20.0 - 5.0 - watt2dbm(PLANCK * ch.frequency * ch.baud_rate);
        assert_approx_eq!(lin2db(ch.osnr()), expected, 1e-9);
    }

    #[test]
    fn transceiver_reference_bandwidth() {
        let mut si = spectrum(0.0);
        for ch in si.channels.iter_mut() {
            ch.ase = ch.signal / 1000.0;
        }
        let (osnr, gsnr) = Transceiver { tx_osnr: 300.0 }.receive(&si);
        assert_approx_eq!(osnr, 30.0 + lin2db(32.0 / 12.5), 1e-6);
        assert_approx_eq!(gsnr, osnr, 1e-9);
    }
}
