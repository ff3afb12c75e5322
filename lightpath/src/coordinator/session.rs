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

//! # Exclusion Session
//!
//! Every modification applied to the controller while scoping a service is recorded in an
//! [`ExclusionSet`] before it is sent. The [`ExclusionSession`] reverts all recorded modifications
//! in the opposite order, either explicitly with [`ExclusionSession::release`], or when it is
//! dropped without being released.

use super::CoordinatorConfig;
use crate::controller::Controller;
use crate::model::WavelengthHint;
use crate::{Error, Result};

use itertools::Itertools;
use log::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::thread::sleep;

/// Record of all temporary modifications applied to the controller
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ExclusionSet {
    /// Sibling groups which were cleared, with their previous available wavelengths
    pub excluded_groups: BTreeMap<String, BTreeSet<u32>>,
    /// Ports which were marked as used, as `(group_id, port_id)`, in the order of application
    pub excluded_ports: Vec<(String, String)>,
    /// Endpoint groups which were narrowed to the wavelength hint, with their previous available
    /// wavelengths
    pub narrowed_groups: BTreeMap<String, BTreeSet<u32>>,
}

impl ExclusionSet {
    /// Returns true if nothing is excluded.
    pub fn is_empty(&self) -> bool {
        self.excluded_groups.is_empty()
            && self.excluded_ports.is_empty()
            && self.narrowed_groups.is_empty()
    }
}

impl fmt::Display for ExclusionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("nothing");
        }
        let groups = |groups: &BTreeMap<String, BTreeSet<u32>>| {
            groups
                .iter()
                .map(|(group, previous)| format!("{} (previously {:?})", group, previous))
                .join(", ")
        };
        let mut parts = Vec::new();
        if !self.excluded_groups.is_empty() {
            parts.push(format!("cleared groups: {}", groups(&self.excluded_groups)));
        }
        if !self.excluded_ports.is_empty() {
            parts.push(format!(
                "blocked ports: {}",
                self.excluded_ports.iter().map(|(g, p)| format!("{}/{}", g, p)).join(", ")
            ));
        }
        if !self.narrowed_groups.is_empty() {
            parts.push(format!("narrowed groups: {}", groups(&self.narrowed_groups)));
        }
        write!(f, "{}", parts.join("; "))
    }
}

/// Scoped exclusion of resources on the controller. See the [module documentation](self).
pub struct ExclusionSession<'a, C: Controller> {
    controller: &'a C,
    config: &'a CoordinatorConfig,
    applied: ExclusionSet,
    released: bool,
}

impl<'a, C: Controller> ExclusionSession<'a, C> {
    /// Start a new session without any exclusion.
    pub fn new(controller: &'a C, config: &'a CoordinatorConfig) -> Self {
        Self { controller, config, applied: ExclusionSet::default(), released: false }
    }

    /// Returns all modifications applied so far.
    pub fn applied(&self) -> &ExclusionSet {
        &self.applied
    }

    /// Clear all available wavelengths of a group, and remember the previous ones.
    pub fn exclude_group(&mut self, group_id: &str) -> Result<()> {
        if self.applied.excluded_groups.contains_key(group_id) {
            return Ok(());
        }
        let previous = self.controller.srg_wavelengths(group_id)?;
        debug!("Exclude group {} (available: {:?})", group_id, previous);
        self.applied.excluded_groups.insert(group_id.to_string(), previous);
        self.controller.set_srg_wavelengths(group_id, &BTreeSet::new())?;
        Ok(())
    }

    /// Mark a free port as used.
    pub fn block_port(&mut self, group_id: &str, port_id: &str) -> Result<()> {
        debug!("Block port {} of {}", port_id, group_id);
        self.applied.excluded_ports.push((group_id.to_string(), port_id.to_string()));
        self.controller.set_port_used(group_id, port_id)?;
        Ok(())
    }

    /// Narrow the available wavelengths of a group to the channels of the hint. Channels which are
    /// not available on the group are dropped, which may leave the group without any wavelength.
    /// Returns the narrowed set.
    pub fn narrow_group(&mut self, group_id: &str, hint: &WavelengthHint) -> Result<BTreeSet<u32>> {
        let previous = match self.applied.narrowed_groups.get(group_id) {
            Some(previous) => previous.clone(),
            None => self.controller.srg_wavelengths(group_id)?,
        };
        let narrowed = hint.narrow(&previous);
        debug!("Narrow group {} from {:?} to {:?}", group_id, previous, narrowed);
        self.applied.narrowed_groups.entry(group_id.to_string()).or_insert(previous);
        self.controller.set_srg_wavelengths(group_id, &narrowed)?;
        Ok(narrowed)
    }

    /// Revert all modifications. Returns [`Error::RestorationFailed`] with all modifications that
    /// could not be reverted.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        self.restore()
    }

    fn restore(&mut self) -> Result<()> {
        let applied = std::mem::take(&mut self.applied);
        let mut leftover = ExclusionSet::default();
        let mut reason = None;

        for (group, previous) in applied.narrowed_groups.into_iter().rev() {
            if let Err(e) = self.retry(&group, |c| c.set_srg_wavelengths(&group, &previous)) {
                reason = Some(e.to_string());
                leftover.narrowed_groups.insert(group, previous);
            }
        }
        for (group, port) in applied.excluded_ports.into_iter().rev() {
            if let Err(e) = self.retry(&port, |c| c.set_port_free(&group, &port)) {
                reason = Some(e.to_string());
                leftover.excluded_ports.insert(0, (group, port));
            }
        }
        for (group, previous) in applied.excluded_groups.into_iter().rev() {
            if let Err(e) = self.retry(&group, |c| c.set_srg_wavelengths(&group, &previous)) {
                reason = Some(e.to_string());
                leftover.excluded_groups.insert(group, previous);
            }
        }

        match reason {
            None => Ok(()),
            Some(reason) => {
                error!("Cannot restore the controller state! Still excluded: {}", leftover);
                Err(Error::RestorationFailed { leftover, reason })
            }
        }
    }

    fn retry<F>(&self, what: &str, f: F) -> tpce::Result<()>
    where
        F: Fn(&C) -> tpce::Result<()>,
    {
        let attempts = self.config.restore_attempts.max(1);
        let mut attempt = 1;
        loop {
            match f(self.controller) {
                Ok(()) => return Ok(()),
                Err(e) if attempt < attempts => {
                    warn!("Restoring {} failed (attempt {}/{}): {}", what, attempt, attempts, e);
                    attempt += 1;
                    sleep(self.config.restore_backoff);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl<'a, C: Controller> Drop for ExclusionSession<'a, C> {
    fn drop(&mut self) {
        if !self.released {
            self.released = true;
            if self.restore().is_err() {
                error!("Exclusion session dropped with unrestored modifications!");
            }
        }
    }
}
