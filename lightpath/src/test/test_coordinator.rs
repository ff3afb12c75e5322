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

//! Test the provisioning workflow against the in-memory controller.

use crate::controller::Controller;
use crate::coordinator::*;
use crate::estimator::{self, Calibration};
use crate::example_networks::{Call, ExampleNetwork, MemoryController, ThreeRoadmNet};
use crate::model::{
    optical_links, Endpoint, FiberType, PathHop, PortState, SrgPort, WavelengthHint, XponderPort,
};
use crate::Error;
use lazy_static::lazy_static;
use maplit::btreeset;
use std::cell::Cell;
use std::collections::BTreeSet;
use std::rc::Rc;
use std::time::Duration;
use tpce::{MeasuredSpan, RpcOutput, ServicePath, ServiceRequest, Topology};

lazy_static! {
    static ref A1: Endpoint = Endpoint::Roadm(SrgPort::new("ROADM-A1", "SRG1-PP1-TXRX"));
    static ref C1: Endpoint = Endpoint::Roadm(SrgPort::new("ROADM-C1", "SRG1-PP1-TXRX"));
    static ref XPDR_A1: Endpoint = Endpoint::Xponder {
        xpdr: XponderPort::new("XPDR-A1", "XPDR1-NETWORK1"),
        srg: SrgPort::new("ROADM-A1", "SRG1-PP1-TXRX"),
    };
    static ref XPDR_C1: Endpoint = Endpoint::Xponder {
        xpdr: XponderPort::new("XPDR-C1", "XPDR1-NETWORK1"),
        srg: SrgPort::new("ROADM-C1", "SRG1-PP1-TXRX"),
    };
}

fn coordinator() -> Coordinator<MemoryController> {
    let config =
        CoordinatorConfig { restore_attempts: 3, restore_backoff: Duration::from_millis(0) };
    Coordinator::new(ThreeRoadmNet::controller(), config)
}

fn position(calls: &[Call], call: &Call) -> usize {
    calls.iter().position(|c| c == call).unwrap()
}

fn last_position(calls: &[Call], call: &Call) -> usize {
    calls.iter().rposition(|c| c == call).unwrap()
}

#[test]
fn create_service() {
    let c = coordinator();
    let before = c.controller().snapshot();

    let result = c.provision(&ProvisionRequest::new(A1.clone(), C1.clone())).unwrap();
    assert_eq!(result.kind, ProvisionKind::Created);
    assert_eq!(result.status, ServiceStatus::CalculationInProgress);
    assert_eq!(result.response_code.as_deref(), Some("200"));
    assert_eq!(result.service_name, "ROADM-A1_SRG1-PP1-TXRX_to_ROADM-C1_SRG1-PP1-TXRX");
    assert_eq!(c.controller().services(), vec![result.service_name.clone()]);

    assert_eq!(c.controller().snapshot(), before);
}

#[test]
fn compute_path() {
    let c = coordinator();
    let request = ProvisionRequest::new(A1.clone(), C1.clone()).compute_only(true);
    let result = c.provision(&request).unwrap();
    assert_eq!(result.kind, ProvisionKind::Computed);
    assert_eq!(result.status, ServiceStatus::PathCalculated);
    assert_eq!(result.wavelength, Some(1));
    assert_eq!(
        result.path,
        vec![
            PathHop::node(0, "ROADM-A1"),
            PathHop::link(1, ThreeRoadmNet::span_id("ROADM-A1", 2, "ROADM-C1", 1)),
            PathHop::node(2, "ROADM-C1"),
        ]
    );
    assert!(c.controller().services().is_empty());
    assert!(c.controller().calls().contains(&Call::PathComputation(result.service_name)));
}

#[test]
fn siblings_are_excluded() {
    let c = coordinator();
    c.provision(&ProvisionRequest::new(A1.clone(), C1.clone())).unwrap();
    let calls = c.controller().calls();

    // the other SRG of ROADM-A1 is cleared before the service is created, and restored after
    let clear = position(&calls, &Call::SetSrgWavelengths("ROADM-A1-SRG3".into(), btreeset! {}));
    let create = calls.iter().position(|c| matches!(c, Call::CreateService(_))).unwrap();
    let restore = position(
        &calls,
        &Call::SetSrgWavelengths("ROADM-A1-SRG3".into(), (1..=40).collect()),
    );
    assert!(clear < create && create < restore);

    // groups of other ROADMs are never touched
    assert!(!calls.iter().any(|c| match c {
        Call::SetSrgWavelengths(g, _) | Call::SetPortUsed(g, _) | Call::SetPortFree(g, _) =>
            g.starts_with("ROADM-B1"),
        _ => false,
    }));
    // the chosen groups are not narrowed without a hint
    assert!(!calls.iter().any(|c| match c {
        Call::SetSrgWavelengths(g, _) => g == "ROADM-A1-SRG1" || g == "ROADM-C1-SRG1",
        _ => false,
    }));
}

#[test]
fn other_ports_are_blocked() {
    let c = coordinator();
    c.controller().prepare_port_used("ROADM-A1-SRG1", "SRG1-PP3-TXRX");
    let before = c.controller().snapshot();

    c.provision(&ProvisionRequest::new(A1.clone(), C1.clone())).unwrap();

    let blocked: Vec<Call> = c
        .controller()
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::SetPortUsed(_, _)))
        .collect();
    assert_eq!(
        blocked,
        vec![
            Call::SetPortUsed("ROADM-A1-SRG1".into(), "SRG1-PP2-TXRX".into()),
            Call::SetPortUsed("ROADM-A1-SRG1".into(), "SRG1-PP4-TXRX".into()),
            Call::SetPortUsed("ROADM-C1-SRG1".into(), "SRG1-PP2-TXRX".into()),
            Call::SetPortUsed("ROADM-C1-SRG1".into(), "SRG1-PP3-TXRX".into()),
            Call::SetPortUsed("ROADM-C1-SRG1".into(), "SRG1-PP4-TXRX".into()),
        ]
    );
    // the port which was in use before stays in use
    assert!(!c
        .controller()
        .calls()
        .contains(&Call::SetPortFree("ROADM-A1-SRG1".into(), "SRG1-PP3-TXRX".into())));
    assert_eq!(c.controller().snapshot(), before);
}

#[test]
fn wavelength_intersection() {
    let c = coordinator();
    c.controller().prepare_wavelengths("ROADM-A1-SRG1", vec![1, 3, 5]);
    c.controller().prepare_wavelengths("ROADM-C1-SRG1", vec![2, 3, 4]);
    let before = c.controller().snapshot();

    let hint = WavelengthHint::new(vec![3, 4]).unwrap();
    let request =
        ProvisionRequest::new(A1.clone(), C1.clone()).wavelengths(hint).compute_only(true);
    let result = c.provision(&request).unwrap();

    let calls = c.controller().calls();
    assert!(calls.contains(&Call::SetSrgWavelengths("ROADM-A1-SRG1".into(), btreeset! {3})));
    assert!(calls.contains(&Call::SetSrgWavelengths("ROADM-C1-SRG1".into(), btreeset! {3, 4})));
    assert_eq!(result.kind, ProvisionKind::Computed);
    assert_eq!(result.wavelength, Some(3));
    // no channel suffix for more than one channel
    assert_eq!(result.service_name, "ROADM-A1_SRG1-PP1-TXRX_to_ROADM-C1_SRG1-PP1-TXRX");
    assert_eq!(c.controller().snapshot(), before);
}

#[test]
fn unavailable_wavelength() {
    let c = coordinator();
    c.controller().prepare_wavelengths("ROADM-A1-SRG1", vec![1, 2]);
    let before = c.controller().snapshot();

    let result = c.provision(&ProvisionRequest::new(A1.clone(), C1.clone()).wavelength(7)).unwrap();
    assert!(c
        .controller()
        .calls()
        .contains(&Call::SetSrgWavelengths("ROADM-A1-SRG1".into(), btreeset! {})));
    assert_eq!(result.kind, ProvisionKind::NoPath);
    assert_eq!(result.status, ServiceStatus::NoPathAvailable);
    assert_eq!(result.service_name, "ROADM-A1_SRG1-PP1-TXRX_to_ROADM-C1_SRG1-PP1-TXRX_ch7");
    assert_eq!(c.controller().snapshot(), before);
}

#[test]
fn restoration_order() {
    let c = coordinator();
    c.provision(&ProvisionRequest::new(A1.clone(), C1.clone()).wavelength(4)).unwrap();
    let calls = c.controller().calls();
    let all: BTreeSet<u32> = (1..=40).collect();

    let create = calls.iter().position(|c| matches!(c, Call::CreateService(_))).unwrap();
    let restore = |group: &str| {
        last_position(&calls, &Call::SetSrgWavelengths(group.to_string(), all.clone()))
    };
    let restore_a = restore("ROADM-A1-SRG1");
    let restore_c = restore("ROADM-C1-SRG1");
    let restore_sibling = restore("ROADM-A1-SRG3");
    let freed: Vec<(usize, &Call)> =
        calls.iter().enumerate().filter(|(_, c)| matches!(c, Call::SetPortFree(_, _))).collect();

    assert!(create < restore_c && restore_c < restore_a);
    assert!(freed.iter().all(|(i, _)| restore_a < *i && *i < restore_sibling));
    assert_eq!(
        freed.into_iter().map(|(_, c)| c.clone()).collect::<Vec<_>>(),
        vec![
            Call::SetPortFree("ROADM-C1-SRG1".into(), "SRG1-PP4-TXRX".into()),
            Call::SetPortFree("ROADM-C1-SRG1".into(), "SRG1-PP3-TXRX".into()),
            Call::SetPortFree("ROADM-C1-SRG1".into(), "SRG1-PP2-TXRX".into()),
            Call::SetPortFree("ROADM-A1-SRG1".into(), "SRG1-PP4-TXRX".into()),
            Call::SetPortFree("ROADM-A1-SRG1".into(), "SRG1-PP3-TXRX".into()),
            Call::SetPortFree("ROADM-A1-SRG1".into(), "SRG1-PP2-TXRX".into()),
        ]
    );
}

#[test]
fn conflict_short_circuit() {
    let c = coordinator();
    c.controller().prepare_port_used("ROADM-C1-SRG1", "SRG1-PP1-TXRX");

    match c.provision(&ProvisionRequest::new(A1.clone(), C1.clone()).wavelength(4)) {
        Err(Error::ResourceConflict { group, port }) => {
            assert_eq!(group, "ROADM-C1-SRG1");
            assert_eq!(port, "SRG1-PP1-TXRX");
        }
        r => panic!("Unexpected result: {:?}", r),
    }
    assert!(c.controller().mutating_calls().is_empty());

    // transponders are not linked either
    match c.provision(&ProvisionRequest::new(XPDR_A1.clone(), XPDR_C1.clone())) {
        Err(Error::ResourceConflict { .. }) => {}
        r => panic!("Unexpected result: {:?}", r),
    }
    assert!(c.controller().mutating_calls().is_empty());
}

#[test]
fn unknown_port() {
    let c = coordinator();
    let unknown_pp = Endpoint::Roadm(SrgPort::new("ROADM-C1", "SRG1-PP9-TXRX"));
    let unknown_srg = Endpoint::Roadm(SrgPort::new("ROADM-C1", "SRG7-PP1-TXRX"));
    for end in vec![unknown_pp, unknown_srg] {
        match c.provision(&ProvisionRequest::new(A1.clone(), end)) {
            Err(Error::UnknownPort { .. }) => {}
            r => panic!("Unexpected result: {:?}", r),
        }
    }
    assert!(c.controller().mutating_calls().is_empty());
}

#[test]
fn xponder_service() {
    let c = coordinator();
    let before = c.controller().snapshot();
    let request = ProvisionRequest::new(XPDR_A1.clone(), XPDR_C1.clone()).wavelength(2);
    let result = c.provision(&request).unwrap();
    assert_eq!(result.kind, ProvisionKind::Created);
    assert_eq!(
        result.service_name,
        concat!(
            "XPDR-A1_XPDR1-NETWORK1_ROADM-A1_SRG1-PP1-TXRX_to_",
            "XPDR-C1_XPDR1-NETWORK1_ROADM-C1_SRG1-PP1-TXRX_ch2"
        )
    );

    let calls = c.controller().calls();
    let link_a = position(&calls, &Call::LinkXponderRoadm("XPDR-A1".into(), "ROADM-A1".into()));
    let link_c = position(&calls, &Call::LinkXponderRoadm("XPDR-C1".into(), "ROADM-C1".into()));
    let first_exclusion =
        calls.iter().position(|c| matches!(c, Call::SetSrgWavelengths(_, _))).unwrap();
    assert!(link_a < first_exclusion && link_c < first_exclusion);
    assert_eq!(c.controller().snapshot(), before);
}

#[test]
fn explicit_service_name() {
    let c = coordinator();
    let request = ProvisionRequest::new(A1.clone(), C1.clone()).wavelength(5).named("service-1");
    let result = c.provision(&request).unwrap();
    assert_eq!(result.service_name, "service-1");
    assert_eq!(c.controller().services(), vec!["service-1".to_string()]);
}

#[test]
fn service_already_exists() {
    let c = coordinator();
    let request = ProvisionRequest::new(A1.clone(), C1.clone());
    assert_eq!(c.provision(&request).unwrap().kind, ProvisionKind::Created);
    let before = c.controller().snapshot();
    let result = c.provision(&request).unwrap();
    assert_eq!(result.kind, ProvisionKind::Conflict);
    assert_eq!(result.status, ServiceStatus::AlreadyExists);
    assert_eq!(c.controller().snapshot(), before);
}

#[test]
fn unknown_status() {
    let c = coordinator();
    c.controller().respond_with("Service is being processed elsewhere");
    let result = c.provision(&ProvisionRequest::new(A1.clone(), C1.clone())).unwrap();
    assert_eq!(result.kind, ProvisionKind::Other);
    assert_eq!(result.status, ServiceStatus::Other("Service is being processed elsewhere".into()));
}

#[test]
fn external_error_restores() {
    let c = coordinator();
    let before = c.controller().snapshot();
    c.controller().fail_on(|c| matches!(c, Call::CreateService(_)), 1);

    match c.provision(&ProvisionRequest::new(A1.clone(), C1.clone()).wavelength(3)) {
        Err(Error::ExternalServiceError(tpce::Error::ResponseError(500, _))) => {}
        r => panic!("Unexpected result: {:?}", r),
    }
    assert_eq!(c.controller().snapshot(), before);
}

#[test]
fn failed_exclusion_restores() {
    let c = coordinator();
    let before = c.controller().snapshot();
    c.controller().fail_on(
        |c| matches!(c, Call::SetSrgWavelengths(g, w) if g == "ROADM-A1-SRG3" && w.is_empty()),
        1,
    );

    match c.provision(&ProvisionRequest::new(A1.clone(), C1.clone())) {
        Err(Error::ExternalServiceError(_)) => {}
        r => panic!("Unexpected result: {:?}", r),
    }
    assert!(!c.controller().calls().iter().any(|c| matches!(c, Call::CreateService(_))));
    assert_eq!(c.controller().snapshot(), before);
}

#[test]
fn timeout_restores() {
    let c = coordinator();
    let before = c.controller().snapshot();
    c.controller().timeout_on(|c| matches!(c, Call::PathComputation(_)), 1);

    let request = ProvisionRequest::new(A1.clone(), C1.clone()).compute_only(true);
    match c.provision(&request) {
        Err(Error::Timeout) => {}
        r => panic!("Unexpected result: {:?}", r),
    }
    assert_eq!(c.controller().snapshot(), before);
}

#[test]
fn any_single_failure_restores() {
    // let the n-th mutating call fail, for every n
    for n in 0..40 {
        let c = coordinator();
        let before = c.controller().snapshot();
        let counter = Rc::new(Cell::new(0));
        let counter_ref = counter.clone();
        c.controller().fail_on(
            move |call| {
                if call.is_mutating() {
                    counter_ref.set(counter_ref.get() + 1);
                    counter_ref.get() == n + 1
                } else {
                    false
                }
            },
            1,
        );
        let request = ProvisionRequest::new(A1.clone(), C1.clone()).wavelength(9);
        let _ = c.provision(&request);
        assert_eq!(c.controller().snapshot(), before, "failure at mutating call {}", n);
    }
}

#[test]
fn transient_restoration_failure() {
    let c = coordinator();
    let before = c.controller().snapshot();
    let is_restore = |c: &Call| {
        matches!(c, Call::SetSrgWavelengths(g, w) if g == "ROADM-A1-SRG3" && !w.is_empty())
    };
    c.controller().fail_on(is_restore, 2);

    c.provision(&ProvisionRequest::new(A1.clone(), C1.clone())).unwrap();
    assert_eq!(c.controller().calls().iter().filter(|c| is_restore(c)).count(), 3);
    assert_eq!(c.controller().snapshot(), before);
}

#[test]
fn restoration_failed() {
    let c = coordinator();
    c.controller().fail_on(
        |c| matches!(c, Call::SetPortFree(g, p) if g == "ROADM-A1-SRG1" && p == "SRG1-PP2-TXRX"),
        usize::MAX,
    );

    match c.provision(&ProvisionRequest::new(A1.clone(), C1.clone()).wavelength(4)) {
        Err(Error::RestorationFailed { leftover, .. }) => {
            assert_eq!(
                leftover.excluded_ports,
                vec![("ROADM-A1-SRG1".to_string(), "SRG1-PP2-TXRX".to_string())]
            );
            assert!(leftover.excluded_groups.is_empty());
            assert!(leftover.narrowed_groups.is_empty());
            assert!(leftover.to_string().contains("ROADM-A1-SRG1/SRG1-PP2-TXRX"));
        }
        r => panic!("Unexpected result: {:?}", r),
    }
    let attempts = c
        .controller()
        .calls()
        .into_iter()
        .filter(|c| c == &Call::SetPortFree("ROADM-A1-SRG1".into(), "SRG1-PP2-TXRX".into()))
        .count();
    assert_eq!(attempts, 3);

    // everything else is restored
    let snapshot = c.controller().snapshot();
    let all: BTreeSet<u32> = (1..=40).collect();
    assert_eq!(snapshot["ROADM-A1-SRG1"].0, all);
    assert_eq!(snapshot["ROADM-A1-SRG3"].0, all);
    let used: Vec<&str> = snapshot["ROADM-A1-SRG1"]
        .1
        .iter()
        .filter(|p| p.in_use)
        .map(|p| p.port_id.as_str())
        .collect();
    assert_eq!(used, vec!["SRG1-PP2-TXRX"]);
}

#[test]
fn session_restores_on_drop() {
    let net = ThreeRoadmNet::controller();
    let config = CoordinatorConfig::default();
    let before = net.snapshot();
    {
        let mut session = ExclusionSession::new(&net, &config);
        session.exclude_group("ROADM-B1-SRG1").unwrap();
        session.block_port("ROADM-A1-SRG1", "SRG1-PP2-TXRX").unwrap();
        let narrowed = session.narrow_group("ROADM-A1-SRG3", &WavelengthHint::from(4)).unwrap();
        assert_eq!(narrowed, btreeset! {4});
        assert!(!session.applied().is_empty());
        assert_ne!(net.snapshot(), before);
    }
    assert_eq!(net.snapshot(), before);
}

#[test]
fn status_vocabulary() {
    assert_eq!(ServiceStatus::classify("Path is calculated"), ServiceStatus::PathCalculated);
    assert_eq!(
        ServiceStatus::classify("PCE calculation in progress"),
        ServiceStatus::CalculationInProgress
    );
    assert_eq!(ServiceStatus::classify("No path available"), ServiceStatus::NoPathAvailable);
    assert_eq!(ServiceStatus::classify("Request processed"), ServiceStatus::RequestProcessed);
    assert_eq!(
        ServiceStatus::classify("Service 'x' already exists"),
        ServiceStatus::AlreadyExists
    );
    assert_eq!(
        ServiceStatus::classify("path is calculated"),
        ServiceStatus::Other("path is calculated".into())
    );
    assert_eq!(ServiceStatus::RequestProcessed.kind(false), ProvisionKind::Created);
    assert_eq!(ServiceStatus::RequestProcessed.kind(true), ProvisionKind::Computed);
    assert_eq!(ServiceStatus::NoPathAvailable.kind(false), ProvisionKind::NoPath);
}

#[test]
fn delete_service() {
    let c = coordinator();
    let result = c.provision(&ProvisionRequest::new(A1.clone(), C1.clone())).unwrap();
    c.delete_service(&result.service_name).unwrap();
    assert!(c.controller().services().is_empty());
    assert!(c.controller().calls().contains(&Call::DeleteService(result.service_name)));
}

#[test]
fn estimate_existing_service() {
    let c = coordinator();
    let result = c.provision(&ProvisionRequest::new(A1.clone(), C1.clone())).unwrap();
    let report = c.estimate_service(&result.service_name, Calibration::Current).unwrap();

    let links = optical_links(&ThreeRoadmNet::topology());
    let path = vec![PathHop::link(0, ThreeRoadmNet::span_id("ROADM-A1", 2, "ROADM-C1", 1))];
    assert_eq!(report, estimator::estimate(&path, &links, Calibration::Current).unwrap());

    match c.estimate_service("unknown", Calibration::Current) {
        Err(Error::ExternalServiceError(tpce::Error::ResponseError(404, _))) => {}
        r => panic!("Unexpected result: {:?}", r),
    }
}

#[test]
fn store_spanloss() {
    let c = coordinator();
    let spans = c.measure_and_store_spanloss().unwrap();
    assert_eq!(spans.len(), 6);
    let links = optical_links(&c.controller().current_topology());
    for span in spans {
        let link = &links[&span.link_id];
        assert_eq!(link.span_loss_db, Some(span.spanloss));
        assert_eq!(link.length_m, Some(DEFAULT_SPAN_LENGTH));
    }
    let stored =
        c.controller().calls().iter().filter(|c| matches!(c, Call::AddOmsAttributes(_, _))).count();
    assert_eq!(stored, 6);
}

/// Controller which returns paths with hop IDs that are not numbers.
struct GarbledPaths(MemoryController);

impl GarbledPaths {
    fn garble(mut output: RpcOutput) -> RpcOutput {
        if let Some(params) = output.response_parameters.as_mut() {
            if let Some(description) = params.path_description.as_mut() {
                description.a_to_z.hops[0].id = "x".to_string();
            }
        }
        output
    }
}

impl Controller for GarbledPaths {
    fn topology(&self) -> tpce::Result<Topology> {
        self.0.topology()
    }
    fn srg_wavelengths(&self, group_id: &str) -> tpce::Result<BTreeSet<u32>> {
        self.0.srg_wavelengths(group_id)
    }
    fn set_srg_wavelengths(&self, group_id: &str, wavelengths: &BTreeSet<u32>) -> tpce::Result<()> {
        self.0.set_srg_wavelengths(group_id, wavelengths)
    }
    fn srg_ports(&self, group_id: &str) -> tpce::Result<Vec<PortState>> {
        self.0.srg_ports(group_id)
    }
    fn set_port_used(&self, group_id: &str, port_id: &str) -> tpce::Result<()> {
        self.0.set_port_used(group_id, port_id)
    }
    fn set_port_free(&self, group_id: &str, port_id: &str) -> tpce::Result<()> {
        self.0.set_port_free(group_id, port_id)
    }
    fn link_xponder_roadm(&self, xpdr: &XponderPort, srg: &SrgPort) -> tpce::Result<()> {
        self.0.link_xponder_roadm(xpdr, srg)
    }
    fn path_computation(&self, request: &ServiceRequest) -> tpce::Result<RpcOutput> {
        self.0.path_computation(request).map(Self::garble)
    }
    fn create_service(&self, request: &ServiceRequest) -> tpce::Result<RpcOutput> {
        self.0.create_service(request).map(Self::garble)
    }
    fn delete_service(&self, service_name: &str) -> tpce::Result<RpcOutput> {
        self.0.delete_service(service_name)
    }
    fn service_path(&self, service_name: &str) -> tpce::Result<ServicePath> {
        self.0.service_path(service_name)
    }
    fn measure_spanloss(&self) -> tpce::Result<Vec<MeasuredSpan>> {
        self.0.measure_spanloss()
    }
    fn add_oms_attributes(
        &self,
        link_id: &str,
        spanloss: f64,
        fiber_type: FiberType,
        length_m: u64,
    ) -> tpce::Result<()> {
        self.0.add_oms_attributes(link_id, spanloss, fiber_type, length_m)
    }
}

#[test]
fn unparsable_path_keeps_status() {
    let config =
        CoordinatorConfig { restore_attempts: 1, restore_backoff: Duration::from_millis(0) };
    let c = Coordinator::new(GarbledPaths(ThreeRoadmNet::controller()), config);
    let before = c.controller().0.snapshot();

    let request = ProvisionRequest::new(A1.clone(), C1.clone()).compute_only(true);
    let result = c.provision(&request).unwrap();
    assert_eq!(result.kind, ProvisionKind::Computed);
    assert_eq!(result.status, ServiceStatus::PathCalculated);
    assert_eq!(result.wavelength, Some(1));
    assert!(result.path.is_empty());
    assert_eq!(c.controller().0.snapshot(), before);
}

#[test]
fn invalid_xponder_connection_point() {
    let c = coordinator();
    let client_port = Endpoint::Xponder {
        xpdr: XponderPort::new("XPDR-C1", "XPDR1-CLIENT1"),
        srg: SrgPort::new("ROADM-C1", "SRG1-PP1-TXRX"),
    };
    match c.provision(&ProvisionRequest::new(XPDR_A1.clone(), client_port)) {
        Err(Error::InvalidConnectionPoint(lcp)) => assert_eq!(lcp, "XPDR1-CLIENT1"),
        r => panic!("Unexpected result: {:?}", r),
    }

    let degree_port = Endpoint::Xponder {
        xpdr: XponderPort::new("XPDR-C1", "XPDR1-NETWORK1"),
        srg: SrgPort::new("ROADM-C1", "DEG1-TTP-TXRX"),
    };
    match c.provision(&ProvisionRequest::new(XPDR_A1.clone(), degree_port)) {
        Err(Error::InvalidConnectionPoint(lcp)) => assert_eq!(lcp, "DEG1-TTP-TXRX"),
        r => panic!("Unexpected result: {:?}", r),
    }

    // the A end is not linked either
    assert!(c.controller().mutating_calls().is_empty());
}
