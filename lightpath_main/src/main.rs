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

use lightpath::controller::Controller;
use lightpath::estimator::{self, Calibration};
use lightpath::model::{
    optical_links, path_hops, Endpoint, FiberType, SrgPort, WavelengthHint, XponderPort,
};
use lightpath::{Coordinator, CoordinatorConfig, ProvisionRequest};
use tpce::{ControllerConfig, PathDescription, Topology, TransportPce};

use clap::{Args, Parser, Subcommand};
use log::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::time::Duration;

fn main() -> Result<(), Box<dyn Error>> {
    // initialize the env logger
    pretty_env_logger::init();

    // run clap
    let args = CommandLineArguments::parse();

    match args.cmd {
        MainCommand::Provision { service } => {
            let coordinator = args.controller.coordinator()?;
            let request = service.request(false)?;
            print_json(&coordinator.provision(&request)?)?;
        }
        MainCommand::Compute { service } => {
            let coordinator = args.controller.coordinator()?;
            let request = service.request(true)?;
            print_json(&coordinator.provision(&request)?)?;
        }
        MainCommand::Delete { service_name } => {
            let coordinator = args.controller.coordinator()?;
            print_json(&coordinator.delete_service(&service_name)?)?;
        }
        MainCommand::Estimate { service_name, calibration } => {
            let coordinator = args.controller.coordinator()?;
            print_json(&coordinator.estimate_service(&service_name, calibration)?)?;
        }
        MainCommand::EstimateOffline { topology, path, calibration } => {
            let topology: Topology = read_json(&topology)?;
            let path: PathDescription = read_json(&path)?;
            let links = optical_links(&topology);
            let hops = path_hops(&path)?;
            print_json(&estimator::estimate(&hops, &links, calibration)?)?;
        }
        MainCommand::Spanloss => {
            let coordinator = args.controller.coordinator()?;
            print_json(&coordinator.measure_and_store_spanloss()?)?;
        }
        MainCommand::Oms { link_id, spanloss, fiber_type, length } => {
            let client = args.controller.client()?;
            let fiber_type = FiberType::from_name(&fiber_type);
            Controller::add_oms_attributes(&client, &link_id, spanloss, fiber_type, length)?;
            info!("Stored the OMS attributes of {}", link_id);
        }
        MainCommand::Connect { node_id, address, port } => {
            let client = args.controller.client()?;
            client.connect_device(&node_id, &address, port)?;
            info!("Mounted {} at {}:{}", node_id, address, port);
        }
        MainCommand::Device { node_id, operational } => {
            let client = args.controller.client()?;
            if operational {
                print_json(&client.get_operational(&node_id)?)?;
            } else {
                print_json(&client.get_config(&node_id)?)?;
            }
        }
        MainCommand::Portmapping { node_id, circuit_pack, port } => {
            let client = args.controller.client()?;
            match (node_id, circuit_pack, port) {
                (Some(node_id), Some(circuit_pack), Some(port)) => print_json(
                    &client.get_logical_connection_point(&node_id, &circuit_pack, &port)?,
                )?,
                (Some(node_id), None, None) => {
                    print_json(&client.get_portmapping_node(&node_id)?)?
                }
                (None, None, None) => print_json(&client.get_portmapping()?)?,
                _ => return Err("Both the circuit pack and the port are required".into()),
            }
        }
        MainCommand::Services { paths } => {
            let client = args.controller.client()?;
            if paths {
                print_json(&client.get_service_path_list()?)?;
            } else {
                print_json(&client.get_service_list()?)?;
            }
        }
        MainCommand::DeleteLink { node_id_1, node_id_2 } => {
            let client = args.controller.client()?;
            client.delete_link(&node_id_1, &node_id_2)?;
            info!("Deleted the links between {} and {}", node_id_1, node_id_2);
        }
        MainCommand::OtsOms { node_id, lcp } => {
            let client = args.controller.client()?;
            print_json(&client.create_ots_oms(&node_id, &lcp)?)?;
        }
        MainCommand::Power { node_id, lcp } => {
            let client = args.controller.client()?;
            print_json(&client.get_optical_power(&node_id, &lcp)?)?;
        }
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(filename: &str) -> Result<T, Box<dyn Error>> {
    Ok(serde_json::from_reader(BufReader::new(File::open(filename)?))?)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parse an endpoint given as `NODE:LOGICAL-CONNECTION-POINT`.
fn split_port(s: &str) -> Result<(&str, &str), Box<dyn Error>> {
    let mut parts = s.splitn(2, ':');
    match (parts.next(), parts.next()) {
        (Some(node), Some(lcp)) if !node.is_empty() && !lcp.is_empty() => Ok((node, lcp)),
        _ => Err(format!("Expected NODE:LOGICAL-CONNECTION-POINT, got {}", s).into()),
    }
}

fn endpoint(srg: &str, xpdr: Option<&String>) -> Result<Endpoint, Box<dyn Error>> {
    let (roadm, srg_lcp) = split_port(srg)?;
    let srg = SrgPort::new(roadm, srg_lcp);
    Ok(match xpdr {
        Some(xpdr) => {
            let (node, xpdr_lcp) = split_port(xpdr)?;
            Endpoint::Xponder { xpdr: XponderPort::new(node, xpdr_lcp), srg }
        }
        None => Endpoint::Roadm(srg),
    })
}

/// Provision services between two specific add/drop ports on a TransportPCE controller, and
/// estimate the signal quality of optical paths.
#[derive(Parser, Debug)]
#[command(name = "Lightpath", author = "Tibor Schneider")]
struct CommandLineArguments {
    /// Controller to connect to
    #[command(flatten)]
    controller: ControllerArguments,
    /// Action to perform
    #[command(subcommand)]
    cmd: MainCommand,
}

#[derive(Args, Debug)]
struct ControllerArguments {
    /// Hostname of the controller
    #[arg(long, env = "TPCE_HOST", default_value = "localhost", global = true)]
    host: String,
    /// RESTCONF port of the controller
    #[arg(long, env = "TPCE_PORT", default_value = "8181", global = true)]
    port: u16,
    /// Username for the controller
    #[arg(long, env = "TPCE_USERNAME", default_value = "admin", global = true)]
    username: String,
    /// Password for the controller
    #[arg(long, env = "TPCE_PASSWORD", default_value = "admin", global = true)]
    password: String,
    /// Timeout of a single request in seconds
    #[arg(long, env = "TPCE_TIMEOUT", default_value = "30", global = true)]
    timeout: u64,
    /// Number of attempts to revert a single modification
    #[arg(long, default_value = "3", global = true)]
    restore_attempts: usize,
    /// Time between two attempts in milliseconds
    #[arg(long, default_value = "500", global = true)]
    restore_backoff: u64,
}

impl ControllerArguments {
    fn client(&self) -> Result<TransportPce, Box<dyn Error>> {
        let config = ControllerConfig {
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
            password: self.password.clone(),
            timeout: Duration::from_secs(self.timeout),
        };
        debug!("Connect to the controller at {}:{}", config.host, config.port);
        Ok(TransportPce::new(config)?)
    }

    fn coordinator(&self) -> Result<Coordinator<TransportPce>, Box<dyn Error>> {
        let config = CoordinatorConfig {
            restore_attempts: self.restore_attempts,
            restore_backoff: Duration::from_millis(self.restore_backoff),
        };
        Ok(Coordinator::new(self.client()?, config))
    }
}

#[derive(Args, Debug)]
struct ServiceArguments {
    /// Add/drop port of the A end, as `ROADM:SRG-PP` (e.g., `ROADM-A1:SRG1-PP1-TXRX`)
    a_end: String,
    /// Add/drop port of the Z end, as `ROADM:SRG-PP`
    z_end: String,
    /// Transponder port connected to the A end, as `XPDR:NETWORK` (e.g.,
    /// `XPDR-A1:XPDR1-NETWORK1`)
    #[arg(long)]
    a_xpdr: Option<String>,
    /// Transponder port connected to the Z end, as `XPDR:NETWORK`
    #[arg(long)]
    z_xpdr: Option<String>,
    /// Channels to choose from (may be repeated)
    #[arg(short = 'w', long = "wavelength")]
    wavelengths: Vec<u32>,
    /// Name of the service (derived from the endpoints if omitted)
    #[arg(short = 'n', long)]
    name: Option<String>,
}

impl ServiceArguments {
    fn request(&self, compute_only: bool) -> Result<ProvisionRequest, Box<dyn Error>> {
        let a_end = endpoint(&self.a_end, self.a_xpdr.as_ref())?;
        let z_end = endpoint(&self.z_end, self.z_xpdr.as_ref())?;
        let mut request = ProvisionRequest::new(a_end, z_end).compute_only(compute_only);
        if let Some(hint) = WavelengthHint::new(self.wavelengths.iter().copied()) {
            request = request.wavelengths(hint);
        }
        if let Some(name) = self.name.as_ref() {
            request = request.named(name.as_str());
        }
        Ok(request)
    }
}

#[derive(Subcommand, Debug)]
enum MainCommand {
    /// Create a service between two add/drop ports
    #[command(name = "provision")]
    Provision {
        #[command(flatten)]
        service: ServiceArguments,
    },
    /// Compute the path between two add/drop ports, without creating the service
    #[command(name = "compute")]
    Compute {
        #[command(flatten)]
        service: ServiceArguments,
    },
    /// Delete a service
    #[command(name = "delete")]
    Delete {
        /// Name of the service
        service_name: String,
    },
    /// Estimate the signal quality of an existing service
    #[command(name = "estimate")]
    Estimate {
        /// Name of the service
        service_name: String,
        /// Amplifier calibration (`current` or `legacy`)
        #[arg(short = 'c', long, default_value = "current")]
        calibration: Calibration,
    },
    /// Estimate the signal quality of a path, given a topology and a path description in JSON
    #[command(name = "estimate-offline")]
    EstimateOffline {
        /// JSON file with the OpenROADM topology
        topology: String,
        /// JSON file with the path description (`aToZ-direction`)
        path: String,
        /// Amplifier calibration (`current` or `legacy`)
        #[arg(short = 'c', long, default_value = "current")]
        calibration: Calibration,
    },
    /// Measure the span loss of all ROADM-to-ROADM links and store it in the topology
    #[command(name = "spanloss")]
    Spanloss,
    /// Store the span attributes of a link
    #[command(name = "oms")]
    Oms {
        /// ID of the link
        link_id: String,
        /// Span loss in dB
        spanloss: f64,
        /// Fiber type (e.g., `smf`, `eleaf` or `ull`)
        #[arg(short = 'f', long, default_value = "smf")]
        fiber_type: String,
        /// Span length in meters
        #[arg(short = 'l', long, default_value = "10000")]
        length: u64,
    },
    /// Mount a NETCONF device on the controller
    #[command(name = "connect")]
    Connect {
        /// Node ID of the device
        node_id: String,
        /// IP address of the device
        address: String,
        /// NETCONF port of the device
        #[arg(default_value = "2022")]
        port: u16,
    },
    /// Show the configuration (or the operational state) of a mounted device
    #[command(name = "device")]
    Device {
        /// Node ID of the device
        node_id: String,
        /// Show the operational state instead of the configuration
        #[arg(short = 'o', long)]
        operational: bool,
    },
    /// Show the port mapping of all devices, of a single device, or the logical connection point
    /// of a single port
    #[command(name = "portmapping")]
    Portmapping {
        /// Node ID of the device
        node_id: Option<String>,
        /// Name of the circuit pack
        circuit_pack: Option<String>,
        /// Name of the port on the circuit pack
        port: Option<String>,
    },
    /// Show all services (or all service paths of the renderer)
    #[command(name = "services")]
    Services {
        /// Show the service paths instead of the services
        #[arg(short = 'p', long)]
        paths: bool,
    },
    /// Delete the links in both directions between two nodes of the topology
    #[command(name = "delete-link")]
    DeleteLink {
        /// First node (e.g., `ROADM-A1-SRG1`)
        node_id_1: String,
        /// Second node (e.g., `ROADM-A1-DEG2`)
        node_id_2: String,
    },
    /// Create the OTS and OMS interfaces on a degree port
    #[command(name = "ots-oms")]
    OtsOms {
        /// Node ID of the ROADM
        node_id: String,
        /// Logical connection point of the degree (e.g., `DEG1-TTP-TXRX`)
        lcp: String,
    },
    /// Show the optical power measured on the OTS interface of a degree port
    #[command(name = "power")]
    Power {
        /// Node ID of the ROADM
        node_id: String,
        /// Logical connection point of the degree (e.g., `DEG1-TTP-TXRX`)
        lcp: String,
    },
}
