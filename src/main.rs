//! Phasor - steady-state netlist solver
//!
//! Solves every `.circuit` block of a netlist and prints each node voltage
//! and voltage-defining branch current.
//!
//! # Usage
//!
//! ```bash
//! phasor lowpass.netlist
//! RUST_LOG=debug phasor lowpass.netlist
//! ```

use std::path::PathBuf;

use clap::Parser;
use log::{info, LevelFilter};
use phasor_spice::{
    dsl,
    error::{NetlistError, Result},
    report::Report,
    solver::{CcvsStamp, DEFAULT_REACTANCE_EPSILON},
    Simulator, SimulatorConfig,
};

const NETLIST_EXTENSION: &str = "netlist";

/// Steady-state AC/DC circuit solver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the netlist file (.netlist)
    #[arg(value_name = "CIRCUIT_FILE")]
    circuit_file: PathBuf,

    /// DC surrogate for inductor shorts and capacitor opens
    #[arg(short, long, default_value_t = DEFAULT_REACTANCE_EPSILON)]
    epsilon: f64,

    /// Stamping rule for current-controlled voltage sources (H devices)
    #[arg(long, value_enum, default_value = "reference")]
    ccvs_stamp: CcvsStamp,

    /// Log assembly and solve steps
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    if args.circuit_file.extension().and_then(|e| e.to_str()) != Some(NETLIST_EXTENSION) {
        return Err(NetlistError::InvalidFileType {
            path: args.circuit_file.display().to_string(),
        });
    }

    let netlist = dsl::parse_file(&args.circuit_file)?;
    let config = SimulatorConfig::new()
        .with_reactance_epsilon(args.epsilon)
        .with_ccvs_stamp(args.ccvs_stamp);
    let multiple = netlist.circuits().len() > 1;

    for circuit in netlist.circuits() {
        info!(
            "solving circuit starting at line {} ({} components)",
            circuit.start_line(),
            circuit.components().len()
        );
        let solution = Simulator::new(circuit).with_config(config.clone()).run()?;

        if multiple {
            println!("Circuit starting at line {}:", circuit.start_line());
        }
        print!("{}", Report::from_solution(&solution));
    }

    Ok(())
}
