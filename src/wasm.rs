//! WASM bindings for Phasor Spice.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmNetlist } from 'phasor_spice';
//!
//! await init();
//!
//! const netlist = new WasmNetlist(`
//!   .circuit
//!   V1 in GND ac 2 0
//!   R1 in out 1k
//!   C1 out GND 100n
//!   .end
//!   .ac V1 1000
//! `);
//!
//! console.log(netlist.report(0));
//! ```

use wasm_bindgen::prelude::*;

use crate::dsl;
use crate::error::NetlistError;
use crate::report::Report;
use crate::solver::{Simulator, SimulatorConfig};

fn to_js(error: NetlistError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Solved netlist exposed to JavaScript.
///
/// Every circuit block is solved up front; the readings are then queried by
/// block index.
#[wasm_bindgen]
pub struct WasmNetlist {
    reports: Vec<Report>,
}

#[wasm_bindgen]
impl WasmNetlist {
    /// Parse and solve a netlist with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(netlist: &str) -> Result<WasmNetlist, JsValue> {
        Self::with_epsilon(netlist, crate::solver::DEFAULT_REACTANCE_EPSILON)
    }

    /// Parse and solve a netlist with a custom DC reactance surrogate.
    #[wasm_bindgen]
    pub fn with_epsilon(netlist: &str, epsilon: f64) -> Result<WasmNetlist, JsValue> {
        let netlist = dsl::parse(netlist).map_err(to_js)?;
        let config = SimulatorConfig::new().with_reactance_epsilon(epsilon);

        let reports = netlist
            .circuits()
            .iter()
            .map(|circuit| {
                Simulator::new(circuit)
                    .with_config(config.clone())
                    .run()
                    .map(|solution| Report::from_solution(&solution))
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(to_js)?;

        Ok(WasmNetlist { reports })
    }

    /// Number of circuit blocks in the netlist.
    #[wasm_bindgen(getter)]
    pub fn circuit_count(&self) -> usize {
        self.reports.len()
    }

    /// Text report of one circuit block, one quantity per line.
    #[wasm_bindgen]
    pub fn report(&self, index: usize) -> Result<String, JsValue> {
        self.circuit_report(index).map(|r| r.to_string())
    }

    /// Names of the reported unknowns (`V_<node>`, `I_<device>`) of one block.
    #[wasm_bindgen]
    pub fn unknowns(&self, index: usize) -> Result<Vec<String>, JsValue> {
        let report = self.circuit_report(index)?;
        Ok(report
            .quantities()
            .iter()
            .map(|q| q.unknown.to_string())
            .collect())
    }

    fn circuit_report(&self, index: usize) -> Result<&Report, JsValue> {
        self.reports.get(index).ok_or_else(|| {
            to_js(NetlistError::WasmError {
                message: format!(
                    "circuit index {} out of range ({} circuits)",
                    index,
                    self.reports.len()
                ),
            })
        })
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
