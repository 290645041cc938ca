//! Built-in demonstration scenario.

use sm_project::schema::{BasisDef, FlowDef, OutletDef, Scenario, SolverDef, StreamDef};

/// Air and methane mixed at 300 K and 1 atm.
///
/// Flows are volumetric at inlet conditions: 2.5/0.21 m³/s of air per m³/s
/// of methane, so 2.5 O2 per CH4. The outlet valve has K = 10 kg/(s·Pa).
pub fn demo_scenario() -> Scenario {
    let stream = |name: &str, composition: &str, volume: f64| StreamDef {
        name: name.to_string(),
        composition: composition.to_string(),
        basis: BasisDef::Mole,
        temperature: "300 K".to_string(),
        pressure: "1 atm".to_string(),
        flow: FlowDef::Volume(format!("{} m3/s", volume)),
    };

    Scenario {
        version: sm_project::LATEST_VERSION,
        name: "Air/methane mixer".to_string(),
        species: vec![],
        streams: vec![
            stream("air", "O2:0.21, N2:0.78, AR:0.01", 2.5 / 0.21),
            stream("fuel", "CH4", 1.0),
        ],
        outlet: OutletDef {
            valve_coefficient: 10.0,
            downstream_pressure: "1 atm".to_string(),
        },
        solver: Some(SolverDef {
            tolerance: 1e-9,
            max_iterations: 50,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_is_valid() {
        sm_project::validate_scenario(&demo_scenario()).unwrap();
    }

    #[test]
    fn air_carries_two_and_a_half_o2_per_ch4() {
        let scenario = demo_scenario();
        let volume = |s: &StreamDef| match &s.flow {
            FlowDef::Volume(text) => sm_project::parse_quantity(text, sm_project::Quantity::VolumeFlow).unwrap(),
            FlowDef::Mass(_) => panic!("demo flows are volumetric"),
        };
        let o2_per_ch4 = 0.21 * volume(&scenario.streams[0]) / volume(&scenario.streams[1]);
        assert!((o2_per_ch4 - 2.5).abs() < 1e-12, "O2/CH4 = {o2_per_ch4}");
    }
}
