//! Integration tests for the steady mixer.

use proptest::prelude::*;
use sm_core::units::{Density, Pressure, Temperature, Velocity, k, kgps, pa};
use sm_fluids::{
    Basis, Composition, FluidModel, FluidResult, IdealGasMixture, SpecEnthalpy, SpeciesCatalog,
    SpeciesData, SpeciesThermo, ThermoState,
};
use sm_solver::{
    ConvergenceConfig, ConvergenceStatus, SolverError, SteadyMixerSolver, Stream, Valve,
};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Wraps a model and counts every query made through it.
struct CountingModel<M> {
    inner: M,
    calls: AtomicUsize,
}

impl<M: FluidModel> CountingModel<M> {
    fn new(inner: M) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl<M: FluidModel> FluidModel for CountingModel<M> {
    fn name(&self) -> &str {
        "Counting"
    }

    fn species_molar_mass(&self, species: &str) -> FluidResult<f64> {
        self.bump();
        self.inner.species_molar_mass(species)
    }

    fn check_composition(&self, comp: &Composition) -> FluidResult<()> {
        self.bump();
        self.inner.check_composition(comp)
    }

    fn rho(&self, state: &ThermoState) -> FluidResult<Density> {
        self.bump();
        self.inner.rho(state)
    }

    fn h(&self, state: &ThermoState) -> FluidResult<SpecEnthalpy> {
        self.bump();
        self.inner.h(state)
    }

    fn s(&self, state: &ThermoState) -> FluidResult<f64> {
        self.bump();
        self.inner.s(state)
    }

    fn cp(&self, state: &ThermoState) -> FluidResult<f64> {
        self.bump();
        self.inner.cp(state)
    }

    fn gamma(&self, state: &ThermoState) -> FluidResult<f64> {
        self.bump();
        self.inner.gamma(state)
    }

    fn a(&self, state: &ThermoState) -> FluidResult<Velocity> {
        self.bump();
        self.inner.a(state)
    }

    fn evaluate_enthalpy(
        &self,
        t: Temperature,
        p: Pressure,
        comp: &Composition,
    ) -> FluidResult<SpecEnthalpy> {
        self.bump();
        self.inner.evaluate_enthalpy(t, p, comp)
    }
}

fn const_cp(name: &str, molar_mass: f64, cp_mass: f64) -> SpeciesData {
    SpeciesData::new(
        name,
        molar_mass,
        SpeciesThermo::ConstantCp {
            t0: 298.15,
            h0: 0.0,
            s0: 0.0,
            cp0: cp_mass * molar_mass,
        },
    )
    .unwrap()
}

fn xy_model() -> IdealGasMixture {
    IdealGasMixture::new(SpeciesCatalog::new())
        .with_species(const_cp("X", 20.0, 1000.0))
        .with_species(const_cp("Y", 40.0, 1000.0))
}

fn air() -> Composition {
    Composition::parse("O2:0.21, N2:0.78, AR:0.01", Basis::Mole).unwrap()
}

fn config() -> ConvergenceConfig {
    ConvergenceConfig::new(1e-9, 50).unwrap()
}

#[test]
fn invalid_inputs_make_no_property_queries() {
    let model = CountingModel::new(IdealGasMixture::builtin());
    let solver = SteadyMixerSolver::new(&model);
    let valve = Valve::new(1.0).unwrap();

    let empty = solver.solve(&[], &valve, pa(101_325.0), &config());
    assert!(matches!(empty, Err(SolverError::InvalidInput { .. })));

    let zero = [
        Stream::new(air(), k(300.0), pa(1e5), kgps(0.0)),
        Stream::new(Composition::pure("CH4"), k(300.0), pa(1e5), kgps(0.0)),
    ];
    let all_zero = solver.solve(&zero, &valve, pa(101_325.0), &config());
    assert!(matches!(all_zero, Err(SolverError::InvalidInput { .. })));

    let nan = [Stream::new(air(), k(300.0), pa(1e5), kgps(f64::NAN))];
    let bad_flow = solver.solve(&nan, &valve, pa(101_325.0), &config());
    assert!(matches!(bad_flow, Err(SolverError::InvalidInput { .. })));

    assert_eq!(model.calls(), 0);
}

#[test]
fn equal_cp_species_mix_at_inlet_temperature() {
    let model = xy_model();
    let streams = [
        Stream::new(Composition::pure("X"), k(300.0), pa(101_325.0), kgps(1.0)).with_name("x"),
        Stream::new(Composition::pure("Y"), k(300.0), pa(101_325.0), kgps(1.0)).with_name("y"),
    ];
    let valve = Valve::new(10.0).unwrap();
    let result = SteadyMixerSolver::new(&model)
        .solve(&streams, &valve, pa(101_325.0), &config())
        .unwrap();

    assert_eq!(result.status, ConvergenceStatus::Converged);
    let comp = result.state.composition();
    assert_eq!(comp.basis(), Basis::Mass);
    assert!((comp.fraction("X") - 0.5).abs() < 1e-12);
    assert!((comp.fraction("Y") - 0.5).abs() < 1e-12);
    assert!((result.state.temperature().value - 300.0).abs() < 1e-6);
    assert_eq!(result.total_mass_flow.value, 2.0);
    assert_eq!(result.state.pressure().value, 101_325.0 + 2.0 / 10.0);
}

#[test]
fn equal_cp_species_at_different_temperatures_average_linearly() {
    let model = xy_model();
    let streams = [
        Stream::new(Composition::pure("X"), k(300.0), pa(1e5), kgps(3.0)),
        Stream::new(Composition::pure("Y"), k(400.0), pa(1e5), kgps(1.0)),
    ];
    let valve = Valve::new(1.0).unwrap();
    let result = SteadyMixerSolver::new(&model)
        .solve(&streams, &valve, pa(1e5), &config())
        .unwrap();
    assert!(result.is_converged());
    assert!((result.state.temperature().value - 325.0).abs() < 1e-5);
    assert!((result.state.composition().fraction("X") - 0.75).abs() < 1e-12);
}

#[test]
fn air_and_methane_stoichiometric_mix() {
    let model = IdealGasMixture::builtin();
    // Stoichiometric: one CH4 per 2 O2, so 2/0.21 mol of air per mol of fuel.
    let fuel_rate = 1.0;
    let m_air = model.mean_molar_mass(&air()).unwrap();
    let m_ch4 = model.species_molar_mass("CH4").unwrap();
    let air_rate = fuel_rate / m_ch4 * (2.0 / 0.21) * m_air;

    let streams = [
        Stream::new(air(), k(300.0), pa(101_325.0), kgps(air_rate)).with_name("air"),
        Stream::new(Composition::pure("CH4"), k(300.0), pa(101_325.0), kgps(fuel_rate))
            .with_name("fuel"),
    ];
    let valve = Valve::new(1.0).unwrap();
    let result = SteadyMixerSolver::new(&model)
        .solve(&streams, &valve, pa(101_325.0), &config())
        .unwrap();

    assert!(result.is_converged());
    assert!((result.state.temperature().value - 300.0).abs() < 1e-4);

    let x = model.mole_fractions(result.state.composition()).unwrap();
    let ratio = x.fraction("O2") / x.fraction("CH4");
    assert!((ratio - 2.0).abs() < 1e-9, "O2/CH4 = {ratio}");
}

#[test]
fn budget_of_one_reports_max_iterations() {
    let model = IdealGasMixture::builtin();
    let streams = [
        Stream::new(air(), k(300.0), pa(1e5), kgps(1.0)),
        Stream::new(air(), k(900.0), pa(1e5), kgps(1.0)),
    ];
    let valve = Valve::new(1.0).unwrap();
    let cfg = ConvergenceConfig::new(1e-12, 1).unwrap();
    let result = SteadyMixerSolver::new(&model)
        .solve(&streams, &valve, pa(1e5), &cfg)
        .unwrap();
    assert_eq!(result.status, ConvergenceStatus::MaxIterationsExceeded);
    assert_eq!(result.iterations, 1);
    assert_eq!(result.state.temperature().value, 600.0);
    assert!(result.residual.abs() > 1e-12);
}

#[test]
fn out_of_range_stream_temperature_is_a_property_error() {
    let model = IdealGasMixture::builtin();
    let streams = [Stream::new(air(), k(0.0), pa(1e5), kgps(1.0))];
    let valve = Valve::new(1.0).unwrap();
    let err = SteadyMixerSolver::new(&model)
        .solve(&streams, &valve, pa(1e5), &config())
        .unwrap_err();
    assert!(matches!(err, SolverError::PropertyEvaluation(_)));
}

fn two_streams(t1: f64, m1: f64, t2: f64, m2: f64) -> [Stream; 2] {
    [
        Stream::new(air(), k(t1), pa(2e5), kgps(m1)),
        Stream::new(Composition::pure("CH4"), k(t2), pa(3e5), kgps(m2)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn solve_invariants_hold(
        t1 in 250.0f64..1500.0,
        t2 in 250.0f64..1500.0,
        m1 in 0.01f64..10.0,
        m2 in 0.01f64..10.0,
        valve_k in 1e-4f64..100.0,
        p_down in 5e4f64..5e5,
    ) {
        let model = IdealGasMixture::builtin();
        let valve = Valve::new(valve_k).unwrap();
        let cfg = config();
        let streams = two_streams(t1, m1, t2, m2);
        let result = SteadyMixerSolver::new(&model)
            .solve(&streams, &valve, pa(p_down), &cfg)
            .unwrap();

        prop_assert!(result.iterations >= 1 && result.iterations <= cfg.max_iterations());
        prop_assert_eq!(result.status, ConvergenceStatus::Converged);

        let sum = result.state.composition().sum();
        prop_assert!((sum - 1.0).abs() < 1e-9);

        prop_assert_eq!(result.state.pressure().value, p_down + (m1 + m2) / valve_k);

        let h = model
            .evaluate_enthalpy(
                result.state.temperature(),
                result.state.pressure(),
                result.state.composition(),
            )
            .unwrap();
        let scale = result.target_enthalpy.abs().max(1.0);
        prop_assert!(((h - result.target_enthalpy) / scale).abs() <= cfg.tolerance());

        let t_mix = result.state.temperature().value;
        prop_assert!(t_mix >= t1.min(t2) - 1e-6 && t_mix <= t1.max(t2) + 1e-6);
    }

    #[test]
    fn stream_order_does_not_matter(
        t1 in 250.0f64..1500.0,
        t2 in 250.0f64..1500.0,
        m1 in 0.01f64..10.0,
        m2 in 0.01f64..10.0,
    ) {
        let model = IdealGasMixture::builtin();
        let valve = Valve::new(1.0).unwrap();
        let [a, b] = two_streams(t1, m1, t2, m2);
        let solver = SteadyMixerSolver::new(&model);

        let ab = solver.solve(&[a.clone(), b.clone()], &valve, pa(1e5), &config()).unwrap();
        let ba = solver.solve(&[b, a], &valve, pa(1e5), &config()).unwrap();

        let t_ab = ab.state.temperature().value;
        let t_ba = ba.state.temperature().value;
        prop_assert!((t_ab - t_ba).abs() <= 1e-9 * t_ab);
        prop_assert_eq!(ab.state.pressure().value, ba.state.pressure().value);
        for species in ["O2", "N2", "AR", "CH4"] {
            let d = ab.state.composition().fraction(species)
                - ba.state.composition().fraction(species);
            prop_assert!(d.abs() < 1e-12);
        }
    }

    #[test]
    fn identical_streams_converge_at_guess(
        t in 250.0f64..1500.0,
        m in 0.01f64..10.0,
        n in 1usize..5,
    ) {
        let model = IdealGasMixture::builtin();
        let valve = Valve::new(2.0).unwrap();
        let streams: Vec<Stream> = (0..n)
            .map(|_| Stream::new(air(), k(t), pa(1e5), kgps(m)))
            .collect();
        let result = SteadyMixerSolver::new(&model)
            .solve(&streams, &valve, pa(1e5), &config())
            .unwrap();
        prop_assert_eq!(result.iterations, 1);
        prop_assert!((result.state.temperature().value - t).abs() <= 1e-9 * t);
    }
}
