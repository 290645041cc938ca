//! Inlet stream definition.

use crate::error::{SolverError, SolverResult};
use sm_core::units::{MassRate, Pressure, Temperature, VolumeRate, kgps};
use sm_fluids::{Composition, FluidModel};

/// A fixed inlet: composition, temperature, pressure and mass flow.
///
/// Streams are plain data. The solver checks the flow rates; the property
/// model checks temperature, pressure and species when the stream is evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    name: Option<String>,
    composition: Composition,
    temperature: Temperature,
    pressure: Pressure,
    mass_flow: MassRate,
}

impl Stream {
    pub fn new(
        composition: Composition,
        temperature: Temperature,
        pressure: Pressure,
        mass_flow: MassRate,
    ) -> Self {
        Self {
            name: None,
            composition,
            temperature,
            pressure,
            mass_flow,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Build a stream from a volumetric flow at its own (T, P).
    ///
    /// Mass flow = ρ(T, P, composition) × volume flow.
    pub fn from_volume_flow<M: FluidModel + ?Sized>(
        model: &M,
        composition: Composition,
        temperature: Temperature,
        pressure: Pressure,
        volume_flow: VolumeRate,
    ) -> SolverResult<Self> {
        let q = volume_flow.value;
        if !q.is_finite() || q < 0.0 {
            return Err(SolverError::invalid(format!(
                "volume flow must be non-negative and finite, got {q}"
            )));
        }
        let state = model.state(pressure, temperature, composition.clone())?;
        let rho = model.rho(&state)?;
        Ok(Self::new(
            composition,
            temperature,
            pressure,
            kgps(rho.value * q),
        ))
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Display label: the name, or `stream[index]` when unnamed.
    pub fn label(&self, index: usize) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("stream[{index}]"),
        }
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    pub fn pressure(&self) -> Pressure {
        self.pressure
    }

    pub fn mass_flow(&self) -> MassRate {
        self.mass_flow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sm_core::units::{k, m3ps, pa};
    use sm_fluids::IdealGasMixture;

    #[test]
    fn builder_and_getters() {
        let s = Stream::new(Composition::pure("N2"), k(300.0), pa(1e5), kgps(2.0)).with_name("n2");
        assert_eq!(s.name(), Some("n2"));
        assert_eq!(s.label(3), "n2");
        assert_eq!(s.mass_flow().value, 2.0);
        assert_eq!(s.temperature().value, 300.0);
        assert_eq!(s.pressure().value, 1e5);
        assert_eq!(s.composition().is_pure(), Some("N2"));
    }

    #[test]
    fn unnamed_label_uses_index() {
        let s = Stream::new(Composition::pure("N2"), k(300.0), pa(1e5), kgps(2.0));
        assert_eq!(s.label(1), "stream[1]");
    }

    #[test]
    fn volume_flow_uses_density() {
        let model = IdealGasMixture::builtin();
        let comp = Composition::pure("N2");
        let s = Stream::from_volume_flow(&model, comp.clone(), k(300.0), pa(101_325.0), m3ps(2.0))
            .unwrap();
        let state = model.state(pa(101_325.0), k(300.0), comp).unwrap();
        let rho = model.rho(&state).unwrap().value;
        assert!((s.mass_flow().value - 2.0 * rho).abs() < 1e-12);
    }

    #[test]
    fn volume_flow_rejects_negative_and_bad_state() {
        let model = IdealGasMixture::builtin();
        let neg = Stream::from_volume_flow(
            &model,
            Composition::pure("N2"),
            k(300.0),
            pa(1e5),
            m3ps(-1.0),
        );
        assert!(matches!(neg, Err(SolverError::InvalidInput { .. })));

        let bad = Stream::from_volume_flow(
            &model,
            Composition::pure("N2"),
            k(-1.0),
            pa(1e5),
            m3ps(1.0),
        );
        assert!(matches!(bad, Err(SolverError::PropertyEvaluation(_))));
    }
}
