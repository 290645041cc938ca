// sm-core/src/units.rs

use uom::si::f64::{
    MassDensity as UomMassDensity, MassRate as UomMassRate, Pressure as UomPressure,
    ThermodynamicTemperature as UomThermodynamicTemperature, Velocity as UomVelocity,
    VolumeRate as UomVolumeRate,
};

// Public canonical unit types (SI, f64)
pub type Density = UomMassDensity;
pub type MassRate = UomMassRate;
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;
pub type Velocity = UomVelocity;
pub type VolumeRate = UomVolumeRate;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn kgps(v: f64) -> MassRate {
    use uom::si::mass_rate::kilogram_per_second;
    MassRate::new::<kilogram_per_second>(v)
}

#[inline]
pub fn m3ps(v: f64) -> VolumeRate {
    use uom::si::volume_rate::cubic_meter_per_second;
    VolumeRate::new::<cubic_meter_per_second>(v)
}

#[inline]
pub fn kgpm3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

pub mod constants {
    /// Standard atmosphere [Pa]
    pub const ONE_ATM_PA: f64 = 101_325.0;

    /// Universal gas constant [J/(kmol·K)]
    pub const R_UNIVERSAL: f64 = 8_314.462_618;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _p = pa(101_325.0);
        let _t = k(300.0);
        let _mdot = kgps(1.2);
        let _vdot = m3ps(2.5);
        let _rho = kgpm3(1.2);
        let _a = mps(340.0);
    }

    #[test]
    fn mass_rate_over_volume_rate_is_density() {
        let rho: Density = kgps(2.4) / m3ps(2.0);
        assert!((rho.value - 1.2).abs() < 1e-12);
    }
}
