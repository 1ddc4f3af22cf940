// tk-core/src/units.rs

use uom::si::f64::{
    Pressure as UomPressure, Ratio as UomRatio, TemperatureInterval as UomTemperatureInterval,
    ThermodynamicTemperature as UomThermodynamicTemperature,
};

// Public canonical unit types (SI, f64)
pub type Pressure = UomPressure;
pub type Ratio = UomRatio;
pub type TempInterval = UomTemperatureInterval;
pub type Temperature = UomThermodynamicTemperature;

/// Specific enthalpy [kJ/kg].
///
/// Not part of uom's standard set, so we use f64 with clear documentation.
pub type SpecEnthalpy = f64;

/// Specific entropy [kJ/(kg·K)].
pub type SpecEntropy = f64;

/// Specific volume [m³/kg].
pub type SpecVolume = f64;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn kpa(v: f64) -> Pressure {
    use uom::si::pressure::kilopascal;
    Pressure::new::<kilopascal>(v)
}

#[inline]
pub fn mpa(v: f64) -> Pressure {
    use uom::si::pressure::megapascal;
    Pressure::new::<megapascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

/// Pressure in pascal.
#[inline]
pub fn to_pa(p: Pressure) -> f64 {
    use uom::si::pressure::pascal;
    p.get::<pascal>()
}

/// Temperature in kelvin.
#[inline]
pub fn to_k(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::kelvin;
    t.get::<kelvin>()
}

pub mod constants {
    /// Offset between the Celsius and Kelvin scales.
    pub const ZERO_CELSIUS_K: f64 = 273.15;

    /// Specific gas constant of dry air [kJ/(kg·K)].
    pub const R_AIR_KJ_PER_KG_K: f64 = 0.287;

    /// Heat capacity ratio of dry air near ambient temperature.
    pub const GAMMA_AIR: f64 = 1.4;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _p = pa(101_325.0);
        let _t = k(300.0);
        let _r = unitless(0.5);
    }

    #[test]
    fn pressure_scales_agree() {
        assert!((to_pa(kpa(75.0)) - 75_000.0).abs() < 1e-9);
        assert!((to_pa(mpa(3.0)) - 3.0e6).abs() < 1e-6);
        assert!((to_k(k(623.15)) - 623.15).abs() < 1e-12);
    }
}
