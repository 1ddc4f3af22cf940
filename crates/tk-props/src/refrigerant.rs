//! Refrigerant identifiers.

use crate::error::PropertyError;
use std::fmt;

/// Working fluids available to the refrigeration cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Refrigerant {
    /// 1,1,1,2-Tetrafluoroethane
    #[default]
    R134a,
    /// Difluoromethane
    R32,
    /// 2,3,3,3-Tetrafluoropropene
    R1234yf,
    /// Ammonia (NH₃)
    R717,
    /// Water (H₂O)
    R718,
}

impl Refrigerant {
    pub const ALL: [Refrigerant; 5] = [
        Refrigerant::R134a,
        Refrigerant::R32,
        Refrigerant::R1234yf,
        Refrigerant::R717,
        Refrigerant::R718,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Refrigerant::R134a => "R134a",
            Refrigerant::R32 => "R32",
            Refrigerant::R1234yf => "R1234yf",
            Refrigerant::R717 => "R717",
            Refrigerant::R718 => "R718",
        }
    }

    /// Map to rfluids Pure enum (internal use for CoolProp backend).
    pub(crate) fn rfluids_pure(&self) -> rfluids::substance::Pure {
        use rfluids::substance::Pure;
        match self {
            Refrigerant::R134a => Pure::R134a,
            Refrigerant::R32 => Pure::R32,
            Refrigerant::R1234yf => Pure::R1234yf,
            Refrigerant::R717 => Pure::Ammonia,
            Refrigerant::R718 => Pure::Water,
        }
    }
}

impl fmt::Display for Refrigerant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Refrigerant {
    type Err = PropertyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "R134A" | "R-134A" => Ok(Refrigerant::R134a),
            "R32" | "R-32" => Ok(Refrigerant::R32),
            "R1234YF" | "R-1234YF" => Ok(Refrigerant::R1234yf),
            "R717" | "R-717" | "NH3" | "AMMONIA" => Ok(Refrigerant::R717),
            "R718" | "R-718" | "H2O" | "WATER" => Ok(Refrigerant::R718),
            _ => Err(PropertyError::UnknownRefrigerant {
                name: s.to_string(),
            }),
        }
    }
}
