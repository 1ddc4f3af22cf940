//! Calculation outputs and their text/JSON/YAML renderings.

use crate::config::OutputFormat;
use crate::error::CliResult;
use serde::Serialize;
use std::fmt;
use tk_core::units::{Pressure, to_k, to_pa};
use tk_cycles::{BraytonSolution, CycleResult, Performance};
use tk_props::ThermodynamicState;
use tk_vle::{FlashResult, PxyPoint, VleResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "report", rename_all = "snake_case")]
pub enum Report {
    Cycle(CycleResult),
    Brayton(BraytonSolution),
    Vle {
        result: VleResult,
        curve: Vec<PxyPoint>,
    },
    Pxy {
        points: Vec<PxyPoint>,
    },
    Flash(FlashResult),
    Txy {
        pressure: Pressure,
        points: Vec<VleResult>,
    },
    Steam(ThermodynamicState),
}

impl Report {
    pub fn render(&self, format: OutputFormat) -> CliResult<String> {
        Ok(match format {
            OutputFormat::Text => self.to_string(),
            OutputFormat::Json => serde_json::to_string_pretty(self)?,
            OutputFormat::Yaml => serde_yaml::to_string(self)?,
        })
    }
}

fn write_state_header(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(
        f,
        "  {:>2}  {:>10}  {:>8}  {:>9}  {:>7}  {:>9}  {:>6}  phase",
        "#", "P [kPa]", "T [K]", "h [kJ/kg]", "s", "v [m3/kg]", "x"
    )
}

fn write_state(f: &mut fmt::Formatter<'_>, label: &str, s: &ThermodynamicState) -> fmt::Result {
    let v = s
        .specific_volume()
        .map(|v| format!("{v:.5}"))
        .unwrap_or_else(|| "-".into());
    let x = s
        .quality()
        .map(|x| format!("{x:.4}"))
        .unwrap_or_else(|| "-".into());
    writeln!(
        f,
        "  {:>2}  {:>10.3}  {:>8.2}  {:>9.2}  {:>7.4}  {:>9}  {:>6}  {}",
        label,
        s.pressure_pa() / 1e3,
        s.temperature_k(),
        s.enthalpy(),
        s.entropy(),
        v,
        x,
        s.phase()
    )
}

fn write_cycle(f: &mut fmt::Formatter<'_>, cycle: &CycleResult) -> fmt::Result {
    writeln!(f, "{} cycle", cycle.kind)?;
    write_state_header(f)?;
    for (i, state) in cycle.states.iter().enumerate() {
        write_state(f, &(i + 1).to_string(), state)?;
    }
    writeln!(f, "  Compression work: {:.3} kJ/kg", cycle.compression_work)?;
    writeln!(f, "  Expansion work:   {:.3} kJ/kg", cycle.expansion_work)?;
    writeln!(f, "  Net work:         {:.3} kJ/kg", cycle.net_work)?;
    writeln!(f, "  Heat input:       {:.3} kJ/kg", cycle.heat_input)?;
    writeln!(f, "  Heat output:      {:.3} kJ/kg", cycle.heat_output)?;
    match cycle.performance {
        Performance::Power {
            thermal_efficiency,
            carnot_efficiency,
            back_work_ratio,
        } => {
            writeln!(f, "  Thermal efficiency: {:.2}%", thermal_efficiency * 100.0)?;
            writeln!(f, "  Carnot efficiency:  {:.2}%", carnot_efficiency * 100.0)?;
            writeln!(f, "  Back work ratio:    {back_work_ratio:.4}")?;
        }
        Performance::Refrigeration { cop, carnot_cop } => {
            writeln!(f, "  COP:        {cop:.3}")?;
            writeln!(f, "  Carnot COP: {carnot_cop:.3}")?;
        }
    }
    if cycle.exceeds_carnot_bound() {
        writeln!(f, "  warning: performance exceeds the Carnot bound")?;
    }
    Ok(())
}

fn write_pxy(f: &mut fmt::Formatter<'_>, points: &[PxyPoint]) -> fmt::Result {
    writeln!(f, "  {:>6}  {:>12}  {:>12}", "x1", "P_bub [kPa]", "P_dew [kPa]")?;
    for p in points {
        writeln!(
            f,
            "  {:>6.3}  {:>12.4}  {:>12.4}",
            p.x1,
            p.bubble_pressure_pa() / 1e3,
            p.dew_pressure_pa() / 1e3
        )?;
    }
    Ok(())
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Cycle(cycle) => write_cycle(f, cycle),
            Report::Brayton(solution) => {
                write_cycle(f, &solution.cycle)?;
                writeln!(f, "  Isentropic T2s: {:.2} K", solution.t2s)?;
                writeln!(f, "  Isentropic T4s: {:.2} K", solution.t4s)
            }
            Report::Vle { result, curve } => {
                writeln!(f, "Bubble point at T = {:.2} K", to_k(result.temperature))?;
                writeln!(f, "  P  = {:.4} kPa", result.pressure_pa() / 1e3)?;
                writeln!(f, "  x  = ({:.4}, {:.4})", result.x1, result.x2)?;
                writeln!(f, "  y  = ({:.4}, {:.4})", result.y1, result.y2)?;
                writeln!(f, "  γ  = ({:.4}, {:.4})", result.gamma1, result.gamma2)?;
                if !curve.is_empty() {
                    writeln!(f, "Pxy curve")?;
                    write_pxy(f, curve)?;
                }
                Ok(())
            }
            Report::Pxy { points } => {
                writeln!(f, "Pxy curve")?;
                write_pxy(f, points)
            }
            Report::Flash(r) => {
                writeln!(f, "Isothermal flash at {:.4} kPa", to_pa(r.pressure) / 1e3)?;
                writeln!(f, "  Vapor fraction: {:.5}", r.vapor_fraction)?;
                writeln!(f, "  x = ({:.4}, {:.4})", r.x1, r.x2)?;
                writeln!(f, "  y = ({:.4}, {:.4})", r.y1, r.y2)?;
                writeln!(f, "  K = ({:.4}, {:.4})", r.k1, r.k2)?;
                writeln!(f, "  Iterations: {}", r.iterations)
            }
            Report::Txy { pressure, points } => {
                writeln!(f, "Txy diagram at {:.4} kPa", to_pa(*pressure) / 1e3)?;
                writeln!(f, "  {:>6}  {:>6}  {:>9}", "x1", "y1", "T [K]")?;
                for p in points {
                    writeln!(f, "  {:>6.3}  {:>6.4}  {:>9.3}", p.x1, p.y1, to_k(p.temperature))?;
                }
                Ok(())
            }
            Report::Steam(state) => {
                write_state_header(f)?;
                write_state(f, "-", state)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tk_core::units::pa;

    fn pxy() -> Report {
        Report::Pxy {
            points: vec![PxyPoint {
                x1: 0.5,
                bubble_pressure: pa(60_000.0),
                dew_pressure: pa(53_333.3),
            }],
        }
    }

    #[test]
    fn text_lists_every_point() {
        let text = pxy().render(OutputFormat::Text).unwrap();
        assert!(text.contains("Pxy curve"));
        assert!(text.contains("60.0000"));
    }

    #[test]
    fn json_is_tagged() {
        let json = pxy().render(OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["report"], "pxy");
        assert_eq!(value["points"][0]["x1"], 0.5);
    }
}
