//! Named fluid property bundles.
//!
//! Values are SI: rest density in kg/m^3, dynamic viscosity in Pa s. The
//! gas constant is the EOS stiffness, tuned per fluid for stable behavior
//! at interactive time steps rather than taken from tables.

use sphlab_core::FluidProperties;

use crate::error::SolverError;

fn preset(
    name: &str,
    rest_density: f32,
    viscosity: f32,
    gas_constant: f32,
    color: [f32; 3],
) -> FluidProperties {
    FluidProperties {
        name: name.to_string(),
        rest_density,
        viscosity,
        gas_constant,
        color,
    }
}

/// Water at room temperature.
pub fn water() -> FluidProperties {
    preset("Water", 1000.0, 0.001, 2000.0, [0.2, 0.5, 1.0])
}

/// Light machine oil, ~5 cP.
pub fn oil_light() -> FluidProperties {
    preset("Light Oil", 850.0, 0.005, 1500.0, [0.8, 0.6, 0.2])
}

/// Medium oil, ~20 cP.
pub fn oil_medium() -> FluidProperties {
    preset("Medium Oil", 900.0, 0.02, 1500.0, [0.7, 0.5, 0.1])
}

/// Heavy oil, ~100 cP.
pub fn oil_heavy() -> FluidProperties {
    preset("Heavy Oil", 950.0, 0.1, 1500.0, [0.3, 0.2, 0.1])
}

/// Honey. Extremely viscous.
pub fn honey() -> FluidProperties {
    preset("Honey", 1420.0, 10.0, 2500.0, [1.0, 0.7, 0.0])
}

/// Glycerin.
pub fn glycerin() -> FluidProperties {
    preset("Glycerin", 1260.0, 1.5, 2200.0, [0.9, 0.9, 0.95])
}

/// Mercury. Denser than anything else in the catalog by an order of
/// magnitude; pair it with a stiff gas constant or it compresses badly.
pub fn mercury() -> FluidProperties {
    preset("Mercury", 13534.0, 0.0015, 5000.0, [0.7, 0.7, 0.8])
}

/// Whole milk.
pub fn milk() -> FluidProperties {
    preset("Milk", 1030.0, 0.002, 2000.0, [1.0, 1.0, 0.95])
}

/// Blood at body temperature.
pub fn blood() -> FluidProperties {
    preset("Blood", 1060.0, 0.004, 2100.0, [0.8, 0.1, 0.1])
}

/// All catalog presets, in a stable order.
pub fn all() -> Vec<FluidProperties> {
    vec![
        water(),
        oil_light(),
        oil_medium(),
        oil_heavy(),
        honey(),
        glycerin(),
        mercury(),
        milk(),
        blood(),
    ]
}

/// Case-insensitive catalog lookup; spaces and underscores are
/// interchangeable ("light oil" == "Light_Oil").
pub fn by_name(name: &str) -> Result<FluidProperties, SolverError> {
    let wanted = name.to_lowercase().replace('_', " ");
    all()
        .into_iter()
        .find(|f| f.name.to_lowercase() == wanted)
        .ok_or_else(|| SolverError::InvalidConfig(format!("unknown fluid preset: {name}")))
}

/// Build a custom fluid with validated properties.
pub fn custom(
    name: &str,
    rest_density: f32,
    viscosity: f32,
    gas_constant: f32,
    color: [f32; 3],
) -> Result<FluidProperties, SolverError> {
    let fluid = preset(name, rest_density, viscosity, gas_constant, color);
    validate(&fluid)?;
    Ok(fluid)
}

/// Check a fluid definition; used for both custom fluids and injection.
pub fn validate(fluid: &FluidProperties) -> Result<(), SolverError> {
    if !(fluid.rest_density > 0.0) {
        return Err(SolverError::InvalidConfig(format!(
            "fluid {:?}: rest_density must be positive",
            fluid.name
        )));
    }
    if !(fluid.viscosity >= 0.0) {
        return Err(SolverError::InvalidConfig(format!(
            "fluid {:?}: viscosity must be non-negative",
            fluid.name
        )));
    }
    if !(fluid.gas_constant > 0.0) {
        return Err(SolverError::InvalidConfig(format!(
            "fluid {:?}: gas_constant must be positive",
            fluid.name
        )));
    }
    Ok(())
}
