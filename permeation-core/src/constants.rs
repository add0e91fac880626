//! Physical constants shared with the transport engine. All SI except the
//! Boltzmann constant, which is in eV/K because activation energies are in eV.

/// Boltzmann constant (eV/K), matching the transport engine.
pub const K_B: f64 = 8.6173303e-5;

/// Universal gas constant (J/mol/K).
pub const GAS_CONSTANT: f64 = 8.314;

/// Avogadro's number (1/mol).
pub const AVOGADRO: f64 = 6.022e23;
