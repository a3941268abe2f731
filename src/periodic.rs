//! Tabulated elemental properties keyed by atomic number.
//!
//! The fingerprint generators consume elemental data (masses, covalent radii,
//! electronegativities) through this module. Lookups are pure and
//! deterministic: an atomic number outside the tabulated range fails with
//! [`PeriodicError::UnknownElement`], and a property name outside the
//! recognized set fails with [`PeriodicError::UnknownProperty`]. A property
//! that is recognized but has no measured value for a given element (e.g.
//! noble-gas electronegativity) yields `f64::NAN` rather than an error.

use std::collections::BTreeMap;

use thiserror::Error;

/// Errors from elemental property lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodicError {
    /// The atomic number has no tabulated entry.
    #[error("no tabulated data for atomic number {number}")]
    UnknownElement {
        /// The offending atomic number.
        number: u8,
    },

    /// The requested property name is not recognized.
    #[error("unknown elemental property: '{name}'")]
    UnknownProperty {
        /// The offending property name.
        name: String,
    },
}

/// Properties returned for every element, in this order.
pub const DEFAULT_PROPERTIES: [&str; 6] = [
    "atomic_number",
    "atomic_mass",
    "covalent_radius",
    "electronegativity",
    "period",
    "group",
];

/// Additional properties available by name.
pub const EXTRA_PROPERTIES: [&str; 2] = ["ionization_energy", "electron_affinity"];

// (symbol, atomic mass [u], covalent radius [Å, Cordero], Pauling
// electronegativity, first ionization energy [eV], electron affinity [eV]).
// Indexed by atomic number - 1, H through Cm.
#[rustfmt::skip]
static ELEMENTS: [(&str, f64, f64, Option<f64>, Option<f64>, Option<f64>); 96] = [
    ("H",  1.008,   0.31, Some(2.20), Some(13.598), Some(0.754)),
    ("He", 4.0026,  0.28, None,       Some(24.587), None),
    ("Li", 6.94,    1.28, Some(0.98), Some(5.392),  Some(0.618)),
    ("Be", 9.0122,  0.96, Some(1.57), Some(9.323),  None),
    ("B",  10.81,   0.84, Some(2.04), Some(8.298),  Some(0.280)),
    ("C",  12.011,  0.76, Some(2.55), Some(11.260), Some(1.262)),
    ("N",  14.007,  0.71, Some(3.04), Some(14.534), None),
    ("O",  15.999,  0.66, Some(3.44), Some(13.618), Some(1.461)),
    ("F",  18.998,  0.57, Some(3.98), Some(17.423), Some(3.401)),
    ("Ne", 20.18,   0.58, None,       Some(21.565), None),
    ("Na", 22.99,   1.66, Some(0.93), Some(5.139),  Some(0.548)),
    ("Mg", 24.305,  1.41, Some(1.31), Some(7.646),  None),
    ("Al", 26.982,  1.21, Some(1.61), Some(5.986),  Some(0.433)),
    ("Si", 28.085,  1.11, Some(1.90), Some(8.152),  Some(1.390)),
    ("P",  30.974,  1.07, Some(2.19), Some(10.487), Some(0.746)),
    ("S",  32.06,   1.05, Some(2.58), Some(10.360), Some(2.077)),
    ("Cl", 35.45,   1.02, Some(3.16), Some(12.968), Some(3.613)),
    ("Ar", 39.948,  1.06, None,       Some(15.760), None),
    ("K",  39.098,  2.03, Some(0.82), Some(4.341),  Some(0.501)),
    ("Ca", 40.078,  1.76, Some(1.00), Some(6.113),  Some(0.025)),
    ("Sc", 44.956,  1.70, Some(1.36), Some(6.561),  Some(0.188)),
    ("Ti", 47.867,  1.60, Some(1.54), Some(6.828),  Some(0.079)),
    ("V",  50.942,  1.53, Some(1.63), Some(6.746),  Some(0.525)),
    ("Cr", 51.996,  1.39, Some(1.66), Some(6.767),  Some(0.666)),
    ("Mn", 54.938,  1.39, Some(1.55), Some(7.434),  None),
    ("Fe", 55.845,  1.32, Some(1.83), Some(7.902),  Some(0.151)),
    ("Co", 58.933,  1.26, Some(1.88), Some(7.881),  Some(0.662)),
    ("Ni", 58.693,  1.24, Some(1.91), Some(7.640),  Some(1.156)),
    ("Cu", 63.546,  1.32, Some(1.90), Some(7.726),  Some(1.235)),
    ("Zn", 65.38,   1.22, Some(1.65), Some(9.394),  None),
    ("Ga", 69.723,  1.22, Some(1.81), Some(5.999),  Some(0.430)),
    ("Ge", 72.63,   1.20, Some(2.01), Some(7.899),  Some(1.233)),
    ("As", 74.922,  1.19, Some(2.18), Some(9.789),  Some(0.814)),
    ("Se", 78.971,  1.20, Some(2.55), Some(9.752),  Some(2.021)),
    ("Br", 79.904,  1.20, Some(2.96), Some(11.814), Some(3.364)),
    ("Kr", 83.798,  1.16, Some(3.00), Some(14.000), None),
    ("Rb", 85.468,  2.20, Some(0.82), Some(4.177),  Some(0.486)),
    ("Sr", 87.62,   1.95, Some(0.95), Some(5.695),  Some(0.048)),
    ("Y",  88.906,  1.90, Some(1.22), Some(6.217),  Some(0.307)),
    ("Zr", 91.224,  1.75, Some(1.33), Some(6.634),  Some(0.426)),
    ("Nb", 92.906,  1.64, Some(1.60), Some(6.759),  Some(0.893)),
    ("Mo", 95.96,   1.54, Some(2.16), Some(7.092),  Some(0.748)),
    ("Tc", 98.0,    1.47, Some(1.90), Some(7.280),  Some(0.550)),
    ("Ru", 101.07,  1.46, Some(2.20), Some(7.360),  Some(1.050)),
    ("Rh", 102.91,  1.42, Some(2.28), Some(7.459),  Some(1.137)),
    ("Pd", 106.42,  1.39, Some(2.20), Some(8.337),  Some(0.562)),
    ("Ag", 107.87,  1.45, Some(1.93), Some(7.576),  Some(1.302)),
    ("Cd", 112.41,  1.44, Some(1.69), Some(8.994),  None),
    ("In", 114.82,  1.42, Some(1.78), Some(5.786),  Some(0.300)),
    ("Sn", 118.71,  1.39, Some(1.96), Some(7.344),  Some(1.112)),
    ("Sb", 121.76,  1.39, Some(2.05), Some(8.608),  Some(1.046)),
    ("Te", 127.6,   1.38, Some(2.10), Some(9.010),  Some(1.971)),
    ("I",  126.9,   1.39, Some(2.66), Some(10.451), Some(3.059)),
    ("Xe", 131.29,  1.40, Some(2.60), Some(12.130), None),
    ("Cs", 132.91,  2.44, Some(0.79), Some(3.894),  Some(0.472)),
    ("Ba", 137.33,  2.15, Some(0.89), Some(5.212),  Some(0.145)),
    ("La", 138.91,  2.07, Some(1.10), Some(5.577),  Some(0.470)),
    ("Ce", 140.12,  2.04, Some(1.12), Some(5.539),  Some(0.500)),
    ("Pr", 140.91,  2.03, Some(1.13), Some(5.473),  None),
    ("Nd", 144.24,  2.01, Some(1.14), Some(5.525),  None),
    ("Pm", 145.0,   1.99, None,       Some(5.582),  None),
    ("Sm", 150.36,  1.98, Some(1.17), Some(5.644),  None),
    ("Eu", 151.96,  1.98, None,       Some(5.670),  None),
    ("Gd", 157.25,  1.96, Some(1.20), Some(6.150),  None),
    ("Tb", 158.93,  1.94, None,       Some(5.864),  None),
    ("Dy", 162.5,   1.92, Some(1.22), Some(5.939),  None),
    ("Ho", 164.93,  1.92, Some(1.23), Some(6.022),  None),
    ("Er", 167.26,  1.89, Some(1.24), Some(6.108),  None),
    ("Tm", 168.93,  1.90, Some(1.25), Some(6.184),  None),
    ("Yb", 173.05,  1.87, None,       Some(6.254),  None),
    ("Lu", 174.97,  1.87, Some(1.27), Some(5.426),  None),
    ("Hf", 178.49,  1.75, Some(1.30), Some(6.825),  None),
    ("Ta", 180.95,  1.70, Some(1.50), Some(7.550),  Some(0.322)),
    ("W",  183.84,  1.62, Some(2.36), Some(7.864),  Some(0.816)),
    ("Re", 186.21,  1.51, Some(1.90), Some(7.834),  Some(0.150)),
    ("Os", 190.23,  1.44, Some(2.20), Some(8.438),  Some(1.100)),
    ("Ir", 192.22,  1.41, Some(2.20), Some(8.967),  Some(1.564)),
    ("Pt", 195.08,  1.36, Some(2.28), Some(8.959),  Some(2.128)),
    ("Au", 196.97,  1.36, Some(2.54), Some(9.226),  Some(2.309)),
    ("Hg", 200.59,  1.32, Some(2.00), Some(10.438), None),
    ("Tl", 204.38,  1.45, Some(1.62), Some(6.108),  Some(0.200)),
    ("Pb", 207.2,   1.46, Some(2.33), Some(7.417),  Some(0.356)),
    ("Bi", 208.98,  1.48, Some(2.02), Some(7.286),  Some(0.942)),
    ("Po", 209.0,   1.40, Some(2.00), Some(8.414),  Some(1.900)),
    ("At", 210.0,   1.50, Some(2.20), Some(9.318),  Some(2.416)),
    ("Rn", 222.0,   1.50, None,       Some(10.749), None),
    ("Fr", 223.0,   2.60, Some(0.70), Some(4.073),  Some(0.470)),
    ("Ra", 226.0,   2.21, Some(0.90), Some(5.278),  None),
    ("Ac", 227.0,   2.15, Some(1.10), Some(5.170),  None),
    ("Th", 232.04,  2.06, Some(1.30), Some(6.307),  None),
    ("Pa", 231.04,  2.00, Some(1.50), Some(5.890),  None),
    ("U",  238.03,  1.96, Some(1.38), Some(6.194),  None),
    ("Np", 237.0,   1.90, Some(1.36), Some(6.266),  None),
    ("Pu", 244.0,   1.87, Some(1.28), Some(6.026),  None),
    ("Am", 243.0,   1.80, Some(1.30), Some(5.974),  None),
    ("Cm", 247.0,   1.69, Some(1.30), Some(5.992),  None),
];

fn entry(number: u8) -> Result<&'static (&'static str, f64, f64, Option<f64>, Option<f64>, Option<f64>), PeriodicError> {
    if number == 0 || number as usize > ELEMENTS.len() {
        return Err(PeriodicError::UnknownElement { number });
    }
    Ok(&ELEMENTS[number as usize - 1])
}

/// Chemical symbol for an atomic number.
pub fn symbol(number: u8) -> Result<&'static str, PeriodicError> {
    Ok(entry(number)?.0)
}

/// Standard atomic mass in unified atomic mass units.
pub fn atomic_mass(number: u8) -> Result<f64, PeriodicError> {
    Ok(entry(number)?.1)
}

/// Covalent radius in Ångströms (Cordero values).
pub fn covalent_radius(number: u8) -> Result<f64, PeriodicError> {
    Ok(entry(number)?.2)
}

/// Pauling electronegativity, or `NAN` where no value is tabulated.
pub fn electronegativity(number: u8) -> Result<f64, PeriodicError> {
    Ok(entry(number)?.3.unwrap_or(f64::NAN))
}

/// Periodic table period (row), derived from the atomic number.
pub fn period(number: u8) -> Result<u8, PeriodicError> {
    entry(number)?;
    Ok(match number {
        1..=2 => 1,
        3..=10 => 2,
        11..=18 => 3,
        19..=36 => 4,
        37..=54 => 5,
        55..=86 => 6,
        _ => 7,
    })
}

/// Periodic table group (column), derived from the atomic number.
///
/// Lanthanides and actinides are assigned group 3.
pub fn group(number: u8) -> Result<u8, PeriodicError> {
    entry(number)?;
    Ok(match number {
        1 => 1,
        2 => 18,
        3 | 11 => 1,
        4 | 12 => 2,
        5..=10 => number + 8,
        13..=18 => number,
        19..=36 => number - 18,
        37..=54 => number - 36,
        55..=56 => number - 54,
        57..=70 => 3,
        71..=86 => number - 68,
        87..=88 => number - 86,
        _ => 3,
    })
}

/// Looks up one named property for one element.
///
/// Recognized names are [`DEFAULT_PROPERTIES`] and [`EXTRA_PROPERTIES`].
pub fn property(number: u8, name: &str) -> Result<f64, PeriodicError> {
    let e = entry(number)?;
    match name {
        "atomic_number" => Ok(f64::from(number)),
        "atomic_mass" => Ok(e.1),
        "covalent_radius" => Ok(e.2),
        "electronegativity" => Ok(e.3.unwrap_or(f64::NAN)),
        "period" => Ok(f64::from(period(number)?)),
        "group" => Ok(f64::from(group(number)?)),
        "ionization_energy" => Ok(e.4.unwrap_or(f64::NAN)),
        "electron_affinity" => Ok(e.5.unwrap_or(f64::NAN)),
        _ => Err(PeriodicError::UnknownProperty {
            name: name.to_string(),
        }),
    }
}

/// Flat ordered parameter row for one element: the default properties
/// followed by any requested extras.
///
/// # Arguments
///
/// * `number` — Atomic number
/// * `extra` — Extra property names from [`EXTRA_PROPERTIES`]
///
/// # Errors
///
/// [`PeriodicError::UnknownElement`] for an untabulated atomic number,
/// [`PeriodicError::UnknownProperty`] for an unrecognized extra name.
pub fn mendeleev_params(number: u8, extra: &[&str]) -> Result<Vec<f64>, PeriodicError> {
    let mut row = Vec::with_capacity(DEFAULT_PROPERTIES.len() + extra.len());
    for name in DEFAULT_PROPERTIES {
        row.push(property(number, name)?);
    }
    for name in extra {
        if !EXTRA_PROPERTIES.contains(name) {
            return Err(PeriodicError::UnknownProperty {
                name: (*name).to_string(),
            });
        }
        row.push(property(number, name)?);
    }
    Ok(row)
}

/// Property mapping for a set of elements: atomic number → property name → value.
///
/// # Arguments
///
/// * `numbers` — Atomic numbers to look up
/// * `extra` — Extra property names from [`EXTRA_PROPERTIES`]
pub fn properties(
    numbers: &[u8],
    extra: &[&str],
) -> Result<BTreeMap<u8, BTreeMap<String, f64>>, PeriodicError> {
    let mut out = BTreeMap::new();
    for &number in numbers {
        let mut props = BTreeMap::new();
        for name in DEFAULT_PROPERTIES.iter().chain(extra.iter()) {
            if !DEFAULT_PROPERTIES.contains(name) && !EXTRA_PROPERTIES.contains(name) {
                return Err(PeriodicError::UnknownProperty {
                    name: (*name).to_string(),
                });
            }
            props.insert((*name).to_string(), property(number, name)?);
        }
        out.insert(number, props);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platinum_defaults() {
        let row = mendeleev_params(78, &[]).unwrap();
        assert_eq!(row.len(), DEFAULT_PROPERTIES.len());
        assert_eq!(row[0], 78.0);
        assert!((row[1] - 195.08).abs() < 1e-9);
        assert!((row[2] - 1.36).abs() < 1e-9);
        assert!((row[3] - 2.28).abs() < 1e-9);
        assert_eq!(row[4], 6.0);
        assert_eq!(row[5], 10.0);
    }

    #[test]
    fn extras_are_appended_in_order() {
        let row = mendeleev_params(79, &["ionization_energy"]).unwrap();
        assert_eq!(row.len(), DEFAULT_PROPERTIES.len() + 1);
        assert!((row[6] - 9.226).abs() < 1e-9);
    }

    #[test]
    fn properties_maps_every_number() {
        let map = properties(&[78, 79], &["electron_affinity"]).unwrap();
        assert_eq!(map.len(), 2);
        let au = &map[&79];
        assert_eq!(au.len(), DEFAULT_PROPERTIES.len() + 1);
        assert!((au["electron_affinity"] - 2.309).abs() < 1e-9);
    }

    #[test]
    fn unknown_element_is_rejected() {
        assert_eq!(
            mendeleev_params(0, &[]),
            Err(PeriodicError::UnknownElement { number: 0 })
        );
        assert_eq!(
            atomic_mass(120),
            Err(PeriodicError::UnknownElement { number: 120 })
        );
    }

    #[test]
    fn unknown_property_is_rejected() {
        let err = mendeleev_params(78, &["vdw_radius"]).unwrap_err();
        assert_eq!(
            err,
            PeriodicError::UnknownProperty {
                name: "vdw_radius".to_string()
            }
        );
    }

    #[test]
    fn missing_value_is_nan_not_error() {
        // Helium has no Pauling electronegativity.
        assert!(electronegativity(2).unwrap().is_nan());
    }

    #[test]
    fn groups_across_blocks() {
        assert_eq!(group(1).unwrap(), 1);
        assert_eq!(group(2).unwrap(), 18);
        assert_eq!(group(8).unwrap(), 16);
        assert_eq!(group(14).unwrap(), 14);
        assert_eq!(group(26).unwrap(), 8);
        assert_eq!(group(78).unwrap(), 10);
        assert_eq!(group(79).unwrap(), 11);
        assert_eq!(group(64).unwrap(), 3);
    }

    #[test]
    fn periods_at_boundaries() {
        assert_eq!(period(2).unwrap(), 1);
        assert_eq!(period(3).unwrap(), 2);
        assert_eq!(period(54).unwrap(), 5);
        assert_eq!(period(55).unwrap(), 6);
        assert_eq!(period(87).unwrap(), 7);
    }
}
