//! Molecular property records and the upstream calculator boundary
//!
//! Chemistry is not this crate's business. The property calculator is an
//! opaque capability interface: any implementation of [`PropertySource`] is
//! substitutable, which keeps the theme engine testable with a stub source and
//! zero chemistry dependencies. Failures surface as a direct result at the
//! boundary (no callback pairs) and are propagated, never masked — a theme is
//! never built from silently zeroed properties.

use crate::{MolsongError, Result};
use serde::{Deserialize, Serialize};

/// Approximate molecular properties for one analyzed molecule.
///
/// Produced once per analysis by the upstream calculator and treated as
/// immutable afterwards. All counts are non-negative; the weight is an
/// approximation and only ever used for seeding, so chemistry-grade accuracy
/// is irrelevant here.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    /// Approximate molecular weight in g/mol (>= 0)
    pub molecular_weight: f64,
    /// Total atom count (including implicit hydrogens, if the source adds them)
    pub atom_count: u32,
    /// Total bond count
    pub bond_count: u32,
    /// Number of rings
    pub ring_count: u32,
}

/// Upstream collaborator that computes properties for a SMILES string.
///
/// Implementations may fail (parse error, unknown molecule); the error is
/// reported to the caller synchronously and aborts theme construction.
pub trait PropertySource {
    /// Compute the property record for `smiles`.
    fn compute_properties(&self, smiles: &str) -> Result<PropertyRecord>;
}

/// Table-backed property source covering a handful of known molecules.
///
/// Stands in for a real chemistry library in the demo CLI and in tests. The
/// values are the approximate ones a structure-aware calculator would report
/// (weight with implicit hydrogens, ring counts from the smallest set of
/// smallest rings).
#[derive(Clone, Debug, Default)]
pub struct TablePropertySource;

/// Known molecules: (SMILES, weight, atoms, bonds, rings)
const KNOWN_MOLECULES: &[(&str, f64, u32, u32, u32)] = &[
    ("O", 18.0153, 3, 2, 0),                              // water
    ("CCO", 46.07, 9, 8, 0),                              // ethanol
    ("C1=CC=CC=C1", 78.1118, 12, 12, 1),                  // benzene
    ("CC(=O)OC1=CC=CC=C1C(=O)O", 180.16, 21, 21, 1),      // aspirin
    ("CN1C=NC2=C1C(=O)N(C(=O)N2C)C", 194.19, 24, 25, 2),  // caffeine
];

impl TablePropertySource {
    /// Create a new table-backed source.
    pub fn new() -> Self {
        Self
    }

    /// SMILES strings this source can answer for.
    pub fn known_smiles() -> impl Iterator<Item = &'static str> {
        KNOWN_MOLECULES.iter().map(|entry| entry.0)
    }
}

impl PropertySource for TablePropertySource {
    fn compute_properties(&self, smiles: &str) -> Result<PropertyRecord> {
        KNOWN_MOLECULES
            .iter()
            .find(|entry| entry.0 == smiles)
            .map(|&(_, molecular_weight, atom_count, bond_count, ring_count)| PropertyRecord {
                molecular_weight,
                atom_count,
                bond_count,
                ring_count,
            })
            .ok_or_else(|| {
                MolsongError::PropertyCompute(format!(
                    "unknown molecule: {smiles} (table source only knows {} entries)",
                    KNOWN_MOLECULES.len()
                ))
            })
    }
}
