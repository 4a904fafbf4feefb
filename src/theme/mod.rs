//! Property-seeded theme generation
//!
//! Builds a symbolic 16-slot musical theme from a SMILES string and its
//! property record. Everything is derived, nothing is sampled from the
//! environment: the seed string concatenates the SMILES text with formatted
//! property values, FNV-1a turns it into a 32-bit seed, and a mulberry32
//! stream fills the grid.
//!
//! **The per-slot draw order is part of the format.** Each slot consumes one
//! occupancy draw; occupied slots consume three more (scale degree, octave
//! shift, duration) in exactly that order. Reordering or skipping draws changes
//! every recorded theme fixture.

use crate::hash::fnv1a_32;
use crate::prng::Mulberry32;
use crate::properties::PropertyRecord;
use serde::{Deserialize, Serialize};

/// Number of grid slots in a theme
pub const GRID_SLOTS: usize = 16;

/// Lowest root pitch (A2); roots span two octaves upward from here
pub const BASE_ROOT_PITCH: i32 = 45;

/// Semitone window the root is mapped into above [`BASE_ROOT_PITCH`]
const ROOT_WINDOW_SEMITONES: f64 = 24.0;

/// Tempo bounds in BPM
pub const TEMPO_MIN: f64 = 70.0;
/// Upper tempo bound in BPM
pub const TEMPO_MAX: f64 = 120.0;

/// Note density bounds (probability a slot holds a note)
const DENSITY_MIN: f64 = 0.25;
const DENSITY_MAX: f64 = 0.55;

/// Pentatonic-minor interval set relative to the root
pub const SCALE_INTERVALS: [i32; 5] = [0, 3, 5, 7, 10];

/// Note durations in beats: the longer value wins with probability 0.65
const DURATION_LONG: f64 = 0.5;
const DURATION_SHORT: f64 = 0.25;
const LONG_DURATION_CHANCE: f64 = 0.65;

/// Octave displacement thresholds: a draw below 0.25 shifts an octave at all,
/// and below 0.1 the shift is downward instead of upward
const OCTAVE_SHIFT_CHANCE: f64 = 0.25;
const OCTAVE_DOWN_CHANCE: f64 = 0.1;

/// One pitched note on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// MIDI-like semitone number (69 = A4 = 440 Hz)
    pub pitch: i32,
    /// Duration in beats, one of {0.25, 0.5}
    pub duration_beats: f64,
}

/// A grid position: either silent or one note.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Slot {
    /// No note at this grid position
    Rest,
    /// A pitched note starting at this grid position
    Note(Note),
}

impl Slot {
    /// Returns the note if this slot holds one.
    pub fn note(&self) -> Option<&Note> {
        match self {
            Slot::Rest => None,
            Slot::Note(note) => Some(note),
        }
    }

    /// True if this slot holds a note.
    pub fn is_note(&self) -> bool {
        matches!(self, Slot::Note(_))
    }
}

/// A complete generated theme.
///
/// Immutable once built; a pure function of (SMILES, properties, optional
/// salt). Replaced wholesale on regeneration, never edited in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// The 32-bit seed the note grid was drawn from
    pub seed: u32,
    /// Tempo in BPM, clamped to [70, 120]
    pub tempo_bpm: u32,
    /// Root pitch in semitones, clamped to [45, 68]
    pub root_pitch: i32,
    /// Exactly 16 grid slots
    pub slots: [Slot; GRID_SLOTS],
    /// Stable identifier derived from seed and tempo, e.g. `mol-f4392c-95`;
    /// regenerated variants carry a `-r` suffix
    pub theme_id: String,
}

impl Theme {
    /// Number of occupied (non-rest) slots.
    pub fn note_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_note()).count()
    }
}

/// Build the canonical theme for a molecule.
///
/// Pure: two calls with identical input yield bit-identical themes.
///
/// # Examples
///
/// ```
/// use molsong::{build_theme, PropertyRecord};
///
/// let props = PropertyRecord {
///     molecular_weight: 180.16,
///     atom_count: 21,
///     bond_count: 21,
///     ring_count: 1,
/// };
/// let theme = build_theme("CC(=O)OC1=CC=CC=C1C(=O)O", &props);
/// assert_eq!(theme, build_theme("CC(=O)OC1=CC=CC=C1C(=O)O", &props));
/// ```
pub fn build_theme(smiles: &str, props: &PropertyRecord) -> Theme {
    build_from_seed_string(&seed_string(smiles, props), props, false)
}

/// Build a salted variant theme for a molecule.
///
/// Same derivation as [`build_theme`] but the seed string carries the salt, so
/// repeated regeneration on identical molecular input yields audibly different
/// themes that are still fully reproducible given the salt. The variant's
/// `theme_id` is marked with a `-r` suffix.
pub fn build_theme_variant(smiles: &str, props: &PropertyRecord, salt: &str) -> Theme {
    let seeded = format!("{}#{}", seed_string(smiles, props), salt);
    build_from_seed_string(&seeded, props, true)
}

/// Seed string: SMILES plus formatted property values in fixed order/format.
///
/// `{smiles}|{weight:.4}|{atoms}|{rings}|{bonds}` — the weight keeps four
/// decimals so float formatting can never drift between call sites.
fn seed_string(smiles: &str, props: &PropertyRecord) -> String {
    format!(
        "{}|{:.4}|{}|{}|{}",
        smiles, props.molecular_weight, props.atom_count, props.ring_count, props.bond_count
    )
}

fn build_from_seed_string(seed_str: &str, props: &PropertyRecord, variant: bool) -> Theme {
    let seed = fnv1a_32(seed_str);
    let tempo_bpm = derive_tempo(props.atom_count);
    let root_pitch = derive_root_pitch(props.molecular_weight);
    let density = derive_density(props.ring_count);

    let mut rng = Mulberry32::new(seed);
    let mut slots = [Slot::Rest; GRID_SLOTS];
    for slot in slots.iter_mut() {
        *slot = draw_slot(&mut rng, root_pitch, density);
    }

    let suffix = if variant { "-r" } else { "" };
    let theme_id = format!("mol-{:06x}-{}{}", seed & 0x00FF_FFFF, tempo_bpm, suffix);

    Theme {
        seed,
        tempo_bpm,
        root_pitch,
        slots,
        theme_id,
    }
}

/// Tempo from atom count: linear map, clamped and truncated to whole BPM.
fn derive_tempo(atom_count: u32) -> u32 {
    (TEMPO_MIN + atom_count as f64 * 1.2).clamp(TEMPO_MIN, TEMPO_MAX) as u32
}

/// Root pitch from molecular weight: weight mod 200, normalized into a
/// 24-semitone window above A2.
fn derive_root_pitch(molecular_weight: f64) -> i32 {
    let normalized = (molecular_weight.max(0.0) % 200.0) / 200.0;
    BASE_ROOT_PITCH + (normalized * ROOT_WINDOW_SEMITONES) as i32
}

/// Note density from ring count.
fn derive_density(ring_count: u32) -> f64 {
    (DENSITY_MIN + ring_count as f64 * 0.08).clamp(DENSITY_MIN, DENSITY_MAX)
}

/// Draw one grid slot. Draw order is fixed: occupancy, degree, octave,
/// duration.
fn draw_slot(rng: &mut Mulberry32, root_pitch: i32, density: f64) -> Slot {
    if rng.next_f64() >= density {
        return Slot::Rest;
    }

    let degree = ((rng.next_f64() * SCALE_INTERVALS.len() as f64) as usize)
        .min(SCALE_INTERVALS.len() - 1);

    let octave_draw = rng.next_f64();
    let octave_shift = if octave_draw < OCTAVE_SHIFT_CHANCE {
        if octave_draw < OCTAVE_DOWN_CHANCE {
            -12
        } else {
            12
        }
    } else {
        0
    };

    let duration_beats = if rng.next_f64() < LONG_DURATION_CHANCE {
        DURATION_LONG
    } else {
        DURATION_SHORT
    };

    Slot::Note(Note {
        pitch: root_pitch + SCALE_INTERVALS[degree] + octave_shift,
        duration_beats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASPIRIN: &str = "CC(=O)OC1=CC=CC=C1C(=O)O";

    fn aspirin_props() -> PropertyRecord {
        PropertyRecord {
            molecular_weight: 180.16,
            atom_count: 21,
            bond_count: 21,
            ring_count: 1,
        }
    }

    #[test]
    fn test_theme_is_pure_function() {
        let props = aspirin_props();
        let a = build_theme(ASPIRIN, &props);
        let b = build_theme(ASPIRIN, &props);
        assert_eq!(a, b);
    }

    #[test]
    fn test_aspirin_golden_fixture() {
        // Recorded once; asserted exactly on every future run. Breaking this
        // test means the seed string format, hash, PRNG, or draw order moved.
        let theme = build_theme(ASPIRIN, &aspirin_props());

        assert_eq!(theme.seed, 0x93f4_392c);
        assert_eq!(theme.tempo_bpm, 95);
        assert_eq!(theme.root_pitch, 66);
        assert_eq!(theme.theme_id, "mol-f4392c-95");

        let expected = {
            let mut slots = [Slot::Rest; GRID_SLOTS];
            slots[2] = Slot::Note(Note { pitch: 69, duration_beats: 0.5 });
            slots[3] = Slot::Note(Note { pitch: 73, duration_beats: 0.5 });
            slots[6] = Slot::Note(Note { pitch: 85, duration_beats: 0.5 });
            slots[11] = Slot::Note(Note { pitch: 71, duration_beats: 0.5 });
            slots
        };
        assert_eq!(theme.slots, expected);
    }

    #[test]
    fn test_ethanol_golden_fixture() {
        let props = PropertyRecord {
            molecular_weight: 46.07,
            atom_count: 9,
            bond_count: 8,
            ring_count: 0,
        };
        let theme = build_theme("CCO", &props);
        assert_eq!(theme.tempo_bpm, 80);
        assert_eq!(theme.root_pitch, 50);
        assert_eq!(theme.theme_id, "mol-e760fe-80");
        assert_eq!(theme.note_count(), 5);
        assert_eq!(
            theme.slots[4],
            Slot::Note(Note { pitch: 53, duration_beats: 0.25 })
        );
    }

    #[test]
    fn test_grid_always_sixteen_slots() {
        // The type enforces it; keep one runtime assertion as a tripwire for
        // any future move away from the fixed-size array.
        let theme = build_theme(ASPIRIN, &aspirin_props());
        assert_eq!(theme.slots.len(), GRID_SLOTS);
    }

    #[test]
    fn test_pitches_within_documented_window() {
        // interval span (+10) plus octave shifts (+/-12) around the root
        for i in 0..200u32 {
            let props = PropertyRecord {
                molecular_weight: 10.0 + i as f64 * 3.7,
                atom_count: i % 60,
                bond_count: i % 50,
                ring_count: i % 6,
            };
            let theme = build_theme(&format!("SYN{i}"), &props);
            for note in theme.slots.iter().filter_map(Slot::note) {
                assert!(
                    (theme.root_pitch - 12..=theme.root_pitch + 22).contains(&note.pitch),
                    "pitch {} outside window around root {}",
                    note.pitch,
                    theme.root_pitch
                );
                assert!(
                    note.duration_beats == 0.25 || note.duration_beats == 0.5,
                    "unexpected duration {}",
                    note.duration_beats
                );
            }
        }
    }

    #[test]
    fn test_tempo_clamped() {
        let mut props = aspirin_props();
        props.atom_count = 0;
        assert_eq!(build_theme("X", &props).tempo_bpm, 70);
        props.atom_count = 1000;
        assert_eq!(build_theme("X", &props).tempo_bpm, 120);
        // 21 atoms: 70 + 25.2 truncates to 95
        props.atom_count = 21;
        assert_eq!(build_theme("X", &props).tempo_bpm, 95);
    }

    #[test]
    fn test_root_pitch_clamped_to_window() {
        for weight in [0.0, 0.1, 46.07, 199.99, 200.0, 180.16, 1234.5] {
            let props = PropertyRecord {
                molecular_weight: weight,
                atom_count: 10,
                bond_count: 10,
                ring_count: 0,
            };
            let root = build_theme("X", &props).root_pitch;
            assert!(
                (BASE_ROOT_PITCH..BASE_ROOT_PITCH + 24).contains(&root),
                "root {root} outside window for weight {weight}"
            );
        }
    }

    #[test]
    fn test_density_monotonic_in_expectation() {
        // More rings => denser grids on average. Per-instance it can go either
        // way; average over many synthetic molecules.
        let average_occupancy = |rings: u32| -> f64 {
            let total: usize = (0..300)
                .map(|i| {
                    let props = PropertyRecord {
                        molecular_weight: 100.0 + i as f64,
                        atom_count: 10,
                        bond_count: 10,
                        ring_count: rings,
                    };
                    build_theme(&format!("SYN{i}"), &props).note_count()
                })
                .sum();
            total as f64 / (300.0 * GRID_SLOTS as f64)
        };

        let sparse = average_occupancy(0);
        let mid = average_occupancy(2);
        let dense = average_occupancy(4);
        assert!(sparse < mid, "occupancy {sparse} !< {mid}");
        assert!(mid < dense, "occupancy {mid} !< {dense}");
        // Clamp bounds in expectation
        assert!(sparse > 0.15 && dense < 0.65);
    }

    #[test]
    fn test_variant_differs_but_obeys_clamps() {
        let props = aspirin_props();
        let canonical = build_theme(ASPIRIN, &props);
        let v1 = build_theme_variant(ASPIRIN, &props, "1");
        let v2 = build_theme_variant(ASPIRIN, &props, "2");

        assert_ne!(v1.theme_id, v2.theme_id);
        assert_ne!(v1.theme_id, canonical.theme_id);
        assert!(v1.theme_id.ends_with("-r"));
        assert_eq!(v1.theme_id, "mol-7aa4c4-95-r");
        assert_eq!(v2.theme_id, "mol-7aa97d-95-r");

        // Tempo and root derive from properties, not the salt
        for variant in [&v1, &v2] {
            assert_eq!(variant.tempo_bpm, canonical.tempo_bpm);
            assert_eq!(variant.root_pitch, canonical.root_pitch);
        }
    }

    #[test]
    fn test_variant_reproducible_given_salt() {
        let props = aspirin_props();
        assert_eq!(
            build_theme_variant(ASPIRIN, &props, "1"),
            build_theme_variant(ASPIRIN, &props, "1")
        );
    }

    #[test]
    fn test_theme_serialization_roundtrip() {
        let theme = build_theme(ASPIRIN, &aspirin_props());
        let json = serde_json::to_string(&theme).unwrap();
        let restored: Theme = serde_json::from_str(&json).unwrap();
        assert_eq!(theme, restored);
    }
}
