//! molsong demo CLI
//!
//! Looks a SMILES string up in the bundled property table, prints the derived
//! theme, and (with the `streaming` feature) plays it on the system audio
//! device.

use anyhow::{bail, Context, Result};
use molsong::{PlaybackController, PropertySource, TablePropertySource, Theme};
use std::env;

struct Args {
    smiles: String,
    info: bool,
    variant: bool,
}

fn print_usage() {
    eprintln!("Usage: molsong [OPTIONS] <SMILES>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --info       print the full theme as JSON");
    eprintln!("  --variant    regenerate a time-salted variant theme");
    eprintln!("  -h, --help   show this help");
    eprintln!();
    eprintln!("Known molecules (bundled property table):");
    for smiles in TablePropertySource::known_smiles() {
        eprintln!("  {smiles}");
    }
}

fn parse_args() -> Result<Args> {
    let mut smiles = None;
    let mut info = false;
    let mut variant = false;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--info" => info = true,
            "--variant" => variant = true,
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            other if other.starts_with('-') => {
                print_usage();
                bail!("unknown option: {other}");
            }
            other => {
                if smiles.replace(other.to_string()).is_some() {
                    print_usage();
                    bail!("expected exactly one SMILES argument");
                }
            }
        }
    }

    let Some(smiles) = smiles else {
        print_usage();
        bail!("missing SMILES argument");
    };
    Ok(Args {
        smiles,
        info,
        variant,
    })
}

/// Render the 16-slot grid: occupied slots as `#`, rests as `.`, click
/// downbeats marked `!` underneath.
fn print_grid(theme: &Theme) {
    let pattern: String = theme
        .slots
        .iter()
        .map(|slot| if slot.is_note() { '#' } else { '.' })
        .collect();
    println!("  grid:  |{}|", pattern);
    println!("  beats: |!...!...!...!...|");
}

fn main() -> Result<()> {
    let args = parse_args()?;

    let source = TablePropertySource::new();
    let props = source
        .compute_properties(&args.smiles)
        .context("property lookup failed")?;

    println!("Molecule: {}", args.smiles);
    println!(
        "  weight ~{:.2} g/mol, {} atoms, {} bonds, {} rings",
        props.molecular_weight, props.atom_count, props.bond_count, props.ring_count
    );

    let mut controller = PlaybackController::new(source);
    let theme = if args.variant {
        controller.regenerate(&args.smiles)?
    } else {
        controller.ensure_theme(&args.smiles)?
    };

    println!("Theme: {}", theme.theme_id);
    println!(
        "  {} BPM, root pitch {}, {} of 16 slots occupied",
        theme.tempo_bpm,
        theme.root_pitch,
        theme.note_count()
    );
    print_grid(theme);

    if args.info {
        println!("{}", serde_json::to_string_pretty(theme)?);
    }

    #[cfg(feature = "streaming")]
    {
        controller.play().context("playback failed")?;
        println!("Playing... (4 grid repeats, then exit)");
        controller.wait_for_finish();
    }

    #[cfg(not(feature = "streaming"))]
    eprintln!(
        "Audio output disabled. Rebuild with `--features streaming` to hear the theme."
    );

    Ok(())
}
