use clap::Parser;
use log::{debug, info};
use util::{Common, Error, Part, Result};

type Mass = u32;

fn mass_to_fuel(mass: Mass) -> Mass {
    (mass / 3).saturating_sub(2)
}

#[test]
fn puzzle_examples() {
    assert_eq!(mass_to_fuel(12), 2);
    assert_eq!(mass_to_fuel(14), 2);
    assert_eq!(mass_to_fuel(1969), 654);
    assert_eq!(mass_to_fuel(100756), 33583);
}

#[test]
fn too_light_for_fuel() {
    assert_eq!(mass_to_fuel(0), 0);
    assert_eq!(mass_to_fuel(2), 0);
    assert_eq!(mass_to_fuel(5), 0);
    assert_eq!(mass_to_fuel(8), 0);
    assert_eq!(mass_to_fuel(9), 1);
}

fn mass_to_fuel_recursive(mass: Mass) -> Mass {
    std::iter::successors(Some(mass), |&mass| Some(mass_to_fuel(mass)).filter(|&f| f > 0))
        .skip(1) // The module itself is not fuel
        .sum()
}

#[test]
fn puzzle_examples_recursive() {
    assert_eq!(mass_to_fuel_recursive(14), 2);
    assert_eq!(mass_to_fuel_recursive(1969), 966);
    assert_eq!(mass_to_fuel_recursive(100756), 50346);
    assert_eq!(mass_to_fuel_recursive(5), 0);
}

fn parse_masses(input: &str) -> Result<Vec<Mass>> {
    input
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| {
            l.parse::<Mass>()
                .map_err(|e| Error::from(format!("`{}` is not a valid mass: {}", l, e)))
        })
        .collect()
}

fn total_fuel(masses: &[Mass], part: Part) -> Mass {
    let fuel: fn(Mass) -> Mass = match part {
        Part::One => mass_to_fuel,
        Part::Two => mass_to_fuel_recursive,
    };
    masses.iter().copied().map(fuel).sum()
}

#[test]
fn totals() -> Result<()> {
    let masses = parse_masses("12\n14\n1969\n100756\n")?;
    assert_eq!(total_fuel(&masses, Part::One), 2 + 2 + 654 + 33583);
    assert_eq!(total_fuel(&masses, Part::Two), 2 + 2 + 966 + 50346);
    Ok(())
}

#[test]
fn malformed_masses() {
    assert!(parse_masses("12\nheavy\n").is_err());
    assert!(parse_masses("-4").is_err());
}

/// The Tyranny of the Rocket Equation
#[derive(Debug, Parser)]
struct Cli {
    #[command(flatten)]
    common: Common,
}

fn main() -> Result<()> {
    util::init_logging()?;
    let cli = Cli::parse();

    let masses = parse_masses(&cli.common.read_input()?)?;
    debug!("Loaded {} module masses", masses.len());

    let fuel = total_fuel(&masses, cli.common.part);
    info!("Part {:?} needs {} fuel", cli.common.part, fuel);
    println!("{}", fuel);

    Ok(())
}
