use clap::Parser;
use itertools::Itertools;
use log::{debug, info};
use std::collections::BTreeMap;
use std::str::FromStr;
use util::{Common, Error, Part, Result};

type Position = (i32, i32);
type Steps = u32;

const ORIGIN: Position = (0, 0);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Direction {
    U(i32),
    D(i32),
    L(i32),
    R(i32),
}

use Direction::*;

impl Direction {
    fn line_from(&self, start: Position) -> Box<dyn Iterator<Item = Position>> {
        let (x, y) = start;

        match *self {
            U(d) => Box::new((1..=d).map(move |d| (x, y + d))),
            D(d) => Box::new((1..=d).map(move |d| (x, y - d))),
            R(d) => Box::new((1..=d).map(move |d| (x + d, y))),
            L(d) => Box::new((1..=d).map(move |d| (x - d, y))),
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if !s.is_char_boundary(1) {
            return Err(format!("`{}` is not a valid move", s).into());
        }

        let (c, v) = s.split_at(1);
        let v = v
            .parse()
            .map_err(|e| format!("`{}` has an invalid length: {}", s, e))?;
        Ok(match c {
            "U" => U(v),
            "D" => D(v),
            "L" => L(v),
            "R" => R(v),
            x => return Err(format!("{} is not a valid direction", x).into()),
        })
    }
}

#[test]
fn parsing() {
    assert_eq!("R75".parse::<Direction>().unwrap(), R(75));
    assert_eq!("D30".parse::<Direction>().unwrap(), D(30));
    assert_eq!("U83".parse::<Direction>().unwrap(), U(83));
    assert_eq!("L12".parse::<Direction>().unwrap(), L(12));

    assert!("X3".parse::<Direction>().is_err());
    assert!("R".parse::<Direction>().is_err());
    assert!("Rfour".parse::<Direction>().is_err());
    assert!("".parse::<Direction>().is_err());
}

/// Every cell the wire enters, mapped to the step count of its first visit.
fn points(directions: impl IntoIterator<Item = Direction>) -> BTreeMap<Position, Steps> {
    let mut position = ORIGIN;
    let mut visited = BTreeMap::new();
    let mut steps = 0;

    for direction in directions {
        for point in direction.line_from(position) {
            steps += 1;
            visited.entry(point).or_insert(steps);
            position = point;
        }
    }

    visited
}

#[test]
fn path_points() {
    assert_eq!(points(vec![R(1)]).into_iter().collect::<Vec<_>>(), [((1, 0), 1)]);
    assert_eq!(
        points(vec![L(3)]).into_iter().collect::<Vec<_>>(),
        [((-3, 0), 3), ((-2, 0), 2), ((-1, 0), 1)],
    );

    // The origin is entered again, and the first visit to (0, 1) wins
    let p = points(vec![U(1), D(1), U(1)]);
    assert_eq!(p[&(0, 1)], 1);
    assert_eq!(p[&ORIGIN], 2);
}

/// Cells shared by every wire, with the wires' first-visit steps summed.
fn all_intersections(
    wires: impl IntoIterator<Item = impl IntoIterator<Item = Direction>>,
) -> Option<BTreeMap<Position, Steps>> {
    wires
        .into_iter()
        .map(points)
        .fold1(|intersections, wire| {
            intersections
                .into_iter()
                .filter_map(|(p, s)| wire.get(&p).map(|w| (p, s + w)))
                .collect()
        })
        .map(|mut intersections| {
            intersections.remove(&ORIGIN);
            intersections
        })
}

fn distance_from_origin(position: Position) -> i32 {
    let (x, y) = position;
    x.abs() + y.abs()
}

#[test]
fn manhattan() {
    assert_eq!(distance_from_origin((3, 3)), 6);
    assert_eq!(distance_from_origin((-3, 3)), 6);
    assert_eq!(distance_from_origin((3, -3)), 6);
    assert_eq!(distance_from_origin((-3, -3)), 6);
}

fn closest_intersection(
    wires: impl IntoIterator<Item = impl IntoIterator<Item = Direction>>,
) -> Option<i32> {
    all_intersections(wires)?
        .keys()
        .copied()
        .map(distance_from_origin)
        .min()
}

fn fewest_steps(
    wires: impl IntoIterator<Item = impl IntoIterator<Item = Direction>>,
) -> Option<Steps> {
    all_intersections(wires)?.values().copied().min()
}

#[cfg(test)]
fn small_example() -> Vec<Vec<Direction>> {
    vec![vec![R(8), U(5), L(5), D(3)], vec![U(7), R(6), D(4), L(4)]]
}

#[cfg(test)]
fn medium_example() -> Vec<Vec<Direction>> {
    vec![
        vec![R(75), D(30), R(83), U(83), L(12), D(49), R(71), U(7), L(72)],
        vec![U(62), R(66), U(55), R(34), D(71), R(55), D(58), R(83)],
    ]
}

#[cfg(test)]
fn large_example() -> Vec<Vec<Direction>> {
    vec![
        vec![R(98), U(47), R(26), D(63), R(33), U(87), L(62), D(20), R(33), U(53), R(51)],
        vec![U(98), R(91), D(20), R(16), D(67), R(40), U(7), R(15), U(6), R(7)],
    ]
}

#[test]
fn intersections() {
    let found = all_intersections(small_example()).unwrap();
    assert_eq!(found.keys().copied().collect::<Vec<_>>(), [(3, 3), (6, 5)]);
    assert_eq!(found[&(3, 3)], 40);
    assert_eq!(found[&(6, 5)], 30);
}

#[test]
fn distance() {
    assert_eq!(closest_intersection(small_example()), Some(6));
    assert_eq!(closest_intersection(medium_example()), Some(159));
    assert_eq!(closest_intersection(large_example()), Some(135));
}

#[test]
fn steps() {
    assert_eq!(fewest_steps(small_example()), Some(30));
    assert_eq!(fewest_steps(medium_example()), Some(610));
    assert_eq!(fewest_steps(large_example()), Some(410));
}

#[test]
fn first_visit_counts() {
    // The first wire passes (1, 0) at step 1 and again at step 3
    let wires = vec![vec![R(2), L(1), U(1)], vec![D(1), R(1), U(1)]];
    assert_eq!(fewest_steps(wires), Some(1 + 3));
}

#[test]
fn no_crossing() {
    // Crossing itself does not count
    let wires = vec![vec![R(2), U(1), L(1), D(2)], vec![U(5)]];
    assert_eq!(closest_intersection(wires.clone()), None);
    assert_eq!(fewest_steps(wires), None);

    // Nor does meeting back at the origin
    let wires = vec![vec![R(1), L(1)], vec![U(1), D(1)]];
    assert_eq!(closest_intersection(wires.clone()), None);
    assert_eq!(fewest_steps(wires), None);
}

fn parse_wires(input: &str) -> Result<Vec<Vec<Direction>>> {
    let wires = input
        .trim()
        .lines()
        .map(|l| l.trim().split(',').map(str::parse).collect())
        .collect::<Result<Vec<Vec<_>>>>()?;

    if wires.len() < 2 {
        return Err(format!("Expected at least two wires, found {}", wires.len()).into());
    }

    Ok(wires)
}

#[test]
fn wire_input() -> Result<()> {
    let wires = parse_wires("R8,U5,L5,D3\nU7,R6,D4,L4\n")?;
    assert_eq!(wires, small_example());

    assert!(parse_wires("R8,U5").is_err());
    assert!(parse_wires("R8,U5\nU7,Q6").is_err());
    Ok(())
}

/// Crossed Wires
#[derive(Debug, Parser)]
struct Cli {
    #[command(flatten)]
    common: Common,
}

fn main() -> Result<()> {
    util::init_logging()?;
    let cli = Cli::parse();

    let wires = parse_wires(&cli.common.read_input()?)?;
    debug!("Loaded {} wires", wires.len());

    let answer = match cli.common.part {
        Part::One => closest_intersection(wires).map(|d| d as u32),
        Part::Two => fewest_steps(wires),
    };
    let answer = answer.ok_or("The wires never cross")?;

    info!("Part {:?} answer is {}", cli.common.part, answer);
    println!("{}", answer);

    Ok(())
}
