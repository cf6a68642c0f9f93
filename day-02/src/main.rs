use clap::Parser;
use intcode::{Byte, Program};
use itertools::iproduct;
use log::{debug, info, trace};
use util::{Common, Part, Result};

const NOUN: usize = 1;
const VERB: usize = 2;
const OUTPUT: usize = 0;

const MAX_PARAMETER: Byte = 99;
const TARGET: Byte = 19690720;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct NounVerb {
    noun: Byte,
    verb: Byte,
}

impl NounVerb {
    fn encode(self) -> Byte {
        100 * self.noun + self.verb
    }
}

fn poke(memory: &mut Program, address: usize, value: Byte) -> intcode::Result<()> {
    let len = memory.len();
    let cell = memory
        .get_mut(address)
        .ok_or(intcode::Error::AddressOutOfBounds {
            address: address as Byte,
            len,
        })?;
    *cell = value;
    Ok(())
}

/// Runs a fresh copy of the program with the noun and verb substituted,
/// returning the value left at the output address.
fn run_with(program: &Program, noun: Byte, verb: Byte) -> intcode::Result<Byte> {
    let mut memory = program.to_vec();
    poke(&mut memory, NOUN, noun)?;
    poke(&mut memory, VERB, verb)?;

    intcode::execute(&mut memory)?;
    Ok(memory[OUTPUT])
}

fn search(program: &Program, target: Byte) -> intcode::Result<Option<NounVerb>> {
    debug!("Searching for {} over {} cells", target, program.len());

    for (noun, verb) in iproduct!(0..=MAX_PARAMETER, 0..=MAX_PARAMETER) {
        let output = run_with(program, noun, verb)?;
        trace!("noun {:2} verb {:2} => {}", noun, verb, output);

        if output == target {
            return Ok(Some(NounVerb { noun, verb }));
        }
    }

    Ok(None)
}

/// Gravity Assist
#[derive(Debug, Parser)]
struct Cli {
    #[command(flatten)]
    common: Common,

    /// Value the program must leave at address 0
    #[arg(long, default_value_t = TARGET)]
    target: Byte,
}

fn main() -> Result<()> {
    util::init_logging()?;
    let cli = Cli::parse();

    let program = intcode::parse_program(&cli.common.read_input()?)?;
    debug!("Loaded program of {} cells", program.len());

    let answer = match cli.common.part {
        Part::One => run_with(&program, 12, 2)?,
        Part::Two => {
            let found = search(&program, cli.target)?
                .ok_or_else(|| format!("No noun/verb pair produces {}", cli.target))?;
            debug!("Found {:?}", found);
            found.encode()
        }
    };

    info!("Part {:?} answer is {}", cli.common.part, answer);
    println!("{}", answer);

    Ok(())
}
