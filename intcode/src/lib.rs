use log::trace;
use std::convert::TryFrom;
use std::num::ParseIntError;

pub type Byte = i64;
pub type Program = [Byte];
pub type ProgramCounter = usize;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Width of every add and multiply instruction.
const STRIDE: ProgramCounter = 4;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("program is empty")]
    EmptyProgram,

    #[error("`{token}` is not an integer")]
    Parse {
        token: String,
        #[source]
        source: ParseIntError,
    },

    #[error("halt opcode not reached (pc {pc} past end of {len} cells)")]
    HaltNotReached { pc: ProgramCounter, len: usize },

    #[error("address {address} is outside memory of {len} cells")]
    AddressOutOfBounds { address: Byte, len: usize },

    #[error("unknown opcode {opcode} at pc {pc}")]
    UnknownOpcode { opcode: Byte, pc: ProgramCounter },

    #[error("arithmetic overflow at pc {pc}")]
    Overflow { pc: ProgramCounter },
}

pub fn parse_program(s: &str) -> Result<Vec<Byte>> {
    let s = s.trim();
    if s.is_empty() {
        return Err(Error::EmptyProgram);
    }

    s.split(',')
        .map(str::trim)
        .map(|token| {
            token.parse().map_err(|source| Error::Parse {
                token: token.to_owned(),
                source,
            })
        })
        .collect()
}

fn address(program: &Program, raw: Byte) -> Result<usize> {
    usize::try_from(raw)
        .ok()
        .filter(|&a| a < program.len())
        .ok_or(Error::AddressOutOfBounds {
            address: raw,
            len: program.len(),
        })
}

fn cell(program: &Program, pc: ProgramCounter) -> Result<Byte> {
    program.get(pc).copied().ok_or(Error::AddressOutOfBounds {
        address: Byte::try_from(pc).unwrap_or(Byte::MAX),
        len: program.len(),
    })
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum Operation {
    Add(usize, usize, usize),
    Multiply(usize, usize, usize),
    Halt,
}

impl Operation {
    fn decode(program: &Program, pc: ProgramCounter) -> Result<Self> {
        use Operation::*;

        let opcode = program.get(pc).copied().ok_or(Error::HaltNotReached {
            pc,
            len: program.len(),
        })?;

        Ok(match opcode {
            1 => {
                let [l, r, o] = Self::decode_three_params(program, pc)?;
                Add(l, r, o)
            }
            2 => {
                let [l, r, o] = Self::decode_three_params(program, pc)?;
                Multiply(l, r, o)
            }
            99 => Halt,
            _ => return Err(Error::UnknownOpcode { opcode, pc }),
        })
    }

    fn decode_three_params(program: &Program, pc: ProgramCounter) -> Result<[usize; 3]> {
        let l = address(program, cell(program, pc + 1)?)?;
        let r = address(program, cell(program, pc + 2)?)?;
        let o = address(program, cell(program, pc + 3)?)?;
        Ok([l, r, o])
    }

    fn execute(&self, program: &mut Program, pc: &mut ProgramCounter) -> Result<()> {
        use Operation::*;

        match *self {
            Add(l, r, o) => Self::binop(program, *pc, l, r, o, Byte::checked_add)?,
            Multiply(l, r, o) => Self::binop(program, *pc, l, r, o, Byte::checked_mul)?,
            Halt => return Ok(()),
        }

        *pc += STRIDE;
        Ok(())
    }

    fn binop(
        program: &mut Program,
        pc: ProgramCounter,
        l: usize,
        r: usize,
        o: usize,
        f: impl FnOnce(Byte, Byte) -> Option<Byte>,
    ) -> Result<()> {
        let v = f(program[l], program[r]).ok_or(Error::Overflow { pc })?;
        program[o] = v;
        Ok(())
    }
}

/// Runs the program in place until it halts, returning how many
/// instructions ran before the halt.
pub fn execute_traced(program: &mut Program) -> Result<usize> {
    let mut pc = 0;
    let mut steps = 0;

    loop {
        let op = Operation::decode(program, pc)?;
        trace!("{:4}: {:?}", pc, op);

        if op == Operation::Halt {
            break;
        }

        op.execute(program, &mut pc)?;
        steps += 1;
    }

    Ok(steps)
}

pub fn execute(program: &mut Program) -> Result<()> {
    execute_traced(program).map(drop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn puzzle_examples() -> Result<()> {
        let mut state = [1, 0, 0, 0, 99];
        execute(&mut state)?;
        assert_eq!(state, [2, 0, 0, 0, 99]);

        let mut state = [2, 3, 0, 3, 99];
        execute(&mut state)?;
        assert_eq!(state, [2, 3, 0, 6, 99]);

        let mut state = [2, 4, 4, 5, 99, 0];
        execute(&mut state)?;
        assert_eq!(state, [2, 4, 4, 5, 99, 9801]);

        let mut state = [1, 1, 1, 4, 99, 5, 6, 0, 99];
        execute(&mut state)?;
        assert_eq!(state, [30, 1, 1, 4, 2, 5, 6, 0, 99]);

        Ok(())
    }

    #[test]
    fn longer_example() -> Result<()> {
        let mut state = parse_program("1,9,10,3,2,3,11,0,99,30,40,50")?;
        let steps = execute_traced(&mut state)?;
        assert_eq!(steps, 2);
        assert_eq!(state, [3500, 9, 10, 70, 2, 3, 11, 0, 99, 30, 40, 50]);
        Ok(())
    }

    #[test]
    fn parsing() -> Result<()> {
        assert_eq!(parse_program("1,0,0,0,99\n")?, [1, 0, 0, 0, 99]);
        assert_eq!(parse_program(" 1, -2 ,3")?, [1, -2, 3]);

        assert!(matches!(parse_program(""), Err(Error::EmptyProgram)));
        assert!(matches!(parse_program("  \n"), Err(Error::EmptyProgram)));
        match parse_program("1,x,3") {
            Err(Error::Parse { token, .. }) => assert_eq!(token, "x"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(parse_program("1,,3"), Err(Error::Parse { .. })));
        Ok(())
    }

    #[test]
    fn halt_not_reached() {
        let mut state = [1, 0, 0, 0];
        match execute(&mut state) {
            Err(Error::HaltNotReached { pc, len }) => {
                assert_eq!(pc, 4);
                assert_eq!(len, 4);
            }
            other => panic!("unexpected {:?}", other),
        }

        let mut state: [Byte; 0] = [];
        assert!(matches!(
            execute(&mut state),
            Err(Error::HaltNotReached { pc: 0, len: 0 })
        ));
    }

    #[test]
    fn out_of_bounds() {
        let mut state = [1, 0, 7, 0, 99];
        assert!(matches!(
            execute(&mut state),
            Err(Error::AddressOutOfBounds { address: 7, len: 5 })
        ));

        let mut state = [2, -1, 0, 0, 99];
        assert!(matches!(
            execute(&mut state),
            Err(Error::AddressOutOfBounds { address: -1, .. })
        ));

        // Destination is checked as well as operands
        let mut state = [1, 0, 0, 5, 99];
        assert!(matches!(
            execute(&mut state),
            Err(Error::AddressOutOfBounds { address: 5, .. })
        ));

        // Instruction cut short by the end of memory
        let mut state = [1, 0];
        assert!(matches!(
            execute(&mut state),
            Err(Error::AddressOutOfBounds { address: 2, len: 2 })
        ));
    }

    #[test]
    fn unknown_opcode() {
        let mut state = [1, 0, 0, 0, 3, 0, 0, 0, 99];
        assert!(matches!(
            execute(&mut state),
            Err(Error::UnknownOpcode { opcode: 3, pc: 4 })
        ));
    }

    #[test]
    fn overflow() {
        let mut state = [2, 5, 5, 0, 99, Byte::MAX];
        assert!(matches!(
            execute(&mut state),
            Err(Error::Overflow { pc: 0 })
        ));
    }

    #[test]
    fn halted_program_is_unchanged_by_rerun() -> Result<()> {
        let mut state = [99, 1, 2, 3];
        let steps = execute_traced(&mut state)?;
        assert_eq!(steps, 0);
        assert_eq!(state, [99, 1, 2, 3]);
        Ok(())
    }

    fn small_program() -> impl Strategy<Value = Vec<Byte>> {
        // Opcode slots are drawn from 1, 2 and 99; every other cell is a
        // valid address into the fixed-size memory.
        const LEN: usize = 16;
        prop::collection::vec(0..LEN as Byte, LEN).prop_flat_map(|cells| {
            prop::collection::vec(prop::sample::select(vec![1, 2, 99]), LEN / 4).prop_map(
                move |opcodes| {
                    let mut cells = cells.clone();
                    for (i, op) in opcodes.into_iter().enumerate() {
                        cells[i * 4] = op;
                    }
                    cells
                },
            )
        })
    }

    proptest! {
        #[test]
        fn execution_is_deterministic(program in small_program()) {
            let mut a = program.clone();
            let mut b = program;
            let ra = execute(&mut a).map_err(|e| e.to_string());
            let rb = execute(&mut b).map_err(|e| e.to_string());
            prop_assert_eq!(ra, rb);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn leading_halt_is_a_no_op(mut program in small_program()) {
            program[0] = 99;
            let before = program.clone();
            prop_assert_eq!(execute_traced(&mut program).ok(), Some(0));
            prop_assert_eq!(program, before);
        }
    }
}
