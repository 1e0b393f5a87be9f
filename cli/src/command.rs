use std::str::FromStr;

use anyhow::{Context, bail};
use hintsweeper_core::{Coord, Coord2};

pub const HELP: &str = "\
commands:
  r <row> <col>   reveal a cell
  f <row> <col>   toggle a flag
  h               ask for a hint
  n [size]        new game, optionally switching to size 4, 6 or 9
  s               print the session as JSON
  ?               this help
  q               quit";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    Hint,
    New(Option<Coord>),
    Snapshot,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            bail!("empty command, type ? for help");
        };

        let command = match verb {
            "r" | "reveal" => Self::Reveal(parse_coords(&mut words)?),
            "f" | "flag" => Self::Flag(parse_coords(&mut words)?),
            "h" | "hint" => Self::Hint,
            "n" | "new" => Self::New(
                words
                    .next()
                    .map(|size| {
                        size.parse::<Coord>()
                            .with_context(|| format!("bad size {size:?}"))
                    })
                    .transpose()?,
            ),
            "s" | "snapshot" => Self::Snapshot,
            "?" | "help" => Self::Help,
            "q" | "quit" => Self::Quit,
            other => bail!("unknown command {other:?}, type ? for help"),
        };

        if let Some(extra) = words.next() {
            bail!("unexpected {extra:?} after {verb:?}");
        }
        Ok(command)
    }
}

fn parse_coords<'a>(words: &mut impl Iterator<Item = &'a str>) -> anyhow::Result<Coord2> {
    let mut next = |name: &str| -> anyhow::Result<Coord> {
        let word = words.next().with_context(|| format!("missing {name}"))?;
        word.parse::<Coord>()
            .with_context(|| format!("bad {name} {word:?}"))
    };
    let row = next("row")?;
    let col = next("col")?;
    Ok((row, col))
}
