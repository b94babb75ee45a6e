use std::{fmt, str::FromStr};

use nom::{
    Finish, IResult, Parser,
    bytes::complete::take,
    character::complete::{one_of, u8},
    combinator::{all_consuming, map_parser},
};
use serde::Deserialize;

use crate::error::ApplicationError;

/// The two physical runways at Heathrow, each usable in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Runway {
    R09L,
    R09R,
    R27L,
    R27R,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunwayStrip {
    Northern,
    Southern,
}

impl Runway {
    pub fn identifier(self) -> &'static str {
        match self {
            Self::R09L => "09L",
            Self::R09R => "09R",
            Self::R27L => "27L",
            Self::R27R => "27R",
        }
    }

    /// 27L and 09R are the same strip of tarmac, as are 27R and 09L.
    pub fn strip(self) -> RunwayStrip {
        match self {
            Self::R27L | Self::R09R => RunwayStrip::Southern,
            Self::R27R | Self::R09L => RunwayStrip::Northern,
        }
    }

    fn from_parts(heading: u8, side: char) -> Option<Self> {
        match (heading, side) {
            (9, 'L') => Some(Self::R09L),
            (9, 'R') => Some(Self::R09R),
            (27, 'L') => Some(Self::R27L),
            (27, 'R') => Some(Self::R27R),
            _ => None,
        }
    }
}

fn nom_runway(input: &str) -> IResult<&str, Runway> {
    (map_parser(take(2usize), all_consuming(u8)), one_of("LR"))
        .map_res(|(heading, side)| {
            Runway::from_parts(heading, side).ok_or("Runway is not in use at this airport")
        })
        .parse(input)
}

impl FromStr for Runway {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        all_consuming(nom_runway)
            .parse(s.trim())
            .finish()
            .map(|(_, runway)| runway)
            .map_err(|_| ApplicationError::InvalidRunway(s.to_string()))
    }
}

impl TryFrom<String> for Runway {
    type Error = ApplicationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Runway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}
