use std::fmt;
use std::str::FromStr;

/// Inclusive range of level seeds, written as `X` or `X-Y`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedRange {
    pub start: u64,
    pub end: u64,
}

impl SeedRange {
    pub fn single(seed: u64) -> Self {
        Self {
            start: seed,
            end: seed,
        }
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    pub fn count(&self) -> u64 {
        (self.end - self.start).saturating_add(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> {
        self.start..=self.end
    }
}

fn parse_seed(s: &str) -> Result<u64, String> {
    s.trim()
        .parse::<u64>()
        .map_err(|_| format!("Invalid seed: {}", s))
}

impl FromStr for SeedRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let range = match s.split_once('-') {
            Some((start, end)) => Self {
                start: parse_seed(start)?,
                end: parse_seed(end)?,
            },
            None => Self::single(parse_seed(s)?),
        };
        if range.start > range.end {
            return Err(format!("Seed range {} is decreasing", s));
        }
        Ok(range)
    }
}

impl fmt::Display for SeedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Level dimensions, written as `WxH`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    pub width: usize,
    pub height: usize,
}

impl FromStr for Geometry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = s
            .split_once(|c: char| c == 'x' || c == 'X')
            .ok_or_else(|| format!("Geometry must look like WxH: {}", s))?;
        let parse = |value: &str| {
            value
                .trim()
                .parse::<usize>()
                .map_err(|_| format!("Invalid dimension in geometry {}", s))
        };
        let geometry = Self {
            width: parse(width)?,
            height: parse(height)?,
        };
        // Anything smaller has no interior once the border is walled
        if geometry.width < 3 || geometry.height < 3 {
            return Err(format!("Geometry {} is too small", s));
        }
        Ok(geometry)
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
