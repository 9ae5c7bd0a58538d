//! Closed value domains for every filterable facet.
//!
//! Each domain is a small `Copy` type with a stable textual tag. Tags are the
//! lowercase names the remote catalog service uses, so they double as the
//! parse format for CLI flags and fixtures.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

// ============================================================================
// Generation
// ============================================================================

/// Release generation of a species, `1..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Generation(u8);

impl Generation {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 9;

    /// Generation applied when the lineage index has no entry for a species.
    pub const DEFAULT: Generation = Generation(1);

    pub fn new(n: u8) -> Result<Self, ModelError> {
        if (Self::MIN..=Self::MAX).contains(&n) {
            Ok(Self(n))
        } else {
            Err(ModelError::InvalidGeneration(n))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// All generations in ascending order.
    pub fn all() -> impl Iterator<Item = Generation> {
        (Self::MIN..=Self::MAX).map(Generation)
    }
}

impl Default for Generation {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for Generation {
    type Error = ModelError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<Generation> for u8 {
    fn from(g: Generation) -> u8 {
        g.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Generation {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: u8 = s
            .trim()
            .parse()
            .map_err(|_| ModelError::InvalidGeneration(0))?;
        Self::new(n)
    }
}

// ============================================================================
// Category
// ============================================================================

/// Elemental category tag. An entity carries one or two of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

impl Category {
    pub const ALL: [Category; 18] = [
        Category::Normal,
        Category::Fire,
        Category::Water,
        Category::Electric,
        Category::Grass,
        Category::Ice,
        Category::Fighting,
        Category::Poison,
        Category::Ground,
        Category::Flying,
        Category::Psychic,
        Category::Bug,
        Category::Rock,
        Category::Ghost,
        Category::Dragon,
        Category::Dark,
        Category::Steel,
        Category::Fairy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Normal => "normal",
            Category::Fire => "fire",
            Category::Water => "water",
            Category::Electric => "electric",
            Category::Grass => "grass",
            Category::Ice => "ice",
            Category::Fighting => "fighting",
            Category::Poison => "poison",
            Category::Ground => "ground",
            Category::Flying => "flying",
            Category::Psychic => "psychic",
            Category::Bug => "bug",
            Category::Rock => "rock",
            Category::Ghost => "ghost",
            Category::Dragon => "dragon",
            Category::Dark => "dark",
            Category::Steel => "steel",
            Category::Fairy => "fairy",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| ModelError::UnknownCategory(s.to_string()))
    }
}

// ============================================================================
// Category count
// ============================================================================

/// Whether an entity carries one category or two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryCount {
    Single,
    Dual,
}

impl CategoryCount {
    pub const ALL: [CategoryCount; 2] = [CategoryCount::Single, CategoryCount::Dual];

    pub fn from_len(len: usize) -> Result<Self, ModelError> {
        match len {
            1 => Ok(CategoryCount::Single),
            2 => Ok(CategoryCount::Dual),
            n => Err(ModelError::InvalidCategoryCount(n)),
        }
    }
}

impl fmt::Display for CategoryCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryCount::Single => f.write_str("single"),
            CategoryCount::Dual => f.write_str("dual"),
        }
    }
}

impl FromStr for CategoryCount {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "single" | "mono" => Ok(CategoryCount::Single),
            "2" | "dual" => Ok(CategoryCount::Dual),
            _ => Err(ModelError::InvalidCategoryCount(0)),
        }
    }
}

// ============================================================================
// Evolution depth
// ============================================================================

/// Position of a species in its lineage chain, saturating at 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum EvolutionDepth {
    /// No predecessor.
    Base,
    /// One predecessor.
    Middle,
    /// The predecessor has a predecessor of its own (or more).
    Final,
}

impl EvolutionDepth {
    pub const ALL: [EvolutionDepth; 3] = [
        EvolutionDepth::Base,
        EvolutionDepth::Middle,
        EvolutionDepth::Final,
    ];

    /// Depth from the number of predecessor hops observed. Hops past two
    /// saturate.
    pub fn from_hops(hops: usize) -> Self {
        match hops {
            0 => EvolutionDepth::Base,
            1 => EvolutionDepth::Middle,
            _ => EvolutionDepth::Final,
        }
    }

    pub fn get(self) -> u8 {
        match self {
            EvolutionDepth::Base => 1,
            EvolutionDepth::Middle => 2,
            EvolutionDepth::Final => 3,
        }
    }
}

impl TryFrom<u8> for EvolutionDepth {
    type Error = ModelError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(EvolutionDepth::Base),
            2 => Ok(EvolutionDepth::Middle),
            3 => Ok(EvolutionDepth::Final),
            n => Err(ModelError::InvalidEvolutionDepth(n)),
        }
    }
}

impl From<EvolutionDepth> for u8 {
    fn from(d: EvolutionDepth) -> u8 {
        d.get()
    }
}

impl fmt::Display for EvolutionDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl FromStr for EvolutionDepth {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: u8 = s
            .trim()
            .parse()
            .map_err(|_| ModelError::InvalidEvolutionDepth(0))?;
        Self::try_from(n)
    }
}

// ============================================================================
// Special flags
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecialFlag {
    Baby,
    Legendary,
    Mythical,
}

impl SpecialFlag {
    pub const ALL: [SpecialFlag; 3] = [
        SpecialFlag::Baby,
        SpecialFlag::Legendary,
        SpecialFlag::Mythical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SpecialFlag::Baby => "baby",
            SpecialFlag::Legendary => "legendary",
            SpecialFlag::Mythical => "mythical",
        }
    }
}

impl fmt::Display for SpecialFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpecialFlag {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        SpecialFlag::ALL
            .into_iter()
            .find(|f| f.as_str() == needle)
            .ok_or_else(|| ModelError::UnknownFlag(s.to_string()))
    }
}

// ============================================================================
// Color
// ============================================================================

/// Dominant body color, from the service's fixed palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    Blue,
    Brown,
    Gray,
    Green,
    Pink,
    Purple,
    Red,
    White,
    Yellow,
}

impl Color {
    pub const ALL: [Color; 10] = [
        Color::Black,
        Color::Blue,
        Color::Brown,
        Color::Gray,
        Color::Green,
        Color::Pink,
        Color::Purple,
        Color::Red,
        Color::White,
        Color::Yellow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::Blue => "blue",
            Color::Brown => "brown",
            Color::Gray => "gray",
            Color::Green => "green",
            Color::Pink => "pink",
            Color::Purple => "purple",
            Color::Red => "red",
            Color::White => "white",
            Color::Yellow => "yellow",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Color::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| ModelError::UnknownColor(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_bounds() {
        assert!(Generation::new(0).is_err());
        assert!(Generation::new(10).is_err());
        assert_eq!(Generation::new(9).unwrap().get(), 9);
        assert_eq!(Generation::all().count(), 9);
    }

    #[test]
    fn evolution_depth_saturates() {
        assert_eq!(EvolutionDepth::from_hops(0).get(), 1);
        assert_eq!(EvolutionDepth::from_hops(1).get(), 2);
        assert_eq!(EvolutionDepth::from_hops(2).get(), 3);
        assert_eq!(EvolutionDepth::from_hops(7).get(), 3);
    }

    #[test]
    fn tags_parse_case_insensitively() {
        assert_eq!("Fire".parse::<Category>().unwrap(), Category::Fire);
        assert_eq!(" GRAY ".parse::<Color>().unwrap(), Color::Gray);
        assert_eq!("mythical".parse::<SpecialFlag>().unwrap(), SpecialFlag::Mythical);
        assert_eq!("2".parse::<CategoryCount>().unwrap(), CategoryCount::Dual);
        assert!("stellar".parse::<Category>().is_err());
    }

    #[test]
    fn category_count_rejects_out_of_range_lengths() {
        assert_eq!(CategoryCount::from_len(1).unwrap(), CategoryCount::Single);
        assert!(matches!(
            CategoryCount::from_len(3),
            Err(ModelError::InvalidCategoryCount(3))
        ));
        assert!(CategoryCount::from_len(0).is_err());
    }
}
