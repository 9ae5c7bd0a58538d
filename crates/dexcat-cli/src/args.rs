//! Command-line facet flags and source selection.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, ValueEnum};
use dexcat_filter::{FacetSelector, FacetValue, FilterState, MatchMode};
use dexcat_model::{Category, CategoryCount, Color, EntityId, EvolutionDepth, Generation, SpecialFlag};

/// Where the catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// The remote REST service named by the ingest config.
    Http,
    /// A JSON fixture served from memory.
    Fixture(PathBuf),
}

impl FromStr for SourceSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "http" {
            return Ok(SourceSpec::Http);
        }
        match s.strip_prefix("fixture:") {
            Some(path) if !path.is_empty() => Ok(SourceSpec::Fixture(PathBuf::from(path))),
            _ => Err(format!("expected `http` or `fixture:<path>`, got `{s}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum TypeMode {
    #[default]
    Any,
    All,
}

impl From<TypeMode> for MatchMode {
    fn from(mode: TypeMode) -> Self {
        match mode {
            TypeMode::Any => MatchMode::Any,
            TypeMode::All => MatchMode::All,
        }
    }
}

/// Facet flags shared by `list` and `pick`. Each `--x` includes values,
/// each `--not-x` excludes them; lists are comma-separated or repeated.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Generations to include (1-9)
    #[arg(long = "gen", value_delimiter = ',')]
    pub generation: Vec<Generation>,
    /// Generations to exclude
    #[arg(long = "not-gen", value_delimiter = ',')]
    pub not_generation: Vec<Generation>,

    /// Types to include (e.g. fire,water)
    #[arg(long = "type", value_delimiter = ',')]
    pub category: Vec<Category>,
    /// Types to exclude
    #[arg(long = "not-type", value_delimiter = ',')]
    pub not_category: Vec<Category>,
    /// Whether an entry needs any or all of the included types
    #[arg(long = "type-mode", value_enum, default_value_t = TypeMode::Any)]
    pub type_mode: TypeMode,

    /// Type counts to include (single, dual)
    #[arg(long = "type-count", value_delimiter = ',')]
    pub category_count: Vec<CategoryCount>,
    #[arg(long = "not-type-count", value_delimiter = ',')]
    pub not_category_count: Vec<CategoryCount>,

    /// Evolution stages to include (1-3)
    #[arg(long = "stage", value_delimiter = ',')]
    pub stage: Vec<EvolutionDepth>,
    #[arg(long = "not-stage", value_delimiter = ',')]
    pub not_stage: Vec<EvolutionDepth>,

    /// Special flags to include (baby, legendary, mythical)
    #[arg(long = "flag", value_delimiter = ',')]
    pub flag: Vec<SpecialFlag>,
    #[arg(long = "not-flag", value_delimiter = ',')]
    pub not_flag: Vec<SpecialFlag>,

    /// Colors to include
    #[arg(long = "color", value_delimiter = ',')]
    pub color: Vec<Color>,
    #[arg(long = "not-color", value_delimiter = ',')]
    pub not_color: Vec<Color>,

    /// Case-insensitive name substring
    #[arg(long)]
    pub name: Option<String>,

    /// Entry ids to disable for random picks
    #[arg(long, value_delimiter = ',')]
    pub disable: Vec<EntityId>,
}

fn select<V: FacetValue>(selector: &mut FacetSelector<V>, include: &[V], exclude: &[V]) {
    for &value in include {
        selector.include(value);
    }
    for &value in exclude {
        selector.exclude(value);
    }
}

impl FilterArgs {
    pub fn to_state(&self) -> FilterState {
        let mut state = FilterState::new();
        select(&mut state.generation, &self.generation, &self.not_generation);
        select(&mut state.category, &self.category, &self.not_category);
        state.category_mode = self.type_mode.into();
        select(&mut state.category_count, &self.category_count, &self.not_category_count);
        select(&mut state.evolution_depth, &self.stage, &self.not_stage);
        select(&mut state.special_flag, &self.flag, &self.not_flag);
        select(&mut state.color, &self.color, &self.not_color);
        if let Some(name) = &self.name {
            state.name_query = name.clone();
        }
        state
    }
}
