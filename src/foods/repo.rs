use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

use super::repo_types::FoodRecord;

const MIN_COLUMNS: usize = 12;
const ALLERGEN_COLUMN: usize = 12;
const HEADER_NAME: &str = "food_name";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read food dataset {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Where the food catalog comes from. Loaded once at startup.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn load(&self) -> anyhow::Result<Vec<FoodRecord>>;
}

#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileCatalog {
    async fn load(&self) -> anyhow::Result<Vec<FoodRecord>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CatalogError::Read {
                path: self.path.display().to_string(),
                source,
            })?;
        let foods = parse_catalog(&raw);
        info!(path = %self.path.display(), count = foods.len(), "food dataset loaded");
        Ok(foods)
    }
}

/// Parses the whole CSV text, skipping blank, short, header and invalid rows.
pub fn parse_catalog(raw: &str) -> Vec<FoodRecord> {
    let mut skipped = 0usize;
    let foods: Vec<FoodRecord> = raw
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|l| {
            let parsed = parse_food_line(l);
            if parsed.is_none() {
                skipped += 1;
            }
            parsed
        })
        .collect();
    debug!(kept = foods.len(), skipped, "parsed food rows");
    foods
}

/// Parses one dataset row.
///
/// Columns: name, calories, protein, carbs, fat, fiber, sodium, sugar,
/// cholesterol, glycemic index, category, veg flag, allergens. Allergen lists
/// may themselves contain commas, so everything from column 12 on is rejoined.
pub fn parse_food_line(line: &str) -> Option<FoodRecord> {
    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() < MIN_COLUMNS || parts[0].trim() == HEADER_NAME {
        return None;
    }
    let calories = parse_number(parts[1]).filter(|c| *c >= 0.0)?;
    let allergens = if parts.len() > ALLERGEN_COLUMN + 1 {
        parts[ALLERGEN_COLUMN..].join(",")
    } else {
        parts.get(ALLERGEN_COLUMN).copied().unwrap_or_default().to_string()
    };

    Some(FoodRecord {
        name: parts[0].trim().to_string(),
        calories,
        protein_g: number_or_zero(parts[2]),
        carbs_g: number_or_zero(parts[3]),
        fat_g: number_or_zero(parts[4]),
        fiber_g: number_or_zero(parts[5]),
        sodium_mg: number_or_zero(parts[6]),
        sugar_g: number_or_zero(parts[7]),
        cholesterol_mg: number_or_zero(parts[8]),
        glycemic_index: number_or_zero(parts[9]),
        category: parts[10].trim().to_lowercase(),
        diet_type: parts[11].trim().to_string(),
        allergen_tags: allergens.trim().to_string(),
    })
}

/// Blank cells count as zero; anything that is not a finite number is rejected.
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn number_or_zero(raw: &str) -> f64 {
    parse_number(raw).filter(|v| *v >= 0.0).unwrap_or(0.0)
}
