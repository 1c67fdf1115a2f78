use serde::{Deserialize, Serialize};

/// One row of the nutrition dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub name: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub fiber_g: f64,
    pub sodium_mg: f64,
    pub sugar_g: f64,
    pub cholesterol_mg: f64,
    pub glycemic_index: f64,
    pub category: String,
    pub diet_type: String,
    pub allergen_tags: String,
}

impl FoodRecord {
    pub fn is_veg(&self) -> bool {
        self.diet_type == "Veg"
    }

    /// Allergen tags split on commas, trimmed and lowercased. A stray comma
    /// yields an empty tag, which the allergy match treats like any other.
    pub fn allergens(&self) -> impl Iterator<Item = String> + '_ {
        self.allergen_tags.split(',').map(|a| a.trim().to_lowercase())
    }
}

#[cfg(test)]
pub(crate) fn food(name: &str, calories: f64, category: &str) -> FoodRecord {
    FoodRecord {
        name: name.to_string(),
        calories,
        protein_g: 0.0,
        carbs_g: 0.0,
        fat_g: 0.0,
        fiber_g: 0.0,
        sodium_mg: 0.0,
        sugar_g: 0.0,
        cholesterol_mg: 0.0,
        glycemic_index: 0.0,
        category: category.to_string(),
        diet_type: "Veg".to_string(),
        allergen_tags: String::new(),
    }
}
