use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::foods::{filter::FilterPrefs, repo::parse_number};

/// Profile as submitted by the questionnaire. Scalars stay string-encoded;
/// numbers are coerced leniently when the plan is computed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, deserialize_with = "string_or_number")]
    pub age: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub gender: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub height: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub weight: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub activity_level: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub goal: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub dietary_preference: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub allergies: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub medical_conditions: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub meals_per_day: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub budget_range: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub region_food_style: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Number(f64),
        Flag(bool),
    }

    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Text(s)) => s,
        Some(Scalar::Number(n)) => n.to_string(),
        Some(Scalar::Flag(b)) => b.to_string(),
        None => String::new(),
    })
}

/// Unparseable numbers count as zero.
fn coerce(raw: &str) -> f64 {
    parse_number(raw).unwrap_or(0.0)
}

#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
}

impl UserProfile {
    pub fn age_years(&self) -> f64 {
        coerce(&self.age)
    }

    pub fn height_cm(&self) -> f64 {
        coerce(&self.height)
    }

    pub fn weight_kg(&self) -> f64 {
        coerce(&self.weight)
    }

    pub fn filter_prefs(&self) -> FilterPrefs {
        FilterPrefs {
            dietary_preference: self.dietary_preference.clone(),
            allergies: self.allergies.clone(),
            region_food_style: self.region_food_style.clone(),
        }
    }

    /// The checks the questionnaire applies before a plan is requested.
    /// Plan generation itself never calls this.
    pub fn validate(&self) -> Result<(), ProfileError> {
        check_range("age", &self.age, 10.0, 120.0)?;
        require("gender", &self.gender)?;
        check_range("height", &self.height, 50.0, 300.0)?;
        check_range("weight", &self.weight, 20.0, 400.0)?;
        require("activityLevel", &self.activity_level)?;
        require("goal", &self.goal)?;
        require("dietaryPreference", &self.dietary_preference)?;
        require("mealsPerDay", &self.meals_per_day)?;
        require("budgetRange", &self.budget_range)?;
        require("regionFoodStyle", &self.region_food_style)?;
        Ok(())
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ProfileError> {
    if value.trim().is_empty() {
        return Err(ProfileError::Missing(field));
    }
    Ok(())
}

fn check_range(field: &'static str, value: &str, min: f64, max: f64) -> Result<(), ProfileError> {
    require(field, value)?;
    match parse_number(value) {
        Some(v) if (min..=max).contains(&v) => Ok(()),
        _ => Err(ProfileError::OutOfRange { field, min, max }),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Meal {
    pub name: String,
    pub calories: i64,
    pub protein: i64,
    pub carbs: i64,
    pub fats: i64,
    pub items: Vec<String>,
}

impl Meal {
    /// Sentinel for slots that are not part of the day.
    pub fn empty() -> Self {
        Self {
            name: "—".to_string(),
            calories: 0,
            protein: 0,
            carbs: 0,
            fats: 0,
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayMeals {
    pub breakfast: Meal,
    pub lunch: Meal,
    pub dinner: Meal,
    pub snacks: Meal,
}

impl DayMeals {
    pub fn iter(&self) -> impl Iterator<Item = &Meal> + '_ {
        [&self.breakfast, &self.lunch, &self.dinner, &self.snacks].into_iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPlan {
    pub day: String,
    pub meals: DayMeals,
}

impl DayPlan {
    /// Sums what was actually selected across the four slots.
    pub fn totals(&self) -> DayTotals {
        self.meals.iter().fold(DayTotals::default(), |acc, m| DayTotals {
            calories: acc.calories + m.calories,
            protein: acc.protein + m.protein,
            carbs: acc.carbs + m.carbs,
            fats: acc.fats + m.fats,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Macros {
    pub protein: i64,
    pub carbs: i64,
    pub fats: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DietPlan {
    pub daily_calories: i64,
    pub macros: Macros,
    pub hydration: f64,
    pub avoid_foods: Vec<String>,
    pub weekly_plan: Vec<DayPlan>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayTotals {
    pub calories: i64,
    pub protein: i64,
    pub carbs: i64,
    pub fats: i64,
}

impl DayTotals {
    /// Gram share of each macro in percent. Fats take the remainder so the
    /// three always add up to 100.
    pub fn macro_split(&self) -> MacroSplit {
        let grams = self.protein + self.carbs + self.fats;
        let (protein, carbs) = if grams > 0 {
            let pct = |g: i64| (g as f64 / grams as f64 * 100.0 + 0.5).floor() as i64;
            (pct(self.protein), pct(self.carbs))
        } else {
            (33, 34)
        };
        MacroSplit {
            protein,
            carbs,
            fats: (100 - protein - carbs).max(0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MacroSplit {
    pub protein: i64,
    pub carbs: i64,
    pub fats: i64,
}

#[derive(Debug, Deserialize)]
pub struct GeneratePlanRequest {
    pub profile: UserProfile,
    #[serde(default)]
    pub seed: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RegeneratePlanRequest {
    pub profile: UserProfile,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DietPlanResponse {
    pub seed: i64,
    pub plan: DietPlan,
    pub day_totals: Vec<DayTotals>,
    pub macro_split: MacroSplit,
}

impl DietPlanResponse {
    pub fn new(seed: i64, plan: DietPlan) -> Self {
        let day_totals: Vec<DayTotals> = plan.weekly_plan.iter().map(DayPlan::totals).collect();
        let macro_split = day_totals
            .first()
            .copied()
            .unwrap_or_default()
            .macro_split();
        Self {
            seed,
            plan,
            day_totals,
            macro_split,
        }
    }
}
