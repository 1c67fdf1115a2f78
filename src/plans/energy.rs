//! Energy and macro targets from a user profile.
//!
//! BMR uses the Mifflin-St Jeor equation (Mifflin et al., 1990), scaled by a
//! standard activity multiplier to get TDEE.

use super::dto::{Macros, UserProfile};
use crate::foods::filter::allergy_terms;

const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
const KCAL_PER_GRAM_CARBS: f64 = 4.0;
const KCAL_PER_GRAM_FAT: f64 = 9.0;
const HYDRATION_LITERS_PER_KG: f64 = 0.033;

/// Rounds halves up, the way the plan figures have always been rounded.
pub fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Other,
}

impl Gender {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "male" => Self::Male,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Heavy,
}

impl ActivityLevel {
    /// Unknown or missing levels are treated as sedentary.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "light" => Self::Light,
            "moderate" => Self::Moderate,
            "heavy" => Self::Heavy,
            _ => Self::Sedentary,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::Light => 1.375,
            Self::Moderate => 1.55,
            Self::Heavy => 1.725,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    WeightLoss,
    WeightGain,
    MuscleBuilding,
    Maintenance,
}

impl Goal {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "weight_loss" => Self::WeightLoss,
            "weight_gain" => Self::WeightGain,
            "muscle_building" => Self::MuscleBuilding,
            _ => Self::Maintenance,
        }
    }

    fn calorie_factor(self) -> f64 {
        match self {
            Self::WeightLoss => 0.8,
            Self::WeightGain => 1.15,
            Self::MuscleBuilding => 1.2,
            Self::Maintenance => 1.0,
        }
    }

    /// Protein / carbs / fat share of total calories.
    fn macro_ratios(self) -> (f64, f64, f64) {
        match self {
            Self::MuscleBuilding => (0.35, 0.40, 0.25),
            Self::WeightLoss => (0.30, 0.35, 0.35),
            Self::WeightGain | Self::Maintenance => (0.25, 0.50, 0.25),
        }
    }

    fn extra_avoid_foods(self) -> &'static [&'static str] {
        match self {
            Self::WeightLoss => &["fried foods", "sugary drinks", "processed snacks"],
            Self::MuscleBuilding => &["alcohol", "excessive sugar"],
            Self::WeightGain | Self::Maintenance => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnergyTargets {
    pub bmr: f64,
    pub tdee: i64,
    pub daily_calories: i64,
    pub macros: Macros,
    pub hydration: f64,
    pub avoid_foods: Vec<String>,
}

pub fn basal_metabolic_rate(gender: Gender, weight_kg: f64, height_cm: f64, age: f64) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age;
    match gender {
        Gender::Male => base + 5.0,
        Gender::Other => base - 161.0,
    }
}

/// Grams per macro; each one is rounded on its own, so the kcal total can
/// drift a few calories from `daily_calories`.
pub fn macro_grams(daily_calories: i64, goal: Goal) -> Macros {
    let (protein, carbs, fats) = goal.macro_ratios();
    let kcal = daily_calories as f64;
    Macros {
        protein: round_half_up(kcal * protein / KCAL_PER_GRAM_PROTEIN),
        carbs: round_half_up(kcal * carbs / KCAL_PER_GRAM_CARBS),
        fats: round_half_up(kcal * fats / KCAL_PER_GRAM_FAT),
    }
}

/// Liters per day, one decimal.
pub fn hydration_liters(weight_kg: f64) -> f64 {
    round_half_up(weight_kg * HYDRATION_LITERS_PER_KG * 10.0) as f64 / 10.0
}

/// Allergy terms first, then the goal's additions; first occurrence wins.
pub fn avoid_foods(allergies: &str, goal: Goal) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let candidates = allergy_terms(allergies)
        .into_iter()
        .chain(goal.extra_avoid_foods().iter().map(|s| s.to_string()));
    for item in candidates {
        if !item.is_empty() && !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

pub fn compute(profile: &UserProfile) -> EnergyTargets {
    let weight = profile.weight_kg();
    let goal = Goal::parse(&profile.goal);
    let bmr = basal_metabolic_rate(
        Gender::parse(&profile.gender),
        weight,
        profile.height_cm(),
        profile.age_years(),
    );
    let tdee = round_half_up(bmr * ActivityLevel::parse(&profile.activity_level).multiplier());
    let daily_calories = round_half_up(tdee as f64 * goal.calorie_factor());

    EnergyTargets {
        bmr,
        tdee,
        daily_calories,
        macros: macro_grams(daily_calories, goal),
        hydration: hydration_liters(weight),
        avoid_foods: avoid_foods(&profile.allergies, goal),
    }
}
