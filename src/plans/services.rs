use time::Weekday;
use tracing::debug;

use super::composer::compose;
use super::dto::{DayMeals, DayPlan, DietPlan, Meal, UserProfile};
use super::energy::{self, round_half_up};
use crate::foods::{filter::filter_foods, repo::parse_number, repo_types::FoodRecord};

const DAYS_PER_WEEK: i64 = 7;
const DAY_SEED_STRIDE: i64 = 1000;
const BUCKET_CAP: usize = 80;
const FALLBACK_CAP: usize = 50;
const FALLBACK_MAX_CALORIES: f64 = 800.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl MealSlot {
    pub const ALL: [MealSlot; 4] = [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Snacks];

    /// Dataset category to slot. Snacks and desserts share a slot; anything
    /// else is left out of the buckets.
    pub fn from_category(category: &str) -> Option<Self> {
        match category {
            "breakfast" => Some(Self::Breakfast),
            "lunch" => Some(Self::Lunch),
            "dinner" => Some(Self::Dinner),
            "snack" | "dessert" => Some(Self::Snacks),
            _ => None,
        }
    }

    fn seed_offset(self) -> i64 {
        match self {
            Self::Breakfast => 1,
            Self::Lunch => 2,
            Self::Dinner => 3,
            Self::Snacks => 4,
        }
    }

    fn index(self) -> usize {
        self.seed_offset() as usize - 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealsPerDay {
    Two,
    Three,
    Four,
    Five,
}

impl MealsPerDay {
    /// Zero or unparseable means four; everything else is clamped to 2..=5.
    /// Fractional counts that land between table rows also get four.
    pub fn parse(raw: &str) -> Self {
        let n = match parse_number(raw) {
            Some(n) if n != 0.0 => n.clamp(2.0, 5.0),
            _ => 4.0,
        };
        if n == 2.0 {
            Self::Two
        } else if n == 3.0 {
            Self::Three
        } else if n == 5.0 {
            Self::Five
        } else {
            Self::Four
        }
    }

    /// Active slots and their share of the daily calories.
    pub fn shares(self) -> &'static [(MealSlot, f64)] {
        match self {
            Self::Two => &[(MealSlot::Breakfast, 0.5), (MealSlot::Lunch, 0.5)],
            Self::Three => &[
                (MealSlot::Breakfast, 0.28),
                (MealSlot::Lunch, 0.38),
                (MealSlot::Dinner, 0.34),
            ],
            Self::Four => &[
                (MealSlot::Breakfast, 0.25),
                (MealSlot::Lunch, 0.35),
                (MealSlot::Dinner, 0.30),
                (MealSlot::Snacks, 0.10),
            ],
            Self::Five => &[
                (MealSlot::Breakfast, 0.22),
                (MealSlot::Lunch, 0.28),
                (MealSlot::Dinner, 0.28),
                (MealSlot::Snacks, 0.22),
            ],
        }
    }
}

/// Filtered foods grouped per meal slot.
#[derive(Debug, Clone, Default)]
pub struct MealBuckets<'a> {
    slots: [Vec<&'a FoodRecord>; 4],
}

impl<'a> MealBuckets<'a> {
    pub fn get(&self, slot: MealSlot) -> &[&'a FoodRecord] {
        &self.slots[slot.index()]
    }
}

/// Groups foods by slot (first 80 per slot). Empty slots are refilled with
/// the first 50 foods strictly between 0 and 800 kcal.
pub fn bucket_by_meal<'a>(filtered: &[&'a FoodRecord]) -> MealBuckets<'a> {
    let mut buckets = MealBuckets::default();
    for &food in filtered {
        if let Some(slot) = MealSlot::from_category(&food.category) {
            let bucket = &mut buckets.slots[slot.index()];
            if bucket.len() < BUCKET_CAP {
                bucket.push(food);
            }
        }
    }

    let fallback: Vec<&FoodRecord> = filtered
        .iter()
        .copied()
        .filter(|f| f.calories > 0.0 && f.calories < FALLBACK_MAX_CALORIES)
        .take(FALLBACK_CAP)
        .collect();
    for slot in MealSlot::ALL {
        let bucket = &mut buckets.slots[slot.index()];
        if bucket.is_empty() {
            debug!(?slot, fallback = fallback.len(), "empty meal bucket, using fallback pool");
            bucket.clone_from(&fallback);
        }
    }
    buckets
}

/// Builds Monday through Sunday. Every slot gets its own seed,
/// `seed_base + day * 1000 + slot`, so regenerating with another base
/// reshuffles every meal.
pub fn assemble(
    profile: &UserProfile,
    buckets: &MealBuckets<'_>,
    daily_calories: i64,
    seed_base: i64,
) -> Vec<DayPlan> {
    let meals_per_day = MealsPerDay::parse(&profile.meals_per_day);
    let shares = meals_per_day.shares();

    let mut day = Weekday::Monday;
    let mut plans = Vec::with_capacity(DAYS_PER_WEEK as usize);
    for day_index in 0..DAYS_PER_WEEK {
        let day_seed = seed_base.wrapping_add(day_index * DAY_SEED_STRIDE);
        let mut slots: [Meal; 4] = std::array::from_fn(|_| Meal::empty());
        for &(slot, share) in shares {
            let target = round_half_up(daily_calories as f64 * share);
            slots[slot.index()] = compose(
                buckets.get(slot),
                target,
                day_seed.wrapping_add(slot.seed_offset()),
            );
        }
        let [breakfast, lunch, dinner, snacks] = slots;
        plans.push(DayPlan {
            day: day.to_string(),
            meals: DayMeals {
                breakfast,
                lunch,
                dinner,
                snacks,
            },
        });
        day = day.next();
    }
    plans
}

/// Profile + catalog to a full week. Never fails: missing data degrades to
/// fallback pools and placeholder meals.
pub fn generate_diet_plan(profile: &UserProfile, catalog: &[FoodRecord], seed: i64) -> DietPlan {
    let targets = energy::compute(profile);
    let filtered = filter_foods(catalog, &profile.filter_prefs());
    let buckets = bucket_by_meal(&filtered);
    debug!(
        catalog = catalog.len(),
        filtered = filtered.len(),
        breakfast = buckets.get(MealSlot::Breakfast).len(),
        lunch = buckets.get(MealSlot::Lunch).len(),
        dinner = buckets.get(MealSlot::Dinner).len(),
        snacks = buckets.get(MealSlot::Snacks).len(),
        bmr = targets.bmr,
        tdee = targets.tdee,
        daily_calories = targets.daily_calories,
        seed,
        "generating diet plan"
    );

    let weekly_plan = assemble(profile, &buckets, targets.daily_calories, seed);

    DietPlan {
        daily_calories: targets.daily_calories,
        macros: targets.macros,
        hydration: targets.hydration,
        avoid_foods: targets.avoid_foods,
        weekly_plan,
    }
}
