use std::borrow::Borrow;

use super::dto::Meal;
use super::energy::round_half_up;
use crate::foods::repo_types::FoodRecord;

const LCG_MULTIPLIER: u64 = 1_103_515_245;
const LCG_INCREMENT: u64 = 12_345;
const LCG_MODULUS: u64 = (1 << 31) - 1;

const MAX_ITEMS: usize = 5;
const LOW_FACTOR: f64 = 0.85;
const HIGH_FACTOR: f64 = 1.2;
const OVERSIZED_FIRST_FACTOR: f64 = 1.5;

pub const NO_MATCH_ITEM: &str = "No matching foods in dataset";

/// Fisher–Yates walk driven by a linear congruential generator, so the same
/// seed always gives the same permutation.
pub fn seeded_shuffle<T: Clone>(items: &[T], seed: i64) -> Vec<T> {
    let mut out = items.to_vec();
    // (s*a + c) mod m only depends on s mod m; reducing first keeps the product in u64.
    let mut state = seed.rem_euclid(LCG_MODULUS as i64) as u64;
    for i in (1..out.len()).rev() {
        state = (state * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
        let j = (state % (i as u64 + 1)) as usize;
        out.swap(i, j);
    }
    out
}

/// Greedily picks foods from the shuffled pool until the running calorie
/// total lands near `target_calories`.
///
/// Macros are the exact sums of the chosen records, rounded for display.
pub fn compose<F: Borrow<FoodRecord>>(pool: &[F], target_calories: i64, seed: i64) -> Meal {
    if pool.is_empty() {
        return placeholder_meal(target_calories);
    }

    let refs: Vec<&FoodRecord> = pool.iter().map(<F as Borrow<FoodRecord>>::borrow).collect();
    let shuffled = seeded_shuffle(&refs, seed);
    let target = target_calories as f64;
    let low = round_half_up(target * LOW_FACTOR) as f64;
    let high = round_half_up(target * HIGH_FACTOR) as f64;

    let mut selected: Vec<&FoodRecord> = Vec::new();
    let mut total = 0.0;
    for &food in &shuffled {
        if selected.len() >= MAX_ITEMS || total >= high {
            break;
        }
        if selected.is_empty() && food.calories > target * OVERSIZED_FIRST_FACTOR {
            continue;
        }
        selected.push(food);
        total += food.calories;
        if total >= low {
            break;
        }
    }

    if selected.is_empty() {
        selected.push(shuffled[0]);
        total = shuffled[0].calories;
    }

    let protein: f64 = selected.iter().map(|f| f.protein_g).sum();
    let carbs: f64 = selected.iter().map(|f| f.carbs_g).sum();
    let fats: f64 = selected.iter().map(|f| f.fat_g).sum();

    let name = selected
        .iter()
        .take(2)
        .map(|f| f.name.as_str())
        .collect::<Vec<_>>()
        .join(" + ");

    Meal {
        name,
        calories: round_half_up(total),
        protein: round_half_up(protein),
        carbs: round_half_up(carbs),
        fats: round_half_up(fats),
        items: selected.iter().map(|f| f.name.clone()).collect(),
    }
}

/// Stand-in when no food survives filtering: macros follow a 25/50/25 split.
fn placeholder_meal(target_calories: i64) -> Meal {
    let kcal = target_calories as f64;
    Meal {
        name: "Meal".to_string(),
        calories: target_calories,
        protein: round_half_up(kcal * 0.25 / 4.0),
        carbs: round_half_up(kcal * 0.5 / 4.0),
        fats: round_half_up(kcal * 0.25 / 9.0),
        items: vec![NO_MATCH_ITEM.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foods::repo_types::food;

    fn with_macros(name: &str, calories: f64, protein: f64, carbs: f64, fat: f64) -> FoodRecord {
        let mut f = food(name, calories, "lunch");
        f.protein_g = protein;
        f.carbs_g = carbs;
        f.fat_g = fat;
        f
    }

    fn pool(n: usize, calories: f64) -> Vec<FoodRecord> {
        (0..n)
            .map(|i| with_macros(&format!("Food {i}"), calories, 1.1, 2.2, 0.7))
            .collect()
    }

    #[test]
    fn shuffle_is_a_deterministic_permutation() {
        let items: Vec<u32> = (0..40).collect();
        let a = seeded_shuffle(&items, 42);
        let b = seeded_shuffle(&items, 42);
        assert_eq!(a, b);

        let mut sorted = a.clone();
        sorted.sort();
        assert_eq!(sorted, items);

        assert_ne!(seeded_shuffle(&items, 43), a);
    }

    #[test]
    fn shuffle_follows_the_recurrence() {
        let s1 = (LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
        let s2 = (s1 * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
        let mut expected = vec!['a', 'b', 'c'];
        expected.swap(2, (s1 % 3) as usize);
        expected.swap(1, (s2 % 2) as usize);
        assert_eq!(seeded_shuffle(&['a', 'b', 'c'], 1), expected);
    }

    #[test]
    fn shuffle_handles_huge_and_negative_seeds() {
        let items: Vec<u32> = (0..10).collect();
        let huge = seeded_shuffle(&items, 1_760_000_000_000);
        assert_eq!(huge, seeded_shuffle(&items, 1_760_000_000_000 % LCG_MODULUS as i64));
        assert_eq!(seeded_shuffle(&items, -1).len(), 10);
        assert_eq!(seeded_shuffle::<u32>(&[], 7), Vec::<u32>::new());
    }

    #[test]
    fn empty_pool_gives_placeholder() {
        let meal = compose::<FoodRecord>(&[], 600, 1);
        assert_eq!(meal.name, "Meal");
        assert_eq!(meal.calories, 600);
        assert_eq!(meal.protein, 38);
        assert_eq!(meal.carbs, 75);
        assert_eq!(meal.fats, 17);
        assert_eq!(meal.items, vec![NO_MATCH_ITEM.to_string()]);
    }

    #[test]
    fn compose_is_deterministic() {
        let foods = pool(30, 120.0);
        assert_eq!(compose(&foods, 500, 9), compose(&foods, 500, 9));
    }

    #[test]
    fn stops_once_low_bound_reached() {
        // low = 425: four 120 kcal items reach 480
        let meal = compose(&pool(30, 120.0), 500, 3);
        assert_eq!(meal.items.len(), 4);
        assert_eq!(meal.calories, 480);
    }

    #[test]
    fn never_selects_more_than_five_items() {
        let meal = compose(&pool(30, 10.0), 1000, 5);
        assert_eq!(meal.items.len(), 5);
        assert_eq!(meal.calories, 50);
    }

    #[test]
    fn skips_oversized_first_candidate() {
        let foods = vec![
            with_macros("Feast", 2000.0, 50.0, 200.0, 90.0),
            with_macros("Salad", 300.0, 10.0, 20.0, 15.0),
        ];
        for seed in 0..20 {
            let meal = compose(&foods, 400, seed);
            assert_eq!(meal.items[0], "Salad", "seed {seed}");
        }
    }

    #[test]
    fn forces_first_item_when_everything_is_oversized() {
        let foods = vec![with_macros("Feast", 2000.0, 50.0, 200.0, 90.0)];
        let meal = compose(&foods, 400, 11);
        assert_eq!(meal.items, vec!["Feast".to_string()]);
        assert_eq!(meal.calories, 2000);
        assert_eq!(meal.name, "Feast");
    }

    #[test]
    fn macros_are_exact_sums_of_selection() {
        let foods = pool(12, 150.0);
        let meal = compose(&foods, 700, 77);
        let n = meal.items.len() as f64;
        assert_eq!(meal.protein, round_half_up(1.1 * n));
        assert_eq!(meal.carbs, round_half_up(2.2 * n));
        assert_eq!(meal.fats, round_half_up(0.7 * n));
        assert_eq!(meal.calories, round_half_up(150.0 * n));
    }

    #[test]
    fn calories_stay_under_high_bound() {
        let foods: Vec<FoodRecord> = (0..50)
            .map(|i| with_macros(&format!("F{i}"), (i * 17 % 230) as f64 + 20.0, 1.0, 1.0, 1.0))
            .collect();
        for seed in 0..50 {
            let meal = compose(&foods, 600, seed);
            // the last accepted item can overshoot; before it the total was below low (510)
            assert!(meal.calories < 510 + 249, "seed {seed}");
            assert!(meal.calories >= 0);
        }
    }

    #[test]
    fn name_uses_first_two_items() {
        let meal = compose(&pool(10, 100.0), 500, 2);
        assert!(meal.items.len() > 2);
        assert_eq!(meal.name, format!("{} + {}", meal.items[0], meal.items[1]));
    }

    #[test]
    fn accepts_borrowed_pools() {
        let foods = pool(8, 200.0);
        let refs: Vec<&FoodRecord> = foods.iter().collect();
        assert_eq!(compose(&refs, 450, 4), compose(&foods, 450, 4));
    }
}
