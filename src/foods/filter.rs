use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use super::repo_types::FoodRecord;

/// Food-name keywords that mark a dish as Indian cuisine.
const INDIAN_KEYWORDS: &[&str] = &[
    "dal", "roti", "chapati", "naan", "paratha", "idli", "dosa", "upma", "poha",
    "paneer", "curry", "biryani", "pulao", "khichdi", "sambar", "rasam", "raita",
    "chutney", "pakora", "samosa", "bajra", "jowar", "makki", "besan", "thepla",
    "bhakri", "missi", "kulcha", "poori", "luchi", "akki", "rajma", "chole",
    "kadhi", "korma", "tikka", "tandoori", "kebab", "bhurji", "palak", "kadai",
    "malai", "shahi", "matar", "pav", "vada", "uttapam", "appam", "pongal",
    "bisi bele", "curd", "ghee", "lassi", "kheer", "halwa", "ladoo", "parantha",
    "aloo", "gobi", "bhindi", "baingan", "masoor", "moong", "toor", "chana",
    "urad", "kabuli", "chana dal", "moong dal", "masoor dal", "toor dal",
    "rice", "chawal", "bread", "milk", "dahi", "vegetable", "sabzi", "sabji",
    "chicken", "fish", "mutton", "lentil", "bean", "potato", "tomato", "onion",
    "spinach", "masala", "gravy", "bhaji", "subzi", "phulka", "papad", "pickle",
    "achar", "puri", "tadka", "jeera", "zeera", "parantha", "parota", "rumali",
    "tandoor", "chaat", "bhel", "papdi", "seviyan", "vermicelli", "papadum",
    "atta", "wheat", "methi", "fenugreek", "cabbage", "cauliflower", "brinjal",
    "okra", "carrot", "radish", "beetroot", "dhania", "coriander", "haldi",
    "turmeric", "garam", "namkeen", "murabba", "pulao", "pilaf",
];

/// Food-name keywords that mark a dish as Continental/Western cuisine.
const CONTINENTAL_KEYWORDS: &[&str] = &[
    "pasta", "pizza", "burger", "sandwich", "wrap", "bagel", "croissant",
    "muffin", "ciabatta", "focaccia", "brioche", "sourdough", "quinoa",
    "couscous", "risotto", "salad", "soup", "grilled", "baked", "toast",
    "pancake", "waffle", "omelette", "bacon", "salmon", "tuna", "steak",
    "burrito", "taco", "hummus", "falafel", "avocado", "smoothie", "muesli",
    "oatmeal", "cereal", "yogurt", "parmesan", "feta", "mozzarella",
];

const VEGAN_EXCLUDED_ALLERGENS: &[&str] = &["egg", "milk"];

fn keyword_matcher(keywords: &[&str]) -> Regex {
    let alternation = keywords
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i){alternation}")).expect("keyword list is a valid pattern")
}

lazy_static! {
    static ref INDIAN_RE: Regex = keyword_matcher(INDIAN_KEYWORDS);
    static ref CONTINENTAL_RE: Regex = keyword_matcher(CONTINENTAL_KEYWORDS);
}

pub fn is_indian_cuisine(name: &str) -> bool {
    INDIAN_RE.is_match(name)
}

pub fn is_continental_cuisine(name: &str) -> bool {
    CONTINENTAL_RE.is_match(name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DietaryPreference {
    Vegetarian,
    Vegan,
    NonVegetarian,
}

impl DietaryPreference {
    /// Unknown values put no constraint on the diet type.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "vegan" => Self::Vegan,
            "vegetarian" => Self::Vegetarian,
            _ => Self::NonVegetarian,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionStyle {
    Indian,
    Continental,
    Mixed,
}

impl RegionStyle {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "indian" => Self::Indian,
            "continental" => Self::Continental,
            _ => Self::Mixed,
        }
    }

    fn accepts(self, name: &str) -> bool {
        match self {
            Self::Indian => is_indian_cuisine(name),
            Self::Continental => is_continental_cuisine(name),
            Self::Mixed => true,
        }
    }
}

/// The profile fields that narrow the catalog.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterPrefs {
    #[serde(default)]
    pub dietary_preference: String,
    #[serde(default)]
    pub allergies: String,
    #[serde(default)]
    pub region_food_style: String,
}

impl FilterPrefs {
    pub fn is_empty(&self) -> bool {
        self.dietary_preference.is_empty()
            && self.allergies.is_empty()
            && self.region_food_style.is_empty()
    }
}

/// Splits a free-text allergy list into trimmed, lowercased, non-empty terms.
pub fn allergy_terms(allergies: &str) -> Vec<String> {
    allergies
        .split(',')
        .map(|a| a.trim().to_lowercase())
        .filter(|a| !a.is_empty())
        .collect()
}

/// Keeps the records compatible with the diet, allergy and region preferences.
/// Input order is preserved.
pub fn filter_foods<'a>(catalog: &'a [FoodRecord], prefs: &FilterPrefs) -> Vec<&'a FoodRecord> {
    let diet = DietaryPreference::parse(&prefs.dietary_preference);
    let region = RegionStyle::parse(&prefs.region_food_style);
    let allergies = allergy_terms(&prefs.allergies);

    catalog
        .iter()
        .filter(|f| satisfies_diet(f, diet))
        .filter(|f| !matches_allergy(f, &allergies))
        .filter(|f| region.accepts(&f.name))
        .collect()
}

fn satisfies_diet(food: &FoodRecord, diet: DietaryPreference) -> bool {
    match diet {
        DietaryPreference::Vegan => {
            let tags = food.allergen_tags.to_lowercase();
            food.is_veg() && !VEGAN_EXCLUDED_ALLERGENS.iter().any(|a| tags.contains(a))
        }
        DietaryPreference::Vegetarian => food.is_veg(),
        DietaryPreference::NonVegetarian => true,
    }
}

/// Substring match in both directions: "nut" hits "peanut" and "peanut" hits "nut".
/// An empty tag from a stray comma is a substring of every term, so "milk,"
/// is excluded for any allergy.
fn matches_allergy(food: &FoodRecord, allergies: &[String]) -> bool {
    if allergies.is_empty() || food.allergen_tags.trim().is_empty() {
        return false;
    }
    food.allergens()
        .any(|tag| allergies.iter().any(|u| tag.contains(u.as_str()) || u.contains(tag.as_str())))
}
