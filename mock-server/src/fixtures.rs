use serde_json::{json, Map, Value};

/// Ingredient slots per meal in the upstream schema.
pub const MAX_INGREDIENTS: usize = 20;

const IMAGE_BASE: &str = "https://www.themealdb.com/images";

/// The recorded data served by the mock API, in upstream wire format.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    categories: Vec<Value>,
    meals: Vec<Value>,
}

impl Catalog {
    pub fn new(categories: Vec<Value>, meals: Vec<Value>) -> Self {
        Self { categories, meals }
    }

    pub fn fixtures() -> Self {
        Self::new(
            vec![
                category("1", "Beef", "Beef is the culinary name for meat from cattle."),
                category("2", "Chicken", "Chicken is a type of domesticated fowl."),
                category("4", "Seafood", "Seafood is any form of sea life regarded as food by humans."),
            ],
            vec![
                meal(MealFixture {
                    id: "52772",
                    name: "Teriyaki Chicken Casserole",
                    category: "Chicken",
                    area: "Japanese",
                    tags: Some("Meat,Casserole"),
                    thumb: "wvpsxx1468256321.jpg",
                    ingredients: &[
                        ("soy sauce", "3/4 cup"),
                        ("water", "1/2 cup"),
                        ("brown sugar", "1/4 cup"),
                        ("ground ginger", "1/2 teaspoon"),
                        ("minced garlic", "1/2 teaspoon"),
                        ("cornstarch", "4 Tablespoons"),
                        ("chicken breasts", "2"),
                        ("stir-fry vegetables", "1 (12 oz.)"),
                        ("brown rice", "3 cups"),
                    ],
                }),
                meal(MealFixture {
                    id: "52959",
                    name: "Baked salmon with fennel & tomatoes",
                    category: "Seafood",
                    area: "British",
                    tags: None,
                    thumb: "1548772327.jpg",
                    ingredients: &[
                        ("Fennel", "2 medium"),
                        ("Parsley", "2 tbs chopped"),
                        ("Lemon", "Juice of 1"),
                        ("Cherry Tomatoes", "175g"),
                        ("Olive Oil", "1 tbs"),
                        ("Salmon", "350g"),
                        ("Black Olives", "to serve"),
                    ],
                }),
                meal(MealFixture {
                    id: "52887",
                    name: "Kedgeree",
                    category: "Seafood",
                    area: "British",
                    tags: Some("Fish,Breakfast,DateNight"),
                    thumb: "utxqpt1511639216.jpg",
                    ingredients: &[
                        ("Smoked Haddock", "300g"),
                        ("Bay Leaves", "2"),
                        ("Milk", "300ml"),
                        ("Eggs", "4"),
                        ("Basmati Rice", "300g"),
                    ],
                }),
            ],
        )
    }

    pub fn categories(&self) -> &[Value] {
        &self.categories
    }

    pub fn meals(&self) -> &[Value] {
        &self.meals
    }

    pub fn meal(&self, id: &str) -> Option<&Value> {
        self.meals.iter().find(|meal| meal["idMeal"] == id)
    }

    pub fn first_meal(&self) -> Option<&Value> {
        self.meals.first()
    }

    /// `filter.php` rows: id, name and thumbnail only.
    pub fn summaries_in(&self, category: &str) -> Vec<Value> {
        self.meals
            .iter()
            .filter(|meal| {
                meal["strCategory"]
                    .as_str()
                    .is_some_and(|c| c.eq_ignore_ascii_case(category))
            })
            .map(|meal| {
                json!({
                    "strMeal": meal["strMeal"],
                    "strMealThumb": meal["strMealThumb"],
                    "idMeal": meal["idMeal"],
                })
            })
            .collect()
    }

    /// Case-insensitive substring match on the meal name.
    pub fn search(&self, name: &str) -> Vec<Value> {
        let needle = name.to_lowercase();
        self.meals
            .iter()
            .filter(|meal| {
                meal["strMeal"]
                    .as_str()
                    .is_some_and(|n| n.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }
}

fn category(id: &str, name: &str, description: &str) -> Value {
    json!({
        "idCategory": id,
        "strCategory": name,
        "strCategoryThumb": format!("{IMAGE_BASE}/category/{}.png", name.to_lowercase()),
        "strCategoryDescription": description,
    })
}

struct MealFixture<'a> {
    id: &'a str,
    name: &'a str,
    category: &'a str,
    area: &'a str,
    tags: Option<&'a str>,
    thumb: &'a str,
    ingredients: &'a [(&'a str, &'a str)],
}

fn meal(fixture: MealFixture<'_>) -> Value {
    let mut map = Map::new();
    map.insert("idMeal".into(), json!(fixture.id));
    map.insert("strMeal".into(), json!(fixture.name));
    map.insert("strDrinkAlternate".into(), Value::Null);
    map.insert("strCategory".into(), json!(fixture.category));
    map.insert("strArea".into(), json!(fixture.area));
    map.insert(
        "strInstructions".into(),
        json!(format!("Prepare the {}.", fixture.name.to_lowercase())),
    );
    map.insert(
        "strMealThumb".into(),
        json!(format!("{IMAGE_BASE}/media/meals/{}", fixture.thumb)),
    );
    map.insert("strTags".into(), json!(fixture.tags));
    map.insert("strYoutube".into(), json!(""));

    // Upstream fills unused slots with a mix of "" and null.
    for slot in 1..=MAX_INGREDIENTS {
        let (ingredient, measure) = match fixture.ingredients.get(slot - 1) {
            Some((ingredient, measure)) => (json!(ingredient), json!(measure)),
            None if slot % 2 == 0 => (json!(""), json!(" ")),
            None => (Value::Null, Value::Null),
        };
        map.insert(format!("strIngredient{slot}"), ingredient);
        map.insert(format!("strMeasure{slot}"), measure);
    }

    map.insert("strSource".into(), Value::Null);
    map.insert("strImageSource".into(), Value::Null);
    map.insert("dateModified".into(), Value::Null);
    Value::Object(map)
}
