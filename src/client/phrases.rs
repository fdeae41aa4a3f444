//! Light-hearted remarks for a handful of weather descriptions

use rand::RngExt;

const LIGHT_RAIN: &[&str] = &[
    "Bring me an umbrella!",
    "Sing in the rain!",
    "How about popcorn, some blankets and a good movie for a rainy day?",
    "Have good dreams while it rains!",
];

const HEAVY_RAIN: &[&str] = &["Be careful, weather is getting tough!"];

const SUNNY: &[&str] = &[
    "Today is a good day to run!",
    "Let's go to the beach!",
    "Some ICE ICE baby!",
];

fn phrases_for(description: &str) -> &'static [&'static str] {
    match description.trim().to_lowercase().as_str() {
        "light rain" => LIGHT_RAIN,
        "rain" | "heavy intensity rain" => HEAVY_RAIN,
        "clear sky" => SUNNY,
        _ => &[],
    }
}

/// A random remark for the description, if there is one for it
#[must_use]
pub fn phrase_for(description: &str) -> Option<&'static str> {
    let phrases = phrases_for(description);
    if phrases.is_empty() {
        return None;
    }
    let index = rand::rng().random_range(0..phrases.len());
    phrases.get(index).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrase_comes_from_matching_list() {
        for _ in 0..20 {
            let phrase = phrase_for("light rain").unwrap();
            assert!(LIGHT_RAIN.contains(&phrase));
        }
        assert_eq!(phrase_for("Rain"), Some(HEAVY_RAIN[0]));
        assert!(SUNNY.contains(&phrase_for("clear sky").unwrap()));
    }

    #[test]
    fn test_unknown_description_has_no_phrase() {
        assert!(phrase_for("overcast clouds").is_none());
        assert!(phrase_for("").is_none());
    }
}
