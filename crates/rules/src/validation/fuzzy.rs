//! "Did you mean" lookups for sensor types and condition names, plus the
//! rule id format check.

use twin_core::KNOWN_SENSORS;

use crate::schema::Condition;

/// Closest built-in sensor type to a misspelled one.
pub(crate) fn suggest_sensor(input: &str) -> Option<&'static str> {
    closest(input, KNOWN_SENSORS.iter().copied())
}

/// Closest canonical condition name to an unrecognized one.
pub(crate) fn suggest_condition(input: &str) -> Option<&'static str> {
    closest(input, Condition::ALL.iter().map(Condition::as_str))
}

/// Case-insensitive nearest candidate by edit distance, or `None` when even
/// the best one needs more edits than a third of the longer word (min 2).
fn closest<I>(input: &str, candidates: I) -> Option<&'static str>
where
    I: IntoIterator<Item = &'static str>,
{
    let needle = input.to_lowercase();
    let (best, dist) = candidates
        .into_iter()
        .map(|c| (c, edit_distance(&needle, &c.to_lowercase())))
        .min_by_key(|&(_, d)| d)?;

    let longest = needle.chars().count().max(best.chars().count());
    (dist <= (longest / 3).max(2)).then_some(best)
}

/// Levenshtein distance, single-row dynamic programming.
pub(crate) fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == *cb {
                diag
            } else {
                1 + diag.min(above).min(row[j])
            };
            diag = above;
        }
    }

    row[b.len()]
}

/// Rule ids are lowercase kebab-case: `^[a-z0-9]+(-[a-z0-9]+)*$`. They double
/// as file names, so nothing else is allowed.
pub(crate) fn is_valid_rule_id(id: &str) -> bool {
    !id.is_empty()
        && id.split('-').all(|part| {
            !part.is_empty()
                && part
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_distance_basic() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("abc", ""), 3);
        assert_eq!(edit_distance("energy", "energy"), 0);
    }

    #[test]
    fn sensor_suggestions() {
        assert_eq!(suggest_sensor("humidty"), Some("humidity"));
        assert_eq!(suggest_sensor("Vibrations"), Some("vibration"));
        assert_eq!(suggest_sensor("temprature"), Some("temperature"));
        assert_eq!(suggest_sensor("zzzzzzzzzzzzz"), None);
    }

    #[test]
    fn condition_suggestions() {
        assert_eq!(suggest_condition("out_of_rnge"), Some("out_of_range"));
        assert_eq!(suggest_condition("greater_then"), Some("greater_than"));
        assert_eq!(suggest_condition("Equal"), Some("equals"));
        assert_eq!(suggest_condition("sometimes"), None);
    }

    #[test]
    fn rule_ids() {
        assert!(is_valid_rule_id("temp-high"));
        assert!(is_valid_rule_id("rule-3f2a"));
        assert!(!is_valid_rule_id("Temp-High"));
        assert!(!is_valid_rule_id("temp--high"));
        assert!(!is_valid_rule_id("-temp"));
        assert!(!is_valid_rule_id("temp-"));
        assert!(!is_valid_rule_id("temp_high"));
        assert!(!is_valid_rule_id(""));
    }
}
