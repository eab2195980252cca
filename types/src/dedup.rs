use std::collections::HashMap;

use crate::{LngLat, LocationGroup, RawPoemRecord};

/// Exact-value dedup key. Coordinates compare by bit pattern, so two
/// spellings of "the same" float upstream stay separate locations.
/// Signed zeros are equal values and share one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LocationKey {
    name: String,
    lat_bits: u64,
    lng_bits: u64,
}

impl LocationKey {
    fn of(record: &RawPoemRecord) -> Self {
        Self {
            name: record.location_name.clone(),
            lat_bits: value_bits(record.latitude),
            lng_bits: value_bits(record.longitude),
        }
    }
}

fn value_bits(x: f64) -> u64 {
    // -0.0 + 0.0 == +0.0
    (x + 0.0).to_bits()
}

/// Merge records that share `(location_name, latitude, longitude)`.
///
/// Groups come out in the order their key was first seen and each group's
/// poems keep input order. Nothing is sorted.
pub fn deduplicate(records: &[RawPoemRecord]) -> Vec<LocationGroup> {
    let mut index: HashMap<LocationKey, usize> = HashMap::new();
    let mut groups: Vec<LocationGroup> = Vec::new();

    for record in records {
        let key = LocationKey::of(record);
        match index.get(&key) {
            Some(&i) => groups[i].poems.push(record.entry()),
            None => {
                index.insert(key, groups.len());
                groups.push(LocationGroup {
                    name: record.location_name.clone(),
                    coordinates: LngLat(record.longitude, record.latitude),
                    poems: vec![record.entry()],
                });
            }
        }
    }

    groups
}

/// Expand groups back to one record per poem.
pub fn flatten(groups: &[LocationGroup]) -> Vec<RawPoemRecord> {
    groups
        .iter()
        .flat_map(|group| {
            group.poems.iter().map(move |poem| RawPoemRecord {
                location_name: group.name.clone(),
                latitude: group.coordinates.lat(),
                longitude: group.coordinates.lng(),
                title: poem.title.clone(),
                author: poem.author.clone(),
                literary_form: poem.literary_form.clone(),
                poem_text: poem.poem_text.clone(),
            })
        })
        .collect()
}

/// Keep only poems by the given authors; locations left empty are dropped.
pub fn filter_by_poets(groups: Vec<LocationGroup>, poets: &[&str]) -> Vec<LocationGroup> {
    groups
        .into_iter()
        .filter_map(|mut group| {
            group.poems.retain(|p| poets.contains(&p.author.as_str()));
            (!group.poems.is_empty()).then_some(group)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(place: &str, lat: f64, lng: f64, title: &str, author: &str) -> RawPoemRecord {
        RawPoemRecord {
            location_name: place.into(),
            latitude: lat,
            longitude: lng,
            title: title.into(),
            author: author.into(),
            literary_form: "诗".into(),
            poem_text: format!("{title}。"),
        }
    }

    fn sample() -> Vec<RawPoemRecord> {
        vec![
            rec("玄武湖", 32.07, 118.79, "T1", "李白"),
            rec("钟山", 32.1, 118.8, "T2", "王安石"),
            rec("玄武湖", 32.07, 118.79, "T3", "刘禹锡"),
            rec("方山", 31.9, 118.87, "T4", "谢朓"),
            rec("钟山", 32.1, 118.8, "T5", "李白"),
        ]
    }

    #[test]
    fn test_zhongshan_example() {
        let records = vec![
            rec("钟山", 32.1, 118.8, "A", "X"),
            rec("钟山", 32.1, 118.8, "B", "Y"),
        ];
        let groups = deduplicate(&records);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "钟山");
        assert_eq!(groups[0].coordinates, LngLat(118.8, 32.1));
        let titles: Vec<&str> = groups[0].poems.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn test_first_occurrence_order() {
        let groups = deduplicate(&sample());
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["玄武湖", "钟山", "方山"]);
        let titles: Vec<&str> = groups[0].poems.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["T1", "T3"]);
    }

    #[test]
    fn test_poem_count_conserved() {
        let input = sample();
        let groups = deduplicate(&input);
        let total: usize = groups.iter().map(|g| g.poems.len()).sum();
        assert_eq!(total, input.len());
        assert!(groups.iter().all(|g| !g.poems.is_empty()));
        assert!(deduplicate(&[]).is_empty());
    }

    #[test]
    fn test_same_name_different_coordinates_stay_apart() {
        let records = vec![
            rec("钟山", 32.1, 118.8, "A", "X"),
            rec("钟山", 32.10000001, 118.8, "B", "Y"),
            rec("钟山", 32.1, 118.80001, "C", "Z"),
        ];
        assert_eq!(deduplicate(&records).len(), 3);
    }

    #[test]
    fn test_signed_zero_is_one_location() {
        let records = vec![
            rec("零点", 0.0, 118.8, "A", "X"),
            rec("零点", -0.0, 118.8, "B", "Y"),
            rec("零点", 0.0, -0.0, "C", "Z"),
            rec("零点", -0.0, 0.0, "D", "W"),
        ];
        let groups = deduplicate(&records);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].poems.len(), 2);
        assert_eq!(groups[1].poems.len(), 2);
    }

    #[test]
    fn test_dedup_idempotent_after_flatten() {
        let once = deduplicate(&sample());
        let twice = deduplicate(&flatten(&once));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_flatten_keeps_group_order() {
        let groups = deduplicate(&sample());
        let flat = flatten(&groups);
        let titles: Vec<&str> = flat.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["T1", "T3", "T2", "T5", "T4"]);
    }

    #[test]
    fn test_filter_by_poets() {
        let groups = deduplicate(&sample());
        let kept = filter_by_poets(groups, &["李白"]);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].name, "玄武湖");
        assert_eq!(kept[0].poems.len(), 1);
        assert_eq!(kept[1].name, "钟山");
        assert_eq!(kept[1].poems[0].title, "T5");
    }
}
