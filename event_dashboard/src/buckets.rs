use crate::config::CategoryBucket;

pub const LEGEND_TITLE: &str = "Esdeveniments per municipi";

/// The categories used to color the municipalities on the map, by increasing
/// number of events. They cover all the counts from 1 upwards.
pub static CATEGORY_BUCKETS: [CategoryBucket; 5] = [
    CategoryBucket {
        min: 1,
        max: Some(5),
        color: "rgba(247, 170, 170, 1)",
        label: "1-5 esdeveniments",
    },
    CategoryBucket {
        min: 6,
        max: Some(10),
        color: "rgba(255, 145, 145, 0.8)",
        label: "6-10 esdeveniments",
    },
    CategoryBucket {
        min: 11,
        max: Some(25),
        color: "rgba(253, 88, 88, 0.9)",
        label: "11-25 esdeveniments",
    },
    CategoryBucket {
        min: 26,
        max: Some(50),
        color: "rgba(252, 52, 52, 0.95)",
        label: "26-50 esdeveniments",
    },
    CategoryBucket {
        min: 51,
        max: None,
        color: "rgba(153, 35, 16, 1)",
        label: "+ 50 esdeveniments",
    },
];

impl CategoryBucket {
    pub fn contains(&self, count: u64) -> bool {
        count >= self.min && self.max.map_or(true, |m| count <= m)
    }
}

/// The category of a municipality with `count` events.
/// A count of zero falls back to the first category.
pub fn bucket_for(count: u64) -> &'static CategoryBucket {
    CATEGORY_BUCKETS
        .iter()
        .find(|b| b.contains(count))
        .unwrap_or(&CATEGORY_BUCKETS[0])
}
