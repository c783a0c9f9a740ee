//! Daily reduction of a 3-hour forecast series.
//!
//! Samples are grouped by the date portion of their timestamp, keeping dates
//! in the order they first appear. Each group becomes one [`DailySummary`]
//! with its min/max temperature and most frequent condition.

use std::collections::HashMap;

use tracing::debug;

use crate::model::{DailySummary, ForecastSample};

/// Returned by [`representative_condition`] when there is nothing to choose from.
pub const NO_CONDITION: &str = "N/A";

/// One summary per distinct date, in first-seen order.
pub fn summarize(samples: &[ForecastSample]) -> Vec<DailySummary> {
    let summaries: Vec<DailySummary> = group_by_date(samples)
        .into_iter()
        .filter_map(|(date, group)| summarize_group(date, &group))
        .collect();

    debug!(
        samples = samples.len(),
        days = summaries.len(),
        "summarized forecast"
    );
    summaries
}

/// `summarize` rendered as `"<date>: <min>°C - <max>°C, <condition>"` lines.
pub fn summary_lines(samples: &[ForecastSample]) -> Vec<String> {
    let summaries = summarize(samples);
    summaries.iter().map(ToString::to_string).collect()
}

/// Most frequent condition; ties go to whichever tied value appeared first.
pub fn representative_condition<'a, I>(conditions: I) -> &'a str
where
    I: IntoIterator<Item = &'a str>,
{
    // (condition, count) in first-seen order
    let mut counts: Vec<(&'a str, usize)> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for condition in conditions {
        match index.get(condition) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(condition, counts.len());
                counts.push((condition, 1));
            }
        }
    }

    let mut best: Option<(&'a str, usize)> = None;
    for (condition, count) in counts {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((condition, count));
        }
    }

    best.map_or(NO_CONDITION, |(condition, _)| condition)
}

fn group_by_date(samples: &[ForecastSample]) -> Vec<(&str, Vec<&ForecastSample>)> {
    let mut groups: Vec<(&str, Vec<&ForecastSample>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for sample in samples {
        let date = sample.date();
        match index.get(date) {
            Some(&i) => groups[i].1.push(sample),
            None => {
                index.insert(date, groups.len());
                groups.push((date, vec![sample]));
            }
        }
    }

    groups
}

/// Min and max keep the first sample holding the extreme value, so the line
/// shows that sample's temperature exactly as the provider sent it.
fn summarize_group(date: &str, group: &[&ForecastSample]) -> Option<DailySummary> {
    let (first, rest) = group.split_first()?;

    let mut min_temp = &first.temperature;
    let mut max_temp = &first.temperature;
    for sample in rest {
        let t = &sample.temperature;
        if t.value() < min_temp.value() {
            min_temp = t;
        }
        if t.value() > max_temp.value() {
            max_temp = t;
        }
    }

    let condition = representative_condition(group.iter().map(|s| s.condition.as_str()));

    Some(DailySummary {
        date: date.to_string(),
        min_temp: min_temp.clone(),
        max_temp: max_temp.clone(),
        condition: condition.to_string(),
    })
}
