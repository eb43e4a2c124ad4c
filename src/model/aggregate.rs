use crate::log::UrlRecord;
use std::collections::HashMap;

/// Durations observed for one distinct URL, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlGroup {
    pub url: String,
    pub times: Vec<f64>,
}

/// Result of a single pass over the record stream.
///
/// Groups are kept in first-seen order so that ranking ties resolve the same
/// way for the same input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedLog {
    pub total_count: usize,
    pub total_time: f64,
    pub groups: Vec<UrlGroup>,
}

#[cfg(test)]
impl AggregatedLog {
    pub fn get(&self, url: &str) -> Option<&[f64]> {
        self.groups
            .iter()
            .find(|g| g.url == url)
            .map(|g| g.times.as_slice())
    }
}

/// Streaming accumulator behind [`aggregate`].
#[derive(Debug, Default)]
pub struct Aggregator {
    log: AggregatedLog,
    index: HashMap<String, usize>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records with an empty URL are grouped under `""` like any other.
    pub fn push(&mut self, record: UrlRecord) {
        let UrlRecord { url, request_time } = record;

        self.log.total_count += 1;
        self.log.total_time += request_time;

        match self.index.get(&url) {
            Some(&i) => self.log.groups[i].times.push(request_time),
            None => {
                self.index.insert(url.clone(), self.log.groups.len());
                self.log.groups.push(UrlGroup {
                    url,
                    times: vec![request_time],
                });
            }
        }
    }

    pub fn finish(self) -> AggregatedLog {
        self.log
    }
}

/// Consume the records once and group their durations by URL.
pub fn aggregate<I>(records: I) -> AggregatedLog
where
    I: IntoIterator<Item = UrlRecord>,
{
    let mut agg = Aggregator::new();
    for record in records {
        agg.push(record);
    }
    agg.finish()
}
