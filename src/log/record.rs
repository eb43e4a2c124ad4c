/// One parsed observation: the request URL and its `$request_time`.
///
/// `url` is `""` and `request_time` is `0.0` when the field could not be
/// extracted from the line.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlRecord {
    pub url: String,
    pub request_time: f64,
}

impl UrlRecord {
    pub fn new(url: impl Into<String>, request_time: f64) -> Self {
        Self {
            url: url.into(),
            request_time,
        }
    }
}
