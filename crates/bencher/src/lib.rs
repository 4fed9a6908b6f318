//! Shared fixtures for the `nano-http` benchmarks.

/// A raw request captured to a file under `resources/request`.
#[derive(Debug, Copy, Clone)]
pub struct RequestFixture {
    name: &'static str,
    raw: &'static str,
}

impl RequestFixture {
    pub const fn new(name: &'static str, raw: &'static str) -> Self {
        Self { name, raw }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn raw(&self) -> &'static str {
        self.raw
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

pub static GET_SMALL: RequestFixture = RequestFixture::new("get_small", include_str!("../resources/request/get_small.txt"));
pub static GET_LARGE: RequestFixture = RequestFixture::new("get_large", include_str!("../resources/request/get_large.txt"));
pub static POST_JSON: RequestFixture = RequestFixture::new("post_json", include_str!("../resources/request/post_json.txt"));

pub fn request_fixtures() -> [RequestFixture; 3] {
    [GET_SMALL, GET_LARGE, POST_JSON]
}
