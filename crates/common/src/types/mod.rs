use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Uniform outcome envelope returned by command handlers.
///
/// `data` is only ever populated by [`Response::success`], so a failed
/// response never carries a payload.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Response<T> {
    pub succeeded: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T> Response<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self { succeeded: true, message: message.into(), data: Some(data) }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { succeeded: false, message: message.into(), data: None }
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }
}
