use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// A user-defined bucket that assets can be moved into for display grouping.
#[derive(Clone, Debug, Deserialize, Getters, PartialEq, Serialize, new)]
pub struct AssetGroup {
    id: String,
    name: String,
    color: String,
}
