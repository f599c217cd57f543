//! Data models of the API
//!
//! `Item` is the only request body model. `ModelName` is the enumerated path
//! parameter of `/models/{model_name}`. The fake item fixture backs `/items/`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::body::{FromJsonValue, ObjectReader};
use crate::params::{FromParam, ParamSpec};
use crate::validation::{expected_choices, ErrorKind, LocItem, ValidationErrors};

/// An item offered for sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub tax: Option<f64>,
}

impl Item {
    /// `price + tax`, when a tax is set
    pub fn price_with_tax(&self) -> Option<f64> {
        self.tax.map(|tax| self.price + tax)
    }
}

impl FromJsonValue for Item {
    fn from_json(value: &Value, loc: &[LocItem], errors: &mut ValidationErrors) -> Option<Self> {
        let mut reader = ObjectReader::new(value, loc, errors)?;
        let name = reader.required::<String>("name");
        let description = reader.optional::<String>("description");
        let price = reader.required::<f64>("price");
        let tax = reader.optional::<f64>("tax");

        reader.finish(|| Some(Item { name: name?, description, price: price?, tax }))
    }
}

/// Pre-trained model names accepted by `/models/{model_name}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ModelName {
    Alexnet,
    Resnet,
    Lenet,
}

impl ModelName {
    pub const VALUES: &'static [&'static str] = &["alexnet", "resnet", "lenet"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelName::Alexnet => "alexnet",
            ModelName::Resnet => "resnet",
            ModelName::Lenet => "lenet",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ModelName::Alexnet => "Deep Learning FTW!",
            ModelName::Lenet => "LeCNN all the images",
            ModelName::Resnet => "Have some residuals",
        }
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelName {
    type Err = ErrorKind;

    /// Exact, case-sensitive match on the value
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alexnet" => Ok(ModelName::Alexnet),
            "resnet" => Ok(ModelName::Resnet),
            "lenet" => Ok(ModelName::Lenet),
            _ => Err(ErrorKind::Enum { expected: expected_choices(Self::VALUES) }),
        }
    }
}

impl FromParam for ModelName {
    fn from_param(raw: &str, _spec: &ParamSpec) -> Result<Self, ErrorKind> {
        raw.parse()
    }
}

/// One entry of the fake items database
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FakeItem {
    pub item_name: String,
}

/// The read-only fixture served by `GET /items/`
pub fn fake_items_db() -> Vec<FakeItem> {
    ["Foo", "Bar", "Baz"].iter().map(|name| FakeItem { item_name: name.to_string() }).collect()
}
