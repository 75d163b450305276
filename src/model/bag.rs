use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Card title shown when a bag has no name.
pub const UNNAMED_TITLE: &str = "Unnamed Flavor";
/// Card description shown when a bag has no flavor text.
pub const DEFAULT_DESCRIPTION: &str = "Custom Lays bag";

/// One user's bag customization as stored by the remote API.
///
/// Every field is optional. Deserialization is lenient: a field holding the wrong JSON type is
/// treated as absent, and `_id` / `id` are both accepted for the identifier (numbers are
/// stringified). Serialization omits absent fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Bag {
    /// Store-assigned key.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Printed flavor name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Flavor description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flavor: Option<String>,
    /// Body color as entered (expected `#rrggbb`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colour: Option<String>,
    /// Text color alias (`white` / `black`).
    #[serde(rename = "textColour", skip_serializing_if = "Option::is_none")]
    pub text_colour: Option<String>,
    /// Font alias (`standard` / `decorative` / `classic`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    /// Image reference: URL, root-relative path or `data:` URL.
    #[serde(rename = "bagImage", skip_serializing_if = "Option::is_none")]
    pub bag_image: Option<String>,
}

impl<'de> Deserialize<'de> for Bag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let v = Value::deserialize(deserializer)?;
        Bag::from_value(&v).ok_or_else(|| serde::de::Error::custom("bag must be a JSON object"))
    }
}

impl Bag {
    /// Build a bag from any JSON object, ignoring fields of unexpected types.
    ///
    /// Returns `None` when `v` is not an object.
    pub fn from_value(v: &Value) -> Option<Self> {
        let obj = v.as_object()?;
        let id = obj
            .get("_id")
            .and_then(lenient_key)
            .or_else(|| obj.get("id").and_then(lenient_key));
        let text = |k: &str| obj.get(k).and_then(Value::as_str).map(str::to_owned);
        Some(Self {
            id,
            name: text("name"),
            flavor: text("flavor"),
            colour: text("colour"),
            text_colour: text("textColour"),
            font: text("font"),
            bag_image: text("bagImage"),
        })
    }

    /// Parsed font alias (unknown or missing values map to [`FontAlias::Standard`]).
    pub fn font_alias(&self) -> FontAlias {
        FontAlias::parse_lenient(self.font.as_deref())
    }

    /// Parsed text fill (anything but a case-insensitive `black` is white).
    pub fn text_fill(&self) -> TextFill {
        TextFill::parse_lenient(self.text_colour.as_deref())
    }

    /// Title shown on the bag's card.
    pub fn card_title(&self) -> &str {
        non_empty(self.name.as_deref()).unwrap_or(UNNAMED_TITLE)
    }

    /// Description shown on the bag's card.
    pub fn card_description(&self) -> &str {
        non_empty(self.flavor.as_deref()).unwrap_or(DEFAULT_DESCRIPTION)
    }
}

/// Font alias selecting one of the fixed font stacks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontAlias {
    /// Neutral sans-serif stack.
    #[default]
    Standard,
    /// Script/cursive stack.
    Decorative,
    /// Serif stack.
    Classic,
}

impl FontAlias {
    /// Case-insensitive lookup; unrecognized or missing input yields `Standard`.
    pub fn parse_lenient(s: Option<&str>) -> Self {
        match s.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("decorative") => Self::Decorative,
            Some("classic") => Self::Classic,
            _ => Self::Standard,
        }
    }

    /// Wire name of the alias.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Decorative => "decorative",
            Self::Classic => "classic",
        }
    }
}

/// Fill color of the printed label.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFill {
    /// `#fff`.
    #[default]
    White,
    /// `#000`.
    Black,
}

impl TextFill {
    /// `Black` iff the input equals `black` case-insensitively.
    pub fn parse_lenient(s: Option<&str>) -> Self {
        match s {
            Some(s) if s.trim().eq_ignore_ascii_case("black") => Self::Black,
            _ => Self::White,
        }
    }

    /// Wire name of the fill.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }

    /// CSS color used to paint the label.
    pub fn css(self) -> &'static str {
        match self {
            Self::White => "#fff",
            Self::Black => "#000",
        }
    }
}

/// Extract the bag list from any of the accepted response shapes.
///
/// Accepted: a bare array, `{"bags": [...]}` and `{"data": {"bags": [...]}}`. Anything else is an
/// empty list. Array entries that are not objects are skipped.
pub fn parse_bag_list(v: &Value) -> Vec<Bag> {
    let arr = v
        .as_array()
        .or_else(|| v.get("bags").and_then(Value::as_array))
        .or_else(|| {
            v.get("data")
                .and_then(|d| d.get("bags"))
                .and_then(Value::as_array)
        });
    let Some(arr) = arr else {
        return Vec::new();
    };

    arr.iter()
        .filter_map(|item| {
            let bag = Bag::from_value(item);
            if bag.is_none() {
                tracing::warn!(entry = %item, "skipping non-object bag entry");
            }
            bag
        })
        .collect()
}

/// Extract a single bag record from `{ "bag": {...} }`, `{ "data": {...} }`,
/// `{ "data": { "bag": {...} } }` or the record itself.
pub fn parse_bag_record(v: &Value) -> Option<Bag> {
    let inner = v
        .get("bag")
        .or_else(|| v.get("data").and_then(|d| d.get("bag")))
        .or_else(|| v.get("data").filter(|d| d.is_object()))
        .unwrap_or(v);
    Bag::from_value(inner)
}

pub(crate) fn lenient_key(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
#[path = "../../tests/unit/model/bag.rs"]
mod tests;
