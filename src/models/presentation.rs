use serde::{Deserialize, Deserializer, Serialize};

/// Wire value of [`SlideType::MultipleChoice`].
pub const MULTIPLE_CHOICE: &str = "multipleChoice";

/// Seconds shown for a multiple-choice slide that carries no time limit.
pub const DEFAULT_SLIDE_TIME: u32 = 30;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Presentation {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "userCreated", default, skip_serializing_if = "Option::is_none")]
    pub user_created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub slides: Vec<Slide>,
}

impl Presentation {
    /// The first multiple-choice slide, the only slide kind the room flows drive.
    pub fn multiple_choice_slide(&self) -> Option<&Slide> {
        self.slides
            .iter()
            .find(|slide| slide.slide_type == SlideType::MultipleChoice)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideType {
    MultipleChoice,
    Other(String),
}

impl Serialize for SlideType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SlideType::MultipleChoice => serializer.serialize_str(MULTIPLE_CHOICE),
            SlideType::Other(name) => serializer.serialize_str(name),
        }
    }
}

impl<'de> Deserialize<'de> for SlideType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(if name == MULTIPLE_CHOICE {
            SlideType::MultipleChoice
        } else {
            SlideType::Other(name)
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Slide {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "slideType")]
    pub slide_type: SlideType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub options: Vec<PollOption>,
    /// Time limit in seconds. Display only, nothing counts it down.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<u32>,
}

impl Slide {
    pub fn display_time(&self) -> u32 {
        self.time.unwrap_or(DEFAULT_SLIDE_TIME)
    }
}

/// A selectable choice of a multiple-choice slide together with its tally.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PollOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: u64,
}

impl PollOption {
    pub fn new(index: u32, value: impl Into<String>, quantity: u64) -> Self {
        Self {
            index: Some(index),
            value: value.into(),
            color: None,
            quantity,
        }
    }
}

// Tallies come from the backend as numbers, numeric strings, or null.
fn lenient_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finds_first_multiple_choice_slide() {
        let presentation: Presentation = serde_json::from_value(json!({
            "_id": "p1",
            "slides": [
                { "_id": "s0", "slideType": "heading", "title": "Welcome" },
                { "_id": "s1", "slideType": "multipleChoice", "title": "Pick one",
                  "options": [{ "index": 0, "value": "A", "quantity": 0 }] },
                { "_id": "s2", "slideType": "multipleChoice", "title": "Later" }
            ]
        }))
        .unwrap();

        let slide = presentation.multiple_choice_slide().unwrap();
        assert_eq!(slide.id, "s1");
        assert_eq!(slide.options.len(), 1);
        assert_eq!(
            presentation.slides[0].slide_type,
            SlideType::Other("heading".to_string())
        );
    }

    #[test]
    fn quantity_defaults_to_zero_when_missing_or_garbage() {
        let options: Vec<PollOption> = serde_json::from_value(json!([
            { "value": "A" },
            { "value": "B", "quantity": "3" },
            { "value": "C", "quantity": "lots" },
            { "value": "D", "quantity": null },
            { "value": "E", "quantity": 7 }
        ]))
        .unwrap();

        let quantities: Vec<u64> = options.iter().map(|o| o.quantity).collect();
        assert_eq!(quantities, vec![0, 3, 0, 0, 7]);
        assert_eq!(options[0].index, None);
    }

    #[test]
    fn slide_time_falls_back_to_default() {
        let slide: Slide = serde_json::from_value(json!({
            "_id": "s1", "slideType": "multipleChoice", "title": "Q"
        }))
        .unwrap();
        assert_eq!(slide.display_time(), DEFAULT_SLIDE_TIME);
    }
}
