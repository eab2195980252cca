use serde::{Deserialize, Deserializer, Serialize};

pub mod dataset;
pub mod dedup;
pub mod dynasty;
pub mod format;
pub mod geo;
pub mod offset;
pub mod session;

pub use dataset::{DatasetShape, LoadError, parse_dataset};
pub use dedup::{deduplicate, filter_by_poets, flatten};
pub use dynasty::{Dynasty, DynastyConfig};
pub use format::{PoemCursor, format_poem_content};

/// Literary form assumed when a record does not carry one.
pub const DEFAULT_LITERARY_FORM: &str = "诗";

/// The lyric-verse form; its text is shown without added line breaks.
pub const LYRIC_FORM: &str = "词";

fn default_literary_form() -> String {
    DEFAULT_LITERARY_FORM.to_string()
}

/// Missing and `null` both fall back to [`DEFAULT_LITERARY_FORM`].
fn form_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let form: Option<String> = Option::deserialize(deserializer)?;
    Ok(form.unwrap_or_else(default_literary_form))
}

// ── Coordinates ──────────────────────────────────────────────────────────

/// WGS84 `[longitude, latitude]` pair, serialized as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat(pub f64, pub f64);

impl LngLat {
    pub fn lng(&self) -> f64 {
        self.0
    }

    pub fn lat(&self) -> f64 {
        self.1
    }
}

// ── Flat record ──────────────────────────────────────────────────────────

/// One poem attributed to one place, as found in the flat dataset shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPoemRecord {
    #[serde(rename = "final_location")]
    pub location_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub title: String,
    pub author: String,
    #[serde(
        default = "default_literary_form",
        deserialize_with = "form_or_default"
    )]
    pub literary_form: String, // 诗, 词, 赋, …
    #[serde(rename = "poem")]
    pub poem_text: String,
}

impl RawPoemRecord {
    /// The poem part of this record, without its place.
    pub fn entry(&self) -> PoemEntry {
        PoemEntry {
            title: self.title.clone(),
            author: self.author.clone(),
            literary_form: self.literary_form.clone(),
            poem_text: self.poem_text.clone(),
        }
    }
}

// ── Grouped location ─────────────────────────────────────────────────────

/// A poem embedded in its [`LocationGroup`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoemEntry {
    pub title: String,
    pub author: String,
    #[serde(
        default = "default_literary_form",
        deserialize_with = "form_or_default"
    )]
    pub literary_form: String,
    #[serde(rename = "poem")]
    pub poem_text: String,
}

impl PoemEntry {
    /// Poem text with the line-break rule of its literary form applied.
    pub fn formatted(&self) -> String {
        format_poem_content(&self.poem_text, &self.literary_form)
    }

    pub fn is_lyric(&self) -> bool {
        self.literary_form == LYRIC_FORM
    }
}

/// A deduplicated map location with every poem attributed to it.
///
/// Serializes to the grouped dataset shape, so the locations files written
/// by the CLI can be read back as input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationGroup {
    pub name: String,
    pub coordinates: LngLat,
    /// First-seen order of the source data.
    pub poems: Vec<PoemEntry>,
}

impl LocationGroup {
    pub fn poem_count(&self) -> usize {
        self.poems.len()
    }

    /// Distinct authors in first-seen order.
    pub fn authors(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for poem in &self.poems {
            if !seen.contains(&poem.author.as_str()) {
                seen.push(poem.author.as_str());
            }
        }
        seen
    }

    /// Header line shown above the poem cards, e.g. "共 3 首诗歌".
    pub fn count_label(&self) -> String {
        format!("共 {} 首诗歌", self.poems.len())
    }
}
