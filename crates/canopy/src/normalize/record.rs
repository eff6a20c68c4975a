//! The cleaned output row.

use serde::{Deserialize, Serialize};

/// Output column order.
pub const CLEAN_COLUMNS: [&str; 9] = [
    "X",
    "Y",
    "Name",
    "Description",
    "Date",
    "Zone",
    "Diameter",
    "Length",
    "Image",
];

/// A normalized tree row.
///
/// `description` is free of markup; `diameter` and `length` are a
/// [`SizeClass`](super::SizeClass) label or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanRecord {
    #[serde(rename = "X")]
    pub x: String,
    #[serde(rename = "Y")]
    pub y: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Zone")]
    pub zone: String,
    #[serde(rename = "Diameter")]
    pub diameter: String,
    #[serde(rename = "Length")]
    pub length: String,
    #[serde(rename = "Image")]
    pub image: String,
}

impl CleanRecord {
    /// Field values in [`CLEAN_COLUMNS`] order.
    pub fn values(&self) -> [&str; 9] {
        [
            &self.x,
            &self.y,
            &self.name,
            &self.description,
            &self.date,
            &self.zone,
            &self.diameter,
            &self.length,
            &self.image,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_header_matches_columns() {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(CleanRecord::default()).unwrap();
        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let header = out.lines().next().unwrap();
        assert_eq!(header, CLEAN_COLUMNS.join(","));
    }

    #[test]
    fn test_values_order() {
        let record = CleanRecord {
            x: "1".into(),
            image: "i.jpg".into(),
            ..CleanRecord::default()
        };
        let values = record.values();
        assert_eq!(values[0], "1");
        assert_eq!(values[8], "i.jpg");
    }
}
