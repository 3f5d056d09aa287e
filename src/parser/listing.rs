use serde::{Deserialize, Serialize};

/// One scraped apartment/studio posting. Every field is free text exactly as
/// it appeared on the page; nothing is typed or validated beyond the ASCII
/// normalization applied at extraction time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Listing {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    pub address: String,
    pub object_number: String,
    pub area: String,
    pub floor: String,
    pub space: String,
    pub rent: String,
    pub move_in: String,
}

impl Listing {
    /// Identity used for dedup. Two listings with the same object number and
    /// move-in date are the same listing even if every other field differs.
    pub fn key(&self) -> String {
        format!("{}@{}", self.object_number, self.move_in)
    }

    /// Plain-text email body, one labeled line per field.
    pub fn notification_body(&self) -> String {
        format!(
            "New student apartment/studio available!\n\n\
             Title: {}\nLocation: {}\nAddress: {}\nFloor: {}\nSpace: {}\nPrice: {}\nStart: {}\nURL: {}",
            self.kind,
            self.area,
            self.address,
            self.floor,
            self.space,
            self.rent,
            self.move_in,
            self.url
        )
    }
}
