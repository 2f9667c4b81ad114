//! Records as served by the board backend, before validation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::DataError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// The effect attached to a square or a card. At most a couple of
/// these are set on any one record.
pub struct RawAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub money: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub go_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_to: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
/// Either a flat schedule (railroads, utilities) or the
/// building-dependent rents of a colored property.
pub enum RawRent {
    Schedule(Vec<i64>),
    Buildings {
        base: i64,
        #[serde(rename = "withHouse")]
        with_house: Vec<i64>,
        #[serde(rename = "withHotel")]
        with_hotel: i64,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSquare {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mortgage: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rent: Option<RawRent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<RawAction>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// The board layout, one list per side in walking order starting from 'Go'.
pub struct BoardData {
    pub bottom: Vec<RawSquare>,
    pub left: Vec<RawSquare>,
    pub top: Vec<RawSquare>,
    pub right: Vec<RawSquare>,
}

impl BoardData {
    /// The sides in the order they're walked, with their names.
    pub fn sides(&self) -> [(&'static str, &[RawSquare]); 4] {
        [
            ("bottom", self.bottom.as_slice()),
            ("left", self.left.as_slice()),
            ("top", self.top.as_slice()),
            ("right", self.right.as_slice()),
        ]
    }

    /// Every square in board order.
    pub fn squares(&self) -> impl Iterator<Item = &RawSquare> {
        self.bottom
            .iter()
            .chain(&self.left)
            .chain(&self.top)
            .chain(&self.right)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCard {
    pub id: u32,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub action: RawAction,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
}

pub fn parse_board(json: &str) -> Result<BoardData, DataError> {
    Ok(serde_json::from_str(json)?)
}

pub fn parse_cards(json: &str) -> Result<Vec<RawCard>, DataError> {
    Ok(serde_json::from_str(json)?)
}

/// Parse the country list, served as an array of `{code: name}` objects.
pub fn parse_countries(json: &str) -> Result<Vec<Country>, DataError> {
    let entries: Vec<BTreeMap<String, String>> = serde_json::from_str(json)?;

    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            if entry.len() != 1 {
                return Err(DataError::MalformedCountry(i));
            }

            entry
                .into_iter()
                .next()
                .map(|(code, name)| Country { code, name })
                .ok_or(DataError::MalformedCountry(i))
        })
        .collect()
}
