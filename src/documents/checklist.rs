use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CmsError;

use super::lenient;

pub const CHECKLIST_PAGE: &str = "checklist";

const DEFAULT_HEADING: &str = "Our [highlight]Cleaning Checklist[/highlight]";
const DEFAULT_DESCRIPTION: &str =
    "See exactly what our team covers in every room, for every type of clean.";
const DEFAULT_BUTTON_TEXT: &str = "View full checklist";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleaningType {
    #[default]
    Routine,
    Deep,
    Moving,
}

impl CleaningType {
    pub const ALL: [CleaningType; 3] = [CleaningType::Routine, CleaningType::Deep, CleaningType::Moving];

    pub fn as_str(self) -> &'static str {
        match self {
            CleaningType::Routine => "routine",
            CleaningType::Deep => "deep",
            CleaningType::Moving => "moving",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CleaningType::Routine => "Routine Cleaning",
            CleaningType::Deep => "Deep Cleaning",
            CleaningType::Moving => "Move In/Out Cleaning",
        }
    }
}

impl FromStr for CleaningType {
    type Err = CmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "routine" => Ok(CleaningType::Routine),
            "deep" => Ok(CleaningType::Deep),
            "moving" | "move" => Ok(CleaningType::Moving),
            other => Err(CmsError::InvalidArg(format!("unknown cleaning type: {other}"))),
        }
    }
}

impl fmt::Display for CleaningType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Room {
    #[default]
    Living,
    Kitchen,
    Bathroom,
    Bedroom,
}

impl Room {
    pub const ALL: [Room; 4] = [Room::Living, Room::Kitchen, Room::Bathroom, Room::Bedroom];

    pub fn as_str(self) -> &'static str {
        match self {
            Room::Living => "living",
            Room::Kitchen => "kitchen",
            Room::Bathroom => "bathroom",
            Room::Bedroom => "bedroom",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Room::Living => "Living Room",
            Room::Kitchen => "Kitchen",
            Room::Bathroom => "Bathroom",
            Room::Bedroom => "Bedroom",
        }
    }
}

impl FromStr for Room {
    type Err = CmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "living" | "living-room" => Ok(Room::Living),
            "kitchen" => Ok(Room::Kitchen),
            "bathroom" => Ok(Room::Bathroom),
            "bedroom" => Ok(Room::Bedroom),
            other => Err(CmsError::InvalidArg(format!("unknown room: {other}"))),
        }
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tasks for each room under one cleaning type. A cell missing from the
/// stored document deserializes as an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomTasks {
    #[serde(deserialize_with = "lenient::skip_invalid")]
    pub living: Vec<String>,
    #[serde(deserialize_with = "lenient::skip_invalid")]
    pub kitchen: Vec<String>,
    #[serde(deserialize_with = "lenient::skip_invalid")]
    pub bathroom: Vec<String>,
    #[serde(deserialize_with = "lenient::skip_invalid")]
    pub bedroom: Vec<String>,
}

impl RoomTasks {
    pub fn get(&self, room: Room) -> &[String] {
        match room {
            Room::Living => &self.living,
            Room::Kitchen => &self.kitchen,
            Room::Bathroom => &self.bathroom,
            Room::Bedroom => &self.bedroom,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChecklistItems {
    #[serde(deserialize_with = "lenient::or_default")]
    pub routine: RoomTasks,
    #[serde(deserialize_with = "lenient::or_default")]
    pub deep: RoomTasks,
    #[serde(deserialize_with = "lenient::or_default")]
    pub moving: RoomTasks,
}

impl ChecklistItems {
    pub fn for_type(&self, cleaning_type: CleaningType) -> &RoomTasks {
        match cleaning_type {
            CleaningType::Routine => &self.routine,
            CleaningType::Deep => &self.deep,
            CleaningType::Moving => &self.moving,
        }
    }

    pub fn tasks(&self, cleaning_type: CleaningType, room: Room) -> &[String] {
        self.for_type(cleaning_type).get(room)
    }

    pub fn is_empty(&self) -> bool {
        CleaningType::ALL
            .iter()
            .all(|ct| Room::ALL.iter().all(|room| self.tasks(*ct, *room).is_empty()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomImages {
    #[serde(deserialize_with = "lenient::or_default")]
    pub living: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub kitchen: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub bathroom: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub bedroom: String,
}

impl RoomImages {
    pub fn get(&self, room: Room) -> &str {
        match room {
            Room::Living => &self.living,
            Room::Kitchen => &self.kitchen,
            Room::Bathroom => &self.bathroom,
            Room::Bedroom => &self.bedroom,
        }
    }
}

impl Default for RoomImages {
    fn default() -> Self {
        Self {
            living: "/images/checklist/living-room.jpg".to_string(),
            kitchen: "/images/checklist/kitchen.jpg".to_string(),
            bathroom: "/images/checklist/bathroom.jpg".to_string(),
            bedroom: "/images/checklist/bedroom.jpg".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChecklistDocument {
    #[serde(deserialize_with = "lenient::or_default")]
    pub heading: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub description: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub button_text: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub checklist_items: ChecklistItems,
    #[serde(deserialize_with = "lenient::or_default")]
    pub room_images: RoomImages,
}

impl ChecklistDocument {
    /// Fill blank copy and image fields from the built-in document. Task
    /// cells are left as stored, empty lists included.
    pub fn normalized(mut self) -> Self {
        let fallback = ChecklistDocument::default();
        if self.heading.trim().is_empty() {
            self.heading = fallback.heading;
        }
        if self.description.trim().is_empty() {
            self.description = fallback.description;
        }
        if self.button_text.trim().is_empty() {
            self.button_text = fallback.button_text;
        }
        for room in Room::ALL {
            if self.room_images.get(room).trim().is_empty() {
                let image = fallback.room_images.get(room).to_string();
                match room {
                    Room::Living => self.room_images.living = image,
                    Room::Kitchen => self.room_images.kitchen = image,
                    Room::Bathroom => self.room_images.bathroom = image,
                    Room::Bedroom => self.room_images.bedroom = image,
                }
            }
        }
        self
    }
}

impl Default for ChecklistDocument {
    fn default() -> Self {
        Self {
            heading: DEFAULT_HEADING.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            button_text: DEFAULT_BUTTON_TEXT.to_string(),
            checklist_items: default_items(),
            room_images: RoomImages::default(),
        }
    }
}

fn tasks(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_items() -> ChecklistItems {
    ChecklistItems {
        routine: RoomTasks {
            living: tasks(&[
                "Dust all reachable surfaces",
                "Vacuum carpets and rugs",
                "Mop hard floors",
                "Empty trash bins",
                "Wipe light switches and door handles",
            ]),
            kitchen: tasks(&[
                "Wipe countertops and backsplash",
                "Clean exterior of appliances",
                "Clean and shine sink",
                "Wipe cabinet fronts",
                "Sweep and mop floors",
            ]),
            bathroom: tasks(&[
                "Clean and disinfect toilet",
                "Scrub shower and tub",
                "Clean sink and vanity",
                "Polish mirrors",
                "Mop floors",
            ]),
            bedroom: tasks(&[
                "Make beds",
                "Dust furniture and headboards",
                "Vacuum floors",
                "Empty trash bins",
            ]),
        },
        deep: RoomTasks {
            living: tasks(&[
                "Everything in routine cleaning",
                "Dust baseboards and window sills",
                "Vacuum upholstery and under cushions",
                "Clean ceiling fans and light fixtures",
                "Wipe down doors and door frames",
            ]),
            kitchen: tasks(&[
                "Everything in routine cleaning",
                "Clean inside microwave",
                "Degrease range hood and stovetop",
                "Wipe inside cabinets",
                "Scrub grout lines",
            ]),
            bathroom: tasks(&[
                "Everything in routine cleaning",
                "Descale shower heads and faucets",
                "Scrub grout and tile",
                "Clean exhaust fan cover",
                "Wipe inside drawers and cabinets",
            ]),
            bedroom: tasks(&[
                "Everything in routine cleaning",
                "Vacuum under beds",
                "Dust blinds and window frames",
                "Clean baseboards",
            ]),
        },
        moving: RoomTasks {
            living: tasks(&[
                "Everything in deep cleaning",
                "Clean inside closets",
                "Wash interior windows",
                "Spot clean walls",
            ]),
            kitchen: tasks(&[
                "Everything in deep cleaning",
                "Clean inside oven",
                "Clean inside refrigerator and freezer",
                "Wipe inside all drawers and cabinets",
            ]),
            bathroom: tasks(&[
                "Everything in deep cleaning",
                "Clean inside medicine cabinet",
                "Remove hard water stains",
                "Sanitize all fixtures",
            ]),
            bedroom: tasks(&[
                "Everything in deep cleaning",
                "Clean inside closets and shelving",
                "Wash interior windows",
                "Spot clean walls",
            ]),
        },
    }
}
