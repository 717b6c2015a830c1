use serde::Serialize;
use tracing::debug;

use crate::labels::LookupTable;
use crate::record::VehicleRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacteristicKind {
    Year,
    Steering,
    Fuel,
    GearBox,
    Drivetrain,
    Mileage,
    HorsePower,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Characteristic {
    pub kind: CharacteristicKind,
    pub text: String,
}

/// Display-ready view of a [`VehicleRecord`]. Characteristics are stored in
/// print order and only for fields that survived normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRecord {
    pub slug: String,
    pub generation_name: Option<String>,
    pub characteristics: Vec<Characteristic>,
}

impl NormalizedRecord {
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.characteristics.iter().map(|item| item.text.as_str())
    }
}

pub fn normalize(record: &VehicleRecord, table: &LookupTable) -> NormalizedRecord {
    let mut characteristics = Vec::new();
    let mut push = |kind: CharacteristicKind, text: Option<String>| match text {
        Some(text) => characteristics.push(Characteristic { kind, text }),
        None => debug!("omitting {:?} for {}", kind, record.slug),
    };

    push(
        CharacteristicKind::Year,
        record.year.map(|year| table.year_line(&year.to_string())),
    );
    push(
        CharacteristicKind::Steering,
        record
            .steering()
            .and_then(|steering| table.steering_label(steering))
            .map(|label| table.steering_line(label)),
    );
    push(
        CharacteristicKind::Fuel,
        record
            .fuel()
            .and_then(|fuel| table.fuel_label(fuel))
            .map(str::to_string),
    );
    push(
        CharacteristicKind::GearBox,
        record
            .gear_box()
            .and_then(|gear_box| table.gear_box_label(gear_box))
            .map(str::to_string),
    );
    push(
        CharacteristicKind::Drivetrain,
        record
            .drivetrain()
            .and_then(|drivetrain| table.drivetrain_label(drivetrain))
            .map(str::to_string),
    );
    push(
        CharacteristicKind::Mileage,
        record
            .mileage
            .filter(|mileage| *mileage != 0)
            .map(|mileage| table.mileage_line(&group_thousands(mileage))),
    );
    push(
        CharacteristicKind::HorsePower,
        record
            .horse_power
            .filter(|power| *power != 0)
            .map(|power| table.horse_power_line(&power.to_string())),
    );

    let generation_name = record
        .generation_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string);

    NormalizedRecord {
        slug: record.slug.clone(),
        generation_name,
        characteristics,
    }
}

/// Groups digits in threes with a plain space: `123456` -> `123 456`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    grouped
}
