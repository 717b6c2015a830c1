use serde::{Deserialize, Serialize};

/// One listing row as returned by a [`crate::source::ListingSource`].
///
/// Every column except the slug may be missing or `null`; extra columns are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub slug: String,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub steering_wheel_id: Option<i64>,
    #[serde(default)]
    pub fuel_id: Option<i64>,
    #[serde(default)]
    pub gear_box_id: Option<i64>,
    #[serde(default)]
    pub transmission_id: Option<i64>,
    #[serde(default)]
    pub mileage: Option<i64>,
    #[serde(default)]
    pub horse_power: Option<i64>,
    #[serde(default)]
    pub generation_name: Option<String>,
    /// Passthrough columns for callers; the flyer itself does not print
    /// make or model.
    #[serde(default)]
    pub make_name: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
}

impl VehicleRecord {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            ..Self::default()
        }
    }

    pub fn steering(&self) -> Option<Steering> {
        self.steering_wheel_id.map(Steering::from_code)
    }

    pub fn fuel(&self) -> Option<FuelType> {
        self.fuel_id.map(FuelType::from_code)
    }

    pub fn gear_box(&self) -> Option<GearBox> {
        self.gear_box_id.map(GearBox::from_code)
    }

    pub fn drivetrain(&self) -> Option<Drivetrain> {
        self.transmission_id.map(Drivetrain::from_code)
    }
}

/// Steering wheel side. Only code 1 means left-hand; every other code,
/// recognised or not, is treated as right-hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steering {
    Left,
    Right,
}

impl Steering {
    pub fn from_code(code: i64) -> Self {
        if code == 1 {
            Steering::Left
        } else {
            Steering::Right
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Steering::Left => "left",
            Steering::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuelType {
    Petrol,
    Diesel,
    PetrolGas,
    Hybrid,
    Electric,
    Gas,
    Unknown(i64),
}

impl FuelType {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => FuelType::Petrol,
            2 => FuelType::Diesel,
            3 => FuelType::PetrolGas,
            5 => FuelType::Hybrid,
            6 => FuelType::Electric,
            7 => FuelType::Gas,
            other => FuelType::Unknown(other),
        }
    }

    pub fn key(&self) -> Option<&'static str> {
        match self {
            FuelType::Petrol => Some("petrol"),
            FuelType::Diesel => Some("diesel"),
            FuelType::PetrolGas => Some("petrol_gas"),
            FuelType::Hybrid => Some("hybrid"),
            FuelType::Electric => Some("electric"),
            FuelType::Gas => Some("gas"),
            FuelType::Unknown(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GearBox {
    Manual,
    Automatic,
    Tiptronic,
    Variator,
    Robot,
    Unknown(i64),
}

impl GearBox {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => GearBox::Manual,
            2 => GearBox::Automatic,
            3 => GearBox::Tiptronic,
            4 => GearBox::Variator,
            5 => GearBox::Robot,
            other => GearBox::Unknown(other),
        }
    }

    pub fn key(&self) -> Option<&'static str> {
        match self {
            GearBox::Manual => Some("manual"),
            GearBox::Automatic => Some("automatic"),
            GearBox::Tiptronic => Some("tiptronic"),
            GearBox::Variator => Some("variator"),
            GearBox::Robot => Some("robot"),
            GearBox::Unknown(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drivetrain {
    FrontWheel,
    RearWheel,
    AllWheel,
    Unknown(i64),
}

impl Drivetrain {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Drivetrain::FrontWheel,
            2 => Drivetrain::RearWheel,
            3 => Drivetrain::AllWheel,
            other => Drivetrain::Unknown(other),
        }
    }

    pub fn key(&self) -> Option<&'static str> {
        match self {
            Drivetrain::FrontWheel => Some("front"),
            Drivetrain::RearWheel => Some("rear"),
            Drivetrain::AllWheel => Some("all"),
            Drivetrain::Unknown(_) => None,
        }
    }
}
