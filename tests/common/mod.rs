#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use listing_flyer::settings::{Settings, load_settings_in};

pub const REFERENCE_SLUG: &str = "toyota-camry-123";

pub const REFERENCE_ROWS: &str = r#"[
  {
    "make_id": 1, "model_id": 12, "generation_id": 7, "body_id": 3,
    "year": 2015, "steering_wheel_id": 1, "fuel_id": 2, "gear_box_id": 2,
    "transmission_id": 3, "mileage": 45000, "horse_power": 150,
    "slug": "toyota-camry-123", "make_name": "Toyota", "model_name": "Camry",
    "generation_name": "XV50"
  },
  {
    "year": null, "steering_wheel_id": null, "fuel_id": 42, "mileage": 0,
    "slug": "bare-listing", "generation_name": null
  }
]"#;

/// Label pack restricted to ASCII so the built-in PDF fonts can draw it.
pub const ASCII_LABELS: &str = r#"
locale = "en-ascii"
version = 1

[text]
title = "Selling on"
qr_caption = "Point your camera at the QR code, to open the listing."
bullet = "- "

[lines]
year = "{}"
steering = "{} drive"
mileage = "{} km"
horse_power = "{} hp"

[steering]
left = "left-hand"
right = "right-hand"

[fuel]
petrol = "Petrol"
diesel = "Diesel"

[gear_box]
manual = "Manual"
automatic = "Automatic"

[drivetrain]
front = "Front-wheel drive"
rear = "Rear-wheel drive"
all = "All-wheel drive"
"#;

pub struct Workspace {
    pub root: PathBuf,
    pub output_dir: PathBuf,
    pub work_dir: PathBuf,
    pub listings: PathBuf,
    pub labels: PathBuf,
}

impl Workspace {
    pub fn new(root: &Path) -> Self {
        let output_dir = root.join("out");
        let work_dir = root.join("work");
        let listings = root.join("listings.json");
        let labels = root.join("labels.toml");
        fs::write(&listings, REFERENCE_ROWS).expect("write listings");
        fs::write(&labels, ASCII_LABELS).expect("write labels");
        write_logo(&root.join("logo.png"));
        Self {
            root: root.to_path_buf(),
            output_dir,
            work_dir,
            listings,
            labels,
        }
    }

    pub fn settings(&self) -> Settings {
        let extra = self.root.join("test-settings.toml");
        fs::write(
            &extra,
            format!(
                "[assets]\nlogo = {:?}\n\n[listing]\nlabels = {:?}\n\n[source]\nlistings = {:?}\n\n[output]\ndir = {:?}\nwork_dir = {:?}\n",
                self.root.join("logo.png").display().to_string(),
                self.labels.display().to_string(),
                self.listings.display().to_string(),
                self.output_dir.display().to_string(),
                self.work_dir.display().to_string(),
            ),
        )
        .expect("write settings");
        load_settings_in(&self.root, Some(&extra)).expect("settings")
    }

    pub fn png_files_in_work_dir(&self) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(&self.work_dir) else {
            return Vec::new();
        };
        entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("png"))
            .collect()
    }
}

fn write_logo(path: &Path) {
    let logo = RgbImage::from_fn(200, 40, |x, _| {
        if x % 20 < 10 {
            Rgb([200, 20, 20])
        } else {
            Rgb([255, 255, 255])
        }
    });
    logo.save(path).expect("write logo");
}
