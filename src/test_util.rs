#[cfg(test)]
pub(crate) fn sample_layout_config() -> crate::layout::LayoutConfig {
    use crate::layout::{
        Anchors, LayoutConfig, Orientation, PageGeometry, Position, Typography,
    };
    use std::path::PathBuf;

    LayoutConfig {
        page: PageGeometry {
            width_mm: 297.0,
            height_mm: 210.0,
            margin_mm: 10.0,
        },
        orientation: Orientation::Portrait,
        anchors: Anchors {
            title: Some(Position::new(15.0, 15.0)),
            logo: Some(Position::new(150.0, 15.0)),
            qr_caption: Some(Position::new(152.0, 90.0)),
            qr_image: Some(Position::new(182.0, 110.0)),
            generation: Some(Position::new(15.0, 50.0)),
            characteristics: Some(Position::new(20.0, 80.0)),
        },
        logo_path: PathBuf::from("logo.png"),
        logo_width_mm: 100.0,
        qr_width_mm: 75.0,
        listing_base_url: "https://www.mashina.kg/details".to_string(),
        work_dir: PathBuf::from("work"),
        typography: Typography::default(),
    }
}
