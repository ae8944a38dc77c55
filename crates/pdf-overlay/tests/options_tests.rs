use image::{ImageBuffer, ImageFormat, Rgba};
use pdf_overlay::*;
use std::path::{Path, PathBuf};

fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let img = ImageBuffer::from_pixel(width, height, Rgba([1u8, 2, 3, 255]));
    img.save_with_format(&path, ImageFormat::Png).unwrap();
    path
}

fn letter_pages(count: usize) -> Vec<PageGeometry> {
    vec![PageGeometry::new(612.0, 792.0); count]
}

#[test]
fn test_plan_entry_defaults() {
    let entry = PlanEntry::default();
    assert_eq!(entry.page, 0);
    assert_eq!((entry.x, entry.y), (10.0, 10.0));
    assert_eq!(entry.width, 20.0);
    assert_eq!(entry.rotation, 0.0);
}

#[test]
fn test_validate_rejects_empty_plan() {
    assert!(OverlayPlan::default().validate().is_err());
}

#[test]
fn test_validate_rejects_bad_entries() {
    let good = PlanEntry {
        image: PathBuf::from("logo.png"),
        ..Default::default()
    };
    let plan = OverlayPlan {
        overlays: vec![good.clone()],
    };
    assert!(plan.validate().is_ok());

    let broken = [
        PlanEntry {
            image: PathBuf::new(),
            ..good.clone()
        },
        PlanEntry {
            width: 0.0,
            ..good.clone()
        },
        PlanEntry {
            width: -3.0,
            ..good.clone()
        },
        PlanEntry {
            rotation: f32::NAN,
            ..good.clone()
        },
        PlanEntry {
            x: f32::INFINITY,
            ..good.clone()
        },
    ];

    for entry in broken {
        let plan = OverlayPlan {
            overlays: vec![good.clone(), entry],
        };
        assert!(
            matches!(plan.validate(), Err(OverlayError::Config(_))),
            "accepted {:?}",
            plan.overlays[1]
        );
    }
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_plan_save_and_load() {
    use tempfile::NamedTempFile;

    let plan = OverlayPlan {
        overlays: vec![
            PlanEntry {
                image: PathBuf::from("stamp.png"),
                page: 2,
                x: 55.0,
                y: 70.5,
                width: 30.0,
                rotation: -15.0,
            },
            PlanEntry {
                image: PathBuf::from("sig.jpg"),
                ..Default::default()
            },
        ],
    };

    let temp = NamedTempFile::new().unwrap();
    plan.save(temp.path()).await.unwrap();
    let loaded = OverlayPlan::load(temp.path()).await.unwrap();

    assert_eq!(loaded, plan);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_plan_fills_missing_fields() {
    use tempfile::NamedTempFile;

    let temp = NamedTempFile::new().unwrap();
    std::fs::write(
        temp.path(),
        r#"{ "overlays": [ { "image": "a.png", "page": 1, "rotation": 45 } ] }"#,
    )
    .unwrap();

    let plan = OverlayPlan::load(temp.path()).await.unwrap();
    let entry = &plan.overlays[0];
    assert_eq!(entry.page, 1);
    assert_eq!(entry.rotation, 45.0);
    assert_eq!((entry.x, entry.y, entry.width), (10.0, 10.0, 20.0));
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_plan_load_reports_bad_json() {
    use tempfile::NamedTempFile;

    let temp = NamedTempFile::new().unwrap();
    std::fs::write(temp.path(), "{ not json").unwrap();

    let result = OverlayPlan::load(temp.path()).await;
    assert!(matches!(result, Err(OverlayError::Config(_))));
}

#[tokio::test]
async fn test_build_session_places_entries() {
    let dir = tempfile::tempdir().unwrap();
    let wide = write_png(dir.path(), "wide.png", 40, 10);

    let plan = OverlayPlan {
        overlays: vec![
            PlanEntry {
                image: wide.clone(),
                page: 0,
                x: 50.0,
                y: 20.0,
                width: 40.0,
                rotation: 30.0,
            },
            PlanEntry {
                image: wide,
                page: 1,
                x: 0.0,
                y: 0.0,
                width: 10.0,
                rotation: 0.0,
            },
        ],
    };

    let (session, skipped) = plan.build_session(&letter_pages(2)).await.unwrap();
    assert!(skipped.is_empty());
    assert_eq!(session.len(), 2);
    assert_eq!(session.selected(), None);

    let first = &session.overlays()[0];
    assert_eq!((first.x, first.y, first.width), (50.0, 20.0, 40.0));
    assert!((first.height - 40.0 * (612.0 / 792.0) / 4.0).abs() < 1e-4);
    assert_eq!(first.rotation, 30.0);

    let second = &session.overlays()[1];
    assert_eq!(second.page, 1);
    assert!((second.height - 10.0 * (612.0 / 792.0) / 4.0).abs() < 1e-4);
}

#[tokio::test]
async fn test_build_session_clamps_to_page() {
    let dir = tempfile::tempdir().unwrap();
    let square = write_png(dir.path(), "square.png", 10, 10);

    let plan = OverlayPlan {
        overlays: vec![PlanEntry {
            image: square,
            x: 95.0,
            y: 95.0,
            width: 30.0,
            ..Default::default()
        }],
    };

    let (session, _) = plan.build_session(&letter_pages(1)).await.unwrap();
    let overlay = &session.overlays()[0];
    assert_eq!(overlay.x, 70.0);
    assert_eq!(overlay.y, 100.0 - overlay.height);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_plan_height_never_overrides_aspect_lock() {
    use tempfile::NamedTempFile;

    let dir = tempfile::tempdir().unwrap();
    let square = write_png(dir.path(), "square.png", 10, 10);

    // A stray height key is ignored; the box stays square and on the page
    let temp = NamedTempFile::new().unwrap();
    let json = format!(
        r#"{{ "overlays": [ {{ "image": {:?}, "x": 0, "y": 50, "width": 20, "height": 150 }} ] }}"#,
        square.to_str().unwrap()
    );
    std::fs::write(temp.path(), json).unwrap();

    let plan = OverlayPlan::load(temp.path()).await.unwrap();
    let pages = vec![PageGeometry::new(600.0, 600.0)];
    let (session, _) = plan.build_session(&pages).await.unwrap();

    let overlay = &session.overlays()[0];
    assert_eq!(overlay.height, 20.0);
    assert_eq!((overlay.x, overlay.y), (0.0, 50.0));
    assert!(overlay.bottom() <= 100.0);

    let draw = to_draw_instruction(overlay, &pages[0]);
    assert!((draw.width / draw.height - 1.0).abs() < 1e-4);
}

#[tokio::test]
async fn test_build_session_skips_unreadable_images() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_png(dir.path(), "good.png", 10, 10);
    let not_an_image = dir.path().join("notes.png");
    std::fs::write(&not_an_image, b"just some text").unwrap();

    let plan = OverlayPlan {
        overlays: vec![
            PlanEntry {
                image: dir.path().join("missing.png"),
                ..Default::default()
            },
            PlanEntry {
                image: good,
                ..Default::default()
            },
            PlanEntry {
                image: not_an_image,
                ..Default::default()
            },
        ],
    };

    let (session, skipped) = plan.build_session(&letter_pages(1)).await.unwrap();
    assert_eq!(session.len(), 1);

    let reasons: Vec<_> = skipped.iter().map(|skip| skip.entry).collect();
    assert_eq!(reasons, vec![0, 2]);
    assert!(matches!(skipped[0].error, OverlayError::Io(_)));
    assert!(matches!(skipped[1].error, OverlayError::UnsupportedImage(_)));
}

#[tokio::test]
async fn test_build_session_keeps_entries_past_last_page() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_png(dir.path(), "late.png", 10, 10);

    let plan = OverlayPlan {
        overlays: vec![PlanEntry {
            image,
            page: 7,
            ..Default::default()
        }],
    };

    let pages = letter_pages(2);
    let (session, skipped) = plan.build_session(&pages).await.unwrap();
    assert!(skipped.is_empty());
    assert_eq!(session.len(), 1);

    // Export will drop it; planning already leaves it out
    assert!(transform_all(session.overlays(), &pages).is_empty());
}
