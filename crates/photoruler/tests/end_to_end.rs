use anyhow::Result;
use image::{Rgba, RgbaImage};
use photoruler::linear::perspective_transform;
use photoruler::pipeline::{ImageWarper, InterpolationKind};
use photoruler::prelude::*;

const RED: Rgba<u8> = Rgba([200, 0, 0, 255]);

#[test]
fn measure_both_ways_with_presets() -> Result<()> {
    let ruler = CameraCatalog::with_reference_presets().ruler(CameraCatalog::CANON_EOS_R6)?;
    let request = Measurement {
        length_px: 3179.0,
        known: Known::RealLength(150.0),
        angle_degrees: None,
        y1_px: 0.0,
    };
    let result = ruler.measure(&request)?;
    assert!((result.distance_cm - 300.0).abs() < 15.0);

    let back = ruler.measure(&Measurement {
        known: Known::Distance(result.distance_cm),
        ..request
    })?;
    approx::assert_relative_eq!(back.real_length_cm, 150.0, max_relative = 1e-9);
    Ok(())
}

#[test]
fn rectify_undoes_a_synthetic_perspective() -> Result<()> {
    let flat = RgbaImage::from_fn(200, 150, |x, y| {
        if (50..150).contains(&x) && (40..110).contains(&y) {
            RED
        } else {
            Rgba([255, 255, 255, 255])
        }
    });
    let rect = [
        Pt2::new(50.0, 40.0),
        Pt2::new(150.0, 40.0),
        Pt2::new(150.0, 110.0),
        Pt2::new(50.0, 110.0),
    ];
    let quad = [
        Pt2::new(60.0, 50.0),
        Pt2::new(140.0, 40.0),
        Pt2::new(150.0, 115.0),
        Pt2::new(45.0, 105.0),
    ];

    let warper = ProjectiveWarper {
        interpolation: InterpolationKind::Nearest,
        ..Default::default()
    };
    let tilt = perspective_transform(&rect, &quad)?;
    let photo = warper.warp(&flat, &tilt, [200, 150])?;

    let rectified = Rectifier::new(warper).rectify(
        &photo,
        &Polygon::from_pt2(&quad)?,
        &RectifyOptions::default(),
    )?;
    assert_eq!(rectified.output_size, [105, 75]);

    let (w, h) = rectified.image.dimensions();
    for (fx, fy) in [(0.5, 0.5), (0.15, 0.15), (0.85, 0.15), (0.85, 0.85), (0.15, 0.85)] {
        let px = rectified.image.get_pixel((w as f64 * fx) as u32, (h as f64 * fy) as u32);
        assert_eq!(px, &RED, "at ({fx}, {fy})");
    }
    Ok(())
}
